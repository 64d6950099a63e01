//! Combatants and the per-tick controller
//!
//! The controller turns one combatant's input snapshot into velocity, facing,
//! an optional jump, and an optional fire request. Position integration and the
//! void check also live here; gravity and floor contact belong to the physics
//! collaborator.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::{PLAYER_1_SPAWN, PLAYER_2_SPAWN};
use crate::horizontal;
use crate::tuning::Tuning;

use super::projectile::ProjectileId;

/// One of the two combatants
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CombatantId {
    One,
    Two,
}

impl CombatantId {
    /// Fixed processing order
    pub const ALL: [CombatantId; 2] = [CombatantId::One, CombatantId::Two];

    pub fn index(self) -> usize {
        match self {
            CombatantId::One => 0,
            CombatantId::Two => 1,
        }
    }

    /// Player number as shown to humans (1 or 2)
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn other(self) -> CombatantId {
        match self {
            CombatantId::One => CombatantId::Two,
            CombatantId::Two => CombatantId::One,
        }
    }

    pub fn spawn_point(self) -> Vec3 {
        match self {
            CombatantId::One => Vec3::from_array(PLAYER_1_SPAWN),
            CombatantId::Two => Vec3::from_array(PLAYER_2_SPAWN),
        }
    }

    /// Players start facing each other
    pub fn initial_facing(self) -> Vec3 {
        match self {
            CombatantId::One => Vec3::X,
            CombatantId::Two => Vec3::NEG_X,
        }
    }
}

/// Stats that persist across rounds and that upgrades transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatantStats {
    pub hp: f32,
    pub max_hp: f32,
    pub speed: f32,
    /// Cube edge length; also the hit extent
    pub size: f32,
    pub damage: f32,
    /// Bounce allotment given to each projectile this combatant fires
    pub max_bounces: u32,
    pub wins: u32,
}

impl CombatantStats {
    /// Restore `0 <= hp <= max_hp` after a mutation that may have broken it
    pub fn enforce_health_bounds(&mut self) {
        self.max_hp = self.max_hp.max(0.0);
        self.hp = self.hp.clamp(0.0, self.max_hp);
    }

    pub fn is_eliminated(&self) -> bool {
        self.hp <= 0.0
    }
}

/// Per-tick input for one combatant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub fire: bool,
}

impl ControlInput {
    /// Combined (unnormalized) movement direction on the XZ plane
    pub fn direction(&self) -> Vec3 {
        let mut dir = Vec3::ZERO;
        if self.up {
            dir.z -= 1.0;
        }
        if self.down {
            dir.z += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir
    }
}

/// A combatant's full simulation state
#[derive(Debug, Clone, PartialEq)]
pub struct CombatantState {
    pub id: CombatantId,
    pub stats: CombatantStats,
    pub pos: Vec3,
    pub vel: Vec3,
    /// Unit vector on the XZ plane; kept while idle
    pub facing: Vec3,
    /// Simulation time of the last shot (None = never fired)
    pub last_shot_at: Option<f64>,
}

impl CombatantState {
    pub fn new(id: CombatantId, stats: CombatantStats) -> Self {
        Self {
            id,
            stats,
            pos: id.spawn_point(),
            vel: Vec3::ZERO,
            facing: id.initial_facing(),
            last_shot_at: None,
        }
    }

    /// Put the combatant back at its spawn point, at rest
    pub fn respawn(&mut self) {
        self.pos = self.id.spawn_point();
        self.vel = Vec3::ZERO;
        self.facing = self.id.initial_facing();
        self.last_shot_at = None;
    }

    pub fn is_eliminated(&self) -> bool {
        self.stats.is_eliminated()
    }

    pub fn half_size(&self) -> f32 {
        self.stats.size / 2.0
    }

    /// Body mass, proportional to size
    pub fn mass(&self) -> f32 {
        50.0 * self.stats.size
    }

    /// Close enough to the floor to count as standing on it
    pub fn is_grounded(&self, floor_y: f32, ground_epsilon: f32) -> bool {
        self.pos.y <= floor_y + self.half_size() + ground_epsilon
    }

    /// Advance position by velocity
    pub fn integrate(&mut self, dt: f32) {
        if self.is_eliminated() {
            return;
        }
        self.pos += self.vel * dt;
    }
}

/// A request to spawn a projectile, produced by a successful shot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireRequest {
    pub owner: CombatantId,
    pub pos: Vec3,
    pub vel: Vec3,
    pub damage: f32,
    pub max_bounces: u32,
}

/// Where a damage record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageSource {
    Projectile(ProjectileId),
    /// Fell below the arena; unconditional
    Void,
}

/// Damage to apply to a combatant this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Damage {
    pub target: CombatantId,
    pub amount: f32,
    pub source: DamageSource,
}

/// Apply one tick of input to a combatant.
///
/// Returns a fire request if the shot passed the cooldown gate. Eliminated
/// combatants are left untouched.
pub fn drive(
    combatant: &mut CombatantState,
    input: &ControlInput,
    tuning: &Tuning,
    floor_y: f32,
    now: f64,
) -> Option<FireRequest> {
    if combatant.is_eliminated() {
        return None;
    }

    // Snappy movement: full speed while held, instant stop on release
    let dir = input.direction();
    if dir.length_squared() > 0.0 {
        let dir = dir.normalize();
        combatant.facing = dir;
        combatant.vel.x = dir.x * combatant.stats.speed;
        combatant.vel.z = dir.z * combatant.stats.speed;
    } else {
        combatant.vel.x = 0.0;
        combatant.vel.z = 0.0;
    }

    if input.jump
        && combatant.is_grounded(floor_y, tuning.ground_epsilon)
        && combatant.vel.y.abs() < tuning.jump_velocity_tolerance
    {
        combatant.vel.y = tuning.jump_impulse;
    }

    if !input.fire {
        return None;
    }
    let ready = combatant
        .last_shot_at
        .is_none_or(|last| now - last > f64::from(tuning.fire_cooldown));
    if !ready {
        return None;
    }
    combatant.last_shot_at = Some(now);

    let aim = horizontal(combatant.facing).normalize_or(combatant.id.initial_facing());
    let spawn_dist = combatant.stats.size * 0.7 + tuning.muzzle_offset;
    Some(FireRequest {
        owner: combatant.id,
        pos: combatant.pos + aim * spawn_dist,
        vel: aim * tuning.muzzle_speed,
        damage: combatant.stats.damage,
        max_bounces: combatant.stats.max_bounces,
    })
}

/// Lethal damage for a live combatant that has dropped into the void
pub fn void_check(combatant: &CombatantState, tuning: &Tuning) -> Option<Damage> {
    if combatant.is_eliminated() || combatant.pos.y >= tuning.void_y {
        return None;
    }
    Some(Damage {
        target: combatant.id,
        amount: tuning.void_damage,
        source: DamageSource::Void,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FLOOR_Y;

    fn grounded(id: CombatantId) -> CombatantState {
        let mut c = CombatantState::new(id, Tuning::default().starting_stats.to_stats());
        c.pos.y = FLOOR_Y + c.half_size();
        c
    }

    #[test]
    fn test_diagonal_movement_is_normalized() {
        let tuning = Tuning::default();
        let mut c = grounded(CombatantId::One);
        let input = ControlInput {
            up: true,
            right: true,
            ..Default::default()
        };
        drive(&mut c, &input, &tuning, FLOOR_Y, 0.0);

        let h = horizontal(c.vel);
        assert!((h.length() - 12.0).abs() < 1e-4);
        assert!(c.vel.x > 0.0 && c.vel.z < 0.0);
        assert!((c.facing.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_release_stops_instantly_and_keeps_facing() {
        let tuning = Tuning::default();
        let mut c = grounded(CombatantId::One);
        let left = ControlInput {
            left: true,
            ..Default::default()
        };
        drive(&mut c, &left, &tuning, FLOOR_Y, 0.0);
        assert_eq!(c.facing, Vec3::NEG_X);

        drive(&mut c, &ControlInput::default(), &tuning, FLOOR_Y, 0.1);
        assert_eq!(c.vel.x, 0.0);
        assert_eq!(c.vel.z, 0.0);
        assert_eq!(c.facing, Vec3::NEG_X);
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let tuning = Tuning::default();
        let mut c = grounded(CombatantId::Two);
        let input = ControlInput {
            left: true,
            right: true,
            ..Default::default()
        };
        drive(&mut c, &input, &tuning, FLOOR_Y, 0.0);
        assert_eq!(c.vel.x, 0.0);
        assert_eq!(c.facing, Vec3::NEG_X);
    }

    #[test]
    fn test_jump_requires_ground_and_low_vertical_speed() {
        let tuning = Tuning::default();
        let jump = ControlInput {
            jump: true,
            ..Default::default()
        };

        let mut c = grounded(CombatantId::One);
        drive(&mut c, &jump, &tuning, FLOOR_Y, 0.0);
        assert_eq!(c.vel.y, 18.0);

        // Airborne
        let mut c = grounded(CombatantId::One);
        c.pos.y += 1.0;
        drive(&mut c, &jump, &tuning, FLOOR_Y, 0.0);
        assert_eq!(c.vel.y, 0.0);

        // Grounded but still moving fast vertically
        let mut c = grounded(CombatantId::One);
        c.vel.y = -6.0;
        drive(&mut c, &jump, &tuning, FLOOR_Y, 0.0);
        assert_eq!(c.vel.y, -6.0);
    }

    #[test]
    fn test_fire_cooldown_gate() {
        let tuning = Tuning::default();
        let fire = ControlInput {
            fire: true,
            ..Default::default()
        };
        let mut c = grounded(CombatantId::One);

        assert!(drive(&mut c, &fire, &tuning, FLOOR_Y, 1.0).is_some());
        assert!(drive(&mut c, &fire, &tuning, FLOOR_Y, 1.2).is_none());
        // Exactly at the cooldown is still too early
        assert!(drive(&mut c, &fire, &tuning, FLOOR_Y, 1.3).is_none());
        assert!(drive(&mut c, &fire, &tuning, FLOOR_Y, 1.31).is_some());
    }

    #[test]
    fn test_fire_request_geometry() {
        let tuning = Tuning::default();
        let mut c = grounded(CombatantId::One);
        let fire = ControlInput {
            fire: true,
            ..Default::default()
        };
        let shot = drive(&mut c, &fire, &tuning, FLOOR_Y, 0.0).unwrap();

        assert_eq!(shot.owner, CombatantId::One);
        assert!((shot.pos.x - (c.pos.x + 1.5)).abs() < 1e-5);
        assert_eq!(shot.pos.y, c.pos.y);
        assert_eq!(shot.vel, Vec3::new(40.0, 0.0, 0.0));
        assert_eq!(shot.damage, 10.0);
        assert_eq!(shot.max_bounces, 3);
    }

    #[test]
    fn test_eliminated_combatant_is_skipped() {
        let tuning = Tuning::default();
        let mut c = grounded(CombatantId::Two);
        c.stats.hp = 0.0;
        let input = ControlInput {
            right: true,
            fire: true,
            jump: true,
            ..Default::default()
        };
        assert!(drive(&mut c, &input, &tuning, FLOOR_Y, 5.0).is_none());
        assert_eq!(c.vel, Vec3::ZERO);
    }

    #[test]
    fn test_void_check_is_lethal_regardless_of_health() {
        let tuning = Tuning::default();
        let mut c = grounded(CombatantId::One);
        c.stats.max_hp = 10_000.0;
        c.stats.hp = 10_000.0;
        assert!(void_check(&c, &tuning).is_none());

        c.pos.y = -5.1;
        let dmg = void_check(&c, &tuning).unwrap();
        assert_eq!(dmg.source, DamageSource::Void);
        assert_eq!(dmg.amount, 9999.0);
    }

    #[test]
    fn test_enforce_health_bounds() {
        let mut stats = Tuning::default().starting_stats.to_stats();
        stats.hp = 150.0;
        stats.enforce_health_bounds();
        assert_eq!(stats.hp, 100.0);
        stats.hp = -20.0;
        stats.enforce_health_bounds();
        assert_eq!(stats.hp, 0.0);
    }
}
