//! Projectile ownership and bookkeeping
//!
//! The manager is the only owner of live projectiles. It spawns them, moves
//! them along their velocity, and retires them. Gravity, damping and surface
//! response are applied to the same velocities by the physics collaborator.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::combatant::CombatantId;

/// Stable projectile identifier, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectileId(pub u32);

/// A live projectile
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileState {
    pub id: ProjectileId,
    pub owner: CombatantId,
    pub pos: Vec3,
    pub vel: Vec3,
    pub damage: f32,
    bounces_left: u32,
}

impl ProjectileState {
    /// Bounces this projectile may still take before a hard contact retires it
    pub fn bounces_left(&self) -> u32 {
        self.bounces_left
    }

    /// Spend one bounce. Returns false (and changes nothing) if none remain.
    pub fn consume_bounce(&mut self) -> bool {
        if self.bounces_left == 0 {
            return false;
        }
        self.bounces_left -= 1;
        true
    }
}

/// Owns the set of live projectiles, kept sorted by id
#[derive(Debug, Clone)]
pub struct ProjectileManager {
    live: Vec<ProjectileState>,
    next_id: u32,
}

impl Default for ProjectileManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectileManager {
    pub fn new() -> Self {
        Self {
            live: Vec::new(),
            next_id: 1,
        }
    }

    /// Spawn a projectile and return its id
    pub fn spawn(
        &mut self,
        owner: CombatantId,
        pos: Vec3,
        vel: Vec3,
        damage: f32,
        max_bounces: u32,
    ) -> ProjectileId {
        let id = ProjectileId(self.next_id);
        self.next_id += 1;
        // Ids increase monotonically, so pushing keeps the vec sorted
        self.live.push(ProjectileState {
            id,
            owner,
            pos,
            vel,
            damage,
            bounces_left: max_bounces,
        });
        id
    }

    /// Remove a projectile, returning it if it was live
    pub fn remove(&mut self, id: ProjectileId) -> Option<ProjectileState> {
        let idx = self.live.binary_search_by_key(&id, |p| p.id).ok()?;
        Some(self.live.remove(idx))
    }

    pub fn get(&self, id: ProjectileId) -> Option<&ProjectileState> {
        let idx = self.live.binary_search_by_key(&id, |p| p.id).ok()?;
        self.live.get(idx)
    }

    pub fn get_mut(&mut self, id: ProjectileId) -> Option<&mut ProjectileState> {
        let idx = self.live.binary_search_by_key(&id, |p| p.id).ok()?;
        self.live.get_mut(idx)
    }

    /// Live projectiles in id order
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileState> {
        self.live.iter()
    }

    /// Mutable access for the physics collaborator (positions and velocities)
    pub fn as_mut_slice(&mut self) -> &mut [ProjectileState] {
        &mut self.live
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Move every projectile along its velocity
    pub fn advance(&mut self, dt: f32) {
        for p in &mut self.live {
            p.pos += p.vel * dt;
        }
    }

    /// Retire projectiles that left the arena or fell into the void.
    ///
    /// Pure cleanup: no damage and no bounce accounting.
    pub fn retire_out_of_bounds(&mut self, arena: &Arena, void_y: f32) -> Vec<ProjectileId> {
        let mut retired = Vec::new();
        self.live.retain(|p| {
            let keep = arena.projectile_in_bounds(p.pos, void_y);
            if !keep {
                retired.push(p.id);
            }
            keep
        });
        retired
    }

    /// Retire everything, returning the ids in order
    pub fn clear(&mut self) -> Vec<ProjectileId> {
        self.live.drain(..).map(|p| p.id).collect()
    }
}
