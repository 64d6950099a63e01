//! Match state and the round state machine
//!
//! `MatchState` is the one mutable simulation struct. The tick mutates it, the
//! lifecycle calls below move it between phases, and presentation reads it
//! through [`MatchState::snapshot`] and [`MatchState::drain_events`].

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::facing_yaw;
use crate::tuning::Tuning;

use super::arena::Arena;
use super::combatant::{CombatantId, CombatantState, Damage, DamageSource, FireRequest};
use super::projectile::{ProjectileId, ProjectileManager};
use super::upgrades::{self, UpgradeId};

/// Round lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Pre-match (menu); stats at defaults
    Idle,
    /// Both combatants simulating
    Active,
    /// One combatant eliminated; waiting for the loser's upgrade pick
    Resolved,
}

/// Round bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub phase: RoundPhase,
    /// 1-based round number
    pub round: u32,
    pub last_loser: Option<CombatantId>,
}

impl Default for RoundState {
    fn default() -> Self {
        Self {
            phase: RoundPhase::Idle,
            round: 1,
            last_loser: None,
        }
    }
}

/// Why a projectile left the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetireReason {
    Hit,
    /// Hard contact with no bounces left
    Exhausted,
    OutOfBounds,
    RoundReset,
}

/// Discrete events for presentation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted { round: u32 },
    ProjectileFired { id: ProjectileId, owner: CombatantId },
    PlayerHit { target: CombatantId, damage: f32 },
    FellIntoVoid { target: CombatantId },
    ProjectileRetired { id: ProjectileId, reason: RetireReason },
    RoundResolved { loser: CombatantId },
    UpgradeApplied { target: CombatantId, upgrade: UpgradeId },
}

/// Read-only view of a combatant
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CombatantSnapshot {
    pub id: CombatantId,
    pub pos: Vec3,
    pub vel: Vec3,
    pub facing: Vec3,
    /// Facing as a yaw angle for renderers
    pub yaw: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub size: f32,
    pub wins: u32,
    pub eliminated: bool,
}

impl From<&CombatantState> for CombatantSnapshot {
    fn from(c: &CombatantState) -> Self {
        Self {
            id: c.id,
            pos: c.pos,
            vel: c.vel,
            facing: c.facing,
            yaw: facing_yaw(c.facing),
            hp: c.stats.hp,
            max_hp: c.stats.max_hp,
            size: c.stats.size,
            wins: c.stats.wins,
            eliminated: c.is_eliminated(),
        }
    }
}

/// Read-only view of a projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectileSnapshot {
    pub id: ProjectileId,
    pub owner: CombatantId,
    pub pos: Vec3,
    pub vel: Vec3,
    pub bounces_left: u32,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub time: f64,
    pub round: RoundState,
    pub combatants: [CombatantSnapshot; 2],
    pub projectiles: Vec<ProjectileSnapshot>,
    pub upgrade_offer: Vec<UpgradeId>,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct MatchState {
    /// Seed the offer RNG was created from
    pub seed: u64,
    pub tuning: Tuning,
    pub arena: Arena,
    pub round: RoundState,
    /// Indexed by `CombatantId::index`
    pub combatants: [CombatantState; 2],
    pub projectiles: ProjectileManager,
    /// Simulation tick counter (Active ticks only)
    pub time_ticks: u64,
    /// Simulation clock in seconds
    pub time: f64,
    offer: Vec<UpgradeId>,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl MatchState {
    /// New idle session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self::with_rng(seed, tuning, Pcg32::seed_from_u64(seed))
    }

    /// New idle session drawing upgrade offers from `rng`
    pub fn with_rng(seed: u64, tuning: Tuning, rng: Pcg32) -> Self {
        let stats = tuning.starting_stats.to_stats();
        Self {
            seed,
            arena: Arena::default(),
            round: RoundState::default(),
            combatants: CombatantId::ALL.map(|id| CombatantState::new(id, stats)),
            projectiles: ProjectileManager::new(),
            time_ticks: 0,
            time: 0.0,
            offer: Vec::new(),
            rng,
            events: Vec::new(),
            tuning,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.round.phase
    }

    pub fn combatant(&self, id: CombatantId) -> &CombatantState {
        &self.combatants[id.index()]
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> &mut CombatantState {
        &mut self.combatants[id.index()]
    }

    /// Upgrades currently on offer to the last loser (empty unless Resolved)
    pub fn upgrade_offer(&self) -> &[UpgradeId] {
        &self.offer
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events emitted since the last drain, in order
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Idle -> Active: begin round 1
    pub fn start_match(&mut self) -> Result<(), SimError> {
        self.require(RoundPhase::Idle, "start a match")?;
        for c in &mut self.combatants {
            c.respawn();
        }
        self.reset_round();
        self.round.phase = RoundPhase::Active;
        log::info!("Match started (seed {})", self.seed);
        self.emit(GameEvent::RoundStarted {
            round: self.round.round,
        });
        Ok(())
    }

    /// Restore both combatants to full health, respawning anyone eliminated,
    /// and clear live projectiles. Does not touch the round counter.
    pub fn reset_round(&mut self) {
        for c in &mut self.combatants {
            if c.is_eliminated() {
                c.respawn();
            }
            c.stats.hp = c.stats.max_hp;
        }
        for id in self.projectiles.clear() {
            self.emit(GameEvent::ProjectileRetired {
                id,
                reason: RetireReason::RoundReset,
            });
        }
    }

    /// Spawn a projectile for a fire request. No-op unless the round is
    /// Active and the owner is alive.
    pub fn fire(&mut self, shot: FireRequest) -> Option<ProjectileId> {
        if self.round.phase != RoundPhase::Active || self.combatant(shot.owner).is_eliminated() {
            return None;
        }
        let id = self
            .projectiles
            .spawn(shot.owner, shot.pos, shot.vel, shot.damage, shot.max_bounces);
        self.emit(GameEvent::ProjectileFired { id, owner: shot.owner });
        Some(id)
    }

    /// Apply one damage record. Returns the loser if this ended the round.
    ///
    /// Ignored outside Active and for already-eliminated targets. Void damage
    /// is raised to the target's remaining health, so it always eliminates.
    pub fn apply_damage(&mut self, damage: Damage) -> Option<CombatantId> {
        if self.round.phase != RoundPhase::Active {
            log::debug!("Ignoring {:?} outside active round", damage);
            return None;
        }
        let target = self.combatant_mut(damage.target);
        if target.is_eliminated() {
            return None;
        }

        match damage.source {
            DamageSource::Void => {
                let lethal = damage.amount.max(target.stats.hp);
                target.stats.hp = (target.stats.hp - lethal).max(0.0);
            }
            DamageSource::Projectile(_) => {
                target.stats.hp = (target.stats.hp - damage.amount.max(0.0)).max(0.0);
            }
        }
        target.stats.enforce_health_bounds();
        let eliminated = target.is_eliminated();

        let event = match damage.source {
            DamageSource::Void => GameEvent::FellIntoVoid {
                target: damage.target,
            },
            DamageSource::Projectile(_) => GameEvent::PlayerHit {
                target: damage.target,
                damage: damage.amount,
            },
        };
        self.emit(event);

        if eliminated {
            self.resolve_round(damage.target);
            return Some(damage.target);
        }
        None
    }

    /// Apply a tick's damage in fixed order: combatant 1's records first.
    ///
    /// If both would be eliminated, combatant 1 is processed first and loses;
    /// everything after the resolving record is dropped.
    pub fn apply_damages(&mut self, mut damage: Vec<Damage>) -> Option<CombatantId> {
        damage.sort_by_key(|d| d.target);
        let mut loser = None;
        for d in damage {
            if let Some(id) = self.apply_damage(d) {
                loser = Some(id);
            }
        }
        loser
    }

    fn resolve_round(&mut self, loser: CombatantId) {
        let winner = loser.other();
        self.combatant_mut(winner).stats.wins += 1;
        self.round.phase = RoundPhase::Resolved;
        self.round.last_loser = Some(loser);
        self.offer = upgrades::draw_offer(&mut self.rng, self.tuning.upgrade_offer_size);
        log::info!(
            "Round {} resolved: player {} wins ({} - {})",
            self.round.round,
            winner.number(),
            self.combatants[0].stats.wins,
            self.combatants[1].stats.wins,
        );
        self.emit(GameEvent::RoundResolved { loser });
    }

    /// Resolved -> Active: apply the loser's chosen upgrade and start the next round
    pub fn apply_upgrade(&mut self, upgrade: UpgradeId) -> Result<(), SimError> {
        self.require(RoundPhase::Resolved, "apply an upgrade")?;
        let Some(loser) = self.round.last_loser else {
            return Err(SimError::InvalidTransition {
                phase: self.round.phase,
                action: "apply an upgrade",
            });
        };
        if !self.offer.contains(&upgrade) {
            log::warn!("Rejected upgrade {:?}; offer was {:?}", upgrade, self.offer);
            return Err(SimError::UpgradeNotOffered(upgrade));
        }

        let entry = upgrades::entry(upgrade);
        let target = self.combatant_mut(loser);
        target.stats = entry.apply(target.stats);
        // Healing upgrades lift the loser off 0 hp before the reset sees it
        target.respawn();
        log::info!("Player {} takes {} ({})", loser.number(), entry.name, entry.rarity.as_str());
        self.emit(GameEvent::UpgradeApplied {
            target: loser,
            upgrade,
        });

        self.offer.clear();
        self.round.round += 1;
        self.reset_round();
        self.round.phase = RoundPhase::Active;
        self.emit(GameEvent::RoundStarted {
            round: self.round.round,
        });
        Ok(())
    }

    /// Back to the menu: every session value returns to its default
    pub fn return_to_menu(&mut self) {
        for id in self.projectiles.clear() {
            self.emit(GameEvent::ProjectileRetired {
                id,
                reason: RetireReason::RoundReset,
            });
        }
        let stats = self.tuning.starting_stats.to_stats();
        self.combatants = CombatantId::ALL.map(|id| CombatantState::new(id, stats));
        self.projectiles = ProjectileManager::new();
        self.round = RoundState::default();
        self.offer.clear();
        self.time_ticks = 0;
        self.time = 0.0;
        log::info!("Returned to menu");
    }

    fn require(&self, phase: RoundPhase, action: &'static str) -> Result<(), SimError> {
        if self.round.phase != phase {
            log::warn!("Refused to {} while {:?}", action, self.round.phase);
            return Err(SimError::InvalidTransition {
                phase: self.round.phase,
                action,
            });
        }
        Ok(())
    }

    /// Pull-based read of the whole simulation
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.time_ticks,
            time: self.time,
            round: self.round,
            combatants: [
                CombatantSnapshot::from(&self.combatants[0]),
                CombatantSnapshot::from(&self.combatants[1]),
            ],
            projectiles: self
                .projectiles
                .iter()
                .map(|p| ProjectileSnapshot {
                    id: p.id,
                    owner: p.owner,
                    pos: p.pos,
                    vel: p.vel,
                    bounces_left: p.bounces_left(),
                })
                .collect(),
            upgrade_offer: self.offer.clone(),
        }
    }
}
