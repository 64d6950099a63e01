//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Input sampled once per tick
//! - Seeded RNG only
//! - Stable iteration order (combatant 1 before 2, projectiles by id)
//! - No rendering or platform dependencies

pub mod arena;
pub mod collision;
pub mod combatant;
pub mod contact;
pub mod physics;
pub mod projectile;
pub mod state;
pub mod tick;
pub mod upgrades;

pub use arena::{Arena, Surface, WallSide};
pub use collision::{ContactOutcome, resolve_contact};
pub use combatant::{CombatantId, CombatantState, CombatantStats, ControlInput, Damage, DamageSource, FireRequest};
pub use contact::{Bodies, Body, Contact, NullPhysics, PhysicsWorld};
pub use physics::ArenaPhysics;
pub use projectile::{ProjectileId, ProjectileManager, ProjectileState};
pub use state::{GameEvent, MatchState, RetireReason, RoundPhase, RoundState, Snapshot};
pub use tick::{FixedStepper, TickInput, tick};
pub use upgrades::{CATALOG, Rarity, UpgradeEntry, UpgradeId};
