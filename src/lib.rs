//! Neon Rivals - a two-player arena shoot-out
//!
//! Core modules:
//! - `sim`: Deterministic simulation (combatants, projectiles, contacts, rounds)
//! - `tuning`: Data-driven game balance
//! - `error`: Error taxonomy for lifecycle and configuration failures

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::{SimError, TuningError};
pub use tuning::Tuning;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for stable contacts)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Floor plane height (top surface)
    pub const FLOOR_Y: f32 = -0.5;
    /// Half the floor's edge length; the floor spans [-30, 30] on X and Z
    pub const FLOOR_HALF_EXTENT: f32 = 30.0;

    /// Boundary walls: centered 25 units out, 50 long, 5 tall, 1 thick
    pub const WALL_DISTANCE: f32 = 25.0;
    pub const WALL_LENGTH: f32 = 50.0;
    pub const WALL_HEIGHT: f32 = 5.0;
    pub const WALL_THICKNESS: f32 = 1.0;
    pub const WALL_CENTER_Y: f32 = 2.0;

    /// Projectiles beyond this |x| or |z| are cleaned up
    pub const PROJECTILE_BOUND: f32 = 60.0;

    /// Surface restitution (combined multiplicatively with the projectile's)
    pub const WALL_RESTITUTION: f32 = 1.0;
    pub const FLOOR_RESTITUTION: f32 = 0.5;
    pub const PROJECTILE_RESTITUTION: f32 = 0.9;

    /// Spawn points
    pub const PLAYER_1_SPAWN: [f32; 3] = [-8.0, 2.0, 0.0];
    pub const PLAYER_2_SPAWN: [f32; 3] = [8.0, 2.0, 0.0];
}

/// Horizontal (XZ-plane) part of a vector
#[inline]
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Yaw angle (radians) for a facing vector, measured from +Z toward +X
#[inline]
pub fn facing_yaw(facing: Vec3) -> f32 {
    facing.x.atan2(facing.z)
}
