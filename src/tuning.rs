//! Data-driven game balance
//!
//! Every field has a default matching the shipped game, so a tuning file only
//! needs to list the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TuningError;
use crate::sim::combatant::CombatantStats;

/// Starting stats handed to both combatants at match start
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartingStats {
    pub max_hp: f32,
    pub speed: f32,
    pub size: f32,
    pub damage: f32,
    pub max_bounces: u32,
}

impl Default for StartingStats {
    fn default() -> Self {
        Self {
            max_hp: 100.0,
            speed: 12.0,
            size: 1.0,
            damage: 10.0,
            max_bounces: 3,
        }
    }
}

impl StartingStats {
    /// Fresh combatant stats at full health with no wins
    pub fn to_stats(&self) -> CombatantStats {
        CombatantStats {
            hp: self.max_hp,
            max_hp: self.max_hp,
            speed: self.speed,
            size: self.size,
            damage: self.damage,
            max_bounces: self.max_bounces,
            wins: 0,
        }
    }
}

/// Balance values for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub starting_stats: StartingStats,

    // === Movement ===
    /// Upward velocity applied on jump
    pub jump_impulse: f32,
    /// Jump only allowed while |vertical velocity| is below this
    pub jump_velocity_tolerance: f32,
    /// Extra slack above `size / 2` when testing for ground contact
    pub ground_epsilon: f32,

    // === Firing ===
    /// Minimum seconds between shots
    pub fire_cooldown: f32,
    pub muzzle_speed: f32,
    /// Added to `size * 0.7` when placing a new projectile ahead of its owner
    pub muzzle_offset: f32,

    // === Projectiles ===
    /// Impact speed above which a surface contact consumes a bounce
    pub bounce_threshold: f32,
    pub projectile_radius: f32,
    pub projectile_damping: f32,

    // === World ===
    pub gravity: f32,
    /// Anything below this height is in the void
    pub void_y: f32,
    /// Damage dealt by falling into the void, never less than the victim's
    /// remaining health
    pub void_damage: f32,

    // === Rounds ===
    /// Number of upgrades offered to the loser
    pub upgrade_offer_size: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            starting_stats: StartingStats::default(),

            jump_impulse: 18.0,
            jump_velocity_tolerance: 5.0,
            ground_epsilon: 0.1,

            fire_cooldown: 0.3,
            muzzle_speed: 40.0,
            muzzle_offset: 0.8,

            bounce_threshold: 2.0,
            projectile_radius: 0.25,
            projectile_damping: 0.1,

            gravity: -30.0,
            void_y: -5.0,
            void_damage: 9999.0,

            upgrade_offer_size: 3,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let contents = std::fs::read_to_string(path)?;
        let tuning = Self::from_json_str(&contents)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation can't run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let s = &self.starting_stats;
        let positive = [
            ("starting_stats.max_hp", s.max_hp),
            ("starting_stats.speed", s.speed),
            ("starting_stats.size", s.size),
            ("muzzle_speed", self.muzzle_speed),
            ("projectile_radius", self.projectile_radius),
            ("void_damage", self.void_damage),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(TuningError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }
        let non_negative = [
            ("starting_stats.damage", s.damage),
            ("fire_cooldown", self.fire_cooldown),
            ("bounce_threshold", self.bounce_threshold),
            ("jump_velocity_tolerance", self.jump_velocity_tolerance),
            ("ground_epsilon", self.ground_epsilon),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(TuningError::Invalid(format!("{name} must not be negative, got {value}")));
            }
        }
        if !(0.0..=1.0).contains(&self.projectile_damping) {
            return Err(TuningError::Invalid(format!(
                "projectile_damping must be within [0, 1], got {}",
                self.projectile_damping
            )));
        }
        let finite = [
            ("jump_impulse", self.jump_impulse),
            ("muzzle_offset", self.muzzle_offset),
            ("gravity", self.gravity),
            ("void_y", self.void_y),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(TuningError::Invalid(format!("{name} must be finite, got {value}")));
            }
        }
        if self.upgrade_offer_size == 0 {
            return Err(TuningError::Invalid("upgrade_offer_size must be at least 1".into()));
        }
        Ok(())
    }
}
