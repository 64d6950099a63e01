//! Upgrade catalog
//!
//! Permanent stat transforms offered to the loser of a round. The catalog is
//! static; offers are drawn from it with a caller-supplied RNG.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::combatant::CombatantStats;

/// Upgrade rarity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Legendary,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Rare => "rare",
            Rarity::Legendary => "legendary",
        }
    }
}

/// Catalog entry identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeId {
    SpeedBoost,
    TankUp,
    GlassCannon,
    TinyTerror,
    Juggernaut,
    Vampire,
    Ricochet,
}

/// A stat-mutating upgrade
#[derive(Debug, Clone, Copy)]
pub struct UpgradeEntry {
    pub id: UpgradeId,
    pub name: &'static str,
    pub description: &'static str,
    pub rarity: Rarity,
    transform: fn(CombatantStats) -> CombatantStats,
}

impl UpgradeEntry {
    /// Apply this upgrade. Health is clamped back into [0, max_hp] afterwards.
    pub fn apply(&self, stats: CombatantStats) -> CombatantStats {
        let mut out = (self.transform)(stats);
        out.enforce_health_bounds();
        out
    }
}

/// Every upgrade in the game
pub static CATALOG: [UpgradeEntry; 7] = [
    UpgradeEntry {
        id: UpgradeId::SpeedBoost,
        name: "Nitro Injection",
        description: "+20% Movement Speed",
        rarity: Rarity::Common,
        transform: |s| CombatantStats {
            speed: s.speed * 1.2,
            ..s
        },
    },
    UpgradeEntry {
        id: UpgradeId::TankUp,
        name: "Titan Plating",
        description: "+30 Max HP, +10% Size",
        rarity: Rarity::Common,
        transform: |s| CombatantStats {
            max_hp: s.max_hp + 30.0,
            hp: s.hp + 30.0,
            size: s.size * 1.1,
            ..s
        },
    },
    UpgradeEntry {
        id: UpgradeId::GlassCannon,
        name: "Glass Cannon",
        description: "+50% Damage, -20% Max HP",
        rarity: Rarity::Rare,
        transform: |s| CombatantStats {
            damage: s.damage * 1.5,
            max_hp: s.max_hp * 0.8,
            hp: s.hp.min(s.max_hp * 0.8),
            ..s
        },
    },
    UpgradeEntry {
        id: UpgradeId::TinyTerror,
        name: "Nano Shrink",
        description: "-20% Size (Harder to hit)",
        rarity: Rarity::Rare,
        transform: |s| CombatantStats {
            size: s.size * 0.8,
            ..s
        },
    },
    UpgradeEntry {
        id: UpgradeId::Juggernaut,
        name: "Juggernaut",
        description: "+100% HP, +50% Size, -20% Speed",
        rarity: Rarity::Legendary,
        transform: |s| CombatantStats {
            max_hp: s.max_hp * 2.0,
            hp: s.hp + s.max_hp,
            size: s.size * 1.5,
            speed: s.speed * 0.8,
            ..s
        },
    },
    UpgradeEntry {
        id: UpgradeId::Vampire,
        name: "Life Leach",
        description: "Full Heal + 10 Max HP",
        rarity: Rarity::Common,
        transform: |s| CombatantStats {
            max_hp: s.max_hp + 10.0,
            hp: s.max_hp + 10.0,
            ..s
        },
    },
    UpgradeEntry {
        id: UpgradeId::Ricochet,
        name: "Ricochet Rounds",
        description: "+2 Bullet Bounces",
        rarity: Rarity::Rare,
        transform: |s| CombatantStats {
            max_bounces: s.max_bounces + 2,
            ..s
        },
    },
];

/// Look up a catalog entry
pub fn entry(id: UpgradeId) -> &'static UpgradeEntry {
    // Catalog order matches UpgradeId declaration order
    &CATALOG[id as usize]
}

/// Draw `count` distinct upgrades uniformly at random
pub fn draw_offer<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<UpgradeId> {
    let count = count.min(CATALOG.len());
    rand::seq::index::sample(rng, CATALOG.len(), count)
        .into_iter()
        .map(|i| CATALOG[i].id)
        .collect()
}
