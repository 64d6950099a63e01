//! Contact classification
//!
//! Every projectile contact resolves to exactly one outcome, checked in order:
//! self contact, direct hit, surface contact. The surface rule is the delicate
//! one: only contacts faster than the bounce threshold spend a bounce, so a
//! projectile rolling along the floor keeps its budget. The speed used is the
//! pre-contact sample carried by the [`Contact`].

use serde::{Deserialize, Serialize};

use super::combatant::{CombatantId, CombatantState, Damage, DamageSource};
use super::contact::{Body, Contact};
use super::projectile::{ProjectileId, ProjectileManager};

/// Result of resolving one contact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ContactOutcome {
    /// Projectile touched its own owner; ignored
    SelfContact,
    /// Direct hit on the other combatant; projectile retired
    Hit { target: CombatantId, damage: f32 },
    /// Hard surface contact with budget left; one bounce spent
    Bounced { remaining: u32 },
    /// Hard surface contact with no budget left; projectile retired, no damage
    Exhausted,
    /// Soft surface contact (rolling or settling); nothing changes
    Settled,
    /// Contact refers to a projectile already retired, or to an eliminated body
    Stale,
}

impl ContactOutcome {
    /// Whether the projectile was removed by this outcome
    pub fn retires(&self) -> bool {
        matches!(self, ContactOutcome::Hit { .. } | ContactOutcome::Exhausted)
    }

    /// Damage to record, if this was a hit
    pub fn damage(&self, projectile: ProjectileId) -> Option<Damage> {
        match *self {
            ContactOutcome::Hit { target, damage } => Some(Damage {
                target,
                amount: damage,
                source: DamageSource::Projectile(projectile),
            }),
            _ => None,
        }
    }
}

/// Classify one contact and apply its effect on the projectile set
pub fn resolve_contact(
    contact: &Contact,
    combatants: &[CombatantState],
    projectiles: &mut ProjectileManager,
    bounce_threshold: f32,
) -> ContactOutcome {
    let Some(projectile) = projectiles.get_mut(contact.projectile) else {
        return ContactOutcome::Stale;
    };

    match contact.body {
        Body::Combatant(id) if id == projectile.owner => ContactOutcome::SelfContact,
        Body::Combatant(id) => {
            let target_live = combatants
                .iter()
                .any(|c| c.id == id && !c.is_eliminated());
            if !target_live {
                return ContactOutcome::Stale;
            }
            let damage = projectile.damage;
            projectiles.remove(contact.projectile);
            ContactOutcome::Hit { target: id, damage }
        }
        Body::Surface(_) => {
            if contact.impact_speed() <= bounce_threshold {
                return ContactOutcome::Settled;
            }
            if projectile.consume_bounce() {
                ContactOutcome::Bounced {
                    remaining: projectile.bounces_left(),
                }
            } else {
                projectiles.remove(contact.projectile);
                ContactOutcome::Exhausted
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::arena::{Surface, WallSide};
    use crate::tuning::Tuning;
    use glam::Vec3;
    use proptest::prelude::*;

    fn combatants() -> Vec<CombatantState> {
        let stats = Tuning::default().starting_stats.to_stats();
        CombatantId::ALL
            .iter()
            .map(|&id| CombatantState::new(id, stats))
            .collect()
    }

    fn contact(projectile: ProjectileId, body: Body, speed: f32) -> Contact {
        Contact {
            projectile,
            body,
            point: Vec3::ZERO,
            relative_velocity: Vec3::new(speed, 0.0, 0.0),
        }
    }

    const WALL: Body = Body::Surface(Surface::Wall(WallSide::East));

    #[test]
    fn test_self_contact_is_ignored() {
        let fighters = combatants();
        let mut mgr = ProjectileManager::new();
        let id = mgr.spawn(CombatantId::One, Vec3::ZERO, Vec3::X, 10.0, 3);

        let out = resolve_contact(&contact(id, Body::Combatant(CombatantId::One), 40.0), &fighters, &mut mgr, 2.0);
        assert_eq!(out, ContactOutcome::SelfContact);
        assert_eq!(mgr.get(id).unwrap().bounces_left(), 3);
    }

    #[test]
    fn test_direct_hit_retires_and_carries_owner_damage() {
        let fighters = combatants();
        let mut mgr = ProjectileManager::new();
        let id = mgr.spawn(CombatantId::One, Vec3::ZERO, Vec3::X, 15.0, 3);

        // Even a slow graze is a full hit
        let out = resolve_contact(&contact(id, Body::Combatant(CombatantId::Two), 0.5), &fighters, &mut mgr, 2.0);
        assert_eq!(
            out,
            ContactOutcome::Hit {
                target: CombatantId::Two,
                damage: 15.0
            }
        );
        assert!(out.retires());
        assert!(mgr.get(id).is_none());

        let dmg = out.damage(id).unwrap();
        assert_eq!(dmg.target, CombatantId::Two);
        assert_eq!(dmg.source, DamageSource::Projectile(id));
    }

    #[test]
    fn test_hit_on_eliminated_target_is_stale() {
        let mut fighters = combatants();
        fighters[1].stats.hp = 0.0;
        let mut mgr = ProjectileManager::new();
        let id = mgr.spawn(CombatantId::One, Vec3::ZERO, Vec3::X, 10.0, 3);

        let out = resolve_contact(&contact(id, Body::Combatant(CombatantId::Two), 40.0), &fighters, &mut mgr, 2.0);
        assert_eq!(out, ContactOutcome::Stale);
        assert!(mgr.get(id).is_some());
    }

    #[test]
    fn test_hard_contact_spends_bounce() {
        let fighters = combatants();
        let mut mgr = ProjectileManager::new();
        let id = mgr.spawn(CombatantId::Two, Vec3::ZERO, Vec3::X, 10.0, 2);

        let out = resolve_contact(&contact(id, WALL, 30.0), &fighters, &mut mgr, 2.0);
        assert_eq!(out, ContactOutcome::Bounced { remaining: 1 });
        let out = resolve_contact(&contact(id, Body::Surface(Surface::Floor), 2.5), &fighters, &mut mgr, 2.0);
        assert_eq!(out, ContactOutcome::Bounced { remaining: 0 });
        assert!(mgr.get(id).is_some());
    }

    #[test]
    fn test_hard_contact_with_no_bounces_retires_without_damage() {
        let fighters = combatants();
        let mut mgr = ProjectileManager::new();
        let id = mgr.spawn(CombatantId::One, Vec3::ZERO, Vec3::X, 10.0, 0);

        let out = resolve_contact(&contact(id, WALL, 2.01), &fighters, &mut mgr, 2.0);
        assert_eq!(out, ContactOutcome::Exhausted);
        assert!(out.damage(id).is_none());
        assert!(mgr.get(id).is_none());
    }

    #[test]
    fn test_soft_contact_at_threshold_settles() {
        let fighters = combatants();
        let mut mgr = ProjectileManager::new();
        let id = mgr.spawn(CombatantId::One, Vec3::ZERO, Vec3::X, 10.0, 0);

        let out = resolve_contact(&contact(id, Body::Surface(Surface::Floor), 2.0), &fighters, &mut mgr, 2.0);
        assert_eq!(out, ContactOutcome::Settled);
        assert_eq!(mgr.get(id).unwrap().bounces_left(), 0);
    }

    #[test]
    fn test_contact_for_retired_projectile_is_stale() {
        let fighters = combatants();
        let mut mgr = ProjectileManager::new();
        let id = mgr.spawn(CombatantId::One, Vec3::ZERO, Vec3::X, 10.0, 3);
        mgr.remove(id);

        let out = resolve_contact(&contact(id, WALL, 30.0), &fighters, &mut mgr, 2.0);
        assert_eq!(out, ContactOutcome::Stale);
    }

    proptest! {
        #[test]
        fn prop_bounce_counter_never_increases(
            start in 0u32..6,
            speeds in prop::collection::vec(0.0f32..50.0, 1..40),
        ) {
            let fighters = combatants();
            let mut mgr = ProjectileManager::new();
            let id = mgr.spawn(CombatantId::One, Vec3::ZERO, Vec3::X, 10.0, start);
            let mut last = start;

            for speed in speeds {
                let out = resolve_contact(&contact(id, WALL, speed), &fighters, &mut mgr, 2.0);
                match mgr.get(id) {
                    Some(p) => {
                        prop_assert!(p.bounces_left() <= last);
                        if speed <= 2.0 {
                            prop_assert_eq!(out, ContactOutcome::Settled);
                            prop_assert_eq!(p.bounces_left(), last);
                        }
                        last = p.bounces_left();
                    }
                    None => {
                        prop_assert!(out == ContactOutcome::Exhausted || out == ContactOutcome::Stale);
                        if out == ContactOutcome::Exhausted {
                            prop_assert_eq!(last, 0);
                            prop_assert!(speed > 2.0);
                        }
                    }
                }
            }
        }
    }
}
