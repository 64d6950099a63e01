//! Boundary to the rigid-body physics collaborator
//!
//! The physics engine owns gravity, damping and contact response. All it
//! reports back to the simulation is a list of projectile contacts, so any
//! engine can sit behind [`PhysicsWorld`] without touching the bounce policy.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::arena::{Arena, Surface};
use super::combatant::{CombatantId, CombatantState};
use super::projectile::{ProjectileId, ProjectileState};

/// The thing a projectile touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Body {
    Combatant(CombatantId),
    Surface(Surface),
}

impl Body {
    /// Ordering rank within one projectile's contacts: combatants first
    pub fn rank(&self) -> u8 {
        match self {
            Body::Combatant(id) => id.index() as u8,
            Body::Surface(_) => 2,
        }
    }
}

/// One projectile contact reported by the physics collaborator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub projectile: ProjectileId,
    pub body: Body,
    pub point: Vec3,
    /// Projectile velocity relative to the body, sampled before the contact
    /// response was applied
    pub relative_velocity: Vec3,
}

impl Contact {
    pub fn impact_speed(&self) -> f32 {
        self.relative_velocity.length()
    }
}

/// Mutable view of every simulated body for one physics pass
pub struct Bodies<'a> {
    pub combatants: &'a mut [CombatantState],
    pub projectiles: &'a mut [ProjectileState],
}

/// A physics engine driving the arena's bodies
pub trait PhysicsWorld {
    /// Apply body forces (gravity, damping) to velocities before integration
    fn apply_forces(&mut self, bodies: Bodies<'_>, dt: f32);

    /// After integration: separate overlapping bodies, apply contact response
    /// to velocities, and append every projectile contact to `contacts`
    fn resolve_contacts(&mut self, arena: &Arena, bodies: Bodies<'_>, contacts: &mut Vec<Contact>);
}

/// A physics world that does nothing. Useful when contacts are injected by hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPhysics;

impl PhysicsWorld for NullPhysics {
    fn apply_forces(&mut self, _bodies: Bodies<'_>, _dt: f32) {}

    fn resolve_contacts(&mut self, _arena: &Arena, _bodies: Bodies<'_>, _contacts: &mut Vec<Contact>) {}
}

/// Sort contacts into resolution order: by projectile, combatants before surfaces
pub fn sort_contacts(contacts: &mut [Contact]) {
    contacts.sort_by_key(|c| (c.projectile, c.body.rank()));
}
