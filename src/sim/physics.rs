//! Built-in physics collaborator
//!
//! A small rigid-body pass good enough for the arena: gravity, linear damping
//! on projectiles, box-vs-box pushes for combatants, sphere-vs-box contacts for
//! projectiles with restitution. Contacts are reported with the velocity the
//! projectile had before the response was applied.

use glam::Vec3;

use crate::consts::PROJECTILE_RESTITUTION;
use crate::tuning::Tuning;

use super::arena::{Arena, Surface, Wall};
use super::combatant::CombatantState;
use super::contact::{Bodies, Body, Contact, PhysicsWorld};
use super::projectile::ProjectileState;

/// Normal approach speed below which a touching projectile slides along a
/// surface instead of being reflected off it
pub const REST_SPEED: f32 = 0.5;

/// Default arena physics
#[derive(Debug, Clone)]
pub struct ArenaPhysics {
    pub gravity: f32,
    pub projectile_radius: f32,
    /// Fraction of velocity lost per second
    pub projectile_damping: f32,
}

impl Default for ArenaPhysics {
    fn default() -> Self {
        Self::from_tuning(&Tuning::default())
    }
}

impl ArenaPhysics {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            gravity: tuning.gravity,
            projectile_radius: tuning.projectile_radius,
            projectile_damping: tuning.projectile_damping,
        }
    }

    fn combatant_vs_floor(arena: &Arena, c: &mut CombatantState) {
        let half = c.half_size();
        let bottom = c.pos.y - half;
        // Only catch bodies that are sinking into the slab, not ones already below it
        if arena.over_floor(c.pos) && bottom < arena.floor_y && c.pos.y > arena.floor_y - half {
            c.pos.y = arena.floor_y + half;
            if c.vel.y < 0.0 {
                c.vel.y = 0.0;
            }
        }
    }

    fn combatant_vs_wall(wall: &Wall, c: &mut CombatantState) {
        let half = Vec3::splat(c.half_size());
        let delta = c.pos - wall.center;
        let overlap = half + wall.half_extents - delta.abs();
        if overlap.min_element() <= 0.0 {
            return;
        }

        // Push out along the shallowest axis
        let axis = if overlap.x <= overlap.y && overlap.x <= overlap.z {
            0
        } else if overlap.y <= overlap.z {
            1
        } else {
            2
        };
        let sign = if delta[axis] >= 0.0 { 1.0 } else { -1.0 };
        c.pos[axis] += sign * overlap[axis];
        if c.vel[axis] * sign < 0.0 {
            c.vel[axis] = 0.0;
        }
    }

    /// Separate two overlapping cubes along the shallowest axis, splitting the
    /// push by mass (heavier bodies move less)
    fn combatant_vs_combatant(a: &mut CombatantState, b: &mut CombatantState) {
        let delta = b.pos - a.pos;
        let overlap = Vec3::splat(a.half_size() + b.half_size()) - delta.abs();
        if overlap.min_element() <= 0.0 {
            return;
        }

        let axis = if overlap.x <= overlap.y && overlap.x <= overlap.z {
            0
        } else if overlap.y <= overlap.z {
            1
        } else {
            2
        };
        let sign = if delta[axis] >= 0.0 { 1.0 } else { -1.0 };
        let (ma, mb) = (a.mass(), b.mass());
        let share_a = mb / (ma + mb);
        a.pos[axis] -= sign * overlap[axis] * share_a;
        b.pos[axis] += sign * overlap[axis] * (1.0 - share_a);

        // Drop the closing component of the relative velocity
        let closing = (a.vel[axis] - b.vel[axis]) * sign;
        if closing > 0.0 {
            let shared = (ma * a.vel[axis] + mb * b.vel[axis]) / (ma + mb);
            a.vel[axis] = shared;
            b.vel[axis] = shared;
        }
    }

    fn projectile_vs_combatant(&self, p: &ProjectileState, c: &CombatantState) -> Option<Contact> {
        let half = Vec3::splat(c.half_size());
        let closest = p.pos.clamp(c.pos - half, c.pos + half);
        if p.pos.distance_squared(closest) >= self.projectile_radius * self.projectile_radius {
            return None;
        }
        Some(Contact {
            projectile: p.id,
            body: Body::Combatant(c.id),
            point: closest,
            relative_velocity: p.vel - c.vel,
        })
    }

    /// Sphere against a static surface with outward `normal` at `point`.
    /// Every touch is reported with the pre-response velocity; only a real
    /// approach is reflected, slower ones just lose their inward component.
    fn strike(
        &self,
        p: &mut ProjectileState,
        surface: Surface,
        point: Vec3,
        normal: Vec3,
        restitution: f32,
    ) -> Contact {
        let pre = p.vel;
        let vn = pre.dot(normal);
        p.pos = point + normal * self.projectile_radius;

        if vn < -REST_SPEED {
            let e = restitution * PROJECTILE_RESTITUTION;
            p.vel = pre - (1.0 + e) * vn * normal;
        } else if vn < 0.0 {
            p.vel -= vn * normal;
        }
        Contact {
            projectile: p.id,
            body: Body::Surface(surface),
            point,
            relative_velocity: pre,
        }
    }

    fn projectile_vs_floor(&self, arena: &Arena, p: &mut ProjectileState) -> Option<Contact> {
        let r = self.projectile_radius;
        if !arena.over_floor(p.pos) || p.pos.y - r >= arena.floor_y || p.pos.y < arena.floor_y - r {
            return None;
        }
        let point = Vec3::new(p.pos.x, arena.floor_y, p.pos.z);
        Some(self.strike(p, Surface::Floor, point, Vec3::Y, arena.restitution(Surface::Floor)))
    }

    fn projectile_vs_wall(&self, arena: &Arena, wall: &Wall, p: &mut ProjectileState) -> Option<Contact> {
        let closest = wall.closest_point(p.pos);
        let offset = p.pos - closest;
        if offset.length_squared() >= self.projectile_radius * self.projectile_radius {
            return None;
        }
        // Center inside the box: push out through the wall's thin axis
        let fallback = {
            let away = p.pos - wall.center;
            if wall.half_extents.x < wall.half_extents.z {
                Vec3::new(away.x.signum(), 0.0, 0.0)
            } else {
                Vec3::new(0.0, 0.0, away.z.signum())
            }
        };
        let normal = offset.normalize_or(fallback);
        let surface = Surface::Wall(wall.side);
        Some(self.strike(p, surface, closest, normal, arena.restitution(surface)))
    }
}

impl PhysicsWorld for ArenaPhysics {
    fn apply_forces(&mut self, bodies: Bodies<'_>, dt: f32) {
        for c in bodies.combatants.iter_mut().filter(|c| !c.is_eliminated()) {
            c.vel.y += self.gravity * dt;
        }
        let keep = (1.0 - self.projectile_damping).clamp(0.0, 1.0).powf(dt);
        for p in bodies.projectiles.iter_mut() {
            p.vel.y += self.gravity * dt;
            p.vel *= keep;
        }
    }

    fn resolve_contacts(&mut self, arena: &Arena, bodies: Bodies<'_>, contacts: &mut Vec<Contact>) {
        for c in bodies.combatants.iter_mut().filter(|c| !c.is_eliminated()) {
            Self::combatant_vs_floor(arena, c);
            for wall in &arena.walls {
                Self::combatant_vs_wall(wall, c);
            }
        }
        if let [a, b] = &mut *bodies.combatants
            && !a.is_eliminated()
            && !b.is_eliminated()
        {
            Self::combatant_vs_combatant(a, b);
        }

        for p in bodies.projectiles.iter_mut() {
            for c in bodies.combatants.iter().filter(|c| !c.is_eliminated()) {
                if let Some(contact) = self.projectile_vs_combatant(p, c) {
                    contacts.push(contact);
                }
            }
            if let Some(contact) = self.projectile_vs_floor(arena, p) {
                contacts.push(contact);
            }
            for wall in &arena.walls {
                if let Some(contact) = self.projectile_vs_wall(arena, wall, p) {
                    contacts.push(contact);
                }
            }
        }
    }
}
