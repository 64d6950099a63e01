//! Static arena geometry
//!
//! A flat floor slab and four boundary walls. Pure data; the physics
//! collaborator and the cleanup pass read it, nothing mutates it.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Which boundary wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallSide {
    North,
    South,
    West,
    East,
}

/// A static surface a projectile can touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Surface {
    Floor,
    Wall(WallSide),
}

/// An axis-aligned box wall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub side: WallSide,
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Wall {
    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// Closest point on (or in) the box to `p`
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        p.clamp(self.min(), self.max())
    }
}

/// Arena layout
#[derive(Debug, Clone)]
pub struct Arena {
    /// Height of the floor's top surface
    pub floor_y: f32,
    /// Floor spans [-floor_half_extent, floor_half_extent] on X and Z
    pub floor_half_extent: f32,
    pub walls: [Wall; 4],
    /// Projectile cleanup bound on |x| and |z|
    pub projectile_bound: f32,
}

impl Default for Arena {
    fn default() -> Self {
        let half_len = WALL_LENGTH / 2.0;
        let half_h = WALL_HEIGHT / 2.0;
        let half_t = WALL_THICKNESS / 2.0;
        Self {
            floor_y: FLOOR_Y,
            floor_half_extent: FLOOR_HALF_EXTENT,
            walls: [
                Wall {
                    side: WallSide::North,
                    center: Vec3::new(0.0, WALL_CENTER_Y, -WALL_DISTANCE),
                    half_extents: Vec3::new(half_len, half_h, half_t),
                },
                Wall {
                    side: WallSide::South,
                    center: Vec3::new(0.0, WALL_CENTER_Y, WALL_DISTANCE),
                    half_extents: Vec3::new(half_len, half_h, half_t),
                },
                Wall {
                    side: WallSide::West,
                    center: Vec3::new(-WALL_DISTANCE, WALL_CENTER_Y, 0.0),
                    half_extents: Vec3::new(half_t, half_h, half_len),
                },
                Wall {
                    side: WallSide::East,
                    center: Vec3::new(WALL_DISTANCE, WALL_CENTER_Y, 0.0),
                    half_extents: Vec3::new(half_t, half_h, half_len),
                },
            ],
            projectile_bound: PROJECTILE_BOUND,
        }
    }
}

impl Arena {
    /// Whether (x, z) lies over the floor slab
    pub fn over_floor(&self, p: Vec3) -> bool {
        p.x.abs() <= self.floor_half_extent && p.z.abs() <= self.floor_half_extent
    }

    /// Whether a projectile at `p` is still inside the cleanup region
    pub fn projectile_in_bounds(&self, p: Vec3, void_y: f32) -> bool {
        p.x.abs() <= self.projectile_bound && p.z.abs() <= self.projectile_bound && p.y >= void_y
    }

    /// Restitution of a surface
    pub fn restitution(&self, surface: Surface) -> f32 {
        match surface {
            Surface::Floor => FLOOR_RESTITUTION,
            Surface::Wall(_) => WALL_RESTITUTION,
        }
    }

    pub fn wall(&self, side: WallSide) -> &Wall {
        // Walls are stored in declaration order of WallSide
        &self.walls[side as usize]
    }
}
