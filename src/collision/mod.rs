//! Collision providers
//!
//! Every map representation answers the same two questions: may an actor's
//! centre sit at this point, and may an actor of this radius sit here. The
//! sampler and the movement validator only ever see this trait, so vector,
//! pixel and grid maps are interchangeable.

pub mod grid;
pub mod pixel;
pub mod vector;

pub use grid::GridCollisionProvider;
pub use pixel::{
    PixelBuffer, PixelCollisionProvider, PixelConfig, RasterJob, RasterOutcome, RasterSource,
    Rgb, create_pixel_provider,
};
pub use vector::{Obstacle, VectorCollisionProvider};

use glam::Vec2;

use crate::consts::AREA_SAMPLE_COUNT;
use crate::geom::primitives::circle_points;

/// Walkability queries shared by all map representations
///
/// Implementations must keep `area_walkable(p, r)` at least as strict as
/// `point_walkable(p)`.
pub trait CollisionProvider {
    /// May an actor's centre occupy `pos`
    fn point_walkable(&self, pos: Vec2) -> bool;

    /// May a disk of `radius` around `pos` be occupied
    ///
    /// Tests the centre plus [`AREA_SAMPLE_COUNT`] points on the circumference.
    /// This is an approximation: a wall thinner than the gap between two
    /// samples can slip between them.
    fn area_walkable(&self, pos: Vec2, radius: f32) -> bool {
        self.point_walkable(pos)
            && circle_points(pos, radius, AREA_SAMPLE_COUNT).all(|p| self.point_walkable(p))
    }

    /// Whether queries are answered from loaded map data yet
    fn is_ready(&self) -> bool {
        true
    }
}

impl<P: CollisionProvider + ?Sized> CollisionProvider for &P {
    fn point_walkable(&self, pos: Vec2) -> bool {
        (**self).point_walkable(pos)
    }

    fn area_walkable(&self, pos: Vec2, radius: f32) -> bool {
        (**self).area_walkable(pos, radius)
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}

impl<P: CollisionProvider + ?Sized> CollisionProvider for Box<P> {
    fn point_walkable(&self, pos: Vec2) -> bool {
        (**self).point_walkable(pos)
    }

    fn area_walkable(&self, pos: Vec2, radius: f32) -> bool {
        (**self).area_walkable(pos, radius)
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}

/// Treats a point as walkable only when a disk of `radius` around it is
///
/// Lets point-based searches such as
/// [`push_to_valid`](crate::movement::push_to_valid) look for room for a
/// whole actor.
#[derive(Debug, Clone, Copy)]
pub struct Clearance<P> {
    pub provider: P,
    pub radius: f32,
}

impl<P: CollisionProvider> CollisionProvider for Clearance<P> {
    fn point_walkable(&self, pos: Vec2) -> bool {
        self.provider.area_walkable(pos, self.radius)
    }

    fn is_ready(&self) -> bool {
        self.provider.is_ready()
    }
}
