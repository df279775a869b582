//! Maze Collision - walkability and movement validation for maze stages
//!
//! Core modules:
//! - `geom`: Geometry primitives (polygons, segments, circle sampling, regions)
//! - `collision`: Collision providers (vector boundary, pixel mask, cell grid)
//! - `placement`: Random valid-position sampling with fallback chain
//! - `movement`: Atomic move validation and push-back recovery
//! - `stage`: Hosting maze stage (actor, goal, collectibles) driven by input steps
//! - `settings`: Data-driven stage tuning

pub mod collision;
pub mod error;
pub mod geom;
pub mod movement;
pub mod placement;
pub mod settings;
pub mod stage;

pub use collision::{
    Clearance, CollisionProvider, GridCollisionProvider, PixelBuffer, PixelCollisionProvider,
    PixelConfig, RasterJob, RasterSource, Rgb, VectorCollisionProvider, create_pixel_provider,
};
pub use error::RegionError;
pub use geom::{Bounds, Polygon, Polyline, RegionDescription};
pub use movement::{Direction, MoveOutcome, push_to_valid, try_move};
pub use placement::{PlacementSource, sample_valid_position};
pub use settings::{Difficulty, MazeSettings};

use glam::Vec2;

/// Stage configuration constants
pub mod consts {
    /// Working space of the map stages (pixels)
    pub const MAP_WIDTH: f32 = 800.0;
    pub const MAP_HEIGHT: f32 = 800.0;

    /// Actor collision radius
    pub const ACTOR_RADIUS: f32 = 8.0;
    /// Distance covered by one keyboard/touch move
    pub const MOVE_STEP: f32 = 15.0;

    /// Pick-up distance for collectibles
    pub const COLLECT_RADIUS: f32 = 30.0;
    /// Arrival distance for the stage goal
    pub const GOAL_RADIUS: f32 = 40.0;
    /// Collectibles spawned per batch
    pub const COLLECTIBLE_COUNT: usize = 10;

    /// Thin walls block anything closer than this
    pub const WALL_THRESHOLD: f32 = 8.0;
    /// Points tested around the circumference by area checks (45° apart)
    pub const AREA_SAMPLE_COUNT: usize = 8;

    /// Random draws before the placement fallback chain kicks in
    pub const SAMPLE_ATTEMPTS: u32 = 200;

    /// Push-back recovery step length and budget
    pub const PUSH_STEP: f32 = 5.0;
    pub const PUSH_MAX_STEPS: u32 = 20;

    /// Default per-channel colour tolerance for pixel maps
    pub const COLOR_TOLERANCE: u8 = 10;
}

/// Round a continuous position to the pixel it falls on (nearest integer)
#[inline]
pub fn pixel_of(pos: Vec2) -> (i64, i64) {
    (pos.x.round() as i64, pos.y.round() as i64)
}

/// Midpoint of the working space
#[inline]
pub fn map_center() -> Vec2 {
    Vec2::new(consts::MAP_WIDTH / 2.0, consts::MAP_HEIGHT / 2.0)
}
