//! Vector boundary provider
//!
//! The walkable area is one boundary outline minus its obstacles, or an
//! even-odd region built with [`VectorCollisionProvider::from_region`]. Obstacles
//! are either filled outlines or thin walls (polylines that block everything
//! within a distance threshold). Geometry is fixed at construction.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::CollisionProvider;
use crate::consts::WALL_THRESHOLD;
use crate::error::RegionError;
use crate::geom::{Bounds, Polygon, Polyline, RegionDescription};

/// Something carved out of the walkable boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Obstacle {
    /// Filled outline, blocked inside
    Area(Polygon),
    /// Thin wall, blocked within the provider's wall threshold
    Wall(Polyline),
}

impl Obstacle {
    fn blocks(&self, point: Vec2, wall_threshold: f32) -> bool {
        match self {
            Obstacle::Area(polygon) => polygon.contains(point),
            Obstacle::Wall(line) => line.distance_to(point) < wall_threshold,
        }
    }
}

/// Area the obstacles are carved out of
#[derive(Debug, Clone)]
enum Walkable {
    Outline(Polygon),
    /// Even-odd composite; nested outlines alternate between open and blocked
    Region(RegionDescription),
}

impl Walkable {
    fn contains(&self, point: Vec2) -> bool {
        match self {
            Walkable::Outline(polygon) => polygon.contains(point),
            Walkable::Region(region) => region.contains(point),
        }
    }
}

/// Boundary + obstacle list, answered with point-in-polygon and segment distance
#[derive(Debug, Clone)]
pub struct VectorCollisionProvider {
    walkable: Walkable,
    obstacles: Vec<Obstacle>,
    wall_threshold: f32,
}

impl VectorCollisionProvider {
    /// Walkable iff inside `boundary` and clear of every obstacle
    pub fn new(boundary: Polygon, obstacles: Vec<Obstacle>) -> Self {
        Self {
            walkable: Walkable::Outline(boundary),
            obstacles,
            wall_threshold: WALL_THRESHOLD,
        }
    }

    /// Walkable iff inside `region` under the even-odd rule
    ///
    /// Agrees with [`RegionDescription::contains`] and with a pixel map
    /// rasterized from the same region, islands inside holes included.
    /// Further obstacles can be added with [`Self::with_obstacles`].
    pub fn from_region(region: &RegionDescription) -> Self {
        Self {
            walkable: Walkable::Region(region.clone()),
            obstacles: Vec::new(),
            wall_threshold: WALL_THRESHOLD,
        }
    }

    /// Append obstacles on top of the current walkable area
    pub fn with_obstacles(mut self, obstacles: impl IntoIterator<Item = Obstacle>) -> Self {
        self.obstacles.extend(obstacles);
        self
    }

    /// Override how close a point may get to a thin wall
    pub fn with_wall_threshold(mut self, threshold: f32) -> Result<Self, RegionError> {
        if !threshold.is_finite() {
            return Err(RegionError::BadWallThreshold(threshold));
        }
        self.wall_threshold = threshold.max(0.0);
        Ok(self)
    }

    /// Outer outline (the first outline of a region)
    pub fn boundary(&self) -> &Polygon {
        match &self.walkable {
            Walkable::Outline(polygon) => polygon,
            Walkable::Region(region) => region.boundary(),
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn wall_threshold(&self) -> f32 {
        self.wall_threshold
    }

    /// Bounding box of the walkable area, a natural default for placement
    pub fn bounds(&self) -> Bounds {
        match &self.walkable {
            Walkable::Outline(polygon) => polygon.bounds(),
            Walkable::Region(region) => region.bounds(),
        }
    }

    /// True when `point` touches any obstacle (ignores the boundary)
    pub fn hits_obstacle(&self, point: Vec2) -> bool {
        self.obstacles
            .iter()
            .any(|o| o.blocks(point, self.wall_threshold))
    }
}

impl CollisionProvider for VectorCollisionProvider {
    fn point_walkable(&self, pos: Vec2) -> bool {
        self.walkable.contains(pos) && !self.hits_obstacle(pos)
    }
}
