//! Validated shapes: closed outlines, thin-wall polylines and sampling boxes

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::primitives::{distance_point_to_segment, point_in_polygon, signed_area_x2};
use crate::error::RegionError;

fn check_finite(points: &[Vec2]) -> Result<(), RegionError> {
    match points.iter().position(|p| !p.is_finite()) {
        Some(i) => Err(RegionError::NonFinite(i)),
        None => Ok(()),
    }
}

/// A closed outline (the last vertex connects back to the first)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec2>", into = "Vec<Vec2>")]
pub struct Polygon {
    vertices: Vec<Vec2>,
}

impl Polygon {
    /// Build an outline, rejecting degenerate input
    pub fn new(vertices: Vec<Vec2>) -> Result<Self, RegionError> {
        if vertices.len() < 3 {
            return Err(RegionError::TooFewVertices(vertices.len()));
        }
        check_finite(&vertices)?;
        if signed_area_x2(&vertices).abs() <= f32::EPSILON {
            return Err(RegionError::ZeroArea);
        }
        Ok(Self { vertices })
    }

    /// Build from `[x, y]` pairs (map data tables)
    pub fn from_points(points: &[[f32; 2]]) -> Result<Self, RegionError> {
        Self::new(points.iter().map(|&p| Vec2::from(p)).collect())
    }

    /// Axis-aligned rectangle spanning `min`..`max`
    pub fn rect(min: Vec2, max: Vec2) -> Result<Self, RegionError> {
        Self::new(vec![
            min,
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
        ])
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point_in_polygon(point, &self.vertices)
    }

    /// Unsigned enclosed area
    pub fn area(&self) -> f32 {
        signed_area_x2(&self.vertices).abs() / 2.0
    }

    /// Tight bounding box
    pub fn bounds(&self) -> Bounds {
        Bounds::enclosing(&self.vertices)
    }

    /// Copy of the outline with every vertex multiplied by `factor`
    pub fn scaled(&self, factor: f32) -> Result<Self, RegionError> {
        Self::new(self.vertices.iter().map(|&v| v * factor).collect())
    }
}

impl TryFrom<Vec<Vec2>> for Polygon {
    type Error = RegionError;

    fn try_from(vertices: Vec<Vec2>) -> Result<Self, Self::Error> {
        Self::new(vertices)
    }
}

impl From<Polygon> for Vec<Vec2> {
    fn from(polygon: Polygon) -> Self {
        polygon.vertices
    }
}

/// An open chain of segments used as a thin wall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec2>", into = "Vec<Vec2>")]
pub struct Polyline {
    points: Vec<Vec2>,
}

impl Polyline {
    pub fn new(points: Vec<Vec2>) -> Result<Self, RegionError> {
        if points.len() < 2 {
            return Err(RegionError::TooFewPoints(points.len()));
        }
        check_finite(&points)?;
        Ok(Self { points })
    }

    pub fn from_points(points: &[[f32; 2]]) -> Result<Self, RegionError> {
        Self::new(points.iter().map(|&p| Vec2::from(p)).collect())
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Consecutive point pairs
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    /// Distance from `point` to the closest segment
    pub fn distance_to(&self, point: Vec2) -> f32 {
        self.segments()
            .map(|(a, b)| distance_point_to_segment(point, a, b))
            .fold(f32::INFINITY, f32::min)
    }
}

impl TryFrom<Vec<Vec2>> for Polyline {
    type Error = RegionError;

    fn try_from(points: Vec<Vec2>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<Polyline> for Vec<Vec2> {
    fn from(line: Polyline) -> Self {
        line.points
    }
}

/// Axis-aligned box that random placement draws from
///
/// Supplied by the caller: the collision core has no notion of the whole stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    /// Box spanning two corners in any order
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Smallest box holding every point (a zero box at the origin when empty)
    pub fn enclosing(points: &[Vec2]) -> Self {
        let Some(&first) = points.first() else {
            return Self::new(Vec2::ZERO, Vec2::ZERO);
        };
        points.iter().fold(Self::new(first, first), |b, &p| Self {
            min: b.min.min(p),
            max: b.max.max(p),
        })
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Uniform random point inside the box
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let size = self.size();
        self.min + Vec2::new(rng.random::<f32>() * size.x, rng.random::<f32>() * size.y)
    }
}
