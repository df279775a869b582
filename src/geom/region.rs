//! Composite regions under the even-odd fill rule
//!
//! A point is inside the region when it lies inside an odd number of
//! outlines. With the playable boundary as the first outline and obstacles
//! nested inside it, this reads as "inside the boundary and inside no
//! obstacle" without any extra bookkeeping.

use std::fmt::Write as _;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::shapes::{Bounds, Polygon};
use crate::collision::Rgb;
use crate::error::RegionError;

/// Ordered set of closed outlines (boundary first, holes after)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Polygon>", into = "Vec<Polygon>")]
pub struct RegionDescription {
    outlines: Vec<Polygon>,
}

impl RegionDescription {
    pub fn new(outlines: Vec<Polygon>) -> Result<Self, RegionError> {
        if outlines.is_empty() {
            return Err(RegionError::EmptyRegion);
        }
        Ok(Self { outlines })
    }

    /// Boundary with obstacle outlines carved out of it
    pub fn with_holes(boundary: Polygon, holes: impl IntoIterator<Item = Polygon>) -> Self {
        let mut outlines = vec![boundary];
        outlines.extend(holes);
        Self { outlines }
    }

    pub fn outlines(&self) -> &[Polygon] {
        &self.outlines
    }

    /// The first outline, conventionally the playable boundary
    pub fn boundary(&self) -> &Polygon {
        &self.outlines[0]
    }

    /// Every outline after the boundary
    pub fn holes(&self) -> &[Polygon] {
        &self.outlines[1..]
    }

    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point_in_region(point, self)
    }

    /// Box enclosing every outline
    pub fn bounds(&self) -> Bounds {
        let corners: Vec<Vec2> = self
            .outlines
            .iter()
            .flat_map(|o| {
                let b = o.bounds();
                [b.min, b.max]
            })
            .collect();
        Bounds::enclosing(&corners)
    }

    /// Render as a standalone SVG document with a single even-odd path
    ///
    /// Region coordinates are used as-is (the viewBox is `0 0 width height`).
    /// Everything outside the path stays transparent.
    pub fn to_svg(&self, width: u32, height: u32, fill: Rgb) -> String {
        let mut d = String::new();
        for outline in &self.outlines {
            for (i, v) in outline.vertices().iter().enumerate() {
                let cmd = if i == 0 { 'M' } else { 'L' };
                let _ = write!(d, "{cmd}{} {} ", v.x, v.y);
            }
            d.push_str("Z ");
        }

        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}"><path fill-rule="evenodd" fill="{}" d="{}"/></svg>"#,
            fill.to_hex(),
            d.trim_end()
        )
    }
}

impl TryFrom<Vec<Polygon>> for RegionDescription {
    type Error = RegionError;

    fn try_from(outlines: Vec<Polygon>) -> Result<Self, Self::Error> {
        Self::new(outlines)
    }
}

impl From<RegionDescription> for Vec<Polygon> {
    fn from(region: RegionDescription) -> Self {
        region.outlines
    }
}

/// Even-odd parity across all outlines of `region`
pub fn point_in_region(point: Vec2, region: &RegionDescription) -> bool {
    region
        .outlines
        .iter()
        .filter(|outline| outline.contains(point))
        .count()
        % 2
        == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_with_hole() -> RegionDescription {
        let boundary = Polygon::rect(Vec2::ZERO, Vec2::splat(100.0)).unwrap();
        let hole = Polygon::rect(Vec2::splat(40.0), Vec2::splat(60.0)).unwrap();
        RegionDescription::with_holes(boundary, [hole])
    }

    #[test]
    fn test_even_odd_hole() {
        let region = square_with_hole();
        assert!(region.contains(Vec2::new(10.0, 10.0)));
        assert!(!region.contains(Vec2::new(50.0, 50.0)));
        assert!(!region.contains(Vec2::new(110.0, 50.0)));
        assert_eq!(region.holes().len(), 1);
    }

    #[test]
    fn test_island_inside_hole_is_inside() {
        // Third nested outline flips parity back
        let mut outlines = square_with_hole().outlines().to_vec();
        outlines.push(Polygon::rect(Vec2::splat(45.0), Vec2::splat(55.0)).unwrap());
        let region = RegionDescription::new(outlines).unwrap();
        assert!(region.contains(Vec2::new(50.0, 50.0)));
        assert!(!region.contains(Vec2::new(42.0, 42.0)));
    }

    #[test]
    fn test_empty_region_rejected() {
        assert_eq!(RegionDescription::new(vec![]), Err(RegionError::EmptyRegion));
    }

    #[test]
    fn test_bounds_cover_all_outlines() {
        let b = square_with_hole().bounds();
        assert_eq!(b.min, Vec2::ZERO);
        assert_eq!(b.max, Vec2::splat(100.0));
    }

    #[test]
    fn test_to_svg() {
        let svg = square_with_hole().to_svg(100, 100, Rgb::new(0, 255, 0));
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.contains("fill-rule=\"evenodd\""));
        assert!(svg.contains("fill=\"#00ff00\""));
        assert_eq!(svg.matches('Z').count(), 2);
        assert!(svg.contains("M40 40 L60 40"));
    }
}
