//! Geometry module
//!
//! Pure value types and functions, no provider state:
//! - Containment and distance primitives
//! - Validated outlines, polylines and sampling boxes
//! - Even-odd composite regions

pub mod primitives;
pub mod region;
pub mod shapes;

pub use primitives::{distance_point_to_segment, point_in_polygon, sample_circle_points};
pub use region::{RegionDescription, point_in_region};
pub use shapes::{Bounds, Polygon, Polyline};
