//! Random valid-position sampling
//!
//! Goals and collectibles are dropped at uniform random points of a caller
//! supplied box until one is area-walkable. The loop is bounded; when it runs
//! dry the caller's known-safe positions are tried in order, and as a last
//! resort the caller's default position is returned as-is.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::collision::CollisionProvider;
use crate::geom::Bounds;

/// Which link of the fallback chain produced a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementSource {
    /// Random draw that passed on the given attempt (1-based)
    Random { attempt: u32 },
    /// Caller's safe list, by index
    Fallback(usize),
    /// Nothing was walkable; default returned unchecked
    Default,
}

/// A sampled position and how it was found
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub pos: Vec2,
    pub source: PlacementSource,
}

/// Uniformly sampled position guaranteed walkable unless every option fails
///
/// Never panics and never returns an unwalkable point while some fallback is
/// walkable. See [`place`] for the traced form.
pub fn sample_valid_position<P, R>(
    provider: &P,
    rng: &mut R,
    bounds: Bounds,
    radius: f32,
    max_attempts: u32,
    fallbacks: &[Vec2],
    default_pos: Vec2,
) -> Vec2
where
    P: CollisionProvider + ?Sized,
    R: Rng + ?Sized,
{
    place(provider, rng, bounds, radius, max_attempts, fallbacks, default_pos).pos
}

/// [`sample_valid_position`] that also reports which step succeeded
pub fn place<P, R>(
    provider: &P,
    rng: &mut R,
    bounds: Bounds,
    radius: f32,
    max_attempts: u32,
    fallbacks: &[Vec2],
    default_pos: Vec2,
) -> Placement
where
    P: CollisionProvider + ?Sized,
    R: Rng + ?Sized,
{
    for attempt in 1..=max_attempts {
        let pos = bounds.sample(rng);
        if provider.area_walkable(pos, radius) {
            return Placement {
                pos,
                source: PlacementSource::Random { attempt },
            };
        }
    }

    log::debug!(
        "No walkable point in {} random attempts, trying {} fallbacks",
        max_attempts,
        fallbacks.len()
    );

    if let Some((i, &pos)) = fallbacks
        .iter()
        .enumerate()
        .find(|&(_, &p)| provider.area_walkable(p, radius))
    {
        return Placement {
            pos,
            source: PlacementSource::Fallback(i),
        };
    }

    log::debug!("All fallbacks blocked, using default {:?}", default_pos);
    Placement {
        pos: default_pos,
        source: PlacementSource::Default,
    }
}

/// Everything a host needs to place items on one map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRules {
    pub bounds: Bounds,
    pub radius: f32,
    pub max_attempts: u32,
    pub fallbacks: Vec<Vec2>,
    pub default_pos: Vec2,
}

impl PlacementRules {
    pub fn place<P, R>(&self, provider: &P, rng: &mut R) -> Placement
    where
        P: CollisionProvider + ?Sized,
        R: Rng + ?Sized,
    {
        place(
            provider,
            rng,
            self.bounds,
            self.radius,
            self.max_attempts,
            &self.fallbacks,
            self.default_pos,
        )
    }

    /// Independent placements; items may land close to each other
    pub fn sample_many<P, R>(&self, provider: &P, rng: &mut R, count: usize) -> Vec<Vec2>
    where
        P: CollisionProvider + ?Sized,
        R: Rng + ?Sized,
    {
        (0..count).map(|_| self.place(provider, rng).pos).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{Obstacle, VectorCollisionProvider};
    use crate::geom::Polygon;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn square_with_block() -> VectorCollisionProvider {
        let boundary = Polygon::rect(Vec2::ZERO, Vec2::splat(100.0)).unwrap();
        let block = Polygon::rect(Vec2::splat(40.0), Vec2::splat(60.0)).unwrap();
        VectorCollisionProvider::new(boundary, vec![Obstacle::Area(block)])
    }

    /// Boundary entirely covered by an obstacle
    fn all_blocked() -> VectorCollisionProvider {
        let boundary = Polygon::rect(Vec2::ZERO, Vec2::splat(100.0)).unwrap();
        let cover = Polygon::rect(Vec2::splat(-10.0), Vec2::splat(110.0)).unwrap();
        VectorCollisionProvider::new(boundary, vec![Obstacle::Area(cover)])
    }

    #[test]
    fn test_random_placement_is_walkable() {
        let provider = square_with_block();
        let mut rng = Pcg32::seed_from_u64(42);
        let bounds = Bounds::new(Vec2::ZERO, Vec2::splat(100.0));
        for _ in 0..200 {
            let placed = place(&provider, &mut rng, bounds, 5.0, 100, &[], Vec2::splat(50.0));
            assert!(matches!(placed.source, PlacementSource::Random { .. }));
            assert!(provider.area_walkable(placed.pos, 5.0));
        }
    }

    #[test]
    fn test_all_obstacle_region_uses_default() {
        let provider = all_blocked();
        let mut rng = Pcg32::seed_from_u64(1);
        let bounds = Bounds::new(Vec2::ZERO, Vec2::splat(100.0));
        let default = Vec2::new(50.0, 50.0);
        let placed = place(
            &provider,
            &mut rng,
            bounds,
            5.0,
            50,
            &[Vec2::new(10.0, 10.0), Vec2::new(90.0, 90.0)],
            default,
        );
        assert_eq!(placed.source, PlacementSource::Default);
        assert_eq!(placed.pos, default);
    }

    #[test]
    fn test_fallback_chain_order() {
        let provider = square_with_block();
        let mut rng = Pcg32::seed_from_u64(3);
        // Bounds far outside the map: every random draw fails
        let bounds = Bounds::new(Vec2::splat(500.0), Vec2::splat(600.0));
        let fallbacks = [Vec2::new(50.0, 50.0), Vec2::new(200.0, 0.0), Vec2::new(20.0, 20.0)];
        let placed = place(&provider, &mut rng, bounds, 5.0, 30, &fallbacks, Vec2::ZERO);
        assert_eq!(placed.source, PlacementSource::Fallback(2));
        assert_eq!(placed.pos, Vec2::new(20.0, 20.0));

        let pos = sample_valid_position(&provider, &mut rng, bounds, 5.0, 30, &fallbacks, Vec2::ZERO);
        assert_eq!(pos, Vec2::new(20.0, 20.0));
    }

    #[test]
    fn test_zero_attempts_goes_straight_to_fallbacks() {
        let provider = square_with_block();
        let mut rng = Pcg32::seed_from_u64(9);
        let bounds = Bounds::new(Vec2::ZERO, Vec2::splat(100.0));
        let placed = place(&provider, &mut rng, bounds, 5.0, 0, &[Vec2::splat(15.0)], Vec2::ZERO);
        assert_eq!(placed.source, PlacementSource::Fallback(0));
    }

    #[test]
    fn test_rules_sample_many() {
        let provider = square_with_block();
        let rules = PlacementRules {
            bounds: Bounds::new(Vec2::ZERO, Vec2::splat(100.0)),
            radius: 8.0,
            max_attempts: 200,
            fallbacks: vec![Vec2::splat(20.0)],
            default_pos: Vec2::splat(50.0),
        };
        let mut rng = Pcg32::seed_from_u64(11);
        let items = rules.sample_many(&provider, &mut rng, 10);
        assert_eq!(items.len(), 10);
        assert!(items.iter().all(|&p| provider.area_walkable(p, 8.0)));
    }

    #[test]
    fn test_same_seed_same_positions() {
        let provider = square_with_block();
        let bounds = Bounds::new(Vec2::ZERO, Vec2::splat(100.0));
        let mut a = Pcg32::seed_from_u64(77);
        let mut b = Pcg32::seed_from_u64(77);
        for _ in 0..20 {
            assert_eq!(
                sample_valid_position(&provider, &mut a, bounds, 5.0, 100, &[], Vec2::ZERO),
                sample_valid_position(&provider, &mut b, bounds, 5.0, 100, &[], Vec2::ZERO)
            );
        }
    }

    proptest! {
        #[test]
        fn result_is_walkable_or_default(seed in any::<u64>(), radius in 0.0f32..20.0) {
            let provider = square_with_block();
            let mut rng = Pcg32::seed_from_u64(seed);
            let bounds = Bounds::new(Vec2::splat(-20.0), Vec2::splat(120.0));
            let default = Vec2::new(-5.0, -5.0);
            let placed = place(&provider, &mut rng, bounds, radius, 100, &[], default);
            prop_assert!(
                provider.area_walkable(placed.pos, radius)
                    || (placed.source == PlacementSource::Default && placed.pos == default)
            );
        }
    }
}
