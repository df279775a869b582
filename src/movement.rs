//! Movement validation
//!
//! Moves are all-or-nothing: the candidate position is accepted whole or the
//! actor stays put. There is no sliding along walls. A separate push-back
//! recovery pulls an actor that ended up somewhere invalid (map loaded late,
//! boundary changed) back toward a reference point.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::collision::CollisionProvider;

/// Result of a proposed move
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// Accepted; the actor's new position
    Moved(Vec2),
    /// Candidate not walkable; the actor keeps its position
    Rejected,
}

impl MoveOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, MoveOutcome::Rejected)
    }

    /// New position when accepted, `current` otherwise
    pub fn resolve(self, current: Vec2) -> Vec2 {
        match self {
            MoveOutcome::Moved(pos) => pos,
            MoveOutcome::Rejected => current,
        }
    }
}

/// Validate `current + delta` for an actor of `radius`
pub fn try_move<P>(current: Vec2, delta: Vec2, provider: &P, radius: f32) -> MoveOutcome
where
    P: CollisionProvider + ?Sized,
{
    let candidate = current + delta;
    if provider.area_walkable(candidate, radius) {
        MoveOutcome::Moved(candidate)
    } else {
        log::trace!("Move {:?} -> {:?} rejected", current, candidate);
        MoveOutcome::Rejected
    }
}

/// Step `pos` toward `reference` until a walkable point is found
///
/// Takes at most `max_steps` steps of `step_size`, never past `reference`.
/// Returns the first point-walkable position, or `pos` unchanged when the
/// budget runs out, the direction is undefined or the step is not positive.
pub fn push_to_valid<P>(
    pos: Vec2,
    reference: Vec2,
    provider: &P,
    step_size: f32,
    max_steps: u32,
) -> Vec2
where
    P: CollisionProvider + ?Sized,
{
    let to_reference = reference - pos;
    let distance = to_reference.length();
    let Some(dir) = to_reference.try_normalize() else {
        return pos;
    };
    if !(step_size.is_finite() && step_size > 0.0) {
        return pos;
    }

    for step in 1..=max_steps {
        let travelled = (step as f32 * step_size).min(distance);
        let candidate = pos + dir * travelled;
        if provider.point_walkable(candidate) {
            log::debug!("Pushed {:?} back to {:?} in {} steps", pos, candidate, step);
            return candidate;
        }
        if travelled >= distance {
            break;
        }
    }
    pos
}

/// One of the four keyboard / touch-pad directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Arrow keys and WASD, case-insensitive (`KeyboardEvent.key` values)
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "arrowup" | "w" => Some(Direction::Up),
            "arrowdown" | "s" => Some(Direction::Down),
            "arrowleft" | "a" => Some(Direction::Left),
            "arrowright" | "d" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Unit vector in screen space (y grows downward)
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }

    #[inline]
    pub fn delta(self, step: f32) -> Vec2 {
        self.unit() * step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{Clearance, Obstacle, VectorCollisionProvider};
    use crate::geom::Polygon;

    fn square_with_block() -> VectorCollisionProvider {
        let boundary = Polygon::rect(Vec2::ZERO, Vec2::splat(100.0)).unwrap();
        let block = Polygon::rect(Vec2::splat(40.0), Vec2::splat(60.0)).unwrap();
        VectorCollisionProvider::new(boundary, vec![Obstacle::Area(block)])
    }

    fn open_square() -> VectorCollisionProvider {
        VectorCollisionProvider::new(Polygon::rect(Vec2::ZERO, Vec2::splat(100.0)).unwrap(), vec![])
    }

    #[test]
    fn test_move_outside_boundary_rejected() {
        let provider = open_square();
        let mut actor = Vec2::new(50.0, 50.0);

        let outcome = try_move(actor, Vec2::new(100.0, 0.0), &provider, 5.0);
        assert_eq!(outcome, MoveOutcome::Rejected);
        actor = outcome.resolve(actor);
        assert_eq!(actor, Vec2::new(50.0, 50.0));

        // Same rejected delta, same answer, still in place
        let again = try_move(actor, Vec2::new(100.0, 0.0), &provider, 5.0);
        assert_eq!(again, MoveOutcome::Rejected);
        assert_eq!(again.resolve(actor), Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_move_accepted() {
        let provider = square_with_block();
        let outcome = try_move(Vec2::new(20.0, 20.0), Direction::Right.delta(5.0), &provider, 5.0);
        assert_eq!(outcome, MoveOutcome::Moved(Vec2::new(25.0, 20.0)));
        assert!(!outcome.is_rejected());
    }

    #[test]
    fn test_move_into_obstacle_is_atomic() {
        let provider = square_with_block();
        // A 15px step would end with the disk overlapping the block: no partial slide
        let start = Vec2::new(25.0, 50.0);
        let outcome = try_move(start, Direction::Right.delta(15.0), &provider, 5.0);
        assert!(outcome.is_rejected());
        assert_eq!(outcome.resolve(start), start);
    }

    #[test]
    fn test_push_to_valid_recovers() {
        let provider = open_square();
        // Actor outside the boundary, pushed back toward the centre
        let pushed = push_to_valid(Vec2::new(112.0, 50.0), Vec2::new(50.0, 50.0), &provider, 5.0, 20);
        assert!(provider.point_walkable(pushed));
        assert!((pushed - Vec2::new(97.0, 50.0)).length() < 1e-4);
    }

    #[test]
    fn test_push_to_valid_gives_up() {
        let provider = open_square();
        let start = Vec2::new(500.0, 50.0);
        // 3 steps of 5 cannot cover 400px of outside space
        assert_eq!(push_to_valid(start, Vec2::new(50.0, 50.0), &provider, 5.0, 3), start);
    }

    #[test]
    fn test_push_to_valid_no_valid_point_on_path() {
        let provider = square_with_block();
        // Reference outside the boundary: every point on the path is blocked
        let start = Vec2::new(50.0, 150.0);
        let pushed = push_to_valid(start, Vec2::new(50.0, 105.0), &provider, 5.0, 1000);
        assert_eq!(pushed, start);

        // Start and reference both inside the block
        let start = Vec2::new(42.0, 42.0);
        let pushed = push_to_valid(start, Vec2::new(58.0, 58.0), &provider, 5.0, 1000);
        assert_eq!(pushed, start);
    }

    #[test]
    fn test_push_to_valid_with_clearance() {
        let provider = open_square();
        let clear = Clearance {
            provider: &provider,
            radius: 8.0,
        };
        // 2px inside: point-walkable, but an 8px disk still pokes out
        let start = Vec2::new(2.0, 50.0);
        assert!(provider.point_walkable(start));
        assert_eq!(
            push_to_valid(start, Vec2::new(50.0, 50.0), &provider, 5.0, 20),
            Vec2::new(7.0, 50.0)
        );

        let pushed = push_to_valid(start, Vec2::new(50.0, 50.0), &clear, 5.0, 20);
        assert_eq!(pushed, Vec2::new(12.0, 50.0));
        assert!(provider.area_walkable(pushed, 8.0));
    }

    #[test]
    fn test_push_to_valid_does_not_overshoot() {
        let provider = open_square();
        // Reference walkable and closer than one step: lands exactly on it
        let pushed = push_to_valid(Vec2::new(102.0, 50.0), Vec2::new(99.0, 50.0), &provider, 5.0, 20);
        assert_eq!(pushed, Vec2::new(99.0, 50.0));
    }

    #[test]
    fn test_push_to_valid_degenerate_input() {
        let provider = open_square();
        let p = Vec2::new(150.0, 50.0);
        assert_eq!(push_to_valid(p, p, &provider, 5.0, 20), p);
        assert_eq!(push_to_valid(p, Vec2::splat(50.0), &provider, 0.0, 20), p);
        assert_eq!(push_to_valid(p, Vec2::splat(50.0), &provider, -5.0, 20), p);
    }

    #[test]
    fn test_direction_from_key() {
        assert_eq!(Direction::from_key("ArrowUp"), Some(Direction::Up));
        assert_eq!(Direction::from_key("w"), Some(Direction::Up));
        assert_eq!(Direction::from_key("S"), Some(Direction::Down));
        assert_eq!(Direction::from_key("a"), Some(Direction::Left));
        assert_eq!(Direction::from_key("arrowright"), Some(Direction::Right));
        assert_eq!(Direction::from_key("Enter"), None);
        assert_eq!(Direction::Up.delta(15.0), Vec2::new(0.0, -15.0));
    }
}
