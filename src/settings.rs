//! Stage tuning
//!
//! Distances, budgets and the difficulty preset. Hosts that keep settings
//! around do so as JSON through `to_json` / `from_json`.

use serde::{Deserialize, Serialize};

use crate::consts;

/// Difficulty presets, selecting which thin-wall barriers a map carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    /// Boundary only
    Easy,
    #[default]
    Normal,
    /// Normal barriers plus a second set
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Stage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeSettings {
    pub difficulty: Difficulty,

    // === Actor ===
    /// Collision radius used for area checks
    pub actor_radius: f32,
    /// Distance per move input
    pub move_step: f32,

    // === Pickups ===
    pub collect_radius: f32,
    pub goal_radius: f32,
    pub collectible_count: usize,

    // === Collision ===
    /// Points closer than this to a thin wall are blocked
    pub wall_threshold: f32,
    /// Per-channel tolerance when matching the walkable colour
    pub color_tolerance: u8,

    // === Recovery ===
    pub sample_attempts: u32,
    pub push_step: f32,
    pub push_max_steps: u32,
}

impl Default for MazeSettings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,

            actor_radius: consts::ACTOR_RADIUS,
            move_step: consts::MOVE_STEP,

            collect_radius: consts::COLLECT_RADIUS,
            goal_radius: consts::GOAL_RADIUS,
            collectible_count: consts::COLLECTIBLE_COUNT,

            wall_threshold: consts::WALL_THRESHOLD,
            color_tolerance: consts::COLOR_TOLERANCE,

            sample_attempts: consts::SAMPLE_ATTEMPTS,
            push_step: consts::PUSH_STEP,
            push_max_steps: consts::PUSH_MAX_STEPS,
        }
    }
}

impl MazeSettings {
    /// Defaults with a given difficulty
    pub fn from_preset(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Parse settings; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_names() {
        for d in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
        }
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }

    #[test]
    fn test_defaults_match_consts() {
        let s = MazeSettings::default();
        assert_eq!(s.actor_radius, consts::ACTOR_RADIUS);
        assert_eq!(s.move_step, 15.0);
        assert_eq!(s.collect_radius, 30.0);
        assert_eq!(s.goal_radius, 40.0);
        assert_eq!(s.color_tolerance, 10);
        assert_eq!(s.difficulty, Difficulty::Normal);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let s = MazeSettings::from_json(r#"{"difficulty":"Hard","move_step":10.0}"#).unwrap();
        assert_eq!(s.difficulty, Difficulty::Hard);
        assert_eq!(s.move_step, 10.0);
        assert_eq!(s.goal_radius, consts::GOAL_RADIUS);

        let back = MazeSettings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(MazeSettings::from_json(r#"{"move_step":"fast"}"#).is_err());
    }

    #[test]
    fn test_from_preset() {
        let s = MazeSettings::from_preset(Difficulty::Easy);
        assert_eq!(s.difficulty, Difficulty::Easy);
        assert_eq!(s.push_max_steps, consts::PUSH_MAX_STEPS);
    }
}
