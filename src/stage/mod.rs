//! Hosted maze stages
//!
//! A stage wires a collision provider to an actor, a goal and collectibles:
//! - Seeded RNG only, so a seed plus an input sequence replays exactly
//! - Nothing happens until the collision map reports ready
//! - No rendering or platform dependencies

pub mod layout;
pub mod state;
pub mod step;

pub use layout::{
    GRID_MAZE_PATTERN, PIXEL_DEMO_SVG, StageLayout, StageMap, StageRules, bangladesh_barriers,
    bangladesh_boundary,
};
pub use state::{Collectible, CollectibleKind, StageEvent, StagePhase, StageState};
pub use step::{StageInput, step};
