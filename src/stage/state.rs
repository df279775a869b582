//! Stage state
//!
//! Everything a running stage owns: the collision provider, its seeded RNG,
//! the actor, the goal and the current collectible batch.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::layout::{StageLayout, StageRules};
use crate::collision::{Clearance, CollisionProvider, RasterJob};
use crate::error::RegionError;
use crate::movement::{Direction, push_to_valid};
use crate::settings::MazeSettings;

/// Current phase of a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StagePhase {
    /// Collision map not ready; input is ignored
    Loading,
    Playing,
    /// Goal reached
    Finished,
}

/// Collectible icons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectibleKind {
    Coin,
    Apple,
    House,
    Star,
    Gem,
}

impl CollectibleKind {
    pub const ALL: [CollectibleKind; 5] = [
        CollectibleKind::Coin,
        CollectibleKind::Apple,
        CollectibleKind::House,
        CollectibleKind::Star,
        CollectibleKind::Gem,
    ];

    pub fn icon(&self) -> &'static str {
        match self {
            CollectibleKind::Coin => "💰",
            CollectibleKind::Apple => "🍎",
            CollectibleKind::House => "🏠",
            CollectibleKind::Star => "⭐",
            CollectibleKind::Gem => "💎",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub kind: CollectibleKind,
    pub pos: Vec2,
}

/// Things that happened during a step, drained by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StageEvent {
    /// Collision map ready and the stage populated
    Ready { actor: Vec2, goal: Vec2 },
    Moved { from: Vec2, to: Vec2 },
    Blocked { direction: Direction },
    /// Actor was somewhere invalid and got pushed back
    Recovered { from: Vec2, to: Vec2 },
    Collected { id: u32, kind: CollectibleKind },
    /// Last collectible taken, a new batch was placed
    BatchRespawned { count: usize },
    GoalReached,
}

/// A running stage
pub struct StageState {
    pub settings: MazeSettings,
    pub rules: StageRules,
    pub seed: u64,
    pub phase: StagePhase,
    /// `None` until the map is ready
    pub actor: Option<Vec2>,
    pub goal: Option<Vec2>,
    /// Sorted by id
    pub collectibles: Vec<Collectible>,
    pub collected_count: u32,
    pub steps: u64,
    pub events: Vec<StageEvent>,
    provider: Box<dyn CollisionProvider>,
    rng: Pcg32,
    next_id: u32,
}

impl StageState {
    /// Create a stage; raster maps also return the job that loads them
    ///
    /// The stage stays in [`StagePhase::Loading`] until that job has run.
    pub fn new(
        layout: StageLayout,
        settings: MazeSettings,
        seed: u64,
    ) -> Result<(Self, Option<RasterJob>), RegionError> {
        let StageLayout { map, mut rules } = layout;
        let (provider, job) = map.into_provider(&settings)?;

        rules.placement.radius = settings.actor_radius;
        rules.placement.max_attempts = settings.sample_attempts;

        log::info!("Stage '{}' created (seed {})", rules.name, seed);

        let state = Self {
            settings,
            rules,
            seed,
            phase: StagePhase::Loading,
            actor: None,
            goal: None,
            collectibles: Vec::new(),
            collected_count: 0,
            steps: 0,
            events: Vec::new(),
            provider,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };
        Ok((state, job))
    }

    pub fn provider(&self) -> &dyn CollisionProvider {
        self.provider.as_ref()
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take the events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<StageEvent> {
        std::mem::take(&mut self.events)
    }

    /// Random walkable position from the stage's placement rules
    pub fn sample_position(&mut self) -> Vec2 {
        self.rules.placement.place(&self.provider, &mut self.rng).pos
    }

    /// Actor start: the fixed start if clear, pushed toward the anchor if
    /// not, sampled when neither works
    pub(crate) fn initial_actor_position(&mut self) -> Vec2 {
        if let Some(start) = self.rules.start {
            if let Some(pos) = self.recover(start) {
                return pos;
            }
            log::debug!("Start {:?} unrecoverable, sampling instead", start);
        }
        self.sample_position()
    }

    /// Find room for the actor at `pos`, pushing toward the anchor if needed
    ///
    /// Returns `pos` itself when the actor fits there, the first point on the
    /// way to the anchor where it fits otherwise, and `None` when the push
    /// budget runs out first.
    pub fn recover(&self, pos: Vec2) -> Option<Vec2> {
        let clear = Clearance {
            provider: self.provider(),
            radius: self.settings.actor_radius,
        };
        if clear.point_walkable(pos) {
            return Some(pos);
        }
        let pushed = push_to_valid(
            pos,
            self.rules.anchor,
            &clear,
            self.settings.push_step,
            self.settings.push_max_steps,
        );
        clear.point_walkable(pushed).then_some(pushed)
    }

    /// Replace the collectible batch
    pub fn spawn_collectibles(&mut self) {
        let count = self.settings.collectible_count;
        self.collectibles.clear();
        for _ in 0..count {
            let pos = self.sample_position();
            let kind = CollectibleKind::ALL[self.rng.random_range(0..CollectibleKind::ALL.len())];
            let id = self.next_entity_id();
            self.collectibles.push(Collectible { id, kind, pos });
        }
        log::debug!("Spawned {} collectibles", count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;

    #[test]
    fn test_new_stage_is_loading() {
        let (state, job) =
            StageState::new(StageLayout::bangladesh(Difficulty::Normal).unwrap(), MazeSettings::default(), 1)
                .unwrap();
        assert!(job.is_none());
        assert_eq!(state.phase, StagePhase::Loading);
        assert!(state.actor.is_none());
        assert!(state.collectibles.is_empty());
    }

    #[test]
    fn test_start_on_wall_is_moved_clear() {
        for difficulty in [Difficulty::Normal, Difficulty::Hard] {
            let (mut state, _) =
                StageState::new(StageLayout::bangladesh(difficulty).unwrap(), MazeSettings::default(), 1)
                    .unwrap();
            // (300, 250) sits within 8px of the first zig-zag wall
            let start = Vec2::new(300.0, 250.0);
            assert!(!state.provider().point_walkable(start));

            let actor = state.initial_actor_position();
            assert_ne!(actor, start);
            assert!(state.provider().area_walkable(actor, state.settings.actor_radius));
        }
    }

    #[test]
    fn test_clear_start_is_kept() {
        let (mut state, _) =
            StageState::new(StageLayout::bangladesh(Difficulty::Easy).unwrap(), MazeSettings::default(), 1)
                .unwrap();
        assert_eq!(state.initial_actor_position(), Vec2::new(300.0, 250.0));
    }

    #[test]
    fn test_recover_leaves_valid_points_alone() {
        let (state, _) =
            StageState::new(StageLayout::bangladesh(Difficulty::Easy).unwrap(), MazeSettings::default(), 1)
                .unwrap();
        let p = Vec2::new(400.0, 400.0);
        assert_eq!(state.recover(p), Some(p));
        // Far outside: 20 steps of 5 are not enough to get back in
        assert_eq!(state.recover(Vec2::new(-500.0, -500.0)), None);
    }

    #[test]
    fn test_recover_passes_points_too_close_to_the_edge() {
        let (state, _) =
            StageState::new(StageLayout::bangladesh(Difficulty::Easy).unwrap(), MazeSettings::default(), 1)
                .unwrap();
        let radius = state.settings.actor_radius;
        // The west edge crosses y = 400 near x = 156
        let outside = Vec2::new(140.0, 400.0);
        let recovered = state.recover(outside).unwrap();
        assert!(state.provider().area_walkable(recovered, radius));
        assert!(recovered.x > 160.0);

        // Point-walkable but the actor's disk pokes out of the boundary
        let grazing = Vec2::new(158.0, 400.0);
        assert!(state.provider().point_walkable(grazing));
        assert!(!state.provider().area_walkable(grazing, radius));
        let recovered = state.recover(grazing).unwrap();
        assert_ne!(recovered, grazing);
        assert!(state.provider().area_walkable(recovered, radius));
    }

    #[test]
    fn test_collectible_batch() {
        let (mut state, _) =
            StageState::new(StageLayout::bangladesh(Difficulty::Hard).unwrap(), MazeSettings::default(), 5)
                .unwrap();
        state.spawn_collectibles();
        assert_eq!(state.collectibles.len(), 10);
        let ids: Vec<u32> = state.collectibles.iter().map(|c| c.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(CollectibleKind::Gem.icon(), "💎");
    }
}
