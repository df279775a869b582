//! Stage step
//!
//! Advances a stage by one input event. Deterministic for a given seed and
//! input sequence.

use glam::Vec2;

use super::state::{StageEvent, StagePhase, StageState};
use crate::movement::{Direction, MoveOutcome, try_move};

/// Input for a single step
#[derive(Debug, Clone, Default)]
pub struct StageInput {
    /// Keyboard / touch move
    pub direction: Option<Direction>,
    /// Host-side teleport (drag, debug); pushed back if invalid
    pub place_actor: Option<Vec2>,
}

impl StageInput {
    pub fn moving(direction: Direction) -> Self {
        Self {
            direction: Some(direction),
            ..Default::default()
        }
    }
}

/// Advance the stage by one step
pub fn step(state: &mut StageState, input: &StageInput) {
    match state.phase {
        StagePhase::Finished => return,
        StagePhase::Loading => {
            if state.provider().is_ready() {
                populate(state);
            }
            // Input from before the map existed is dropped
            return;
        }
        StagePhase::Playing => {}
    }

    let Some(mut actor) = state.actor else {
        return;
    };
    state.steps += 1;

    if let Some(target) = input.place_actor {
        match state.recover(target) {
            Some(placed) => {
                if placed != target {
                    state.events.push(StageEvent::Recovered {
                        from: target,
                        to: placed,
                    });
                }
                actor = placed;
            }
            None => log::debug!("Ignoring placement at {:?}: no room nearby", target),
        }
    }

    if let Some(direction) = input.direction {
        let delta = direction.delta(state.settings.move_step);
        match try_move(actor, delta, state.provider(), state.settings.actor_radius) {
            MoveOutcome::Moved(to) => {
                state.events.push(StageEvent::Moved { from: actor, to });
                actor = to;
            }
            MoveOutcome::Rejected => state.events.push(StageEvent::Blocked { direction }),
        }
    }

    state.actor = Some(actor);
    collect(state, actor);

    if state
        .goal
        .is_some_and(|goal| actor.distance(goal) < state.settings.goal_radius)
    {
        log::info!("Goal reached after {} steps", state.steps);
        state.events.push(StageEvent::GoalReached);
        state.phase = StagePhase::Finished;
    }
}

/// Place actor, goal and the first batch once the map is ready
fn populate(state: &mut StageState) {
    let actor = state.initial_actor_position();
    let goal = match state.rules.goal {
        Some(goal) => goal,
        None => state.sample_position(),
    };
    state.actor = Some(actor);
    state.goal = Some(goal);
    state.spawn_collectibles();
    state.phase = StagePhase::Playing;

    log::info!(
        "Stage '{}' ready: actor at {:?}, goal at {:?}",
        state.rules.name,
        actor,
        goal
    );
    state.events.push(StageEvent::Ready { actor, goal });
}

/// Pick up everything within reach; respawn when the batch is empty
fn collect(state: &mut StageState, actor: Vec2) {
    let radius = state.settings.collect_radius;
    let (taken, kept): (Vec<_>, Vec<_>) = state
        .collectibles
        .drain(..)
        .partition(|c| actor.distance(c.pos) < radius);
    state.collectibles = kept;

    if taken.is_empty() {
        return;
    }
    for c in &taken {
        state.events.push(StageEvent::Collected {
            id: c.id,
            kind: c.kind,
        });
    }
    state.collected_count += taken.len() as u32;

    if state.collectibles.is_empty() {
        state.spawn_collectibles();
        state.events.push(StageEvent::BatchRespawned {
            count: state.collectibles.len(),
        });
    }
}
