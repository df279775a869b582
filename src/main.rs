//! Maze Collision entry point
//!
//! Web: hosts the pixel demo stage and forwards arrow/WASD keys to it.
//! Native: walks a seeded actor through the built-in stages and logs what happens.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_stage {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use maze_collision::Direction;
    use maze_collision::stage::{StageEvent, StageInput, StageLayout, StageState, step};

    /// Stage instance shared with the event handlers
    struct Host {
        state: StageState,
        collected: u32,
    }

    impl Host {
        fn handle(&mut self, input: &StageInput) {
            step(&mut self.state, input);
            for event in self.state.drain_events() {
                match event {
                    StageEvent::Ready { actor, goal } => {
                        log::info!("Ready: actor {:?}, goal {:?}", actor, goal)
                    }
                    StageEvent::Collected { kind, .. } => {
                        self.collected += 1;
                        log::info!("Collected {} ({} total)", kind.icon(), self.collected);
                    }
                    StageEvent::GoalReached => log::info!("Goal reached!"),
                    other => log::debug!("{:?}", other),
                }
            }
            self.update_hud();
        }

        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("position") {
                let text = match self.state.actor {
                    Some(pos) => format!("Position: ({}, {})", pos.x.round(), pos.y.round()),
                    None => "Loading collision map...".to_string(),
                };
                el.set_text_content(Some(&text));
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Maze Collision starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

        let seed = js_sys::Date::now() as u64;
        let (state, job) = StageState::new(
            StageLayout::pixel_demo(),
            StageLayout::pixel_demo_settings(),
            seed,
        )
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
        if let Some(job) = job {
            job.spawn();
        }

        let host = Rc::new(RefCell::new(Host {
            state,
            collected: 0,
        }));
        host.borrow().update_hud();

        // Keyboard
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let Some(direction) = Direction::from_key(&event.key()) else {
                    return;
                };
                event.prevent_default();
                host.borrow_mut().handle(&StageInput::moving(direction));
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // The map loads on the task queue; poke the stage once it has had a chance
        {
            let closure = Closure::once(move || {
                host.borrow_mut().handle(&StageInput::default());
            });
            window.set_timeout_with_callback(closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        log::info!("Stage seeded with {}", seed);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_stage::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Maze Collision (native) starting...");

    let settings = maze_collision::MazeSettings::default();
    for layout in demo_layouts(settings.difficulty) {
        let settings = if matches!(layout.map, maze_collision::stage::StageMap::Raster { .. }) {
            maze_collision::stage::StageLayout::pixel_demo_settings()
        } else {
            settings.clone()
        };
        if let Err(e) = walk(layout, settings) {
            log::error!("Stage failed: {e}");
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn demo_layouts(
    difficulty: maze_collision::Difficulty,
) -> Vec<maze_collision::stage::StageLayout> {
    use maze_collision::stage::StageLayout;

    let mut layouts = vec![StageLayout::pixel_demo()];
    match StageLayout::bangladesh(difficulty) {
        Ok(layout) => layouts.push(layout),
        Err(e) => log::error!("Bangladesh layout: {e}"),
    }
    match StageLayout::grid_maze() {
        Ok(layout) => layouts.push(layout),
        Err(e) => log::error!("Grid maze layout: {e}"),
    }
    layouts
}

/// Run a fixed input script against one stage and log the outcome
#[cfg(not(target_arch = "wasm32"))]
fn walk(
    layout: maze_collision::stage::StageLayout,
    settings: maze_collision::MazeSettings,
) -> Result<(), maze_collision::RegionError> {
    use maze_collision::Direction;
    use maze_collision::stage::{StageEvent, StageInput, StageState, step};

    let (mut state, job) = StageState::new(layout, settings, 2024)?;
    if let Some(job) = job {
        job.run()?;
    }

    const SCRIPT: [Direction; 4] = [Direction::Right, Direction::Down, Direction::Left, Direction::Up];
    step(&mut state, &StageInput::default());
    let (mut moved, mut blocked) = (0, 0);
    // Lean on each direction for a few steps before turning
    let inputs = SCRIPT
        .iter()
        .flat_map(|&d| std::iter::repeat_n(d, 5))
        .cycle()
        .take(40);
    for direction in inputs {
        step(&mut state, &StageInput::moving(direction));
        for event in state.drain_events() {
            match event {
                StageEvent::Moved { .. } => moved += 1,
                StageEvent::Blocked { .. } => blocked += 1,
                StageEvent::Collected { kind, .. } => log::info!("Collected {}", kind.icon()),
                StageEvent::GoalReached => log::info!("Goal reached"),
                _ => {}
            }
        }
    }

    log::info!(
        "'{}': {} moves, {} blocked, actor at {:?}",
        state.rules.name,
        moved,
        blocked,
        state.actor
    );
    Ok(())
}
