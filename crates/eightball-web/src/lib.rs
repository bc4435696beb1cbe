//! Browser bridge for the eight-ball table.
//!
//! The host calls `game_init` once, then `game_tick` every animation frame,
//! forwarding pointer input as it arrives. After each tick it reads the
//! frame buffer and HUD events through the pointer accessors, or the whole
//! HUD as JSON.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use eightball::input::queue::custom;
use eightball::{InputEvent, MatchConfig};

pub mod runner;

pub use runner::MatchRunner;

thread_local! {
    static RUNNER: RefCell<Option<MatchRunner>> = const { RefCell::new(None) };
}

fn with_runner<R>(f: impl FnOnce(&mut MatchRunner) -> R) -> R {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let runner = borrow
            .as_mut()
            .expect("Match not initialized. Call game_init() first.");
        f(runner)
    })
}

/// Start a match. `config_json` may be omitted for the standard table;
/// without a seed in it the rack is shuffled from `Math.random`.
#[wasm_bindgen]
pub fn game_init(config_json: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let mut config = match config_json {
        Some(json) => MatchConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
        None => MatchConfig::default(),
    };
    if config.seed.is_none() {
        config.seed = Some((js_sys::Math::random() * u32::MAX as f64) as u64);
    }

    let runner = MatchRunner::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("eightball: initialized");
    Ok(())
}

#[wasm_bindgen]
pub fn game_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

// ---- Input ----

#[wasm_bindgen]
pub fn game_pointer_delta(dx: f32, dy: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerDelta { dx, dy }));
}

#[wasm_bindgen]
pub fn game_primary_down() {
    with_runner(|r| r.push_input(InputEvent::PrimaryDown));
}

#[wasm_bindgen]
pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
    with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
}

/// The restart button.
#[wasm_bindgen]
pub fn game_restart() {
    game_custom_event(custom::RESTART, 0.0, 0.0, 0.0);
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_frame_ptr() -> *const f32 {
    with_runner(|r| r.frame_ptr())
}

#[wasm_bindgen]
pub fn get_frame_len() -> u32 {
    with_runner(|r| r.frame_len())
}

#[wasm_bindgen]
pub fn get_game_events_ptr() -> *const f32 {
    with_runner(|r| r.game_events_ptr())
}

#[wasm_bindgen]
pub fn get_game_events_len() -> u32 {
    with_runner(|r| r.game_events_len())
}

#[wasm_bindgen]
pub fn get_hud_json() -> String {
    with_runner(|r| r.hud_json().to_owned())
}

/// Predicted cue path for the shot being charged, as `x, z` pairs.
#[wasm_bindgen]
pub fn get_preview_path(steps: u32) -> Vec<f32> {
    with_runner(|r| r.preview_path(steps as usize))
}
