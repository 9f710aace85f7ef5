//! Browser bindings
//!
//! The JS side owns rendering and input. It calls `frame(dt)` from
//! `requestAnimationFrame` and draws the returned JSON snapshot.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::FixedStepClock;
use crate::config::GameConfig;
use crate::persistence::LocalStorageStore;
use crate::sim::{Frame, GameEvent, GameState, SeededSampler, TickInput, tick};

#[derive(Serialize)]
struct FrameOut<'a> {
    frame: Frame,
    events: &'a [GameEvent],
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    // A second init (hot reload) is harmless
    let _ = console_log::init_with_level(log::Level::Info);
}

#[wasm_bindgen]
pub struct WebRunner {
    state: GameState<SeededSampler, LocalStorageStore>,
    clock: FixedStepClock,
    input: TickInput,
}

#[wasm_bindgen]
impl WebRunner {
    /// `seed` of 0 picks one from the clock; `config_json` overrides tuning
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64, config_json: Option<String>) -> Result<WebRunner, JsValue> {
        let seed = if seed > 0.0 {
            seed as u64
        } else {
            js_sys::Date::now() as u64
        };
        let config = match config_json {
            Some(json) => GameConfig::from_json_str(&json)
                .map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => GameConfig::default(),
        };
        let state = GameState::new(config, SeededSampler::new(seed), LocalStorageStore::new())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("Game initialized with seed: {}", seed);
        Ok(Self {
            state,
            clock: FixedStepClock::default(),
            input: TickInput::default(),
        })
    }

    /// Jump key/pointer state
    pub fn set_jump(&mut self, down: bool) {
        self.input.jump = down;
    }

    /// Queue a restart for the next step
    pub fn request_restart(&mut self) {
        self.input.restart = true;
    }

    /// Run the steps owed for `dt` seconds and return `{frame, events}` as JSON
    pub fn frame(&mut self, dt: f32) -> Result<String, JsValue> {
        let mut events = Vec::new();
        let steps = self.clock.advance(dt);
        for _ in 0..steps {
            events.extend(tick(&mut self.state, &self.input, self.clock.step));
            // Clear one-shot inputs after processing
            self.input.restart = false;
        }
        let out = FrameOut {
            frame: self.state.snapshot(),
            events: &events,
        };
        serde_json::to_string(&out).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn score(&self) -> f64 {
        self.state.score() as f64
    }

    pub fn high_score(&self) -> f64 {
        self.state.high_score() as f64
    }
}
