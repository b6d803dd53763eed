//! `#[wasm_bindgen]` exports for the gravity sandbox.
//!
//! The host calls, in order:
//! - `game_load_config(json)` (optional) and `game_load_ship(paths)` (whenever
//!   the ship SVG arrives)
//! - `game_init(width, height)` once the canvas is sized
//! - `game_tick(dt)` every animation frame, then reads the vertex buffer via
//!   `get_vector_vertices_ptr` / `get_vector_vertex_count`
//!
//! Input handlers may be called at any time; events are applied at the next tick.
//! `game_blur` should be wired to the window's blur event so keys held while
//! focus moves away do not stay pressed.

use std::cell::RefCell;

use orbit_engine::InputEvent;
use wasm_bindgen::prelude::*;

pub mod runner;

pub use runner::GameRunner;

thread_local! {
    static RUNNER: RefCell<GameRunner> = RefCell::new(GameRunner::default());
}

fn with_runner<R>(f: impl FnOnce(&mut GameRunner) -> R) -> R {
    RUNNER.with(|cell| f(&mut cell.borrow_mut()))
}

#[wasm_bindgen]
pub fn game_init(width: f32, height: f32) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    with_runner(|r| r.init(width, height));
    log::info!("orbit: initialized at {}x{}", width, height);
}

#[wasm_bindgen]
pub fn game_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

#[wasm_bindgen]
pub fn game_pointer_down(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
}

#[wasm_bindgen]
pub fn game_pointer_up(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
}

#[wasm_bindgen]
pub fn game_pointer_move(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
}

#[wasm_bindgen]
pub fn game_key_down(key_code: u32) {
    with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
}

#[wasm_bindgen]
pub fn game_key_up(key_code: u32) {
    with_runner(|r| r.push_input(InputEvent::KeyUp { key_code }));
}

/// Release every held key.
#[wasm_bindgen]
pub fn game_blur() {
    with_runner(|r| r.release_all_keys());
}

/// Override the default configuration. Applies at the next `game_init`.
/// Returns false (and keeps the previous configuration) if the JSON is invalid.
#[wasm_bindgen]
pub fn game_load_config(json: &str) -> bool {
    match with_runner(|r| r.load_config(json)) {
        Ok(()) => {
            log::info!("orbit: config loaded");
            true
        }
        Err(e) => {
            log::warn!("orbit: rejected config: {}", e);
            false
        }
    }
}

/// Install the ship from the `d` attributes of the SVG's `<path>` elements.
/// Returns false if the outline is unusable; the ship then stays pending.
#[wasm_bindgen]
pub fn game_load_ship(paths: js_sys::Array) -> bool {
    let mut data = Vec::with_capacity(paths.length() as usize);
    for value in paths.iter() {
        match value.as_string() {
            Some(d) => data.push(d),
            None => log::warn!("orbit: ignoring non-string ship path {:?}", value),
        }
    }

    match with_runner(|r| r.load_ship(&data)) {
        Ok(()) => {
            log::info!("orbit: ship outline loaded from {} paths", data.len());
            true
        }
        Err(e) => {
            log::warn!("orbit: rejected ship outline: {}", e);
            false
        }
    }
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_vector_vertices_ptr() -> *const f32 {
    with_runner(|r| r.vector_vertices_ptr())
}

#[wasm_bindgen]
pub fn get_vector_vertex_count() -> u32 {
    with_runner(|r| r.vector_vertex_count())
}

#[wasm_bindgen]
pub fn get_max_vector_vertices() -> u32 {
    with_runner(|r| r.max_vector_vertices())
}

#[wasm_bindgen]
pub fn get_world_width() -> f32 {
    with_runner(|r| r.world_width())
}

#[wasm_bindgen]
pub fn get_world_height() -> f32 {
    with_runner(|r| r.world_height())
}

#[wasm_bindgen]
pub fn is_player_active() -> bool {
    with_runner(|r| r.player_active())
}
