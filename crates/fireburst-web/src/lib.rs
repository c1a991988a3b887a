pub mod runner;

pub use runner::FireworksRunner;

use std::cell::RefCell;

use fireburst_engine::InputEvent;
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<FireworksRunner>> = RefCell::new(None);
}

fn with_runner<R>(f: impl FnOnce(&mut FireworksRunner) -> R) -> R {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let runner = borrow.as_mut().expect("Fireworks not initialized. Call fireworks_init() first.");
        f(runner)
    })
}

/// Create the runner. `config_json` may be omitted to use defaults.
#[wasm_bindgen]
pub fn fireworks_init(config_json: Option<String>) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let seed = (js_sys::Math::random() * u32::MAX as f64) as u64 + 1;
    let runner = FireworksRunner::from_json(config_json.as_deref(), seed);

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("fireburst: initialized");
}

#[wasm_bindgen]
pub fn fireworks_tick(now_ms: f64) {
    with_runner(|r| r.tick(now_ms));
}

#[wasm_bindgen]
pub fn fireworks_pointer_down(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
}

#[wasm_bindgen]
pub fn fireworks_key_down(key_code: u32) {
    with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
}

#[wasm_bindgen]
pub fn fireworks_resize(width: f32, height: f32) {
    with_runner(|r| r.push_input(InputEvent::Resize { width, height }));
}

/// Latest detector output: 21 landmarks × (x, y, z), normalized image space.
#[wasm_bindgen]
pub fn fireworks_hand_landmarks(flat_data: &[f32]) {
    with_runner(|r| r.post_landmarks(flat_data));
}

#[wasm_bindgen]
pub fn fireworks_no_hand() {
    with_runner(|r| r.post_no_hand());
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_particles_ptr() -> *const f32 {
    with_runner(|r| r.particles_ptr())
}

#[wasm_bindgen]
pub fn get_particle_count() -> u32 {
    with_runner(|r| r.particle_count())
}

#[wasm_bindgen]
pub fn get_burst_ranges_ptr() -> *const u32 {
    with_runner(|r| r.ranges_ptr())
}

#[wasm_bindgen]
pub fn get_burst_range_count() -> u32 {
    with_runner(|r| r.range_count())
}

#[wasm_bindgen]
pub fn get_rocket_start() -> u32 {
    with_runner(|r| r.rocket_start())
}

#[wasm_bindgen]
pub fn get_added_ptr() -> *const u32 {
    with_runner(|r| r.added_ptr())
}

#[wasm_bindgen]
pub fn get_added_len() -> u32 {
    with_runner(|r| r.added_len())
}

#[wasm_bindgen]
pub fn get_removed_ptr() -> *const u32 {
    with_runner(|r| r.removed_ptr())
}

#[wasm_bindgen]
pub fn get_removed_len() -> u32 {
    with_runner(|r| r.removed_len())
}

#[wasm_bindgen]
pub fn get_gesture_status() -> u32 {
    with_runner(|r| r.gesture_status())
}

#[wasm_bindgen]
pub fn get_burst_count() -> u32 {
    with_runner(|r| r.burst_count())
}

#[wasm_bindgen]
pub fn get_world_width() -> f32 {
    with_runner(|r| r.world_width())
}

#[wasm_bindgen]
pub fn get_world_height() -> f32 {
    with_runner(|r| r.world_height())
}
