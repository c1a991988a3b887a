use fireburst_engine::{
    DetectorResult, FireworksConfig, FrameDriver, GestureStatus, InputEvent, PrimitiveLog,
    TickReport,
};

/// Wires the engine loop to the page.
///
/// The exported `#[wasm_bindgen]` functions in `lib.rs` keep one runner in a
/// `thread_local!` and forward to it; TypeScript reads the particle buffer and
/// primitive lists straight out of wasm memory after each tick.
pub struct FireworksRunner {
    driver: FrameDriver,
    primitives: PrimitiveLog,
    last_report: TickReport,
}

impl FireworksRunner {
    pub fn new(config: FireworksConfig, seed: u64) -> Self {
        Self {
            driver: FrameDriver::new(config, seed),
            primitives: PrimitiveLog::new(),
            last_report: TickReport::default(),
        }
    }

    /// Build a runner from a JSON config, falling back to defaults when it is
    /// missing or invalid.
    pub fn from_json(json: Option<&str>, seed: u64) -> Self {
        let config = match json {
            None => FireworksConfig::default(),
            Some(json) => match FireworksConfig::from_json(json) {
                Ok(config) => {
                    log::info!("loaded fireworks config ({} max bursts)", config.max_bursts);
                    config
                }
                Err(err) => {
                    log::error!("{}; using default config", err);
                    FireworksConfig::default()
                }
            },
        };
        Self::new(config, seed)
    }

    /// Run one frame. `now_ms` is a `performance.now()` timestamp.
    pub fn tick(&mut self, now_ms: f64) {
        self.primitives.clear();
        self.last_report = self.driver.tick(now_ms / 1000.0, &mut self.primitives);
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.driver.push_input(event);
    }

    pub fn post_landmarks(&mut self, flat: &[f32]) {
        self.driver.post_landmarks(flat);
    }

    pub fn post_no_hand(&mut self) {
        self.driver.post_detection(DetectorResult::NoHand);
    }

    // ---- Pointer accessors for wasm memory reads ----

    pub fn particles_ptr(&self) -> *const f32 {
        self.driver.particles().vertices_ptr()
    }

    pub fn particle_count(&self) -> u32 {
        self.driver.particles().vertex_count()
    }

    pub fn ranges_ptr(&self) -> *const u32 {
        self.driver.particles().ranges_ptr()
    }

    pub fn range_count(&self) -> u32 {
        self.driver.particles().range_count()
    }

    pub fn rocket_start(&self) -> u32 {
        self.driver.particles().rocket_start
    }

    pub fn added_ptr(&self) -> *const u32 {
        self.primitives.added.as_ptr()
    }

    pub fn added_len(&self) -> u32 {
        self.primitives.added.len() as u32
    }

    pub fn removed_ptr(&self) -> *const u32 {
        self.primitives.removed.as_ptr()
    }

    pub fn removed_len(&self) -> u32 {
        self.primitives.removed.len() as u32
    }

    /// 0 = idle, 1 = tracking, 2 = pinching.
    pub fn gesture_status(&self) -> u32 {
        match self.driver.gesture_status() {
            GestureStatus::Idle => 0,
            GestureStatus::Tracking => 1,
            GestureStatus::Pinching => 2,
        }
    }

    pub fn burst_count(&self) -> u32 {
        self.driver.registry().len() as u32
    }

    pub fn world_width(&self) -> f32 {
        self.driver.mapping().scale().0
    }

    pub fn world_height(&self) -> f32 {
        self.driver.mapping().scale().1
    }

    pub fn last_report(&self) -> TickReport {
        self.last_report
    }
}
