use glam::Vec3;

use crate::api::config::{AutonomousMode, FireworksConfig};
use crate::api::types::{BurstId, BurstKind, Rgb};
use crate::core::registry::BurstRegistry;
use crate::core::time::FrameClock;
use crate::input::gesture::{GestureReducer, GestureStatus};
use crate::input::mailbox::{DetectorResult, GestureMailbox};
use crate::input::mapping::WorldMapping;
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::instance::ParticleBuffer;
use crate::renderer::traits::BurstRenderer;
use crate::systems::fireworks::{RandomSource, Rng, Rocket};

/// Key code that clears every burst.
pub const KEY_CLEAR: u32 = 67;

/// Summary of one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    pub dt: f32,
    pub spawned: usize,
    pub disposed: usize,
    pub live: usize,
}

/// Owns all simulation state and runs the per-frame sequence:
/// input → gesture triggers → autonomous triggers → rockets → registry → renderer.
pub struct FrameDriver {
    config: FireworksConfig,
    clock: FrameClock,
    registry: BurstRegistry,
    reducer: GestureReducer,
    mailbox: GestureMailbox,
    input: InputQueue,
    mapping: WorldMapping,
    rockets: Vec<Rocket>,
    particles: ParticleBuffer,
    rng: Box<dyn RandomSource>,
    spawned: Vec<BurstId>,
    frame: u64,
}

impl FrameDriver {
    pub fn new(config: FireworksConfig, seed: u64) -> Self {
        Self::with_rng(config, Box::new(Rng::new(seed)))
    }

    pub fn with_rng(config: FireworksConfig, rng: Box<dyn RandomSource>) -> Self {
        let max_vertices = config.profiles.primary.particle_count * config.max_bursts.max(1);
        Self {
            clock: FrameClock::new(config.nominal_dt, config.max_dt),
            registry: BurstRegistry::new(&config),
            reducer: GestureReducer::new(config.gesture),
            mailbox: GestureMailbox::new(),
            input: InputQueue::new(),
            mapping: WorldMapping::new(&config.mapping),
            rockets: Vec::new(),
            particles: ParticleBuffer::with_capacity(max_vertices.min(1 << 16)),
            rng,
            spawned: Vec::new(),
            frame: 0,
            config,
        }
    }

    /// Queue a host input event for the next tick.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Store the latest detector result. Overwrites any unread result.
    pub fn post_detection(&mut self, result: DetectorResult) {
        self.mailbox.post(result);
    }

    /// Store raw detector output (`21 * 3` floats).
    pub fn post_landmarks(&mut self, flat: &[f32]) {
        self.mailbox.post_flat(flat);
    }

    /// Run one frame at wall-clock time `now` (seconds).
    pub fn tick(&mut self, now: f64, renderer: &mut dyn BurstRenderer) -> TickReport {
        let dt = self.clock.delta(now);
        self.step(dt, renderer)
    }

    /// Run one frame with an explicit delta, clamped to `max_dt`.
    pub fn step(&mut self, dt: f32, renderer: &mut dyn BurstRenderer) -> TickReport {
        self.frame += 1;

        for event in self.input.drain() {
            self.handle_input(event);
        }

        if let Some(result) = self.mailbox.take() {
            let triggers = self.reducer.process(result.snapshot(), &self.mapping, self.rng.as_mut());
            for trigger in triggers {
                let color = trigger.color(self.reducer.config());
                self.spawn(trigger.point(), color, trigger.burst_kind());
            }
        }

        self.sample_autonomous();

        let dt = if dt.is_finite() { dt.min(self.config.max_dt) } else { 0.0 };
        if dt > 0.0 {
            self.advance_rockets(dt);
            self.registry.tick(dt);
        }

        // Covers bursts spawned since the previous step, not only during this one.
        let spawned = std::mem::take(&mut self.spawned);
        let disposed = self.registry.drain_disposed();
        for burst in &disposed {
            // Spawned and disposed before any step announced it: the renderer never saw it.
            if !spawned.contains(&burst.id()) {
                renderer.remove_primitive(burst);
            }
        }
        for id in &spawned {
            if let Some(burst) = self.registry.get(*id) {
                renderer.add_primitive(burst);
            }
        }
        if !disposed.is_empty() {
            log::debug!("frame {}: disposed {} bursts", self.frame, disposed.len());
        }

        self.particles.rebuild(
            self.registry.iter(),
            &self.rockets,
            &self.config.physics,
            self.rng.as_mut(),
        );

        TickReport {
            dt,
            spawned: spawned.len(),
            disposed: disposed.len(),
            live: self.registry.len(),
        }
    }

    /// Spawn a burst now. It is announced to the renderer at the end of the tick.
    pub fn spawn(&mut self, origin: Vec3, color: Rgb, kind: BurstKind) -> Option<BurstId> {
        let id = self.registry.spawn_kind(origin, color, kind, self.rng.as_mut())?;
        log::debug!("spawned {:?} burst {:?} at {:?}", kind, id, origin);
        self.spawned.push(id);
        Some(id)
    }

    /// Launch a rocket from the bottom of the view.
    pub fn launch_rocket(&mut self) {
        let (hx, hy) = self.mapping.half_extents();
        let auto = &self.config.autonomous;
        let x = self.rng.range(-hx * 0.8, hx * 0.8);
        let speed = self.rng.range(auto.rocket_speed_min, auto.rocket_speed_max);
        let apex = self.rng.range(0.0, hy * 0.8);
        let color = Rgb::random_vivid(self.rng.as_mut());
        self.rockets.push(Rocket::new(
            Vec3::new(x, -hy, self.config.gesture.z),
            Vec3::new(0.0, speed, 0.0),
            apex,
            color,
        ));
    }

    /// Dispose every burst and rocket. Renderer removals happen on the next tick.
    pub fn clear(&mut self) {
        self.registry.clear();
        self.rockets.clear();
    }

    fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { x, y } => {
                let point = self.mapping.from_screen(x, y, self.config.gesture.z);
                let color = Rgb::random_vivid(self.rng.as_mut());
                self.spawn(point, color, BurstKind::Primary);
            }
            InputEvent::KeyDown { key_code } => {
                if key_code == KEY_CLEAR {
                    log::info!("clearing {} bursts", self.registry.len());
                    self.clear();
                }
            }
            InputEvent::Resize { width, height } => {
                self.mapping.resize(width, height);
            }
        }
    }

    fn sample_autonomous(&mut self) {
        let auto = self.config.autonomous;
        if auto.probability <= 0.0 || !self.rng.chance(auto.probability) {
            return;
        }
        match auto.mode {
            AutonomousMode::Rocket => self.launch_rocket(),
            AutonomousMode::Burst => {
                let (hx, hy) = self.mapping.half_extents();
                let point = Vec3::new(
                    self.rng.range(-hx, hx),
                    self.rng.range(0.0, hy),
                    self.config.gesture.z,
                );
                let color = Rgb::random_vivid(self.rng.as_mut());
                self.spawn(point, color, BurstKind::Ambient);
            }
        }
    }

    fn advance_rockets(&mut self, dt: f32) {
        let gravity = self.config.autonomous.rocket_gravity;
        let mut apexes = Vec::new();
        for rocket in &mut self.rockets {
            if rocket.tick(dt, gravity) {
                apexes.push((rocket.position, rocket.color));
            }
        }
        self.rockets.retain(|r| !r.has_exploded());
        for (point, color) in apexes {
            self.spawn(point, color, BurstKind::Rocket);
        }
    }

    pub fn registry(&self) -> &BurstRegistry {
        &self.registry
    }

    pub fn rockets(&self) -> &[Rocket] {
        &self.rockets
    }

    pub fn particles(&self) -> &ParticleBuffer {
        &self.particles
    }

    pub fn mapping(&self) -> &WorldMapping {
        &self.mapping
    }

    pub fn gesture_status(&self) -> GestureStatus {
        self.reducer.status()
    }

    pub fn config(&self) -> &FireworksConfig {
        &self.config
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}
