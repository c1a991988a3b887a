use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::types::{BurstKind, Rgb};

/// Errors produced while loading or validating a [`FireworksConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field, reason: reason.into() }
}

/// Particle count, lifetime and launch speed of one kind of burst.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurstProfile {
    pub particle_count: usize,
    /// Seconds until the burst is reaped.
    pub lifetime: f32,
    pub speed_min: f32,
    pub speed_max: f32,
}

impl BurstProfile {
    pub const fn new(particle_count: usize, lifetime: f32, speed_min: f32, speed_max: f32) -> Self {
        Self { particle_count, lifetime, speed_min, speed_max }
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.particle_count == 0 {
            return Err(invalid(field, "particle_count must be positive"));
        }
        if !(self.lifetime.is_finite() && self.lifetime > 0.0) {
            return Err(invalid(field, format!("lifetime must be positive, got {}", self.lifetime)));
        }
        if !(self.speed_min >= 0.0 && self.speed_min <= self.speed_max && self.speed_max.is_finite()) {
            return Err(invalid(
                field,
                format!("speed range {}..{} is not ordered", self.speed_min, self.speed_max),
            ));
        }
        Ok(())
    }
}

/// One profile per [`BurstKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurstProfiles {
    pub primary: BurstProfile,
    pub spark: BurstProfile,
    pub ambient: BurstProfile,
    pub palm: BurstProfile,
    pub rocket: BurstProfile,
}

impl Default for BurstProfiles {
    fn default() -> Self {
        Self {
            primary: BurstProfile::new(450, 3.0, 1.5, 4.0),
            spark: BurstProfile::new(60, 2.5, 0.5, 1.5),
            ambient: BurstProfile::new(400, 3.0, 1.5, 4.0),
            palm: BurstProfile::new(300, 2.5, 1.5, 3.5),
            rocket: BurstProfile::new(500, 3.0, 2.0, 4.0),
        }
    }
}

impl BurstProfiles {
    pub fn get(&self, kind: BurstKind) -> &BurstProfile {
        match kind {
            BurstKind::Primary => &self.primary,
            BurstKind::Spark => &self.spark,
            BurstKind::Ambient => &self.ambient,
            BurstKind::Palm => &self.palm,
            BurstKind::Rocket => &self.rocket,
        }
    }

    pub fn get_mut(&mut self, kind: BurstKind) -> &mut BurstProfile {
        match kind {
            BurstKind::Primary => &mut self.primary,
            BurstKind::Spark => &mut self.spark,
            BurstKind::Ambient => &mut self.ambient,
            BurstKind::Palm => &mut self.palm,
            BurstKind::Rocket => &mut self.rocket,
        }
    }
}

/// Constants of the per-particle update rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    /// Velocity-to-displacement scale.
    pub k_velocity: f32,
    /// Gravity-to-displacement scale.
    pub k_gravity: f32,
    /// Negative means down.
    pub gravity_y: f32,
    /// Per-tick multiplicative velocity decay.
    pub drag: f32,
    /// Randomly dim bursts in the rendered output.
    pub flicker: bool,
    /// Probability that a burst keeps its full opacity on a flicker frame.
    pub flicker_probability: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            k_velocity: 15.0,
            k_gravity: 20.0,
            gravity_y: -0.5,
            drag: 0.96,
            flicker: false,
            flicker_probability: 0.1,
        }
    }
}

/// Whether a held pinch spawns a spark on every detector frame or only the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldPolicy {
    #[default]
    EveryFrame,
    RisingEdge,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Thumb-tip to index-tip distance below which the hand is pinching.
    pub pinch_threshold: f32,
    /// Index-tip to middle-tip distance above which the palm counts as open.
    pub spread_threshold: f32,
    /// Per-frame chance that an open palm fires.
    pub palm_open_probability: f32,
    pub hold_policy: HoldPolicy,
    /// Drop the pinch state when the hand disappears instead of keeping it.
    pub reset_on_hand_lost: bool,
    /// World z for gesture bursts.
    pub z: f32,
    pub spark_color: Rgb,
    pub release_color: Rgb,
    pub palm_color: Rgb,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: 0.05,
            spread_threshold: 0.1,
            palm_open_probability: 0.1,
            hold_policy: HoldPolicy::EveryFrame,
            reset_on_hand_lost: false,
            z: 0.0,
            spark_color: Rgb::CYAN,
            release_color: Rgb::GOLD,
            palm_color: Rgb::WHITE,
        }
    }
}

/// Linear image/screen to world mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// World units spanned by the full view width.
    pub scale_x: f32,
    /// World units spanned by the full view height.
    pub scale_y: f32,
    /// Recompute `scale_x` from the aspect ratio on resize.
    pub lock_aspect: bool,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            scale_x: 80.0,
            scale_y: 60.0,
            lock_aspect: true,
            viewport_width: 1280.0,
            viewport_height: 720.0,
        }
    }
}

/// What the autonomous trigger produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutonomousMode {
    /// Burst immediately at a random point.
    Burst,
    /// Launch a rocket that bursts at its apex.
    #[default]
    Rocket,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutonomousConfig {
    /// Per-tick chance of an autonomous launch. Zero disables it.
    pub probability: f32,
    pub mode: AutonomousMode,
    pub rocket_speed_min: f32,
    pub rocket_speed_max: f32,
    /// Applied to rocket velocity, unlike burst gravity.
    pub rocket_gravity: f32,
}

impl Default for AutonomousConfig {
    fn default() -> Self {
        Self {
            probability: 0.03,
            mode: AutonomousMode::Rocket,
            rocket_speed_min: 25.0,
            rocket_speed_max: 40.0,
            rocket_gravity: -9.8,
        }
    }
}

/// What happens when a spawn would exceed `max_bursts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Ignore the new spawn request.
    DropNewest,
    /// Dispose the oldest live burst to make room.
    #[default]
    EvictOldest,
}

/// Configuration for the whole fireworks engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireworksConfig {
    pub profiles: BurstProfiles,
    pub physics: PhysicsParams,
    pub gesture: GestureConfig,
    pub mapping: MappingConfig,
    pub autonomous: AutonomousConfig,
    /// Maximum concurrent bursts (0 = unbounded).
    pub max_bursts: usize,
    pub overflow: OverflowPolicy,
    /// Delta used for the first frame, before any previous timestamp exists.
    pub nominal_dt: f32,
    /// Upper clamp on frame delta (tab-suspend resume).
    pub max_dt: f32,
}

impl Default for FireworksConfig {
    fn default() -> Self {
        Self {
            profiles: BurstProfiles::default(),
            physics: PhysicsParams::default(),
            gesture: GestureConfig::default(),
            mapping: MappingConfig::default(),
            autonomous: AutonomousConfig::default(),
            max_bursts: 64,
            overflow: OverflowPolicy::EvictOldest,
            nominal_dt: 1.0 / 60.0,
            max_dt: 0.1,
        }
    }
}

impl FireworksConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a config from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.profiles.primary.validate("profiles.primary")?;
        self.profiles.spark.validate("profiles.spark")?;
        self.profiles.ambient.validate("profiles.ambient")?;
        self.profiles.palm.validate("profiles.palm")?;
        self.profiles.rocket.validate("profiles.rocket")?;

        let drag = self.physics.drag;
        if !(drag > 0.0 && drag <= 1.0) {
            return Err(invalid("physics.drag", format!("must be in (0, 1], got {}", drag)));
        }
        check_probability("physics.flicker_probability", self.physics.flicker_probability)?;
        check_probability("gesture.palm_open_probability", self.gesture.palm_open_probability)?;
        check_probability("autonomous.probability", self.autonomous.probability)?;

        if !(self.gesture.pinch_threshold > 0.0) {
            return Err(invalid("gesture.pinch_threshold", "must be positive"));
        }
        if !(self.gesture.spread_threshold > 0.0) {
            return Err(invalid("gesture.spread_threshold", "must be positive"));
        }
        if !(self.mapping.scale_x > 0.0 && self.mapping.scale_y > 0.0) {
            return Err(invalid("mapping", "scales must be positive"));
        }
        if !(self.mapping.viewport_width > 0.0 && self.mapping.viewport_height > 0.0) {
            return Err(invalid("mapping", "viewport must be non-empty"));
        }
        if !(self.autonomous.rocket_speed_min > 0.0
            && self.autonomous.rocket_speed_min <= self.autonomous.rocket_speed_max)
        {
            return Err(invalid("autonomous", "rocket speed range must be positive and ordered"));
        }
        if !(self.nominal_dt > 0.0 && self.max_dt > 0.0) {
            return Err(invalid("max_dt", "frame deltas must be positive"));
        }
        Ok(())
    }

    // -- Builder pattern --

    pub fn with_profile(mut self, kind: BurstKind, profile: BurstProfile) -> Self {
        *self.profiles.get_mut(kind) = profile;
        self
    }

    pub fn with_physics(mut self, physics: PhysicsParams) -> Self {
        self.physics = physics;
        self
    }

    pub fn with_flicker(mut self, flicker: bool) -> Self {
        self.physics.flicker = flicker;
        self
    }

    pub fn with_gesture(mut self, gesture: GestureConfig) -> Self {
        self.gesture = gesture;
        self
    }

    pub fn with_mapping(mut self, mapping: MappingConfig) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn with_autonomous_probability(mut self, probability: f32) -> Self {
        self.autonomous.probability = probability;
        self
    }

    pub fn with_autonomous_mode(mut self, mode: AutonomousMode) -> Self {
        self.autonomous.mode = mode;
        self
    }

    pub fn with_max_bursts(mut self, max_bursts: usize, overflow: OverflowPolicy) -> Self {
        self.max_bursts = max_bursts;
        self.overflow = overflow;
        self
    }
}

fn check_probability(field: &'static str, p: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(invalid(field, format!("probability must be in [0, 1], got {}", p)))
    }
}
