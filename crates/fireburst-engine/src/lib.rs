pub mod api;
pub mod core;
pub mod systems;
pub mod renderer;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::config::{
    FireworksConfig, ConfigError, BurstProfile, BurstProfiles, PhysicsParams,
    GestureConfig, HoldPolicy, MappingConfig, AutonomousConfig, AutonomousMode, OverflowPolicy,
};
pub use api::driver::{FrameDriver, TickReport, KEY_CLEAR};
pub use api::types::{BurstId, BurstKind, Rgb};
pub use crate::core::registry::BurstRegistry;
pub use crate::core::time::FrameClock;
pub use input::queue::{InputEvent, InputQueue};
pub use input::gesture::{GestureReducer, GestureStatus, GestureTrigger, HandLandmark, HandSnapshot};
pub use input::mailbox::{DetectorResult, GestureMailbox};
pub use input::mapping::WorldMapping;
pub use renderer::instance::{ParticleBuffer, ParticleVertex, BurstRange};
pub use renderer::traits::{BurstRenderer, PrimitiveLog, NullRenderer};
pub use systems::fireworks::{Burst, Rocket, RandomSource, Rng, ScriptedRandom};
