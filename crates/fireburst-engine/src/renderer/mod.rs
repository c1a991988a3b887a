pub mod instance;
pub mod traits;

pub use instance::{BurstRange, ParticleBuffer, ParticleVertex};
pub use traits::{BurstRenderer, NullRenderer, PrimitiveLog};
