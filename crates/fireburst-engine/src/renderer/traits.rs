//! Renderer contract.
//!
//! All drawing happens outside the engine. The renderer is told when a burst
//! needs a GPU primitive and when that primitive can be released; per-frame
//! particle data is read from the [`ParticleBuffer`](super::instance::ParticleBuffer).

use crate::api::types::BurstId;
use crate::systems::fireworks::Burst;

pub trait BurstRenderer {
    /// Called once when a burst enters the registry.
    fn add_primitive(&mut self, burst: &Burst);

    /// Called once when a burst leaves the registry, right before it is dropped.
    fn remove_primitive(&mut self, burst: &Burst);
}

/// Records primitive lifecycle calls so a host can replay them.
/// The web bridge hands these lists to TypeScript once per frame.
#[derive(Debug, Default, Clone)]
pub struct PrimitiveLog {
    pub added: Vec<u32>,
    pub removed: Vec<u32>,
}

impl PrimitiveLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget calls from the previous frame.
    pub fn clear(&mut self) {
        self.added.clear();
        self.removed.clear();
    }

    pub fn was_added(&self, id: BurstId) -> bool {
        self.added.contains(&id.0)
    }

    pub fn was_removed(&self, id: BurstId) -> bool {
        self.removed.contains(&id.0)
    }
}

impl BurstRenderer for PrimitiveLog {
    fn add_primitive(&mut self, burst: &Burst) {
        self.added.push(burst.id().0);
    }

    fn remove_primitive(&mut self, burst: &Burst) {
        self.removed.push(burst.id().0);
    }
}

/// Ignores every call.
pub struct NullRenderer;

impl BurstRenderer for NullRenderer {
    fn add_primitive(&mut self, _burst: &Burst) {}
    fn remove_primitive(&mut self, _burst: &Burst) {}
}
