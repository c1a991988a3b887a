use bytemuck::{Pod, Zeroable};

use crate::api::config::PhysicsParams;
use crate::systems::fireworks::{flickered, Burst, RandomSource, Rocket};

/// Per-particle render data shared with the TypeScript renderer.
/// Must match the TypeScript protocol: 7 floats = 28 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub alpha: f32,
}

impl ParticleVertex {
    pub const FLOATS: usize = 7;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Where one burst's particles live inside the vertex array.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct BurstRange {
    pub burst_id: u32,
    pub start: u32,
    pub count: u32,
}

impl BurstRange {
    pub const WORDS: usize = 3;
}

/// Flat per-frame particle data: bursts first (grouped by burst), rocket heads last.
pub struct ParticleBuffer {
    pub vertices: Vec<ParticleVertex>,
    pub ranges: Vec<BurstRange>,
    /// Index where rocket vertices begin.
    pub rocket_start: u32,
}

impl ParticleBuffer {
    pub fn new() -> Self {
        Self::with_capacity(16384)
    }

    pub fn with_capacity(max_vertices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(max_vertices),
            ranges: Vec::with_capacity(64),
            rocket_start: 0,
        }
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.ranges.clear();
        self.rocket_start = 0;
    }

    /// Rebuild from the live bursts and rockets.
    pub fn rebuild<'a>(
        &mut self,
        bursts: impl Iterator<Item = &'a Burst>,
        rockets: &[Rocket],
        physics: &PhysicsParams,
        rng: &mut dyn RandomSource,
    ) {
        self.clear();

        for burst in bursts {
            let alpha = flickered(burst.opacity(), physics, rng);
            let [r, g, b] = burst.color().to_array();
            let start = self.vertices.len() as u32;
            self.vertices.extend(burst.positions().iter().map(|p| ParticleVertex {
                x: p.x,
                y: p.y,
                z: p.z,
                r,
                g,
                b,
                alpha,
            }));
            self.ranges.push(BurstRange {
                burst_id: burst.id().0,
                start,
                count: burst.particle_count() as u32,
            });
        }

        self.rocket_start = self.vertices.len() as u32;
        for rocket in rockets.iter().filter(|r| !r.has_exploded()) {
            let [r, g, b] = rocket.color.to_array();
            self.vertices.push(ParticleVertex {
                x: rocket.position.x,
                y: rocket.position.y,
                z: rocket.position.z,
                r,
                g,
                b,
                alpha: 1.0,
            });
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn range_count(&self) -> u32 {
        self.ranges.len() as u32
    }

    /// Raw pointer to vertex data for JS reads out of wasm memory.
    pub fn vertices_ptr(&self) -> *const f32 {
        self.vertices.as_ptr() as *const f32
    }

    pub fn ranges_ptr(&self) -> *const u32 {
        self.ranges.as_ptr() as *const u32
    }

    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }
}

impl Default for ParticleBuffer {
    fn default() -> Self {
        Self::new()
    }
}
