//! Launch-trajectory fireworks: a single point that rises and bursts at its apex.

use glam::Vec3;

use crate::api::types::Rgb;

#[derive(Debug, Clone)]
pub struct Rocket {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Height at which the rocket bursts.
    pub apex: f32,
    pub color: Rgb,
    exploded: bool,
}

impl Rocket {
    pub fn new(position: Vec3, velocity: Vec3, apex: f32, color: Rgb) -> Self {
        Self { position, velocity, apex, color, exploded: false }
    }

    /// Advance the rocket. Returns true on the single tick it reaches its apex
    /// (or stalls) and should burst.
    pub fn tick(&mut self, dt: f32, gravity: f32) -> bool {
        if self.exploded {
            return false;
        }
        self.position += self.velocity * dt;
        self.velocity.y += gravity * dt;
        if self.position.y >= self.apex || self.velocity.y <= 0.0 {
            self.exploded = true;
            return true;
        }
        false
    }

    pub fn has_exploded(&self) -> bool {
        self.exploded
    }
}
