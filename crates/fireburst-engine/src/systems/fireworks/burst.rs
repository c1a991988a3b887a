//! A single firework explosion: one group of particles with a shared origin,
//! color and lifetime.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::api::config::{BurstProfile, PhysicsParams};
use crate::api::types::{BurstId, BurstKind, Rgb};
use super::physics;
use super::rng::RandomSource;

#[derive(Debug, Clone)]
pub struct Burst {
    id: BurstId,
    kind: BurstKind,
    origin: Vec3,
    color: Rgb,
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    age: f32,
    lifetime: f32,
    alive: bool,
}

impl Burst {
    /// Spawn a burst with velocities sampled uniformly over the sphere.
    pub fn new(
        id: BurstId,
        kind: BurstKind,
        origin: Vec3,
        color: Rgb,
        profile: &BurstProfile,
        rng: &mut dyn RandomSource,
    ) -> Self {
        debug_assert!(profile.particle_count > 0, "burst needs at least one particle");
        let velocities: Vec<Vec3> = (0..profile.particle_count)
            .map(|_| sample_velocity(profile.speed_min, profile.speed_max, rng))
            .collect();
        Burst {
            id,
            kind,
            origin,
            color,
            positions: vec![origin; profile.particle_count],
            velocities,
            age: 0.0,
            lifetime: profile.lifetime,
            alive: true,
        }
    }

    /// Integrate one tick. Returns true on the single tick the burst dies.
    pub fn advance(&mut self, dt: f32, params: &PhysicsParams) -> bool {
        if !self.alive {
            return false;
        }
        physics::integrate(&mut self.positions, &mut self.velocities, dt, params);
        self.age += dt;
        if self.age > self.lifetime {
            self.alive = false;
            return true;
        }
        false
    }

    /// `max(0, 1 - age / lifetime)`.
    pub fn opacity(&self) -> f32 {
        physics::fade(self.age, self.lifetime)
    }

    pub fn id(&self) -> BurstId {
        self.id
    }

    pub fn kind(&self) -> BurstKind {
        self.kind
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    pub fn particle_count(&self) -> usize {
        self.positions.len()
    }

    pub fn age(&self) -> f32 {
        self.age
    }

    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }
}

fn sample_velocity(speed_min: f32, speed_max: f32, rng: &mut dyn RandomSource) -> Vec3 {
    let theta = rng.next_f32() * TAU;
    let phi = (2.0 * rng.next_f32() - 1.0).acos();
    let speed = rng.range(speed_min, speed_max);
    Vec3::new(
        phi.sin() * theta.cos(),
        phi.sin() * theta.sin(),
        phi.cos(),
    ) * speed
}
