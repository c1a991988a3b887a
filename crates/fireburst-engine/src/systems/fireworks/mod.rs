//! Firework simulation: bursts, their physics, rockets, and random sources.

mod rng;
mod physics;
mod burst;
mod rocket;

pub use rng::{RandomSource, Rng, ScriptedRandom};
pub use physics::{integrate, fade, flickered};
pub use burst::Burst;
pub use rocket::Rocket;
