//! Per-particle update rule shared by every burst.
//!
//! Gravity displaces `position.y` directly instead of accumulating into
//! velocity. This is not Newtonian, and it is what gives bursts their look.

use glam::Vec3;

use crate::api::config::PhysicsParams;
use super::rng::RandomSource;

/// Advance one burst's particles by `dt` seconds.
pub fn integrate(positions: &mut [Vec3], velocities: &mut [Vec3], dt: f32, params: &PhysicsParams) {
    debug_assert_eq!(positions.len(), velocities.len());
    let fall = params.gravity_y * dt * params.k_gravity;
    for (pos, vel) in positions.iter_mut().zip(velocities.iter_mut()) {
        *pos += *vel * (dt * params.k_velocity);
        pos.y += fall;
        *vel *= params.drag;
    }
}

/// Linear fade from 1 at birth to 0 at `lifetime`, never negative.
pub fn fade(age: f32, lifetime: f32) -> f32 {
    (1.0 - age / lifetime).clamp(0.0, 1.0)
}

/// Rendered opacity with the optional flicker applied.
///
/// On a flicker frame the burst keeps its opacity only when the coin-flip
/// succeeds; otherwise it is scaled by a random factor.
pub fn flickered(opacity: f32, params: &PhysicsParams, rng: &mut dyn RandomSource) -> f32 {
    if !params.flicker || rng.chance(params.flicker_probability) {
        opacity
    } else {
        opacity * rng.next_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::fireworks::rng::ScriptedRandom;

    #[test]
    fn gravity_moves_position_not_velocity() {
        let params = PhysicsParams::default();
        let mut positions = vec![Vec3::ZERO];
        let mut velocities = vec![Vec3::ZERO];
        integrate(&mut positions, &mut velocities, 0.1, &params);
        assert!(positions[0].y < 0.0);
        assert_eq!(velocities[0], Vec3::ZERO);
        let expected = params.gravity_y * 0.1 * params.k_gravity;
        assert!((positions[0].y - expected).abs() < 1e-6);
    }

    #[test]
    fn velocity_scaled_and_dragged() {
        let params = PhysicsParams { gravity_y: 0.0, ..PhysicsParams::default() };
        let mut positions = vec![Vec3::ZERO];
        let mut velocities = vec![Vec3::new(2.0, 0.0, 0.0)];
        integrate(&mut positions, &mut velocities, 0.5, &params);
        assert!((positions[0].x - 2.0 * 0.5 * 15.0).abs() < 1e-5);
        assert!((velocities[0].x - 2.0 * params.drag).abs() < 1e-6);
    }

    #[test]
    fn fade_is_clamped() {
        assert_eq!(fade(0.0, 3.0), 1.0);
        assert_eq!(fade(4.0, 3.0), 0.0);
        assert!((fade(1.5, 3.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn flicker_disabled_is_identity() {
        let params = PhysicsParams::default();
        let mut rng = ScriptedRandom::constant(0.5);
        assert_eq!(flickered(0.8, &params, &mut rng), 0.8);
    }

    #[test]
    fn flicker_dims_when_coin_fails() {
        let params = PhysicsParams { flicker: true, ..PhysicsParams::default() };
        // 0.5 fails the 0.1 coin-flip, then 0.5 is the dimming factor.
        let mut rng = ScriptedRandom::constant(0.5);
        assert!((flickered(0.8, &params, &mut rng) - 0.4).abs() < 1e-6);
        // 0.05 passes the coin-flip.
        let mut rng = ScriptedRandom::constant(0.05);
        assert_eq!(flickered(0.8, &params, &mut rng), 0.8);
    }
}
