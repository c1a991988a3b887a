//! Reduces a per-frame hand landmark stream to discrete trigger events.
//!
//! One hand is tracked. The only persisted state is whether the previous
//! detector frame was pinching; release fires on the falling edge of a pinch.

use glam::{Vec2, Vec3};

use crate::api::config::{GestureConfig, HoldPolicy};
use crate::api::types::{BurstKind, Rgb};
use crate::input::mapping::WorldMapping;
use crate::systems::fireworks::RandomSource;

pub const LANDMARK_COUNT: usize = 21;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_TIP: usize = 12;

/// Floats per landmark in flat detector output: x, y, z.
pub const LANDMARK_FLOATS: usize = 3;

/// A landmark in normalized image space (`[0, 1]` per axis, y down).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HandLandmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl HandLandmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    fn xy(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// One detector frame for a single hand.
#[derive(Debug, Clone, PartialEq)]
pub struct HandSnapshot {
    pub landmarks: [HandLandmark; LANDMARK_COUNT],
}

impl HandSnapshot {
    pub fn new(landmarks: [HandLandmark; LANDMARK_COUNT]) -> Self {
        Self { landmarks }
    }

    /// Parse `21 * 3` floats (x, y, z per landmark). Returns `None` for short
    /// or non-finite input.
    pub fn from_flat(data: &[f32]) -> Option<Self> {
        if data.len() < LANDMARK_COUNT * LANDMARK_FLOATS {
            return None;
        }
        let mut landmarks = [HandLandmark::default(); LANDMARK_COUNT];
        for (lm, chunk) in landmarks.iter_mut().zip(data.chunks_exact(LANDMARK_FLOATS)) {
            *lm = HandLandmark::new(chunk[0], chunk[1], chunk[2]);
            if !lm.is_finite() {
                return None;
            }
        }
        Some(Self { landmarks })
    }

    /// Thumb-tip to index-tip distance in image space.
    pub fn pinch_distance(&self) -> f32 {
        self.landmarks[THUMB_TIP].xy().distance(self.landmarks[INDEX_TIP].xy())
    }

    /// Index-tip to middle-tip distance in image space.
    pub fn spread_distance(&self) -> f32 {
        self.landmarks[INDEX_TIP].xy().distance(self.landmarks[MIDDLE_TIP].xy())
    }

    pub fn index_tip(&self) -> HandLandmark {
        self.landmarks[INDEX_TIP]
    }
}

/// Coarse tracker status for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureStatus {
    /// No hand in the latest detector frame.
    #[default]
    Idle,
    Tracking,
    Pinching,
}

/// A discrete request produced by the reducer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureTrigger {
    /// The hand is pinching. `onset` marks the first frame of the pinch.
    PinchHold { point: Vec3, onset: bool },
    /// A held pinch was let go.
    PinchRelease { point: Vec3 },
    /// The fingers are spread.
    PalmOpen { point: Vec3 },
}

impl GestureTrigger {
    pub fn point(&self) -> Vec3 {
        match *self {
            GestureTrigger::PinchHold { point, .. }
            | GestureTrigger::PinchRelease { point }
            | GestureTrigger::PalmOpen { point } => point,
        }
    }

    pub fn burst_kind(&self) -> BurstKind {
        match self {
            GestureTrigger::PinchHold { .. } => BurstKind::Spark,
            GestureTrigger::PinchRelease { .. } => BurstKind::Primary,
            GestureTrigger::PalmOpen { .. } => BurstKind::Palm,
        }
    }

    pub fn color(&self, config: &GestureConfig) -> Rgb {
        match self {
            GestureTrigger::PinchHold { .. } => config.spark_color,
            GestureTrigger::PinchRelease { .. } => config.release_color,
            GestureTrigger::PalmOpen { .. } => config.palm_color,
        }
    }
}

pub struct GestureReducer {
    config: GestureConfig,
    pinching: bool,
    status: GestureStatus,
}

impl GestureReducer {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            pinching: false,
            status: GestureStatus::Idle,
        }
    }

    /// Feed one detector frame. `None` means no hand was found.
    pub fn process(
        &mut self,
        snapshot: Option<&HandSnapshot>,
        mapping: &WorldMapping,
        rng: &mut dyn RandomSource,
    ) -> Vec<GestureTrigger> {
        let mut triggers = Vec::new();

        let hand = match snapshot {
            Some(hand) => hand,
            None => {
                if self.status != GestureStatus::Idle {
                    log::trace!("hand lost (pinching={})", self.pinching);
                }
                self.status = GestureStatus::Idle;
                if self.config.reset_on_hand_lost {
                    self.pinching = false;
                }
                return triggers;
            }
        };

        let tip = hand.index_tip();
        let point = mapping.from_landmark(tip.x, tip.y, self.config.z);

        if hand.pinch_distance() < self.config.pinch_threshold {
            let onset = !self.pinching;
            if onset {
                log::trace!("pinch start at {:?}", point);
            }
            if onset || self.config.hold_policy == HoldPolicy::EveryFrame {
                triggers.push(GestureTrigger::PinchHold { point, onset });
            }
            self.pinching = true;
        } else if self.pinching {
            log::trace!("pinch release at {:?}", point);
            triggers.push(GestureTrigger::PinchRelease { point });
            self.pinching = false;
        }

        if hand.spread_distance() > self.config.spread_threshold
            && rng.chance(self.config.palm_open_probability)
        {
            let (hx, hy) = mapping.half_extents();
            let point = Vec3::new(rng.range(-hx, hx), rng.range(0.0, hy), self.config.z);
            triggers.push(GestureTrigger::PalmOpen { point });
        }

        self.status = if self.pinching {
            GestureStatus::Pinching
        } else {
            GestureStatus::Tracking
        };
        triggers
    }

    pub fn is_pinching(&self) -> bool {
        self.pinching
    }

    pub fn status(&self) -> GestureStatus {
        self.status
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::MappingConfig;
    use crate::systems::fireworks::ScriptedRandom;

    /// A hand with the index tip at (ix, iy), the thumb `pinch` to its left and
    /// the middle tip `spread` below it.
    fn hand(ix: f32, iy: f32, pinch: f32, spread: f32) -> HandSnapshot {
        let mut landmarks = [HandLandmark::new(0.5, 0.8, 0.0); LANDMARK_COUNT];
        landmarks[INDEX_TIP] = HandLandmark::new(ix, iy, 0.0);
        landmarks[THUMB_TIP] = HandLandmark::new(ix - pinch, iy, 0.0);
        landmarks[MIDDLE_TIP] = HandLandmark::new(ix, iy + spread, 0.0);
        HandSnapshot::new(landmarks)
    }

    fn mapping() -> WorldMapping {
        WorldMapping::new(&MappingConfig::default())
    }

    /// Never passes a 0.1 coin-flip.
    fn quiet_rng() -> ScriptedRandom {
        ScriptedRandom::constant(0.99)
    }

    #[test]
    fn distances() {
        let h = hand(0.5, 0.5, 0.03, 0.2);
        assert!((h.pinch_distance() - 0.03).abs() < 1e-6);
        assert!((h.spread_distance() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn from_flat_parses_and_rejects() {
        let mut flat = vec![0.5f32; LANDMARK_COUNT * LANDMARK_FLOATS];
        flat[INDEX_TIP * 3] = 0.25;
        let snap = HandSnapshot::from_flat(&flat).unwrap();
        assert_eq!(snap.index_tip().x, 0.25);

        assert!(HandSnapshot::from_flat(&flat[..10]).is_none());
        flat[5] = f32::NAN;
        assert!(HandSnapshot::from_flat(&flat).is_none());
    }

    #[test]
    fn pinch_held_then_released_every_frame_policy() {
        let mut reducer = GestureReducer::new(GestureConfig::default());
        let m = mapping();
        let mut rng = quiet_rng();

        let pinched = hand(0.4, 0.4, 0.01, 0.02);
        let open = hand(0.4, 0.4, 0.2, 0.02);

        let mut holds = Vec::new();
        let mut releases = Vec::new();
        for frame in 1..=8 {
            let snap = if (1..=5).contains(&frame) { &pinched } else { &open };
            for t in reducer.process(Some(snap), &m, &mut rng) {
                match t {
                    GestureTrigger::PinchHold { onset, .. } => holds.push((frame, onset)),
                    GestureTrigger::PinchRelease { .. } => releases.push(frame),
                    GestureTrigger::PalmOpen { .. } => panic!("unexpected palm"),
                }
            }
        }

        assert_eq!(holds, vec![(1, true), (2, false), (3, false), (4, false), (5, false)]);
        assert_eq!(releases, vec![6]);
        assert!(!reducer.is_pinching());
    }

    #[test]
    fn rising_edge_policy_emits_single_hold() {
        let config = GestureConfig { hold_policy: HoldPolicy::RisingEdge, ..GestureConfig::default() };
        let mut reducer = GestureReducer::new(config);
        let m = mapping();
        let mut rng = quiet_rng();
        let pinched = hand(0.4, 0.4, 0.01, 0.02);
        let open = hand(0.4, 0.4, 0.2, 0.02);

        let mut per_frame = Vec::new();
        for frame in 1..=6 {
            let snap = if frame <= 5 { &pinched } else { &open };
            per_frame.push(reducer.process(Some(snap), &m, &mut rng));
        }
        assert_eq!(per_frame[0].len(), 1);
        assert!(matches!(per_frame[0][0], GestureTrigger::PinchHold { onset: true, .. }));
        assert!(per_frame[1..5].iter().all(Vec::is_empty));
        assert!(matches!(per_frame[5][..], [GestureTrigger::PinchRelease { .. }]));
    }

    #[test]
    fn no_release_without_prior_pinch() {
        let mut reducer = GestureReducer::new(GestureConfig::default());
        let m = mapping();
        let mut rng = quiet_rng();
        let open = hand(0.4, 0.4, 0.2, 0.02);
        for _ in 0..10 {
            assert!(reducer.process(Some(&open), &m, &mut rng).is_empty());
        }
        assert_eq!(reducer.status(), GestureStatus::Tracking);
    }

    #[test]
    fn trigger_point_is_mirrored_index_tip() {
        let mut reducer = GestureReducer::new(GestureConfig::default());
        let m = mapping();
        let mut rng = quiet_rng();
        let triggers = reducer.process(Some(&hand(0.25, 0.75, 0.01, 0.02)), &m, &mut rng);
        let (sx, sy) = m.scale();
        assert_eq!(triggers[0].point(), Vec3::new(0.25 * sx, -0.25 * sy, 0.0));
        assert_eq!(triggers[0].burst_kind(), BurstKind::Spark);
        assert_eq!(triggers[0].color(reducer.config()), Rgb::CYAN);
    }

    #[test]
    fn hand_loss_is_sticky_by_default() {
        let mut reducer = GestureReducer::new(GestureConfig::default());
        let m = mapping();
        let mut rng = quiet_rng();
        reducer.process(Some(&hand(0.4, 0.4, 0.01, 0.02)), &m, &mut rng);
        assert_eq!(reducer.status(), GestureStatus::Pinching);

        assert!(reducer.process(None, &m, &mut rng).is_empty());
        assert_eq!(reducer.status(), GestureStatus::Idle);
        assert!(reducer.is_pinching());

        // Hand returns already open: the stale pinch releases.
        let triggers = reducer.process(Some(&hand(0.4, 0.4, 0.2, 0.02)), &m, &mut rng);
        assert!(matches!(triggers[..], [GestureTrigger::PinchRelease { .. }]));
    }

    #[test]
    fn hand_loss_resets_when_configured() {
        let config = GestureConfig { reset_on_hand_lost: true, ..GestureConfig::default() };
        let mut reducer = GestureReducer::new(config);
        let m = mapping();
        let mut rng = quiet_rng();
        reducer.process(Some(&hand(0.4, 0.4, 0.01, 0.02)), &m, &mut rng);
        reducer.process(None, &m, &mut rng);
        assert!(!reducer.is_pinching());
        let triggers = reducer.process(Some(&hand(0.4, 0.4, 0.2, 0.02)), &m, &mut rng);
        assert!(triggers.is_empty());
    }

    #[test]
    fn palm_open_is_throttled_not_edge_triggered() {
        let mut reducer = GestureReducer::new(GestureConfig::default());
        let m = mapping();
        let spread = hand(0.5, 0.5, 0.2, 0.3);

        // Coin-flip succeeds every frame: fires on each qualifying frame.
        let mut rng = ScriptedRandom::constant(0.05);
        for _ in 0..3 {
            let triggers = reducer.process(Some(&spread), &m, &mut rng);
            assert!(matches!(triggers[..], [GestureTrigger::PalmOpen { .. }]));
            let p = triggers[0].point();
            let (hx, hy) = m.half_extents();
            assert!(p.x.abs() <= hx && p.y >= 0.0 && p.y <= hy);
            assert_eq!(triggers[0].color(reducer.config()), Rgb::WHITE);
        }

        // Coin-flip fails: nothing.
        let mut rng = quiet_rng();
        assert!(reducer.process(Some(&spread), &m, &mut rng).is_empty());
    }

    #[test]
    fn palm_requires_spread() {
        let mut reducer = GestureReducer::new(GestureConfig::default());
        let m = mapping();
        let mut rng = ScriptedRandom::constant(0.0);
        let closed = hand(0.5, 0.5, 0.2, 0.05);
        assert!(reducer.process(Some(&closed), &m, &mut rng).is_empty());
    }

    #[test]
    fn pinch_and_palm_in_same_frame() {
        let mut reducer = GestureReducer::new(GestureConfig::default());
        let m = mapping();
        let mut rng = ScriptedRandom::constant(0.0);
        let triggers = reducer.process(Some(&hand(0.5, 0.5, 0.01, 0.3)), &m, &mut rng);
        assert_eq!(triggers.len(), 2);
        assert!(matches!(triggers[0], GestureTrigger::PinchHold { .. }));
        assert!(matches!(triggers[1], GestureTrigger::PalmOpen { .. }));
    }
}
