use std::collections::VecDeque;

use glam::Vec3;

use crate::api::config::{BurstProfiles, FireworksConfig, OverflowPolicy, PhysicsParams};
use crate::api::types::{BurstId, BurstKind, Rgb};
use crate::systems::fireworks::{Burst, RandomSource};

/// Insertion-ordered storage of live bursts.
///
/// Bursts that die (or are evicted, or cleared) move into a disposal list
/// exactly once; the owner drains it to release renderer resources.
pub struct BurstRegistry {
    bursts: VecDeque<Burst>,
    disposed: Vec<Burst>,
    profiles: BurstProfiles,
    physics: PhysicsParams,
    max_bursts: usize,
    overflow: OverflowPolicy,
    next_id: u32,
}

impl BurstRegistry {
    pub fn new(config: &FireworksConfig) -> Self {
        Self {
            bursts: VecDeque::with_capacity(config.max_bursts.min(256)),
            disposed: Vec::new(),
            profiles: config.profiles.clone(),
            physics: config.physics,
            max_bursts: config.max_bursts,
            overflow: config.overflow,
            next_id: 1,
        }
    }

    /// Spawn a primary burst.
    pub fn spawn(&mut self, origin: Vec3, color: Rgb, rng: &mut dyn RandomSource) -> Option<BurstId> {
        self.spawn_kind(origin, color, BurstKind::Primary, rng)
    }

    /// Spawn a burst using the profile for `kind`. Returns `None` when the
    /// registry is full and the overflow policy drops new bursts.
    pub fn spawn_kind(
        &mut self,
        origin: Vec3,
        color: Rgb,
        kind: BurstKind,
        rng: &mut dyn RandomSource,
    ) -> Option<BurstId> {
        if self.max_bursts > 0 && self.bursts.len() >= self.max_bursts {
            match self.overflow {
                OverflowPolicy::DropNewest => {
                    log::debug!("burst cap {} reached, dropping {:?} spawn", self.max_bursts, kind);
                    return None;
                }
                OverflowPolicy::EvictOldest => {
                    if let Some(oldest) = self.bursts.pop_front() {
                        log::debug!("burst cap {} reached, evicting {:?}", self.max_bursts, oldest.id());
                        self.disposed.push(oldest);
                    }
                }
            }
        }

        let id = BurstId(self.next_id);
        self.next_id += 1;
        let profile = self.profiles.get(kind);
        self.bursts.push_back(Burst::new(id, kind, origin, color, profile, rng));
        Some(id)
    }

    /// Advance every live burst, then reap the ones that died this tick.
    pub fn tick(&mut self, dt: f32) {
        let physics = self.physics;
        for burst in &mut self.bursts {
            burst.advance(dt, &physics);
        }

        // Reverse scan: removing index i never shifts an unvisited element.
        let first_new = self.disposed.len();
        for i in (0..self.bursts.len()).rev() {
            if !self.bursts[i].is_alive() {
                if let Some(dead) = self.bursts.remove(i) {
                    self.disposed.push(dead);
                }
            }
        }
        self.disposed[first_new..].reverse();
    }

    /// Take every burst removed since the last drain, oldest removal first.
    pub fn drain_disposed(&mut self) -> Vec<Burst> {
        std::mem::take(&mut self.disposed)
    }

    /// Dispose all live bursts.
    pub fn clear(&mut self) {
        self.disposed.extend(self.bursts.drain(..));
    }

    pub fn get(&self, id: BurstId) -> Option<&Burst> {
        self.bursts.iter().find(|b| b.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Burst> {
        self.bursts.iter()
    }

    /// Number of live bursts.
    pub fn len(&self) -> usize {
        self.bursts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bursts.is_empty()
    }

    pub fn total_particles(&self) -> usize {
        self.bursts.iter().map(Burst::particle_count).sum()
    }

    pub fn physics(&self) -> &PhysicsParams {
        &self.physics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::BurstProfile;
    use crate::systems::fireworks::Rng;

    fn config() -> FireworksConfig {
        FireworksConfig::new()
            .with_profile(BurstKind::Primary, BurstProfile::new(400, 3.0, 1.5, 4.0))
            .with_profile(BurstKind::Spark, BurstProfile::new(20, 1.0, 0.5, 1.0))
    }

    #[test]
    fn spawn_and_get() {
        let mut reg = BurstRegistry::new(&config());
        let mut rng = Rng::new(1);
        let id = reg.spawn(Vec3::ZERO, Rgb::GOLD, &mut rng).unwrap();
        let b = reg.get(id).unwrap();
        assert_eq!(b.particle_count(), 400);
        assert_eq!(b.color(), Rgb::GOLD);
        assert_eq!(b.kind(), BurstKind::Primary);
        assert_eq!(reg.total_particles(), 400);
    }

    #[test]
    fn spawn_kind_uses_profile() {
        let mut reg = BurstRegistry::new(&config());
        let mut rng = Rng::new(1);
        let id = reg.spawn_kind(Vec3::ONE, Rgb::CYAN, BurstKind::Spark, &mut rng).unwrap();
        assert_eq!(reg.get(id).unwrap().particle_count(), 20);
    }

    #[test]
    fn same_origin_and_color_allowed() {
        let mut reg = BurstRegistry::new(&config());
        let mut rng = Rng::new(1);
        let a = reg.spawn(Vec3::ZERO, Rgb::GOLD, &mut rng).unwrap();
        let b = reg.spawn(Vec3::ZERO, Rgb::GOLD, &mut rng).unwrap();
        assert_ne!(a, b);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn removed_exactly_once_after_lifetime() {
        let mut reg = BurstRegistry::new(&config());
        let mut rng = Rng::new(1);
        let id = reg.spawn(Vec3::ZERO, Rgb::GOLD, &mut rng).unwrap();

        for dt in [1.0, 1.0, 0.99] {
            reg.tick(dt);
        }
        assert_eq!(reg.len(), 1);
        assert!(reg.drain_disposed().is_empty());
        let opacity = reg.get(id).unwrap().opacity();
        assert!((opacity - 0.0033).abs() < 1e-3);

        reg.tick(0.02);
        assert!(reg.is_empty());
        let disposed = reg.drain_disposed();
        assert_eq!(disposed.len(), 1);
        assert_eq!(disposed[0].id(), id);
        assert!(!disposed[0].is_alive());

        reg.tick(0.02);
        assert!(reg.drain_disposed().is_empty());
    }

    #[test]
    fn removal_does_not_skip_or_double_advance() {
        let mut reg = BurstRegistry::new(&config());
        let mut rng = Rng::new(5);
        // Interleave short-lived sparks with long-lived primaries.
        for i in 0..6 {
            let kind = if i % 2 == 0 { BurstKind::Spark } else { BurstKind::Primary };
            reg.spawn_kind(Vec3::ZERO, Rgb::WHITE, kind, &mut rng);
        }
        reg.tick(0.6);
        reg.tick(0.6);

        assert_eq!(reg.len(), 3);
        for b in reg.iter() {
            assert_eq!(b.kind(), BurstKind::Primary);
            assert!((b.age() - 1.2).abs() < 1e-5, "age {}", b.age());
        }
        let disposed = reg.drain_disposed();
        let ids: Vec<u32> = disposed.iter().map(|b| b.id().0).collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }

    #[test]
    fn evict_oldest_when_full() {
        let config = config().with_max_bursts(2, OverflowPolicy::EvictOldest);
        let mut reg = BurstRegistry::new(&config);
        let mut rng = Rng::new(1);
        let a = reg.spawn(Vec3::ZERO, Rgb::GOLD, &mut rng).unwrap();
        let b = reg.spawn(Vec3::ZERO, Rgb::GOLD, &mut rng).unwrap();
        let c = reg.spawn(Vec3::ZERO, Rgb::GOLD, &mut rng).unwrap();

        let live: Vec<BurstId> = reg.iter().map(Burst::id).collect();
        assert_eq!(live, vec![b, c]);
        let disposed = reg.drain_disposed();
        assert_eq!(disposed.len(), 1);
        assert_eq!(disposed[0].id(), a);
    }

    #[test]
    fn eviction_keeps_insertion_order_over_many_spawns() {
        let config = config().with_max_bursts(3, OverflowPolicy::EvictOldest);
        let mut reg = BurstRegistry::new(&config);
        let mut rng = Rng::new(2);
        for _ in 0..10 {
            reg.spawn_kind(Vec3::ZERO, Rgb::GOLD, BurstKind::Spark, &mut rng);
        }
        let live: Vec<u32> = reg.iter().map(|b| b.id().0).collect();
        assert_eq!(live, vec![8, 9, 10]);
        let evicted: Vec<u32> = reg.drain_disposed().iter().map(|b| b.id().0).collect();
        assert_eq!(evicted, (1..=7).collect::<Vec<u32>>());
    }

    #[test]
    fn drop_newest_when_full() {
        let config = config().with_max_bursts(2, OverflowPolicy::DropNewest);
        let mut reg = BurstRegistry::new(&config);
        let mut rng = Rng::new(1);
        reg.spawn(Vec3::ZERO, Rgb::GOLD, &mut rng).unwrap();
        reg.spawn(Vec3::ZERO, Rgb::GOLD, &mut rng).unwrap();
        assert!(reg.spawn(Vec3::ZERO, Rgb::GOLD, &mut rng).is_none());
        assert_eq!(reg.len(), 2);
        assert!(reg.drain_disposed().is_empty());
    }

    #[test]
    fn zero_cap_is_unbounded() {
        let config = config().with_max_bursts(0, OverflowPolicy::DropNewest);
        let mut reg = BurstRegistry::new(&config);
        let mut rng = Rng::new(1);
        for _ in 0..100 {
            assert!(reg.spawn_kind(Vec3::ZERO, Rgb::GOLD, BurstKind::Spark, &mut rng).is_some());
        }
        assert_eq!(reg.len(), 100);
    }

    #[test]
    fn clear_disposes_everything() {
        let mut reg = BurstRegistry::new(&config());
        let mut rng = Rng::new(1);
        reg.spawn(Vec3::ZERO, Rgb::GOLD, &mut rng);
        reg.spawn(Vec3::ZERO, Rgb::GOLD, &mut rng);
        reg.clear();
        assert!(reg.is_empty());
        assert_eq!(reg.drain_disposed().len(), 2);
    }
}
