use glam::Vec3;

use crate::api::config::MappingConfig;

/// Linear map from normalized image space and screen pixels into world space.
///
/// Image space is `[0, 1]` per axis with y pointing down. World space is
/// centered on the view with y pointing up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldMapping {
    scale_x: f32,
    scale_y: f32,
    lock_aspect: bool,
    viewport: (f32, f32),
}

impl WorldMapping {
    pub fn new(config: &MappingConfig) -> Self {
        Self {
            scale_x: config.scale_x,
            scale_y: config.scale_y,
            lock_aspect: config.lock_aspect,
            viewport: (config.viewport_width, config.viewport_height),
        }
    }

    /// Map a landmark from a front-facing camera. x is mirrored.
    pub fn from_landmark(&self, x: f32, y: f32, z: f32) -> Vec3 {
        Vec3::new((0.5 - x) * self.scale_x, (0.5 - y) * self.scale_y, z)
    }

    /// Map a pointer position in pixels. Not mirrored.
    pub fn from_screen(&self, px: f32, py: f32, z: f32) -> Vec3 {
        let nx = px / self.viewport.0;
        let ny = py / self.viewport.1;
        Vec3::new((nx - 0.5) * self.scale_x, (0.5 - ny) * self.scale_y, z)
    }

    /// Apply a new viewport size. Degenerate sizes are ignored.
    pub fn resize(&mut self, width: f32, height: f32) {
        if !(width > 0.0 && height > 0.0) {
            log::warn!("ignoring degenerate viewport {}x{}", width, height);
            return;
        }
        self.viewport = (width, height);
        if self.lock_aspect {
            self.scale_x = self.scale_y * width / height;
        }
    }

    /// Half extents of the visible world rectangle.
    pub fn half_extents(&self) -> (f32, f32) {
        (self.scale_x * 0.5, self.scale_y * 0.5)
    }

    pub fn scale(&self) -> (f32, f32) {
        (self.scale_x, self.scale_y)
    }

    pub fn viewport(&self) -> (f32, f32) {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> WorldMapping {
        WorldMapping::new(&MappingConfig::default())
    }

    #[test]
    fn screen_center_maps_to_origin() {
        let m = mapping();
        let (w, h) = m.viewport();
        let p = m.from_screen(w / 2.0, h / 2.0, 0.0);
        assert_eq!(p, Vec3::ZERO);
    }

    #[test]
    fn landmark_center_maps_to_origin() {
        assert_eq!(mapping().from_landmark(0.5, 0.5, 0.0), Vec3::ZERO);
    }

    #[test]
    fn landmark_x_is_mirrored() {
        let m = mapping();
        let (sx, sy) = m.scale();
        let p = m.from_landmark(0.0, 0.0, 2.0);
        assert_eq!(p, Vec3::new(0.5 * sx, 0.5 * sy, 2.0));
    }

    #[test]
    fn screen_corners() {
        let m = mapping();
        let (w, h) = m.viewport();
        let (hx, hy) = m.half_extents();
        assert_eq!(m.from_screen(0.0, 0.0, 0.0), Vec3::new(-hx, hy, 0.0));
        assert_eq!(m.from_screen(w, h, 0.0), Vec3::new(hx, -hy, 0.0));
    }

    #[test]
    fn resize_updates_aspect() {
        let mut m = mapping();
        m.resize(1000.0, 500.0);
        assert_eq!(m.scale(), (120.0, 60.0));
        assert_eq!(m.from_screen(500.0, 250.0, 0.0), Vec3::ZERO);
    }

    #[test]
    fn resize_without_aspect_lock_keeps_scale() {
        let config = MappingConfig { lock_aspect: false, ..MappingConfig::default() };
        let mut m = WorldMapping::new(&config);
        m.resize(1000.0, 500.0);
        assert_eq!(m.scale(), (config.scale_x, config.scale_y));
        assert_eq!(m.viewport(), (1000.0, 500.0));
    }

    #[test]
    fn degenerate_resize_ignored() {
        let mut m = mapping();
        let before = m;
        m.resize(0.0, 600.0);
        assert_eq!(m, before);
    }
}
