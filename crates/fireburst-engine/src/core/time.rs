/// Wall-clock frame delta with a clamp against runaway gaps.
///
/// Timestamps are in seconds. The first frame has no predecessor and reports
/// `nominal_dt`; later frames report `now - last`, clamped to `[0, max_dt]`.
pub struct FrameClock {
    last_time: Option<f64>,
    nominal_dt: f32,
    max_dt: f32,
}

impl FrameClock {
    pub fn new(nominal_dt: f32, max_dt: f32) -> Self {
        Self {
            last_time: None,
            nominal_dt,
            max_dt,
        }
    }

    /// Record a new frame timestamp and return the clamped delta.
    pub fn delta(&mut self, now: f64) -> f32 {
        if !now.is_finite() {
            return 0.0;
        }
        let dt = match self.last_time {
            None => self.nominal_dt,
            Some(last) => ((now - last) as f32).clamp(0.0, self.max_dt),
        };
        // A clock that jumps backwards does not rewind the reference point.
        if self.last_time.map_or(true, |last| now > last) {
            self.last_time = Some(now);
        }
        dt.min(self.max_dt)
    }

    /// Forget the last timestamp, e.g. after the page was hidden.
    pub fn reset(&mut self) {
        self.last_time = None;
    }

    pub fn last_time(&self) -> Option<f64> {
        self.last_time
    }

    pub fn max_dt(&self) -> f32 {
        self.max_dt
    }
}
