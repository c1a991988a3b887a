use crate::input::gesture::HandSnapshot;

/// Output of one landmark detector pass.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectorResult {
    Hand(HandSnapshot),
    NoHand,
}

impl DetectorResult {
    pub fn snapshot(&self) -> Option<&HandSnapshot> {
        match self {
            DetectorResult::Hand(hand) => Some(hand),
            DetectorResult::NoHand => None,
        }
    }
}

/// Single-slot buffer between the detector callback and the frame tick.
/// Posting overwrites; only the latest unread result survives.
#[derive(Debug, Default)]
pub struct GestureMailbox {
    slot: Option<DetectorResult>,
    corrupt: bool,
}

impl GestureMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&mut self, result: DetectorResult) {
        self.slot = Some(result);
    }

    /// Post raw detector output (`21 * 3` floats). Malformed data counts as no hand.
    pub fn post_flat(&mut self, data: &[f32]) {
        match HandSnapshot::from_flat(data) {
            Some(hand) => {
                self.corrupt = false;
                self.post(DetectorResult::Hand(hand));
            }
            None => {
                if !self.corrupt {
                    log::warn!("discarding malformed landmark frame ({} floats)", data.len());
                    self.corrupt = true;
                }
                self.post(DetectorResult::NoHand);
            }
        }
    }

    /// Take the latest result, if one arrived since the last take.
    pub fn take(&mut self) -> Option<DetectorResult> {
        self.slot.take()
    }

    pub fn has_pending(&self) -> bool {
        self.slot.is_some()
    }
}
