use std::time::Instant;

use super::{Gesture, HandObservation, Handedness};

/// One captured frame crossing the capture → processing queue.
///
/// `captured_at` is monotonic and drives latency and cooldown arithmetic;
/// `timestamp_ms` is wall-clock and only used for log lines.
#[derive(Clone, Debug)]
pub struct Frame {
    pub seq: u64,
    pub captured_at: Instant,
    pub timestamp_ms: i64,
    pub hands: Vec<HandObservation>,
}

impl Frame {
    pub fn new(seq: u64, timestamp_ms: i64, hands: Vec<HandObservation>) -> Self {
        Self {
            seq,
            captured_at: Instant::now(),
            timestamp_ms,
            hands,
        }
    }
}

/// A confirmed, debounced gesture. This is the unit the rest of the system
/// consumes; the stabilizer guarantees no re-emission of the same label for
/// the same hand inside the cooldown window.
#[derive(Clone, Copy, Debug)]
pub struct GestureEvent {
    pub gesture: Gesture,
    pub confidence: f32,
    pub hand: Handedness,
    pub at: Instant,
    pub timestamp_ms: i64,
}
