use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use log::debug;

use crate::config::RecognitionConfig;
use crate::types::{Classification, Gesture, GestureEvent, Handedness};

/// Per-hand smoothing state: a bounded history of raw classifications plus
/// the last confirmed gesture for cooldown gating.
struct StabilizerState {
    history: VecDeque<Classification>,
    last_confirmed: Option<(Gesture, Instant)>,
    last_seen: Instant,
}

impl StabilizerState {
    fn new(window: usize, now: Instant) -> Self {
        Self {
            history: VecDeque::with_capacity(window),
            last_confirmed: None,
            last_seen: now,
        }
    }
}

/// Turns the raw per-frame classification stream into a debounced,
/// cooldown-gated stream of confirmed [`GestureEvent`]s.
///
/// One state entry per hand identity, owned by the processing stage and
/// never shared across threads. A candidate needs a full history window
/// with at most one dissenting frame, and its average confidence must reach
/// the configured threshold; the same label re-fires for the same hand only
/// after the cooldown period. A hand unseen for longer than the idle
/// timeout starts fresh.
pub struct Stabilizer {
    window: usize,
    confidence_threshold: f32,
    cooldown: Duration,
    idle_timeout: Duration,
    states: HashMap<Handedness, StabilizerState>,
}

impl Stabilizer {
    pub fn new(config: &RecognitionConfig) -> Self {
        Self {
            window: config.smoothing_buffer_size,
            confidence_threshold: config.gesture_confidence_threshold,
            cooldown: Duration::from_secs_f64(config.cooldown_period_seconds),
            idle_timeout: Duration::from_secs_f64(config.hand_idle_timeout_seconds),
            states: HashMap::new(),
        }
    }

    /// Feed one classification for one hand; returns a confirmed event when
    /// the debounce and cooldown gates both pass.
    pub fn observe(
        &mut self,
        hand: Handedness,
        classification: Classification,
        now: Instant,
        timestamp_ms: i64,
    ) -> Option<GestureEvent> {
        let window = self.window;
        let state = self
            .states
            .entry(hand)
            .or_insert_with(|| StabilizerState::new(window, now));

        // Reacquired after tracking loss: start fresh, no stale cooldown.
        if now.saturating_duration_since(state.last_seen) > self.idle_timeout {
            debug!("{} hand idle-expired, resetting stabilizer state", hand);
            state.history.clear();
            state.last_confirmed = None;
        }
        state.last_seen = now;

        if state.history.len() == window {
            state.history.pop_front();
        }
        state.history.push_back(classification);

        if state.history.len() < window {
            return None;
        }

        let (label, confidence) = Self::weighted_majority(&state.history, window)?;
        if label == Gesture::None || confidence < self.confidence_threshold {
            return None;
        }

        // Cooldown gate: the same label for the same hand re-fires only
        // after the cooldown period has elapsed.
        if let Some((last_label, confirmed_at)) = state.last_confirmed {
            if last_label == label && now.saturating_duration_since(confirmed_at) < self.cooldown {
                return None;
            }
        }

        state.last_confirmed = Some((label, now));
        Some(GestureEvent {
            gesture: label,
            confidence,
            hand,
            at: now,
            timestamp_ms,
        })
    }

    /// Drop state for hands with no observation inside the idle timeout.
    pub fn prune(&mut self, now: Instant) {
        let idle_timeout = self.idle_timeout;
        self.states
            .retain(|_, state| now.saturating_duration_since(state.last_seen) <= idle_timeout);
    }

    #[cfg(test)]
    fn tracked_hands(&self) -> usize {
        self.states.len()
    }

    /// Confidence-weighted vote over the history window. Returns the
    /// majority label and its average confidence, or nothing when more than
    /// one frame dissents from the front-runner.
    fn weighted_majority(
        history: &VecDeque<Classification>,
        window: usize,
    ) -> Option<(Gesture, f32)> {
        let mut tally: HashMap<Gesture, (usize, f32)> = HashMap::new();
        for c in history {
            let entry = tally.entry(c.label).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += c.confidence;
        }

        let (label, (count, total)) = tally
            .into_iter()
            .max_by(|a, b| a.1 .0.cmp(&b.1 .0).then(a.1 .1.total_cmp(&b.1 .1)))?;

        // At most one dissenting frame in the window; anything looser lets
        // a two-gesture alternation fire events.
        if count + 1 < window {
            return None;
        }

        Some((label, total / count as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RecognitionConfig {
        let mut c = RecognitionConfig::default();
        c.gesture_confidence_threshold = 0.55;
        c
    }

    fn fist(confidence: f32) -> Classification {
        Classification::new(Gesture::Fist, confidence)
    }

    fn open(confidence: f32) -> Classification {
        Classification::new(Gesture::OpenPalm, confidence)
    }

    fn at(base: Instant, ms: u64) -> Instant {
        base + Duration::from_millis(ms)
    }

    #[test]
    fn no_event_before_buffer_fills() {
        let mut s = Stabilizer::new(&config());
        let base = Instant::now();
        for i in 0..4 {
            let event = s.observe(Handedness::Right, fist(0.9), at(base, i * 33), 0);
            assert!(event.is_none(), "event before frame 5");
        }
    }

    #[test]
    fn sustained_gesture_confirms_once_buffer_is_full() {
        let mut s = Stabilizer::new(&config());
        let base = Instant::now();
        let mut events = Vec::new();
        for i in 0..6 {
            if let Some(e) = s.observe(Handedness::Right, fist(0.9), at(base, i * 33), 0) {
                events.push((i, e));
            }
        }
        // Exactly one event, at the fifth observation.
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, 4);
        assert_eq!(events[0].1.gesture, Gesture::Fist);
        assert_eq!(events[0].1.hand, Handedness::Right);
    }

    #[test]
    fn pinch_scenario_emits_one_event_with_expected_confidence() {
        // thumb-index 0.02 with threshold 0.05 => raw confidence 0.6.
        let mut s = Stabilizer::new(&config());
        let base = Instant::now();
        let pinch = Classification::new(Gesture::Pinch, 0.6);
        let mut events = Vec::new();
        for i in 0..6 {
            if let Some(e) = s.observe(Handedness::Left, pinch, at(base, i * 33), 0) {
                events.push(e);
            }
        }
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].gesture, Gesture::Pinch);
        assert!(events[0].confidence >= 0.59);
    }

    #[test]
    fn cooldown_suppresses_refire_until_elapsed() {
        // Confirmed fist at t=0, cooldown 1.0s, continuous fist afterwards:
        // nothing through t=0.9s, a fresh event once past t=1.0s.
        let mut s = Stabilizer::new(&config());
        let base = Instant::now();

        for i in 0..5 {
            s.observe(Handedness::Right, fist(0.9), at(base, i * 10), 0);
        }
        // Last of those confirmed at +40ms; keep feeding through +940ms.
        for ms in (140..=940).step_by(100) {
            assert!(s
                .observe(Handedness::Right, fist(0.9), at(base, ms), 0)
                .is_none());
        }
        let refire = s.observe(Handedness::Right, fist(0.9), at(base, 1140), 0);
        assert!(refire.is_some(), "expected re-fire after cooldown");
    }

    #[test]
    fn single_outlier_does_not_change_majority() {
        let mut s = Stabilizer::new(&config());
        let base = Instant::now();
        let frames = [open(0.8), open(0.8), fist(0.9), open(0.8), open(0.8)];
        let mut last = None;
        for (i, c) in frames.iter().enumerate() {
            last = s.observe(Handedness::Right, *c, at(base, i as u64 * 33), 0);
        }
        let event = last.expect("majority should confirm despite one outlier");
        assert_eq!(event.gesture, Gesture::OpenPalm);
    }

    #[test]
    fn alternating_labels_never_confirm() {
        let mut s = Stabilizer::new(&config());
        let base = Instant::now();
        for i in 0..20u64 {
            let c = if i % 2 == 0 { fist(0.9) } else { open(0.9) };
            assert!(
                s.observe(Handedness::Right, c, at(base, i * 33), 0).is_none(),
                "no stable majority must mean no events"
            );
        }
    }

    #[test]
    fn none_majority_produces_no_event() {
        let mut s = Stabilizer::new(&config());
        let base = Instant::now();
        for i in 0..10u64 {
            assert!(s
                .observe(Handedness::Right, Classification::none(), at(base, i * 33), 0)
                .is_none());
        }
    }

    #[test]
    fn idle_timeout_resets_cooldown_and_history() {
        let mut s = Stabilizer::new(&config());
        let base = Instant::now();

        for i in 0..5 {
            s.observe(Handedness::Right, fist(0.9), at(base, i * 10), 0);
        }

        // Reappear 3s later (idle timeout 2s), still inside what would have
        // been a live cooldown had the state survived.
        let reacquired = 3000;
        let mut events = Vec::new();
        for i in 0..5 {
            if let Some(e) = s.observe(Handedness::Right, fist(0.9), at(base, reacquired + i * 10), 0)
            {
                events.push(e);
            }
        }
        assert_eq!(events.len(), 1, "fresh hand must not inherit cooldown");
    }

    #[test]
    fn different_label_fires_during_other_labels_cooldown() {
        let mut s = Stabilizer::new(&config());
        let base = Instant::now();
        for i in 0..5 {
            s.observe(Handedness::Right, fist(0.9), at(base, i * 10), 0);
        }
        // Four more frames flip the window to open palm (one fist remains).
        let mut event = None;
        for i in 5..9 {
            event = s.observe(Handedness::Right, open(0.9), at(base, i * 10), 0);
        }
        assert_eq!(event.unwrap().gesture, Gesture::OpenPalm);
    }

    #[test]
    fn hands_are_tracked_independently() {
        let mut s = Stabilizer::new(&config());
        let base = Instant::now();
        let mut right_events = 0;
        let mut left_events = 0;
        for i in 0..5 {
            if s.observe(Handedness::Right, fist(0.9), at(base, i * 33), 0).is_some() {
                right_events += 1;
            }
            if s.observe(Handedness::Left, fist(0.9), at(base, i * 33), 0).is_some() {
                left_events += 1;
            }
        }
        assert_eq!((right_events, left_events), (1, 1));
    }

    #[test]
    fn prune_evicts_idle_hands() {
        let mut s = Stabilizer::new(&config());
        let base = Instant::now();
        s.observe(Handedness::Right, fist(0.9), base, 0);
        s.observe(Handedness::Left, fist(0.9), at(base, 2500), 0);
        s.prune(at(base, 3000));
        assert_eq!(s.tracked_hands(), 1);
    }
}
