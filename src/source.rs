use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::config::AppConfig;
use crate::poses;
use crate::types::{Frame, Gesture, Handedness, Landmark};

/// Upstream frame-acquisition failure. The pipeline never retries these
/// itself; they surface as a pipeline-level fault and trigger a drain.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("capture device unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("landmark source disconnected")]
    Disconnected,
}

/// Boundary to the external landmark-detection collaborator: one call per
/// frame, returning zero or more hand observations or a source fault.
pub trait LandmarkSource: Send + 'static {
    fn next_frame(&mut self) -> Result<Frame, SourceError>;
}

/// Paced synthetic source cycling through the gesture repertoire, with
/// per-landmark jitter so the stabilizer sees realistic noise. Stands in
/// for a camera + landmark model in the demo binary.
pub struct SimulatedSource {
    frame_interval: Duration,
    script: Vec<Gesture>,
    hold_frames: u32,
    gap_frames: u32,
    phase: usize,
    frame_in_phase: u32,
    in_gap: bool,
    seq: u64,
    rng: StdRng,
}

impl SimulatedSource {
    const JITTER: f32 = 0.003;

    pub fn new(config: &AppConfig) -> Self {
        Self {
            frame_interval: Duration::from_secs(1) / config.pipeline.target_fps,
            script: Gesture::ALL.to_vec(),
            // Hold each pose long enough to confirm, then show a neutral
            // hand so consecutive gestures do not blur together.
            hold_frames: 12,
            gap_frames: 18,
            phase: 0,
            frame_in_phase: 0,
            in_gap: false,
            seq: 0,
            rng: StdRng::from_os_rng(),
        }
    }

    fn advance_script(&mut self) -> Gesture {
        let gesture = if self.in_gap {
            Gesture::None
        } else {
            self.script[self.phase]
        };

        self.frame_in_phase += 1;
        let phase_len = if self.in_gap {
            self.gap_frames
        } else {
            self.hold_frames
        };
        if self.frame_in_phase >= phase_len {
            self.frame_in_phase = 0;
            if self.in_gap {
                self.phase = (self.phase + 1) % self.script.len();
            }
            self.in_gap = !self.in_gap;
        }

        gesture
    }

    fn jitter(&mut self, landmark: Landmark) -> Landmark {
        Landmark::new(
            landmark.x + self.rng.random_range(-Self::JITTER..Self::JITTER),
            landmark.y + self.rng.random_range(-Self::JITTER..Self::JITTER),
            landmark.z,
        )
    }
}

impl LandmarkSource for SimulatedSource {
    fn next_frame(&mut self) -> Result<Frame, SourceError> {
        std::thread::sleep(self.frame_interval);

        let gesture = self.advance_script();
        let mut hand = poses::for_gesture(gesture, Handedness::Right);
        for landmark in &mut hand.landmarks {
            *landmark = self.jitter(*landmark);
        }

        self.seq += 1;
        Ok(Frame::new(
            self.seq,
            Utc::now().timestamp_millis(),
            vec![hand],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_source_cycles_through_all_gestures() {
        let mut config = AppConfig::default();
        config.pipeline.target_fps = 1000;
        let mut source = SimulatedSource::new(&config);

        let mut seen = std::collections::HashSet::new();
        // One full script cycle: 5 gestures * (hold + gap) frames.
        for _ in 0..(5 * 30) {
            let frame = source.next_frame().unwrap();
            assert_eq!(frame.hands.len(), 1);
            assert_eq!(frame.hands[0].landmarks.len(), 21);
            let features = crate::features::extract(&frame.hands[0]).unwrap();
            let c = crate::classifier::classify(&features, &config.recognition);
            seen.insert(c.label);
        }
        for gesture in Gesture::ALL {
            assert!(seen.contains(&gesture), "script never produced {}", gesture);
        }
    }

    #[test]
    fn frames_are_sequenced() {
        let mut config = AppConfig::default();
        config.pipeline.target_fps = 1000;
        let mut source = SimulatedSource::new(&config);
        let a = source.next_frame().unwrap();
        let b = source.next_frame().unwrap();
        assert!(b.seq > a.seq);
        assert!(b.captured_at >= a.captured_at);
    }
}
