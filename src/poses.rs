//! Synthetic hand poses on the 21-point hand topology.
//!
//! Used by the simulated landmark source and by tests. Geometry is laid out
//! in normalized frame coordinates with the wrist at (0.5, 0.9) and the palm
//! center (middle MCP) at (0.5, 0.7), so the reference bone length is 0.2
//! and curl ratios come out exactly as specified per pose.

use crate::types::{Gesture, HandObservation, Handedness, Landmark};

const WRIST: (f32, f32) = (0.5, 0.9);
const PALM: (f32, f32) = (0.5, 0.7);
const HAND_SCALE: f32 = 0.2;

/// One finger: fingertip direction (degrees from vertical) and curl ratio.
#[derive(Clone, Copy)]
struct FingerSpec {
    angle_deg: f32,
    ratio: f32,
}

const EXTENDED: f32 = 1.4;
const CURLED: f32 = 0.35;

fn finger(angle_deg: f32, ratio: f32) -> FingerSpec {
    FingerSpec { angle_deg, ratio }
}

fn tip_position(spec: FingerSpec) -> (f32, f32) {
    let (sin, cos) = spec.angle_deg.to_radians().sin_cos();
    (
        PALM.0 + HAND_SCALE * spec.ratio * sin,
        PALM.1 - HAND_SCALE * spec.ratio * cos,
    )
}

/// Build a full 21-landmark observation from five finger specs
/// (thumb → pinky). Intermediate joints are interpolated; only the wrist,
/// palm center and fingertips carry meaning for feature extraction.
fn hand_from_fingers(fingers: [FingerSpec; 5], handedness: Handedness) -> HandObservation {
    // MCP anchor offsets per finger; the middle MCP is the palm center.
    const MCP_OFFSETS: [(f32, f32); 5] = [
        (-0.06, 0.02),
        (-0.03, 0.0),
        (0.0, 0.0),
        (0.03, 0.0),
        (0.06, 0.01),
    ];
    // Joint chains per finger (base, two mid joints, tip).
    const CHAINS: [[usize; 4]; 5] = [
        [1, 2, 3, 4],
        [5, 6, 7, 8],
        [9, 10, 11, 12],
        [13, 14, 15, 16],
        [17, 18, 19, 20],
    ];

    let mut landmarks = vec![Landmark::default(); 21];
    landmarks[0] = Landmark::new(WRIST.0, WRIST.1, 0.0);

    for i in 0..5 {
        let base = (PALM.0 + MCP_OFFSETS[i].0, PALM.1 + MCP_OFFSETS[i].1);
        let tip = tip_position(fingers[i]);
        let [a, b, c, t] = CHAINS[i];
        landmarks[a] = Landmark::new(base.0, base.1, 0.0);
        landmarks[b] = Landmark::new(
            base.0 + (tip.0 - base.0) / 3.0,
            base.1 + (tip.1 - base.1) / 3.0,
            0.0,
        );
        landmarks[c] = Landmark::new(
            base.0 + 2.0 * (tip.0 - base.0) / 3.0,
            base.1 + 2.0 * (tip.1 - base.1) / 3.0,
            0.0,
        );
        landmarks[t] = Landmark::new(tip.0, tip.1, 0.0);
    }

    HandObservation::new(landmarks, handedness, 0.95)
}

/// All five fingers extended.
pub fn open_palm(handedness: Handedness) -> HandObservation {
    hand_from_fingers(
        [
            finger(-40.0, EXTENDED),
            finger(-15.0, EXTENDED),
            finger(0.0, EXTENDED),
            finger(15.0, EXTENDED),
            finger(35.0, EXTENDED),
        ],
        handedness,
    )
}

/// All five fingers curled toward the palm, fingertips spread enough that
/// the thumb–index distance stays clear of the pinch threshold.
pub fn fist(handedness: Handedness) -> HandObservation {
    hand_from_fingers(
        [
            finger(-70.0, CURLED),
            finger(-10.0, CURLED),
            finger(0.0, CURLED),
            finger(10.0, CURLED),
            finger(30.0, CURLED),
        ],
        handedness,
    )
}

/// Index and middle extended in a V, remaining fingers curled.
pub fn peace_sign(handedness: Handedness) -> HandObservation {
    hand_from_fingers(
        [
            finger(-70.0, CURLED),
            finger(-12.0, EXTENDED),
            finger(12.0, EXTENDED),
            finger(10.0, CURLED),
            finger(30.0, CURLED),
        ],
        handedness,
    )
}

/// Thumb extended on an upright hand, remaining fingers curled.
pub fn thumbs_up(handedness: Handedness) -> HandObservation {
    hand_from_fingers(
        [
            finger(-45.0, EXTENDED),
            finger(-10.0, CURLED),
            finger(0.0, CURLED),
            finger(10.0, CURLED),
            finger(30.0, CURLED),
        ],
        handedness,
    )
}

/// Thumb tip brought to the given planar distance from the index tip;
/// remaining fingers extended.
pub fn pinch(handedness: Handedness, thumb_index_dist: f32) -> HandObservation {
    let index = finger(-15.0, 1.2);
    let mut hand = hand_from_fingers(
        [
            finger(-40.0, 1.0),
            index,
            finger(0.0, 1.25),
            finger(15.0, 1.25),
            finger(35.0, 1.25),
        ],
        handedness,
    );
    let index_tip = tip_position(index);
    hand.landmarks[4] = Landmark::new(index_tip.0 - thumb_index_dist, index_tip.1, 0.0);
    hand
}

/// Half-extended fingers that match no gesture rule.
pub fn neutral(handedness: Handedness) -> HandObservation {
    hand_from_fingers(
        [
            finger(-40.0, 0.8),
            finger(-15.0, 0.8),
            finger(0.0, 0.8),
            finger(15.0, 0.8),
            finger(35.0, 0.8),
        ],
        handedness,
    )
}

/// Canonical pose for a gesture label; `Gesture::None` maps to the neutral
/// pose. Drives the simulated source's script.
pub fn for_gesture(gesture: Gesture, handedness: Handedness) -> HandObservation {
    match gesture {
        Gesture::Pinch => pinch(handedness, 0.015),
        Gesture::PeaceSign => peace_sign(handedness),
        Gesture::ThumbsUp => thumbs_up(handedness),
        Gesture::Fist => fist(handedness),
        Gesture::OpenPalm => open_palm(handedness),
        Gesture::None => neutral(handedness),
    }
}
