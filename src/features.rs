use thiserror::Error;

use crate::types::landmark::{
    HandObservation, INDEX_TIP, MIDDLE_MCP, MIDDLE_TIP, PINKY_TIP, RING_TIP, THUMB_TIP, WRIST,
};
use crate::types::LANDMARK_COUNT;

/// Reference bone (wrist → middle MCP) shorter than this means the
/// observation carries no usable geometry.
const MIN_HAND_SCALE: f32 = 1e-4;

/// Fingertip landmark indices in thumb → pinky order.
const FINGER_TIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// Fixed-size geometric description of one hand in one frame.
///
/// Curl ratios are fingertip-to-palm-center distances normalized by the
/// wrist-to-palm-center reference bone: low = curled, high = extended.
/// Distances are planar (x, y) in normalized frame units; orientation is
/// the angle of the wrist → middle-MCP vector from vertical, in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeatureVector {
    /// Per-finger curl ratio, thumb → pinky.
    pub curl: [f32; 5],
    pub thumb_index_dist: f32,
    pub index_middle_dist: f32,
    pub orientation_deg: f32,
}

/// Per-hand, per-frame input defect. Recoverable: the caller skips
/// classification for that hand this frame.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("incomplete observation: expected {expected} landmarks, got {got}")]
    IncompleteObservation { expected: usize, got: usize },
    #[error("degenerate observation: wrist-to-palm reference bone collapsed")]
    DegenerateGeometry,
}

/// Derive a [`FeatureVector`] from one hand observation.
///
/// Pure function of its input: identical landmarks always yield an
/// identical feature vector.
pub fn extract(observation: &HandObservation) -> Result<FeatureVector, ExtractError> {
    let landmarks = &observation.landmarks;
    if landmarks.len() != LANDMARK_COUNT {
        return Err(ExtractError::IncompleteObservation {
            expected: LANDMARK_COUNT,
            got: landmarks.len(),
        });
    }

    let wrist = landmarks[WRIST];
    let palm_center = landmarks[MIDDLE_MCP];

    let hand_scale = wrist.planar_distance(&palm_center);
    if hand_scale < MIN_HAND_SCALE {
        return Err(ExtractError::DegenerateGeometry);
    }

    let mut curl = [0.0f32; 5];
    for (slot, &tip) in curl.iter_mut().zip(FINGER_TIPS.iter()) {
        *slot = landmarks[tip].planar_distance(&palm_center) / hand_scale;
    }

    let thumb_index_dist = landmarks[THUMB_TIP].planar_distance(&landmarks[INDEX_TIP]);
    let index_middle_dist = landmarks[INDEX_TIP].planar_distance(&landmarks[MIDDLE_TIP]);

    // Angle from vertical; image y grows downward, so an upright hand
    // (palm center above the wrist) reads as 0 degrees.
    let dx = palm_center.x - wrist.x;
    let dy = palm_center.y - wrist.y;
    let orientation_deg = dx.atan2(-dy).to_degrees();

    Ok(FeatureVector {
        curl,
        thumb_index_dist,
        index_middle_dist,
        orientation_deg,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poses;
    use crate::types::{Handedness, Landmark};

    #[test]
    fn extraction_is_deterministic() {
        let hand = poses::open_palm(Handedness::Right);
        let a = extract(&hand).unwrap();
        let b = extract(&hand).unwrap();
        // Bit-for-bit equality on every scalar field.
        assert_eq!(a, b);
    }

    #[test]
    fn incomplete_observation_is_rejected() {
        let mut hand = poses::open_palm(Handedness::Right);
        hand.landmarks.truncate(20);
        assert_eq!(
            extract(&hand),
            Err(ExtractError::IncompleteObservation {
                expected: 21,
                got: 20
            })
        );
    }

    #[test]
    fn collapsed_hand_is_rejected() {
        let hand = crate::types::HandObservation::new(
            vec![Landmark::default(); 21],
            Handedness::Left,
            1.0,
        );
        assert_eq!(extract(&hand), Err(ExtractError::DegenerateGeometry));
    }

    #[test]
    fn open_palm_fingers_read_extended() {
        let features = extract(&poses::open_palm(Handedness::Right)).unwrap();
        for ratio in features.curl {
            assert!(ratio > 1.0, "expected extended ratio, got {}", ratio);
        }
        assert!(features.orientation_deg.abs() < 5.0);
    }

    #[test]
    fn fist_fingers_read_curled() {
        let features = extract(&poses::fist(Handedness::Right)).unwrap();
        for ratio in features.curl {
            assert!(ratio < 0.6, "expected curled ratio, got {}", ratio);
        }
    }

    #[test]
    fn pinch_distance_matches_pose() {
        let features = extract(&poses::pinch(Handedness::Right, 0.02)).unwrap();
        assert!((features.thumb_index_dist - 0.02).abs() < 1e-3);
    }
}
