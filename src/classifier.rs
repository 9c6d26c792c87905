use crate::config::RecognitionConfig;
use crate::features::FeatureVector;
use crate::types::{Classification, Gesture};

/// Curl ratio of a fully extended fingertip in hand-scale units; extension
/// margins are normalized over [extension_threshold, FULL_EXTENSION].
const FULL_EXTENSION: f32 = 1.5;

/// One classification rule: a predicate over the feature vector that, when
/// it matches, yields a confidence in [0, 1].
struct Rule {
    gesture: Gesture,
    eval: fn(&FeatureVector, &RecognitionConfig) -> Option<f32>,
}

/// Rules in fixed priority order. Default thresholds keep the predicates
/// mutually exclusive on curl-ratio ranges; if a configuration change makes
/// two rules overlap, the first matching rule here wins.
const RULES: [Rule; 5] = [
    Rule {
        gesture: Gesture::Pinch,
        eval: eval_pinch,
    },
    Rule {
        gesture: Gesture::PeaceSign,
        eval: eval_peace_sign,
    },
    Rule {
        gesture: Gesture::ThumbsUp,
        eval: eval_thumbs_up,
    },
    Rule {
        gesture: Gesture::Fist,
        eval: eval_fist,
    },
    Rule {
        gesture: Gesture::OpenPalm,
        eval: eval_open_palm,
    },
];

/// Map a feature vector to exactly one gesture label (or the none
/// sentinel). Deterministic and side-effect free: the first rule whose
/// predicate matches decides the label, and a matched rule scoring below
/// its per-gesture minimum yields none rather than falling through.
pub fn classify(features: &FeatureVector, config: &RecognitionConfig) -> Classification {
    for rule in &RULES {
        if let Some(confidence) = (rule.eval)(features, config) {
            if confidence < config.min_confidence.for_gesture(rule.gesture) {
                return Classification::none();
            }
            return Classification::new(rule.gesture, confidence);
        }
    }
    Classification::none()
}

/// Normalized extension margin of a curl ratio above the extension
/// threshold, clamped to [0, 1].
fn extension_margin(ratio: f32, config: &RecognitionConfig) -> f32 {
    let span = (FULL_EXTENSION - config.extension_threshold).max(1e-3);
    ((ratio - config.extension_threshold) / span).clamp(0.0, 1.0)
}

fn eval_pinch(f: &FeatureVector, c: &RecognitionConfig) -> Option<f32> {
    if f.thumb_index_dist < c.pinch_distance_threshold {
        Some((1.0 - f.thumb_index_dist / c.pinch_distance_threshold).clamp(0.0, 1.0))
    } else {
        None
    }
}

fn eval_peace_sign(f: &FeatureVector, c: &RecognitionConfig) -> Option<f32> {
    let [thumb, index, middle, ring, pinky] = f.curl;
    let two_up = index > c.extension_threshold && middle > c.extension_threshold;
    let rest_down =
        thumb < c.extension_threshold && ring < c.extension_threshold && pinky < c.extension_threshold;
    if two_up && rest_down && f.index_middle_dist > c.peace_spread_min {
        Some((extension_margin(index, c) + extension_margin(middle, c)) / 2.0)
    } else {
        None
    }
}

fn eval_thumbs_up(f: &FeatureVector, c: &RecognitionConfig) -> Option<f32> {
    let [thumb, index, middle, ring, pinky] = f.curl;
    let thumb_up = thumb > c.extension_threshold;
    let upright = f.orientation_deg.abs() <= c.vertical_orientation_max_deg;
    let rest_curled = index < c.curl_threshold
        && middle < c.curl_threshold
        && ring < c.curl_threshold
        && pinky < c.curl_threshold;
    if thumb_up && upright && rest_curled {
        Some(extension_margin(thumb, c))
    } else {
        None
    }
}

fn eval_fist(f: &FeatureVector, c: &RecognitionConfig) -> Option<f32> {
    if f.curl.iter().all(|&r| r < c.curl_threshold) {
        let max_curl = f.curl.iter().cloned().fold(0.0f32, f32::max);
        Some((1.0 - max_curl).clamp(0.0, 1.0))
    } else {
        None
    }
}

fn eval_open_palm(f: &FeatureVector, c: &RecognitionConfig) -> Option<f32> {
    if f.curl.iter().all(|&r| r > c.extension_threshold) {
        let min_margin = f
            .curl
            .iter()
            .map(|&r| extension_margin(r, c))
            .fold(1.0f32, f32::min);
        Some(min_margin)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::extract;
    use crate::poses;
    use crate::types::Handedness;

    fn classify_pose(hand: &crate::types::HandObservation) -> Classification {
        let config = RecognitionConfig::default();
        let features = extract(hand).unwrap();
        classify(&features, &config)
    }

    #[test]
    fn canonical_poses_classify_to_their_gesture() {
        for gesture in Gesture::ALL {
            let hand = poses::for_gesture(gesture, Handedness::Right);
            let result = classify_pose(&hand);
            assert_eq!(result.label, gesture, "pose for {}", gesture);
            assert!(
                result.confidence >= 0.5,
                "{} confidence {}",
                gesture,
                result.confidence
            );
        }
    }

    #[test]
    fn neutral_pose_classifies_none() {
        let result = classify_pose(&poses::neutral(Handedness::Left));
        assert_eq!(result.label, Gesture::None);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn classification_is_deterministic() {
        let features = extract(&poses::peace_sign(Handedness::Right)).unwrap();
        let config = RecognitionConfig::default();
        assert_eq!(classify(&features, &config), classify(&features, &config));
    }

    #[test]
    fn pinch_confidence_scales_with_distance() {
        let config = RecognitionConfig::default();
        let near = extract(&poses::pinch(Handedness::Right, 0.01)).unwrap();
        let far = extract(&poses::pinch(Handedness::Right, 0.04)).unwrap();
        let near_conf = classify(&near, &config).confidence;
        let far_conf = classify(&far, &config);
        assert!(near_conf > 0.75);
        // 1 - 0.04/0.05 = 0.2, below the pinch minimum: none, no fall-through.
        assert_eq!(far_conf.label, Gesture::None);
    }

    #[test]
    fn below_minimum_confidence_yields_none() {
        let mut config = RecognitionConfig::default();
        config.min_confidence.open_palm = 0.99;
        let features = extract(&poses::open_palm(Handedness::Right)).unwrap();
        assert_eq!(classify(&features, &config).label, Gesture::None);
    }

    #[test]
    fn overlapping_rules_resolve_by_priority() {
        // A hand that is simultaneously pinching and fisted is impossible
        // with default bands, but a forced feature vector documents that
        // the first rule in priority order wins.
        let features = crate::features::FeatureVector {
            curl: [0.3, 0.3, 0.3, 0.3, 0.3],
            thumb_index_dist: 0.01,
            index_middle_dist: 0.01,
            orientation_deg: 0.0,
        };
        let config = RecognitionConfig::default();
        assert_eq!(classify(&features, &config).label, Gesture::Pinch);
    }

    #[test]
    fn tilted_thumbs_up_is_rejected() {
        let mut hand = poses::thumbs_up(Handedness::Right);
        // Rotate the wrist out from under the palm: ~45 degrees off vertical.
        hand.landmarks[0] = crate::types::Landmark::new(0.3, 0.9, 0.0);
        let features = extract(&hand).unwrap();
        let config = RecognitionConfig::default();
        assert_ne!(classify(&features, &config).label, Gesture::ThumbsUp);
    }
}
