//! Face-orientation classification from 2D landmark geometry.
//!
//! Stateless: the same landmark input always yields the same label,
//! confidence, and tier. Coordinates are in a normalized space; only the
//! relative offset of the nose tip from the eye midpoint matters.

use serde::Deserialize;
use vigil_core::{Label, SuspicionTier};

/// Nose offset beyond `0.15 ×` eye separation reads as looking away.
const OFFSET_RATIO: f64 = 0.15;

/// One detected face. Every landmark is optional — clients send whatever
/// their detector produced.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FaceLandmarks {
    /// Left-eye center, `[x, y]`.
    #[serde(default)]
    pub left_eye: Option<[f64; 2]>,
    /// Right-eye center, `[x, y]`.
    #[serde(default)]
    pub right_eye: Option<[f64; 2]>,
    /// Nose tip, `[x, y]`.
    #[serde(default)]
    pub nose_tip: Option<[f64; 2]>,
}

/// Classifier output: label plus confidence and the label's qualitative tier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Classification {
    /// The behavioral label.
    pub label: Label,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Tier attached to the label.
    pub tier: SuspicionTier,
}

impl Classification {
    /// Build a classification; the tier always follows the label.
    #[must_use]
    pub fn new(label: Label, confidence: f64) -> Self {
        Self {
            label,
            confidence,
            tier: label.tier(),
        }
    }
}

/// Classify one landmark snapshot.
///
/// - Zero faces → `NoFace`, confidence 1.0
/// - More than one face → `MultipleFaces`, confidence 1.0
/// - A single face missing any required landmark degrades to a conservative
///   low-confidence `Focused` rather than an error
/// - Otherwise the nose offset from the eye midpoint decides the label
#[must_use]
pub fn classify(faces: &[FaceLandmarks]) -> Classification {
    if faces.is_empty() {
        return Classification::new(Label::NoFace, 1.0);
    }
    if faces.len() > 1 {
        return Classification::new(Label::MultipleFaces, 1.0);
    }

    let face = &faces[0];
    let (Some(left_eye), Some(right_eye), Some(nose)) =
        (face.left_eye, face.right_eye, face.nose_tip)
    else {
        return Classification::new(Label::Focused, 0.4);
    };

    let eye_cx = (left_eye[0] + right_eye[0]) / 2.0;
    let eye_cy = (left_eye[1] + right_eye[1]) / 2.0;
    let dx = nose[0] - eye_cx;
    let dy = nose[1] - eye_cy;

    // Coincident eyes would zero the separation; fall back to 1.0 so the
    // threshold stays finite.
    let mut eye_dist = (right_eye[0] - left_eye[0]).abs();
    if eye_dist == 0.0 {
        eye_dist = 1.0;
    }
    let threshold = eye_dist * OFFSET_RATIO;

    if dx.abs() <= threshold && dy.abs() <= threshold {
        Classification::new(Label::Focused, 0.95)
    } else if dx.abs() >= dy.abs() {
        if dx < 0.0 {
            Classification::new(Label::LookingLeft, 0.75)
        } else {
            Classification::new(Label::LookingRight, 0.75)
        }
    } else {
        Classification::new(Label::LookingAway, 0.75)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(left: [f64; 2], right: [f64; 2], nose: [f64; 2]) -> FaceLandmarks {
        FaceLandmarks {
            left_eye: Some(left),
            right_eye: Some(right),
            nose_tip: Some(nose),
        }
    }

    #[test]
    fn no_faces_is_no_face() {
        let c = classify(&[]);
        assert_eq!(c.label, Label::NoFace);
        assert!((c.confidence - 1.0).abs() < f64::EPSILON);
        assert_eq!(c.tier, SuspicionTier::Medium);
    }

    #[test]
    fn two_faces_is_multiple_faces() {
        let c = classify(&[FaceLandmarks::default(), FaceLandmarks::default()]);
        assert_eq!(c.label, Label::MultipleFaces);
        assert!((c.confidence - 1.0).abs() < f64::EPSILON);
        assert_eq!(c.tier, SuspicionTier::High);
    }

    #[test]
    fn missing_landmark_degrades_to_low_confidence_focused() {
        let partial = FaceLandmarks {
            left_eye: Some([0.0, 0.0]),
            right_eye: Some([1.0, 0.0]),
            nose_tip: None,
        };
        let c = classify(&[partial]);
        assert_eq!(c.label, Label::Focused);
        assert!((c.confidence - 0.4).abs() < f64::EPSILON);
        assert_eq!(c.tier, SuspicionTier::Low);
    }

    #[test]
    fn empty_face_object_degrades_to_low_confidence_focused() {
        let c = classify(&[FaceLandmarks::default()]);
        assert_eq!(c.label, Label::Focused);
        assert!((c.confidence - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn centered_nose_is_focused() {
        let c = classify(&[face([0.0, 0.0], [1.0, 0.0], [0.5, 0.0])]);
        assert_eq!(c.label, Label::Focused);
        assert!(c.confidence >= 0.9 && c.confidence <= 1.0);
        assert_eq!(c.tier, SuspicionTier::Low);
    }

    #[test]
    fn nose_left_of_midpoint_is_looking_left() {
        let c = classify(&[face([0.0, 0.0], [1.0, 0.0], [0.2, 0.0])]);
        assert_eq!(c.label, Label::LookingLeft);
        assert!((c.confidence - 0.75).abs() < f64::EPSILON);
        assert_eq!(c.tier, SuspicionTier::Medium);
    }

    #[test]
    fn nose_right_of_midpoint_is_looking_right() {
        let c = classify(&[face([0.0, 0.0], [1.0, 0.0], [0.8, 0.0])]);
        assert_eq!(c.label, Label::LookingRight);
        assert_eq!(c.tier, SuspicionTier::Medium);
    }

    #[test]
    fn vertical_offset_is_looking_away() {
        let c = classify(&[face([0.0, 0.0], [1.0, 0.0], [0.5, 0.5])]);
        assert_eq!(c.label, Label::LookingAway);
        assert_eq!(c.tier, SuspicionTier::Medium);
    }

    #[test]
    fn offset_at_threshold_is_still_focused() {
        // Eye separation 1.0 → threshold 0.15; dx exactly at the boundary.
        let c = classify(&[face([0.0, 0.0], [1.0, 0.0], [0.65, 0.0])]);
        assert_eq!(c.label, Label::Focused);
    }

    #[test]
    fn equal_axis_offsets_break_toward_horizontal() {
        // |dx| == |dy| beyond the threshold → left/right wins over away.
        let c = classify(&[face([0.0, 0.0], [1.0, 0.0], [0.8, 0.3])]);
        assert_eq!(c.label, Label::LookingRight);
    }

    #[test]
    fn coincident_eyes_use_fallback_separation() {
        // Both eyes at the same x: threshold becomes 0.15 of the 1.0
        // fallback instead of zero, so a centered nose still reads focused.
        let c = classify(&[face([0.5, 0.0], [0.5, 0.0], [0.5, 0.1])]);
        assert_eq!(c.label, Label::Focused);
    }

    #[test]
    fn landmarks_deserialize_from_pairs() {
        let json = r#"{"left_eye": [0.1, 0.2], "right_eye": [0.9, 0.2], "nose_tip": [0.5, 0.4]}"#;
        let parsed: FaceLandmarks = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.left_eye, Some([0.1, 0.2]));
        assert_eq!(parsed.nose_tip, Some([0.5, 0.4]));
    }

    #[test]
    fn landmarks_tolerate_missing_fields() {
        let parsed: FaceLandmarks = serde_json::from_str(r#"{"left_eye": [0.0, 0.0]}"#).unwrap();
        assert!(parsed.right_eye.is_none());
        assert!(parsed.nose_tip.is_none());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn deterministic(lx in -2.0f64..2.0, ly in -2.0f64..2.0,
                             rx in -2.0f64..2.0, ry in -2.0f64..2.0,
                             nx in -2.0f64..2.0, ny in -2.0f64..2.0) {
                let input = [face([lx, ly], [rx, ry], [nx, ny])];
                let first = classify(&input);
                let second = classify(&input);
                prop_assert_eq!(first.label, second.label);
                prop_assert!((first.confidence - second.confidence).abs() < f64::EPSILON);
                prop_assert_eq!(first.tier, second.tier);
            }

            #[test]
            fn confidence_always_in_unit_interval(nx in -5.0f64..5.0, ny in -5.0f64..5.0) {
                let c = classify(&[face([0.0, 0.0], [1.0, 0.0], [nx, ny])]);
                prop_assert!(c.confidence > 0.0 && c.confidence <= 1.0);
            }

            #[test]
            fn tier_always_follows_label(nx in -5.0f64..5.0, ny in -5.0f64..5.0) {
                let c = classify(&[face([0.0, 0.0], [1.0, 0.0], [nx, ny])]);
                prop_assert_eq!(c.tier, c.label.tier());
            }
        }
    }
}
