//! Inbound event dispatch — parses a participant frame and runs it through
//! the pipeline: classify → score → categorize.
//!
//! The dispatch itself is synchronous and lock-bounded; the caller performs
//! the broadcast and persistence with the result.

use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};
use vigil_analysis::{classifier, scoring, Classification};
use vigil_core::{EventKind, FlaggedEvent, Label};

use crate::registry::SessionRegistry;
use crate::websocket::protocol::{InboundEvent, StatusUpdate};

/// Result of handling one inbound frame: the update to fan out, plus the
/// record to persist when the event was non-benign.
pub struct EventOutcome {
    /// Status update for the session's supervisors.
    pub update: StatusUpdate,
    /// Flagged record, present unless this was a benign `Focused` face event.
    pub flagged: Option<FlaggedEvent>,
}

/// Handle one inbound text frame from a participant.
///
/// Returns `None` for malformed payloads and unknown event kinds — both are
/// dropped silently and the connection stays open. Scoring happens under
/// the registry lock; the wall-clock and monotonic timestamps are passed in
/// so tests control time.
#[instrument(skip_all, fields(exam_id = %exam_id, student = %student_name))]
pub fn handle_event(
    registry: &SessionRegistry,
    exam_id: &str,
    student_name: &str,
    raw: &str,
    wall_now: DateTime<Utc>,
    now: Instant,
) -> Option<EventOutcome> {
    let event: InboundEvent = match serde_json::from_str(raw) {
        Ok(ev) => ev,
        Err(_) => {
            debug!("malformed payload dropped");
            return None;
        }
    };

    let Some(kind) = EventKind::parse(&event.event_type) else {
        debug!(event_type = %event.event_type, "unknown event type ignored");
        return None;
    };

    let (classification, score) = match kind {
        EventKind::Face => {
            let c = classifier::classify(&event.landmarks);
            let score = registry.apply_label(exam_id, student_name, c.label, now);
            (c, score)
        }
        EventKind::TabSwitch | EventKind::WindowBlur => {
            // The event itself drives the score; the outbound message keeps
            // the benign defaults.
            let score = registry.apply_penalty(exam_id, student_name, scoring::FOCUS_LOSS_PENALTY);
            (Classification::new(Label::Focused, 1.0), score)
        }
    };

    let update = StatusUpdate {
        exam_id: exam_id.to_string(),
        student: student_name.to_string(),
        status: classification.label,
        confidence: classification.confidence,
        suspicion_level: classification.tier,
        suspicion_score: score,
        suspicion_category: scoring::categorize(score),
        timestamp: wall_now,
    };

    let is_flagged = !classification.label.is_focused() || kind != EventKind::Face;
    let flagged = is_flagged.then(|| FlaggedEvent {
        exam_id: exam_id.to_string(),
        student_name: student_name.to_string(),
        event_type: kind,
        status: classification.label,
        suspicion_level: classification.tier,
        suspicion_score: score,
        timestamp: wall_now,
    });

    Some(EventOutcome { update, flagged })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::{SuspicionCategory, SuspicionTier};

    const FOCUSED_FACE: &str = r#"{
        "event_type": "face",
        "landmarks": [
            {"left_eye": [0.0, 0.0], "right_eye": [1.0, 0.0], "nose_tip": [0.5, 0.0]}
        ]
    }"#;

    const LEFT_FACE: &str = r#"{
        "event_type": "face",
        "landmarks": [
            {"left_eye": [0.0, 0.0], "right_eye": [1.0, 0.0], "nose_tip": [0.2, 0.0]}
        ]
    }"#;

    fn dispatch(registry: &SessionRegistry, raw: &str) -> Option<EventOutcome> {
        handle_event(registry, "e1", "alice", raw, Utc::now(), Instant::now())
    }

    #[test]
    fn malformed_payload_is_dropped() {
        let reg = SessionRegistry::new();
        assert!(dispatch(&reg, "not json at all").is_none());
        assert!(dispatch(&reg, "").is_none());
        assert!(dispatch(&reg, "[1,2,3]").is_none());
        // No state was created as a side effect.
        assert_eq!(reg.score("e1", "alice"), None);
    }

    #[test]
    fn unknown_event_kind_is_ignored() {
        let reg = SessionRegistry::new();
        assert!(dispatch(&reg, r#"{"event_type": "mouse_leave"}"#).is_none());
        assert_eq!(reg.score("e1", "alice"), None);
    }

    #[test]
    fn focused_face_broadcasts_but_does_not_flag() {
        let reg = SessionRegistry::new();
        let outcome = dispatch(&reg, FOCUSED_FACE).unwrap();
        assert_eq!(outcome.update.status, Label::Focused);
        assert_eq!(outcome.update.suspicion_score, 0);
        assert_eq!(outcome.update.suspicion_category, SuspicionCategory::Low);
        assert!(outcome.flagged.is_none());
    }

    #[test]
    fn looking_face_flags_and_scores() {
        let reg = SessionRegistry::new();
        let outcome = dispatch(&reg, LEFT_FACE).unwrap();
        assert_eq!(outcome.update.status, Label::LookingLeft);
        assert_eq!(outcome.update.suspicion_score, 3);
        assert_eq!(outcome.update.suspicion_level, SuspicionTier::Medium);
        let flagged = outcome.flagged.unwrap();
        assert_eq!(flagged.event_type, EventKind::Face);
        assert_eq!(flagged.status, Label::LookingLeft);
        assert_eq!(flagged.suspicion_score, 3);
    }

    #[test]
    fn face_without_landmarks_is_no_face() {
        let reg = SessionRegistry::new();
        let outcome = dispatch(&reg, r#"{"event_type": "face"}"#).unwrap();
        assert_eq!(outcome.update.status, Label::NoFace);
        assert_eq!(outcome.update.suspicion_score, 5);
        assert!(outcome.flagged.is_some());
    }

    #[test]
    fn tab_switch_penalizes_with_benign_defaults() {
        let reg = SessionRegistry::new();
        let outcome = dispatch(&reg, r#"{"event_type": "tab_switch"}"#).unwrap();
        assert_eq!(outcome.update.status, Label::Focused);
        assert!((outcome.update.confidence - 1.0).abs() < f64::EPSILON);
        assert_eq!(outcome.update.suspicion_level, SuspicionTier::Low);
        assert_eq!(outcome.update.suspicion_score, 2);
        let flagged = outcome.flagged.unwrap();
        assert_eq!(flagged.event_type, EventKind::TabSwitch);
        assert_eq!(flagged.status, Label::Focused);
    }

    #[test]
    fn window_blur_penalizes_like_tab_switch() {
        let reg = SessionRegistry::new();
        let outcome = dispatch(&reg, r#"{"event_type": "window_blur"}"#).unwrap();
        assert_eq!(outcome.update.suspicion_score, 2);
        assert_eq!(outcome.flagged.unwrap().event_type, EventKind::WindowBlur);
    }

    #[test]
    fn consecutive_penalties_each_add_two() {
        let reg = SessionRegistry::new();
        let first = dispatch(&reg, r#"{"event_type": "tab_switch"}"#).unwrap();
        assert_eq!(first.update.suspicion_score, 2);
        let second = dispatch(&reg, r#"{"event_type": "tab_switch"}"#).unwrap();
        assert_eq!(second.update.suspicion_score, 4);
    }

    #[test]
    fn scores_accumulate_across_event_kinds() {
        let reg = SessionRegistry::new();
        let _ = dispatch(&reg, FOCUSED_FACE).unwrap(); // 0
        let tab = dispatch(&reg, r#"{"event_type": "tab_switch"}"#).unwrap(); // 2
        assert_eq!(tab.update.suspicion_score, 2);
        let noface = dispatch(&reg, r#"{"event_type": "face"}"#).unwrap(); // +5
        assert_eq!(noface.update.suspicion_score, 7);
        assert_eq!(noface.update.suspicion_category, SuspicionCategory::Medium);
    }

    #[test]
    fn category_crosses_into_high() {
        let reg = SessionRegistry::new();
        let multi = r#"{"event_type": "face", "landmarks": [{}, {}]}"#;
        let first = dispatch(&reg, multi).unwrap(); // 8
        assert_eq!(first.update.suspicion_category, SuspicionCategory::Medium);
        let second = dispatch(&reg, multi).unwrap(); // 16
        assert_eq!(second.update.status, Label::MultipleFaces);
        assert_eq!(second.update.suspicion_category, SuspicionCategory::High);
        assert_eq!(second.update.suspicion_level, SuspicionTier::High);
    }

    #[test]
    fn timestamps_flow_into_update_and_record() {
        let reg = SessionRegistry::new();
        let wall = Utc::now();
        let outcome =
            handle_event(&reg, "e1", "alice", LEFT_FACE, wall, Instant::now()).unwrap();
        assert_eq!(outcome.update.timestamp, wall);
        assert_eq!(outcome.flagged.unwrap().timestamp, wall);
    }
}
