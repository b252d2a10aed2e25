//! Wire protocol: inbound participant events and outbound status updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vigil_analysis::FaceLandmarks;
use vigil_core::{Label, SuspicionCategory, SuspicionTier};

/// Inbound message from a participant client.
///
/// The tag stays a plain string here so unknown kinds can be ignored rather
/// than rejected as parse errors; `landmarks` is only meaningful for `face`
/// events and defaults to empty (zero faces) when absent.
#[derive(Clone, Debug, Deserialize)]
pub struct InboundEvent {
    /// Wire tag: `face`, `tab_switch`, `window_blur`, or anything else
    /// (ignored).
    pub event_type: String,
    /// Detected faces for a `face` event.
    #[serde(default)]
    pub landmarks: Vec<FaceLandmarks>,
}

/// Status update fanned out to a session's supervisors.
#[derive(Clone, Debug, Serialize)]
pub struct StatusUpdate {
    /// Exam session identifier.
    pub exam_id: String,
    /// Participant the update describes.
    pub student: String,
    /// Classified label (or `Focused` for penalty events).
    pub status: Label,
    /// Classifier confidence in `[0, 1]`.
    pub confidence: f64,
    /// Qualitative tier attached to the label.
    pub suspicion_level: SuspicionTier,
    /// Running score after this event.
    pub suspicion_score: u32,
    /// Coarse category derived from the score.
    pub suspicion_category: SuspicionCategory,
    /// When the event was processed.
    pub timestamp: DateTime<Utc>,
}
