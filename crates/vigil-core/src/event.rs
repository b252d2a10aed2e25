//! Inbound event taxonomy and the persisted flagged-event record.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::label::{Label, SuspicionTier};

/// Kind of inbound behavioral event a participant client can send.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A face-landmark snapshot to be classified.
    Face,
    /// The participant switched browser tabs.
    TabSwitch,
    /// The exam window lost focus.
    WindowBlur,
}

impl EventKind {
    /// Wire tag (`"face"` / `"tab_switch"` / `"window_blur"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Face => "face",
            Self::TabSwitch => "tab_switch",
            Self::WindowBlur => "window_blur",
        }
    }

    /// Parse a wire tag. Unknown tags return `None` — the pipeline ignores
    /// them rather than treating them as errors.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "face" => Some(Self::Face),
            "tab_switch" => Some(Self::TabSwitch),
            "window_blur" => Some(Self::WindowBlur),
            _ => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted record of a non-benign event.
///
/// Written to the durable sink whenever a classified label is not `Focused`,
/// or the event is a tab-switch/window-blur. Benign `Focused` face events
/// are never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlaggedEvent {
    /// Exam session identifier.
    pub exam_id: String,
    /// Participant name within the session.
    pub student_name: String,
    /// Inbound event kind that produced this record.
    pub event_type: EventKind,
    /// Classified label (or `Focused` for tab/blur penalties).
    pub status: Label,
    /// Qualitative tier attached to the label.
    pub suspicion_level: SuspicionTier,
    /// Running score after the event was applied.
    pub suspicion_score: u32,
    /// When the event was processed.
    pub timestamp: DateTime<Utc>,
}

/// A [`FlaggedEvent`] as read back from the sink, with its row ID.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredFlaggedEvent {
    /// Sink-assigned row ID.
    pub id: i64,
    /// The stored record.
    #[serde(flatten)]
    pub event: FlaggedEvent,
}
