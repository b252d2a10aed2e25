//! Behavioral labels and the two suspicion groupings.
//!
//! A [`Label`] is the outcome of one classification. Each label carries a
//! fixed qualitative [`SuspicionTier`]; the coarse [`SuspicionCategory`] is
//! derived separately from the running score and is never stored. Both
//! groupings use the same low/medium/high scale but are distinct on the wire
//! (`suspicion_level` vs `suspicion_category`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Outcome of the orientation classifier for one face observation.
///
/// Serializes to the exact strings the monitoring clients expect
/// (e.g. `"Looking Left (Suspicious)"`), so this type can be used directly
/// in wire and storage structs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// Nose centered between the eyes — attentive.
    #[serde(rename = "Focused")]
    Focused,
    /// Nose offset left beyond the threshold.
    #[serde(rename = "Looking Left (Suspicious)")]
    LookingLeft,
    /// Nose offset right beyond the threshold.
    #[serde(rename = "Looking Right (Suspicious)")]
    LookingRight,
    /// Vertical offset dominates — looking up or down.
    #[serde(rename = "Looking Away (Suspicious)")]
    LookingAway,
    /// No face in the frame.
    #[serde(rename = "No Face Detected")]
    NoFace,
    /// More than one face in the frame.
    #[serde(rename = "Multiple Faces Detected")]
    MultipleFaces,
}

impl Label {
    /// Wire string reported to supervisors and persisted in the sink.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Focused => "Focused",
            Self::LookingLeft => "Looking Left (Suspicious)",
            Self::LookingRight => "Looking Right (Suspicious)",
            Self::LookingAway => "Looking Away (Suspicious)",
            Self::NoFace => "No Face Detected",
            Self::MultipleFaces => "Multiple Faces Detected",
        }
    }

    /// Qualitative tier attached to this label.
    ///
    /// `NoFace` reports `Medium` even though its score weight exceeds the
    /// looking-away labels'; only `MultipleFaces` reports `High`. The
    /// asymmetry is part of the published protocol.
    #[must_use]
    pub fn tier(self) -> SuspicionTier {
        match self {
            Self::Focused => SuspicionTier::Low,
            Self::LookingLeft | Self::LookingRight | Self::LookingAway | Self::NoFace => {
                SuspicionTier::Medium
            }
            Self::MultipleFaces => SuspicionTier::High,
        }
    }

    /// Whether this label is the benign `Focused` outcome.
    #[must_use]
    pub fn is_focused(self) -> bool {
        matches!(self, Self::Focused)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Focused" => Ok(Self::Focused),
            "Looking Left (Suspicious)" => Ok(Self::LookingLeft),
            "Looking Right (Suspicious)" => Ok(Self::LookingRight),
            "Looking Away (Suspicious)" => Ok(Self::LookingAway),
            "No Face Detected" => Ok(Self::NoFace),
            "Multiple Faces Detected" => Ok(Self::MultipleFaces),
            other => Err(ParseLabelError(other.to_string())),
        }
    }
}

/// Error for an unrecognized label or tier string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized label: {0}")]
pub struct ParseLabelError(pub String);

/// Qualitative suspicion tier attached to a [`Label`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuspicionTier {
    /// Benign.
    Low,
    /// Worth flagging.
    Medium,
    /// Strong cheating signal.
    High,
}

impl SuspicionTier {
    /// Wire string (`"low"` / `"medium"` / `"high"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for SuspicionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SuspicionTier {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(ParseLabelError(other.to_string())),
        }
    }
}

/// Coarse bucketing of a running suspicion score.
///
/// Derived, never stored: low for scores ≤ 5, medium for 6–12, high above.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuspicionCategory {
    /// Score ≤ 5.
    Low,
    /// Score 6–12.
    Medium,
    /// Score > 12.
    High,
}

impl SuspicionCategory {
    /// Wire string (`"low"` / `"medium"` / `"high"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for SuspicionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
