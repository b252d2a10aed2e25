//! Suspicion scoring: label-driven deltas, discrete penalties, time decay.
//!
//! The score is a non-negative integer per (exam, participant) pair. It only
//! moves through [`apply_label`] and [`apply_penalty`]; callers serialize
//! access (the connection registry holds its lock across every update).

use std::time::{Duration, Instant};

use vigil_core::{Label, SuspicionCategory};

/// Continuous focus required before one point decays.
pub const DECAY_INTERVAL: Duration = Duration::from_secs(30);

/// Points added for a tab-switch or window-blur event.
pub const FOCUS_LOSS_PENALTY: u32 = 2;

/// Scores of 5 and below categorize as low.
const LOW_CEILING: u32 = 5;

/// Scores of 12 and below (but above [`LOW_CEILING`]) categorize as medium.
const MEDIUM_CEILING: u32 = 12;

/// Per-participant scoring state.
///
/// One instance exists per (exam, participant-name) pair, created at zero on
/// first connection or first scoring event and discarded on disconnect.
#[derive(Clone, Debug)]
pub struct ParticipantState {
    score: u32,
    last_label: Option<Label>,
    last_transition: Instant,
}

impl ParticipantState {
    /// Fresh zero-score state.
    #[must_use]
    pub fn new(now: Instant) -> Self {
        Self {
            score: 0,
            last_label: None,
            last_transition: now,
        }
    }

    /// Current score.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Label applied most recently, if any.
    #[must_use]
    pub fn last_label(&self) -> Option<Label> {
        self.last_label
    }
}

/// Apply a classification label and return the updated score.
///
/// A `Focused` observation that extends an unbroken `Focused` run of at
/// least [`DECAY_INTERVAL`] decays one point (floored at zero) and restarts
/// the interval; the first `Focused` after any other label only restarts the
/// timer. Non-focused labels add their fixed weight and restart the timer:
/// +3 for the looking-away variants, +5 for no face, +8 for multiple faces.
pub fn apply_label(state: &mut ParticipantState, label: Label, now: Instant) -> u32 {
    if label == Label::Focused {
        if state.last_label == Some(Label::Focused) {
            if now.duration_since(state.last_transition) >= DECAY_INTERVAL {
                state.score = state.score.saturating_sub(1);
                state.last_transition = now;
            }
        } else {
            state.last_transition = now;
        }
    } else {
        state.last_transition = now;
    }

    let delta = match label {
        Label::Focused => 0,
        Label::LookingLeft | Label::LookingRight | Label::LookingAway => 3,
        Label::NoFace => 5,
        Label::MultipleFaces => 8,
    };
    state.score = state.score.saturating_add(delta);
    state.last_label = Some(label);
    state.score
}

/// Unconditionally add `points` and return the updated score.
///
/// Used for tab-switch and window-blur events. Does not touch the last
/// label or the decay timer — a penalty never interrupts a focus run.
pub fn apply_penalty(state: &mut ParticipantState, points: u32) -> u32 {
    state.score = state.score.saturating_add(points);
    state.score
}

/// Bucket a score into the coarse category reported to supervisors.
#[must_use]
pub fn categorize(score: u32) -> SuspicionCategory {
    if score <= LOW_CEILING {
        SuspicionCategory::Low
    } else if score <= MEDIUM_CEILING {
        SuspicionCategory::Medium
    } else {
        SuspicionCategory::High
    }
}
