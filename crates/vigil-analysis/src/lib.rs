//! # vigil-analysis
//!
//! Pure analysis components for the proctoring core:
//!
//! - **Orientation classifier**: facial-landmark geometry → behavioral label
//! - **Scoring engine**: labels and discrete penalties → running suspicion
//!   score with time-based decay
//!
//! Both are deterministic and free of I/O. Time enters only as an explicit
//! `Instant` argument, so callers own the clock and tests are exact.

#![deny(unsafe_code)]

pub mod classifier;
pub mod scoring;

pub use classifier::{classify, Classification, FaceLandmarks};
pub use scoring::{apply_label, apply_penalty, categorize, ParticipantState};
