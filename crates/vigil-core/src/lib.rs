//! # vigil-core
//!
//! Foundation types for the vigil exam-proctoring server.
//!
//! This crate provides the shared vocabulary that all other vigil crates depend on:
//!
//! - **Labels**: `Label` enum for classifier outcomes, with wire-exact display strings
//! - **Suspicion groupings**: `SuspicionTier` (attached to a label) and
//!   `SuspicionCategory` (derived from a score) — two related but distinct scales
//! - **Event kinds**: the inbound event taxonomy (`face` / `tab_switch` / `window_blur`)
//! - **Flagged events**: `FlaggedEvent`, the persisted record for non-benign events
//! - **`EventSink`**: the durable-sink collaborator trait implemented by `vigil-events`

#![deny(unsafe_code)]

pub mod event;
pub mod label;
pub mod sink;

pub use event::{EventKind, FlaggedEvent, StoredFlaggedEvent};
pub use label::{Label, SuspicionCategory, SuspicionTier};
pub use sink::{EventSink, SinkError};
