//! Data models for the track language corrector.
//!
//! This module contains the core data structures used throughout the crate:
//! - Enums for track types, language classes, and decision evidence
//! - Track records as read from a container
//! - Decisions produced by the controller

mod decision;
mod enums;
mod media;

// Re-export all public types
pub use decision::{Confidence, Decision};
pub use enums::{EvidenceKind, LanguageClass, TrackType};
pub use media::Track;
