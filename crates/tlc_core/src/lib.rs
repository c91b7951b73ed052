//! Track language correction core.
//!
//! Finds Matroska tracks with missing or wrong language tags, decides the
//! language from the track name, by elimination against the other tracks,
//! or by classifying the subtitle dialogue, and writes the tag back.
//! Contains no CLI code so other front ends can drive it.

pub mod config;
pub mod container;
pub mod detection;
pub mod extraction;
pub mod logging;
pub mod models;
pub mod notify;
pub mod orchestrator;
pub mod subtitles;

pub use config::{ConfigManager, Settings};
pub use orchestrator::{run, Collaborators, RunReport, Target};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
