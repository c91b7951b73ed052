//! Run orchestration.
//!
//! [`run`] walks the target files in order. For each file the
//! [`DecisionController`] reads the tracks, evaluates every track that
//! needs a language and writes the decisions. Failures are caught at the
//! track or file level and end up in the returned [`RunReport`].

mod controller;
pub mod discovery;
mod errors;
mod report;
mod run;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::{Collaborators, DecisionController, TrackEvaluation, TrackOutcome, TrackState};
pub use discovery::{check_single_file, directory_files, discover_files, DiscoveryError, FileFilter};
pub use errors::{FileError, TrackError};
pub use report::{format_duration, ChangeRecord, Issue, IssueKind, Reporter, RunReport};
pub use run::{run, Target};
