//! Track language inference.
//!
//! Signals, cheapest first:
//!
//! 1. Keywords in the track name (`keywords`)
//! 2. Elimination from the file's known languages (`elimination`)
//! 3. Majority vote of a text classifier over the dialogue (`voting`)
//! 4. The same vote after stripping lines shared with other tracks (`duplicates`)
//!
//! The orchestrator's controller decides which of these run for a track.

pub mod duplicates;
pub mod elimination;
pub mod keywords;
pub mod languages;
pub mod normalize;
pub mod oracle;
pub mod voting;

pub use duplicates::{
    find_siblings, release_group_token, remove_shared_lines, ComparisonTools,
    DisambiguationOutcome, DuplicateDisambiguator,
};
pub use elimination::{
    Elimination, EliminationReasoner, EliminationRule, LanguagePair, TrackLanguageCounts,
};
pub use keywords::{KeywordMatch, KeywordMatcher};
pub use normalize::{NormalizedLine, TextNormalizer};
pub use oracle::{Classification, ClassificationOracle, FastTextOracle, OracleError};
pub use voting::{LineFailure, VoteOutcome, VoteResult, VotingAggregator};
