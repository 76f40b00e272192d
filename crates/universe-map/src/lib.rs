//! Header to target field mapping.
//!
//! - [`normalize_label`] canonicalizes labels before comparison.
//! - [`score`] rates a header against a field label in `[0, 1]`.
//! - [`MappingEngine`] proposes a mapping for a whole header row.
//! - [`MappingState`] holds a mapping while a user edits it.

#![deny(unsafe_code)]

mod engine;
mod error;
mod normalize;
mod score;
mod state;

pub use engine::{AUTO_MAP_THRESHOLD, Candidate, MappingEngine, MappingResult, exceeds_threshold};
pub use error::{MappingError, Result};
pub use normalize::normalize_label;
pub use score::{
    CONTAINMENT_SCORE, ConfidenceBand, EXACT_MATCH_SCORE, HIGH_BAND_FLOOR, LabelScore,
    MEDIUM_BAND_FLOOR, ScoreRule, score, score_detail,
};
pub use state::{MappingRow, MappingState, MappingSummary};
