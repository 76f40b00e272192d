//! Similarity scoring between source headers and target field labels.
//!
//! The score is an ordered cascade over normalized labels:
//! exact match, then containment in either direction, then Levenshtein
//! similarity relative to the longer label. The containment rule returns a
//! fixed constant, so the result is not a metric.

use std::fmt;

use rapidfuzz::distance::levenshtein;
use serde::{Deserialize, Serialize};

use crate::normalize::normalize_label;

/// Score for labels that normalize identically.
pub const EXACT_MATCH_SCORE: f64 = 1.0;
/// Score when one normalized label contains the other.
pub const CONTAINMENT_SCORE: f64 = 0.8;
/// Scores strictly above this are [`ConfidenceBand::High`].
pub const HIGH_BAND_FLOOR: f64 = 0.8;
/// Scores strictly above this are at least [`ConfidenceBand::Medium`].
pub const MEDIUM_BAND_FLOOR: f64 = 0.6;

/// Which rule of the cascade produced a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "rule")]
pub enum ScoreRule {
    Exact,
    Containment,
    EditDistance { distance: usize, max_len: usize },
}

/// A score together with its explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub score: f64,
    pub rule: ScoreRule,
    pub source_normalized: String,
    pub target_normalized: String,
}

impl LabelScore {
    /// Human-readable explanation of the score.
    pub fn explain(&self) -> String {
        match self.rule {
            ScoreRule::Exact => format!("'{}' matches exactly", self.source_normalized),
            ScoreRule::Containment => format!(
                "'{}' and '{}' contain one another",
                self.source_normalized, self.target_normalized
            ),
            ScoreRule::EditDistance { distance, max_len } => format!(
                "edit distance {distance} over {max_len} characters ({:.0}%)",
                self.score * 100.0
            ),
        }
    }
}

/// Scores how likely `source` refers to `target`, in `[0, 1]`.
pub fn score(source: &str, target: &str) -> f64 {
    score_detail(source, target).score
}

/// Scores `source` against `target` and reports which rule decided.
pub fn score_detail(source: &str, target: &str) -> LabelScore {
    let source_normalized = normalize_label(source);
    let target_normalized = normalize_label(target);

    let (score, rule) = if source_normalized == target_normalized {
        (EXACT_MATCH_SCORE, ScoreRule::Exact)
    } else if source_normalized.contains(&target_normalized)
        || target_normalized.contains(&source_normalized)
    {
        (CONTAINMENT_SCORE, ScoreRule::Containment)
    } else {
        let distance = levenshtein::distance(source_normalized.chars(), target_normalized.chars());
        let max_len = source_normalized.len().max(target_normalized.len());
        let score = if max_len == 0 {
            EXACT_MATCH_SCORE
        } else {
            1.0 - distance as f64 / max_len as f64
        };
        (score, ScoreRule::EditDistance { distance, max_len })
    };

    LabelScore {
        score,
        rule,
        source_normalized,
        target_normalized,
    }
}

/// Display band for a mapping's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConfidenceBand {
    /// Score at or below 0.6; only shown for manual mappings.
    Low,
    /// Score above 0.6 and at most 0.8.
    Medium,
    /// Score above 0.8.
    High,
}

impl ConfidenceBand {
    pub fn from_score(score: f64) -> Self {
        if score > HIGH_BAND_FLOOR {
            Self::High
        } else if score > MEDIUM_BAND_FLOOR {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Returns a human-readable description of the band.
    pub fn description(&self) -> &'static str {
        match self {
            Self::High => "high confidence - likely correct",
            Self::Medium => "medium confidence - should review",
            Self::Low => "low confidence - needs verification",
        }
    }
}

impl fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_after_normalization() {
        let detail = score_detail("Email Address", "email_address");
        assert_eq!(detail.score, 1.0);
        assert_eq!(detail.rule, ScoreRule::Exact);
        assert_eq!(score("E-Mail", "email"), 1.0);
    }

    #[test]
    fn containment_is_constant() {
        let detail = score_detail("Phone", "Phone Number");
        assert_eq!(detail.source_normalized, "phone");
        assert_eq!(detail.target_normalized, "phonenum");
        assert_eq!(detail.score, 0.8);
        assert_eq!(detail.rule, ScoreRule::Containment);
        assert_eq!(score("Phone Number", "Phone"), 0.8);
    }

    #[test]
    fn edit_distance_fallback() {
        let detail = score_detail("City", "State");
        assert_eq!(
            detail.rule,
            ScoreRule::EditDistance {
                distance: 4,
                max_len: 5
            }
        );
        assert!((detail.score - (1.0 - 4.0 / 5.0)).abs() < 1e-12);
    }

    #[test]
    fn both_empty_is_exact() {
        assert_eq!(score("", ""), 1.0);
        assert_eq!(score("--", "  "), 1.0);
    }

    #[test]
    fn empty_source_is_contained_in_everything() {
        assert_eq!(score("###", "City"), CONTAINMENT_SCORE);
    }

    #[test]
    fn bands_use_strict_cutoffs() {
        assert_eq!(ConfidenceBand::from_score(1.0), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_score(0.81), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_score(0.8), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_score(0.61), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_score(0.6), ConfidenceBand::Low);
        assert_eq!(ConfidenceBand::from_score(0.0), ConfidenceBand::Low);
    }

    #[test]
    fn explanation_names_the_rule() {
        assert!(score_detail("City", "City").explain().contains("exactly"));
        assert!(score_detail("City", "State").explain().contains("edit distance 4"));
    }
}
