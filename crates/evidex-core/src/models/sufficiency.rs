use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::scenario::AnchorScenario;

/// Coarse adequacy grade derived from the numeric score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SufficiencyLevel {
    Insufficient,
    Limited,
    Good,
    Excellent,
}

impl SufficiencyLevel {
    pub const EXCELLENT_MIN: u8 = 60;
    pub const GOOD_MIN: u8 = 40;
    pub const LIMITED_MIN: u8 = 25;

    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= Self::EXCELLENT_MIN => Self::Excellent,
            s if s >= Self::GOOD_MIN => Self::Good,
            s if s >= Self::LIMITED_MIN => Self::Limited,
            _ => Self::Insufficient,
        }
    }
}

/// Whether gathered evidence is adequate to answer, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SufficiencyScore {
    /// 0–100.
    pub score: u8,
    pub level: SufficiencyLevel,
    /// Human-readable steps, in the order they were applied.
    pub reasoning: Vec<String>,
    pub anchor_count: usize,
    pub matching_reviews: usize,
    pub matching_trials: usize,
    pub should_call_fallback_search: bool,
    pub rerank_needed: bool,
    pub scenario: Option<AnchorScenario>,
}

impl SufficiencyScore {
    /// Result for a query with no evidence package at all.
    pub fn absent() -> Self {
        Self {
            score: 0,
            level: SufficiencyLevel::Insufficient,
            reasoning: vec!["No evidence package was provided".to_string()],
            anchor_count: 0,
            matching_reviews: 0,
            matching_trials: 0,
            should_call_fallback_search: true,
            rerank_needed: false,
            scenario: None,
        }
    }
}
