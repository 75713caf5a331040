use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Independent quality markers shown next to a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum QualityBadge {
    Guideline,
    LeadingJournal,
    Recent,
    SystematicReview,
}

impl QualityBadge {
    pub fn label(self) -> &'static str {
        match self {
            Self::Guideline => "Guideline",
            Self::LeadingJournal => "Leading Journal",
            Self::Recent => "Recent",
            Self::SystematicReview => "Systematic Review",
        }
    }
}

/// Display-ready reference derived from one evidence item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FormattedReference {
    /// 1-based position in the final reference list.
    pub number: usize,
    pub title: String,
    /// At most three names, followed by "et al." when more were listed.
    pub authors: Vec<String>,
    pub journal_badge: Option<String>,
    pub year: Option<i16>,
    pub url: String,
    pub quality_badges: Vec<QualityBadge>,
}

impl FormattedReference {
    pub fn has_badge(&self, badge: QualityBadge) -> bool {
        self.quality_badges.contains(&badge)
    }
}
