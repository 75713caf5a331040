use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::tags::TagSet;

/// Clinical area a scenario belongs to. Trauma scenarios get relaxed
/// sufficiency rules because their literature is image- and case-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ClinicalDomain {
    #[default]
    General,
    Trauma,
}

/// A curated clinical situation with pre-vetted evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnchorScenario {
    pub id: String,
    pub name: String,
    pub disease_tags: Vec<String>,
    pub decision_tags: Vec<String>,
    #[serde(default)]
    pub domain: ClinicalDomain,
}

impl AnchorScenario {
    /// A scenario naming more than one disease needs all of them.
    pub fn is_multi_disease(&self) -> bool {
        self.disease_tags.len() > 1
    }

    pub fn specificity(&self) -> usize {
        self.disease_tags.len()
    }

    pub fn matches(&self, tags: &TagSet) -> bool {
        let diseases_ok = if self.is_multi_disease() {
            self.disease_tags.iter().all(|d| tags.has_disease(d))
        } else {
            self.disease_tags.iter().any(|d| tags.has_disease(d))
        };
        diseases_ok && self.decision_tags.iter().any(|d| tags.has_decision(d))
    }
}
