//! Anchor scenario catalog and detection.

use std::collections::HashSet;

use tracing::debug;

use evidex_core::models::scenario::AnchorScenario;
use evidex_core::models::tags::{TagKind, TagSet};

use crate::builtin;
use crate::error::TagError;
use crate::vocabulary::TagVocabulary;

/// Curated scenarios in specificity order: scenarios requiring more
/// simultaneous disease tags come first, ties keep their listed order.
#[derive(Debug, Clone)]
pub struct ScenarioCatalog {
    scenarios: Vec<AnchorScenario>,
}

impl ScenarioCatalog {
    /// Validate `scenarios` against `vocabulary` and sort by specificity.
    pub fn new(
        mut scenarios: Vec<AnchorScenario>,
        vocabulary: &TagVocabulary,
    ) -> Result<Self, TagError> {
        if scenarios.is_empty() {
            return Err(TagError::EmptyCatalog);
        }

        let mut ids = HashSet::new();
        for scenario in &scenarios {
            let invalid = |reason: String| TagError::InvalidScenario {
                scenario: scenario.id.clone(),
                reason,
            };
            if !ids.insert(scenario.id.as_str()) {
                return Err(invalid("duplicate scenario id".to_string()));
            }
            if scenario.disease_tags.is_empty() || scenario.decision_tags.is_empty() {
                return Err(invalid(
                    "needs at least one disease tag and one decision tag".to_string(),
                ));
            }
            for (tags, kind) in [
                (&scenario.disease_tags, TagKind::Disease),
                (&scenario.decision_tags, TagKind::Decision),
            ] {
                for tag in tags {
                    match vocabulary.get(tag) {
                        Some(t) if t.kind() == kind => {}
                        Some(_) => return Err(invalid(format!("tag '{tag}' has the wrong kind"))),
                        None => return Err(invalid(format!("unknown tag '{tag}'"))),
                    }
                }
            }
        }

        scenarios.sort_by(|a, b| b.specificity().cmp(&a.specificity()));
        Ok(Self { scenarios })
    }

    pub fn builtin(vocabulary: &TagVocabulary) -> Result<Self, TagError> {
        Self::new(builtin::scenarios(), vocabulary)
    }

    /// Parse a JSON array of scenarios.
    pub fn from_json(json: &str, vocabulary: &TagVocabulary) -> Result<Self, TagError> {
        let scenarios: Vec<AnchorScenario> = serde_json::from_str(json)?;
        Self::new(scenarios, vocabulary)
    }

    pub fn scenarios(&self) -> &[AnchorScenario] {
        &self.scenarios
    }

    pub fn get(&self, id: &str) -> Option<&AnchorScenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    /// The most specific scenario matching `tags`, if any.
    ///
    /// Deterministic: the catalog order is fixed at construction.
    pub fn detect(&self, tags: &TagSet) -> Option<&AnchorScenario> {
        let found = self.scenarios.iter().find(|s| s.matches(tags));
        debug!(scenario = found.map(|s| s.id.as_str()), "scenario detection");
        found
    }
}
