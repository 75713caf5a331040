use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Whether a tag names a condition or a clinical decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TagKind {
    Disease,
    Decision,
}

/// Tags detected in one query.
///
/// Tag lists are ordered by the offset of their earliest trigger match, so
/// the primary tag is always the first element of its list. Construction
/// goes through [`TagSet::new`] to keep that invariant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct TagSet {
    disease_tags: Vec<String>,
    decision_tags: Vec<String>,
    primary_disease: Option<String>,
    secondary_diseases: Vec<String>,
    primary_decision: Option<String>,
    secondary_decisions: Vec<String>,
}

impl TagSet {
    /// Build from tag ids already ordered by first match. Duplicates are
    /// dropped, keeping the earliest.
    pub fn new<D, C>(diseases: D, decisions: C) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let disease_tags = dedup(diseases);
        let decision_tags = dedup(decisions);
        Self {
            primary_disease: disease_tags.first().cloned(),
            secondary_diseases: disease_tags.iter().skip(1).cloned().collect(),
            primary_decision: decision_tags.first().cloned(),
            secondary_decisions: decision_tags.iter().skip(1).cloned().collect(),
            disease_tags,
            decision_tags,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn disease_tags(&self) -> &[String] {
        &self.disease_tags
    }

    pub fn decision_tags(&self) -> &[String] {
        &self.decision_tags
    }

    pub fn primary_disease(&self) -> Option<&str> {
        self.primary_disease.as_deref()
    }

    pub fn secondary_diseases(&self) -> &[String] {
        &self.secondary_diseases
    }

    pub fn primary_decision(&self) -> Option<&str> {
        self.primary_decision.as_deref()
    }

    pub fn secondary_decisions(&self) -> &[String] {
        &self.secondary_decisions
    }

    pub fn has_disease(&self, id: &str) -> bool {
        self.disease_tags.iter().any(|t| t == id)
    }

    pub fn has_decision(&self, id: &str) -> bool {
        self.decision_tags.iter().any(|t| t == id)
    }

    pub fn is_empty(&self) -> bool {
        self.disease_tags.is_empty() && self.decision_tags.is_empty()
    }

    /// Union with `other`. Tags already present keep their position, so the
    /// primary tags of `self` stay primary; new tags become secondary.
    pub fn merged_with(&self, other: &TagSet) -> TagSet {
        TagSet::new(
            self.disease_tags.iter().chain(&other.disease_tags).cloned(),
            self.decision_tags.iter().chain(&other.decision_tags).cloned(),
        )
    }
}

fn dedup<I>(tags: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.into();
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}
