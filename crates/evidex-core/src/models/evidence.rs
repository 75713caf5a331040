use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::category;
use crate::error::CoreError;

/// Study or document type reported by the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EvidenceKind {
    Guideline,
    SystematicReview,
    MetaAnalysis,
    Trial,
    Article,
    #[default]
    #[serde(other)]
    Other,
}

impl EvidenceKind {
    pub fn is_review(self) -> bool {
        matches!(self, Self::SystematicReview | Self::MetaAnalysis)
    }

    /// Guidelines and evidence syntheses.
    pub fn is_high_evidence_class(self) -> bool {
        self == Self::Guideline || self.is_review()
    }
}

/// External identifiers attached to a retrieved document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Identifiers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pmid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pmcid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Identifiers {
    pub fn pmid(&self) -> Option<&str> {
        non_blank(&self.pmid)
    }

    pub fn doi(&self) -> Option<&str> {
        non_blank(&self.doi)
    }

    pub fn pmcid(&self) -> Option<&str> {
        non_blank(&self.pmcid)
    }

    pub fn url(&self) -> Option<&str> {
        non_blank(&self.url)
    }

    /// True when the item carries a bibliographic identifier (not just a URL).
    pub fn has_bibliographic_id(&self) -> bool {
        self.pmid().is_some() || self.doi().is_some() || self.pmcid().is_some()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// A retrieved document. Owned by the gathering collaborator; the pipeline
/// only reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EvidenceItem {
    pub title: String,
    #[serde(rename = "abstract", default, skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub identifiers: Identifiers,
    #[serde(default)]
    pub kind: EvidenceKind,
    /// Producing organisation or database, e.g. "cochrane", "nice", "radiopaedia".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    /// Subject headings or keywords assigned by the indexing source.
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<i16>,
    #[serde(default)]
    pub is_anchor: bool,
    /// Trial registries report whether results have been posted.
    #[serde(default)]
    pub has_results: bool,
}

impl EvidenceItem {
    pub fn new(title: impl Into<String>, kind: EvidenceKind) -> Self {
        Self {
            title: title.into(),
            kind,
            ..Self::default()
        }
    }

    pub fn abstract_text(&self) -> &str {
        self.abstract_text.as_deref().unwrap_or_default()
    }

    /// Title plus abstract, for pattern matching.
    pub fn searchable_text(&self) -> String {
        match self.abstract_text.as_deref() {
            Some(abs) if !abs.is_empty() => format!("{}\n{}", self.title, abs),
            _ => self.title.clone(),
        }
    }

    /// Stable identity used to collapse the same document returned by
    /// several sources: pmid, then doi, then pmcid, then url, then the
    /// normalised title.
    pub fn identity_key(&self) -> String {
        let ids = &self.identifiers;
        if let Some(pmid) = ids.pmid() {
            return format!("pmid:{pmid}");
        }
        if let Some(doi) = ids.doi() {
            return format!("doi:{}", doi.to_ascii_lowercase());
        }
        if let Some(pmcid) = ids.pmcid() {
            return format!("pmcid:{}", pmcid.to_ascii_uppercase());
        }
        if let Some(url) = ids.url() {
            return format!("url:{}", url.trim_end_matches('/'));
        }
        let normalized: String = self
            .title
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        format!("title:{normalized}")
    }

    /// Whether the source or journal identifies a Cochrane review.
    pub fn is_cochrane(&self) -> bool {
        let mentions = |v: &Option<String>| {
            v.as_deref()
                .is_some_and(|s| s.to_ascii_lowercase().contains("cochrane"))
        };
        mentions(&self.source) || mentions(&self.journal)
    }
}

/// Evidence gathered for one query, keyed by source category.
///
/// Created fresh per query. Pipeline stages never mutate a package in
/// place; narrowing produces a new package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvidencePackage {
    categories: BTreeMap<String, Vec<EvidenceItem>>,
}

impl EvidencePackage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builder-style insert, replacing any existing list for `name`.
    pub fn with_category(
        mut self,
        name: impl Into<String>,
        items: Vec<EvidenceItem>,
    ) -> Result<Self, CoreError> {
        self.insert(name, items)?;
        Ok(self)
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        items: Vec<EvidenceItem>,
    ) -> Result<(), CoreError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::EmptyCategory);
        }
        self.categories.insert(name, items);
        Ok(())
    }

    /// Items for a category; empty when the category was never filled.
    pub fn get(&self, name: &str) -> &[EvidenceItem] {
        self.categories.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.values().all(Vec::is_empty)
    }

    pub fn total_items(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// Categories in canonical order (see [`category::CANONICAL_ORDER`]).
    pub fn categories(&self) -> Vec<(&str, &[EvidenceItem])> {
        let mut entries: Vec<(&str, &[EvidenceItem])> = self
            .categories
            .iter()
            .map(|(name, items)| (name.as_str(), items.as_slice()))
            .collect();
        // BTreeMap iteration is alphabetical, so unknown categories stay sorted.
        entries.sort_by_key(|(name, _)| category::rank(name));
        entries
    }

    /// Every item with its category, in canonical category order.
    pub fn iter_items(&self) -> impl Iterator<Item = (&str, &EvidenceItem)> {
        self.categories()
            .into_iter()
            .flat_map(|(name, items)| items.iter().map(move |item| (name, item)))
    }

    /// Build a new package by transforming each category's list.
    pub fn map_categories<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&str, &[EvidenceItem]) -> Vec<EvidenceItem>,
    {
        let categories = self
            .categories
            .iter()
            .map(|(name, items)| (name.clone(), f(name, items)))
            .collect();
        Self { categories }
    }
}

/// Groups `(category, item)` pairs, keeping item order within a category.
impl FromIterator<(String, EvidenceItem)> for EvidencePackage {
    fn from_iter<I: IntoIterator<Item = (String, EvidenceItem)>>(iter: I) -> Self {
        let mut categories: BTreeMap<String, Vec<EvidenceItem>> = BTreeMap::new();
        for (name, item) in iter {
            categories.entry(name).or_default().push(item);
        }
        Self { categories }
    }
}
