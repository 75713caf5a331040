//! Topical relevance filtering.
//!
//! Each item is scored 0–100 against the concepts found in the query:
//! diseases up to 40, biomarkers up to 30, interventions up to 20, outcomes
//! up to 10. A concept in the title or subject headings earns roughly twice
//! what an abstract-only mention earns. Items under the threshold are
//! excluded and reported with their score and reasons.

use serde::Serialize;
use tracing::debug;

use evidex_core::models::evidence::{EvidenceItem, EvidencePackage};

use crate::concepts::{ConceptKind, ConceptVocabulary, QueryConcepts};

pub const DEFAULT_THRESHOLD: u32 = 30;

/// Score of one item with the reasons that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelevanceScore {
    pub score: u32,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExcludedItem {
    pub title: String,
    pub score: u32,
    pub reasons: Vec<String>,
}

/// Result of filtering one list.
#[derive(Debug, Clone, Default)]
pub struct RelevanceOutcome {
    pub kept: Vec<EvidenceItem>,
    pub excluded: Vec<ExcludedItem>,
    /// The query named no known concept, so nothing was scored.
    pub skipped: bool,
}

/// Per-category diagnostics for a filtered package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRelevance {
    pub category: String,
    pub kept: usize,
    pub excluded: Vec<ExcludedItem>,
    pub skipped: bool,
}

/// Relevance filter bound to a concept vocabulary and threshold.
#[derive(Debug, Clone, Copy)]
pub struct RelevanceFilter<'v> {
    vocabulary: &'v ConceptVocabulary,
    threshold: u32,
}

impl<'v> RelevanceFilter<'v> {
    pub fn new(vocabulary: &'v ConceptVocabulary, threshold: u32) -> Self {
        Self {
            vocabulary,
            threshold,
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Score a single item against pre-extracted query concepts.
    pub fn score_item(&self, concepts: &QueryConcepts<'_>, item: &EvidenceItem) -> RelevanceScore {
        let title = self
            .vocabulary
            .expand(&headline_text(item))
            .into_owned();
        let abstract_text = self.vocabulary.expand(item.abstract_text()).into_owned();

        let mut score = 0;
        let mut reasons = Vec::new();
        for kind in ConceptKind::ALL {
            let mut points = 0;
            for concept in concepts.of_kind(kind) {
                if concept.is_match(&title) {
                    points += kind.title_points();
                    reasons.push(format!("{} '{}' in title", kind.label(), concept.id()));
                } else if concept.is_match(&abstract_text) {
                    points += kind.abstract_points();
                    reasons.push(format!("{} '{}' in abstract", kind.label(), concept.id()));
                }
            }
            score += points.min(kind.cap());
        }
        RelevanceScore { score, reasons }
    }

    /// Split one list into kept and excluded items. Order of kept items is
    /// the input order.
    pub fn filter_items(&self, query: &str, items: &[EvidenceItem]) -> RelevanceOutcome {
        let concepts = self.vocabulary.extract(query);
        self.filter_with(&concepts, items)
    }

    fn filter_with(&self, concepts: &QueryConcepts<'_>, items: &[EvidenceItem]) -> RelevanceOutcome {
        if concepts.is_empty() {
            return RelevanceOutcome {
                kept: items.to_vec(),
                excluded: Vec::new(),
                skipped: true,
            };
        }

        let mut outcome = RelevanceOutcome::default();
        for item in items {
            let scored = self.score_item(concepts, item);
            if scored.score < self.threshold {
                outcome.excluded.push(ExcludedItem {
                    title: item.title.clone(),
                    score: scored.score,
                    reasons: scored.reasons,
                });
            } else {
                outcome.kept.push(item.clone());
            }
        }
        outcome
    }

    /// Filter every category independently into a new package.
    pub fn filter_package(
        &self,
        query: &str,
        package: &EvidencePackage,
    ) -> (EvidencePackage, Vec<CategoryRelevance>) {
        let concepts = self.vocabulary.extract(query);
        debug!(concepts = concepts.len(), "relevance concepts extracted");

        let mut reports = Vec::new();
        let filtered = package.map_categories(|name, items| {
            let outcome = self.filter_with(&concepts, items);
            debug!(
                category = name,
                kept = outcome.kept.len(),
                excluded = outcome.excluded.len(),
                "relevance filter"
            );
            reports.push(CategoryRelevance {
                category: name.to_string(),
                kept: outcome.kept.len(),
                excluded: outcome.excluded,
                skipped: outcome.skipped,
            });
            outcome.kept
        });
        (filtered, reports)
    }
}

/// Title plus subject headings: the text that earns full points.
fn headline_text(item: &EvidenceItem) -> String {
    if item.keywords.is_empty() {
        item.title.clone()
    } else {
        format!("{}\n{}", item.title, item.keywords.join("; "))
    }
}
