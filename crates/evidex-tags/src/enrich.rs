//! Optional tag enrichment.
//!
//! An external collaborator (typically a language model) may propose extra
//! tags for a query. The pattern-based `TagSet` is always computed first and
//! stays authoritative: enrichment can only add secondary tags that exist
//! in the vocabulary, and any failure falls back to the pattern result.

use tracing::{debug, warn};

use evidex_core::models::tags::{TagKind, TagSet};

use crate::error::TagError;
use crate::extract::extract_tags;
use crate::vocabulary::TagVocabulary;

/// Swappable source of additional tags.
pub trait TagEnricher: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Propose tags for `query`, given what pattern matching already found.
    fn enrich(&self, query: &str, base: &TagSet) -> Result<TagSet, TagError>;
}

/// Pattern-based extraction, optionally augmented by `enricher`.
pub fn extract_with_enrichment(
    vocabulary: &TagVocabulary,
    query: &str,
    enricher: Option<&dyn TagEnricher>,
) -> TagSet {
    let base = extract_tags(vocabulary, query);
    let Some(enricher) = enricher else {
        return base;
    };

    match enricher.enrich(query, &base) {
        Ok(proposed) => {
            let known = restrict_to_vocabulary(vocabulary, &proposed);
            let merged = base.merged_with(&known);
            debug!(
                enricher = enricher.name(),
                added = tag_count(&merged) - tag_count(&base),
                "applied tag enrichment"
            );
            merged
        }
        Err(e) => {
            warn!(enricher = enricher.name(), error = %e, "tag enrichment failed, using pattern tags");
            base
        }
    }
}

/// Drop proposed tags that are unknown or filed under the wrong kind.
fn restrict_to_vocabulary(vocabulary: &TagVocabulary, proposed: &TagSet) -> TagSet {
    let keep = |ids: &[String], kind: TagKind| -> Vec<String> {
        ids.iter()
            .filter(|id| vocabulary.get(id).is_some_and(|t| t.kind() == kind))
            .cloned()
            .collect()
    };
    TagSet::new(
        keep(proposed.disease_tags(), TagKind::Disease),
        keep(proposed.decision_tags(), TagKind::Decision),
    )
}

fn tag_count(tags: &TagSet) -> usize {
    tags.disease_tags().len() + tags.decision_tags().len()
}
