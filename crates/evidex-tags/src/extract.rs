use tracing::debug;

use evidex_core::models::tags::TagSet;

use crate::vocabulary::{CompiledTag, TagVocabulary};

/// A tag that fired on a query, with where it first fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatch {
    pub id: String,
    /// Byte offset into the abbreviation-expanded query.
    pub offset: usize,
}

/// Derive disease and decision tags from a free-text query.
///
/// A tag is included once however many of its triggers occur. Within each
/// kind, tags are ordered by earliest trigger offset (ties broken by
/// vocabulary order), so the first one is primary. A query that matches
/// nothing yields an empty `TagSet`, which is a valid result.
pub fn extract_tags(vocabulary: &TagVocabulary, query: &str) -> TagSet {
    let expanded = vocabulary.expand(query);
    let diseases = match_tags(vocabulary.diseases(), &expanded);
    let decisions = match_tags(vocabulary.decisions(), &expanded);

    debug!(
        diseases = diseases.len(),
        decisions = decisions.len(),
        "extracted query tags"
    );

    TagSet::new(
        diseases.into_iter().map(|m| m.id),
        decisions.into_iter().map(|m| m.id),
    )
}

/// Every tag in `tags` that fires on `text`, earliest first.
pub fn match_tags(tags: &[CompiledTag], text: &str) -> Vec<TagMatch> {
    let mut matches: Vec<TagMatch> = tags
        .iter()
        .filter_map(|tag| {
            tag.first_match(text).map(|offset| TagMatch {
                id: tag.id().to_string(),
                offset,
            })
        })
        .collect();
    // Stable sort keeps vocabulary order for equal offsets.
    matches.sort_by_key(|m| m.offset);
    matches
}
