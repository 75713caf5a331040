use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Why a `[[N]]` marker could not be kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum InvalidReason {
    /// N was zero.
    NotPositive,
    /// N exceeds the number of reference slots.
    OutOfRange,
    /// The cited item has no pmid, doi, pmcid or verified guideline URL.
    Unverifiable,
    /// The cited item links to a search-engine query.
    DisallowedUrl,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvalidCitation {
    pub number: u64,
    /// Byte offset of the first marker citing `number`.
    pub position: usize,
    pub reason: InvalidReason,
    pub message: String,
}

/// Outcome of checking generated text against the supplied evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CitationValidation {
    pub is_valid: bool,
    pub invalid_citations: Vec<InvalidCitation>,
    /// Input text with every invalid marker removed.
    pub sanitized_text: String,
    /// Distinct valid slot numbers, in order of first citation.
    pub cited_references: Vec<usize>,
}
