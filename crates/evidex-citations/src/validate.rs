//! Citation validation and sanitisation.

use std::collections::HashSet;

use tracing::warn;

use evidex_core::models::citation::{CitationValidation, InvalidCitation, InvalidReason};

use crate::parse::{Citation, first_occurrences, parse_markers, rewrite_markers};
use crate::slots::ReferenceSlots;

/// Checks generated text against the slots that were shown to the generator.
#[derive(Debug, Clone, Copy)]
pub struct CitationValidator<'a> {
    slots: &'a ReferenceSlots,
}

impl<'a> CitationValidator<'a> {
    pub fn new(slots: &'a ReferenceSlots) -> Self {
        Self { slots }
    }

    /// Why `number` cannot be cited, if it cannot.
    pub fn check(&self, number: u64) -> Option<(InvalidReason, String)> {
        if number == 0 {
            return Some((
                InvalidReason::NotPositive,
                "citation numbers start at 1".to_string(),
            ));
        }
        let available = self.slots.len();
        let slot = usize::try_from(number).ok().and_then(|n| self.slots.get(n));
        let Some(slot) = slot else {
            return Some((
                InvalidReason::OutOfRange,
                format!("only {available} references are available"),
            ));
        };
        if slot.has_disallowed_url() {
            return Some((
                InvalidReason::DisallowedUrl,
                format!("'{}' links to a search-engine query", slot.item.title),
            ));
        }
        if !slot.is_verifiable() {
            return Some((
                InvalidReason::Unverifiable,
                format!("'{}' has no pmid, doi, pmcid or verified guideline URL", slot.item.title),
            ));
        }
        None
    }

    pub fn validate(&self, text: &str) -> CitationValidation {
        let markers = parse_markers(text);

        let mut invalid_citations = Vec::new();
        let mut rejected = HashSet::new();
        let mut cited_references = Vec::new();
        for Citation { number, position } in first_occurrences(&markers) {
            match self.check(number) {
                Some((reason, message)) => {
                    warn!(number, position, ?reason, %message, "invalid citation removed");
                    rejected.insert(number);
                    invalid_citations.push(InvalidCitation {
                        number,
                        position,
                        reason,
                        message,
                    });
                }
                // check() only passes numbers that index a slot
                None => cited_references.push(number as usize),
            }
        }

        let sanitized_text = if rejected.is_empty() {
            text.to_string()
        } else {
            rewrite_markers(text, &markers, |numbers| {
                numbers
                    .iter()
                    .copied()
                    .filter(|n| !rejected.contains(n))
                    .collect()
            })
        };

        CitationValidation {
            is_valid: invalid_citations.is_empty(),
            invalid_citations,
            sanitized_text,
            cited_references,
        }
    }
}
