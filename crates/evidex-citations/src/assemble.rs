//! Final reference-list assembly.
//!
//! After validation only cited, verifiable slots remain. They are listed in
//! slot order and renumbered 1..k, and every marker in the sanitised text is
//! rewritten to the new numbers, so `[[N]]` is dense relative to the list
//! the reader sees.

use std::collections::BTreeMap;

use serde::Serialize;

use evidex_core::models::citation::CitationValidation;
use evidex_core::models::reference::FormattedReference;

use crate::parse::{parse_markers, rewrite_markers};
use crate::slots::ReferenceSlots;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssembledAnswer {
    pub text: String,
    pub references: Vec<FormattedReference>,
}

pub fn assemble(validation: &CitationValidation, slots: &ReferenceSlots) -> AssembledAnswer {
    let mut cited: Vec<usize> = validation.cited_references.clone();
    cited.sort_unstable();
    cited.dedup();

    let mut renumber: BTreeMap<u64, u64> = BTreeMap::new();
    let mut references = Vec::new();
    for slot_number in cited {
        let Some(reference) = slots.get(slot_number).and_then(|s| s.reference.as_ref()) else {
            continue;
        };
        let number = references.len() + 1;
        renumber.insert(slot_number as u64, number as u64);
        references.push(FormattedReference {
            number,
            ..reference.clone()
        });
    }

    let markers = parse_markers(&validation.sanitized_text);
    let text = rewrite_markers(&validation.sanitized_text, &markers, |numbers| {
        numbers.iter().filter_map(|n| renumber.get(n).copied()).collect()
    });

    AssembledAnswer { text, references }
}
