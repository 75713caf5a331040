//! Numbered reference slots.
//!
//! The slots are the numbered list the answer generator is shown: slot N is
//! what `[[N]]` refers to. Slot order is the supplied order with repeated
//! documents collapsed onto their first appearance. An item without a
//! usable link still occupies its slot so later numbers do not shift, but
//! citing it is invalid.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use evidex_core::links;
use evidex_core::models::evidence::{EvidenceItem, EvidencePackage};
use evidex_core::models::reference::FormattedReference;

use crate::format::ReferenceFormatter;

/// One numbered entry of the generator's context. Entry N is `[[N]]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub number: usize,
    pub category: String,
    pub item: EvidenceItem,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceSlot {
    pub number: usize,
    pub category: String,
    pub item: EvidenceItem,
    /// `None` when the item has no usable link.
    pub reference: Option<FormattedReference>,
}

impl ReferenceSlot {
    pub fn is_verifiable(&self) -> bool {
        self.reference.is_some()
    }

    /// The item was sourced from a search-engine results page.
    pub fn has_disallowed_url(&self) -> bool {
        self.item
            .identifiers
            .url()
            .is_some_and(links::is_disallowed_url)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ReferenceSlots {
    slots: Vec<ReferenceSlot>,
}

impl ReferenceSlots {
    /// Number `(category, item)` pairs in the order given.
    pub fn from_items<'a, I>(formatter: &ReferenceFormatter, items: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a EvidenceItem)>,
    {
        let mut seen = HashSet::new();
        let mut slots = Vec::new();
        for (category, item) in items {
            if !seen.insert(item.identity_key()) {
                continue;
            }
            let number = slots.len() + 1;
            let reference = match formatter.format(number, category, item) {
                Ok(reference) => Some(reference),
                Err(e) => {
                    debug!(number, error = %e, "reference slot is unverifiable");
                    None
                }
            };
            slots.push(ReferenceSlot {
                number,
                category: category.to_string(),
                item: item.clone(),
                reference,
            });
        }
        Self { slots }
    }

    /// Slots for every item of `package`, in canonical category order.
    pub fn from_package(formatter: &ReferenceFormatter, package: &EvidencePackage) -> Self {
        Self::from_items(formatter, package.iter_items())
    }

    /// Renumber a context the generator was shown. Entries are taken in
    /// their listed order; the `number` fields are not trusted.
    pub fn from_context(formatter: &ReferenceFormatter, context: &[ContextEntry]) -> Self {
        Self::from_items(
            formatter,
            context.iter().map(|e| (e.category.as_str(), &e.item)),
        )
    }

    /// The ordered context to hand the answer generator.
    pub fn context(&self) -> Vec<ContextEntry> {
        self.slots
            .iter()
            .map(|s| ContextEntry {
                number: s.number,
                category: s.category.clone(),
                item: s.item.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot `number`, 1-based.
    pub fn get(&self, number: usize) -> Option<&ReferenceSlot> {
        number.checked_sub(1).and_then(|i| self.slots.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReferenceSlot> {
        self.slots.iter()
    }

    /// Formatted references for every verifiable slot, numbered by slot.
    pub fn references(&self) -> Vec<FormattedReference> {
        self.slots
            .iter()
            .filter_map(|s| s.reference.clone())
            .collect()
    }
}
