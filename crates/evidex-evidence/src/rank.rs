//! Tag-tiered evidence ranking.
//!
//! Items are placed in one of four tiers against the query's primary tags,
//! ordered stably by tier and then by how many secondary decision tags they
//! mention, and capped. When the strict tiers leave too few references a
//! small number of guideline or review items sharing only the primary
//! disease are re-admitted, then the list is backfilled in rank order.

use std::cmp::Reverse;
use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use evidex_core::category;
use evidex_core::models::evidence::{EvidenceItem, EvidencePackage};
use evidex_core::models::tags::TagSet;
use evidex_tags::vocabulary::TagVocabulary;

use crate::error::EvidenceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankConfig {
    pub min_references: usize,
    pub max_references: usize,
    /// Most tier-3 guideline/review items re-admitted when short.
    pub relaxation_limit: usize,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            min_references: 5,
            max_references: 10,
            relaxation_limit: 2,
        }
    }
}

impl RankConfig {
    pub fn validate(&self) -> Result<(), EvidenceError> {
        if self.max_references == 0 {
            return Err(EvidenceError::InvalidConfig(
                "max_references must be at least 1".to_string(),
            ));
        }
        if self.min_references > self.max_references {
            return Err(EvidenceError::InvalidConfig(format!(
                "min_references ({}) exceeds max_references ({})",
                self.min_references, self.max_references
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Primary disease and primary decision.
    PrimaryPair = 1,
    /// Primary disease and some decision tag.
    PrimaryDiseaseWithDecision = 2,
    /// Primary disease only.
    PrimaryDiseaseOnly = 3,
    Other = 4,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedItem {
    pub category: String,
    pub tier: Tier,
    pub secondary_hits: usize,
    pub item: EvidenceItem,
}

impl RankedItem {
    fn is_high_evidence(&self) -> bool {
        self.item.kind.is_high_evidence_class()
            || category::is_guideline_source(&self.category)
            || category::is_review_source(&self.category)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankedEvidence {
    pub items: Vec<RankedItem>,
    /// Items re-admitted by the relaxation rule.
    pub relaxed: usize,
    /// Items added by backfilling toward `min_references`.
    pub backfilled: usize,
    pub duplicates_dropped: usize,
}

impl RankedEvidence {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in rank order.
    pub fn evidence_items(&self) -> Vec<EvidenceItem> {
        self.items.iter().map(|r| r.item.clone()).collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EvidenceRanker<'a> {
    vocabulary: &'a TagVocabulary,
    config: RankConfig,
}

impl<'a> EvidenceRanker<'a> {
    pub fn new(vocabulary: &'a TagVocabulary, config: RankConfig) -> Result<Self, EvidenceError> {
        config.validate()?;
        Ok(Self { vocabulary, config })
    }

    pub fn config(&self) -> RankConfig {
        self.config
    }

    pub fn tier_of(&self, item: &EvidenceItem, tags: &TagSet) -> (Tier, usize) {
        let text = item.searchable_text();
        let expanded = self.vocabulary.expand(&text);
        let hit = |id: &str| self.vocabulary.tag_in(id, &expanded);

        let secondary_hits = tags
            .secondary_decisions()
            .iter()
            .filter(|id| hit(id))
            .count();

        let primary_disease = tags.primary_disease().is_some_and(hit);
        if !primary_disease {
            return (Tier::Other, secondary_hits);
        }
        let tier = if tags.primary_decision().is_some_and(hit) {
            Tier::PrimaryPair
        } else if self.vocabulary.any_tag_in(tags.decision_tags(), &expanded) {
            Tier::PrimaryDiseaseWithDecision
        } else {
            Tier::PrimaryDiseaseOnly
        };
        (tier, secondary_hits)
    }

    pub fn rank(&self, package: &EvidencePackage, tags: &TagSet) -> RankedEvidence {
        let mut seen = HashSet::new();
        let mut duplicates_dropped = 0;
        let mut ranked: Vec<RankedItem> = Vec::new();
        for (name, item) in package.iter_items() {
            if !seen.insert(item.identity_key()) {
                duplicates_dropped += 1;
                continue;
            }
            let (tier, secondary_hits) = self.tier_of(item, tags);
            ranked.push(RankedItem {
                category: name.to_string(),
                tier,
                secondary_hits,
                item: item.clone(),
            });
        }
        ranked.sort_by_key(|r| (r.tier, Reverse(r.secondary_hits)));

        let strict_cutoff = match (tags.primary_disease(), tags.decision_tags().is_empty()) {
            (None, _) => Tier::Other,
            (Some(_), true) => Tier::PrimaryDiseaseOnly,
            (Some(_), false) => Tier::PrimaryDiseaseWithDecision,
        };
        let mut selected: Vec<bool> = ranked.iter().map(|r| r.tier <= strict_cutoff).collect();
        let mut count = selected.iter().filter(|s| **s).count();

        let min = self.config.min_references;
        let mut relaxed = 0;
        if count < min && strict_cutoff == Tier::PrimaryDiseaseWithDecision {
            for (i, r) in ranked.iter().enumerate() {
                if count >= min || relaxed >= self.config.relaxation_limit {
                    break;
                }
                if r.tier == Tier::PrimaryDiseaseOnly && r.is_high_evidence() {
                    selected[i] = true;
                    relaxed += 1;
                    count += 1;
                }
            }
            if relaxed > 0 {
                debug!(relaxed, "relaxed tier rule for high-evidence items");
            }
        }

        let mut backfilled = 0;
        for flag in selected.iter_mut() {
            if count >= min {
                break;
            }
            if !*flag {
                *flag = true;
                backfilled += 1;
                count += 1;
            }
        }

        let items: Vec<RankedItem> = ranked
            .into_iter()
            .zip(selected)
            .filter_map(|(r, keep)| keep.then_some(r))
            .take(self.config.max_references)
            .collect();

        debug!(
            kept = items.len(),
            relaxed,
            backfilled,
            duplicates_dropped,
            "evidence ranked"
        );

        RankedEvidence {
            items,
            relaxed,
            backfilled,
            duplicates_dropped,
        }
    }
}
