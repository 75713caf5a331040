//! Evidence sufficiency scoring.
//!
//! The score is built additively and clamped to 0–100 after every step.
//! Steps are applied in this order, each noted in `reasoning`:
//!
//! 1. gold-standard systematic review (+30)
//! 2. guideline-grade item (+25)
//! 3. trial with reported results (+20)
//! 4. three or more recent items (+15; 1–2 recent items only earn a note)
//! 5. non-gold systematic reviews when no gold-standard review exists (+10)
//! 6. diversity: 3 per evidence class present when two or more are, max 10
//! 7. anchor scenario: floor of 70 with three or more anchors, else +10 per anchor
//! 8. evidence volume at or above the threshold: +min(25, 3 × volume)
//! 9. trauma queries: +min(15, 5 × image-literature items)
//!
//! A category whose items cannot be tallied contributes nothing and the
//! error is recorded in `reasoning`; scoring itself never fails.

use tracing::{info, warn};

use evidex_core::category;
use evidex_core::models::evidence::{EvidenceItem, EvidenceKind, EvidencePackage};
use evidex_core::models::scenario::{AnchorScenario, ClinicalDomain};
use evidex_core::models::sufficiency::{SufficiencyLevel, SufficiencyScore};
use evidex_core::models::tags::TagSet;
use evidex_tags::scenario::ScenarioCatalog;
use evidex_tags::vocabulary::TagVocabulary;

use crate::error::EvidenceError;

const GOLD_REVIEW_POINTS: i32 = 30;
const GUIDELINE_POINTS: i32 = 25;
const TRIAL_POINTS: i32 = 20;
const RECENT_POINTS: i32 = 15;
const RECENT_MIN_ITEMS: usize = 3;
const OTHER_REVIEW_POINTS: i32 = 10;
const DIVERSITY_POINTS_PER_CLASS: i32 = 3;
const DIVERSITY_CAP: i32 = 10;
const ANCHOR_FLOOR: u8 = 70;
const ANCHOR_FLOOR_MIN_ANCHORS: usize = 3;
const ANCHOR_POINTS: i32 = 10;
const VOLUME_POINTS_PER_ITEM: i32 = 3;
const VOLUME_CAP: i32 = 25;
const IMAGE_POINTS_PER_ITEM: i32 = 5;
const IMAGE_CAP: i32 = 15;

/// Score at or above which no fallback search is needed.
pub const FALLBACK_SCORE: u8 = 50;
/// Lower bar for trauma queries, whose literature under-scores.
pub const TRAUMA_FALLBACK_SCORE: u8 = 40;

const EARLIEST_PLAUSIBLE_YEAR: i16 = 1800;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SufficiencyConfig {
    /// Evidence volume at which the volume bonus applies.
    pub min_evidence_threshold: usize,
    /// An item is recent when published within this many years.
    pub recent_window_years: i16,
    pub current_year: i16,
}

impl Default for SufficiencyConfig {
    fn default() -> Self {
        Self {
            min_evidence_threshold: 3,
            recent_window_years: 5,
            current_year: jiff::Zoned::now().year(),
        }
    }
}

/// Counts gathered from one category.
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    guidelines: usize,
    gold_reviews: usize,
    other_reviews: usize,
    trials: usize,
    resulted_trials: usize,
    recent: usize,
    recent_articles: usize,
    image_items: usize,
    volume: usize,
    anchors: usize,
    matching_reviews: usize,
    matching_trials: usize,
}

impl Tally {
    fn add(&mut self, other: Tally) {
        self.guidelines += other.guidelines;
        self.gold_reviews += other.gold_reviews;
        self.other_reviews += other.other_reviews;
        self.trials += other.trials;
        self.resulted_trials += other.resulted_trials;
        self.recent += other.recent;
        self.recent_articles += other.recent_articles;
        self.image_items += other.image_items;
        self.volume += other.volume;
        self.anchors += other.anchors;
        self.matching_reviews += other.matching_reviews;
        self.matching_trials += other.matching_trials;
    }

    fn class_count(&self) -> i32 {
        [
            self.guidelines > 0,
            self.gold_reviews + self.other_reviews > 0,
            self.trials > 0,
            self.recent_articles > 0,
        ]
        .into_iter()
        .filter(|present| *present)
        .count() as i32
    }
}

/// Running score that clamps after every change and records why.
struct Ledger {
    score: u8,
    reasoning: Vec<String>,
}

impl Ledger {
    fn add(&mut self, points: i32, reason: String) {
        self.score = (i32::from(self.score) + points).clamp(0, 100) as u8;
        self.reasoning.push(reason);
    }

    fn floor(&mut self, minimum: u8, reason: String) {
        self.score = self.score.max(minimum);
        self.reasoning.push(reason);
    }

    fn note(&mut self, reason: impl Into<String>) {
        self.reasoning.push(reason.into());
    }
}

/// Sufficiency scorer bound to the startup tag tables.
#[derive(Debug, Clone, Copy)]
pub struct SufficiencyScorer<'a> {
    vocabulary: &'a TagVocabulary,
    catalog: &'a ScenarioCatalog,
    config: SufficiencyConfig,
}

impl<'a> SufficiencyScorer<'a> {
    pub fn new(
        vocabulary: &'a TagVocabulary,
        catalog: &'a ScenarioCatalog,
        config: SufficiencyConfig,
    ) -> Self {
        Self {
            vocabulary,
            catalog,
            config,
        }
    }

    /// Score `package` for a query tagged `tags`. `None` means no package
    /// was gathered at all.
    pub fn score(&self, package: Option<&EvidencePackage>, tags: &TagSet) -> SufficiencyScore {
        let Some(package) = package else {
            return SufficiencyScore::absent();
        };

        let mut ledger = Ledger {
            score: 0,
            reasoning: Vec::new(),
        };
        if package.is_empty() {
            ledger.note("No evidence items available after filtering");
        }

        let mut tally = Tally::default();
        for (name, items) in package.categories() {
            match self.tally_category(name, items, tags) {
                Ok(t) => tally.add(t),
                Err(e) => {
                    warn!(category = name, error = %e, "category excluded from sufficiency score");
                    ledger.note(format!("Category '{name}' could not be scored: {e}"));
                }
            }
        }

        self.apply_base(&mut ledger, &tally);

        let scenario = self.catalog.detect(tags).cloned();
        self.apply_anchor(&mut ledger, &tally, scenario.as_ref());

        if tally.volume >= self.config.min_evidence_threshold {
            let bonus = (tally.volume as i32 * VOLUME_POINTS_PER_ITEM).min(VOLUME_CAP);
            ledger.add(
                bonus,
                format!("{} items across major sources meet the volume threshold (+{bonus})", tally.volume),
            );
        }

        let trauma = self.vocabulary.is_trauma(tags)
            || scenario.as_ref().is_some_and(|s| s.domain == ClinicalDomain::Trauma);
        if trauma && tally.image_items > 0 {
            let bonus = (tally.image_items as i32 * IMAGE_POINTS_PER_ITEM).min(IMAGE_CAP);
            ledger.add(
                bonus,
                format!("{} specialty image-literature items for a trauma query (+{bonus})", tally.image_items),
            );
        }

        let score = ledger.score;
        let has_anchor_scenario = scenario.is_some() && tally.anchors > 0;
        let should_call_fallback_search = !(score >= FALLBACK_SCORE
            || has_anchor_scenario
            || (trauma && score >= TRAUMA_FALLBACK_SCORE));
        let rerank_needed = score < FALLBACK_SCORE && tally.anchors > 0;
        let level = SufficiencyLevel::from_score(score);

        info!(
            score,
            ?level,
            anchors = tally.anchors,
            scenario = scenario.as_ref().map(|s| s.id.as_str()),
            fallback = should_call_fallback_search,
            "evidence sufficiency scored"
        );

        SufficiencyScore {
            score,
            level,
            reasoning: ledger.reasoning,
            anchor_count: tally.anchors,
            matching_reviews: tally.matching_reviews,
            matching_trials: tally.matching_trials,
            should_call_fallback_search,
            rerank_needed,
            scenario,
        }
    }

    fn apply_base(&self, ledger: &mut Ledger, tally: &Tally) {
        if tally.gold_reviews > 0 {
            ledger.add(
                GOLD_REVIEW_POINTS,
                format!("{} gold-standard systematic review(s) (+{GOLD_REVIEW_POINTS})", tally.gold_reviews),
            );
        }
        if tally.guidelines > 0 {
            ledger.add(
                GUIDELINE_POINTS,
                format!("{} guideline(s) (+{GUIDELINE_POINTS})", tally.guidelines),
            );
        }
        if tally.resulted_trials > 0 {
            ledger.add(
                TRIAL_POINTS,
                format!("{} trial(s) with reported results (+{TRIAL_POINTS})", tally.resulted_trials),
            );
        }
        if tally.recent >= RECENT_MIN_ITEMS {
            ledger.add(
                RECENT_POINTS,
                format!(
                    "{} items from the last {} years (+{RECENT_POINTS})",
                    tally.recent, self.config.recent_window_years
                ),
            );
        } else if tally.recent > 0 {
            ledger.note(format!(
                "Only {} recent item(s); partial recency, no points",
                tally.recent
            ));
        }
        if tally.other_reviews > 0 && tally.gold_reviews == 0 {
            ledger.add(
                OTHER_REVIEW_POINTS,
                format!("{} systematic review(s) without a gold-standard review (+{OTHER_REVIEW_POINTS})", tally.other_reviews),
            );
        }
        let classes = tally.class_count();
        if classes >= 2 {
            let bonus = (classes * DIVERSITY_POINTS_PER_CLASS).min(DIVERSITY_CAP);
            ledger.add(bonus, format!("{classes} evidence classes present (+{bonus})"));
        }
    }

    fn apply_anchor(&self, ledger: &mut Ledger, tally: &Tally, scenario: Option<&AnchorScenario>) {
        let Some(scenario) = scenario else {
            return;
        };
        match tally.anchors {
            0 => ledger.note(format!("Scenario '{}' detected but no anchor evidence", scenario.id)),
            n if n >= ANCHOR_FLOOR_MIN_ANCHORS => ledger.floor(
                ANCHOR_FLOOR,
                format!("Scenario '{}' with {n} anchor items: score floor {ANCHOR_FLOOR}", scenario.id),
            ),
            n => {
                let bonus = n as i32 * ANCHOR_POINTS;
                ledger.add(
                    bonus,
                    format!("Scenario '{}' with {n} anchor item(s) (+{bonus})", scenario.id),
                );
            }
        }
    }

    fn tally_category(
        &self,
        name: &str,
        items: &[EvidenceItem],
        tags: &TagSet,
    ) -> Result<Tally, EvidenceError> {
        let mut tally = Tally::default();
        let recent_from = self.config.current_year.saturating_sub(self.config.recent_window_years);

        for (index, item) in items.iter().enumerate() {
            self.check_item(name, index, item)?;

            let guideline = category::is_guideline_source(name) || item.kind == EvidenceKind::Guideline;
            let review = category::is_review_source(name) || item.kind.is_review();
            let trial = category::is_trial_source(name) || item.kind == EvidenceKind::Trial;
            let recent = item.publication_year.is_some_and(|y| y >= recent_from);

            if guideline {
                tally.guidelines += 1;
            }
            if review {
                if name == category::COCHRANE_REVIEWS || item.is_cochrane() {
                    tally.gold_reviews += 1;
                } else {
                    tally.other_reviews += 1;
                }
            }
            if trial {
                tally.trials += 1;
                if item.has_results || item.identifiers.has_bibliographic_id() {
                    tally.resulted_trials += 1;
                }
            }
            if recent {
                tally.recent += 1;
                if !guideline && !review && !trial {
                    tally.recent_articles += 1;
                }
            }
            if item.is_anchor {
                tally.anchors += 1;
            }
            if (review || trial) && self.matches_tags(item, tags) {
                if review {
                    tally.matching_reviews += 1;
                } else {
                    tally.matching_trials += 1;
                }
            }
        }

        if name == category::IMAGE_LITERATURE {
            tally.image_items = items.len();
        }
        if category::is_major(name) {
            tally.volume = items.len();
        }
        Ok(tally)
    }

    fn check_item(&self, name: &str, index: usize, item: &EvidenceItem) -> Result<(), EvidenceError> {
        let malformed = |reason: String| EvidenceError::MalformedItem {
            category: name.to_string(),
            index,
            reason,
        };
        if item.title.trim().is_empty() {
            return Err(malformed("empty title".to_string()));
        }
        if let Some(year) = item.publication_year
            && (year < EARLIEST_PLAUSIBLE_YEAR || year > self.config.current_year.saturating_add(1))
        {
            return Err(malformed(format!("implausible publication year {year}")));
        }
        Ok(())
    }

    /// Title/abstract overlaps both a disease-tag and a decision-tag pattern.
    fn matches_tags(&self, item: &EvidenceItem, tags: &TagSet) -> bool {
        let text = item.searchable_text();
        let expanded = self.vocabulary.expand(&text);
        self.vocabulary.any_tag_in(tags.disease_tags(), &expanded)
            && self.vocabulary.any_tag_in(tags.decision_tags(), &expanded)
    }
}
