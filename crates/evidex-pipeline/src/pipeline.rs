use serde::Serialize;
use tracing::{info, info_span};
use uuid::Uuid;

use evidex_citations::assemble::{AssembledAnswer, assemble};
use evidex_citations::format::ReferenceFormatter;
use evidex_citations::slots::{ContextEntry, ReferenceSlots};
use evidex_citations::validate::CitationValidator;
use evidex_core::models::citation::CitationValidation;
use evidex_core::models::evidence::EvidencePackage;
use evidex_core::models::reference::FormattedReference;
use evidex_core::models::scenario::AnchorScenario;
use evidex_core::models::sufficiency::SufficiencyScore;
use evidex_core::models::tags::TagSet;
use evidex_evidence::rank::{EvidenceRanker, RankedEvidence};
use evidex_evidence::relevance::{CategoryRelevance, RelevanceFilter};
use evidex_evidence::sufficiency::SufficiencyScorer;
use evidex_tags::enrich::{TagEnricher, extract_with_enrichment};

use crate::catalog::Catalog;
use crate::config::PipelineConfig;
use crate::error::PipelineError;

/// Everything the pipeline concluded about one query.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub run_id: Uuid,
    pub tags: TagSet,
    pub scenario: Option<AnchorScenario>,
    pub relevance: Vec<CategoryRelevance>,
    pub sufficiency: SufficiencyScore,
    pub ranked: RankedEvidence,
    /// The numbered references the answer generator is shown.
    pub slots: ReferenceSlots,
}

impl Assessment {
    /// The ranked evidence handed to the answer generator, numbered as
    /// [`Assessment::slots`] numbers it.
    pub fn context(&self) -> Vec<ContextEntry> {
        self.slots.context()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FinalAnswer {
    pub validation: CitationValidation,
    /// Sanitised text renumbered against the final reference list.
    pub text: String,
    pub references: Vec<FormattedReference>,
}

/// One configured pipeline over a borrowed [`Catalog`].
///
/// Holds no per-query state; any number of queries may run through the same
/// pipeline concurrently.
pub struct Pipeline<'c> {
    catalog: &'c Catalog,
    config: PipelineConfig,
    relevance: RelevanceFilter<'c>,
    scorer: SufficiencyScorer<'c>,
    ranker: EvidenceRanker<'c>,
    formatter: ReferenceFormatter,
    enricher: Option<Box<dyn TagEnricher>>,
}

impl<'c> Pipeline<'c> {
    pub fn new(catalog: &'c Catalog, config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            catalog,
            relevance: RelevanceFilter::new(&catalog.concepts, config.relevance_threshold),
            scorer: SufficiencyScorer::new(
                &catalog.vocabulary,
                &catalog.scenarios,
                config.sufficiency_config(),
            ),
            ranker: EvidenceRanker::new(&catalog.vocabulary, config.rank_config())?,
            formatter: ReferenceFormatter::new(config.format_config())?,
            config,
            enricher: None,
        })
    }

    /// Attach a tag-enrichment collaborator. Its failures never fail a run.
    pub fn with_enricher(mut self, enricher: Box<dyn TagEnricher>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn extract_tags(&self, query: &str) -> TagSet {
        extract_with_enrichment(&self.catalog.vocabulary, query, self.enricher.as_deref())
    }

    /// Tag the query, then filter, score and rank `package`.
    ///
    /// `None` means nothing was gathered: the score is zero with a fallback
    /// search requested, and there is nothing to rank.
    pub fn assess(&self, query: &str, package: Option<&EvidencePackage>) -> Assessment {
        let run_id = Uuid::new_v4();
        let _span = info_span!("assess", run_id = %run_id).entered();

        let tags = self.extract_tags(query);
        let scenario = self.catalog.scenarios.detect(&tags).cloned();

        let (filtered, relevance) = match package {
            Some(package) => {
                let (filtered, reports) = self.relevance.filter_package(query, package);
                (Some(filtered), reports)
            }
            None => (None, Vec::new()),
        };

        let sufficiency = self.scorer.score(filtered.as_ref(), &tags);
        let ranked = filtered
            .as_ref()
            .map(|p| self.ranker.rank(p, &tags))
            .unwrap_or_default();
        let slots = ReferenceSlots::from_items(
            &self.formatter,
            ranked.items.iter().map(|r| (r.category.as_str(), &r.item)),
        );

        info!(
            diseases = tags.disease_tags().len(),
            decisions = tags.decision_tags().len(),
            scenario = scenario.as_ref().map(|s| s.id.as_str()),
            score = sufficiency.score,
            references = slots.len(),
            "assessment complete"
        );

        Assessment {
            run_id,
            tags,
            scenario,
            relevance,
            sufficiency,
            ranked,
            slots,
        }
    }

    /// Slots for a package exactly as supplied, in canonical category order.
    pub fn slots_for(&self, package: &EvidencePackage) -> ReferenceSlots {
        ReferenceSlots::from_package(&self.formatter, package)
    }

    /// Slots for a context saved from [`Assessment::context`].
    pub fn slots_for_context(&self, context: &[ContextEntry]) -> ReferenceSlots {
        ReferenceSlots::from_context(&self.formatter, context)
    }

    /// Validate generated `text` against the slots the generator was shown
    /// and build the final, densely numbered reference list.
    pub fn finalize_answer(&self, text: &str, slots: &ReferenceSlots) -> FinalAnswer {
        let validation = CitationValidator::new(slots).validate(text);
        let AssembledAnswer { text, references } = assemble(&validation, slots);
        info!(
            valid = validation.is_valid,
            invalid = validation.invalid_citations.len(),
            references = references.len(),
            "answer finalized"
        );
        FinalAnswer {
            validation,
            text,
            references,
        }
    }
}
