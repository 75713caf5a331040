use evidex_core::category;
use evidex_core::models::citation::InvalidReason;
use evidex_core::models::evidence::{EvidenceItem, EvidenceKind, EvidencePackage, Identifiers};
use evidex_core::models::sufficiency::SufficiencyLevel;
use evidex_core::models::tags::TagSet;
use evidex_pipeline::catalog::Catalog;
use evidex_pipeline::config::PipelineConfig;
use evidex_pipeline::pipeline::Pipeline;
use evidex_tags::enrich::TagEnricher;
use evidex_tags::error::TagError;

const QUERY: &str = "Apixaban dosing in atrial fibrillation with chronic kidney disease";

fn config() -> PipelineConfig {
    PipelineConfig {
        reference_year: Some(2026),
        ..PipelineConfig::default()
    }
}

fn anchor_guideline(title: &str, identifiers: Identifiers) -> EvidenceItem {
    EvidenceItem {
        identifiers,
        is_anchor: true,
        publication_year: Some(2024),
        ..EvidenceItem::new(title, EvidenceKind::Guideline)
    }
}

fn af_ckd_package() -> EvidencePackage {
    EvidencePackage::new()
        .with_category(
            category::ANCHOR_GUIDELINES,
            vec![
                anchor_guideline(
                    "KDIGO 2024: anticoagulation for atrial fibrillation in chronic kidney disease",
                    Identifiers {
                        url: Some("https://kdigo.org/guidelines/ckd-evaluation-and-management/".to_string()),
                        ..Identifiers::default()
                    },
                ),
                anchor_guideline(
                    "ACC/AHA/ACCP/HRS atrial fibrillation guideline: anticoagulation in kidney disease",
                    Identifiers {
                        pmid: Some("38033089".to_string()),
                        ..Identifiers::default()
                    },
                ),
                anchor_guideline(
                    "ESC 2024 atrial fibrillation guidelines: DOAC dosing in renal impairment",
                    Identifiers {
                        doi: Some("10.1093/eurheartj/ehae176".to_string()),
                        ..Identifiers::default()
                    },
                ),
            ],
        )
        .unwrap()
        .with_category(
            category::PUBMED_ARTICLES,
            vec![EvidenceItem::new("Knee osteoarthritis exercise therapy", EvidenceKind::Article)],
        )
        .unwrap()
}

#[test]
fn af_ckd_query_end_to_end() {
    let catalog = Catalog::builtin().unwrap();
    let pipeline = Pipeline::new(&catalog, config()).unwrap();
    let assessment = pipeline.assess(QUERY, Some(&af_ckd_package()));

    assert_eq!(assessment.tags.primary_disease(), Some("af"));
    assert!(assessment.tags.has_disease("ckd"));
    assert_eq!(assessment.tags.primary_decision(), Some("anticoagulation"));
    assert_eq!(assessment.scenario.as_ref().unwrap().id, "af_ckd_anticoagulation");

    let articles = assessment
        .relevance
        .iter()
        .find(|r| r.category == category::PUBMED_ARTICLES)
        .unwrap();
    assert_eq!(articles.excluded.len(), 1);

    let sufficiency = &assessment.sufficiency;
    assert!(sufficiency.score >= 70);
    assert_eq!(sufficiency.level, SufficiencyLevel::Excellent);
    assert_eq!(sufficiency.anchor_count, 3);
    assert!(!sufficiency.should_call_fallback_search);

    assert_eq!(assessment.ranked.len(), 3);
    assert_eq!(assessment.slots.len(), 3);
    assert!(assessment.slots.iter().all(|s| s.is_verifiable()));
    // the dosing guideline also matches the secondary decision
    assert!(assessment.slots.get(1).unwrap().item.title.starts_with("ESC"));
    assert!(
        assessment
            .context()
            .iter()
            .all(|e| e.category == category::ANCHOR_GUIDELINES)
    );

    let answer = pipeline.finalize_answer(
        "Reduce the dose [[1]]. Anticoagulate most patients [[2]][[3]][[5]].",
        &assessment.slots,
    );
    assert!(!answer.validation.is_valid);
    assert_eq!(answer.validation.invalid_citations[0].reason, InvalidReason::OutOfRange);
    assert_eq!(answer.text, "Reduce the dose [[1]]. Anticoagulate most patients [[2]][[3]].");
    assert_eq!(answer.references.len(), 3);
    assert_eq!(answer.references[1].url, "https://kdigo.org/guidelines/ckd-evaluation-and-management/");
}

#[test]
fn generator_context_is_numbered_like_the_slots() {
    let catalog = Catalog::builtin().unwrap();
    let pipeline = Pipeline::new(&catalog, config()).unwrap();
    let with_pmid = |title: &str, kind, pmid: &str| EvidenceItem {
        identifiers: Identifiers {
            pmid: Some(pmid.to_string()),
            ..Identifiers::default()
        },
        publication_year: Some(2023),
        ..EvidenceItem::new(title, kind)
    };
    let package = EvidencePackage::new()
        .with_category(
            category::GUIDELINES,
            vec![with_pmid(
                "Atrial fibrillation in chronic kidney disease: guideline",
                EvidenceKind::Guideline,
                "31000001",
            )],
        )
        .unwrap()
        .with_category(
            category::PUBMED_ARTICLES,
            vec![with_pmid(
                "Apixaban in atrial fibrillation and chronic kidney disease",
                EvidenceKind::Article,
                "31000002",
            )],
        )
        .unwrap();

    let assessment = pipeline.assess(
        "apixaban in atrial fibrillation with chronic kidney disease",
        Some(&package),
    );
    let slot_titles: Vec<&str> = assessment.slots.iter().map(|s| s.item.title.as_str()).collect();
    assert_eq!(
        slot_titles,
        [
            "Apixaban in atrial fibrillation and chronic kidney disease",
            "Atrial fibrillation in chronic kidney disease: guideline",
        ]
    );

    let context = assessment.context();
    let numbered: Vec<(usize, &str)> = context.iter().map(|e| (e.number, e.item.title.as_str())).collect();
    assert_eq!(numbered, [(1, slot_titles[0]), (2, slot_titles[1])]);
    assert_eq!(pipeline.slots_for_context(&context), assessment.slots);

    // the context survives a JSON round trip through the caller
    let json = serde_json::to_string(&assessment.slots).unwrap();
    let reloaded: Vec<evidex_citations::slots::ContextEntry> = serde_json::from_str(&json).unwrap();
    assert_eq!(pipeline.slots_for_context(&reloaded), assessment.slots);
}

#[test]
fn uncited_references_are_dropped_and_the_rest_renumbered() {
    let catalog = Catalog::builtin().unwrap();
    let pipeline = Pipeline::new(&catalog, config()).unwrap();
    let assessment = pipeline.assess(QUERY, Some(&af_ckd_package()));

    let answer = pipeline.finalize_answer("Only the third [[3]].", &assessment.slots);
    assert!(answer.validation.is_valid);
    assert_eq!(answer.text, "Only the third [[1]].");
    assert_eq!(answer.references.len(), 1);
    assert_eq!(answer.references[0].number, 1);
}

#[test]
fn absent_package_is_insufficient_not_an_error() {
    let catalog = Catalog::builtin().unwrap();
    let pipeline = Pipeline::new(&catalog, config()).unwrap();
    let assessment = pipeline.assess(QUERY, None);

    assert_eq!(assessment.sufficiency.score, 0);
    assert!(assessment.sufficiency.should_call_fallback_search);
    assert!(assessment.ranked.is_empty());
    assert!(assessment.slots.is_empty());
    assert!(assessment.relevance.is_empty());

    let answer = pipeline.finalize_answer("Unsupported claim [[1]].", &assessment.slots);
    assert_eq!(answer.text, "Unsupported claim.");
    assert!(answer.references.is_empty());
}

#[test]
fn unknown_query_gives_empty_tags_and_still_ranks() {
    let catalog = Catalog::builtin().unwrap();
    let pipeline = Pipeline::new(&catalog, config()).unwrap();
    let assessment = pipeline.assess("what is the capital of France", Some(&af_ckd_package()));

    assert!(assessment.tags.is_empty());
    assert!(assessment.scenario.is_none());
    assert!(assessment.relevance.iter().all(|r| r.skipped));
    assert_eq!(assessment.ranked.len(), 4);
}

struct Failing;

impl TagEnricher for Failing {
    fn name(&self) -> &str {
        "failing"
    }

    fn enrich(&self, _query: &str, _base: &TagSet) -> Result<TagSet, TagError> {
        Err(TagError::Enrichment("service unavailable".to_string()))
    }
}

struct AddsCkd;

impl TagEnricher for AddsCkd {
    fn name(&self) -> &str {
        "adds-ckd"
    }

    fn enrich(&self, _query: &str, _base: &TagSet) -> Result<TagSet, TagError> {
        Ok(TagSet::new(["ckd"], Vec::<String>::new()))
    }
}

#[test]
fn enricher_failure_does_not_change_the_result() {
    let catalog = Catalog::builtin().unwrap();
    let plain = Pipeline::new(&catalog, config()).unwrap();
    let enriched = Pipeline::new(&catalog, config())
        .unwrap()
        .with_enricher(Box::new(Failing));
    assert_eq!(enriched.extract_tags(QUERY), plain.extract_tags(QUERY));
}

#[test]
fn enricher_can_add_secondary_tags() {
    let catalog = Catalog::builtin().unwrap();
    let pipeline = Pipeline::new(&catalog, config())
        .unwrap()
        .with_enricher(Box::new(AddsCkd));
    let query = "Apixaban in atrial fibrillation with an eGFR of 25";
    let tags = pipeline.extract_tags(query);
    assert_eq!(tags.primary_disease(), Some("af"));
    assert!(tags.has_disease("ckd"));
    assert_eq!(
        pipeline.assess(query, None).scenario.map(|s| s.id),
        Some("af_ckd_anticoagulation".to_string())
    );
}

#[test]
fn catalog_overrides_are_loaded_from_config_paths() {
    let dir = std::env::temp_dir().join(format!("evidex-catalog-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    let vocabulary = dir.join("vocabulary.json");
    let scenarios = dir.join("scenarios.json");
    std::fs::write(
        &vocabulary,
        r#"{"tags": [
            {"id": "gout", "label": "Gout", "kind": "disease", "triggers": ["gout"]},
            {"id": "urate_lowering", "label": "Urate lowering", "kind": "decision", "triggers": ["allopurinol"]}
        ]}"#,
    )
    .unwrap();
    std::fs::write(
        &scenarios,
        r#"[{"id": "gout_ult", "name": "Gout ULT", "disease_tags": ["gout"], "decision_tags": ["urate_lowering"]}]"#,
    )
    .unwrap();

    let config = PipelineConfig {
        vocabulary_path: Some(vocabulary),
        scenarios_path: Some(scenarios),
        ..config()
    };
    let catalog = Catalog::load(&config).unwrap();
    let pipeline = Pipeline::new(&catalog, config).unwrap();
    let assessment = pipeline.assess("allopurinol dose in gout", None);
    assert_eq!(assessment.scenario.unwrap().id, "gout_ult");

    std::fs::remove_dir_all(&dir).unwrap();
}
