use evidex_core::category;
use evidex_core::models::evidence::{EvidenceItem, EvidenceKind, EvidencePackage};
use evidex_evidence::concepts::{ConceptKind, ConceptVocabulary};
use evidex_evidence::relevance::{DEFAULT_THRESHOLD, RelevanceFilter};
use proptest::prelude::*;

const QUERY: &str = "Apixaban dosing in atrial fibrillation with chronic kidney disease";

fn concepts() -> ConceptVocabulary {
    ConceptVocabulary::builtin().expect("builtin concepts compile")
}

fn article(title: &str, abstract_text: Option<&str>) -> EvidenceItem {
    EvidenceItem {
        abstract_text: abstract_text.map(str::to_string),
        ..EvidenceItem::new(title, EvidenceKind::Article)
    }
}

#[test]
fn query_concepts_are_grouped_by_kind() {
    let vocab = concepts();
    let found = vocab.extract(QUERY);
    assert_eq!(found.ids(ConceptKind::Disease), ["atrial_fibrillation", "kidney"]);
    assert_eq!(found.ids(ConceptKind::Intervention), ["anticoagulant"]);
    assert!(found.ids(ConceptKind::Outcome).is_empty());
}

#[test]
fn abbreviations_count_as_concepts() {
    let vocab = concepts();
    let found = vocab.extract("DOAC in AF");
    assert_eq!(found.ids(ConceptKind::Disease), ["atrial_fibrillation"]);
    assert_eq!(found.ids(ConceptKind::Intervention), ["anticoagulant"]);
}

#[test]
fn title_matches_outweigh_abstract_matches() {
    let vocab = concepts();
    let filter = RelevanceFilter::new(&vocab, DEFAULT_THRESHOLD);
    let query = vocab.extract(QUERY);

    let in_title = filter.score_item(
        &query,
        &article("Apixaban in atrial fibrillation and renal impairment", None),
    );
    assert_eq!(in_title.score, 50);
    assert_eq!(in_title.reasons.len(), 3);

    let in_abstract = filter.score_item(
        &query,
        &article(
            "A retrospective cohort",
            Some("Apixaban in atrial fibrillation and renal impairment"),
        ),
    );
    assert_eq!(in_abstract.score, 25);
}

#[test]
fn keywords_score_like_the_title() {
    let vocab = concepts();
    let filter = RelevanceFilter::new(&vocab, DEFAULT_THRESHOLD);
    let query = vocab.extract(QUERY);
    let item = EvidenceItem {
        keywords: vec!["Atrial Fibrillation".to_string(), "Renal Insufficiency, Chronic".to_string()],
        ..EvidenceItem::new("Outcomes in a national registry", EvidenceKind::Article)
    };
    assert_eq!(filter.score_item(&query, &item).score, 40);
}

#[test]
fn items_below_threshold_are_excluded_with_reasons() {
    let vocab = concepts();
    let filter = RelevanceFilter::new(&vocab, DEFAULT_THRESHOLD);
    let items = vec![
        article("Apixaban in atrial fibrillation and renal impairment", None),
        article("Statins for primary prevention in older adults", None),
        article("A retrospective cohort", Some("patients with atrial fibrillation")),
    ];
    let outcome = filter.filter_items(QUERY, &items);

    assert!(!outcome.skipped);
    assert_eq!(outcome.kept, items[..1]);
    assert_eq!(outcome.excluded.len(), 2);
    assert_eq!(outcome.excluded[0].score, 0);
    assert_eq!(outcome.excluded[1].score, 10);
    assert_eq!(outcome.excluded[1].reasons, ["disease 'atrial_fibrillation' in abstract"]);
}

#[test]
fn query_without_concepts_passes_everything_through() {
    let vocab = concepts();
    let filter = RelevanceFilter::new(&vocab, DEFAULT_THRESHOLD);
    let items = vec![article("Anything at all", None)];
    let outcome = filter.filter_items("what is the capital of France", &items);
    assert!(outcome.skipped);
    assert_eq!(outcome.kept, items);
    assert!(outcome.excluded.is_empty());
}

#[test]
fn filtering_is_idempotent() {
    let vocab = concepts();
    let filter = RelevanceFilter::new(&vocab, DEFAULT_THRESHOLD);
    let items = vec![
        article("Statins for primary prevention", None),
        article("Edoxaban versus warfarin in atrial fibrillation and CKD", None),
        article("Dabigatran in kidney disease", Some("atrial fibrillation bleeding")),
    ];
    let first = filter.filter_items(QUERY, &items);
    let second = filter.filter_items(QUERY, &items);
    assert_eq!(first.kept, second.kept);
    assert_eq!(first.excluded, second.excluded);

    let again = filter.filter_items(QUERY, &first.kept);
    assert_eq!(again.kept, first.kept);
    assert!(again.excluded.is_empty());
}

#[test]
fn package_categories_are_filtered_independently() {
    let vocab = concepts();
    let filter = RelevanceFilter::new(&vocab, DEFAULT_THRESHOLD);
    let package = EvidencePackage::new()
        .with_category(
            category::GUIDELINES,
            vec![article("Anticoagulation in atrial fibrillation with CKD", None)],
        )
        .unwrap()
        .with_category(
            category::PUBMED_ARTICLES,
            vec![article("Knee osteoarthritis exercise therapy", None)],
        )
        .unwrap()
        .with_category(category::CLINICAL_TRIALS, Vec::new())
        .unwrap();

    let (filtered, reports) = filter.filter_package(QUERY, &package);
    assert_eq!(filtered.get(category::GUIDELINES).len(), 1);
    assert!(filtered.get(category::PUBMED_ARTICLES).is_empty());
    assert_eq!(reports.len(), 3);

    let articles = reports
        .iter()
        .find(|r| r.category == category::PUBMED_ARTICLES)
        .unwrap();
    assert_eq!(articles.kept, 0);
    assert_eq!(articles.excluded.len(), 1);
    // the input package is left as it was
    assert_eq!(package.get(category::PUBMED_ARTICLES).len(), 1);
}

const WORDS: &[&str] = &[
    "apixaban", "warfarin", "atrial", "fibrillation", "renal", "kidney", "statin",
    "bleeding", "mortality", "egfr", "cohort", "trial", "in", "and", "outcomes",
];

fn title() -> impl Strategy<Value = String> {
    proptest::collection::vec(proptest::sample::select(WORDS), 1..8).prop_map(|w| w.join(" "))
}

proptest! {
    #[test]
    fn an_item_is_kept_iff_it_meets_the_threshold(titles in proptest::collection::vec(title(), 0..12)) {
        let vocab = concepts();
        let filter = RelevanceFilter::new(&vocab, DEFAULT_THRESHOLD);
        let query = vocab.extract(QUERY);
        let items: Vec<EvidenceItem> = titles.iter().map(|t| article(t, None)).collect();
        let outcome = filter.filter_items(QUERY, &items);

        prop_assert_eq!(outcome.kept.len() + outcome.excluded.len(), items.len());
        for item in &outcome.kept {
            prop_assert!(filter.score_item(&query, item).score >= DEFAULT_THRESHOLD);
        }
        for excluded in &outcome.excluded {
            prop_assert!(excluded.score < DEFAULT_THRESHOLD);
        }
    }

    #[test]
    fn scores_stay_within_bounds(t in title(), a in title()) {
        let vocab = concepts();
        let filter = RelevanceFilter::new(&vocab, DEFAULT_THRESHOLD);
        let query = vocab.extract("atrial fibrillation kidney egfr troponin apixaban statin mortality bleeding");
        let score = filter.score_item(&query, &article(&t, Some(&a))).score;
        prop_assert!(score <= 100);
    }
}
