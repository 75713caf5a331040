use evidex_citations::assemble::assemble;
use evidex_citations::format::{FormatConfig, ReferenceFormatter};
use evidex_citations::parse::{first_occurrences, parse_markers};
use evidex_citations::slots::ReferenceSlots;
use evidex_citations::validate::CitationValidator;
use evidex_core::category;
use evidex_core::models::citation::InvalidReason;
use evidex_core::models::evidence::{EvidenceItem, EvidenceKind, EvidencePackage, Identifiers};
use proptest::prelude::*;

fn formatter() -> ReferenceFormatter {
    ReferenceFormatter::new(FormatConfig {
        current_year: 2026,
        recent_years: 3,
    })
    .unwrap()
}

fn linked(title: &str, pmid: &str) -> EvidenceItem {
    EvidenceItem {
        identifiers: Identifiers {
            pmid: Some(pmid.to_string()),
            ..Identifiers::default()
        },
        ..EvidenceItem::new(title, EvidenceKind::Article)
    }
}

fn three_linked() -> EvidencePackage {
    EvidencePackage::new()
        .with_category(
            category::PUBMED_ARTICLES,
            vec![linked("One", "1001"), linked("Two", "1002"), linked("Three", "1003")],
        )
        .unwrap()
}

#[test]
fn markers_are_parsed_with_offsets() {
    let text = "Rate [[1]] and rhythm [[2, 3]][[1]] plus [[0]].";
    let markers = parse_markers(text);
    assert_eq!(markers.len(), 4);
    assert_eq!(markers[0].span, 5..10);
    assert_eq!(markers[1].numbers, [2, 3]);
    assert_eq!(&text[markers[2].span.clone()], "[[1]]");

    let firsts = first_occurrences(&markers);
    let numbers: Vec<u64> = firsts.iter().map(|c| c.number).collect();
    assert_eq!(numbers, [1, 2, 3, 0]);
    assert_eq!(firsts[2].position, markers[1].span.start);
}

#[test]
fn non_markers_are_ignored() {
    assert!(parse_markers("[1] [[a]] [[ ]] [[1.5]] [[-2]]").is_empty());
}

#[test]
fn out_of_range_marker_is_stripped_and_others_kept() {
    let slots = ReferenceSlots::from_package(&formatter(), &three_linked());
    let validation = CitationValidator::new(&slots).validate("AF raises stroke risk [[1]][[2]][[5]].");

    assert!(!validation.is_valid);
    assert_eq!(validation.invalid_citations.len(), 1);
    let invalid = &validation.invalid_citations[0];
    assert_eq!(invalid.number, 5);
    assert_eq!(invalid.reason, InvalidReason::OutOfRange);
    assert_eq!(invalid.position, 32);
    assert_eq!(validation.sanitized_text, "AF raises stroke risk [[1]][[2]].");
    assert_eq!(validation.cited_references, [1, 2]);
}

#[test]
fn sanitising_keeps_the_sentence_and_tidies_spacing() {
    let slots = ReferenceSlots::from_package(&formatter(), &three_linked());
    let validation = CitationValidator::new(&slots)
        .validate("Claim one [[4]]. Claim two [[0]] and more [[3,9]]. Claim three [[2]]");
    assert_eq!(
        validation.sanitized_text,
        "Claim one. Claim two and more [[3]]. Claim three [[2]]"
    );
    let reasons: Vec<InvalidReason> = validation.invalid_citations.iter().map(|c| c.reason).collect();
    assert_eq!(
        reasons,
        [InvalidReason::OutOfRange, InvalidReason::NotPositive, InvalidReason::OutOfRange]
    );
}

#[test]
fn unverifiable_and_search_engine_items_are_invalid() {
    let searched = EvidenceItem {
        identifiers: Identifiers {
            pmid: Some("2002".to_string()),
            url: Some("https://www.bing.com/search?q=apixaban".to_string()),
            ..Identifiers::default()
        },
        ..EvidenceItem::new("Found by search", EvidenceKind::Article)
    };
    let package = EvidencePackage::new()
        .with_category(
            category::PUBMED_ARTICLES,
            vec![
                linked("Linked", "2001"),
                EvidenceItem::new("No identifiers", EvidenceKind::Article),
                searched,
            ],
        )
        .unwrap();
    let slots = ReferenceSlots::from_package(&formatter(), &package);
    assert_eq!(slots.len(), 3);
    assert!(!slots.get(2).unwrap().is_verifiable());

    let validation = CitationValidator::new(&slots).validate("A [[1]]. B [[2]]. C [[3]].");
    let reasons: Vec<(u64, InvalidReason)> = validation
        .invalid_citations
        .iter()
        .map(|c| (c.number, c.reason))
        .collect();
    assert_eq!(
        reasons,
        [(2, InvalidReason::Unverifiable), (3, InvalidReason::DisallowedUrl)]
    );
    assert_eq!(validation.sanitized_text, "A [[1]]. B. C.");
}

#[test]
fn text_without_markers_is_valid() {
    let slots = ReferenceSlots::from_package(&formatter(), &three_linked());
    let validation = CitationValidator::new(&slots).validate("No citations here.");
    assert!(validation.is_valid);
    assert_eq!(validation.sanitized_text, "No citations here.");
    assert!(validation.cited_references.is_empty());
}

#[test]
fn duplicate_documents_share_one_slot() {
    let package = EvidencePackage::new()
        .with_category(category::PUBMED_ARTICLES, vec![linked("Same", "77")])
        .unwrap()
        .with_category(category::EUROPE_PMC, vec![linked("Same again", "77"), linked("Other", "78")])
        .unwrap();
    let slots = ReferenceSlots::from_package(&formatter(), &package);
    assert_eq!(slots.len(), 2);
    assert_eq!(slots.get(2).unwrap().item.title, "Other");
    assert!(slots.get(0).is_none());
}

#[test]
fn assembly_renumbers_cited_references_densely() {
    let package = EvidencePackage::new()
        .with_category(
            category::PUBMED_ARTICLES,
            vec![linked("One", "1"), linked("Two", "2"), linked("Three", "3"), linked("Four", "4")],
        )
        .unwrap();
    let slots = ReferenceSlots::from_package(&formatter(), &package);
    let validation = CitationValidator::new(&slots).validate("A [[3]]. B [[1,3]]. C [[9]].");
    let answer = assemble(&validation, &slots);

    assert_eq!(answer.text, "A [[2]]. B [[1,2]]. C.");
    let listed: Vec<(usize, &str)> = answer
        .references
        .iter()
        .map(|r| (r.number, r.title.as_str()))
        .collect();
    assert_eq!(listed, [(1, "One"), (2, "Three")]);
}

proptest! {
    #[test]
    fn citing_every_reference_is_valid(count in 1usize..15, grouped in any::<bool>()) {
        let items: Vec<EvidenceItem> = (0..count)
            .map(|i| linked(&format!("Study {i}"), &(5000 + i).to_string()))
            .collect();
        let package = EvidencePackage::new()
            .with_category(category::PUBMED_ARTICLES, items)
            .unwrap();
        let slots = ReferenceSlots::from_package(&formatter(), &package);
        let references = slots.references();

        let numbers: Vec<String> = references.iter().map(|r| r.number.to_string()).collect();
        let text = if grouped {
            format!("Everything [[{}]].", numbers.join(","))
        } else {
            numbers.iter().map(|n| format!("Claim [[{n}]].")).collect::<Vec<_>>().join(" ")
        };

        let validation = CitationValidator::new(&slots).validate(&text);
        prop_assert!(validation.is_valid);
        prop_assert!(validation.invalid_citations.is_empty());
        prop_assert_eq!(&validation.sanitized_text, &text);

        let answer = assemble(&validation, &slots);
        prop_assert_eq!(answer.references, references);
        prop_assert_eq!(answer.text, text);
    }
}
