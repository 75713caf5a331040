//! Evidence source categories.
//!
//! Pure string constants naming the lists inside an `EvidencePackage`. The
//! gathering collaborator fills whichever categories it reached; unknown
//! category names are carried through untouched and ordered after the
//! known ones.

pub const ANCHOR_GUIDELINES: &str = "anchor_guidelines";
pub const GUIDELINES: &str = "guidelines";
pub const WHO_GUIDELINES: &str = "who_guidelines";
pub const NICE_GUIDELINES: &str = "nice_guidelines";
pub const CDC_GUIDELINES: &str = "cdc_guidelines";

pub const COCHRANE_REVIEWS: &str = "cochrane_reviews";
pub const SYSTEMATIC_REVIEWS: &str = "systematic_reviews";

pub const CLINICAL_TRIALS: &str = "clinical_trials";

pub const PUBMED_ARTICLES: &str = "pubmed_articles";
pub const EUROPE_PMC: &str = "europe_pmc";
pub const SEMANTIC_SCHOLAR: &str = "semantic_scholar";
pub const OPEN_ALEX: &str = "open_alex";

/// Specialty image-literature sources (radiology and orthopaedic atlases).
pub const IMAGE_LITERATURE: &str = "image_literature";

/// Flattening order for a package. Categories not listed here follow in
/// alphabetical order.
pub const CANONICAL_ORDER: &[&str] = &[
    ANCHOR_GUIDELINES,
    GUIDELINES,
    WHO_GUIDELINES,
    NICE_GUIDELINES,
    CDC_GUIDELINES,
    COCHRANE_REVIEWS,
    SYSTEMATIC_REVIEWS,
    CLINICAL_TRIALS,
    PUBMED_ARTICLES,
    EUROPE_PMC,
    SEMANTIC_SCHOLAR,
    OPEN_ALEX,
    IMAGE_LITERATURE,
];

pub fn is_guideline_source(name: &str) -> bool {
    matches!(
        name,
        ANCHOR_GUIDELINES | GUIDELINES | WHO_GUIDELINES | NICE_GUIDELINES | CDC_GUIDELINES
    )
}

pub fn is_review_source(name: &str) -> bool {
    matches!(name, COCHRANE_REVIEWS | SYSTEMATIC_REVIEWS)
}

pub fn is_trial_source(name: &str) -> bool {
    name == CLINICAL_TRIALS
}

pub fn is_article_source(name: &str) -> bool {
    matches!(name, PUBMED_ARTICLES | EUROPE_PMC | SEMANTIC_SCHOLAR | OPEN_ALEX)
}

/// Whether items in this category count toward total evidence volume.
/// Image literature is excluded; it only feeds the trauma bonus.
pub fn is_major(name: &str) -> bool {
    is_guideline_source(name)
        || is_review_source(name)
        || is_trial_source(name)
        || is_article_source(name)
}

/// Sort rank of a category name under [`CANONICAL_ORDER`].
pub fn rank(name: &str) -> usize {
    CANONICAL_ORDER
        .iter()
        .position(|c| *c == name)
        .unwrap_or(CANONICAL_ORDER.len())
}
