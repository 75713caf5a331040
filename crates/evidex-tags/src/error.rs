use thiserror::Error;

#[derive(Debug, Error)]
pub enum TagError {
    #[error("tag vocabulary is empty")]
    EmptyVocabulary,

    #[error("invalid tag '{id}': {reason}")]
    InvalidTag { id: String, reason: String },

    #[error("duplicate tag id: {0}")]
    DuplicateTag(String),

    #[error("scenario catalog is empty")]
    EmptyCatalog,

    #[error("scenario '{scenario}' is invalid: {reason}")]
    InvalidScenario { scenario: String, reason: String },

    #[error("matcher build failed: {0}")]
    Matcher(#[from] aho_corasick::BuildError),

    #[error("abbreviation pattern failed: {0}")]
    Pattern(#[from] regex::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("tag enrichment failed: {0}")]
    Enrichment(String),
}
