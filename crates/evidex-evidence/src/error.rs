use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvidenceError {
    #[error("malformed item #{index} in '{category}': {reason}")]
    MalformedItem {
        category: String,
        index: usize,
        reason: String,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("matcher build failed: {0}")]
    Matcher(#[from] aho_corasick::BuildError),

    #[error("tag error: {0}")]
    Tags(#[from] evidex_tags::error::TagError),
}
