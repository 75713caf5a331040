use thiserror::Error;

#[derive(Debug, Error)]
pub enum CitationError {
    #[error("'{title}' has no pmid, pmcid, doi or verified guideline URL")]
    NoUsableLink { title: String },

    #[error("invalid formatter configuration: {0}")]
    InvalidConfig(String),
}
