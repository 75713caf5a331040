//! evidex-evidence
//!
//! Relevance filtering, sufficiency scoring and tag-tiered ranking of a
//! gathered evidence package. Every stage is a pure function of its inputs;
//! packages are narrowed into new values, never edited in place.

pub mod concepts;
pub mod error;
pub mod rank;
pub mod relevance;
pub mod sufficiency;
