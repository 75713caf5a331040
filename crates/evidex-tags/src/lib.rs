//! evidex-tags
//!
//! Disease and decision tag detection for clinical queries, plus the
//! curated anchor-scenario catalog. Tag tables are immutable once built and
//! are shared by reference across concurrent queries.

pub mod abbreviations;
pub mod builtin;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod scenario;
pub mod vocabulary;
