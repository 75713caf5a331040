//! evidex-core
//!
//! Pure domain types and source-category conventions for the evidence
//! pipeline. No I/O; this is the shared vocabulary of the evidex crates.

pub mod category;
pub mod error;
pub mod links;
pub mod models;
