//! evidex-pipeline
//!
//! Composes the evidex stages into two entry points: `assess` (query and
//! evidence package in, tags, scenario, sufficiency and ranked references
//! out) and `finalize_answer` (generated text in, sanitised text and final
//! reference list out). Configuration tables are loaded once into a
//! [`catalog::Catalog`] and borrowed by every run.

pub mod catalog;
pub mod config;
pub mod error;
pub mod pipeline;
