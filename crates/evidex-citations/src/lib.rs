//! evidex-citations
//!
//! Turns evidence items into numbered, display-ready references and checks
//! the `[[N]]` markers of a generated answer against them. Invalid markers
//! are stripped from the text rather than failing the answer.

pub mod assemble;
pub mod error;
pub mod format;
pub mod journals;
pub mod parse;
pub mod slots;
pub mod validate;
