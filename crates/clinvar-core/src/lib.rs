//! Core types and trait definitions for the ClinVar release importer.
//!
//! This crate is deliberately free of XML and database dependencies. The
//! extractor, the SQLite backend and the import binary all depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod record;
pub mod release;
pub mod store;
pub mod terms;

pub use error::{Error, Result, TermMapProblem};
pub use record::{Conflict, SubmissionRecord};
pub use release::ReleaseDate;
pub use terms::TermNormalizer;
