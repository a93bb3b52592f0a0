//! Streaming extraction of submission records from ClinVar full-release XML.
//!
//! Pipeline:
//!   BufRead
//!     └─ SetReader            → one owned `ClinVarSet` Element at a time
//!          └─ records_from_set() → typed accessors per field
//!               └─ Extractor  → SubmissionRecord iterator, document order

pub mod error;
pub mod extract;
pub mod node;
pub mod reader;

pub use error::{Error, Result};
pub use extract::{Extractor, extract_file, records_from_set};
pub use reader::SetReader;
