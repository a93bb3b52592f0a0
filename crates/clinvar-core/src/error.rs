//! Error types for `clinvar-core`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The file name is not `ClinVarFullRelease_<YYYY>-<MM>.xml`.
  #[error("unrecognized filename: {0}")]
  UnrecognizedFilename(String),

  #[error("invalid release date token: {0:?}")]
  InvalidReleaseDate(String),

  #[error("significance term map not found: {}", .0.display())]
  TermMapNotFound(PathBuf),

  #[error("malformed significance term map at line {line}: {problem}")]
  MalformedTermMap { line: u64, problem: TermMapProblem },

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// What is wrong with one line of the significance term map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TermMapProblem {
  #[error("expected 2 columns, found {0}")]
  ColumnCount(usize),
  #[error("raw term is empty")]
  EmptyRaw,
  #[error("corrected term is empty")]
  EmptyCorrected,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
