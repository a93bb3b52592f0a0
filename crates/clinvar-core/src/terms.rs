//! Normalization of free-text clinical significance terms.
//!
//! The mapping is a headerless, tab-delimited, two-column resource: a raw
//! (lowercased) significance phrase and its corrected form, one pair per
//! line. It is loaded once at startup and never mutated afterwards, so a
//! single [`TermNormalizer`] can be shared behind an `Arc` without locking.

use std::{collections::HashMap, fs::File, io::Read, path::Path};

use csv::ReaderBuilder;

use crate::{Error, Result, error::TermMapProblem};

/// Immutable lookup from raw significance phrase to corrected phrase.
#[derive(Debug, Clone, Default)]
pub struct TermNormalizer {
  terms: HashMap<String, String>,
}

impl TermNormalizer {
  /// Load the mapping from `path`. A missing file is
  /// [`Error::TermMapNotFound`].
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
      std::io::ErrorKind::NotFound => Error::TermMapNotFound(path.to_path_buf()),
      _ => Error::Io(e),
    })?;
    Self::from_reader(file)
  }

  /// Load the mapping from any reader. Blank lines are skipped; later lines
  /// win over earlier ones for the same phrase. Both columns must be
  /// non-empty, so a mapped phrase never corrects to an empty string.
  pub fn from_reader(reader: impl Read) -> Result<Self> {
    let mut csv_reader = ReaderBuilder::new()
      .delimiter(b'\t')
      .has_headers(false)
      .flexible(true)
      .quoting(false)
      .from_reader(reader);

    let mut terms = HashMap::new();
    for record in csv_reader.records() {
      let record = record?;
      if record.len() == 1 && record[0].is_empty() {
        continue;
      }
      let problem = match (record.len(), record.get(0), record.get(1)) {
        (2, Some(""), _) => Some(TermMapProblem::EmptyRaw),
        (2, _, Some("")) => Some(TermMapProblem::EmptyCorrected),
        (2, ..) => None,
        (n, ..) => Some(TermMapProblem::ColumnCount(n)),
      };
      if let Some(problem) = problem {
        let line = record.position().map_or(0, |p| p.line());
        return Err(Error::MalformedTermMap { line, problem });
      }
      terms.insert(record[0].to_owned(), record[1].to_owned());
    }

    Ok(Self { terms })
  }

  /// Corrected form of `raw`, or `raw` itself when the mapping has no entry.
  pub fn normalize<'a>(&'a self, raw: &'a str) -> &'a str {
    self.terms.get(raw).map_or(raw, String::as_str)
  }

  pub fn len(&self) -> usize { self.terms.len() }

  pub fn is_empty(&self) -> bool { self.terms.is_empty() }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TermNormalizer {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self {
      terms: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
    }
  }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
