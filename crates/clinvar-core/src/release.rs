//! Release date tokens and the release filename parser.

use std::{fmt, path::Path};

use crate::{Error, Result};

const FILENAME_PREFIX: &str = "ClinVarFullRelease_";
const FILENAME_SUFFIX: &str = ".xml";

/// The `YYYY-MM` label of a full-release snapshot.
///
/// The token is fixed-width, so lexicographic order is chronological order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReleaseDate(String);

impl ReleaseDate {
  /// Validate a bare `YYYY-MM` token.
  pub fn parse(token: &str) -> Result<Self> {
    if is_release_token(token) {
      Ok(Self(token.to_owned()))
    } else {
      Err(Error::InvalidReleaseDate(token.to_owned()))
    }
  }

  /// Extract the release date from a path whose base name is
  /// `ClinVarFullRelease_<YYYY>-<MM>.xml`. Directory components are ignored.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let name = path
      .file_name()
      .map(|n| n.to_string_lossy())
      .unwrap_or_default();

    name
      .strip_prefix(FILENAME_PREFIX)
      .and_then(|rest| rest.strip_suffix(FILENAME_SUFFIX))
      .filter(|token| is_release_token(token))
      .map(|token| Self(token.to_owned()))
      .ok_or_else(|| Error::UnrecognizedFilename(path.display().to_string()))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

/// Exactly four digits, a hyphen, and two digits.
fn is_release_token(s: &str) -> bool {
  let b = s.as_bytes();
  b.len() == 7
    && b[..4].iter().all(u8::is_ascii_digit)
    && b[4] == b'-'
    && b[5..].iter().all(u8::is_ascii_digit)
}

impl fmt::Display for ReleaseDate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_release_filename() {
    let date = ReleaseDate::from_path("ClinVarFullRelease_2021-01.xml").unwrap();
    assert_eq!(date.as_str(), "2021-01");
  }

  #[test]
  fn ignores_directory_components() {
    let date =
      ReleaseDate::from_path("/data/clinvar/ClinVarFullRelease_2017-12.xml").unwrap();
    assert_eq!(date.to_string(), "2017-12");
  }

  #[test]
  fn rejects_unrelated_name() {
    let err = ReleaseDate::from_path("random.xml").unwrap_err();
    assert!(matches!(err, Error::UnrecognizedFilename(ref n) if n == "random.xml"));
  }

  #[test]
  fn rejects_near_misses() {
    for name in [
      "ClinVarFullRelease_2021-1.xml",
      "ClinVarFullRelease_21-01.xml",
      "ClinVarFullRelease_2021-01.xml.gz",
      "ClinVarFullRelease_2021-01Xxml",
      "clinvarfullrelease_2021-01.xml",
      "ClinVarFullRelease_2021_01.xml",
      "ClinVarFullRelease_ab21-01.xml",
      "prefix_ClinVarFullRelease_2021-01.xml",
    ] {
      assert!(ReleaseDate::from_path(name).is_err(), "accepted {name}");
    }
  }

  #[test]
  fn directory_named_like_release_is_not_enough() {
    assert!(ReleaseDate::from_path("ClinVarFullRelease_2021-01.xml/notes.txt").is_err());
  }

  #[test]
  fn tokens_order_chronologically() {
    let a = ReleaseDate::parse("2019-12").unwrap();
    let b = ReleaseDate::parse("2020-01").unwrap();
    assert!(a < b);
    assert!(ReleaseDate::parse("2020-1").is_err());
  }
}
