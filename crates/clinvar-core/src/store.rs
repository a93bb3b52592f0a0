//! The `SubmissionStore` trait.
//!
//! Implemented by storage backends (e.g. `clinvar-store-sqlite`). The import
//! binary depends on this abstraction for everything past schema setup.

use std::future::Future;

use crate::{
  record::{Conflict, SubmissionRecord},
  release::ReleaseDate,
};

/// Abstraction over the append-only submissions fact table.
///
/// Rows are never updated or deleted. A row whose
/// `(release_date, submission_accession)` key already exists is silently
/// skipped on load, which makes re-importing a release a no-op.
pub trait SubmissionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Insert every record in a single transaction, ignoring key collisions.
  ///
  /// Returns the number of rows actually inserted. An empty batch does not
  /// touch storage.
  fn load(
    &self,
    records: Vec<SubmissionRecord>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Count stored submissions, optionally for a single release.
  fn count<'a>(
    &'a self,
    release: Option<&'a ReleaseDate>,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  /// All distinct release dates present, oldest first.
  fn releases(
    &self,
  ) -> impl Future<Output = Result<Vec<ReleaseDate>, Self::Error>> + Send + '_;

  /// Every stored submission of one release, ordered by accession.
  fn submissions<'a>(
    &'a self,
    release: &'a ReleaseDate,
  ) -> impl Future<Output = Result<Vec<SubmissionRecord>, Self::Error>> + Send + 'a;

  /// Conflicting submission pairs for `release`, or for the newest release
  /// present when `None`.
  fn conflicts<'a>(
    &'a self,
    release: Option<&'a ReleaseDate>,
  ) -> impl Future<Output = Result<Vec<Conflict>, Self::Error>> + Send + 'a;
}
