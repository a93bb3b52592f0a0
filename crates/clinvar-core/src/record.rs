//! The submission record and the conflict read model.
//!
//! A [`SubmissionRecord`] is built once, in full, from one `ClinVarSet` and is
//! never mutated afterwards. Corrections in later releases arrive as new rows
//! under a new [`ReleaseDate`], never as updates to old ones.

use crate::release::ReleaseDate;

/// Sentinel stored when a submission carries no significance description or
/// no observation method.
pub const NOT_PROVIDED: &str = "not provided";

// ─── Submission ──────────────────────────────────────────────────────────────

/// One submitter's assertion about one variant in one release.
///
/// Keyed by `(release_date, submission_accession)`. Every field other than
/// `variant_group_id`, `variant_type`, `variant_accession` and
/// `submission_accession` may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRecord {
  pub release_date:           ReleaseDate,
  /// NCBI variation id shared by every assertion about the same variant.
  pub variant_group_id:       String,
  pub preferred_name:         String,
  pub variant_type:           String,
  pub gene_symbol:            String,
  pub submitter_id:           String,
  pub submitter_name:         String,
  /// Set-level (RCV) accession.
  pub variant_accession:      String,
  /// Assertion-level (SCV) accession.
  pub submission_accession:   String,
  /// Lowercased significance text exactly as submitted.
  pub raw_significance:       String,
  pub corrected_significance: String,
  pub last_evaluated:         String,
  pub review_status:          String,
  pub condition_name:         String,
  pub method:                 String,
  pub free_text_comment:      String,
}

// ─── Conflicts ───────────────────────────────────────────────────────────────

/// One side of a [`Conflict`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictSide {
  pub submitter_id:           String,
  pub submitter_name:         String,
  pub variant_accession:      String,
  pub submission_accession:   String,
  pub raw_significance:       String,
  pub corrected_significance: String,
  pub last_evaluated:         String,
  pub review_status:          String,
  pub condition_name:         String,
  pub method:                 String,
  pub free_text_comment:      String,
}

/// Two submissions about the same variant in the same release whose
/// corrected significance differs. Never stored, always derived by the
/// `conflicts` view.
///
/// Each unordered pair appears twice, once from each side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
  pub release_date:     ReleaseDate,
  pub variant_group_id: String,
  pub preferred_name:   String,
  pub variant_type:     String,
  pub gene_symbol:      String,
  pub first:            ConflictSide,
  pub second:           ConflictSide,
}
