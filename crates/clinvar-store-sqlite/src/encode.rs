//! Column lists and row decoding between SQLite rows and domain types.
//!
//! Every column is stored as TEXT. The only decoded value is the release
//! date token, which is re-validated on the way out.

use clinvar_core::{
  Conflict, ReleaseDate, SubmissionRecord,
  record::ConflictSide,
};
use rusqlite::Row;

use crate::Result;

// ─── Column lists ────────────────────────────────────────────────────────────

/// `submissions` columns, in [`SubmissionRecord`] field order.
pub const SUBMISSION_COLUMNS: &str = "date, ncbi_variation_id, preferred_name, variant_type, \
   gene_symbol, submitter_id, submitter_name, rcv, scv, clin_sig, corrected_clin_sig, \
   last_eval, review_status, sub_condition, method, description";

/// `conflicts` view columns: shared variant fields, then both sides.
pub const CONFLICT_COLUMNS: &str = "date, ncbi_variation_id, preferred_name, variant_type, \
   gene_symbol, \
   submitter1_id, submitter1_name, rcv1, scv1, clin_sig1, corrected_clin_sig1, \
   last_eval1, review_status1, sub_condition1, method1, description1, \
   submitter2_id, submitter2_name, rcv2, scv2, clin_sig2, corrected_clin_sig2, \
   last_eval2, review_status2, sub_condition2, method2, description2";

const SIDE_WIDTH: usize = 11;

// ─── Submissions ─────────────────────────────────────────────────────────────

/// A `submissions` row before its release token is validated.
pub struct RawSubmission {
  pub date:                   String,
  pub variant_group_id:       String,
  pub preferred_name:         String,
  pub variant_type:           String,
  pub gene_symbol:            String,
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

impl RawSubmission {
  /// Read a row selected with [`SUBMISSION_COLUMNS`].
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      date:                   row.get(0)?,
      variant_group_id:       row.get(1)?,
      preferred_name:         row.get(2)?,
      variant_type:           row.get(3)?,
      gene_symbol:            row.get(4)?,
      submitter_id:           row.get(5)?,
      submitter_name:         row.get(6)?,
      variant_accession:      row.get(7)?,
      submission_accession:   row.get(8)?,
      raw_significance:       row.get(9)?,
      corrected_significance: row.get(10)?,
      last_evaluated:         row.get(11)?,
      review_status:          row.get(12)?,
      condition_name:         row.get(13)?,
      method:                 row.get(14)?,
      free_text_comment:      row.get(15)?,
    })
  }

  pub fn into_record(self) -> Result<SubmissionRecord> {
    Ok(SubmissionRecord {
      release_date:           ReleaseDate::parse(&self.date)?,
      variant_group_id:       self.variant_group_id,
      preferred_name:         self.preferred_name,
      variant_type:           self.variant_type,
      gene_symbol:            self.gene_symbol,
      submitter_id:           self.submitter_id,
      submitter_name:         self.submitter_name,
      variant_accession:      self.variant_accession,
      submission_accession:   self.submission_accession,
      raw_significance:       self.raw_significance,
      corrected_significance: self.corrected_significance,
      last_evaluated:         self.last_evaluated,
      review_status:          self.review_status,
      condition_name:         self.condition_name,
      method:                 self.method,
      free_text_comment:      self.free_text_comment,
    })
  }
}

// ─── Conflicts ───────────────────────────────────────────────────────────────

/// A `conflicts` row before its release token is validated.
pub struct RawConflict {
  pub date:             String,
  pub variant_group_id: String,
  pub preferred_name:   String,
  pub variant_type:     String,
  pub gene_symbol:      String,
  pub first:            ConflictSide,
  pub second:           ConflictSide,
}

fn side_from_row(row: &Row<'_>, start: usize) -> rusqlite::Result<ConflictSide> {
  Ok(ConflictSide {
    submitter_id:           row.get(start)?,
    submitter_name:         row.get(start + 1)?,
    variant_accession:      row.get(start + 2)?,
    submission_accession:   row.get(start + 3)?,
    raw_significance:       row.get(start + 4)?,
    corrected_significance: row.get(start + 5)?,
    last_evaluated:         row.get(start + 6)?,
    review_status:          row.get(start + 7)?,
    condition_name:         row.get(start + 8)?,
    method:                 row.get(start + 9)?,
    free_text_comment:      row.get(start + 10)?,
  })
}

impl RawConflict {
  /// Read a row selected with [`CONFLICT_COLUMNS`].
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      date:             row.get(0)?,
      variant_group_id: row.get(1)?,
      preferred_name:   row.get(2)?,
      variant_type:     row.get(3)?,
      gene_symbol:      row.get(4)?,
      first:            side_from_row(row, 5)?,
      second:           side_from_row(row, 5 + SIDE_WIDTH)?,
    })
  }

  pub fn into_conflict(self) -> Result<Conflict> {
    Ok(Conflict {
      release_date:     ReleaseDate::parse(&self.date)?,
      variant_group_id: self.variant_group_id,
      preferred_name:   self.preferred_name,
      variant_type:     self.variant_type,
      gene_symbol:      self.gene_symbol,
      first:            self.first,
      second:           self.second,
    })
  }
}
