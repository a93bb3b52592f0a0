//! [`SqliteStore`], the SQLite implementation of [`SubmissionStore`].

use std::{path::Path, time::Duration};

use clinvar_core::{
  Conflict, ReleaseDate, SubmissionRecord, store::SubmissionStore,
};

use crate::{
  Result,
  encode::{CONFLICT_COLUMNS, RawConflict, RawSubmission, SUBMISSION_COLUMNS},
  schema::SCHEMA,
};

/// How long a connection waits for another writer's lock before failing.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(600);

// ─── Store ───────────────────────────────────────────────────────────────────

/// A connection to the submissions database.
///
/// Meant to be short-lived: open one for schema setup, one per imported
/// file, and [`close`](Self::close) it as soon as the work is committed so
/// the write lock is held as briefly as possible.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) the database at `path` and apply the schema.
  pub async fn open(path: impl AsRef<Path>, busy_timeout: Duration) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init(busy_timeout).await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init(DEFAULT_BUSY_TIMEOUT).await?;
    Ok(store)
  }

  async fn init(&self, busy_timeout: Duration) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.busy_timeout(busy_timeout)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Close the underlying connection, releasing any file locks.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }
}

// ─── SubmissionStore impl ────────────────────────────────────────────────────

impl SubmissionStore for SqliteStore {
  type Error = crate::Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn load(&self, records: Vec<SubmissionRecord>) -> Result<usize> {
    if records.is_empty() {
      return Ok(0);
    }
    let total = records.len();

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut inserted = 0;
        {
          let mut stmt = tx.prepare(&format!(
            "INSERT OR IGNORE INTO submissions ({SUBMISSION_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)"
          ))?;
          for r in &records {
            inserted += stmt.execute(rusqlite::params![
              r.release_date.as_str(),
              r.variant_group_id,
              r.preferred_name,
              r.variant_type,
              r.gene_symbol,
              r.submitter_id,
              r.submitter_name,
              r.variant_accession,
              r.submission_accession,
              r.raw_significance,
              r.corrected_significance,
              r.last_evaluated,
              r.review_status,
              r.condition_name,
              r.method,
              r.free_text_comment,
            ])?;
          }
        }
        tx.commit()?;
        Ok(inserted)
      })
      .await?;

    tracing::debug!(inserted, skipped = total - inserted, "bulk load committed");
    Ok(inserted)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn count(&self, release: Option<&ReleaseDate>) -> Result<u64> {
    let date = release.map(|r| r.as_str().to_owned());

    let count: i64 = self
      .conn
      .call(move |conn| {
        let count: i64 = match date {
          Some(d) => conn.query_row(
            "SELECT COUNT(*) FROM submissions WHERE date = ?1",
            rusqlite::params![d],
            |row| row.get(0),
          )?,
          None => conn.query_row("SELECT COUNT(*) FROM submissions", [], |row| row.get(0))?,
        };
        Ok(count)
      })
      .await?;

    Ok(count as u64)
  }

  async fn releases(&self) -> Result<Vec<ReleaseDate>> {
    let dates: Vec<String> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT DISTINCT date FROM submissions ORDER BY date")?;
        let rows = stmt
          .query_map([], |row| row.get::<_, String>(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(
      dates
        .iter()
        .map(|d| ReleaseDate::parse(d))
        .collect::<clinvar_core::Result<_>>()?,
    )
  }

  async fn submissions(&self, release: &ReleaseDate) -> Result<Vec<SubmissionRecord>> {
    let date = release.as_str().to_owned();

    let raws: Vec<RawSubmission> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE date = ?1 ORDER BY scv"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![date], RawSubmission::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSubmission::into_record).collect()
  }

  async fn conflicts(&self, release: Option<&ReleaseDate>) -> Result<Vec<Conflict>> {
    let date = release.map(|r| r.as_str().to_owned());

    let raws: Vec<RawConflict> = self
      .conn
      .call(move |conn| {
        let rows = match date {
          Some(d) => {
            let mut stmt = conn.prepare(&format!(
              "SELECT {CONFLICT_COLUMNS} FROM conflicts WHERE date = ?1
               ORDER BY ncbi_variation_id, scv1, scv2"
            ))?;
            stmt
              .query_map(rusqlite::params![d], RawConflict::from_row)?
              .collect::<rusqlite::Result<Vec<_>>>()?
          }
          None => {
            let mut stmt = conn.prepare(&format!(
              "SELECT {CONFLICT_COLUMNS} FROM current_conflicts
               ORDER BY ncbi_variation_id, scv1, scv2"
            ))?;
            stmt
              .query_map([], RawConflict::from_row)?
              .collect::<rusqlite::Result<Vec<_>>>()?
          }
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawConflict::into_conflict).collect()
  }
}
