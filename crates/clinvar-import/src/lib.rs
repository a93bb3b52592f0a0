//! Batch import of ClinVar full-release files into the submissions store.
//!
//! Files are handled one after another. Each is parsed in full on a
//! blocking thread, then written in a single transaction over a connection
//! opened just for that file, so the database write lock is only held while
//! rows are inserted.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use anyhow::Context as _;
use clinvar_core::{ReleaseDate, TermNormalizer, store::SubmissionStore};
use clinvar_store_sqlite::SqliteStore;
use serde::Deserialize;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration, deserialised from `clinvar-import.toml` and
/// `CLINVAR_*` environment variables.
#[derive(Deserialize, Clone, Debug)]
pub struct ImportConfig {
  #[serde(default = "default_database_path")]
  pub database_path:     PathBuf,
  /// Two-column TSV mapping raw significance terms to corrected ones.
  #[serde(default = "default_terms_path")]
  pub terms_path:        PathBuf,
  /// Seconds to wait for another importer's write lock.
  #[serde(default = "default_busy_timeout_secs")]
  pub busy_timeout_secs: u64,
}

fn default_database_path() -> PathBuf { PathBuf::from("clinvar.db") }

fn default_terms_path() -> PathBuf { PathBuf::from("nonstandard_significance_terms.tsv") }

fn default_busy_timeout_secs() -> u64 { 600 }

impl Default for ImportConfig {
  fn default() -> Self {
    Self {
      database_path:     default_database_path(),
      terms_path:        default_terms_path(),
      busy_timeout_secs: default_busy_timeout_secs(),
    }
  }
}

// ─── Outcomes ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
  Imported {
    release:   ReleaseDate,
    /// Records read from the document, duplicates included.
    extracted: usize,
    /// Rows actually added; the rest were already present.
    inserted:  usize,
  },
  /// The file name is not a release file name.
  Skipped,
}

/// State of the newest release after a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
  pub release:        ReleaseDate,
  pub submissions:    u64,
  /// Unordered pairs of disagreeing submissions.
  pub conflict_pairs: usize,
}

// ─── Importer ─────────────────────────────────────────────────────────────────

pub struct Importer {
  config:     ImportConfig,
  normalizer: Arc<TermNormalizer>,
}

impl Importer {
  pub fn new(config: ImportConfig, normalizer: TermNormalizer) -> Self {
    Self { config, normalizer: Arc::new(normalizer) }
  }

  async fn open_store(&self) -> anyhow::Result<SqliteStore> {
    let path = &self.config.database_path;
    SqliteStore::open(path, Duration::from_secs(self.config.busy_timeout_secs))
      .await
      .with_context(|| format!("failed to open database at {}", path.display()))
  }

  /// Create the table, indexes and views if they do not exist yet.
  pub async fn prepare(&self) -> anyhow::Result<()> {
    self.open_store().await?.close().await?;
    Ok(())
  }

  /// Import every file in order.
  ///
  /// Unrecognized file names are skipped. Any other failure stops the batch;
  /// files committed before it stay in the database.
  pub async fn run(&self, files: &[PathBuf]) -> anyhow::Result<Vec<FileOutcome>> {
    self.prepare().await?;

    let mut outcomes = Vec::with_capacity(files.len());
    for file in files {
      outcomes.push(self.import_file(file).await?);
    }

    if let Some(summary) = self.summarize().await? {
      tracing::info!(
        release = %summary.release,
        submissions = summary.submissions,
        conflict_pairs = summary.conflict_pairs,
        "current release"
      );
    }
    Ok(outcomes)
  }

  /// Extract and load one release file.
  pub async fn import_file(&self, path: &Path) -> anyhow::Result<FileOutcome> {
    let release = match ReleaseDate::from_path(path) {
      Ok(release) => release,
      Err(e) => {
        tracing::warn!(error = %e, "Skipped unrecognized filename {}", path.display());
        return Ok(FileOutcome::Skipped);
      }
    };
    tracing::info!("Importing {}", path.display());

    let normalizer = Arc::clone(&self.normalizer);
    let owned_path = path.to_path_buf();
    let task_release = release.clone();
    let records = tokio::task::spawn_blocking(move || {
      clinvar_xml::extract_file(&owned_path, &task_release, &normalizer)
    })
    .await
    .context("extraction task failed")?
    .with_context(|| format!("failed to extract submissions from {}", path.display()))?;
    let extracted = records.len();

    let store = self.open_store().await?;
    let inserted = store
      .load(records)
      .await
      .with_context(|| format!("failed to load {}", path.display()))?;
    store.close().await?;

    tracing::info!(
      release = %release,
      extracted,
      inserted,
      "Imported {}",
      path.display()
    );
    Ok(FileOutcome::Imported { release, extracted, inserted })
  }

  /// Counts for the newest release in the database, if any.
  pub async fn summarize(&self) -> anyhow::Result<Option<Summary>> {
    let store = self.open_store().await?;

    let Some(release) = store.releases().await?.pop() else {
      store.close().await?;
      return Ok(None);
    };
    let submissions = store.count(Some(&release)).await?;
    let conflict_pairs = store.conflicts(None).await?.len() / 2;
    store.close().await?;

    Ok(Some(Summary { release, submissions, conflict_pairs }))
  }
}
