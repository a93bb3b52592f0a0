//! Integration tests for `SqliteStore` against an in-memory database.

use clinvar_core::{ReleaseDate, SubmissionRecord, record::NOT_PROVIDED, store::SubmissionStore};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn date(token: &str) -> ReleaseDate { ReleaseDate::parse(token).unwrap() }

fn record(release: &str, variant: &str, scv: &str, significance: &str) -> SubmissionRecord {
  SubmissionRecord {
    release_date:           date(release),
    variant_group_id:       variant.into(),
    preferred_name:         format!("variant {variant}"),
    variant_type:           "single nucleotide variant".into(),
    gene_symbol:            "BRCA1".into(),
    submitter_id:           format!("org-{scv}"),
    submitter_name:         format!("Lab {scv}"),
    variant_accession:      format!("RCV-{variant}"),
    submission_accession:   scv.into(),
    raw_significance:       significance.into(),
    corrected_significance: significance.into(),
    last_evaluated:         String::new(),
    review_status:          "criteria provided, single submitter".into(),
    condition_name:         String::new(),
    method:                 NOT_PROVIDED.into(),
    free_text_comment:      String::new(),
  }
}

// ─── Loading ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn load_and_read_back() {
  let s = store().await;
  let r = record("2020-05", "12345", "SCV000001", "likely pathogenic");

  let inserted = s.load(vec![r.clone()]).await.unwrap();
  assert_eq!(inserted, 1);

  let rows = s.submissions(&date("2020-05")).await.unwrap();
  assert_eq!(rows, vec![r]);
}

#[tokio::test]
async fn empty_load_is_noop() {
  let s = store().await;
  assert_eq!(s.load(Vec::new()).await.unwrap(), 0);
  assert_eq!(s.count(None).await.unwrap(), 0);
}

#[tokio::test]
async fn reloading_same_records_is_idempotent() {
  let s = store().await;
  let batch = vec![
    record("2020-05", "1", "SCV1", "benign"),
    record("2020-05", "1", "SCV2", "benign"),
    record("2020-05", "2", "SCV3", "pathogenic"),
  ];

  assert_eq!(s.load(batch.clone()).await.unwrap(), 3);
  assert_eq!(s.load(batch).await.unwrap(), 0);
  assert_eq!(s.count(None).await.unwrap(), 3);
}

#[tokio::test]
async fn duplicate_key_keeps_first_row() {
  let s = store().await;
  let first = record("2020-05", "1", "SCV1", "benign");
  let second = record("2020-05", "1", "SCV1", "pathogenic");

  let inserted = s.load(vec![first, second]).await.unwrap();
  assert_eq!(inserted, 1);

  let rows = s.submissions(&date("2020-05")).await.unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].raw_significance, "benign");
}

#[tokio::test]
async fn same_accession_in_different_releases_is_kept() {
  let s = store().await;
  s.load(vec![record("2020-05", "1", "SCV1", "benign")]).await.unwrap();
  s.load(vec![record("2020-06", "1", "SCV1", "likely benign")]).await.unwrap();

  assert_eq!(s.count(None).await.unwrap(), 2);
  assert_eq!(s.count(Some(&date("2020-05"))).await.unwrap(), 1);
  assert_eq!(s.releases().await.unwrap(), vec![date("2020-05"), date("2020-06")]);
}

// ─── Views ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn conflicts_pair_differing_submissions() {
  let s = store().await;
  s.load(vec![
    record("2020-05", "1", "SCV1", "benign"),
    record("2020-05", "1", "SCV2", "pathogenic"),
    record("2020-05", "1", "SCV3", "benign"),
    record("2020-05", "2", "SCV4", "benign"),
    record("2020-05", "2", "SCV5", "benign"),
  ])
  .await
  .unwrap();

  let conflicts = s.conflicts(Some(&date("2020-05"))).await.unwrap();
  // SCV2 disagrees with SCV1 and SCV3; every pair appears from both sides.
  assert_eq!(conflicts.len(), 4);
  assert!(conflicts.iter().all(|c| c.variant_group_id == "1"));
  assert!(
    conflicts
      .iter()
      .all(|c| c.first.corrected_significance != c.second.corrected_significance)
  );

  let first = &conflicts[0];
  assert_eq!(first.first.submission_accession, "SCV1");
  assert_eq!(first.second.submission_accession, "SCV2");
  assert_eq!(first.first.method, NOT_PROVIDED);
  assert_eq!(first.gene_symbol, "BRCA1");
}

#[tokio::test]
async fn current_conflicts_use_newest_release() {
  let s = store().await;
  s.load(vec![
    record("2020-05", "1", "SCV1", "benign"),
    record("2020-05", "1", "SCV2", "pathogenic"),
  ])
  .await
  .unwrap();
  s.load(vec![
    record("2020-06", "1", "SCV1", "pathogenic"),
    record("2020-06", "1", "SCV2", "pathogenic"),
  ])
  .await
  .unwrap();

  assert_eq!(s.conflicts(Some(&date("2020-05"))).await.unwrap().len(), 2);
  assert!(s.conflicts(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn corrected_significance_decides_conflicts() {
  let s = store().await;
  let mut a = record("2020-05", "1", "SCV1", "pathologic");
  a.corrected_significance = "pathogenic".into();
  let b = record("2020-05", "1", "SCV2", "pathogenic");
  s.load(vec![a, b]).await.unwrap();

  assert!(s.conflicts(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn submission_views_follow_releases() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("views.db");

  let s = SqliteStore::open(&path, crate::DEFAULT_BUSY_TIMEOUT).await.unwrap();
  s.load(vec![
    record("2020-05", "1", "SCV1", "benign"),
    record("2020-05", "1", "SCV2", "pathogenic"),
  ])
  .await
  .unwrap();
  s.load(vec![record("2020-06", "1", "SCV1", "benign")]).await.unwrap();
  s.close().await.unwrap();

  let conn = rusqlite::Connection::open(&path).unwrap();
  let rows = |view: &str| -> i64 {
    conn
      .query_row(&format!("SELECT COUNT(*) FROM {view}"), [], |row| row.get(0))
      .unwrap()
  };
  assert_eq!(rows("conflicting_submissions"), 2);
  assert_eq!(rows("current_submissions"), 1);
  assert_eq!(rows("current_conflicting_submissions"), 0);
}

#[tokio::test]
async fn schema_is_reapplied_safely() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("reopen.db");

  let s = SqliteStore::open(&path, crate::DEFAULT_BUSY_TIMEOUT).await.unwrap();
  s.load(vec![record("2021-01", "9", "SCV9", "benign")]).await.unwrap();
  s.close().await.unwrap();

  let s = SqliteStore::open(&path, crate::DEFAULT_BUSY_TIMEOUT).await.unwrap();
  assert_eq!(s.count(None).await.unwrap(), 1);
  s.close().await.unwrap();
}
