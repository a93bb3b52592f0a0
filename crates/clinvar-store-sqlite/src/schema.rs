//! SQL schema for the ClinVar submissions store.
//!
//! Executed on every connection open. Every statement is idempotent, so
//! several importers may race to create it.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per (release, SCV). Strictly append-only: rows are never
-- updated or deleted; corrections arrive as rows of a later release.
CREATE TABLE IF NOT EXISTS submissions (
    date               TEXT,   -- release token, YYYY-MM
    ncbi_variation_id  TEXT,
    preferred_name     TEXT,
    variant_type       TEXT,
    gene_symbol        TEXT,
    submitter_id       TEXT,
    submitter_name     TEXT,
    rcv                TEXT,
    scv                TEXT,
    clin_sig           TEXT,   -- lowercased, as submitted
    corrected_clin_sig TEXT,   -- after term normalization
    last_eval          TEXT,
    review_status      TEXT,
    sub_condition      TEXT,
    method             TEXT,
    description        TEXT,
    PRIMARY KEY (date, scv)
);

CREATE INDEX IF NOT EXISTS date_index                   ON submissions (date);
CREATE INDEX IF NOT EXISTS ncbi_variation_id_index      ON submissions (ncbi_variation_id);
CREATE INDEX IF NOT EXISTS preferred_name_index         ON submissions (preferred_name);
CREATE INDEX IF NOT EXISTS gene_symbol_index            ON submissions (gene_symbol);
CREATE INDEX IF NOT EXISTS submitter_id_index           ON submissions (submitter_id);
CREATE INDEX IF NOT EXISTS submitter_name_index         ON submissions (submitter_name);
CREATE INDEX IF NOT EXISTS clin_sig_index               ON submissions (clin_sig);
CREATE INDEX IF NOT EXISTS corrected_clin_sig_index     ON submissions (corrected_clin_sig);
CREATE INDEX IF NOT EXISTS method_index                 ON submissions (method);
CREATE INDEX IF NOT EXISTS date_ncbi_variation_id_index ON submissions (date, ncbi_variation_id);
CREATE INDEX IF NOT EXISTS date_method_index            ON submissions (date, method);

-- Submissions disagreeing with at least one other submission on the same
-- variant in the same release.
CREATE VIEW IF NOT EXISTS conflicting_submissions AS
SELECT DISTINCT
    t1.date, t1.ncbi_variation_id, t1.preferred_name, t1.variant_type,
    t1.gene_symbol, t1.submitter_id, t1.submitter_name, t1.rcv, t1.scv,
    t1.clin_sig, t1.corrected_clin_sig, t1.last_eval, t1.review_status,
    t1.sub_condition, t1.method, t1.description
FROM submissions t1
INNER JOIN submissions t2
    ON t1.date = t2.date AND t1.ncbi_variation_id = t2.ncbi_variation_id
WHERE t1.corrected_clin_sig != t2.corrected_clin_sig;

-- The same disagreements as ordered pairs; each pair appears twice.
CREATE VIEW IF NOT EXISTS conflicts AS
SELECT
    t1.date               AS date,
    t1.ncbi_variation_id  AS ncbi_variation_id,
    t1.preferred_name     AS preferred_name,
    t1.variant_type       AS variant_type,
    t1.gene_symbol        AS gene_symbol,
    t1.submitter_id       AS submitter1_id,
    t1.submitter_name     AS submitter1_name,
    t1.rcv                AS rcv1,
    t1.scv                AS scv1,
    t1.clin_sig           AS clin_sig1,
    t1.corrected_clin_sig AS corrected_clin_sig1,
    t1.last_eval          AS last_eval1,
    t1.review_status      AS review_status1,
    t1.sub_condition      AS sub_condition1,
    t1.method             AS method1,
    t1.description        AS description1,
    t2.submitter_id       AS submitter2_id,
    t2.submitter_name     AS submitter2_name,
    t2.rcv                AS rcv2,
    t2.scv                AS scv2,
    t2.clin_sig           AS clin_sig2,
    t2.corrected_clin_sig AS corrected_clin_sig2,
    t2.last_eval          AS last_eval2,
    t2.review_status      AS review_status2,
    t2.sub_condition      AS sub_condition2,
    t2.method             AS method2,
    t2.description        AS description2
FROM submissions t1
INNER JOIN submissions t2
    ON t1.date = t2.date AND t1.ncbi_variation_id = t2.ncbi_variation_id
WHERE t1.corrected_clin_sig != t2.corrected_clin_sig;

CREATE VIEW IF NOT EXISTS current_submissions AS
SELECT * FROM submissions
WHERE date = (SELECT MAX(date) FROM submissions);

CREATE VIEW IF NOT EXISTS current_conflicting_submissions AS
SELECT * FROM conflicting_submissions
WHERE date = (SELECT MAX(date) FROM submissions);

CREATE VIEW IF NOT EXISTS current_conflicts AS
SELECT * FROM conflicts
WHERE date = (SELECT MAX(date) FROM submissions);

PRAGMA user_version = 1;
";
