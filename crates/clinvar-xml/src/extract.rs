//! Turning `ClinVarSet` elements into [`SubmissionRecord`]s.
//!
//! Layout of the parts of a set that are read:
//!
//! ```text
//! ClinVarSet
//!   ReferenceClinVarAssertion
//!     ClinVarAccession[@Type="RCV"]/@Acc                     variant accession
//!     MeasureSet/@ID                                          variant group id
//!     MeasureSet/Name/ElementValue[@Type="Preferred"]        preferred name (opt)
//!     MeasureSet/Measure/@Type                                variant type
//!     MeasureSet/Measure/MeasureRelationship/Symbol/
//!       ElementValue[@Type="Preferred"]                       gene symbol (opt)
//!   ClinVarAssertion                                          one per submission
//!     ClinVarAccession[@Type="SCV"]/@Acc, @OrgID
//!     ClinVarSubmissionID/@submitter                          (opt)
//!     ClinicalSignificance/@DateLastEvaluated                 (opt)
//!     ClinicalSignificance/{Description,ReviewStatus,Comment} (opt)
//!     TraitSet[@Type="PhenotypeInstruction"]/...              condition (opt)
//!     ObservedIn/Method/MethodType                            (opt)
//! ```
//!
//! Each accessor documents whether its field is required. Required fields
//! fail with [`Error::MissingElement`] or [`Error::MissingAttribute`]; optional
//! ones resolve to an empty string or [`NOT_PROVIDED`].

use std::{
  collections::VecDeque,
  fs::File,
  io::{BufRead, BufReader},
  path::Path,
};

use clinvar_core::{
  ReleaseDate, SubmissionRecord, TermNormalizer, record::NOT_PROVIDED,
};

use crate::{
  Error, Result,
  node::{Element, Step, display_path},
  reader::SetReader,
};

const PROGRESS_EVERY: u64 = 100_000;
const READ_BUFFER: usize = 1 << 16;

// ─── Paths ───────────────────────────────────────────────────────────────────

const REFERENCE_ASSERTION: [Step; 1] = [Step::new("ReferenceClinVarAssertion")];
const RCV_ACCESSION: [Step; 1] = [Step::new("ClinVarAccession").typed("RCV")];
const MEASURE_SET: [Step; 1] = [Step::new("MeasureSet")];
const MEASURE: [Step; 1] = [Step::new("Measure")];
const PREFERRED_NAME: [Step; 2] = [
  Step::new("Name"),
  Step::new("ElementValue").typed("Preferred"),
];
const GENE_SYMBOL: [Step; 3] = [
  Step::new("MeasureRelationship"),
  Step::new("Symbol"),
  Step::new("ElementValue").typed("Preferred"),
];

const ASSERTION: Step = Step::new("ClinVarAssertion");
const SCV_ACCESSION: [Step; 1] = [Step::new("ClinVarAccession").typed("SCV")];
const SUBMISSION_ID: [Step; 1] = [Step::new("ClinVarSubmissionID")];
const SIGNIFICANCE: [Step; 1] = [Step::new("ClinicalSignificance")];
const DESCRIPTION: [Step; 1] = [Step::new("Description")];
const REVIEW_STATUS: [Step; 1] = [Step::new("ReviewStatus")];
const COMMENT: [Step; 1] = [Step::new("Comment")];
const CONDITION: [Step; 4] = [
  Step::new("TraitSet").typed("PhenotypeInstruction"),
  Step::new("Trait").typed("PhenotypeInstruction"),
  Step::new("Name"),
  Step::new("ElementValue").typed("Preferred"),
];
const METHOD: [Step; 3] = [
  Step::new("ObservedIn"),
  Step::new("Method"),
  Step::new("MethodType"),
];

// ─── Accessors ───────────────────────────────────────────────────────────────

/// Set id used to locate a malformed set in diagnostics.
fn set_id(set: &Element) -> String {
  set.attr("ID").unwrap_or("?").to_owned()
}

fn require<'a>(set: &Element, from: &'a Element, path: &[Step]) -> Result<&'a Element> {
  from.find(path).ok_or_else(|| Error::MissingElement {
    set_id: set_id(set),
    path:   display_path(path),
  })
}

fn require_attr<'a>(
  set: &Element,
  el: &'a Element,
  attribute: &'static str,
) -> Result<&'a str> {
  el.attr(attribute).ok_or_else(|| Error::MissingAttribute {
    set_id: set_id(set),
    element: el.name.clone(),
    attribute,
  })
}

fn text_or_empty(from: &Element, path: &[Step]) -> String {
  from.find_text(path).unwrap_or_default().to_owned()
}

/// Fields shared by every assertion in one set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantFields {
  /// Required: `MeasureSet/@ID`.
  pub variant_group_id:  String,
  /// Optional, empty when absent (older schema versions).
  pub preferred_name:    String,
  /// Required: `Measure/@Type`.
  pub variant_type:      String,
  /// Optional, empty when no gene relationship is present.
  pub gene_symbol:       String,
  /// Required: RCV accession of the reference assertion.
  pub variant_accession: String,
}

pub fn variant_fields(set: &Element) -> Result<VariantFields> {
  let reference = require(set, set, &REFERENCE_ASSERTION)?;
  let measure_set = require(set, reference, &MEASURE_SET)?;
  let measure = require(set, measure_set, &MEASURE)?;
  let rcv = require(set, reference, &RCV_ACCESSION)?;

  Ok(VariantFields {
    variant_group_id:  require_attr(set, measure_set, "ID")?.to_owned(),
    preferred_name:    text_or_empty(measure_set, &PREFERRED_NAME),
    variant_type:      require_attr(set, measure, "Type")?.to_owned(),
    gene_symbol:       text_or_empty(measure, &GENE_SYMBOL),
    variant_accession: require_attr(set, rcv, "Acc")?.to_owned(),
  })
}

/// Fields of one `ClinVarAssertion`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFields {
  /// Required: SCV accession.
  pub submission_accession: String,
  /// Optional: `@OrgID` of the SCV accession, missing in old releases.
  pub submitter_id:         String,
  /// Optional: `ClinVarSubmissionID/@submitter`, missing in old releases.
  pub submitter_name:       String,
  /// Lowercased description, [`NOT_PROVIDED`] when absent or empty.
  pub raw_significance:     String,
  /// Optional, missing in old releases.
  pub last_evaluated:       String,
  /// Optional, missing in old releases.
  pub review_status:        String,
  /// Optional: phenotype-instruction trait name.
  pub condition_name:       String,
  /// [`NOT_PROVIDED`] when absent.
  pub method:               String,
  pub free_text_comment:    String,
}

pub fn assertion_fields(set: &Element, assertion: &Element) -> Result<AssertionFields> {
  let scv = require(set, assertion, &SCV_ACCESSION)?;
  let significance = require(set, assertion, &SIGNIFICANCE)?;

  let raw_significance = significance
    .find_text(&DESCRIPTION)
    .map(str::trim)
    .filter(|d| !d.is_empty())
    .map_or_else(|| NOT_PROVIDED.to_owned(), str::to_lowercase);

  Ok(AssertionFields {
    submission_accession: require_attr(set, scv, "Acc")?.to_owned(),
    submitter_id: scv.attr("OrgID").unwrap_or_default().to_owned(),
    submitter_name: assertion
      .find(&SUBMISSION_ID)
      .and_then(|s| s.attr("submitter"))
      .unwrap_or_default()
      .to_owned(),
    raw_significance,
    last_evaluated: significance
      .attr("DateLastEvaluated")
      .unwrap_or_default()
      .to_owned(),
    review_status: text_or_empty(significance, &REVIEW_STATUS),
    condition_name: text_or_empty(assertion, &CONDITION),
    method: assertion
      .find_text(&METHOD)
      .unwrap_or(NOT_PROVIDED)
      .to_owned(),
    free_text_comment: text_or_empty(significance, &COMMENT),
  })
}

/// All records of one set, in document order.
pub fn records_from_set(
  set: &Element,
  release: &ReleaseDate,
  normalizer: &TermNormalizer,
) -> Result<Vec<SubmissionRecord>> {
  let variant = variant_fields(set)?;

  set
    .find_all(ASSERTION)
    .map(|assertion| {
      let a = assertion_fields(set, assertion)?;
      let corrected_significance = normalizer.normalize(&a.raw_significance).to_owned();
      Ok(SubmissionRecord {
        release_date: release.clone(),
        variant_group_id: variant.variant_group_id.clone(),
        preferred_name: variant.preferred_name.clone(),
        variant_type: variant.variant_type.clone(),
        gene_symbol: variant.gene_symbol.clone(),
        submitter_id: a.submitter_id,
        submitter_name: a.submitter_name,
        variant_accession: variant.variant_accession.clone(),
        submission_accession: a.submission_accession,
        raw_significance: a.raw_significance,
        corrected_significance,
        last_evaluated: a.last_evaluated,
        review_status: a.review_status,
        condition_name: a.condition_name,
        method: a.method,
        free_text_comment: a.free_text_comment,
      })
    })
    .collect()
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// Streams [`SubmissionRecord`]s out of a release document.
///
/// Sets are read one at a time; each is dropped as soon as its records have
/// been built, so memory stays proportional to the largest single set.
/// Records come out in document order, duplicates included.
pub struct Extractor<'n, R> {
  sets:       SetReader<R>,
  release:    ReleaseDate,
  normalizer: &'n TermNormalizer,
  pending:    VecDeque<SubmissionRecord>,
  failed:     bool,
}

impl<'n, R: BufRead> Extractor<'n, R> {
  pub fn new(reader: R, release: ReleaseDate, normalizer: &'n TermNormalizer) -> Self {
    Self {
      sets: SetReader::new(reader),
      release,
      normalizer,
      pending: VecDeque::new(),
      failed: false,
    }
  }

  pub fn sets_read(&self) -> u64 { self.sets.sets_read() }
}

impl<R: BufRead> Iterator for Extractor<'_, R> {
  type Item = Result<SubmissionRecord>;

  fn next(&mut self) -> Option<Self::Item> {
    loop {
      if let Some(record) = self.pending.pop_front() {
        return Some(Ok(record));
      }
      if self.failed {
        return None;
      }

      let set = match self.sets.next()? {
        Ok(set) => set,
        Err(e) => {
          self.failed = true;
          return Some(Err(e));
        }
      };

      match records_from_set(&set, &self.release, self.normalizer) {
        Ok(records) => self.pending.extend(records),
        Err(e) => {
          self.failed = true;
          return Some(Err(e));
        }
      }
      drop(set);

      let read = self.sets.sets_read();
      if read % PROGRESS_EVERY == 0 {
        tracing::debug!(release = %self.release, sets = read, "extracting");
      }
    }
  }
}

/// Extract every record of the release file at `path`.
pub fn extract_file(
  path: impl AsRef<Path>,
  release: &ReleaseDate,
  normalizer: &TermNormalizer,
) -> Result<Vec<SubmissionRecord>> {
  let file = File::open(path)?;
  let mut extractor = Extractor::new(
    BufReader::with_capacity(READ_BUFFER, file),
    release.clone(),
    normalizer,
  );

  let records = extractor.by_ref().collect::<Result<Vec<_>>>()?;
  tracing::debug!(
    release = %release,
    sets = extractor.sets_read(),
    records = records.len(),
    "extraction finished"
  );
  Ok(records)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
