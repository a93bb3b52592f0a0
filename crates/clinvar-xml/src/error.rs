//! Error types for the ClinVar XML extractor.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("xml error: {0}")]
  Xml(#[from] quick_xml::Error),

  #[error("xml attribute error: {0}")]
  Attribute(#[from] quick_xml::events::attributes::AttrError),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// A required element is absent from a `ClinVarSet`.
  #[error("ClinVarSet {set_id}: missing required element {path}")]
  MissingElement { set_id: String, path: String },

  /// A required attribute is absent from an element of a `ClinVarSet`.
  #[error("ClinVarSet {set_id}: element {element} has no {attribute} attribute")]
  MissingAttribute {
    set_id:    String,
    element:   String,
    attribute: &'static str,
  },

  /// The document ended inside an open element.
  #[error("unexpected end of document inside <{0}>")]
  UnexpectedEof(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
