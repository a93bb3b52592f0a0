//! A small owned element tree with XPath-like child path lookups.
//!
//! Only `ClinVarSet` subtrees are ever materialized as [`Element`]s; see
//! [`crate::reader::SetReader`].

/// One step of a child path: an element name, optionally filtered on its
/// `Type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
  pub name: &'static str,
  pub kind: Option<&'static str>,
}

impl Step {
  pub const fn new(name: &'static str) -> Self { Self { name, kind: None } }

  /// Restrict this step to elements carrying `Type="<kind>"`.
  pub const fn typed(self, kind: &'static str) -> Self {
    Self { kind: Some(kind), ..self }
  }

  fn matches(&self, el: &Element) -> bool {
    el.name == self.name
      && self.kind.is_none_or(|kind| el.attr("Type") == Some(kind))
  }
}

/// Render a path for diagnostics, e.g. `MeasureSet/Name/ElementValue[@Type="Preferred"]`.
pub fn display_path(path: &[Step]) -> String {
  path
    .iter()
    .map(|s| match s.kind {
      Some(kind) => format!("{}[@Type=\"{kind}\"]", s.name),
      None => s.name.to_owned(),
    })
    .collect::<Vec<_>>()
    .join("/")
}

/// An XML element with its attributes, direct text and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
  /// Local name (namespace prefix stripped).
  pub name:     String,
  pub attrs:    Vec<(String, String)>,
  /// Text and CDATA content inside this element, up to its first child.
  pub text:     String,
  pub children: Vec<Element>,
}

impl Element {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), ..Self::default() }
  }

  pub fn attr(&self, key: &str) -> Option<&str> {
    self
      .attrs
      .iter()
      .find(|(k, _)| k == key)
      .map(|(_, v)| v.as_str())
  }

  /// The element's text, or `None` when it has none.
  pub fn text(&self) -> Option<&str> {
    (!self.text.is_empty()).then_some(self.text.as_str())
  }

  /// First descendant reached by following `path` one child level per step,
  /// in document order. Backtracks across siblings, so a matching first
  /// step whose subtree lacks the rest of the path does not hide a later
  /// sibling that has it.
  pub fn find(&self, path: &[Step]) -> Option<&Element> {
    let Some((step, rest)) = path.split_first() else {
      return Some(self);
    };
    self
      .children
      .iter()
      .filter(|c| step.matches(c))
      .find_map(|c| c.find(rest))
  }

  /// Text of the element at `path`, if the element exists and has text.
  pub fn find_text(&self, path: &[Step]) -> Option<&str> {
    self.find(path).and_then(Element::text)
  }

  /// Direct children matching `step`, in document order.
  pub fn find_all<'a>(&'a self, step: Step) -> impl Iterator<Item = &'a Element> + 'a {
    self.children.iter().filter(move |c| step.matches(c))
  }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn leaf(name: &str, kind: Option<&str>, text: &str) -> Element {
    let mut el = Element::new(name);
    if let Some(kind) = kind {
      el.attrs.push(("Type".into(), kind.into()));
    }
    el.text = text.into();
    el
  }

  fn with_children(name: &str, kind: Option<&str>, children: Vec<Element>) -> Element {
    let mut el = leaf(name, kind, "");
    el.children = children;
    el
  }

  const PATH: [Step; 3] = [
    Step::new("TraitSet").typed("PhenotypeInstruction"),
    Step::new("Trait").typed("PhenotypeInstruction"),
    Step::new("ElementValue").typed("Preferred"),
  ];

  #[test]
  fn typed_steps_filter_on_type_attribute() {
    let root = with_children("A", None, vec![
      with_children("TraitSet", Some("Disease"), vec![with_children(
        "Trait",
        Some("PhenotypeInstruction"),
        vec![leaf("ElementValue", Some("Preferred"), "wrong")],
      )]),
      with_children("TraitSet", Some("PhenotypeInstruction"), vec![with_children(
        "Trait",
        Some("PhenotypeInstruction"),
        vec![leaf("ElementValue", Some("Preferred"), "right")],
      )]),
    ]);
    assert_eq!(root.find_text(&PATH), Some("right"));
  }

  #[test]
  fn backtracks_across_siblings() {
    let root = with_children("A", None, vec![
      with_children("TraitSet", Some("PhenotypeInstruction"), vec![]),
      with_children("TraitSet", Some("PhenotypeInstruction"), vec![with_children(
        "Trait",
        Some("PhenotypeInstruction"),
        vec![leaf("ElementValue", Some("Preferred"), "second")],
      )]),
    ]);
    assert_eq!(root.find_text(&PATH), Some("second"));
  }

  #[test]
  fn missing_path_and_empty_text_are_none() {
    let root = with_children("A", None, vec![leaf("B", None, "")]);
    assert!(root.find(&[Step::new("C")]).is_none());
    assert!(root.find(&[Step::new("B")]).is_some());
    assert_eq!(root.find_text(&[Step::new("B")]), None);
    assert_eq!(root.find(&[]), Some(&root));
  }

  #[test]
  fn find_all_keeps_document_order() {
    let root = with_children("A", None, vec![
      leaf("B", None, "1"),
      leaf("C", None, "x"),
      leaf("B", None, "2"),
    ]);
    let texts: Vec<_> = root.find_all(Step::new("B")).filter_map(Element::text).collect();
    assert_eq!(texts, ["1", "2"]);
  }

  #[test]
  fn paths_render_for_diagnostics() {
    assert_eq!(
      display_path(&PATH[1..]),
      "Trait[@Type=\"PhenotypeInstruction\"]/ElementValue[@Type=\"Preferred\"]"
    );
  }
}
