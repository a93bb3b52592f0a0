//! Forward-only reader yielding one `ClinVarSet` element at a time.
//!
//! Release files run to several gigabytes and millions of sets, so the
//! document is never loaded as a whole. Events outside a set are discarded
//! as they are read; inside a set they are folded into an owned [`Element`]
//! which is handed to the caller as soon as the set closes. Once the caller
//! drops it, nothing of that set remains in memory.

use std::io::BufRead;

use quick_xml::{
  Reader,
  events::{BytesStart, Event},
};

use crate::{Error, Result, node::Element};

/// Local name of the per-variant grouping element.
pub const SET_TAG: &[u8] = b"ClinVarSet";

pub struct SetReader<R> {
  reader:    Reader<R>,
  buf:       Vec<u8>,
  /// Open elements of the set currently being read, outermost first.
  open:      Vec<Element>,
  sets_read: u64,
  done:      bool,
}

impl<R: BufRead> SetReader<R> {
  pub fn new(inner: R) -> Self {
    let mut reader = Reader::from_reader(inner);
    reader.config_mut().trim_text(true);
    Self {
      reader,
      buf: Vec::new(),
      open: Vec::new(),
      sets_read: 0,
      done: false,
    }
  }

  /// Number of complete sets yielded so far.
  pub fn sets_read(&self) -> u64 { self.sets_read }

  /// `true` when no partially read set is held, which is always the case
  /// between two calls to `next`.
  pub fn is_idle(&self) -> bool { self.open.is_empty() }

  fn next_set(&mut self) -> Result<Option<Element>> {
    loop {
      self.buf.clear();
      match self.reader.read_event_into(&mut self.buf)? {
        Event::Start(ref e) => {
          if self.open.is_empty() && e.local_name().as_ref() != SET_TAG {
            continue;
          }
          self.open.push(start_element(e)?);
        }
        Event::Empty(ref e) => {
          if self.open.is_empty() && e.local_name().as_ref() != SET_TAG {
            continue;
          }
          let el = start_element(e)?;
          match self.open.last_mut() {
            Some(parent) => parent.children.push(el),
            None => {
              self.sets_read += 1;
              return Ok(Some(el));
            }
          }
        }
        Event::End(_) => {
          // End-tag names are checked by quick-xml itself.
          let Some(el) = self.open.pop() else { continue };
          match self.open.last_mut() {
            Some(parent) => parent.children.push(el),
            None => {
              self.sets_read += 1;
              return Ok(Some(el));
            }
          }
        }
        // Only text ahead of the first child element is kept.
        Event::Text(ref t) => {
          if let Some(top) = self.open.last_mut().filter(|el| el.children.is_empty()) {
            top.text.push_str(&t.unescape()?);
          }
        }
        Event::CData(ref c) => {
          if let Some(top) = self.open.last_mut().filter(|el| el.children.is_empty()) {
            top.text.push_str(&String::from_utf8_lossy(c));
          }
        }
        Event::Eof => {
          return match self.open.pop() {
            Some(el) => Err(Error::UnexpectedEof(el.name)),
            None => Ok(None),
          };
        }
        _ => {}
      }
    }
  }
}

fn start_element(e: &BytesStart<'_>) -> Result<Element> {
  let mut el = Element::new(String::from_utf8_lossy(e.local_name().as_ref()));
  for attr in e.attributes() {
    let attr = attr?;
    let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
    let value = attr.unescape_value()?.into_owned();
    el.attrs.push((key, value));
  }
  Ok(el)
}

impl<R: BufRead> Iterator for SetReader<R> {
  type Item = Result<Element>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.done {
      return None;
    }
    let next = self.next_set().transpose();
    if !matches!(next, Some(Ok(_))) {
      self.done = true;
    }
    next
  }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use crate::node::Step;

  fn sets(xml: &str) -> Vec<Element> {
    SetReader::new(xml.as_bytes())
      .collect::<Result<Vec<_>>>()
      .unwrap()
  }

  #[test]
  fn yields_each_set_in_document_order() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
      <ReleaseSet Dated="2020-05-01" Type="full">
        <ClinVarSet ID="1"><Title>first</Title></ClinVarSet>
        <ClinVarSet ID="2"><Title>second</Title></ClinVarSet>
      </ReleaseSet>"#;
    let sets = sets(xml);
    assert_eq!(sets.len(), 2);
    assert_eq!(sets[0].attr("ID"), Some("1"));
    assert_eq!(sets[1].find_text(&[Step::new("Title")]), Some("second"));
  }

  #[test]
  fn ignores_content_outside_sets() {
    let xml = r#"<ReleaseSet><Header>noise</Header><Other><Deep/></Other>
      <ClinVarSet ID="7"/></ReleaseSet>"#;
    let sets = sets(xml);
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].attr("ID"), Some("7"));
    assert!(sets[0].children.is_empty());
  }

  #[test]
  fn text_is_unescaped_and_cdata_kept() {
    let xml = r#"<R><ClinVarSet><A>Smith &amp; Jones</A><B><![CDATA[a < b]]></B>
      <C Type="x &quot;y&quot;"/></ClinVarSet></R>"#;
    let set = &sets(xml)[0];
    assert_eq!(set.find_text(&[Step::new("A")]), Some("Smith & Jones"));
    assert_eq!(set.find_text(&[Step::new("B")]), Some("a < b"));
    assert_eq!(set.find(&[Step::new("C")]).unwrap().attr("Type"), Some("x \"y\""));
  }

  #[test]
  fn text_after_first_child_is_dropped() {
    let xml = "<R><ClinVarSet><A>lead<![CDATA[ing]]><B>inner</B>tail<C/>more</A></ClinVarSet></R>";
    let set = &sets(xml)[0];
    let a = set.find(&[Step::new("A")]).unwrap();
    assert_eq!(a.text(), Some("leading"));
    assert_eq!(a.find_text(&[Step::new("B")]), Some("inner"));
  }

  #[test]
  fn namespace_prefixes_are_stripped() {
    let xml = r#"<R xmlns:cv="urn:x"><cv:ClinVarSet cv:ID="3"><cv:A>t</cv:A></cv:ClinVarSet></R>"#;
    let set = &sets(xml)[0];
    assert_eq!(set.name, "ClinVarSet");
    assert_eq!(set.attr("ID"), Some("3"));
    assert_eq!(set.find_text(&[Step::new("A")]), Some("t"));
  }

  #[test]
  fn holds_nothing_between_sets() {
    let mut xml = String::from("<ReleaseSet>");
    for i in 0..5_000 {
      xml.push_str(&format!(
        "<ClinVarSet ID=\"{i}\"><ClinVarAssertion><X>{i}</X></ClinVarAssertion></ClinVarSet>"
      ));
    }
    xml.push_str("</ReleaseSet>");

    let mut reader = SetReader::new(xml.as_bytes());
    let mut count = 0u64;
    while let Some(set) = reader.next() {
      let set = set.unwrap();
      assert!(reader.is_idle());
      assert_eq!(set.children.len(), 1, "set {count} carries earlier subtrees");
      assert_eq!(set.attr("ID"), Some(count.to_string().as_str()));
      count += 1;
    }
    assert_eq!(count, 5_000);
    assert_eq!(reader.sets_read(), 5_000);
  }

  #[test]
  fn truncated_document_is_an_error() {
    let xml = "<ReleaseSet><ClinVarSet ID=\"1\"><A>text";
    let results: Vec<_> = SetReader::new(xml.as_bytes()).collect();
    assert_eq!(results.len(), 1);
    assert!(results[0].is_err());
  }

  #[test]
  fn mismatched_tags_are_an_error() {
    let xml = "<R><ClinVarSet><A></B></ClinVarSet></R>";
    let mut reader = SetReader::new(xml.as_bytes());
    assert!(reader.next().unwrap().is_err());
    assert!(reader.next().is_none());
  }
}
