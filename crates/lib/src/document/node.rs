//! Node tree for a parsed document.
//!
//! Nodes record where they came from in the document source. Nothing here is
//! used to re-emit text: serialization copies the source verbatim and only
//! splices in scalars that were explicitly replaced.

use std::ops::Range;

use super::scalar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarStyle {
  Plain,
  SingleQuoted,
  DoubleQuoted,
  Literal,
  Folded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStyle {
  Block,
  Flow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scalar {
  value: String,
  style: ScalarStyle,
  replacement: Option<String>,
}

impl Scalar {
  pub(super) fn new(value: String, style: ScalarStyle) -> Self {
    Self {
      value,
      style,
      replacement: None,
    }
  }

  pub(super) fn null() -> Self {
    Self::new(String::new(), ScalarStyle::Plain)
  }

  /// The decoded value, after quoting, escapes and folding are resolved.
  pub fn value(&self) -> &str {
    &self.value
  }

  pub fn style(&self) -> ScalarStyle {
    self.style
  }

  /// Whether this is an untagged YAML null (`~`, `null`, or nothing at all).
  pub fn is_null(&self) -> bool {
    self.style == ScalarStyle::Plain && matches!(self.value.as_str(), "" | "~" | "null" | "Null" | "NULL")
  }

  pub fn is_modified(&self) -> bool {
    self.replacement.is_some()
  }

  /// Replace the value, rendering it in this scalar's style where possible.
  ///
  /// `pad` prefixes the rendered text with a space; used when the scalar had
  /// no text of its own (`key:` with an empty value).
  pub(super) fn replace(&mut self, value: &str, pad: bool) {
    let rendered = scalar::render(value, self.style);
    self.replacement = Some(if pad { format!(" {rendered}") } else { rendered });
    self.value = value.to_string();
  }

  pub(super) fn replacement(&self) -> Option<&str> {
    self.replacement.as_deref()
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
  pub key: Node,
  pub value: Node,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
  Scalar(Scalar),
  Sequence {
    items: Vec<Node>,
    style: CollectionStyle,
  },
  Mapping {
    entries: Vec<Entry>,
    style: CollectionStyle,
  },
  Alias(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
  /// Byte range of the node's content in the document source, excluding
  /// its anchor and tag.
  pub span: Range<usize>,
  pub anchor: Option<String>,
  pub tag: Option<String>,
  pub kind: NodeKind,
}

impl Node {
  pub(super) fn new(span: Range<usize>, kind: NodeKind) -> Self {
    Self {
      span,
      anchor: None,
      tag: None,
      kind,
    }
  }

  pub(super) fn null_at(pos: usize) -> Self {
    Self::new(pos..pos, NodeKind::Scalar(Scalar::null()))
  }

  pub fn as_scalar(&self) -> Option<&Scalar> {
    match &self.kind {
      NodeKind::Scalar(scalar) => Some(scalar),
      _ => None,
    }
  }

  /// Look up a key in a mapping node. The first matching entry wins.
  pub fn get(&self, key: &str) -> Option<&Node> {
    self.entries()?.iter().find(|e| e.key.is_key(key)).map(|e| &e.value)
  }

  pub(super) fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
    match &mut self.kind {
      NodeKind::Mapping { entries, .. } => entries.iter_mut().find(|e| e.key.is_key(key)).map(|e| &mut e.value),
      _ => None,
    }
  }

  pub fn entries(&self) -> Option<&[Entry]> {
    match &self.kind {
      NodeKind::Mapping { entries, .. } => Some(entries),
      _ => None,
    }
  }

  fn is_key(&self, key: &str) -> bool {
    self.as_scalar().is_some_and(|s| s.value() == key)
  }

  /// Collect `(span, text)` for every replaced scalar under this node.
  pub(super) fn collect_replacements<'a>(&'a self, out: &mut Vec<(Range<usize>, &'a str)>) {
    match &self.kind {
      NodeKind::Scalar(scalar) => {
        if let Some(text) = scalar.replacement() {
          out.push((self.span.clone(), text));
        }
      }
      NodeKind::Sequence { items, .. } => items.iter().for_each(|n| n.collect_replacements(out)),
      NodeKind::Mapping { entries, .. } => {
        for entry in entries {
          entry.key.collect_replacements(out);
          entry.value.collect_replacements(out);
        }
      }
      NodeKind::Alias(_) => {}
    }
  }
}
