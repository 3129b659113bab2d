//! Formatting-preserving model of a multi-document manifest.
//!
//! A [`ManifestBlob`] is split on `---` boundary lines into [`Document`]s.
//! Each document keeps its exact source text next to a parsed [`Node`] tree;
//! serialization copies that text and splices in only the scalars that were
//! replaced through [`Document::set_field`]. Comments, quoting, key order and
//! indentation of everything else survive byte for byte.
//!
//! # Example
//!
//! ```ignore
//! let mut blob = ManifestBlob::parse("apiVersion: apps/v1beta1\nkind: Deployment\n")?;
//! blob.documents_mut()[0].set_field(Field::ApiVersion, "apps/v1");
//! assert_eq!(blob.serialize(), "apiVersion: apps/v1\nkind: Deployment\n");
//! ```

mod node;
mod parser;
mod scalar;
mod types;

use std::fmt;

use crate::consts::DOCUMENT_MARKER;

pub use node::{CollectionStyle, Entry, Node, NodeKind, Scalar, ScalarStyle};
pub use types::ParseError;

use parser::Parser;

/// Top-level fields a document may have rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  ApiVersion,
  Kind,
}

impl Field {
  pub fn key(self) -> &'static str {
    match self {
      Field::ApiVersion => "apiVersion",
      Field::Kind => "kind",
    }
  }
}

/// One document of a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
  /// The boundary line that preceded this document, line break included.
  marker: Option<String>,
  source: String,
  root: Option<Node>,
}

impl Document {
  /// Parse a single document with no leading boundary line.
  pub fn parse(text: &str) -> Result<Self, ParseError> {
    Self::parse_segment(None, text, 0)
  }

  fn parse_segment(marker: Option<&str>, body: &str, line_offset: usize) -> Result<Self, ParseError> {
    let root = Parser::new(body, line_offset).parse_document()?;
    Ok(Self {
      marker: marker.map(str::to_string),
      source: body.to_string(),
      root,
    })
  }

  /// The root node, or `None` for a document holding only comments.
  pub fn root(&self) -> Option<&Node> {
    self.root.as_ref()
  }

  /// Follow a path of mapping keys from the root.
  pub fn get(&self, path: &[&str]) -> Option<&Node> {
    path.iter().try_fold(self.root.as_ref()?, |node, key| node.get(key))
  }

  /// The value of the scalar at `path`. Nulls read as absent.
  pub fn get_str(&self, path: &[&str]) -> Option<&str> {
    self
      .get(path)?
      .as_scalar()
      .filter(|s| !s.is_null())
      .map(Scalar::value)
  }

  /// Replace the value of a top-level field.
  ///
  /// Returns `false`, changing nothing, when the document has no such field
  /// or the field does not hold a scalar.
  pub fn set_field(&mut self, field: Field, value: &str) -> bool {
    let Some(node) = self.root.as_mut().and_then(|root| root.get_mut(field.key())) else {
      return false;
    };
    let pad = node.span.is_empty();
    match &mut node.kind {
      NodeKind::Scalar(scalar) => {
        scalar.replace(value, pad);
        true
      }
      _ => false,
    }
  }

  pub fn is_modified(&self) -> bool {
    let mut replacements = Vec::new();
    if let Some(root) = &self.root {
      root.collect_replacements(&mut replacements);
    }
    !replacements.is_empty()
  }

  /// The document's text with replacements applied, without its boundary line.
  pub fn render(&self) -> String {
    let mut replacements = Vec::new();
    if let Some(root) = &self.root {
      root.collect_replacements(&mut replacements);
    }
    replacements.sort_by_key(|(span, _)| span.start);

    let mut out = String::with_capacity(self.source.len());
    let mut cursor = 0;
    for (span, text) in replacements {
      out.push_str(&self.source[cursor..span.start]);
      out.push_str(text);
      cursor = span.end;
    }
    out.push_str(&self.source[cursor..]);
    out
  }
}

/// An ordered sequence of documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestBlob {
  documents: Vec<Document>,
}

impl ManifestBlob {
  /// Split `text` on boundary lines and parse every document.
  ///
  /// The first error aborts the whole blob; no partial result is returned.
  pub fn parse(text: &str) -> Result<Self, ParseError> {
    let mut documents = Vec::new();
    for segment in split_documents(text) {
      documents.push(Document::parse_segment(segment.marker, segment.body, segment.line_offset)?);
    }
    Ok(Self { documents })
  }

  /// Re-emit the documents in order, separated by boundary lines.
  pub fn serialize(&self) -> String {
    let mut out = String::new();
    for (index, document) in self.documents.iter().enumerate() {
      match &document.marker {
        Some(marker) => out.push_str(marker),
        None if index > 0 => {
          if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
          }
          out.push_str(DOCUMENT_MARKER);
          out.push('\n');
        }
        None => {}
      }
      out.push_str(&document.render());
    }
    out
  }

  pub fn documents(&self) -> &[Document] {
    &self.documents
  }

  pub fn documents_mut(&mut self) -> &mut [Document] {
    &mut self.documents
  }

  pub fn push(&mut self, document: Document) {
    self.documents.push(document);
  }

  pub fn len(&self) -> usize {
    self.documents.len()
  }

  pub fn is_empty(&self) -> bool {
    self.documents.is_empty()
  }
}

impl fmt::Display for ManifestBlob {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.serialize())
  }
}

/// Parse a manifest into its documents.
pub fn parse(text: &str) -> Result<ManifestBlob, ParseError> {
  ManifestBlob::parse(text)
}

/// Serialize a manifest back to text.
pub fn serialize(blob: &ManifestBlob) -> String {
  blob.serialize()
}

struct Segment<'a> {
  marker: Option<&'a str>,
  body: &'a str,
  line_offset: usize,
}

/// A boundary line is `---` alone, or followed by whitespace and a comment.
fn is_marker_line(line: &str) -> bool {
  let Some(rest) = line.strip_prefix(DOCUMENT_MARKER) else {
    return false;
  };
  let rest = rest.trim_end_matches(['\n', '\r']);
  if rest.is_empty() {
    return true;
  }
  rest.starts_with([' ', '\t']) && {
    let trimmed = rest.trim_start();
    trimmed.is_empty() || trimmed.starts_with('#')
  }
}

fn split_documents(text: &str) -> Vec<Segment<'_>> {
  let mut segments = Vec::new();
  let mut marker = None;
  let mut body_start = 0;
  let mut body_line = 0;
  let mut offset = 0;

  for (line_number, line) in text.split_inclusive('\n').enumerate() {
    if is_marker_line(line) {
      segments.push(Segment {
        marker,
        body: &text[body_start..offset],
        line_offset: body_line,
      });
      marker = Some(line);
      body_start = offset + line.len();
      body_line = line_number + 1;
    }
    offset += line.len();
  }
  segments.push(Segment {
    marker,
    body: &text[body_start..],
    line_offset: body_line,
  });

  // an empty preamble before a leading boundary line is not a document
  if segments.first().is_some_and(|s| s.marker.is_none() && s.body.is_empty()) {
    segments.remove(0);
  }
  segments
}
