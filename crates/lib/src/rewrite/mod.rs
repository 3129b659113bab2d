//! Remaps deprecated resource types in a parsed manifest.
//!
//! Each top-level document is looked up once by its exact `(apiVersion, kind)`
//! pair. On a hit only those two scalars are replaced; everything else in the
//! document, nested resources included, is left alone.

mod table;

use std::fmt;

use tracing::debug;

use crate::document::{Field, ManifestBlob};

pub use table::{ResourceType, RewriteKey, RewriteTable, RewriteTarget};

/// One applied rewrite, identifying the resource that changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remap {
  /// Position of the document within its manifest.
  pub index: usize,
  pub namespace: String,
  pub name: String,
  pub from: ResourceType,
  pub to: ResourceType,
}

impl fmt::Display for Remap {
  /// The audit line for this change.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "remap {}/{} {} to {}", self.namespace, self.name, self.from, self.to)
  }
}

/// Rewrite every document in `blob` whose resource type appears in `table`.
///
/// Documents without `metadata.namespace` are reported under
/// `default_namespace`. Missing `apiVersion` or `kind` read as empty strings
/// and never match.
pub fn apply(blob: &mut ManifestBlob, table: &RewriteTable, default_namespace: &str) -> Vec<Remap> {
  let mut remaps = Vec::new();

  for (index, document) in blob.documents_mut().iter_mut().enumerate() {
    let from = ResourceType::new(
      document.get_str(&["apiVersion"]).unwrap_or_default(),
      document.get_str(&["kind"]).unwrap_or_default(),
    );
    let Some(to) = table.lookup(&from.api_version, &from.kind) else {
      continue;
    };

    let namespace = document
      .get_str(&["metadata", "namespace"])
      .unwrap_or(default_namespace)
      .to_string();
    let name = document.get_str(&["metadata", "name"]).unwrap_or_default().to_string();

    document.set_field(Field::ApiVersion, &to.api_version);
    document.set_field(Field::Kind, &to.kind);

    debug!(
      index,
      namespace = %namespace,
      name = %name,
      from = %from,
      to = %to,
      "remapped resource type"
    );

    remaps.push(Remap {
      index,
      namespace,
      name,
      from,
      to: to.clone(),
    });
  }

  remaps
}
