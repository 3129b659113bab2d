//! The decoded Helm 2 release record.
//!
//! Mirrors the fields of `hapi.release.Release` this tool reads. Every other
//! field (chart, config, info, hooks, ...) is kept as opaque wire bytes, in
//! original order, so re-encoding a record reproduces it exactly.

use super::types::WireError;
use super::wire::{FieldReader, encode_bytes_field, encode_int32_field};

pub const NAME_FIELD: u32 = 1;
pub const MANIFEST_FIELD: u32 = 5;
pub const VERSION_FIELD: u32 = 7;
pub const NAMESPACE_FIELD: u32 = 8;

/// A release record decoded from its protobuf encoding.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReleaseRecord {
  name: String,
  manifest: String,
  version: i32,
  namespace: String,
  /// Every top-level field as it appeared on the wire, tag included.
  fields: Vec<RawField>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RawField {
  number: u32,
  bytes: Vec<u8>,
}

impl ReleaseRecord {
  /// Build a record holding only the fields this tool reads.
  pub fn new(name: &str, namespace: &str, version: i32, manifest: &str) -> Self {
    let mut buf = Vec::new();
    if !name.is_empty() {
      encode_bytes_field(NAME_FIELD, name.as_bytes(), &mut buf);
    }
    if !manifest.is_empty() {
      encode_bytes_field(MANIFEST_FIELD, manifest.as_bytes(), &mut buf);
    }
    if version != 0 {
      encode_int32_field(VERSION_FIELD, version, &mut buf);
    }
    if !namespace.is_empty() {
      encode_bytes_field(NAMESPACE_FIELD, namespace.as_bytes(), &mut buf);
    }

    let mut record = Self {
      name: name.to_string(),
      manifest: manifest.to_string(),
      version,
      namespace: namespace.to_string(),
      fields: Vec::new(),
    };
    for field in FieldReader::new(&buf).flatten() {
      record.fields.push(RawField {
        number: field.number,
        bytes: field.raw.to_vec(),
      });
    }
    record
  }

  /// Decode a record from protobuf bytes.
  ///
  /// Absent fields take their proto3 defaults; when a field repeats, the last
  /// occurrence wins.
  pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
    let mut record = ReleaseRecord::default();

    for field in FieldReader::new(bytes) {
      let field = field?;
      match field.number {
        NAME_FIELD => record.name = field.as_str()?.to_string(),
        MANIFEST_FIELD => record.manifest = field.as_str()?.to_string(),
        VERSION_FIELD => record.version = field.as_i32()?,
        NAMESPACE_FIELD => record.namespace = field.as_str()?.to_string(),
        _ => {}
      }
      record.fields.push(RawField {
        number: field.number,
        bytes: field.raw.to_vec(),
      });
    }

    Ok(record)
  }

  /// Encode the record back to protobuf bytes.
  pub fn to_bytes(&self) -> Vec<u8> {
    self.fields.iter().flat_map(|f| f.bytes.iter().copied()).collect()
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn manifest(&self) -> &str {
    &self.manifest
  }

  pub fn version(&self) -> i32 {
    self.version
  }

  pub fn namespace(&self) -> &str {
    &self.namespace
  }

  pub fn into_manifest(self) -> String {
    self.manifest
  }

  /// Return a copy of this record carrying a different manifest.
  ///
  /// The new manifest takes the place of the first manifest field on the wire
  /// (or is appended when the record had none). An empty manifest is omitted,
  /// as proto3 encoders do for default values.
  pub fn with_manifest(&self, manifest: impl Into<String>) -> Self {
    let manifest = manifest.into();
    let position = self.fields.iter().position(|f| f.number == MANIFEST_FIELD);

    let mut fields: Vec<RawField> = self
      .fields
      .iter()
      .filter(|f| f.number != MANIFEST_FIELD)
      .cloned()
      .collect();

    if !manifest.is_empty() {
      let mut bytes = Vec::new();
      encode_bytes_field(MANIFEST_FIELD, manifest.as_bytes(), &mut bytes);
      let field = RawField {
        number: MANIFEST_FIELD,
        bytes,
      };
      match position {
        Some(index) => fields.insert(index, field),
        None => fields.push(field),
      }
    }

    Self {
      manifest,
      fields,
      ..self.clone()
    }
  }
}
