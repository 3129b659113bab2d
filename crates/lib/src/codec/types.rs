//! Error types for the release payload codec.

use thiserror::Error;

use super::wire::WireType;

/// Errors raised while walking protobuf wire-format bytes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
  #[error("truncated input at byte {offset}")]
  Truncated { offset: usize },

  #[error("varint at byte {offset} exceeds 10 bytes")]
  VarintOverflow { offset: usize },

  #[error("invalid field number {number} at byte {offset}")]
  InvalidFieldNumber { number: u64, offset: usize },

  #[error("unsupported wire type {wire_type} at byte {offset}")]
  UnsupportedWireType { wire_type: u8, offset: usize },

  #[error("field {field} has wire type {found:?}, expected {expected:?}")]
  UnexpectedWireType {
    field: u32,
    expected: WireType,
    found: WireType,
  },

  #[error("field {field} is not valid UTF-8")]
  InvalidUtf8 { field: u32 },
}

/// Errors that can occur while decoding or encoding a release payload.
///
/// Each variant corresponds to one stage of the base64 / gzip / protobuf
/// pipeline so callers can report which layer rejected a record.
#[derive(Debug, Error)]
pub enum CodecError {
  #[error("could not base64 decode release: {0}")]
  Encoding(#[from] base64::DecodeError),

  #[error("could not decompress release: {0}")]
  Compression(#[source] std::io::Error),

  #[error("could not decode release record: {0}")]
  Decode(#[from] WireError),

  #[error("could not recompress release: {0}")]
  Recompression(#[source] std::io::Error),
}
