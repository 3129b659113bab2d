//! Release payload codec.
//!
//! Tiller stores each release as `base64(gzip(protobuf(Release)))`. Decoding
//! runs the three layers strictly in order and stops at the first failure, so a
//! caller never sees a partial manifest.

mod release;
mod types;
pub mod wire;

use std::io::{Read, Write};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use tracing::debug;

pub use release::ReleaseRecord;
pub use types::{CodecError, WireError};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Decode an encoded release payload into its record.
pub fn decode(encoded: &str) -> Result<ReleaseRecord, CodecError> {
  let compressed = STANDARD.decode(encoded)?;
  let payload = decompress(&compressed)?;
  debug!(
    compressed = compressed.len(),
    decompressed = payload.len(),
    "decompressed release"
  );
  Ok(ReleaseRecord::from_bytes(&payload)?)
}

/// Decode an encoded release payload and return only its manifest text.
pub fn decode_manifest(encoded: &str) -> Result<String, CodecError> {
  decode(encoded).map(ReleaseRecord::into_manifest)
}

/// Encode a record the way Tiller stores it.
pub fn encode(record: &ReleaseRecord) -> Result<String, CodecError> {
  let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
  encoder
    .write_all(&record.to_bytes())
    .map_err(CodecError::Recompression)?;
  let compressed = encoder.finish().map_err(CodecError::Recompression)?;
  Ok(STANDARD.encode(compressed))
}

/// Inflate a gzip stream, following concatenated members to end of input.
fn decompress(compressed: &[u8]) -> Result<Vec<u8>, CodecError> {
  if !compressed.starts_with(&GZIP_MAGIC) {
    return Err(CodecError::Compression(std::io::Error::new(
      std::io::ErrorKind::InvalidData,
      "missing gzip header",
    )));
  }

  let mut payload = Vec::new();
  MultiGzDecoder::new(compressed)
    .read_to_end(&mut payload)
    .map_err(CodecError::Compression)?;
  Ok(payload)
}
