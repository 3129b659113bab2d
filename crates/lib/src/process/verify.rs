//! Checks on a rewritten manifest before it is reported.

use serde_yaml::Value;
use tracing::debug;

use super::types::{RecordError, VerifyError};
use crate::codec::{self, ReleaseRecord};
use crate::document::{Document, ManifestBlob};
use crate::rewrite::Remap;

/// Confirm `rewritten` reads back as `original` with only the remapped
/// `apiVersion`/`kind` values changed.
///
/// Each document is compared as loaded by `serde_yaml`, independently of the
/// model that produced the rewrite. Documents with no content are compared as
/// text. Documents `serde_yaml` refuses (duplicate keys, for one) are checked
/// through the reparsed model instead: their resource type must be the one
/// expected.
pub fn verify_rewrite(original: &ManifestBlob, rewritten: &str, remaps: &[Remap]) -> Result<(), VerifyError> {
  let reparsed = ManifestBlob::parse(rewritten)?;
  if reparsed.len() != original.len() {
    return Err(VerifyError::DocumentCount {
      before: original.len(),
      after: reparsed.len(),
    });
  }

  for (index, (before, after)) in original.documents().iter().zip(reparsed.documents()).enumerate() {
    if before.root().is_none() || after.root().is_none() {
      if before.render() != after.render() {
        return Err(VerifyError::Mismatch { index });
      }
      continue;
    }

    let remap = remaps.iter().find(|r| r.index == index);
    let mut expected = match serde_yaml::from_str::<Value>(&before.render()) {
      Ok(value) => value,
      Err(err) => {
        debug!(index, error = %err, "document not loadable as plain YAML, checking resource type only");
        verify_resource_type(before, after, remap, index)?;
        continue;
      }
    };
    if let Some(remap) = remap {
      if let Value::Mapping(map) = &mut expected {
        map.insert("apiVersion".into(), remap.to.api_version.clone().into());
        map.insert("kind".into(), remap.to.kind.clone().into());
      }
    }

    let actual: Value =
      serde_yaml::from_str(&after.render()).map_err(|source| VerifyError::Yaml { index, source })?;
    if actual != expected {
      return Err(VerifyError::Mismatch { index });
    }
  }
  Ok(())
}

fn verify_resource_type(
  before: &Document,
  after: &Document,
  remap: Option<&Remap>,
  index: usize,
) -> Result<(), VerifyError> {
  let read = |doc: &Document| {
    (
      doc.get_str(&["apiVersion"]).map(str::to_string),
      doc.get_str(&["kind"]).map(str::to_string),
    )
  };
  let expected = match remap {
    Some(remap) => (Some(remap.to.api_version.clone()), Some(remap.to.kind.clone())),
    None => read(before),
  };
  if read(after) != expected {
    return Err(VerifyError::Mismatch { index });
  }
  Ok(())
}

/// Re-encode `release` with `manifest` and confirm it decodes back intact.
pub fn verify_reencode(release: &ReleaseRecord, manifest: &str) -> Result<(), RecordError> {
  let updated = release.with_manifest(manifest);
  let encoded = codec::encode(&updated).map_err(RecordError::Encode)?;
  let decoded = codec::decode(&encoded).map_err(RecordError::Encode)?;
  if decoded != updated || decoded.manifest() != manifest {
    return Err(VerifyError::RoundTrip.into());
  }
  Ok(())
}
