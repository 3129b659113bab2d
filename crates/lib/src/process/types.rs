use std::num::ParseIntError;

use thiserror::Error;

use crate::codec::CodecError;
use crate::document::ParseError;
use crate::rewrite::Remap;

/// Why a single record was skipped. Never fatal to the batch.
#[derive(Debug, Error)]
pub enum RecordError {
  #[error("bad version label {value:?}: {source}")]
  MalformedLabel {
    value: String,
    #[source]
    source: ParseIntError,
  },

  #[error("missing release data")]
  MissingRelease,

  #[error("could not decode release: {0}")]
  Codec(#[from] CodecError),

  #[error("could not parse manifest: {0}")]
  Parse(#[from] ParseError),

  #[error("rewritten manifest failed verification: {0}")]
  Verify(#[from] VerifyError),

  #[error("could not re-encode release: {0}")]
  Encode(#[source] CodecError),
}

#[derive(Debug, Error)]
pub enum VerifyError {
  #[error("rewritten manifest does not parse: {0}")]
  Reparse(#[from] ParseError),

  #[error("document count changed from {before} to {after}")]
  DocumentCount { before: usize, after: usize },

  #[error("document {index} is not valid YAML: {source}")]
  Yaml {
    index: usize,
    #[source]
    source: serde_yaml::Error,
  },

  #[error("document {index} changed beyond apiVersion and kind")]
  Mismatch { index: usize },

  #[error("re-encoded release does not decode to the rewritten manifest")]
  RoundTrip,
}

#[derive(Debug)]
pub enum RecordOutcome {
  /// At least one document was remapped. `manifest` is the rewritten text.
  Rewritten { remaps: Vec<Remap>, manifest: String },
  /// Nothing in the manifest matched the rewrite table.
  Unchanged,
  Skipped(RecordError),
}

#[derive(Debug)]
pub struct RecordReport {
  /// `{namespace}/{name}` of the ConfigMap.
  pub id: String,
  pub outcome: RecordOutcome,
}

/// Outcomes of one run, in listing order.
#[derive(Debug, Default)]
pub struct BatchReport {
  pub records: Vec<RecordReport>,
}

impl BatchReport {
  pub fn push(&mut self, report: RecordReport) {
    self.records.push(report);
  }

  pub fn total(&self) -> usize {
    self.records.len()
  }

  pub fn rewritten(&self) -> usize {
    self.count(|o| matches!(o, RecordOutcome::Rewritten { .. }))
  }

  pub fn unchanged(&self) -> usize {
    self.count(|o| matches!(o, RecordOutcome::Unchanged))
  }

  pub fn skipped(&self) -> usize {
    self.count(|o| matches!(o, RecordOutcome::Skipped(_)))
  }

  /// Every remap across the batch.
  pub fn remaps(&self) -> impl Iterator<Item = &Remap> {
    self.records.iter().flat_map(|r| match &r.outcome {
      RecordOutcome::Rewritten { remaps, .. } => remaps.as_slice(),
      _ => &[],
    })
  }

  pub fn remap_count(&self) -> usize {
    self.remaps().count()
  }

  fn count(&self, pred: impl Fn(&RecordOutcome) -> bool) -> usize {
    self.records.iter().filter(|r| pred(&r.outcome)).count()
  }
}
