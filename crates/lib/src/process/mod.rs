//! Runs each listed record through decode, parse, rewrite and serialize.
//!
//! A failure in any stage skips that record only. Nothing is written back to
//! the store: the result of a run is the set of remaps that would be made.

mod types;
mod verify;

use tracing::{debug, warn};

pub use types::{BatchReport, RecordError, RecordOutcome, RecordReport, VerifyError};
pub use verify::{verify_reencode, verify_rewrite};

use crate::codec;
use crate::document::ManifestBlob;
use crate::rewrite::{self, Remap, RewriteTable};
use crate::store::{ConfigRecord, ReleaseStore, StoreError};

/// List deployed records from `store` and process each in turn.
///
/// Only a failure to list is returned as an error.
pub fn run(store: &dyn ReleaseStore, table: &RewriteTable) -> Result<BatchReport, StoreError> {
  let records = store.list_deployed()?;
  Ok(process_batch(&records, table))
}

pub fn process_batch(records: &[ConfigRecord], table: &RewriteTable) -> BatchReport {
  let mut report = BatchReport::default();
  for record in records {
    report.push(process_record(record, table));
  }
  report
}

/// Process one record. Errors are logged and folded into the outcome.
pub fn process_record(record: &ConfigRecord, table: &RewriteTable) -> RecordReport {
  let id = record.id();
  let outcome = match rewrite_record(record, table) {
    Ok(Some((remaps, manifest))) => {
      debug!(record = %id, remaps = remaps.len(), "rewrote manifest");
      RecordOutcome::Rewritten { remaps, manifest }
    }
    Ok(None) => {
      debug!(record = %id, "nothing to rewrite");
      RecordOutcome::Unchanged
    }
    Err(err) => {
      warn!(record = %id, error = %err, "skipping record");
      RecordOutcome::Skipped(err)
    }
  };
  RecordReport { id, outcome }
}

/// Parse the `VERSION` label as a non-negative revision number.
pub fn parse_version(record: &ConfigRecord) -> Result<u64, RecordError> {
  let value = record.version_label().unwrap_or_default();
  value.parse().map_err(|source| RecordError::MalformedLabel {
    value: value.to_string(),
    source,
  })
}

fn rewrite_record(record: &ConfigRecord, table: &RewriteTable) -> Result<Option<(Vec<Remap>, String)>, RecordError> {
  let version = parse_version(record)?;
  let payload = record.release().ok_or(RecordError::MissingRelease)?;

  let release = codec::decode(payload)?;
  debug!(
    record = %record.id(),
    release = release.name(),
    version,
    "decoded release"
  );

  let original = ManifestBlob::parse(release.manifest())?;
  let mut blob = original.clone();
  let remaps = rewrite::apply(&mut blob, table, &record.namespace);
  if remaps.is_empty() {
    return Ok(None);
  }

  let manifest = blob.serialize();
  verify_rewrite(&original, &manifest, &remaps)?;
  verify_reencode(&release, &manifest)?;
  Ok(Some((remaps, manifest)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::codec::{CodecError, ReleaseRecord};
  use base64::Engine;
  use base64::engine::general_purpose::STANDARD;
  use std::collections::BTreeMap;
  use tracing_test::traced_test;

  const MANIFEST: &str = "\
---
# Source: web/templates/service.yaml
apiVersion: v1
kind: Service
metadata:
  name: web
---
# Source: web/templates/deployment.yaml
apiVersion: extensions/v1beta1
kind: Deployment
metadata:
  name: web
spec:
  replicas: 2
";

  fn config_map(name: &str, version: Option<&str>, release: Option<String>) -> ConfigRecord {
    let mut labels = BTreeMap::from([
      ("NAME".to_string(), "web".to_string()),
      ("OWNER".to_string(), "TILLER".to_string()),
      ("STATUS".to_string(), "DEPLOYED".to_string()),
    ]);
    if let Some(version) = version {
      labels.insert("VERSION".to_string(), version.to_string());
    }
    let data = release.map(|r| BTreeMap::from([("release".to_string(), r)])).unwrap_or_default();
    ConfigRecord {
      name: name.to_string(),
      namespace: "kube-system".to_string(),
      labels,
      data,
    }
  }

  fn encoded(manifest: &str) -> String {
    codec::encode(&ReleaseRecord::new("web", "prod", 2, manifest)).unwrap()
  }

  #[test]
  fn rewrites_a_deployed_release() {
    let record = config_map("web.v2", Some("2"), Some(encoded(MANIFEST)));
    let report = process_record(&record, &RewriteTable::default());
    assert_eq!(report.id, "kube-system/web.v2");

    let (remaps, manifest) = match report.outcome {
      RecordOutcome::Rewritten { remaps, manifest } => (remaps, manifest),
      other => panic!("expected a rewrite, got {other:?}"),
    };
    assert_eq!(manifest, MANIFEST.replace("extensions/v1beta1", "apps/v1"));
    assert_eq!(remaps.len(), 1);
    assert_eq!(
      remaps[0].to_string(),
      "remap kube-system/web apiVersion: extensions/v1beta1 kind: Deployment to apiVersion: apps/v1 kind: Deployment"
    );
  }

  #[test]
  fn duplicate_label_keys_still_report_the_remap() {
    let manifest = "apiVersion: extensions/v1beta1\nkind: Deployment\nmetadata:\n  name: web\n  labels:\n    app: web\n    app: web\n";
    let record = config_map("web.v2", Some("2"), Some(encoded(manifest)));
    let report = process_record(&record, &RewriteTable::default());

    let (remaps, rewritten) = match report.outcome {
      RecordOutcome::Rewritten { remaps, manifest } => (remaps, manifest),
      other => panic!("expected a rewrite, got {other:?}"),
    };
    assert_eq!(rewritten, manifest.replace("extensions/v1beta1", "apps/v1"));
    assert_eq!(
      remaps[0].to_string(),
      "remap kube-system/web apiVersion: extensions/v1beta1 kind: Deployment to apiVersion: apps/v1 kind: Deployment"
    );
  }

  #[test]
  fn unmatched_manifest_is_unchanged() {
    let record = config_map("cfg.v1", Some("1"), Some(encoded("apiVersion: v1\nkind: ConfigMap\n")));
    let report = process_record(&record, &RewriteTable::default());
    assert!(matches!(report.outcome, RecordOutcome::Unchanged));
  }

  #[test]
  fn bad_version_label_is_skipped() {
    for version in [Some("two"), Some("-1"), Some(""), None] {
      let record = config_map("web.v2", version, Some(encoded(MANIFEST)));
      let report = process_record(&record, &RewriteTable::default());
      assert!(
        matches!(report.outcome, RecordOutcome::Skipped(RecordError::MalformedLabel { .. })),
        "version {version:?}"
      );
    }
  }

  #[test]
  fn missing_release_is_skipped() {
    let record = config_map("web.v2", Some("2"), None);
    let report = process_record(&record, &RewriteTable::default());
    assert!(matches!(
      report.outcome,
      RecordOutcome::Skipped(RecordError::MissingRelease)
    ));
  }

  #[test]
  fn unparseable_manifest_is_skipped() {
    let record = config_map("web.v2", Some("2"), Some(encoded("a: [1, 2\n")));
    let report = process_record(&record, &RewriteTable::default());
    assert!(matches!(
      report.outcome,
      RecordOutcome::Skipped(RecordError::Parse(_))
    ));
  }

  #[test]
  #[traced_test]
  fn codec_failure_does_not_stop_the_batch() {
    let not_gzip = STANDARD.encode(b"plain bytes, not gzip");
    let records = [
      config_map("broken.v1", Some("1"), Some(not_gzip)),
      config_map("web.v2", Some("2"), Some(encoded(MANIFEST))),
    ];

    let report = process_batch(&records, &RewriteTable::default());
    assert_eq!(report.total(), 2);
    assert_eq!(report.skipped(), 1);
    assert_eq!(report.rewritten(), 1);
    assert_eq!(report.remap_count(), 1);
    assert!(matches!(
      report.records[0].outcome,
      RecordOutcome::Skipped(RecordError::Codec(CodecError::Compression(_)))
    ));
    assert!(logs_contain("skipping record"));
    assert!(logs_contain("kube-system/broken.v1"));
  }

  #[test]
  fn run_lists_then_processes() {
    struct Fixed(Vec<ConfigRecord>);
    impl ReleaseStore for Fixed {
      fn list_deployed(&self) -> Result<Vec<ConfigRecord>, StoreError> {
        Ok(self.0.clone())
      }
    }

    let store = Fixed(vec![
      config_map("web.v2", Some("2"), Some(encoded(MANIFEST))),
      config_map("cfg.v1", Some("1"), Some(encoded("kind: ConfigMap\n"))),
    ]);
    let report = run(&store, &RewriteTable::default()).unwrap();
    assert_eq!(report.rewritten(), 1);
    assert_eq!(report.unchanged(), 1);
  }

  #[test]
  fn list_failure_is_returned() {
    struct Down;
    impl ReleaseStore for Down {
      fn list_deployed(&self) -> Result<Vec<ConfigRecord>, StoreError> {
        Err(StoreError::List {
          status: "exit status: 1".to_string(),
          stderr: "connection refused".to_string(),
        })
      }
    }
    assert!(matches!(run(&Down, &RewriteTable::default()), Err(StoreError::List { .. })));
  }

  #[test]
  fn parses_version_labels() {
    assert_eq!(parse_version(&config_map("a", Some("12"), None)).unwrap(), 12);
    assert!(parse_version(&config_map("a", Some("1.5"), None)).is_err());
  }
}
