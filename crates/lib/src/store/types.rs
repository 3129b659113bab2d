use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::consts::{OWNER_LABEL, OWNER_TILLER, RELEASE_DATA_KEY, STATUS_DEPLOYED, STATUS_LABEL, VERSION_LABEL};

/// A ConfigMap as listed from the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigRecord {
  pub name: String,
  pub namespace: String,
  pub labels: BTreeMap<String, String>,
  pub data: BTreeMap<String, String>,
}

impl ConfigRecord {
  /// `{namespace}/{name}`, used to identify the record in logs.
  pub fn id(&self) -> String {
    format!("{}/{}", self.namespace, self.name)
  }

  pub fn label(&self, key: &str) -> Option<&str> {
    self.labels.get(key).map(String::as_str)
  }

  pub fn version_label(&self) -> Option<&str> {
    self.label(VERSION_LABEL)
  }

  /// The encoded release payload, if the record carries one.
  pub fn release(&self) -> Option<&str> {
    self.data.get(RELEASE_DATA_KEY).map(String::as_str)
  }

  /// Whether the record is the deployed revision of a Tiller release.
  pub fn is_deployed_release(&self) -> bool {
    self.label(OWNER_LABEL) == Some(OWNER_TILLER) && self.label(STATUS_LABEL) == Some(STATUS_DEPLOYED)
  }
}

#[derive(Debug, Error)]
pub enum StoreError {
  /// The store could not be reached at all.
  #[error("failed to run {program}: {source}")]
  Connection {
    program: String,
    #[source]
    source: io::Error,
  },

  #[error("listing records failed ({status}): {stderr}")]
  List { status: String, stderr: String },

  #[error("failed to read records from {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("invalid record list: {0}")]
  InvalidJson(#[from] serde_json::Error),

  #[error("invalid record list: {0}")]
  InvalidYaml(#[from] serde_yaml::Error),
}

/// The subset of a Kubernetes `ConfigMapList` this tool reads.
#[derive(Debug, Deserialize)]
pub(super) struct ConfigMapList {
  #[serde(default)]
  items: Option<Vec<ConfigMap>>,
}

#[derive(Debug, Deserialize)]
struct ConfigMap {
  #[serde(default)]
  metadata: ObjectMeta,
  #[serde(default)]
  data: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Default, Deserialize)]
struct ObjectMeta {
  #[serde(default)]
  name: Option<String>,
  #[serde(default)]
  namespace: Option<String>,
  #[serde(default)]
  labels: Option<BTreeMap<String, String>>,
}

impl ConfigMapList {
  pub(super) fn into_records(self) -> Vec<ConfigRecord> {
    self
      .items
      .unwrap_or_default()
      .into_iter()
      .map(|item| ConfigRecord {
        name: item.metadata.name.unwrap_or_default(),
        namespace: item.metadata.namespace.unwrap_or_default(),
        labels: item.metadata.labels.unwrap_or_default(),
        data: item.data.unwrap_or_default(),
      })
      .collect()
  }
}
