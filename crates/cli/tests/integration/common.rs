//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::{Value, json};
use tempfile::TempDir;

use releasefix_lib::codec::{self, ReleaseRecord};

/// A Helm chart manifest with one deprecated Deployment among current types.
pub const WEB_MANIFEST: &str = "\
---
# Source: web/templates/service.yaml
apiVersion: v1
kind: Service
metadata:
  name: web
spec:
  ports:
    - port: 80
---
# Source: web/templates/deployment.yaml
apiVersion: extensions/v1beta1
kind: Deployment
metadata:
  name: web
spec:
  replicas: 2
";

/// Get a Command for the releasefix binary.
pub fn releasefix_cmd() -> Command {
  cargo_bin_cmd!("releasefix")
}

/// Encode a manifest the way Tiller stores it.
pub fn encode_release(name: &str, manifest: &str) -> String {
  codec::encode(&ReleaseRecord::new(name, "default", 1, manifest)).unwrap()
}

/// A release ConfigMap as returned by `kubectl get configmaps -o json`.
pub fn release_config_map(name: &str, namespace: &str, status: &str, version: &str, release: &str) -> Value {
  json!({
    "apiVersion": "v1",
    "kind": "ConfigMap",
    "metadata": {
      "name": name,
      "namespace": namespace,
      "labels": {
        "NAME": name.split('.').next().unwrap_or(name),
        "OWNER": "TILLER",
        "STATUS": status,
        "VERSION": version,
      },
    },
    "data": { "release": release },
  })
}

/// Wrap items in a `ConfigMapList`.
pub fn config_map_list(items: Vec<Value>) -> String {
  json!({ "apiVersion": "v1", "kind": "List", "items": items }).to_string()
}

/// Isolated test environment.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Write a file relative to the temp directory and return its path.
  pub fn write_file(&self, relative_path: &str, content: &str) -> PathBuf {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
  }

  /// Write a record list and return its path.
  pub fn write_list(&self, items: Vec<Value>) -> PathBuf {
    self.write_file("configmaps.json", &config_map_list(items))
  }

  /// A Command reading records from `input`, with logging pinned to `info`.
  pub fn scan_cmd(&self, input: &Path) -> Command {
    let mut cmd = releasefix_cmd();
    cmd.arg("--input").arg(input);
    cmd.env("RUST_LOG", "info");
    cmd
  }
}
