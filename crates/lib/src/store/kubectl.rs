//! Lists release records through `kubectl`.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, info};

use super::types::{ConfigRecord, StoreError};
use super::{ReleaseStore, parse_record_list};
use crate::consts::DEPLOYED_SELECTOR;

const DEFAULT_PROGRAM: &str = "kubectl";

/// A cluster reached through the `kubectl` binary on `PATH`.
#[derive(Debug, Clone)]
pub struct KubectlStore {
  program: PathBuf,
  kubeconfig: Option<PathBuf>,
}

impl KubectlStore {
  /// An empty `kubeconfig` path leaves kubectl to its own defaults.
  pub fn new(kubeconfig: Option<PathBuf>) -> Self {
    Self {
      program: PathBuf::from(DEFAULT_PROGRAM),
      kubeconfig: kubeconfig.filter(|p| !p.as_os_str().is_empty()),
    }
  }

  /// Use a different kubectl binary.
  pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
    self.program = program.into();
    self
  }

  /// Arguments passed to kubectl for the list call.
  pub fn args(&self) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
      "get",
      "configmaps",
      "--all-namespaces",
      "-l",
      DEPLOYED_SELECTOR,
      "-o",
      "json",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();

    if let Some(kubeconfig) = &self.kubeconfig {
      args.push("--kubeconfig".into());
      args.push(kubeconfig.into());
    }
    args
  }
}

impl ReleaseStore for KubectlStore {
  fn list_deployed(&self) -> Result<Vec<ConfigRecord>, StoreError> {
    let program = self.program.display().to_string();
    debug!(program = %program, args = ?self.args(), "listing release records");

    let output = Command::new(&self.program)
      .args(self.args())
      .output()
      .map_err(|source| StoreError::Connection {
        program: program.clone(),
        source,
      })?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
      return Err(StoreError::List {
        status: output.status.to_string(),
        stderr,
      });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let records = parse_record_list(&stdout)?;
    info!(count = records.len(), "listed deployed releases");
    Ok(records)
  }
}
