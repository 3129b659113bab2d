//! Reads release records from a saved `ConfigMapList`.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::{ConfigRecord, StoreError};
use super::{ReleaseStore, parse_record_list};

/// Offline record source: the output of `kubectl get configmaps -o json`
/// (or `-o yaml`) saved to a file, or piped in on stdin as `-`.
///
/// The deployed-release selector is applied here, so unfiltered dumps work.
#[derive(Debug, Clone)]
pub struct FileStore {
  path: PathBuf,
}

impl FileStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn is_stdin(&self) -> bool {
    self.path.as_os_str() == "-"
  }

  fn read(&self) -> io::Result<String> {
    if self.is_stdin() {
      let mut text = String::new();
      io::stdin().read_to_string(&mut text)?;
      Ok(text)
    } else {
      std::fs::read_to_string(&self.path)
    }
  }
}

impl ReleaseStore for FileStore {
  fn list_deployed(&self) -> Result<Vec<ConfigRecord>, StoreError> {
    let text = self.read().map_err(|source| StoreError::Read {
      path: self.path.clone(),
      source,
    })?;

    let records = parse_record_list(&text)?;
    let total = records.len();
    let deployed: Vec<_> = records.into_iter().filter(ConfigRecord::is_deployed_release).collect();

    debug!(path = %self.path.display(), total, "read record list");
    info!(count = deployed.len(), "listed deployed releases");
    Ok(deployed)
  }
}
