//! Sources of Tiller release records.
//!
//! Records are listed once per run with the `OWNER=TILLER,STATUS=DEPLOYED`
//! selector. Failing to list is fatal for the caller; everything past the
//! list call is handled per record.

mod file;
mod kubectl;
mod types;

pub use file::FileStore;
pub use kubectl::KubectlStore;
pub use types::{ConfigRecord, StoreError};

use types::ConfigMapList;

/// Lists the deployed release records of a cluster.
pub trait ReleaseStore {
  fn list_deployed(&self) -> Result<Vec<ConfigRecord>, StoreError>;
}

/// Parse a `ConfigMapList` from JSON, or from YAML when the text is not a
/// JSON object.
pub fn parse_record_list(text: &str) -> Result<Vec<ConfigRecord>, StoreError> {
  let list: ConfigMapList = if text.trim_start().starts_with('{') {
    serde_json::from_str(text)?
  } else {
    serde_yaml::from_str(text)?
  };
  Ok(list.into_records())
}
