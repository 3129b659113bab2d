//! Scan command implementation.
//!
//! Lists deployed releases, rewrites each manifest in memory and prints one
//! audit line per remapped resource.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use releasefix_lib::process::{RecordOutcome, run};
use releasefix_lib::rewrite::RewriteTable;
use releasefix_lib::store::{FileStore, KubectlStore, ReleaseStore};

use crate::output::{print_manifest, print_remap, print_summary};

pub struct ScanOptions {
  pub kubeconfig: PathBuf,
  pub input: Option<PathBuf>,
  pub kubectl: PathBuf,
  pub print: bool,
}

pub fn cmd_scan(options: ScanOptions) -> Result<()> {
  let store: Box<dyn ReleaseStore> = match &options.input {
    Some(path) => {
      debug!(input = %path.display(), "reading release records from file");
      Box::new(FileStore::new(path))
    }
    None => {
      debug!(kubeconfig = %options.kubeconfig.display(), "reading release records from cluster");
      Box::new(KubectlStore::new(Some(options.kubeconfig.clone())).with_program(&options.kubectl))
    }
  };

  let table = RewriteTable::default();
  for (from, to) in table.rules() {
    debug!(%from, %to, "rewrite rule");
  }

  let report = run(store.as_ref(), &table).context("Failed to list release records")?;
  for record in &report.records {
    if let RecordOutcome::Rewritten { remaps, manifest } = &record.outcome {
      for remap in remaps {
        print_remap(remap);
      }
      if options.print {
        print_manifest(&record.id, manifest);
      }
    }
  }

  print_summary(&report);
  Ok(())
}
