mod cmd;
mod output;

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cmd::{ScanOptions, cmd_scan};

/// releasefix - Remap deprecated resource types in Helm 2 releases
///
/// Lists the deployed Tiller release ConfigMaps, decodes each release and
/// reports which manifests would move to current API versions. Nothing is
/// written back to the cluster.
#[derive(Parser)]
#[command(name = "releasefix")]
#[command(author, version, about, long_about)]
struct Cli {
  /// Path to the kubeconfig file [default: $HOME/.kube/config]
  #[arg(long, value_name = "PATH")]
  kubeconfig: Option<PathBuf>,

  /// Read a ConfigMapList (JSON or YAML) from a file instead of the cluster; `-` reads stdin
  #[arg(long, value_name = "PATH")]
  input: Option<PathBuf>,

  /// kubectl binary used to list release records
  #[arg(long, value_name = "PATH", default_value = "kubectl")]
  kubectl: PathBuf,

  /// Print each rewritten manifest to stdout
  #[arg(long)]
  print: bool,

  /// Enable verbose output
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .with_ansi(std::io::stderr().is_terminal())
    .without_time()
    .with_target(false)
    .init();

  cmd_scan(ScanOptions {
    kubeconfig: cli.kubeconfig.unwrap_or_else(releasefix_lib::paths::default_kubeconfig),
    input: cli.input,
    kubectl: cli.kubectl,
    print: cli.print,
  })
}
