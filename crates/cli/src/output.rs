//! CLI output formatting utilities.
//!
//! Audit lines and the run summary go to stderr so stdout carries only
//! rewritten manifests.

use owo_colors::{OwoColorize, Stream};

use releasefix_lib::process::BatchReport;
use releasefix_lib::rewrite::Remap;

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
}

/// `1 release`, `2 releases`.
pub fn plural(count: usize, noun: &str) -> String {
  if count == 1 {
    format!("{count} {noun}")
  } else {
    format!("{count} {noun}s")
  }
}

/// Print the audit line for one remapped resource.
pub fn print_remap(remap: &Remap) {
  eprintln!("{}", remap.to_string().if_supports_color(Stream::Stderr, |s| s.cyan()));
}

pub fn print_manifest(id: &str, manifest: &str) {
  println!("# {id}");
  print!("{manifest}");
  if !manifest.ends_with('\n') {
    println!();
  }
}

pub fn print_success(message: &str) {
  eprintln!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stderr, |s| s.green()),
    message
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  eprintln!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stderr, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  eprintln!(
    "  {}: {}",
    label.if_supports_color(Stream::Stderr, |s| s.dimmed()),
    value
  );
}

pub fn print_summary(report: &BatchReport) {
  if report.total() == 0 {
    print_info("No deployed releases found");
    return;
  }

  let headline = format!(
    "Checked {}, {} to remap",
    plural(report.total(), "release"),
    plural(report.remap_count(), "resource")
  );
  if report.skipped() > 0 {
    print_warning(&headline);
  } else {
    print_success(&headline);
  }
  print_stat("Rewritten", &report.rewritten().to_string());
  print_stat("Unchanged", &report.unchanged().to_string());
  print_stat("Skipped", &report.skipped().to_string());
}
