use thiserror::Error;

/// A structural error in a manifest document.
///
/// Positions are 1-based and relative to the whole manifest, not the
/// individual document the error was found in.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("line {line}, column {column}: {message}")]
pub struct ParseError {
  pub line: usize,
  pub column: usize,
  pub message: String,
}
