//! Scalar value helpers: block scalar folding and re-rendering replaced values.

use super::node::ScalarStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Chomping {
  Strip,
  Clip,
  Keep,
}

/// Render `value` as YAML text in `style`, falling back to double quotes when
/// the value cannot be represented in that style.
pub(super) fn render(value: &str, style: ScalarStyle) -> String {
  match style {
    ScalarStyle::Plain if is_plain_safe(value) => value.to_string(),
    ScalarStyle::SingleQuoted if !value.contains(['\n', '\r']) => {
      format!("'{}'", value.replace('\'', "''"))
    }
    _ => double_quote(value),
  }
}

/// Whether `value` can be written as a plain scalar and still read back as the
/// same string, in both block and flow context.
fn is_plain_safe(value: &str) -> bool {
  let Some(first) = value.chars().next() else {
    return false;
  };
  if "-?:,[]{}#&*!|>'\"%@`".contains(first) || first.is_whitespace() {
    return false;
  }
  if value.ends_with(char::is_whitespace) || value.ends_with(':') {
    return false;
  }
  if value.contains(": ") || value.contains(" #") || value.contains([',', '[', ']', '{', '}']) {
    return false;
  }
  if value.chars().any(char::is_control) {
    return false;
  }
  !resolves_to_non_string(value)
}

/// Plain values YAML would read back as null, bool or a number.
fn resolves_to_non_string(value: &str) -> bool {
  let lower = value.to_ascii_lowercase();
  matches!(
    lower.as_str(),
    "~" | "null" | "true" | "false" | "yes" | "no" | "on" | "off" | "y" | "n" | ".inf" | "-.inf" | ".nan"
  ) || value.parse::<f64>().is_ok()
    || value.parse::<i64>().is_ok()
}

fn double_quote(value: &str) -> String {
  let mut out = String::with_capacity(value.len() + 2);
  out.push('"');
  for c in value.chars() {
    match c {
      '"' => out.push_str("\\\""),
      '\\' => out.push_str("\\\\"),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      '\t' => out.push_str("\\t"),
      '\0' => out.push_str("\\0"),
      c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
      c => out.push(c),
    }
  }
  out.push('"');
  out
}

/// Build the value of a block scalar from its content lines, which have
/// already had the block indentation removed. Blank lines are empty strings.
pub(super) fn fold_block(lines: &[&str], folded: bool, chomping: Chomping) -> String {
  let trailing = lines.iter().rev().take_while(|l| l.trim().is_empty()).count();
  let body = &lines[..lines.len() - trailing];

  if body.is_empty() {
    return match chomping {
      Chomping::Keep => "\n".repeat(trailing),
      _ => String::new(),
    };
  }

  let mut text = if folded { fold_lines(body) } else { body.join("\n") };

  match chomping {
    Chomping::Strip => {}
    Chomping::Clip => text.push('\n'),
    Chomping::Keep => {
      text.push('\n');
      text.push_str(&"\n".repeat(trailing));
    }
  }
  text
}

fn fold_lines(body: &[&str]) -> String {
  let mut out = String::new();
  let mut pending_blank = 0;
  let mut prev_more_indented = false;
  let mut first = true;

  for line in body {
    if line.trim().is_empty() {
      pending_blank += 1;
      continue;
    }
    let more_indented = line.starts_with([' ', '\t']);
    if first {
      out.push_str(&"\n".repeat(pending_blank));
    } else if pending_blank == 0 {
      out.push(if more_indented || prev_more_indented { '\n' } else { ' ' });
    } else {
      if more_indented || prev_more_indented {
        out.push('\n');
      }
      out.push_str(&"\n".repeat(pending_blank));
    }
    out.push_str(line);
    pending_blank = 0;
    first = false;
    prev_more_indented = more_indented;
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn plain_values_stay_plain() {
    assert_eq!(render("apps/v1", ScalarStyle::Plain), "apps/v1");
    assert_eq!(
      render("networking.k8s.io/v1beta1", ScalarStyle::Plain),
      "networking.k8s.io/v1beta1"
    );
  }

  #[test]
  fn ambiguous_plain_values_are_quoted() {
    assert_eq!(render("true", ScalarStyle::Plain), "\"true\"");
    assert_eq!(render("1.5", ScalarStyle::Plain), "\"1.5\"");
    assert_eq!(render("a: b", ScalarStyle::Plain), "\"a: b\"");
    assert_eq!(render("", ScalarStyle::Plain), "\"\"");
    assert_eq!(render("- x", ScalarStyle::Plain), "\"- x\"");
  }

  #[test]
  fn quoted_styles_are_kept() {
    assert_eq!(render("apps/v1", ScalarStyle::SingleQuoted), "'apps/v1'");
    assert_eq!(render("it's", ScalarStyle::SingleQuoted), "'it''s'");
    assert_eq!(render("apps/v1", ScalarStyle::DoubleQuoted), "\"apps/v1\"");
    assert_eq!(render("a\"b\\c\n", ScalarStyle::DoubleQuoted), "\"a\\\"b\\\\c\\n\"");
  }

  #[test]
  fn block_styles_fall_back_to_double_quotes() {
    assert_eq!(render("apps/v1", ScalarStyle::Literal), "\"apps/v1\"");
    assert_eq!(render("apps/v1", ScalarStyle::Folded), "\"apps/v1\"");
  }

  #[test]
  fn literal_chomping() {
    let lines = ["a", "b", "", ""];
    assert_eq!(fold_block(&lines, false, Chomping::Clip), "a\nb\n");
    assert_eq!(fold_block(&lines, false, Chomping::Strip), "a\nb");
    assert_eq!(fold_block(&lines, false, Chomping::Keep), "a\nb\n\n\n");
  }

  #[test]
  fn folded_lines() {
    assert_eq!(fold_block(&["a", "b"], true, Chomping::Clip), "a b\n");
    assert_eq!(fold_block(&["a", "", "b"], true, Chomping::Clip), "a\nb\n");
    assert_eq!(fold_block(&["a", "  b", "c"], true, Chomping::Clip), "a\n  b\nc\n");
  }

  #[test]
  fn empty_block() {
    assert_eq!(fold_block(&[], false, Chomping::Clip), "");
    assert_eq!(fold_block(&["", ""], false, Chomping::Keep), "\n\n");
  }
}
