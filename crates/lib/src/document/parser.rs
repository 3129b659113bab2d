//! Structural parser for a single YAML document.
//!
//! Recursive descent over the raw source. The parser never rewrites text: it
//! only records each node's byte span and decoded value, so the source itself
//! remains the canonical form of everything that is not replaced.
//!
//! Indentation is tracked as a signed "parent indent": the root node has a
//! parent indent of -1, and block content belongs to a node only while it is
//! indented strictly deeper than that node's parent.

use super::node::{CollectionStyle, Entry, Node, NodeKind, Scalar, ScalarStyle};
use super::scalar::{Chomping, fold_block};
use super::types::ParseError;

type PResult<T> = Result<T, ParseError>;

pub(super) struct Parser<'a> {
  src: &'a str,
  pos: usize,
  line_offset: usize,
  started: bool,
}

fn is_blank_or_eol(b: Option<u8>) -> bool {
  matches!(b, None | Some(b' ' | b'\t' | b'\r' | b'\n'))
}

fn is_flow_indicator(b: u8) -> bool {
  matches!(b, b',' | b'[' | b']' | b'{' | b'}')
}

impl<'a> Parser<'a> {
  /// `line_offset` is the number of manifest lines preceding `src`, used to
  /// report errors against the whole manifest.
  pub(super) fn new(src: &'a str, line_offset: usize) -> Self {
    Self {
      src,
      pos: 0,
      line_offset,
      started: false,
    }
  }

  /// Parse the document, returning `None` when it holds no content at all.
  pub(super) fn parse_document(mut self) -> PResult<Option<Node>> {
    let root = if self.skip_trivia()? {
      self.started = true;
      Some(self.parse_node(-1, false)?)
    } else {
      None
    };

    if self.skip_trivia()? {
      return Err(self.error("unexpected content after document root"));
    }
    if self.at_document_end() {
      self.pos += 3;
      if self.skip_trivia()? || self.pos < self.src.len() {
        return Err(self.error("unexpected content after document end marker"));
      }
    }
    Ok(root)
  }

  // ---------------------------------------------------------------------------
  // Cursor helpers
  // ---------------------------------------------------------------------------

  fn peek(&self) -> Option<u8> {
    self.peek_at(0)
  }

  fn peek_at(&self, offset: usize) -> Option<u8> {
    self.src.as_bytes().get(self.pos + offset).copied()
  }

  fn line_start(&self, pos: usize) -> usize {
    self.src[..pos].rfind('\n').map_or(0, |i| i + 1)
  }

  fn column(&self) -> usize {
    self.pos - self.line_start(self.pos)
  }

  fn column_of(&self, pos: usize) -> usize {
    pos - self.line_start(pos)
  }

  fn error(&self, message: impl Into<String>) -> ParseError {
    self.error_at(self.pos, message)
  }

  fn error_at(&self, pos: usize, message: impl Into<String>) -> ParseError {
    let pos = pos.min(self.src.len());
    let line_start = self.line_start(pos);
    ParseError {
      line: self.line_offset + self.src[..pos].matches('\n').count() + 1,
      column: self.src[line_start..pos].chars().count() + 1,
      message: message.into(),
    }
  }

  fn skip_inline_spaces(&mut self) {
    while matches!(self.peek(), Some(b' ' | b'\t')) {
      self.pos += 1;
    }
  }

  fn skip_to_line_end(&mut self) {
    self.pos = self.src[self.pos..].find('\n').map_or(self.src.len(), |i| self.pos + i);
  }

  fn at_line_end_or_comment(&self) -> bool {
    matches!(self.peek(), None | Some(b'\n' | b'\r' | b'#'))
  }

  fn at_marker(&self, marker: &str) -> bool {
    self.column() == 0 && self.src[self.pos..].starts_with(marker) && is_blank_or_eol(self.peek_at(3))
  }

  fn at_document_end(&self) -> bool {
    self.at_marker("...")
  }

  fn at_sequence_indicator(&self) -> bool {
    self.peek() == Some(b'-') && is_blank_or_eol(self.peek_at(1))
  }

  /// Skip whitespace, line breaks and comments.
  ///
  /// Returns `true` when positioned on content, `false` at end of input or
  /// at a `...` document end marker.
  fn skip_trivia(&mut self) -> PResult<bool> {
    loop {
      match self.peek() {
        None => return Ok(false),
        Some(b' ' | b'\t' | b'\r' | b'\n') => self.pos += 1,
        Some(b'#') => self.skip_to_line_end(),
        Some(b'%') if !self.started && self.column() == 0 => self.skip_to_line_end(),
        Some(_) => {
          if self.at_document_end() {
            return Ok(false);
          }
          if self.at_marker("---") {
            return Err(self.error("content on a document marker line is not supported"));
          }
          let line_start = self.line_start(self.pos);
          let indent = &self.src[line_start..self.pos];
          if indent.contains('\t') && indent.trim().is_empty() {
            return Err(self.error("tab characters must not be used for indentation"));
          }
          return Ok(true);
        }
      }
    }
  }

  /// Like [`Self::skip_trivia`], inside a flow collection where end of input
  /// is always an error.
  fn skip_flow_trivia(&mut self, open: usize) -> PResult<()> {
    loop {
      match self.peek() {
        None => return Err(self.error_at(open, "unterminated flow collection")),
        Some(b' ' | b'\t' | b'\r' | b'\n') => self.pos += 1,
        Some(b'#') => self.skip_to_line_end(),
        Some(_) => return Ok(()),
      }
    }
  }

  // ---------------------------------------------------------------------------
  // Block structure
  // ---------------------------------------------------------------------------

  /// Parse the node starting at the cursor.
  ///
  /// `inline` is set when the node shares a line with its mapping key, where
  /// block collections may not begin.
  fn parse_node(&mut self, parent: isize, inline: bool) -> PResult<Node> {
    let start = self.pos;
    let (anchor, tag) = self.parse_properties(false)?;
    let has_properties = anchor.is_some() || tag.is_some();

    if has_properties && self.at_line_end_or_comment() {
      let props_end = self.pos;
      let mut node = if self.skip_trivia()? && self.column() as isize > parent {
        self.parse_node(parent, false)?
      } else {
        Node::null_at(props_end)
      };
      node.anchor = anchor;
      node.tag = tag;
      return Ok(node);
    }

    let indent = self.column_of(start);
    let content_start = self.pos;

    let mut node = match self.peek() {
      Some(b'-') if is_blank_or_eol(self.peek_at(1)) => {
        if inline {
          return Err(self.error("block sequence cannot start on the same line as its key"));
        }
        let mut node = self.parse_block_sequence(self.column())?;
        node.anchor = anchor;
        node.tag = tag;
        return Ok(node);
      }
      Some(b'[' | b'{') => {
        let node = self.parse_flow_collection()?;
        if self.at_implicit_key_indicator() {
          return Err(self.error("flow collections are not supported as mapping keys"));
        }
        node
      }
      Some(b'|' | b'>') => self.parse_block_scalar(parent)?,
      Some(b'?') if is_blank_or_eol(self.peek_at(1)) => {
        return Err(self.error("complex mapping keys are not supported"));
      }
      Some(b'*') => self.parse_alias(false)?,
      Some(b'\'') => self.parse_single_quoted()?,
      Some(b'"') => self.parse_double_quoted()?,
      Some(b'@' | b'`') => return Err(self.error("reserved indicator cannot start a plain scalar")),
      Some(b',' | b']' | b'}') => return Err(self.error("unexpected flow indicator")),
      _ => {
        let first = self.scan_plain_line(false);
        if first.is_empty() {
          return Err(self.error("expected a node"));
        }
        if self.at_implicit_key_indicator() {
          let value = self.src[first.clone()].to_string();
          Node::new(first, NodeKind::Scalar(Scalar::new(value, ScalarStyle::Plain)))
        } else {
          let mut node = self.continue_plain(parent, first)?;
          node.anchor = anchor;
          node.tag = tag;
          return Ok(node);
        }
      }
    };

    if self.at_implicit_key_indicator() && self.src[content_start..self.pos].find('\n').is_none() {
      if inline {
        return Err(self.error("mapping values are not allowed on the same line as a key"));
      }
      node.anchor = anchor;
      node.tag = tag;
      return self.parse_block_mapping(indent, start, node);
    }

    node.anchor = anchor;
    node.tag = tag;
    Ok(node)
  }

  /// Whether the cursor, after optional spaces, sits on a `:` value indicator.
  /// Leaves the cursor on the `:` when it does.
  fn at_implicit_key_indicator(&mut self) -> bool {
    let save = self.pos;
    self.skip_inline_spaces();
    if self.peek() == Some(b':') && is_blank_or_eol(self.peek_at(1)) {
      true
    } else {
      self.pos = save;
      false
    }
  }

  fn parse_block_mapping(&mut self, indent: usize, start: usize, first_key: Node) -> PResult<Node> {
    let mut entries = Vec::new();
    let mut key = first_key;

    loop {
      // cursor is on the ':' following `key`
      self.pos += 1;
      let value = self.parse_mapping_value(indent)?;
      entries.push(Entry { key, value });

      if !self.skip_trivia()? {
        break;
      }
      let column = self.column();
      if column < indent {
        break;
      }
      if column > indent {
        return Err(self.error("bad indentation of a mapping entry"));
      }
      key = self.parse_mapping_key()?;
    }

    let end = entries.last().map_or(start, |e| e.value.span.end.max(e.key.span.end));
    Ok(Node::new(
      start..end,
      NodeKind::Mapping {
        entries,
        style: CollectionStyle::Block,
      },
    ))
  }

  fn parse_mapping_key(&mut self) -> PResult<Node> {
    let (anchor, tag) = self.parse_properties(false)?;
    let mut key = match self.peek() {
      Some(b'-') if is_blank_or_eol(self.peek_at(1)) => {
        return Err(self.error("unexpected sequence entry in a mapping"));
      }
      Some(b'?') if is_blank_or_eol(self.peek_at(1)) => {
        return Err(self.error("complex mapping keys are not supported"));
      }
      Some(b'[' | b'{') => return Err(self.error("flow collections are not supported as mapping keys")),
      Some(b'*') => self.parse_alias(false)?,
      Some(b'\'') => self.parse_single_quoted()?,
      Some(b'"') => self.parse_double_quoted()?,
      _ => {
        let span = self.scan_plain_line(false);
        if span.is_empty() {
          return Err(self.error("expected a mapping key"));
        }
        let value = self.src[span.clone()].to_string();
        Node::new(span, NodeKind::Scalar(Scalar::new(value, ScalarStyle::Plain)))
      }
    };
    if !self.at_implicit_key_indicator() {
      return Err(self.error("could not find expected ':'"));
    }
    key.anchor = anchor;
    key.tag = tag;
    Ok(key)
  }

  fn parse_mapping_value(&mut self, indent: usize) -> PResult<Node> {
    let after_colon = self.pos;
    self.skip_inline_spaces();

    if !self.at_line_end_or_comment() {
      return self.parse_node(indent as isize, true);
    }
    if !self.skip_trivia()? {
      return Ok(Node::null_at(after_colon));
    }
    let column = self.column();
    if column > indent {
      return self.parse_node(indent as isize, false);
    }
    if column == indent && self.at_sequence_indicator() {
      return self.parse_block_sequence(column);
    }
    Ok(Node::null_at(after_colon))
  }

  fn parse_block_sequence(&mut self, indent: usize) -> PResult<Node> {
    let start = self.pos;
    let mut items = Vec::new();

    loop {
      // cursor is on the '-'
      self.pos += 1;
      items.push(self.parse_sequence_item(indent)?);

      if !self.skip_trivia()? {
        break;
      }
      let column = self.column();
      if column < indent || (column == indent && !self.at_sequence_indicator()) {
        break;
      }
      if column > indent {
        return Err(self.error("bad indentation of a sequence entry"));
      }
    }

    let end = items.last().map_or(start + 1, |n| n.span.end);
    Ok(Node::new(
      start..end,
      NodeKind::Sequence {
        items,
        style: CollectionStyle::Block,
      },
    ))
  }

  fn parse_sequence_item(&mut self, indent: usize) -> PResult<Node> {
    let after_dash = self.pos;
    self.skip_inline_spaces();

    if !self.at_line_end_or_comment() {
      return self.parse_node(indent as isize, false);
    }
    if self.skip_trivia()? && self.column() > indent {
      return self.parse_node(indent as isize, false);
    }
    Ok(Node::null_at(after_dash))
  }

  /// Parse `&anchor` and `!tag` properties in either order.
  fn parse_properties(&mut self, flow: bool) -> PResult<(Option<String>, Option<String>)> {
    let mut anchor = None;
    let mut tag = None;
    loop {
      match self.peek() {
        Some(b'&') if anchor.is_none() => {
          self.pos += 1;
          let name = self.scan_name(flow);
          if name.is_empty() {
            return Err(self.error("expected an anchor name"));
          }
          anchor = Some(name.to_string());
        }
        Some(b'!') if tag.is_none() => {
          let name = self.scan_name(flow);
          tag = Some(name.to_string());
        }
        _ => return Ok((anchor, tag)),
      }
      self.skip_inline_spaces();
    }
  }

  fn parse_alias(&mut self, flow: bool) -> PResult<Node> {
    let start = self.pos;
    self.pos += 1;
    let name = self.scan_name(flow);
    if name.is_empty() {
      return Err(self.error("expected an alias name"));
    }
    let name = name.to_string();
    Ok(Node::new(start..self.pos, NodeKind::Alias(name)))
  }

  fn scan_name(&mut self, flow: bool) -> &'a str {
    let src = self.src;
    let start = self.pos;
    while let Some(b) = self.peek() {
      if is_blank_or_eol(Some(b)) || (flow && is_flow_indicator(b)) {
        break;
      }
      self.pos += 1;
    }
    &src[start..self.pos]
  }

  // ---------------------------------------------------------------------------
  // Scalars
  // ---------------------------------------------------------------------------

  /// Scan the rest of a plain scalar on the current line and return its span
  /// with trailing whitespace trimmed. The cursor ends at the span's end.
  fn scan_plain_line(&mut self, flow: bool) -> std::ops::Range<usize> {
    let src = self.src;
    let start = self.pos;
    let bytes = src.as_bytes();
    let mut end = start;

    while let Some(&b) = bytes.get(self.pos) {
      match b {
        b'\n' => break,
        b'#' if self.pos > start && matches!(bytes[self.pos - 1], b' ' | b'\t') => break,
        b':' => {
          let next = bytes.get(self.pos + 1).copied();
          if is_blank_or_eol(next) || (flow && next.is_some_and(is_flow_indicator)) {
            break;
          }
        }
        b if flow && is_flow_indicator(b) => break,
        _ => {}
      }
      self.pos += 1;
      if !matches!(b, b' ' | b'\t' | b'\r') {
        end = self.pos;
      }
    }

    self.pos = end;
    start..end
  }

  /// Extend a plain scalar over continuation lines indented deeper than
  /// `parent`, folding line breaks into spaces.
  fn continue_plain(&mut self, parent: isize, first: std::ops::Range<usize>) -> PResult<Node> {
    let start = first.start;
    let mut value = self.src[first.clone()].to_string();
    let mut end = first.end;

    loop {
      self.pos = end;
      self.skip_inline_spaces();
      if self.peek() != Some(b'\n') && self.peek() != Some(b'\r') {
        break;
      }

      // find the next non-blank line
      let mut blank_lines = 0;
      let mut cursor = self.src[self.pos..].find('\n').map(|i| self.pos + i + 1);
      let content = loop {
        let Some(line_start) = cursor else { break None };
        let line = &self.src[line_start..];
        let spaces = line.len() - line.trim_start_matches([' ', '\t']).len();
        let content = line_start + spaces;
        match self.src.as_bytes().get(content) {
          None => break None,
          Some(b'\n' | b'\r') => {
            blank_lines += 1;
            cursor = self.src[content..].find('\n').map(|i| content + i + 1);
          }
          Some(_) => break Some((line_start, content)),
        }
      };

      let Some((line_start, content)) = content else { break };
      let indent = (content - line_start) as isize;
      if indent <= parent || self.src.as_bytes()[content] == b'#' {
        break;
      }
      self.pos = content;
      if self.at_document_end() || self.at_marker("---") {
        break;
      }

      let span = self.scan_plain_line(false);
      if self.peek() == Some(b':') {
        return Err(self.error("mapping values are not allowed in this context"));
      }
      if blank_lines == 0 {
        value.push(' ');
      } else {
        value.push_str(&"\n".repeat(blank_lines));
      }
      value.push_str(&self.src[span.clone()]);
      end = span.end;
    }

    self.pos = end;
    Ok(Node::new(
      start..end,
      NodeKind::Scalar(Scalar::new(value, ScalarStyle::Plain)),
    ))
  }

  /// Consume a line break inside a quoted scalar and append its folded form.
  fn fold_quoted_break(&mut self, value: &mut String, escaped: bool) {
    if !escaped {
      let trimmed = value.trim_end_matches([' ', '\t']).len();
      value.truncate(trimmed);
    }
    let mut breaks = 0;
    loop {
      if self.peek() == Some(b'\r') {
        self.pos += 1;
      }
      if self.peek() != Some(b'\n') {
        break;
      }
      self.pos += 1;
      breaks += 1;
      self.skip_inline_spaces();
    }
    match (breaks, escaped) {
      (0, _) => {}
      (1, false) => value.push(' '),
      (n, false) => value.push_str(&"\n".repeat(n - 1)),
      (n, true) => value.push_str(&"\n".repeat(n - 1)),
    }
  }

  fn parse_single_quoted(&mut self) -> PResult<Node> {
    let start = self.pos;
    self.pos += 1;
    let mut value = String::new();

    loop {
      match self.peek() {
        None => return Err(self.error_at(start, "unterminated single-quoted scalar")),
        Some(b'\'') if self.peek_at(1) == Some(b'\'') => {
          value.push('\'');
          self.pos += 2;
        }
        Some(b'\'') => {
          self.pos += 1;
          break;
        }
        Some(b'\r' | b'\n') => self.fold_quoted_break(&mut value, false),
        Some(_) => self.push_char(&mut value),
      }
    }

    Ok(Node::new(
      start..self.pos,
      NodeKind::Scalar(Scalar::new(value, ScalarStyle::SingleQuoted)),
    ))
  }

  fn parse_double_quoted(&mut self) -> PResult<Node> {
    let start = self.pos;
    self.pos += 1;
    let mut value = String::new();

    loop {
      match self.peek() {
        None => return Err(self.error_at(start, "unterminated double-quoted scalar")),
        Some(b'"') => {
          self.pos += 1;
          break;
        }
        Some(b'\\') => {
          self.pos += 1;
          if matches!(self.peek(), Some(b'\r' | b'\n')) {
            self.fold_quoted_break(&mut value, true);
          } else {
            self.parse_escape(&mut value)?;
          }
        }
        Some(b'\r' | b'\n') => self.fold_quoted_break(&mut value, false),
        Some(_) => self.push_char(&mut value),
      }
    }

    Ok(Node::new(
      start..self.pos,
      NodeKind::Scalar(Scalar::new(value, ScalarStyle::DoubleQuoted)),
    ))
  }

  fn push_char(&mut self, value: &mut String) {
    if let Some(c) = self.src[self.pos..].chars().next() {
      value.push(c);
      self.pos += c.len_utf8();
    }
  }

  fn parse_escape(&mut self, value: &mut String) -> PResult<()> {
    let escape_start = self.pos - 1;
    let Some(b) = self.peek() else {
      return Err(self.error_at(escape_start, "unterminated escape sequence"));
    };
    self.pos += 1;
    let c = match b {
      b'0' => '\0',
      b'a' => '\u{07}',
      b'b' => '\u{08}',
      b't' | b'\t' => '\t',
      b'n' => '\n',
      b'v' => '\u{0b}',
      b'f' => '\u{0c}',
      b'r' => '\r',
      b'e' => '\u{1b}',
      b' ' => ' ',
      b'"' => '"',
      b'/' => '/',
      b'\\' => '\\',
      b'N' => '\u{85}',
      b'_' => '\u{a0}',
      b'L' => '\u{2028}',
      b'P' => '\u{2029}',
      b'x' => self.parse_hex_escape(2, escape_start)?,
      b'u' => self.parse_hex_escape(4, escape_start)?,
      b'U' => self.parse_hex_escape(8, escape_start)?,
      _ => return Err(self.error_at(escape_start, "unknown escape sequence")),
    };
    value.push(c);
    Ok(())
  }

  fn parse_hex_escape(&mut self, digits: usize, escape_start: usize) -> PResult<char> {
    let hex = self
      .src
      .get(self.pos..self.pos + digits)
      .ok_or_else(|| self.error_at(escape_start, "truncated escape sequence"))?;
    let code = u32::from_str_radix(hex, 16).map_err(|_| self.error_at(escape_start, "invalid hex escape"))?;
    self.pos += digits;
    char::from_u32(code).ok_or_else(|| self.error_at(escape_start, "escape is not a valid code point"))
  }

  fn parse_block_scalar(&mut self, parent: isize) -> PResult<Node> {
    let start = self.pos;
    let folded = self.peek() == Some(b'>');
    self.pos += 1;

    let mut chomping = Chomping::Clip;
    let mut explicit_indent = None;
    for _ in 0..2 {
      match self.peek() {
        Some(b'-') => chomping = Chomping::Strip,
        Some(b'+') => chomping = Chomping::Keep,
        Some(d @ b'1'..=b'9') => explicit_indent = Some(isize::from(d - b'0')),
        _ => break,
      }
      self.pos += 1;
    }

    self.skip_inline_spaces();
    if self.peek() == Some(b'#') {
      self.skip_to_line_end();
    }
    let header_end = self.pos;
    match self.peek() {
      None => {
        let value = fold_block(&[], folded, chomping);
        return Ok(Node::new(start..header_end, block_kind(value, folded)));
      }
      Some(b'\r' | b'\n') => self.skip_to_line_end(),
      Some(_) => return Err(self.error("invalid block scalar header")),
    }
    // step past the header's line break
    self.pos = (self.pos + 1).min(self.src.len());

    let indent = match explicit_indent {
      Some(d) => (parent + d).max(0) as usize,
      None => self.detect_block_indent(),
    };

    let src = self.src;
    let mut lines: Vec<&'a str> = Vec::new();
    let mut end = header_end;
    if indent as isize > parent {
      while self.pos < src.len() {
        let line_start = self.pos;
        let line_end = src[line_start..].find('\n').map_or(src.len(), |i| line_start + i);
        let line = src[line_start..line_end].trim_end_matches('\r');
        let spaces = line.len() - line.trim_start_matches(' ').len();

        if line.trim().is_empty() {
          lines.push(line.get(indent..).unwrap_or(""));
        } else {
          if spaces < indent || (indent == 0 && (line.starts_with("---") || line.starts_with("..."))) {
            break;
          }
          lines.push(&line[indent..]);
          end = line_start + line.len();
        }
        self.pos = (line_end + 1).min(src.len());
      }
    }

    // blank lines after the last content line still belong to the scalar for
    // chomping, but the cursor must not skip past content it does not own
    let value = fold_block(&lines, folded, chomping);
    Ok(Node::new(start..end, block_kind(value, folded)))
  }

  /// Indentation of the first non-blank line at or after the cursor.
  fn detect_block_indent(&self) -> usize {
    let mut max_blank = 0;
    for line in self.src[self.pos..].split('\n') {
      let line = line.trim_end_matches('\r');
      let spaces = line.len() - line.trim_start_matches(' ').len();
      if line.trim().is_empty() {
        max_blank = max_blank.max(spaces);
        continue;
      }
      return spaces;
    }
    max_blank
  }

  // ---------------------------------------------------------------------------
  // Flow collections
  // ---------------------------------------------------------------------------

  fn parse_flow_collection(&mut self) -> PResult<Node> {
    let start = self.pos;
    let is_mapping = self.peek() == Some(b'{');
    let close = if is_mapping { b'}' } else { b']' };
    self.pos += 1;

    let mut items = Vec::new();
    let mut entries = Vec::new();

    loop {
      self.skip_flow_trivia(start)?;
      if self.peek() == Some(close) {
        self.pos += 1;
        break;
      }

      let node = self.parse_flow_node()?;
      self.skip_flow_trivia(start)?;

      if self.peek() == Some(b':') {
        self.pos += 1;
        self.skip_flow_trivia(start)?;
        let value = if matches!(self.peek(), Some(b',')) || self.peek() == Some(close) {
          Node::null_at(self.pos)
        } else {
          self.parse_flow_node()?
        };
        if is_mapping {
          entries.push(Entry { key: node, value });
        } else {
          let span = node.span.start..value.span.end;
          items.push(Node::new(
            span,
            NodeKind::Mapping {
              entries: vec![Entry { key: node, value }],
              style: CollectionStyle::Flow,
            },
          ));
        }
      } else if is_mapping {
        let value = Node::null_at(node.span.end);
        entries.push(Entry { key: node, value });
      } else {
        items.push(node);
      }

      self.skip_flow_trivia(start)?;
      match self.peek() {
        Some(b',') => self.pos += 1,
        Some(b) if b == close => {
          self.pos += 1;
          break;
        }
        _ => return Err(self.error("expected ',' or the end of the flow collection")),
      }
    }

    let kind = if is_mapping {
      NodeKind::Mapping {
        entries,
        style: CollectionStyle::Flow,
      }
    } else {
      NodeKind::Sequence {
        items,
        style: CollectionStyle::Flow,
      }
    };
    Ok(Node::new(start..self.pos, kind))
  }

  fn parse_flow_node(&mut self) -> PResult<Node> {
    let (anchor, tag) = self.parse_properties(true)?;
    let mut node = match self.peek() {
      Some(b'[' | b'{') => self.parse_flow_collection()?,
      Some(b'*') => self.parse_alias(true)?,
      Some(b'\'') => self.parse_single_quoted()?,
      Some(b'"') => self.parse_double_quoted()?,
      Some(b',' | b']' | b'}') if anchor.is_some() || tag.is_some() => Node::null_at(self.pos),
      _ => {
        let span = self.scan_plain_line(true);
        if span.is_empty() {
          return Err(self.error("unexpected character in flow collection"));
        }
        let value = self.src[span.clone()].to_string();
        Node::new(span, NodeKind::Scalar(Scalar::new(value, ScalarStyle::Plain)))
      }
    };
    node.anchor = anchor;
    node.tag = tag;
    Ok(node)
  }
}

fn block_kind(value: String, folded: bool) -> NodeKind {
  let style = if folded { ScalarStyle::Folded } else { ScalarStyle::Literal };
  NodeKind::Scalar(Scalar::new(value, style))
}
