//! Minimal protobuf wire-format reader and writer.
//!
//! Only what the release record needs: walking top-level fields while keeping
//! each field's raw bytes, and writing varint / length-delimited fields back.
//! Groups (wire types 3 and 4) are deprecated and rejected.

use super::types::WireError;

/// Longest legal varint encoding of a `u64`.
const MAX_VARINT_LEN: usize = 10;

/// Largest field number protobuf allows (2^29 - 1).
const MAX_FIELD_NUMBER: u64 = (1 << 29) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
  Varint,
  Fixed64,
  LengthDelimited,
  Fixed32,
}

impl WireType {
  fn from_tag_bits(bits: u8, offset: usize) -> Result<Self, WireError> {
    match bits {
      0 => Ok(WireType::Varint),
      1 => Ok(WireType::Fixed64),
      2 => Ok(WireType::LengthDelimited),
      5 => Ok(WireType::Fixed32),
      other => Err(WireError::UnsupportedWireType {
        wire_type: other,
        offset,
      }),
    }
  }

  fn bits(self) -> u8 {
    match self {
      WireType::Varint => 0,
      WireType::Fixed64 => 1,
      WireType::LengthDelimited => 2,
      WireType::Fixed32 => 5,
    }
  }
}

/// Decoded payload of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
  Varint(u64),
  Fixed64(u64),
  Bytes(&'a [u8]),
  Fixed32(u32),
}

impl FieldValue<'_> {
  pub fn wire_type(&self) -> WireType {
    match self {
      FieldValue::Varint(_) => WireType::Varint,
      FieldValue::Fixed64(_) => WireType::Fixed64,
      FieldValue::Bytes(_) => WireType::LengthDelimited,
      FieldValue::Fixed32(_) => WireType::Fixed32,
    }
  }
}

/// One top-level field: its number, decoded value, and the exact bytes
/// (tag included) it occupied in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
  pub number: u32,
  pub value: FieldValue<'a>,
  pub raw: &'a [u8],
}

impl<'a> Field<'a> {
  /// Interpret the field as a UTF-8 string.
  pub fn as_str(&self) -> Result<&'a str, WireError> {
    match self.value {
      FieldValue::Bytes(bytes) => std::str::from_utf8(bytes).map_err(|_| WireError::InvalidUtf8 { field: self.number }),
      other => Err(self.unexpected(WireType::LengthDelimited, other.wire_type())),
    }
  }

  /// Interpret the field as an `int32`, truncating as protobuf does.
  pub fn as_i32(&self) -> Result<i32, WireError> {
    match self.value {
      FieldValue::Varint(v) => Ok(v as u32 as i32),
      other => Err(self.unexpected(WireType::Varint, other.wire_type())),
    }
  }

  fn unexpected(&self, expected: WireType, found: WireType) -> WireError {
    WireError::UnexpectedWireType {
      field: self.number,
      expected,
      found,
    }
  }
}

/// Iterator over the top-level fields of a message.
///
/// Stops after the first error; the error is yielded once.
pub struct FieldReader<'a> {
  buf: &'a [u8],
  pos: usize,
  failed: bool,
}

impl<'a> FieldReader<'a> {
  pub fn new(buf: &'a [u8]) -> Self {
    Self {
      buf,
      pos: 0,
      failed: false,
    }
  }

  fn read_varint(&mut self) -> Result<u64, WireError> {
    let start = self.pos;
    let mut value = 0u64;
    for i in 0..MAX_VARINT_LEN {
      let byte = *self.buf.get(self.pos).ok_or(WireError::Truncated { offset: self.pos })?;
      self.pos += 1;
      value |= u64::from(byte & 0x7f) << (7 * i);
      if byte & 0x80 == 0 {
        return Ok(value);
      }
    }
    Err(WireError::VarintOverflow { offset: start })
  }

  fn take(&mut self, len: usize) -> Result<&'a [u8], WireError> {
    let end = self
      .pos
      .checked_add(len)
      .filter(|end| *end <= self.buf.len())
      .ok_or(WireError::Truncated { offset: self.buf.len() })?;
    let bytes = &self.buf[self.pos..end];
    self.pos = end;
    Ok(bytes)
  }

  fn read_field(&mut self) -> Result<Field<'a>, WireError> {
    let start = self.pos;
    let tag = self.read_varint()?;
    let number = tag >> 3;
    if number == 0 || number > MAX_FIELD_NUMBER {
      return Err(WireError::InvalidFieldNumber { number, offset: start });
    }
    let wire_type = WireType::from_tag_bits((tag & 0x7) as u8, start)?;

    let value = match wire_type {
      WireType::Varint => FieldValue::Varint(self.read_varint()?),
      WireType::Fixed64 => {
        let bytes = self.take(8)?;
        let mut le = [0u8; 8];
        le.copy_from_slice(bytes);
        FieldValue::Fixed64(u64::from_le_bytes(le))
      }
      WireType::Fixed32 => {
        let bytes = self.take(4)?;
        let mut le = [0u8; 4];
        le.copy_from_slice(bytes);
        FieldValue::Fixed32(u32::from_le_bytes(le))
      }
      WireType::LengthDelimited => {
        let len = self.read_varint()?;
        let len = usize::try_from(len).map_err(|_| WireError::Truncated { offset: self.buf.len() })?;
        FieldValue::Bytes(self.take(len)?)
      }
    };

    Ok(Field {
      number: number as u32,
      value,
      raw: &self.buf[start..self.pos],
    })
  }
}

impl<'a> Iterator for FieldReader<'a> {
  type Item = Result<Field<'a>, WireError>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.failed || self.pos >= self.buf.len() {
      return None;
    }
    let field = self.read_field();
    if field.is_err() {
      self.failed = true;
    }
    Some(field)
  }
}

pub fn encode_varint(mut value: u64, out: &mut Vec<u8>) {
  while value >= 0x80 {
    out.push((value as u8 & 0x7f) | 0x80);
    value >>= 7;
  }
  out.push(value as u8);
}

fn encode_tag(number: u32, wire_type: WireType, out: &mut Vec<u8>) {
  encode_varint((u64::from(number) << 3) | u64::from(wire_type.bits()), out);
}

/// Write a length-delimited field (strings, bytes, nested messages).
pub fn encode_bytes_field(number: u32, bytes: &[u8], out: &mut Vec<u8>) {
  encode_tag(number, WireType::LengthDelimited, out);
  encode_varint(bytes.len() as u64, out);
  out.extend_from_slice(bytes);
}

/// Write a varint field. Negative `int32` values are sign-extended to 64 bits.
pub fn encode_int32_field(number: u32, value: i32, out: &mut Vec<u8>) {
  encode_tag(number, WireType::Varint, out);
  encode_varint(i64::from(value) as u64, out);
}
