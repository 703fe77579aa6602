//! Binary pattern matching: `<<a::8, rest::binary>>`
//!
//! A bitstring pattern is an ordered list of [`Segment`]s. Each segment is
//! either a free variable (decode the bytes and bind them) or a literal (the
//! bytes must equal the literal's encoding).
//!
//! # Layout
//!
//! At compile time each segment becomes a field with a byte span; literals
//! also carry their encoded bytes. At match time a cursor walks the candidate
//! field by field. The last segment always spans the rest of the candidate,
//! so only the last segment may leave its size open. An empty segment list
//! matches only the empty binary.
//!
//! # Widths
//!
//! `width = unit * size` bits and must be a whole number of bytes.
//!
//! | Type | Default size | Default unit |
//! |------|--------------|--------------|
//! | `integer` | 8 | 1 |
//! | `float` | 64 | 1 |
//! | `binary` | rest | 8 |
//! | `bitstring` | rest | 1 |
//! | `utf8` / `utf16` / `utf32` | rest | 8 / 16 / 32 |

use crate::{Bindings, Matcher, PatternError, Value};
use std::fmt;

/// Type of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum SegmentType {
    /// Big- or little-endian, signed or unsigned integer.
    Integer,
    /// IEEE 754 float, 32 or 64 bits.
    Float,
    /// Raw nested bytes.
    Bitstring,
    /// Bytes read as 8-bit code units.
    Binary,
    /// UTF-8 encoded literals; free segments read 8-bit code units.
    Utf8,
    /// UTF-16 text.
    Utf16,
    /// UTF-32 text.
    Utf32,
}

impl SegmentType {
    fn default_unit(self) -> u32 {
        match self {
            Self::Integer | Self::Float | Self::Bitstring => 1,
            Self::Binary | Self::Utf8 => 8,
            Self::Utf16 => 16,
            Self::Utf32 => 32,
        }
    }

    fn default_size(self) -> Option<u32> {
        match self {
            Self::Integer => Some(8),
            Self::Float => Some(64),
            _ => None,
        }
    }
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Bitstring => "bitstring",
            Self::Binary => "binary",
            Self::Utf8 => "utf8",
            Self::Utf16 => "utf16",
            Self::Utf32 => "utf32",
        })
    }
}

/// Segment modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum Attribute {
    /// Two's complement integer.
    Signed,
    /// Unsigned integer (default).
    Unsigned,
    /// Most significant byte first (default).
    Big,
    /// Least significant byte first.
    Little,
}

/// What a segment does with its bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentValue {
    /// Decode and bind.
    Variable,
    /// Compare against the literal's encoding.
    Literal(Value),
}

/// One typed, sized field of a binary pattern.
///
/// # Example
///
/// ```
/// use clausal::{bitstring, match_pattern, Segment, SegmentType, Value};
///
/// // <<1::16, len::8, rest::binary>>
/// let pattern = bitstring(vec![
///     Segment::literal(SegmentType::Integer, 1).size(16),
///     Segment::free(SegmentType::Integer),
///     Segment::free(SegmentType::Binary),
/// ]);
/// let value = Value::Bytes(vec![0, 1, 3, b'a', b'b', b'c']);
/// let bound = match_pattern(&pattern, &value, clausal::always).unwrap();
/// assert_eq!(bound, vec![Value::from(3), Value::from("abc")]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Free variable or literal.
    pub value: SegmentValue,
    /// Segment type.
    pub kind: SegmentType,
    /// Bits per size unit; `None` uses the type default.
    pub unit: Option<u32>,
    /// Number of units; `None` uses the type default.
    pub size: Option<u32>,
    /// Modifiers.
    pub attributes: Vec<Attribute>,
}

impl Segment {
    /// A free segment that decodes and binds its bytes.
    #[must_use]
    pub fn free(kind: SegmentType) -> Self {
        Self {
            value: SegmentValue::Variable,
            kind,
            unit: None,
            size: None,
            attributes: Vec::new(),
        }
    }

    /// A literal segment whose bytes must equal `value`'s encoding.
    pub fn literal(kind: SegmentType, value: impl Into<Value>) -> Self {
        Self {
            value: SegmentValue::Literal(value.into()),
            ..Self::free(kind)
        }
    }

    /// Set the size in units.
    #[must_use]
    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the unit in bits.
    #[must_use]
    pub fn unit(mut self, unit: u32) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Add a modifier.
    #[must_use]
    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Shorthand for `attribute(Attribute::Signed)`.
    #[must_use]
    pub fn signed(self) -> Self {
        self.attribute(Attribute::Signed)
    }

    /// Shorthand for `attribute(Attribute::Little)`.
    #[must_use]
    pub fn little(self) -> Self {
        self.attribute(Attribute::Little)
    }

    fn has(&self, attribute: Attribute) -> bool {
        self.attributes.contains(&attribute)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Compilation
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
struct Field {
    kind: SegmentType,
    /// Byte span; `None` only for an unsized last segment.
    span: Option<usize>,
    /// Encoded literal bytes; `None` for a free segment.
    literal: Option<Vec<u8>>,
    signed: bool,
    little: bool,
}

/// Compiled binary pattern.
#[derive(Debug)]
pub struct BitStringMatcher {
    fields: Vec<Field>,
}

impl BitStringMatcher {
    /// Lay out `segments` into typed fields.
    ///
    /// # Errors
    ///
    /// - [`PatternError::UnsizedSegment`] if a free variable-width segment
    ///   without a size is not last
    /// - [`PatternError::UnalignedSegment`] if a width is not whole bytes
    /// - [`PatternError::UnsupportedWidth`] for integers wider than 64 bits,
    ///   zero-width integers, or float literals other than 32 or 64 bits
    /// - [`PatternError::InvalidSegmentLiteral`] if a literal cannot be encoded
    ///   as its segment type
    pub fn compile(segments: &[Segment]) -> Result<Self, PatternError> {
        let mut fields = Vec::with_capacity(segments.len());
        let last = segments.len().saturating_sub(1);

        for (index, segment) in segments.iter().enumerate() {
            let span = declared_span(index, segment)?;
            let field = Field {
                kind: segment.kind,
                span,
                literal: None,
                signed: segment.has(Attribute::Signed),
                little: segment.has(Attribute::Little),
            };

            match &segment.value {
                SegmentValue::Variable => {
                    if span.is_none() && index != last {
                        return Err(PatternError::UnsizedSegment {
                            index,
                            kind: segment.kind,
                        });
                    }
                    if segment.kind == SegmentType::Integer {
                        check_integer_width(index, span)?;
                    }
                    fields.push(field);
                }
                SegmentValue::Literal(value) => {
                    let bytes = encode(index, &field, value)?;
                    if span.is_some_and(|n| n != bytes.len()) {
                        return Err(PatternError::InvalidSegmentLiteral {
                            index,
                            kind: segment.kind,
                            value_type: value.type_name(),
                        });
                    }
                    fields.push(Field {
                        span: Some(bytes.len()),
                        literal: Some(bytes),
                        ..field
                    });
                }
            }
        }

        Ok(Self { fields })
    }
}

/// Integers decode to `i64`, so 1 to 8 bytes.
fn check_integer_width(index: usize, span: Option<usize>) -> Result<(), PatternError> {
    match span {
        Some(1..=8) => Ok(()),
        other => Err(PatternError::UnsupportedWidth {
            index,
            kind: SegmentType::Integer,
            bits: other.map_or(0, |n| n as u64 * 8),
        }),
    }
}

fn declared_span(index: usize, segment: &Segment) -> Result<Option<usize>, PatternError> {
    let Some(size) = segment.size.or_else(|| segment.kind.default_size()) else {
        return Ok(None);
    };
    let unit = segment.unit.unwrap_or_else(|| segment.kind.default_unit());
    let bits = u64::from(unit) * u64::from(size);
    if bits % 8 != 0 {
        return Err(PatternError::UnalignedSegment { index, bits });
    }
    usize::try_from(bits / 8)
        .map(Some)
        .map_err(|_| PatternError::UnsupportedWidth {
            index,
            kind: segment.kind,
            bits,
        })
}

fn encode(index: usize, field: &Field, value: &Value) -> Result<Vec<u8>, PatternError> {
    let invalid = || PatternError::InvalidSegmentLiteral {
        index,
        kind: field.kind,
        value_type: value.type_name(),
    };
    let unsupported = |bytes: usize| PatternError::UnsupportedWidth {
        index,
        kind: field.kind,
        bits: bytes as u64 * 8,
    };

    let mut bytes = match field.kind {
        SegmentType::Integer => {
            let n = value.as_int().ok_or_else(invalid)?;
            let width = field.span.unwrap_or(1);
            check_integer_width(index, Some(width))?;
            // Two's complement, truncated to the field width.
            n.to_be_bytes()[8 - width..].to_vec()
        }
        SegmentType::Float => {
            let x = match value {
                Value::Float(x) => *x,
                #[allow(clippy::cast_precision_loss)]
                Value::Int(i) => *i as f64,
                _ => return Err(invalid()),
            };
            match field.span.unwrap_or(8) {
                #[allow(clippy::cast_possible_truncation)]
                4 => (x as f32).to_be_bytes().to_vec(),
                8 => x.to_be_bytes().to_vec(),
                other => return Err(unsupported(other)),
            }
        }
        SegmentType::Binary | SegmentType::Bitstring => match value {
            Value::Bytes(b) => b.clone(),
            Value::String(s) => s.as_bytes().to_vec(),
            _ => return Err(invalid()),
        },
        SegmentType::Utf8 => text_of(value).ok_or_else(invalid)?.into_bytes(),
        SegmentType::Utf16 => {
            let text = text_of(value).ok_or_else(invalid)?;
            let units: Vec<u16> = text.encode_utf16().collect();
            return Ok(units
                .iter()
                .flat_map(|u| {
                    if field.little {
                        u.to_le_bytes()
                    } else {
                        u.to_be_bytes()
                    }
                })
                .collect());
        }
        SegmentType::Utf32 => {
            let text = text_of(value).ok_or_else(invalid)?;
            return Ok(text
                .chars()
                .flat_map(|c| {
                    let u = u32::from(c);
                    if field.little {
                        u.to_le_bytes()
                    } else {
                        u.to_be_bytes()
                    }
                })
                .collect());
        }
    };

    if field.little && matches!(field.kind, SegmentType::Integer | SegmentType::Float) {
        bytes.reverse();
    }
    Ok(bytes)
}

/// A string literal, or an integer code point.
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Int(cp) => u32::try_from(*cp)
            .ok()
            .and_then(char::from_u32)
            .map(String::from),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Matching
// ═══════════════════════════════════════════════════════════════════════════════

impl Matcher for BitStringMatcher {
    fn attempt(&self, value: &Value, out: &mut Bindings) -> bool {
        let bytes = match value {
            Value::Bytes(b) => b.as_slice(),
            Value::String(s) => s.as_bytes(),
            _ => return false,
        };

        // `<<>>` only matches the empty binary.
        if self.fields.is_empty() {
            return bytes.is_empty();
        }

        let mut cursor: usize = 0;
        for (i, field) in self.fields.iter().enumerate() {
            let is_last = i + 1 == self.fields.len();
            let end = if is_last {
                bytes.len()
            } else {
                // Non-last fields always have a span; checked at compile time.
                match cursor.checked_add(field.span.unwrap_or(0)) {
                    Some(end) => end,
                    None => return false,
                }
            };
            let Some(chunk) = bytes.get(cursor..end) else {
                return false;
            };
            if field.span.is_some_and(|n| n != chunk.len()) {
                return false;
            }

            match &field.literal {
                Some(expected) => {
                    if expected.as_slice() != chunk {
                        return false;
                    }
                }
                None => {
                    let Some(decoded) = decode(field, chunk) else {
                        return false;
                    };
                    out.push(decoded);
                }
            }

            cursor = end;
        }
        true
    }

    fn binding_count(&self) -> usize {
        self.fields.iter().filter(|f| f.literal.is_none()).count()
    }
}

fn decode(field: &Field, chunk: &[u8]) -> Option<Value> {
    match field.kind {
        SegmentType::Integer => decode_integer(chunk, field.signed, field.little).map(Value::Int),
        SegmentType::Float => {
            let mut buf = chunk.to_vec();
            if field.little {
                buf.reverse();
            }
            match buf.len() {
                4 => {
                    let raw: [u8; 4] = buf.try_into().ok()?;
                    Some(Value::Float(f64::from(f32::from_be_bytes(raw))))
                }
                8 => {
                    let raw: [u8; 8] = buf.try_into().ok()?;
                    Some(Value::Float(f64::from_be_bytes(raw)))
                }
                _ => None,
            }
        }
        SegmentType::Bitstring => Some(Value::Bytes(chunk.to_vec())),
        SegmentType::Binary | SegmentType::Utf8 => {
            Some(Value::String(chunk.iter().map(|&b| char::from(b)).collect()))
        }
        SegmentType::Utf16 => {
            if chunk.len() % 2 != 0 {
                return None;
            }
            let units = chunk.chunks_exact(2).map(|pair| {
                let raw = [pair[0], pair[1]];
                if field.little {
                    u16::from_le_bytes(raw)
                } else {
                    u16::from_be_bytes(raw)
                }
            });
            char::decode_utf16(units)
                .collect::<Result<String, _>>()
                .ok()
                .map(Value::String)
        }
        SegmentType::Utf32 => {
            if chunk.len() % 4 != 0 {
                return None;
            }
            chunk
                .chunks_exact(4)
                .map(|quad| {
                    let raw = [quad[0], quad[1], quad[2], quad[3]];
                    let unit = if field.little {
                        u32::from_le_bytes(raw)
                    } else {
                        u32::from_be_bytes(raw)
                    };
                    char::from_u32(unit)
                })
                .collect::<Option<String>>()
                .map(Value::String)
        }
    }
}

fn decode_integer(chunk: &[u8], signed: bool, little: bool) -> Option<i64> {
    let width = chunk.len();
    if width == 0 || width > 8 {
        return None;
    }
    let raw = if little {
        chunk.iter().rev().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
    } else {
        chunk.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
    };
    if signed {
        let shift = 64 - 8 * width as u32;
        #[allow(clippy::cast_possible_wrap)]
        Some(((raw << shift) as i64) >> shift)
    } else {
        i64::try_from(raw).ok()
    }
}
