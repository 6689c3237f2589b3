//! Typed tag values
//!
//! A tag lookup yields one of a small set of value shapes. Integer field
//! types of any width collapse into `Integers`, the two IEEE widths stay
//! distinct, and ASCII payloads become a `String` with trailing NULs removed.

use std::fmt;

use crate::io::byte_order::ByteOrderHandler;
use crate::tiff::constants::field_types;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::field_type_size;

/// Value of a single TIFF tag
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TagValue {
    /// The tag is not present in the directory
    #[default]
    Missing,
    /// BYTE, SHORT, LONG, LONG8 and their signed variants
    Integers(Vec<u64>),
    /// FLOAT
    Floats(Vec<f32>),
    /// DOUBLE, and RATIONAL folded to numerator / denominator
    Doubles(Vec<f64>),
    /// ASCII
    Ascii(String),
}

impl TagValue {
    /// Decodes `count` values of `field_type` from raw bytes in file order
    ///
    /// `bytes` must hold at least `count * field_type_size(field_type)` bytes.
    pub fn decode(
        field_type: u16,
        count: usize,
        bytes: &[u8],
        handler: &dyn ByteOrderHandler,
    ) -> TiffResult<TagValue> {
        let size = field_type_size(field_type)
            .ok_or(TiffError::UnsupportedFieldType(field_type))?;
        let bytes = &bytes[..count.saturating_mul(size).min(bytes.len())];
        let values = bytes.chunks_exact(size);

        let value = match field_type {
            field_types::ASCII => {
                let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
                TagValue::Ascii(String::from_utf8_lossy(&bytes[..end]).into_owned())
            }
            field_types::BYTE | field_types::UNDEFINED => {
                TagValue::Integers(bytes.iter().map(|&b| b as u64).collect())
            }
            field_types::SBYTE => {
                TagValue::Integers(bytes.iter().map(|&b| b as i8 as i64 as u64).collect())
            }
            field_types::SHORT => {
                TagValue::Integers(values.map(|v| handler.decode_u16(v) as u64).collect())
            }
            field_types::SSHORT => {
                TagValue::Integers(values.map(|v| handler.decode_i16(v) as i64 as u64).collect())
            }
            field_types::LONG | field_types::IFD => {
                TagValue::Integers(values.map(|v| handler.decode_u32(v) as u64).collect())
            }
            field_types::SLONG => {
                TagValue::Integers(values.map(|v| handler.decode_u32(v) as i32 as i64 as u64).collect())
            }
            field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => {
                TagValue::Integers(values.map(|v| handler.decode_u64(v)).collect())
            }
            field_types::FLOAT => TagValue::Floats(values.map(|v| handler.decode_f32(v)).collect()),
            field_types::DOUBLE => TagValue::Doubles(values.map(|v| handler.decode_f64(v)).collect()),
            field_types::RATIONAL => TagValue::Doubles(
                values
                    .map(|v| {
                        let num = handler.decode_u32(&v[..4]) as f64;
                        let den = handler.decode_u32(&v[4..]) as f64;
                        if den == 0.0 { 0.0 } else { num / den }
                    })
                    .collect(),
            ),
            field_types::SRATIONAL => TagValue::Doubles(
                values
                    .map(|v| {
                        let num = handler.decode_u32(&v[..4]) as i32 as f64;
                        let den = handler.decode_u32(&v[4..]) as i32 as f64;
                        if den == 0.0 { 0.0 } else { num / den }
                    })
                    .collect(),
            ),
            other => return Err(TiffError::UnsupportedFieldType(other)),
        };

        Ok(value)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, TagValue::Missing)
    }

    /// Number of values held (string length for ASCII)
    pub fn len(&self) -> usize {
        match self {
            TagValue::Missing => 0,
            TagValue::Integers(v) => v.len(),
            TagValue::Floats(v) => v.len(),
            TagValue::Doubles(v) => v.len(),
            TagValue::Ascii(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric values widened to f64; empty for `Missing` and `Ascii`
    pub fn as_f64s(&self) -> Vec<f64> {
        match self {
            TagValue::Integers(v) => v.iter().map(|&x| x as f64).collect(),
            TagValue::Floats(v) => v.iter().map(|&x| x as f64).collect(),
            TagValue::Doubles(v) => v.clone(),
            TagValue::Missing | TagValue::Ascii(_) => Vec::new(),
        }
    }

    /// Integer values; floating values are not converted
    pub fn as_u64s(&self) -> Vec<u64> {
        match self {
            TagValue::Integers(v) => v.clone(),
            _ => Vec::new(),
        }
    }

    /// Integer values truncated to 16 bits, as GeoKey directories are stored
    pub fn as_u16s(&self) -> Vec<u16> {
        self.as_u64s().into_iter().map(|v| v as u16).collect()
    }

    pub fn first_u64(&self) -> Option<u64> {
        match self {
            TagValue::Integers(v) => v.first().copied(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::Ascii(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Longest list printed in full by `Display`
const DISPLAY_LIMIT: usize = 8;

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, values: &[T]) -> fmt::Result {
    let shown = values.len().min(DISPLAY_LIMIT);
    for (i, v) in values[..shown].iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", v)?;
    }
    if values.len() > shown {
        write!(f, ", ... ({} values)", values.len())?;
    }
    Ok(())
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Missing => write!(f, "<missing>"),
            TagValue::Integers(v) => write_list(f, v),
            TagValue::Floats(v) => write_list(f, v),
            TagValue::Doubles(v) => write_list(f, v),
            TagValue::Ascii(s) => write!(f, "\"{}\"", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::byte_order::ByteOrder;

    #[test]
    fn test_decode_shorts_big_endian() {
        let handler = ByteOrder::BigEndian.create_handler();
        let value = TagValue::decode(field_types::SHORT, 2, &[0x01, 0x00, 0x00, 0x10], handler.as_ref()).unwrap();
        assert_eq!(value, TagValue::Integers(vec![256, 16]));
        assert_eq!(value.as_u16s(), vec![256, 16]);
    }

    #[test]
    fn test_display() {
        assert_eq!(TagValue::Missing.to_string(), "<missing>");
        assert_eq!(TagValue::Ascii("-9999".into()).to_string(), "\"-9999\"");
        assert_eq!(TagValue::Doubles(vec![2.5, 2.5, 0.0]).to_string(), "2.5, 2.5, 0");
        let long = TagValue::Integers((0..10).collect());
        assert_eq!(long.to_string(), "0, 1, 2, 3, 4, 5, 6, 7, ... (10 values)");
    }
}
