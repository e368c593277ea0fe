//! Decoding of raw sample bytes into typed values and scaled doubles.
//!
//! All types are stored little-endian. The `sixbyte` type has no native
//! Rust counterpart and is assembled by hand from its six bytes.

use crate::types::{NumericType, RawValue};

/// Decode one sample from `bytes`, which must be exactly
/// `numeric_type.size()` long.
fn decode_value(bytes: &[u8], numeric_type: NumericType) -> RawValue {
    match numeric_type {
        NumericType::U8 => RawValue::UnsignedInteger(u64::from(bytes[0])),
        NumericType::I8 => RawValue::SignedInteger(i64::from(bytes[0] as i8)),
        NumericType::U16 => {
            RawValue::UnsignedInteger(u64::from(u16::from_le_bytes(bytes.try_into().unwrap())))
        }
        NumericType::I16 => {
            RawValue::SignedInteger(i64::from(i16::from_le_bytes(bytes.try_into().unwrap())))
        }
        NumericType::U32 => {
            RawValue::UnsignedInteger(u64::from(u32::from_le_bytes(bytes.try_into().unwrap())))
        }
        NumericType::I32 => {
            RawValue::SignedInteger(i64::from(i32::from_le_bytes(bytes.try_into().unwrap())))
        }
        NumericType::U64 => {
            RawValue::UnsignedInteger(u64::from_le_bytes(bytes.try_into().unwrap()))
        }
        NumericType::I64 => RawValue::SignedInteger(i64::from_le_bytes(bytes.try_into().unwrap())),
        NumericType::F32 => RawValue::Float(f64::from(f32::from_le_bytes(bytes.try_into().unwrap()))),
        NumericType::F64 => RawValue::Float(f64::from_le_bytes(bytes.try_into().unwrap())),
        NumericType::SixByte => {
            let mut value: u64 = 0;
            for (j, byte) in bytes.iter().enumerate() {
                value |= u64::from(*byte) << (8 * j);
            }
            RawValue::UnsignedInteger(value)
        }
    }
}

/// Reinterpret `bytes` as a sequence of typed samples.
///
/// `bytes` must be a whole number of samples; a trailing remainder is
/// ignored (callers slice exact ranges).
pub fn decode_raw(bytes: &[u8], numeric_type: NumericType) -> Vec<RawValue> {
    bytes
        .chunks_exact(numeric_type.size())
        .map(|chunk| decode_value(chunk, numeric_type))
        .collect()
}

/// Decode `bytes` to physical units: `value * factor + offset` per sample.
///
/// A zero factor is treated as 1.0, matching the format's convention that
/// an unset scaling factor means identity.
pub fn decode_scaled(bytes: &[u8], numeric_type: NumericType, factor: f64, offset: f64) -> Vec<f64> {
    let factor = if factor == 0.0 { 1.0 } else { factor };
    bytes
        .chunks_exact(numeric_type.size())
        .map(|chunk| decode_value(chunk, numeric_type).as_f64() * factor + offset)
        .collect()
}
