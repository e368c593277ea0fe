//! Shared value types used across the library.

use core::fmt;

/// Numeric type of a channel's raw samples, declared by the `CP` block.
///
/// The wire representation is a small integer code; [`NumericType::from_code`]
/// resolves it at decode time. All types are stored little-endian in the
/// file. `SixByte` is a 6-byte unsigned integer peculiar to the format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NumericType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    F32,
    F64,
    U64,
    I64,
    SixByte,
}

impl NumericType {
    /// Resolve a `CP` numeric-type code. Unknown codes yield `None`.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(NumericType::U8),
            2 => Some(NumericType::I8),
            3 => Some(NumericType::U16),
            4 => Some(NumericType::I16),
            5 => Some(NumericType::U32),
            6 => Some(NumericType::I32),
            7 => Some(NumericType::F32),
            8 => Some(NumericType::F64),
            9 => Some(NumericType::U64),
            10 => Some(NumericType::I64),
            13 => Some(NumericType::SixByte),
            _ => None,
        }
    }

    /// The integer code this type is written as in a `CP` block.
    pub fn code(&self) -> u16 {
        match self {
            NumericType::U8 => 1,
            NumericType::I8 => 2,
            NumericType::U16 => 3,
            NumericType::I16 => 4,
            NumericType::U32 => 5,
            NumericType::I32 => 6,
            NumericType::F32 => 7,
            NumericType::F64 => 8,
            NumericType::U64 => 9,
            NumericType::I64 => 10,
            NumericType::SixByte => 13,
        }
    }

    /// Size in bytes of one sample of this type.
    pub fn size(&self) -> usize {
        match self {
            NumericType::U8 | NumericType::I8 => 1,
            NumericType::U16 | NumericType::I16 => 2,
            NumericType::U32 | NumericType::I32 | NumericType::F32 => 4,
            NumericType::U64 | NumericType::I64 | NumericType::F64 => 8,
            NumericType::SixByte => 6,
        }
    }
}

impl fmt::Display for NumericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NumericType::U8 => "u8",
            NumericType::I8 => "i8",
            NumericType::U16 => "u16",
            NumericType::I16 => "i16",
            NumericType::U32 => "u32",
            NumericType::I32 => "i32",
            NumericType::F32 => "f32",
            NumericType::F64 => "f64",
            NumericType::U64 => "u64",
            NumericType::I64 => "i64",
            NumericType::SixByte => "sixbyte",
        };
        write!(f, "{name}")
    }
}

/// A single raw sample value, reinterpreted bit-for-bit from the file.
///
/// Integer widths below 64 bit are widened into the matching 64-bit
/// variant; `SixByte` values land in `UnsignedInteger`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawValue {
    /// Unsigned integer (up to 64 bits, including sixbyte)
    UnsignedInteger(u64),
    /// Signed integer (up to 64 bits)
    SignedInteger(i64),
    /// Floating point value (32 or 64 bit)
    Float(f64),
}

impl RawValue {
    /// Convert to f64 for scaling and display.
    #[inline]
    pub fn as_f64(&self) -> f64 {
        match self {
            RawValue::UnsignedInteger(v) => *v as f64,
            RawValue::SignedInteger(v) => *v as f64,
            RawValue::Float(v) => *v,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::UnsignedInteger(v) => write!(f, "{v}"),
            RawValue::SignedInteger(v) => write!(f, "{v}"),
            RawValue::Float(v) => write!(f, "{v}"),
        }
    }
}

/// Ordinate values of a decoded chunk: either physical-unit doubles or the
/// raw typed values.
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkData {
    /// Values scaled to physical units (`raw * factor + offset`)
    Scaled(Vec<f64>),
    /// Bit-for-bit reinterpretations of the stored samples
    Raw(Vec<RawValue>),
}

impl ChunkData {
    /// Number of samples in this chunk.
    pub fn len(&self) -> usize {
        match self {
            ChunkData::Scaled(v) => v.len(),
            ChunkData::Raw(v) => v.len(),
        }
    }

    /// Whether the chunk holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The scaled values, if this chunk was decoded in scaled mode.
    pub fn as_scaled(&self) -> Option<&[f64]> {
        match self {
            ChunkData::Scaled(v) => Some(v),
            ChunkData::Raw(_) => None,
        }
    }

    /// The raw typed values, if this chunk was decoded in raw mode.
    pub fn as_raw(&self) -> Option<&[RawValue]> {
        match self {
            ChunkData::Raw(v) => Some(v),
            ChunkData::Scaled(_) => None,
        }
    }
}

/// A contiguous sub-range of a channel's samples.
///
/// Produced by `read_chunk`; `x` is populated only when the caller asked
/// for abscissa values.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelChunk {
    /// Ordinate values
    pub y: ChunkData,
    /// Abscissa values (`offset_x + i * dx`), if requested
    pub x: Option<Vec<f64>>,
}

impl ChannelChunk {
    /// Number of samples in this chunk.
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// Whether the chunk holds no samples.
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }
}
