//! Channel definitions and the consumer-facing channel facade.
//!
//! [`ChannelDef`] is the owned result of assembly: derived attributes plus
//! the block associations they came from. [`Channel`] is a cheap borrowed
//! view pairing a definition with the session buffer, which is what makes
//! chunk decoding possible without copying the file.

use core::str::FromStr;

use crate::blocks::Block;
use crate::parsing::assembler::ChannelEnv;
use crate::parsing::decoder;
use crate::types::{ChannelChunk, ChunkData, NumericType};
use crate::{ChannelInfo, Error, Result};

/// Trigger timestamp carried by an `NT` block.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerTime {
    pub day: u32,
    pub month: u32,
    pub year: u32,
    pub hour: u32,
    pub minute: u32,
    /// Seconds, fractional in version 2 of the key
    pub second: f64,
}

/// Assembled definition of one channel.
///
/// All attributes are derived once, at parse time, from fixed parameter
/// slots of the envelope's blocks; afterwards the definition is immutable.
#[derive(Debug, Clone)]
pub struct ChannelDef {
    /// uuid of the channel: the `CN` block's begin offset in decimal
    pub uuid: String,
    /// Channel name (`CN` slot 6)
    pub name: String,
    /// Channel comment (`CN` slot 8), if non-empty
    pub comment: Option<String>,
    /// Ordinate unit (`CR` slot 7)
    pub unit_y: String,
    /// Abscissa unit (`CD` slot 7)
    pub unit_x: String,
    /// Number of samples (`Cb` slot 7)
    pub sample_count: u64,
    /// Raw sample type (`CP` slot 5)
    pub numeric_type: NumericType,
    /// Ordinate scaling factor (`CR` slot 3)
    pub factor_y: f64,
    /// Ordinate scaling offset (`CR` slot 4)
    pub offset_y: f64,
    /// Abscissa increment (`CD` slot 2)
    pub dx: f64,
    /// Abscissa origin (`Cb` slot 11)
    pub offset_x: f64,
    /// Trigger timestamp (`NT`), when present
    pub trigger_time: Option<TriggerTime>,
    /// Absolute offset of the channel's sample bytes in the buffer
    pub data_offset: u64,
    /// Length of the channel's sample bytes
    pub data_length: u64,
    /// The block associations this definition was derived from
    pub env: ChannelEnv,
}

impl ChannelDef {
    /// Derive a channel definition from an assembly window.
    ///
    /// Requires `env.name` and `env.data` to be set (the assembler
    /// guarantees both before calling). `Cb` and `CP` must be reachable
    /// through a component; `CR`, `CD` and `NT` are optional and fall back
    /// to neutral defaults.
    pub(crate) fn derive(buf: &[u8], blocks: &[Block], env: &ChannelEnv) -> Result<ChannelDef> {
        let cn_index = env.name.ok_or_else(|| Error::MissingChannelBlock {
            channel: String::new(),
            kind: "CN",
        })?;
        let cn = &blocks[cn_index];
        let uuid = cn.uuid();

        let name = cn.parameter(buf, 6)?.to_string();
        let comment = cn
            .parameter(buf, 8)
            .ok()
            .map(str::to_string)
            .filter(|c| !c.is_empty());

        // comp1 carries the ordinate; a lone comp2 is tolerated.
        let ordinate = if env.comp1.is_present() {
            &env.comp1
        } else {
            &env.comp2
        };

        let cb_index = ordinate.buffer.ok_or(Error::MissingChannelBlock {
            channel: uuid.clone(),
            kind: "Cb",
        })?;
        let cp_index = ordinate.pack.ok_or(Error::MissingChannelBlock {
            channel: uuid.clone(),
            kind: "CP",
        })?;

        let sample_count: u64 = numeric_param(buf, &blocks[cb_index], 7)?;

        let code: u16 = numeric_param(buf, &blocks[cp_index], 5)?;
        let numeric_type =
            NumericType::from_code(code).ok_or(Error::UnknownNumericType {
                code,
                channel: uuid.clone(),
            })?;

        let (factor_y, offset_y, unit_y) = match ordinate.range {
            Some(cr_index) => {
                let cr = &blocks[cr_index];
                (
                    numeric_param(buf, cr, 3)?,
                    numeric_param(buf, cr, 4)?,
                    cr.parameter(buf, 7)?.to_string(),
                )
            }
            None => (1.0, 0.0, String::new()),
        };

        // Abscissa metadata prefers the second component when one exists.
        let cd_index = env
            .comp2
            .abscissa
            .or(env.comp1.abscissa)
            .or(env.abscissa);
        let (dx, unit_x) = match cd_index {
            Some(index) => {
                let cd = &blocks[index];
                (numeric_param(buf, cd, 2)?, cd.parameter(buf, 7)?.to_string())
            }
            None => (1.0, String::new()),
        };
        let x_cb_index = env.comp2.buffer.unwrap_or(cb_index);
        let offset_x: f64 = numeric_param(buf, &blocks[x_cb_index], 11)?;

        let trigger_time = ordinate
            .trigger
            .or(env.trigger)
            .and_then(|index| read_trigger_time(buf, &blocks[index]).ok());

        let cs_index = env.data.ok_or(Error::MissingChannelBlock {
            channel: uuid.clone(),
            kind: "CS",
        })?;
        let cs = &blocks[cs_index];

        let expected = sample_count.checked_mul(numeric_type.size() as u64);
        if expected != Some(cs.data_length) {
            return Err(Error::SizeMismatch {
                channel: uuid,
                expected: expected.unwrap_or(u64::MAX),
                actual: cs.data_length,
            });
        }

        Ok(ChannelDef {
            uuid,
            name,
            comment,
            unit_y,
            unit_x,
            sample_count,
            numeric_type,
            factor_y,
            offset_y,
            dx,
            offset_x,
            trigger_time,
            data_offset: cs.data_offset,
            data_length: cs.data_length,
            env: env.clone(),
        })
    }
}

fn read_trigger_time(buf: &[u8], nt: &Block) -> Result<TriggerTime> {
    Ok(TriggerTime {
        day: numeric_param(buf, nt, 2)?,
        month: numeric_param(buf, nt, 3)?,
        year: numeric_param(buf, nt, 4)?,
        hour: numeric_param(buf, nt, 5)?,
        minute: numeric_param(buf, nt, 6)?,
        second: numeric_param(buf, nt, 7)?,
    })
}

// Parse a textual parameter as a number; a non-numeric field in a slot
// that must be numeric is a framing defect of the block.
fn numeric_param<T: FromStr>(buf: &[u8], block: &Block, index: usize) -> Result<T> {
    let text = block.parameter(buf, index)?;
    text.trim().parse().map_err(|_| Error::MalformedBlock {
        offset: block.begin,
        reason: format!(
            "parameter {index} of {} is not numeric: {text:?}",
            block.key
        ),
    })
}

/// Borrowed handle for a single channel within a session.
///
/// Pairs the owned [`ChannelDef`] with the session buffer so chunks can be
/// decoded on demand. Holds no decoded samples itself.
#[derive(Debug, Clone, Copy)]
pub struct Channel<'a> {
    def: &'a ChannelDef,
    buffer: &'a [u8],
}

impl<'a> Channel<'a> {
    pub(crate) fn new(def: &'a ChannelDef, buffer: &'a [u8]) -> Self {
        Channel { def, buffer }
    }

    /// The channel's uuid (its `CN` begin offset in decimal).
    pub fn uuid(&self) -> &str {
        &self.def.uuid
    }

    /// The channel name.
    pub fn name(&self) -> &str {
        &self.def.name
    }

    /// The channel comment, if one was recorded.
    pub fn comment(&self) -> Option<&str> {
        self.def.comment.as_deref()
    }

    /// Ordinate unit.
    pub fn unit_y(&self) -> &str {
        &self.def.unit_y
    }

    /// Abscissa unit.
    pub fn unit_x(&self) -> &str {
        &self.def.unit_x
    }

    /// Total number of samples.
    pub fn sample_count(&self) -> u64 {
        self.def.sample_count
    }

    /// Raw sample type.
    pub fn numeric_type(&self) -> NumericType {
        self.def.numeric_type
    }

    /// Ordinate scaling factor.
    pub fn factor_y(&self) -> f64 {
        self.def.factor_y
    }

    /// Ordinate scaling offset.
    pub fn offset_y(&self) -> f64 {
        self.def.offset_y
    }

    /// Abscissa increment.
    pub fn dx(&self) -> f64 {
        self.def.dx
    }

    /// Abscissa origin.
    pub fn offset_x(&self) -> f64 {
        self.def.offset_x
    }

    /// Trigger timestamp, when the envelope carried an `NT` block.
    pub fn trigger_time(&self) -> Option<&TriggerTime> {
        self.def.trigger_time.as_ref()
    }

    /// The underlying definition.
    pub fn def(&self) -> &ChannelDef {
        self.def
    }

    /// Serializable metadata summary of this channel.
    pub fn info(&self) -> ChannelInfo {
        ChannelInfo::from_def(self.def)
    }

    /// Decode `count` samples starting at `start`.
    ///
    /// # Arguments
    /// * `start` - First sample index to decode
    /// * `count` - Number of samples
    /// * `include_x` - Synthesize abscissa values `offset_x + i * dx`
    /// * `raw_mode` - Return bit-for-bit typed values instead of scaled
    ///   doubles
    ///
    /// # Returns
    /// A [`ChannelChunk`], or [`Error::ChunkOutOfRange`] when
    /// `start + count` exceeds the sample count. In scaled mode each value
    /// is `raw * factor_y + offset_y`, with a zero factor treated as 1.0.
    pub fn read_chunk(
        &self,
        start: u64,
        count: u64,
        include_x: bool,
        raw_mode: bool,
    ) -> Result<ChannelChunk> {
        let stop = start.checked_add(count).filter(|s| *s <= self.def.sample_count);
        let stop = match stop {
            Some(stop) => stop,
            None => {
                return Err(Error::ChunkOutOfRange {
                    start,
                    count,
                    sample_count: self.def.sample_count,
                })
            }
        };

        let size = self.def.numeric_type.size() as u64;
        let from = (self.def.data_offset + start * size) as usize;
        let to = (self.def.data_offset + stop * size) as usize;
        let bytes = &self.buffer[from..to];

        let y = if raw_mode {
            ChunkData::Raw(decoder::decode_raw(bytes, self.def.numeric_type))
        } else {
            ChunkData::Scaled(decoder::decode_scaled(
                bytes,
                self.def.numeric_type,
                self.def.factor_y,
                self.def.offset_y,
            ))
        };
        let x = include_x.then(|| {
            (0..count)
                .map(|i| self.def.offset_x + (start + i) as f64 * self.def.dx)
                .collect()
        });

        Ok(ChannelChunk { y, x })
    }
}
