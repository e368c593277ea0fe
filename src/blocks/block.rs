use core::ops::Range;

use crate::blocks::FIELD_SEP;
use crate::keys::Key;
use crate::{Error, Result};

/// A keyed, length-prefixed record located in the byte buffer.
///
/// A `Block` is a pure descriptor: it stores offsets into the session
/// buffer, never payload copies. Textual parameters are addressed lazily
/// through [`Block::parameter`], so blocks that are never queried cost
/// nothing beyond the descriptor itself.
///
/// Offsets, all absolute within the buffer:
/// - `begin` points at the sentinel byte, `end` one past the last payload
///   byte (the byte at `end - 1` is the payload terminator).
/// - `params_offset` is the first byte of the version digits; the
///   parameter walk starts there, so parameter 0 is the version field and
///   parameter 1 the length field.
/// - `body_offset` is the first byte after the length field's separator.
/// - For data-bearing blocks (`CS`), `data_offset`/`data_length` frame the
///   embedded binary sample payload.
#[derive(Debug, Clone)]
pub struct Block {
    /// Key of this block
    pub key: Key,
    /// Offset of the block-start sentinel
    pub begin: u64,
    /// One past the last payload byte
    pub end: u64,
    /// Offset of the first textual parameter (the version field)
    pub params_offset: u64,
    /// First byte after the length field's separator
    pub body_offset: u64,
    /// Start of the embedded binary payload; `end` for blocks without one
    pub data_offset: u64,
    /// Length of the embedded binary payload in bytes
    pub data_length: u64,
    /// Number of registered textual parameters for this key
    pub param_count: usize,
}

impl Block {
    /// Within-file identifier: the begin offset rendered in decimal.
    pub fn uuid(&self) -> String {
        self.begin.to_string()
    }

    /// One-line diagnostic description used in error messages.
    pub fn describe(&self) -> String {
        format!("{} block [{}, {})", self.key, self.begin, self.end)
    }

    // Last byte index (exclusive) the parameter walk may touch: the
    // payload terminator at `end - 1` is never part of a field.
    fn field_stop(&self, buf: &[u8]) -> usize {
        usize::min((self.end as usize).saturating_sub(1), buf.len())
    }

    /// Byte range of the parameter at `index`.
    ///
    /// Walks the payload counting separators; fails with
    /// [`Error::ParameterIndexOutOfRange`] when the payload runs out of
    /// fields or `index` exceeds the registered parameter count.
    pub fn parameter_range(&self, buf: &[u8], index: usize) -> Result<Range<usize>> {
        if index >= self.param_count {
            return Err(Error::ParameterIndexOutOfRange {
                index,
                available: self.param_count,
                offset: self.begin,
            });
        }
        let stop = self.field_stop(buf);
        let mut pos = self.params_offset as usize;
        let mut current = 0;
        loop {
            let mut field_end = pos.min(stop);
            while field_end < stop && buf[field_end] != FIELD_SEP {
                field_end += 1;
            }
            if current == index {
                return Ok(pos.min(stop)..field_end);
            }
            if field_end >= stop {
                return Err(Error::ParameterIndexOutOfRange {
                    index,
                    available: current + 1,
                    offset: self.begin,
                });
            }
            pos = field_end + 1;
            current += 1;
        }
    }

    /// Byte ranges of all registered parameters, in order.
    ///
    /// The embedded binary payload of a data-bearing block starts one byte
    /// past the end of the last returned range.
    pub fn parameter_ranges(&self, buf: &[u8]) -> Result<Vec<Range<usize>>> {
        let stop = self.field_stop(buf);
        let mut ranges = Vec::with_capacity(self.param_count);
        let mut pos = self.params_offset as usize;
        for index in 0..self.param_count {
            let mut field_end = pos.min(stop);
            while field_end < stop && buf[field_end] != FIELD_SEP {
                field_end += 1;
            }
            ranges.push(pos.min(stop)..field_end);
            if field_end >= stop && index + 1 < self.param_count {
                return Err(Error::ParameterIndexOutOfRange {
                    index: index + 1,
                    available: index + 1,
                    offset: self.begin,
                });
            }
            pos = field_end + 1;
        }
        Ok(ranges)
    }

    /// Raw bytes of the parameter at `index`.
    pub fn parameter_bytes<'a>(&self, buf: &'a [u8], index: usize) -> Result<&'a [u8]> {
        let range = self.parameter_range(buf, index)?;
        Ok(&buf[range])
    }

    /// The parameter at `index` as a string slice.
    pub fn parameter<'a>(&self, buf: &'a [u8], index: usize) -> Result<&'a str> {
        let range = self.parameter_range(buf, index)?;
        core::str::from_utf8(&buf[range.clone()]).map_err(|_| Error::MalformedBlock {
            offset: range.start as u64,
            reason: format!("parameter {index} of {} is not valid UTF-8", self.key),
        })
    }

    /// The embedded binary payload of a data-bearing block.
    pub fn data<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        let start = (self.data_offset as usize).min(buf.len());
        let end = ((self.data_offset + self.data_length) as usize).min(buf.len());
        &buf[start..end]
    }
}
