use crate::channel::Channel;
use crate::info::{ChannelIndex, ChannelInfo};
use crate::parsing::RawFile;
use crate::types::{ChannelChunk, NumericType};
use crate::{Error, Result};

/// High level representation of an IMC raw file.
///
/// A `Raw` is a parse session: blocks and channel definitions are
/// constructed once, up front, and live until the session is dropped.
/// Queries hand out borrowed [`Channel`] facades whose lifetime is bound
/// to the session; no sample data is decoded until a chunk is read.
#[derive(Debug)]
pub struct Raw {
    file: RawFile,
}

impl Raw {
    /// Parse an IMC raw file from disk.
    ///
    /// # Arguments
    /// * `path` - Path to the `.raw` file.
    ///
    /// # Returns
    /// A new [`Raw`] session on success or [`crate::Error`] on failure.
    pub fn open(path: &str) -> Result<Self> {
        let file = RawFile::parse_from_file(path)?;
        Ok(Raw { file })
    }

    /// Parse an in-memory capture.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let file = RawFile::parse_from_bytes(data)?;
        Ok(Raw { file })
    }

    /// Access the raw parsed file structure.
    ///
    /// Useful for debugging or advanced use cases.
    pub fn file(&self) -> &RawFile {
        &self.file
    }

    /// All scanned blocks in file order.
    pub fn blocks(&self) -> &[crate::blocks::Block] {
        &self.file.blocks
    }

    /// Number of byte-inspection steps the scan performed.
    pub fn complexity(&self) -> u64 {
        self.file.complexity
    }

    /// Names of all `CN` blocks, in file order.
    ///
    /// This walks the block list, not the channel map, so it also lists
    /// channels that never closed into a definition.
    pub fn list_channels(&self) -> Vec<String> {
        self.file
            .blocks
            .iter()
            .filter(|b| b.key.name == *b"CN")
            .filter_map(|b| b.parameter(&self.file.buffer, 6).ok())
            .map(str::to_string)
            .collect()
    }

    /// Iterate over the assembled channels in uuid-lexicographic order.
    ///
    /// uuids are decimal begin offsets, so lexicographic order differs
    /// from file order once digit counts differ; sort by
    /// [`Channel::uuid`] parsed as a number for file order.
    pub fn channels(&self) -> impl Iterator<Item = Channel<'_>> {
        self.file
            .channels
            .values()
            .map(|def| Channel::new(def, &self.file.buffer))
    }

    /// Look up a channel by uuid.
    pub fn channel(&self, uuid: &str) -> Result<Channel<'_>> {
        self.file
            .channels
            .get(uuid)
            .map(|def| Channel::new(def, &self.file.buffer))
            .ok_or_else(|| Error::ChannelNotFound(uuid.to_string()))
    }

    /// Sample count of the channel with the given uuid.
    pub fn get_channel_length(&self, uuid: &str) -> Result<u64> {
        Ok(self.channel(uuid)?.sample_count())
    }

    /// Numeric type of the channel with the given uuid.
    pub fn get_channel_numeric_type(&self, uuid: &str) -> Result<NumericType> {
        Ok(self.channel(uuid)?.numeric_type())
    }

    /// Decode a chunk of the channel with the given uuid.
    ///
    /// See [`Channel::read_chunk`] for the argument contract.
    pub fn read_channel_chunk(
        &self,
        uuid: &str,
        start: u64,
        count: u64,
        include_x: bool,
        raw_mode: bool,
    ) -> Result<ChannelChunk> {
        self.channel(uuid)?.read_chunk(start, count, include_x, raw_mode)
    }

    /// Metadata summaries of all assembled channels, in uuid-lexicographic
    /// order.
    pub fn channel_infos(&self) -> Vec<ChannelInfo> {
        self.channels().map(|c| c.info()).collect()
    }

    /// Build a serializable index of this session.
    pub fn index(&self) -> ChannelIndex {
        ChannelIndex {
            file_size: self.file.buffer.len() as u64,
            channels: self.channel_infos(),
        }
    }
}
