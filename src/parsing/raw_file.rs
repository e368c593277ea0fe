use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;

use crate::blocks::{check_consistency, Block, BlockScanner};
use crate::channel::ChannelDef;
use crate::keys::KeyRegistry;
use crate::parsing::assembler::assemble_channels;
use crate::Result;

/// Fully parsed raw file.
///
/// Owns the byte buffer together with everything derived from it — the
/// scanned block list and the assembled channel definitions — so borrowed
/// views handed out by the session can never outlive their backing bytes.
/// Nothing is mutated after construction.
#[derive(Debug)]
pub struct RawFile {
    /// Complete file contents
    pub buffer: Vec<u8>,
    /// Scanned blocks in file order
    pub blocks: Vec<Block>,
    /// Assembled channels keyed by uuid
    pub channels: BTreeMap<String, ChannelDef>,
    /// Byte-inspection steps spent scanning
    pub complexity: u64,
}

impl RawFile {
    /// Parse a raw file from disk.
    ///
    /// # Arguments
    /// * `path` - Path to the `.raw` file.
    ///
    /// # Returns
    /// A [`RawFile`] containing all blocks and channels, or an error if
    /// the file could not be read or decoded.
    pub fn parse_from_file(path: &str) -> Result<Self> {
        let mut file = File::open(path)?;
        let file_size = file.metadata()?.len() as usize;

        let mut data = Vec::with_capacity(file_size);
        file.read_to_end(&mut data)?;

        Self::parse_from_bytes(data)
    }

    /// Parse a raw file from an in-memory capture.
    ///
    /// # Arguments
    /// * `data` - Complete file contents.
    ///
    /// # Returns
    /// A [`RawFile`] containing all blocks and channels, or an error if
    /// the data could not be decoded.
    pub fn parse_from_bytes(data: Vec<u8>) -> Result<Self> {
        let registry = KeyRegistry::new();
        let mut scanner = BlockScanner::new(&registry);

        let blocks = scanner.scan(&data)?;
        check_consistency(&blocks)?;
        let channels = assemble_channels(&data, &blocks)?;

        Ok(RawFile {
            complexity: scanner.complexity(),
            buffer: data,
            blocks,
            channels,
        })
    }
}
