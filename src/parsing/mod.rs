//! File parsing: scanning, channel assembly and sample decoding.

pub mod assembler;
pub mod decoder;

mod raw_file;

pub use assembler::{ChannelEnv, ComponentEnv};
pub use raw_file::RawFile;
