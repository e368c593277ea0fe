#![forbid(unsafe_code)]

//! # imcraw-rs
//!
//! A Rust library for reading IMC raw measurement-data files.
//!
//! The IMC raw format is a binary container used by measurement hardware
//! and acquisition software to record channels: ordered numeric sample
//! sequences with names, units and abscissa/ordinate scaling. A file is a
//! flat sequence of keyed, length-prefixed blocks whose *position* carries
//! meaning — the metadata blocks preceding a channel's name block describe
//! that channel. This crate scans the block sequence, stitches it into
//! channel definitions and decodes sample chunks on demand.
//!
//! ## Features
//!
//! - **100% safe Rust** - `#![forbid(unsafe_code)]`
//! - **Single-pass scan**: blocks are located once; parameters are split
//!   lazily, only for blocks that are actually queried
//! - **Chunked reads**: decode any sub-range of a channel as raw typed
//!   values or as scaled doubles, with optional synthesized abscissa
//! - **Metadata export**: serializable per-channel summaries (optional,
//!   via the `serde`/`serde_json` features)
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `serde` | No | `Serialize`/`Deserialize` derives on metadata types |
//! | `serde_json` | No | JSON save/load for [`ChannelIndex`] |
//!
//! ## Quick Start
//!
//! ```no_run
//! use imcraw_rs::{Raw, Result};
//!
//! fn main() -> Result<()> {
//!     let raw = Raw::open("measurement.raw")?;
//!
//!     for channel in raw.channels() {
//!         println!(
//!             "{} [{}]: {} samples of {}",
//!             channel.name(),
//!             channel.unit_y(),
//!             channel.sample_count(),
//!             channel.numeric_type(),
//!         );
//!
//!         // First hundred samples in physical units, with time axis.
//!         let n = channel.sample_count().min(100);
//!         let chunk = channel.read_chunk(0, n, true, false)?;
//!         if let (Some(y), Some(x)) = (chunk.y.as_scaled(), chunk.x.as_deref()) {
//!             for (xi, yi) in x.iter().zip(y) {
//!                 println!("{xi}\t{yi}");
//!             }
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`blocks`] | Block descriptors, lazy parameters, the byte scanner |
//! | [`parsing`] | Owned parse results and the channel assembler |
//! | [`keys`] | The registry of recognized block kinds |
//! | [`error`] | Error types and the [`Result`] alias |
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T>`], an alias for
//! `core::result::Result<T, Error>`. Parse-time errors abort
//! [`Raw::open`]; query-time errors are local to the failing call.
//! Unknown *non-critical* keys in the stream are not errors: they are
//! reported through the [`log`] facade and skipped.

mod channel;
mod info;
mod raw;
mod types;

pub mod blocks;
pub mod error;
pub mod keys;
pub mod parsing;

// Re-export commonly used types at the crate root
pub use channel::{Channel, ChannelDef, TriggerTime};
pub use error::{Error, Result};
pub use info::{ChannelIndex, ChannelInfo};
pub use keys::{CritClass, Key, KeyRegistry};
pub use raw::Raw;
pub use types::{ChannelChunk, ChunkData, NumericType, RawValue};
