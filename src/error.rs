//! Error types for IMC raw-file operations.
//!
//! This module defines the [`Error`] enum which represents all possible
//! failures that can occur when scanning blocks, assembling channels, or
//! decoding sample data.
//!
//! Parse-time errors abort the whole session; query-time errors (unknown
//! uuid, chunk out of range) are local to the failing call. The only
//! condition that is deliberately *not* an error is an unknown non-critical
//! key in the byte stream, which is reported through the [`log`] facade and
//! skipped.

use core::fmt;

/// Errors that can occur while reading an IMC raw file.
#[derive(Debug)]
pub enum Error {
    /// An I/O error occurred while acquiring the file buffer.
    IoError(std::io::Error),

    /// A block header violates the framing syntax (missing separator,
    /// non-digit version or length field, header or payload truncated).
    MalformedBlock {
        /// Byte offset at which the violation was detected
        offset: u64,
        /// Human-readable description of the violation
        reason: String,
    },

    /// A critical key (name starting with `C`) is not in the registry.
    ///
    /// Unknown critical keys are fatal: their payload layout is unknown and
    /// the data they describe cannot be interpreted safely.
    UnknownCriticalKey {
        /// The two-character key name that was found
        name: String,
        /// The key version
        version: u16,
        /// Byte offset of the block-start sentinel
        offset: u64,
    },

    /// Two subsequent blocks overlap in the byte stream.
    InconsistentBlockSequence {
        /// Diagnostic description of the earlier block
        first: String,
        /// Diagnostic description of the later block
        second: String,
    },

    /// A `CC` block carries a component index outside `{1, 2}`.
    InvalidComponentIndex {
        /// The component-index parameter as found in the block
        found: String,
        /// Byte offset of the `CC` block
        offset: u64,
    },

    /// A component-scoped block (`Cb`, `CP`, `CR`) appeared before any `CC`
    /// block opened a component.
    ComponentContextMissing {
        /// The key name of the offending block
        key: String,
        /// Byte offset of the offending block
        offset: u64,
    },

    /// A channel required a block kind that its envelope does not contain.
    MissingChannelBlock {
        /// uuid of the channel (its `CN` begin offset in decimal)
        channel: String,
        /// The missing block kind
        kind: &'static str,
    },

    /// The numeric-type code in a `CP` block is not a recognized type.
    UnknownNumericType {
        /// The code as found in the block
        code: u16,
        /// uuid of the channel being assembled
        channel: String,
    },

    /// No channel with the given uuid exists in this session.
    ChannelNotFound(String),

    /// A chunk request exceeds the channel's sample count.
    ChunkOutOfRange {
        /// Requested start sample
        start: u64,
        /// Requested sample count
        count: u64,
        /// Total samples available in the channel
        sample_count: u64,
    },

    /// A block's payload does not contain enough textual parameters.
    ParameterIndexOutOfRange {
        /// The requested 0-based parameter index
        index: usize,
        /// Number of parameters actually present
        available: usize,
        /// Byte offset of the block
        offset: u64,
    },

    /// The declared sample count does not match the `CS` payload size.
    SizeMismatch {
        /// uuid of the channel
        channel: String,
        /// `sample_count * sizeof(numeric_type)`
        expected: u64,
        /// Actual `CS` data length in bytes
        actual: u64,
    },

    /// Serializing or deserializing a channel index failed.
    IndexSerializationError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "I/O error: {e}"),
            Error::MalformedBlock { offset, reason } => {
                write!(f, "malformed block at byte {offset}: {reason}")
            }
            Error::UnknownCriticalKey {
                name,
                version,
                offset,
            } => write!(
                f,
                "unknown critical key {name} (version {version}) at byte {offset}"
            ),
            Error::InconsistentBlockSequence { first, second } => {
                write!(
                    f,
                    "inconsistent subsequent blocks: {first} overlaps {second}"
                )
            }
            Error::InvalidComponentIndex { found, offset } => {
                write!(
                    f,
                    "invalid component index {found:?} at byte {offset}: expected 1 or 2"
                )
            }
            Error::ComponentContextMissing { key, offset } => {
                write!(
                    f,
                    "{key} block at byte {offset} appeared before any CC component"
                )
            }
            Error::MissingChannelBlock { channel, kind } => {
                write!(f, "channel {channel} has no {kind} block in its envelope")
            }
            Error::UnknownNumericType { code, channel } => {
                write!(
                    f,
                    "channel {channel} declares unknown numeric type code {code}"
                )
            }
            Error::ChannelNotFound(uuid) => write!(f, "no channel with uuid {uuid}"),
            Error::ChunkOutOfRange {
                start,
                count,
                sample_count,
            } => write!(
                f,
                "chunk [{start}, {start}+{count}) exceeds sample count {sample_count}"
            ),
            Error::ParameterIndexOutOfRange {
                index,
                available,
                offset,
            } => write!(
                f,
                "parameter index {index} out of range: block at byte {offset} has {available} parameters"
            ),
            Error::SizeMismatch {
                channel,
                expected,
                actual,
            } => write!(
                f,
                "channel {channel}: sample count implies {expected} data bytes, CS block carries {actual}"
            ),
            Error::IndexSerializationError(s) => write!(f, "index serialization error: {s}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

/// A specialized Result type for IMC raw-file operations.
pub type Result<T> = core::result::Result<T, Error>;
