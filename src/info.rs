//! Serializable channel metadata.
//!
//! [`ChannelInfo`] is a flat, owned summary of one channel — everything a
//! consumer needs to decide what to read, without touching sample data.
//! [`ChannelIndex`] collects the summaries of a whole session and, with
//! the `serde_json` feature, can be cached on disk and reloaded without
//! re-parsing the raw file.
//!
//! # Feature Flags
//!
//! - `serde`: derives `Serialize`/`Deserialize` for the types here
//! - `serde_json`: enables the JSON file save/load methods

use crate::channel::{ChannelDef, TriggerTime};
use crate::types::NumericType;

#[cfg(feature = "serde_json")]
use crate::{Error, Result};

/// Metadata summary of a single channel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelInfo {
    /// Within-file channel identifier
    pub uuid: String,
    /// Channel name
    pub name: String,
    /// Channel comment, if any
    pub comment: Option<String>,
    /// Ordinate unit
    pub unit_y: String,
    /// Abscissa unit
    pub unit_x: String,
    /// Number of samples
    pub sample_count: u64,
    /// Raw sample type
    pub numeric_type: NumericType,
    /// Ordinate scaling factor
    pub factor_y: f64,
    /// Ordinate scaling offset
    pub offset_y: f64,
    /// Abscissa increment
    pub dx: f64,
    /// Abscissa origin
    pub offset_x: f64,
    /// Trigger timestamp, when present
    pub trigger_time: Option<TriggerTime>,
}

impl ChannelInfo {
    pub(crate) fn from_def(def: &ChannelDef) -> Self {
        ChannelInfo {
            uuid: def.uuid.clone(),
            name: def.name.clone(),
            comment: def.comment.clone(),
            unit_y: def.unit_y.clone(),
            unit_x: def.unit_x.clone(),
            sample_count: def.sample_count,
            numeric_type: def.numeric_type,
            factor_y: def.factor_y,
            offset_y: def.offset_y,
            dx: def.dx,
            offset_x: def.offset_x,
            trigger_time: def.trigger_time.clone(),
        }
    }
}

/// Channel metadata for a whole session.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelIndex {
    /// Size of the raw file in bytes (for validation against the source)
    pub file_size: u64,
    /// One entry per assembled channel, in uuid-lexicographic order
    pub channels: Vec<ChannelInfo>,
}

impl ChannelIndex {
    /// Serialize the index to a pretty-printed JSON file.
    ///
    /// Requires the `serde_json` feature.
    #[cfg(feature = "serde_json")]
    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::IndexSerializationError(e.to_string()))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load an index previously written by [`ChannelIndex::save_to_file`].
    ///
    /// Requires the `serde_json` feature.
    #[cfg(feature = "serde_json")]
    pub fn load_from_file(path: &str) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| Error::IndexSerializationError(e.to_string()))
    }
}
