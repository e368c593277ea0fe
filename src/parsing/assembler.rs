//! The channel assembler: a positional state machine over the block
//! sequence.
//!
//! The meaning of a metadata block depends on where it stands: a `CD`
//! before any `CC` describes the whole file, the same `CD` after a `CC`
//! describes one component of the channel being assembled. The assembler
//! tracks that position in a [`ChannelEnv`] and closes it into a channel
//! definition whenever a terminating block arrives.
//!
//! Ordering is subtle and deliberate:
//! - `CB`, `CG`, `CI`, `CT` close the channel in progress *before* they
//!   are recorded; at the position where they appear they already belong
//!   to the next channel's preamble.
//! - `CS` is recorded *before* the close; it is the terminal marker of the
//!   channel itself.

use std::collections::BTreeMap;

use crate::blocks::Block;
use crate::channel::ChannelDef;
use crate::{Error, Result};

/// Metadata bundle for one component of a channel.
///
/// Fields hold indices into the session's block list; at most one block of
/// each kind is associated with a component.
#[derive(Debug, Clone, Default)]
pub struct ComponentEnv {
    /// `CC` block that opened this component
    pub component: Option<usize>,
    /// Component-scoped `CD` (abscissa description)
    pub abscissa: Option<usize>,
    /// Component-scoped `NT` (trigger timestamp)
    pub trigger: Option<usize>,
    /// `Cb` buffer description
    pub buffer: Option<usize>,
    /// `CP` pack information
    pub pack: Option<usize>,
    /// `CR` value range and scaling
    pub range: Option<usize>,
}

impl ComponentEnv {
    /// Whether a `CC` block opened this component.
    pub fn is_present(&self) -> bool {
        self.component.is_some()
    }
}

/// The assembly window: block associations gathered for the channel
/// currently in progress, plus file-level metadata that survives closes.
#[derive(Debug, Clone, Default)]
pub struct ChannelEnv {
    /// `NO` origin block (file-level, survives channel close)
    pub origin: Option<usize>,
    /// `NL` language block (file-level, survives channel close)
    pub language: Option<usize>,
    /// `CB` group of channels
    pub group: Option<usize>,
    /// `CG` group of components
    pub component_group: Option<usize>,
    /// `CI` single numerical value
    pub single_value: Option<usize>,
    /// `CT` text definition
    pub text: Option<usize>,
    /// `CN` channel name block; its presence marks an open channel
    pub name: Option<usize>,
    /// `CS` raw-data block
    pub data: Option<usize>,
    /// Env-level `CD` (seen outside any component)
    pub abscissa: Option<usize>,
    /// Env-level `NT` (seen outside any component)
    pub trigger: Option<usize>,
    /// First component (ordinate)
    pub comp1: ComponentEnv,
    /// Second component (abscissa)
    pub comp2: ComponentEnv,
}

impl ChannelEnv {
    fn component_mut(&mut self, which: ComponentSlot) -> &mut ComponentEnv {
        match which {
            ComponentSlot::First => &mut self.comp1,
            ComponentSlot::Second => &mut self.comp2,
        }
    }

    // Channel-scoped slots are cleared on close; file-level metadata
    // (origin, language) and the component/abscissa context survive.
    fn reset_channel(&mut self) {
        self.name = None;
        self.group = None;
        self.component_group = None;
        self.single_value = None;
        self.text = None;
        self.data = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComponentSlot {
    First,
    Second,
}

/// Run the state machine over `blocks` and return the assembled channels,
/// keyed by uuid (lexicographic iteration order).
pub fn assemble_channels(buf: &[u8], blocks: &[Block]) -> Result<BTreeMap<String, ChannelDef>> {
    let mut channels = BTreeMap::new();
    let mut env = ChannelEnv::default();
    let mut current: Option<ComponentSlot> = None;

    for (index, block) in blocks.iter().enumerate() {
        match &block.key.name {
            b"NO" => env.origin = Some(index),
            b"NL" => env.language = Some(index),
            b"CB" | b"CG" | b"CI" | b"CT" => {
                // These belong to the next channel's preamble: close first,
                // record after.
                close_channel(buf, blocks, &mut env, &mut current, &mut channels)?;
                match &block.key.name {
                    b"CB" => env.group = Some(index),
                    b"CG" => env.component_group = Some(index),
                    b"CI" => env.single_value = Some(index),
                    _ => env.text = Some(index),
                }
            }
            b"CN" => env.name = Some(index),
            b"CS" => {
                // Terminal marker of the channel itself: record, then close.
                env.data = Some(index);
                close_channel(buf, blocks, &mut env, &mut current, &mut channels)?;
            }
            b"CC" => {
                let found = block.parameter(buf, 2)?;
                let slot = match found.trim() {
                    "1" => ComponentSlot::First,
                    "2" => ComponentSlot::Second,
                    _ => {
                        return Err(Error::InvalidComponentIndex {
                            found: found.to_string(),
                            offset: block.begin,
                        })
                    }
                };
                current = Some(slot);
                env.component_mut(slot).component = Some(index);
            }
            b"CD" => match current {
                Some(slot) => env.component_mut(slot).abscissa = Some(index),
                None => env.abscissa = Some(index),
            },
            b"NT" => match current {
                Some(slot) => env.component_mut(slot).trigger = Some(index),
                None => env.trigger = Some(index),
            },
            b"Cb" | b"CP" | b"CR" => {
                let slot = current.ok_or_else(|| Error::ComponentContextMissing {
                    key: block.key.name_str().to_string(),
                    offset: block.begin,
                })?;
                let component = env.component_mut(slot);
                match &block.key.name {
                    b"Cb" => component.buffer = Some(index),
                    b"CP" => component.pack = Some(index),
                    _ => component.range = Some(index),
                }
            }
            // CF, CK, Ca, NU and friends carry no channel state.
            _ => {}
        }
    }

    Ok(channels)
}

// Close the channel in progress, if any: resolve a missing CS by scanning
// forward (multichannel sharing), derive the definition, reset the window.
fn close_channel(
    buf: &[u8],
    blocks: &[Block],
    env: &mut ChannelEnv,
    current: &mut Option<ComponentSlot>,
    channels: &mut BTreeMap<String, ChannelDef>,
) -> Result<()> {
    let cn_index = match env.name {
        Some(index) => index,
        None => return Ok(()),
    };

    if env.data.is_none() {
        // Channels may share one CS block: take the first one in file
        // order past this channel's CN. Offsets are compared numerically;
        // uuid strings with different digit counts do not sort correctly.
        let cn_begin = blocks[cn_index].begin;
        env.data = blocks
            .iter()
            .position(|b| b.key.name == *b"CS" && b.begin > cn_begin);
        if env.data.is_none() {
            return Err(Error::MissingChannelBlock {
                channel: blocks[cn_index].uuid(),
                kind: "CS",
            });
        }
    }

    let def = ChannelDef::derive(buf, blocks, env)?;
    channels.insert(def.uuid.clone(), def);

    env.reset_channel();
    *current = None;
    Ok(())
}
