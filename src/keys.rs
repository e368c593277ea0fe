//! The key registry: the static table of recognized block kinds.
//!
//! Every block in an IMC raw file is introduced by a two-character key
//! name whose first character doubles as the criticality class: names
//! starting with `C` are critical (unknown ones abort parsing), names
//! starting with `N` are non-critical (unknown ones are warned about and
//! skipped). Each registered `(name, version)` pair fixes how many textual
//! parameters the block's payload carries, which is what makes lazy
//! parameter addressing possible.

use core::fmt;

/// Criticality byte of critical keys (first character of the name).
pub const KEY_CRITICAL: u8 = b'C';
/// Criticality byte of non-critical keys.
pub const KEY_NON_CRITICAL: u8 = b'N';

/// Criticality class of a key, derived from the first byte of its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CritClass {
    /// Keys whose absence from the registry aborts parsing.
    Critical,
    /// Keys that may be skipped with a warning when unrecognized.
    NonCritical,
}

impl CritClass {
    /// Classify a byte as one of the two sentinel classes, if it is one.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            KEY_CRITICAL => Some(CritClass::Critical),
            KEY_NON_CRITICAL => Some(CritClass::NonCritical),
            _ => None,
        }
    }
}

/// Identifier of a block kind: criticality, two-character name, version.
///
/// Equality is by all three fields. The name's first byte is the
/// criticality class byte, so `critical` is redundant with `name[0]` for
/// well-formed keys; it is kept explicit because lookups are specified
/// over the full triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    /// Whether this key belongs to the critical class
    pub critical: bool,
    /// Two-character key name, e.g. `CN`
    pub name: [u8; 2],
    /// Key version as found in the block header
    pub version: u16,
}

impl Key {
    /// The key name as a string slice.
    pub fn name_str(&self) -> &str {
        core::str::from_utf8(&self.name).unwrap_or("??")
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.name_str(), self.version)
    }
}

/// Registry entry for one `(name, version)` pair.
#[derive(Debug, Clone, Copy)]
pub struct KeyEntry {
    /// Two-character key name
    pub name: [u8; 2],
    /// Version this entry describes
    pub version: u16,
    /// Short description of the block kind
    pub description: &'static str,
    /// Number of textual parameters in the payload, counting the version
    /// and length fields as parameters 0 and 1
    pub param_count: usize,
    /// Whether the payload embeds binary sample data after the parameters
    pub carries_data: bool,
}

impl KeyEntry {
    const fn new(
        name: &'static [u8; 2],
        version: u16,
        description: &'static str,
        param_count: usize,
    ) -> Self {
        KeyEntry {
            name: *name,
            version,
            description,
            param_count,
            carries_data: false,
        }
    }

    const fn with_data(
        name: &'static [u8; 2],
        version: u16,
        description: &'static str,
        param_count: usize,
    ) -> Self {
        KeyEntry {
            name: *name,
            version,
            description,
            param_count,
            carries_data: true,
        }
    }
}

// The recognized block kinds. Entries for the same name must be ordered by
// ascending version for the fallback lookup.
const ENTRIES: &[KeyEntry] = &[
    KeyEntry::new(b"CF", 2, "format version and processor", 3),
    KeyEntry::new(b"CK", 1, "start of group of keys", 4),
    KeyEntry::new(b"CB", 1, "group of channels", 7),
    KeyEntry::new(b"CT", 1, "text definition", 9),
    KeyEntry::new(b"CG", 1, "group of components", 5),
    KeyEntry::new(b"CI", 1, "single numerical value", 11),
    KeyEntry::new(b"CD", 1, "abscissa description", 8),
    KeyEntry::new(b"CD", 2, "abscissa description", 11),
    KeyEntry::new(b"CC", 1, "start of component", 4),
    KeyEntry::new(b"CP", 1, "pack information of component", 10),
    KeyEntry::new(b"Cb", 1, "buffer description", 13),
    KeyEntry::new(b"CR", 1, "value range and scaling of component", 8),
    KeyEntry::new(b"CN", 1, "name and comment of channel", 9),
    KeyEntry::with_data(b"CS", 1, "raw sample data", 3),
    KeyEntry::new(b"Ca", 1, "add-reference key", 3),
    KeyEntry::new(b"NO", 1, "origin of data", 7),
    KeyEntry::new(b"NL", 1, "language info and code page", 4),
    KeyEntry::new(b"NT", 1, "timestamp of trigger", 8),
    KeyEntry::new(b"NT", 2, "timestamp of trigger", 8),
    KeyEntry::new(b"NU", 1, "user-defined key", 3),
];

/// Immutable table of recognized block kinds.
///
/// Constructed once per session and passed by reference to the scanner.
#[derive(Debug, Clone, Copy)]
pub struct KeyRegistry {
    entries: &'static [KeyEntry],
}

impl KeyRegistry {
    /// The registry over the built-in key table.
    pub const fn new() -> Self {
        KeyRegistry { entries: ENTRIES }
    }

    /// Look up the entry for `(critical, name, version)`.
    ///
    /// If no entry for the exact version exists, the highest registered
    /// version `<= version` with the same name is returned. Returns `None`
    /// when the name is unregistered, no registered version is low enough,
    /// or `critical` contradicts the name's class byte.
    pub fn lookup(&self, critical: bool, name: [u8; 2], version: u16) -> Option<&KeyEntry> {
        if critical != (name[0] == KEY_CRITICAL) {
            return None;
        }
        self.entries
            .iter()
            .filter(|e| e.name == name && e.version <= version)
            .max_by_key(|e| e.version)
    }

    /// Whether any version of `name` is registered at all.
    pub fn knows_name(&self, name: [u8; 2]) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }
}

impl Default for KeyRegistry {
    fn default() -> Self {
        KeyRegistry::new()
    }
}
