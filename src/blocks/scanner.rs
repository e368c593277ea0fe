use crate::blocks::{Block, BLOCK_SENTINEL, FIELD_SEP};
use crate::keys::{CritClass, Key, KeyRegistry};
use crate::{Error, Result};

/// Sentinel-driven linear scanner producing [`Block`] descriptors in file
/// order.
///
/// The scan walks the buffer byte by byte looking for the block sentinel.
/// A recognized block advances the cursor by the block's declared payload
/// length; an unknown *non-critical* key is warned about and the cursor
/// moves on by a single byte, so the putative body is re-scanned for
/// sentinels. An unknown *critical* key aborts the scan.
///
/// The `complexity` counter records the number of byte-inspection steps,
/// useful to judge how much of the buffer had to be probed.
pub struct BlockScanner<'r> {
    registry: &'r KeyRegistry,
    complexity: u64,
}

impl<'r> BlockScanner<'r> {
    /// A scanner over the given key registry.
    pub fn new(registry: &'r KeyRegistry) -> Self {
        BlockScanner {
            registry,
            complexity: 0,
        }
    }

    /// Number of byte-inspection steps performed so far.
    pub fn complexity(&self) -> u64 {
        self.complexity
    }

    /// Scan `buf` and return all recognized blocks in file order.
    pub fn scan(&mut self, buf: &[u8]) -> Result<Vec<Block>> {
        let n = buf.len();
        let mut blocks = Vec::new();
        let mut i = 0usize;

        while i < n {
            self.complexity += 1;

            if buf[i] != BLOCK_SENTINEL {
                i += 1;
                continue;
            }
            let class = match buf.get(i + 1).copied().and_then(CritClass::from_byte) {
                Some(class) => class,
                None => {
                    i += 1;
                    continue;
                }
            };

            // From here on the bytes claim to be a block header; framing
            // violations are fatal.
            if i + 3 >= n {
                return Err(Error::MalformedBlock {
                    offset: n as u64,
                    reason: "block header truncated".to_string(),
                });
            }
            let name = [buf[i + 1], buf[i + 2]];
            if buf[i + 3] != FIELD_SEP {
                return Err(Error::MalformedBlock {
                    offset: (i + 3) as u64,
                    reason: format!(
                        "expected ',' after key name {}{}",
                        name[0] as char, name[1] as char
                    ),
                });
            }

            let (version_raw, version_sep) = parse_decimal(buf, i + 4)?;
            let version = u16::try_from(version_raw).map_err(|_| Error::MalformedBlock {
                offset: (i + 4) as u64,
                reason: format!("key version {version_raw} out of range"),
            })?;
            let (length, length_sep) = parse_decimal(buf, version_sep + 1)?;
            let body_offset = length_sep + 1;

            let critical = class == CritClass::Critical;
            let entry = match self.registry.lookup(critical, name, version) {
                Some(entry) => entry,
                None if critical => {
                    return Err(Error::UnknownCriticalKey {
                        name: String::from_utf8_lossy(&name).into_owned(),
                        version,
                        offset: i as u64,
                    });
                }
                None => {
                    log::warn!(
                        "unknown non-critical key {}{} (version {}) at byte {}, skipping",
                        name[0] as char,
                        name[1] as char,
                        version,
                        i
                    );
                    // Resume one byte further: the putative body is
                    // re-scanned (reference behavior).
                    i += 1;
                    continue;
                }
            };

            let end = body_offset as u64 + length;
            if end > n as u64 {
                return Err(Error::MalformedBlock {
                    offset: i as u64,
                    reason: format!("payload of {length} bytes extends past end of buffer"),
                });
            }

            let mut block = Block {
                key: Key {
                    critical,
                    name,
                    version,
                },
                begin: i as u64,
                end,
                params_offset: (i + 4) as u64,
                body_offset: body_offset as u64,
                data_offset: end,
                data_length: 0,
                param_count: entry.param_count,
            };
            if entry.carries_data {
                let ranges = block.parameter_ranges(buf)?;
                let data_offset = ranges.last().map_or(body_offset, |r| r.end + 1) as u64;
                block.data_offset = data_offset;
                block.data_length = (end - 1).saturating_sub(data_offset);
            }
            blocks.push(block);

            // Skip the block body. Landing short of `end` means the tail
            // of the payload is re-probed for sentinels, exactly like the
            // reference scan.
            if i + length as usize >= n {
                break;
            }
            i += length as usize;
            i += 1;
        }

        Ok(blocks)
    }
}

// Parse ASCII decimal digits from `start` up to the next field separator.
// Returns the value and the separator's index.
fn parse_decimal(buf: &[u8], start: usize) -> Result<(u64, usize)> {
    let mut pos = start;
    let mut value: u64 = 0;
    let mut any = false;
    while pos < buf.len() {
        let byte = buf[pos];
        if byte == FIELD_SEP {
            if !any {
                return Err(Error::MalformedBlock {
                    offset: start as u64,
                    reason: "empty numeric header field".to_string(),
                });
            }
            return Ok((value, pos));
        }
        if !byte.is_ascii_digit() {
            return Err(Error::MalformedBlock {
                offset: pos as u64,
                reason: format!("non-digit {:?} in numeric header field", byte as char),
            });
        }
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(byte - b'0')))
            .ok_or_else(|| Error::MalformedBlock {
                offset: pos as u64,
                reason: "numeric header field overflows".to_string(),
            })?;
        any = true;
        pos += 1;
    }
    Err(Error::MalformedBlock {
        offset: buf.len() as u64,
        reason: "unterminated numeric header field".to_string(),
    })
}

/// Assert that blocks form a non-overlapping, strictly increasing sequence.
///
/// `windows(2)` naturally guards the empty and single-block cases.
pub fn check_consistency(blocks: &[Block]) -> Result<()> {
    for pair in blocks.windows(2) {
        if pair[0].end > pair[1].begin {
            return Err(Error::InconsistentBlockSequence {
                first: pair[0].describe(),
                second: pair[1].describe(),
            });
        }
    }
    Ok(())
}
