use imcraw_rs::{Error, Raw, Result};

// Frame a block: sentinel, key name, version and length fields, payload.
fn frame(name: &str, version: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.push(b'|');
    out.extend_from_slice(name.as_bytes());
    out.push(b',');
    out.extend_from_slice(version.to_string().as_bytes());
    out.push(b',');
    out.extend_from_slice(payload.len().to_string().as_bytes());
    out.push(b',');
    out.extend_from_slice(payload);
    out
}

// A block whose payload is `fields` joined by ',' plus the terminator.
fn block(name: &str, version: u16, fields: &[&str]) -> Vec<u8> {
    let mut payload = fields.join(",").into_bytes();
    payload.push(b';');
    frame(name, version, &payload)
}

// A CS block: one buffer-index field, then the raw sample bytes.
fn cs_block(data: &[u8]) -> Vec<u8> {
    let mut payload = Vec::from(&b"1,"[..]);
    payload.extend_from_slice(data);
    payload.push(b';');
    frame("CS", 1, &payload)
}

#[test]
fn empty_file_yields_empty_block_list() -> Result<()> {
    let raw = Raw::from_bytes(Vec::new())?;
    assert!(raw.blocks().is_empty());
    assert_eq!(raw.list_channels().len(), 0);
    Ok(())
}

#[test]
fn sentinel_without_key_class_is_not_a_block() -> Result<()> {
    let raw = Raw::from_bytes(vec![0x7C, 0x00])?;
    assert!(raw.blocks().is_empty());
    assert_eq!(raw.complexity(), 2);
    Ok(())
}

#[test]
fn single_block_is_located() -> Result<()> {
    let raw = Raw::from_bytes(block("CK", 1, &["0", "1"]))?;
    assert_eq!(raw.blocks().len(), 1);
    let b = &raw.blocks()[0];
    assert_eq!(b.key.name_str(), "CK");
    assert_eq!(b.key.version, 1);
    assert!(b.key.critical);
    assert_eq!(b.begin, 0);
    assert_eq!(b.end, 12);
    assert_eq!(b.uuid(), "0");
    Ok(())
}

#[test]
fn leading_garbage_is_skipped() -> Result<()> {
    let mut capture = Vec::from(&b"garbage bytes"[..]);
    let begin = capture.len() as u64;
    capture.extend_from_slice(&block("CK", 1, &["0", "1"]));
    let raw = Raw::from_bytes(capture)?;
    assert_eq!(raw.blocks().len(), 1);
    assert_eq!(raw.blocks()[0].begin, begin);
    Ok(())
}

#[test]
fn trailing_garbage_without_sentinel_is_ignored() -> Result<()> {
    let mut capture = block("CK", 1, &["0", "1"]);
    capture.extend_from_slice(b"    trailing junk    ");
    let raw = Raw::from_bytes(capture)?;
    assert_eq!(raw.blocks().len(), 1);
    Ok(())
}

#[test]
fn parameters_are_addressed_by_slot() -> Result<()> {
    let raw = Raw::from_bytes(block("CN", 1, &["1", "0", "0", "4", "Temp", "7", "ambient"]))?;
    let buf = &raw.file().buffer;
    let cn = &raw.blocks()[0];
    assert_eq!(cn.parameter(buf, 0)?, "1"); // version field
    assert_eq!(cn.parameter(buf, 2)?, "1"); // group index
    assert_eq!(cn.parameter(buf, 6)?, "Temp");
    assert_eq!(cn.parameter(buf, 8)?, "ambient");
    Ok(())
}

#[test]
fn parameter_index_beyond_registered_count_fails() -> Result<()> {
    let raw = Raw::from_bytes(block("CK", 1, &["0", "1"]))?;
    let buf = &raw.file().buffer;
    match raw.blocks()[0].parameter(buf, 4) {
        Err(Error::ParameterIndexOutOfRange { index: 4, .. }) => Ok(()),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn parameter_index_beyond_payload_fails() -> Result<()> {
    // CN registers 9 parameters but this payload stops after 5.
    let raw = Raw::from_bytes(block("CN", 1, &["1", "0", "0"]))?;
    let buf = &raw.file().buffer;
    match raw.blocks()[0].parameter(buf, 6) {
        Err(Error::ParameterIndexOutOfRange { index: 6, available, .. }) => {
            assert!(available < 7);
            Ok(())
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn cs_block_frames_its_binary_payload() -> Result<()> {
    let data = [0x01, 0x00, 0x02, 0x00, 0xFF, 0xFF, 0xFE, 0xFF];
    let raw = Raw::from_bytes(cs_block(&data))?;
    let cs = &raw.blocks()[0];
    assert_eq!(cs.data_length, data.len() as u64);
    assert_eq!(cs.data(&raw.file().buffer), &data);
    Ok(())
}

#[test]
fn unknown_noncritical_key_is_skipped_with_resume() -> Result<()> {
    let mut capture = block("NZ", 1, &["0", "1"]);
    let second = capture.len() as u64;
    capture.extend_from_slice(&block("CK", 1, &["0", "1"]));
    let raw = Raw::from_bytes(capture)?;
    // NZ is not emitted; the scan resumed and found the CK block.
    assert_eq!(raw.blocks().len(), 1);
    assert_eq!(raw.blocks()[0].begin, second);
    Ok(())
}

#[test]
fn unknown_critical_key_aborts() {
    match Raw::from_bytes(block("CX", 1, &["0", "1"])) {
        Err(Error::UnknownCriticalKey { name, version: 1, offset: 0 }) => {
            assert_eq!(name, "CX");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn registered_name_with_too_low_version_is_unknown() {
    // CF exists only at version 2; version 1 has no fallback target.
    match Raw::from_bytes(block("CF", 1, &["1"])) {
        Err(Error::UnknownCriticalKey { name, .. }) => assert_eq!(name, "CF"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn version_above_registered_falls_back() -> Result<()> {
    // CD is registered at versions 1 and 2; version 3 resolves to the
    // version-2 entry and its parameter count.
    let raw = Raw::from_bytes(block(
        "CD",
        3,
        &["0.01", "1", "0", "0", "1", "s", "0", "0", "0"],
    ))?;
    let cd = &raw.blocks()[0];
    assert_eq!(cd.key.version, 3);
    assert_eq!(cd.param_count, 11);
    Ok(())
}

#[test]
fn missing_separator_after_key_name_is_malformed() {
    match Raw::from_bytes(b"|CN;1,4,ab;".to_vec()) {
        Err(Error::MalformedBlock { offset: 3, .. }) => {}
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn non_digit_version_is_malformed() {
    match Raw::from_bytes(b"|CN,x,4,ab;".to_vec()) {
        Err(Error::MalformedBlock { .. }) => {}
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn truncated_header_is_malformed() {
    match Raw::from_bytes(b"|CN,1".to_vec()) {
        Err(Error::MalformedBlock { .. }) => {}
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn payload_past_end_of_buffer_is_malformed() {
    // Declared length 99 but the buffer ends long before that.
    match Raw::from_bytes(b"|CK,1,99,0,1;".to_vec()) {
        Err(Error::MalformedBlock { .. }) => {}
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn overlapping_blocks_are_inconsistent() {
    // First CK declares 5 payload bytes but only carries 4, so its end
    // reaches into the block that follows.
    let mut capture = Vec::new();
    capture.extend_from_slice(b"|CK,1,5,0,1;");
    capture.extend_from_slice(b"|CK,1,4,0,1;");
    match Raw::from_bytes(capture) {
        Err(Error::InconsistentBlockSequence { .. }) => {}
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn complexity_counts_inspection_steps() -> Result<()> {
    let capture = block("CK", 1, &["0", "1"]);
    let raw = Raw::from_bytes(capture)?;
    // The cursor skips most of the block body, so far fewer steps than
    // bytes-times-anything; it is still at least one step per unskipped byte.
    assert!(raw.complexity() >= 1);
    assert!(raw.complexity() < 2 * raw.file().buffer.len() as u64 + 2);
    Ok(())
}
