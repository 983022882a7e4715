use bson_pack_buffers::{BufferError, Reader, Writer};

#[test]
fn writer_reader_roundtrip_matrix() {
    let mut writer = Writer::new(4 + 8 + 8 + 1 + 4);
    writer.i32(-123);
    writer.i64(9_007_199_254_740_993);
    writer.f64(5.05);
    writer.u8(0x7f);
    writer.u32(0xdead_beef);
    let data = writer.flush();

    let mut reader = Reader::new(&data);
    assert_eq!(reader.i32().unwrap(), -123);
    assert_eq!(reader.i64().unwrap(), 9_007_199_254_740_993);
    assert_eq!(reader.f64().unwrap(), 5.05);
    assert_eq!(reader.u8().unwrap(), 0x7f);
    assert_eq!(reader.u32().unwrap(), 0xdead_beef);
    assert_eq!(reader.size(), 0);
}

#[test]
fn string_framing_matrix() {
    for s in ["", "a", "hello", "yes! - \u{1f44d}"] {
        let byte_len = s.len();
        let mut writer = Writer::new(4 + byte_len + 1);
        writer.string(s);
        let data = writer.flush();

        let declared = i32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        assert_eq!(declared as usize, byte_len + 1);
        assert_eq!(*data.last().unwrap(), 0x00);

        let mut reader = Reader::new(&data);
        assert_eq!(reader.string().unwrap(), s);
    }
}

#[test]
fn cstr_roundtrip() {
    let mut writer = Writer::new(6);
    writer.cstr("hello");
    let data = writer.flush();
    let mut reader = Reader::new(&data);
    assert_eq!(reader.cstr().unwrap(), "hello");
    assert_eq!(reader.offset(), 6);
}

#[test]
fn object_id_roundtrip() {
    let id = [1u8, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
    let mut writer = Writer::new(12);
    writer.buf(&id);
    let data = writer.flush();
    let mut reader = Reader::new(&data);
    assert_eq!(reader.object_id().unwrap(), id);
}

#[test]
fn reader_error_matrix() {
    // Truncated primitives.
    assert_eq!(Reader::new(&[0x1b]).i32(), Err(BufferError::EndOfBuffer));
    assert_eq!(Reader::new(&[0; 7]).i64(), Err(BufferError::EndOfBuffer));
    assert_eq!(Reader::new(&[0; 7]).f64(), Err(BufferError::EndOfBuffer));
    assert_eq!(Reader::new(&[]).u8(), Err(BufferError::EndOfBuffer));
    assert_eq!(
        Reader::new(&[0; 11]).object_id(),
        Err(BufferError::EndOfBuffer)
    );

    // String with a declared length of zero.
    assert_eq!(
        Reader::new(b"\x00\x00\x00\x00").string(),
        Err(BufferError::InvalidLength)
    );

    // String whose terminator byte is not NUL.
    assert_eq!(
        Reader::new(b"\x02\x00\x00\x00a\x01").string(),
        Err(BufferError::MissingTerminator)
    );

    // String payload that is not UTF-8.
    assert_eq!(
        Reader::new(b"\x02\x00\x00\x00\xff\x00").string(),
        Err(BufferError::InvalidUtf8)
    );

    // cstring running off the end of the buffer.
    assert_eq!(Reader::new(b"abc").cstr(), Err(BufferError::EndOfBuffer));
}
