//! Binary wire encoding.
//!
//! Integers use the zero-compressed signed varint layout of Hadoop's
//! `WritableUtils.writeVLong`: values in `-112..=127` take a single byte,
//! larger magnitudes take a marker byte followed by 1-8 big-endian bytes.
//! Strings are a varint byte length followed by UTF-8 bytes.
//!
//! Frames wrap one encoded record in a varint length prefix so several
//! records can be concatenated on a pipe.

use bytes::{Buf, BufMut, Bytes};
use rf_error::CodecError;

/// Write a signed varint.
pub fn write_vlong<B: BufMut>(buf: &mut B, value: i64) {
    if (-112..=127).contains(&value) {
        buf.put_i8(value as i8);
        return;
    }

    let (magnitude, mut marker) = if value < 0 {
        (!value, -120i64)
    } else {
        (value, -112i64)
    };

    let mut tmp = magnitude;
    while tmp != 0 {
        tmp >>= 8;
        marker -= 1;
    }
    buf.put_i8(marker as i8);

    let len = if marker < -120 {
        -(marker + 120)
    } else {
        -(marker + 112)
    };

    for idx in (1..=len).rev() {
        let shift = (idx - 1) * 8;
        buf.put_u8(((magnitude >> shift) & 0xFF) as u8);
    }
}

/// Read a signed varint written by [`write_vlong`].
pub fn read_vlong<B: Buf>(buf: &mut B, field: &'static str) -> Result<i64, CodecError> {
    if !buf.has_remaining() {
        return Err(CodecError::UnexpectedEof(field));
    }

    let first = buf.get_i8();
    let size = vlong_size(first);
    if size == 1 {
        return Ok(first as i64);
    }

    if buf.remaining() < size - 1 {
        return Err(CodecError::UnexpectedEof(field));
    }

    let mut value: i64 = 0;
    for _ in 0..size - 1 {
        value = (value << 8) | buf.get_u8() as i64;
    }

    if is_negative_vlong(first) {
        Ok(!value)
    } else {
        Ok(value)
    }
}

/// Total encoded size (marker included) implied by the first byte.
fn vlong_size(first: i8) -> usize {
    let first = first as i32;
    if first >= -112 {
        1
    } else if first < -120 {
        (-119 - first) as usize
    } else {
        (-111 - first) as usize
    }
}

fn is_negative_vlong(first: i8) -> bool {
    first < -120 || (-112..0).contains(&first)
}

/// Read a varint that must fit in a `u32`.
pub fn read_vu32<B: Buf>(buf: &mut B, field: &'static str) -> Result<u32, CodecError> {
    let value = read_vlong(buf, field)?;
    u32::try_from(value).map_err(|_| CodecError::VarintOutOfRange { field, value })
}

/// Write a length-prefixed UTF-8 string.
pub fn write_string<B: BufMut>(buf: &mut B, value: &str) {
    write_vlong(buf, value.len() as i64);
    buf.put_slice(value.as_bytes());
}

/// Read a length-prefixed UTF-8 string.
pub fn read_string<B: Buf>(buf: &mut B, field: &'static str) -> Result<String, CodecError> {
    let len = read_vlong(buf, field)?;
    let len = usize::try_from(len).map_err(|_| CodecError::VarintOutOfRange { field, value: len })?;

    if buf.remaining() < len {
        return Err(CodecError::UnexpectedEof(field));
    }

    let mut bytes = vec![0u8; len];
    buf.copy_to_slice(&mut bytes);
    String::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8(field))
}

/// Wrap an encoded record in a length-prefixed frame.
pub fn write_frame<B: BufMut>(buf: &mut B, payload: &[u8]) {
    write_vlong(buf, payload.len() as i64);
    buf.put_slice(payload);
}

/// Split the next frame off `buf`.
///
/// Returns `Ok(None)` when `buf` is empty.
pub fn read_frame(buf: &mut Bytes) -> Result<Option<Bytes>, CodecError> {
    if !buf.has_remaining() {
        return Ok(None);
    }

    let len = read_vlong(buf, "frame length")?;
    let len = usize::try_from(len).map_err(|_| CodecError::VarintOutOfRange {
        field: "frame length",
        value: len,
    })?;

    if buf.remaining() < len {
        return Err(CodecError::UnexpectedEof("frame"));
    }

    Ok(Some(buf.split_to(len)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    fn encode(value: i64) -> Vec<u8> {
        let mut buf = BytesMut::new();
        write_vlong(&mut buf, value);
        buf.to_vec()
    }

    #[test]
    fn test_small_values_take_one_byte() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(127), vec![0x7F]);
        assert_eq!(encode(-112), vec![0x90]);
    }

    #[test]
    fn test_known_hadoop_layouts() {
        // 128 -> marker -113, one payload byte
        assert_eq!(encode(128), vec![0x8F, 0x80]);
        // 300 -> marker -114, two payload bytes
        assert_eq!(encode(300), vec![0x8E, 0x01, 0x2C]);
        // -113 -> one's complement 112, marker -121
        assert_eq!(encode(-113), vec![0x87, 0x70]);
    }

    #[test]
    fn test_vlong_boundaries_decode() {
        for value in [
            0,
            1,
            -1,
            127,
            128,
            -112,
            -113,
            255,
            256,
            65_535,
            i32::MAX as i64,
            i32::MIN as i64,
            i64::MAX,
            i64::MIN,
        ] {
            let mut bytes = Bytes::from(encode(value));
            assert_eq!(read_vlong(&mut bytes, "value").unwrap(), value);
            assert!(!bytes.has_remaining());
        }
    }

    #[test]
    fn test_truncated_vlong() {
        let mut bytes = Bytes::from(vec![0x8E, 0x01]);
        assert!(matches!(
            read_vlong(&mut bytes, "size"),
            Err(CodecError::UnexpectedEof("size"))
        ));
    }

    #[test]
    fn test_read_vu32_rejects_negative() {
        let mut bytes = Bytes::from(encode(-5));
        assert!(matches!(
            read_vu32(&mut bytes, "approx_size"),
            Err(CodecError::VarintOutOfRange { value: -5, .. })
        ));
    }

    #[test]
    fn test_string_layout() {
        let mut buf = BytesMut::new();
        write_string(&mut buf, "abc");
        assert_eq!(buf.to_vec(), vec![3, b'a', b'b', b'c']);

        let mut bytes = buf.freeze();
        assert_eq!(read_string(&mut bytes, "key").unwrap(), "abc");
    }

    #[test]
    fn test_invalid_utf8() {
        let mut bytes = Bytes::from(vec![2, 0xC3, 0x28]);
        assert!(matches!(
            read_string(&mut bytes, "key"),
            Err(CodecError::InvalidUtf8("key"))
        ));
    }

    #[test]
    fn test_frames() {
        let mut buf = BytesMut::new();
        write_frame(&mut buf, b"first");
        write_frame(&mut buf, b"");
        write_frame(&mut buf, b"third");

        let mut bytes = buf.freeze();
        assert_eq!(read_frame(&mut bytes).unwrap().unwrap(), &b"first"[..]);
        assert_eq!(read_frame(&mut bytes).unwrap().unwrap(), &b""[..]);
        assert_eq!(read_frame(&mut bytes).unwrap().unwrap(), &b"third"[..]);
        assert!(read_frame(&mut bytes).unwrap().is_none());
    }
}
