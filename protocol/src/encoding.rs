//! Canonical encoding of big integers.
//!
//! An integer is written as a varint byte length followed by its minimal big-endian magnitude.
//! Zero is the empty string. Leading zero bytes are rejected on read so every integer has exactly
//! one encoding.

use bytes::{Buf, BufMut};
use commonware_codec::{varint::UInt, EncodeSize, Error as CodecError, ReadExt, Write};
use num_bigint::BigUint;

/// Default limit on the byte length of a single decoded integer.
///
/// Generous enough for the largest remainders and commitments produced by any protocol over a
/// 4096-bit modulus.
pub const DEFAULT_MAX_INT_BYTES: usize = 1 << 16;

fn magnitude(value: &BigUint) -> Vec<u8> {
    if value.bits() == 0 {
        return Vec::new();
    }
    value.to_bytes_be()
}

/// Write `value` to `buf`.
pub fn write(value: &BigUint, buf: &mut impl BufMut) {
    let bytes = magnitude(value);
    UInt(bytes.len() as u32).write(buf);
    buf.put_slice(&bytes);
}

/// Number of bytes written by [write].
pub fn encode_size(value: &BigUint) -> usize {
    let len = value.bits().div_ceil(8) as usize;
    UInt(len as u32).encode_size() + len
}

/// Read an integer of at most `max_len` bytes from `buf`.
pub fn read(buf: &mut impl Buf, max_len: usize) -> Result<BigUint, CodecError> {
    let len: u32 = UInt::read(buf)?.into();
    let len = len as usize;
    if len > max_len {
        return Err(CodecError::Invalid("BigUint", "too long"));
    }
    if buf.remaining() < len {
        return Err(CodecError::EndOfBuffer);
    }
    let mut bytes = vec![0u8; len];
    buf.copy_to_slice(&mut bytes);
    if bytes.first() == Some(&0) {
        return Err(CodecError::Invalid("BigUint", "leading zero"));
    }
    Ok(BigUint::from_bytes_be(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;
    use num_traits::{One, Zero};

    fn encode(value: &BigUint) -> BytesMut {
        let mut buf = BytesMut::new();
        write(value, &mut buf);
        assert_eq!(buf.len(), encode_size(value));
        buf
    }

    #[test]
    fn test_zero_is_empty() {
        let buf = encode(&BigUint::zero());
        assert_eq!(buf.as_ref(), &[0u8]);
        assert!(read(&mut buf.freeze(), 8).unwrap().is_zero());
    }

    #[test]
    fn test_encoding() {
        let value = BigUint::from(0x0102_03u32);
        let buf = encode(&value);
        assert_eq!(buf.as_ref(), &[3, 1, 2, 3]);
        assert_eq!(read(&mut buf.freeze(), 3).unwrap(), value);

        // Multi-byte length prefix
        let value = (BigUint::one() << 2048u32) - 1u32;
        let buf = encode(&value);
        assert_eq!(&buf[..2], &[0x80, 0x02]);
        assert_eq!(read(&mut buf.freeze(), 256).unwrap(), value);
    }

    #[test]
    fn test_rejects_leading_zero() {
        let mut buf: &[u8] = &[2, 0, 7];
        assert!(matches!(
            read(&mut buf, 8),
            Err(CodecError::Invalid("BigUint", "leading zero"))
        ));
    }

    #[test]
    fn test_rejects_too_long() {
        let buf = encode(&BigUint::from(u64::MAX));
        assert!(matches!(
            read(&mut buf.freeze(), 7),
            Err(CodecError::Invalid("BigUint", "too long"))
        ));
    }

    #[test]
    fn test_rejects_truncated() {
        let mut buf: &[u8] = &[4, 1, 2];
        assert!(matches!(read(&mut buf, 8), Err(CodecError::EndOfBuffer)));
    }
}
