use bytes::{BufMut, BytesMut};

use crate::error::{Result, ShdlcError};
use crate::wire::{is_reserved, ESCAPE, ESCAPE_XOR};

/// Number of bytes `src` occupies once stuffed.
pub fn stuffed_len(src: &[u8]) -> usize {
    src.len() + src.iter().filter(|&&byte| is_reserved(byte)).count()
}

/// Append the stuffed form of `src` to `dst`.
///
/// Each reserved byte `b` becomes `0x7D, b ^ 0x20`; every other byte is copied.
pub fn stuff_into(src: &[u8], dst: &mut BytesMut) {
    dst.reserve(stuffed_len(src));
    for &byte in src {
        if is_reserved(byte) {
            dst.put_u8(ESCAPE);
            dst.put_u8(byte ^ ESCAPE_XOR);
        } else {
            dst.put_u8(byte);
        }
    }
}

/// Stuff a logical byte sequence.
pub fn stuff(src: &[u8]) -> Vec<u8> {
    let mut dst = BytesMut::with_capacity(stuffed_len(src));
    stuff_into(src, &mut dst);
    dst.to_vec()
}

/// Destuff one logical byte starting at `index`.
///
/// Returns the logical byte and the index of the next stuffed byte. An escape
/// byte at the final position, or an `index` past the end, is a truncated frame.
pub fn destuff(buf: &[u8], index: usize) -> Result<(u8, usize)> {
    match buf.get(index) {
        Some(&ESCAPE) => match buf.get(index + 1) {
            Some(&next) => Ok((next ^ ESCAPE_XOR, index + 2)),
            None => Err(ShdlcError::TruncatedFrame { offset: index }),
        },
        Some(&byte) => Ok((byte, index + 1)),
        None => Err(ShdlcError::TruncatedFrame { offset: index }),
    }
}

/// Destuff an entire stuffed sequence.
pub fn destuff_all(buf: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(buf.len());
    let mut index = 0;
    while index < buf.len() {
        let (byte, next) = destuff(buf, index)?;
        out.push(byte);
        index = next;
    }
    Ok(out)
}
