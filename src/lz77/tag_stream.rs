//! Packs a sequence of tags into one contiguous bit buffer and splits it back apart.
//!
//! The packer knows nothing about what the fields mean. It concatenates whatever the tag
//! codec produces and, on the way back, keeps asking the codec for the next tag until the
//! buffer is used up.

use log::{trace, warn};

use super::tag::{Decoded, Tag};
use crate::bitstream::bitbuffer::BitBuffer;
use crate::error::Result;

/// Tags recovered from a bit buffer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Unpacked {
    pub tags: Vec<Tag>,
    /// The last tag was cut short and carries only distance and run length.
    pub truncated: bool,
}

/// Concatenate the encoded tags, in order, with no padding between them.
pub fn pack(tags: &[Tag]) -> BitBuffer {
    let total = tags.iter().map(Tag::bit_width).sum();
    let mut bits = BitBuffer::with_capacity(total);
    tags.iter().for_each(|tag| tag.encode_into(&mut bits));
    bits
}

/// Decode tags from the start of `bits` until the buffer is used up.
///
/// Fewer than 8 trailing zero bits are byte-alignment padding and are skipped. Anything
/// else too short for a whole tag is decoded as a truncated tag, which ends the stream.
pub fn unpack(bits: &BitBuffer) -> Result<Unpacked> {
    let mut out = Unpacked::default();
    let mut offset = 0;

    while offset < bits.len() {
        if bits.len() - offset < 8 && bits.is_zero_from(offset) {
            trace!("Skipping {} padding bits.", bits.len() - offset);
            break;
        }
        match Tag::decode(bits, offset)? {
            Decoded::Complete { tag, consumed } => {
                out.tags.push(tag);
                offset += consumed;
            }
            Decoded::Truncated(tag) => {
                warn!(
                    "Tag stream ends inside a tag at bit {} of {}. Keeping its run only.",
                    offset,
                    bits.len()
                );
                out.tags.push(tag);
                out.truncated = true;
                break;
            }
        }
    }
    Ok(out)
}

/// Pack tags straight to bytes, zero padding the last byte.
pub fn to_bytes(tags: &[Tag]) -> Vec<u8> {
    pack(tags).into_bytes()
}

/// Unpack tags from bytes written by `to_bytes`.
pub fn from_bytes(bytes: &[u8]) -> Result<Unpacked> {
    unpack(&BitBuffer::from_bytes(bytes))
}
