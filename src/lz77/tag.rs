//! Tag: one match record of the dictionary stage, and its fixed-layout bit encoding.
//!
//! On the wire a tag is
//!
//! ```text
//! [distance: 16][run_length: 16][extended: 1][literal: 8 or 24]
//! ```
//!
//! with every integer field written least significant bit first. A simple literal is the
//! character's single byte. An extended literal is the character's UTF-8 form (2 or 3
//! bytes), zero padded to 3 bytes, each byte least significant bit first.

use std::fmt::{Display, Formatter};

use crate::bitstream::bitbuffer::BitBuffer;
use crate::error::{Error, Result};

pub const DISTANCE_BITS: usize = 16;
pub const LENGTH_BITS: usize = 16;
pub const FLAG_BITS: usize = 1;
pub const SIMPLE_LITERAL_BITS: usize = 8;
pub const EXTENDED_LITERAL_BITS: usize = 24;

/// Width of the fields every tag carries before its literal.
pub const HEADER_BITS: usize = DISTANCE_BITS + LENGTH_BITS + FLAG_BITS;

/// Literal meaning "nothing follows the run". Replay never appends it.
pub const SENTINEL: char = '\0';

/// One token: copy `run_length` characters from `distance` back, then emit `literal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    distance: u16,
    run_length: u16,
    literal: char,
    extended: bool,
}

/// Outcome of decoding one tag from a bit buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    /// A whole tag and the number of bits it used.
    Complete { tag: Tag, consumed: usize },
    /// The buffer ended inside the tag. Only distance and run_length were read, the literal
    /// is the sentinel, and decoding must stop here.
    Truncated(Tag),
}

impl Tag {
    /// Build a tag. Fails for characters whose UTF-8 form is longer than 3 bytes.
    pub fn new(distance: u16, run_length: u16, literal: char) -> Result<Self> {
        let width = literal.len_utf8();
        if width > 3 {
            return Err(Error::UnsupportedLiteral(literal));
        }
        Ok(Self {
            distance,
            run_length,
            literal,
            extended: width > 1,
        })
    }

    /// A tag with no run, carrying only a character.
    #[cfg(test)]
    pub fn literal_only(literal: char) -> Result<Self> {
        Self::new(0, 0, literal)
    }

    pub fn distance(&self) -> u16 {
        self.distance
    }

    pub fn run_length(&self) -> u16 {
        self.run_length
    }

    pub fn literal(&self) -> char {
        self.literal
    }

    pub fn is_extended(&self) -> bool {
        self.extended
    }

    /// True if replaying this tag appends no literal.
    pub fn is_sentinel(&self) -> bool {
        self.literal == SENTINEL
    }

    /// Bits this tag occupies on the wire.
    pub fn bit_width(&self) -> usize {
        Self::width_for(self.extended)
    }

    fn width_for(extended: bool) -> usize {
        HEADER_BITS
            + if extended {
                EXTENDED_LITERAL_BITS
            } else {
                SIMPLE_LITERAL_BITS
            }
    }

    /// Encode into a new bit buffer.
    #[cfg(test)]
    pub fn encode(&self) -> BitBuffer {
        let mut bits = BitBuffer::with_capacity(self.bit_width());
        self.encode_into(&mut bits);
        bits
    }

    /// Append the encoded tag to `bits`.
    pub fn encode_into(&self, bits: &mut BitBuffer) {
        bits.push_lsb(self.distance as u32, DISTANCE_BITS);
        bits.push_lsb(self.run_length as u32, LENGTH_BITS);
        bits.push(self.extended);
        if self.extended {
            // Unused trailing bytes of a 2 byte form stay zero
            let mut utf8 = [0_u8; 4];
            self.literal.encode_utf8(&mut utf8);
            for byte in &utf8[..3] {
                bits.push_lsb(*byte as u32, 8);
            }
        } else {
            bits.push_lsb(self.literal as u32, SIMPLE_LITERAL_BITS);
        }
    }

    /// Decode the tag starting at bit `offset`.
    pub fn decode(bits: &BitBuffer, offset: usize) -> Result<Decoded> {
        let remaining = bits.len().saturating_sub(offset);
        let distance = bits.read_lsb(offset, DISTANCE_BITS) as u16;
        let run_length = bits.read_lsb(offset + DISTANCE_BITS, LENGTH_BITS) as u16;
        let extended = bits
            .get(offset + DISTANCE_BITS + LENGTH_BITS)
            .unwrap_or(false);

        let width = Self::width_for(extended);
        if width > remaining {
            return Ok(Decoded::Truncated(Tag {
                distance,
                run_length,
                literal: SENTINEL,
                extended: false,
            }));
        }

        let start = offset + HEADER_BITS;
        let literal = if extended {
            let utf8 = [
                bits.read_lsb(start, 8) as u8,
                bits.read_lsb(start + 8, 8) as u8,
                bits.read_lsb(start + 16, 8) as u8,
            ];
            first_char(&utf8).ok_or(Error::InvalidLiteral(start))?
        } else {
            char::from(bits.read_lsb(start, SIMPLE_LITERAL_BITS) as u8)
        };

        Ok(Decoded::Complete {
            tag: Tag {
                distance,
                run_length,
                literal,
                extended,
            },
            consumed: width,
        })
    }
}

/// Return the first character of a zero-padded UTF-8 field. An all-zero field is the sentinel.
fn first_char(utf8: &[u8]) -> Option<char> {
    let valid = match std::str::from_utf8(utf8) {
        Ok(s) => s,
        Err(e) => {
            // Keep whatever valid prefix there is
            let end = e.valid_up_to();
            std::str::from_utf8(&utf8[..end]).ok()?
        }
    };
    valid.chars().next()
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({},{},'{}')",
            self.distance,
            self.run_length,
            self.literal.escape_default()
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn simple_layout_test() {
        let tag = Tag::new(3, 2, 'A').unwrap();
        let bits = tag.encode();
        assert_eq!(bits.len(), 41);
        assert_eq!(bits.read_lsb(0, 16), 3);
        assert_eq!(bits.read_lsb(16, 16), 2);
        assert_eq!(bits.get(32), Some(false));
        assert_eq!(bits.read_lsb(33, 8), 0x41);
        // Bit 0 of distance 3 is set and comes first
        assert_eq!(bits.get(0), Some(true));
        assert_eq!(bits.get(1), Some(true));
        assert_eq!(bits.get(2), Some(false));
    }

    #[test]
    fn extended_layout_test() {
        // 'ж' is two bytes in UTF-8: d0 b6
        let tag = Tag::new(0, 0, 'ж').unwrap();
        assert!(tag.is_extended());
        let bits = tag.encode();
        assert_eq!(bits.len(), 57);
        assert_eq!(bits.get(32), Some(true));
        assert_eq!(bits.read_lsb(33, 8), 0xd0);
        assert_eq!(bits.read_lsb(41, 8), 0xb6);
        assert_eq!(bits.read_lsb(49, 8), 0x00);
    }

    #[test]
    fn codec_inverse_test() {
        let tags = [
            Tag::new(0, 0, 'x').unwrap(),
            Tag::new(65535, 65535, '~').unwrap(),
            Tag::new(12, 500, SENTINEL).unwrap(),
            Tag::new(1, 1, 'é').unwrap(),
            Tag::new(300, 7, '€').unwrap(),
            Tag::new(2, 6, '\n').unwrap(),
        ];
        for tag in tags {
            let bits = tag.encode();
            assert_eq!(
                Tag::decode(&bits, 0).unwrap(),
                Decoded::Complete {
                    tag,
                    consumed: tag.bit_width()
                }
            );
        }
    }

    #[test]
    fn decode_at_offset_test() {
        let mut bits = BitBuffer::new();
        bits.push_lsb(0b101, 3);
        Tag::new(9, 4, 'q').unwrap().encode_into(&mut bits);
        match Tag::decode(&bits, 3).unwrap() {
            Decoded::Complete { tag, consumed } => {
                assert_eq!(tag, Tag::new(9, 4, 'q').unwrap());
                assert_eq!(consumed, 41);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn four_byte_literal_rejected_test() {
        assert!(matches!(
            Tag::new(0, 0, '😀'),
            Err(Error::UnsupportedLiteral('😀'))
        ));
    }

    #[test]
    fn truncated_tag_test() {
        let full = Tag::new(7, 5, 'z').unwrap().encode();
        // Keep the header and half the literal
        let mut short = BitBuffer::new();
        for i in 0..37 {
            short.push(full.get(i).unwrap());
        }
        assert_eq!(
            Tag::decode(&short, 0).unwrap(),
            Decoded::Truncated(Tag::new(7, 5, SENTINEL).unwrap())
        );

        // Fewer bits than the header still reads what is there
        let mut tiny = BitBuffer::new();
        tiny.push_lsb(7, 16);
        tiny.push_lsb(1, 4);
        assert_eq!(
            Tag::decode(&tiny, 0).unwrap(),
            Decoded::Truncated(Tag::new(7, 1, SENTINEL).unwrap())
        );
    }

    #[test]
    fn invalid_extended_literal_test() {
        let mut bits = BitBuffer::new();
        bits.push_lsb(0, 32);
        bits.push(true);
        // A lone continuation byte is not UTF-8
        bits.push_lsb(0x80, 8);
        bits.push_lsb(0, 16);
        assert!(matches!(
            Tag::decode(&bits, 0),
            Err(Error::InvalidLiteral(33))
        ));
    }

    #[test]
    fn display_test() {
        assert_eq!(Tag::new(4, 2, 'a').unwrap().to_string(), "(4,2,'a')");
        assert_eq!(Tag::new(0, 0, '\n').unwrap().to_string(), "(0,0,'\\n')");
    }
}
