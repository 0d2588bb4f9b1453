//! BitBuffer: the growable, index-addressable bit sequence used by the token stage.
//!
//! Bits are stored packed, eight to a byte, with logical bit `i` at bit position `i % 8`
//! of byte `i / 8`. Multi-bit integers go in and come out least significant bit first.
//! That makes `to_bytes()` a straight copy of the storage, with the unused high bits of
//! the last byte left at zero.

/// Ordered sequence of bits, independent of byte alignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitBuffer {
    /// Packed storage. Bits past `len` are always zero.
    bytes: Vec<u8>,
    /// Count of valid bits.
    len: usize,
}

impl BitBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with room for `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity((bits + 7) / 8),
            len: 0,
        }
    }

    /// Wrap a byte buffer. Every bit of every byte counts, so the length is `8 * bytes.len()`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
            len: bytes.len() * 8,
        }
    }

    /// Number of bits held.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append one bit.
    pub fn push(&mut self, bit: bool) {
        if self.len % 8 == 0 {
            self.bytes.push(0);
        }
        if bit {
            self.bytes[self.len / 8] |= 1 << (self.len % 8);
        }
        self.len += 1;
    }

    /// Return the bit at `index`, or None past the end.
    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some(self.bytes[index / 8] & (1 << (index % 8)) != 0)
    }

    /// Append the low `width` bits of `value`, least significant bit first. Width is at most 32.
    pub fn push_lsb(&mut self, value: u32, width: usize) {
        debug_assert!(width <= 32);
        for i in 0..width {
            self.push((value >> i) & 1 == 1);
        }
    }

    /// Read `width` bits starting at `offset` as an integer, least significant bit first.
    /// Bits past the end of the buffer read as zero.
    pub fn read_lsb(&self, offset: usize, width: usize) -> u32 {
        debug_assert!(width <= 32);
        (0..width).fold(0_u32, |acc, i| {
            if self.get(offset + i).unwrap_or(false) {
                acc | (1 << i)
            } else {
                acc
            }
        })
    }

    /// Append every bit of another buffer.
    #[cfg(test)]
    pub fn extend(&mut self, other: &BitBuffer) {
        // Byte aligned appends are just a copy of the storage.
        if self.len % 8 == 0 {
            self.bytes.extend_from_slice(&other.bytes);
            self.len += other.len;
            return;
        }
        for i in 0..other.len {
            self.push(other.bytes[i / 8] & (1 << (i % 8)) != 0);
        }
    }

    /// True if there are no set bits from `offset` to the end.
    pub fn is_zero_from(&self, offset: usize) -> bool {
        (offset..self.len).all(|i| self.get(i) == Some(false))
    }

    /// Borrow the packed bytes. The last byte is zero-padded on its high end.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the buffer, returning the packed bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Debugging function. Report the current length as bytes.bits.
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.len / 8, self.len % 8)
    }
}
