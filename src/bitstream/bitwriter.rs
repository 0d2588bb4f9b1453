use log::error;

/// Packs prefix codes into bytes, most significant bit first, for the entropy payload.
pub struct BitWriter {
    pub output: Vec<u8>,
    /// Private queue to hold bits that are waiting to be put as bytes into the output buffer.
    queue: u64,
    /// Count of valid bits in the queue.
    q_bits: u8,
    /// Total bits written, not counting flush padding.
    written: u64,
}

impl BitWriter {
    /// Create a new BitWriter with an output buffer of size specified. Call flush() to
    /// flush the bit queue to the buffer before using the output.
    pub fn new(size: usize) -> Self {
        Self {
            output: Vec::with_capacity(size),
            queue: 0,
            q_bits: 0,
            written: 0,
        }
    }

    /// Move all full bytes from the queue to the output buffer.
    fn write_stream(&mut self) {
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte); //push the packed byte out
            self.q_bits -= 8; //adjust the count of bits left in the queue
        }
    }

    /// Writes the low `depth` bits of `data` (0-64), most significant of those bits first.
    pub fn out_bits(&mut self, data: u64, mut depth: u8) {
        self.written += depth as u64;
        // The queue never holds more than 7 bits between calls, so 32 more always fit.
        while depth > 0 {
            let take = depth.min(32);
            depth -= take;
            let chunk = (data >> depth) & (u64::MAX >> (64 - take));
            self.queue <<= take;
            self.queue |= chunk;
            self.q_bits += take;
            self.write_stream();
        }
    }

    /// Put a single bit on the stream.
    pub fn out_bit(&mut self, bit: bool) {
        self.out_bits(bit as u64, 1);
    }

    /// Number of bits written so far, without padding.
    pub fn bit_count(&self) -> u64 {
        self.written
    }

    /// Flushes the remaining bits (1-7) from the queue, padding with 0s in the least
    /// signficant bits
    pub fn flush(&mut self) {
        if self.q_bits > 0 {
            self.queue <<= 8 - self.q_bits; //pad the queue with zeros
            self.q_bits += 8 - self.q_bits;
            self.write_stream(); // write out all that is left
            if self.q_bits > 0 {
                error!("Stuff left in the BitWriter queue.");
            }
        }
    }

    /// Debugging function to return the number of bytes.bits output so far
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.written / 8, self.written % 8)
    }
}

#[cfg(test)]
mod test {
    use super::BitWriter;

    #[test]
    fn out_bits_test() {
        let mut bw = BitWriter::new(100);
        bw.out_bits(0b00100001_00100000, 16);
        bw.flush();
        assert_eq!(bw.output, "! ".as_bytes());
        assert_eq!(bw.bit_count(), 16);
    }

    #[test]
    fn padding_and_loc_test() {
        let mut bw = BitWriter::new(100);
        bw.out_bits(0b101, 3);
        assert_eq!("[0.3]", &bw.loc());
        bw.out_bit(true);
        bw.flush();
        assert_eq!(bw.output, [0b1011_0000]);
        assert_eq!(bw.bit_count(), 4);
    }

    #[test]
    fn long_code_test() {
        let mut bw = BitWriter::new(100);
        bw.out_bit(true);
        bw.out_bits(u64::MAX, 64);
        bw.out_bits(0, 7);
        bw.flush();
        assert_eq!(bw.output, [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x80]);
        assert_eq!(bw.bit_count(), 72);
    }
}
