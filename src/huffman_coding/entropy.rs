//! Entropy packer: wraps prefix-coded data in the lzhuff container.
//!
//! ```text
//! [serialized prefix tree][bit count: u32 big-endian][payload: ceil(bit count / 8) bytes]
//! ```
//!
//! The payload is packed most significant bit first. Empty input gives an empty container.

use log::{debug, info, warn};

use super::huffman::{CodeTable, NodeKind, PrefixTree};
use super::tree_serial::{deserialize, serialize};
use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bitwriter::BitWriter;
use crate::error::{Error, Result};

const COUNT_BYTES: usize = 4;

/// Prefix-code `data` into a container.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let tree = match PrefixTree::from_data(data) {
        Some(tree) => tree,
        None => return Ok(Vec::new()),
    };
    let table = tree.code_table()?;

    let mut container = Vec::with_capacity(data.len() / 2 + 2 * table.len() + COUNT_BYTES);
    serialize(&tree, &mut container);
    let tree_bytes = container.len();

    let mut bw = BitWriter::new(data.len());
    if tree.is_single_leaf() {
        // The only code is empty, so spend one bit per byte to keep the count
        data.iter().for_each(|_| bw.out_bit(false));
    } else {
        write_codes(data, &table, &mut bw)?;
    }

    let bit_count = bw.bit_count();
    let count = u32::try_from(bit_count).map_err(|_| Error::PayloadTooLarge(bit_count))?;
    bw.flush();

    container.extend_from_slice(&count.to_be_bytes());
    container.extend_from_slice(&bw.output);
    info!(
        "Entropy stage: {} bytes -> {} byte tree + {} payload bits = {} bytes.",
        data.len(),
        tree_bytes,
        bit_count,
        container.len()
    );
    Ok(container)
}

/// Put the code of every byte of `data` on the stream.
fn write_codes(data: &[u8], table: &CodeTable, bw: &mut BitWriter) -> Result<()> {
    for &byte in data {
        let code = table.get(byte).ok_or(Error::MissingCode(byte))?;
        bw.out_bits(code.bits(), code.len());
    }
    Ok(())
}

/// Reverse `compress`.
pub fn decompress(container: &[u8]) -> Result<Vec<u8>> {
    if container.is_empty() {
        return Ok(Vec::new());
    }

    let (tree, tree_bytes) = deserialize(container)?;
    let header = container
        .get(tree_bytes..tree_bytes + COUNT_BYTES)
        .ok_or(Error::TruncatedHeader)?;
    let bit_count = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as u64;

    let payload = &container[tree_bytes + COUNT_BYTES..];
    let needed = ((bit_count + 7) / 8) as usize;
    if payload.len() < needed {
        return Err(Error::TruncatedPayload {
            declared: bit_count,
            available: payload.len() as u64 * 8,
        });
    }
    if payload.len() > needed {
        warn!(
            "Ignoring {} bytes after the coded payload.",
            payload.len() - needed
        );
    }
    debug!(
        "Container: {} byte tree, {} payload bits.",
        tree_bytes, bit_count
    );

    // A lone leaf has the empty code: every payload bit stands for one byte
    if let NodeKind::Leaf(byte) = tree.node(tree.root()).kind {
        return Ok(vec![byte; bit_count as usize]);
    }

    let mut br = BitReader::new(&payload[..needed]);
    let mut out = Vec::with_capacity(bit_count as usize / 2);
    let mut node = tree.root();
    for _ in 0..bit_count {
        // The length check above guarantees the bit is there
        let bit = br.bit().ok_or(Error::TruncatedPayload {
            declared: bit_count,
            available: br.position() as u64,
        })?;
        if let NodeKind::Internal { left, right } = tree.node(node).kind {
            node = if bit { right } else { left };
        }
        if let NodeKind::Leaf(byte) = tree.node(node).kind {
            out.push(byte);
            node = tree.root();
        }
    }
    if node != tree.root() {
        return Err(Error::DanglingCode);
    }
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_test() {
        assert!(compress(&[]).unwrap().is_empty());
        assert!(decompress(&[]).unwrap().is_empty());
    }

    #[test]
    fn known_container_test() {
        // c=0 a=10 b=11, so "abcc" codes to 10 11 0 0
        let container = compress(b"abcc").unwrap();
        assert_eq!(
            container,
            vec![0, 1, b'c', 0, 1, b'a', 1, b'b', 0, 0, 0, 6, 0b1011_0000]
        );
        assert_eq!(decompress(&container).unwrap(), b"abcc".to_vec());
    }

    #[test]
    fn single_symbol_test() {
        let data = vec![b'A'; 1000];
        let container = compress(&data).unwrap();
        // Tree, count, then 125 zero bytes
        assert_eq!(&container[..6], &[1, b'A', 0, 0, 0x03, 0xe8]);
        assert_eq!(container.len(), 2 + 4 + 125);
        assert_eq!(decompress(&container).unwrap(), data);
    }

    #[test]
    fn round_trip_test() {
        let samples: Vec<Vec<u8>> = vec![
            b"x".to_vec(),
            b"ab".to_vec(),
            b"the quick brown fox jumps over the lazy dog".to_vec(),
            (0..=255).collect(),
            (0..20_000_u32).map(|i| (i * 31 % 97) as u8).collect(),
        ];
        for data in samples {
            let container = compress(&data).unwrap();
            assert_eq!(decompress(&container).unwrap(), data);
        }
    }

    #[test]
    fn padding_not_decoded_test() {
        // 6 coded bits padded to a byte: the 2 padding bits would decode as 'c' 'c'
        let container = compress(b"abcc").unwrap();
        assert_eq!(decompress(&container).unwrap().len(), 4);
    }

    #[test]
    fn truncated_header_test() {
        assert!(matches!(
            decompress(&[0, 1, b'a', 1, b'b', 0, 0]),
            Err(Error::TruncatedHeader)
        ));
    }

    #[test]
    fn truncated_payload_test() {
        let mut container = compress(b"the quick brown fox").unwrap();
        container.pop();
        assert!(matches!(
            decompress(&container),
            Err(Error::TruncatedPayload { .. })
        ));
    }

    #[test]
    fn dangling_code_test() {
        // Tree c=0 a=10 b=11, one bit declared: "1" stops half way to a leaf
        let container = vec![0, 1, b'c', 0, 1, b'a', 1, b'b', 0, 0, 0, 1, 0b1000_0000];
        assert!(matches!(decompress(&container), Err(Error::DanglingCode)));
    }

    #[test]
    fn missing_code_test() {
        let table = PrefixTree::from_data(b"ab").unwrap().code_table().unwrap();
        let mut bw = BitWriter::new(8);
        assert!(matches!(
            write_codes(b"abc", &table, &mut bw),
            Err(Error::MissingCode(b'c'))
        ));
        write_codes(b"ba", &table, &mut bw).unwrap();
    }

    #[test]
    fn trailing_bytes_test() {
        let mut container = compress(b"abcc").unwrap();
        container.extend_from_slice(&[0xff, 0xff]);
        assert_eq!(decompress(&container).unwrap(), b"abcc".to_vec());
    }
}
