//! The huffman_coding module is the entropy stage of lzhuff.
//!
//! The pre-entropy buffer produced by the LZ77 stage is counted byte by byte, a binary merge
//! tree is built over those counts, and every byte is replaced by the bit path from the root
//! to its leaf. The tree itself travels at the front of the container so the decoder can
//! rebuild it without the counts.
//!
//! - huffman: tree construction (an arena of nodes) and the code table.
//! - tree_serial: preorder byte encoding of the tree.
//! - entropy: the container format.
//!
//! Encoding and decoding are sequential and run over whole in-memory buffers.
//!

pub mod entropy;
pub mod huffman;
pub mod tree_serial;
