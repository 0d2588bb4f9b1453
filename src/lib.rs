//! lzhuff: a two stage text compressor.
//!
//! Version 0.1.0
//!
//! Text is first tokenized by an LZ77 sliding-window match finder into (distance, run,
//! literal) tags. The tags are packed into a bit buffer, and the bytes of that buffer are
//! then prefix coded with a tree built from their frequencies. The container carries the
//! serialized tree, the payload bit count and the coded payload.
//!
//! Basic usage to compress a file is as follows:
//!
//! `$> lzhuff -z notes.txt`
//!
//! This will compress the file and create the file notes.txt.lzh. `lzhuff -d notes.txt.lzh`
//! writes notes.txt back, minus any trailing line breaks.
//!
//! From code:
//!
//! ```
//! let container = lzhuff::compress("ABABABAB").unwrap();
//! assert_eq!(lzhuff::decompress(&container).unwrap(), "ABABABAB");
//! ```
//!
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod lz77;
pub mod tools;

pub use compression::compress::{compress, compress_with};
pub use compression::decompress::{decompress, decompress_with_report};
pub use error::{Error, Result};
pub use lz77::match_finder::MatchConfig;
pub use lz77::replay::Replayed;
