//! The compression module ties the two stages of lzhuff together.
//!
//! Compression happens in the following steps:
//! - LZ77: Tokenize the text against a sliding window of earlier text and pack the tokens
//!   into the pre-entropy byte buffer.
//! - Prefix coding: Count the bytes of that buffer, build a merge tree over the counts and
//!   replace every byte by its code. The tree travels in front of the coded payload.
//!
//! Decompression follows the inverse of the compression process.
//! - Prefix decoding: Rebuild the tree and walk it bit by bit to recover the buffer.
//! - LZ77: Unpack the tokens and replay them against the growing output.
//!
//! The `--lz77-only` stage skips prefix coding on both sides.
//!
//! Both stages are sequential and work on whole in-memory buffers. There is no block
//! structure and no streaming.
//!

pub mod compress;
pub mod decompress;
