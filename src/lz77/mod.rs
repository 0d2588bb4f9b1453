//! The lz77 module is the dictionary-substitution stage of lzhuff.
//!
//! Text is tokenized into tags by a sliding-window match finder, each tag is encoded into a
//! fixed-layout bit field, and the fields are concatenated into the pre-entropy byte
//! buffer. Decoding reverses this and replays the tags against a growing output.
//!
//! - match_finder: window scan producing tags.
//! - tag: one tag and its bit layout.
//! - tag_stream: concatenating and splitting encoded tags.
//! - replay: rebuilding text from tags.
//!
pub mod match_finder;
pub mod replay;
pub mod tag;
pub mod tag_stream;

use log::{debug, info, warn};

use crate::error::Result;
use match_finder::{tokenize, MatchConfig};
use replay::{replay, strip_line_endings, Replayed};

/// Tokenize `text` and pack the tags into the pre-entropy byte buffer.
pub fn encode_text(text: &str, config: &MatchConfig) -> Result<Vec<u8>> {
    let chars: Vec<char> = text.chars().collect();
    let tags = tokenize(&chars, config)?;
    let bytes = tag_stream::to_bytes(&tags);
    info!(
        "LZ77 stage: {} characters -> {} tags -> {} bytes.",
        chars.len(),
        tags.len(),
        bytes.len()
    );
    Ok(bytes)
}

/// Unpack a pre-entropy byte buffer and replay it back into text.
///
/// Trailing newlines and carriage returns are stripped from the result. The text reader
/// ends every line with a newline, so this is where that extra newline goes away.
pub fn decode_bytes(bytes: &[u8]) -> Result<Replayed> {
    let unpacked = tag_stream::from_bytes(bytes)?;
    debug!("Unpacked {} tags from {} bytes.", unpacked.tags.len(), bytes.len());

    let mut replayed = replay(&unpacked.tags);
    replayed.truncated = unpacked.truncated;
    if replayed.truncated {
        warn!("Decoded text may be missing its last character.");
    }
    strip_line_endings(&mut replayed.text);
    Ok(replayed)
}
