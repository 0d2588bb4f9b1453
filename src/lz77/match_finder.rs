//! Window match finder: the LZ77 tokenizer.
//!
//! For each position we walk backwards from the nearest earlier character to the start of
//! the window, measuring how far the text at that point repeats the text at the current
//! position. The scan is a plain O(window * max_length) loop with no hash chains.

use log::{debug, trace};

use super::tag::{Tag, SENTINEL};
use crate::error::{Error, Result};

/// Default look-back window, in characters.
pub const WINDOW_SIZE: usize = 32_000;
/// Default longest run a single tag may copy.
pub const MAX_MATCH_LENGTH: usize = 500;

/// Limits for the match search. Both values must fit the 16 bit tag fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchConfig {
    window_size: usize,
    max_match_length: usize,
}

impl MatchConfig {
    pub fn new(window_size: usize, max_match_length: usize) -> Result<Self> {
        if window_size > u16::MAX as usize {
            return Err(Error::config(format!(
                "window size {} exceeds {}",
                window_size,
                u16::MAX
            )));
        }
        if max_match_length > u16::MAX as usize {
            return Err(Error::config(format!(
                "max match length {} exceeds {}",
                max_match_length,
                u16::MAX
            )));
        }
        Ok(Self {
            window_size,
            max_match_length,
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn max_match_length(&self) -> usize {
        self.max_match_length
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            window_size: WINDOW_SIZE,
            max_match_length: MAX_MATCH_LENGTH,
        }
    }
}

/// Find the longest earlier run that repeats the text at `pos`. `pos` must be inside `text`.
///
/// Only a strictly longer match replaces the current best, so among equal lengths the one
/// nearest to `pos` wins.
pub fn find_match(text: &[char], pos: usize, config: &MatchConfig) -> Result<Tag> {
    let window_start = pos.saturating_sub(config.window_size);
    let mut best_distance = 0;
    let mut best_length = 0;

    for i in (window_start..pos).rev() {
        let mut length = 0;
        while length < config.max_match_length
            && pos + length < text.len()
            && text[i + length] == text[pos + length]
        {
            length += 1;
        }
        if length > best_length {
            best_distance = pos - i;
            best_length = length;
        }
    }

    let literal = text.get(pos + best_length).copied().unwrap_or(SENTINEL);
    Tag::new(best_distance as u16, best_length as u16, literal)
}

/// Tokenize the whole text. Empty text gives no tags.
pub fn tokenize(text: &[char], config: &MatchConfig) -> Result<Vec<Tag>> {
    check_text(text)?;

    let mut tags = Vec::new();
    let mut pos = 0;
    while pos < text.len() {
        let tag = find_match(text, pos, config)?;
        trace!("{:>8}: {}", pos, tag);
        pos += tag.run_length() as usize + 1;
        tags.push(tag);
    }
    debug!(
        "Tokenized {} characters into {} tags (window {}, max run {}).",
        text.len(),
        tags.len(),
        config.window_size,
        config.max_match_length
    );
    Ok(tags)
}

/// Reject characters a literal cannot carry: NUL (it is the sentinel) and anything that
/// takes 4 bytes in UTF-8.
fn check_text(text: &[char]) -> Result<()> {
    for (position, &ch) in text.iter().enumerate() {
        if ch == SENTINEL {
            return Err(Error::NulCharacter(position));
        }
        if ch.len_utf8() > 3 {
            return Err(Error::UnsupportedCharacter { ch, position });
        }
    }
    Ok(())
}
