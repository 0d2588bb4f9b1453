//! Error types for lzhuff.

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a compression or decompression call.
///
/// Truncated tokens and out-of-range back-references are not in here. Those are
/// reported through [`crate::lz77::replay::Replayed`] because the decoder keeps going.
#[derive(Error, Debug)]
pub enum Error {
    /// A character needs 4 bytes in UTF-8 and does not fit the 24 bit literal field.
    #[error("character {ch:?} at position {position} needs 4 bytes in UTF-8; literals hold at most 3")]
    UnsupportedCharacter { ch: char, position: usize },

    /// Same as above, raised when a tag is built directly.
    #[error("literal {0:?} needs 4 bytes in UTF-8; literals hold at most 3")]
    UnsupportedLiteral(char),

    /// A NUL in the input would be read back as the end-of-input literal and dropped.
    #[error("NUL character at position {0} cannot be stored as a literal")]
    NulCharacter(usize),

    /// Window or match length outside what the 16 bit fields can carry.
    #[error("invalid match configuration: {0}")]
    InvalidConfig(String),

    /// An extended literal did not start with a valid UTF-8 character.
    #[error("extended literal at bit {0} is not valid UTF-8")]
    InvalidLiteral(usize),

    /// The container ended in the middle of the serialized tree.
    #[error("prefix tree ends early at byte {0}")]
    TruncatedTree(usize),

    /// A tree marker byte other than 0 (internal) or 1 (leaf).
    #[error("invalid tree marker {marker:#04x} at byte {offset}")]
    InvalidMarker { marker: u8, offset: usize },

    /// The serialized tree nests deeper than any tree over 256 symbols can.
    #[error("prefix tree nests deeper than {0} levels")]
    TreeTooDeep(usize),

    /// Fewer than four bytes left for the bit count.
    #[error("container ends before the bit count field")]
    TruncatedHeader,

    /// The payload is shorter than the bit count says.
    #[error("payload holds {available} bits but the header declares {declared}")]
    TruncatedPayload { declared: u64, available: u64 },

    /// The declared bit count ran out part way down the tree.
    #[error("coded payload ends in the middle of a code")]
    DanglingCode,

    /// The coded payload does not fit the 32 bit count field.
    #[error("payload of {0} bits does not fit the 32 bit count field")]
    PayloadTooLarge(u64),

    /// A prefix code longer than a Code can hold.
    #[error("prefix code longer than {0} bits")]
    CodeTooLong(usize),

    /// A byte to be coded has no entry in the code table.
    #[error("no prefix code for byte {0:#04x}")]
    MissingCode(u8),

    /// Test mode: the round trip did not reproduce the input.
    #[error("round trip differs from the input at byte {0}")]
    Mismatch(usize),

    /// I/O error from the file helpers
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }
}
