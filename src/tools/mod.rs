//! The tools module provides the helpers around the lzhuff core.
//!
//! The tools are:
//! - cli: Command line interface and the options it fills in.
//! - file_io: Text reader, output writer, file sizes and byte-for-byte comparison.
//! - freq_count: Byte frequency count for the prefix tree.
//!
pub mod cli;
pub mod file_io;
pub mod freq_count;
