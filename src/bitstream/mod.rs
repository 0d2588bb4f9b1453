//! The bitstream module forms the bit-level I/O subsystem for lzhuff.
//!
//! There are two independently packed layers and they use opposite bit orders:
//! - `bitbuffer`: the token stream. Integer fields go in least significant bit first and
//!   logical bit `i` lands in bit `i % 8` of byte `i / 8`.
//! - `bitwriter` / `bitreader`: the entropy payload. Codes are packed most significant bit
//!   first within each byte.
//!
//! This I/O subsystem is designed to interface with the other modules within lzhuff. It is
//! not intended for more general use.
//!
pub mod bitbuffer;
pub mod bitreader;
pub mod bitwriter;
