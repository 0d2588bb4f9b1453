//! The file collaborators around the core: text in, bytes out, sizes and comparisons.
//!
//! The core never touches the file system. Everything here is a thin wrapper over std::fs.

use std::borrow::Cow;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

use log::{debug, info, warn};

/// Read a text file line by line. A line ends at "\n", "\r\n" or a lone '\r', and every
/// line, the last one included, comes back terminated by a single '\n'. Bytes that are not
/// valid UTF-8 are read as U+FFFD.
pub fn read_text(path: impl AsRef<Path>) -> io::Result<String> {
    let path = path.as_ref();
    let mut raw = Vec::new();
    BufReader::new(File::open(path)?).read_to_end(&mut raw)?;
    let decoded = String::from_utf8_lossy(&raw);
    if let Cow::Owned(_) = decoded {
        warn!("{} is not valid UTF-8, bad bytes read as U+FFFD.", path.display());
    }
    let text = normalize_lines(&decoded);
    debug!("Read {} characters from {}.", text.chars().count(), path.display());
    Ok(text)
}

/// Turn every line ending into '\n' and terminate a last line that lacks one.
pub fn normalize_lines(raw: &str) -> String {
    let mut text = String::with_capacity(raw.len() + 1);
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            chars.next_if_eq(&'\n');
            text.push('\n');
        } else {
            text.push(c);
        }
    }
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

/// Read a whole file as bytes.
pub fn read_bytes(path: impl AsRef<Path>) -> io::Result<Vec<u8>> {
    let mut data = Vec::new();
    File::open(path)?.read_to_end(&mut data)?;
    Ok(data)
}

/// Write `bytes` to `path`. An existing file is only replaced when `force` is set.
pub fn write_bytes(path: impl AsRef<Path>, bytes: &[u8], force: bool) -> io::Result<()> {
    let path = path.as_ref();
    let mut options = OpenOptions::new();
    options.write(true);
    if force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    let mut f_out = options.open(path).map_err(|e| {
        if e.kind() == io::ErrorKind::AlreadyExists {
            io::Error::new(
                e.kind(),
                format!("{} already exists (use --force to overwrite)", path.display()),
            )
        } else {
            e
        }
    })?;
    f_out.write_all(bytes)?;
    info!("Wrote {} bytes to {}.", bytes.len(), path.display());
    Ok(())
}

/// Size of a file in bytes.
pub fn file_size(path: impl AsRef<Path>) -> io::Result<u64> {
    Ok(fs::metadata(path)?.len())
}

/// Offset of the first byte where `a` and `b` differ, or None if they are identical.
/// When one is a prefix of the other, the answer is the shorter length.
pub fn first_difference(a: &[u8], b: &[u8]) -> Option<usize> {
    match a.iter().zip(b).position(|(x, y)| x != y) {
        Some(idx) => Some(idx),
        None if a.len() != b.len() => Some(a.len().min(b.len())),
        None => None,
    }
}

/// Compare two files byte for byte. Returns the first differing offset, or None if equal.
pub fn compare_files(a: impl AsRef<Path>, b: impl AsRef<Path>) -> io::Result<Option<usize>> {
    Ok(first_difference(&read_bytes(a)?, &read_bytes(b)?))
}

/// Compression ratio as a percentage of the original size.
pub fn ratio(original: u64, compressed: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    compressed as f64 * 100.0 / original as f64
}
