use log::{info, warn};

use crate::error::{Error, Result};
use crate::huffman_coding::entropy;
use crate::lz77::{self, replay::Replayed};
use crate::tools::cli::{LzOpts, Stage};
use crate::tools::file_io::{compare_files, first_difference, read_bytes, read_text, write_bytes};

use super::compress::compress_stage;

/// Decompress a container back into text. Trailing line breaks of the original are not restored.
pub fn decompress(container: &[u8]) -> Result<String> {
    Ok(decompress_with_report(container)?.text)
}

/// Decompress a container, keeping the replay report (clamped references, truncation).
pub fn decompress_with_report(container: &[u8]) -> Result<Replayed> {
    let pre_entropy = entropy::decompress(container)?;
    lz77::decode_bytes(&pre_entropy)
}

/// Undo the stages `stage` names.
pub fn decompress_stage(data: &[u8], stage: Stage) -> Result<Replayed> {
    match stage {
        Stage::Full => decompress_with_report(data),
        Stage::Lz77Only => lz77::decode_bytes(data),
    }
}

/// Decompress the file specified in opts (LzOpts), then compare with `opts.compare` if given.
pub fn decompress_file(opts: &LzOpts) -> Result<()> {
    let data = read_bytes(&opts.input)?;
    let replayed = decompress_stage(&data, opts.stage)?;
    if replayed.clamped > 0 {
        warn!(
            "{}: {} copied characters pointed before the start of the text.",
            opts.input, replayed.clamped
        );
    }

    let out_name = opts.output_path();
    write_bytes(&out_name, replayed.text.as_bytes(), opts.force_overwrite)?;
    info!(
        "{} -> {}: {} bytes -> {} bytes.",
        opts.input,
        out_name,
        data.len(),
        replayed.text.len()
    );

    if let Some(reference) = &opts.compare {
        match compare_files(&out_name, reference)? {
            None => info!("{} matches {}.", out_name, reference),
            Some(offset) => warn!(
                "{} differs from {} starting at byte {}.",
                out_name, reference, offset
            ),
        }
    }
    Ok(())
}

/// Test mode: compress the input in memory, decompress it again and check the result
/// against the input. Nothing is written.
pub fn verify_file(opts: &LzOpts) -> Result<()> {
    let text = read_text(&opts.input)?;
    let compressed = compress_stage(&text, &opts.match_config, opts.stage)?;
    let replayed = decompress_stage(&compressed, opts.stage)?;

    let expected = text.trim_end_matches(|c: char| c == '\n' || c == '\r');
    if let Some(offset) = first_difference(expected.as_bytes(), replayed.text.as_bytes()) {
        return Err(Error::Mismatch(offset));
    }
    info!(
        "{}: round trip ok, {} bytes -> {} bytes.",
        opts.input,
        text.len(),
        compressed.len()
    );
    Ok(())
}
