use log::{debug, info};

use crate::error::Result;
use crate::huffman_coding::entropy;
use crate::lz77::{self, match_finder::MatchConfig};
use crate::tools::cli::{LzOpts, Stage};
use crate::tools::file_io::{file_size, ratio, read_text, write_bytes};

/// Compress `text` with the default window and run limits.
pub fn compress(text: &str) -> Result<Vec<u8>> {
    compress_with(text, &MatchConfig::default())
}

/// Compress `text` through both stages. Empty text gives an empty container.
pub fn compress_with(text: &str, config: &MatchConfig) -> Result<Vec<u8>> {
    let pre_entropy = lz77::encode_text(text, config)?;
    entropy::compress(&pre_entropy)
}

/// Run the stages `stage` asks for.
pub fn compress_stage(text: &str, config: &MatchConfig, stage: Stage) -> Result<Vec<u8>> {
    match stage {
        Stage::Full => compress_with(text, config),
        Stage::Lz77Only => lz77::encode_text(text, config),
    }
}

/// Compress the input file defined in opts <LzOpts>.
pub fn compress_file(opts: &LzOpts) -> Result<()> {
    let text = read_text(&opts.input)?;
    debug!("Compressing {} ({} stages).", opts.input, opts.stage);

    let output = compress_stage(&text, &opts.match_config, opts.stage)?;

    let out_name = opts.output_path();
    write_bytes(&out_name, &output, opts.force_overwrite)?;

    let original = file_size(&opts.input)?;
    info!(
        "{} -> {}: {} bytes -> {} bytes ({:.1}%).",
        opts.input,
        out_name,
        original,
        output.len(),
        ratio(original, output.len() as u64)
    );
    Ok(())
}
