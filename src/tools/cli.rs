use std::{fmt::Display, fmt::Formatter};

use clap::Parser;
use log::info;

use crate::error::Result;
use crate::lz77::match_finder::{MatchConfig, MAX_MATCH_LENGTH, WINDOW_SIZE};

/// Extension given to full containers.
pub const CONTAINER_EXT: &str = "lzh";
/// Extension given to bare LZ77 streams.
pub const LZ77_EXT: &str = "lz77";

/// Verbosity of user information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Warnings,
    Info,
    Debug,
    Trace,
}

/// Zip, Unzip, Test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Zip,
    Unzip,
    Test,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Which stages the pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// LZ77 tokens, then prefix coding.
    Full,
    /// LZ77 tokens only. The output is the bare pre-entropy stream.
    Lz77Only,
}
impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "A two stage LZ77 + prefix coding text compressor",
    long_about = "
    Text is first tokenized against a sliding window of earlier text, and the packed
    tokens are then prefix coded byte by byte. Both stages run over the whole file in
    memory. Trailing line breaks are not preserved."
)]
pub struct Args {
    /// File to process
    #[clap()]
    pub input: String,

    /// Where to write the result (default: derived from the input name)
    #[clap()]
    pub output: Option<String>,

    /// Compress the input file (the default)
    #[clap(short = 'z', long = "compress")]
    pub compress: bool,

    /// Decompress the input file
    #[clap(short = 'd', long = "decompress", conflicts_with_all = &["compress", "test"])]
    pub decompress: bool,

    /// Compress, decompress again and compare with the input
    #[clap(short = 't', long = "test", conflicts_with = "compress")]
    pub test: bool,

    /// Overwrite existing output files
    #[clap(short = 'f', long = "force")]
    pub force: bool,

    /// Look-back window in characters (at most 65535)
    #[clap(short = 'w', long = "window", default_value_t = WINDOW_SIZE)]
    pub window: usize,

    /// Longest run a single token may copy (at most 65535)
    #[clap(short = 'm', long = "max-match", default_value_t = MAX_MATCH_LENGTH)]
    pub max_match: usize,

    /// Skip the prefix coding stage on both sides
    #[clap(long = "lz77-only")]
    pub lz77_only: bool,

    /// After decompressing, compare the output with this file
    #[clap(long = "compare")]
    pub compare: Option<String>,

    /// Sets verbosity. -v shows progress, -vvv is chatty
    #[clap(short = 'v', long = "verbose", parse(from_occurrences))]
    pub verbose: u64,

    /// Suppress all messages
    #[clap(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug)]
pub struct LzOpts {
    /// Name of file to read for input
    pub input: String,
    /// Optional name of the output file
    pub output: Option<String>,
    /// Compress/Decompress/Test
    pub op_mode: Mode,
    /// Full pipeline or LZ77 only
    pub stage: Stage,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Window and run limits for the match finder
    pub match_config: MatchConfig,
    /// File to compare the decompressed output with
    pub compare: Option<String>,
    /// Verbosity of user information
    pub verbose: Verbosity,
}

impl LzOpts {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            output: None,
            op_mode: Mode::Zip,
            stage: Stage::Full,
            force_overwrite: false,
            match_config: MatchConfig::default(),
            compare: None,
            verbose: Verbosity::Warnings,
        }
    }

    /// Put command line information from CLAP into our internal structure.
    pub fn from_args(args: Args) -> Result<Self> {
        let mut opts = Self::new();
        opts.input = args.input;
        opts.output = args.output;
        opts.op_mode = if args.decompress {
            Mode::Unzip
        } else if args.test {
            Mode::Test
        } else {
            Mode::Zip
        };
        if args.lz77_only {
            opts.stage = Stage::Lz77Only
        };
        opts.force_overwrite = args.force;
        opts.match_config = MatchConfig::new(args.window, args.max_match)?;
        opts.compare = args.compare;
        opts.verbose = match (args.quiet, args.verbose) {
            (true, _) => Verbosity::Quiet,
            (false, 0) => Verbosity::Warnings,
            (false, 1) => Verbosity::Info,
            (false, 2) => Verbosity::Debug,
            _ => Verbosity::Trace,
        };
        Ok(opts)
    }

    /// Name of the file this run writes.
    pub fn output_path(&self) -> String {
        if let Some(output) = &self.output {
            return output.clone();
        }
        let ext = match self.stage {
            Stage::Full => CONTAINER_EXT,
            Stage::Lz77Only => LZ77_EXT,
        };
        match self.op_mode {
            Mode::Zip | Mode::Test => format!("{}.{}", self.input, ext),
            Mode::Unzip => match self.input.strip_suffix(&format!(".{}", ext)) {
                Some(stem) if !stem.is_empty() => stem.to_string(),
                _ => format!("{}.out", self.input),
            },
        }
    }

    /// Set the log level
    pub fn apply_log_level(&self) {
        match self.verbose {
            Verbosity::Quiet => log::set_max_level(log::LevelFilter::Off),
            Verbosity::Warnings => log::set_max_level(log::LevelFilter::Warn),
            Verbosity::Info => log::set_max_level(log::LevelFilter::Info),
            Verbosity::Debug => log::set_max_level(log::LevelFilter::Debug),
            Verbosity::Trace => log::set_max_level(log::LevelFilter::Trace),
        };
    }
}

impl Default for LzOpts {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the command line, set the log level and report what we are about to do.
pub fn lzopts_init() -> Result<LzOpts> {
    let opts = LzOpts::from_args(Args::parse())?;
    opts.apply_log_level();

    info!("---- lzhuff Initialization Start ----",);
    info!("Verbosity set to {}", log::max_level());
    info!("Operational mode set to {}", opts.op_mode);
    info!("Stages: {}", opts.stage);
    info!("Getting input from the file {}", opts.input);
    info!(
        "Window {} characters, runs up to {}",
        opts.match_config.window_size(),
        opts.match_config.max_match_length()
    );
    if opts.force_overwrite {
        info!("Forcing file overwriting")
    };
    info!("---- lzhuff Initialization End ----\n");
    Ok(opts)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;

    fn parse(args: &[&str]) -> LzOpts {
        LzOpts::from_args(Args::try_parse_from(args).unwrap()).unwrap()
    }

    #[test]
    fn defaults_test() {
        let opts = parse(&["lzhuff", "notes.txt"]);
        assert_eq!(opts.op_mode, Mode::Zip);
        assert_eq!(opts.stage, Stage::Full);
        assert_eq!(opts.match_config, MatchConfig::default());
        assert_eq!(opts.verbose, Verbosity::Warnings);
        assert!(!opts.force_overwrite);
        assert_eq!(opts.output_path(), "notes.txt.lzh");
    }

    #[test]
    fn decompress_test() {
        let opts = parse(&["lzhuff", "-d", "notes.txt.lzh"]);
        assert_eq!(opts.op_mode, Mode::Unzip);
        assert_eq!(opts.output_path(), "notes.txt");

        let opts = parse(&["lzhuff", "-d", "archive.bin"]);
        assert_eq!(opts.output_path(), "archive.bin.out");

        let opts = parse(&["lzhuff", "-d", "--lz77-only", "a.txt.lz77", "b.txt"]);
        assert_eq!(opts.stage, Stage::Lz77Only);
        assert_eq!(opts.output_path(), "b.txt");
    }

    #[test]
    fn options_test() {
        let opts = parse(&["lzhuff", "-t", "-f", "-w", "1024", "-m", "64", "-vv", "in.txt"]);
        assert_eq!(opts.op_mode, Mode::Test);
        assert!(opts.force_overwrite);
        assert_eq!(opts.match_config.window_size(), 1024);
        assert_eq!(opts.match_config.max_match_length(), 64);
        assert_eq!(opts.verbose, Verbosity::Debug);

        let opts = parse(&["lzhuff", "-q", "in.txt"]);
        assert_eq!(opts.verbose, Verbosity::Quiet);
    }

    #[test]
    fn conflicting_modes_test() {
        assert!(Args::try_parse_from(&["lzhuff", "-d", "-t", "in.txt"]).is_err());
    }

    #[test]
    fn window_too_large_test() {
        let args = Args::try_parse_from(&["lzhuff", "-w", "70000", "in.txt"]).unwrap();
        assert!(matches!(LzOpts::from_args(args), Err(Error::InvalidConfig(_))));
    }
}
