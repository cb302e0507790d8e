use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use gwts_frame::{
    frame_55, frame_9x, Frame, MarkerTable, ProtocolFamily, DEFAULT_PULSE_WIDTH, DEFAULT_STEP,
};

use crate::config::FileConfig;
use crate::exit::{frame_error, CliResult};
use crate::output::OutputFormat;

pub mod check;
pub mod encode;
pub mod filter;
pub mod pulses;
pub mod schedule;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a recording and write the per-category lists.
    Filter(FilterArgs),
    /// Wrap a payload in a 9X or 55 frame.
    Encode(EncodeArgs),
    /// Validate a single frame.
    Check(CheckArgs),
    /// Convert bytes into IR pulse run lengths.
    Pulses(PulsesArgs),
    /// Broadcast a 9X command under every countdown marker.
    Schedule(ScheduleArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat, config: &FileConfig) -> CliResult<i32> {
    match command {
        Command::Filter(args) => filter::run(args, format, config),
        Command::Encode(args) => encode::run(args, format),
        Command::Check(args) => check::run(args, format),
        Command::Pulses(args) => pulses::run(args, format),
        Command::Schedule(args) => schedule::run(args, format, config),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum FamilyArg {
    #[value(name = "9x", alias = "9X")]
    NineX,
    #[value(name = "55")]
    FiveFive,
}

impl FamilyArg {
    pub fn encode(self, payload: &[u8]) -> gwts_frame::Result<Frame> {
        match self {
            FamilyArg::NineX => frame_9x(payload),
            FamilyArg::FiveFive => frame_55(payload),
        }
    }
}

impl From<FamilyArg> for ProtocolFamily {
    fn from(family: FamilyArg) -> Self {
        match family {
            FamilyArg::NineX => ProtocolFamily::NineX,
            FamilyArg::FiveFive => ProtocolFamily::FiveFive,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum MarkerPreset {
    /// FB..F1 countdown plus 20, extended 0C.
    Standard,
    /// FF..F1 countdown plus 20, extended 0C.
    Wide,
}

impl MarkerPreset {
    pub fn table(self) -> MarkerTable {
        match self {
            MarkerPreset::Standard => MarkerTable::standard(),
            MarkerPreset::Wide => MarkerTable::wide(),
        }
    }
}

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Recording to filter.
    pub input: PathBuf,
    /// Leading tokens per line that form the timestamp.
    #[arg(long, short = 't', value_name = "N", env = "GWTS_TIMESTAMP_TOKENS")]
    pub timestamp_tokens: Option<usize>,
    /// Directory for the category files. Default: beside the input.
    #[arg(long, short = 'o', value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
    /// Delay marker table.
    #[arg(long, value_name = "PRESET", env = "GWTS_MARKERS")]
    pub markers: Option<MarkerPreset>,
    /// Number of most frequent rejects to report.
    #[arg(long, value_name = "N")]
    pub top_errors: Option<usize>,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Frame family.
    pub family: FamilyArg,
    /// Payload bytes as hex tokens.
    #[arg(required = true, num_args = 1..)]
    pub bytes: Vec<String>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Frame bytes as hex tokens.
    #[arg(required = true, num_args = 1..)]
    pub bytes: Vec<String>,
}

#[derive(Args, Debug)]
pub struct PulsesArgs {
    /// Bytes to modulate, as hex tokens.
    #[arg(required = true, num_args = 1..)]
    pub bytes: Vec<String>,
    /// Bit width in microseconds.
    #[arg(long, default_value_t = DEFAULT_PULSE_WIDTH)]
    pub width: u32,
    /// Frame the bytes as this family before modulating.
    #[arg(long, value_name = "FAMILY")]
    pub encode: Option<FamilyArg>,
}

#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// Show time at which the command fires.
    pub offset: u64,
    /// Command body as hex tokens.
    #[arg(required = true, num_args = 1..)]
    pub bytes: Vec<String>,
    /// Ticks between repeats.
    #[arg(long, default_value_t = DEFAULT_STEP)]
    pub step: u64,
    /// Delay marker table.
    #[arg(long, value_name = "PRESET", env = "GWTS_MARKERS")]
    pub markers: Option<MarkerPreset>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Join positional hex arguments; each may hold one or more tokens.
pub(crate) fn hex_tokens(args: &[String]) -> Vec<&str> {
    args.iter().flat_map(|arg| arg.split_whitespace()).collect()
}

pub(crate) fn parse_hex_args(args: &[String]) -> CliResult<Vec<u8>> {
    gwts_frame::hex::parse_tokens(hex_tokens(args))
        .map_err(|err| frame_error("invalid hex input", err))
}

/// Flag or env preset first, then the config file, then the standard table.
pub(crate) fn resolve_markers(
    preset: Option<MarkerPreset>,
    config: &FileConfig,
) -> CliResult<MarkerTable> {
    if let Some(preset) = preset {
        return Ok(preset.table());
    }
    Ok(config.marker_table()?.unwrap_or_default())
}
