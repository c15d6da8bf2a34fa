//! Command-line flags for the real-time driver.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ampcore")]
#[command(author, version, about = "Real-time driver for the ampcore amplifier engine", long_about = None)]
pub struct Cli {
    /// Neural model JSON to load at startup. Defaults to the embedded model.
    #[arg(long, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// Cabinet impulse response (WAV or FLAC) to load at startup. Leaves the
    /// cabinet stage bypassed if not given.
    #[arg(long, value_name = "PATH")]
    pub cabinet: Option<PathBuf>,

    /// Preset file to load at startup, applied before `--model`/`--cabinet`.
    #[arg(long, value_name = "PATH")]
    pub preset: Option<PathBuf>,

    /// Input device (exact or partial name). Uses the system default if not given.
    #[arg(long)]
    pub input: Option<String>,

    /// Output device (exact or partial name). Uses the system default if not given.
    #[arg(long)]
    pub output: Option<String>,

    /// Sample rate in Hz.
    #[arg(long, default_value_t = 48000)]
    pub sample_rate: u32,

    /// Buffer size in frames.
    #[arg(long, default_value_t = 256)]
    pub buffer_size: u32,
}
