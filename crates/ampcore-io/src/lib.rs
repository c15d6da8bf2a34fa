//! Audio file and device I/O for the ampcore amplifier engine.
//!
//! This crate provides:
//!
//! - **File loading**: [`audiofile::load_audio_mono`] dispatches WAV/FLAC by
//!   extension, downmixes to the first channel, and resamples to the host rate.
//! - **WAV codec**: [`read_wav`] / [`write_wav`] for the underlying format.
//! - **FLAC decode**: [`flac::read_flac`].
//! - **Rational resampling**: [`resample::resample_to_rate`] for IR sample-rate
//!   conversion.
//! - **Real-time streaming**: [`AudioStream`] wraps `cpal` for live audio I/O.

mod audiofile;
mod flac;
mod resample;
mod stream;
mod wav;

pub use audiofile::load_audio_mono;
pub use resample::{resample, resample_to_rate};
pub use stream::{AudioStream, StreamConfig};
pub use wav::{WavSpec, read_wav, write_wav};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// FLAC file read error.
    #[error("FLAC file error: {0}")]
    Flac(String),

    /// Audio stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// No audio device available on the system.
    #[error("No audio device available")]
    NoDevice,

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
