//! Error types for the engine's state surface (model/cabinet loading and
//! preset application). Never appear on the audio thread: `process` itself
//! is infallible.

use std::path::PathBuf;
use thiserror::Error;

/// Errors encountered while loading a cabinet impulse response.
#[derive(Debug, Error)]
pub enum CabinetLoadError {
    /// Neither `.wav` nor `.flac` extension was recognized.
    #[error("unsupported cabinet file extension: {path}")]
    UnsupportedExtension { path: PathBuf },

    /// Decoding the file's audio samples failed.
    #[error("failed to decode cabinet file {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: ampcore_io::Error,
    },

    /// The file could not be read.
    #[error("failed to read cabinet file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level error for the engine's state-key / parameter-surface dispatcher.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Failure loading a neural model file.
    #[error(transparent)]
    Model(#[from] ampcore_model::ModelLoadError),

    /// Failure loading a cabinet impulse response file.
    #[error(transparent)]
    Cabinet(#[from] CabinetLoadError),

    /// Failure loading or saving a preset file.
    #[error(transparent)]
    Config(#[from] ampcore_config::ConfigError),

    /// Failure loading a standalone playback audio file.
    #[error("failed to load audio file: {0}")]
    AudioFile(#[from] ampcore_io::Error),
}
