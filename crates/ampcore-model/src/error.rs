use std::path::PathBuf;

/// Errors encountered while loading a neural amplifier model from disk.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    /// The file could not be read.
    #[error("failed to read model file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was not valid JSON, or not shaped like an RTNeural model.
    #[error("failed to parse model file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The model's layer shapes didn't match any known `ModelVariant`.
    #[error(
        "model architecture not recognized: first layer type {layer_type:?}, \
         hidden size {hidden:?}, input size {input_size:?}"
    )]
    UnrecognizedArchitecture {
        layer_type: Option<String>,
        hidden: Option<usize>,
        input_size: Option<usize>,
    },

    /// A layer's flattened weight count didn't match its declared shape.
    #[error("layer {index} has malformed weights: expected {expected} values, found {found}")]
    MalformedWeights {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// `in_skip` was something other than 0 or 1.
    #[error("unsupported in_skip value {value}, only 0 or 1 is supported")]
    UnsupportedInputSkip { value: u32 },
}
