//! Neural amplifier model loading and real-time dispatch.
//!
//! Loads RTNeural-style JSON model files, identifies which of a closed set
//! of recurrent architectures they describe, and runs the matching forward
//! pass sample-by-sample on the audio thread with no allocation.

mod cell;
mod descriptor;
mod error;
mod variant;

pub use cell::CellKind;
pub use descriptor::ModelDescriptor;
pub use error::ModelLoadError;
pub use variant::{DynamicModel, ModelVariant};

use std::path::Path;

/// Load a model file and build the [`DynamicModel`] wrapper around it, with
/// the gain staging and skip connection declared in the file itself
/// (`in_skip`, `in_gain`, `out_gain`).
pub fn load_model(path: impl AsRef<Path>) -> Result<DynamicModel, ModelLoadError> {
    let desc = ModelDescriptor::load(path)?;
    let (input_skip, input_gain, output_gain) =
        (desc.input_skip, desc.input_gain, desc.output_gain);
    let variant = ModelVariant::from_descriptor(desc)?;
    Ok(DynamicModel::new(variant, input_skip, input_gain, output_gain))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_model_roundtrips_a_minimal_gru_file() {
        let hidden = 8;
        let input_size = 1;
        let gates = 3;
        let json = serde_json::json!({
            "in_shape": [null, input_size],
            "layers": [
                {
                    "type": "gru",
                    "shape": [null, hidden],
                    "weights": vec![vec![0.1f32; input_size]; gates * hidden],
                    "recurrent_weights": vec![vec![0.0f32; hidden]; gates * hidden],
                    "biases": vec![vec![0.0f32; gates * hidden]],
                },
                {
                    "type": "dense",
                    "shape": [null, 1],
                    "weights": vec![vec![0.2f32; hidden]],
                    "biases": vec![vec![0.0f32]],
                },
            ],
        });

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{json}").unwrap();

        let mut model = load_model(file.path()).unwrap();
        assert!(model.is_loaded());
        let out = model.process(1.0, 0.0, 0.0);
        assert!(out.is_finite());
    }

    #[test]
    fn load_model_propagates_missing_file_error() {
        let result = load_model("/nonexistent/model.json");
        assert!(matches!(result, Err(ModelLoadError::ReadFile { .. })));
    }
}
