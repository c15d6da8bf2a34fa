//! Built-in default model and cabinet, used when the `"json"`/`"cabinet"`
//! state keys are set to `""` or `"default"`.

use ampcore_model::{DynamicModel, ModelLoadError};
use std::io::Write;

const DEFAULT_MODEL_JSON: &str = include_str!("../assets/default_model.json");
const DEFAULT_CABINET_WAV: &[u8] = include_bytes!("../assets/default_cabinet.wav");

/// Build the built-in default amplifier model.
pub fn default_model() -> Result<DynamicModel, ModelLoadError> {
    use ampcore_model::ModelDescriptor;
    let desc = ModelDescriptor::from_json_str(DEFAULT_MODEL_JSON)?;
    let (input_skip, input_gain, output_gain) =
        (desc.input_skip, desc.input_gain, desc.output_gain);
    let variant = ampcore_model::ModelVariant::from_descriptor(desc)?;
    Ok(DynamicModel::new(variant, input_skip, input_gain, output_gain))
}

/// Decode the built-in default cabinet impulse response as mono f32 samples
/// at `sample_rate`, downmixed and resampled exactly like a file load would
/// be. [`ampcore_io::read_wav`] only reads from a path, so the embedded
/// bytes are spilled to a temp file first.
pub fn default_cabinet_ir(sample_rate: u32) -> Result<Vec<f32>, crate::error::CabinetLoadError> {
    let mut file = tempfile::Builder::new().suffix(".wav").tempfile().map_err(|source| {
        crate::error::CabinetLoadError::Io { path: "<embedded default>".into(), source }
    })?;
    file.write_all(DEFAULT_CABINET_WAV).map_err(|source| crate::error::CabinetLoadError::Io {
        path: "<embedded default>".into(),
        source,
    })?;

    let (samples, spec) = ampcore_io::read_wav(file.path()).map_err(|source| {
        crate::error::CabinetLoadError::Decode { path: "<embedded default>".into(), source }
    })?;
    Ok(ampcore_io::resample_to_rate(&samples, spec.sample_rate, sample_rate))
}
