//! Unified WAV/FLAC loading for cabinet impulse responses and input files.

use crate::resample::resample_to_rate;
use crate::{flac, wav};
use std::path::Path;

/// Detect FLAC by the last 5 bytes of the path, case-insensitively.
fn is_flac_path(path: &Path) -> bool {
    path.to_str()
        .map(|s| s.to_ascii_lowercase().ends_with(".flac"))
        .unwrap_or(false)
}

/// Load an audio file as mono f32 samples at `target_sample_rate`.
///
/// Dispatches on file extension (WAV vs FLAC), downmixes multi-channel files
/// to the first channel, and resamples if the file's native rate differs from
/// `target_sample_rate`.
pub fn load_audio_mono<P: AsRef<Path>>(path: P, target_sample_rate: u32) -> crate::Result<Vec<f32>> {
    let path = path.as_ref();
    let (samples, native_rate) = if is_flac_path(path) {
        flac::read_flac(path)?
    } else {
        let (samples, spec) = wav::read_wav(path)?;
        (samples, spec.sample_rate)
    };

    Ok(resample_to_rate(&samples, native_rate, target_sample_rate))
}
