//! The engine's string-keyed state surface: `"json"`, `"cabinet"`,
//! `"audiofile"`, `"reset-meters"`. Distinct from the numeric parameter
//! surface in [`crate::params`] since these carry file paths rather than
//! floats and only ever run on the control thread.

use crate::error::CabinetLoadError;
use std::path::{Path, PathBuf};

/// `true` if the state value names the built-in default rather than a file
/// on disk (`""` or the literal `"default"`).
fn wants_default(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case("default")
}

fn has_recognized_audio_extension(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref(),
        Some("wav" | "flac")
    )
}

/// Decode a cabinet impulse response from `path` at `sample_rate`, downmixed
/// and resampled like any other file load. Use [`crate::assets::default_cabinet_ir`]
/// for the `""`/`"default"` case instead of calling this with an empty path.
pub fn load_cabinet_ir(path: impl AsRef<Path>, sample_rate: u32) -> Result<Vec<f32>, CabinetLoadError> {
    let path = path.as_ref();
    if !has_recognized_audio_extension(path) {
        return Err(CabinetLoadError::UnsupportedExtension { path: path.to_path_buf() });
    }
    ampcore_io::load_audio_mono(path, sample_rate)
        .map_err(|source| CabinetLoadError::Decode { path: path.to_path_buf(), source })
}

/// One of the string-valued state keys a host or preset can set.
#[derive(Debug, Clone, PartialEq)]
pub enum StateKey {
    /// `"json"`: load a neural model from a file, or the built-in default.
    Model(StateValue),
    /// `"cabinet"`: load a cabinet impulse response from a file, or the
    /// built-in default.
    Cabinet(StateValue),
    /// `"audiofile"`: load a file for the standalone looping player.
    AudioFile(PathBuf),
    /// `"reset-meters"`: clear accumulated and published peak meters.
    ResetMeters,
}

/// Either the built-in default resource or a path to load from disk.
#[derive(Debug, Clone, PartialEq)]
pub enum StateValue {
    Default,
    Path(PathBuf),
}

impl From<&str> for StateValue {
    fn from(value: &str) -> Self {
        if wants_default(value) { StateValue::Default } else { StateValue::Path(PathBuf::from(value)) }
    }
}

/// Parse a `(key, value)` state pair as received from a host or preset file.
/// Unknown keys return `None`; the caller should log and ignore them rather
/// than treat the whole preset as invalid.
pub fn parse(key: &str, value: &str) -> Option<StateKey> {
    match key {
        "json" => Some(StateKey::Model(value.into())),
        "cabinet" => Some(StateKey::Cabinet(value.into())),
        "audiofile" => Some(StateKey::AudioFile(PathBuf::from(value))),
        "reset-meters" => Some(StateKey::ResetMeters),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_default_values_parse_to_the_default_variant() {
        assert_eq!(parse("json", ""), Some(StateKey::Model(StateValue::Default)));
        assert_eq!(parse("json", "default"), Some(StateKey::Model(StateValue::Default)));
        assert_eq!(parse("json", "DEFAULT"), Some(StateKey::Model(StateValue::Default)));
    }

    #[test]
    fn a_path_value_parses_to_the_path_variant() {
        assert_eq!(
            parse("cabinet", "cabs/4x12.wav"),
            Some(StateKey::Cabinet(StateValue::Path(PathBuf::from("cabs/4x12.wav"))))
        );
    }

    #[test]
    fn reset_meters_takes_no_value() {
        assert_eq!(parse("reset-meters", ""), Some(StateKey::ResetMeters));
    }

    #[test]
    fn unknown_key_is_none() {
        assert_eq!(parse("bogus", "x"), None);
    }

    #[test]
    fn unrecognized_extension_is_rejected_before_decoding() {
        let err = load_cabinet_ir("cab.xyz", 48000).unwrap_err();
        assert!(matches!(err, CabinetLoadError::UnsupportedExtension { .. }));
    }
}
