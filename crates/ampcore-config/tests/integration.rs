//! Integration tests for ampcore-config preset round-trips.

use ampcore_config::Preset;
use tempfile::TempDir;

#[test]
fn save_and_load_round_trips_full_parameter_surface() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("crunch.toml");

    let original = Preset::new("Bedroom Crunch")
        .with_parameter("pregain_db", 6.0)
        .with_parameter("bass_db", 2.0)
        .with_parameter("mid_db", -1.5)
        .with_parameter("treble_db", 3.0)
        .with_parameter("presence_db", 0.0)
        .with_parameter("master_db", -3.0)
        .with_parameter("bypass_mix", 0.0)
        .with_model_path("models/crunch.json")
        .with_cabinet_path("cabinets/4x12.wav");

    original.save(&path).unwrap();
    let loaded = Preset::load(&path).unwrap();

    assert_eq!(loaded, original);
}

#[test]
fn save_creates_missing_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deep").join("preset.toml");

    let preset = Preset::new("Nested").with_parameter("master_db", 0.0);
    preset.save(&path).unwrap();

    assert!(path.exists());
    let loaded = Preset::load(&path).unwrap();
    assert_eq!(loaded, preset);
}

#[test]
fn loading_missing_file_returns_error() {
    let result = Preset::load("/nonexistent/path/preset.toml");
    assert!(result.is_err());
}
