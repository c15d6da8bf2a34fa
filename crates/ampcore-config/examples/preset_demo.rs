//! Preset round-trip demo: build a preset, serialize it to TOML, and load
//! it back.
//!
//! Run with: cargo run -p ampcore-config --example preset_demo

use ampcore_config::Preset;

fn main() {
    let preset = Preset::new("Bedroom Crunch")
        .with_parameter("PREGAIN", 6.0)
        .with_parameter("BASS", 2.0)
        .with_parameter("MID", -1.5)
        .with_parameter("TREBLE", 3.0)
        .with_parameter("MASTER", -3.0)
        .with_model_path("models/crunch.json")
        .with_cabinet_path("cabinets/4x12.wav");

    println!("Preset: {}", preset.name);
    println!("Parameters:");
    for (name, value) in &preset.parameters {
        println!("  {name}: {value}");
    }
    println!("Model:   {}", preset.model_path.as_deref().unwrap_or("(none)"));
    println!("Cabinet: {}", preset.cabinet_path.as_deref().unwrap_or("(none)"));

    let toml = preset.to_toml().unwrap();
    println!("\n--- Serialized TOML ---\n{toml}");

    let loaded = Preset::from_toml(&toml).unwrap();
    assert_eq!(loaded, preset);
    println!("Round-trip through TOML matched.");
}
