//! Preset management for the ampcore amplifier engine.
//!
//! A [`Preset`] captures the full live parameter surface plus the currently
//! loaded model and cabinet paths, so a host application or CLI can save and
//! restore a complete amp setting rather than just individual floats.
//!
//! # Example
//!
//! ```rust,no_run
//! use ampcore_config::Preset;
//!
//! let preset = Preset::new("Bedroom Crunch")
//!     .with_parameter("pregain_db", 6.0)
//!     .with_parameter("master_db", -3.0)
//!     .with_model_path("models/crunch.json");
//!
//! preset.save("presets/crunch.toml").unwrap();
//! let loaded = Preset::load("presets/crunch.toml").unwrap();
//! assert_eq!(loaded.name, "Bedroom Crunch");
//! ```

mod error;
mod preset;

pub use error::ConfigError;
pub use preset::Preset;
