//! Real-time amplifier engine: the tone stack, hot-swappable neural model and
//! cabinet convolution, and the parameter/state surface a host or CLI drives
//! them through.
//!
//! [`Engine`] owns everything on the audio thread. Model and cabinet loading
//! happen on the control thread and are published into the audio path via
//! [`HotSwap`]; all other parameters are plain fields written directly
//! through [`ampcore_dsp::ParameterInfo`].

mod assets;
mod audiofile;
mod denormals;
mod engine;
mod error;
mod hotswap;
mod meters;
mod params;
mod state;
mod tone;

pub use audiofile::AudioFilePlayer;
pub use engine::Engine;
pub use error::{CabinetLoadError, EngineError};
pub use hotswap::{HotSwap, Prewarm};
pub use meters::Meters;
pub use params::ParamIndex;
pub use state::{StateKey, StateValue};
pub use tone::{EqPosition, MidType, ToneStack};
