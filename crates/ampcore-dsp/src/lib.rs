//! Ampcore DSP - core building blocks for the amplifier emulation pipeline.
//!
//! This crate provides the small, fixed set of DSP primitives the amp engine
//! is built from: biquad filters (including the low/high-shelf sections the
//! tone stack needs) and the parameter smoothers that keep automation and
//! bypass transitions zipper-free.
//!
//! # Core Abstractions
//!
//! ## Parameter Smoothing
//!
//! - [`SmoothedParam`] - exponential (one-pole) smoothing
//! - [`LinearSmoothedParam`] - constant-rate linear smoothing
//!
//! ## Filters
//!
//! - [`Biquad`] - second-order IIR filter (Direct Form I) with RBJ cookbook
//!   coefficient generators for lowpass, highpass, bandpass, notch, peaking EQ,
//!   and low/high shelf.
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! ampcore-dsp = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod biquad;
pub mod gain;
pub mod math;
pub mod param;
pub mod param_info;

pub use biquad::{
    Biquad, bandpass_coefficients, highpass_coefficients, highshelf_coefficients,
    lowpass_coefficients, lowshelf_coefficients, notch_coefficients, peaking_eq_coefficients,
};
pub use gain::{GainStage, db_range_descriptor};
pub use math::{clamp, db_to_linear, flush_denormal, hz_to_omega, linear_to_db, wet_dry_mix};
pub use param::{LinearSmoothedParam, SmoothedParam};
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamScale, ParamUnit, ParameterInfo};
