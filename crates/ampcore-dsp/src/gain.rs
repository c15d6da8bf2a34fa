//! Gain staging helpers shared by the pre-gain and master-gain controls.
//!
//! Both controls follow the same shape: a dB-ranged parameter, clamped on
//! set, smoothed in the linear domain so the audio-path multiply stays a
//! single multiplication per sample.
//!
//! # Usage
//!
//! ```rust
//! use ampcore_dsp::gain::GainStage;
//!
//! let mut pregain = GainStage::new(48000.0, -12.0, 3.0, 10.0);
//! pregain.set_db(0.0);
//! assert!((pregain.db() - 0.0).abs() < 0.1);
//! ```

use crate::{ParamDescriptor, SmoothedParam, db_to_linear, linear_to_db};

/// A dB-ranged gain control backed by a [`SmoothedParam`] in the linear domain.
#[derive(Debug, Clone)]
pub struct GainStage {
    param: SmoothedParam,
    min_db: f32,
    max_db: f32,
}

impl GainStage {
    /// Create a gain stage clamped to `[min_db, max_db]`, smoothed over
    /// `smoothing_time_ms` milliseconds, starting at 0 dB.
    pub fn new(sample_rate: f32, min_db: f32, max_db: f32, smoothing_time_ms: f32) -> Self {
        Self {
            param: SmoothedParam::with_config(1.0, sample_rate, smoothing_time_ms),
            min_db,
            max_db,
        }
    }

    /// Set the target gain from dB, clamped to the configured range.
    #[inline]
    pub fn set_db(&mut self, db: f32) {
        self.param
            .set_target(db_to_linear(db.clamp(self.min_db, self.max_db)));
    }

    /// Read the target gain as dB.
    #[inline]
    pub fn db(&self) -> f32 {
        linear_to_db(self.param.target())
    }

    /// Advance the smoother and return the next linear gain multiplier.
    #[inline]
    pub fn next(&mut self) -> f32 {
        self.param.advance()
    }

    /// Update the sample rate (recomputes the smoothing coefficient).
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.param.set_sample_rate(sample_rate);
    }
}

/// A [`ParamDescriptor`] for a dB-ranged gain control with the given bounds.
pub fn db_range_descriptor(
    name: &'static str,
    short_name: &'static str,
    min_db: f32,
    max_db: f32,
) -> ParamDescriptor {
    ParamDescriptor::gain_db(name, short_name, min_db, max_db, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gain_stage_roundtrip() {
        let mut stage = GainStage::new(48000.0, -12.0, 3.0, 10.0);
        stage.set_db(-6.0);
        assert!((stage.db() - (-6.0)).abs() < 0.01);
    }

    #[test]
    fn gain_stage_clamps() {
        let mut stage = GainStage::new(48000.0, -12.0, 3.0, 10.0);
        stage.set_db(-50.0);
        assert!((stage.db() - (-12.0)).abs() < 0.01);
        stage.set_db(50.0);
        assert!((stage.db() - 3.0).abs() < 0.01);
    }

    #[test]
    fn gain_stage_converges() {
        let mut stage = GainStage::new(48000.0, -15.0, 15.0, 10.0);
        stage.set_db(6.0);
        let mut out = 1.0;
        for _ in 0..4800 {
            out = stage.next();
        }
        assert!((out - db_to_linear(6.0)).abs() < 0.01, "got {out}");
    }
}
