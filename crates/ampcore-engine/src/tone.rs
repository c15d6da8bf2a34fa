//! Five-band tone stack plus pre/master gain staging.
//!
//! Mirrors a classic passive tone stack in the digital domain: bass/mid/
//! treble controls around a fixed "depth" and "presence" pair, each band a
//! single RBJ biquad, driven by the same smoothed-parameter machinery the
//! pregain and master controls use.

use ampcore_dsp::gain::GainStage;
use ampcore_dsp::{
    Biquad, bandpass_coefficients, highpass_coefficients, highshelf_coefficients,
    lowpass_coefficients, lowshelf_coefficients, peaking_eq_coefficients,
};

const DC_BLOCK_HZ: f32 = 20.0;
const DEPTH_HZ: f32 = 75.0;
const PRESENCE_HZ: f32 = 900.0;
const SHELF_Q: f32 = 0.707;
const PREGAIN_MIN_DB: f32 = -12.0;
const PREGAIN_MAX_DB: f32 = 3.0;
const MASTER_MIN_DB: f32 = -15.0;
const MASTER_MAX_DB: f32 = 15.0;
const GAIN_SMOOTHING_MS: f32 = 1000.0;

/// Which shape the mid-band control takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidType {
    /// Peaking EQ centered at the mid frequency.
    Peak,
    /// Constant-0dB bandpass centered at the mid frequency (a more aggressive
    /// "scooped" voicing when used in place of the peak).
    Bandpass,
}

/// Where the tone stack sits relative to the neural model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqPosition {
    /// Tone stack runs on the model's output.
    Post,
    /// Tone stack runs on the model's input.
    Pre,
}

/// Bass/mid/treble/depth/presence tone stack with pre- and master-gain
/// staging, modeled after a passive guitar amp tone control network.
pub struct ToneStack {
    sample_rate: f32,

    pub pregain: GainStage,
    pub master: GainStage,

    pub net_bypass: bool,
    pub eq_bypass: bool,
    pub eq_pos: EqPosition,
    pub mid_type: MidType,

    dc_block: Biquad,
    input_lpf: Biquad,
    bass: Biquad,
    mid: Biquad,
    treble: Biquad,
    depth: Biquad,
    presence: Biquad,

    bass_hz: f32,
    bass_db: f32,
    mid_hz: f32,
    mid_q: f32,
    mid_db: f32,
    treble_hz: f32,
    treble_db: f32,
    depth_db: f32,
    presence_db: f32,

    input_lpf_hz: f32,
    input_lpf_amount: f32,
}

impl ToneStack {
    pub fn new(sample_rate: f32) -> Self {
        let mut stack = Self {
            sample_rate,
            pregain: GainStage::new(sample_rate, PREGAIN_MIN_DB, PREGAIN_MAX_DB, GAIN_SMOOTHING_MS),
            master: GainStage::new(sample_rate, MASTER_MIN_DB, MASTER_MAX_DB, GAIN_SMOOTHING_MS),
            net_bypass: false,
            eq_bypass: false,
            eq_pos: EqPosition::Post,
            mid_type: MidType::Peak,
            dc_block: Biquad::new(),
            input_lpf: Biquad::new(),
            bass: Biquad::new(),
            mid: Biquad::new(),
            treble: Biquad::new(),
            depth: Biquad::new(),
            presence: Biquad::new(),
            bass_hz: 150.0,
            bass_db: 0.0,
            mid_hz: 800.0,
            mid_q: 1.0,
            mid_db: 0.0,
            treble_hz: 2000.0,
            treble_db: 0.0,
            depth_db: 0.0,
            presence_db: 0.0,
            input_lpf_hz: sample_rate * 0.5 * 0.99,
            input_lpf_amount: 100.0,
        };
        stack.recompute_dc_block();
        stack.recompute_input_lpf();
        stack.recompute_bass();
        stack.recompute_mid();
        stack.recompute_treble();
        stack.recompute_depth();
        stack.recompute_presence();
        stack
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.pregain.set_sample_rate(sample_rate);
        self.master.set_sample_rate(sample_rate);
        self.recompute_dc_block();
        self.set_input_lpf_amount(self.input_lpf_amount);
        self.recompute_bass();
        self.recompute_mid();
        self.recompute_treble();
        self.recompute_depth();
        self.recompute_presence();
    }

    fn recompute_dc_block(&mut self) {
        let (b0, b1, b2, a0, a1, a2) = highpass_coefficients(DC_BLOCK_HZ, SHELF_Q, self.sample_rate);
        self.dc_block.set_coefficients(b0, b1, b2, a0, a1, a2);
    }

    /// `amount` in `[0, 100]`, mapped linearly to `[0.25, 0.99] * nyquist`
    /// per the antialiasing/input-lowpass parameter.
    pub fn set_input_lpf_amount(&mut self, amount: f32) {
        self.input_lpf_amount = amount.clamp(0.0, 100.0);
        let t = self.input_lpf_amount / 100.0;
        let nyquist = self.sample_rate * 0.5;
        self.input_lpf_hz = (0.25 + t * (0.99 - 0.25)) * nyquist;
        self.recompute_input_lpf();
    }

    pub fn input_lpf_amount(&self) -> f32 {
        self.input_lpf_amount
    }

    fn recompute_input_lpf(&mut self) {
        let (b0, b1, b2, a0, a1, a2) =
            lowpass_coefficients(self.input_lpf_hz, SHELF_Q, self.sample_rate);
        self.input_lpf.set_coefficients(b0, b1, b2, a0, a1, a2);
    }

    pub fn set_bass(&mut self, db: f32, hz: f32) {
        self.bass_db = db;
        self.bass_hz = hz;
        self.recompute_bass();
    }

    fn recompute_bass(&mut self) {
        let (b0, b1, b2, a0, a1, a2) =
            lowshelf_coefficients(self.bass_hz, SHELF_Q, self.bass_db, self.sample_rate);
        self.bass.set_coefficients(b0, b1, b2, a0, a1, a2);
    }

    pub fn set_mid(&mut self, db: f32, hz: f32, q: f32) {
        self.mid_db = db;
        self.mid_hz = hz;
        self.mid_q = q;
        self.recompute_mid();
    }

    pub fn set_mid_type(&mut self, mid_type: MidType) {
        self.mid_type = mid_type;
        self.recompute_mid();
    }

    fn recompute_mid(&mut self) {
        let (b0, b1, b2, a0, a1, a2) = match self.mid_type {
            MidType::Peak => {
                peaking_eq_coefficients(self.mid_hz, self.mid_q, self.mid_db, self.sample_rate)
            }
            MidType::Bandpass => bandpass_coefficients(self.mid_hz, self.mid_q, self.sample_rate),
        };
        self.mid.set_coefficients(b0, b1, b2, a0, a1, a2);
    }

    pub fn set_treble(&mut self, db: f32, hz: f32) {
        self.treble_db = db;
        self.treble_hz = hz;
        self.recompute_treble();
    }

    fn recompute_treble(&mut self) {
        let (b0, b1, b2, a0, a1, a2) =
            highshelf_coefficients(self.treble_hz, SHELF_Q, self.treble_db, self.sample_rate);
        self.treble.set_coefficients(b0, b1, b2, a0, a1, a2);
    }

    pub fn set_depth(&mut self, db: f32) {
        self.depth_db = db;
        self.recompute_depth();
    }

    fn recompute_depth(&mut self) {
        let (b0, b1, b2, a0, a1, a2) =
            peaking_eq_coefficients(DEPTH_HZ, SHELF_Q, self.depth_db, self.sample_rate);
        self.depth.set_coefficients(b0, b1, b2, a0, a1, a2);
    }

    pub fn set_presence(&mut self, db: f32) {
        self.presence_db = db;
        self.recompute_presence();
    }

    fn recompute_presence(&mut self) {
        let (b0, b1, b2, a0, a1, a2) =
            highshelf_coefficients(PRESENCE_HZ, SHELF_Q, self.presence_db, self.sample_rate);
        self.presence.set_coefficients(b0, b1, b2, a0, a1, a2);
    }

    pub fn bass_db(&self) -> f32 {
        self.bass_db
    }

    pub fn bass_hz(&self) -> f32 {
        self.bass_hz
    }

    pub fn mid_db(&self) -> f32 {
        self.mid_db
    }

    pub fn mid_hz(&self) -> f32 {
        self.mid_hz
    }

    pub fn mid_q(&self) -> f32 {
        self.mid_q
    }

    pub fn treble_db(&self) -> f32 {
        self.treble_db
    }

    pub fn treble_hz(&self) -> f32 {
        self.treble_hz
    }

    pub fn depth_db(&self) -> f32 {
        self.depth_db
    }

    pub fn presence_db(&self) -> f32 {
        self.presence_db
    }

    /// DC-blocking highpass, invoked directly by the pipeline independent of
    /// `eq_bypass`.
    #[inline]
    pub fn dc_block(&mut self, sample: f32) -> f32 {
        self.dc_block.process(sample)
    }

    /// Antialiasing input lowpass, invoked directly by the pipeline
    /// independent of `eq_bypass`.
    #[inline]
    pub fn input_lpf(&mut self, sample: f32) -> f32 {
        self.input_lpf.process(sample)
    }

    /// Run the part of the tone stack governed by `eq_bypass`. In `Peak` mid
    /// mode this is the full `depth -> bass -> mid -> treble -> presence`
    /// chain; in `Bandpass` mode the mid band is voiced aggressively enough
    /// that it stands alone, skipping the other four bands.
    #[inline]
    pub fn apply_eq(&mut self, sample: f32) -> f32 {
        match self.mid_type {
            MidType::Peak => {
                let s = self.depth.process(sample);
                let s = self.bass.process(s);
                let s = self.mid.process(s);
                let s = self.treble.process(s);
                self.presence.process(s)
            }
            MidType::Bandpass => self.mid.process(sample),
        }
    }

    pub fn reset(&mut self) {
        self.dc_block.clear();
        self.input_lpf.clear();
        self.bass.clear();
        self.mid.clear();
        self.treble.clear();
        self.depth.clear();
        self.presence.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_gain_eq_is_near_identity_on_dc() {
        let mut stack = ToneStack::new(48000.0);
        let mut out = 0.0;
        for _ in 0..4000 {
            out = stack.apply_eq(1.0);
        }
        assert!((out - 1.0).abs() < 0.1, "got {out}");
    }

    #[test]
    fn bandpass_mode_skips_the_other_bands() {
        let mut with_bass = ToneStack::new(48000.0);
        with_bass.set_mid_type(MidType::Bandpass);
        with_bass.set_bass(8.0, 150.0);
        with_bass.set_depth(8.0);

        let mut without_bass = ToneStack::new(48000.0);
        without_bass.set_mid_type(MidType::Bandpass);

        let input: Vec<f32> = (0..256).map(|i| ((i as f32) * 0.2).sin()).collect();
        let out_with: Vec<f32> = input.iter().map(|&x| with_bass.apply_eq(x)).collect();
        let out_without: Vec<f32> = input.iter().map(|&x| without_bass.apply_eq(x)).collect();

        for (a, b) in out_with.iter().zip(out_without.iter()) {
            assert!((a - b).abs() < 1e-6, "bass/depth gain leaked into bandpass mode: {a} vs {b}");
        }
    }

    #[test]
    fn bass_boost_raises_dc_level() {
        let mut stack = ToneStack::new(48000.0);
        stack.set_bass(8.0, 150.0);
        let mut out = 0.0;
        for _ in 0..4000 {
            out = stack.apply_eq(1.0);
        }
        assert!(out > 1.3, "got {out}");
    }

    #[test]
    fn bandpass_mid_type_attenuates_dc_unlike_peak() {
        let mut peak_stack = ToneStack::new(48000.0);
        peak_stack.set_mid(6.0, 800.0, 1.0);
        let mut peak_dc = 0.0;
        for _ in 0..4000 {
            peak_dc = peak_stack.mid.process(1.0);
        }

        let mut bp_stack = ToneStack::new(48000.0);
        bp_stack.set_mid(6.0, 800.0, 1.0);
        bp_stack.set_mid_type(MidType::Bandpass);
        let mut bp_dc = 0.0;
        for _ in 0..4000 {
            bp_dc = bp_stack.mid.process(1.0);
        }

        assert!(peak_dc.abs() > 0.5, "got {peak_dc}");
        assert!(bp_dc.abs() < 0.1, "got {bp_dc}");
    }

    #[test]
    fn input_lpf_amount_maps_into_expected_range() {
        let mut stack = ToneStack::new(48000.0);
        stack.set_input_lpf_amount(0.0);
        assert!((stack.input_lpf_hz - 0.25 * 24000.0).abs() < 1.0);
        stack.set_input_lpf_amount(100.0);
        assert!((stack.input_lpf_hz - 0.99 * 24000.0).abs() < 1.0);
    }

    #[test]
    fn pregain_and_master_clamp_to_their_ranges() {
        let mut stack = ToneStack::new(48000.0);
        stack.pregain.set_db(100.0);
        assert!((stack.pregain.db() - PREGAIN_MAX_DB).abs() < 0.01);
        stack.master.set_db(-100.0);
        assert!((stack.master.db() - MASTER_MIN_DB).abs() < 0.01);
    }

    #[test]
    fn sample_rate_change_preserves_input_lpf_amount() {
        let mut stack = ToneStack::new(48000.0);
        stack.set_input_lpf_amount(40.0);
        stack.set_sample_rate(96000.0);
        assert_eq!(stack.input_lpf_amount(), 40.0);
        assert!((stack.input_lpf_hz - (0.25 + 0.4 * 0.74) * 48000.0).abs() < 1.0);
    }
}
