//! Property-based tests for ampcore-dsp primitives.
//!
//! Tests filter stability and parameter convergence using proptest for
//! randomized input generation.

use ampcore_dsp::{
    Biquad, SmoothedParam, bandpass_coefficients, highpass_coefficients, lowpass_coefficients,
    notch_coefficients,
};
use proptest::prelude::*;

/// Biquad coefficient generators indexed 0..4 (LP, HP, BP, Notch).
fn configure_biquad(biquad: &mut Biquad, variant: usize, freq: f32, q: f32) {
    let sr = 48000.0;
    let (b0, b1, b2, a0, a1, a2) = match variant % 4 {
        0 => lowpass_coefficients(freq, q, sr),
        1 => highpass_coefficients(freq, q, sr),
        2 => bandpass_coefficients(freq, q, sr),
        3 => notch_coefficients(freq, q, sr),
        _ => unreachable!(),
    };
    biquad.set_coefficients(b0, b1, b2, a0, a1, a2);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// For any valid cutoff (20-20000 Hz) and Q (0.1-10.0), Biquad filters
    /// produce finite output for 1024 samples of random finite input.
    #[test]
    fn biquad_stability(
        freq in 20.0f32..20000.0f32,
        q in 0.1f32..10.0f32,
        variant in 0usize..4,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut biquad = Biquad::new();
        configure_biquad(&mut biquad, variant, freq, q);

        for &sample in &input {
            let out = biquad.process(sample);
            prop_assert!(
                out.is_finite(),
                "Biquad variant {} (freq={}, q={}) produced non-finite output {} for input {}",
                variant % 4, freq, q, out, sample
            );
        }
    }

    /// SmoothedParam converges toward its target value.
    ///
    /// f32 precision limits exact convergence for large values. The one-pole
    /// smoothing `current += coeff * (target - current)` stalls when the step
    /// rounds to zero in f32. The precision floor is approximately
    /// `ULP(target) / coeff ≈ |target| * 2^-23 / 0.00208 ≈ |target| * 5.7e-5`.
    /// We verify convergence within this f32 precision bound.
    #[test]
    fn smoothed_param_convergence(
        initial in -100.0f32..100.0f32,
        target in -100.0f32..100.0f32,
    ) {
        let mut param = SmoothedParam::with_config(initial, 48000.0, 10.0);
        param.set_target(target);

        // 10000 samples (~208ms) is sufficient for the smoothing to reach
        // the f32 precision floor for any value in [-100, 100].
        for _ in 0..10000 {
            param.advance();
        }

        let ulp_estimate = target.abs() * f32::EPSILON;
        let precision_floor = ulp_estimate / 0.002 + 1e-4;
        let diff = (param.get() - target).abs();
        prop_assert!(
            diff < precision_floor,
            "SmoothedParam did not converge: initial={}, target={}, got={}, diff={}, tol={}",
            initial, target, param.get(), diff, precision_floor
        );
    }

    /// The biquad transfer function is linear: scaling the input scales the
    /// output by the same factor once the transient settles.
    #[test]
    fn biquad_is_linear(
        freq in 100.0f32..10000.0f32,
        q in 0.3f32..5.0f32,
        scale in 0.1f32..4.0f32,
    ) {
        let sr = 48000.0;
        let (b0, b1, b2, a0, a1, a2) = lowpass_coefficients(freq, q, sr);

        let mut unit = Biquad::new();
        unit.set_coefficients(b0, b1, b2, a0, a1, a2);
        let mut scaled = Biquad::new();
        scaled.set_coefficients(b0, b1, b2, a0, a1, a2);

        for n in 0..2000 {
            let input = libm::sinf(core::f32::consts::TAU * 440.0 * n as f32 / sr);
            let out_unit = unit.process(input);
            let out_scaled = scaled.process(input * scale);
            if n > 500 {
                prop_assert!(
                    (out_scaled - out_unit * scale).abs() < 1e-2,
                    "Linearity violated at sample {}: {} != {} * {}",
                    n, out_scaled, out_unit, scale
                );
            }
        }
    }
}
