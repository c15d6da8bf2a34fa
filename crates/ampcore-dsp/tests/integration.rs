//! Integration tests for ampcore-dsp primitives.
//!
//! Verifies DSP accuracy using signal-level measurements: sine wave analysis
//! for filters and parameter convergence timing.

use ampcore_dsp::{
    Biquad, SmoothedParam, highpass_coefficients, highshelf_coefficients, lowpass_coefficients,
    lowshelf_coefficients,
};

const SAMPLE_RATE: f32 = 48000.0;
const TAU: f32 = core::f32::consts::TAU;

/// Generate a sine wave buffer at the given frequency and sample rate.
fn generate_sine(freq_hz: f32, sample_rate: f32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|n| libm::sinf(TAU * freq_hz * n as f32 / sample_rate))
        .collect()
}

/// Measure RMS amplitude of a signal buffer.
fn rms(signal: &[f32]) -> f32 {
    let sum_sq: f32 = signal.iter().map(|&s| s * s).sum();
    libm::sqrtf(sum_sq / signal.len() as f32)
}

/// Convert linear amplitude to dB.
fn to_db(linear: f32) -> f32 {
    20.0 * libm::log10f(linear.max(1e-10))
}

// ============================================================================
// 1. Filter frequency responses
// ============================================================================

/// Feed a sine wave through a filter and measure the output amplitude relative
/// to a passband reference. Returns gain in dB.
fn measure_biquad_response(biquad: &mut Biquad, freq_hz: f32) -> f32 {
    let num_samples = 4800; // 100ms at 48kHz — enough to settle a 2nd-order filter
    let settle_samples = 2400;
    let input = generate_sine(freq_hz, SAMPLE_RATE, num_samples);
    let mut output = vec![0.0_f32; num_samples];
    biquad.clear();
    for (i, &s) in input.iter().enumerate() {
        output[i] = biquad.process(s);
    }
    let input_rms = rms(&input[settle_samples..]);
    let output_rms = rms(&output[settle_samples..]);
    to_db(output_rms / input_rms)
}

#[test]
fn biquad_lowpass_frequency_response() {
    let cutoff = 1000.0;
    let (b0, b1, b2, a0, a1, a2) = lowpass_coefficients(cutoff, 0.707, SAMPLE_RATE);
    let mut biquad = Biquad::new();
    biquad.set_coefficients(b0, b1, b2, a0, a1, a2);

    for &freq in &[50.0, 100.0, 200.0, 500.0] {
        let gain_db = measure_biquad_response(&mut biquad, freq);
        assert!(
            gain_db.abs() < 1.0,
            "Lowpass passband: {freq} Hz should be ~0 dB, got {gain_db:.1} dB"
        );
    }

    for &freq in &[4000.0, 8000.0, 16000.0] {
        let gain_db = measure_biquad_response(&mut biquad, freq);
        assert!(
            gain_db < -6.0,
            "Lowpass stopband: {freq} Hz should be attenuated, got {gain_db:.1} dB"
        );
    }

    let gain_at_cutoff = measure_biquad_response(&mut biquad, cutoff);
    assert!(
        (gain_at_cutoff - (-3.0)).abs() < 1.5,
        "Lowpass at cutoff: expected ~-3 dB, got {gain_at_cutoff:.1} dB"
    );
}

#[test]
fn biquad_highpass_frequency_response() {
    let cutoff = 2000.0;
    let (b0, b1, b2, a0, a1, a2) = highpass_coefficients(cutoff, 0.707, SAMPLE_RATE);
    let mut biquad = Biquad::new();
    biquad.set_coefficients(b0, b1, b2, a0, a1, a2);

    for &freq in &[8000.0, 12000.0, 16000.0, 20000.0] {
        let gain_db = measure_biquad_response(&mut biquad, freq);
        assert!(
            gain_db.abs() < 1.0,
            "Highpass passband: {freq} Hz should be ~0 dB, got {gain_db:.1} dB"
        );
    }

    for &freq in &[100.0, 200.0, 500.0] {
        let gain_db = measure_biquad_response(&mut biquad, freq);
        assert!(
            gain_db < -6.0,
            "Highpass stopband: {freq} Hz should be attenuated, got {gain_db:.1} dB"
        );
    }
}

#[test]
fn biquad_lowshelf_boosts_bass_only() {
    let cutoff = 200.0;
    let (b0, b1, b2, a0, a1, a2) = lowshelf_coefficients(cutoff, 0.707, 6.0, SAMPLE_RATE);
    let mut biquad = Biquad::new();
    biquad.set_coefficients(b0, b1, b2, a0, a1, a2);

    let bass_gain = measure_biquad_response(&mut biquad, 40.0);
    assert!(
        bass_gain > 3.0,
        "Low-shelf should boost bass, got {bass_gain:.1} dB"
    );

    biquad.clear();
    let treble_gain = measure_biquad_response(&mut biquad, 10000.0);
    assert!(
        treble_gain.abs() < 1.0,
        "Low-shelf should leave treble ~flat, got {treble_gain:.1} dB"
    );
}

#[test]
fn biquad_highshelf_boosts_treble_only() {
    let cutoff = 4000.0;
    let (b0, b1, b2, a0, a1, a2) = highshelf_coefficients(cutoff, 0.707, 6.0, SAMPLE_RATE);
    let mut biquad = Biquad::new();
    biquad.set_coefficients(b0, b1, b2, a0, a1, a2);

    let treble_gain = measure_biquad_response(&mut biquad, 16000.0);
    assert!(
        treble_gain > 3.0,
        "High-shelf should boost treble, got {treble_gain:.1} dB"
    );

    biquad.clear();
    let bass_gain = measure_biquad_response(&mut biquad, 60.0);
    assert!(
        bass_gain.abs() < 1.0,
        "High-shelf should leave bass ~flat, got {bass_gain:.1} dB"
    );
}

// ============================================================================
// 2. SmoothedParam convergence timing
// ============================================================================

/// Count samples until the param reaches within `threshold` of its target.
fn count_convergence_samples(param: &mut SmoothedParam, target: f32, threshold: f32) -> usize {
    param.set_target(target);
    let mut count = 0;
    for _ in 0..100_000 {
        param.advance();
        count += 1;
        if (param.get() - target).abs() < threshold {
            return count;
        }
    }
    count
}

#[test]
fn smoothed_param_ten_ms_convergence() {
    // 10ms time constant: 5*tau = 50ms = 2400 samples at 48kHz.
    let mut param = SmoothedParam::with_config(0.0, SAMPLE_RATE, 10.0);
    let samples = count_convergence_samples(&mut param, 1.0, 0.01);
    let expected = (SAMPLE_RATE * 0.050) as usize;
    let tolerance = (expected as f32 * 0.2) as usize;
    assert!(
        samples <= expected + tolerance,
        "converged in {samples} samples, expected ~{expected} (+/-{tolerance})"
    );
    assert!(
        samples >= expected / 3,
        "converged too quickly in {samples} samples, expected ~{expected}"
    );
}

#[test]
fn smoothed_param_one_time_constant_reaches_63_percent() {
    let tau_ms = 10.0;
    let mut param = SmoothedParam::with_config(0.0, SAMPLE_RATE, tau_ms);
    param.set_target(1.0);

    let tau_samples = (SAMPLE_RATE * tau_ms / 1000.0) as usize;
    for _ in 0..tau_samples {
        param.advance();
    }

    let expected = 1.0 - libm::expf(-1.0); // ~0.6321
    assert!(
        (param.get() - expected).abs() < 0.05,
        "After one time constant, expected ~{expected:.3}, got {:.3}",
        param.get()
    );
}

// ============================================================================
// 3. Smoother-driven cutoff sweeps
// ============================================================================

#[test]
fn smoothed_param_applied_to_biquad_cutoff_has_bounded_jumps() {
    // A parameter-driven cutoff sweep should not create output discontinuities
    // beyond what the step itself would create without smoothing.
    let mut cutoff_param = SmoothedParam::with_config(500.0, SAMPLE_RATE, 10.0);
    cutoff_param.set_target(5000.0);
    let mut biquad = Biquad::new();

    let mut max_jump = 0.0_f32;
    let mut prev = 0.0_f32;

    for n in 0..4800 {
        let cutoff = cutoff_param.advance();
        let (b0, b1, b2, a0, a1, a2) = lowpass_coefficients(cutoff, 0.707, SAMPLE_RATE);
        biquad.set_coefficients(b0, b1, b2, a0, a1, a2);
        let input = libm::sinf(TAU * 440.0 * n as f32 / SAMPLE_RATE);
        let output = biquad.process(input);

        if n > 10 {
            let jump = (output - prev).abs();
            if jump > max_jump {
                max_jump = jump;
            }
        }
        prev = output;
    }

    assert!(
        max_jump < 0.5,
        "Smoothed cutoff sweep produced jump of {max_jump:.3}"
    );
}
