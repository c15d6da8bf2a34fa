//! Rational resampling for impulse responses loaded at a foreign sample rate.
//!
//! Implements polyphase FIR resampling using windowed-sinc lowpass filters with
//! Blackman windowing, supporting arbitrary P/Q rate conversion (e.g.
//! 44100 -> 48000 Hz via P=160, Q=147).
//!
//! # Theory
//!
//! Resampling by rational factor P/Q is equivalent to upsampling by P, applying
//! a lowpass filter at `min(1/P, 1/Q)` (normalized frequency), then downsampling
//! by Q. The polyphase decomposition avoids explicit zero-insertion by computing
//! only the output samples actually needed.
//!
//! Reference: P. P. Vaidyanathan, *Multirate Systems and Filter Banks*, Prentice
//! Hall, 1993, Chapter 4.

use std::f32::consts::PI;

/// Compute windowed-sinc lowpass FIR coefficients, normalized to unity DC gain.
fn design_lowpass(num_taps: usize, cutoff: f32) -> Vec<f32> {
    if num_taps == 0 {
        return Vec::new();
    }

    let m = num_taps - 1;
    let mut coeffs = Vec::with_capacity(num_taps);

    for n in 0..num_taps {
        let x = n as f32 - m as f32 / 2.0;

        let sinc = if x.abs() < 1e-7 {
            cutoff
        } else {
            (PI * cutoff * x).sin() / (PI * x)
        };

        let window = if m == 0 {
            1.0
        } else {
            let phase = 2.0 * PI * n as f32 / m as f32;
            0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos()
        };

        coeffs.push(sinc * window);
    }

    let sum: f32 = coeffs.iter().sum();
    if sum.abs() > 1e-10 {
        for c in coeffs.iter_mut() {
            *c /= sum;
        }
    }

    coeffs
}

/// Compute the greatest common divisor of two integers.
fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// Rational resampling by the factor P/Q.
///
/// Converts a signal from one sample rate to another by the rational ratio
/// P/Q, where P is the upsampling factor and Q is the downsampling factor.
/// The output length is `ceil(input.len() * P / Q)`.
pub fn resample(signal: &[f32], p: usize, q: usize) -> Vec<f32> {
    assert!(p >= 1, "upsample factor P must be >= 1");
    assert!(q >= 1, "downsample factor Q must be >= 1");

    let g = gcd(p, q);
    let p = p / g;
    let q = q / g;

    if p == 1 && q == 1 {
        return signal.to_vec();
    }

    let num_taps = 4 * p.max(q) * 10 + 1;
    let cutoff = 0.9 / p.max(q) as f32;
    let prototype = design_lowpass(num_taps, cutoff);

    let out_len = (signal.len() * p).div_ceil(q);
    let taps_per_phase = num_taps.div_ceil(p);

    let mut polyphase = vec![vec![0.0f32; taps_per_phase]; p];
    for (tap_idx, &coeff) in prototype.iter().enumerate() {
        let k = tap_idx % p;
        let i = tap_idx / p;
        polyphase[k][i] = coeff;
    }

    let mut output = Vec::with_capacity(out_len);

    for m in 0..out_len {
        let full_idx = m * q;
        let n = full_idx / p;
        let k = full_idx % p;

        let sub_filter = &polyphase[k];
        let mut acc = 0.0f32;
        for (i, &coeff) in sub_filter.iter().enumerate() {
            if n >= i && (n - i) < signal.len() {
                acc += coeff * signal[n - i];
            }
        }

        output.push(acc * p as f32);
    }

    output
}

/// Resample `signal` from `from_hz` to `to_hz`, reducing the ratio to an
/// integer P/Q pair via a fixed-precision rational approximation.
///
/// Returns the signal unchanged if the two rates already match.
pub fn resample_to_rate(signal: &[f32], from_hz: u32, to_hz: u32) -> Vec<f32> {
    if from_hz == to_hz {
        return signal.to_vec();
    }
    let g = gcd(from_hz as usize, to_hz as usize);
    resample(signal, to_hz as usize / g, from_hz as usize / g)
}
