//! Parameter smoothers: the one-pole exponential smoother the amp uses for
//! gains, and a clamped linear ramp for crossfades.
//!
//! Both run once per sample on the audio thread, are denormal-safe under
//! `flush_denormal`, and never allocate. [`SmoothedParam`] carries the amp's
//! three fixed gain smoothers — `param1`/`param2` and the cabinet crossfade
//! gain at `tau = 0.1 s`, the global bypass crossfade at `tau = 0.25 s` — and
//! [`LinearSmoothedParam`] backs anything that needs a bounded-time,
//! exactly-converging ramp instead of an asymptotic decay.
//!
//! ```rust
//! use ampcore_dsp::SmoothedParam;
//!
//! // Cabinet crossfade gain: tau = 0.1 s, as in the amp's signal chain.
//! let mut cabsim_gain = SmoothedParam::new(0.0);
//! cabsim_gain.set_sample_rate(48000.0);
//! cabsim_gain.set_smoothing_time_ms(100.0);
//!
//! cabsim_gain.set_target(1.0);
//! for _ in 0..480 {
//!     let _gain_this_sample = cabsim_gain.advance();
//! }
//! ```

use libm::expf;

/// A gain smoothed by a one-pole low-pass filter with time constant `tau`.
///
/// This backs `param1`/`param2` and the cabinet crossfade gain (`tau = 0.1 s`
/// each) and the global bypass crossfade gain (`tau = 0.25 s`). The
/// exponential decay never fully reaches the target; [`Self::is_settled`]
/// treats "within 1e-6" as arrived, which at these tau values happens well
/// before 5*tau (the point where a one-pole reaches 99.3%).
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    /// Current smoothed value
    current: f32,
    /// Target value we're smoothing towards
    target: f32,
    /// Smoothing coefficient (0 = instant, ~1 = very slow)
    coeff: f32,
    /// Sample rate in Hz
    sample_rate: f32,
    /// Smoothing time in milliseconds
    smoothing_time_ms: f32,
}

impl SmoothedParam {
    /// Create a new smoothed parameter with initial value.
    ///
    /// Smoothing is disabled by default (instant changes). Call
    /// [`set_sample_rate`](Self::set_sample_rate) and
    /// [`set_smoothing_time_ms`](Self::set_smoothing_time_ms) to enable.
    ///
    /// # Arguments
    /// * `initial` - Initial parameter value
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            coeff: 0.0, // No smoothing until configured
            sample_rate: 44100.0,
            smoothing_time_ms: 0.0,
        }
    }

    /// Create a smoothed parameter with full configuration.
    ///
    /// # Arguments
    /// * `initial` - Initial parameter value
    /// * `sample_rate` - Sample rate in Hz
    /// * `smoothing_time_ms` - Smoothing time constant in milliseconds
    pub fn with_config(initial: f32, sample_rate: f32, smoothing_time_ms: f32) -> Self {
        let mut param = Self::new(initial);
        param.sample_rate = sample_rate;
        param.smoothing_time_ms = smoothing_time_ms;
        param.recalculate_coeff();
        param
    }

    /// Set the target value (parameter will smooth towards this).
    ///
    /// The parameter will exponentially approach this value over the
    /// configured smoothing time.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Set target and immediately snap to it (no smoothing).
    ///
    /// Useful for initialization or when you explicitly want instant changes.
    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.current = value;
    }

    /// Update sample rate and recalculate smoothing coefficient.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coeff();
    }

    /// Set smoothing time in milliseconds.
    ///
    /// Typical values:
    /// - 0.0 ms: No smoothing (instant)
    /// - 5-10 ms: Fast, good for gain/pan
    /// - 20-50 ms: Medium, good for filter cutoff
    /// - 100+ ms: Slow, for gradual transitions
    pub fn set_smoothing_time_ms(&mut self, time_ms: f32) {
        self.smoothing_time_ms = time_ms;
        self.recalculate_coeff();
    }

    /// Get the next smoothed value (advances by one sample).
    ///
    /// Call this once per sample in your audio processing loop.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        // One-pole lowpass: y[n] = y[n-1] + coeff * (target - y[n-1])
        // Equivalent to: y[n] = (1-coeff) * y[n-1] + coeff * target
        self.current = self.current + self.coeff * (self.target - self.current);
        self.current
    }

    /// Get the current smoothed value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Get the target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Check if the parameter has reached its target (within epsilon).
    ///
    /// Useful for knowing when smoothing is complete.
    #[inline]
    pub fn is_settled(&self) -> bool {
        (self.current - self.target).abs() < 1e-6
    }

    /// Skip ahead to the target value immediately.
    ///
    /// Useful for resetting state or when the difference is negligible.
    #[inline]
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
    }

    /// Recalculate the smoothing coefficient from sample rate and smoothing time.
    ///
    /// The coefficient controls the speed of the one-pole lowpass filter that
    /// smooths parameter transitions. The derivation:
    ///
    /// A one-pole lowpass has the difference equation:
    ///   `y[n] = y[n-1] + coeff * (target - y[n-1])`
    ///
    /// This is equivalent to `y[n] = (1-coeff) * y[n-1] + coeff * target`,
    /// a first-order IIR with pole at `(1-coeff)`. The time constant tau
    /// (time to reach 63.2% of target) relates to the coefficient by:
    ///
    ///   `coeff = 1 - exp(-1 / (tau * sample_rate))`
    ///
    /// where `tau = smoothing_time_ms / 1000`. After 5*tau, the parameter
    /// reaches 99.3% of the target -- effectively settled for audio purposes.
    ///
    /// When smoothing_time_ms is 0, coeff is set to 1.0 for instant response.
    fn recalculate_coeff(&mut self) {
        if self.smoothing_time_ms <= 0.0 || self.sample_rate <= 0.0 {
            self.coeff = 1.0; // Instant (no smoothing)
        } else {
            // Time constant in seconds
            let time_constant = self.smoothing_time_ms / 1000.0;
            // Samples per time constant
            let samples = time_constant * self.sample_rate;
            // One-pole coefficient
            self.coeff = 1.0 - expf(-1.0 / samples);
        }
    }
}

impl Default for SmoothedParam {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// A parameter with linear smoothing (constant rate of change).
///
/// Unlike the exponential smoother, this reaches its target exactly: `step`
/// is fixed at the moment `set_target` is called, and `advance` walks
/// `current` toward `target` by at most `|step|` per sample, clamping once
/// it arrives rather than overshooting and oscillating.
#[derive(Debug, Clone)]
pub struct LinearSmoothedParam {
    /// Current value
    current: f32,
    /// Target value
    target: f32,
    /// Per-sample step toward target, fixed when the target is set
    step: f32,
    /// Time to cross the full range from current to target, in seconds
    tau: f32,
    /// Sample rate in Hz
    sample_rate: f32,
}

impl LinearSmoothedParam {
    /// Create a new linear smoothed parameter with a 10 ms ramp time.
    pub fn new(initial: f32) -> Self {
        Self::with_config(initial, 44100.0, 0.010)
    }

    /// Create with full configuration. `tau` is the ramp duration in seconds.
    pub fn with_config(initial: f32, sample_rate: f32, tau: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            step: 0.0,
            tau,
            sample_rate,
        }
    }

    /// Set the target value, recomputing the per-sample step from the
    /// current distance to target so the ramp still takes `tau` seconds.
    pub fn set_target(&mut self, target: f32) {
        if (target - self.target).abs() < 1e-9 {
            return;
        }
        self.target = target;

        let denom = self.tau * self.sample_rate;
        if denom <= 0.0 {
            self.current = target;
            self.step = 0.0;
        } else {
            self.step = (target - self.current) / denom;
        }
    }

    /// Set value immediately.
    pub fn set_immediate(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.step = 0.0;
    }

    /// Update sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// Set the ramp duration in seconds. Takes effect on the next `set_target`.
    pub fn set_tau(&mut self, tau: f32) {
        self.tau = tau;
    }

    /// Advance by at most `|step|`, clamped so it never overshoots `target`.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        if self.step > 0.0 {
            self.current = (self.current + self.step).min(self.target);
        } else if self.step < 0.0 {
            self.current = (self.current + self.step).max(self.target);
        }
        if self.current == self.target {
            self.step = 0.0;
        }
        self.current
    }

    /// Get current value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Get target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Check if the ramp has reached its target exactly.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.step == 0.0
    }

    /// Snap to target immediately.
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
        self.step = 0.0;
    }
}

impl Default for LinearSmoothedParam {
    fn default() -> Self {
        Self::new(0.0)
    }
}
