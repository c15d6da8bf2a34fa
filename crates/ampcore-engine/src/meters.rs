//! Input/output peak metering, throttled to roughly 60 Hz for host display.
//!
//! The audio thread only ever accumulates a running peak and increments a
//! frame counter; the relatively expensive parts (publishing a value a GUI
//! thread can read, resetting on request) happen at most once every
//! `meter_max_frame_count` samples.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

const METER_TARGET_HZ: f32 = 60.0;

fn frames_per_publish(sample_rate: f32) -> u32 {
    (sample_rate / METER_TARGET_HZ).round().max(1.0) as u32
}

/// Peak input/output metering plus the "is a model/cabinet currently in the
/// signal path" flags the host surface reports alongside them.
pub struct Meters {
    max_frame_count: u32,
    frame_counter: u32,
    input_accum: f32,
    output_accum: f32,
    published_input: AtomicU32,
    published_output: AtomicU32,
    model_in_use: AtomicBool,
    cab_in_use: AtomicBool,
    reset_pending: AtomicBool,
}

impl Meters {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            max_frame_count: frames_per_publish(sample_rate),
            frame_counter: 0,
            input_accum: 0.0,
            output_accum: 0.0,
            published_input: AtomicU32::new(0.0f32.to_bits()),
            published_output: AtomicU32::new(0.0f32.to_bits()),
            model_in_use: AtomicBool::new(false),
            cab_in_use: AtomicBool::new(false),
            reset_pending: AtomicBool::new(false),
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.max_frame_count = frames_per_publish(sample_rate);
        self.frame_counter = 0;
    }

    /// Called once per sample with the raw input and final output levels.
    /// Accumulates peaks and publishes/resets on the throttled boundary.
    pub fn observe(&mut self, input: f32, output: f32) {
        self.input_accum = self.input_accum.max(input.abs());
        self.output_accum = self.output_accum.max(output.abs());
        self.frame_counter += 1;

        if self.frame_counter >= self.max_frame_count {
            self.published_input.store(self.input_accum.to_bits(), Ordering::Relaxed);
            self.published_output.store(self.output_accum.to_bits(), Ordering::Relaxed);
            self.input_accum = 0.0;
            self.output_accum = 0.0;
            self.frame_counter = 0;
        }
    }

    pub fn input_peak(&self) -> f32 {
        f32::from_bits(self.published_input.load(Ordering::Relaxed))
    }

    pub fn output_peak(&self) -> f32 {
        f32::from_bits(self.published_output.load(Ordering::Relaxed))
    }

    pub fn set_model_in_use(&self, in_use: bool) {
        self.model_in_use.store(in_use, Ordering::Relaxed);
    }

    pub fn set_cab_in_use(&self, in_use: bool) {
        self.cab_in_use.store(in_use, Ordering::Relaxed);
    }

    pub fn model_in_use(&self) -> bool {
        self.model_in_use.load(Ordering::Relaxed)
    }

    pub fn cab_in_use(&self) -> bool {
        self.cab_in_use.load(Ordering::Relaxed)
    }

    /// Request a meter reset from the control surface (`"reset-meters"`
    /// state key). Applied on the next sample the audio thread processes.
    pub fn request_reset(&self) {
        self.reset_pending.store(true, Ordering::Relaxed);
    }

    /// Checked once per buffer on the audio thread: if a reset was
    /// requested, clears accumulated and published peaks and returns `true`.
    pub fn take_reset_pending(&mut self) -> bool {
        if self.reset_pending.swap(false, Ordering::Relaxed) {
            self.input_accum = 0.0;
            self.output_accum = 0.0;
            self.frame_counter = 0;
            self.published_input.store(0.0f32.to_bits(), Ordering::Relaxed);
            self.published_output.store(0.0f32.to_bits(), Ordering::Relaxed);
            true
        } else {
            false
        }
    }
}
