//! Standalone looping playback of a mono audio file, for the CLI harness
//! (hosts that supply their own live input don't use this).

use std::path::Path;
use std::sync::Arc;

/// A mono sample buffer that plays back on loop, one sample per call.
pub struct AudioFilePlayer {
    buffer: Arc<[f32]>,
    current_frame: usize,
}

impl AudioFilePlayer {
    /// Load `path` at `sample_rate`, downmixing/resampling as
    /// [`ampcore_io::load_audio_mono`] does.
    pub fn load(path: impl AsRef<Path>, sample_rate: u32) -> ampcore_io::Result<Self> {
        let samples = ampcore_io::load_audio_mono(path, sample_rate)?;
        Ok(Self::from_samples(samples))
    }

    pub fn from_samples(samples: Vec<f32>) -> Self {
        Self { buffer: samples.into(), current_frame: 0 }
    }

    pub fn num_frames(&self) -> usize {
        self.buffer.len()
    }

    /// Returns the next sample, wrapping back to the start of the buffer.
    /// Silence if the buffer is empty.
    pub fn next_sample(&mut self) -> f32 {
        if self.buffer.is_empty() {
            return 0.0;
        }
        let sample = self.buffer[self.current_frame];
        self.current_frame = (self.current_frame + 1) % self.buffer.len();
        sample
    }

    pub fn reset(&mut self) {
        self.current_frame = 0;
    }
}
