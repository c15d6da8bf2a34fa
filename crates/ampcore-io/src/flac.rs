//! FLAC file reading via `claxon`.

use crate::{Error, Result};
use std::path::Path;

/// Read a FLAC file and return mono samples along with the sample rate.
///
/// Multi-channel files are downmixed by taking the first channel only, to
/// match [`crate::wav::read_wav`]'s behavior.
pub fn read_flac<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, u32)> {
    let mut reader =
        claxon::FlacReader::open(path.as_ref()).map_err(|e| Error::Flac(e.to_string()))?;
    let info = reader.streaminfo();
    let channels = info.channels as usize;
    let max_val = (1i64 << (info.bits_per_sample - 1)) as f32;

    let mut samples = Vec::with_capacity(info.samples.unwrap_or(0) as usize);
    for (i, sample) in reader.samples().enumerate() {
        if channels > 1 && i % channels != 0 {
            continue;
        }
        let sample = sample.map_err(|e| Error::Flac(e.to_string()))?;
        samples.push(sample as f32 / max_val);
    }

    Ok((samples, info.sample_rate))
}
