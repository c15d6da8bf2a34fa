//! Integration tests for ampcore-io audio file loading.

use ampcore_io::{WavSpec, load_audio_mono, read_wav, write_wav};
use tempfile::NamedTempFile;

#[test]
fn write_then_load_mono_round_trips() {
    let samples: Vec<f32> = (0..4800)
        .map(|i| (i as f32 / 4800.0 * std::f32::consts::TAU).sin() * 0.5)
        .collect();
    let spec = WavSpec {
        channels: 1,
        sample_rate: 48000,
        bits_per_sample: 32,
    };

    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &samples, spec).unwrap();

    let loaded = load_audio_mono(file.path(), 48000).unwrap();
    assert_eq!(loaded.len(), samples.len());
    for (a, b) in samples.iter().zip(loaded.iter()) {
        assert!((a - b).abs() < 1e-5);
    }
}

#[test]
fn load_audio_mono_resamples_to_target_rate() {
    let samples: Vec<f32> = (0..4410)
        .map(|i| (i as f32 / 44100.0 * 1000.0 * std::f32::consts::TAU).sin())
        .collect();
    let spec = WavSpec {
        channels: 1,
        sample_rate: 44100,
        bits_per_sample: 32,
    };

    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &samples, spec).unwrap();

    let loaded = load_audio_mono(file.path(), 48000).unwrap();
    let expected_len = (4410usize * 160).div_ceil(147);
    assert_eq!(loaded.len(), expected_len);
}

#[test]
fn read_wav_downmixes_to_first_channel() {
    use hound::{SampleFormat, WavWriter};

    let left: Vec<f32> = (0..100).map(|i| i as f32 / 100.0).collect();
    let interleaved: Vec<f32> = left.iter().flat_map(|&l| [l, -l]).collect();

    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: 48000,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let file = NamedTempFile::new().unwrap();
    let mut writer = WavWriter::create(file.path(), spec).unwrap();
    for &s in &interleaved {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();

    let (loaded, loaded_spec) = read_wav(file.path()).unwrap();
    assert_eq!(loaded_spec.channels, 2);
    assert_eq!(loaded.len(), left.len());
    for (a, b) in left.iter().zip(loaded.iter()) {
        assert!((a - b).abs() < 1e-6);
    }
}
