//! Integration tests for phonoscope-io loading and metadata.

use phonoscope_io::{
    Error, WavSpec, audio_info, decode_file, load_audio, probe_info, write_wav,
};
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn sine_wave(sample_rate: u32, freq_hz: f32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| 0.5 * (2.0 * std::f32::consts::PI * freq_hz * i as f32 / sample_rate as f32).sin())
        .collect()
}

fn temp_with_suffix(suffix: &str) -> NamedTempFile {
    Builder::new().suffix(suffix).tempfile().unwrap()
}

// ---------------------------------------------------------------------------
// WAV loading
// ---------------------------------------------------------------------------

#[test]
fn load_mono_wav_16_bit() {
    let sr = 16000;
    let samples = sine_wave(sr, 220.0, sr as usize);
    let file = temp_with_suffix(".wav");
    write_wav(
        file.path(),
        &samples,
        WavSpec {
            channels: 1,
            sample_rate: sr,
            bits_per_sample: 16,
        },
    )
    .unwrap();

    let audio = load_audio(file.path()).unwrap();
    assert_eq!(audio.sample_rate, sr);
    assert_eq!(audio.channels, 1);
    assert_eq!(audio.codec, "pcm_s16le");
    assert_eq!(audio.samples.len(), samples.len());
    assert!((audio.duration_secs() - 1.0).abs() < 1e-9);

    for (a, b) in samples.iter().zip(audio.samples.iter()) {
        assert!((a - b).abs() < 1e-3);
    }
}

#[test]
fn load_float_wav() {
    let samples = sine_wave(44100, 440.0, 4410);
    let file = temp_with_suffix(".wav");
    write_wav(
        file.path(),
        &samples,
        WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 32,
        },
    )
    .unwrap();

    let audio = load_audio(file.path()).unwrap();
    assert_eq!(audio.codec, "pcm_f32le");
    assert_eq!(audio.samples, samples);
}

#[test]
fn empty_wav_is_rejected() {
    let file = temp_with_suffix(".wav");
    write_wav(file.path(), &[], WavSpec::default()).unwrap();

    match load_audio(file.path()) {
        Err(Error::Empty { path }) => assert_eq!(path, file.path()),
        other => panic!("expected Empty, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// symphonia path
// ---------------------------------------------------------------------------

#[test]
fn symphonia_decodes_stereo_to_channel_average() {
    let frames = 2000;
    let interleaved: Vec<f32> = (0..frames).flat_map(|_| [0.5, -0.1]).collect();
    let file = temp_with_suffix(".wav");
    write_wav(
        file.path(),
        &interleaved,
        WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
        },
    )
    .unwrap();

    let audio = decode_file(file.path()).unwrap();
    assert_eq!(audio.sample_rate, 8000);
    assert_eq!(audio.channels, 2);
    assert_eq!(audio.samples.len(), frames);
    assert!(audio.codec.starts_with("pcm"), "{}", audio.codec);
    for &s in &audio.samples {
        assert!((s - 0.2).abs() < 1e-3, "{s}");
    }

    // the hound path agrees
    let hound = load_audio(file.path()).unwrap();
    assert_eq!(hound.samples.len(), audio.samples.len());
    for (a, b) in hound.samples.iter().zip(audio.samples.iter()) {
        assert!((a - b).abs() < 1e-4);
    }

    let info = probe_info(file.path()).unwrap();
    assert_eq!(info.channels, 2);
    assert_eq!(info.sample_rate, 8000);
    assert_eq!(info.num_frames, Some(frames as u64));
}

#[test]
fn garbage_is_rejected() {
    let mut file = temp_with_suffix(".mp3");
    file.write_all(b"this is not an audio file at all").unwrap();
    file.flush().unwrap();

    assert!(load_audio(file.path()).is_err());
    assert!(audio_info(file.path()).is_err());
}

#[test]
fn wav_info_without_decoding() {
    let file = temp_with_suffix(".wav");
    write_wav(
        file.path(),
        &vec![0.0; 11025],
        WavSpec {
            channels: 1,
            sample_rate: 22050,
            bits_per_sample: 24,
        },
    )
    .unwrap();

    let info = audio_info(file.path()).unwrap();
    assert_eq!(info.codec, "pcm_s24le");
    assert_eq!(info.channels, 1);
    assert_eq!(info.sample_rate, 22050);
    assert_eq!(info.num_frames, Some(11025));
    assert!((info.duration_secs.unwrap() - 0.5).abs() < 1e-9);
}
