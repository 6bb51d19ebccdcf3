//! Format dispatch: one call from a path to mono samples.

use std::path::Path;

use crate::decode::{decode_file, probe_info};
use crate::wav::{WavFormat, read_wav, read_wav_info};
use crate::{Error, Result};

/// A recording decoded to mono.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    /// Mono samples, nominally in [-1, 1]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Channel count of the source before mixdown
    pub channels: u16,
    /// Short codec name ("pcm_s16le", "mp3", ...)
    pub codec: String,
}

impl DecodedAudio {
    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }
}

/// Container metadata, read without decoding audio.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioInfo {
    /// Short codec name
    pub codec: String,
    /// Number of channels
    pub channels: u16,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Frames per channel, when the container declares it
    pub num_frames: Option<u64>,
    /// Duration in seconds, when known
    pub duration_secs: Option<f64>,
}

fn is_wav(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav") || ext.eq_ignore_ascii_case("wave"))
}

/// Load any supported audio file as mono samples.
///
/// WAV files go through hound; if hound rejects the file (for example an
/// extensible-format header it does not handle) symphonia gets a second try.
/// Everything else goes straight to symphonia.
pub fn load_audio<P: AsRef<Path>>(path: P) -> Result<DecodedAudio> {
    let path = path.as_ref();

    let audio = if is_wav(path) {
        match read_wav(path) {
            Ok((samples, spec)) => DecodedAudio {
                samples,
                sample_rate: spec.sample_rate,
                channels: spec.channels,
                codec: wav_codec_name(spec.bits_per_sample),
            },
            Err(Error::Wav(err)) => {
                tracing::debug!(error = %err, "hound rejected WAV, retrying with symphonia");
                decode_file(path)?
            }
            Err(err) => return Err(err),
        }
    } else {
        decode_file(path)?
    };

    if audio.samples.is_empty() {
        return Err(Error::Empty {
            path: path.to_path_buf(),
        });
    }

    tracing::info!(
        path = %path.display(),
        codec = %audio.codec,
        channels = audio.channels,
        sample_rate = audio.sample_rate,
        duration_secs = audio.duration_secs(),
        "loaded audio"
    );

    Ok(audio)
}

fn wav_codec_name(bits: u16) -> String {
    if bits == 32 {
        "pcm_f32le".to_string()
    } else {
        format!("pcm_s{bits}le")
    }
}

/// Read container metadata of any supported audio file.
pub fn audio_info<P: AsRef<Path>>(path: P) -> Result<AudioInfo> {
    let path = path.as_ref();

    if is_wav(path)
        && let Ok(info) = read_wav_info(path)
    {
        let codec = match info.format {
            WavFormat::IeeeFloat => format!("pcm_f{}le", info.bits_per_sample),
            WavFormat::Pcm => format!("pcm_s{}le", info.bits_per_sample),
        };
        return Ok(AudioInfo {
            codec,
            channels: info.channels,
            sample_rate: info.sample_rate,
            num_frames: Some(info.num_frames),
            duration_secs: Some(info.duration_secs),
        });
    }

    probe_info(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_extension_is_case_insensitive() {
        assert!(is_wav(Path::new("take1.WAV")));
        assert!(is_wav(Path::new("dir/take1.wav")));
        assert!(!is_wav(Path::new("take1.mp3")));
        assert!(!is_wav(Path::new("wav")));
    }

    #[test]
    fn duration_from_samples() {
        let audio = DecodedAudio {
            samples: vec![0.0; 24000],
            sample_rate: 16000,
            channels: 1,
            codec: "pcm_s16le".into(),
        };
        assert!((audio.duration_secs() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_audio("/nonexistent/phonoscope/take.wav").is_err());
        assert!(load_audio("/nonexistent/phonoscope/take.mp3").is_err());
    }
}
