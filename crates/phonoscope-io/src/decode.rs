//! Compressed-format decoding through symphonia.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer as InterleavedBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, CodecParameters, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::loader::{AudioInfo, DecodedAudio};
use crate::wav::mix_to_mono;
use crate::{Error, Result};

fn open_format(path: &Path) -> Result<Box<dyn FormatReader>> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension() {
        hint.with_extension(&ext.to_string_lossy());
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    Ok(probed.format)
}

fn audio_track(format: &dyn FormatReader) -> Result<(u32, CodecParameters)> {
    format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .map(|t| (t.id, t.codec_params.clone()))
        .ok_or(Error::NoTrack)
}

fn codec_name(params: &CodecParameters) -> String {
    symphonia::default::get_codecs()
        .get_codec(params.codec)
        .map_or_else(|| "unknown".to_string(), |d| d.short_name.to_string())
}

/// Read stream parameters without decoding any packet.
pub fn probe_info<P: AsRef<Path>>(path: P) -> Result<AudioInfo> {
    let format = open_format(path.as_ref())?;
    let (_, params) = audio_track(format.as_ref())?;
    let sample_rate = params.sample_rate.ok_or(Error::UnknownSampleRate)?;
    let channels = params.channels.map_or(1, |c| c.count() as u16);

    Ok(AudioInfo {
        codec: codec_name(&params),
        channels,
        sample_rate,
        num_frames: params.n_frames,
        duration_secs: params
            .n_frames
            .map(|n| n as f64 / f64::from(sample_rate)),
    })
}

/// Decode the first audio track of any container symphonia recognises.
///
/// Corrupt packets are skipped; channels are averaged to mono.
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<DecodedAudio> {
    let path = path.as_ref();
    let mut format = open_format(path)?;
    let (track_id, params) = audio_track(format.as_ref())?;
    let sample_rate = params.sample_rate.ok_or(Error::UnknownSampleRate)?;
    // containers may omit the layout; decoded buffers always carry it
    let mut channels = params.channels.map_or(1, |c| c.count());
    let codec = codec_name(&params);

    let mut decoder =
        symphonia::default::get_codecs().make(&params, &DecoderOptions::default())?;

    let mut interleaved: Vec<f32> = Vec::new();
    let mut skipped = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(_)) => {
                skipped += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        channels = spec.channels.count();
        let mut buf = InterleavedBuffer::<f32>::new(decoded.frames() as u64, spec);
        buf.copy_interleaved_ref(decoded);
        interleaved.extend_from_slice(buf.samples());
    }

    if skipped > 0 {
        tracing::warn!(skipped, path = %path.display(), "skipped undecodable packets");
    }

    let samples = mix_to_mono(interleaved, channels);
    tracing::debug!(
        codec = %codec,
        channels,
        sample_rate,
        samples = samples.len(),
        "decoded"
    );

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels: channels as u16,
        codec,
    })
}
