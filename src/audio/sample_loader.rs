//! Clip file decoding.
//!
//! Clips are decoded once at startup into interleaved f32 buffers that
//! already match the output device's channel count and sample rate, so the
//! audio thread only ever copies samples.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use symphonia::core::{
    audio::SampleBuffer, codecs::DecoderOptions, errors::Error as SymphoniaError,
    formats::FormatOptions, io::MediaSourceStream, meta::MetadataOptions, probe::Hint,
};
use symphonia::default::{get_codecs, get_probe};
use tracing::debug;

use super::clip::Clip;
use super::errors::SampleLoadError;

/// Input block size for the sinc resampler
const RESAMPLE_CHUNK: usize = 1024;

/// Decode a clip file into a buffer with the requested layout.
///
/// # Errors
///
/// - file missing or unreadable
/// - format not recognized, or no default track
/// - unsupported channel mapping (only mono<->stereo)
/// - resampler failure
pub fn load_clip(
    path: &Path,
    output_channels: usize,
    output_rate_hz: u32,
) -> Result<Clip, SampleLoadError> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or(SampleLoadError::NoDefaultTrack)?;
    let track_id = track.id;
    let file_rate_hz = track
        .codec_params
        .sample_rate
        .ok_or(SampleLoadError::MissingSampleRate)?;
    let file_channels = track
        .codec_params
        .channels
        .ok_or(SampleLoadError::MissingChannels)?
        .count();

    let mut decoder = get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut decoded: Vec<f32> = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(err) => return Err(SampleLoadError::Decode(err)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let audio_buf = match decoder.decode(&packet) {
            Ok(buf) => buf,
            // Corrupt packet: drop it and keep going
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(err) => return Err(SampleLoadError::Decode(err)),
        };
        let spec = *audio_buf.spec();
        let duration = audio_buf.capacity() as u64;

        let mut sample_buf = SampleBuffer::<f32>::new(duration, spec);
        sample_buf.copy_interleaved_ref(audio_buf);
        decoded.extend_from_slice(sample_buf.samples());
    }

    let mapped = map_channels(decoded, file_channels, output_channels)?;
    let resampled = resample(mapped, output_channels, file_rate_hz, output_rate_hz)?;

    debug!(
        path = %path.display(),
        file_rate_hz,
        file_channels,
        frames = resampled.len() / output_channels.max(1),
        "Decoded clip"
    );

    Ok(Clip::new(output_channels, Arc::from(resampled.into_boxed_slice())))
}

/// Convert interleaved samples between channel layouts.
///
/// Mono to stereo duplicates, stereo to mono averages. Anything else is an
/// error.
pub fn map_channels(
    samples: Vec<f32>,
    file_channels: usize,
    output_channels: usize,
) -> Result<Vec<f32>, SampleLoadError> {
    if file_channels == output_channels {
        return Ok(samples);
    }

    match (file_channels, output_channels) {
        (1, 2) => {
            let mut out = Vec::with_capacity(samples.len() * 2);
            for s in samples {
                out.push(s);
                out.push(s);
            }
            Ok(out)
        }
        (2, 1) => {
            let mut out = Vec::with_capacity(samples.len() / 2);
            for frame in samples.chunks_exact(2) {
                out.push((frame[0] + frame[1]) * 0.5);
            }
            Ok(out)
        }
        _ => Err(SampleLoadError::UnsupportedChannels {
            file_channels,
            output_channels,
        }),
    }
}

/// Resample interleaved audio from `from_hz` to `to_hz`.
///
/// The result holds exactly `round(frames * to_hz / from_hz)` frames. Frame 0
/// of the output lines up with frame 0 of the input, so a clip's attack stays
/// at its start.
pub fn resample(
    samples: Vec<f32>,
    channels: usize,
    from_hz: u32,
    to_hz: u32,
) -> Result<Vec<f32>, SampleLoadError> {
    if from_hz == to_hz || channels == 0 || samples.is_empty() {
        return Ok(samples);
    }

    let ratio = to_hz as f64 / from_hz as f64;
    let frames = samples.len() / channels;
    let expected = (frames as f64 * ratio).round() as usize;

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        oversampling_factor: 128,
        interpolation: SincInterpolationType::Linear,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, RESAMPLE_CHUNK, channels)?;

    // Deinterleave
    let mut planar: Vec<Vec<f32>> = vec![Vec::with_capacity(frames); channels];
    for frame in samples.chunks_exact(channels) {
        for (ch, sample) in frame.iter().enumerate() {
            planar[ch].push(*sample);
        }
    }

    let mut output: Vec<Vec<f32>> = vec![Vec::with_capacity(expected); channels];
    let mut position = 0;
    while frames - position >= resampler.input_frames_next() {
        let needed = resampler.input_frames_next();
        let chunk: Vec<&[f32]> = planar
            .iter()
            .map(|ch| &ch[position..position + needed])
            .collect();
        let block = resampler.process(&chunk, None)?;
        append(block, &mut output);
        position += needed;
    }

    if position < frames {
        let chunk: Vec<&[f32]> = planar.iter().map(|ch| &ch[position..]).collect();
        let block = resampler.process_partial(Some(chunk.as_slice()), None)?;
        append(block, &mut output);
    }

    // Flush whatever is still buffered in the filter
    while output[0].len() < expected {
        let block = resampler.process_partial::<Vec<f32>>(None, None)?;
        if block.first().is_none_or(|b| b.is_empty()) {
            break;
        }
        append(block, &mut output);
    }

    let mut interleaved = Vec::with_capacity(expected * channels);
    for frame in 0..expected {
        for ch in &output {
            interleaved.push(ch.get(frame).copied().unwrap_or(0.0));
        }
    }

    Ok(interleaved)
}

fn append(block: Vec<Vec<f32>>, output: &mut [Vec<f32>]) {
    for (out, chunk) in output.iter_mut().zip(block) {
        out.extend_from_slice(&chunk);
    }
}
