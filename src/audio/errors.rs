use std::sync::Arc;

use crossbeam_channel::Receiver;
use thiserror::Error;
use tracing::error;

use crate::types::pad::PadKey;

/// A trigger that could not start playback
///
/// Reported at the point of failure and logged; never retried and never
/// shown in the UI.
#[derive(Debug, Clone, Error)]
pub enum PlaybackError {
    /// The pad's clip was not loaded (missing file, undecodable, ...)
    #[error("clip for pad {key} is unavailable: {reason}")]
    ClipUnavailable { key: PadKey, reason: Arc<str> },

    /// The audio thread is gone or its trigger queue is full
    #[error("audio engine is not accepting triggers")]
    EngineUnavailable,

    /// The dispatcher was handed a pad that is not part of its bank
    #[error("pad {0} is not part of this kit")]
    UnknownPad(PadKey),
}

/// Errors that can occur while loading clip files
#[derive(Debug, Error)]
pub enum SampleLoadError {
    /// Failed to open the clip file
    #[error("failed to open file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to decode the clip file
    #[error("failed to decode audio file: {0}")]
    Decode(#[from] symphonia::core::errors::Error),

    /// Failed to create the resampler
    #[error("failed to create resampler: {0}")]
    ResamplerConstruction(#[from] rubato::ResamplerConstructionError),

    /// Failed to resample the decoded clip
    #[error("failed to resample audio: {0}")]
    Resample(#[from] rubato::ResampleError),

    #[error("audio file has no default track")]
    NoDefaultTrack,

    #[error("audio file is missing a sample rate")]
    MissingSampleRate,

    #[error("audio file is missing channel information")]
    MissingChannels,

    /// Only mono<->stereo conversion is supported
    #[error(
        "unsupported channel mapping: file has {file_channels} channels, output has {output_channels} channels"
    )]
    UnsupportedChannels {
        file_channels: usize,
        output_channels: usize,
    },
}

/// Drain playback failures reported by the audio thread into the log
/// Returns how many were logged
pub fn log_playback_failures(error_rx: &Receiver<PlaybackError>) -> usize {
    let mut count = 0;
    while let Ok(err) = error_rx.try_recv() {
        error!(error = %err, "Playback failed");
        count += 1;
    }
    count
}
