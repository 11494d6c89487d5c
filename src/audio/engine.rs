use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};

use super::clip::{Clip, ClipVoice};
use super::errors::PlaybackError;
use crate::types::events::PadEvent;
use crate::types::pad::PadKey;

/// One engine slot per pad
pub enum ClipSlot {
    /// Clip decoded and ready
    Loaded(ClipVoice),
    /// Clip failed to load; triggers report a playback failure
    Unavailable { key: PadKey, reason: Arc<str> },
}

impl ClipSlot {
    pub fn loaded(clip: Clip) -> Self {
        ClipSlot::Loaded(ClipVoice::new(clip))
    }

    pub fn unavailable(key: PadKey, reason: impl Into<Arc<str>>) -> Self {
        ClipSlot::Unavailable {
            key,
            reason: reason.into(),
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            ClipSlot::Loaded(voice) => voice.is_active(),
            ClipSlot::Unavailable { .. } => false,
        }
    }
}

/// Sampler engine - one clip voice per pad, mixed into the device buffer
/// Runs in real-time audio thread - must be lock-free
pub struct SamplerEngine {
    slots: Vec<ClipSlot>,
    event_rx: Receiver<PadEvent>,
    error_tx: Sender<PlaybackError>,
}

impl SamplerEngine {
    /// Create new sampler engine
    ///
    /// # Arguments
    /// * `slots` - One slot per pad, in pad bank order
    /// * `event_rx` - Trigger events from the UI thread
    /// * `error_tx` - Playback failures back to the UI thread for logging
    pub fn new(
        slots: Vec<ClipSlot>,
        event_rx: Receiver<PadEvent>,
        error_tx: Sender<PlaybackError>,
    ) -> Self {
        Self {
            slots,
            event_rx,
            error_tx,
        }
    }

    /// Which slots are currently sounding (in pad bank order)
    pub fn active_slots(&self) -> Vec<bool> {
        self.slots.iter().map(ClipSlot::is_active).collect()
    }

    fn handle_event(&mut self, event: PadEvent) {
        match event {
            PadEvent::Trigger { slot, gain } => match self.slots.get_mut(slot) {
                Some(ClipSlot::Loaded(voice)) => voice.trigger(gain),
                Some(ClipSlot::Unavailable { key, reason }) => {
                    // Nobody waits on this; a full or closed channel just drops it
                    let _ = self.error_tx.try_send(PlaybackError::ClipUnavailable {
                        key: *key,
                        reason: Arc::clone(reason),
                    });
                }
                None => {}
            },
        }
    }

    /// Process audio callback - mixes all sounding clips into `output`
    ///
    /// # Arguments
    /// * `output` - Interleaved multi-channel output buffer
    /// * `num_channels` - Number of output channels
    pub fn process(&mut self, output: &mut [f32], num_channels: usize) {
        // Process all pending triggers (non-blocking)
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
        }

        output.fill(0.0);
        for slot in &mut self.slots {
            if let ClipSlot::Loaded(voice) = slot {
                voice.mix_into(output, num_channels);
            }
        }
    }
}
