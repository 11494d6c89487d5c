use crossbeam_channel::Sender;

use super::errors::PlaybackError;
use crate::machine::ClipPlayer;
use crate::types::events::PadEvent;
use crate::types::pad::PadKey;

/// UI-side handle to the sampler engine
/// Sends triggers to the audio thread without waiting on them
#[derive(Clone)]
pub struct EngineHandle {
    event_tx: Sender<PadEvent>,
}

impl EngineHandle {
    pub fn new(event_tx: Sender<PadEvent>) -> Self {
        Self { event_tx }
    }
}

impl ClipPlayer for EngineHandle {
    fn play(&self, slot: usize, _key: PadKey, gain: f32) -> Result<(), PlaybackError> {
        // try_send: never block the UI thread on the audio thread
        self.event_tx
            .try_send(PadEvent::trigger(slot, gain))
            .map_err(|_| PlaybackError::EngineUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{bounded, unbounded};

    #[test]
    fn test_play_sends_trigger() {
        let (tx, rx) = unbounded();
        let handle = EngineHandle::new(tx);

        handle.play(3, PadKey::new('A'), 0.7).unwrap();
        assert_eq!(rx.try_recv().unwrap(), PadEvent::trigger(3, 0.7));
    }

    #[test]
    fn test_play_fails_when_engine_gone() {
        let (tx, rx) = unbounded();
        let handle = EngineHandle::new(tx);
        drop(rx);

        let err = handle.play(0, PadKey::new('Q'), 0.5).unwrap_err();
        assert!(matches!(err, PlaybackError::EngineUnavailable));
    }

    #[test]
    fn test_play_fails_when_queue_full() {
        let (tx, _rx) = bounded(1);
        let handle = EngineHandle::new(tx);

        assert!(handle.play(0, PadKey::new('Q'), 0.5).is_ok());
        assert!(handle.play(0, PadKey::new('Q'), 0.5).is_err());
    }
}
