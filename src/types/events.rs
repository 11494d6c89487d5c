/// Internal events sent from the UI thread to the audio thread
/// Must be simple and fast to construct/parse
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PadEvent {
    /// Restart the clip in `slot` from its first frame at `gain` (0.0 to 1.0)
    Trigger { slot: usize, gain: f32 },
}

impl PadEvent {
    /// Create a trigger event
    pub fn trigger(slot: usize, gain: f32) -> Self {
        PadEvent::Trigger { slot, gain }
    }
}
