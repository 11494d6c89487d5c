use tracing::{debug, error};

use super::bank::PadBank;
use crate::audio::errors::PlaybackError;
use crate::types::pad::{Pad, PadKey};

/// Shown on the display before the first trigger
pub const DISPLAY_PLACEHOLDER: &str = "Hit a Pad!";

/// Default volume fraction
pub const DEFAULT_VOLUME: f32 = 0.5;

/// Playback facility the dispatcher hands triggers to
///
/// Implementations start playback and return without waiting for it;
/// anything that goes wrong later is reported out of band.
pub trait ClipPlayer {
    /// Restart the clip in `slot` from its beginning at `gain` (0.0 to 1.0)
    fn play(&self, slot: usize, key: PadKey, gain: f32) -> Result<(), PlaybackError>;
}

/// Session state of the machine; lives as long as the UI
#[derive(Debug, Clone, PartialEq)]
pub struct MachineState {
    /// Label of the last triggered pad (empty until the first trigger)
    pub last_label: String,
    /// Volume fraction applied to the next trigger (0.0 to 1.0)
    pub volume: f32,
    /// Triggers are ignored while off
    pub powered: bool,
}

impl Default for MachineState {
    fn default() -> Self {
        Self {
            last_label: String::new(),
            volume: DEFAULT_VOLUME,
            powered: true,
        }
    }
}

/// Maps keys to pads and triggers them through a [`ClipPlayer`]
pub struct PadDispatcher<P> {
    bank: PadBank,
    state: MachineState,
    player: P,
}

impl<P: ClipPlayer> PadDispatcher<P> {
    pub fn new(bank: PadBank, state: MachineState, player: P) -> Self {
        Self {
            bank,
            state,
            player,
        }
    }

    /// Look up the pad bound to `key` (case-insensitive)
    pub fn resolve(&self, key: char) -> Option<&Pad> {
        self.bank.resolve(key)
    }

    /// Play `pad` at the current volume and show its label
    ///
    /// No-op while powered off. Playback failures are logged here and not
    /// returned; the display is updated either way.
    pub fn trigger(&mut self, pad: &Pad) {
        if !self.state.powered {
            debug!(key = %pad.key, "Ignoring trigger while powered off");
            return;
        }

        let result = match self.bank.slot_of(pad.key) {
            Some(slot) => self.player.play(slot, pad.key, self.state.volume),
            None => Err(PlaybackError::UnknownPad(pad.key)),
        };
        if let Err(err) = result {
            error!(key = %pad.key, error = %err, "Playback failed");
        }

        self.state.last_label.clone_from(&pad.label);
    }

    /// Trigger the pad at `slot` (pad grid click)
    pub fn trigger_slot(&mut self, slot: usize) {
        if let Some(pad) = self.bank.get(slot).cloned() {
            self.trigger(&pad);
        }
    }

    /// Resolve and trigger; returns whether `key` belongs to a pad
    pub fn press(&mut self, key: char) -> bool {
        match self.resolve(key).cloned() {
            Some(pad) => {
                self.trigger(&pad);
                true
            }
            None => false,
        }
    }

    /// Set the volume from a slider position in percent (0 to 100)
    /// Applies to the next trigger; playing clips keep their level
    pub fn set_volume(&mut self, percent: f32) {
        let percent = if percent.is_nan() { 0.0 } else { percent.clamp(0.0, 100.0) };
        self.state.volume = percent / 100.0;
    }

    /// Slider position for the current volume
    pub fn volume_percent(&self) -> u8 {
        (self.state.volume * 100.0).round() as u8
    }

    /// Switch power; playing clips are left to finish
    pub fn set_power(&mut self, on: bool) {
        self.state.powered = on;
    }

    pub fn toggle_power(&mut self) {
        self.set_power(!self.state.powered);
    }

    /// Display text: last label, or the placeholder before any trigger
    pub fn display_text(&self) -> &str {
        if self.state.last_label.is_empty() {
            DISPLAY_PLACEHOLDER
        } else {
            &self.state.last_label
        }
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn bank(&self) -> &PadBank {
        &self.bank
    }

    #[cfg(test)]
    pub fn player(&self) -> &P {
        &self.player
    }
}
