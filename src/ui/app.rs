use crate::machine::{ClipPlayer, PadDispatcher};
use crate::types::pad::PAD_COUNT;

use super::layout::GRID_COLUMNS;

/// Slider step for fine adjustment
pub const VOLUME_STEP: i16 = 1;
/// Slider step for coarse adjustment
pub const VOLUME_STEP_COARSE: i16 = 10;

/// UI application state
/// Wraps the dispatcher with cursor, overlay and activity state
pub struct App<P> {
    /// Pad dispatcher (display, volume, power)
    pub dispatcher: PadDispatcher<P>,
    /// Pad under the keyboard cursor
    pub selected_pad: usize,
    /// Which pads are sounding, as last reported by the audio thread
    pub active_pads: Vec<bool>,
    /// Mouse button went down on the slider and is still held
    pub dragging_volume: bool,
    /// Whether to show help screen
    pub show_help: bool,
    /// Whether to quit the application
    pub should_quit: bool,
}

impl<P: ClipPlayer> App<P> {
    pub fn new(dispatcher: PadDispatcher<P>) -> Self {
        Self {
            dispatcher,
            selected_pad: 0,
            active_pads: vec![false; PAD_COUNT],
            dragging_volume: false,
            show_help: false,
            should_quit: false,
        }
    }

    /// Keyboard key aimed at a pad; unmapped keys do nothing
    pub fn press_key(&mut self, key: char) {
        if let Some(slot) = self
            .dispatcher
            .resolve(key)
            .and_then(|pad| self.dispatcher.bank().slot_of(pad.key))
        {
            self.selected_pad = slot;
        }
        self.dispatcher.press(key);
    }

    /// Trigger a pad by grid position (mouse click)
    pub fn click_pad(&mut self, slot: usize) {
        if slot < self.dispatcher.bank().len() {
            self.selected_pad = slot;
            self.dispatcher.trigger_slot(slot);
        }
    }

    /// Trigger the pad under the cursor
    pub fn trigger_selected(&mut self) {
        self.dispatcher.trigger_slot(self.selected_pad);
    }

    /// Move the cursor around the 3x3 grid, wrapping at the edges
    pub fn move_selection(&mut self, dx: isize, dy: isize) {
        let cols = GRID_COLUMNS as isize;
        let rows = (PAD_COUNT / GRID_COLUMNS) as isize;
        let col = (self.selected_pad as isize % cols + dx).rem_euclid(cols);
        let row = (self.selected_pad as isize / cols + dy).rem_euclid(rows);
        self.selected_pad = (row * cols + col) as usize;
    }

    /// Move the volume slider by `delta` percent
    pub fn nudge_volume(&mut self, delta: i16) {
        let percent = self.dispatcher.volume_percent() as i16 + delta;
        self.dispatcher.set_volume(percent.clamp(0, 100) as f32);
    }

    /// Put the volume slider at `percent` (0 to 100)
    pub fn set_volume_percent(&mut self, percent: f32) {
        self.dispatcher.set_volume(percent);
    }

    pub fn toggle_power(&mut self) {
        self.dispatcher.toggle_power();
    }

    /// Replace pad activity with the audio thread's latest report
    pub fn update_active_pads(&mut self, active: Vec<bool>) {
        self.active_pads = active;
    }

    pub fn is_pad_active(&self, slot: usize) -> bool {
        self.active_pads.get(slot).copied().unwrap_or(false)
    }

    /// Mark app for quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Toggle help screen visibility
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }
}
