use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::layout::Rect;
use std::time::Duration;

use super::app::{App, VOLUME_STEP, VOLUME_STEP_COARSE};
use super::layout::MachineLayout;
use crate::machine::ClipPlayer;
use crate::types::pad::POWER_KEY;

/// Handle keyboard and mouse events and update app state
/// `area` is the current terminal size, for mouse hit-testing
pub fn handle_events<P: ClipPlayer>(app: &mut App<P>, area: Rect) -> anyhow::Result<()> {
    // Poll for events with timeout
    if event::poll(Duration::from_millis(10))? {
        match event::read()? {
            Event::Key(key) => handle_key_event(app, key),
            Event::Mouse(mouse) => handle_mouse_event(app, mouse, &MachineLayout::new(area)),
            _ => {}
        }
    }
    Ok(())
}

/// Process individual key press
pub fn handle_key_event<P: ClipPlayer>(app: &mut App<P>, key: KeyEvent) {
    // Key-down only; release/repeat reports would double-trigger
    if key.kind != KeyEventKind::Press {
        return;
    }

    // Check for Ctrl+C
    if key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c' | 'C')) {
        app.quit();
        return;
    }

    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            app.toggle_help();
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.quit(),
        KeyCode::Char('?') => app.toggle_help(),

        // Power switch
        KeyCode::Char(c) if c.eq_ignore_ascii_case(&POWER_KEY) => app.toggle_power(),

        // Volume slider
        KeyCode::Char('-') | KeyCode::Char('_') => app.nudge_volume(-VOLUME_STEP),
        KeyCode::Char('+') | KeyCode::Char('=') => app.nudge_volume(VOLUME_STEP),
        KeyCode::Char('[') => app.nudge_volume(-VOLUME_STEP_COARSE),
        KeyCode::Char(']') => app.nudge_volume(VOLUME_STEP_COARSE),
        KeyCode::Home => app.set_volume_percent(0.0),
        KeyCode::End => app.set_volume_percent(100.0),

        // Pad cursor
        KeyCode::Left => app.move_selection(-1, 0),
        KeyCode::Right => app.move_selection(1, 0),
        KeyCode::Up => app.move_selection(0, -1),
        KeyCode::Down => app.move_selection(0, 1),
        KeyCode::Enter | KeyCode::Char(' ') => app.trigger_selected(),

        // Pad keys; anything unmapped falls through silently
        KeyCode::Char(c) => app.press_key(c),

        _ => {}
    }
}

/// Process mouse clicks and slider drags
pub fn handle_mouse_event<P: ClipPlayer>(app: &mut App<P>, mouse: MouseEvent, layout: &MachineLayout) {
    let (column, row) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if app.show_help {
                app.toggle_help();
            } else if let Some(slot) = layout.pad_at(column, row) {
                app.click_pad(slot);
            } else if layout.is_volume(column, row) {
                app.dragging_volume = true;
                app.set_volume_percent(layout.volume_at(column));
            } else if layout.is_power(column, row) {
                app.toggle_power();
            }
        }
        MouseEventKind::Drag(MouseButton::Left) if app.dragging_volume => {
            app.set_volume_percent(layout.volume_at(column));
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.dragging_volume = false;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::app::tests::app;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn layout() -> MachineLayout {
        MachineLayout::new(Rect::new(0, 0, 60, 30))
    }

    #[test]
    fn test_keyboard_session() {
        let mut app = app();

        handle_key_event(&mut app, press(KeyCode::Char('q')));
        assert_eq!(app.dispatcher.display_text(), "Heater 1");

        handle_key_event(&mut app, press(KeyCode::Char('G')));
        assert_eq!(app.dispatcher.display_text(), "Heater 1");

        handle_key_event(&mut app, press(KeyCode::Char('p')));
        assert!(!app.dispatcher.state().powered);
        handle_key_event(&mut app, press(KeyCode::Char('Q')));
        assert_eq!(app.dispatcher.display_text(), "Heater 1");

        handle_key_event(&mut app, press(KeyCode::Char('P')));
        handle_key_event(&mut app, press(KeyCode::Char('Z')));
        assert_eq!(app.dispatcher.display_text(), "Kick n' Hat");

        handle_key_event(&mut app, press(KeyCode::Home));
        handle_key_event(&mut app, press(KeyCode::Char('z')));
        let plays = app.dispatcher.player().plays.borrow();
        assert_eq!(plays.last(), Some(&(6, 0.0)));
        assert!(!app.should_quit);
    }

    #[test]
    fn test_release_events_ignored() {
        let mut app = app();
        let mut release = press(KeyCode::Char('q'));
        release.kind = KeyEventKind::Release;
        handle_key_event(&mut app, release);
        assert_eq!(app.dispatcher.display_text(), "Hit a Pad!");
    }

    #[test]
    fn test_volume_keys() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::Char('+')));
        assert_eq!(app.dispatcher.volume_percent(), 51);
        handle_key_event(&mut app, press(KeyCode::Char('[')));
        assert_eq!(app.dispatcher.volume_percent(), 41);
        handle_key_event(&mut app, press(KeyCode::End));
        assert_eq!(app.dispatcher.state().volume, 1.0);
    }

    #[test]
    fn test_cursor_and_enter() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::Right));
        handle_key_event(&mut app, press(KeyCode::Down));
        handle_key_event(&mut app, press(KeyCode::Enter));
        assert_eq!(app.dispatcher.display_text(), "Clap");
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::Char('?')));
        assert!(app.show_help);

        handle_key_event(&mut app, press(KeyCode::Char('q')));
        assert_eq!(app.dispatcher.display_text(), "Hit a Pad!");

        handle_key_event(&mut app, press(KeyCode::Esc));
        assert!(!app.show_help);
        assert!(!app.should_quit);

        handle_key_event(&mut app, press(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = app();
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_shift_c_quits() {
        let mut app = app();
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('C'), KeyModifiers::CONTROL | KeyModifiers::SHIFT),
        );
        assert!(app.should_quit);
        assert_eq!(app.dispatcher.display_text(), "Hit a Pad!");
    }

    #[test]
    fn test_plain_c_is_a_pad() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::Char('c')));
        assert!(!app.should_quit);
        assert_eq!(app.dispatcher.display_text(), "Closed HH");
    }

    #[test]
    fn test_click_pad() {
        let mut app = app();
        let layout = layout();
        let target = layout.pads[7];
        handle_mouse_event(
            &mut app,
            mouse(MouseEventKind::Down(MouseButton::Left), target.x + 1, target.y + 1),
            &layout,
        );
        assert_eq!(app.dispatcher.display_text(), "Kick");
        assert_eq!(app.selected_pad, 7);
    }

    #[test]
    fn test_slider_click_and_drag() {
        let mut app = app();
        let layout = layout();
        let row = layout.volume.y + 1;

        handle_mouse_event(
            &mut app,
            mouse(MouseEventKind::Down(MouseButton::Left), layout.volume.x + 1, row),
            &layout,
        );
        assert_eq!(app.dispatcher.state().volume, 0.0);

        handle_mouse_event(
            &mut app,
            mouse(MouseEventKind::Drag(MouseButton::Left), layout.volume.x + 200, row + 5),
            &layout,
        );
        assert_eq!(app.dispatcher.state().volume, 1.0);

        handle_mouse_event(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 0, 0), &layout);
        handle_mouse_event(
            &mut app,
            mouse(MouseEventKind::Drag(MouseButton::Left), layout.volume.x + 1, row),
            &layout,
        );
        assert_eq!(app.dispatcher.state().volume, 1.0);
    }

    #[test]
    fn test_click_power() {
        let mut app = app();
        let layout = layout();
        handle_mouse_event(
            &mut app,
            mouse(MouseEventKind::Down(MouseButton::Left), layout.power.x + 1, layout.power.y + 1),
            &layout,
        );
        assert!(!app.dispatcher.state().powered);
    }
}
