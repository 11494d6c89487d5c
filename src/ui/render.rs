use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};

use super::app::App;
use super::layout::{centered_rect, MachineLayout};
use crate::machine::ClipPlayer;

/// Render the TUI
pub fn render<P: ClipPlayer>(frame: &mut Frame, app: &App<P>) {
    let layout = MachineLayout::new(frame.size());
    let powered = app.dispatcher.state().powered;

    render_title(frame, layout.title);
    render_power(frame, layout.power, powered);
    render_display(frame, layout.display, app);
    for (slot, area) in layout.pads.iter().enumerate() {
        render_pad(frame, *area, app, slot);
    }
    render_volume(frame, layout.volume, app);
    render_help(frame, layout.help);

    if app.show_help {
        render_help_overlay(frame, frame.size());
    }
}

/// Render title bar
fn render_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new("Drum Machine")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(title, area);
}

/// Render the power switch
fn render_power(frame: &mut Frame, area: Rect, powered: bool) {
    let (text, color) = if powered {
        ("Power: ON", Color::Green)
    } else {
        ("Power: OFF", Color::Red)
    };

    let power = Paragraph::new(text)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(power, area);
}

/// Render the display showing the last triggered pad
fn render_display<P: ClipPlayer>(frame: &mut Frame, area: Rect, app: &App<P>) {
    let style = if app.dispatcher.state().last_label.is_empty() {
        Style::default().fg(Color::Gray)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };

    let display = Paragraph::new(app.dispatcher.display_text().to_string())
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::default().title("Display").borders(Borders::ALL));

    frame.render_widget(display, area);
}

/// Render a single pad: key on top, label below
fn render_pad<P: ClipPlayer>(frame: &mut Frame, area: Rect, app: &App<P>, slot: usize) {
    let Some(pad) = app.dispatcher.bank().get(slot) else {
        return;
    };

    let powered = app.dispatcher.state().powered;
    let selected = slot == app.selected_pad;
    let active = app.is_pad_active(slot);

    let key_style = if !powered {
        Style::default().fg(Color::DarkGray)
    } else if active {
        Style::default().fg(Color::Black).bg(Color::Magenta).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };
    let border_style = if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    // Center the two text lines vertically
    let inner_height = area.height.saturating_sub(2) as usize;
    let mut lines = vec![Line::from(""); inner_height.saturating_sub(2) / 2];
    lines.push(Line::from(Span::styled(format!(" {} ", pad.key), key_style)));
    lines.push(Line::from(Span::styled(
        pad.label.clone(),
        Style::default().fg(Color::Gray),
    )));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(border_style));

    frame.render_widget(paragraph, area);
}

/// Render the volume slider
fn render_volume<P: ClipPlayer>(frame: &mut Frame, area: Rect, app: &App<P>) {
    let percent = app.dispatcher.volume_percent();
    let color = if app.dispatcher.state().powered {
        Color::Blue
    } else {
        Color::DarkGray
    };

    let gauge = Gauge::default()
        .block(Block::default().title("Volume").borders(Borders::ALL))
        .gauge_style(Style::default().fg(color))
        .label(format!("{}%", percent))
        .ratio(app.dispatcher.state().volume.clamp(0.0, 1.0) as f64);

    frame.render_widget(gauge, area);
}

/// Render help text
fn render_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new("Pads: Q W E / A S D / Z X C  |  P: Power  |  -/+: Volume  |  ?: Help  |  Esc: Quit")
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Gray));

    frame.render_widget(help, area);
}

/// Render the full controls reference
fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(70, 70, area);

    let help_text = vec![
        Line::from(Span::styled("Controls", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from("  Pad keys         Trigger a pad (either case)"),
        Line::from("  Arrow keys       Move the pad cursor"),
        Line::from("  Enter / Space    Trigger the pad under the cursor"),
        Line::from("  Mouse click      Trigger a pad, set volume, toggle power"),
        Line::from("  - / +            Volume down / up by 1"),
        Line::from("  [ / ]            Volume down / up by 10"),
        Line::from("  Home / End       Volume 0 / 100"),
        Line::from("  P                Toggle power"),
        Line::from("  ?                Toggle this help"),
        Line::from("  Esc / Ctrl+C     Quit"),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}
