use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::types::pad::PAD_COUNT;

/// Pads per grid row
pub const GRID_COLUMNS: usize = 3;

/// Screen regions, shared by rendering and mouse hit-testing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineLayout {
    pub title: Rect,
    pub power: Rect,
    pub display: Rect,
    pub pads: [Rect; PAD_COUNT],
    pub volume: Rect,
    pub help: Rect,
}

impl MachineLayout {
    /// Split the terminal area into the machine's regions
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title + power
                Constraint::Length(3), // Display
                Constraint::Min(9),    // Pad grid
                Constraint::Length(3), // Volume slider
                Constraint::Length(3), // Help
            ])
            .split(area);

        let header = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(16)])
            .split(chunks[0]);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(chunks[2]);

        let mut pads = [Rect::default(); PAD_COUNT];
        for (row_idx, row) in rows.iter().enumerate() {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Ratio(1, 3),
                    Constraint::Ratio(1, 3),
                    Constraint::Ratio(1, 3),
                ])
                .split(*row);
            for (col_idx, cell) in cells.iter().enumerate() {
                pads[row_idx * GRID_COLUMNS + col_idx] = *cell;
            }
        }

        Self {
            title: header[0],
            power: header[1],
            display: chunks[1],
            pads,
            volume: chunks[3],
            help: chunks[4],
        }
    }

    /// Pad slot under a terminal cell, if any
    pub fn pad_at(&self, column: u16, row: u16) -> Option<usize> {
        self.pads.iter().position(|rect| contains(*rect, column, row))
    }

    pub fn is_volume(&self, column: u16, row: u16) -> bool {
        contains(self.volume, column, row)
    }

    pub fn is_power(&self, column: u16, row: u16) -> bool {
        contains(self.power, column, row)
    }

    /// Slider position (0 to 100) for a column, measured inside the borders
    pub fn volume_at(&self, column: u16) -> f32 {
        let start = self.volume.x + 1;
        let width = self.volume.width.saturating_sub(2);
        if width <= 1 {
            return 0.0;
        }
        let offset = column.saturating_sub(start).min(width - 1);
        (offset as f32 / (width - 1) as f32 * 100.0).round()
    }
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

/// Centered popup area taking the given percentage of `area`
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> MachineLayout {
        MachineLayout::new(Rect::new(0, 0, 60, 30))
    }

    #[test]
    fn test_pads_form_a_grid() {
        let layout = layout();
        // Row-major: Q W E on top
        assert!(layout.pads[0].x < layout.pads[1].x);
        assert!(layout.pads[1].x < layout.pads[2].x);
        assert_eq!(layout.pads[0].y, layout.pads[2].y);
        assert!(layout.pads[0].y < layout.pads[3].y);
        assert!(layout.pads[3].y < layout.pads[6].y);
        assert!(layout.pads.iter().all(|r| r.width > 0 && r.height > 0));
    }

    #[test]
    fn test_pad_hit_testing() {
        let layout = layout();
        for (slot, rect) in layout.pads.iter().enumerate() {
            assert_eq!(layout.pad_at(rect.x, rect.y), Some(slot));
            assert_eq!(
                layout.pad_at(rect.x + rect.width - 1, rect.y + rect.height - 1),
                Some(slot)
            );
        }
        assert_eq!(layout.pad_at(layout.display.x, layout.display.y), None);
    }

    #[test]
    fn test_volume_from_column() {
        let layout = layout();
        let left = layout.volume.x + 1;
        let right = layout.volume.x + layout.volume.width - 2;
        assert_eq!(layout.volume_at(left), 0.0);
        assert_eq!(layout.volume_at(right), 100.0);
        // Borders clamp to the ends
        assert_eq!(layout.volume_at(layout.volume.x), 0.0);
        assert_eq!(layout.volume_at(layout.volume.x + layout.volume.width), 100.0);
    }

    #[test]
    fn test_power_region() {
        let layout = layout();
        assert!(layout.is_power(layout.power.x, layout.power.y));
        assert!(!layout.is_power(layout.title.x, layout.title.y));
        assert!(layout.is_volume(layout.volume.x + 2, layout.volume.y + 1));
    }
}
