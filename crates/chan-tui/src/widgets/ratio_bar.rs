//! Smooth Unicode ratio bar used for the balance and activity columns.

use ratatui::{
    style::{Color, Style},
    text::Span,
};

use crate::theme::C_BAR_EMPTY;

const BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

/// Fill string for `percent` (0..=100) across `width` cells, 8 steps per cell.
pub fn bar_fill(percent: f64, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let eighths = ((percent / 100.0).clamp(0.0, 1.0) * width as f64 * 8.0).round() as usize;
    let full_blocks = eighths / 8;
    let partial = eighths % 8;

    let mut bar = String::with_capacity(width * 3);
    for _ in 0..full_blocks.min(width) {
        bar.push('█');
    }
    if full_blocks < width {
        bar.push(BLOCKS[partial]);
        for _ in (full_blocks + 1)..width {
            bar.push(' ');
        }
    }
    bar
}

/// Bar span with the unfilled part shaded so empty bars stay visible.
pub fn bar_span(percent: f64, width: usize, fill: Color) -> Span<'static> {
    Span::styled(bar_fill(percent, width), Style::default().fg(fill).bg(C_BAR_EMPTY))
}
