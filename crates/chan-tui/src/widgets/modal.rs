//! Modal overlay: a cleared, bordered box centred over the screen.
//!
//! The modal itself holds no state; whoever owns the visibility flag closes
//! it on Esc, on a click outside `modal_area`, or programmatically.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Block, Borders, Clear},
    Frame,
};

use crate::theme::{C_MODAL_BG, C_PANEL_BORDER_FOCUSED, C_PRIMARY};

/// Centre a `width` x `height` box inside `area`, shrinking to fit.
pub fn modal_area(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width - w) / 2;
    let y = area.y + (area.height - h) / 2;
    Rect::new(x, y, w, h)
}

/// True when a click at (`col`, `row`) lands outside the modal box.
pub fn is_backdrop_click(modal: Rect, col: u16, row: u16) -> bool {
    !(col >= modal.x && col < modal.x + modal.width && row >= modal.y && row < modal.y + modal.height)
}

/// Clear `modal`, draw its frame and return the inner area.
pub fn draw_modal_frame(frame: &mut Frame, modal: Rect, title: &str) -> Rect {
    frame.render_widget(Clear, modal);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(symbols::border::ROUNDED)
        .border_style(Style::default().fg(C_PANEL_BORDER_FOCUSED))
        .title(Line::from(Span::styled(
            format!(" {} ", title),
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        )))
        .title_alignment(Alignment::Center)
        .style(Style::default().bg(C_MODAL_BG));
    let inner = block.inner(modal);
    frame.render_widget(block, modal);
    inner
}
