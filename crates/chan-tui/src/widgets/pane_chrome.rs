//! PaneChrome: bordered pane with focus styling and an optional badge.

use crate::theme::{style_focused_border, style_unfocused_border, C_MUTED, C_PRIMARY};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
};

/// A badge shown in the top-right of the pane header (e.g. "ADMIN", "STALE").
pub struct Badge<'a> {
    pub text: &'a str,
    pub color: Color,
}

/// Bordered pane titled `title`, with an optional right-aligned `badge` and
/// a left-aligned `info` suffix after the title (counts, sort order).
pub fn pane_chrome<'a>(
    title: &'a str,
    info: Option<String>,
    focused: bool,
    badge: Option<Badge<'a>>,
) -> Block<'a> {
    let border_style = if focused {
        style_focused_border()
    } else {
        style_unfocused_border()
    };

    let title_style = if focused {
        Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(C_MUTED)
    };

    let mut title_spans = vec![Span::styled(format!(" {} ", title), title_style)];
    if let Some(info) = info {
        title_spans.push(Span::styled(format!("{} ", info), Style::default().fg(C_MUTED)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Line::from(title_spans));

    match badge {
        Some(b) => block.title_top(
            Line::from(Span::styled(
                format!(" {} ", b.text),
                Style::default().fg(b.color).add_modifier(Modifier::BOLD),
            ))
            .right_aligned(),
        ),
        None => block,
    }
}
