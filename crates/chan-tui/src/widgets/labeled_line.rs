//! Label / value rows of the details panel.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::theme::{C_LINK, C_PRIMARY, C_SECONDARY};
use crate::view::LabeledLine;

pub const LABEL_WIDTH: usize = 22;

pub fn render_line(row: &LabeledLine, indent: &str) -> Line<'static> {
    let mut spans = vec![
        Span::raw(indent.to_string()),
        Span::styled(
            format!("{:<width$}", format!("{}:", row.label), width = LABEL_WIDTH),
            Style::default().fg(C_SECONDARY),
        ),
        Span::styled(row.value.clone(), Style::default().fg(C_PRIMARY)),
    ];
    if let Some(link) = &row.link {
        spans.push(Span::styled(
            format!("  ↗ {}", link),
            Style::default().fg(C_LINK).add_modifier(Modifier::UNDERLINED),
        ));
    }
    Line::from(spans)
}
