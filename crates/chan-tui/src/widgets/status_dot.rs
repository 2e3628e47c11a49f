//! Status dots for the active / opening / closing flags.

use ratatui::{
    style::{Color, Style},
    text::Span,
};

use crate::theme::{C_ACTIVE, C_CLOSING, C_MUTED, C_OPENING};
use crate::view::{StatusDot, StatusKind};

fn on_color(kind: StatusKind) -> Color {
    match kind {
        StatusKind::Active => C_ACTIVE,
        StatusKind::Opening => C_OPENING,
        StatusKind::Closing => C_CLOSING,
    }
}

pub fn dot_span(dot: StatusDot) -> Span<'static> {
    if dot.on {
        Span::styled("●", Style::default().fg(on_color(dot.kind)))
    } else {
        Span::styled("○", Style::default().fg(C_MUTED))
    }
}

/// The three dots separated by single spaces.
pub fn dot_spans(dots: &[StatusDot]) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(dots.len() * 2);
    for (i, dot) in dots.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(dot_span(*dot));
    }
    spans
}

/// Legend text for the help overlay, e.g. `"● active"`.
pub fn legend(kind: StatusKind) -> Vec<Span<'static>> {
    vec![
        dot_span(StatusDot { kind, on: true }),
        Span::styled(format!(" {}", kind.label()), Style::default().fg(C_MUTED)),
    ]
}
