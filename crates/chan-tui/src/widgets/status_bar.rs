//! Status bar: bottom line with the input mode and key hints.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_MODE_FILTER, C_MODE_MODAL, C_MODE_NORMAL, C_MUTED};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Filter,
    Modal,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "CHANNELS",
            Self::Filter => "FILTER",
            Self::Modal => "CLOSE",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Filter => C_MODE_FILTER,
            Self::Modal => C_MODE_MODAL,
        }
    }

    fn keys(self, admin: bool) -> &'static str {
        match self {
            Self::Normal if admin => {
                " ↑↓/jk move  Enter expand  x close channel  / filter  s/S sort  y/Y copy id/tx  ? help  q quit"
            }
            Self::Normal => {
                " ↑↓/jk move  Enter expand  / filter  s/S sort  y/Y copy id/tx  ? help  q quit"
            }
            Self::Filter => " type to filter  ↑↓ move  Enter keep  Esc clear+close",
            Self::Modal => " f force  ←→ fee target  Enter confirm  Esc cancel",
        }
    }
}

pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode, admin: bool) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode.label()),
            Style::default().fg(mode.color()).add_modifier(Modifier::BOLD),
        ),
        Span::styled(mode.keys(admin), Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
