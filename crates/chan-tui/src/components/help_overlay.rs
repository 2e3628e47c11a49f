//! HelpOverlay component: centered popup with keyboard shortcut reference.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    theme::{C_MODAL_BG, C_MUTED, C_PANEL_BORDER, C_PRIMARY, C_SECONDARY},
    view::{Initiator, PrivacyIcon, StatusKind},
    widgets::status_dot::legend,
};

#[derive(Default)]
pub struct HelpOverlay {
    pub visible: bool,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }
}

impl Component for HelpOverlay {
    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || !self.visible {
            return vec![];
        }
        match key.code {
            KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc => vec![Action::ToggleHelp],
            // Consume all keys while overlay is open
            _ => vec![],
        }
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::ToggleHelp = action {
            self.toggle();
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        if !self.visible {
            return;
        }

        let popup = centered_rect(64, 30, area);

        let mut help_lines: Vec<Line> = vec![
            Line::from(Span::styled(
                " keyboard shortcuts",
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            section(" cards"),
            help_row("enter / space", "expand / collapse card under cursor"),
            help_row("click", "expand / collapse clicked card"),
        ];
        if state.capability.is_admin() {
            help_lines.push(help_row("x", "close channel of the expanded card"));
        }
        help_lines.extend([
            help_row("y / Y", "copy channel id / funding tx link"),
            Line::from(""),
            section(" navigation"),
            help_row("↑ / ↓  or  j / k", "move cursor (Shift = 5)"),
            help_row("pg up / pg dn", "jump 10 cards"),
            help_row("home / end  or  g / G", "jump first / last"),
            help_row("/", "filter by alias, key or id"),
            help_row("s / S", "cycle sort forward / backward"),
            help_row("?", "toggle this help overlay"),
            help_row("q / Ctrl+C", "quit"),
            Line::from(""),
            section(" legend"),
        ]);
        for kind in [StatusKind::Active, StatusKind::Opening, StatusKind::Closing] {
            let mut spans = vec![Span::raw(" ")];
            spans.extend(legend(kind));
            help_lines.push(Line::from(spans));
        }
        help_lines.extend([
            help_row(Initiator::Partner.icon(), "opened by partner"),
            help_row(Initiator::Local.icon(), "opened by this node"),
            help_row(PrivacyIcon::GLYPH, "private channel"),
            Line::from(""),
            Line::from(Span::styled(
                " press ? or esc to close",
                Style::default().fg(C_MUTED),
            )),
        ]);

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(help_lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(C_PANEL_BORDER))
                        .style(Style::default().bg(C_MODAL_BG)),
                )
                .wrap(Wrap { trim: false }),
            popup,
        );
    }
}

fn section(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        title,
        Style::default().fg(C_MUTED).add_modifier(Modifier::BOLD),
    ))
}

fn help_row<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw(" "),
        Span::styled(
            format!("{:<22}", key),
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        ),
        Span::styled(desc, Style::default().fg(C_SECONDARY)),
    ])
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1])[1]
}
