//! Header component: 2-row top bar.
//!
//! Row 1: app name, channel counts, total capacity, snapshot source, access badge.
//! Row 2: aggregate local/remote balance bar, or the last reload error.
//!
//! Not focusable; draws to a 2-row area.

use ratatui::crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use chan_proto::ratio::percent;

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    theme::{C_ACCENT, C_ACTIVE, C_CLOSING, C_DANGER, C_LOCAL, C_MUTED, C_PRIMARY, C_SECONDARY},
    widgets::ratio_bar::bar_span,
};

const BALANCE_BAR_WIDTH: usize = 24;

#[derive(Default)]
pub struct Header;

impl Header {
    pub fn new() -> Self {
        Self
    }
}

impl Component for Header {
    fn handle_key(&mut self, _key: KeyEvent, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn on_action(&mut self, _action: &Action, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        if area.height < 2 {
            frame.render_widget(Clear, area);
            frame.render_widget(Paragraph::new(build_row1(state, area.width)), area);
            return;
        }

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);

        frame.render_widget(Clear, rows[0]);
        frame.render_widget(Paragraph::new(build_row1(state, rows[0].width)), rows[0]);
        frame.render_widget(Clear, rows[1]);
        frame.render_widget(Paragraph::new(build_row2(state)), rows[1]);
    }
}

// ── Row 1: name / counts / capacity / source / badge ─────────────────────────

fn build_row1(state: &AppState, width: u16) -> Line<'static> {
    let totals = state.snapshot.totals();
    let sep = || Span::styled("  ·  ", Style::default().fg(C_MUTED));

    let mut spans = vec![
        Span::styled(" ⚡ ", Style::default().fg(C_ACCENT)),
        Span::styled(
            "chandash",
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        ),
        sep(),
        Span::styled(
            format!("{} channels", totals.channels),
            Style::default().fg(C_SECONDARY),
        ),
        Span::styled(
            format!(" ({} active)", totals.active),
            Style::default().fg(C_ACTIVE),
        ),
        sep(),
        Span::styled(
            state.display.price.format(totals.capacity),
            Style::default().fg(C_PRIMARY),
        ),
        sep(),
        Span::styled(
            state.snapshot_path.display().to_string(),
            Style::default().fg(C_MUTED),
        ),
    ];

    let badge = if state.capability.is_admin() {
        Span::styled(
            " ADMIN ",
            Style::default().fg(C_DANGER).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(" VIEWER ", Style::default().fg(C_MUTED))
    };
    let used: usize = spans.iter().map(|s| s.width()).sum::<usize>() + badge.width();
    spans.push(Span::raw(" ".repeat((width as usize).saturating_sub(used))));
    spans.push(badge);
    Line::from(spans)
}

// ── Row 2: aggregate balance or reload error ──────────────────────────────────

fn build_row2(state: &AppState) -> Line<'static> {
    if let Some(err) = &state.snapshot_error {
        return Line::from(vec![
            Span::styled(" ✗ ", Style::default().fg(C_CLOSING)),
            Span::styled(
                format!("snapshot reload failed: {}", err),
                Style::default().fg(C_CLOSING),
            ),
        ]);
    }

    let totals = state.snapshot.totals();
    let local_pct = percent(totals.local_balance, totals.remote_balance);
    Line::from(vec![
        Span::styled("   local ", Style::default().fg(C_MUTED)),
        Span::styled(
            state.display.price.format(totals.local_balance),
            Style::default().fg(C_SECONDARY),
        ),
        Span::raw(" "),
        bar_span(local_pct, BALANCE_BAR_WIDTH, C_LOCAL),
        Span::styled(
            format!(" {:.0}% ", local_pct),
            Style::default().fg(C_SECONDARY),
        ),
        Span::styled(
            state.display.price.format(totals.remote_balance),
            Style::default().fg(C_SECONDARY),
        ),
        Span::styled(" remote", Style::default().fg(C_MUTED)),
    ])
}
