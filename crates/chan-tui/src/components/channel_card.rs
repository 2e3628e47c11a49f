//! ChannelCard: one channel's summary rows, details panel and close modal.
//!
//! A card does not know whether it is expanded: the list passes that in from
//! its `Selection`. The card only owns its modal.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use chan_proto::channel::ChannelRecord;

use crate::action::CloseOutcome;
use crate::close_flow::CloseChannelFlow;
use crate::theme::{
    accent_color, C_ACTIVITY, C_DANGER, C_LOCAL, C_MUTED, C_PRIMARY, C_SECONDARY,
    C_SELECTION_BG, C_SEPARATOR,
};
use crate::view::{self, Capability, CloseAction, DisplayContext, PrivacyIcon};
use crate::widgets::{labeled_line::render_line, ratio_bar::bar_span, status_dot::dot_spans};

/// Rows every card shows, expanded or not.
pub const SUMMARY_ROWS: usize = 2;
const BAR_WIDTH: usize = 12;
const MIN_ALIAS_WIDTH: usize = 8;
const DETAIL_INDENT: &str = "   ";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open(CloseChannelFlow),
}

/// What the user sees of one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardPhase {
    Collapsed,
    Expanded,
    /// Expanded with the close modal on top.
    Closing,
}

#[derive(Debug, Clone, Default)]
pub struct ChannelCard {
    modal: ModalState,
}

impl ChannelCard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self, expanded: bool) -> CardPhase {
        match (expanded, &self.modal) {
            (false, _) => CardPhase::Collapsed,
            (true, ModalState::Closed) => CardPhase::Expanded,
            (true, ModalState::Open(_)) => CardPhase::Closing,
        }
    }

    /// Open the close modal. Refused unless the card is expanded and no
    /// modal is showing yet.
    pub fn open_modal(&mut self, expanded: bool, action: &CloseAction) -> bool {
        if self.phase(expanded) != CardPhase::Expanded {
            return false;
        }
        self.modal = ModalState::Open(CloseChannelFlow::new(
            action.channel_id.clone(),
            action.channel_name.clone(),
        ));
        true
    }

    pub fn dismiss_modal(&mut self) {
        self.modal = ModalState::Closed;
    }

    /// Called whenever the selection moves away from this card.
    pub fn collapse(&mut self) {
        self.dismiss_modal();
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    pub fn flow(&self) -> Option<&CloseChannelFlow> {
        match &self.modal {
            ModalState::Open(flow) => Some(flow),
            ModalState::Closed => None,
        }
    }

    pub fn flow_mut(&mut self) -> Option<&mut CloseChannelFlow> {
        match &mut self.modal {
            ModalState::Open(flow) => Some(flow),
            ModalState::Closed => None,
        }
    }

    /// Apply the closer's answer. Returns false if this card's modal was not
    /// waiting on `channel_id`.
    pub fn finish_close(&mut self, channel_id: &str, outcome: &CloseOutcome) -> bool {
        let Some(flow) = self.flow_mut() else {
            return false;
        };
        if flow.channel_id() != channel_id {
            return false;
        }
        match outcome {
            CloseOutcome::Closed(_) => self.dismiss_modal(),
            CloseOutcome::Failed(message) => flow.fail(message.clone()),
        }
        true
    }
}

/// Rendered rows of one card plus the offsets the list needs for clicks.
pub struct CardLines {
    pub lines: Vec<Line<'static>>,
    /// Row of the "Close Channel" button inside `lines`, when shown.
    pub close_row: Option<usize>,
    pub has_details: bool,
}

pub struct CardRender<'a> {
    pub record: &'a ChannelRecord,
    pub ctx: &'a DisplayContext,
    pub capability: Capability,
    pub expanded: bool,
    pub is_cursor: bool,
    pub width: u16,
}

impl CardRender<'_> {
    pub fn lines(&self) -> CardLines {
        let summary = view::summarize(self.record, self.ctx);
        let accent = accent_color(summary.accent);
        let width = self.width as usize;
        let row_style = if self.is_cursor {
            Style::default().bg(C_SELECTION_BG)
        } else {
            Style::default()
        };

        let mut lines = Vec::new();

        // ── Row 1: chevron, dots, alias, capacity, icons ─────────────────────
        let chevron = if self.expanded { "▾" } else { "▸" };
        let mut right = vec![Span::styled(
            summary.capacity.clone(),
            Style::default().fg(C_PRIMARY),
        )];
        right.push(Span::raw("  "));
        if summary.privacy.is_some() {
            right.push(Span::styled(
                format!("{} ", PrivacyIcon::GLYPH),
                Style::default().fg(C_SECONDARY),
            ));
        }
        right.push(Span::styled(
            summary.initiator.icon(),
            Style::default().fg(C_SECONDARY),
        ));
        right.push(Span::raw(" "));
        let right_w: usize = right.iter().map(|s| s.width()).sum();

        // accent(1) + space + chevron + space + dots(5) + 2 spaces
        let left_fixed = 11;
        let alias_w = width
            .saturating_sub(left_fixed + right_w + 1)
            .max(MIN_ALIAS_WIDTH);
        let alias_style = if self.is_cursor || self.expanded {
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_SECONDARY)
        };

        let mut row1 = vec![
            accent_span(accent),
            Span::raw(" "),
            Span::styled(chevron, Style::default().fg(C_MUTED)),
            Span::raw(" "),
        ];
        row1.extend(dot_spans(&summary.dots));
        row1.push(Span::raw("  "));
        row1.push(Span::styled(fit(&summary.alias, alias_w), alias_style));
        row1.push(Span::raw(" "));
        row1.extend(right);
        lines.push(Line::from(row1).style(row_style));

        // ── Row 2: balance and activity bars ─────────────────────────────────
        lines.push(
            Line::from(vec![
                accent_span(accent),
                Span::raw("          "),
                Span::styled("bal ", Style::default().fg(C_MUTED)),
                bar_span(summary.balance_pct, BAR_WIDTH, C_LOCAL),
                Span::styled(
                    format!(" {:>4}   ", format!("{:.0}%", summary.balance_pct)),
                    Style::default().fg(C_SECONDARY),
                ),
                Span::styled("act ", Style::default().fg(C_MUTED)),
                bar_span(summary.activity_pct, BAR_WIDTH, C_ACTIVITY),
                Span::styled(
                    format!(" {:>4}", format!("{:.0}%", summary.activity_pct)),
                    Style::default().fg(C_SECONDARY),
                ),
            ])
            .style(row_style),
        );

        // ── Bar hints under the cursor card ──────────────────────────────────
        if self.is_cursor {
            let hints = view::bar_hints(self.record, self.ctx);
            lines.push(Line::from(vec![
                accent_span(accent),
                Span::raw("          "),
                Span::styled(
                    format!("{}  ·  {}", hints.balance, hints.activity),
                    Style::default().fg(C_MUTED),
                ),
            ]));
        }

        if !self.expanded {
            return CardLines {
                lines,
                close_row: None,
                has_details: false,
            };
        }

        // ── Details panel ────────────────────────────────────────────────────
        let panel = view::details(self.record, self.ctx, self.capability);
        lines.push(separator(accent, width));
        for row in &panel.lines {
            lines.push(prefixed(accent, render_line(row, DETAIL_INDENT)));
        }
        lines.push(Line::from(vec![
            accent_span(accent),
            Span::raw(DETAIL_INDENT),
            Span::styled(
                "Partner Node Info",
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            ),
        ]));
        for row in &panel.partner_lines {
            lines.push(prefixed(accent, render_line(row, DETAIL_INDENT)));
        }

        let close_row = panel.close_action.as_ref().map(|_| {
            lines.push(separator(accent, width));
            lines.push(Line::from(vec![
                accent_span(accent),
                Span::raw(DETAIL_INDENT),
                Span::styled(
                    "[ Close Channel ]",
                    Style::default().fg(C_DANGER).add_modifier(Modifier::BOLD),
                ),
                Span::styled("  x", Style::default().fg(C_MUTED)),
            ]));
            lines.len() - 1
        });

        CardLines {
            lines,
            close_row,
            has_details: true,
        }
    }
}

fn accent_span(accent: Color) -> Span<'static> {
    Span::styled("▌", Style::default().fg(accent))
}

fn prefixed(accent: Color, line: Line<'static>) -> Line<'static> {
    let mut spans = vec![accent_span(accent)];
    spans.extend(line.spans);
    Line::from(spans)
}

fn separator(accent: Color, width: usize) -> Line<'static> {
    Line::from(vec![
        accent_span(accent),
        Span::raw(" "),
        Span::styled(
            "─".repeat(width.saturating_sub(3)),
            Style::default().fg(C_SEPARATOR),
        ),
    ])
}

/// Truncate to `width` display columns (with an ellipsis) and pad.
pub fn fit(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    if text.width() <= width {
        return format!("{}{}", text, " ".repeat(width - text.width()));
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::close_flow::FlowStep;
    use crate::view::tests::{ctx, record};

    fn close_action() -> CloseAction {
        CloseAction {
            channel_id: "chan-1".into(),
            channel_name: "ACINQ".into(),
        }
    }

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_modal_only_opens_when_expanded() {
        let mut card = ChannelCard::new();
        assert!(!card.open_modal(false, &close_action()));
        assert_eq!(card.phase(false), CardPhase::Collapsed);

        assert!(card.open_modal(true, &close_action()));
        assert_eq!(card.phase(true), CardPhase::Closing);
        assert!(!card.open_modal(true, &close_action()));
    }

    #[test]
    fn test_modal_receives_identity_unchanged() {
        let mut card = ChannelCard::new();
        card.open_modal(true, &close_action());
        let flow = card.flow().unwrap();
        assert_eq!(flow.channel_id(), "chan-1");
        assert_eq!(flow.channel_name(), "ACINQ");
    }

    #[test]
    fn test_dismiss_returns_to_expanded() {
        let mut card = ChannelCard::new();
        card.open_modal(true, &close_action());
        card.dismiss_modal();
        assert_eq!(card.phase(true), CardPhase::Expanded);
    }

    #[test]
    fn test_collapse_resets_modal() {
        let mut card = ChannelCard::new();
        card.open_modal(true, &close_action());
        card.collapse();
        assert_eq!(card.modal(), &ModalState::Closed);
        assert_eq!(card.phase(true), CardPhase::Expanded);
    }

    #[test]
    fn test_finish_close() {
        let mut card = ChannelCard::new();
        card.open_modal(true, &close_action());
        card.flow_mut().unwrap().submit();

        assert!(!card.finish_close("other", &CloseOutcome::Closed("ok".into())));
        assert!(card.finish_close("chan-1", &CloseOutcome::Failed("offline".into())));
        assert_eq!(
            card.flow().unwrap().step(),
            &FlowStep::Failed("offline".into())
        );

        card.flow_mut().unwrap().retry();
        card.flow_mut().unwrap().submit();
        assert!(card.finish_close("chan-1", &CloseOutcome::Closed("ok".into())));
        assert_eq!(card.phase(true), CardPhase::Expanded);
    }

    #[test]
    fn test_collapsed_card_has_summary_only() {
        let r = record("a", Some("ACINQ"));
        let c = ctx();
        let out = CardRender {
            record: &r,
            ctx: &c,
            capability: Capability::Admin,
            expanded: false,
            is_cursor: false,
            width: 80,
        }
        .lines();
        assert_eq!(out.lines.len(), SUMMARY_ROWS);
        assert!(!out.has_details);
        assert!(out.close_row.is_none());
        let t = text(&out.lines);
        assert!(t.contains("ACINQ"));
        assert!(t.contains("1,000,000 sats"));
        assert!(t.contains("70%"));
        assert!(!t.contains(PrivacyIcon::GLYPH));
    }

    #[test]
    fn test_private_card_shows_privacy_glyph() {
        let mut r = record("a", Some("ACINQ"));
        r.is_private = true;
        let c = ctx();
        let out = CardRender {
            record: &r,
            ctx: &c,
            capability: Capability::Viewer,
            expanded: false,
            is_cursor: false,
            width: 80,
        }
        .lines();
        assert!(text(&out.lines).contains(PrivacyIcon::GLYPH));
    }

    #[test]
    fn test_expanded_card_lists_details() {
        let r = record("a", Some("ACINQ"));
        let c = ctx();
        let render = |capability| {
            CardRender {
                record: &r,
                ctx: &c,
                capability,
                expanded: true,
                is_cursor: true,
                width: 100,
            }
            .lines()
        };

        let viewer = render(Capability::Viewer);
        let t = text(&viewer.lines);
        assert!(viewer.has_details);
        assert!(t.contains("Partner Node Info"));
        assert!(t.contains("Unsettled Balance:"));
        assert!(t.contains("local 700,000 sats / remote 300,000 sats"));
        assert!(!t.contains("Close Channel"));
        assert!(viewer.close_row.is_none());

        let admin = render(Capability::Admin);
        let row = admin.close_row.unwrap();
        assert_eq!(row, admin.lines.len() - 1);
        assert!(text(&admin.lines[row..]).contains("[ Close Channel ]"));
    }

    #[test]
    fn test_fit() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 4), "abc…");
        assert_eq!(fit("abc", 0), "");
        assert_eq!(fit("日本語テキスト", 5).width(), 5);
    }
}
