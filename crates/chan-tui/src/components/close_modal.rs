//! Close-channel modal: key handling and rendering for a `CloseChannelFlow`.
//!
//! The flow lives inside the card that opened it; the channel list forwards
//! keys here while the modal is showing.

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::action::Action;
use crate::close_flow::{CloseChannelFlow, FlowStep, TARGET_CONFIRMATIONS};
use crate::theme::{C_ACCENT, C_DANGER, C_MUTED, C_PRIMARY, C_SECONDARY};
use crate::widgets::modal::{draw_modal_frame, modal_area};

const MODAL_WIDTH: u16 = 56;
const MODAL_HEIGHT: u16 = 12;

pub fn handle_key(flow: &mut CloseChannelFlow, key: KeyEvent) -> Vec<Action> {
    match (flow.step(), key.code) {
        (_, KeyCode::Esc) => vec![Action::DismissModal],
        (FlowStep::Confirm, KeyCode::Char('f')) => {
            flow.toggle_force();
            vec![]
        }
        (FlowStep::Confirm, KeyCode::Left | KeyCode::Char('h')) => {
            flow.prev_target();
            vec![]
        }
        (FlowStep::Confirm, KeyCode::Right | KeyCode::Char('l')) => {
            flow.next_target();
            vec![]
        }
        (FlowStep::Confirm, KeyCode::Enter) => flow
            .submit()
            .map(|request| vec![Action::SubmitClose(request)])
            .unwrap_or_default(),
        (FlowStep::Failed(_), KeyCode::Enter) => {
            flow.retry();
            vec![]
        }
        _ => vec![],
    }
}

/// Draw the modal centred in `screen` and return its outer rect.
pub fn draw(frame: &mut Frame, screen: Rect, flow: &CloseChannelFlow) -> Rect {
    let area = modal_area(MODAL_WIDTH, MODAL_HEIGHT, screen);
    let inner = draw_modal_frame(frame, area, "Close Channel");

    let label = Style::default().fg(C_SECONDARY);
    let value = Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD);
    let key = Style::default().fg(C_ACCENT);
    let muted = Style::default().fg(C_MUTED);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(" Close channel with ", label),
            Span::styled(flow.channel_name().to_string(), value),
        ]),
        Line::from(Span::styled(format!(" {}", flow.channel_id()), muted)),
        Line::default(),
        Line::from(vec![
            Span::styled(" [f]  ", key),
            Span::styled(format!("{:<16}", "force close"), label),
            if flow.force() {
                Span::styled("yes", Style::default().fg(C_DANGER).add_modifier(Modifier::BOLD))
            } else {
                Span::styled("no", value)
            },
        ]),
        Line::from(vec![
            Span::styled(" [←→] ", key),
            Span::styled(format!("{:<16}", "fee target"), label),
            Span::styled(format!("{} blocks", flow.target_confirmations()), value),
            Span::styled(
                format!(
                    "  ({}-{})",
                    TARGET_CONFIRMATIONS[0],
                    TARGET_CONFIRMATIONS[TARGET_CONFIRMATIONS.len() - 1]
                ),
                muted,
            ),
        ]),
        Line::default(),
    ];

    match flow.step() {
        FlowStep::Confirm => lines.push(Line::from(vec![
            Span::styled(" Enter ", key),
            Span::styled("close channel   ", label),
            Span::styled("Esc ", key),
            Span::styled("cancel", label),
        ])),
        FlowStep::Submitting => {
            lines.push(Line::from(Span::styled(" closing…", label)));
        }
        FlowStep::Failed(message) => {
            lines.push(Line::from(Span::styled(
                format!(" ✗ {}", message),
                Style::default().fg(C_DANGER),
            )));
            lines.push(Line::from(vec![
                Span::styled(" Enter ", key),
                Span::styled("back   ", label),
                Span::styled("Esc ", key),
                Span::styled("cancel", label),
            ]));
        }
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    area
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_enter_submits_once() {
        let mut flow = CloseChannelFlow::new("812x1x0", "ACINQ");
        handle_key(&mut flow, key(KeyCode::Char('f')));
        handle_key(&mut flow, key(KeyCode::Right));

        let actions = handle_key(&mut flow, key(KeyCode::Enter));
        match actions.as_slice() {
            [Action::SubmitClose(req)] => {
                assert_eq!(req.channel_id, "812x1x0");
                assert_eq!(req.channel_name, "ACINQ");
                assert!(req.force);
                assert_eq!(req.target_confirmations, 12);
            }
            other => panic!("unexpected actions: {other:?}"),
        }
        assert!(handle_key(&mut flow, key(KeyCode::Enter)).is_empty());
    }

    #[test]
    fn test_esc_dismisses_from_any_step() {
        let mut flow = CloseChannelFlow::new("a", "b");
        assert_eq!(handle_key(&mut flow, key(KeyCode::Esc)), vec![Action::DismissModal]);
        flow.submit();
        flow.fail("nope");
        assert_eq!(handle_key(&mut flow, key(KeyCode::Esc)), vec![Action::DismissModal]);
    }

    #[test]
    fn test_enter_after_failure_returns_to_confirm() {
        let mut flow = CloseChannelFlow::new("a", "b");
        flow.submit();
        flow.fail("nope");
        assert!(handle_key(&mut flow, key(KeyCode::Enter)).is_empty());
        assert_eq!(flow.step(), &FlowStep::Confirm);
    }

    #[test]
    fn test_draw_shows_name_and_id() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let flow = CloseChannelFlow::new("812x1x0", "ACINQ");
        let mut rect = Rect::default();
        terminal
            .draw(|f| rect = draw(f, f.area(), &flow))
            .unwrap();
        assert_eq!(rect, Rect::new(12, 6, 56, 12));

        let buf = terminal.backend().buffer();
        let text: String = buf.content.iter().map(|c| c.symbol()).collect();
        assert!(text.contains("ACINQ"));
        assert!(text.contains("812x1x0"));
        assert!(text.contains("6 blocks"));
    }
}
