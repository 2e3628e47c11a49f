//! FilterInput: tui-input backed filter bar for the channel list.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::theme::{C_FILTER_BG, C_FILTER_FG, C_MUTED};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    Changed(String),
    Confirmed,
    Cancelled,
}

pub struct FilterInput {
    input: Input,
    active: bool,
    placeholder: &'static str,
}

impl FilterInput {
    pub fn new(placeholder: &'static str) -> Self {
        Self {
            input: Input::default(),
            active: false,
            placeholder,
        }
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn clear(&mut self) {
        self.input = Input::default();
    }

    pub fn text(&self) -> &str {
        self.input.value()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Esc clears the text first and closes the bar on the second press.
    /// Enter keeps the current filter and closes the bar.
    pub fn handle_key(&mut self, key: KeyEvent) -> FilterAction {
        match key.code {
            KeyCode::Esc if !self.input.value().is_empty() => {
                self.clear();
                FilterAction::Changed(String::new())
            }
            KeyCode::Esc => {
                self.deactivate();
                FilterAction::Cancelled
            }
            KeyCode::Enter => {
                self.deactivate();
                FilterAction::Confirmed
            }
            _ => {
                self.input.handle_event(&Event::Key(key));
                FilterAction::Changed(self.input.value().to_string())
            }
        }
    }

    /// One-row bar: `/ query` on the left, `shown/total` on the right.
    pub fn draw(&self, frame: &mut Frame, area: Rect, shown: usize, total: usize) {
        let counter = format!(" {}/{} ", shown, total);
        let text_w = (area.width as usize).saturating_sub(counter.len() + 2);
        let scroll = self.input.visual_scroll(text_w);
        let value = self.input.value();

        let query = if value.is_empty() {
            Span::styled(format!("/ {}", self.placeholder), Style::default().fg(C_MUTED))
        } else {
            let visible: String = value.chars().skip(scroll).collect();
            Span::styled(format!("/ {}", visible), Style::default().fg(C_FILTER_FG))
        };
        let pad = (area.width as usize)
            .saturating_sub(query.width() + counter.len());
        let line = Line::from(vec![
            query,
            Span::raw(" ".repeat(pad)),
            Span::styled(counter, Style::default().fg(C_MUTED)),
        ]);
        frame.render_widget(
            Paragraph::new(line).style(Style::default().bg(C_FILTER_BG)),
            area,
        );

        if self.active && area.width > 2 {
            let cursor_x = area.x + 2 + (self.input.visual_cursor().saturating_sub(scroll)) as u16;
            frame.set_cursor_position((cursor_x.min(area.x + area.width - 1), area.y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_then_double_escape() {
        let mut f = FilterInput::new("alias");
        f.activate();
        assert_eq!(
            f.handle_key(key(KeyCode::Char('a'))),
            FilterAction::Changed("a".into())
        );
        assert_eq!(
            f.handle_key(key(KeyCode::Esc)),
            FilterAction::Changed(String::new())
        );
        assert!(f.is_active());
        assert_eq!(f.handle_key(key(KeyCode::Esc)), FilterAction::Cancelled);
        assert!(!f.is_active());
    }

    #[test]
    fn test_enter_keeps_text() {
        let mut f = FilterInput::new("alias");
        f.activate();
        f.handle_key(key(KeyCode::Char('x')));
        assert_eq!(f.handle_key(key(KeyCode::Enter)), FilterAction::Confirmed);
        assert_eq!(f.text(), "x");
        assert!(!f.is_active());
    }
}
