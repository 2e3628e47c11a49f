//! Toast notifications: transient messages in the top-right corner.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::theme::{C_TOAST_ERROR, C_TOAST_INFO, C_TOAST_SUCCESS, C_TOAST_WARNING};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    fn icon(self) -> &'static str {
        match self {
            Self::Info => "·",
            Self::Success => "✓",
            Self::Warning => "!",
            Self::Error => "✗",
        }
    }

    fn lifetime(self) -> Duration {
        match self {
            Self::Info | Self::Success => Duration::from_secs(3),
            Self::Warning => Duration::from_secs(4),
            Self::Error => Duration::from_secs(6),
        }
    }
}

struct Toast {
    message: String,
    severity: Severity,
    expires: Instant,
}

pub struct ToastManager {
    toasts: VecDeque<Toast>,
    max_visible: usize,
}

impl ToastManager {
    pub fn new() -> Self {
        Self {
            toasts: VecDeque::new(),
            max_visible: 4,
        }
    }

    pub fn push(&mut self, message: impl Into<String>, severity: Severity) {
        let message = message.into();
        // Same text again just refreshes its timer
        self.toasts.retain(|t| t.message != message);
        self.toasts.push_back(Toast {
            message,
            severity,
            expires: Instant::now() + severity.lifetime(),
        });
        while self.toasts.len() > self.max_visible * 2 {
            self.toasts.pop_front();
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Info);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Success);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Warning);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Error);
    }

    /// Drop expired toasts. Returns true when something disappeared.
    pub fn tick(&mut self) -> bool {
        let now = Instant::now();
        let before = self.toasts.len();
        self.toasts.retain(|t| t.expires > now);
        self.toasts.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    /// Newest first, one row each, right-aligned under the top border.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        if self.is_empty() || area.height < 2 {
            return;
        }
        let max_width = (area.width / 2).clamp(30, 60).min(area.width);
        let mut y = area.y + 1;

        for toast in self.toasts.iter().rev().take(self.max_visible) {
            if y >= area.y + area.height {
                break;
            }
            let color = match toast.severity {
                Severity::Info => C_TOAST_INFO,
                Severity::Success => C_TOAST_SUCCESS,
                Severity::Warning => C_TOAST_WARNING,
                Severity::Error => C_TOAST_ERROR,
            };
            let w = (toast.message.chars().count() as u16 + 4).min(max_width);
            let toast_area = Rect {
                x: area.x + area.width.saturating_sub(w + 1),
                y,
                width: w,
                height: 1,
            };
            frame.render_widget(Clear, toast_area);
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    format!(" {} {} ", toast.severity.icon(), toast.message),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ))),
                toast_area,
            );
            y += 1;
        }
    }
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new()
    }
}
