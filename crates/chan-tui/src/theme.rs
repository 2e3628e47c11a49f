//! Color palette and style constants for the channel dashboard.

use ratatui::style::{Color, Modifier, Style};

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_BG: Color = Color::Rgb(18, 18, 18);
pub const C_ACCENT: Color = Color::Rgb(255, 184, 80);
pub const C_ACTIVE: Color = Color::Rgb(80, 200, 120);
pub const C_OPENING: Color = Color::Rgb(255, 184, 80);
pub const C_CLOSING: Color = Color::Rgb(255, 95, 95);
pub const C_MUTED: Color = Color::Rgb(72, 72, 88);
pub const C_SEPARATOR: Color = Color::Rgb(40, 40, 52);
pub const C_SECONDARY: Color = Color::Rgb(115, 115, 138);
pub const C_PRIMARY: Color = Color::Rgb(210, 210, 225);
pub const C_SELECTION_BG: Color = Color::Rgb(28, 28, 40);
pub const C_PANEL_BORDER: Color = Color::Rgb(40, 40, 52);
pub const C_PANEL_BORDER_FOCUSED: Color = Color::Rgb(120, 100, 200);
pub const C_MODAL_BG: Color = Color::Rgb(18, 18, 26);
pub const C_FILTER_BG: Color = Color::Rgb(20, 20, 32);
pub const C_FILTER_FG: Color = Color::Rgb(255, 200, 80);
pub const C_LOCAL: Color = Color::Rgb(80, 140, 200);
pub const C_ACTIVITY: Color = Color::Rgb(180, 120, 220);
pub const C_BAR_EMPTY: Color = Color::Rgb(34, 34, 46);
pub const C_LINK: Color = Color::Rgb(100, 160, 130);
pub const C_DANGER: Color = Color::Rgb(255, 95, 95);
pub const C_TOAST_INFO: Color = Color::Rgb(80, 160, 220);
pub const C_TOAST_SUCCESS: Color = Color::Rgb(80, 200, 120);
pub const C_TOAST_WARNING: Color = Color::Rgb(255, 184, 80);
pub const C_TOAST_ERROR: Color = Color::Rgb(255, 95, 95);
pub const C_MODE_NORMAL: Color = Color::Rgb(115, 115, 138);
pub const C_MODE_FILTER: Color = Color::Rgb(255, 200, 80);
pub const C_MODE_MODAL: Color = Color::Rgb(255, 95, 95);

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_default() -> Style {
    Style::default().fg(C_PRIMARY)
}

pub fn style_secondary() -> Style {
    Style::default().fg(C_SECONDARY)
}

pub fn style_muted() -> Style {
    Style::default().fg(C_MUTED)
}

pub fn style_title() -> Style {
    Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn style_focused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER_FOCUSED)
}

pub fn style_unfocused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER)
}

/// Partner accent colour, or the theme accent when the node announced none.
pub fn accent_color(rgb: Option<(u8, u8, u8)>) -> Color {
    match rgb {
        Some((r, g, b)) => Color::Rgb(r, g, b),
        None => C_ACCENT,
    }
}
