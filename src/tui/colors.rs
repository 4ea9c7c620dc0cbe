use crate::navigation::Route;
use ratatui::style::{Color, Modifier, Style};

pub const CHROME_BG: Color = Color::Rgb(30, 34, 42);
pub const TEXT: Color = Color::Rgb(225, 228, 232);
pub const MUTED: Color = Color::Rgb(140, 146, 156);
pub const ACCENT: Color = Color::Rgb(64, 178, 170);
pub const SELECTION_BG: Color = Color::Rgb(64, 178, 170);
pub const SELECTION_FG: Color = Color::Rgb(16, 20, 24);
pub const SIDEBAR_BG: Color = Color::Rgb(24, 28, 35);
pub const TABLE_HEADER_BG: Color = Color::Rgb(0, 95, 135);
pub const ROW_ALT_BG: Color = Color::Rgb(25, 25, 35);
pub const STATUS_BG: Color = Color::Rgb(0, 95, 135);
pub const DANGER: Color = Color::Red;

pub fn route_icon(route: &Route) -> &'static str {
    match route.section() {
        Some(item) => item.icon,
        None => "\u{2192}",
    }
}

/// Sidebar link style. The overlay uses the stronger primary highlight.
pub fn nav_style(active: bool, focused: bool, overlay: bool) -> Style {
    match (active, overlay) {
        (true, false) => Style::default()
            .fg(SELECTION_FG)
            .bg(ACCENT)
            .add_modifier(Modifier::BOLD),
        (true, true) => Style::default()
            .fg(Color::White)
            .bg(TABLE_HEADER_BG)
            .add_modifier(Modifier::BOLD),
        (false, _) if focused => Style::default().fg(TEXT).bg(Color::Rgb(45, 52, 64)),
        (false, _) => Style::default().fg(TEXT),
    }
}

/// Highlighted vs plain dropdown row
pub fn row_style(highlighted: bool) -> Style {
    if highlighted {
        Style::default()
            .fg(SELECTION_FG)
            .bg(SELECTION_BG)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT)
    }
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}
