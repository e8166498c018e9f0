// ABOUTME: Launcher badge — the always-visible control that opens and closes the panel.
// ABOUTME: Anchored to the bottom-right corner of the terminal.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use unicode_width::UnicodeWidthStr;

/// Height of the launcher badge including borders.
pub const LAUNCHER_HEIGHT: u16 = 3;

/// Area of the launcher badge inside `area`.
pub fn launcher_area(area: Rect, label: &str) -> Rect {
    // label + one space of padding each side + borders
    let label_width = u16::try_from(UnicodeWidthStr::width(label)).unwrap_or(u16::MAX);
    let width = label_width.saturating_add(4).min(area.width);
    let height = LAUNCHER_HEIGHT.min(area.height);
    Rect::new(
        area.x + area.width - width,
        area.y + area.height - height,
        width,
        height,
    )
}

/// The launcher badge widget; highlighted while the panel is open.
pub fn launcher(label: &str, open: bool) -> Paragraph<'static> {
    let style = if open {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White).bg(Color::Blue)
    };
    Paragraph::new(Line::from(Span::styled(format!(" {} ", label), style))).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Blue)),
    )
}
