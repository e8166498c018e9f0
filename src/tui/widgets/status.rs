// ABOUTME: Status bar widget showing connection status, session id, and message count.
// ABOUTME: Displayed at the bottom of the widget panel as a single-line summary.

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::tui::state::WidgetStatus;

/// Label and color for a connection status.
pub fn status_label(status: WidgetStatus) -> (&'static str, Color) {
    match status {
        WidgetStatus::Connecting => ("connecting...", Color::Yellow),
        WidgetStatus::Online => ("online", Color::Green),
        WidgetStatus::Offline => ("offline", Color::DarkGray),
        WidgetStatus::Unavailable => ("unavailable", Color::Red),
    }
}

/// Render the status bar line.
pub fn status_line(
    status: WidgetStatus,
    session_label: Option<&str>,
    message_count: usize,
) -> Line<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let (label, color) = status_label(status);

    let mut spans = vec![Span::styled(
        format!(" ● {} ", label),
        Style::default().fg(color),
    )];

    if let Some(session) = session_label {
        spans.push(Span::styled("| ", dim));
        spans.push(Span::styled(format!("#{} ", session), dim));
    }

    spans.push(Span::styled("| ", dim));
    spans.push(Span::styled(
        format!("{} msgs ", message_count),
        Style::default().fg(Color::White),
    ));

    Line::from(spans)
}
