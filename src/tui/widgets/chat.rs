// ABOUTME: Message log widget that renders log entries into styled ratatui Lines.
// ABOUTME: Customer and agent entries get distinct prefixes; URLs are drawn as links.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::channel::SenderType;
use crate::linkify::{self, Segment};
use crate::tui::state::LogEntry;

fn link_style() -> Style {
    Style::default()
        .fg(Color::Blue)
        .add_modifier(Modifier::UNDERLINED)
}

/// Spans for one line of message text, with URLs styled as links.
pub fn content_spans(text: &str) -> Vec<Span<'static>> {
    linkify::render(text)
        .into_iter()
        .map(|segment| match segment {
            Segment::Text(text) => Span::raw(text),
            Segment::Link { url } => Span::styled(url, link_style()),
        })
        .collect()
}

/// Every link target in the log, oldest first.
pub fn link_urls(entries: &[LogEntry]) -> Vec<String> {
    entries
        .iter()
        .flat_map(|entry| linkify::render(&entry.content))
        .filter_map(|segment| match segment {
            Segment::Link { url } => Some(url),
            Segment::Text(_) => None,
        })
        .collect()
}

fn is_link_cell(buf: &Buffer, x: u16, y: u16) -> bool {
    let cell = &buf[(x, y)];
    !cell.skip && cell.fg == Color::Blue && cell.modifier.contains(Modifier::UNDERLINED)
}

fn osc8(url: &str, text: &str) -> String {
    format!("\x1b]8;;{url}\x1b\\{text}\x1b]8;;\x1b\\")
}

/// Wrap the rendered link cells inside `area` in OSC 8 hyperlink escapes.
///
/// Each row-local run of link cells is matched to the first URL containing
/// its text, so a URL wrapped over several rows links every piece to the
/// full target. Cells are wrapped two at a time with the second skipped,
/// which keeps the backend's width accounting intact.
pub fn mark_hyperlinks(buf: &mut Buffer, area: Rect, urls: &[String]) {
    let area = area.intersection(buf.area);
    for y in area.top()..area.bottom() {
        let mut x = area.left();
        while x < area.right() {
            if !is_link_cell(buf, x, y) {
                x += 1;
                continue;
            }
            let start = x;
            while x < area.right() && is_link_cell(buf, x, y) {
                x += 1;
            }
            let run: String = (start..x).map(|cx| buf[(cx, y)].symbol()).collect();
            let Some(url) = urls.iter().find(|url| url.contains(run.as_str())) else {
                continue;
            };

            let mut cx = start;
            while cx < x {
                let end = (cx + 2).min(x);
                let text: String = (cx..end).map(|c| buf[(c, y)].symbol()).collect();
                buf[(cx, y)].set_symbol(&osc8(url, &text));
                if end > cx + 1 {
                    buf[(cx + 1, y)].set_skip(true);
                }
                cx = end;
            }
        }
    }
}

/// Render the message log into styled Lines for display.
pub fn render_log_lines(entries: &[LogEntry]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (idx, entry) in entries.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(""));
        }

        let (prefix, color) = match entry.sender {
            SenderType::Customer => ("❯ ", Color::Green),
            SenderType::Agent => ("⏺ ", Color::Cyan),
        };
        let time = entry.received_at.format("%H:%M ").to_string();

        // First line gets the prefix and time, continuation lines are indented.
        for (i, text) in entry.content.split('\n').enumerate() {
            let mut spans = if i == 0 {
                vec![
                    Span::styled(
                        prefix,
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(time.clone(), Style::default().fg(Color::DarkGray)),
                ]
            } else {
                vec![Span::raw("  ")]
            };
            spans.extend(content_spans(text));
            lines.push(Line::from(spans));
        }
    }

    lines
}
