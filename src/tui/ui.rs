// ABOUTME: Main widget rendering function. Draws the launcher badge and, when open, the chat panel.
// ABOUTME: The panel stacks message log, input line, and status bar above the launcher.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::tui::state::{LogEntry, WidgetState, WidgetStatus};
use crate::tui::widgets::chat::{link_urls, mark_hyperlinks, render_log_lines};
use crate::tui::widgets::launcher::{LAUNCHER_HEIGHT, launcher, launcher_area};
use crate::tui::widgets::status::status_line;

const PANEL_MAX_WIDTH: u16 = 56;
const PANEL_MAX_HEIGHT: u16 = 24;

/// Area of the chat panel: bottom-right, directly above the launcher badge.
pub fn panel_area(area: Rect) -> Rect {
    let width = PANEL_MAX_WIDTH.min(area.width);
    let height = PANEL_MAX_HEIGHT.min(area.height.saturating_sub(LAUNCHER_HEIGHT));
    Rect::new(
        area.x + area.width - width,
        area.y + area.height.saturating_sub(LAUNCHER_HEIGHT) - height,
        width,
        height,
    )
}

/// Wrapped paragraph over the newest log entries and its height in lines.
///
/// Paragraph scrolling is addressed in `u16` lines, so the oldest entries are
/// dropped from view until the wrapped height fits.
fn log_tail(entries: &[LogEntry], width: u16) -> (Paragraph<'static>, u16) {
    let mut first = 0;
    loop {
        let paragraph =
            Paragraph::new(render_log_lines(&entries[first..])).wrap(Wrap { trim: false });
        match u16::try_from(paragraph.line_count(width)) {
            Ok(total) => return (paragraph, total),
            Err(_) if entries.len() - first > 1 => first += (entries.len() - first) / 2,
            Err(_) => return (paragraph, u16::MAX),
        }
    }
}

/// Render the full widget to the given frame.
pub fn render(frame: &mut Frame, state: &mut WidgetState) {
    let area = frame.area();

    frame.render_widget(
        launcher(&state.launcher_label, state.visible),
        launcher_area(area, &state.launcher_label),
    );

    if !state.visible {
        return;
    }

    let panel = panel_area(area);
    // Title row + log + input (2 borders + 1 line) + status + panel borders.
    if panel.height < 7 || panel.width < 10 {
        return;
    }

    frame.render_widget(Clear, panel);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Blue))
        .title(Span::styled(
            format!(" {} ", state.title),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(panel);
    frame.render_widget(block, panel);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Message log
            Constraint::Length(3), // Input
            Constraint::Length(1), // Status bar
        ])
        .split(inner);

    // Message log
    let log_chunk = chunks[0];
    // line_count() matches ratatui's own wrapping, so the bottom of the log is never clipped.
    let (log_paragraph, total_lines) = log_tail(&state.entries, log_chunk.width);
    let max_scroll = total_lines.saturating_sub(log_chunk.height);
    if state.scroll_offset > max_scroll {
        state.scroll_offset = max_scroll;
    }
    // scroll_offset is lines scrolled up from the bottom (0 = at bottom)
    let scroll = max_scroll.saturating_sub(state.scroll_offset);
    frame.render_widget(log_paragraph.scroll((scroll, 0)), log_chunk);
    if state.hyperlinks {
        mark_hyperlinks(frame.buffer_mut(), log_chunk, &link_urls(&state.entries));
    }

    // Input
    let input_chunk = chunks[1];
    let live = state.status == WidgetStatus::Online;
    let input_block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(Style::default().fg(if live { Color::Blue } else { Color::DarkGray }));

    let input = if state.input.is_empty() {
        Paragraph::new(Span::styled(
            state.placeholder.clone(),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Paragraph::new(Span::raw(state.input.clone()))
    };
    frame.render_widget(input.block(input_block), input_chunk);

    if input_chunk.width > 0 && input_chunk.height > 1 {
        state.clamp_cursor();
        let prefix: String = state.input.chars().take(state.cursor_pos).collect();
        let visual_col = UnicodeWidthStr::width(prefix.as_str());
        let max_visual_col = input_chunk.width.saturating_sub(1) as usize;
        let cursor_x = input_chunk
            .x
            .saturating_add(visual_col.min(max_visual_col) as u16);
        // +1 for the top border.
        let cursor_y = input_chunk.y.saturating_add(1);
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }

    // Status bar
    let status = status_line(
        state.status,
        state.session_label.as_deref(),
        state.entries.len(),
    );
    frame.render_widget(Paragraph::new(status), chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use crate::channel::SenderType;
    use crate::config::WidgetConfig;

    #[test]
    fn panel_sits_above_launcher() {
        let panel = panel_area(Rect::new(0, 0, 100, 40));
        assert_eq!(panel.width, PANEL_MAX_WIDTH);
        assert_eq!(panel.height, PANEL_MAX_HEIGHT);
        assert_eq!(panel.right(), 100);
        assert_eq!(panel.bottom(), 40 - LAUNCHER_HEIGHT);
    }

    #[test]
    fn panel_shrinks_to_small_terminals() {
        let panel = panel_area(Rect::new(0, 0, 30, 12));
        assert_eq!(panel.width, 30);
        assert_eq!(panel.height, 9);
        assert_eq!(panel.y, 0);
    }

    fn entries(count: usize) -> Vec<LogEntry> {
        (0..count)
            .map(|i| LogEntry {
                sender: SenderType::Agent,
                content: format!("m{}", i),
                received_at: Local::now(),
            })
            .collect()
    }

    #[test]
    fn log_tail_keeps_whole_short_log() {
        let (_, total) = log_tail(&entries(3), 40);
        // three lines plus two separators
        assert_eq!(total, 5);
    }

    #[test]
    fn log_tail_fits_line_count_into_scroll_range() {
        // 33_000 entries wrap to 65_999 lines, past u16::MAX.
        let log = entries(33_000);
        let (paragraph, total) = log_tail(&log, 40);
        // The newest 16_500 entries remain.
        assert_eq!(total, 32_999);
        assert_eq!(paragraph.line_count(40), 32_999);
    }

    #[test]
    fn oversized_log_still_shows_newest_entry() {
        let mut state = WidgetState::new(&WidgetConfig {
            start_open: true,
            ..WidgetConfig::default()
        });
        state.entries = entries(33_000);
        let mut terminal = Terminal::new(TestBackend::new(60, 30)).unwrap();
        terminal.draw(|frame| render(frame, &mut state)).unwrap();

        let buf = terminal.backend().buffer();
        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("m32999"), "newest entry should be visible");
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn panel_is_empty_when_only_launcher_fits() {
        let panel = panel_area(Rect::new(0, 0, 30, 2));
        assert_eq!(panel.height, 0);
    }
}
