// ABOUTME: Widget UI state — visibility, append-only message log, input buffer, and status.
// ABOUTME: Pure data driven by the controller and read by the rendering functions.

use chrono::{DateTime, Local};

use crate::channel::SenderType;
use crate::config::WidgetConfig;

/// One entry in the visible message log.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub sender: SenderType,
    pub content: String,
    pub received_at: DateTime<Local>,
}

/// Connection status as presented in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetStatus {
    /// Bootstrap or channel handshake still in progress.
    Connecting,
    Online,
    /// The channel closed; no reconnection is attempted.
    Offline,
    /// Session bootstrap or channel setup failed; chat is inert.
    Unavailable,
}

/// Full widget state.
pub struct WidgetState {
    pub visible: bool,
    pub entries: Vec<LogEntry>,
    pub input: String,
    pub cursor_pos: usize,
    pub scroll_offset: u16,
    pub status: WidgetStatus,
    pub session_label: Option<String>,
    pub title: String,
    pub placeholder: String,
    pub launcher_label: String,
    pub hyperlinks: bool,
}

impl WidgetState {
    /// Create a hidden-or-open empty widget from its presentation settings.
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            visible: config.start_open,
            entries: Vec::new(),
            input: String::new(),
            cursor_pos: 0,
            scroll_offset: 0,
            status: WidgetStatus::Connecting,
            session_label: None,
            title: config.title.clone(),
            placeholder: config.placeholder.clone(),
            launcher_label: config.launcher_label.clone(),
            hyperlinks: config.hyperlinks,
        }
    }

    /// Flip panel visibility.
    pub fn toggle_visible(&mut self) {
        self.visible = !self.visible;
    }

    /// Append an entry at the end of the log and pin the view to the bottom.
    pub fn push_entry(&mut self, sender: SenderType, content: String) {
        self.entries.push(LogEntry {
            sender,
            content,
            received_at: Local::now(),
        });
        self.scroll_offset = 0;
    }

    /// Take the trimmed input, clearing the buffer whether or not it was blank.
    pub fn take_input(&mut self) -> Option<String> {
        let trimmed = self.input.trim().to_string();
        self.input.clear();
        self.cursor_pos = 0;
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }

    /// Insert pasted text at the cursor; line breaks become spaces.
    pub fn insert_str_at_cursor(&mut self, text: &str) {
        for c in text.chars() {
            let c = if c == '\r' || c == '\n' { ' ' } else { c };
            self.insert_char_at_cursor(c);
        }
    }

    /// Clamp the cursor position to the valid character range of the input buffer.
    pub fn clamp_cursor(&mut self) {
        self.cursor_pos = self.cursor_pos.min(self.input_char_len());
    }

    /// Return the current cursor byte index in the UTF-8 input buffer.
    pub fn cursor_byte_index(&self) -> usize {
        char_index_to_byte_index(&self.input, self.cursor_pos)
    }

    /// Return the total number of characters in the input buffer.
    pub fn input_char_len(&self) -> usize {
        self.input.chars().count()
    }

    /// Insert a character at the cursor and advance by one character.
    pub fn insert_char_at_cursor(&mut self, c: char) {
        self.clamp_cursor();
        let byte_index = self.cursor_byte_index();
        self.input.insert(byte_index, c);
        self.cursor_pos += 1;
    }

    /// Delete the character before the cursor (backspace behavior).
    pub fn backspace_char(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos == 0 {
            return;
        }

        let end = self.cursor_byte_index();
        let start = char_index_to_byte_index(&self.input, self.cursor_pos - 1);
        self.input.replace_range(start..end, "");
        self.cursor_pos -= 1;
    }

    /// Delete the character at the cursor (delete behavior).
    pub fn delete_char_at_cursor(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos >= self.input_char_len() {
            return;
        }

        let start = self.cursor_byte_index();
        let end = char_index_to_byte_index(&self.input, self.cursor_pos + 1);
        self.input.replace_range(start..end, "");
    }

    pub fn move_cursor_left(&mut self) {
        self.clamp_cursor();
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos < self.input_char_len() {
            self.cursor_pos += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_pos = self.input_char_len();
    }
}

fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    if char_index == 0 {
        return 0;
    }

    match s.char_indices().nth(char_index) {
        Some((idx, _)) => idx,
        None => s.len(),
    }
}
