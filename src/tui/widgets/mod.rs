// ABOUTME: TUI widget sub-modules for the message log, status bar, and launcher badge.
// ABOUTME: Each widget is a pure rendering function over widget state.

pub mod chat;
pub mod launcher;
pub mod status;
