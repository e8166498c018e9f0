// ABOUTME: TUI module — ratatui rendering of the chat widget.
// ABOUTME: Launcher badge, message log panel, input handling, and status bar.

pub mod input;
pub mod state;
pub mod ui;
pub mod widgets;

pub use state::*;
