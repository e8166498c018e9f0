// ABOUTME: Keyboard input handling for the widget. Translates key events into actions.
// ABOUTME: Edits the input buffer in place; launcher, send, and quit are returned to the caller.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::state::WidgetState;

/// The result of processing a key event.
#[derive(Debug, PartialEq)]
pub enum InputResult {
    /// No action needed.
    None,
    /// The launcher control was activated.
    ToggleVisibility,
    /// The send control was activated.
    Submit,
    /// User wants to quit.
    Quit,
}

/// Process a key event against the current widget state and return the resulting action.
pub fn handle_key(state: &mut WidgetState, key: KeyEvent) -> InputResult {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && key.code == KeyCode::Char('c') {
        return InputResult::Quit;
    }

    if key.code == KeyCode::F(2) || (ctrl && key.code == KeyCode::Char('o')) {
        return InputResult::ToggleVisibility;
    }

    if key.code == KeyCode::Esc {
        return InputResult::Quit;
    }

    // The panel's controls only exist while it is shown.
    if !state.visible {
        return InputResult::None;
    }

    match key.code {
        KeyCode::PageUp => {
            state.scroll_offset = state.scroll_offset.saturating_add(10);
            InputResult::None
        }
        KeyCode::PageDown => {
            state.scroll_offset = state.scroll_offset.saturating_sub(10);
            InputResult::None
        }
        KeyCode::Up => {
            state.scroll_offset = state.scroll_offset.saturating_add(1);
            InputResult::None
        }
        KeyCode::Down => {
            state.scroll_offset = state.scroll_offset.saturating_sub(1);
            InputResult::None
        }
        KeyCode::Enter => InputResult::Submit,
        KeyCode::Char(_) if ctrl => InputResult::None,
        KeyCode::Char(c) => {
            state.insert_char_at_cursor(c);
            InputResult::None
        }
        KeyCode::Backspace => {
            state.backspace_char();
            InputResult::None
        }
        KeyCode::Delete => {
            state.delete_char_at_cursor();
            InputResult::None
        }
        KeyCode::Left => {
            state.move_cursor_left();
            InputResult::None
        }
        KeyCode::Right => {
            state.move_cursor_right();
            InputResult::None
        }
        KeyCode::Home => {
            state.move_cursor_home();
            InputResult::None
        }
        KeyCode::End => {
            state.move_cursor_end();
            InputResult::None
        }
        _ => InputResult::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WidgetConfig;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn open_state() -> WidgetState {
        let mut state = WidgetState::new(&WidgetConfig::default());
        state.visible = true;
        state
    }

    #[test]
    fn ctrl_c_quits() {
        let mut state = open_state();
        assert_eq!(handle_key(&mut state, ctrl('c')), InputResult::Quit);
    }

    #[test]
    fn esc_quits() {
        let mut state = open_state();
        assert_eq!(handle_key(&mut state, key(KeyCode::Esc)), InputResult::Quit);
    }

    #[test]
    fn launcher_keys_toggle() {
        let mut state = open_state();
        assert_eq!(
            handle_key(&mut state, key(KeyCode::F(2))),
            InputResult::ToggleVisibility
        );
        assert_eq!(handle_key(&mut state, ctrl('o')), InputResult::ToggleVisibility);
    }

    #[test]
    fn launcher_works_while_hidden() {
        let mut state = WidgetState::new(&WidgetConfig::default());
        assert_eq!(
            handle_key(&mut state, key(KeyCode::F(2))),
            InputResult::ToggleVisibility
        );
    }

    #[test]
    fn typing_while_hidden_is_ignored() {
        let mut state = WidgetState::new(&WidgetConfig::default());
        assert_eq!(handle_key(&mut state, key(KeyCode::Char('x'))), InputResult::None);
        assert_eq!(handle_key(&mut state, key(KeyCode::Enter)), InputResult::None);
        assert_eq!(state.input, "");
    }

    #[test]
    fn typing_characters_edits_input() {
        let mut state = open_state();
        handle_key(&mut state, key(KeyCode::Char('h')));
        handle_key(&mut state, key(KeyCode::Char('i')));
        assert_eq!(state.input, "hi");
        handle_key(&mut state, key(KeyCode::Backspace));
        assert_eq!(state.input, "h");
    }

    #[test]
    fn ctrl_chars_are_not_inserted() {
        let mut state = open_state();
        handle_key(&mut state, ctrl('x'));
        assert_eq!(state.input, "");
    }

    #[test]
    fn enter_submits() {
        let mut state = open_state();
        state.input = "hello".to_string();
        assert_eq!(handle_key(&mut state, key(KeyCode::Enter)), InputResult::Submit);
        // The buffer is left for the controller to take.
        assert_eq!(state.input, "hello");
    }

    #[test]
    fn page_keys_scroll() {
        let mut state = open_state();
        handle_key(&mut state, key(KeyCode::PageUp));
        assert_eq!(state.scroll_offset, 10);
        handle_key(&mut state, key(KeyCode::Down));
        assert_eq!(state.scroll_offset, 9);
        handle_key(&mut state, key(KeyCode::PageDown));
        assert_eq!(state.scroll_offset, 0);
    }
}
