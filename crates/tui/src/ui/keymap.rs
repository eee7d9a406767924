use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    Cancel,
    NextField,
    PrevField,
    Submit,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    PrevDay,
    NextDay,
    AcceptSuggestion,
    Delete,
    Input(char),
    None,
}

/// Keys that depend on focus (`q`, `d` on the table) arrive as `Input` and
/// are resolved by the app.
pub fn map_key(key: KeyEvent) -> AppAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => AppAction::Quit,
            KeyCode::Char('s') => AppAction::AcceptSuggestion,
            _ => AppAction::None,
        };
    }

    match key.code {
        KeyCode::Esc => AppAction::Cancel,
        KeyCode::Tab => AppAction::NextField,
        KeyCode::BackTab => AppAction::PrevField,
        KeyCode::Enter => AppAction::Submit,
        KeyCode::Backspace => AppAction::Backspace,
        KeyCode::Up => AppAction::Up,
        KeyCode::Down => AppAction::Down,
        KeyCode::Left => AppAction::Left,
        KeyCode::Right => AppAction::Right,
        KeyCode::PageUp => AppAction::PrevDay,
        KeyCode::PageDown => AppAction::NextDay,
        KeyCode::Delete => AppAction::Delete,
        KeyCode::Char(ch) => AppAction::Input(ch),
        _ => AppAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_chords_win_over_plain_characters() {
        let accept = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(map_key(accept), AppAction::AcceptSuggestion);
        let plain = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE);
        assert_eq!(map_key(plain), AppAction::Input('s'));
        let shifted = KeyEvent::new(KeyCode::Char('S'), KeyModifiers::SHIFT);
        assert_eq!(map_key(shifted), AppAction::Input('S'));
    }
}
