use ratatui::{style::Style, text::Span};

use crate::ui::theme::Theme;

/// A keyboard hint consisting of a key and its action.
#[derive(Debug, Clone)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }

    spans
}

pub fn hint_separator(theme: &Theme) -> Span<'static> {
    Span::styled("  │  ", Style::default().fg(theme.border))
}

pub fn form_editing() -> Vec<KeyHint> {
    vec![
        KeyHint::new("Tab", "next"),
        KeyHint::new("Enter", "add"),
        KeyHint::new("Ctrl+S", "accept suggestion"),
        KeyHint::new("Esc", "table"),
    ]
}

pub fn table_navigation() -> Vec<KeyHint> {
    vec![
        KeyHint::new("↑↓", "select"),
        KeyHint::new("d", "delete"),
        KeyHint::new("Enter", "form"),
        KeyHint::new("q", "quit"),
    ]
}

pub fn day_navigation() -> Vec<KeyHint> {
    vec![
        KeyHint::new("PgUp", "prev day"),
        KeyHint::new("PgDn", "next day"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_alternate_keys_and_actions() {
        let theme = Theme::default();
        let spans = hints_to_spans(&day_navigation(), &theme);
        let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "PgUp prev day  PgDn next day");
    }
}
