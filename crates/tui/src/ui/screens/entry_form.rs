use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::{AppState, Focus, FormField},
    ui::{components::card::Card, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let focused = matches!(state.focus, Focus::Form(_));
    let card = Card::new("Add New Entry", &theme).focused(focused);
    let inner = card.inner(area);
    card.render_frame(frame, area);

    let mut lines = Vec::new();
    for field in FormField::ALL {
        lines.push(field_line(state, field, &theme));
        if field == FormField::Category {
            lines.push(suggestion_line(state, &theme));
        }
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn field_line(state: &AppState, field: FormField, theme: &Theme) -> Line<'static> {
    let active = state.focus == Focus::Form(field);
    let marker = if active { "› " } else { "  " };
    let label_style = if active {
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.dim)
    };

    let value = state.form.value(field).to_string();
    let mut spans = vec![
        Span::styled(marker, Style::default().fg(theme.accent)),
        Span::styled(format!("{:<12}", field.label()), label_style),
    ];
    match field {
        FormField::Kind => {
            let hint = if active { "  (space to switch)" } else { "" };
            spans.push(Span::styled(value, Style::default().fg(theme.text)));
            spans.push(Span::styled(hint, Style::default().fg(theme.dim)));
        }
        _ => {
            spans.push(Span::styled(value, Style::default().fg(theme.text)));
            if active {
                spans.push(Span::styled("▏", Style::default().fg(theme.accent)));
            }
        }
    }
    Line::from(spans)
}

fn suggestion_line(state: &AppState, theme: &Theme) -> Line<'static> {
    let indent = Span::raw(" ".repeat(14));
    if !state.suggestions_enabled {
        return Line::from(vec![
            indent,
            Span::styled("suggestions off", Style::default().fg(theme.dim)),
        ]);
    }
    if state.suggesting {
        return Line::from(vec![
            indent,
            Span::styled("Suggesting…", Style::default().fg(theme.dim)),
        ]);
    }
    match state.suggestion.label() {
        Some(label) => {
            let style = if state.suggestion.category().is_some() {
                Style::default().fg(theme.accent)
            } else {
                Style::default().fg(theme.error)
            };
            Line::from(vec![
                indent,
                Span::styled("Suggested: ", Style::default().fg(theme.dim)),
                Span::styled(label.to_string(), style),
            ])
        }
        None => Line::from(indent),
    }
}
