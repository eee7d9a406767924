pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use engine::{DATE_FORMAT, DateFilter};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, Focus};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let theme = Theme::default();
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Min(8),    // Form and table
            Constraint::Length(4), // Totals
            Constraint::Length(1), // Hints
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(44), Constraint::Min(0)])
        .split(layout[1]);
    screens::entry_form::render(frame, body[0], state);
    screens::ledger::render(frame, body[1], state);
    screens::totals::render(frame, layout[2], state);

    render_bottom_bar(frame, layout[3], state, &theme);
    components::toast::render(frame, area, state.toast.as_ref());
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let viewing = match state.filter {
        DateFilter::All => "all dates".to_string(),
        DateFilter::On(date) => date.format(DATE_FORMAT).to_string(),
    };
    let ai = if state.suggestions_enabled { "on" } else { "off" };

    let line = Line::from(vec![
        Span::styled("LedgerLite", Style::default().fg(theme.accent)),
        Span::raw("  "),
        Span::styled("Viewing", Style::default().fg(theme.dim)),
        Span::raw(format!(": {viewing}  ")),
        Span::styled("Entries", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}  ", state.ledger.entries.len())),
        Span::styled("AI", Style::default().fg(theme.dim)),
        Span::raw(format!(": {ai}")),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let context = match state.focus {
        Focus::Form(_) => components::hints::form_editing(),
        Focus::Table => components::hints::table_navigation(),
    };
    let mut parts = components::hints::hints_to_spans(&context, theme);
    parts.push(components::hints::hint_separator(theme));
    parts.extend(components::hints::hints_to_spans(
        &components::hints::day_navigation(),
        theme,
    ));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
