use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Span,
};

use crate::{
    app::AppState,
    ui::{
        components::{card::StatCard, money::styled_balance},
        theme::Theme,
    },
};

/// Income, expense and balance cards over the entries in view.
pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let summary = &state.ledger.summary;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let entries = state.ledger.entries.len();
    StatCard::new(
        "Total Income",
        Span::styled(
            summary.total_income.to_string(),
            Style::default().fg(theme.income),
        ),
        &theme,
    )
    .render(frame, columns[0]);
    StatCard::new(
        "Total Expenses",
        Span::styled(
            summary.total_expenses.to_string(),
            Style::default().fg(theme.expense),
        ),
        &theme,
    )
    .render(frame, columns[1]);
    StatCard::new("Balance", styled_balance(summary.balance(), &theme), &theme)
        .subtitle(format!("{entries} entries"))
        .render(frame, columns[2]);
}
