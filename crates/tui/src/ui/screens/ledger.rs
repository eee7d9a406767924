use engine::{DATE_FORMAT, DateFilter};
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
};

use crate::{
    app::{AppState, Focus},
    ui::{
        components::{card::Card, money::styled_entry_amount},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let title = match state.filter {
        DateFilter::All => "Entries · all dates".to_string(),
        DateFilter::On(date) => format!("Entries · {}", date.format(DATE_FORMAT)),
    };
    let card = Card::new(&title, &theme).focused(state.focus == Focus::Table);
    let inner = card.inner(area);
    card.render_frame(frame, area);

    let ledger = &state.ledger;
    if !ledger.loaded {
        let loading = Paragraph::new(Span::styled("Loading…", Style::default().fg(theme.dim)));
        frame.render_widget(loading, inner);
        return;
    }
    if ledger.entries.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            empty_message(state.filter),
            Style::default().fg(theme.dim),
        )));
        frame.render_widget(empty, inner);
        return;
    }

    let header = Row::new(["Date", "Description", "Category", "Amount"])
        .style(Style::default().fg(theme.dim).add_modifier(Modifier::BOLD));
    let rows = ledger.entries.iter().map(|entry| {
        Row::new(vec![
            Cell::from(entry.date.format(DATE_FORMAT).to_string()),
            Cell::from(entry.description.clone()),
            Cell::from(entry.category.clone()),
            Cell::from(styled_entry_amount(entry.amount, entry.kind, &theme)),
        ])
    });
    let widths = [
        Constraint::Length(10),
        Constraint::Percentage(40),
        Constraint::Percentage(30),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(2)
        .row_highlight_style(Style::default().bg(theme.highlight))
        .highlight_symbol("› ");

    let mut table_state = TableState::default();
    if state.focus == Focus::Table {
        table_state.select(Some(ledger.selected));
    }
    frame.render_stateful_widget(table, inner, &mut table_state);
}

fn empty_message(filter: DateFilter) -> &'static str {
    match filter {
        DateFilter::All => "No entries yet",
        DateFilter::On(_) => "No entries for this day",
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn empty_message_follows_filter() {
        assert_eq!(empty_message(DateFilter::All), "No entries yet");
        let day = NaiveDate::from_ymd_opt(2024, 8, 15).unwrap();
        assert_eq!(empty_message(DateFilter::On(day)), "No entries for this day");
    }
}
