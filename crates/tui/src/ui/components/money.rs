use engine::{EntryKind, MoneyCents};
use ratatui::{style::Style, text::Span};

use crate::ui::theme::Theme;

/// Amount of a table row: `+` and income color for income, `-` and expense
/// color for expenses.
#[must_use]
pub fn styled_entry_amount(amount: MoneyCents, kind: EntryKind, theme: &Theme) -> Span<'static> {
    let (color, prefix) = match kind {
        EntryKind::Income => (theme.income, "+"),
        EntryKind::Expense => (theme.expense, "-"),
    };
    Span::styled(format!("{prefix}{amount}"), Style::default().fg(color))
}

/// Signed total, colored by sign.
#[must_use]
pub fn styled_balance(amount: MoneyCents, theme: &Theme) -> Span<'static> {
    let color = if amount.is_negative() {
        theme.expense
    } else if amount == MoneyCents::ZERO {
        theme.text
    } else {
        theme.income
    };
    Span::styled(amount.to_string(), Style::default().fg(color))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_amounts_carry_kind_sign() {
        let theme = Theme::default();
        let income = styled_entry_amount(MoneyCents::new(1234), EntryKind::Income, &theme);
        assert_eq!(income.content, "+$12.34");
        assert_eq!(income.style.fg, Some(theme.income));

        let expense = styled_entry_amount(MoneyCents::new(50), EntryKind::Expense, &theme);
        assert_eq!(expense.content, "-$0.50");
    }

    #[test]
    fn balance_color_follows_sign() {
        let theme = Theme::default();
        assert_eq!(
            styled_balance(MoneyCents::new(-1050), &theme).style.fg,
            Some(theme.expense)
        );
        assert_eq!(
            styled_balance(MoneyCents::ZERO, &theme).style.fg,
            Some(theme.text)
        );
    }
}
