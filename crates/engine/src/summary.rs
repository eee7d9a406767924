//! Totals shown under the ledger table.

use crate::{LedgerEntry, MoneyCents};

/// Income, expense and balance over a set of entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub total_income: MoneyCents,
    pub total_expenses: MoneyCents,
}

impl Summary {
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a LedgerEntry>,
    {
        entries
            .into_iter()
            .fold(Summary::default(), |mut summary, entry| {
                if entry.is_income() {
                    summary.total_income += entry.amount;
                } else {
                    summary.total_expenses += entry.amount;
                }
                summary
            })
    }

    /// `total_income - total_expenses`; may be negative.
    pub fn balance(&self) -> MoneyCents {
        self.total_income - self.total_expenses
    }
}
