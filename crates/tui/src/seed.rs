use api_types::entry::{Amount, EntryDocument, EntryKind};

/// Sample entries for a fresh memory store.
pub fn sample_documents() -> Vec<EntryDocument> {
    [
        ("2024-08-01", "Salary", "Income", 5000.0, EntryKind::Income),
        ("2024-08-15", "Rent", "Housing", 2000.0, EntryKind::Expense),
        ("2024-08-15", "Groceries", "Food", 500.0, EntryKind::Expense),
        ("2024-08-01", "Dividends", "Investment", 7000.0, EntryKind::Income),
    ]
    .into_iter()
    .map(|(date, description, category, amount, kind)| EntryDocument {
        date: date.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        amount: Amount::Number(amount),
        kind: Some(kind),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use engine::{DateFilter, EntryStore, MemoryCollection, MoneyCents, Summary};

    use super::*;

    #[tokio::test]
    async fn samples_load_into_memory_store() {
        let store = EntryStore::new(Arc::new(MemoryCollection::with_documents(
            sample_documents(),
        )));

        let all = store.fetch(DateFilter::All).await.unwrap();
        assert_eq!(all.len(), 4);
        let summary = Summary::from_entries(&all);
        assert_eq!(summary.total_income, MoneyCents::new(1_200_000));
        assert_eq!(summary.total_expenses, MoneyCents::new(250_000));

        let day = NaiveDate::from_ymd_opt(2024, 8, 15).unwrap();
        let rent_day = store.fetch(DateFilter::On(day)).await.unwrap();
        assert_eq!(rent_day.len(), 2);
    }
}
