use std::{sync::Arc, time::Duration};

use api_types::entry::{Amount, EntryDocument};
use chrono::NaiveDate;
use engine::{
    DateFilter, EngineError, EntryKind, EntryStore, LedgerEntry, MemoryCollection, MoneyCents,
    NewEntry, Summary,
};
use tokio::sync::mpsc;

fn doc(date: &str, description: &str, category: &str, amount: f64) -> EntryDocument {
    EntryDocument {
        date: date.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        amount: Amount::Number(amount),
        kind: None,
    }
}

fn seeded_store() -> EntryStore<MemoryCollection> {
    let collection = MemoryCollection::with_documents([
        doc("2024-08-01", "Salary", "Income", 5000.0),
        doc("2024-08-15", "Rent", "Housing", 2000.0),
        doc("2024-08-15", "Groceries", "Food", 500.0),
        doc("2024-08-01", "Dividends", "Income", 7000.0),
    ]);
    EntryStore::new(Arc::new(collection))
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 8, d).unwrap()
}

async fn next(rx: &mut mpsc::UnboundedReceiver<Vec<LedgerEntry>>) -> Vec<LedgerEntry> {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("subscription update timed out")
        .expect("subscription closed")
}

fn descriptions(entries: &[LedgerEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.description.as_str()).collect()
}

#[tokio::test]
async fn subscription_delivers_initial_filtered_snapshot() {
    let store = seeded_store();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let _sub = store.subscribe(DateFilter::On(day(15)), move |entries| {
        let _ = tx.send(entries);
    });

    let entries = next(&mut rx).await;
    assert_eq!(descriptions(&entries), ["Rent", "Groceries"]);
    assert!(entries.iter().all(|e| e.date == day(15)));
}

#[tokio::test]
async fn create_is_pushed_to_subscribers_of_that_day() {
    let store = seeded_store();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let _sub = store.subscribe(DateFilter::On(day(1)), move |entries| {
        let _ = tx.send(entries);
    });
    assert_eq!(next(&mut rx).await.len(), 2);

    let entry = NewEntry::from_input("2024-08-01", "Bonus", "Income", "250", EntryKind::Income)
        .unwrap();
    store.create(&entry).await.unwrap();

    let entries = next(&mut rx).await;
    assert_eq!(descriptions(&entries), ["Salary", "Dividends", "Bonus"]);
}

#[tokio::test]
async fn delete_removes_exactly_one_record() {
    let store = seeded_store();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let _sub = store.subscribe(DateFilter::All, move |entries| {
        let _ = tx.send(entries);
    });
    let before = next(&mut rx).await;
    let rent = before
        .iter()
        .find(|e| e.description == "Rent")
        .unwrap()
        .id
        .clone();

    store.delete(&rent).await.unwrap();

    let after = next(&mut rx).await;
    assert_eq!(after.len(), before.len() - 1);
    assert!(after.iter().all(|e| e.id != rent));
    let mut expected: Vec<_> = before.into_iter().filter(|e| e.id != rent).collect();
    expected.sort_by_key(|e| e.date);
    assert_eq!(after, expected);
}

#[tokio::test]
async fn deleting_unknown_id_fails() {
    let store = seeded_store();
    let err = store.delete("missing").await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("missing".to_string()));
    assert_eq!(store.collection().len(), 4);
}

#[tokio::test]
async fn unsubscribed_observer_is_not_called() {
    let store = seeded_store();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let sub = store.subscribe(DateFilter::All, move |entries| {
        let _ = tx.send(entries);
    });
    next(&mut rx).await;
    sub.unsubscribe();

    let entry =
        NewEntry::from_input("2024-08-02", "Coffee", "Food", "3", EntryKind::Expense).unwrap();
    store.create(&entry).await.unwrap();

    // The observer (and its sender) is dropped with the aborted task.
    let closed = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .unwrap();
    assert!(closed.is_none());
}

#[tokio::test]
async fn fetch_totals_follow_category_labels() {
    let store = seeded_store();
    let entries = store.fetch(DateFilter::All).await.unwrap();
    let summary = Summary::from_entries(&entries);
    assert_eq!(summary.total_income, MoneyCents::new(1_200_000));
    assert_eq!(summary.total_expenses, MoneyCents::new(250_000));
    assert_eq!(summary.balance(), MoneyCents::new(950_000));
}
