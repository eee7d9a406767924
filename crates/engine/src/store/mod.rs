//! Live access to the `entries` collection.
//!
//! [`EntryCollection`] is the connection to wherever the documents live.
//! [`EntryStore`] sits on top of it and turns raw records into sorted,
//! date-filtered [`LedgerEntry`] lists pushed to an observer.
use std::{future::Future, sync::Arc};

use api_types::entry::{EntryDocument, EntryRecord};
use chrono::NaiveDate;
use tokio::{sync::watch, task::JoinHandle};

use crate::{LedgerEntry, NewEntry, ResultEngine};

mod firestore;
mod memory;

pub use firestore::{FirestoreCollection, FirestoreConfig};
pub use memory::MemoryCollection;

/// The full record set of a collection at one point in time.
pub type Snapshot = Arc<Vec<EntryRecord>>;

/// A document collection holding ledger entries.
pub trait EntryCollection: Send + Sync + 'static {
    /// Fetches the current records.
    fn snapshot(&self) -> impl Future<Output = ResultEngine<Vec<EntryRecord>>> + Send;

    /// Appends a document and returns the id assigned to it.
    fn insert(&self, document: EntryDocument) -> impl Future<Output = ResultEngine<String>> + Send;

    /// Removes the document with the given id.
    fn remove(&self, id: &str) -> impl Future<Output = ResultEngine<()>> + Send;

    /// Returns a receiver that observes every new snapshot of the collection.
    fn watch(&self) -> watch::Receiver<Snapshot>;
}

/// Which entries a subscription keeps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DateFilter {
    #[default]
    All,
    On(NaiveDate),
}

impl DateFilter {
    pub fn matches(self, date: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::On(selected) => selected == date,
        }
    }
}

/// Handle of a live query opened by [`EntryStore::subscribe`].
///
/// The observer stops being called once the handle is unsubscribed or
/// dropped.
#[derive(Debug)]
pub struct Subscription {
    filter: DateFilter,
    task: JoinHandle<()>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        tracing::debug!(filter = ?self.filter, "unsubscribing from entries");
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Typed access to the ledger entries of one collection.
#[derive(Debug)]
pub struct EntryStore<C> {
    collection: Arc<C>,
}

impl<C> Clone for EntryStore<C> {
    fn clone(&self) -> Self {
        Self {
            collection: Arc::clone(&self.collection),
        }
    }
}

impl<C: EntryCollection> EntryStore<C> {
    /// Wraps an already connected collection.
    pub fn new(collection: Arc<C>) -> Self {
        Self { collection }
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }

    /// Opens a live query.
    ///
    /// `observer` receives the filtered entries once for the current snapshot
    /// and again after every change of the collection. Must be called from
    /// within a tokio runtime.
    pub fn subscribe<F>(&self, filter: DateFilter, mut observer: F) -> Subscription
    where
        F: FnMut(Vec<LedgerEntry>) + Send + 'static,
    {
        let mut updates = self.collection.watch();
        tracing::debug!(?filter, "subscribing to entries");

        let task = tokio::spawn(async move {
            loop {
                let snapshot = Arc::clone(&updates.borrow_and_update());
                observer(project(&snapshot, filter));
                if updates.changed().await.is_err() {
                    tracing::debug!("entry collection closed");
                    break;
                }
            }
        });

        Subscription { filter, task }
    }

    /// One-shot read of the entries matching `filter`.
    pub async fn fetch(&self, filter: DateFilter) -> ResultEngine<Vec<LedgerEntry>> {
        let records = self.collection.snapshot().await?;
        Ok(project(&records, filter))
    }

    pub async fn create(&self, entry: &NewEntry) -> ResultEngine<String> {
        let id = self.collection.insert(entry.to_document()).await?;
        tracing::info!(%id, date = %entry.date, "entry created");
        Ok(id)
    }

    pub async fn delete(&self, id: &str) -> ResultEngine<()> {
        self.collection.remove(id).await?;
        tracing::info!(%id, "entry deleted");
        Ok(())
    }
}

/// Maps, filters and sorts raw records.
///
/// Records that cannot be mapped are logged and left out. Sorting is stable,
/// so entries of the same day keep the collection order.
pub fn project(records: &[EntryRecord], filter: DateFilter) -> Vec<LedgerEntry> {
    let mut entries: Vec<LedgerEntry> = records
        .iter()
        .filter_map(|record| match LedgerEntry::try_from(record) {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(id = %record.id, "skipping entry: {err}");
                None
            }
        })
        .filter(|entry| filter.matches(entry.date))
        .collect();
    entries.sort_by_key(|entry| entry.date);
    entries
}
