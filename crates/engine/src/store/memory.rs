use std::sync::Arc;

use api_types::entry::{EntryDocument, EntryRecord};
use tokio::sync::watch;
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

use super::{EntryCollection, Snapshot};

/// In-process collection. Every write publishes a new snapshot to watchers
/// right away.
#[derive(Debug)]
pub struct MemoryCollection {
    records: watch::Sender<Snapshot>,
}

impl Default for MemoryCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCollection {
    pub fn new() -> Self {
        let (records, _) = watch::channel(Snapshot::default());
        Self { records }
    }

    /// Creates a collection holding `documents`, assigning fresh ids.
    pub fn with_documents(documents: impl IntoIterator<Item = EntryDocument>) -> Self {
        let records = documents
            .into_iter()
            .map(|document| EntryRecord {
                id: Uuid::new_v4().to_string(),
                document,
            })
            .collect();
        let (records, _) = watch::channel(Arc::new(records));
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }
}

impl EntryCollection for MemoryCollection {
    async fn snapshot(&self) -> ResultEngine<Vec<EntryRecord>> {
        Ok(self.records.borrow().as_ref().clone())
    }

    async fn insert(&self, document: EntryDocument) -> ResultEngine<String> {
        let id = Uuid::new_v4().to_string();
        let record = EntryRecord {
            id: id.clone(),
            document,
        };
        self.records.send_modify(|snapshot| {
            let mut records = snapshot.as_ref().clone();
            records.push(record);
            *snapshot = Arc::new(records);
        });
        Ok(id)
    }

    async fn remove(&self, id: &str) -> ResultEngine<()> {
        let removed = self.records.send_if_modified(|snapshot| {
            let Some(index) = snapshot.iter().position(|record| record.id == id) else {
                return false;
            };
            let mut records = snapshot.as_ref().clone();
            records.remove(index);
            *snapshot = Arc::new(records);
            true
        });
        if !removed {
            return Err(EngineError::KeyNotFound(id.to_string()));
        }
        Ok(())
    }

    fn watch(&self) -> watch::Receiver<Snapshot> {
        self.records.subscribe()
    }
}
