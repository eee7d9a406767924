//! Ledger entries and live access to the collection that stores them.
//!
//! The crate has no UI: it maps raw documents to [`LedgerEntry`] values,
//! validates new entries, computes totals and keeps subscribers up to date
//! through [`EntryStore`].
pub use api_types::entry::EntryKind;
pub use entry::{DATE_FORMAT, LedgerEntry, NewEntry, coerce_amount, parse_date, resolve_kind};
pub use error::EngineError;
pub use money::MoneyCents;
pub use store::{
    DateFilter, EntryCollection, EntryStore, FirestoreCollection, FirestoreConfig,
    MemoryCollection, Snapshot, Subscription, project,
};
pub use summary::Summary;

mod entry;
mod error;
mod money;
mod store;
mod summary;

pub type ResultEngine<T> = Result<T, EngineError>;
