mod app;
mod config;
mod error;
mod logging;
mod seed;
mod ui;

use std::sync::Arc;

use chrono::NaiveDate;
use engine::{EntryCollection, EntryStore, FirestoreCollection, MemoryCollection};
use suggest::GeminiSuggester;

use crate::{config::StoreBackend, error::Result};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    logging::init(&config)?;

    let date = config.start_date()?;
    let suggester = match config.gemini() {
        Some(gemini) => {
            tracing::info!(model = %gemini.model, "category suggestions enabled");
            Some(GeminiSuggester::new(gemini))
        }
        None => {
            tracing::warn!("no AI api key configured, category suggestions disabled");
            None
        }
    };

    match config.store.backend {
        StoreBackend::Memory => {
            let collection = if config.store.seed {
                tracing::info!("using in-memory entry store with sample entries");
                MemoryCollection::with_documents(seed::sample_documents())
            } else {
                tracing::info!("using in-memory entry store");
                MemoryCollection::new()
            };
            let store = EntryStore::new(Arc::new(collection));
            run(store, suggester, date).await
        }
        StoreBackend::Firestore => {
            let firestore = config.firestore();
            tracing::info!(
                project = %firestore.project_id,
                collection = %firestore.collection,
                "using firestore entry store"
            );
            let collection = FirestoreCollection::connect(firestore).await?;
            run(EntryStore::new(Arc::new(collection)), suggester, date).await
        }
    }
}

async fn run<C: EntryCollection>(
    store: EntryStore<C>,
    suggester: Option<GeminiSuggester>,
    date: NaiveDate,
) -> Result<()> {
    let mut app = app::App::new(store, suggester, date);
    let result = app.run().await;
    tracing::info!("ledgerlite stopped");
    result
}
