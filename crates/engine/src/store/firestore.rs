//! Firestore REST (v1) backed collection.
//!
//! Firestore only pushes changes over its streaming `Listen` API; this
//! collection emulates the live query by polling the collection and
//! publishing a new snapshot whenever the record set differs from the last
//! one. Local writes trigger an immediate refresh.
use std::{sync::Arc, time::Duration};

use api_types::entry::{Amount, EntryDocument, EntryKind, EntryRecord};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tokio::{
    sync::{Notify, watch},
    task::JoinHandle,
};

use crate::{EngineError, ResultEngine};

use super::{EntryCollection, Snapshot};

const PAGE_SIZE: u32 = 300;

#[derive(Clone, Debug)]
pub struct FirestoreConfig {
    /// Root of the REST API, e.g. `https://firestore.googleapis.com/v1`.
    pub base_url: String,
    pub project_id: String,
    pub database: String,
    pub collection: String,
    pub api_key: Option<String>,
    pub poll_interval: Duration,
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            base_url: "https://firestore.googleapis.com/v1".to_string(),
            project_id: String::new(),
            database: "(default)".to_string(),
            collection: "entries".to_string(),
            api_key: None,
            poll_interval: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Document {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorStatus,
}

#[derive(Debug, Deserialize)]
struct ErrorStatus {
    message: String,
}

#[derive(Clone, Debug)]
struct FirestoreClient {
    http: reqwest::Client,
    collection_url: String,
    api_key: Option<String>,
}

impl FirestoreClient {
    fn new(config: &FirestoreConfig) -> ResultEngine<Self> {
        if config.project_id.trim().is_empty() {
            return Err(EngineError::InvalidConfig(
                "firestore project_id is required".to_string(),
            ));
        }
        let collection_url = format!(
            "{}/projects/{}/databases/{}/documents/{}",
            config.base_url.trim_end_matches('/'),
            config.project_id,
            config.database,
            config.collection
        );
        Ok(Self {
            http: reqwest::Client::new(),
            collection_url,
            api_key: config.api_key.clone(),
        })
    }

    fn with_key(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.query(&[("key", key)]),
            None => request,
        }
    }

    async fn list(&self) -> ResultEngine<Vec<EntryRecord>> {
        let mut records = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .with_key(self.http.get(&self.collection_url))
                .query(&[("pageSize", PAGE_SIZE)]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let page: ListDocumentsResponse = check(request.send().await?).await?.json().await?;
            for document in page.documents {
                match decode_document(document) {
                    Ok(record) => records.push(record),
                    Err(err) => tracing::warn!("skipping firestore document: {err}"),
                }
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(records)
    }

    async fn create(&self, document: &EntryDocument) -> ResultEngine<String> {
        let body = Document {
            name: String::new(),
            fields: encode_fields(document),
        };
        let request = self.with_key(self.http.post(&self.collection_url)).json(&body);
        let created: Document = check(request.send().await?).await?.json().await?;
        document_id(&created.name)
    }

    async fn delete(&self, id: &str) -> ResultEngine<()> {
        let url = format!("{}/{}", self.collection_url, id);
        let request = self.with_key(self.http.delete(url));
        match check(request.send().await?).await {
            Ok(_) => Ok(()),
            Err(EngineError::Remote { status: 404, .. }) => {
                Err(EngineError::KeyNotFound(id.to_string()))
            }
            Err(err) => Err(err),
        }
    }
}

async fn check(response: reqwest::Response) -> ResultEngine<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .json::<ErrorResponse>()
        .await
        .map(|body| body.error.message)
        .unwrap_or_else(|_| "unknown error".to_string());
    Err(EngineError::Remote {
        status: status.as_u16(),
        message,
    })
}

fn document_id(name: &str) -> ResultEngine<String> {
    name.rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| EngineError::MalformedDocument(format!("document without id: {name}")))
}

fn encode_fields(document: &EntryDocument) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("date".into(), json!({ "stringValue": document.date }));
    fields.insert(
        "description".into(),
        json!({ "stringValue": document.description }),
    );
    fields.insert("category".into(), json!({ "stringValue": document.category }));
    let amount = match &document.amount {
        Amount::Number(value) => json!({ "doubleValue": value }),
        Amount::Text(text) => json!({ "stringValue": text }),
    };
    fields.insert("amount".into(), amount);
    if let Some(kind) = document.kind {
        fields.insert("type".into(), json!({ "stringValue": kind.as_str() }));
    }
    fields
}

fn decode_document(document: Document) -> ResultEngine<EntryRecord> {
    let id = document_id(&document.name)?;
    let fields = &document.fields;
    let text = |key: &str| {
        fields
            .get(key)
            .and_then(|value| value.get("stringValue"))
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .ok_or_else(|| EngineError::MalformedDocument(format!("{id}: missing {key}")))
    };

    let amount = fields
        .get("amount")
        .and_then(decode_amount)
        .ok_or_else(|| EngineError::MalformedDocument(format!("{id}: missing amount")))?;
    let kind = match text("type").ok().as_deref() {
        Some("income") => Some(EntryKind::Income),
        Some("expense") => Some(EntryKind::Expense),
        _ => None,
    };

    let document = EntryDocument {
        date: text("date")?,
        description: text("description")?,
        category: text("category")?,
        amount,
        kind,
    };
    Ok(EntryRecord { id, document })
}

fn decode_amount(value: &Value) -> Option<Amount> {
    if let Some(number) = value.get("doubleValue").and_then(Value::as_f64) {
        return Some(Amount::Number(number));
    }
    // int64 values are encoded as JSON strings.
    if let Some(integer) = value.get("integerValue") {
        let parsed = match integer {
            Value::String(raw) => raw.parse::<i64>().ok(),
            other => other.as_i64(),
        };
        return parsed.map(|n| Amount::Number(n as f64));
    }
    value
        .get("stringValue")
        .and_then(Value::as_str)
        .map(|raw| Amount::Text(raw.to_string()))
}

/// A collection living in a Firestore database.
#[derive(Debug)]
pub struct FirestoreCollection {
    client: FirestoreClient,
    records: Arc<watch::Sender<Snapshot>>,
    refresh: Arc<Notify>,
    poller: JoinHandle<()>,
}

impl FirestoreCollection {
    /// Loads the first snapshot and starts the background poller.
    ///
    /// A failing first load is logged and the collection starts empty; the
    /// poller keeps trying.
    pub async fn connect(config: FirestoreConfig) -> ResultEngine<Self> {
        let client = FirestoreClient::new(&config)?;
        let initial = match client.list().await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!("initial firestore load failed: {err}");
                Vec::new()
            }
        };
        tracing::info!(
            url = %client.collection_url,
            records = initial.len(),
            "connected to firestore"
        );

        let (records, _) = watch::channel(Arc::new(initial));
        let records = Arc::new(records);
        let refresh = Arc::new(Notify::new());
        let poller = tokio::spawn(poll(
            client.clone(),
            Arc::clone(&records),
            Arc::clone(&refresh),
            config.poll_interval,
        ));

        Ok(Self {
            client,
            records,
            refresh,
            poller,
        })
    }
}

impl Drop for FirestoreCollection {
    fn drop(&mut self) {
        self.poller.abort();
    }
}

async fn poll(
    client: FirestoreClient,
    records: Arc<watch::Sender<Snapshot>>,
    refresh: Arc<Notify>,
    interval: Duration,
) {
    loop {
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = refresh.notified() => {}
        }

        match client.list().await {
            Ok(latest) => {
                let changed = records.send_if_modified(|current| {
                    if current.as_slice() == latest.as_slice() {
                        return false;
                    }
                    *current = Arc::new(latest);
                    true
                });
                if changed {
                    tracing::debug!("firestore entries changed");
                }
            }
            Err(err) => tracing::warn!("failed to refresh entries: {err}"),
        }
    }
}

impl EntryCollection for FirestoreCollection {
    async fn snapshot(&self) -> ResultEngine<Vec<EntryRecord>> {
        self.client.list().await
    }

    async fn insert(&self, document: EntryDocument) -> ResultEngine<String> {
        let id = self.client.create(&document).await?;
        self.refresh.notify_one();
        Ok(id)
    }

    async fn remove(&self, id: &str) -> ResultEngine<()> {
        self.client.delete(id).await?;
        self.refresh.notify_one();
        Ok(())
    }

    fn watch(&self) -> watch::Receiver<Snapshot> {
        self.records.subscribe()
    }
}
