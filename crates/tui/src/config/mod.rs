use std::time::Duration;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use clap::{Parser, ValueEnum};
use engine::FirestoreConfig;
use serde::Deserialize;
use suggest::GeminiConfig;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/ledgerlite.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Entries live in process memory and vanish on exit.
    Memory,
    /// Entries live in a Firestore collection.
    Firestore,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub project_id: String,
    pub database: String,
    pub collection: String,
    pub api_key: Option<String>,
    pub base_url: String,
    pub poll_interval_ms: u64,
    /// Fill the memory backend with sample entries at startup.
    pub seed: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let firestore = FirestoreConfig::default();
        Self {
            backend: StoreBackend::Memory,
            project_id: firestore.project_id,
            database: firestore.database,
            collection: firestore.collection,
            api_key: None,
            base_url: firestore.base_url,
            poll_interval_ms: firestore.poll_interval.as_millis() as u64,
            seed: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        let gemini = GeminiConfig::new("");
        Self {
            api_key: None,
            model: gemini.model,
            base_url: gemini.base_url,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// IANA timezone used to pick "today".
    pub timezone: String,
    /// Day shown at startup (`YYYY-MM-DD`); today when unset.
    pub date: Option<String>,
    pub log_file: String,
    pub log_level: String,
    pub store: StoreConfig,
    pub ai: AiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            date: None,
            log_file: "ledgerlite.log".to_string(),
            log_level: "info".to_string(),
            store: StoreConfig::default(),
            ai: AiConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn firestore(&self) -> FirestoreConfig {
        FirestoreConfig {
            base_url: self.store.base_url.clone(),
            project_id: self.store.project_id.clone(),
            database: self.store.database.clone(),
            collection: self.store.collection.clone(),
            api_key: self.store.api_key.clone(),
            poll_interval: Duration::from_millis(self.store.poll_interval_ms.max(100)),
        }
    }

    /// Gemini settings, or `None` when no API key is configured.
    pub fn gemini(&self) -> Option<GeminiConfig> {
        let api_key = self.ai.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())?;
        Some(GeminiConfig {
            base_url: self.ai.base_url.clone(),
            model: self.ai.model.clone(),
            api_key: api_key.to_string(),
        })
    }

    /// The day the ledger opens on.
    pub fn start_date(&self) -> Result<NaiveDate> {
        if let Some(date) = self.date.as_deref() {
            return engine::parse_date(date).map_err(AppError::from);
        }
        let tz: Tz = self
            .timezone
            .parse()
            .map_err(|_| AppError::Setting(format!("unknown timezone {}", self.timezone)))?;
        Ok(Utc::now().with_timezone(&tz).date_naive())
    }
}

#[derive(Debug, Parser)]
#[command(name = "ledgerlite", version, about = "Income/expense ledger for the terminal")]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the store backend.
    #[arg(long, value_enum)]
    store: Option<StoreBackend>,
    /// Open the ledger on this day (YYYY-MM-DD).
    #[arg(long)]
    date: Option<String>,
    /// Override the model used for category suggestions.
    #[arg(long)]
    model: Option<String>,
    /// Start the memory store with sample entries.
    #[arg(long)]
    seed: bool,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let settings: AppConfig = config::Config::builder()
        .add_source(config::File::with_name(config_path).required(false))
        .add_source(
            config::Environment::with_prefix("LEDGERLITE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;

    Ok(apply_args(settings, args))
}

fn apply_args(mut settings: AppConfig, args: Args) -> AppConfig {
    if let Some(store) = args.store {
        settings.store.backend = store;
    }
    if let Some(date) = args.date {
        settings.date = Some(date);
    }
    if let Some(model) = args.model {
        settings.ai.model = model;
    }
    if args.seed {
        settings.store.seed = true;
    }
    settings
}
