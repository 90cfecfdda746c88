// Runtime configuration, read from the environment (and `.env` if present).

use crate::core::safety::{KeywordVocabulary, VocabularyFile, MAX_PAGE_SIZE};
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub store: StoreBackend,
    pub database_url: String,
    /// Optional JSON file replacing the built-in keyword vocabulary
    pub keywords_file: Option<PathBuf>,
    pub page_size: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let store = match lookup("ALERT_STORE").as_deref() {
            None | Some("sqlite") => StoreBackend::Sqlite,
            Some("memory") => StoreBackend::Memory,
            Some(other) => bail!("ALERT_STORE must be 'sqlite' or 'memory', got '{other}'"),
        };

        let page_size = match lookup("ALERT_PAGE_SIZE") {
            Some(v) => v
                .parse::<usize>()
                .context("ALERT_PAGE_SIZE must be a number")?,
            None => MAX_PAGE_SIZE,
        };
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            bail!("ALERT_PAGE_SIZE must be between 1 and {MAX_PAGE_SIZE}");
        }

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            store,
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| "data/safety.db".to_string()),
            keywords_file: lookup("SAFETY_KEYWORDS_FILE").map(PathBuf::from),
            page_size,
        })
    }

    /// The configured vocabulary, or the built-in Dutch one.
    pub fn load_vocabulary(&self) -> Result<KeywordVocabulary> {
        let Some(path) = &self.keywords_file else {
            return Ok(KeywordVocabulary::default());
        };

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read keyword file {}", path.display()))?;
        let file: VocabularyFile = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid keyword file {}", path.display()))?;
        let vocabulary = KeywordVocabulary::from_file(file)?;

        tracing::info!(path = %path.display(), "Loaded custom safety keywords");
        Ok(vocabulary)
    }
}
