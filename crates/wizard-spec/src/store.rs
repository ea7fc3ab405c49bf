use std::collections::HashMap;

use thiserror::Error;
use tracing::warn;

use crate::answers::AnswerMap;

/// Failures surfaced by persistence gateways.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("stored answers for '{key}' are not parseable: {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode answers: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Key-value persistence for answer maps.
pub trait AnswerStore {
    /// `Ok(None)` when nothing is stored under `key`.
    fn load(&self, key: &str) -> Result<Option<AnswerMap>, StoreError>;
    fn save(&mut self, key: &str, answers: &AnswerMap) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

pub fn decode_answers(key: &str, raw: &str) -> Result<AnswerMap, StoreError> {
    serde_json::from_str(raw).map_err(|source| StoreError::Parse {
        key: key.to_string(),
        source,
    })
}

pub fn encode_answers(answers: &AnswerMap) -> Result<String, StoreError> {
    serde_json::to_string(answers).map_err(StoreError::Encode)
}

/// Loads persisted answers, treating any failure as "nothing persisted".
pub fn load_or_none(store: &dyn AnswerStore, key: &str) -> Option<AnswerMap> {
    match store.load(key) {
        Ok(answers) => answers,
        Err(err) => {
            warn!(key, error = %err, "failed to load persisted answers");
            None
        }
    }
}

/// Saves answers; failures are logged and reported as `false`.
pub fn save_or_log(store: &mut dyn AnswerStore, key: &str, answers: &AnswerMap) -> bool {
    match store.save(key, answers) {
        Ok(()) => true,
        Err(err) => {
            warn!(key, error = %err, "failed to save answers");
            false
        }
    }
}

pub fn remove_or_log(store: &mut dyn AnswerStore, key: &str) -> bool {
    match store.remove(key) {
        Ok(()) => true,
        Err(err) => {
            warn!(key, error = %err, "failed to clear persisted answers");
            false
        }
    }
}

/// In-memory store keeping serialized JSON strings per key.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails.
    pub fn unavailable() -> Self {
        Self {
            entries: HashMap::new(),
            unavailable: true,
        }
    }

    /// Stores a raw string without validating it.
    pub fn insert_raw(&mut self, key: impl Into<String>, raw: impl Into<String>) {
        self.entries.insert(key.into(), raw.into());
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.unavailable {
            Err(StoreError::Unavailable("memory store disabled".into()))
        } else {
            Ok(())
        }
    }
}

impl AnswerStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<AnswerMap>, StoreError> {
        self.ensure_available()?;
        self.entries
            .get(key)
            .map(|raw| decode_answers(key, raw))
            .transpose()
    }

    fn save(&mut self, key: &str, answers: &AnswerMap) -> Result<(), StoreError> {
        self.ensure_available()?;
        let raw = encode_answers(answers)?;
        self.entries.insert(key.to_string(), raw);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.ensure_available()?;
        self.entries.remove(key);
        Ok(())
    }
}
