use log::{debug, error, warn};
use wasm_bindgen::JsValue;

use crate::config::AppConfig;
use crate::error::StorageError;
use crate::model::QuizResult;

/// Minimal string key-value store, the shape of `window.localStorage`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// The browser's `localStorage`, looked up on every call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .ok_or(StorageError::Unavailable)?
            .local_storage()
            .map_err(js_error)?
            .ok_or(StorageError::Unavailable)
    }
}

fn js_error(err: JsValue) -> StorageError {
    StorageError::Backend(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?.get_item(key).map_err(js_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?.set_item(key, value).map_err(js_error)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Self::storage()?.remove_item(key).map_err(js_error)
    }
}

/// Past quiz results, newest first, stored as one JSON array under one key.
///
/// None of the operations report failure to the caller: read problems look
/// like an empty history and write problems are logged and dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryStore<S> {
    store: S,
    key: String,
    cap: usize,
}

impl HistoryStore<LocalStorage> {
    pub fn browser(config: &AppConfig) -> Self {
        HistoryStore::new(LocalStorage, &config.history_key, config.history_cap)
    }
}

impl<S: KeyValueStore> HistoryStore<S> {
    pub fn new(store: S, key: &str, cap: usize) -> Self {
        HistoryStore {
            store,
            key: key.to_string(),
            cap: cap.max(1),
        }
    }

    pub fn save_result(&self, result: &QuizResult) {
        let mut history = self.get_history();
        history.insert(0, result.clone());
        history.truncate(self.cap);

        if let Err(err) = self.write(&history) {
            error!("Failed to save quiz result to storage: {err}");
        } else {
            debug!("Saved result for quiz {} ({} entries)", result.quiz_id, history.len());
        }
    }

    pub fn get_history(&self) -> Vec<QuizResult> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                error!("Failed to read quiz history: {err}");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!("Ignoring unreadable quiz history: {err}");
            Vec::new()
        })
    }

    pub fn clear_history(&self) {
        if let Err(err) = self.store.remove(&self.key) {
            error!("Failed to clear quiz history: {err}");
        }
    }

    fn write(&self, history: &[QuizResult]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(history)?;
        self.store.set(&self.key, &raw)
    }
}
