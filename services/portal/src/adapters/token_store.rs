//! services/portal/src/adapters/token_store.rs
//!
//! Adapters for the `TokenStore` port: a JSON key-value file on disk and an
//! in-memory store for tests and throwaway sessions.

use learning_portal_core::ports::{PortError, PortResult, TokenStore};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// The fixed key the session token is kept under.
pub const SESSION_TOKEN_KEY: &str = "token";

//=========================================================================================
// File-backed Store
//=========================================================================================

/// Persists a small string map as JSON and stores the token under [`SESSION_TOKEN_KEY`].
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the map. A missing or unreadable file is an empty map.
    fn read_entries(&self) -> BTreeMap<String, String> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return BTreeMap::new(),
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Ignoring unreadable token file {}: {}", self.path.display(), e);
            BTreeMap::new()
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> PortResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| PortError::Unexpected(format!("Failed to create {}: {}", parent.display(), e)))?;
            }
        }
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        std::fs::write(&self.path, json)
            .map_err(|e| PortError::Unexpected(format!("Failed to write {}: {}", self.path.display(), e)))
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        self.read_entries()
            .remove(SESSION_TOKEN_KEY)
            .filter(|token| !token.is_empty())
    }

    fn save(&self, token: &str) -> PortResult<()> {
        let mut entries = self.read_entries();
        entries.insert(SESSION_TOKEN_KEY.to_string(), token.to_string());
        self.write_entries(&entries)?;
        debug!("Session token persisted to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> PortResult<()> {
        let mut entries = self.read_entries();
        if entries.remove(SESSION_TOKEN_KEY).is_none() {
            return Ok(());
        }
        self.write_entries(&entries)
    }
}

//=========================================================================================
// In-memory Store
//=========================================================================================

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.lock().ok().and_then(|guard| guard.clone())
    }

    fn save(&self, token: &str) -> PortResult<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| PortError::Unexpected("token store lock poisoned".to_string()))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> PortResult<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| PortError::Unexpected("token store lock poisoned".to_string()))?;
        *guard = None;
        Ok(())
    }
}
