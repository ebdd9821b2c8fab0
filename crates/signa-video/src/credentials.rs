//! API key storage for the video provider.
//!
//! Keys are stored under a fixed name. The file store keeps a small JSON
//! map in the data directory; the memory store is used in tests and when
//! nothing should touch disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use signa_core::config::CredentialConfig;
use signa_core::error::{Result, SignaError};

const CREDENTIALS_FILE: &str = "credentials.json";

/// Save, load and clear API keys by name.
pub trait CredentialStore: Send + Sync {
    /// Backend name for logs.
    fn kind(&self) -> &'static str;

    /// The stored key, or `None` if nothing is stored.
    fn get(&self, name: &str) -> Result<Option<String>>;

    /// Store `value` under `name`, replacing any previous key.
    ///
    /// Blank values are rejected.
    fn set(&self, name: &str, value: &str) -> Result<()>;

    /// Remove the key. Clearing a missing key is not an error.
    fn clear(&self, name: &str) -> Result<()>;
}

fn validate_key(value: &str) -> Result<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SignaError::Credential("API key cannot be blank".to_string()));
    }
    Ok(trimmed)
}

/// Show only the last four characters of a key.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}

/// In-process key store.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    keys: RwLock<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    fn get(&self, name: &str) -> Result<Option<String>> {
        let keys = self
            .keys
            .read()
            .map_err(|e| SignaError::Credential(format!("Lock poisoned: {}", e)))?;
        Ok(keys.get(name).cloned())
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        let value = validate_key(value)?;
        let mut keys = self
            .keys
            .write()
            .map_err(|e| SignaError::Credential(format!("Lock poisoned: {}", e)))?;
        keys.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, name: &str) -> Result<()> {
        let mut keys = self
            .keys
            .write()
            .map_err(|e| SignaError::Credential(format!("Lock poisoned: {}", e)))?;
        keys.remove(name);
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredKey {
    value: String,
    updated_at: DateTime<Utc>,
}

/// Key store backed by a JSON file.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, StoredKey>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_all(&self, keys: &HashMap<String, StoredKey>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(keys)?;
        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
            // The key never hits disk while the file is readable by others.
            let mut file = std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)?;
            // `mode` only applies on creation; tighten a file that already existed.
            file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
            file.write_all(content.as_bytes())?;
        }
        #[cfg(not(unix))]
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn kind(&self) -> &'static str {
        "file"
    }

    fn get(&self, name: &str) -> Result<Option<String>> {
        let _guard = self
            .lock
            .read()
            .map_err(|e| SignaError::Credential(format!("Lock poisoned: {}", e)))?;
        Ok(self.read_all()?.remove(name).map(|k| k.value))
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        let value = validate_key(value)?;
        let _guard = self
            .lock
            .write()
            .map_err(|e| SignaError::Credential(format!("Lock poisoned: {}", e)))?;
        let mut keys = self.read_all()?;
        keys.insert(
            name.to_string(),
            StoredKey {
                value: value.to_string(),
                updated_at: Utc::now(),
            },
        );
        self.write_all(&keys)?;
        tracing::info!(name, path = %self.path.display(), "API key stored");
        Ok(())
    }

    fn clear(&self, name: &str) -> Result<()> {
        let _guard = self
            .lock
            .write()
            .map_err(|e| SignaError::Credential(format!("Lock poisoned: {}", e)))?;
        let mut keys = self.read_all()?;
        if keys.remove(name).is_some() {
            self.write_all(&keys)?;
            tracing::info!(name, "API key cleared");
        }
        Ok(())
    }
}

/// Build the store named by the configuration.
pub fn open_store(config: &CredentialConfig, data_dir: &Path) -> Result<Box<dyn CredentialStore>> {
    match config.store.as_str() {
        "file" => Ok(Box::new(FileCredentialStore::new(
            data_dir.join(CREDENTIALS_FILE),
        ))),
        "memory" => Ok(Box::new(MemoryCredentialStore::new())),
        other => Err(SignaError::Config(format!(
            "unknown credential store '{}', expected 'file' or 'memory'",
            other
        ))),
    }
}
