use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use anyhow::{anyhow, Context, Result};
use serde_json::{Map, Value};
use tracing::debug;

/// Key the bearer token is stored under.
pub const TOKEN_KEY: &str = "jwt";

/// Application name used for the storage directory
const APP_NAME: &str = "todoauth";

/// Storage file name
const STORAGE_FILE: &str = "storage.json";

/// Durable storage for the single bearer token.
///
/// `save` overwrites whatever was there. `load` returning `None` just means
/// nobody has logged in yet.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Key-value JSON file, one entry per key.
///
/// Only the `jwt` entry is touched; any other keys in the file are kept.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in `<dir>/storage.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(STORAGE_FILE))
    }

    /// `~/.local/share/todoauth/storage.json` or the platform equivalent.
    pub fn default_location() -> Result<Self> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow!("Could not find local data directory"))?;
        Ok(Self::in_dir(data_dir.join(APP_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let contents = fs::read_to_string(&self.path).context("Failed to read token storage")?;
        if contents.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&contents).context("Failed to parse token storage")
    }

    /// Write to a sibling temp file, then rename it over the storage file.
    /// A crash mid-write leaves the previous contents intact.
    fn write_entries(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create storage directory")?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.path.with_extension("json.tmp");

        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

            let mut file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600) // Owner read/write only
                .open(&tmp_path)
                .context("Failed to open token storage")?;
            // mode() only applies on create; a leftover temp file keeps its old mode
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .context("Failed to restrict token storage permissions")?;
            file.write_all(contents.as_bytes())
                .context("Failed to write token storage")?;
            file.sync_all().context("Failed to flush token storage")?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&tmp_path, contents).context("Failed to write token storage")?;
        }

        fs::rename(&tmp_path, &self.path).context("Failed to replace token storage")?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        let entries = self.read_entries()?;
        Ok(entries
            .get(TOKEN_KEY)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    fn save(&self, token: &str) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.insert(TOKEN_KEY.to_string(), Value::String(token.to_string()));
        self.write_entries(&entries)?;
        debug!(path = ?self.path, "Token saved");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut entries = self.read_entries()?;
        if entries.remove(TOKEN_KEY).is_some() {
            self.write_entries(&entries)?;
            debug!(path = ?self.path, "Token cleared");
        }
        Ok(())
    }
}

/// Token held in process memory. Gone when the process exits.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        let token = self
            .token
            .read()
            .map_err(|_| anyhow!("Token store lock poisoned"))?;
        Ok(token.clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        let mut slot = self
            .token
            .write()
            .map_err(|_| anyhow!("Token store lock poisoned"))?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut slot = self
            .token
            .write()
            .map_err(|_| anyhow!("Token store lock poisoned"))?;
        *slot = None;
        Ok(())
    }
}
