// ABOUTME: Keeps the visitor's session identifier across runs.
// ABOUTME: A JSON key-value file written atomically via tmp + rename, plus an in-memory variant.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::session::SessionId;

/// Durable slot holding at most one session identifier.
pub trait SessionStore: Send {
    /// The cached identifier. Empty or whitespace-only values count as absent.
    fn get(&self) -> Option<SessionId>;

    /// Persist the identifier, replacing any previous value.
    fn set(&mut self, id: SessionId) -> anyhow::Result<()>;

    /// Forget the cached identifier.
    fn clear(&mut self) -> anyhow::Result<()>;
}

fn present(value: Option<&String>) -> Option<SessionId> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| SessionId::new(v.clone()))
}

/// File-backed store: a flat JSON object of string keys to string values.
pub struct FileSessionStore {
    path: PathBuf,
    key: String,
    entries: BTreeMap<String, String>,
}

impl FileSessionStore {
    /// Open the store at `path`, reading the existing file if there is one.
    ///
    /// A missing file starts empty. An unreadable or corrupt file is logged and
    /// also starts empty; it is overwritten on the next `set`.
    pub fn open(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        let path = path.into();
        let entries = match load_entries(&path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable storage file");
                BTreeMap::new()
            }
        };
        Self {
            path,
            key: key.into(),
            entries,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&tmp_path, &content)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

fn load_entries(path: &Path) -> anyhow::Result<BTreeMap<String, String>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<SessionId> {
        present(self.entries.get(&self.key))
    }

    fn set(&mut self, id: SessionId) -> anyhow::Result<()> {
        self.entries.insert(self.key.clone(), id.as_str().to_string());
        self.save()
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        if self.entries.remove(&self.key).is_some() {
            self.save()?;
        }
        Ok(())
    }
}

/// Process-local store, used by tests and headless runs.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    value: Option<String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<SessionId> {
        present(self.value.as_ref())
    }

    fn set(&mut self, id: SessionId) -> anyhow::Result<()> {
        self.value = Some(id.as_str().to_string());
        Ok(())
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        self.value = None;
        Ok(())
    }
}
