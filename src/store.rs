//! Atomic JSON file store.
//!
//! Every write goes to a `<name>.tmp` sibling first and is then renamed over
//! the target, so a reader never observes a half-written file. There is no
//! locking: two invocations racing on read-then-write both succeed and the
//! last rename wins.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment mapping stored under `"env"`
pub type Env = BTreeMap<String, String>;

/// Contents of `~/.claude/settings.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub env: Env,
}

impl Config {
    pub fn new(env: Env) -> Self {
        Self { env }
    }

    pub fn is_empty(&self) -> bool {
        self.env.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }
}

/// Treat `"env": null` the same as an empty mapping
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Env, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Env>::deserialize(deserializer)?.unwrap_or_default())
}

/// Load a settings file, returning an empty config if it doesn't exist
pub fn load_config(path: &Path) -> Result<Config> {
    Ok(read_json(path)?.unwrap_or_default())
}

pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    write_json_atomic(path, config)
}

/// Read and parse a JSON document. `Ok(None)` means the file is absent.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let Some(content) = read_text(path)? else {
        return Ok(None);
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
}

pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut content = serde_json::to_string_pretty(value).map_err(Error::Serialize)?;
    content.push('\n');
    write_atomic(path, content.as_bytes())
}

/// Read the single-line secret file, trimmed. Blank files count as absent.
pub fn read_secret(path: &Path) -> Result<Option<String>> {
    Ok(read_text(path)?
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

pub fn write_secret(path: &Path, secret: &str) -> Result<()> {
    write_atomic(path, secret.trim().as_bytes())
}

pub(crate) fn read_text(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io("read", path, e)),
    }
}

/// Write `bytes` to `path` via a temp file and rename.
///
/// The parent directory is created owner-only if missing. The temp file is
/// removed on any failure, and the target keeps its previous contents unless
/// the rename itself succeeded.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_private_dir(parent)?;
    }

    let temp_path = temp_path_for(path);
    if let Err(e) = write_temp(&temp_path, bytes) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io("rename into place", path, e));
    }

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote file atomically");
    Ok(())
}

/// `settings.json` -> `settings.json.tmp`
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_temp(temp_path: &Path, bytes: &[u8]) -> Result<()> {
    // A temp file left by a crash may carry wider permissions; start fresh
    match fs::remove_file(temp_path) {
        Ok(()) => tracing::debug!(path = %temp_path.display(), "removed stale temp file"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(Error::io("remove stale temp file", temp_path, e)),
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options
        .open(temp_path)
        .map_err(|e| Error::io("create temp file", temp_path, e))?;
    file.write_all(bytes)
        .map_err(|e| Error::io("write temp file", temp_path, e))?;
    file.sync_all()
        .map_err(|e| Error::io("sync temp file", temp_path, e))
}

/// Create a directory (and parents) with mode 0700 if it doesn't exist
pub fn create_private_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder
        .create(dir)
        .map_err(|e| Error::io("create directory", dir, e))
}
