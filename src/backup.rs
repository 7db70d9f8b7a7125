//! The single backup slot at `~/.claude/settings.json.backup`.
//!
//! The slot holds the Anthropic config that was active before switching to
//! Z.AI, wrapped with provenance metadata. Older versions wrote a bare
//! `{"env": {...}}` document; those still load and are assumed to be
//! Anthropic. A document that carries `_metadata` is never read as legacy.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::provider::Provider;
use crate::store::{self, Config, Env, null_as_empty};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupMetadata {
    /// Missing tag decodes as `unknown`, which is not restorable
    #[serde(default)]
    pub provider: Provider,
    /// RFC3339 timestamp
    #[serde(default)]
    pub created_at: String,
    /// Version of the tool that wrote the backup
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRecord {
    #[serde(rename = "_metadata", deserialize_with = "null_as_default")]
    pub metadata: BackupMetadata,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub env: Env,

    /// Decoded from the metadata-less format
    #[serde(skip)]
    pub legacy: bool,
}

fn null_as_default<'de, D>(deserializer: D) -> std::result::Result<BackupMetadata, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BackupMetadata>::deserialize(deserializer)?.unwrap_or_default())
}

/// Metadata-less backup format
#[derive(Debug, Deserialize)]
struct LegacyBackup {
    #[serde(deserialize_with = "null_as_empty")]
    env: Env,
}

impl BackupRecord {
    pub fn new(config: &Config, provider: Provider, created_at: DateTime<Utc>, version: &str) -> Self {
        Self {
            metadata: BackupMetadata {
                provider,
                created_at: created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
                version: version.to_string(),
            },
            env: config.env.clone(),
            legacy: false,
        }
    }

    fn from_legacy(env: Env) -> Self {
        Self {
            metadata: BackupMetadata {
                provider: Provider::Anthropic,
                created_at: String::new(),
                version: String::new(),
            },
            env,
            legacy: true,
        }
    }

    pub fn provider(&self) -> Provider {
        self.metadata.provider
    }

    /// Creation time if the backup recorded one
    pub fn created_at(&self) -> Option<&str> {
        Some(self.metadata.created_at.as_str()).filter(|s| !s.is_empty())
    }

    pub fn is_restorable(&self) -> bool {
        self.metadata.provider == Provider::Anthropic
    }

    /// Decode a backup document.
    ///
    /// Documents with a `_metadata` key use the current schema; anything else
    /// must be a legacy `{"env": ...}` object.
    pub fn decode(path: &Path, content: &str) -> Result<Self> {
        let parse_err = |source: serde_json::Error| Error::Parse {
            path: path.to_path_buf(),
            source,
        };

        let value: serde_json::Value = serde_json::from_str(content).map_err(parse_err)?;
        if value.get("_metadata").is_some() {
            return BackupRecord::deserialize(&value).map_err(parse_err);
        }

        let legacy = LegacyBackup::deserialize(&value).map_err(parse_err)?;
        tracing::debug!(path = %path.display(), "backup has no metadata, treating as legacy Anthropic");
        Ok(Self::from_legacy(legacy.env))
    }
}

/// What the backup slot currently holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupLookup {
    Missing,
    /// Anthropic backup that can be restored
    Restorable(BackupRecord),
    /// A backup exists but belongs to another provider
    NotRestorable(BackupRecord),
}

impl BackupLookup {
    pub fn restorable(&self) -> Option<&BackupRecord> {
        match self {
            Self::Restorable(record) => Some(record),
            _ => None,
        }
    }

    pub fn into_restorable(self) -> Option<BackupRecord> {
        match self {
            Self::Restorable(record) => Some(record),
            _ => None,
        }
    }

    pub fn has_restore_target(&self) -> bool {
        matches!(self, Self::Restorable(_))
    }
}

/// Load the backup slot and decide whether it can be restored as Anthropic
pub fn restore_target(path: &Path) -> Result<BackupLookup> {
    let Some(content) = store::read_text(path)? else {
        return Ok(BackupLookup::Missing);
    };

    let record = BackupRecord::decode(path, &content)?;
    if record.is_restorable() {
        Ok(BackupLookup::Restorable(record))
    } else {
        Ok(BackupLookup::NotRestorable(record))
    }
}

/// Write `config` to the backup slot, replacing whatever was there
pub fn create_backup(
    path: &Path,
    config: &Config,
    provider: Provider,
    created_at: DateTime<Utc>,
    version: &str,
) -> Result<BackupRecord> {
    let record = BackupRecord::new(config, provider, created_at, version);
    store::write_json_atomic(path, &record)?;
    tracing::debug!(path = %path.display(), %provider, "created backup");
    Ok(record)
}
