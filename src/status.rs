//! Read-only snapshot of the current settings, backup slot and saved token.

use crate::backup::{self, BackupLookup};
use crate::context::Context;
use crate::credential;
use crate::error::Result;
use crate::provider::{
    self, AUTH_TOKEN_KEY, BASE_URL_KEY, HAIKU_MODEL_KEY, OPUS_MODEL_KEY, Provider,
    SONNET_MODEL_KEY, TIMEOUT_KEY,
};
use crate::token::{self, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSummary {
    pub masked: String,
    pub kind: TokenKind,
}

impl TokenSummary {
    fn of(token: &str) -> Self {
        Self {
            masked: token::mask_token(token),
            kind: token::classify_token(token),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Models {
    pub opus: Option<String>,
    pub sonnet: Option<String>,
    pub haiku: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupStatus {
    NotFound,
    Restorable {
        created_at: Option<String>,
        token_kind: Option<TokenKind>,
        legacy: bool,
    },
    /// Backup belongs to another provider
    Foreign { provider: Provider },
    /// File exists but is neither format
    Unreadable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub provider: Provider,
    pub base_url: Option<String>,
    pub models: Models,
    pub timeout_ms: Option<String>,
    pub token: Option<TokenSummary>,
    /// Env vars besides the Z.AI keys and the auth token
    pub other_env_count: usize,
    pub backup: BackupStatus,
    pub saved_token: bool,
}

/// Collect the status report. Only an unreadable settings file is an error.
pub fn collect(ctx: &Context<'_>) -> Result<StatusReport> {
    let paths = ctx.paths;
    let config = crate::store::load_config(&paths.settings_file)?;
    let get = |key: &str| config.get(key).filter(|v| !v.is_empty()).map(str::to_string);

    let other_env_count = config
        .env
        .keys()
        .filter(|k| !provider::is_zai_key(k) && k.as_str() != AUTH_TOKEN_KEY)
        .count();

    Ok(StatusReport {
        provider: provider::classify(&config),
        base_url: get(BASE_URL_KEY),
        models: Models {
            opus: get(OPUS_MODEL_KEY),
            sonnet: get(SONNET_MODEL_KEY),
            haiku: get(HAIKU_MODEL_KEY),
        },
        timeout_ms: get(TIMEOUT_KEY),
        token: config
            .get(AUTH_TOKEN_KEY)
            .filter(|t| !t.is_empty())
            .map(TokenSummary::of),
        other_env_count,
        backup: backup_status(ctx),
        saved_token: credential::has_saved(paths),
    })
}

fn backup_status(ctx: &Context<'_>) -> BackupStatus {
    match backup::restore_target(&ctx.paths.backup_file) {
        Ok(BackupLookup::Missing) => BackupStatus::NotFound,
        Ok(BackupLookup::Restorable(record)) => BackupStatus::Restorable {
            created_at: record.created_at().map(str::to_string),
            token_kind: record
                .env
                .get(AUTH_TOKEN_KEY)
                .filter(|t| !t.is_empty())
                .map(|t| token::classify_token(t)),
            legacy: record.legacy,
        },
        Ok(BackupLookup::NotRestorable(record)) => BackupStatus::Foreign {
            provider: record.provider(),
        },
        Err(e) => {
            tracing::debug!(error = %e, "backup unreadable");
            BackupStatus::Unreadable
        }
    }
}
