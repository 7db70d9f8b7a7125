//! Provider switching logic.
//!
//! This module implements the core mechanism of `claude-switch`. Each call
//! reads `settings.json`, classifies it, and computes one transition:
//! - To Z.AI: back up the Anthropic config (only if no Anthropic backup is
//!   already stored), then write a fresh Z.AI config.
//! - To Anthropic: restore the backup minus the Z.AI keys, or fall back to an
//!   empty config when there is nothing to restore.
//!
//! No state is kept between invocations. The backup is never overwritten once
//! it holds an Anthropic config, because the web login token inside it can't
//! be regenerated by the user.

use crate::backup::{self, BackupLookup};
use crate::context::Context;
use crate::credential;
use crate::error::{Error, Result};
use crate::provider::{self, Provider};
use crate::store::{self, Config};
use crate::token::{self, Advisory};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnthropicOutcome {
    /// Settings already point at Anthropic; nothing written
    AlreadyActive,
    /// Settings are already the empty reset config and there is no backup
    AlreadyReset,
    /// Backup restored
    Restored { backup_created_at: Option<String> },
    /// No backup available; wrote an empty config (re-login required)
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupAction {
    Created,
    /// An Anthropic backup already existed and was kept
    Preserved,
    /// Current config is a custom provider, backup left alone
    SkippedCustom,
    /// Nothing to back up; `existing` tells whether an older backup is around
    NothingToBackUp { existing: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZaiOutcome {
    AlreadyActive,
    Applied {
        backup: BackupAction,
        advisory: Option<Advisory>,
    },
}

/// Switch settings to Anthropic, restoring the backup if one exists
pub fn switch_to_anthropic(ctx: &Context<'_>) -> Result<AnthropicOutcome> {
    let paths = ctx.paths;
    let current = store::load_config(&paths.settings_file)?;
    let detected = provider::classify(&current);
    tracing::debug!(%detected, "switching to Anthropic");

    if detected == Provider::Anthropic {
        ctx.sink.warn("Already using Anthropic configuration");
        return Ok(AnthropicOutcome::AlreadyActive);
    }

    let lookup = match backup::restore_target(&paths.backup_file) {
        Ok(lookup) => lookup,
        Err(e) => {
            ctx.sink.warn(&format!("Failed to read backup: {e}"));
            BackupLookup::Missing
        }
    };

    let Some(record) = lookup.into_restorable() else {
        if current.is_empty() && is_reset_document(&paths.settings_file) {
            ctx.sink
                .warn("No Anthropic backup found and configuration is already empty");
            return Ok(AnthropicOutcome::AlreadyReset);
        }

        ctx.sink.warn("No valid Anthropic backup found");
        ctx.sink
            .warn("Cannot restore Anthropic web login token without backup; you may need to re-login to Claude Code");
        store::save_config(&paths.settings_file, &Config::default())?;
        ctx.sink.warn("Created empty configuration (re-login required)");
        return Ok(AnthropicOutcome::Reset);
    };

    let backup_created_at = record.created_at().map(str::to_string);
    if let Some(created_at) = &backup_created_at {
        ctx.sink
            .info(&format!("Restoring from backup created at: {created_at}"));
    }

    let restored = Config::new(provider::strip_zai_keys(&record.env));
    store::save_config(&paths.settings_file, &restored)?;

    ctx.sink.ok("Anthropic configuration restored from backup");
    Ok(AnthropicOutcome::Restored { backup_created_at })
}

/// Switch settings to Z.AI, backing up an Anthropic config first
pub fn switch_to_zai(ctx: &Context<'_>) -> Result<ZaiOutcome> {
    let paths = ctx.paths;
    let current = store::load_config(&paths.settings_file)?;
    let detected = provider::classify(&current);
    tracing::debug!(%detected, "switching to Z.AI");

    if detected == Provider::Zai {
        ctx.sink.warn("Already using Z.AI configuration");
        return Ok(ZaiOutcome::AlreadyActive);
    }

    let backup = match detected {
        Provider::Anthropic => preserve_anthropic(ctx, &current)?,
        Provider::Custom => {
            ctx.sink.warn("Current config is a custom provider - not backing up");
            ctx.sink.warn("An existing Anthropic backup will be preserved");
            BackupAction::SkippedCustom
        }
        Provider::Unknown | Provider::Zai => {
            let existing = backup::restore_target(&paths.backup_file)
                .map(|l| l.has_restore_target())
                .unwrap_or(false);
            if existing {
                ctx.sink.info("Using existing Anthropic backup");
            } else {
                ctx.sink.warn("No Anthropic configuration to back up");
                ctx.sink.warn("You may need to re-login when switching back");
            }
            BackupAction::NothingToBackUp { existing }
        }
    };

    let token = credential::acquire(ctx)?;

    let advisory = token::validate_for_provider(&token, Provider::Zai);
    if let Some(advisory) = &advisory {
        ctx.sink.warn(&format!("Warning: {}", advisory.summary));
        ctx.sink.warn(advisory.hint);
    }

    // Fresh config, never merged with the previous provider's keys
    store::save_config(&paths.settings_file, &provider::zai_config(&token))?;

    ctx.sink.ok("Z.AI configuration applied successfully");
    Ok(ZaiOutcome::Applied { backup, advisory })
}

/// Settings file already holds exactly `{"env": {}}`
fn is_reset_document(path: &Path) -> bool {
    matches!(
        store::read_json::<serde_json::Value>(path),
        Ok(Some(value)) if value == serde_json::json!({"env": {}})
    )
}

/// Back up an Anthropic config unless an Anthropic backup is already stored
fn preserve_anthropic(ctx: &Context<'_>, current: &Config) -> Result<BackupAction> {
    let paths = ctx.paths;
    let lookup = match backup::restore_target(&paths.backup_file) {
        Ok(lookup) => lookup,
        Err(e) => {
            ctx.sink.warn(&format!("Failed to check existing backup: {e}"));
            BackupLookup::Missing
        }
    };

    if let Some(existing) = lookup.restorable() {
        ctx.sink
            .info("Existing Anthropic backup found (preserving web login token)");
        if let Some(created_at) = existing.created_at() {
            ctx.sink.info(&format!("Backed up at: {created_at}"));
        }
        return Ok(BackupAction::Preserved);
    }

    backup::create_backup(
        &paths.backup_file,
        current,
        Provider::Anthropic,
        ctx.clock.now(),
        ctx.version,
    )
    .map_err(|e| Error::Backup(Box::new(e)))?;

    ctx.sink
        .ok("Anthropic configuration backed up (web login token saved)");
    Ok(BackupAction::Created)
}
