//! Z.AI token acquisition and the saved-token file.

use std::fs;
use std::io::ErrorKind;

use crate::context::{Context, TOKEN_ENV_VAR};
use crate::error::{Error, Result};
use crate::paths::Paths;
use crate::store;

/// Get a Z.AI token: env var, then saved token file, then prompt.
///
/// A prompted token may be saved for next time; a failed save only warns.
pub fn acquire(ctx: &Context<'_>) -> Result<String> {
    if let Some(token) = ctx
        .env
        .var(TOKEN_ENV_VAR)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
    {
        ctx.sink
            .info(&format!("Using token from {TOKEN_ENV_VAR} environment variable"));
        return Ok(token);
    }

    match store::read_secret(&ctx.paths.token_file) {
        Ok(Some(token)) => {
            ctx.sink.info("Using token from saved token file");
            return Ok(token);
        }
        Ok(None) => {}
        Err(e) => {
            tracing::debug!(error = %e, "saved token unreadable");
            ctx.sink
                .warn(&format!("Ignoring unreadable token file: {}", ctx.paths.token_file.display()));
        }
    }

    ctx.sink.warn("No API token found");
    let token = ctx
        .prompter
        .secret("Please enter your Z.AI API token:")?
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(Error::EmptyCredential)?;

    let save = ctx
        .prompter
        .confirm("Save token for future use?")
        .unwrap_or_else(|e| {
            ctx.sink.warn(&format!("Not saving token: {e}"));
            false
        });
    if save {
        match store::write_secret(&ctx.paths.token_file, &token) {
            Ok(()) => ctx.sink.ok("Token saved successfully"),
            Err(e) => ctx.sink.warn(&format!("Failed to save token: {e}")),
        }
    }

    Ok(token)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Removed,
    NotFound,
}

/// Delete the saved token file
pub fn clear(ctx: &Context<'_>) -> Result<ClearOutcome> {
    let path = &ctx.paths.token_file;
    match fs::remove_file(path) {
        Ok(()) => {
            ctx.sink.ok("Saved token removed successfully");
            Ok(ClearOutcome::Removed)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            ctx.sink.warn("No saved token found");
            Ok(ClearOutcome::NotFound)
        }
        Err(e) => Err(Error::io("remove", path, e)),
    }
}

/// Whether `acquire` would pick up a saved token
pub fn has_saved(paths: &Paths) -> bool {
    matches!(store::read_secret(&paths.token_file), Ok(Some(_)))
}
