//! High-level command handlers for the CLI.
//!
//! Each function here corresponds to a subcommand in `main.rs`. The core
//! operations report progress through the context's sink; these handlers
//! add the header, the closing hints and the status table.

use anstyle::AnsiColor;
use anyhow::Result;

use crate::context::Context;
use crate::credential;
use crate::provider::Provider;
use crate::status::{self, BackupStatus, StatusReport};
use crate::switch::{self, AnthropicOutcome, ZaiOutcome};
use crate::token::TokenKind;
use crate::ui::Ui;

fn header(ui: &Ui) {
    ui.section(format!("Claude Code API Switcher v{}", env!("CARGO_PKG_VERSION")));
    ui.newline();
}

/// Switch to Anthropic
pub fn anthropic(ctx: &Context<'_>, ui: &Ui) -> Result<()> {
    header(ui);
    ui.info("Switching to Anthropic API...");

    match switch::switch_to_anthropic(ctx)? {
        AnthropicOutcome::AlreadyActive | AnthropicOutcome::AlreadyReset => {
            ui.println(ui.dim("   Use `claude-switch status` to check current settings"));
        }
        AnthropicOutcome::Restored { .. } => {
            ui.println(ui.dim("   Web login token has been restored"));
        }
        AnthropicOutcome::Reset => {
            ui.println(ui.dim("   Run `claude` and log in again to restore access"));
        }
    }
    Ok(())
}

/// Switch to Z.AI
pub fn zai(ctx: &Context<'_>, ui: &Ui) -> Result<()> {
    header(ui);
    ui.info("Switching to Z.AI API...");

    match switch::switch_to_zai(ctx)? {
        ZaiOutcome::AlreadyActive => {
            ui.println(ui.dim("   Use `claude-switch status` to check current settings"));
        }
        ZaiOutcome::Applied { .. } => {
            ui.newline();
            ui.println(ui.dim("To switch back to Anthropic: claude-switch anthropic"));
        }
    }
    Ok(())
}

/// Remove the saved Z.AI token
pub fn clear_token(ctx: &Context<'_>) -> Result<()> {
    credential::clear(ctx)?;
    Ok(())
}

/// Show the current provider, backup and saved token
pub fn status(ctx: &Context<'_>, ui: &Ui) -> Result<()> {
    let report = status::collect(ctx)?;

    ui.section("Current Configuration Status");
    ui.newline();

    if report.provider == Provider::Unknown {
        ui.warn("No configuration found (empty or missing)");
        ui.newline();
    }

    ui.println(status_table(&report, ui).to_string());
    Ok(())
}

fn status_table(report: &StatusReport, ui: &Ui) -> comfy_table::Table {
    let mut table = ui.simple_table();

    let provider_label = match report.provider {
        Provider::Anthropic => "Anthropic (Default)",
        Provider::Zai => "Z.AI (GLM Models)",
        Provider::Custom => "Custom",
        Provider::Unknown => "Unknown",
    };
    table.add_row(vec![
        ui.cell("Provider:"),
        ui.colored_cell(provider_label, AnsiColor::Green),
    ]);

    let base_url = match (&report.base_url, report.provider) {
        (Some(url), _) => url.clone(),
        (None, Provider::Anthropic) => "api.anthropic.com (default)".to_string(),
        (None, _) => "-".to_string(),
    };
    table.add_row(vec![ui.cell("Base URL:"), ui.cell(base_url)]);

    for (label, model) in [
        ("Sonnet Model:", &report.models.sonnet),
        ("Opus Model:", &report.models.opus),
        ("Haiku Model:", &report.models.haiku),
    ] {
        if let Some(model) = model {
            table.add_row(vec![ui.cell(label), ui.cell(model)]);
        }
    }

    if let Some(timeout) = &report.timeout_ms {
        table.add_row(vec![ui.cell("Timeout:"), ui.cell(format!("{timeout} ms"))]);
    }

    if let Some(token) = &report.token {
        let note = match (report.provider, token.kind) {
            (Provider::Zai, TokenKind::ApiKey) => " (API key)",
            (Provider::Zai, TokenKind::WebSession) => " (web token - unexpected for Z.AI)",
            (_, TokenKind::WebSession) => " (web login token)",
            _ => "",
        };
        table.add_row(vec![
            ui.cell("Auth Token:"),
            ui.cell(format!("{}{}", token.masked, note)),
        ]);
    }

    if report.other_env_count > 0 {
        table.add_row(vec![
            ui.cell("Other env vars:"),
            ui.cell(report.other_env_count.to_string()),
        ]);
    }

    let backup_cell = match &report.backup {
        BackupStatus::Restorable {
            created_at,
            token_kind,
            legacy,
        } => {
            let mut text = String::from("Available (Anthropic");
            if *legacy {
                text.push_str(", legacy format");
            }
            text.push(')');
            if let Some(created_at) = created_at {
                text.push_str(&format!(", created {created_at}"));
            }
            match token_kind {
                Some(TokenKind::WebSession) => text.push_str(", web login token"),
                Some(TokenKind::ApiKey) => text.push_str(", API key (unexpected)"),
                _ => {}
            }
            ui.colored_cell(text, AnsiColor::Green)
        }
        BackupStatus::Foreign { provider } => ui.colored_cell(
            format!("Present but not restorable ({provider})"),
            AnsiColor::Yellow,
        ),
        BackupStatus::Unreadable => {
            ui.colored_cell("Available (unknown format)", AnsiColor::Yellow)
        }
        BackupStatus::NotFound => ui.colored_cell("Not found", AnsiColor::Yellow),
    };
    table.add_row(vec![ui.cell("Backup:"), backup_cell]);

    let saved = if report.saved_token {
        ui.cell("Available")
    } else {
        ui.cell("Not found")
    };
    table.add_row(vec![ui.cell("Saved Token:"), saved]);

    table
}
