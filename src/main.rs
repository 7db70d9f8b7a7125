use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use claude_switch::{
    commands,
    context::{Context, InquirePrompter, ProcessEnv, SystemClock},
    paths::Paths,
    ui::{ColorMode, Ui},
};

#[derive(Parser)]
#[command(name = "claude-switch")]
#[command(about = "Claude Code API Switcher - toggle between Anthropic and Z.AI")]
#[command(version, arg_required_else_help = true)]
#[command(after_help = "Switching to Z.AI backs up your Anthropic web login token.\n\
    Use `claude-switch anthropic` to restore it later.\n\n\
    Environment:\n  ZAI_AUTH_TOKEN   Z.AI API key (skips the prompt)")]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// When to use colors: always, auto, never
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Claude config directory (default: ~/.claude)
    #[arg(long, global = true, value_name = "DIR", env = "CLAUDE_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Switch to Anthropic API (restore web login token)
    #[command(visible_alias = "a")]
    Anthropic,

    /// Switch to Z.AI API (use API key)
    #[command(visible_alias = "z")]
    Zai,

    /// Show current configuration
    #[command(visible_alias = "s")]
    Status,

    /// Remove saved Z.AI API token
    ClearToken,

    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli, ui: &Ui) -> Result<()> {
    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "claude-switch", &mut std::io::stdout());
        return Ok(());
    }

    let paths = Paths::new(cli.config_dir)?;
    let env = ProcessEnv;
    let prompter = InquirePrompter;
    let clock = SystemClock;
    let ctx = Context::new(&paths, &env, &prompter, &clock, ui);

    match cli.command {
        Commands::Anthropic => commands::anthropic(&ctx, ui),
        Commands::Zai => commands::zai(&ctx, ui),
        Commands::Status => commands::status(&ctx, ui),
        Commands::ClearToken => commands::clear_token(&ctx),
        Commands::Completions { .. } => Ok(()),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let ui = Ui::new(cli.color, cli.no_color);

    if let Err(e) = run(cli, &ui) {
        ui.err(format!("{e:#}"));
        std::process::exit(1);
    }
}
