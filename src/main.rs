mod autocomplete;
mod commands;
mod content;
mod error;
mod kb;
mod qa;
mod state;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use commands::Command;
use state::{AppConfig, AppState};

/// DSA tutor: question-bank answers, autocomplete and quiz generation
#[derive(Parser)]
#[command(name = "dsa-tutor")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Question bank JSON file
    #[arg(long, global = true, value_name = "FILE")]
    bank: Option<PathBuf>,

    /// Book text file for content commands
    #[arg(long, global = true, value_name = "FILE")]
    book: Option<PathBuf>,

    /// Seed for reproducible generation
    #[arg(long, global = true, value_name = "N")]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load env
    let _ = dotenv::dotenv();
    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(bank) = cli.bank {
        config.question_bank = bank;
    }
    if let Some(book) = cli.book {
        config.book_content = book;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    info!(bank = %config.question_bank.display(), "configuration loaded");

    let state = AppState::new(config);
    let fails_hard = matches!(cli.command, Command::Init);

    let (output, code) = match commands::run(&state, cli.command) {
        Ok(value) => (value, ExitCode::SUCCESS),
        Err(e) => {
            let code = if fails_hard {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            (json!({ "error": format!("{e:#}") }), code)
        }
    };
    println!("{}", serde_json::to_string(&output)?);
    Ok(code)
}
