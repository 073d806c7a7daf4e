//! Command-line entry point for the medication ledger skill.
//!
//! # Responsibility
//! - Probe core linkage (`ping`, `version`).
//! - Feed one request envelope through the skill router (`handle`).

use clap::{Parser, Subcommand};
use medledger_skill::{handle_request, SkillConfig};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "medledger", version, about = "Medication ledger voice-skill backend")]
struct Cli {
    /// Ledger database path (overrides MEDLEDGER_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Absolute log directory (overrides MEDLEDGER_LOG_DIR)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Log level (overrides MEDLEDGER_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a health-check token
    Ping,
    /// Print the core version
    Version,
    /// Handle one request envelope and print the response envelope
    Handle {
        /// Read the request from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Command::Ping => {
            println!("medledger_core ping={}", medledger_core::ping());
            ExitCode::SUCCESS
        }
        Command::Version => {
            println!("medledger_core version={}", medledger_core::core_version());
            ExitCode::SUCCESS
        }
        Command::Handle { ref input } => {
            match run_handle(&cli, input.as_ref()) {
                Ok(response) => {
                    println!("{response}");
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    eprintln!("medledger: {err}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn run_handle(cli: &Cli, input: Option<&PathBuf>) -> Result<String, String> {
    let config = SkillConfig::from_env()
        .and_then(|config| {
            config.with_overrides(cli.db.clone(), cli.log_level.clone(), cli.log_dir.clone())
        })
        .map_err(|err| err.to_string())?;

    if let Some(log_dir) = &config.log_dir {
        let log_dir = log_dir
            .to_str()
            .ok_or_else(|| format!("log directory `{}` is not valid UTF-8", log_dir.display()))?;
        medledger_core::init_logging(&config.log_level, log_dir)?;
    }

    let raw = match input {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|err| format!("failed to read `{}`: {err}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|err| format!("failed to read stdin: {err}"))?;
            buffer
        }
    };

    Ok(handle_request(&config, &raw))
}
