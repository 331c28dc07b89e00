use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use rust_simpledb::config::DEFAULT_PROMPT;
use rust_simpledb::{Config, Table, repl};
use tracing_subscriber::{EnvFilter, fmt};

/// Minimal persistent row store with an insert/select prompt
#[derive(Parser, Debug)]
#[command(name = "rust-simpledb")]
#[command(version)]
struct Args {
    /// Database file, created if it does not exist
    #[arg(value_name = "DB_FILE")]
    db_path: PathBuf,

    /// Prompt printed before each command
    #[arg(long, default_value = DEFAULT_PROMPT)]
    prompt: String,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    let config = Config::builder()
        .db_path(args.db_path)
        .prompt(args.prompt)
        .build();

    let mut table = match Table::open(&config.db_path) {
        Ok(table) => table,
        Err(e) => {
            tracing::error!(error = %e, "failed to open database");
            eprintln!("Error opening database: {e}");
            return ExitCode::FAILURE;
        }
    };

    let session = repl::run(io::stdin().lock(), &mut io::stdout().lock(), &mut table, &config);
    if let Err(e) = &session {
        tracing::error!(error = %e, "session ended with an I/O error");
    }

    if let Err(e) = table.close() {
        eprintln!("Error closing database: {e}");
        return ExitCode::FAILURE;
    }

    if session.is_err() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
