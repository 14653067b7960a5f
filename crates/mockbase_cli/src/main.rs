//! mockbase command-line entry point.
//!
//! # Responsibility
//! - Open a snapshot (JSON file or SQLite database) through core repositories.
//! - Run one query or mutation and print the JSON result to stdout.

use clap::{Args, Parser, Subcommand};
use mockbase_core::{default_log_level, init_logging};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "mockbase")]
#[command(about = "Query and edit a JSON document store", long_about = None)]
struct Cli {
    #[command(flatten)]
    options: GlobalOptions,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalOptions {
    /// Snapshot location; `.db`, `.sqlite` or `.sqlite3` selects SQLite.
    #[arg(long, default_value = "db.json")]
    db: PathBuf,

    /// Log level (trace|debug|info|warn|error); only used with `--log-dir`.
    #[arg(long)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long)]
    log_dir: Option<String>,

    /// Page size used when only `_page` is given.
    #[arg(long)]
    per_page: Option<usize>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List collection names and kinds
    Collections,
    /// Filter, sort and paginate a collection with `key=value` parameters
    List {
        collection: String,
        params: Vec<String>,
    },
    /// Show one record by id
    Get {
        collection: String,
        id: String,
        #[arg(long = "embed")]
        embed: Vec<String>,
    },
    /// Append a record (a new id is always generated)
    Create { collection: String, json: String },
    /// Merge fields into a record by id
    Update {
        collection: String,
        id: String,
        json: String,
    },
    /// Replace a record by id, keeping its id
    Replace {
        collection: String,
        id: String,
        json: String,
    },
    /// Replace a singleton collection
    Set { collection: String, json: String },
    /// Merge fields into a singleton collection
    Patch { collection: String, json: String },
    /// Delete a record by id, nulling references and pruning dependents
    Delete {
        collection: String,
        id: String,
        #[arg(long = "dependent")]
        dependents: Vec<String>,
    },
}

/// Resolves `(level, dir)` for file logging, or `None` when logging is off.
fn log_settings(options: &GlobalOptions) -> Option<(&str, &str)> {
    let log_dir = options.log_dir.as_deref()?;
    let level = match options.log_level.as_deref() {
        Some(level) => level,
        None => default_log_level(),
    };
    Some((level, log_dir))
}

fn main() {
    let cli = Cli::parse();

    match log_settings(&cli.options) {
        Some((level, log_dir)) => {
            if let Err(err) = init_logging(level, log_dir) {
                eprintln!("Warning: logging disabled: {err}");
            }
        }
        None if cli.options.log_level.is_some() => {
            eprintln!("Warning: --log-level has no effect without --log-dir");
        }
        None => {}
    }

    match commands::execute(&cli.options, cli.command) {
        Ok(output) => println!("{output}"),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
