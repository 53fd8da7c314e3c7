//! `attrkit` – mass assigns a JSON object onto a record and prints the result.
//!
//! ```text
//! echo '{"name":"Ada","password":"x"}' | attrkit --definition user.toml --pretty
//! ```

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde_json::{Map, Value};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use attrkit::{Definition, JsonOptions, Kind, Model, ModelError, Result};

/// The record kind the binary fills; its lists come from `--definition`.
struct Document;

impl Kind for Document {
    fn name() -> &'static str {
        "Document"
    }
}

#[derive(Parser, Debug)]
#[command(name = "attrkit")]
#[command(about = "Mass assign a JSON object onto a guarded record and print it", long_about = None)]
struct Cli {
    /// Definition file (TOML, JSON, YAML...) with fillable/guarded/hidden/visible lists
    #[arg(short, long)]
    definition: Option<PathBuf>,

    /// JSON object to fill from; stdin when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Bypass guarding
    #[arg(short, long)]
    force: bool,

    /// Indent output with 4 spaces
    #[arg(short, long)]
    pretty: bool,

    /// Emit slashes and non-ASCII characters without escaping
    #[arg(short, long)]
    unescaped: bool,

    /// Print only these keys (comma separated)
    #[arg(short, long, value_delimiter = ',')]
    only: Vec<String>,
}

fn read_input(input: Option<&PathBuf>) -> Result<Map<String, Value>> {
    let text = match input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            text
        }
    };
    Ok(serde_json::from_str(&text)?)
}

fn run(cli: &Cli) -> Result<String> {
    let mut record = Model::<Document>::default();
    if let Some(path) = &cli.definition {
        let definition = Definition::load(path)?;
        info!(path = %path.display(), ?definition, "loaded definition");
        definition.apply(&mut record);
    }
    let attributes = read_input(cli.input.as_ref())?;
    if cli.force {
        record.force_fill(attributes)?;
    } else {
        record.fill(attributes)?;
    }

    let mut options = JsonOptions::empty();
    if cli.pretty {
        options |= JsonOptions::PRETTY_PRINT;
    }
    if cli.unescaped {
        options |= JsonOptions::UNESCAPED_SLASHES | JsonOptions::UNESCAPED_UNICODE;
    }
    if cli.only.is_empty() {
        record.to_json(options)
    } else {
        let keys: Vec<&str> = cli.only.iter().map(String::as_str).collect();
        attrkit::json::encode(&record.only(&keys), options)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e @ ModelError::MassAssignment { .. }) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = %e, "attrkit failed");
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
