//! Zeidan Parfum CLI - spreadsheet diagnostics and maintenance.
//!
//! # Usage
//!
//! ```bash
//! # Show the spreadsheet title and which worksheets are missing
//! zp-cli check
//!
//! # Create missing worksheets with their header rows
//! zp-cli init
//!
//! # Print the next sale or purchase order code
//! zp-cli next-code sale
//! zp-cli next-code purchase
//! ```
//!
//! The store is configured with the same `ZEIDAN_*` variables as the web
//! binaries (see `zeidan_sheets::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand, ValueEnum};

use zeidan_core::OrderPrefix;
use zeidan_sheets::SheetsConfig;

mod commands;

#[derive(Parser)]
#[command(name = "zp-cli")]
#[command(author, version, about = "Zeidan Parfum CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Describe the spreadsheet and report missing worksheets
    Check,
    /// Create missing worksheets with header rows
    Init,
    /// Print the next order code
    NextCode {
        /// Which sequence to read
        #[arg(value_enum)]
        kind: CodeKind,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CodeKind {
    /// Sales (`ZP`)
    Sale,
    /// Purchases (`CP`)
    Purchase,
}

impl From<CodeKind> for OrderPrefix {
    fn from(kind: CodeKind) -> Self {
        match kind {
            CodeKind::Sale => Self::Sale,
            CodeKind::Purchase => Self::Purchase,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zp_cli=info,zeidan_sheets=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

#[allow(clippy::print_stdout)]
async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let _ = dotenvy::dotenv();
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| commands::CommandError::Tls)?;

    let store = SheetsConfig::from_env()?.connect()?;

    match cli.command {
        Commands::Check => {
            let report = commands::sheets::check(store.as_ref()).await?;
            println!("{report}");
            if !report.missing.is_empty() {
                return Err(commands::CommandError::MissingWorksheets(
                    report.missing.join(", "),
                ));
            }
        }
        Commands::Init => {
            let created = commands::sheets::init(store.as_ref()).await?;
            if created.is_empty() {
                println!("All worksheets already exist.");
            } else {
                for name in created {
                    println!("Created worksheet {name}");
                }
            }
        }
        Commands::NextCode { kind } => {
            let next = commands::orders::next_code(store.as_ref(), kind.into()).await?;
            println!("{next}");
            if next.is_unresolved() {
                tracing::warn!("Last order code has no numeric suffix; fix it in the spreadsheet");
            }
        }
    }
    Ok(())
}
