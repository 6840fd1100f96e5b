//! Router ETL operator CLI
//!
//! A command-line tool for decoding metric names, inspecting the
//! processed ledger and browsing merged records.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{decode, ledger, records};
use std::path::PathBuf;

/// Router ETL operator CLI
#[derive(Parser)]
#[command(name = "retl")]
#[command(author, version, about = "Operator CLI for the router telemetry ETL", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, short, global = true, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode compound metric names
    Decode {
        /// Metric names, e.g. IP-MIB-ipIfStatsInOctets.IPv4.4
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Inspect or extend the processed ledger
    #[command(subcommand)]
    Ledger(LedgerCommands),

    /// Browse merged metric records
    Records {
        /// JSON-lines file written by router-etl
        #[arg(long, env = "ETL_OUTPUT_PATH", default_value = "data/processed_metrics.jsonl")]
        file: PathBuf,

        /// Only show records of this device address
        #[arg(long, short)]
        device: Option<String>,

        /// Show at most this many records
        #[arg(long, short)]
        limit: Option<usize>,
    },
}

#[derive(Subcommand)]
pub enum LedgerCommands {
    /// List recorded snapshot identities
    List {
        /// Ledger file
        #[arg(long, env = "ETL_LEDGER_PATH", default_value = "data/processed_documents.txt")]
        ledger: PathBuf,
    },

    /// Check whether snapshot identities have been processed
    Check {
        /// Ledger file
        #[arg(long, env = "ETL_LEDGER_PATH", default_value = "data/processed_documents.txt")]
        ledger: PathBuf,

        /// Snapshot identities
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Record snapshot identities as processed
    Mark {
        /// Ledger file
        #[arg(long, env = "ETL_LEDGER_PATH", default_value = "data/processed_documents.txt")]
        ledger: PathBuf,

        /// Snapshot identities
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Decode { names } => {
            decode::decode_names(&names, cli.format)?;
        }
        Commands::Ledger(ledger_cmd) => match ledger_cmd {
            LedgerCommands::List { ledger: path } => {
                ledger::list_entries(&path, cli.format)?;
            }
            LedgerCommands::Check { ledger: path, ids } => {
                ledger::check_entries(&path, &ids, cli.format)?;
            }
            LedgerCommands::Mark { ledger: path, ids } => {
                ledger::mark_entries(&path, &ids, cli.format)?;
            }
        },
        Commands::Records {
            file,
            device,
            limit,
        } => {
            records::show_records(&file, device.as_deref(), limit, cli.format)?;
        }
    }

    Ok(())
}
