//! Processed ledger inspection

use anyhow::{Context, Result};
use colored::Colorize;
use etl_lib::{FileLedger, ProcessedLedger};
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

use crate::output::{print_info, print_json, print_success, print_table, print_warning, OutputFormat};

/// Row for ledger entries table
#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Snapshot ID")]
    id: String,
}

#[derive(Serialize)]
struct CheckResult<'a> {
    id: &'a str,
    processed: bool,
}

#[derive(Serialize)]
struct MarkResult {
    requested: usize,
    appended: usize,
    total: usize,
}

fn open(path: &Path) -> Result<FileLedger> {
    FileLedger::open(path).with_context(|| format!("Failed to open ledger {}", path.display()))
}

/// List every recorded identity in file order
pub fn list_entries(path: &Path, format: OutputFormat) -> Result<()> {
    let ledger = open(path)?;
    let entries = ledger
        .entries()
        .with_context(|| format!("Failed to read ledger {}", path.display()))?;

    let rows: Vec<EntryRow> = entries
        .iter()
        .enumerate()
        .map(|(i, id)| EntryRow {
            position: i + 1,
            id: id.clone(),
        })
        .collect();

    print_table(rows, &entries, format)?;
    if matches!(format, OutputFormat::Table) && !entries.is_empty() {
        println!("\nTotal: {} entries", entries.len());
    }
    Ok(())
}

/// Report whether each identity has been processed
pub fn check_entries(path: &Path, ids: &[String], format: OutputFormat) -> Result<()> {
    let ledger = open(path)?;
    let results: Vec<CheckResult<'_>> = ids
        .iter()
        .map(|id| CheckResult {
            id,
            processed: ledger.is_processed(id),
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&results)?,
        OutputFormat::Table => {
            for result in &results {
                if result.processed {
                    println!("{} {}", result.id.cyan(), "processed".green());
                } else {
                    println!("{} {}", result.id.cyan(), "pending".yellow());
                }
            }
        }
    }
    Ok(())
}

/// Record identities as processed so the pipeline skips them
pub fn mark_entries(path: &Path, ids: &[String], format: OutputFormat) -> Result<()> {
    let mut ledger = open(path)?;
    let appended = ledger
        .mark_processed(ids)
        .with_context(|| format!("Failed to update ledger {}", path.display()))?;

    let result = MarkResult {
        requested: ids.len(),
        appended,
        total: ledger.len(),
    };

    match format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Table => {
            if appended == 0 {
                print_warning("All identities were already recorded");
            } else {
                print_success(&format!("Recorded {} new identities", appended));
            }
            print_info(&format!("Ledger now holds {} entries", result.total));
        }
    }
    Ok(())
}
