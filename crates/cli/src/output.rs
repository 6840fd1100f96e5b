//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use etl_lib::GENERAL_LABEL;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print rows as a table, or the serializable items as JSON
pub fn print_table<R, T>(rows: Vec<R>, items: &T, format: OutputFormat) -> anyhow::Result<()>
where
    R: Tabled,
    T: Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("{}", "No items found".yellow());
                return Ok(());
            }
            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
        }
        OutputFormat::Json => print_json(items)?,
    }
    Ok(())
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Interface id column: 0 is the device-wide counter
pub fn format_interface_id(id: u64) -> String {
    if id == 0 {
        "0 (general)".dimmed().to_string()
    } else {
        id.to_string()
    }
}

/// Missing join values are shown as a dash
pub fn format_optional(value: Option<&str>) -> String {
    match value {
        Some(v) if v == GENERAL_LABEL => v.cyan().to_string(),
        Some(v) => v.to_string(),
        None => "-".dimmed().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_optional() {
        colored::control::set_override(false);
        assert_eq!(format_optional(Some("eth0")), "eth0");
        assert_eq!(format_optional(Some("General")), "General");
        assert_eq!(format_optional(None), "-");
    }

    #[test]
    fn test_format_interface_id() {
        colored::control::set_override(false);
        assert_eq!(format_interface_id(4), "4");
        assert_eq!(format_interface_id(0), "0 (general)");
    }
}
