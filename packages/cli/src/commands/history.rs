use super::write_output;
use crate::config::Config;
use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// List records, newest first
    List,

    /// Show one record's details
    Show { id: String },

    /// Write one record's markup
    Export {
        id: String,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Remove one record
    Remove { id: String },

    /// Remove every record
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

pub fn history(command: HistoryCommand, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut store = config.open_history(cwd)?;

    match command {
        HistoryCommand::List => {
            if store.is_empty() {
                println!("{}", "No history records".yellow());
                return Ok(());
            }
            for record in store.records() {
                println!(
                    "{}  {}  {}",
                    record.id.bright_white(),
                    record.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
                    record.summary(60)
                );
            }
        }
        HistoryCommand::Show { id } => {
            let record = store
                .get(&id)
                .ok_or_else(|| anyhow::anyhow!("no history record with id {}", id))?;
            println!("{} {}", "id:".bold(), record.id);
            println!("{} {}", "created:".bold(), record.created_at.to_rfc3339());
            println!("{} {}", "prompt:".bold(), record.prompt);
            if let Some(image) = &record.image {
                println!("{} {}", "image:".bold(), image);
            }
            if !record.style.is_empty() {
                println!("{} {}", "style:".bold(), serde_json::to_string(&record.style)?);
            }
            println!("{} {} bytes", "markup:".bold(), record.markup.len());
        }
        HistoryCommand::Export { id, out } => {
            let record = store
                .get(&id)
                .ok_or_else(|| anyhow::anyhow!("no history record with id {}", id))?;
            write_output(cwd, &record.markup, out.as_deref())?;
        }
        HistoryCommand::Remove { id } => {
            store.remove(&id)?;
            println!("  {} Removed {}", "✓".green(), id);
        }
        HistoryCommand::Clear { yes } => {
            if !yes {
                println!(
                    "{} This removes {} records. Re-run with --yes to confirm",
                    "⚠️".yellow(),
                    store.len()
                );
                return Ok(());
            }
            store.clear()?;
            println!("  {} History cleared", "✓".green());
        }
    }

    Ok(())
}
