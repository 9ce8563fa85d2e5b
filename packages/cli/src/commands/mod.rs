pub mod clean;
pub mod edit;
pub mod generate;
pub mod history;
pub mod init;
pub mod inject;
pub mod preview;

pub use clean::{clean, CleanArgs};
pub use edit::{edit, EditArgs};
pub use generate::{generate, GenerateArgs};
pub use history::{history, HistoryCommand};
pub use init::{init, InitArgs};
pub use inject::{inject, InjectArgs};
pub use preview::{preview, PreviewArgs};

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Read an input file relative to the working directory
pub(crate) fn read_input(cwd: &str, path: &Path) -> Result<String> {
    let full = PathBuf::from(cwd).join(path);
    fs::read_to_string(&full).with_context(|| format!("cannot read {}", full.display()))
}

/// Print to stdout, or write to `out` when given
pub(crate) fn write_output(cwd: &str, content: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            let full = PathBuf::from(cwd).join(path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&full, content).with_context(|| format!("cannot write {}", full.display()))?;
            eprintln!("  {} Wrote {}", "✓".green(), path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
