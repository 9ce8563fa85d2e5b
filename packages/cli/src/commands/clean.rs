use super::{read_input, write_output};
use anyhow::Result;
use clap::Args;
use livepage_runtime::canonicalize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CleanArgs {
    /// Markup file (may contain runtime artifacts)
    pub file: PathBuf,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// Strip runtime artifacts and emit canonical markup
pub fn clean(args: CleanArgs, cwd: &str) -> Result<()> {
    let markup = read_input(cwd, &args.file)?;
    let cleaned = canonicalize(&markup);
    tracing::debug!(before = markup.len(), after = cleaned.len(), "cleaned");
    write_output(cwd, &cleaned, args.out.as_deref())
}
