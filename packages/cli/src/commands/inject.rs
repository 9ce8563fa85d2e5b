use super::{read_input, write_output};
use anyhow::Result;
use clap::Args;
use livepage_runtime::inject_runtime;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InjectArgs {
    /// Canonical markup file
    pub file: PathBuf,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// Emit sandbox-ready markup with the runtime script injected
pub fn inject(args: InjectArgs, cwd: &str) -> Result<()> {
    let markup = read_input(cwd, &args.file)?;
    write_output(cwd, &inject_runtime(&markup), args.out.as_deref())
}
