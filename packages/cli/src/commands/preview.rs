use super::{read_input, write_output};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use livepage_controller::Frame;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Canonical markup file
    pub file: PathBuf,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Title of the host page
    #[arg(long, default_value = "livepage preview")]
    pub title: String,
}

/// Emit a host page that renders the markup inside a sandboxed frame
pub fn preview(args: PreviewArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let markup = read_input(cwd, &args.file)?;

    let mut frame = Frame::new(config.sandbox, config.runtime);
    let _port = frame.load(&markup);
    write_output(cwd, &frame.host_page(&args.title), args.out.as_deref())
}
