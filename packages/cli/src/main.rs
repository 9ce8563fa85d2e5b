mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    clean, edit, generate, history, init, inject, preview, CleanArgs, EditArgs, GenerateArgs,
    HistoryCommand, InitArgs, InjectArgs, PreviewArgs,
};
use tracing_subscriber::EnvFilter;

/// livepage - edit generated pages visually and keep the markup in sync
#[derive(Parser, Debug)]
#[command(name = "livepage")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new livepage project
    Init(InitArgs),

    /// Strip runtime artifacts and print canonical markup
    Clean(CleanArgs),

    /// Print sandbox-ready markup with the runtime injected
    Inject(InjectArgs),

    /// Write a host page that renders the markup in a sandbox
    Preview(PreviewArgs),

    /// Replay an edit script through the controller and runtime
    Edit(EditArgs),

    /// Generate a page and record it in history
    Generate(GenerateArgs),

    /// Inspect and manage generation history
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|dir| {
            let cwd = dir.display().to_string();
            match cli.command {
                Command::Init(args) => init(args, &cwd),
                Command::Clean(args) => clean(args, &cwd),
                Command::Inject(args) => inject(args, &cwd),
                Command::Preview(args) => preview(args, &cwd),
                Command::Edit(args) => edit(args, &cwd),
                Command::Generate(args) => generate(args, &cwd),
                Command::History { command } => history(command, &cwd),
            }
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
