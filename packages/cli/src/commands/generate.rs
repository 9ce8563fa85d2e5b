use super::read_input;
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use livepage_controller::{GenerationInput, GenerationStatus, HostController, StaticGenerator};
use livepage_history::StyleChoices;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Template the stand-in generator returns; `{{prompt}}` is replaced
    #[arg(short, long)]
    pub markup: PathBuf,

    /// Prompt text recorded with the result
    #[arg(short, long)]
    pub prompt: String,

    /// Reference to the source image
    #[arg(short, long)]
    pub image: Option<String>,

    #[arg(long)]
    pub theme: Option<String>,

    #[arg(long)]
    pub accent_color: Option<String>,

    #[arg(long)]
    pub font: Option<String>,
}

pub fn generate(args: GenerateArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let template = read_input(cwd, &args.markup)?;
    let history = config.open_history(cwd)?;
    let mut controller = HostController::new(history, config.controller_config());

    println!("{}", "✨ Generating page...".bright_blue().bold());

    let input = GenerationInput {
        prompt: args.prompt,
        image: args.image,
        style: StyleChoices {
            theme: args.theme,
            accent_color: args.accent_color,
            font: args.font,
        },
    };
    let mut generator = StaticGenerator::new(template);
    let status = controller.generate(&mut generator, input)?.clone();
    controller.pump();

    match status {
        GenerationStatus::Succeeded { record_id, durable } => {
            println!("  {} Recorded {}", "✓".green(), record_id.bright_white());
            if !durable {
                println!(
                    "  {} History storage is full; this record is not persisted",
                    "⚠️".yellow()
                );
            }
            println!(
                "  {} {} records in history",
                "•".bright_blue(),
                controller.history().len()
            );
            Ok(())
        }
        GenerationStatus::Failed(description) => Err(anyhow!(description)),
        GenerationStatus::Idle => Err(anyhow!("generation did not run")),
    }
}
