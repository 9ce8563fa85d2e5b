use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

const STARTER_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>{{prompt}}</title>
  <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-50 text-gray-900">
  <header class="p-6 bg-blue-600 text-white"><h1 class="text-3xl">{{prompt}}</h1></header>
  <main class="p-8">
    <p>Click an element to select it, drag to reorder, type to edit.</p>
    <button class="px-4 py-2 bg-blue-500 text-white">Get started</button>
  </main>
</body>
</html>
"#;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Starter page to create
    #[arg(short, long, default_value = "page.html")]
    pub page: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing livepage project...".bright_blue().bold());

    let config = Config::default();
    let storage_dir = config.get_storage_dir(cwd);
    if !storage_dir.exists() {
        fs::create_dir_all(&storage_dir)?;
        println!("  {} Created {}/", "✓".green(), config.history.storage_dir);
    }

    let page = PathBuf::from(cwd).join(&args.page);
    if !page.exists() {
        fs::write(&page, STARTER_PAGE)?;
        println!("  {} Created {}", "✓".green(), args.page);
    }

    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: livepage generate --markup {} --prompt \"My landing page\"", args.page);
    println!("  2. Run: livepage preview {} -o preview.html", args.page);
    println!("  3. Run: livepage history list");

    Ok(())
}
