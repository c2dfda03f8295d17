use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Backend base URL
    #[arg(long)]
    pub api_base: Option<String>,

    /// Assistant type
    #[arg(short, long)]
    pub loe_type: Option<String>,

    /// Use canned responses instead of the backend
    #[arg(long)]
    pub mock: bool,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing LoE assistant...".bright_blue().bold());

    let defaults = Config::default();
    let config = Config {
        api_base: args.api_base.unwrap_or(defaults.api_base),
        loe_type: args.loe_type.unwrap_or(defaults.loe_type),
        mock: args.mock,
        ..Config::default()
    };

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Ready!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: loe paste email.txt   (or `loe new` to fill in by hand)");
    println!("  2. Run: loe show");
    println!("  3. Run: loe generate --out {}", loe_workspace::DEFAULT_EXPORT_NAME);

    Ok(())
}
