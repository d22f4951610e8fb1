use anyhow::{bail, Result};
use clap::Subcommand;
use std::path::Path;
use tambola_core::GameConfig;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective game config
    Show,
    /// Write the default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn handle_config_command(cmd: ConfigCommands, path: &Path) -> Result<()> {
    match cmd {
        ConfigCommands::Show => {
            let config = if path.exists() {
                println!("Config file: {}", path.display());
                GameConfig::load(path)?
            } else {
                println!("Config file: {} (not found, using defaults)", path.display());
                GameConfig::default()
            };
            println!("{}", serde_json::to_string_pretty(&config)?);
        }

        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                bail!(
                    "{} already exists, pass --force to overwrite it",
                    path.display()
                );
            }
            GameConfig::default().save(path)?;
            println!("Wrote default config to {}", path.display());
        }
    }

    Ok(())
}
