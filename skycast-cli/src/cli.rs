use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use skycast_core::{AccuWeatherClient, Config, DashboardController, GeminiClient};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather dashboard CLI")]
pub struct Cli {
    /// Use a config file other than the platform default.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the weather and text-generation API keys.
    Configure,

    /// Look up a city and render its weather dashboard.
    Show {
        /// City name, e.g. "London".
        city: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config_path = match &self.config {
            Some(path) => path.clone(),
            None => Config::config_file_path()?,
        };

        match self.command {
            Command::Configure => configure(&config_path),
            Command::Show { city } => show(&config_path, &city).await,
        }
    }
}

/// Prompt for both API keys and persist them, keeping any other settings
/// already present in the file.
fn configure(path: &Path) -> anyhow::Result<()> {
    let mut config = Config::load_from(path)?;

    let provider_key = inquire::Password::new("Weather provider API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read weather provider API key")?;

    let summary_key = inquire::Password::new("Text-generation API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read text-generation API key")?;

    config.set_provider_api_key(provider_key);
    config.set_summary_api_key(summary_key);
    config.save_to(path)?;

    println!("Configuration saved to {}", path.display());
    Ok(())
}

async fn show(path: &Path, city: &str) -> anyhow::Result<()> {
    let config = Config::load_from(path)?;

    let weather = AccuWeatherClient::new(&config.provider)?;
    let summarizer = GeminiClient::new(&config.summary)?;
    let mut controller = DashboardController::new(Box::new(weather), Box::new(summarizer));

    let view = controller.submit(city).await?;
    print!("{}", render::render_dashboard(&view));

    Ok(())
}
