use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use streetfood::config::{self, PrepConfig};
use streetfood::dashboard::Dashboard;
use streetfood::prep::{self, ConfidenceLevel, CountrySelection};

#[derive(Parser)]
#[command(name = "streetfood", about = "Street-food price data preparation")]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Also write logs to a daily-rolling file in the data directory
    #[arg(long, global = true)]
    pub log_file: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the countries that can be selected
    Countries {
        /// Source CSV. Defaults to the configured data path.
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Print every prepared table for one selection as JSON
    View {
        /// Source CSV. Defaults to the configured data path.
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Country to select, or "All"
        #[arg(short, long, default_value = "All")]
        country: String,

        /// Confidence level of the per-country intervals, in (0, 1)
        #[arg(long)]
        confidence: Option<f64>,
    },
    /// Clean and derive a source, then save it as CSV
    Clean {
        /// Source CSV. Defaults to the configured data path.
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Output CSV path
        #[arg(short, long)]
        output: PathBuf,
    },
}

pub fn run_command(cli: Cli) -> Result<()> {
    let config = config::resolve_config(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Countries { file } => handle_countries(file, &config),
        Commands::View {
            file,
            country,
            confidence,
        } => handle_view(file, country, confidence, config),
        Commands::Clean { file, output } => handle_clean(file, &output, &config),
    }
}

fn handle_countries(file: Option<PathBuf>, config: &PrepConfig) -> Result<()> {
    let path = file.unwrap_or_else(|| config.data_path.clone());
    let dashboard = Dashboard::from_path(&path, config)
        .with_context(|| format!("Failed to prepare {}", path.display()))?;

    for country in dashboard.country_options() {
        println!("{country}");
    }
    Ok(())
}

fn handle_view(
    file: Option<PathBuf>,
    country: String,
    confidence: Option<f64>,
    mut config: PrepConfig,
) -> Result<()> {
    if let Some(level) = confidence {
        config.confidence_level = ConfidenceLevel::new(level)?;
    }

    let path = file.unwrap_or_else(|| config.data_path.clone());
    let dashboard = Dashboard::from_path(&path, &config)
        .with_context(|| format!("Failed to prepare {}", path.display()))?;

    let selection = CountrySelection::from(country);
    if let CountrySelection::Country(name) = &selection
        && !dashboard.country_options().contains(name)
    {
        tracing::warn!("'{name}' is not one of the selectable countries");
    }

    let view = dashboard.view(&selection)?;
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

fn handle_clean(file: Option<PathBuf>, output: &Path, config: &PrepConfig) -> Result<()> {
    let path = file.unwrap_or_else(|| config.data_path.clone());
    let mut table = prep::load_and_prepare(&path, &config.clean_options(), &config.derive_options())
        .with_context(|| format!("Failed to prepare {}", path.display()))?;

    prep::save_df(&mut table.df, output)
        .with_context(|| format!("Failed to save {}", output.display()))?;

    println!("{}", serde_json::to_string_pretty(&table.summary())?);
    Ok(())
}
