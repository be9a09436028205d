//! Config command - manage configuration.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use syntrack_core::BucketZone;
use syntrack_store::{SettingsStore, default_config_dir};
use tracing::info;

use crate::output::{JsonFormatter, PathsOutput};
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration and database paths.
    Path,

    /// Set the zone used for day and week boundaries.
    SetZone {
        /// `utc`, `local`, or an offset like `+02:00`.
        zone: String,
    },

    /// Reset to defaults.
    Reset,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli, store: &SettingsStore) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli, store).await,
        ConfigAction::Path => show_paths(cli, store).await,
        ConfigAction::SetZone { zone } => set_zone(zone, store).await,
        ConfigAction::Reset => reset_config(store).await,
    }
}

async fn show_config(cli: &Cli, store: &SettingsStore) -> Result<()> {
    let settings = store.get().await;

    match cli.format {
        OutputFormat::Text => {
            let analytics = &settings.engine.analytics;
            let chart = &settings.engine.chart;
            println!("Syntrack Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!(
                "Database:        {}",
                settings.resolve_database_path(cli.db.as_deref()).display()
            );
            println!("Log level:       {}", settings.log_level);
            println!("Bucket zone:     {}", analytics.zone);
            println!("Burn window:     {}h", analytics.burn_window_hours);
            println!("History days:    {}", analytics.history_days);
            println!(
                "Buckets:         {} daily, {} weekly, {} in chart",
                analytics.daily_buckets, analytics.weekly_buckets, analytics.chart_weeks
            );
            println!(
                "ASCII grid:      {}x{}",
                chart.grid_width, chart.grid_height
            );
            println!(
                "SVG canvas:      {}x{} (padding {})",
                chart.svg_width, chart.svg_height, chart.svg_padding
            );
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&settings)?);
        }
    }

    Ok(())
}

async fn show_paths(cli: &Cli, store: &SettingsStore) -> Result<()> {
    let config_dir = default_config_dir();
    let database = store
        .get()
        .await
        .resolve_database_path(cli.db.as_deref());

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:    {}", config_dir.display());
            println!("Settings file: {}", store.path().display());
            println!("Database:      {}", database.display());
        }
        OutputFormat::Json => {
            let paths = PathsOutput {
                config_dir: config_dir.display().to_string(),
                settings_file: store.path().display().to_string(),
                database: database.display().to_string(),
            };
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn set_zone(zone: &str, store: &SettingsStore) -> Result<()> {
    let zone: BucketZone = zone.parse()?;

    store
        .update(|s| s.engine.analytics.zone = zone)
        .await;
    store.save().await.context("failed to save settings")?;

    info!(zone = %zone, "Bucket zone updated");
    println!("Bucket zone set to: {zone}");

    Ok(())
}

async fn reset_config(store: &SettingsStore) -> Result<()> {
    let path = store.path();

    if tokio::fs::try_exists(path).await? {
        tokio::fs::remove_file(path).await?;
        store.reset().await;
        info!(path = %path.display(), "Settings reset");
        println!("Configuration reset to defaults");
    } else {
        println!("No configuration file to reset");
    }

    Ok(())
}
