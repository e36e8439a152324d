use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};
use weather_core::{
    Config, FileStore, Location, Notice, PreferenceStore, RunMode, TemperatureUnit, TimeFormat,
    WeatherApiProvider, WeatherCoordinator, WeatherError,
    location::{IpLocationProvider, LocationProvider, UnsupportedLocationProvider},
    provider::coordinate_query,
    recovery::policy_for,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the API key and run mode interactively.
    Configure,

    /// Show weather for the current position.
    Here,

    /// Show weather for a city.
    City {
        /// City name; the provider resolves ambiguous names.
        name: String,
    },

    /// Show weather for explicit coordinates.
    #[command(allow_negative_numbers = true)]
    At { lat: f64, lon: f64 },

    /// Search for locations matching a partial name.
    Search { query: String },

    /// Manage saved locations.
    Saved {
        #[command(subcommand)]
        action: SavedCommand,
    },

    /// Show or change display preferences.
    Prefs {
        #[command(subcommand)]
        action: PrefsCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum SavedCommand {
    /// List saved locations in display order.
    List,
    /// Resolve a city and save it.
    Add { city: String },
    /// Remove every saved location with this name.
    Remove { name: String },
    /// Show weather for a saved location.
    Show { name: String },
}

#[derive(Debug, Subcommand)]
pub enum PrefsCommand {
    Show,
    /// Set the unit system: celsius or fahrenheit.
    Unit { unit: TemperatureUnit },
    /// Set the clock format: 12h or 24h.
    Time { format: TimeFormat },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            command => {
                let mut config = Config::load()?;
                config.apply_env()?;

                let coordinator = build_coordinator(&config)?;
                let notices = coordinator.notices();

                let outcome = dispatch(&coordinator, command).await;
                print_notices(notices);
                outcome
            }
        }
    }
}

fn build_coordinator(config: &Config) -> Result<WeatherCoordinator> {
    if !config.has_api_key() {
        warn!("no API key configured; the provider will reject requests");
    }

    let provider =
        WeatherApiProvider::with_base_url(config.api_key_or_empty().to_string(), config.base_url());

    let store = match &config.preferences_path {
        Some(path) => FileStore::new(path),
        None => FileStore::open_default()?,
    };
    debug!(path = %store.path().display(), "using preference storage");

    let locator: Arc<dyn LocationProvider> = match IpLocationProvider::new() {
        Ok(locator) => Arc::new(locator),
        Err(err) => {
            warn!(error = %err, "position lookup unavailable");
            Arc::new(UnsupportedLocationProvider)
        }
    };

    Ok(WeatherCoordinator::new(
        Arc::new(provider),
        locator,
        PreferenceStore::open(Box::new(store)),
        policy_for(config.mode),
    ))
}

async fn dispatch(coordinator: &WeatherCoordinator, command: Command) -> Result<()> {
    match command {
        Command::Configure => configure(),
        Command::Here => {
            coordinator.start().await;
            show(coordinator)
        }
        Command::City { name } => {
            coordinator.fetch_for_city(&name).await;
            show(coordinator)
        }
        Command::At { lat, lon } => {
            coordinator.fetch_for_location(location_at(lat, lon)).await;
            show(coordinator)
        }
        Command::Search { query } => {
            let results = coordinator
                .search_locations(&query)
                .await
                .with_context(|| format!("Failed to search locations for '{query}'"))?;
            render::search_results(&results);
            Ok(())
        }
        Command::Saved { action } => saved(coordinator, action).await,
        Command::Prefs { action } => {
            match action {
                PrefsCommand::Show => {}
                PrefsCommand::Unit { unit } => coordinator.set_temperature_unit(unit),
                PrefsCommand::Time { format } => coordinator.set_time_format(format),
            }
            render::preferences(&coordinator.preferences());
            Ok(())
        }
    }
}

async fn saved(coordinator: &WeatherCoordinator, action: SavedCommand) -> Result<()> {
    match action {
        SavedCommand::List => {
            render::saved_locations(&coordinator.saved_locations());
            Ok(())
        }
        SavedCommand::Add { city } => {
            coordinator.fetch_for_city(&city).await;

            let state = coordinator.state();
            let location = match (state.error, state.current_location) {
                (None, Some(location)) => location,
                (Some(kind), _) => bail!("Could not resolve '{city}': {}", kind.user_message()),
                (None, None) => bail!("Could not resolve '{city}'"),
            };

            match coordinator.add_saved_location(location) {
                // Already reported through a notice.
                Ok(()) | Err(WeatherError::DuplicateLocation { .. }) => Ok(()),
                Err(err) => Err(err.into()),
            }
        }
        SavedCommand::Remove { name } => {
            if coordinator.remove_saved_location(&name) == 0 {
                println!("No saved location named {name}");
            }
            Ok(())
        }
        SavedCommand::Show { name } => {
            let location = coordinator
                .preferences()
                .find_location(&name)
                .cloned()
                .ok_or_else(|| anyhow!("No saved location named '{name}'"))?;

            coordinator.fetch_for_location(location).await;
            show(coordinator)
        }
    }
}

/// Unnamed location; the provider resolves the place name.
fn location_at(lat: f64, lon: f64) -> Location {
    Location::new(coordinate_query(lat, lon), "", lat, lon)
}

fn show(coordinator: &WeatherCoordinator) -> Result<()> {
    let state = coordinator.state();
    let prefs = coordinator.preferences();

    match (&state.payload, state.error) {
        (Some(payload), error) => {
            if let Some(kind) = error {
                eprintln!("{} Showing demo data.", kind.user_message());
            }
            render::dashboard(payload, &prefs);
            Ok(())
        }
        (None, Some(kind)) => Err(anyhow!(kind.user_message())),
        (None, None) => Err(anyhow!("No weather data available")),
    }
}

fn print_notices(mut notices: broadcast::Receiver<Notice>) {
    while let Ok(notice) = notices.try_recv() {
        render::notice(&notice);
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("WeatherAPI.com API key:")
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()
        .context("Failed to read API key")?;

    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    let modes = RunMode::all().to_vec();
    let current = modes.iter().position(|m| *m == config.mode).unwrap_or_default();
    config.mode = inquire::Select::new("Run mode:", modes)
        .with_starting_cursor(current)
        .with_help_message("development shows demo data when requests fail")
        .prompt()
        .context("Failed to read run mode")?;

    config.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());

    Ok(())
}
