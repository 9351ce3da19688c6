use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use halo_core::{Config, MemoryCityRegistry, Query, Units, WeatherClient};
use inquire::{Password, Select};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "halo", version, about = "Weather from the terminal, powered by Weatherbit")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Location and unit options shared by all lookups.
#[derive(Debug, Args)]
pub struct Location {
    /// City name, e.g. "London".
    pub city: String,

    /// Optional ISO country code to disambiguate the city, e.g. "GB".
    #[arg(long)]
    pub country: Option<String>,

    /// Units override: metric (M), scientific (S) or fahrenheit (I).
    #[arg(long, value_parser = parse_units)]
    pub units: Option<Units>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the Weatherbit API key and default units.
    Configure,

    /// Show current weather.
    Current {
        #[command(flatten)]
        location: Location,
    },

    /// Show the 5-day forecast.
    Forecast {
        #[command(flatten)]
        location: Location,

        /// Print 3-hourly temperatures instead of daily entries.
        #[arg(long)]
        chart: bool,
    },

    /// Show yesterday's weather.
    History {
        #[command(flatten)]
        location: Location,

        /// City timezone, e.g. "Europe/London". Looked up when omitted.
        #[arg(long)]
        tz: Option<String>,

        /// Print hourly temperatures instead of the daily summary.
        #[arg(long)]
        chart: bool,
    },
}

fn parse_units(value: &str) -> Result<Units, String> {
    Units::try_from(value).map_err(|e| e.to_string())
}

impl Location {
    fn query(&self, units: Units) -> anyhow::Result<Query> {
        let mut pairs = vec![("city", self.city.as_str())];
        if let Some(country) = &self.country {
            pairs.push(("country", country.as_str()));
        }
        pairs.push(("units", units.code()));

        Query::from_pairs(&pairs).context("Failed to encode location query")
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Command::Configure => configure(&mut config),
            Command::Current { location } => {
                let (client, registry) = connect(&config)?;
                let units = location.units.unwrap_or(config.units);

                let report = client.current_weather(&location.query(units)?).await?;
                println!("{}", output::current(&report, units));

                tracing::debug!(cities = ?registry.cities(), "cities seen");
                Ok(())
            }
            Command::Forecast { location, chart } => {
                let (client, _) = connect(&config)?;
                let units = location.units.unwrap_or(config.units);
                let query = location.query(units)?;

                if chart {
                    let series = client.forecast_chart(&query).await?;
                    println!("{}", output::chart("3-hourly forecast", &series, units));
                } else {
                    let entries = client.forecast_weather(&query).await?;
                    println!("{}", output::daily("Forecast", &entries, units));
                }
                Ok(())
            }
            Command::History { location, tz, chart } => {
                let (client, _) = connect(&config)?;
                let units = location.units.unwrap_or(config.units);
                let query = location.query(units)?;

                // History windows are anchored to the city's own midnight.
                let tz = match tz {
                    Some(tz) => tz,
                    None => client.current_weather(&query).await?.timezone,
                };

                if chart {
                    let series = client.weather_history_chart(&query, &tz).await?;
                    println!("{}", output::chart("Hourly history", &series, units));
                } else {
                    let entries = client.weather_history(&query, &tz).await?;
                    println!("{}", output::daily("History", &entries, units));
                }
                Ok(())
            }
        }
    }
}

fn connect(config: &Config) -> anyhow::Result<(WeatherClient, Arc<MemoryCityRegistry>)> {
    let registry = Arc::new(MemoryCityRegistry::new());
    let client = WeatherClient::new(config.client_config()?, registry.clone())
        .context("Failed to create HTTP client")?;

    Ok((client, registry))
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    let api_key = Password::new("Weatherbit API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let current = Units::all().iter().position(|u| *u == config.units).unwrap_or(0);
    let units = Select::new("Default units:", Units::all().to_vec())
        .with_starting_cursor(current)
        .prompt()
        .context("Failed to read units")?;

    config.set_api_key(api_key);
    config.units = units;
    config.api_key().context("API key must not be empty")?;
    config.save()?;

    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_query_includes_country_and_units() {
        let location = Location { city: "San José".into(), country: Some("CR".into()), units: None };
        let query = location.query(Units::Fahrenheit).unwrap();

        assert_eq!(query.as_str(), "city=San+Jos%C3%A9&country=CR&units=I");
    }

    #[test]
    fn parses_history_flags() {
        let cli = Cli::try_parse_from([
            "halo", "history", "Tokyo", "--tz", "Asia/Tokyo", "--chart", "--units", "s",
        ])
        .unwrap();

        match cli.command {
            Command::History { location, tz, chart } => {
                assert_eq!(location.city, "Tokyo");
                assert_eq!(location.units, Some(Units::Scientific));
                assert_eq!(tz.as_deref(), Some("Asia/Tokyo"));
                assert!(chart);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_units() {
        let err = Cli::try_parse_from(["halo", "current", "Oslo", "--units", "furlongs"]).unwrap_err();
        assert!(err.to_string().contains("Unknown units"));
    }
}
