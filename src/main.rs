//! CLI entry point for the site API.
//!
//! `serve` runs the JSON backend; the other subcommands run a single tool
//! from the terminal, which is handy for checking upstream data by hand.

use std::sync::Arc;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use site_api::{
    api::{self, AppState},
    config::SiteConfig,
    currents::{AggregateOptions, aggregate_currents},
    fetch::BasicClient,
    infra::noaa::NoaaClient,
    logging,
    output::{append_records, write_json},
    services::TidesApi,
    stations::{load_stations, select_stations},
    tax,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "site_api")]
#[command(about = "Backend for the site's tide, transit, sauna and calculator tools", long_about = None)]
struct Cli {
    /// JSON log file; rotated daily
    #[arg(long, global = true, env = "LOG_FILE_PATH", default_value = logging::DEFAULT_LOG_FILE)]
    log_file: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the JSON API
    Serve {
        /// Address to listen on
        #[arg(short, long, env = "LISTEN_ADDR", default_value = "127.0.0.1:8080")]
        listen: String,

        #[command(flatten)]
        config: SiteConfig,
    },
    /// Aggregate current predictions once and print or save them
    Currents {
        /// Day to fetch, YYYYMMDD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Output file; JSON goes to stdout when omitted, CSV to currents.csv
        #[arg(short, long)]
        output: Option<String>,

        #[command(flatten)]
        config: SiteConfig,
    },
    /// List the stations the currents map fetches
    Stations {
        #[command(flatten)]
        config: SiteConfig,
    },
    /// Compare two incomes filed single against filed jointly
    Tax {
        income_a: f64,
        income_b: f64,

        #[arg(long, default_value_t = tax::DEFAULT_YEAR)]
        year: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let cli = Cli::parse();
    let _log_guard = logging::init(&cli.log_file);

    match cli.command {
        Commands::Serve { listen, config } => {
            let state = Arc::new(AppState::from_config(&config)?);
            api::serve(&listen, state).await?;
        }
        Commands::Currents {
            date,
            format,
            output,
            config,
        } => {
            run_currents(&config, date.as_deref(), format, output).await?;
        }
        Commands::Stations { config } => {
            config.validate()?;
            let stations = load_stations(&config.stations_path)?;
            let selected = select_stations(&stations, &config.station_prefix, config.station_limit);
            info!(
                total = stations.len(),
                selected = selected.len(),
                "Station table summary"
            );
            write_json(None, &selected)?;
        }
        Commands::Tax {
            income_a,
            income_b,
            year,
        } => {
            let comparison = tax::compare(income_a, income_b, year)?;
            write_json(None, &comparison)?;
        }
    }

    Ok(())
}

/// Runs the aggregation outside the server, against the configured NOAA URL.
#[tracing::instrument(skip(config, format, output))]
async fn run_currents(
    config: &SiteConfig,
    date: Option<&str>,
    format: Format,
    output: Option<String>,
) -> Result<()> {
    config.validate()?;

    let date = match date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y%m%d")
            .map_err(|_| anyhow::anyhow!("date must be YYYYMMDD, got '{raw}'"))?,
        None => Utc::now().date_naive(),
    };

    let stations = load_stations(&config.stations_path)?;
    let selected = select_stations(&stations, &config.station_prefix, config.station_limit);
    info!(stations = selected.len(), %date, "Fetching current predictions");

    let api: Arc<dyn TidesApi> = Arc::new(NoaaClient::new(
        BasicClient::new()?,
        config.noaa_base_url.clone(),
        config.noaa_application.clone(),
    ));
    let options = AggregateOptions {
        date,
        interval_minutes: config.interval_minutes,
        concurrency: config.concurrency,
    };
    let results = aggregate_currents(api, &selected, &options).await;

    match format {
        Format::Json => write_json(output.as_deref(), &results)?,
        Format::Csv => {
            let path = output.unwrap_or_else(|| "currents.csv".to_string());
            let rows = append_records(&path, date, &results)?;
            info!(path = %path, rows, "Predictions appended");
        }
    }

    Ok(())
}
