use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::Local;
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use subway_timing::config::{ConfigError, SensorConfig, SensorSpec};
use subway_timing::domain::{DirectionLabel, Route, StationName};
use subway_timing::refresh::{
    BoardState, DEFAULT_FIXED_INTERVAL_SECS, FixedInterval, RefreshLoop, UpdateMode, run_refresh,
};
use subway_timing::timetable::{DEFAULT_CONFIG_PATH, LoadError, Schedule, TimetableSource};

/// Subway departure countdowns from a plain-text timetable.
#[derive(Parser, Debug)]
#[command(name = "subway-timing", version, about, long_about = None)]
struct Cli {
    /// Base configuration directory; relative timetable paths are resolved against it
    #[arg(long, env = "SUBWAY_TIMING_CONFIG_DIR", default_value = ".")]
    config_dir: PathBuf,

    /// Timetable document
    #[arg(long, env = "SUBWAY_TIMING_FILE", default_value = DEFAULT_CONFIG_PATH)]
    file: PathBuf,

    /// Only track this station (needs --direction)
    #[arg(long, env = "SUBWAY_TIMING_STATION")]
    station: Option<String>,

    /// Only track this direction (needs --station)
    #[arg(long, env = "SUBWAY_TIMING_DIRECTION")]
    direction: Option<String>,

    /// Sensor name prefix
    #[arg(long, env = "SUBWAY_TIMING_NAME", default_value = subway_timing::config::DEFAULT_NAME)]
    name: String,

    /// `dynamic` or `fixed`
    #[arg(long, env = "SUBWAY_TIMING_UPDATE_MODE", default_value = "dynamic")]
    update_mode: UpdateMode,

    /// Seconds between refreshes in fixed mode (10-600)
    #[arg(long, env = "SUBWAY_TIMING_UPDATE_INTERVAL", default_value_t = DEFAULT_FIXED_INTERVAL_SECS)]
    update_interval: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List stations and their directions
    List,
    /// Print the current board for each sensor as JSON
    Board,
    /// Keep every sensor up to date until Ctrl-C
    Watch,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to encode board: {0}")]
    Encode(#[from] serde_json::Error),
}

impl Cli {
    fn sensor_config(&self) -> Result<SensorConfig, ConfigError> {
        let interval = FixedInterval::new(self.update_interval)?;
        Ok(SensorConfig::new(
            self.name.clone(),
            self.file.clone(),
            self.station.as_deref().map(StationName::new),
            self.direction.as_deref().map(DirectionLabel::new),
            self.update_mode.with_interval(interval),
        ))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("subway_timing=info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "subway-timing failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.sensor_config()?;
    let source = TimetableSource::new(&cli.config_dir);
    let schedule = source
        .load(&config.config_path)
        .inspect_err(|e| error!(reason = e.reason(), "cannot use timetable"))?;
    let schedule = Arc::new(schedule);

    match cli.command {
        Commands::List => {
            list(&schedule);
            Ok(())
        }
        Commands::Board => board(&schedule, &config),
        Commands::Watch => watch(schedule, &config).await,
    }
}

fn list(schedule: &Schedule) {
    for station in schedule.stations() {
        println!("{}", station.name());
        for direction in station.directions() {
            println!("  {}", direction.label());
        }
    }
}

fn board(schedule: &Arc<Schedule>, config: &SensorConfig) -> Result<(), CliError> {
    let sensors = config.select_routes(schedule)?;
    let now = Local::now().fixed_offset();

    let mut boards = Vec::with_capacity(sensors.len());
    for sensor in &sensors {
        let refresh: RefreshLoop<()> =
            RefreshLoop::new(Arc::clone(schedule), sensor.route.clone(), config.update);
        boards.push(sensor_json(sensor, &refresh.snapshot(now))?);
    }

    println!("{}", serde_json::to_string_pretty(&boards)?);
    Ok(())
}

async fn watch(schedule: Arc<Schedule>, config: &SensorConfig) -> Result<(), CliError> {
    let routes: Vec<Route> = config
        .select_routes(&schedule)?
        .into_iter()
        .map(|sensor| sensor.route)
        .collect();

    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Ctrl-C received; shutting down"),
            Err(e) => error!(error = %e, "cannot listen for Ctrl-C; shutting down"),
        }
    };

    run_refresh(
        schedule,
        routes,
        config.update,
        |route: &Route, board: &BoardState| {
            info!(
                sensor = %route.unique_id(),
                state = %board.state,
                friendly = %board.attributes.friendly_wait_time,
                "published"
            );
        },
        shutdown,
    )
    .await;
    Ok(())
}

fn sensor_json(sensor: &SensorSpec, board: &BoardState) -> Result<Value, serde_json::Error> {
    Ok(json!({
        "unique_id": sensor.unique_id,
        "name": sensor.name,
        "state": board.state,
        "attributes": board.attribute_map()?,
    }))
}
