use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use padel_booker::booking::{resolve_target, BookingOrchestrator};
use padel_booker::config::Config;
use padel_booker::credentials::provider_from_config;
use padel_booker::models::AttemptResult;
use padel_booker::server::TriggerServer;

#[derive(Parser)]
#[command(
    name = "padel-booker",
    version,
    about = "Automatic padel court reservation for the UPV intranet",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file (environment variables override it)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one booking now and print the result
    Book {
        /// Date to book (YYYY-MM-DD); defaults to today + day offset
        #[arg(short, long)]
        date: Option<String>,

        /// Time range to book (HH:MM-HH:MM)
        #[arg(short, long)]
        schedule: Option<String>,
    },

    /// Serve the HTTP trigger
    Serve {
        /// Bind address, e.g. 0.0.0.0:8080
        #[arg(short, long)]
        bind: Option<std::net::SocketAddr>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
    }

    setup_tracing(&config.logging.format, &config.logging.level, cli.verbose)?;

    match cli.command {
        Commands::Book { date, schedule } => {
            tracing::info!(date = ?date, schedule = ?schedule, "Starting book command");
            let result = book(config, date, schedule).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);

            Ok(if result.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }

        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind_address = bind;
            }
            tracing::info!(bind = %config.server.bind_address, "Starting serve command");

            let credentials = provider_from_config(&config.credentials);
            let server = TriggerServer::new(config, credentials)?;
            server.start().await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("padel_booker=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("padel_booker={level},warn")))
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

async fn book(
    mut config: Config,
    date: Option<String>,
    schedule: Option<String>,
) -> Result<AttemptResult> {
    let schedule = schedule.unwrap_or_else(|| config.booking.schedule.clone());
    let slot = match resolve_target(date.as_deref(), &schedule, config.booking.day_offset) {
        Ok(slot) => slot,
        Err(rejected) => {
            tracing::error!(error = ?rejected.error, "Booking request rejected");
            return Ok(rejected);
        }
    };

    config.booking.schedule = schedule;
    config.validate().context("Invalid configuration")?;

    tracing::info!(
        date = %slot.date_str(),
        weekday = %slot.date.format("%A"),
        schedule = %slot.schedule,
        "Booking target resolved"
    );

    let credentials = provider_from_config(&config.credentials);
    let orchestrator = BookingOrchestrator::from_config(&config, credentials)?;

    Ok(orchestrator.run(slot.date, &config.booking.schedule).await)
}
