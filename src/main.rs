use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::DateTime;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use iso_duration::config::{AppConfig, ScalarStyle};
use iso_duration::{add_to_timestamp, parse_calendar, parse_scalar, ScalarInterval};

#[derive(Parser)]
#[command(name = "isodur")]
#[command(about = "Parse, format and apply ISO 8601 durations")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter (a level or RUST_LOG-style directives); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a duration and print its canonical form
    Parse {
        /// ISO 8601 duration, e.g. "P1DT2H"
        #[arg(allow_hyphen_values = true)]
        text: String,

        /// Keep calendar units instead of converting to nanoseconds
        #[arg(long)]
        calendar: bool,
    },

    /// Format a signed nanosecond count
    Format {
        /// Nanoseconds
        #[arg(allow_hyphen_values = true)]
        nanos: i64,

        /// Output style (default: from config)
        #[arg(long, value_enum)]
        style: Option<ScalarStyle>,
    },

    /// Add a duration to an RFC 3339 timestamp
    Add {
        /// ISO 8601 duration, e.g. "-P1M2D"
        #[arg(allow_hyphen_values = true)]
        duration: String,

        /// Timestamp, e.g. "2003-03-03T15:15:15Z"
        timestamp: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(log_level) = &cli.log_level {
        config = config
            .with_log_level(log_level)
            .context("Invalid --log-level")?;
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::debug!("Starting isodur v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Parse { text, calendar } => {
            if calendar {
                let value = parse_calendar(&text)
                    .with_context(|| format!("Invalid calendar duration: {text}"))?;
                if config.reject_negative && !value.is_positive() {
                    bail!("Negative durations are disabled by configuration");
                }
                println!("{value}");
            } else {
                let value = parse_scalar(&text)
                    .with_context(|| format!("Invalid duration: {text}"))?;
                if config.reject_negative && value.is_negative() {
                    bail!("Negative durations are disabled by configuration");
                }
                println!("{}\t{}", config.scalar_style.render(value), value.as_nanos());
            }
        }

        Commands::Format { nanos, style } => {
            let value = ScalarInterval::from_nanos(nanos);
            println!("{}", style.unwrap_or(config.scalar_style).render(value));
        }

        Commands::Add {
            duration,
            timestamp,
        } => {
            let value = parse_calendar(&duration)
                .with_context(|| format!("Invalid calendar duration: {duration}"))?;
            if config.reject_negative && !value.is_positive() {
                bail!("Negative durations are disabled by configuration");
            }
            let base = DateTime::parse_from_rfc3339(&timestamp)
                .with_context(|| format!("Invalid RFC 3339 timestamp: {timestamp}"))?;

            let result = add_to_timestamp(value, base)
                .with_context(|| format!("Cannot add {value} to {timestamp}"))?;
            println!("{}", result.to_rfc3339());
        }
    }

    Ok(())
}
