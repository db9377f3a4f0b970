//! `applog` command-line tool.
//!
//! Writes records through the same `LogManager` an application would use,
//! which makes it handy for shell scripts and for checking a configuration:
//!
//! ```text
//! applog --config applog.toml emit "Backup finished" --field files=1200
//! applog --app-name cron --plain emit -s warning "Disk almost full"
//! applog show-config
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use applog::{load_config, Fields, Level, LogConfig, LogManager};

#[derive(Parser)]
#[command(name = "applog")]
#[command(about = "Write structured log records to a rotating log file", long_about = None)]
struct Cli {
    /// TOML configuration file (environment variables are used otherwise)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the application (logger and file) name
    #[arg(long)]
    app_name: Option<String>,

    /// Override the log directory
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Override the minimum level
    #[arg(long)]
    level: Option<Level>,

    /// Write plain text lines instead of JSON
    #[arg(long)]
    plain: bool,

    /// Do not echo records to stdout
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Emit a single record
    Emit {
        /// Record severity
        #[arg(short, long, default_value = "INFO")]
        severity: Level,

        /// Record message
        message: String,

        /// Structured field as key=value; JSON values are kept typed
        #[arg(short, long = "field", value_parser = parse_field)]
        fields: Vec<(String, Value)>,
    },
    /// Print the effective configuration as TOML
    ShowConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "applog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    match cli.command {
        Commands::Emit {
            severity,
            message,
            fields,
        } => {
            let manager = LogManager::new(config)?;
            let fields: Fields = fields.into_iter().collect();
            manager.get_logger().log(severity, message, fields)?;
        }
        Commands::ShowConfig => {
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<LogConfig, applog::ConfigurationError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => LogConfig::from_env()?,
    };

    if let Some(name) = &cli.app_name {
        config.app_name = name.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = dir.clone();
    }
    if let Some(level) = cli.level {
        config.log_level = level;
    }
    if cli.plain {
        config.json_output = false;
    }
    if cli.quiet {
        config.terminal_output = false;
    }

    tracing::debug!(app_name = %config.app_name, log_dir = %config.log_dir.display(), "Configuration resolved");
    Ok(config)
}

fn parse_field(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", raw));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::from(value));
    Ok((key.to_string(), value))
}
