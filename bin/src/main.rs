//! valet CLI - query the Bank of Canada Valet time-series API.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use valet_lib::prelude::*;

mod commands;
mod display;

#[derive(Parser)]
#[command(name = "valet")]
#[command(about = "Query Bank of Canada Valet series, groups and observations", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// API root URL
    #[arg(long, global = true, default_value = valet_lib::url::BASE_URL)]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value = "10")]
    timeout: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// List available series
    ListSeries {
        /// Only show series whose name or label contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// List available groups
    ListGroups {
        /// Only show groups whose name or label contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show series details
    Series {
        /// Series name (e.g., FXUSDCAD)
        name: String,
    },

    /// Show group details and member series
    Group {
        /// Group name (e.g., FX_RATES_DAILY)
        name: String,
    },

    /// Fetch observations
    Observations {
        /// Comma-separated series names, or a group name with --group
        target: String,

        /// Treat the target as a group name
        #[arg(short, long)]
        group: bool,

        /// Start date (YYYY-MM-DD). Requires --end.
        #[arg(short, long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Requires --start.
        #[arg(short, long)]
        end: Option<String>,

        /// N most recent observations
        #[arg(long)]
        recent: Option<u32>,

        /// Observations from the N most recent weeks
        #[arg(long)]
        recent_weeks: Option<u32>,

        /// Observations from the N most recent months
        #[arg(long)]
        recent_months: Option<u32>,

        /// Observations from the N most recent years
        #[arg(long)]
        recent_years: Option<u32>,

        /// Sort direction (asc or desc)
        #[arg(short, long)]
        order: Option<String>,
    },
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins, then `LOG_LEVEL` (DEBUG, INFO, WARN, ERROR), then `-v`.
/// Without any of them the level is `info`.
fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = std::env::var("LOG_LEVEL")
            .ok()
            .and_then(|level| display::log_level(&level))
            .unwrap_or_else(|| display::verbosity_level(verbose));
        EnvFilter::new(level)
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    init_tracing(cli.verbose);

    let config = ClientConfig::default()
        .with_base_url(cli.base_url)
        .with_timeout(Duration::from_secs(cli.timeout));
    tracing::debug!(base_url = %config.base_url, timeout = ?config.timeout, "client configured");
    let client = ValetClient::new(config).context("Failed to create HTTP client")?;

    match command {
        Commands::ListSeries { search } => {
            commands::list::list_series(&client, search.as_deref()).await
        }
        Commands::ListGroups { search } => {
            commands::list::list_groups(&client, search.as_deref()).await
        }
        Commands::Series { name } => commands::info::show_series(&client, &name).await,
        Commands::Group { name } => commands::info::show_group(&client, &name).await,
        Commands::Observations {
            target,
            group,
            start,
            end,
            recent,
            recent_weeks,
            recent_months,
            recent_years,
            order,
        } => {
            let options = ObservationOptions {
                start_date: start,
                end_date: end,
                recent: recent.unwrap_or_default(),
                recent_weeks: recent_weeks.unwrap_or_default(),
                recent_months: recent_months.unwrap_or_default(),
                recent_years: recent_years.unwrap_or_default(),
                order_dir: order,
            };
            commands::observations::show_observations(&client, &target, group, &options).await
        }
    }
}
