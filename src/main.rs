//! CLI entry point for the Lebanese road quality dashboard.
//!
//! Provides subcommands for serving the interactive dashboard, logging a
//! summary of the derived views, and exporting them as CSV.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use roads_dashboard::analyzers::threshold::Threshold;
use roads_dashboard::{
    config::DashboardConfig,
    output::{print_json, print_pretty, write_governorates, write_transport},
    parser::load_dataset,
    server::{AppState, start_server},
    session::{DashboardViews, DatasetCache},
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "roads_dashboard")]
#[command(about = "Road quality and public transport dashboard for Lebanon", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the interactive dashboard over HTTP
    Serve {
        /// CSV URL or local path (defaults to DATASET_URL)
        #[arg(short, long, value_name = "FILE_OR_URL")]
        source: Option<String>,

        /// Port to listen on (defaults to DASHBOARD_PORT or 8501)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Load the dataset once and log both views
    Summary {
        /// CSV URL or local path (defaults to DATASET_URL)
        #[arg(short, long, value_name = "FILE_OR_URL")]
        source: Option<String>,

        /// Minimum transport availability in percent
        #[arg(short, long, default_value_t = Threshold::DEFAULT_PERCENT, value_parser = clap::value_parser!(u8).range(0..=100))]
        min_pct: u8,

        /// Log views as JSON instead of debug output
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write the derived views to CSV files
    Export {
        /// CSV URL or local path (defaults to DATASET_URL)
        #[arg(short, long, value_name = "FILE_OR_URL")]
        source: Option<String>,

        /// Minimum transport availability in percent
        #[arg(short, long, default_value_t = Threshold::DEFAULT_PERCENT, value_parser = clap::value_parser!(u8).range(0..=100))]
        min_pct: u8,

        /// Directory to write the CSV files to
        #[arg(short, long, default_value = "out")]
        output_dir: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let config = DashboardConfig::from_env()?;

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = Path::new(&config.log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&config.log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("roads_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter("RUST_LOG", "info")?);

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(env_filter("RUST_LOG_JSON", "debug")?);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { source, port } => {
            let source = source.unwrap_or_else(|| config.dataset_url.clone());
            let port = port.unwrap_or(config.port);

            let state = AppState::new(DatasetCache::new(source));
            // A session that cannot load its data renders nothing.
            let dataset = state
                .cache()
                .get()
                .await
                .context("dataset unavailable, not starting dashboard")?;
            info!(rows = dataset.len(), source = %dataset.source, "Dataset ready");

            start_server(state, port).await?;
        }
        Commands::Summary {
            source,
            min_pct,
            json,
        } => {
            let source = source.unwrap_or_else(|| config.dataset_url.clone());
            let dataset = load_dataset(&source).await?;
            let views = DashboardViews::compute(&dataset, Threshold::from_percent(min_pct));

            info!(
                rows = dataset.len(),
                governorates = views.governorates.len(),
                threshold = views.threshold.fraction(),
                "Views computed"
            );
            info!(
                bad = views.classification.bad,
                acceptable = views.classification.acceptable,
                good = views.classification.good,
                overlapping = views.classification.overlapping,
                unclassified = views.classification.unclassified,
                "Road condition buckets"
            );

            if json {
                print_json(&views.governorates)?;
                print_json(&views.transport)?;
                print_json(&views.filtered)?;
            } else {
                for row in &views.governorates {
                    info!(
                        area = %row.area_label,
                        towns = row.towns,
                        good = ?row.good,
                        acceptable = ?row.acceptable,
                        bad = ?row.bad,
                        "Governorate"
                    );
                }
                print_pretty(&views.transport);
                print_pretty(&views.filtered);
            }
        }
        Commands::Export {
            source,
            min_pct,
            output_dir,
        } => {
            let source = source.unwrap_or_else(|| config.dataset_url.clone());
            let dataset = load_dataset(&source).await?;
            let views = DashboardViews::compute(&dataset, Threshold::from_percent(min_pct));

            std::fs::create_dir_all(&output_dir)?;
            let dir = Path::new(&output_dir);
            write_governorates(&dir.join("governorates.csv"), &views.governorates)?;
            write_transport(&dir.join("transport.csv"), &views.transport)?;
            write_transport(&dir.join("transport_filtered.csv"), &views.filtered)?;

            info!(output_dir = %output_dir, threshold_pct = min_pct, "Views exported");
        }
    }

    Ok(())
}

/// Builds an [`EnvFilter`] from `var`, adding `default` as a directive.
fn env_filter(var: &str, default: &str) -> Result<EnvFilter> {
    Ok(EnvFilter::from_env(var).add_directive(default.parse()?))
}
