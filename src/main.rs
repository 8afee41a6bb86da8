//! CLI entry point for the survey reporting service.
//!
//! `serve` runs the HTTP handlers; `stats` and `report` run the same
//! pipelines once from the command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use survey_reports::{
    config::Config,
    handlers::{AppState, REPORT_PATH, STATS_PATH, router},
    output::print_json,
    report::send_survey_report,
    stats::collect_stats,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "survey_reports")]
#[command(about = "Survey CSV reports by email and aggregate survey statistics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the report and stats endpoints over HTTP
    Serve {
        /// Address to listen on
        #[arg(short, long, default_value = "0.0.0.0:3000")]
        bind: String,
    },
    /// Compute survey statistics once and print them as JSON
    Stats,
    /// Email the full survey table as CSV to one recipient
    Report {
        /// Recipient address
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/survey_reports.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("survey_reports.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let state = AppState::from_config(&config)?;

    match cli.command {
        Commands::Serve { bind } => {
            let listener = TcpListener::bind(&bind)
                .await
                .with_context(|| format!("failed to bind {bind}"))?;

            info!(
                addr = %listener.local_addr()?,
                report = REPORT_PATH,
                stats = STATS_PATH,
                mail_configured = state.mail.is_some(),
                "Listening"
            );
            axum::serve(listener, router(state)).await?;
        }
        Commands::Stats => {
            let stats = collect_stats(state.store.as_ref()).await?;
            print_json(&stats)?;
        }
        Commands::Report { email } => {
            let outcome =
                send_survey_report(state.store.as_ref(), state.mail.as_ref(), &email).await?;
            info!(?outcome, "{}", outcome.message());
        }
    }

    Ok(())
}
