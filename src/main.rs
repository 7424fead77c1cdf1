//! Task Tracker
//!
//! Personal task tracking over a small JSON API backed by SQLite, with a
//! point-in-time insights summary.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use std::sync::Arc;
use task_tracker::cli::{Cli, Command, InsightsArgs, OutputFormat};
use task_tracker::config::{Config, ConfigLoader};
use task_tracker::db::Database;
use task_tracker::insights::format_insights_markdown;
use task_tracker::logging::{LogTarget, init_logging};
use task_tracker::server::{self, AppState};
use task_tracker::types::parse_due_date;
use tracing::{debug, info, warn};

/// Resolve once Ctrl-C is received.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C; shutdown must be forced");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn run_server(config: Config, db: Arc<Database>) -> Result<()> {
    let state = AppState::new(db, config.insights);
    server::serve(
        state,
        config.server.bind_addr(),
        config.server.cors,
        shutdown_signal(),
    )
    .await
}

fn print_insights(config: &Config, db: &Database, args: &InsightsArgs) -> Result<()> {
    let days = config.insights.due_soon_days;
    let today = match args.today.as_deref() {
        Some(s) => parse_due_date(s)?,
        None => Local::now().date_naive(),
    };
    let insights = db.compute_insights_as_of(today, days)?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&insights)?),
        OutputFormat::Markdown => print!("{}", format_insights_markdown(&insights)),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&LogTarget::parse(&cli.log), cli.verbose)?;

    let loader = match cli.config {
        Some(ref path) => ConfigLoader::load_file(path)?,
        None => ConfigLoader::load()?,
    };
    for source in loader.sources() {
        debug!(path = %source.display(), "Using config file");
    }
    let mut config = loader.into_config();
    cli.apply_overrides(&mut config);

    let db = Database::open(&config.server.db_path).with_context(|| {
        format!(
            "failed to open task database at {}",
            config.server.db_path.display()
        )
    })?;
    info!(path = %config.server.db_path.display(), "Task database ready");

    match cli.command {
        Some(Command::Insights(ref args)) => print_insights(&config, &db, args),
        Some(Command::Serve) | None => run_server(config, Arc::new(db)).await,
    }
}
