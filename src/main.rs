//! # Agenda Watch
//!
//! Checks a fixed list of local-government meeting pages for mentions of a
//! topic (by default, Northern Virginia Community College), writes any hits
//! to a dated report and optionally emails it.
//!
//! ## Usage
//!
//! ```sh
//! agenda_watch
//! agenda_watch -c watch.yaml --send-email
//! ```
//!
//! Each invocation performs exactly one pass; cadence belongs to whatever
//! scheduler (cron, CI workflow) launches it.
//!
//! ## Architecture
//!
//! 1. **Configuration**: load and compile patterns, sources and mail settings
//! 2. **Fetching**: one GET per jurisdiction, failures logged and skipped
//! 3. **Scanning**: regex matches with 50 characters of context either side
//! 4. **Output**: text report under `results/`, then the optional email

use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod fetch;
mod models;
mod outputs;
mod pipeline;
mod scanner;
mod utils;

use cli::Cli;
use config::Config;
use fetch::HttpFetcher;
use outputs::email::SmtpMailer;
use utils::run_date;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("agenda_watch starting up");

    let args = Cli::parse();
    debug!(?args.config, ?args.results_dir, send_email = args.send_email, "Parsed CLI arguments");

    // ---- Configuration (fail fast) ----
    let mut config = match &args.config {
        Some(path) => Config::load(Path::new(path))?,
        None => Config::default(),
    };
    args.apply(&mut config);

    let monitor = match config.compile() {
        Ok(monitor) => monitor,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };
    info!(
        patterns = monitor.patterns.len(),
        jurisdictions = monitor.jurisdictions.len(),
        email = monitor.email.is_some(),
        "Configuration ready"
    );

    let fetcher = HttpFetcher::new(monitor.fetch_timeout)?;
    let mailer = monitor.email.as_ref().map(SmtpMailer::new).transpose()?;

    // ---- Run ----
    let summary = pipeline::run(&monitor, &fetcher, mailer.as_ref(), run_date()).await?;

    match &summary.report {
        Some(report) => println!("Mentions found:\n {report}"),
        None => println!("No NVCC mentions found this week."),
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        sources = summary.sources,
        fetched = summary.fetched,
        mentions = summary.mentions,
        report = ?summary.report_path,
        "Execution complete"
    );

    Ok(())
}
