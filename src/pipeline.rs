//! The monitoring run: fetch → scan → report → (optionally) email.
//!
//! Jurisdictions are visited one at a time in configured order. A page that
//! fails to load contributes nothing and the run carries on. Once every
//! source has been visited, a non-empty set of mentions is rendered, written
//! to the dated report file and, if a mailer is supplied, emailed. An empty
//! set writes nothing and sends nothing.

use crate::config::Monitor;
use crate::fetch::{fetch_page_text, FetchPage};
use crate::models::{Mention, Report};
use crate::outputs::email::SendReport;
use crate::outputs::report::{render, write_report};
use crate::scanner::scan_page;
use crate::utils::truncate_for_log;
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use std::error::Error;
use std::path::PathBuf;
use tracing::{debug, info, instrument};

/// What a single run did.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Jurisdictions visited.
    pub sources: usize,
    /// Jurisdictions whose page came back with text.
    pub fetched: usize,
    pub mentions: usize,
    /// The rendered report; `None` when nothing matched.
    pub report: Option<String>,
    pub report_path: Option<PathBuf>,
    pub emailed: bool,
}

/// Run the full pipeline once against `monitor`.
///
/// # Errors
///
/// Fetch failures are never returned. Failing to write the report file is,
/// as is a failed email send; the report file is always written before the
/// email is attempted.
#[instrument(level = "info", skip_all, fields(sources = monitor.jurisdictions.len(), %date))]
pub async fn run<F, M>(
    monitor: &Monitor,
    fetcher: &F,
    mailer: Option<&M>,
    date: NaiveDate,
) -> Result<RunSummary, Box<dyn Error>>
where
    F: FetchPage,
    M: SendReport,
{
    let per_source: Vec<Option<Vec<Mention>>> = stream::iter(&monitor.jurisdictions)
        .then(|jurisdiction| async move {
            let text = fetch_page_text(fetcher, &jurisdiction.url).await;
            if text.is_empty() {
                return None;
            }
            let mentions = scan_page(jurisdiction, &text, &monitor.patterns);
            if !mentions.is_empty() {
                info!(
                    jurisdiction = %jurisdiction.name,
                    count = mentions.len(),
                    "Found mentions"
                );
            }
            Some(mentions)
        })
        .collect()
        .await;

    let mut summary = RunSummary {
        sources: per_source.len(),
        fetched: per_source.iter().filter(|m| m.is_some()).count(),
        ..RunSummary::default()
    };

    let mentions: Vec<Mention> = per_source.into_iter().flatten().flatten().collect();
    for m in &mentions {
        debug!(
            jurisdiction = %m.jurisdiction,
            pattern = %m.pattern,
            snippet = %truncate_for_log(&m.snippet, 60),
            "Mention"
        );
    }
    summary.mentions = mentions.len();

    let report = Report::new(date, mentions);
    if report.is_empty() {
        info!(
            sources = summary.sources,
            fetched = summary.fetched,
            "No mentions found; nothing written"
        );
        return Ok(summary);
    }

    let body = render(&report);
    let path = write_report(
        &monitor.results_dir,
        &monitor.report_prefix,
        report.date,
        &body,
    )
    .await?;
    summary.report_path = Some(path);

    if let Some(mailer) = mailer {
        mailer.send_report(&body).await?;
        summary.emailed = true;
    }

    info!(
        sources = summary.sources,
        fetched = summary.fetched,
        mentions = summary.mentions,
        emailed = summary.emailed,
        "Run complete"
    );
    summary.report = Some(body);
    Ok(summary)
}
