//! Plain-text report rendering and persistence.
//!
//! Each mention renders as one block:
//!
//! ```text
//! Fairfax County: https://www.fairfaxcounty.gov/boardofsupervisors/meetings
//! Match: nvcc
//! Snippet: ...the board approved the nvcc lease for the annandale campus...
//! ```
//!
//! Blocks are separated by a blank line. The same text is printed, written
//! to disk and used as the email body.

use crate::models::{Mention, Report};
use chrono::NaiveDate;
use itertools::Itertools;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Render one mention as a report block (trailing newline included).
pub fn render_mention(m: &Mention) -> String {
    format!(
        "{}: {}\nMatch: {}\nSnippet: ...{}...\n",
        m.jurisdiction, m.url, m.pattern, m.snippet
    )
}

/// Render every mention, in order, separated by blank lines.
pub fn render(report: &Report) -> String {
    report.mentions.iter().map(render_mention).join("\n\n")
}

/// `<dir>/<prefix>_<YYYYMMDD>.txt`
pub fn report_path(dir: &Path, prefix: &str, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}_{}.txt", prefix, date.format("%Y%m%d")))
}

/// Write the rendered report, creating `dir` if needed and overwriting any
/// report already written for the same date.
///
/// # Returns
///
/// The path written to.
#[instrument(level = "info", skip_all, fields(dir = %dir.display(), %date))]
pub async fn write_report(
    dir: &Path,
    prefix: &str,
    date: NaiveDate,
    body: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(dir).await {
        error!(error = %e, "Failed to create results dir");
        return Err(e.into());
    }

    let path = report_path(dir, prefix, date);
    fs::write(&path, body).await?;
    info!(path = %path.display(), bytes = body.len(), "Wrote report");
    Ok(path)
}
