//! Command-line interface definitions for Agenda Watch.
//!
//! Every flag is optional: a bare `agenda_watch` runs one full pass with the
//! built-in configuration. Mail credentials are normally supplied through
//! environment variables so they stay out of config files and shell history.

use crate::config::Config;
use clap::Parser;

/// Command-line arguments for a single monitoring run.
///
/// # Examples
///
/// ```sh
/// # Built-in sources and keywords, report under ./results
/// agenda_watch
///
/// # Custom config, emailing the report
/// EMAIL_USER=me@example.org EMAIL_PASS=secret TO_EMAIL=team@example.org \
///     agenda_watch -c watch.yaml --send-email
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to a YAML config file (defaults are used when omitted)
    #[arg(short, long, env = "AGENDA_WATCH_CONFIG")]
    pub config: Option<String>,

    /// Directory the dated report is written to
    #[arg(short, long)]
    pub results_dir: Option<String>,

    /// Email the report when mentions are found
    #[arg(long)]
    pub send_email: bool,

    /// SMTP username (also the sender unless the config sets `from`)
    #[arg(long, env = "EMAIL_USER", hide_env_values = true)]
    pub smtp_username: Option<String>,

    /// SMTP password or app password
    #[arg(long, env = "EMAIL_PASS", hide_env_values = true)]
    pub smtp_password: Option<String>,

    /// Recipient of the alert email
    #[arg(long, env = "TO_EMAIL")]
    pub email_to: Option<String>,
}

impl Cli {
    /// Layer command-line and environment overrides on top of `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.results_dir {
            config.results_dir = dir.clone();
        }
        if self.send_email {
            config.email.enabled = true;
        }
        if let Some(user) = &self.smtp_username {
            config.email.username = user.clone();
        }
        if let Some(pass) = &self.smtp_password {
            config.email.password = pass.clone();
        }
        if let Some(to) = &self.email_to {
            config.email.to = to.clone();
        }
    }
}
