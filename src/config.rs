//! Run configuration: what to watch, where to write, whom to tell.
//!
//! A [`Config`] is the plain, serde-friendly form read from YAML (or taken
//! from [`Config::default`]). [`Config::compile`] validates it once at
//! startup and produces a [`Monitor`], the immutable value the pipeline runs
//! against. Bad regex syntax, bad URLs and incomplete email settings are all
//! reported here, before any page is fetched.
//!
//! # Example `config.yaml`
//!
//! ```yaml
//! keywords:
//!   - nvcc
//!   - "nova (college|education|community)"
//! jurisdictions:
//!   - name: Fairfax County
//!     url: https://www.fairfaxcounty.gov/boardofsupervisors/meetings
//! results_dir: results
//! email:
//!   enabled: true
//!   to: alerts@example.org
//! ```

use crate::models::{Jurisdiction, KeywordPattern};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument};
use url::Url;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("no keyword patterns configured")]
    NoKeywords,

    #[error("no jurisdictions configured")]
    NoJurisdictions,

    #[error("invalid keyword pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("invalid URL for {name}: {url:?}: {source}")]
    InvalidUrl {
        name: String,
        url: String,
        source: url::ParseError,
    },

    #[error("URL for {name} must be http or https, got {url:?}")]
    UnsupportedScheme { name: String, url: String },

    #[error("email is enabled but `{0}` is not set")]
    MissingEmailSetting(&'static str),
}

/// A jurisdiction as written in the config file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct JurisdictionConfig {
    pub name: String,
    pub url: String,
}

/// Outbound mail settings. Credentials are usually supplied through the
/// environment (see [`crate::cli::Cli`]) rather than the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub enabled: bool,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    /// Sender address; falls back to `username` when unset.
    pub from: Option<String>,
    pub to: String,
    pub subject: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_server: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            username: String::new(),
            password: String::new(),
            from: None,
            to: String::new(),
            subject: "NVCC Mention Alert".to_string(),
        }
    }
}

/// The full run configuration as loaded from disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ordered keyword patterns; report order follows this order.
    pub keywords: Vec<String>,
    /// Ordered list of pages to watch.
    pub jurisdictions: Vec<JurisdictionConfig>,
    pub fetch_timeout_secs: u64,
    pub results_dir: String,
    /// Filename prefix, giving `<results_dir>/<prefix>_<YYYYMMDD>.txt`.
    pub report_prefix: String,
    pub email: EmailConfig,
}

const DEFAULT_KEYWORDS: &[&str] = &[
    r"nvcc",
    r"nova community college",
    r"northern virginia community college",
    r"northern va community college",
    r"nova (college|education|community)",
];

const DEFAULT_JURISDICTIONS: &[(&str, &str)] = &[
    (
        "Fairfax County",
        "https://www.fairfaxcounty.gov/boardofsupervisors/meetings",
    ),
    ("Loudoun County", "https://lfportal.loudoun.gov/LFPortalOnline/"),
    (
        "Prince William County",
        "https://www.pwcva.gov/department/board-county-supervisors",
    ),
    (
        "Arlington County",
        "https://www.arlingtonva.us/Government/County-Board/Meetings",
    ),
    ("City of Alexandria", "https://www.alexandriava.gov/CityCouncil"),
    (
        "City of Manassas",
        "https://www.manassasva.gov/council/meeting_agendas.php",
    ),
    (
        "City of Falls Church",
        "https://www.fallschurchva.gov/Agendas-Minutes",
    ),
    (
        "City of Manassas Park",
        "https://www.manassasparkva.gov/government/agenda_center.php",
    ),
];

impl Default for Config {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            jurisdictions: DEFAULT_JURISDICTIONS
                .iter()
                .map(|(name, url)| JurisdictionConfig {
                    name: name.to_string(),
                    url: url.to_string(),
                })
                .collect(),
            fetch_timeout_secs: 20,
            results_dir: "results".to_string(),
            report_prefix: "nvcc_hits".to_string(),
            email: EmailConfig::default(),
        }
    }
}

impl Config {
    /// Load a YAML config file. Fields missing from the file keep their
    /// defaults.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            keywords = config.keywords.len(),
            jurisdictions = config.jurisdictions.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Validate everything and build the immutable [`Monitor`].
    pub fn compile(&self) -> Result<Monitor, ConfigError> {
        if self.keywords.is_empty() {
            return Err(ConfigError::NoKeywords);
        }
        if self.jurisdictions.is_empty() {
            return Err(ConfigError::NoJurisdictions);
        }

        let patterns = self
            .keywords
            .iter()
            .map(|k| {
                KeywordPattern::new(k).map_err(|source| ConfigError::InvalidPattern {
                    pattern: k.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let jurisdictions = self
            .jurisdictions
            .iter()
            .map(validate_jurisdiction)
            .collect::<Result<Vec<_>, _>>()?;

        let email = if self.email.enabled {
            Some(EmailSettings::from_config(&self.email)?)
        } else {
            None
        };

        debug!(
            patterns = patterns.len(),
            jurisdictions = jurisdictions.len(),
            email = email.is_some(),
            "Compiled configuration"
        );

        Ok(Monitor {
            patterns,
            jurisdictions,
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
            results_dir: PathBuf::from(&self.results_dir),
            report_prefix: self.report_prefix.clone(),
            email,
        })
    }
}

fn validate_jurisdiction(j: &JurisdictionConfig) -> Result<Jurisdiction, ConfigError> {
    let url = Url::parse(&j.url).map_err(|source| ConfigError::InvalidUrl {
        name: j.name.clone(),
        url: j.url.clone(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme {
            name: j.name.clone(),
            url: j.url.clone(),
        });
    }
    Ok(Jurisdiction {
        name: j.name.clone(),
        url,
    })
}

/// Validated mail settings; only present when email is enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailSettings {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub to: String,
    pub subject: String,
}

impl EmailSettings {
    fn from_config(c: &EmailConfig) -> Result<Self, ConfigError> {
        let required = [
            ("smtp_server", &c.smtp_server),
            ("username", &c.username),
            ("password", &c.password),
            ("to", &c.to),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(ConfigError::MissingEmailSetting(*field));
        }
        Ok(Self {
            smtp_server: c.smtp_server.clone(),
            smtp_port: c.smtp_port,
            username: c.username.clone(),
            password: c.password.clone(),
            from: c.from.clone().unwrap_or_else(|| c.username.clone()),
            to: c.to.clone(),
            subject: c.subject.clone(),
        })
    }
}

/// The compiled, immutable configuration a run executes against.
#[derive(Debug, Clone)]
pub struct Monitor {
    pub patterns: Vec<KeywordPattern>,
    pub jurisdictions: Vec<Jurisdiction>,
    pub fetch_timeout: Duration,
    pub results_dir: PathBuf,
    pub report_prefix: String,
    pub email: Option<EmailSettings>,
}
