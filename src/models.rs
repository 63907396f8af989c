//! Data models for keyword patterns, monitored sources and their mentions.
//!
//! This module defines the core data structures used throughout the application:
//! - [`KeywordPattern`]: A compiled, case-insensitive topic matcher
//! - [`Jurisdiction`]: A named local government and the page we watch for it
//! - [`Mention`]: One pattern match found on a jurisdiction's page
//! - [`Report`]: Every mention found in a single run, stamped with the run date
//!
//! None of these outlive a run. The only thing persisted is the rendered
//! report text (see [`crate::outputs::report`]).

use chrono::NaiveDate;
use regex::{Regex, RegexBuilder};
use std::fmt;
use url::Url;

/// A case-insensitive keyword pattern used to detect a topic mention.
///
/// The pattern may be a literal phrase (`"nvcc"`) or a regex alternation
/// group (`"nova (college|education|community)"`). It is compiled once when
/// the configuration is loaded and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct KeywordPattern {
    /// The pattern exactly as configured. Used as the "Match:" label in reports.
    source: String,
    regex: Regex,
}

impl KeywordPattern {
    /// Compile a pattern. Malformed regex syntax is returned as an error so
    /// that configuration loading can fail before any page is fetched.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(source).case_insensitive(true).build()?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// The configured pattern text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl fmt::Display for KeywordPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// One named local-government entity and the single agenda/meetings page
/// we monitor for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jurisdiction {
    /// Display name, e.g. "Fairfax County".
    pub name: String,
    /// The validated absolute http(s) URL of the page.
    pub url: Url,
}

/// A single keyword-pattern match found in a fetched page, with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mention {
    /// Name of the jurisdiction whose page matched.
    pub jurisdiction: String,
    /// The page the text was fetched from.
    pub url: String,
    /// The configured pattern text that matched.
    pub pattern: String,
    /// The lower-cased match plus up to 50 characters on each side.
    pub snippet: String,
}

/// All mentions found in one run, in source order then pattern order.
#[derive(Debug, Clone)]
pub struct Report {
    /// Local date of the run; keys the output filename.
    pub date: NaiveDate,
    pub mentions: Vec<Mention>,
}

impl Report {
    pub fn new(date: NaiveDate, mentions: Vec<Mention>) -> Self {
        Self { date, mentions }
    }

    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty()
    }
}
