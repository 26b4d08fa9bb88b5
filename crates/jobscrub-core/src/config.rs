//! Run configuration: defaults, filter lists, and the optional config file.

use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use crate::error::{Result, ScrubError};

/// Built-in defaults for a scrub run.
///
/// Constructed once at process start and passed explicitly wherever a
/// default is needed; components never read ambient globals.
#[derive(Debug, Clone)]
pub struct ScrubDefaults {
    /// Staleness threshold in days.
    pub max_days: u32,

    /// Whether to verify the server's TLS certificate.
    pub ssl_verify: bool,

    /// Whether to simulate deletions instead of performing them.
    pub dry_run: bool,
}

impl Default for ScrubDefaults {
    fn default() -> Self {
        ScrubDefaults {
            max_days: 30,
            ssl_verify: false,
            dry_run: false,
        }
    }
}

/// What to do when a live delete call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletionPolicy {
    /// Abort the run on the first failed delete.
    #[default]
    FailFast,

    /// Keep deleting and collect failures into the report.
    Continue,
}

/// Full configuration for one scrub run.
#[derive(Debug, Clone)]
pub struct ScrubConfig {
    /// Exact-name override list; a non-empty resolved set supersedes all
    /// exclusion filtering.
    pub only_jobs: Vec<String>,

    /// Exact names kept on the server.
    pub ignore_jobs: Vec<String>,

    /// Patterns (in order) whose matches are kept on the server.
    pub ignore_patterns: Vec<String>,

    /// Single governing pattern; replaces listing + filtering entirely.
    pub pattern: Option<String>,

    /// Staleness threshold in days (exclusive boundary).
    pub max_days: u32,

    /// Whether to verify the server's TLS certificate.
    pub ssl_verify: bool,

    /// Report the deletion plan without any mutating call.
    pub dry_run: bool,

    /// Order the deletion plan ascending by staleness.
    pub sort_by_staleness: bool,

    /// Behavior on a failed delete call.
    pub deletion_policy: DeletionPolicy,
}

impl ScrubConfig {
    /// Start from the run defaults with empty filter lists.
    pub fn new(defaults: &ScrubDefaults) -> Self {
        ScrubConfig {
            only_jobs: Vec::new(),
            ignore_jobs: Vec::new(),
            ignore_patterns: Vec::new(),
            pattern: None,
            max_days: defaults.max_days,
            ssl_verify: defaults.ssl_verify,
            dry_run: defaults.dry_run,
            sort_by_staleness: false,
            deletion_policy: DeletionPolicy::default(),
        }
    }

    /// Add override names, dropping entries already present.
    pub fn add_only_jobs<I: IntoIterator<Item = String>>(&mut self, jobs: I) {
        merge_unique(&mut self.only_jobs, jobs);
    }

    /// Add exact ignore names, dropping entries already present.
    pub fn add_ignore_jobs<I: IntoIterator<Item = String>>(&mut self, jobs: I) {
        merge_unique(&mut self.ignore_jobs, jobs);
    }

    /// Add ignore patterns, dropping entries already present.
    pub fn add_ignore_patterns<I: IntoIterator<Item = String>>(&mut self, patterns: I) {
        merge_unique(&mut self.ignore_patterns, patterns);
    }

    /// Merge list entries from a TOML config file.
    ///
    /// File entries are unioned with whatever is already configured;
    /// first-appearance order is preserved and duplicates are dropped.
    /// A missing or malformed file is a configuration error.
    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let raw = std::fs::read_to_string(path).map_err(|err| ScrubError::ConfigFile {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        let file: FileConfig = toml::from_str(&raw).map_err(|err| ScrubError::ConfigFile {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

        self.add_only_jobs(file.only_jobs);
        self.add_ignore_jobs(file.ignore_jobs);
        self.add_ignore_patterns(file.ignore_patterns);
        Ok(())
    }

    /// Compile the filter lists for a run.
    pub fn filter(&self) -> Result<FilterConfig> {
        Ok(FilterConfig {
            only_jobs: self.only_jobs.clone(),
            ignore_jobs: self.ignore_jobs.clone(),
            ignore_patterns: self
                .ignore_patterns
                .iter()
                .map(|pattern| compile_pattern(pattern))
                .collect::<Result<Vec<Regex>>>()?,
        })
    }

    /// Compile the governing pattern, if one is configured.
    pub fn governing_pattern(&self) -> Result<Option<Regex>> {
        self.pattern.as_deref().map(compile_pattern).transpose()
    }
}

/// Recognized keys of the optional config file.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    only_jobs: Vec<String>,

    #[serde(default)]
    ignore_jobs: Vec<String>,

    #[serde(default)]
    ignore_patterns: Vec<String>,
}

/// Compiled job-selection filters for one run. Immutable once built.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// Exact-name override list.
    pub only_jobs: Vec<String>,

    /// Exact names kept on the server.
    pub ignore_jobs: Vec<String>,

    /// Compiled ignore patterns, in configuration order.
    pub ignore_patterns: Vec<Regex>,
}

impl FilterConfig {
    /// Whether a job is kept on the server (not a scrub candidate).
    ///
    /// Patterns are tried in order with an unanchored search, first hit
    /// wins; exact ignore names are checked after the patterns.
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore_patterns.iter().any(|regex| regex.is_match(name))
            || self.ignore_jobs.iter().any(|ignored| ignored == name)
    }
}

fn merge_unique<I: IntoIterator<Item = String>>(into: &mut Vec<String>, extra: I) {
    for item in extra {
        if !into.contains(&item) {
            into.push(item);
        }
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| ScrubError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}
