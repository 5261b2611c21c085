//! Reconciler configuration loaded from environment variables.

use common::Jurisdiction;
use domain::DateOfBirthRules;
use domain::date::{EARLIEST_BIRTH_YEAR, MINIMUM_CANDIDATE_AGE};

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Reconciler configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `pretty` or `json` (default: `pretty`)
/// - `DEFAULT_JURISDICTION`: `gb` or `ni` (default: `gb`)
/// - `EARLIEST_BIRTH_YEAR`: earliest accepted year of birth (default: `1900`)
/// - `MINIMUM_CANDIDATE_AGE`: minimum age in years at booking (default: `15`)
///
/// Values that fail to parse fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_level: String,
    pub log_format: LogFormat,
    pub default_jurisdiction: Jurisdiction,
    pub earliest_birth_year: i32,
    pub minimum_candidate_age: i32,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: match lookup("LOG_FORMAT")
                .map(|v| v.trim().to_ascii_lowercase())
                .as_deref()
            {
                Some("json") => LogFormat::Json,
                Some("pretty") => LogFormat::Pretty,
                _ => defaults.log_format,
            },
            default_jurisdiction: lookup("DEFAULT_JURISDICTION")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_jurisdiction),
            earliest_birth_year: lookup("EARLIEST_BIRTH_YEAR")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.earliest_birth_year),
            minimum_candidate_age: lookup("MINIMUM_CANDIDATE_AGE")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.minimum_candidate_age),
        }
    }

    /// Bounds for composing dates of birth from form input.
    pub fn date_of_birth_rules(&self) -> DateOfBirthRules {
        DateOfBirthRules::new(self.earliest_birth_year, self.minimum_candidate_age)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            default_jurisdiction: Jurisdiction::GreatBritain,
            earliest_birth_year: EARLIEST_BIRTH_YEAR,
            minimum_candidate_age: MINIMUM_CANDIDATE_AGE,
        }
    }
}
