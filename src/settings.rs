use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, Source};
use serde::Deserialize;

const ENV_PREFIX: &str = "CATALOG";
const DEFAULT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_USER_AGENT: &str = concat!("catalog_scraper/", env!("CARGO_PKG_VERSION"));

/// Per-invocation knobs. Every field has a default, so an empty source is valid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fetch the embedded course list after parsing.
    pub fetch_courses: bool,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            fetch_courses: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Settings {
    /// Read `CATALOG_*` environment variables, e.g. `CATALOG_FETCH_COURSES=true`.
    pub fn from_env() -> Result<Self> {
        Self::from_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    }

    pub fn from_source<S>(source: S) -> Result<Self>
    where
        S: Source + Send + Sync + 'static,
    {
        let cfg = Config::builder()
            .add_source(source)
            .build()
            .context("Failed to build catalog settings")?;
        cfg.try_deserialize()
            .context("Invalid catalog settings")
    }

    pub fn with_fetch_courses(mut self, enabled: bool) -> Self {
        self.fetch_courses = enabled;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert!(!s.fetch_courses);
        assert_eq!(s.timeout(), Duration::from_secs(20));
        assert!(s.user_agent.starts_with("catalog_scraper/"));
    }

    #[test]
    fn partial_source_keeps_defaults() {
        let src = File::from_str("fetch_courses = true\ntimeout_secs = 5", FileFormat::Toml);
        let s = Settings::from_source(src).unwrap();
        assert!(s.fetch_courses);
        assert_eq!(s.timeout_secs, 5);
        assert_eq!(s.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn bad_value_is_an_error() {
        let src = File::from_str("timeout_secs = \"soon\"", FileFormat::Toml);
        assert!(Settings::from_source(src).is_err());
    }

    // Only test that touches CATALOG_* variables, so parallel tests do not race on it.
    #[test]
    fn reads_prefixed_environment() {
        std::env::set_var("CATALOG_TIMEOUT_SECS", "7");
        let s = Settings::from_env();
        std::env::remove_var("CATALOG_TIMEOUT_SECS");

        let s = s.unwrap();
        assert_eq!(s.timeout_secs, 7);
        assert_eq!(s.timeout(), Duration::from_secs(7));
        assert_eq!(s.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn builder_toggle() {
        assert!(Settings::default().with_fetch_courses(true).fetch_courses);
    }
}
