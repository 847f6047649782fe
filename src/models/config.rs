//! Configuration model loaded from external sources.

use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::gesture::DEFAULT_SWIPE_THRESHOLD;

fn default_swipe_threshold() -> f64 {
    DEFAULT_SWIPE_THRESHOLD
}

fn default_session_idle_minutes() -> u64 {
    120
}

fn default_max_sessions() -> usize {
    10_000
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub templates_dir: String,
    pub secret: String,
    /// JSON dataset with the clients to review.
    pub data_path: String,
    /// Drag distance in pixels that turns a swipe into a decision.
    #[serde(default = "default_swipe_threshold")]
    pub swipe_threshold: f64,
    /// Fixed "today" for relative dates; the local date when unset.
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
    #[serde(default)]
    pub cookie_secure: bool,
    /// Review sessions untouched for this long are discarded.
    #[serde(default = "default_session_idle_minutes")]
    pub session_idle_minutes: u64,
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

impl ServerConfig {
    pub fn session_idle_ttl(&self) -> Duration {
        Duration::from_secs(self.session_idle_minutes.saturating_mul(60))
    }
}

#[cfg(test)]
mod tests {
    use config::{Config, File, FileFormat};

    use super::*;

    const YAML: &str = r#"
domain: localhost
address: 127.0.0.1
port: 8080
templates_dir: templates/**/*
secret: not-so-secret
data_path: data/clients.json
"#;

    #[test]
    fn optional_settings_have_defaults() {
        let config: ServerConfig = Config::builder()
            .add_source(File::from_str(YAML, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.swipe_threshold, 150.0);
        assert_eq!(config.reference_date, None);
        assert!(!config.cookie_secure);
        assert_eq!(config.session_idle_ttl(), Duration::from_secs(7200));
        assert_eq!(config.max_sessions, 10_000);
    }

    #[test]
    fn reference_date_is_parsed() {
        let yaml = format!("{YAML}reference_date: 2025-03-31\nswipe_threshold: 90\n");
        let config: ServerConfig = Config::builder()
            .add_source(File::from_str(&yaml, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(
            config.reference_date,
            NaiveDate::from_ymd_opt(2025, 3, 31)
        );
        assert_eq!(config.swipe_threshold, 90.0);
    }
}
