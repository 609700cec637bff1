//! Runtime configuration read from the environment (and `.env` via dotenvy).

use crate::error::ConfigError;

/// Public CSV on road quality and public transport in Lebanese towns.
pub const DEFAULT_DATASET_URL: &str =
    "https://linked.aub.edu.lb/pkgcube/data/0050f2ea95d565d42df3600a32193531_20240905_183009.csv";

pub const DEFAULT_PORT: u16 = 8501;

pub const DEFAULT_LOG_FILE_PATH: &str = "logs/roads_dashboard.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub dataset_url: String,
    pub port: u16,
    pub log_file_path: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_url: DEFAULT_DATASET_URL.to_string(),
            port: DEFAULT_PORT,
            log_file_path: DEFAULT_LOG_FILE_PATH.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Reads `DATASET_URL`, `DASHBOARD_PORT` and `LOG_FILE_PATH`, falling back
    /// to the defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup("DATASET_URL").filter(|u| !u.trim().is_empty()) {
            config.dataset_url = url;
        }

        if let Some(raw) = lookup("DASHBOARD_PORT") {
            config.port = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort {
                    name: "DASHBOARD_PORT",
                    value: raw.clone(),
                })?;
        }

        if let Some(path) = lookup("LOG_FILE_PATH") {
            config.log_file_path = path;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_env_empty() {
        let config = DashboardConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.port, 8501);
    }

    #[test]
    fn test_env_overrides() {
        let config = DashboardConfig::from_lookup(lookup_from(&[
            ("DATASET_URL", "http://localhost/data.csv"),
            ("DASHBOARD_PORT", "9000"),
            ("LOG_FILE_PATH", "/tmp/dash.log"),
        ]))
        .unwrap();

        assert_eq!(config.dataset_url, "http://localhost/data.csv");
        assert_eq!(config.port, 9000);
        assert_eq!(config.log_file_path, "/tmp/dash.log");
    }

    #[test]
    fn test_blank_url_keeps_default() {
        let config = DashboardConfig::from_lookup(lookup_from(&[("DATASET_URL", "  ")])).unwrap();
        assert_eq!(config.dataset_url, DEFAULT_DATASET_URL);
    }

    #[test]
    fn test_invalid_port_is_error() {
        let result = DashboardConfig::from_lookup(lookup_from(&[("DASHBOARD_PORT", "http")]));
        assert!(matches!(result, Err(ConfigError::InvalidPort { .. })));
    }
}
