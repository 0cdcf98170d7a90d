use thiserror::Error;

use crate::pricing::DEFAULT_GST_PERCENTAGE;

const DEFAULT_HTTP_HOST: &str = "127.0.0.1";

#[derive(Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be a valid number, got {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub http_host: String,
    pub http_port: u16,
    pub database_url: String,
    pub gst_percentage: f64,
}

impl Config {
    /// Reads the configuration from the process environment (after `.env` is loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let http_host = lookup("HTTP_HOST").unwrap_or_else(|| DEFAULT_HTTP_HOST.to_string());

        let port = lookup("HTTP_PORT").ok_or(ConfigError::Missing("HTTP_PORT"))?;
        let http_port = port.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
            name: "HTTP_PORT",
            value: port.clone(),
        })?;

        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let gst_percentage = match lookup("GST_PERCENTAGE") {
            Some(value) => value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|p| p.is_finite() && *p >= 0.0)
                .ok_or(ConfigError::Invalid {
                    name: "GST_PERCENTAGE",
                    value,
                })?,
            None => DEFAULT_GST_PERCENTAGE,
        };

        Ok(Self {
            http_host,
            http_port,
            database_url,
            gst_percentage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn reads_required_values_and_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("HTTP_PORT", "8080"),
            ("DATABASE_URL", "postgres://localhost/rentals"),
        ]))
        .unwrap();

        assert_eq!(config.http_host, "127.0.0.1");
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.database_url, "postgres://localhost/rentals");
        assert_eq!(config.gst_percentage, 5.0);
    }

    #[test]
    fn overrides_host_and_gst() {
        let config = Config::from_lookup(lookup_from(&[
            ("HTTP_HOST", "0.0.0.0"),
            ("HTTP_PORT", "3000"),
            ("DATABASE_URL", "postgres://db/rentals"),
            ("GST_PERCENTAGE", "12"),
        ]))
        .unwrap();

        assert_eq!(config.http_host, "0.0.0.0");
        assert_eq!(config.gst_percentage, 12.0);
    }

    #[test]
    fn reports_missing_and_invalid_values() {
        assert_eq!(
            Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://db")])),
            Err(ConfigError::Missing("HTTP_PORT"))
        );
        assert_eq!(
            Config::from_lookup(lookup_from(&[("HTTP_PORT", "8080")])),
            Err(ConfigError::Missing("DATABASE_URL"))
        );
        assert_eq!(
            Config::from_lookup(lookup_from(&[
                ("HTTP_PORT", "eighty"),
                ("DATABASE_URL", "postgres://db"),
            ])),
            Err(ConfigError::Invalid {
                name: "HTTP_PORT",
                value: "eighty".to_string(),
            })
        );
        assert!(Config::from_lookup(lookup_from(&[
            ("HTTP_PORT", "8080"),
            ("DATABASE_URL", "postgres://db"),
            ("GST_PERCENTAGE", "-3"),
        ]))
        .is_err());
    }
}
