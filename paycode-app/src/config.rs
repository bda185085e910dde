//! Configuration loading from environment.

use std::env;
use std::time::Duration;

/// Application configuration.
#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    /// Queue ingestion endpoint for recorded payments; logged only when unset.
    pub payment_queue_url: Option<String>,
    /// Background sweep period; no sweeper when unset.
    pub sweep_interval: Option<Duration>,
    pub otlp_endpoint: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        // Blank values count as unset.
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = var("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("PORT must be a port number: {}", e))?;

        let database_url = var("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let sweep_interval = match var("SWEEP_INTERVAL_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|e| {
                    anyhow::anyhow!("SWEEP_INTERVAL_SECS must be whole seconds: {}", e)
                })?;
                if secs == 0 {
                    anyhow::bail!("SWEEP_INTERVAL_SECS must be greater than zero");
                }
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            port,
            database_url,
            payment_queue_url: var("PAYMENT_QUEUE_URL"),
            sweep_interval,
            otlp_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DATABASE_URL", "sqlite::memory:")]).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert!(config.payment_queue_url.is_none());
        assert!(config.sweep_interval.is_none());
        assert!(config.otlp_endpoint.is_none());
    }

    #[test]
    fn test_database_url_required() {
        let err = load(&[("PORT", "8080")]).unwrap_err();

        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_all_values() {
        let config = load(&[
            ("PORT", "8080"),
            ("DATABASE_URL", "postgres://localhost/paycodes"),
            ("PAYMENT_QUEUE_URL", "http://queue.local/payments"),
            ("SWEEP_INTERVAL_SECS", "60"),
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://collector:4317"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(
            config.payment_queue_url.as_deref(),
            Some("http://queue.local/payments")
        );
        assert_eq!(config.sweep_interval, Some(Duration::from_secs(60)));
        assert_eq!(config.otlp_endpoint.as_deref(), Some("http://collector:4317"));
    }

    #[test]
    fn test_zero_sweep_interval_rejected() {
        let err = load(&[("DATABASE_URL", "memory://"), ("SWEEP_INTERVAL_SECS", "0")]).unwrap_err();

        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn test_bad_port_rejected() {
        assert!(load(&[("DATABASE_URL", "memory://"), ("PORT", "http")]).is_err());
    }

    #[test]
    fn test_blank_queue_url_is_unset() {
        let config = load(&[("DATABASE_URL", "memory://"), ("PAYMENT_QUEUE_URL", " ")]).unwrap();

        assert!(config.payment_queue_url.is_none());
    }
}
