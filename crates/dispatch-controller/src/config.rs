//! Controller configuration.

use std::env;

use thiserror::Error;

use dispatch_core::WorkerAddr;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A worker seed entry did not parse.
    #[error("invalid worker seed entry '{0}', expected 'addr=cap1,cap2'")]
    InvalidSeedEntry(String),

    /// A numeric environment variable did not parse.
    #[error("invalid value for {name}: {value}")]
    InvalidNumber { name: String, value: String },
}

/// Controller configuration, loaded from `DISPATCH_*` environment variables
/// with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP bind address.
    pub bind_addr: String,

    /// Worker seed list: address plus capability set, registered at startup.
    pub seed_workers: Vec<(WorkerAddr, Vec<String>)>,

    /// How long terminal executions are retained (seconds).
    pub retention_secs: u64,

    /// How often the retention sweep runs (seconds).
    pub purge_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_owned(),
            seed_workers: Vec::new(),
            retention_secs: 3600,
            purge_interval_secs: 60,
        }
    }
}

impl Config {
    /// Load the configuration from the environment.
    ///
    /// Recognized variables: `DISPATCH_BIND`, `DISPATCH_WORKERS`
    /// (`addr=cap1,cap2;addr=cap,...`), `DISPATCH_RETENTION_SECS`,
    /// `DISPATCH_PURGE_INTERVAL_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(bind) = env::var("DISPATCH_BIND") {
            config.bind_addr = bind;
        }
        if let Ok(workers) = env::var("DISPATCH_WORKERS") {
            config.seed_workers = parse_seed_workers(&workers)?;
        }
        if let Ok(value) = env::var("DISPATCH_RETENTION_SECS") {
            config.retention_secs = parse_number("DISPATCH_RETENTION_SECS", &value)?;
        }
        if let Ok(value) = env::var("DISPATCH_PURGE_INTERVAL_SECS") {
            config.purge_interval_secs = parse_number("DISPATCH_PURGE_INTERVAL_SECS", &value)?;
        }
        Ok(config)
    }
}

fn parse_number(name: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidNumber {
        name: name.to_owned(),
        value: value.to_owned(),
    })
}

/// Parse a worker seed list of the form `addr=cap1,cap2;addr=cap,...`.
fn parse_seed_workers(raw: &str) -> Result<Vec<(WorkerAddr, Vec<String>)>, ConfigError> {
    let mut workers = Vec::new();
    for entry in raw.split(';').filter(|entry| !entry.trim().is_empty()) {
        let (addr, caps) = entry
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidSeedEntry(entry.to_owned()))?;
        let capabilities: Vec<String> = caps
            .split(',')
            .map(str::trim)
            .filter(|cap| !cap.is_empty())
            .map(str::to_owned)
            .collect();
        if addr.trim().is_empty() || capabilities.is_empty() {
            return Err(ConfigError::InvalidSeedEntry(entry.to_owned()));
        }
        workers.push((WorkerAddr::new(addr.trim()), capabilities));
    }
    Ok(workers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed_workers() {
        let workers =
            parse_seed_workers("http://a:1=echo,resize;http://b:2/=echo").unwrap();
        assert_eq!(workers.len(), 2);
        assert_eq!(workers[0].0, WorkerAddr::new("http://a:1"));
        assert_eq!(workers[0].1, vec!["echo".to_owned(), "resize".to_owned()]);
        assert_eq!(workers[1].0, WorkerAddr::new("http://b:2"));
    }

    #[test]
    fn test_parse_seed_workers_rejects_malformed_entries() {
        assert!(parse_seed_workers("http://a:1").is_err());
        assert!(parse_seed_workers("http://a:1=").is_err());
        assert!(parse_seed_workers("=echo").is_err());
    }

    #[test]
    fn test_empty_seed_list() {
        assert!(parse_seed_workers("").unwrap().is_empty());
    }
}
