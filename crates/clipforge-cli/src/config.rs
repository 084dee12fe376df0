//! Runtime configuration read from the environment.

use anyhow::{anyhow, Result};
use rayon::ThreadPoolBuilder;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Log filter variable, checked before `RUST_LOG`.
pub const LOG_ENV: &str = "CLIPFORGE_LOG";
/// Worker thread count for frame-parallel operations.
pub const THREADS_ENV: &str = "CLIPFORGE_THREADS";
/// Filter used when neither variable is set.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Process-wide settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// `tracing` filter directive.
    pub log_filter: String,
    /// Rayon worker count; `None` keeps rayon's default.
    pub threads: Option<usize>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            threads: None,
        }
    }
}

impl RuntimeConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`. Unset, blank or unparsable values keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let log_filter = present(LOG_ENV)
            .or_else(|| present("RUST_LOG"))
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        let threads = present(THREADS_ENV)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0);
        Self {
            log_filter,
            threads,
        }
    }

    /// The log filter, falling back to the default when the directive is invalid.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.log_filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    }

    /// Install the stderr log subscriber.
    pub fn init_logging(&self) -> Result<()> {
        tracing_subscriber::fmt()
            .with_env_filter(self.env_filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init()
            .map_err(|e| anyhow!("failed to install log subscriber: {e}"))
    }

    /// Size the global rayon pool, if a thread count was given.
    pub fn init_thread_pool(&self) {
        let Some(threads) = self.threads else {
            return;
        };
        if let Err(e) = ThreadPoolBuilder::new().num_threads(threads).build_global() {
            warn!("Could not configure {} worker threads: {}", threads, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> RuntimeConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RuntimeConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config(&[]), RuntimeConfig::default());
    }

    #[test]
    fn test_log_filter_precedence() {
        assert_eq!(config(&[("RUST_LOG", "info")]).log_filter, "info");
        let both = config(&[("RUST_LOG", "info"), (LOG_ENV, "debug")]);
        assert_eq!(both.log_filter, "debug");
        assert_eq!(config(&[(LOG_ENV, "  ")]).log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_threads() {
        assert_eq!(config(&[(THREADS_ENV, "4")]).threads, Some(4));
        assert_eq!(config(&[(THREADS_ENV, "0")]).threads, None);
        assert_eq!(config(&[(THREADS_ENV, "many")]).threads, None);
    }
}
