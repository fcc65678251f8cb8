use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Context, Result};

/// Fixed-delay retry applied to the single-quote fetch path on HTTP 429.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt (2 retries = 3 attempts total).
    pub max_retries: u32,
    pub delay_ms: u64,
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            delay_ms: 750,
        }
    }
}

/// Per-class TTLs for the persistent cache tier, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtlConfig {
    pub quote_secs: u64,
    pub movers_secs: u64,
    pub trending_secs: u64,
}

impl TtlConfig {
    pub fn quote(&self) -> Duration {
        Duration::from_secs(self.quote_secs)
    }

    pub fn movers(&self) -> Duration {
        Duration::from_secs(self.movers_secs)
    }

    pub fn trending(&self) -> Duration {
        Duration::from_secs(self.trending_secs)
    }
}

impl Default for TtlConfig {
    fn default() -> Self {
        Self {
            quote_secs: 300,
            movers_secs: 300,
            trending_secs: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FinchConfig {
    /// Base URL of the key-masking proxy, e.g. `https://finch.example.com`.
    pub base_url: String,
    /// File backing the persistent cache tier and the demo-mode flag.
    pub cache_file: PathBuf,
    pub ttl: TtlConfig,
    pub retry: RetryConfig,
    /// Consecutive generic failures before demo mode trips.
    pub failure_threshold: u32,
}

impl Default for FinchConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FinchConfig {
    pub fn builtin() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            cache_file: PathBuf::from("finch_cache.json"),
            ttl: TtlConfig::default(),
            retry: RetryConfig::default(),
            failure_threshold: 3,
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: FinchConfig = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_matches_documented_defaults() {
        let config = FinchConfig::builtin();
        assert_eq!(config.ttl.quote(), Duration::from_secs(300));
        assert_eq!(config.retry.max_retries, 2);
        assert_eq!(config.retry.delay(), Duration::from_millis(750));
        assert_eq!(config.failure_threshold, 3);
    }

    #[test]
    fn partial_config_files_keep_defaults() {
        let parsed: FinchConfig =
            serde_json::from_str(r#"{"base_url": "https://proxy.test"}"#).unwrap();
        assert_eq!(parsed.base_url, "https://proxy.test");
        assert_eq!(parsed.retry.max_retries, 2);
        assert_eq!(parsed.ttl.movers_secs, 300);
    }
}
