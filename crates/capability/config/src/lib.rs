//! 应用运行配置加载。

use std::env;
use std::time::Duration;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 台账存储后端。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    /// 仅用于本地演示与测试，进程退出即丢失。
    Memory,
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub http_addr: String,
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub probe_base_url: String,
    pub probe_timeout_seconds: u64,
    pub claim_batch_size: usize,
    pub lease_window_seconds: u64,
    pub expiry_age_seconds: u64,
    pub reaper_interval_seconds: u64,
    pub claim_retry_delay_ms: u64,
}

impl TrackerConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// 从任意键值来源读取配置（`from_env` 的底层实现）。
    pub fn from_source<F>(source: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let reader = Reader { source };
        let http_addr = reader
            .string("TRACKER_HTTP_ADDR")
            .unwrap_or_else(|| "127.0.0.1:9090".to_string());
        let storage_backend = match reader.string("TRACKER_STORAGE") {
            None => StorageBackend::Postgres,
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "postgres" | "pg" => StorageBackend::Postgres,
                "memory" | "in-memory" => StorageBackend::Memory,
                _ => return Err(ConfigError::Invalid("TRACKER_STORAGE".to_string(), value)),
            },
        };
        let database_url = reader.string("TRACKER_DATABASE_URL");
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("TRACKER_DATABASE_URL".to_string()));
        }
        let database_max_connections =
            reader.u32_with_default("TRACKER_DATABASE_MAX_CONNECTIONS", 8)?;
        let probe_base_url = reader
            .string("TRACKER_PROBE_BASE_URL")
            .unwrap_or_else(|| "http://localhost:9010".to_string());
        let probe_timeout_seconds = reader.u64_with_default("TRACKER_PROBE_TIMEOUT_SECONDS", 10)?;
        let claim_batch_size = reader.positive_u64("TRACKER_CLAIM_BATCH_SIZE", 100)? as usize;
        let lease_window_seconds = reader.positive_u64("TRACKER_LEASE_WINDOW_SECONDS", 10)?;
        let expiry_age_seconds = reader.positive_u64("TRACKER_EXPIRY_AGE_SECONDS", 30)?;
        let reaper_interval_seconds = reader.positive_u64("TRACKER_REAPER_INTERVAL_SECONDS", 5)?;
        let claim_retry_delay_ms = reader.u64_with_default("TRACKER_CLAIM_RETRY_DELAY_MS", 1000)?;

        Ok(Self {
            http_addr,
            storage_backend,
            database_url,
            database_max_connections,
            probe_base_url,
            probe_timeout_seconds,
            claim_batch_size,
            lease_window_seconds,
            expiry_age_seconds,
            reaper_interval_seconds,
            claim_retry_delay_ms,
        })
    }

    pub fn lease_window(&self) -> Duration {
        Duration::from_secs(self.lease_window_seconds)
    }

    pub fn expiry_age(&self) -> Duration {
        Duration::from_secs(self.expiry_age_seconds)
    }

    pub fn reaper_interval(&self) -> Duration {
        Duration::from_secs(self.reaper_interval_seconds)
    }

    pub fn claim_retry_delay(&self) -> Duration {
        Duration::from_millis(self.claim_retry_delay_ms)
    }

    /// 0 表示不设置请求超时。
    pub fn probe_timeout(&self) -> Option<Duration> {
        match self.probe_timeout_seconds {
            0 => None,
            seconds => Some(Duration::from_secs(seconds)),
        }
    }
}

struct Reader<F> {
    source: F,
}

impl<F> Reader<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// 空字符串视为未设置。
    fn string(&self, key: &str) -> Option<String> {
        (self.source)(key).filter(|value| !value.is_empty())
    }

    fn u64_with_default(&self, key: &str, default: u64) -> Result<u64, ConfigError> {
        let Some(value) = self.string(key) else {
            return Ok(default);
        };
        value
            .parse::<u64>()
            .map_err(|_| ConfigError::Invalid(key.to_string(), value))
    }

    fn u32_with_default(&self, key: &str, default: u32) -> Result<u32, ConfigError> {
        let Some(value) = self.string(key) else {
            return Ok(default);
        };
        value
            .parse::<u32>()
            .map_err(|_| ConfigError::Invalid(key.to_string(), value))
    }

    fn positive_u64(&self, key: &str, default: u64) -> Result<u64, ConfigError> {
        let value = self.u64_with_default(key, default)?;
        if value == 0 {
            return Err(ConfigError::Invalid(key.to_string(), "0".to_string()));
        }
        Ok(value)
    }
}
