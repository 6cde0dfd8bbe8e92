//! 追踪、请求 ID 与对账计数器。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 计数器快照。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub objects_ingested: u64,
    pub sweeps_started: u64,
    pub objects_claimed: u64,
    pub probe_failures: u64,
    pub resolved_online: u64,
    pub removed_offline: u64,
    pub resolve_races: u64,
    pub storage_failures: u64,
    pub objects_purged: u64,
}

/// 进程级计数器。
pub struct TelemetryMetrics {
    objects_ingested: AtomicU64,
    sweeps_started: AtomicU64,
    objects_claimed: AtomicU64,
    probe_failures: AtomicU64,
    resolved_online: AtomicU64,
    removed_offline: AtomicU64,
    resolve_races: AtomicU64,
    storage_failures: AtomicU64,
    objects_purged: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            objects_ingested: AtomicU64::new(0),
            sweeps_started: AtomicU64::new(0),
            objects_claimed: AtomicU64::new(0),
            probe_failures: AtomicU64::new(0),
            resolved_online: AtomicU64::new(0),
            removed_offline: AtomicU64::new(0),
            resolve_races: AtomicU64::new(0),
            storage_failures: AtomicU64::new(0),
            objects_purged: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            objects_ingested: self.objects_ingested.load(Ordering::Relaxed),
            sweeps_started: self.sweeps_started.load(Ordering::Relaxed),
            objects_claimed: self.objects_claimed.load(Ordering::Relaxed),
            probe_failures: self.probe_failures.load(Ordering::Relaxed),
            resolved_online: self.resolved_online.load(Ordering::Relaxed),
            removed_offline: self.removed_offline.load(Ordering::Relaxed),
            resolve_races: self.resolve_races.load(Ordering::Relaxed),
            storage_failures: self.storage_failures.load(Ordering::Relaxed),
            objects_purged: self.objects_purged.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局计数器实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录接入的对象数量（去重后）。
pub fn record_objects_ingested(count: u64) {
    metrics()
        .objects_ingested
        .fetch_add(count, Ordering::Relaxed);
}

/// 记录一次对账开始。
pub fn record_sweep_started() {
    metrics().sweeps_started.fetch_add(1, Ordering::Relaxed);
}

/// 记录认领到的对象数量。
pub fn record_objects_claimed(count: u64) {
    metrics().objects_claimed.fetch_add(count, Ordering::Relaxed);
}

/// 记录探测失败（传输错误、非 200、响应无法解析）。
pub fn record_probe_failure() {
    metrics().probe_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录对象被标记为在线。
pub fn record_resolved_online() {
    metrics().resolved_online.fetch_add(1, Ordering::Relaxed);
}

/// 记录离线对象被删除。
pub fn record_removed_offline() {
    metrics().removed_offline.fetch_add(1, Ordering::Relaxed);
}

/// 记录写回时对象已不存在（并发删除）。
pub fn record_resolve_race() {
    metrics().resolve_races.fetch_add(1, Ordering::Relaxed);
}

/// 记录存储层失败。
pub fn record_storage_failure() {
    metrics().storage_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录过期回收删除的对象数量。
pub fn record_objects_purged(count: u64) {
    metrics().objects_purged.fetch_add(count, Ordering::Relaxed);
}
