//! 过期回收：固定周期删除接入时间超过上限的对象，与对账循环互不依赖。

use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracker_storage::{ObjectLedger, StorageError};
use tracker_telemetry::{record_objects_purged, record_storage_failure};

/// 回收参数。
#[derive(Debug, Clone)]
pub struct ReaperPolicy {
    pub interval: Duration,
    pub max_age: Duration,
}

impl Default for ReaperPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_age: Duration::from_secs(30),
        }
    }
}

pub struct ExpiryReaper {
    ledger: Arc<dyn ObjectLedger>,
    policy: ReaperPolicy,
    shutdown: CancellationToken,
}

impl ExpiryReaper {
    pub fn new(
        ledger: Arc<dyn ObjectLedger>,
        policy: ReaperPolicy,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            ledger,
            policy,
            shutdown,
        }
    }

    /// 执行一次回收。
    pub async fn purge_once(&self) -> Result<u64, StorageError> {
        let purged = self.ledger.purge_expired(self.policy.max_age).await?;
        record_objects_purged(purged);
        Ok(purged)
    }

    /// 按周期回收，直到 shutdown 被取消；单次失败只记录日志。
    pub async fn run(&self) {
        let mut ticker = tokio::time::interval(self.policy.interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // 第一次 tick 立即返回，跳过它，首轮回收在一个周期之后。
        ticker.tick().await;
        info!(
            target: "tracker.reaper",
            interval_ms = self.policy.interval.as_millis() as u64,
            max_age_ms = self.policy.max_age.as_millis() as u64,
            "reaper_started"
        );
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }
            match self.purge_once().await {
                Ok(0) => debug!(target: "tracker.reaper", "nothing_expired"),
                Ok(purged) => info!(target: "tracker.reaper", purged, "expired_objects_purged"),
                Err(err) => {
                    record_storage_failure();
                    warn!(target: "tracker.reaper", error = %err, "purge_failed");
                }
            }
        }
        info!(target: "tracker.reaper", "reaper_stopped");
    }
}
