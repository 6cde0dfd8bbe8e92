//! 对账循环：等待防抖唤醒，反复认领批次并为每个对象派发探测任务。
//!
//! 状态只有两个：空闲（等待唤醒）与对账中（循环认领直到台账返回空批次）。
//! 同一轮对账内已认领的对象持有新租约，不会被后续批次再次认领，
//! 因此不会重复派发；探测失败的对象在租约过期后的下一轮对账中重新认领。

use crate::debounce::Debouncer;
use crate::resolve::resolve_object;
use domain::ObjectId;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{Instrument, debug, info, info_span, warn};
use tracker_probe::StatusProbe;
use tracker_storage::ObjectLedger;
use tracker_telemetry::{record_objects_claimed, record_storage_failure, record_sweep_started};

/// 对账参数。
#[derive(Debug, Clone)]
pub struct ReconcilePolicy {
    /// 单次认领上限，同时也是单批并发探测上限
    pub batch_size: usize,
    /// 认领失败后的重试间隔
    pub claim_retry_delay: Duration,
}

impl Default for ReconcilePolicy {
    fn default() -> Self {
        Self {
            batch_size: 100,
            claim_retry_delay: Duration::from_secs(1),
        }
    }
}

/// 一轮对账的统计。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// 非空批次数
    pub batches: usize,
    /// 派发的探测任务数
    pub dispatched: usize,
    pub claim_failures: usize,
}

pub struct ReconciliationLoop {
    ledger: Arc<dyn ObjectLedger>,
    probe: Arc<dyn StatusProbe>,
    debouncer: Arc<Debouncer>,
    policy: ReconcilePolicy,
    tasks: TaskTracker,
    shutdown: CancellationToken,
}

impl ReconciliationLoop {
    pub fn new(
        ledger: Arc<dyn ObjectLedger>,
        probe: Arc<dyn StatusProbe>,
        debouncer: Arc<Debouncer>,
        policy: ReconcilePolicy,
        shutdown: CancellationToken,
    ) -> Self {
        let mut policy = policy;
        if policy.batch_size == 0 {
            policy.batch_size = 1;
        }
        Self {
            ledger,
            probe,
            debouncer,
            policy,
            tasks: TaskTracker::new(),
            shutdown,
        }
    }

    pub fn policy(&self) -> &ReconcilePolicy {
        &self.policy
    }

    /// 进行中的探测任务数。
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// 常驻运行，直到 shutdown 被取消。
    pub async fn run(&self) {
        info!(
            target: "tracker.reconcile",
            batch_size = self.policy.batch_size,
            lease_window_ms = self.ledger.lease_window().as_millis() as u64,
            "reconcile_loop_started"
        );
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = self.debouncer.wait_and_consume() => {}
            }
            self.run_sweep().await;
        }
        info!(target: "tracker.reconcile", in_flight = self.in_flight(), "reconcile_loop_stopped");
    }

    /// 执行一轮对账：循环认领直到没有可认领对象。
    ///
    /// 派发的探测任务不在此等待；需要等待时调用 [`Self::drain`]。
    pub async fn run_sweep(&self) -> SweepReport {
        record_sweep_started();
        info!(target: "tracker.reconcile", "sweep_started");
        let mut report = SweepReport::default();
        loop {
            let ids = match self.ledger.claim_batch(self.policy.batch_size).await {
                Ok(ids) => ids,
                Err(err) => {
                    record_storage_failure();
                    report.claim_failures += 1;
                    warn!(target: "tracker.reconcile", error = %err, "claim_failed");
                    tokio::select! {
                        _ = self.shutdown.cancelled() => {
                            self.debouncer.abort_sweep();
                            return report;
                        }
                        _ = tokio::time::sleep(self.policy.claim_retry_delay) => continue,
                    }
                }
            };
            if ids.is_empty() {
                if self.debouncer.end_sweep() {
                    debug!(target: "tracker.reconcile", "sweep_recheck");
                    continue;
                }
                break;
            }
            report.batches += 1;
            report.dispatched += ids.len();
            record_objects_claimed(ids.len() as u64);
            debug!(target: "tracker.reconcile", claimed = ids.len(), "batch_claimed");
            for id in ids {
                self.dispatch(id);
            }
        }
        info!(
            target: "tracker.reconcile",
            batches = report.batches,
            dispatched = report.dispatched,
            claim_failures = report.claim_failures,
            "sweep_finished"
        );
        report
    }

    /// 等待当前所有探测任务结束。
    pub async fn drain(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }

    fn dispatch(&self, id: ObjectId) {
        let ledger = Arc::clone(&self.ledger);
        let probe = Arc::clone(&self.probe);
        let span = info_span!("resolve", object_id = id);
        self.tasks.spawn(
            async move {
                resolve_object(ledger.as_ref(), probe.as_ref(), id).await;
            }
            .instrument(span),
        );
    }
}
