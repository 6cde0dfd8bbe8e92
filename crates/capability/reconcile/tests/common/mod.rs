#![allow(dead_code)]

use async_trait::async_trait;
use domain::{ObjectId, ProbeStatus, TrackedObject};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracker_probe::{ProbeError, StatusProbe};
use tracker_reconcile::Debouncer;
use tracker_storage::{InMemoryLedger, ObjectLedger, StorageError};

/// 按 id 返回固定状态；未登记的 id 返回 503。
#[derive(Default)]
pub struct FakeProbe {
    statuses: HashMap<ObjectId, bool>,
    calls: Mutex<Vec<ObjectId>>,
}

impl FakeProbe {
    pub fn new(statuses: &[(ObjectId, bool)]) -> Self {
        Self {
            statuses: statuses.iter().copied().collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<ObjectId> {
        self.calls.lock().expect("calls").clone()
    }
}

#[async_trait]
impl StatusProbe for FakeProbe {
    async fn probe(&self, id: ObjectId) -> Result<ProbeStatus, ProbeError> {
        self.calls.lock().expect("calls").push(id);
        match self.statuses.get(&id) {
            Some(online) => Ok(ProbeStatus {
                id,
                online: *online,
            }),
            None => Err(ProbeError::Status(503)),
        }
    }
}

/// 包装内存台账，前 N 次认领/回收返回存储错误。
pub struct FlakyLedger {
    pub inner: InMemoryLedger,
    claim_failures_left: AtomicUsize,
    purge_failures_left: AtomicUsize,
    pub purge_calls: AtomicUsize,
}

impl FlakyLedger {
    pub fn new(lease_window: Duration, claim_failures: usize, purge_failures: usize) -> Self {
        Self {
            inner: InMemoryLedger::new(lease_window),
            claim_failures_left: AtomicUsize::new(claim_failures),
            purge_failures_left: AtomicUsize::new(purge_failures),
            purge_calls: AtomicUsize::new(0),
        }
    }

    fn take_failure(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl ObjectLedger for FlakyLedger {
    fn lease_window(&self) -> Duration {
        self.inner.lease_window()
    }

    async fn upsert_ingested(&self, ids: &[ObjectId]) -> Result<usize, StorageError> {
        self.inner.upsert_ingested(ids).await
    }

    async fn claim_batch(&self, limit: usize) -> Result<Vec<ObjectId>, StorageError> {
        if Self::take_failure(&self.claim_failures_left) {
            return Err(StorageError::new("connection reset"));
        }
        self.inner.claim_batch(limit).await
    }

    async fn resolve_online(&self, id: ObjectId) -> Result<(), StorageError> {
        self.inner.resolve_online(id).await
    }

    async fn remove(&self, id: ObjectId) -> Result<bool, StorageError> {
        self.inner.remove(id).await
    }

    async fn purge_expired(&self, max_age: Duration) -> Result<u64, StorageError> {
        self.purge_calls.fetch_add(1, Ordering::SeqCst);
        if Self::take_failure(&self.purge_failures_left) {
            return Err(StorageError::new("connection reset"));
        }
        self.inner.purge_expired(max_age).await
    }

    async fn find(&self, id: ObjectId) -> Result<Option<TrackedObject>, StorageError> {
        self.inner.find(id).await
    }
}

/// 包装内存台账：第一次认领到空批次时，模拟一次恰好在此刻到达的接入。
pub struct LateArrivalLedger {
    pub inner: InMemoryLedger,
    debouncer: Arc<Debouncer>,
    late_id: Mutex<Option<ObjectId>>,
}

impl LateArrivalLedger {
    pub fn new(lease_window: Duration, debouncer: Arc<Debouncer>, late_id: ObjectId) -> Self {
        Self {
            inner: InMemoryLedger::new(lease_window),
            debouncer,
            late_id: Mutex::new(Some(late_id)),
        }
    }
}

#[async_trait]
impl ObjectLedger for LateArrivalLedger {
    fn lease_window(&self) -> Duration {
        self.inner.lease_window()
    }

    async fn upsert_ingested(&self, ids: &[ObjectId]) -> Result<usize, StorageError> {
        self.inner.upsert_ingested(ids).await
    }

    async fn claim_batch(&self, limit: usize) -> Result<Vec<ObjectId>, StorageError> {
        let ids = self.inner.claim_batch(limit).await?;
        if ids.is_empty() {
            let late_id = self.late_id.lock().expect("late id").take();
            if let Some(late_id) = late_id {
                self.inner.upsert_ingested(&[late_id]).await?;
                self.debouncer.trigger();
            }
        }
        Ok(ids)
    }

    async fn resolve_online(&self, id: ObjectId) -> Result<(), StorageError> {
        self.inner.resolve_online(id).await
    }

    async fn remove(&self, id: ObjectId) -> Result<bool, StorageError> {
        self.inner.remove(id).await
    }

    async fn purge_expired(&self, max_age: Duration) -> Result<u64, StorageError> {
        self.inner.purge_expired(max_age).await
    }

    async fn find(&self, id: ObjectId) -> Result<Option<TrackedObject>, StorageError> {
        self.inner.find(id).await
    }
}

/// 轮询直到条件成立或超时。
pub async fn eventually<F, Fut>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if check().await {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
