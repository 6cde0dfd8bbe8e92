//! 台账内存实现
//!
//! 仅用于本地演示和测试。
//!
//! 认领在同一把写锁内完成“筛选 + 写租约”，等价于行级 skip-locked：
//! 并发认领被串行化，后到者只能看到已写入的租约，不会拿到重复 id。

use crate::error::StorageError;
use crate::traits::ObjectLedger;
use crate::validation::unique_ids;
use domain::{ObjectId, TrackedObject, now_epoch_ms};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

/// 对象台账内存存储
///
/// 使用 RwLock + HashMap 提供线程安全的内存存储。
pub struct InMemoryLedger {
    objects: RwLock<HashMap<ObjectId, TrackedObject>>,
    lease_window: Duration,
}

impl InMemoryLedger {
    pub fn new(lease_window: Duration) -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            lease_window,
        }
    }

    /// 当前对象数量
    pub fn len(&self) -> usize {
        self.objects.read().map(|map| map.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn duration_ms(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

#[async_trait::async_trait]
impl ObjectLedger for InMemoryLedger {
    fn lease_window(&self) -> Duration {
        self.lease_window
    }

    async fn upsert_ingested(&self, ids: &[ObjectId]) -> Result<usize, StorageError> {
        let ids = unique_ids(ids);
        if ids.is_empty() {
            return Ok(0);
        }
        let now_ms = now_epoch_ms();
        let mut map = self
            .objects
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        for id in &ids {
            map.entry(*id)
                .and_modify(|object| object.reingest(now_ms))
                .or_insert_with(|| TrackedObject::ingested(*id, now_ms));
        }
        Ok(ids.len())
    }

    async fn claim_batch(&self, limit: usize) -> Result<Vec<ObjectId>, StorageError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let now_ms = now_epoch_ms();
        let lease_window_ms = duration_ms(self.lease_window);
        let mut map = self
            .objects
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let mut candidates: Vec<(i64, ObjectId)> = map
            .values()
            .filter(|object| object.is_claimable(now_ms, lease_window_ms))
            .map(|object| (object.received_at_ms, object.id))
            .collect();
        candidates.sort_unstable();
        candidates.truncate(limit);

        let mut claimed = Vec::with_capacity(candidates.len());
        for (_, id) in candidates {
            if let Some(object) = map.get_mut(&id) {
                object.updated_at_ms = Some(now_ms);
                claimed.push(id);
            }
        }
        Ok(claimed)
    }

    async fn resolve_online(&self, id: ObjectId) -> Result<(), StorageError> {
        let now_ms = now_epoch_ms();
        let mut map = self
            .objects
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let object = map.get_mut(&id).ok_or(StorageError::NotFound)?;
        object.mark_online(now_ms);
        Ok(())
    }

    async fn remove(&self, id: ObjectId) -> Result<bool, StorageError> {
        let mut map = self
            .objects
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map.remove(&id).is_some())
    }

    async fn purge_expired(&self, max_age: Duration) -> Result<u64, StorageError> {
        let now_ms = now_epoch_ms();
        let max_age_ms = duration_ms(max_age);
        let mut map = self
            .objects
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let before = map.len();
        map.retain(|_, object| !object.is_expired(now_ms, max_age_ms));
        Ok((before - map.len()) as u64)
    }

    async fn find(&self, id: ObjectId) -> Result<Option<TrackedObject>, StorageError> {
        let map = self
            .objects
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map.get(&id).cloned())
    }
}
