//! 台账接口 Trait 定义
//!
//! 设计原则：
//! - 所有写操作都是单条语句/单个临界区，不跨越 await 持有锁
//! - 认领（claim）自带租约：认领时写入 `updated_at`，租约窗口内不会被再次认领
//! - 所有接口返回 StorageError
//! - 使用 async_trait 支持动态分发

use crate::error::StorageError;
use async_trait::async_trait;
use domain::{ObjectId, TrackedObject};
use std::time::Duration;

/// 对象台账接口
#[async_trait]
pub trait ObjectLedger: Send + Sync {
    /// 认领租约窗口：超过该时长仍未解析的对象可被再次认领。
    fn lease_window(&self) -> Duration;

    /// 写入接入的对象
    ///
    /// 新对象直接插入；已存在的对象重置为未解析并刷新接入时间。
    /// 输入可包含重复 id，返回去重后的写入数量。空输入不访问存储。
    async fn upsert_ingested(&self, ids: &[ObjectId]) -> Result<usize, StorageError>;

    /// 认领一批待探测对象
    ///
    /// 选出至多 `limit` 个未解析且租约为空或已过期的对象，写入 `updated_at = now`
    /// 后返回其 id。并发认领互不重叠，也互不阻塞。没有可认领对象时返回空列表。
    async fn claim_batch(&self, limit: usize) -> Result<Vec<ObjectId>, StorageError>;

    /// 标记对象在线
    ///
    /// 对象已被删除时返回 `StorageError::NotFound`。
    async fn resolve_online(&self, id: ObjectId) -> Result<(), StorageError>;

    /// 删除对象（幂等），返回删除前是否存在。
    async fn remove(&self, id: ObjectId) -> Result<bool, StorageError>;

    /// 删除接入时间早于 `now - max_age` 的所有对象，返回删除数量。
    async fn purge_expired(&self, max_age: Duration) -> Result<u64, StorageError>;

    /// 按 id 查询对象
    async fn find(&self, id: ObjectId) -> Result<Option<TrackedObject>, StorageError>;
}
