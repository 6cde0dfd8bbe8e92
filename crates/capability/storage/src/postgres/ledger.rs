//! Postgres 台账实现
//!
//! 设计要点：
//! - 接入使用单条 `insert ... on conflict do update`，写入前去重
//! - 认领使用 `for update skip locked`，并发认领跳过被锁定的行而不是等待
//! - 时间一律使用数据库的 `now()`，多实例共享同一时钟
//! - 所有 SQL 使用参数绑定

use crate::error::StorageError;
use crate::traits::ObjectLedger;
use crate::validation::unique_ids;
use domain::{ObjectId, TrackedObject};
use sqlx::{PgPool, Row};
use std::time::Duration;

pub struct PgLedger {
    pub pool: PgPool,
    lease_window: Duration,
}

impl PgLedger {
    pub fn new(pool: PgPool, lease_window: Duration) -> Self {
        Self { pool, lease_window }
    }

    /// 通过数据库 URL 建立连接池
    ///
    /// # 参数
    /// - `database_url`：Postgres 连接字符串
    /// - `max_connections`：最大连接数
    /// - `lease_window`：认领租约窗口
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        lease_window: Duration,
    ) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url, max_connections).await?;
        Ok(Self::new(pool, lease_window))
    }
}

#[async_trait::async_trait]
impl ObjectLedger for PgLedger {
    fn lease_window(&self) -> Duration {
        self.lease_window
    }

    /// 接入对象：新 id 插入，已存在的 id 重置为未解析（已解析的同时清空租约）
    async fn upsert_ingested(&self, ids: &[ObjectId]) -> Result<usize, StorageError> {
        let ids = unique_ids(ids);
        if ids.is_empty() {
            return Ok(0);
        }
        sqlx::query(
            "insert into tracked_objects (id) \
             select unnest($1::bigint[]) \
             on conflict (id) do update set \
                 received_at = now(), \
                 resolved = false, \
                 updated_at = case when tracked_objects.resolved then null \
                                   else tracked_objects.updated_at end",
        )
        .bind(&ids)
        .execute(&self.pool)
        .await?;
        Ok(ids.len())
    }

    /// 认领：先写租约再返回，租约窗口内同一对象不会被重复认领
    async fn claim_batch(&self, limit: usize) -> Result<Vec<ObjectId>, StorageError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query(
            "update tracked_objects set updated_at = now() \
             where id in ( \
                 select id from tracked_objects \
                 where resolved = false \
                   and (updated_at is null or updated_at < now() - make_interval(secs => $2)) \
                 order by received_at \
                 limit $1 \
                 for update skip locked \
             ) \
             returning id",
        )
        .bind(limit)
        .bind(self.lease_window.as_secs_f64())
        .fetch_all(&self.pool)
        .await?;
        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            ids.push(row.try_get("id")?);
        }
        Ok(ids)
    }

    /// 标记在线；行已被删除时返回 NotFound
    async fn resolve_online(&self, id: ObjectId) -> Result<(), StorageError> {
        let result = sqlx::query(
            "update tracked_objects set online = true, resolved = true, updated_at = now() \
             where id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn remove(&self, id: ObjectId) -> Result<bool, StorageError> {
        let result = sqlx::query("delete from tracked_objects where id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// 删除过期对象（不区分是否已解析、是否持有租约）
    async fn purge_expired(&self, max_age: Duration) -> Result<u64, StorageError> {
        let result = sqlx::query(
            "delete from tracked_objects where received_at < now() - make_interval(secs => $1)",
        )
        .bind(max_age.as_secs_f64())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn find(&self, id: ObjectId) -> Result<Option<TrackedObject>, StorageError> {
        let row = sqlx::query(
            "select id, online, resolved, \
             (extract(epoch from received_at) * 1000)::bigint as received_at_ms, \
             (extract(epoch from updated_at) * 1000)::bigint as updated_at_ms \
             from tracked_objects where id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(TrackedObject {
            id: row.try_get("id")?,
            online: row.try_get("online")?,
            resolved: row.try_get("resolved")?,
            received_at_ms: row.try_get("received_at_ms")?,
            updated_at_ms: row.try_get("updated_at_ms")?,
        }))
    }
}
