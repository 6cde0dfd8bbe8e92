//! 数据库连接管理
//!
//! - connect_pool：建立 Postgres 连接池
//! - ensure_schema：创建台账表与索引（幂等）

use crate::error::StorageError;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// 台账表结构。
///
/// `received_at` 与 `updated_at` 上的索引分别服务于过期回收与认领查询。
pub const SCHEMA: &str = include_str!("../sql/schema.sql");

/// 建立 Postgres 连接池
///
/// # 参数
/// - `database_url`：Postgres 连接字符串
/// - `max_connections`：最大连接数
pub async fn connect_pool(database_url: &str, max_connections: u32) -> Result<PgPool, StorageError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// 创建台账表与索引（`if not exists`，可重复执行）。
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StorageError> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}
