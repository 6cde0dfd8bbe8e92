//! # PostgreSQL 存储实现模块
//!
//! 本模块提供台账的 PostgreSQL 实现，用于生产环境。
//!
//! ## 数据库模式要求
//!
//! 依赖 `tracked_objects` 表（见 `sql/schema.sql`，启动时由
//! [`crate::connection::ensure_schema`] 创建）：
//!
//! - `id bigint primary key`
//! - `online boolean`（null 表示尚未探测出结果）
//! - `resolved boolean not null default false`
//! - `received_at timestamptz not null default now()`
//! - `updated_at timestamptz`（最近一次认领时间，即租约）
//!
//! ## 索引
//! - `tracked_objects_received_at_idx`：过期回收按 `received_at` 扫描
//! - `tracked_objects_updated_at_idx`：认领按租约筛选
//!
//! ## 并发
//!
//! 认领语句在子查询中 `for update skip locked`，多个进程或任务同时认领时
//! 互相跳过对方锁定的行；行锁只在单条语句内持有，不跨越 await。
//!
//! ## 错误处理
//!
//! - `sqlx::Error` 自动转换为 `StorageError::Backend`
//! - 标记在线时目标行不存在返回 `StorageError::NotFound`
//! - 删除不存在的行不是错误，返回 `false`

pub mod ledger;

pub use ledger::*;
