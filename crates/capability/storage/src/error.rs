//! 存储层错误类型
//!
//! 定义统一的存储错误类型：
//! - NotFound：目标记录不存在（并发删除时属于预期情况）
//! - Backend：SQL 执行、连接、锁等底层错误

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("record not found")]
    NotFound,
    #[error("{0}")]
    Backend(String),
}

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// 是否为记录不存在（调用方通常按成功处理）。
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        Self::new(err.to_string())
    }
}
