//! 稳定的 DTO 与 API 响应契约。

use serde::{Deserialize, Serialize};

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// 接入回调请求体。
///
/// 上游以 `object_ids` 推送，兼容 camelCase。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackRequest {
    #[serde(alias = "object_ids")]
    pub object_ids: Vec<i64>,
}

/// 接入回调响应体。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackAccepted {
    /// 去重后写入台账的对象数量
    pub received: usize,
}

/// 对象状态返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedObjectDto {
    pub id: i64,
    pub online: Option<bool>,
    pub resolved: bool,
    pub received_at_ms: i64,
    pub updated_at_ms: Option<i64>,
}

/// 计数器快照返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshotDto {
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
