//! HTTP 响应辅助函数和 DTO 转换
//!
//! 所有错误返回统一的 ApiResponse 格式，HTTP 状态码与错误码对应。

use api_contract::{ApiResponse, MetricsSnapshotDto, TrackedObjectDto};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::TrackedObject;
use tracing::warn;
use tracker_storage::StorageError;
use tracker_telemetry::MetricsSnapshot;

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error("INVALID.REQUEST", message.into())),
    )
        .into_response()
}

/// 资源未找到错误响应
pub fn not_found_error() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error("RESOURCE.NOT_FOUND", "not found")),
    )
        .into_response()
}

/// 存储错误响应
pub fn storage_error(err: StorageError) -> Response {
    warn!(target: "tracker.api", error = %err, "storage_request_failed");
    let message = err.to_string();
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error("INTERNAL.ERROR", message)),
    )
        .into_response()
}

/// TrackedObject 转 TrackedObjectDto
pub fn object_to_dto(object: TrackedObject) -> TrackedObjectDto {
    TrackedObjectDto {
        id: object.id,
        online: object.online,
        resolved: object.resolved,
        received_at_ms: object.received_at_ms,
        updated_at_ms: object.updated_at_ms,
    }
}

/// MetricsSnapshot 转 MetricsSnapshotDto
pub fn metrics_to_dto(snapshot: MetricsSnapshot) -> MetricsSnapshotDto {
    MetricsSnapshotDto {
        objects_ingested: snapshot.objects_ingested,
        sweeps_started: snapshot.sweeps_started,
        objects_claimed: snapshot.objects_claimed,
        probe_failures: snapshot.probe_failures,
        resolved_online: snapshot.resolved_online,
        removed_offline: snapshot.removed_offline,
        resolve_races: snapshot.resolve_races,
        storage_failures: snapshot.storage_failures,
        objects_purged: snapshot.objects_purged,
    }
}
