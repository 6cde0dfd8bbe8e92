//! 接入回调 handler
//!
//! POST /callback：批量写入台账（去重、重置为未解析），随后唤醒对账循环。
//! 写入成功即返回，探测结果不回传给调用方。

use crate::AppState;
use crate::utils::response::{bad_request_error, storage_error};
use api_contract::{ApiResponse, CallbackAccepted, CallbackRequest};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::info;
use tracker_telemetry::record_objects_ingested;

/// 接入对象 id 批次
pub async fn callback(
    State(state): State<AppState>,
    payload: Result<Json<CallbackRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request_error(rejection.body_text()),
    };
    let received = match state.ledger.upsert_ingested(&req.object_ids).await {
        Ok(received) => received,
        Err(err) => return storage_error(err),
    };
    record_objects_ingested(received as u64);
    // 空批次不唤醒
    let woke = received > 0 && state.debouncer.trigger();
    info!(
        target: "tracker.api",
        submitted = req.object_ids.len(),
        received,
        woke,
        "objects_ingested"
    );
    (
        StatusCode::OK,
        Json(ApiResponse::success(CallbackAccepted { received })),
    )
        .into_response()
}
