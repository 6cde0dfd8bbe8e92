//! 对象状态查询 handler
//!
//! GET /objects/{id}：离线对象已被删除，过期对象已被回收，二者都返回 404。

use crate::AppState;
use crate::utils::response::{bad_request_error, not_found_error, object_to_dto, storage_error};
use api_contract::ApiResponse;
use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::ObjectId;

/// 获取对象状态
pub async fn get_object(
    State(state): State<AppState>,
    path: Result<Path<ObjectId>, PathRejection>,
) -> Response {
    let Path(object_id) = match path {
        Ok(path) => path,
        Err(_) => return bad_request_error("object_id must be an integer"),
    };
    match state.ledger.find(object_id).await {
        Ok(Some(object)) => (
            StatusCode::OK,
            Json(ApiResponse::success(object_to_dto(object))),
        )
            .into_response(),
        Ok(None) => not_found_error(),
        Err(err) => storage_error(err),
    }
}
