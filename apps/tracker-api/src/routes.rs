//! 路由定义
//!
//! - 健康检查：/health
//! - 接入回调：POST /callback
//! - 状态查询：GET /objects/{id}
//! - 计数器快照：GET /metrics

use super::AppState;
use super::handlers::*;
use super::middleware::request_context;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// 创建应用路由（已注入状态与请求上下文中间件）
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/callback", post(callback))
        .route("/objects/:object_id", get(get_object))
        .route("/metrics", get(get_metrics))
        .with_state(state)
        // 注入 request_id/trace_id
        .layer(middleware::from_fn(request_context))
}
