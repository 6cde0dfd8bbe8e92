//! 对象在线状态追踪服务：HTTP 接入、对账循环、过期回收的装配与优雅退出。

mod handlers;
mod middleware;
mod routes;
mod utils;

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{info, warn};
use tracker_config::{ConfigError, StorageBackend, TrackerConfig};
use tracker_probe::{HttpProbeConfig, HttpStatusProbe, StatusProbe};
use tracker_reconcile::{
    Debouncer, ExpiryReaper, ReaperPolicy, ReconcilePolicy, ReconciliationLoop,
};
use tracker_storage::{InMemoryLedger, ObjectLedger, PgLedger, connect_pool, ensure_schema};
use tracker_telemetry::init_tracing;

/// 应用状态
///
/// 台账与防抖器在接入侧和对账循环之间共享。
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<dyn ObjectLedger>,
    pub debouncer: Arc<Debouncer>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = TrackerConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    // 连接或表结构初始化失败直接退出
    let ledger = build_ledger(&config).await?;
    let probe: Arc<dyn StatusProbe> = Arc::new(HttpStatusProbe::new(HttpProbeConfig {
        base_url: config.probe_base_url.clone(),
        timeout: config.probe_timeout(),
    })?);
    let debouncer = Arc::new(Debouncer::new());
    let shutdown = CancellationToken::new();

    let reconcile = Arc::new(ReconciliationLoop::new(
        ledger.clone(),
        probe,
        debouncer.clone(),
        ReconcilePolicy {
            batch_size: config.claim_batch_size,
            claim_retry_delay: config.claim_retry_delay(),
        },
        shutdown.clone(),
    ));
    let reaper = ExpiryReaper::new(
        ledger.clone(),
        ReaperPolicy {
            interval: config.reaper_interval(),
            max_age: config.expiry_age(),
        },
        shutdown.clone(),
    );

    let background = TaskTracker::new();
    {
        let reconcile = reconcile.clone();
        background.spawn(async move { reconcile.run().await });
    }
    background.spawn(async move { reaper.run().await });
    background.close();

    let app = routes::create_router(AppState { ledger, debouncer });
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!(
        target: "tracker.api",
        addr = %config.http_addr,
        probe_base_url = %config.probe_base_url,
        "tracker_listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 先停止后台循环，再等待已派发的探测任务结束
    shutdown.cancel();
    background.wait().await;
    reconcile.drain().await;
    info!(target: "tracker.api", "tracker_stopped");
    Ok(())
}

async fn build_ledger(
    config: &TrackerConfig,
) -> Result<Arc<dyn ObjectLedger>, Box<dyn std::error::Error>> {
    match config.storage_backend {
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| ConfigError::Missing("TRACKER_DATABASE_URL".to_string()))?;
            let pool = connect_pool(database_url, config.database_max_connections).await?;
            ensure_schema(&pool).await?;
            Ok(Arc::new(PgLedger::new(pool, config.lease_window())))
        }
        StorageBackend::Memory => {
            warn!(target: "tracker.api", "memory_ledger_in_use");
            Ok(Arc::new(InMemoryLedger::new(config.lease_window())))
        }
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!(target: "tracker.api", "shutdown_requested"),
        Err(err) => {
            // 无法监听信号时保持运行
            warn!(target: "tracker.api", error = %err, "ctrl_c_listener_failed");
            std::future::pending::<()>().await;
        }
    }
}
