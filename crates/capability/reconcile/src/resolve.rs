//! 单个对象的探测与写回。

use domain::ObjectId;
use tracing::{debug, info, warn};
use tracker_probe::StatusProbe;
use tracker_storage::ObjectLedger;
use tracker_telemetry::{
    record_probe_failure, record_removed_offline, record_resolve_race, record_resolved_online,
    record_storage_failure,
};

/// 一次探测任务的结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// 探测在线，已写回
    Online,
    /// 探测离线，已删除
    Removed,
    /// 写回时对象已不存在（过期回收或其它探测先完成）
    Vanished,
    /// 探测失败，等待租约过期后重新认领
    ProbeFailed,
    /// 写回失败，等待租约过期后重新认领
    StorageFailed,
}

/// 探测对象状态并写回台账。
///
/// 失败不重试：对象保持未解析，租约过期后由下一轮对账重新认领。
pub async fn resolve_object(
    ledger: &dyn ObjectLedger,
    probe: &dyn StatusProbe,
    id: ObjectId,
) -> ResolutionOutcome {
    let status = match probe.probe(id).await {
        Ok(status) => status,
        Err(err) => {
            record_probe_failure();
            warn!(target: "tracker.reconcile", object_id = id, error = %err, "probe_failed");
            return ResolutionOutcome::ProbeFailed;
        }
    };
    if status.id != id {
        debug!(
            target: "tracker.reconcile",
            object_id = id,
            reported_id = status.id,
            "probe_id_mismatch"
        );
    }

    if status.online {
        return match ledger.resolve_online(id).await {
            Ok(()) => {
                record_resolved_online();
                info!(target: "tracker.reconcile", object_id = id, "object_resolved_online");
                ResolutionOutcome::Online
            }
            Err(err) if err.is_not_found() => {
                record_resolve_race();
                debug!(target: "tracker.reconcile", object_id = id, "object_vanished");
                ResolutionOutcome::Vanished
            }
            Err(err) => {
                record_storage_failure();
                warn!(
                    target: "tracker.reconcile",
                    object_id = id,
                    error = %err,
                    "resolve_online_failed"
                );
                ResolutionOutcome::StorageFailed
            }
        };
    }

    match ledger.remove(id).await {
        Ok(true) => {
            record_removed_offline();
            info!(target: "tracker.reconcile", object_id = id, "object_removed_offline");
            ResolutionOutcome::Removed
        }
        Ok(false) => {
            record_resolve_race();
            debug!(target: "tracker.reconcile", object_id = id, "object_vanished");
            ResolutionOutcome::Vanished
        }
        Err(err) => {
            record_storage_failure();
            warn!(
                target: "tracker.reconcile",
                object_id = id,
                error = %err,
                "remove_offline_failed"
            );
            ResolutionOutcome::StorageFailed
        }
    }
}
