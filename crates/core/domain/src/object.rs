/// 外部系统分配的对象标识。
pub type ObjectId = i64;

/// 台账中的被追踪对象。
///
/// - `online`：`None` 表示尚未探测出结果
/// - `resolved`：自最近一次接入后是否已探测成功
/// - `received_at_ms`：最近一次接入（新建或重新接入）的时间
/// - `updated_at_ms`：最近一次认领的时间，从未认领时为 `None`
///
/// 离线对象不会以 `online = Some(false)` 的形式保留，探测为离线即删除。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedObject {
    pub id: ObjectId,
    pub online: Option<bool>,
    pub resolved: bool,
    pub received_at_ms: i64,
    pub updated_at_ms: Option<i64>,
}

impl TrackedObject {
    /// 新接入的对象：未解析、未认领。
    pub fn ingested(id: ObjectId, now_ms: i64) -> Self {
        Self {
            id,
            online: None,
            resolved: false,
            received_at_ms: now_ms,
            updated_at_ms: None,
        }
    }

    /// 重新接入：重置为未解析并刷新接入时间。
    ///
    /// 已解析的对象清空租约，可立即被重新认领；未解析对象的租约保持不变，
    /// 正在进行的认领仍然有效。
    pub fn reingest(&mut self, now_ms: i64) {
        if self.resolved {
            self.updated_at_ms = None;
        }
        self.resolved = false;
        self.received_at_ms = now_ms;
    }

    /// 是否可以被认领：未解析，且从未认领或租约已过期。
    pub fn is_claimable(&self, now_ms: i64, lease_window_ms: i64) -> bool {
        if self.resolved {
            return false;
        }
        match self.updated_at_ms {
            None => true,
            Some(updated_at_ms) => updated_at_ms < now_ms.saturating_sub(lease_window_ms),
        }
    }

    /// 接入时间是否早于 `now - max_age`。
    pub fn is_expired(&self, now_ms: i64, max_age_ms: i64) -> bool {
        self.received_at_ms < now_ms.saturating_sub(max_age_ms)
    }

    /// 标记为在线并刷新 `updated_at_ms`。
    pub fn mark_online(&mut self, now_ms: i64) {
        self.online = Some(true);
        self.resolved = true;
        self.updated_at_ms = Some(now_ms);
    }
}

/// 远端状态服务的成功响应。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeStatus {
    pub id: ObjectId,
    pub online: bool,
}
