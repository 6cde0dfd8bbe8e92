//! 单槽防抖触发器。
//!
//! 任意多次 `trigger()` 最多只留下一个待消费的唤醒；对账进行中的触发被吸收，
//! 但会让本轮对账在结束前再做一次确认认领，避免与最后一次空认领赛跑的接入被遗漏。

use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct DebounceState {
    pending: bool,
    sweeping: bool,
    /// 对账进行中收到过触发
    absorbed: bool,
}

/// 合并触发信号，唯一消费者为对账循环。
#[derive(Debug, Default)]
pub struct Debouncer {
    state: Mutex<DebounceState>,
    notify: Notify,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 非阻塞触发。
    ///
    /// 已有待消费唤醒或正在对账时不产生新的唤醒；返回本次是否挂起了新的唤醒。
    pub fn trigger(&self) -> bool {
        let mut state = self.lock();
        if state.sweeping {
            state.absorbed = true;
            return false;
        }
        if state.pending {
            return false;
        }
        state.pending = true;
        drop(state);
        self.notify.notify_one();
        true
    }

    /// 等待唤醒并消费，返回后进入对账状态。
    pub async fn wait_and_consume(&self) {
        loop {
            let notified = self.notify.notified();
            {
                let mut state = self.lock();
                if state.pending {
                    state.pending = false;
                    state.sweeping = true;
                    state.absorbed = false;
                    return;
                }
            }
            notified.await;
        }
    }

    /// 结束对账。
    ///
    /// 对账期间吸收过触发时返回 `true` 并保持对账状态，调用方应再认领一轮；
    /// 否则回到空闲并返回 `false`。
    pub fn end_sweep(&self) -> bool {
        let mut state = self.lock();
        if state.absorbed {
            state.absorbed = false;
            return true;
        }
        state.sweeping = false;
        false
    }

    /// 中途放弃对账（如收到停止信号）：立即回到空闲。
    ///
    /// 对账期间吸收过的触发转为待消费唤醒，不会丢失。
    pub fn abort_sweep(&self) {
        let mut state = self.lock();
        state.sweeping = false;
        if !std::mem::take(&mut state.absorbed) || state.pending {
            return;
        }
        state.pending = true;
        drop(state);
        self.notify.notify_one();
    }

    pub fn is_pending(&self) -> bool {
        self.lock().pending
    }

    pub fn is_sweeping(&self) -> bool {
        self.lock().sweeping
    }

    fn lock(&self) -> MutexGuard<'_, DebounceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
