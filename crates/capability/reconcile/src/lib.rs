//! 对账能力：防抖触发、批量认领 + 并发探测、过期回收。
//!
//! - [`Debouncer`]：接入侧调用 `trigger()`，对账循环是唯一消费者
//! - [`ReconciliationLoop`]：认领批次并为每个对象派发探测任务
//! - [`resolve_object`]：单个对象的探测与写回
//! - [`ExpiryReaper`]：周期性删除过期对象
//!
//! 台账通过 `Arc<dyn ObjectLedger>` 显式注入各组件。

pub mod debounce;
pub mod reaper;
pub mod resolve;
pub mod sweep;

pub use debounce::Debouncer;
pub use reaper::{ExpiryReaper, ReaperPolicy};
pub use resolve::{ResolutionOutcome, resolve_object};
pub use sweep::{ReconcilePolicy, ReconciliationLoop, SweepReport};
