//! Handlers 模块

pub mod callback;
pub mod health;
pub mod metrics;
pub mod objects;

pub use callback::*;
pub use health::*;
pub use metrics::*;
pub use objects::*;
