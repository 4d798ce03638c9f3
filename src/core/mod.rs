//! 核心基础设施层
//!
//! - `logger`: 日志系统初始化与级别热重载

pub mod logger;

pub use logger::{init_logger, update_log_level};
