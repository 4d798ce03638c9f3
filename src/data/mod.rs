//! 数据层
//!
//! - `error`: 统一错误类型定义
//! - `cache`: 缓存层实现（LRU + 有界缓存 + 脱敏结果缓存）

pub mod cache;
pub mod error;

pub use error::{Result, ScrubError};
