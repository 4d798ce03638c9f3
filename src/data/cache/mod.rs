//! 缓存层实现
//!
//! - `lru`: 通用 LRU 缓存（容量限制）
//! - `bounded`: 线程安全的有界缓存（compute-if-absent + 旁路规则）
//! - `query_cache`: SQL 脱敏结果缓存（普通 / 带摘要两份）

pub mod bounded;
pub mod lru;
pub mod query_cache;

pub use bounded::BoundedCache;
pub use lru::LruCache;
pub use query_cache::{CacheKey, Flavor, QueryCaches};
