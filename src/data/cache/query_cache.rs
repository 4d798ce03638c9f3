//! SQL 脱敏结果缓存
//!
//! 两个相互独立的有界缓存：
//! - `plain`: 仅脱敏结果
//! - `with_summary`: 带查询摘要的结果
//!
//! 键为 `(语句文本, 方言)`；超过旁路阈值的语句不进入任何缓存。

use super::BoundedCache;
use crate::models::{Dialect, SanitizedQuery};
use std::sync::Arc;

/// 缓存键
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct CacheKey {
    pub text: String,
    pub dialect: Dialect,
}

impl CacheKey {
    pub fn new(text: impl Into<String>, dialect: Dialect) -> Self {
        Self {
            text: text.into(),
            dialect,
        }
    }
}

/// 缓存的结果种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flavor {
    Plain,
    WithSummary,
}

type QueryCache = BoundedCache<CacheKey, Arc<SanitizedQuery>>;

/// 脱敏结果缓存对
#[derive(Debug)]
pub struct QueryCaches {
    plain: QueryCache,
    with_summary: QueryCache,
    bypass_threshold: usize,
}

impl QueryCaches {
    /// 创建缓存对
    ///
    /// # 参数
    ///
    /// - `capacity`: 每个缓存的最大条目数
    /// - `bypass_threshold`: 文本字节数超过该值时旁路
    pub fn new(capacity: usize, bypass_threshold: usize) -> Self {
        Self {
            // 旁路在构造键之前判断，内层缓存不再重复检查
            plain: BoundedCache::without_bypass(capacity),
            with_summary: BoundedCache::without_bypass(capacity),
            bypass_threshold,
        }
    }

    /// 查询或计算
    pub fn get_or_compute<F>(
        &self,
        flavor: Flavor,
        text: &str,
        dialect: Dialect,
        compute: F,
    ) -> Arc<SanitizedQuery>
    where
        F: FnOnce() -> SanitizedQuery,
    {
        // 旁路时连键都不构造，避免复制超大文本
        if text.len() > self.bypass_threshold {
            tracing::trace!(len = text.len(), "语句超过缓存阈值，直接脱敏");
            return Arc::new(compute());
        }
        self.cache(flavor)
            .get_or_compute(CacheKey::new(text, dialect), |_| Arc::new(compute()))
    }

    /// 探测是否已缓存
    pub fn is_cached(&self, flavor: Flavor, text: &str, dialect: Dialect) -> bool {
        if text.len() > self.bypass_threshold {
            return false;
        }
        self.cache(flavor).contains(&CacheKey::new(text, dialect))
    }

    pub fn len(&self, flavor: Flavor) -> usize {
        self.cache(flavor).len()
    }

    pub fn capacity(&self) -> usize {
        self.plain.capacity()
    }

    pub fn bypass_threshold(&self) -> usize {
        self.bypass_threshold
    }

    /// 清空两个缓存
    pub fn clear(&self) {
        self.plain.clear();
        self.with_summary.clear();
    }

    fn cache(&self, flavor: Flavor) -> &QueryCache {
        match flavor {
            Flavor::Plain => &self.plain,
            Flavor::WithSummary => &self.with_summary,
        }
    }
}
