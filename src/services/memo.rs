//! 请求级脱敏结果备忘
//!
//! 由调用方在一次埋点调用开始时创建、结束时丢弃。同一请求内对同一段文本
//! 重复脱敏时直接复用结果，连共享缓存的加锁查询都省掉。
//!
//! 只在单线程内使用，不做同步。

use crate::data::cache::Flavor;
use crate::models::{Dialect, SanitizedQuery};
use crate::services::sanitizer::SqlSanitizer;
use std::collections::HashMap;
use std::sync::Arc;

/// 单次请求范围内的备忘表
#[derive(Debug, Default)]
pub struct RequestMemo {
    entries: HashMap<(Dialect, Flavor), HashMap<String, Arc<SanitizedQuery>>>,
}

impl RequestMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sanitize(
        &mut self,
        sanitizer: &SqlSanitizer,
        text: Option<&str>,
        dialect: Dialect,
    ) -> Arc<SanitizedQuery> {
        self.lookup(Flavor::Plain, text, dialect, |text| {
            sanitizer.sanitize(text, dialect)
        })
    }

    pub fn sanitize_with_summary(
        &mut self,
        sanitizer: &SqlSanitizer,
        text: Option<&str>,
        dialect: Dialect,
    ) -> Arc<SanitizedQuery> {
        self.lookup(Flavor::WithSummary, text, dialect, |text| {
            sanitizer.sanitize_with_summary(text, dialect)
        })
    }

    /// 已备忘的条目数（两种结果合计）
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup<F>(
        &mut self,
        flavor: Flavor,
        text: Option<&str>,
        dialect: Dialect,
        compute: F,
    ) -> Arc<SanitizedQuery>
    where
        F: FnOnce(Option<&str>) -> Arc<SanitizedQuery>,
    {
        // 空输入没有复用价值
        let Some(text) = text else {
            return compute(None);
        };

        let bucket = self.entries.entry((dialect, flavor)).or_default();
        if let Some(hit) = bucket.get(text) {
            return Arc::clone(hit);
        }
        let query = compute(Some(text));
        bucket.insert(text.to_string(), Arc::clone(&query));
        query
    }
}
