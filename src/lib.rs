// lib.rs - SQL 语句脱敏与数据库 span 命名
//
// 分层结构：
// - core: 日志等基础设施
// - data: 错误类型与缓存
// - models: 值类型与配置
// - services: 脱敏、批量对账、span 命名、属性填充
// - utils: 通用小工具

pub mod core;
pub mod data;
pub mod models;
pub mod services;
pub mod utils;

pub use core::{init_logger, update_log_level};
pub use data::cache::Flavor;
pub use data::{Result, ScrubError};
pub use models::*;
pub use services::{
    AttributeValue, Attributes, NamingMode, RequestMemo, SpanNameInput, SqlSanitizer,
};

use std::sync::Arc;

/// 使用全局脱敏器脱敏单条语句
pub fn sanitize(text: Option<&str>, dialect: Dialect) -> Arc<SanitizedQuery> {
    SqlSanitizer::global().sanitize(text, dialect)
}

/// 使用全局脱敏器脱敏单条语句并生成摘要
pub fn sanitize_with_summary(text: Option<&str>, dialect: Dialect) -> Arc<SanitizedQuery> {
    SqlSanitizer::global().sanitize_with_summary(text, dialect)
}

/// 使用全局脱敏器对账一批语句
pub fn reconcile_batch<I, S>(texts: I, dialect: Dialect, sanitize: bool) -> BatchResult
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    services::reconcile_batch(SqlSanitizer::global(), texts, dialect, sanitize)
}

/// 解析 span 名称
pub fn resolve_span_name(mode: NamingMode, input: &SpanNameInput) -> String {
    services::resolve_span_name(mode, input)
}
