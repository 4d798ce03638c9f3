//! 批量语句对账
//!
//! 一个批次里的每条语句分别脱敏，再用 [`UniqueValue`] 合并结构字段：
//! 全部语句一致时字段保留，任意两条不一致时整个批次的该字段为 `None`。

use crate::models::{batch_prefixed, BatchResult, Dialect};
use crate::services::sanitizer::SqlSanitizer;
use crate::utils::UniqueValue;
use std::collections::HashSet;

/// 对一组语句做批量对账
///
/// # 参数
///
/// - `texts`: 原始语句，按执行顺序
/// - `sanitize`: 为 `false` 时 `statement_texts` 记录原文而不是脱敏文本
pub fn reconcile_batch<I, S>(
    sanitizer: &SqlSanitizer,
    texts: I,
    dialect: Dialect,
    sanitize: bool,
) -> BatchResult
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut procedure = UniqueValue::new();
    let mut summary = UniqueValue::new();
    let mut operation = UniqueValue::new();
    let mut collection = UniqueValue::new();
    let mut statement_texts = Vec::new();
    let mut seen = HashSet::new();
    let mut batch_size = 0;

    for raw in texts {
        let raw = raw.as_ref();
        batch_size += 1;
        let query = sanitizer.sanitize_with_summary(Some(raw), dialect);

        procedure.set(query.stored_procedure_name.clone());
        summary.set(query.query_summary.clone());
        operation.set(query.operation_name.clone());
        collection.set(query.collection_name.clone());

        let text = if sanitize {
            query.query_text.clone().unwrap_or_default()
        } else {
            raw.to_string()
        };
        if seen.insert(text.clone()) {
            statement_texts.push(text);
        }
    }

    let summary = summary.into_inner();
    let operation = operation.into_inner();
    tracing::trace!(
        batch_size,
        distinct = statement_texts.len(),
        summary = summary.as_deref(),
        "批量语句对账完成"
    );

    BatchResult {
        stored_procedure_name: procedure.into_inner(),
        statement_texts,
        query_summary: Some(batch_prefixed(summary.as_deref())),
        operation_name: Some(batch_prefixed(operation.as_deref())),
        collection_name: collection.into_inner(),
        batch_size,
    }
}
