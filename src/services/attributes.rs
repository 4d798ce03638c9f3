//! span 属性填充
//!
//! 把脱敏结果 / 批量对账结果转换为 `(属性键, 值)` 列表，键名按 [`NamingMode`] 选择。
//! 缺失的字段不产生属性。

use crate::models::attributes::{legacy, stable};
use crate::models::{BatchResult, Dialect, SanitizedQuery};
use crate::services::sanitizer::count_placeholders;
use crate::services::span_name::NamingMode;
use serde::Serialize;

/// 属性值
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Str(String),
    Int(i64),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Str(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Str(value)
    }
}

pub type Attributes = Vec<(&'static str, AttributeValue)>;

fn push_str(attributes: &mut Attributes, key: &'static str, value: Option<&str>) {
    if let Some(value) = value {
        attributes.push((key, value.into()));
    }
}

/// 单条语句的属性
pub fn query_attributes(mode: NamingMode, query: &SanitizedQuery) -> Attributes {
    let mut attributes = Attributes::new();
    match mode {
        NamingMode::Stable => {
            push_str(&mut attributes, stable::DB_QUERY_TEXT, query.query_text.as_deref());
            push_str(&mut attributes, stable::DB_QUERY_SUMMARY, query.query_summary.as_deref());
            push_str(&mut attributes, stable::DB_OPERATION_NAME, query.operation_name.as_deref());
            push_str(&mut attributes, stable::DB_COLLECTION_NAME, query.collection_name.as_deref());
            push_str(
                &mut attributes,
                stable::DB_STORED_PROCEDURE_NAME,
                query.stored_procedure_name.as_deref(),
            );
        }
        NamingMode::Legacy => {
            push_str(&mut attributes, legacy::DB_STATEMENT, query.query_text.as_deref());
            push_str(&mut attributes, legacy::DB_OPERATION, query.operation_name.as_deref());
            push_str(&mut attributes, legacy::DB_SQL_TABLE, query.collection_name.as_deref());
        }
    }
    attributes
}

/// 批量语句的属性
///
/// 只有一条语句时不记录批量大小。
pub fn batch_attributes(mode: NamingMode, batch: &BatchResult) -> Attributes {
    let text = batch.joined_text();
    let mut attributes = Attributes::new();
    match mode {
        NamingMode::Stable => {
            push_str(&mut attributes, stable::DB_QUERY_TEXT, text.as_deref());
            push_str(&mut attributes, stable::DB_QUERY_SUMMARY, batch.query_summary.as_deref());
            push_str(&mut attributes, stable::DB_OPERATION_NAME, batch.operation_name.as_deref());
            push_str(&mut attributes, stable::DB_COLLECTION_NAME, batch.collection_name.as_deref());
            push_str(
                &mut attributes,
                stable::DB_STORED_PROCEDURE_NAME,
                batch.stored_procedure_name.as_deref(),
            );
            if batch.batch_size > 1 {
                let size = i64::try_from(batch.batch_size).unwrap_or(i64::MAX);
                attributes.push((stable::DB_OPERATION_BATCH_SIZE, AttributeValue::Int(size)));
            }
        }
        NamingMode::Legacy => {
            push_str(&mut attributes, legacy::DB_STATEMENT, text.as_deref());
            push_str(&mut attributes, legacy::DB_OPERATION, batch.operation_name.as_deref());
            push_str(&mut attributes, legacy::DB_SQL_TABLE, batch.collection_name.as_deref());
        }
    }
    attributes
}

/// 第 `index` 个（从 0 开始）占位符对应的参数属性键
pub fn parameter_attribute_key(index: usize) -> String {
    format!("{}.{index}", stable::DB_QUERY_PARAMETER_PREFIX)
}

/// 脱敏文本中的占位符个数
pub fn placeholder_count(text: &str) -> usize {
    count_placeholders(text, Dialect::default())
}

/// 按占位符顺序生成参数属性，多余的参数值被丢弃
pub fn parameter_attributes<I, V>(query_text: &str, values: I) -> Vec<(String, AttributeValue)>
where
    I: IntoIterator<Item = V>,
    V: Into<AttributeValue>,
{
    values
        .into_iter()
        .take(placeholder_count(query_text))
        .enumerate()
        .map(|(index, value)| (parameter_attribute_key(index), value.into()))
        .collect()
}
