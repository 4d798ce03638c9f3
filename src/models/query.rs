use serde::{Deserialize, Serialize};

/// 单条语句的脱敏结果
///
/// 不变量：`collection_name` 与 `stored_procedure_name` 不会同时有值。
/// 实例构造后只读；缓存命中时多个调用方共享同一个 `Arc`。
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SanitizedQuery {
    /// 脱敏后的语句文本（字面量替换为 `?`）
    pub query_text: Option<String>,
    /// 大写的操作名，如 `SELECT`、`CREATE TABLE`
    pub operation_name: Option<String>,
    /// 目标表 / 集合名
    pub collection_name: Option<String>,
    /// 存储过程名
    pub stored_procedure_name: Option<String>,
    /// 结构化摘要，如 `SELECT users`
    pub query_summary: Option<String>,
}

impl SanitizedQuery {
    /// 只有文本、没有任何结构信息的结果（空输入、无法识别的输入）
    pub fn text_only(query_text: Option<String>) -> Self {
        Self {
            query_text,
            ..Default::default()
        }
    }

    /// 主标识符：优先集合名，其次存储过程名
    pub fn main_identifier(&self) -> Option<&str> {
        self.collection_name
            .as_deref()
            .or(self.stored_procedure_name.as_deref())
    }

    /// 去掉摘要后的副本（`sanitize` 与 `sanitize_with_summary` 的区别仅在于此）
    pub fn without_summary(&self) -> Self {
        Self {
            query_summary: None,
            ..self.clone()
        }
    }
}
