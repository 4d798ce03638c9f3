use serde::{Deserialize, Serialize};

/// 批量语句的前缀
pub const BATCH_PREFIX: &str = "BATCH";

/// 批量语句对账结果
///
/// 各字段只在所有语句一致时保留，否则为 `None`（`query_summary` 退化为 `BATCH`）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    /// 所有语句一致的存储过程名
    pub stored_procedure_name: Option<String>,
    /// 语句文本，按首次出现顺序去重
    pub statement_texts: Vec<String>,
    /// `BATCH` 或 `BATCH <摘要>`
    pub query_summary: Option<String>,
    /// `BATCH` 或 `BATCH <操作名>`
    pub operation_name: Option<String>,
    /// 所有语句一致的集合名
    pub collection_name: Option<String>,
    /// 输入语句条数（含重复）
    pub batch_size: usize,
}

impl BatchResult {
    /// 以 `"; "` 拼接去重后的语句文本
    pub fn joined_text(&self) -> Option<String> {
        if self.statement_texts.is_empty() {
            None
        } else {
            Some(self.statement_texts.join("; "))
        }
    }
}

/// 给内部值加上 `BATCH` 前缀
pub fn batch_prefixed(inner: Option<&str>) -> String {
    match inner {
        Some(inner) if !inner.is_empty() => format!("{BATCH_PREFIX} {inner}"),
        _ => BATCH_PREFIX.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_prefixed() {
        assert_eq!(batch_prefixed(Some("INSERT t")), "BATCH INSERT t");
        assert_eq!(batch_prefixed(None), "BATCH");
        assert_eq!(batch_prefixed(Some("")), "BATCH");
    }

    #[test]
    fn test_joined_text() {
        let batch = BatchResult {
            statement_texts: vec!["INSERT INTO a VALUES(?)".into(), "INSERT INTO b VALUES(?)".into()],
            ..Default::default()
        };
        assert_eq!(
            batch.joined_text().as_deref(),
            Some("INSERT INTO a VALUES(?); INSERT INTO b VALUES(?)")
        );
        assert_eq!(BatchResult::default().joined_text(), None);
    }
}
