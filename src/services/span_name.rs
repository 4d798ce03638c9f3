//! 数据库 span 名称解析
//!
//! 两套命名约定同时存在，由 [`NamingMode`] 显式选择：
//! - `Legacy`: `<操作> <namespace>.<表名>`
//! - `Stable`: 优先使用查询摘要，否则 `<操作> <目标>`，目标依次取表名、存储过程、namespace、服务地址
//!
//! 每条分支都有兜底值，不会失败。

use crate::models::{BatchResult, SanitizedQuery, DEFAULT_SPAN_NAME};
use serde::{Deserialize, Serialize};

/// 命名约定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingMode {
    #[default]
    Stable,
    Legacy,
}

/// span 名称的输入
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanNameInput {
    pub operation_name: Option<String>,
    pub collection_name: Option<String>,
    pub stored_procedure_name: Option<String>,
    /// 仅 `Stable` 使用
    pub query_summary: Option<String>,
    pub namespace: Option<String>,
    pub server_address: Option<String>,
    pub server_port: Option<u16>,
    pub system_name: Option<String>,
}

impl SpanNameInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn operation(mut self, operation_name: impl Into<String>) -> Self {
        self.operation_name = Some(operation_name.into());
        self
    }

    pub fn collection(mut self, collection_name: impl Into<String>) -> Self {
        self.collection_name = Some(collection_name.into());
        self
    }

    pub fn stored_procedure(mut self, name: impl Into<String>) -> Self {
        self.stored_procedure_name = Some(name.into());
        self
    }

    pub fn summary(mut self, query_summary: impl Into<String>) -> Self {
        self.query_summary = Some(query_summary.into());
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn server(mut self, address: impl Into<String>, port: Option<u16>) -> Self {
        self.server_address = Some(address.into());
        self.server_port = port;
        self
    }

    pub fn system(mut self, system_name: impl Into<String>) -> Self {
        self.system_name = Some(system_name.into());
        self
    }

    /// 主标识符：集合名优先，其次存储过程名
    fn main_identifier(&self) -> Option<&str> {
        self.collection_name
            .as_deref()
            .or(self.stored_procedure_name.as_deref())
    }
}

impl From<&SanitizedQuery> for SpanNameInput {
    fn from(query: &SanitizedQuery) -> Self {
        Self {
            operation_name: query.operation_name.clone(),
            collection_name: query.collection_name.clone(),
            stored_procedure_name: query.stored_procedure_name.clone(),
            query_summary: query.query_summary.clone(),
            ..Default::default()
        }
    }
}

impl From<&BatchResult> for SpanNameInput {
    fn from(batch: &BatchResult) -> Self {
        Self {
            operation_name: batch.operation_name.clone(),
            collection_name: batch.collection_name.clone(),
            stored_procedure_name: batch.stored_procedure_name.clone(),
            query_summary: batch.query_summary.clone(),
            ..Default::default()
        }
    }
}

/// 解析 span 名称
pub fn resolve_span_name(mode: NamingMode, input: &SpanNameInput) -> String {
    match mode {
        NamingMode::Legacy => legacy_span_name(input),
        NamingMode::Stable => stable_span_name(input),
    }
}

fn legacy_span_name(input: &SpanNameInput) -> String {
    let Some(operation) = input.operation_name.as_deref() else {
        return input
            .namespace
            .clone()
            .unwrap_or_else(|| DEFAULT_SPAN_NAME.to_string());
    };

    let target = match (input.main_identifier(), input.namespace.as_deref()) {
        // 已经带点号的标识符视为完整限定名
        (Some(identifier), Some(namespace)) if !identifier.contains('.') => {
            Some(format!("{namespace}.{identifier}"))
        }
        (Some(identifier), _) => Some(identifier.to_string()),
        (None, Some(namespace)) => Some(namespace.to_string()),
        (None, None) => None,
    };

    match target {
        Some(target) => format!("{operation} {target}"),
        None => operation.to_string(),
    }
}

fn stable_span_name(input: &SpanNameInput) -> String {
    if let Some(summary) = input.query_summary.as_deref() {
        return summary.to_string();
    }

    let target = input
        .main_identifier()
        .or(input.namespace.as_deref())
        .map(str::to_string)
        .or_else(|| {
            input.server_address.as_deref().map(|address| match input.server_port {
                Some(port) => format!("{address}:{port}"),
                None => address.to_string(),
            })
        });

    match (input.operation_name.as_deref(), target) {
        (Some(operation), Some(target)) => format!("{operation} {target}"),
        (Some(operation), None) => operation.to_string(),
        (None, Some(target)) => target,
        (None, None) => input
            .system_name
            .clone()
            .unwrap_or_else(|| DEFAULT_SPAN_NAME.to_string()),
    }
}
