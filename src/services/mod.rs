// 服务层模块
//
// - sanitizer: 分词脱敏引擎（扫描器 + 结构分析 + 缓存）
// - batch: 批量语句对账
// - span_name: span 名称解析（稳定版 / 旧版）
// - memo: 请求级备忘
// - attributes: span 属性填充

pub mod attributes;
pub mod batch;
pub mod memo;
pub mod sanitizer;
pub mod span_name;

pub use attributes::{
    batch_attributes, parameter_attribute_key, parameter_attributes, placeholder_count,
    query_attributes, AttributeValue, Attributes,
};
pub use batch::reconcile_batch;
pub use memo::RequestMemo;
pub use sanitizer::SqlSanitizer;
pub use span_name::{resolve_span_name, NamingMode, SpanNameInput};
