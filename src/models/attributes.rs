//! 数据库 span 属性键
//!
//! 稳定版与旧版两套命名约定并存，调用方按 [`NamingMode`](crate::services::span_name::NamingMode) 选择。

/// 稳定版属性键
pub mod stable {
    pub const DB_QUERY_TEXT: &str = "db.query.text";
    pub const DB_QUERY_SUMMARY: &str = "db.query.summary";
    pub const DB_OPERATION_NAME: &str = "db.operation.name";
    pub const DB_COLLECTION_NAME: &str = "db.collection.name";
    pub const DB_STORED_PROCEDURE_NAME: &str = "db.stored_procedure.name";
    pub const DB_OPERATION_BATCH_SIZE: &str = "db.operation.batch.size";
    pub const DB_QUERY_PARAMETER_PREFIX: &str = "db.query.parameter";
}

/// 旧版属性键
pub mod legacy {
    pub const DB_STATEMENT: &str = "db.statement";
    pub const DB_OPERATION: &str = "db.operation";
    pub const DB_SQL_TABLE: &str = "db.sql.table";
}

/// 所有约定都缺失信息时使用的 span 名称
pub const DEFAULT_SPAN_NAME: &str = "DB Query";
