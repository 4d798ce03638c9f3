//! 统一错误类型定义
//!
//! 脱敏、对账、命名三条主路径永不返回错误；这里的错误只来自配置加载与日志初始化之前的校验。

use std::path::PathBuf;
use thiserror::Error;

/// 配置层的统一错误类型
#[derive(Error, Debug)]
pub enum ScrubError {
    /// 文件 I/O 错误
    #[error("文件 I/O 错误: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML 反序列化错误
    #[error("TOML 反序列化错误: {0}")]
    TomlDeserialization(#[from] toml::de::Error),

    /// 配置值非法
    #[error("无效的配置: {0}")]
    InvalidConfig(String),

    /// 环境变量无法解析
    #[error("无效的环境变量 {name}: {value}")]
    InvalidEnv { name: String, value: String },
}

pub type Result<T> = std::result::Result<T, ScrubError>;

impl ScrubError {
    /// 从 `std::io::Error` 和路径创建 I/O 错误
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
