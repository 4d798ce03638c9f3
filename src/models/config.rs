// 脱敏引擎与日志系统的配置结构，构造时确定，运行期不可变
use crate::data::{Result, ScrubError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 单个缓存的默认容量
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;
/// 超过该字节数的语句不进入缓存
pub const DEFAULT_CACHE_BYPASS_THRESHOLD: usize = 10 * 1024;
/// 脱敏文本的最大字节数
pub const DEFAULT_QUERY_TEXT_LIMIT: usize = 32 * 1024;
/// 查询摘要的最大字符数
pub const DEFAULT_SUMMARY_MAX_LEN: usize = 255;

/// 脱敏引擎配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizerConfig {
    /// 关闭后 `query_text` 保留原文，结构信息仍然提取
    pub statement_sanitization_enabled: bool,
    pub cache_capacity: usize,
    pub cache_bypass_threshold: usize,
    pub query_text_limit: usize,
    pub summary_max_len: usize,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            statement_sanitization_enabled: true,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            cache_bypass_threshold: DEFAULT_CACHE_BYPASS_THRESHOLD,
            query_text_limit: DEFAULT_QUERY_TEXT_LIMIT,
            summary_max_len: DEFAULT_SUMMARY_MAX_LEN,
        }
    }
}

impl SanitizerConfig {
    /// 从 TOML 文本解析，缺省字段使用默认值
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SanitizerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件加载
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ScrubError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    /// 用 `SQLSCRUB_*` 环境变量覆盖当前配置
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Some(enabled) = env_value::<bool>("SQLSCRUB_SANITIZATION_ENABLED")? {
            self.statement_sanitization_enabled = enabled;
        }
        if let Some(capacity) = env_value::<usize>("SQLSCRUB_CACHE_CAPACITY")? {
            self.cache_capacity = capacity;
        }
        if let Some(threshold) = env_value::<usize>("SQLSCRUB_CACHE_BYPASS_THRESHOLD")? {
            self.cache_bypass_threshold = threshold;
        }
        if let Some(limit) = env_value::<usize>("SQLSCRUB_QUERY_TEXT_LIMIT")? {
            self.query_text_limit = limit;
        }
        if let Some(max_len) = env_value::<usize>("SQLSCRUB_SUMMARY_MAX_LEN")? {
            self.summary_max_len = max_len;
        }
        self.validate()?;
        Ok(self)
    }

    /// 校验配置取值
    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == 0 {
            return Err(ScrubError::InvalidConfig(
                "cache_capacity 必须大于 0".to_string(),
            ));
        }
        if self.query_text_limit == 0 {
            return Err(ScrubError::InvalidConfig(
                "query_text_limit 必须大于 0".to_string(),
            ));
        }
        if self.summary_max_len == 0 {
            return Err(ScrubError::InvalidConfig(
                "summary_max_len 必须大于 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_value<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ScrubError::InvalidEnv {
                name: name.to_string(),
                value: raw,
            }),
        Err(_) => Ok(None),
    }
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ScrubError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ScrubError::InvalidConfig(format!("无效的日志级别: {}", s))),
        }
    }
}

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// 日志输出目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Console,
    File,
    Both,
}

/// 日志配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
    /// 日志目录，`None` 时使用 `~/.sqlscrub/logs`
    pub file_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SanitizerConfig::default();
        assert!(config.statement_sanitization_enabled);
        assert_eq!(config.cache_capacity, 1000);
        assert_eq!(config.cache_bypass_threshold, 10 * 1024);
        assert_eq!(config.query_text_limit, 32 * 1024);
        assert_eq!(config.summary_max_len, 255);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = SanitizerConfig::from_toml_str(
            r#"
            cache_capacity = 64
            statement_sanitization_enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.cache_capacity, 64);
        assert!(!config.statement_sanitization_enabled);
        assert_eq!(config.summary_max_len, DEFAULT_SUMMARY_MAX_LEN);
    }

    #[test]
    fn test_from_toml_rejects_zero_capacity() {
        let err = SanitizerConfig::from_toml_str("cache_capacity = 0").unwrap_err();
        assert!(matches!(err, ScrubError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sqlscrub.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "summary_max_len = 100").unwrap();

        let config = SanitizerConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.summary_max_len, 100);
    }

    #[test]
    fn test_from_missing_file() {
        let err = SanitizerConfig::from_toml_file(Path::new("/nonexistent/sqlscrub.toml"))
            .unwrap_err();
        assert!(matches!(err, ScrubError::Io { .. }));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        std::env::set_var("SQLSCRUB_CACHE_CAPACITY", "12");
        std::env::set_var("SQLSCRUB_SANITIZATION_ENABLED", "false");
        let config = SanitizerConfig::default().with_env_overrides().unwrap();
        std::env::remove_var("SQLSCRUB_CACHE_CAPACITY");
        std::env::remove_var("SQLSCRUB_SANITIZATION_ENABLED");

        assert_eq!(config.cache_capacity, 12);
        assert!(!config.statement_sanitization_enabled);
    }

    #[test]
    #[serial]
    fn test_env_override_invalid_value() {
        std::env::set_var("SQLSCRUB_SUMMARY_MAX_LEN", "long");
        let result = SanitizerConfig::default().with_env_overrides();
        std::env::remove_var("SQLSCRUB_SUMMARY_MAX_LEN");

        assert!(matches!(result, Err(ScrubError::InvalidEnv { .. })));
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert!("verbose".parse::<LogLevel>().is_err());
        assert_eq!(LogLevel::Warn.as_str(), "warn");
    }

    #[test]
    fn test_log_config_deserialize() {
        let config: LogConfig = toml::from_str(
            r#"
            level = "debug"
            format = "json"
            output = "both"
            "#,
        )
        .unwrap();
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.output, LogOutput::Both);
        assert!(config.file_path.is_none());
    }
}
