//! SQL 脱敏引擎
//!
//! 对外入口 [`SqlSanitizer`]：
//! - `sanitize`: 脱敏文本 + 操作名 / 集合名 / 存储过程名
//! - `sanitize_with_summary`: 额外生成查询摘要，使用独立的缓存
//!
//! 任何输入都不会报错，无法识别的结构只会得到更多的 `None`。
//!
//! # 使用示例
//!
//! ```rust
//! use sqlscrub::{Dialect, SqlSanitizer};
//!
//! let query = SqlSanitizer::global()
//!     .sanitize_with_summary(Some("SELECT * FROM users WHERE id = 42"), Dialect::default());
//! assert_eq!(query.query_text.as_deref(), Some("SELECT * FROM users WHERE id = ?"));
//! assert_eq!(query.query_summary.as_deref(), Some("SELECT users"));
//! ```

mod analyzer;
mod scanner;

use crate::data::cache::{Flavor, QueryCaches};
use crate::models::{Dialect, SanitizedQuery, SanitizerConfig};
use crate::utils::text::truncate_at_char_boundary;
use analyzer::analyze;
use once_cell::sync::Lazy;
use scanner::{tokenize, Token, TokenKind};
use std::sync::Arc;

/// 全局脱敏器实例
static GLOBAL_SANITIZER: Lazy<SqlSanitizer> = Lazy::new(|| {
    let config = SanitizerConfig::default()
        .with_env_overrides()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "脱敏配置环境变量无效，使用默认配置");
            SanitizerConfig::default()
        });
    SqlSanitizer::new(config)
});

/// SQL 脱敏器
///
/// 持有两份有界缓存（普通 / 带摘要），可在多线程间共享。
#[derive(Debug)]
pub struct SqlSanitizer {
    config: SanitizerConfig,
    caches: QueryCaches,
}

impl SqlSanitizer {
    pub fn new(config: SanitizerConfig) -> Self {
        tracing::debug!(
            cache_capacity = config.cache_capacity,
            cache_bypass_threshold = config.cache_bypass_threshold,
            sanitization_enabled = config.statement_sanitization_enabled,
            "初始化 SQL 脱敏器"
        );
        let caches = QueryCaches::new(config.cache_capacity, config.cache_bypass_threshold);
        Self { config, caches }
    }

    /// 进程级实例，默认配置叠加 `SQLSCRUB_*` 环境变量
    pub fn global() -> &'static SqlSanitizer {
        &GLOBAL_SANITIZER
    }

    pub fn config(&self) -> &SanitizerConfig {
        &self.config
    }

    /// 脱敏单条语句（不含摘要）
    pub fn sanitize(&self, text: Option<&str>, dialect: Dialect) -> Arc<SanitizedQuery> {
        self.sanitize_flavor(Flavor::Plain, text, dialect)
    }

    /// 脱敏单条语句并生成查询摘要
    pub fn sanitize_with_summary(
        &self,
        text: Option<&str>,
        dialect: Dialect,
    ) -> Arc<SanitizedQuery> {
        self.sanitize_flavor(Flavor::WithSummary, text, dialect)
    }

    /// 探测某条语句是否已在对应缓存中
    pub fn is_cached(&self, flavor: Flavor, text: &str, dialect: Dialect) -> bool {
        self.caches.is_cached(flavor, text, dialect)
    }

    pub fn cached_len(&self, flavor: Flavor) -> usize {
        self.caches.len(flavor)
    }

    /// 清空缓存（配置热切换或测试时使用）
    pub fn clear_caches(&self) {
        self.caches.clear();
    }

    fn sanitize_flavor(
        &self,
        flavor: Flavor,
        text: Option<&str>,
        dialect: Dialect,
    ) -> Arc<SanitizedQuery> {
        let Some(text) = text else {
            return Arc::new(SanitizedQuery::default());
        };
        self.caches.get_or_compute(flavor, text, dialect, || {
            tracing::trace!(len = text.len(), ?flavor, "缓存未命中，脱敏语句");
            self.sanitize_uncached(text, dialect, flavor)
        })
    }

    fn sanitize_uncached(&self, text: &str, dialect: Dialect, flavor: Flavor) -> SanitizedQuery {
        let tokens = tokenize(text, dialect);
        let analysis = analyze(&tokens, self.config.summary_max_len);

        let limit = self.config.query_text_limit;
        let query_text = if !self.config.statement_sanitization_enabled {
            let mut raw = text.to_string();
            truncate_at_char_boundary(&mut raw, limit);
            raw
        } else if let Some(tail) = analysis.masked_tail {
            // 敏感语句之前的部分照常脱敏，从敏感语句起整体替换
            let cut = tokens
                .iter()
                .position(|t| t.start >= tail.start)
                .unwrap_or(tokens.len());
            let mut out = render(&tokens[..cut], limit);
            out.push_str(&tail.replacement);
            truncate_at_char_boundary(&mut out, limit);
            out
        } else {
            render(&tokens, limit)
        };

        SanitizedQuery {
            query_text: Some(query_text),
            operation_name: analysis.operation_name,
            collection_name: analysis.collection_name,
            stored_procedure_name: analysis.stored_procedure_name,
            query_summary: match flavor {
                Flavor::Plain => None,
                Flavor::WithSummary => analysis.summary,
            },
        }
    }
}

/// 统计文本中的 `?` 占位符，字符串与注释里的不计
pub fn count_placeholders(text: &str, dialect: Dialect) -> usize {
    tokenize(text, dialect)
        .iter()
        .filter(|t| t.kind == TokenKind::Marker && t.text == "?")
        .count()
}

/// 把词元重新拼接为脱敏文本
fn render(tokens: &[Token<'_>], limit: usize) -> String {
    let mut out = String::new();
    let mut i = 0;

    while i < tokens.len() && out.len() < limit {
        let token = tokens[i];
        i += 1;
        match token.kind {
            TokenKind::Space => out.push(' '),
            TokenKind::StringLit | TokenKind::Number => out.push('?'),
            TokenKind::Word if token.text.eq_ignore_ascii_case("IN") => {
                out.push_str(token.text);
                if let Some(end) = in_list_end(tokens, i) {
                    if tokens[i].kind == TokenKind::Space {
                        out.push(' ');
                    }
                    out.push_str("(?)");
                    i = end;
                }
            }
            _ => out.push_str(token.text),
        }
    }

    truncate_at_char_boundary(&mut out, limit);
    out
}

/// `IN (...)` 中只有字面量和占位符时，返回右括号之后的位置
fn in_list_end(tokens: &[Token<'_>], mut i: usize) -> Option<usize> {
    if tokens.get(i)?.kind == TokenKind::Space {
        i += 1;
    }
    if !tokens.get(i)?.is_punct('(') {
        return None;
    }
    i += 1;

    let mut values = 0;
    loop {
        let token = tokens.get(i)?;
        match token.kind {
            TokenKind::Space => {}
            TokenKind::StringLit | TokenKind::Number | TokenKind::Marker => values += 1,
            TokenKind::Punct if token.text == "," => {}
            TokenKind::Punct if token.text == ")" => return (values > 0).then_some(i + 1),
            _ => return None,
        }
        i += 1;
    }
}
