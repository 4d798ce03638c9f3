use serde::{Deserialize, Serialize};

/// SQL 方言配置
///
/// 只区分一个维度：双引号包裹的内容是标识符还是字符串字面量。
/// PostgreSQL / Oracle / DB2 一类数据库把 `"..."` 当作标识符，其余默认当作字符串。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Dialect {
    pub double_quotes_are_identifiers: bool,
}

impl Dialect {
    /// 默认方言：双引号为字符串字面量（会被脱敏）
    pub const STRING_LITERALS: Dialect = Dialect {
        double_quotes_are_identifiers: false,
    };

    /// 双引号为标识符（原样保留）
    pub const IDENTIFIERS: Dialect = Dialect {
        double_quotes_are_identifiers: true,
    };

    /// 根据数据库系统名称选择方言
    ///
    /// 未知系统一律使用默认方言。
    pub fn for_system(system_name: &str) -> Dialect {
        match system_name.to_ascii_lowercase().as_str() {
            "postgresql" | "oracle" | "db2" | "ibm_db2" | "h2" | "hsqldb" | "derby"
            | "cockroachdb" => Dialect::IDENTIFIERS,
            _ => Dialect::STRING_LITERALS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_is_string_literals() {
        assert_eq!(Dialect::default(), Dialect::STRING_LITERALS);
    }

    #[test]
    fn test_equality_and_hash_by_value() {
        let mut set = HashSet::new();
        set.insert(Dialect::IDENTIFIERS);
        set.insert(Dialect {
            double_quotes_are_identifiers: true,
        });
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_for_system() {
        assert_eq!(Dialect::for_system("PostgreSQL"), Dialect::IDENTIFIERS);
        assert_eq!(Dialect::for_system("mysql"), Dialect::STRING_LITERALS);
        assert_eq!(Dialect::for_system(""), Dialect::STRING_LITERALS);
    }
}
