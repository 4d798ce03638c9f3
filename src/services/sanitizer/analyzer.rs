//! 语句结构分析
//!
//! 在有效词元（去掉空白与注释）上做一次线性扫描，识别：
//! - 主操作（首条语句的第一个关键字，DDL 带上对象类型）
//! - 目标表 / 存储过程名
//! - 查询摘要：按出现顺序排列的操作和表名，多条语句以 `; ` 连接
//!
//! 不做完整的语法分析；无法识别的结构只会让对应字段缺省，不会报错。

use super::scanner::{Token, TokenKind};
use crate::utils::text::unquote_identifier;
use std::collections::HashSet;

/// 分析结果
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Analysis {
    pub operation_name: Option<String>,
    pub collection_name: Option<String>,
    pub stored_procedure_name: Option<String>,
    pub summary: Option<String>,
    /// 第一条账号 / 连接类敏感语句
    pub masked_tail: Option<MaskedTail>,
}

/// 敏感语句从 `start` 字节处起整体替换为 `replacement`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MaskedTail {
    pub start: usize,
    pub replacement: String,
}

/// 结束 FROM 列表的子句关键字
const CLAUSE_KEYWORDS: &[&str] = &[
    "WHERE", "GROUP", "ORDER", "HAVING", "LIMIT", "OFFSET", "FETCH", "ON", "USING", "SET",
    "VALUES", "UNION", "INTERSECT", "EXCEPT", "MINUS", "RETURNING", "WINDOW", "FOR", "INTO",
];

/// CREATE 与对象类型之间可能出现的修饰词
const DDL_MODIFIERS: &[&str] = &[
    "OR", "REPLACE", "UNIQUE", "TEMP", "TEMPORARY", "MATERIALIZED", "GLOBAL", "LOCAL",
    "UNLOGGED", "CLUSTERED", "NONCLUSTERED",
];

const DDL_OBJECTS: &[&str] = &[
    "TABLE", "INDEX", "VIEW", "PROCEDURE", "PROC", "FUNCTION", "TRIGGER", "SCHEMA", "DATABASE",
    "SEQUENCE", "TYPE", "USER", "ROLE", "EXTENSION",
];

const TRANSACTION_OPS: &[&str] = &[
    "BEGIN", "START", "COMMIT", "ROLLBACK", "SAVEPOINT", "RELEASE",
];

/// 紧跟在 FROM / INTO 之后也不可能是表名的关键字
const NOT_A_NAME: &[&str] = &["SELECT", "VALUES", "WITH", "WHERE", "SET"];

fn is_any_keyword(token: &Token<'_>, keywords: &[&str]) -> bool {
    token.kind == TokenKind::Word && keywords.iter().any(|k| token.text.eq_ignore_ascii_case(k))
}

/// 分析一段已切分的语句
pub(crate) fn analyze(tokens: &[Token<'_>], summary_max_len: usize) -> Analysis {
    let significant: Vec<Token<'_>> = tokens
        .iter()
        .filter(|t| t.is_significant())
        .copied()
        .collect();
    Analyzer::new(significant, summary_max_len).run()
}

/// 摘要构造器：超出长度上限后丢弃后续片段，只按整词截断
#[derive(Debug)]
struct SummaryBuilder {
    text: String,
    char_len: usize,
    max_len: usize,
    statement_break: bool,
    full: bool,
}

impl SummaryBuilder {
    fn new(max_len: usize) -> Self {
        Self {
            text: String::new(),
            char_len: 0,
            max_len,
            statement_break: false,
            full: false,
        }
    }

    fn push(&mut self, part: &str) {
        if self.full || part.is_empty() {
            return;
        }
        let sep = match (self.text.is_empty(), self.statement_break) {
            (true, _) => "",
            (false, true) => "; ",
            (false, false) => " ",
        };
        let added = sep.len() + part.chars().count();
        if self.char_len + added > self.max_len {
            self.full = true;
            return;
        }
        self.text.push_str(sep);
        self.text.push_str(part);
        self.char_len += added;
        self.statement_break = false;
    }

    fn end_statement(&mut self) {
        if !self.text.is_empty() {
            self.statement_break = true;
        }
    }

    fn finish(self) -> Option<String> {
        (!self.text.is_empty()).then_some(self.text)
    }
}

/// 括号层级的状态
#[derive(Debug, Clone, Copy)]
struct Frame {
    /// FROM / JOIN 是否记录表名（UPDATE、DELETE 顶层在目标表之后关闭）
    tables_enabled: bool,
    /// 逗号是否引出下一个表
    in_from_list: bool,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            tables_enabled: true,
            in_from_list: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    /// FROM、JOIN 与逗号列表，计入单表判定
    Relation,
    /// CROSS / OUTER APPLY，只进摘要
    Apply,
}

/// 首条语句的主操作
#[derive(Debug)]
struct MainStatement {
    operation: String,
    /// 查询类语句的集合名由 FROM 列表推断
    select_like: bool,
    target: Option<String>,
    procedure: Option<String>,
}

impl MainStatement {
    fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            select_like: false,
            target: None,
            procedure: None,
        }
    }

    fn select() -> Self {
        Self {
            select_like: true,
            ..Self::new("SELECT")
        }
    }
}

struct Analyzer<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    cte_names: HashSet<String>,
    summary: SummaryBuilder,
    frames: Vec<Frame>,
    statement_index: usize,
    at_statement_start: bool,
    /// WITH 之后等待真正的主操作
    awaiting_main: bool,
    /// 语句剩余部分不再分析（SHOW、GRANT、敏感语句等）
    skip_rest: bool,
    main: Option<MainStatement>,
    select_count: usize,
    relation_names: Vec<String>,
    derived_source: bool,
    masked_tail: Option<MaskedTail>,
}

impl<'a> Analyzer<'a> {
    fn new(tokens: Vec<Token<'a>>, summary_max_len: usize) -> Self {
        let cte_names = collect_cte_names(&tokens);
        Self {
            tokens,
            pos: 0,
            cte_names,
            summary: SummaryBuilder::new(summary_max_len),
            frames: vec![Frame::default()],
            statement_index: 0,
            at_statement_start: true,
            awaiting_main: false,
            skip_rest: false,
            main: None,
            select_count: 0,
            relation_names: Vec::new(),
            derived_source: false,
            masked_tail: None,
        }
    }

    fn run(mut self) -> Analysis {
        while self.pos < self.tokens.len() {
            if self.at_statement_start {
                self.start_statement();
                continue;
            }
            let token = self.tokens[self.pos];
            self.pos += 1;
            self.visit(token);
        }
        self.finish()
    }

    fn finish(self) -> Analysis {
        let (operation_name, collection_name, stored_procedure_name) = match self.main {
            Some(main) if main.select_like => {
                let single = (self.select_count == 1
                    && !self.derived_source
                    && self.relation_names.len() == 1)
                    .then(|| clean_collection_name(&self.relation_names[0]));
                (Some(main.operation), single, None)
            }
            Some(main) => {
                let collection = main.target.as_deref().map(clean_collection_name);
                (Some(main.operation), collection, main.procedure)
            }
            None => (None, None, None),
        };

        Analysis {
            operation_name,
            // 存储过程语句不带集合名
            collection_name: if stored_procedure_name.is_some() {
                None
            } else {
                collection_name
            },
            stored_procedure_name,
            summary: self.summary.finish(),
            masked_tail: self.masked_tail,
        }
    }

    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<Token<'a>> {
        self.tokens.get(self.pos + offset).copied()
    }

    fn next_is_keyword(&self, keyword: &str) -> bool {
        self.peek().is_some_and(|t| t.is_keyword(keyword))
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.next_is_keyword(keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_keywords(&mut self, keywords: &[&str]) {
        while self.peek().is_some_and(|t| is_any_keyword(&t, keywords)) {
            self.pos += 1;
        }
    }

    fn frame_mut(&mut self) -> &mut Frame {
        if self.frames.is_empty() {
            self.frames.push(Frame::default());
        }
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    fn frame(&self) -> Frame {
        self.frames.last().copied().unwrap_or_default()
    }

    fn set_main(&mut self, main: MainStatement) {
        if self.statement_index == 0 && self.main.is_none() {
            self.main = Some(main);
        }
    }

    /// 敏感语句及其后的全部文本都不输出；只记录第一处
    fn mask_from(&mut self, first: Token<'a>, replacement: String) {
        if self.masked_tail.is_none() {
            self.masked_tail = Some(MaskedTail {
                start: first.start,
                replacement,
            });
        }
    }

    fn end_statement(&mut self) {
        self.summary.end_statement();
        self.frames = vec![Frame::default()];
        self.statement_index += 1;
        self.at_statement_start = true;
        self.awaiting_main = false;
        self.skip_rest = false;
    }

    fn visit(&mut self, token: Token<'a>) {
        if token.is_punct(';') {
            self.end_statement();
            return;
        }
        if self.skip_rest {
            return;
        }

        match token.kind {
            TokenKind::Punct => match token.text {
                "(" => self.frames.push(Frame::default()),
                ")" => {
                    if self.frames.len() > 1 {
                        self.frames.pop();
                    }
                }
                "," if self.frame().in_from_list => self.read_source(Source::Relation),
                _ => {}
            },
            TokenKind::Word => self.visit_word(token),
            _ => {}
        }
    }

    fn visit_word(&mut self, token: Token<'a>) {
        let word = token.text.to_ascii_uppercase();
        let top_level = self.frames.len() == 1;

        match word.as_str() {
            "SELECT" => self.visit_select(),
            "INSERT" | "UPDATE" | "DELETE" | "MERGE" if self.awaiting_main && top_level => {
                self.awaiting_main = false;
                self.parse_statement(&word, token);
            }
            "FROM" | "JOIN" if self.frame().tables_enabled => {
                self.frame_mut().in_from_list = true;
                self.read_source(Source::Relation);
            }
            "APPLY" if self.frame().tables_enabled => self.read_source(Source::Apply),
            _ if CLAUSE_KEYWORDS.contains(&word.as_str()) => {
                self.frame_mut().in_from_list = false;
            }
            _ => {}
        }
    }

    fn visit_select(&mut self) {
        self.select_count += 1;
        self.summary.push("SELECT");
        if self.awaiting_main && self.frames.len() == 1 {
            self.awaiting_main = false;
            self.set_main(MainStatement::select());
        }
        let frame = self.frame_mut();
        frame.tables_enabled = true;
        frame.in_from_list = false;
    }

    fn start_statement(&mut self) {
        self.at_statement_start = false;

        // JDBC 转义语法：`{call p(?)}`、`{? = call f(?)}`
        while self
            .peek()
            .is_some_and(|t| t.is_punct('{') || t.is_punct('=') || t.kind == TokenKind::Marker)
        {
            self.pos += 1;
        }

        // 非单词开头（括号、数字等）不识别主操作，交给常规扫描
        let Some(first) = self.peek().filter(|t| t.kind == TokenKind::Word) else {
            return;
        };
        self.pos += 1;
        let word = first.text.to_ascii_uppercase();
        self.parse_statement(&word, first);
    }

    fn parse_statement(&mut self, word: &str, first: Token<'a>) {
        match word {
            "SELECT" => {
                self.awaiting_main = true;
                self.visit_select();
            }
            // HQL 允许省略 SELECT
            "FROM" => {
                self.select_count += 1;
                self.summary.push("SELECT");
                self.set_main(MainStatement::select());
                self.frame_mut().in_from_list = true;
                self.read_source(Source::Relation);
            }
            "WITH" => self.awaiting_main = true,
            "EXPLAIN" => {
                self.summary.push("EXPLAIN");
                self.skip_keywords(&["ANALYZE", "VERBOSE"]);
                self.at_statement_start = true;
            }
            "INSERT" | "REPLACE" | "UPSERT" | "MERGE" => self.parse_insert(word),
            "UPDATE" => self.parse_update(),
            "DELETE" => self.parse_delete(),
            "CALL" | "EXEC" | "EXECUTE" => self.parse_call(word),
            "CREATE" | "DROP" | "ALTER" => self.parse_ddl(word, first),
            "TRUNCATE" => self.parse_truncate(),
            "USE" => {
                self.summary.push("USE");
                if let Some(name) = self.read_name() {
                    self.summary.push(&name);
                }
                self.set_main(MainStatement::new("USE"));
                self.skip_rest = true;
            }
            "LOCK" => self.parse_lock(),
            "VALUES" => {
                self.summary.push("VALUES");
                self.set_main(MainStatement::new("VALUES"));
            }
            "CONNECT" => {
                self.mask_from(first, format!("{} ?", first.text));
                self.op_only("CONNECT");
            }
            _ if TRANSACTION_OPS.contains(&word) => {
                let operation = match self.peek() {
                    Some(t) if is_any_keyword(&t, &["TRANSACTION", "WORK", "TRAN"]) => {
                        self.pos += 1;
                        format!("{word} {}", t.text.to_ascii_uppercase())
                    }
                    _ => word.to_string(),
                };
                self.op_only(&operation);
            }
            // 无法识别的首词原样大写作为操作名
            _ => self.op_only(word),
        }
    }

    /// 只有操作名、不再分析剩余部分的语句
    fn op_only(&mut self, operation: &str) {
        self.summary.push(operation);
        self.set_main(MainStatement::new(operation));
        self.skip_rest = true;
    }

    fn parse_insert(&mut self, word: &str) {
        self.summary.push(word);
        let found_into = if word == "INSERT" {
            self.seek_into()
        } else {
            self.eat_keyword("INTO");
            true
        };

        let mut main = MainStatement::new(word);
        if found_into {
            main.target = self.read_name();
            if let Some(target) = &main.target {
                self.summary.push(target);
            }
        }
        if word == "MERGE" {
            self.frame_mut().tables_enabled = false;
        }
        self.set_main(main);
    }

    /// INSERT 与 INTO 之间允许出现修饰词（`INSERT IGNORE INTO`）
    fn seek_into(&mut self) -> bool {
        let mut offset = 0;
        while let Some(token) = self.peek_at(offset) {
            if token.is_keyword("INTO") {
                self.pos += offset + 1;
                return true;
            }
            if token.kind != TokenKind::Word
                || is_any_keyword(&token, &["VALUES", "SELECT", "SET", "DEFAULT"])
            {
                return false;
            }
            offset += 1;
        }
        false
    }

    fn parse_update(&mut self) {
        self.summary.push("UPDATE");
        self.skip_keywords(&["ONLY", "LOW_PRIORITY", "IGNORE"]);
        let mut main = MainStatement::new("UPDATE");
        main.target = self.read_name();
        if let Some(target) = &main.target {
            self.summary.push(target);
        }
        self.frame_mut().tables_enabled = false;
        self.set_main(main);
    }

    fn parse_delete(&mut self) {
        self.summary.push("DELETE");
        self.skip_keywords(&["LOW_PRIORITY", "QUICK", "IGNORE"]);
        if self.eat_keyword("FROM") {
            self.skip_keywords(&["ONLY"]);
        }
        // MySQL 多表删除 `DELETE t1 FROM t1 JOIN t2` 以第一个名字为目标
        let mut main = MainStatement::new("DELETE");
        main.target = self.read_name();
        if let Some(target) = &main.target {
            self.summary.push(target);
        }
        self.frame_mut().tables_enabled = false;
        self.set_main(main);
    }

    fn parse_call(&mut self, word: &str) {
        self.summary.push(word);
        let mut main = MainStatement::new(word);

        let is_sequence = word == "CALL"
            && self.next_is_keyword("NEXT")
            && self.peek_at(1).is_some_and(|t| t.is_keyword("VALUE"))
            && self.peek_at(2).is_some_and(|t| t.is_keyword("FOR"));
        if is_sequence {
            self.pos += 3;
            if let Some(sequence) = self.read_name() {
                self.summary.push(&sequence);
            }
        } else {
            main.procedure = self.read_name();
            if let Some(procedure) = &main.procedure {
                self.summary.push(procedure);
            }
        }

        self.set_main(main);
        self.skip_rest = true;
    }

    fn parse_ddl(&mut self, word: &str, first: Token<'a>) {
        self.skip_keywords(DDL_MODIFIERS);
        let Some(object) = self.peek().filter(|t| is_any_keyword(t, DDL_OBJECTS)) else {
            self.op_only(word);
            return;
        };
        let object_kind = object.text.to_ascii_uppercase();

        if object_kind == "USER" && word != "DROP" {
            self.mask_from(first, format!("{} {} ?", first.text, object.text));
            self.op_only(word);
            return;
        }

        self.pos += 1;
        let operation = format!("{word} {object_kind}");
        self.summary.push(&operation);
        if self.eat_keyword("IF") {
            self.eat_keyword("NOT");
            self.eat_keyword("EXISTS");
        }

        let name = self.read_name();
        if let Some(name) = &name {
            self.summary.push(name);
        }
        let mut main = MainStatement::new(operation);
        if object_kind == "TABLE" {
            main.target = name;
        }
        self.set_main(main);
    }

    fn parse_truncate(&mut self) {
        let operation = if self.eat_keyword("TABLE") {
            "TRUNCATE TABLE"
        } else {
            "TRUNCATE"
        };
        self.summary.push(operation);
        let mut main = MainStatement::new(operation);
        main.target = self.read_name();
        if let Some(target) = &main.target {
            self.summary.push(target);
        }
        self.set_main(main);
        self.skip_rest = true;
    }

    fn parse_lock(&mut self) {
        let operation = match self.peek() {
            Some(t) if is_any_keyword(&t, &["TABLE", "TABLES"]) => {
                self.pos += 1;
                format!("LOCK {}", t.text.to_ascii_uppercase())
            }
            _ => "LOCK".to_string(),
        };
        self.summary.push(&operation);
        let mut main = MainStatement::new(operation);
        main.target = self.read_name();
        if let Some(target) = &main.target {
            self.summary.push(target);
        }
        self.set_main(main);
        self.skip_rest = true;
    }

    /// FROM / JOIN / 逗号之后的数据源
    fn read_source(&mut self, source: Source) {
        self.skip_keywords(&["ONLY", "LATERAL"]);
        let Some(next) = self.peek() else {
            return;
        };

        if next.is_punct('(') {
            if let Some(name) = self.parenthesized_name() {
                self.record_source(name, source);
            } else if source == Source::Relation {
                // 子查询或 VALUES 派生表，括号交给常规扫描
                self.derived_source = true;
            }
            return;
        }

        if let Some(name) = self.read_name() {
            self.record_source(name, source);
        }
    }

    /// `FROM (users)` 这种只包了一个名字的括号
    fn parenthesized_name(&mut self) -> Option<String> {
        let name = self.peek_at(1)?;
        let close = self.peek_at(2)?;
        if !name.is_name_part() || is_any_keyword(&name, NOT_A_NAME) || !close.is_punct(')') {
            return None;
        }
        self.pos += 3;
        Some(name.text.to_string())
    }

    fn record_source(&mut self, name: String, source: Source) {
        if !self.cte_names.contains(&normalize_name(&name)) {
            self.summary.push(&name);
        }
        if source == Source::Relation {
            self.relation_names.push(name);
        }
    }

    /// 读取限定名：`a.b.c`，以及紧跟的 Oracle 数据库链接 `@link`
    fn read_name(&mut self) -> Option<String> {
        let first = self
            .peek()
            .filter(|t| t.is_name_part() && !is_any_keyword(t, NOT_A_NAME))?;
        self.pos += 1;
        let mut name = first.text.to_string();
        let mut last = first;

        while let (Some(sep), Some(part)) = (self.peek(), self.peek_at(1)) {
            if sep.is_punct('.') && (part.is_name_part() || part.is_punct('*')) {
                name.push('.');
                name.push_str(part.text);
            } else if sep.is_punct('@')
                && part.kind == TokenKind::Word
                && last.touches(&sep)
                && sep.touches(&part)
            {
                name.push('@');
                name.push_str(part.text);
                self.pos += 2;
                break;
            } else {
                break;
            }
            last = part;
            self.pos += 2;
        }

        Some(name)
    }
}

/// 收集所有 CTE 名称（小写、去引号）
fn collect_cte_names(tokens: &[Token<'_>]) -> HashSet<String> {
    let mut names = HashSet::new();
    let mut i = 0;

    while i < tokens.len() {
        if !tokens[i].is_keyword("WITH") {
            i += 1;
            continue;
        }
        i += 1;
        if tokens.get(i).is_some_and(|t| t.is_keyword("RECURSIVE")) {
            i += 1;
        }

        while let Some(name) = tokens.get(i).filter(|t| t.is_name_part()) {
            let mut j = i + 1;
            if tokens.get(j).is_some_and(|t| t.is_punct('(')) {
                j = skip_parenthesized(tokens, j);
            }
            if !tokens.get(j).is_some_and(|t| t.is_keyword("AS")) {
                break;
            }
            names.insert(normalize_name(name.text));
            j += 1;
            while tokens
                .get(j)
                .is_some_and(|t| t.is_keyword("NOT") || t.is_keyword("MATERIALIZED"))
            {
                j += 1;
            }
            if tokens.get(j).is_some_and(|t| t.is_punct('(')) {
                j = skip_parenthesized(tokens, j);
            }
            if tokens.get(j).is_some_and(|t| t.is_punct(',')) {
                i = j + 1;
            } else {
                i = j;
                break;
            }
        }
    }

    names
}

/// 从 `open` 处的左括号跳到匹配右括号之后
fn skip_parenthesized(tokens: &[Token<'_>], open: usize) -> usize {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        if token.is_punct('(') {
            depth += 1;
        } else if token.is_punct(')') {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return i + 1;
            }
        }
    }
    tokens.len()
}

fn normalize_name(name: &str) -> String {
    unquote_identifier(name).to_lowercase()
}

/// 集合名：去掉数据库链接和整体引号
fn clean_collection_name(name: &str) -> String {
    let local = match name.find('@') {
        Some(at) if at > 0 => &name[..at],
        _ => name,
    };
    unquote_identifier(local).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Dialect;
    use crate::services::sanitizer::scanner::tokenize;

    fn run(sql: &str) -> Analysis {
        analyze(&tokenize(sql, Dialect::default()), 255)
    }

    fn summary(sql: &str) -> Option<String> {
        run(sql).summary
    }

    #[test]
    fn test_simple_select() {
        let analysis = run("SELECT * FROM users WHERE id = 1");
        assert_eq!(analysis.operation_name.as_deref(), Some("SELECT"));
        assert_eq!(analysis.collection_name.as_deref(), Some("users"));
        assert_eq!(analysis.summary.as_deref(), Some("SELECT users"));
    }

    #[test]
    fn test_joins_and_lists() {
        assert_eq!(
            summary("SELECT * FROM a JOIN b ON a.id = b.id LEFT JOIN c ON b.x = c.x").as_deref(),
            Some("SELECT a b c")
        );
        assert_eq!(
            summary("select col from table1 t1, table2 t2").as_deref(),
            Some("SELECT table1 table2")
        );
        assert!(run("select col from table1 t1, table2 t2")
            .collection_name
            .is_none());
    }

    #[test]
    fn test_subqueries_and_unions() {
        assert_eq!(
            summary("SELECT * FROM a, (SELECT * FROM b), c").as_deref(),
            Some("SELECT a SELECT b c")
        );
        assert_eq!(
            summary("select col from table1 union select col from table2").as_deref(),
            Some("SELECT table1 SELECT table2")
        );
        assert_eq!(
            summary("SELECT x, (select a from b) as z FROM table").as_deref(),
            Some("SELECT SELECT b table")
        );
        let derived = run("select col from (select * from anotherTable) alias");
        assert_eq!(derived.summary.as_deref(), Some("SELECT SELECT anotherTable"));
        assert!(derived.collection_name.is_none());
    }

    #[test]
    fn test_values_derived_table() {
        let analysis = run("SELECT * FROM (VALUES (1, 2), (3, 4)) AS t(a, b)");
        assert_eq!(analysis.summary.as_deref(), Some("SELECT"));
        assert!(analysis.collection_name.is_none());
    }

    #[test]
    fn test_parenthesized_table() {
        assert_eq!(summary("SELECT * FROM (TABLE)").as_deref(), Some("SELECT TABLE"));
    }

    #[test]
    fn test_cte_names_are_hidden() {
        assert_eq!(
            summary("WITH a AS (SELECT * FROM t1), b AS (SELECT * FROM t2) SELECT * FROM a JOIN b")
                .as_deref(),
            Some("SELECT t1 SELECT t2 SELECT")
        );
        assert_eq!(
            summary(
                "WITH RECURSIVE cte AS (SELECT id FROM t WHERE p IS NULL \
                 UNION ALL SELECT t.id FROM t JOIN cte ON t.p = cte.id) SELECT * FROM cte"
            )
            .as_deref(),
            Some("SELECT t SELECT t SELECT")
        );

        let analysis = run("WITH cte AS (VALUES (1, 'a')) SELECT * FROM cte");
        assert_eq!(analysis.operation_name.as_deref(), Some("SELECT"));
        assert_eq!(analysis.collection_name.as_deref(), Some("cte"));
        assert_eq!(analysis.summary.as_deref(), Some("SELECT"));
    }

    #[test]
    fn test_apply() {
        assert_eq!(
            summary("SELECT * FROM t1 CROSS APPLY t2").as_deref(),
            Some("SELECT t1 t2")
        );
        assert_eq!(
            summary("SELECT * FROM t1 OUTER APPLY (SELECT * FROM t2 WHERE t2.id = t1.id) x")
                .as_deref(),
            Some("SELECT t1 SELECT t2")
        );
    }

    #[test]
    fn test_insert_forms() {
        let analysis = run("INSERT INTO t1 (a, b) SELECT a, b FROM t2");
        assert_eq!(analysis.operation_name.as_deref(), Some("INSERT"));
        assert_eq!(analysis.collection_name.as_deref(), Some("t1"));
        assert_eq!(analysis.summary.as_deref(), Some("INSERT t1 SELECT t2"));

        assert_eq!(summary("insert insert into table").as_deref(), Some("INSERT table"));
        assert_eq!(summary("INSERT IGNORE INTO t VALUES (1)").as_deref(), Some("INSERT t"));
        let no_into = run("insert without i-n-t-o");
        assert_eq!(no_into.summary.as_deref(), Some("INSERT"));
        assert!(no_into.collection_name.is_none());
    }

    #[test]
    fn test_update_and_delete_targets() {
        assert_eq!(
            summary("UPDATE t1 JOIN t2 ON t1.id = t2.id SET t1.a = 1").as_deref(),
            Some("UPDATE t1")
        );
        assert_eq!(
            summary("UPDATE t1 SET a = 1 FROM t2 WHERE t1.id = t2.id").as_deref(),
            Some("UPDATE t1")
        );
        assert_eq!(
            summary("UPDATE t1 SET x = (SELECT y FROM t2)").as_deref(),
            Some("UPDATE t1 SELECT t2")
        );
        assert_eq!(
            summary("DELETE t1 FROM t1 JOIN t2 ON t1.id = t2.id").as_deref(),
            Some("DELETE t1")
        );
        let analysis = run("DELETE FROM t1 WHERE x IN (SELECT y FROM t2)");
        assert_eq!(analysis.collection_name.as_deref(), Some("t1"));
        assert_eq!(analysis.summary.as_deref(), Some("DELETE t1 SELECT t2"));
    }

    #[test]
    fn test_only_keyword_is_skipped() {
        let analysis = run("SELECT * FROM ONLY parent");
        assert_eq!(analysis.collection_name.as_deref(), Some("parent"));
        assert_eq!(analysis.summary.as_deref(), Some("SELECT parent"));
    }

    #[test]
    fn test_merge() {
        assert_eq!(
            summary("MERGE INTO target USING source ON target.id = source.id").as_deref(),
            Some("MERGE target")
        );
        assert_eq!(summary("merge (into )))").as_deref(), Some("MERGE"));
    }

    #[test]
    fn test_procedures() {
        let analysis = run("call db.test_proc(?)");
        assert_eq!(analysis.operation_name.as_deref(), Some("CALL"));
        assert_eq!(analysis.stored_procedure_name.as_deref(), Some("db.test_proc"));
        assert!(analysis.collection_name.is_none());
        assert_eq!(analysis.summary.as_deref(), Some("CALL db.test_proc"));

        let analysis = run("EXECUTE db.my_procedure @param=1");
        assert_eq!(analysis.stored_procedure_name.as_deref(), Some("db.my_procedure"));
        assert_eq!(analysis.summary.as_deref(), Some("EXECUTE db.my_procedure"));

        let analysis = run("{? = call get_total(?)}");
        assert_eq!(analysis.stored_procedure_name.as_deref(), Some("get_total"));
    }

    #[test]
    fn test_sequence_call_has_no_procedure() {
        let analysis = run("CALL NEXT VALUE FOR seq");
        assert_eq!(analysis.summary.as_deref(), Some("CALL seq"));
        assert!(analysis.stored_procedure_name.is_none());
    }

    #[test]
    fn test_ddl() {
        let analysis = run("CREATE TABLE IF NOT EXISTS users (id INT)");
        assert_eq!(analysis.operation_name.as_deref(), Some("CREATE TABLE"));
        assert_eq!(analysis.collection_name.as_deref(), Some("users"));
        assert_eq!(analysis.summary.as_deref(), Some("CREATE TABLE users"));

        let analysis = run("CREATE UNIQUE INDEX types_name ON types (name)");
        assert_eq!(analysis.operation_name.as_deref(), Some("CREATE INDEX"));
        assert!(analysis.collection_name.is_none());
        assert_eq!(analysis.summary.as_deref(), Some("CREATE INDEX types_name"));

        assert_eq!(
            summary("CREATE OR REPLACE VIEW tmp AS SELECT type FROM table WHERE id = ?")
                .as_deref(),
            Some("CREATE VIEW tmp SELECT table")
        );
        assert_eq!(
            summary("ALTER TABLE table ADD CONSTRAINT c FOREIGN KEY (f) REFERENCES ref (id)")
                .as_deref(),
            Some("ALTER TABLE table")
        );
        assert_eq!(summary("DROP TABLE IF EXISTS t").as_deref(), Some("DROP TABLE t"));
    }

    #[test]
    fn test_misc_statements() {
        assert_eq!(summary("TRUNCATE TABLE users").as_deref(), Some("TRUNCATE TABLE users"));
        assert_eq!(summary("BEGIN TRANSACTION").as_deref(), Some("BEGIN TRANSACTION"));
        assert_eq!(summary("COMMIT").as_deref(), Some("COMMIT"));
        assert_eq!(summary("USE mydb").as_deref(), Some("USE mydb"));
        assert_eq!(summary("GRANT SELECT ON users TO bob").as_deref(), Some("GRANT"));
        assert_eq!(
            summary("LOCK TABLE users IN EXCLUSIVE MODE").as_deref(),
            Some("LOCK TABLE users")
        );
    }

    #[test]
    fn test_explain() {
        let analysis = run("EXPLAIN SELECT * FROM users");
        assert_eq!(analysis.operation_name.as_deref(), Some("SELECT"));
        assert_eq!(analysis.collection_name.as_deref(), Some("users"));
        assert_eq!(analysis.summary.as_deref(), Some("EXPLAIN SELECT users"));
    }

    #[test]
    fn test_hql_from() {
        let analysis = run("FROM schema.table");
        assert_eq!(analysis.operation_name.as_deref(), Some("SELECT"));
        assert_eq!(analysis.collection_name.as_deref(), Some("schema.table"));
        assert_eq!(analysis.summary.as_deref(), Some("SELECT schema.table"));
    }

    #[test]
    fn test_multiple_statements() {
        let analysis = run("SELECT * FROM t1; INSERT INTO t2 VALUES (1);");
        assert_eq!(analysis.operation_name.as_deref(), Some("SELECT"));
        assert_eq!(analysis.collection_name.as_deref(), Some("t1"));
        assert_eq!(analysis.summary.as_deref(), Some("SELECT t1; INSERT t2"));

        assert!(run("SELECT * FROM t1; SELECT * FROM t2").collection_name.is_none());
    }

    #[test]
    fn test_quoted_names_and_dblink() {
        let analysis = run("SELECT * FROM `my table`");
        assert_eq!(analysis.collection_name.as_deref(), Some("my table"));
        assert_eq!(analysis.summary.as_deref(), Some("SELECT `my table`"));

        let analysis = run("SELECT * FROM users@remote_db");
        assert_eq!(analysis.collection_name.as_deref(), Some("users"));
        assert_eq!(analysis.summary.as_deref(), Some("SELECT users@remote_db"));
    }

    #[test]
    fn test_sensitive_statements_are_masked() {
        let masked = |sql: &str| {
            run(sql)
                .masked_tail
                .map(|tail| (tail.start, tail.replacement))
        };

        let analysis = run("CREATE USER new_user PASSWORD 'Password1'");
        assert_eq!(analysis.summary.as_deref(), Some("CREATE"));
        assert_eq!(
            masked("CREATE USER new_user PASSWORD 'Password1'"),
            Some((0, "CREATE USER ?".to_string()))
        );

        let analysis = run("connect to db user admin using secret");
        assert_eq!(analysis.summary.as_deref(), Some("CONNECT"));
        assert_eq!(
            masked("connect to db user admin using secret"),
            Some((0, "connect ?".to_string()))
        );

        // 后续语句中的敏感语句同样记录起点
        assert_eq!(
            masked("SELECT 1; CREATE USER bob IDENTIFIED BY Secret1"),
            Some((10, "CREATE USER ?".to_string()))
        );
        assert_eq!(
            masked("SELECT 1; ALTER USER a IDENTIFIED BY x; CONNECT b/c"),
            Some((10, "ALTER USER ?".to_string()))
        );
        assert_eq!(masked("SELECT 1; DROP USER bob"), None);
    }

    #[test]
    fn test_unrecognized_and_empty() {
        let analysis = run("frobnicate everything");
        assert_eq!(analysis.operation_name.as_deref(), Some("FROBNICATE"));

        let analysis = run("");
        assert_eq!(analysis, Analysis::default());

        let analysis = run("12345 67890");
        assert!(analysis.operation_name.is_none());
        assert!(analysis.summary.is_none());
    }

    #[test]
    fn test_summary_truncates_by_word() {
        let tokens = tokenize("SELECT * FROM alpha, beta, gamma", Dialect::default());
        let analysis = analyze(&tokens, 17);
        assert_eq!(analysis.summary.as_deref(), Some("SELECT alpha beta"));
    }
}
