//! 词法扫描器
//!
//! 单次从左到右扫描原始文本，切分为带类型的词元。扫描器不认识 SQL 语法，
//! 只区分字面量、标识符、注释和标点；任何输入都能切分完毕，不会失败。
//!
//! 字面量规则：
//! - `'...'` 恒为字符串字面量，`''` 为转义
//! - `"..."` 视方言而定：字符串字面量或带引号标识符
//! - `$$...$$`、`$tag$...$tag$` 为美元引号字符串
//! - 数字：十进制、小数、指数、十六进制、一元正负号，以及 `123-45-6789` 这类连写
//!
//! 未闭合的引号、注释一律延伸到输入末尾。

use crate::models::Dialect;

/// 词元类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// 关键字或普通标识符
    Word,
    /// `` `x` ``、`[x]`，以及标识符方言下的 `"x"`
    QuotedIdent,
    /// 字符串字面量
    StringLit,
    /// 数字字面量
    Number,
    /// 参数占位符 `?`、`$1`
    Marker,
    /// 单个标点字符
    Punct,
    Comment,
    Space,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// 在原文中的起始字节偏移
    pub start: usize,
}

impl<'a> Token<'a> {
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    /// 两个词元在原文中紧挨着（中间没有空白或注释）
    pub fn touches(&self, next: &Token<'_>) -> bool {
        self.end() == next.start
    }

    pub fn is_significant(&self) -> bool {
        !matches!(self.kind, TokenKind::Space | TokenKind::Comment)
    }

    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct
            && self.text.len() == c.len_utf8()
            && self.text.starts_with(c)
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Word && self.text.eq_ignore_ascii_case(keyword)
    }

    /// 能否出现在表名 / 过程名的位置
    pub fn is_name_part(&self) -> bool {
        match self.kind {
            TokenKind::Word | TokenKind::QuotedIdent => true,
            // 字符串方言下 `"my table"` 仍可能是表名
            TokenKind::StringLit => self.text.starts_with('"'),
            _ => false,
        }
    }
}

/// 负号前出现这些关键字时按一元运算处理
const UNARY_CONTEXT_KEYWORDS: &[&str] = &[
    "SELECT", "WHERE", "AND", "OR", "NOT", "IN", "VALUES", "SET", "BY", "LIMIT", "OFFSET",
    "THEN", "ELSE", "WHEN", "CASE", "BETWEEN", "LIKE", "IS", "ON", "HAVING", "RETURN", "AS",
    "DEFAULT",
];

/// 把原始文本切分为词元
pub(crate) fn tokenize(src: &str, dialect: Dialect) -> Vec<Token<'_>> {
    let mut scanner = Scanner::new(src, dialect);
    let mut tokens = Vec::new();
    while let Some(token) = scanner.next_token() {
        tokens.push(token);
    }
    tokens
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
    dialect: Dialect,
    last_significant: Option<Token<'a>>,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str, dialect: Dialect) -> Self {
        Self {
            src,
            pos: 0,
            dialect,
            last_significant: None,
        }
    }

    fn next_token(&mut self) -> Option<Token<'a>> {
        let src = self.src;
        let mut chars = src[self.pos..].chars();
        let c = chars.next()?;
        let next = chars.next();
        let after_next = chars.next();
        let start = self.pos;

        let kind = if c.is_whitespace() {
            self.eat_while(char::is_whitespace);
            TokenKind::Space
        } else if c == '-' && next == Some('-') {
            self.eat_line_comment();
            TokenKind::Comment
        } else if c == '/' && next == Some('*') {
            self.eat_block_comment();
            TokenKind::Comment
        } else if c == '\'' {
            self.eat_quoted('\'');
            TokenKind::StringLit
        } else if c == '"' {
            self.eat_quoted('"');
            if self.dialect.double_quotes_are_identifiers || self.is_dotted_name(start) {
                TokenKind::QuotedIdent
            } else {
                TokenKind::StringLit
            }
        } else if c == '`' {
            self.eat_quoted('`');
            TokenKind::QuotedIdent
        } else if c == '[' && !self.prev_char_is_word() {
            self.eat_through(']', 1);
            TokenKind::QuotedIdent
        } else if c == '$' {
            self.eat_dollar(next)
        } else if c == '?' {
            self.pos += 1;
            TokenKind::Marker
        } else if self.is_number_start(c, next, after_next) {
            self.eat_number();
            TokenKind::Number
        } else if is_word_start(c) {
            self.eat_while(is_word_continue);
            TokenKind::Word
        } else {
            self.pos += c.len_utf8();
            TokenKind::Punct
        };

        let token = Token {
            kind,
            text: &src[start..self.pos],
            start,
        };
        if token.is_significant() {
            self.last_significant = Some(token);
        }
        Some(token)
    }

    fn peek_char(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(n)
    }

    /// 刚扫描完的 `src[start..pos]` 是否为 `a."b"` / `"a"."b"` 这类点分名称的一段
    fn is_dotted_name(&self, start: usize) -> bool {
        let mut after = self.src[self.pos..].chars();
        let leads_on = after.next() == Some('.') && after.next().is_some_and(is_name_char);

        let mut before = self.src[..start].chars().rev();
        let follows = before.next() == Some('.')
            && before
                .next()
                .is_some_and(|c| is_word_continue(c) || matches!(c, '"' | '`' | ']'));

        leads_on || follows
    }

    fn prev_char_is_word(&self) -> bool {
        self.src[..self.pos]
            .chars()
            .next_back()
            .is_some_and(is_word_continue)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek_char() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn eat_line_comment(&mut self) {
        match self.src[self.pos..].find('\n') {
            Some(offset) => self.pos += offset,
            None => self.pos = self.src.len(),
        }
    }

    fn eat_block_comment(&mut self) {
        match self.src[self.pos + 2..].find("*/") {
            Some(offset) => self.pos += 2 + offset + 2,
            None => self.pos = self.src.len(),
        }
    }

    /// 跳过引号包裹的内容，连续两个引号视为转义
    fn eat_quoted(&mut self, quote: char) {
        self.pos += quote.len_utf8();
        while let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
            if c == quote {
                if self.peek_char() == Some(quote) {
                    self.pos += quote.len_utf8();
                } else {
                    return;
                }
            }
        }
    }

    /// 跳过开头 `skip` 字节后一直吃到 `close`（含）
    fn eat_through(&mut self, close: char, skip: usize) {
        match self.src[self.pos + skip..].find(close) {
            Some(offset) => self.pos += skip + offset + close.len_utf8(),
            None => self.pos = self.src.len(),
        }
    }

    fn eat_dollar(&mut self, next: Option<char>) -> TokenKind {
        match next {
            // PostgreSQL 原生参数 `$1` 保持原样
            Some(d) if d.is_ascii_digit() => {
                self.pos += 1;
                self.eat_while(|c| c.is_ascii_digit());
                TokenKind::Marker
            }
            Some('$') => {
                self.eat_until_delimiter("$$", 2);
                TokenKind::StringLit
            }
            Some(t) if t.is_alphabetic() || t == '_' => {
                let tag_len = self.src[self.pos + 1..]
                    .char_indices()
                    .find(|&(_, c)| !(c.is_alphanumeric() || c == '_'))
                    .map(|(i, _)| i)
                    .unwrap_or(self.src.len() - self.pos - 1);
                let tag_end = self.pos + 1 + tag_len;
                if self.src[tag_end..].starts_with('$') {
                    let src = self.src;
                    let tag = &src[self.pos..=tag_end];
                    let open_len = tag.len();
                    self.eat_until_delimiter(tag, open_len);
                    TokenKind::StringLit
                } else {
                    self.pos += 1;
                    TokenKind::Punct
                }
            }
            _ => {
                self.pos += 1;
                TokenKind::Punct
            }
        }
    }

    fn eat_until_delimiter(&mut self, delimiter: &str, open_len: usize) {
        match self.src[self.pos + open_len..].find(delimiter) {
            Some(offset) => self.pos += open_len + offset + delimiter.len(),
            None => self.pos = self.src.len(),
        }
    }

    fn sign_is_unary(&self) -> bool {
        match &self.last_significant {
            None => true,
            Some(token) => match token.kind {
                TokenKind::Punct => !matches!(token.text, ")" | "]"),
                TokenKind::Word => UNARY_CONTEXT_KEYWORDS
                    .iter()
                    .any(|k| token.text.eq_ignore_ascii_case(k)),
                _ => false,
            },
        }
    }

    fn is_number_start(&self, c: char, next: Option<char>, after_next: Option<char>) -> bool {
        let digit = |ch: Option<char>| ch.is_some_and(|ch| ch.is_ascii_digit());
        match c {
            '0'..='9' => true,
            '.' => digit(next) && !self.prev_char_is_word(),
            '+' | '-' => {
                self.sign_is_unary()
                    && (digit(next) || (next == Some('.') && digit(after_next)))
            }
            _ => false,
        }
    }

    fn eat_number(&mut self) {
        if matches!(self.peek_char(), Some('+' | '-')) {
            self.pos += 1;
        }

        if self.peek_char() == Some('0')
            && matches!(self.peek_nth(1), Some('x' | 'X'))
            && self.peek_nth(2).is_some_and(|c| c.is_ascii_hexdigit())
        {
            self.pos += 2;
            self.eat_while(|c| c.is_ascii_hexdigit());
            return;
        }

        while let Some(c) = self.peek_char() {
            let next = self.peek_nth(1);
            let continues = match c {
                '0'..='9' | '.' => true,
                'e' | 'E' => {
                    next.is_some_and(|n| n.is_ascii_digit())
                        || (matches!(next, Some('+' | '-'))
                            && self.peek_nth(2).is_some_and(|n| n.is_ascii_digit()))
                }
                '+' | '-' => next.is_some_and(|n| n.is_ascii_digit() || n == '.'),
                _ => false,
            };
            if !continues {
                break;
            }
            self.pos += c.len_utf8();
        }
    }
}

fn is_word_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_word_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// 点号之后能接续名称的字符
fn is_name_char(c: char) -> bool {
    is_word_start(c) || matches!(c, '"' | '`' | '[')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str, dialect: Dialect) -> Vec<(TokenKind, &str)> {
        tokenize(src, dialect)
            .into_iter()
            .filter(|t| t.kind != TokenKind::Space)
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn test_words_and_numbers() {
        let tokens = kinds("SELECT a1 FROM t WHERE x=-12.5e3", Dialect::default());
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Word, "SELECT"),
                (TokenKind::Word, "a1"),
                (TokenKind::Word, "FROM"),
                (TokenKind::Word, "t"),
                (TokenKind::Word, "WHERE"),
                (TokenKind::Word, "x"),
                (TokenKind::Punct, "="),
                (TokenKind::Number, "-12.5e3"),
            ]
        );
    }

    #[test]
    fn test_dotted_double_quoted_names_are_identifiers() {
        let tokens = kinds("FROM \"schema\".\"table\" WHERE a = \"lit\"", Dialect::STRING_LITERALS);
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Word, "FROM"),
                (TokenKind::QuotedIdent, "\"schema\""),
                (TokenKind::Punct, "."),
                (TokenKind::QuotedIdent, "\"table\""),
                (TokenKind::Word, "WHERE"),
                (TokenKind::Word, "a"),
                (TokenKind::Punct, "="),
                (TokenKind::StringLit, "\"lit\""),
            ]
        );

        let tokens = kinds("s.\"t\" \"u\".v", Dialect::STRING_LITERALS);
        assert_eq!(tokens[2], (TokenKind::QuotedIdent, "\"t\""));
        assert_eq!(tokens[3], (TokenKind::QuotedIdent, "\"u\""));
    }

    #[test]
    fn test_binary_minus_is_not_a_sign() {
        let tokens = kinds("a - 1", Dialect::default());
        assert_eq!(tokens[1], (TokenKind::Punct, "-"));
        assert_eq!(tokens[2], (TokenKind::Number, "1"));
    }

    #[test]
    fn test_hyphenated_digits_form_one_number() {
        let tokens = kinds("SELECT 123-45-6789", Dialect::default());
        assert_eq!(tokens[1], (TokenKind::Number, "123-45-6789"));
    }

    #[test]
    fn test_hex_number() {
        let tokens = kinds("SELECT 0xdeadBEEF", Dialect::default());
        assert_eq!(tokens[1], (TokenKind::Number, "0xdeadBEEF"));
    }

    #[test]
    fn test_digits_inside_identifier() {
        let tokens = kinds("TABLE123 TABLEओ7", Dialect::default());
        assert_eq!(
            tokens,
            vec![(TokenKind::Word, "TABLE123"), (TokenKind::Word, "TABLEओ7")]
        );
    }

    #[test]
    fn test_single_quoted_with_escape() {
        let tokens = kinds("'it''s' x", Dialect::default());
        assert_eq!(tokens[0], (TokenKind::StringLit, "'it''s'"));
        assert_eq!(tokens[1], (TokenKind::Word, "x"));
    }

    #[test]
    fn test_double_quotes_follow_dialect() {
        let tokens = kinds("\"col\"", Dialect::STRING_LITERALS);
        assert_eq!(tokens[0].0, TokenKind::StringLit);

        let tokens = kinds("\"col\"", Dialect::IDENTIFIERS);
        assert_eq!(tokens[0].0, TokenKind::QuotedIdent);
    }

    #[test]
    fn test_dollar_quoting() {
        let tokens = kinds("$$a 'b' c$$ $tag$x $y$ z$tag$ $1", Dialect::default());
        assert_eq!(
            tokens,
            vec![
                (TokenKind::StringLit, "$$a 'b' c$$"),
                (TokenKind::StringLit, "$tag$x $y$ z$tag$"),
                (TokenKind::Marker, "$1"),
            ]
        );
    }

    #[test]
    fn test_comments() {
        let tokens = kinds("SELECT --83\n/* x */ 1", Dialect::default());
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Word, "SELECT"),
                (TokenKind::Comment, "--83"),
                (TokenKind::Comment, "/* x */"),
                (TokenKind::Number, "1"),
            ]
        );
    }

    #[test]
    fn test_brackets_vs_subscript() {
        let tokens = kinds("[my table] arr[1]", Dialect::default());
        assert_eq!(tokens[0], (TokenKind::QuotedIdent, "[my table]"));
        assert_eq!(tokens[1], (TokenKind::Word, "arr"));
        assert_eq!(tokens[2], (TokenKind::Punct, "["));
        assert_eq!(tokens[3], (TokenKind::Number, "1"));
    }

    #[test]
    fn test_unterminated_spans_run_to_end() {
        for src in ["'abc", "\"abc", "`abc", "/* abc", "$$abc", "$t$abc", "[abc"] {
            let tokens = tokenize(src, Dialect::default());
            assert_eq!(tokens.len(), 1, "input: {src}");
            assert_eq!(tokens[0].text, src);
        }
    }

    #[test]
    fn test_tokens_cover_input_exactly() {
        let src = "SeLeCT ąś∂ń© FROM źćļńĶ WHERE x = 'ɣ' -- tail";
        let joined: String = tokenize(src, Dialect::default())
            .iter()
            .map(|t| t.text)
            .collect();
        assert_eq!(joined, src);
    }
}
