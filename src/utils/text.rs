//! 字符串辅助函数

/// 按字节上限截断，保证落在字符边界上
pub fn truncate_at_char_boundary(s: &mut String, max_bytes: usize) {
    if s.len() <= max_bytes {
        return;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
}

/// 去掉整体包裹的引号（`` `x` ``、`"x"`、`[x]`）
///
/// 只在整个名字是单个引号片段时才去除；`` `a`.`b` `` 这类带点号的名字原样返回。
pub fn unquote_identifier(name: &str) -> &str {
    let Some(first) = name.chars().next() else {
        return name;
    };
    let close = match first {
        '`' => '`',
        '"' => '"',
        '[' => ']',
        _ => return name,
    };
    if name.len() < 2 || !name.ends_with(close) {
        return name;
    }
    let inner = &name[1..name.len() - 1];
    // 内部还出现未转义的结束引号，说明是多个片段拼接而成
    let doubled = format!("{close}{close}");
    if inner.replace(&doubled, "").contains(close) {
        return name;
    }
    inner
}
