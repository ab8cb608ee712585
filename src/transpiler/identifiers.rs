//! Identifier quoting.

/// Words that must be quoted when used as identifiers in any target.
pub const RESERVED_WORDS: &[&str] = &[
    "order",
    "group",
    "user",
    "table",
    "select",
    "from",
    "where",
    "join",
    "left",
    "right",
    "inner",
    "outer",
    "on",
    "and",
    "or",
    "not",
    "null",
    "true",
    "false",
    "limit",
    "offset",
    "as",
    "in",
    "is",
    "like",
    "between",
    "having",
    "union",
    "all",
    "distinct",
    "case",
    "when",
    "then",
    "else",
    "end",
    "create",
    "alter",
    "drop",
    "insert",
    "update",
    "delete",
    "index",
    "key",
    "primary",
    "foreign",
    "references",
    "default",
    "constraint",
    "check",
    "lock",
    "unique",
    "values",
    "set",
];

/// An unquoted name needs quoting if it is reserved, contains anything but
/// letters, digits and `_`, or starts with a digit.
pub fn needs_quoting(name: &str) -> bool {
    let lower = name.to_lowercase();
    name.is_empty()
        || RESERVED_WORDS.contains(&lower.as_str())
        || name.chars().any(|c| !c.is_alphanumeric() && c != '_')
        || name.chars().next().is_some_and(|c| c.is_numeric())
}

/// Wrap a name in delimiters, doubling any closing delimiter inside it.
pub fn quote(name: &str, open: char, close: char) -> String {
    let escaped = name.replace(close, &format!("{close}{close}"));
    format!("{open}{escaped}{close}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_quoting() {
        assert!(!needs_quoting("users"));
        assert!(!needs_quoting("first_name"));
        assert!(needs_quoting("order"));
        assert!(needs_quoting("Key"));
        assert!(needs_quoting("my table"));
        assert!(needs_quoting("2fa"));
        assert!(needs_quoting(""));
    }

    #[test]
    fn test_quote_doubles_closing_delimiter() {
        assert_eq!(quote("a\"b", '"', '"'), "\"a\"\"b\"");
        assert_eq!(quote("x]y", '[', ']'), "[x]]y]");
        assert_eq!(quote("plain", '`', '`'), "`plain`");
    }
}
