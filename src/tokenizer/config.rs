use std::collections::HashMap;

use super::token::TokenType;
use crate::ast::DataType;

/// A string literal delimiter pair, e.g. `'...'` or `N'...'`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringDelimiter {
    pub start: String,
    pub end: String,
    /// `N'...'` style national character literal.
    pub national: bool,
}

impl StringDelimiter {
    pub fn new(start: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
            national: false,
        }
    }

    pub fn national(start: &str, end: &str) -> Self {
        Self {
            national: true,
            ..Self::new(start, end)
        }
    }
}

/// A comment marker: line comments have no end delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDelimiter {
    pub start: String,
    pub end: Option<String>,
}

impl CommentDelimiter {
    pub fn line(start: &str) -> Self {
        Self {
            start: start.to_string(),
            end: None,
        }
    }

    pub fn block(start: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            end: Some(end.to_string()),
        }
    }
}

/// Lexical configuration of one dialect.
#[derive(Debug, Clone)]
pub struct TokenizerConfig {
    /// Upper-case keyword (possibly several space-separated words) to token type.
    pub keywords: HashMap<String, TokenType>,
    pub quotes: Vec<StringDelimiter>,
    /// Identifier delimiters (open, close).
    pub identifiers: Vec<(char, char)>,
    pub comments: Vec<CommentDelimiter>,
    /// Characters that escape the next character inside string literals.
    pub string_escapes: Vec<char>,
    pub nested_comments: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        let keywords = BASE_KEYWORDS
            .iter()
            .map(|(word, kind)| (word.to_string(), *kind))
            .chain(
                BASE_TYPES
                    .iter()
                    .map(|(word, dt)| (word.to_string(), TokenType::Type(*dt))),
            )
            .collect();

        Self {
            keywords,
            quotes: vec![StringDelimiter::new("'", "'"), StringDelimiter::national("N'", "'")],
            identifiers: vec![('"', '"')],
            comments: vec![
                CommentDelimiter::line("--"),
                CommentDelimiter::block("/*", "*/"),
            ],
            string_escapes: Vec::new(),
            nested_comments: false,
        }
    }
}

impl TokenizerConfig {
    pub fn keyword(&mut self, word: &str, kind: TokenType) {
        self.keywords.insert(word.to_ascii_uppercase(), kind);
    }

    /// Identifier delimiters must not collide with string quotes.
    pub fn validate(&self) -> Result<(), String> {
        for (open, _) in &self.identifiers {
            if let Some(q) = self.quotes.iter().find(|q| q.start.starts_with(*open)) {
                return Err(format!(
                    "identifier delimiter '{}' collides with string quote '{}'",
                    open, q.start
                ));
            }
        }
        if self.quotes.iter().any(|q| q.start.is_empty() || q.end.is_empty()) {
            return Err("string delimiters cannot be empty".to_string());
        }
        Ok(())
    }
}

pub const BASE_KEYWORDS: &[(&str, TokenType)] = &[
    ("ADD", TokenType::Add),
    ("ALL", TokenType::All),
    ("ALTER", TokenType::Alter),
    ("AND", TokenType::And),
    ("AS", TokenType::As),
    ("ASC", TokenType::Asc),
    ("AUTO_INCREMENT", TokenType::AutoIncrement),
    ("AUTOINCREMENT", TokenType::AutoIncrement),
    ("BETWEEN", TokenType::Between),
    ("BY", TokenType::By),
    ("CASE", TokenType::Case),
    ("CAST", TokenType::Cast),
    ("CHARACTER SET", TokenType::CharacterSet),
    ("CHARSET", TokenType::CharacterSet),
    ("CHECK", TokenType::Check),
    ("COLLATE", TokenType::Collate),
    ("COLUMN", TokenType::Column),
    ("COMMENT", TokenType::Comment),
    ("CONSTRAINT", TokenType::Constraint),
    ("CREATE", TokenType::Create),
    ("CROSS", TokenType::Cross),
    ("DEFAULT", TokenType::Default),
    ("DELETE", TokenType::Delete),
    ("DESC", TokenType::Desc),
    ("DISTINCT", TokenType::Distinct),
    ("DROP", TokenType::Drop),
    ("ELSE", TokenType::Else),
    ("END", TokenType::End),
    ("EXISTS", TokenType::Exists),
    ("FALSE", TokenType::False),
    ("FOREIGN", TokenType::Foreign),
    ("FROM", TokenType::From),
    ("FULL", TokenType::Full),
    ("GROUP", TokenType::Group),
    ("HAVING", TokenType::Having),
    ("IF", TokenType::If),
    ("ILIKE", TokenType::ILike),
    ("IN", TokenType::In),
    ("INDEX", TokenType::Index),
    ("INNER", TokenType::Inner),
    ("INSERT", TokenType::Insert),
    ("INTO", TokenType::Into),
    ("IS", TokenType::Is),
    ("JOIN", TokenType::Join),
    ("KEY", TokenType::Key),
    ("LEFT", TokenType::Left),
    ("LIKE", TokenType::Like),
    ("LIMIT", TokenType::Limit),
    ("LOCK", TokenType::Lock),
    ("NOT", TokenType::Not),
    ("NULL", TokenType::Null),
    ("OFFSET", TokenType::Offset),
    ("ON", TokenType::On),
    ("OR", TokenType::Or),
    ("ORDER", TokenType::Order),
    ("OUTER", TokenType::Outer),
    ("PRIMARY", TokenType::Primary),
    ("REFERENCES", TokenType::References),
    ("REPLACE", TokenType::Replace),
    ("RIGHT", TokenType::Right),
    ("SELECT", TokenType::Select),
    ("SET", TokenType::Set),
    ("TABLE", TokenType::Table),
    ("THEN", TokenType::Then),
    ("TRUE", TokenType::True),
    ("UNIQUE", TokenType::Unique),
    ("UPDATE", TokenType::Update),
    ("USE", TokenType::Use),
    ("USING", TokenType::Using),
    ("VALUES", TokenType::Values),
    ("WHEN", TokenType::When),
    ("WHERE", TokenType::Where),
];

pub const BASE_TYPES: &[(&str, DataType)] = &[
    ("TINYINT", DataType::TinyInt),
    ("SMALLINT", DataType::SmallInt),
    ("MEDIUMINT", DataType::MediumInt),
    ("INT", DataType::Int),
    ("INTEGER", DataType::Int),
    ("BIGINT", DataType::BigInt),
    ("DECIMAL", DataType::Decimal),
    ("DEC", DataType::Decimal),
    ("NUMERIC", DataType::Numeric),
    ("FLOAT", DataType::Float),
    ("DOUBLE", DataType::Double),
    ("DOUBLE PRECISION", DataType::Double),
    ("REAL", DataType::Real),
    ("BOOLEAN", DataType::Boolean),
    ("BOOL", DataType::Boolean),
    ("BIT", DataType::Bit),
    ("CHAR", DataType::Char),
    ("CHARACTER", DataType::Char),
    ("NCHAR", DataType::NChar),
    ("VARCHAR", DataType::VarChar),
    ("NVARCHAR", DataType::NVarChar),
    ("TEXT", DataType::Text),
    ("CLOB", DataType::Text),
    ("TINYTEXT", DataType::TinyText),
    ("MEDIUMTEXT", DataType::MediumText),
    ("LONGTEXT", DataType::LongText),
    ("BLOB", DataType::Blob),
    ("TINYBLOB", DataType::TinyBlob),
    ("MEDIUMBLOB", DataType::MediumBlob),
    ("LONGBLOB", DataType::LongBlob),
    ("BINARY", DataType::Binary),
    ("VARBINARY", DataType::VarBinary),
    ("DATE", DataType::Date),
    ("TIME", DataType::Time),
    ("TIMESTAMP", DataType::Timestamp),
    ("DATETIME", DataType::DateTime),
    ("JSON", DataType::Json),
    ("UUID", DataType::Uuid),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TokenizerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.keywords.get("INTEGER"), Some(&TokenType::Type(DataType::Int)));
        assert_eq!(config.keywords.get("CHARACTER SET"), Some(&TokenType::CharacterSet));
    }

    #[test]
    fn test_colliding_delimiters_are_rejected() {
        let mut config = TokenizerConfig::default();
        config.quotes.push(StringDelimiter::new("\"", "\""));
        let err = config.validate().unwrap_err();
        assert!(err.contains("collides"));
    }
}
