//! SQL tokenizer.
//!
//! Single left-to-right scan over the source with one character of lookahead.
//! Comment, quote and operator delimiters are matched longest-first before the
//! scanner falls back to numbers and words. Everything dialect-specific comes from
//! [`TokenizerConfig`].

pub mod config;
pub mod token;

pub use config::{CommentDelimiter, StringDelimiter, TokenizerConfig};
pub use token::{Span, Token, TokenType};

use nom::{
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{char, digit0, digit1, hex_digit1, one_of},
    combinator::{opt, recognize},
    sequence::{pair, tuple},
    IResult,
};

use crate::error::{BridgeError, BridgeResult};

/// Tokenizer bound to one dialect's lexical configuration.
pub struct Tokenizer<'c> {
    dialect: &'c str,
    config: &'c TokenizerConfig,
}

impl<'c> Tokenizer<'c> {
    pub fn new(dialect: &'c str, config: &'c TokenizerConfig) -> Self {
        Self { dialect, config }
    }

    /// Tokenize a SQL string. Comments are dropped from the output.
    pub fn tokenize(&self, sql: &str) -> BridgeResult<Vec<Token>> {
        let mut state = TokenizerState::new(sql, self.dialect, self.config);
        state.run()?;
        tracing::trace!(dialect = self.dialect, tokens = state.tokens.len(), "tokenized");
        Ok(state.tokens)
    }
}

/// Numeric literal: `12`, `1.5`, `.5`, `1e10`, `2.5E-3`, `0x1F`.
fn number_literal(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(pair(tag_no_case("0x"), hex_digit1)),
        recognize(tuple((
            alt((
                recognize(pair(digit1, opt(pair(char('.'), digit0)))),
                recognize(pair(char('.'), digit1)),
            )),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
    ))(input)
}

const TWO_CHAR_OPERATORS: &[(&str, TokenType)] = &[
    ("<>", TokenType::Neq),
    ("!=", TokenType::Neq),
    ("<=", TokenType::Lte),
    (">=", TokenType::Gte),
    ("||", TokenType::DPipe),
    ("::", TokenType::DColon),
];

fn single_char_token(c: char) -> Option<TokenType> {
    let kind = match c {
        '(' => TokenType::LParen,
        ')' => TokenType::RParen,
        ',' => TokenType::Comma,
        '.' => TokenType::Dot,
        ';' => TokenType::Semicolon,
        '*' => TokenType::Star,
        '+' => TokenType::Plus,
        '-' => TokenType::Dash,
        '/' => TokenType::Slash,
        '%' => TokenType::Percent,
        '=' => TokenType::Eq,
        '<' => TokenType::Lt,
        '>' => TokenType::Gt,
        _ => return None,
    };
    Some(kind)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

struct TokenizerState<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    col: usize,
    tokens: Vec<Token>,
    dialect: &'a str,
    config: &'a TokenizerConfig,
    comments: Vec<&'a CommentDelimiter>,
    quotes: Vec<&'a StringDelimiter>,
    /// Multi-word keywords split into words, longest first.
    phrases: Vec<(Vec<String>, TokenType)>,
}

impl<'a> TokenizerState<'a> {
    fn new(src: &'a str, dialect: &'a str, config: &'a TokenizerConfig) -> Self {
        let mut comments: Vec<_> = config.comments.iter().collect();
        comments.sort_by_key(|c| std::cmp::Reverse(c.start.len()));
        let mut quotes: Vec<_> = config.quotes.iter().collect();
        quotes.sort_by_key(|q| std::cmp::Reverse(q.start.len()));
        let mut phrases: Vec<(Vec<String>, TokenType)> = config
            .keywords
            .iter()
            .filter(|(k, _)| k.contains(' '))
            .map(|(k, v)| (k.split_whitespace().map(str::to_string).collect::<Vec<_>>(), *v))
            .filter(|(words, _)| words.len() > 1)
            .collect();
        phrases.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        Self {
            src,
            pos: 0,
            line: 1,
            col: 1,
            tokens: Vec::new(),
            dialect,
            config,
            comments,
            quotes,
            phrases,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    /// Advance over `len` bytes of already-matched text.
    fn advance_bytes(&mut self, len: usize) {
        let target = self.pos + len;
        while self.pos < target && self.advance().is_some() {}
    }

    fn starts_with(&self, delim: &str) -> bool {
        self.rest().starts_with(delim)
    }

    fn starts_with_ci(&self, delim: &str) -> bool {
        self.rest()
            .get(..delim.len())
            .is_some_and(|s| s.eq_ignore_ascii_case(delim))
    }

    fn push(&mut self, kind: TokenType, text: impl Into<String>, start: usize, line: usize, col: usize) {
        self.tokens
            .push(Token::new(kind, text, Span::new(start, self.pos), line, col));
    }

    fn error(&self, message: impl Into<String>, start: usize, line: usize, col: usize) -> BridgeError {
        BridgeError::syntax(self.dialect, message, line, col, Span::new(start, self.pos))
    }

    fn run(&mut self) -> BridgeResult<()> {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
                continue;
            }

            let (start, line, col) = (self.pos, self.line, self.col);

            if self.scan_comment(start, line, col)? {
                continue;
            }

            if let Some(delim) = self.quotes.iter().copied().find(|q| self.starts_with_ci(&q.start)) {
                self.scan_string(delim, start, line, col)?;
                continue;
            }

            if let Some(&(_, close)) = self.config.identifiers.iter().find(|(open, _)| *open == c) {
                self.scan_quoted_identifier(close, start, line, col)?;
                continue;
            }

            if c.is_ascii_digit() || (c == '.' && self.peek_next().is_some_and(|n| n.is_ascii_digit())) {
                self.scan_number(start, line, col)?;
                continue;
            }

            if self.scan_parameter(c, start, line, col) {
                continue;
            }

            if let Some(&(op, kind)) = TWO_CHAR_OPERATORS.iter().find(|(op, _)| self.starts_with(op)) {
                self.advance_bytes(op.len());
                self.push(kind, op, start, line, col);
                continue;
            }

            if let Some(kind) = single_char_token(c) {
                self.advance();
                self.push(kind, c.to_string(), start, line, col);
                continue;
            }

            if c.is_alphabetic() || c == '_' {
                self.scan_word(start, line, col);
                continue;
            }

            self.advance();
            return Err(self.error(format!("Unexpected character '{}'", c), start, line, col));
        }
        Ok(())
    }

    /// Skip a comment if one starts here. Returns whether anything was consumed.
    fn scan_comment(&mut self, start: usize, line: usize, col: usize) -> BridgeResult<bool> {
        let Some(delim) = self.comments.iter().copied().find(|d| self.starts_with(&d.start)) else {
            return Ok(false);
        };
        self.advance_bytes(delim.start.len());

        let Some(end) = &delim.end else {
            while let Some(c) = self.peek() {
                if c == '\n' {
                    break;
                }
                self.advance();
            }
            return Ok(true);
        };

        let mut depth = 1usize;
        loop {
            if self.peek().is_none() {
                return Err(self.error("Unterminated comment", start, line, col));
            }
            if self.config.nested_comments && self.starts_with(&delim.start) {
                self.advance_bytes(delim.start.len());
                depth += 1;
            } else if self.starts_with(end) {
                self.advance_bytes(end.len());
                depth -= 1;
                if depth == 0 {
                    return Ok(true);
                }
            } else {
                self.advance();
            }
        }
    }

    fn scan_string(&mut self, delim: &StringDelimiter, start: usize, line: usize, col: usize) -> BridgeResult<()> {
        self.advance_bytes(delim.start.len());
        let mut value = String::new();
        loop {
            let Some(c) = self.peek() else {
                return Err(self.error("Unterminated string literal", start, line, col));
            };

            if self.starts_with(&delim.end) {
                self.advance_bytes(delim.end.len());
                if self.starts_with(&delim.end) {
                    // Doubled closing quote stands for the quote itself.
                    self.advance_bytes(delim.end.len());
                    value.push_str(&delim.end);
                    continue;
                }
                break;
            }

            if self.config.string_escapes.contains(&c) {
                self.advance();
                let Some(escaped) = self.advance() else {
                    return Err(self.error("Unterminated string literal", start, line, col));
                };
                value.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '0' => '\0',
                    'b' => '\u{8}',
                    'Z' => '\u{1a}',
                    other => other,
                });
                continue;
            }

            value.push(c);
            self.advance();
        }

        let kind = if delim.national {
            TokenType::NationalString
        } else {
            TokenType::String
        };
        self.push(kind, value, start, line, col);
        Ok(())
    }

    fn scan_quoted_identifier(&mut self, close: char, start: usize, line: usize, col: usize) -> BridgeResult<()> {
        self.advance();
        let mut name = String::new();
        loop {
            let Some(c) = self.advance() else {
                return Err(self.error("Unterminated quoted identifier", start, line, col));
            };
            if c == close {
                if self.peek() == Some(close) {
                    self.advance();
                    name.push(close);
                    continue;
                }
                break;
            }
            name.push(c);
        }
        self.push(TokenType::Identifier, name, start, line, col);
        Ok(())
    }

    fn scan_number(&mut self, start: usize, line: usize, col: usize) -> BridgeResult<()> {
        let rest = self.rest();
        match number_literal(rest) {
            Ok((_, matched)) => {
                let text = matched.to_string();
                self.advance_bytes(matched.len());
                self.push(TokenType::Number, text, start, line, col);
                Ok(())
            }
            Err(_) => {
                self.advance();
                Err(self.error("Malformed numeric literal", start, line, col))
            }
        }
    }

    /// `?`, `$1`, `:name`, `@var`.
    fn scan_parameter(&mut self, c: char, start: usize, line: usize, col: usize) -> bool {
        let next = self.peek_next();
        let qualifies = match c {
            '?' => true,
            '$' => next.is_some_and(|n| n.is_ascii_digit()),
            ':' => next.is_some_and(|n| n.is_alphabetic() || n == '_'),
            '@' => next.is_some_and(|n| n.is_alphabetic() || n == '_' || n == '@'),
            _ => false,
        };
        if !qualifies {
            return false;
        }
        self.advance();
        if c == '@' && self.peek() == Some('@') {
            self.advance();
        }
        if c != '?' {
            while self.peek().is_some_and(is_word_char) {
                self.advance();
            }
        }
        let text = self.src[start..self.pos].to_string();
        self.push(TokenType::Parameter, text, start, line, col);
        true
    }

    fn scan_word(&mut self, start: usize, line: usize, col: usize) {
        while self.peek().is_some_and(is_word_char) {
            self.advance();
        }
        let upper = self.src[start..self.pos].to_ascii_uppercase();

        if let Some(kind) = self.scan_phrase(&upper) {
            let text = self.src[start..self.pos].to_string();
            self.push(kind, text, start, line, col);
            return;
        }

        let kind = self.config.keywords.get(&upper).copied().unwrap_or(TokenType::Var);
        let text = self.src[start..self.pos].to_string();
        self.push(kind, text, start, line, col);
    }

    /// Try to extend `first` into a multi-word keyword; restores position on failure.
    fn scan_phrase(&mut self, first: &str) -> Option<TokenType> {
        let candidates: Vec<(Vec<String>, TokenType)> = self
            .phrases
            .iter()
            .filter(|(words, _)| words[0] == first)
            .cloned()
            .collect();

        for (words, kind) in candidates {
            let saved = (self.pos, self.line, self.col);
            let mut matched = true;
            for word in &words[1..] {
                if !self.peek().is_some_and(char::is_whitespace) {
                    matched = false;
                    break;
                }
                while self.peek().is_some_and(char::is_whitespace) {
                    self.advance();
                }
                let word_start = self.pos;
                while self.peek().is_some_and(is_word_char) {
                    self.advance();
                }
                if !self.src[word_start..self.pos].eq_ignore_ascii_case(word) {
                    matched = false;
                    break;
                }
            }
            if matched {
                return Some(kind);
            }
            (self.pos, self.line, self.col) = saved;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::DataType;

    fn lex(sql: &str) -> Vec<Token> {
        let config = TokenizerConfig::default();
        Tokenizer::new("generic", &config).tokenize(sql).unwrap()
    }

    fn kinds(sql: &str) -> Vec<TokenType> {
        lex(sql).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(
            kinds("select Foo from bar"),
            vec![TokenType::Select, TokenType::Var, TokenType::From, TokenType::Var]
        );
    }

    #[test]
    fn test_types_and_phrases() {
        assert_eq!(
            kinds("INTEGER double   precision CHARACTER SET character"),
            vec![
                TokenType::Type(DataType::Int),
                TokenType::Type(DataType::Double),
                TokenType::CharacterSet,
                TokenType::Type(DataType::Char),
            ]
        );
    }

    #[test]
    fn test_phrase_backtracks_when_second_word_differs() {
        assert_eq!(
            kinds("double x"),
            vec![TokenType::Type(DataType::Double), TokenType::Var]
        );
    }

    #[test]
    fn test_numbers_keep_original_text() {
        let tokens = lex("10.50 .5 1e-3 0xFF 42");
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["10.50", ".5", "1e-3", "0xFF", "42"]);
        assert!(tokens.iter().all(|t| t.kind == TokenType::Number));
    }

    #[test]
    fn test_string_unescaping_doubled_quote() {
        let tokens = lex("'it''s'");
        assert_eq!(tokens[0].kind, TokenType::String);
        assert_eq!(tokens[0].text, "it's");
    }

    #[test]
    fn test_backslash_escapes_when_configured() {
        let mut config = TokenizerConfig::default();
        config.string_escapes.push('\\');
        let tokens = Tokenizer::new("mysql", &config)
            .tokenize(r"'a\'b\nc'")
            .unwrap();
        assert_eq!(tokens[0].text, "a'b\nc");
    }

    #[test]
    fn test_comments_are_dropped_but_do_not_split_strings() {
        let tokens = lex("SELECT '-- not a comment /* nor this */' -- trailing\n/* block */ FROM t");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenType::Select, TokenType::String, TokenType::From, TokenType::Var]
        );
        assert_eq!(tokens[1].text, "-- not a comment /* nor this */");
    }

    #[test]
    fn test_nested_block_comments() {
        let mut config = TokenizerConfig::default();
        config.nested_comments = true;
        let tokens = Tokenizer::new("postgres", &config)
            .tokenize("/* outer /* inner */ still comment */ SELECT")
            .unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenType::Select);
    }

    #[test]
    fn test_prefixed_block_comment_is_longest_match() {
        let mut config = TokenizerConfig::default();
        config.comments.push(CommentDelimiter::block("/* !", "*/;"));
        let tokens = Tokenizer::new("nuodb", &config)
            .tokenize("/* !40101 SET NAMES utf8 */; SELECT 1")
            .unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TokenType::Select, TokenType::Number]);
    }

    #[test]
    fn test_quoted_identifiers() {
        let tokens = lex(r#""my ""col""""#);
        assert_eq!(tokens[0].kind, TokenType::Identifier);
        assert_eq!(tokens[0].text, r#"my "col""#);
    }

    #[test]
    fn test_operators_longest_match() {
        assert_eq!(
            kinds("a <> b <= c || d :: e != f"),
            vec![
                TokenType::Var,
                TokenType::Neq,
                TokenType::Var,
                TokenType::Lte,
                TokenType::Var,
                TokenType::DPipe,
                TokenType::Var,
                TokenType::DColon,
                TokenType::Var,
                TokenType::Neq,
                TokenType::Var,
            ]
        );
    }

    #[test]
    fn test_parameters() {
        let tokens = lex("? $1 :name @var");
        assert!(tokens.iter().all(|t| t.kind == TokenType::Parameter));
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["?", "$1", ":name", "@var"]);
    }

    #[test]
    fn test_unterminated_string_reports_position() {
        let config = TokenizerConfig::default();
        let err = Tokenizer::new("generic", &config)
            .tokenize("SELECT\n  'abc")
            .unwrap_err();
        match err {
            BridgeError::Syntax { line, col, dialect, .. } => {
                assert_eq!((line, col), (2, 3));
                assert_eq!(dialect, "generic");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unterminated_comment_and_identifier() {
        let config = TokenizerConfig::default();
        let tokenizer = Tokenizer::new("generic", &config);
        assert!(matches!(
            tokenizer.tokenize("SELECT /* open"),
            Err(BridgeError::Syntax { .. })
        ));
        assert!(matches!(
            tokenizer.tokenize("SELECT \"open"),
            Err(BridgeError::Syntax { .. })
        ));
    }

    #[test]
    fn test_national_strings() {
        let tokens = lex("SELECT N'caf\u{e9}', n'x', name");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenType::Select,
                TokenType::NationalString,
                TokenType::Comma,
                TokenType::NationalString,
                TokenType::Comma,
                TokenType::Var,
            ]
        );
        assert_eq!(tokens[1].text, "caf\u{e9}");
    }

    #[test]
    fn test_blank_keywords_are_ignored() {
        let mut config = TokenizerConfig::default();
        config.keyword("   ", TokenType::Select);
        config.keyword(" ONLY ", TokenType::Select);
        let tokens = Tokenizer::new("generic", &config).tokenize("SELECT only").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenType::Select);
    }

    #[test]
    fn test_spans_and_positions() {
        let tokens = lex("SELECT a\nFROM t");
        assert_eq!(tokens[1].span, Span::new(7, 8));
        assert_eq!((tokens[2].line, tokens[2].col), (2, 1));
    }
}
