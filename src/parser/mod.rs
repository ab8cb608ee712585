//! Recursive-descent SQL parser.
//!
//! Statements are dispatched on their leading token through
//! [`ParserConfig::statement_parsers`]; every grammar production is a free function
//! taking `&mut Parser` so dialects can register their own productions as plain
//! function pointers.

pub mod grammar;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use crate::ast::{Arg, Ast, DataType, NodeId, NodeKind, Tree};
use crate::error::{BridgeError, BridgeResult};
use crate::tokenizer::{Span, Token, TokenType};

/// Parses one statement. Called with the leading token already consumed.
pub type StatementParser = fn(&mut Parser<'_>) -> BridgeResult<NodeId>;

/// Builds a node from a function name (as written) and its parsed arguments.
pub type FunctionBuilder = fn(&mut Tree, &str, Vec<NodeId>) -> NodeId;

/// Parses a function's argument list. Called after `NAME(`; must consume `)`.
pub type FunctionParser = fn(&mut Parser<'_>) -> BridgeResult<NodeId>;

/// Turns `TYPE 'literal'` into a node. Receives the string literal node.
pub type TypeLiteralParser = fn(&mut Parser<'_>, NodeId) -> BridgeResult<NodeId>;

/// Dialect-overridable grammar tables.
#[derive(Clone)]
pub struct ParserConfig {
    pub statement_parsers: HashMap<TokenType, StatementParser>,
    /// Upper-case function name to builder.
    pub functions: HashMap<String, FunctionBuilder>,
    pub function_parsers: HashMap<String, FunctionParser>,
    pub type_literal_parsers: HashMap<DataType, TypeLiteralParser>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        use grammar::{ddl, dml, expressions};

        let mut statement_parsers: HashMap<TokenType, StatementParser> = HashMap::new();
        statement_parsers.insert(TokenType::Create, ddl::parse_create);
        statement_parsers.insert(TokenType::Alter, ddl::parse_alter);
        statement_parsers.insert(TokenType::Drop, ddl::parse_drop);
        statement_parsers.insert(TokenType::Insert, dml::parse_insert);
        statement_parsers.insert(TokenType::Update, dml::parse_update);
        statement_parsers.insert(TokenType::Delete, dml::parse_delete);
        statement_parsers.insert(TokenType::Select, dml::parse_select_statement);
        statement_parsers.insert(TokenType::LParen, dml::parse_wrapped_select);
        statement_parsers.insert(TokenType::Use, dml::parse_use);

        let mut functions: HashMap<String, FunctionBuilder> = HashMap::new();
        for name in ["COALESCE", "NVL", "IFNULL"] {
            functions.insert(name.to_string(), expressions::build_coalesce);
        }
        for name in ["SUBSTRING", "SUBSTR"] {
            functions.insert(name.to_string(), expressions::build_substring);
        }
        for name in ["POWER", "POW"] {
            functions.insert(name.to_string(), expressions::build_pow);
        }
        for name in ["LOWER", "LCASE"] {
            functions.insert(name.to_string(), expressions::build_lower);
        }

        let mut function_parsers: HashMap<String, FunctionParser> = HashMap::new();
        function_parsers.insert("EXTRACT".to_string(), expressions::parse_extract);

        Self {
            statement_parsers,
            functions,
            function_parsers,
            type_literal_parsers: HashMap::new(),
        }
    }
}

/// Token cursor plus the arena of the statement being built.
/// Deepest expression nesting accepted before the parser gives up.
pub const MAX_NESTING: usize = 100;

pub struct Parser<'a> {
    dialect: &'a str,
    config: &'a ParserConfig,
    tokens: &'a [Token],
    pos: usize,
    /// Active expression nesting, bounded by [`MAX_NESTING`].
    depth: usize,
    pub tree: Tree,
}

/// Parse every statement; the first error aborts.
pub fn parse(tokens: &[Token], dialect: &str, config: &ParserConfig) -> BridgeResult<Vec<Ast>> {
    let mut parser = Parser::new(tokens, dialect, config);
    let mut statements = Vec::new();
    while parser.skip_semicolons() {
        statements.push(parser.parse_statement()?);
    }
    Ok(statements)
}

/// Parse every statement, recovering at the next `;` after a failure.
pub fn parse_batch(tokens: &[Token], dialect: &str, config: &ParserConfig) -> Vec<BridgeResult<Ast>> {
    let mut parser = Parser::new(tokens, dialect, config);
    let mut results = Vec::new();
    while parser.skip_semicolons() {
        match parser.parse_statement() {
            Ok(ast) => results.push(Ok(ast)),
            Err(err) => {
                tracing::debug!(dialect, error = %err, "statement failed to parse, resynchronizing");
                results.push(Err(err));
                parser.synchronize();
            }
        }
    }
    results
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], dialect: &'a str, config: &'a ParserConfig) -> Self {
        Self {
            dialect,
            config,
            tokens,
            pos: 0,
            depth: 0,
            tree: Tree::new(),
        }
    }

    pub fn dialect(&self) -> &'a str {
        self.dialect
    }

    pub fn config(&self) -> &'a ParserConfig {
        self.config
    }

    /// Parse one statement into a fresh arena.
    pub fn parse_statement(&mut self) -> BridgeResult<Ast> {
        self.tree = Tree::new();
        self.depth = 0;
        let Some(first) = self.current() else {
            return Err(self.expected("a statement"));
        };
        let start = first.span.start;

        let Some(handler) = self.config.statement_parsers.get(&first.kind).copied() else {
            return Err(self.error(format!("Unsupported statement starting with '{}'", first.text)));
        };
        self.advance();
        tracing::debug!(dialect = self.dialect, leading = %first.kind, "dispatching statement");
        let root = handler(self)?;

        if !self.at_eof() && !self.check(TokenType::Semicolon) {
            return Err(self.error("Unexpected input after end of statement"));
        }
        let end = self.prev().map(|t| t.span.end).unwrap_or(start);

        Ok(Ast {
            tree: std::mem::take(&mut self.tree),
            root,
            span: Span::new(start, end),
        })
    }

    /// Skip statement separators; returns whether input remains.
    fn skip_semicolons(&mut self) -> bool {
        while self.match_token(TokenType::Semicolon) {}
        !self.at_eof()
    }

    /// Drop tokens up to and including the next `;`.
    fn synchronize(&mut self) {
        while let Some(token) = self.advance() {
            if token.kind == TokenType::Semicolon {
                break;
            }
        }
    }

    // ========== Cursor ==========

    pub fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    pub fn peek_kind(&self, offset: usize) -> Option<TokenType> {
        self.tokens.get(self.pos + offset).map(|t| t.kind)
    }

    pub fn prev(&self) -> Option<&'a Token> {
        self.pos.checked_sub(1).and_then(|i| self.tokens.get(i))
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    pub fn check(&self, kind: TokenType) -> bool {
        self.peek_kind(0) == Some(kind)
    }

    pub fn check_next(&self, kind: TokenType) -> bool {
        self.peek_kind(1) == Some(kind)
    }

    pub fn match_token(&mut self, kind: TokenType) -> bool {
        if self.check(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn match_any(&mut self, kinds: &[TokenType]) -> Option<TokenType> {
        let kind = self.peek_kind(0)?;
        if kinds.contains(&kind) {
            self.pos += 1;
            Some(kind)
        } else {
            None
        }
    }

    /// Whether the current token is the bare word `word` (any keyword or name).
    pub fn check_text(&self, word: &str) -> bool {
        self.check_text_at(0, word)
    }

    pub fn check_text_at(&self, offset: usize, word: &str) -> bool {
        self.tokens
            .get(self.pos + offset)
            .is_some_and(|t| t.is_word() && t.text.eq_ignore_ascii_case(word))
    }

    pub fn match_text(&mut self, word: &str) -> bool {
        if self.check_text(word) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Match a run of bare words; consumes nothing unless all of them match.
    pub fn match_text_seq(&mut self, words: &[&str]) -> bool {
        if words
            .iter()
            .enumerate()
            .all(|(i, word)| self.check_text_at(i, word))
        {
            self.pos += words.len();
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, kind: TokenType, what: &str) -> BridgeResult<&'a Token> {
        match self.current() {
            Some(token) if token.kind == kind => {
                self.pos += 1;
                Ok(token)
            }
            _ => Err(self.expected(what)),
        }
    }

    pub fn expect_text(&mut self, word: &str) -> BridgeResult<()> {
        if self.match_text(word) {
            Ok(())
        } else {
            Err(self.expected(word))
        }
    }

    /// Run `f`, rewinding the cursor if it fails.
    pub fn try_parse<T>(&mut self, f: impl FnOnce(&mut Self) -> BridgeResult<T>) -> Option<T> {
        let saved = self.pos;
        match f(self) {
            Ok(value) => Some(value),
            Err(_) => {
                self.pos = saved;
                None
            }
        }
    }

    pub fn parse_csv<T>(&mut self, mut f: impl FnMut(&mut Self) -> BridgeResult<T>) -> BridgeResult<Vec<T>> {
        let mut items = vec![f(self)?];
        while self.match_token(TokenType::Comma) {
            items.push(f(self)?);
        }
        Ok(items)
    }

    /// `( item, item, ... )`
    pub fn parse_wrapped_csv<T>(&mut self, f: impl FnMut(&mut Self) -> BridgeResult<T>) -> BridgeResult<Vec<T>> {
        self.expect(TokenType::LParen, "'('")?;
        let items = self.parse_csv(f)?;
        self.expect(TokenType::RParen, "')'")?;
        Ok(items)
    }

    // ========== Names ==========

    /// A name token: quoted identifier, unmatched word, type name or any
    /// non-reserved keyword.
    pub fn try_identifier(&mut self) -> Option<NodeId> {
        let token = self.current()?;
        let quoted = match token.kind {
            TokenType::Identifier => true,
            TokenType::Var | TokenType::Type(_) => false,
            TokenType::Introducer | TokenType::CharacterSet => return None,
            kind if token.is_word() && !kind.is_reserved() => false,
            _ => return None,
        };
        self.pos += 1;
        Some(self.tree.identifier(token.text.clone(), quoted))
    }

    pub fn parse_identifier(&mut self) -> BridgeResult<NodeId> {
        match self.try_identifier() {
            Some(id) => Ok(id),
            None => Err(self.expected("identifier")),
        }
    }

    /// `name` or `schema.name`.
    pub fn parse_table(&mut self) -> BridgeResult<NodeId> {
        let first = self.parse_identifier()?;
        if self.match_token(TokenType::Dot) {
            let name = self.parse_identifier()?;
            return Ok(self.tree.add(
                NodeKind::Table,
                [("this", Arg::from(name)), ("db", Arg::from(first))],
            ));
        }
        Ok(self.tree.add(NodeKind::Table, [("this", Arg::from(first))]))
    }

    /// Optionally signed numeric literal, kept as written.
    pub fn parse_signed_number(&mut self) -> BridgeResult<String> {
        let sign = match self.match_any(&[TokenType::Dash, TokenType::Plus]) {
            Some(TokenType::Dash) => "-",
            _ => "",
        };
        let number = self.expect(TokenType::Number, "number")?;
        Ok(format!("{}{}", sign, number.text))
    }

    // ========== Errors ==========

    pub fn error(&self, message: impl Into<String>) -> BridgeError {
        let (near, line, col, span) = match self.current() {
            Some(token) => (token.text.clone(), token.line, token.col, token.span),
            None => match self.tokens.last() {
                Some(last) => (
                    "end of input".to_string(),
                    last.line,
                    last.col + (last.span.end - last.span.start),
                    Span::new(last.span.end, last.span.end),
                ),
                None => ("end of input".to_string(), 1, 1, Span::default()),
            },
        };
        BridgeError::Parse {
            dialect: self.dialect.to_string(),
            message: message.into(),
            near,
            line,
            col,
            span,
        }
    }

    pub fn expected(&self, what: &str) -> BridgeError {
        self.error(format!("Expected {}", what))
    }

    /// Enter one level of expression nesting. Pair with [`Parser::ascend`].
    pub fn descend(&mut self) -> BridgeResult<()> {
        if self.depth >= MAX_NESTING {
            return Err(self.error("Expression nested too deeply"));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
