//! Dialect descriptors.
//!
//! A [`Dialect`] bundles everything that differs between SQL flavours: the
//! tokenizer's keyword and delimiter tables, the parser's statement and function
//! tables, the generator's rendering switches and the per-node transform registry.
//! Descriptors are assembled with [`DialectBuilder`] and are immutable once built.

pub mod generic;
pub mod mysql;
pub mod nuodb;
pub mod oracle;
pub mod postgres;
pub mod registry;
pub mod tsql;

pub use registry::{DialectRegistry, RegistryBuilder};

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::ast::{Ast, DataType, NodeKind};
use crate::error::{BridgeError, BridgeResult};
use crate::parser::{self, FunctionBuilder, FunctionParser, ParserConfig, StatementParser, TypeLiteralParser};
use crate::tokenizer::{CommentDelimiter, StringDelimiter, Token, TokenType, Tokenizer, TokenizerConfig};
use crate::transpiler::{self, GeneratorConfig, PreprocessFn, PropertyPlacement, RenderFn, Transform};

/// An immutable, fully assembled SQL dialect.
#[derive(Clone)]
pub struct Dialect {
    name: String,
    tokenizer: TokenizerConfig,
    parser: ParserConfig,
    generator: GeneratorConfig,
    transforms: HashMap<NodeKind, Transform>,
}

impl fmt::Debug for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut overridden: Vec<_> = self.transforms.keys().collect();
        overridden.sort();
        f.debug_struct("Dialect")
            .field("name", &self.name)
            .field("keywords", &self.tokenizer.keywords.len())
            .field("statement_parsers", &self.parser.statement_parsers.len())
            .field("generator", &self.generator)
            .field("transforms", &overridden)
            .finish()
    }
}

impl Dialect {
    /// Start a dialect from the neutral defaults.
    pub fn builder(name: impl Into<String>) -> DialectBuilder {
        DialectBuilder {
            name: name.into().to_ascii_lowercase(),
            tokenizer: TokenizerConfig::default(),
            parser: ParserConfig::default(),
            generator: GeneratorConfig::default(),
            transforms: HashMap::new(),
        }
    }

    /// Start a dialect from a copy of `base`; later builder calls override it.
    pub fn derive(name: impl Into<String>, base: &Dialect) -> DialectBuilder {
        DialectBuilder {
            name: name.into().to_ascii_lowercase(),
            tokenizer: base.tokenizer.clone(),
            parser: base.parser.clone(),
            generator: base.generator.clone(),
            transforms: base.transforms.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tokenizer_config(&self) -> &TokenizerConfig {
        &self.tokenizer
    }

    pub fn parser_config(&self) -> &ParserConfig {
        &self.parser
    }

    pub fn generator_config(&self) -> &GeneratorConfig {
        &self.generator
    }

    /// The override registered for a node kind, if any.
    pub fn transform(&self, kind: NodeKind) -> Option<&Transform> {
        self.transforms.get(&kind)
    }

    pub fn tokenize(&self, sql: &str) -> BridgeResult<Vec<Token>> {
        Tokenizer::new(&self.name, &self.tokenizer).tokenize(sql)
    }

    /// Parse every statement in `sql`; the first error aborts.
    pub fn parse(&self, sql: &str) -> BridgeResult<Vec<Ast>> {
        let tokens = self.tokenize(sql)?;
        parser::parse(&tokens, &self.name, &self.parser)
    }

    /// Parse statement by statement, keeping going after a parse error.
    ///
    /// A tokenizer error is still fatal for the whole batch since statement
    /// boundaries cannot be trusted past it.
    pub fn parse_batch(&self, sql: &str) -> BridgeResult<Vec<BridgeResult<Ast>>> {
        let tokens = self.tokenize(sql)?;
        Ok(parser::parse_batch(&tokens, &self.name, &self.parser))
    }

    /// Render one statement, followed by any auxiliary statements it needs.
    pub fn generate(&self, ast: &Ast) -> BridgeResult<Vec<String>> {
        transpiler::generate(ast, self)
    }
}

/// Assembles a [`Dialect`].
pub struct DialectBuilder {
    name: String,
    tokenizer: TokenizerConfig,
    parser: ParserConfig,
    generator: GeneratorConfig,
    transforms: HashMap<NodeKind, Transform>,
}

impl DialectBuilder {
    pub fn name(&self) -> &str {
        &self.name
    }

    // ========== Tokenizer ==========

    pub fn keyword(mut self, word: &str, kind: TokenType) -> Self {
        self.tokenizer.keyword(word, kind);
        self
    }

    /// A type name that maps onto an existing type tag (`VARCHAR2` as `VARCHAR`).
    pub fn type_keyword(self, word: &str, data_type: DataType) -> Self {
        self.keyword(word, TokenType::Type(data_type))
    }

    pub fn quotes(mut self, quotes: Vec<StringDelimiter>) -> Self {
        self.tokenizer.quotes = quotes;
        self
    }

    pub fn identifiers(mut self, identifiers: Vec<(char, char)>) -> Self {
        self.tokenizer.identifiers = identifiers;
        self
    }

    pub fn comments(mut self, comments: Vec<CommentDelimiter>) -> Self {
        self.tokenizer.comments = comments;
        self
    }

    pub fn string_escapes(mut self, escapes: Vec<char>) -> Self {
        self.tokenizer.string_escapes = escapes;
        self
    }

    pub fn nested_comments(mut self, nested: bool) -> Self {
        self.tokenizer.nested_comments = nested;
        self
    }

    /// Arbitrary edits to the tokenizer configuration.
    pub fn tokenizer(mut self, edit: impl FnOnce(&mut TokenizerConfig)) -> Self {
        edit(&mut self.tokenizer);
        self
    }

    // ========== Parser ==========

    pub fn statement_parser(mut self, leading: TokenType, parser: StatementParser) -> Self {
        self.parser.statement_parsers.insert(leading, parser);
        self
    }

    pub fn function(mut self, name: &str, builder: FunctionBuilder) -> Self {
        self.parser.functions.insert(name.to_ascii_uppercase(), builder);
        self
    }

    pub fn function_parser(mut self, name: &str, parser: FunctionParser) -> Self {
        self.parser.function_parsers.insert(name.to_ascii_uppercase(), parser);
        self
    }

    pub fn type_literal_parser(mut self, data_type: DataType, parser: TypeLiteralParser) -> Self {
        self.parser.type_literal_parsers.insert(data_type, parser);
        self
    }

    // ========== Generator ==========

    pub fn type_mapping(mut self, data_type: DataType, name: &str) -> Self {
        self.generator.type_mapping.insert(data_type, name.to_string());
        self
    }

    pub fn property_placement(mut self, kind: NodeKind, placement: PropertyPlacement) -> Self {
        self.generator.property_placement.insert(kind, placement);
        self
    }

    /// Arbitrary edits to the rendering switches.
    pub fn generator(mut self, edit: impl FnOnce(&mut GeneratorConfig)) -> Self {
        edit(&mut self.generator);
        self
    }

    pub fn render(self, kind: NodeKind, render: RenderFn) -> Self {
        self.transform(kind, Transform::Render(render))
    }

    /// Append a pre-processing stage. Stages registered for the same kind run in
    /// registration order; any other transform for the kind is replaced.
    pub fn preprocess(mut self, kind: NodeKind, step: PreprocessFn) -> Self {
        match self.transforms.get_mut(&kind) {
            Some(Transform::Preprocess(steps)) => steps.push(step),
            _ => {
                self.transforms.insert(kind, Transform::Preprocess(vec![step]));
            }
        }
        self
    }

    pub fn unsupported(self, kind: NodeKind, message: impl Into<String>) -> Self {
        self.transform(kind, Transform::Unsupported(message.into()))
    }

    pub fn transform(mut self, kind: NodeKind, transform: Transform) -> Self {
        self.transforms.insert(kind, transform);
        self
    }

    /// Drop an inherited override so the kind renders with the default again.
    pub fn clear_transform(mut self, kind: NodeKind) -> Self {
        self.transforms.remove(&kind);
        self
    }

    pub fn build(self) -> BridgeResult<Dialect> {
        self.tokenizer
            .validate()
            .map_err(|reason| BridgeError::config(format!("dialect '{}': {}", self.name, reason)))?;
        debug!(
            dialect = %self.name,
            keywords = self.tokenizer.keywords.len(),
            transforms = self.transforms.len(),
            "dialect built"
        );
        Ok(Dialect {
            name: self.name,
            tokenizer: self.tokenizer,
            parser: self.parser,
            generator: self.generator,
            transforms: self.transforms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transpiler::Preprocessed;
    use pretty_assertions::assert_eq;

    fn passthrough(
        _g: &mut crate::transpiler::Generator<'_>,
        id: crate::ast::NodeId,
    ) -> BridgeResult<Preprocessed> {
        Ok(Preprocessed::Node(id))
    }

    #[test]
    fn test_builder_lowercases_name() {
        let dialect = Dialect::builder("Custom").build().unwrap();
        assert_eq!(dialect.name(), "custom");
    }

    #[test]
    fn test_derive_copies_then_overrides() {
        let base = Dialect::builder("base")
            .type_mapping(DataType::Int, "INTEGER")
            .type_mapping(DataType::Text, "CLOB")
            .build()
            .unwrap();
        let derived = Dialect::derive("derived", &base)
            .type_mapping(DataType::Text, "VARCHAR(MAX)")
            .build()
            .unwrap();

        assert_eq!(derived.generator_config().type_name(DataType::Int), "INTEGER");
        assert_eq!(derived.generator_config().type_name(DataType::Text), "VARCHAR(MAX)");
        assert_eq!(base.generator_config().type_name(DataType::Text), "CLOB");
    }

    #[test]
    fn test_preprocess_stages_accumulate() {
        let dialect = Dialect::builder("d")
            .preprocess(NodeKind::Table, passthrough)
            .preprocess(NodeKind::Table, passthrough)
            .build()
            .unwrap();
        match dialect.transform(NodeKind::Table) {
            Some(Transform::Preprocess(steps)) => assert_eq!(steps.len(), 2),
            other => panic!("expected preprocess chain, got {:?}", other),
        }
    }

    #[test]
    fn test_colliding_delimiters_fail_build() {
        let err = Dialect::builder("broken")
            .quotes(vec![StringDelimiter::new("'", "'"), StringDelimiter::new("\"", "\"")])
            .identifiers(vec![('"', '"')])
            .build()
            .unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_clear_transform_restores_default() {
        let dialect = Dialect::builder("d")
            .unsupported(NodeKind::ILike, "no ILIKE")
            .clear_transform(NodeKind::ILike)
            .build()
            .unwrap();
        assert!(dialect.transform(NodeKind::ILike).is_none());
    }
}
