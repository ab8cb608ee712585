//! Translation sessions.
//!
//! A [`Translator`] reads SQL in one registered dialect and writes it in another.
//! All statements of one call share a [`GenerationContext`], so a schema created
//! or selected by an earlier statement is visible to later ones.

use serde::Serialize;
use tracing::{debug, warn};

use crate::ast::Ast;
use crate::dialect::{Dialect, DialectRegistry};
use crate::error::{BridgeError, BridgeResult, UnsupportedDiagnostic};
use crate::transpiler::{GenerationContext, Generator, UnsupportedLevel};

/// How a translation reacts to problems.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslateOptions {
    pub unsupported: UnsupportedLevel,
    /// Batch mode only: stop at the first statement that fails.
    pub strict: bool,
}

/// Output of a whole-input translation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Translation {
    /// One entry per rendered statement, auxiliary statements after their primary.
    pub statements: Vec<String>,
    pub diagnostics: Vec<UnsupportedDiagnostic>,
}

/// Outcome of one input statement in batch mode.
#[derive(Debug)]
pub struct StatementOutcome {
    /// Position of the statement in the input, from zero.
    pub index: usize,
    pub result: BridgeResult<Vec<String>>,
    pub diagnostics: Vec<UnsupportedDiagnostic>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub statements: Vec<StatementOutcome>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.statements.iter().all(|s| s.result.is_ok())
    }

    /// Every rendered statement of the statements that succeeded, in order.
    pub fn sql(&self) -> Vec<&str> {
        self.statements
            .iter()
            .filter_map(|s| s.result.as_ref().ok())
            .flatten()
            .map(String::as_str)
            .collect()
    }

    pub fn errors(&self) -> impl Iterator<Item = (usize, &BridgeError)> {
        self.statements
            .iter()
            .filter_map(|s| s.result.as_ref().err().map(|e| (s.index, e)))
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &UnsupportedDiagnostic> {
        self.statements.iter().flat_map(|s| s.diagnostics.iter())
    }
}

/// Translates between dialects of one registry.
#[derive(Debug, Clone, Copy)]
pub struct Translator<'r> {
    registry: &'r DialectRegistry,
    options: TranslateOptions,
}

impl<'r> Translator<'r> {
    pub fn new(registry: &'r DialectRegistry) -> Self {
        Self {
            registry,
            options: TranslateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TranslateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> TranslateOptions {
        self.options
    }

    /// Translate every statement; the first error of any kind aborts.
    pub fn translate(&self, sql: &str, read: &str, write: &str) -> BridgeResult<Translation> {
        let (reader, writer) = self.dialects(read, write)?;
        let statements = reader.parse(sql)?;
        debug!(read = reader.name(), write = writer.name(), statements = statements.len(), "translating");

        let mut context = GenerationContext::new();
        let mut translation = Translation::default();
        for ast in &statements {
            let (rendered, diagnostics) = self.generate(ast, writer, &mut context)?;
            translation.statements.extend(rendered);
            translation.diagnostics.extend(diagnostics);
        }
        Ok(translation)
    }

    /// Translate statement by statement, reporting each outcome separately.
    ///
    /// Tokenizer errors are fatal for the whole input. In strict mode the first
    /// failing statement is returned as the error instead of a report.
    pub fn translate_batch(&self, sql: &str, read: &str, write: &str) -> BridgeResult<BatchReport> {
        let (reader, writer) = self.dialects(read, write)?;
        let parsed = reader.parse_batch(sql)?;

        let mut context = GenerationContext::new();
        let mut report = BatchReport::default();
        for (index, parsed) in parsed.into_iter().enumerate() {
            let outcome = match parsed.and_then(|ast| self.generate(&ast, writer, &mut context)) {
                Ok((rendered, diagnostics)) => StatementOutcome {
                    index,
                    result: Ok(rendered),
                    diagnostics,
                },
                Err(err) => {
                    if self.options.strict {
                        return Err(err);
                    }
                    warn!(index, error = %err, "statement failed");
                    StatementOutcome {
                        index,
                        result: Err(err),
                        diagnostics: context.take_diagnostics(),
                    }
                }
            };
            report.statements.push(outcome);
        }
        Ok(report)
    }

    fn dialects(&self, read: &str, write: &str) -> BridgeResult<(&'r Dialect, &'r Dialect)> {
        Ok((self.registry.get(read)?, self.registry.get(write)?))
    }

    /// Render one statement on a private copy of its tree.
    fn generate(
        &self,
        ast: &Ast,
        writer: &Dialect,
        context: &mut GenerationContext,
    ) -> BridgeResult<(Vec<String>, Vec<UnsupportedDiagnostic>)> {
        let mut tree = ast.tree.clone();
        let rendered = {
            let mut generator = Generator::new(&mut tree, writer, context, self.options.unsupported);
            generator.generate_statement(ast.root)?
        };
        let diagnostics = context.take_diagnostics();
        if self.options.unsupported == UnsupportedLevel::Raise && !diagnostics.is_empty() {
            return Err(BridgeError::unsupported(writer.name(), diagnostics));
        }
        Ok((rendered, diagnostics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn registry() -> DialectRegistry {
        DialectRegistry::builtin().unwrap()
    }

    #[test]
    fn test_translate_collects_diagnostics() {
        let registry = registry();
        let translation = Translator::new(&registry)
            .translate("CREATE TABLE t (id INT) ENGINE=InnoDB", "mysql", "postgres")
            .unwrap();
        assert_eq!(translation.statements, vec!["CREATE TABLE t (id INT)"]);
        assert_eq!(translation.diagnostics.len(), 1);
        assert_eq!(translation.diagnostics[0].dialect, "postgres");
    }

    #[test]
    fn test_raise_fails_after_rendering() {
        let registry = registry();
        let options = TranslateOptions {
            unsupported: UnsupportedLevel::Raise,
            strict: false,
        };
        let err = Translator::new(&registry)
            .with_options(options)
            .translate("CREATE TABLE t (id INT) ENGINE=InnoDB", "mysql", "postgres")
            .unwrap_err();
        match err {
            BridgeError::Unsupported { dialect, diagnostics } => {
                assert_eq!(dialect, "postgres");
                assert_eq!(diagnostics.len(), 1);
            }
            other => panic!("expected unsupported error, got {other}"),
        }
    }

    #[test]
    fn test_batch_reports_each_statement() {
        let registry = registry();
        let report = Translator::new(&registry)
            .translate_batch("SELECT a FROM t; SELECT FROM; DELETE FROM t", "generic", "generic")
            .unwrap();
        assert_eq!(report.statements.len(), 3);
        assert!(!report.is_success());
        assert_eq!(report.sql(), vec!["SELECT a FROM t", "DELETE FROM t"]);
        let failed: Vec<usize> = report.errors().map(|(index, _)| index).collect();
        assert_eq!(failed, vec![1]);
    }

    #[test]
    fn test_strict_batch_aborts() {
        let registry = registry();
        let options = TranslateOptions {
            unsupported: UnsupportedLevel::Warn,
            strict: true,
        };
        let err = Translator::new(&registry)
            .with_options(options)
            .translate_batch("SELECT a FROM t; SELECT FROM", "generic", "generic")
            .unwrap_err();
        assert_eq!(err.category(), "ParseError");
    }

    #[test]
    fn test_unknown_dialect() {
        let registry = registry();
        let err = Translator::new(&registry)
            .translate("SELECT 1", "generic", "sybase")
            .unwrap_err();
        assert!(matches!(err, BridgeError::UnknownDialect(_)));
    }

    #[test]
    fn test_tokenizer_error_is_fatal_for_batch() {
        let registry = registry();
        let err = Translator::new(&registry)
            .translate_batch("SELECT 'open; SELECT 1", "generic", "generic")
            .unwrap_err();
        assert_eq!(err.category(), "SyntaxError");
    }
}
