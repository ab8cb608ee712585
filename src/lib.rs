//! # sqlbridge
//!
//! SQL dialect translation: tokenize with the source dialect's lexical rules,
//! parse into a dialect-neutral tree, then render for the target dialect.
//!
//! ## Quick Example
//!
//! ```rust
//! let sql = sqlbridge::translate(
//!     "CREATE TABLE `t` (`id` INT AUTO_INCREMENT) ENGINE=InnoDB",
//!     "mysql",
//!     "postgres",
//! )
//! .unwrap();
//! assert_eq!(sql, vec!["CREATE TABLE \"t\" (\"id\" INT GENERATED BY DEFAULT AS IDENTITY)"]);
//! ```
//!
//! ## Pipeline
//!
//! | Stage       | Module         | Dialect input                         |
//! |-------------|----------------|---------------------------------------|
//! | Tokenize    | [`tokenizer`]  | keywords, quotes, comments, escapes   |
//! | Parse       | [`parser`]     | statement, function and literal hooks |
//! | Generate    | [`transpiler`] | type names, transforms, placements    |
//!
//! Dialects live in a [`dialect::DialectRegistry`]; [`engine::Translator`] drives
//! whole translations, including best-effort batches.

pub mod ast;
pub mod config;
pub mod dialect;
pub mod engine;
pub mod error;
pub mod parser;
pub mod tokenizer;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::{Ast, DataType, NodeId, NodeKind, Tree};
    pub use crate::config::BridgeConfig;
    pub use crate::dialect::{Dialect, DialectBuilder, DialectRegistry};
    pub use crate::engine::{BatchReport, TranslateOptions, Translation, Translator};
    pub use crate::error::*;
    pub use crate::transpiler::UnsupportedLevel;
}

/// Translate `sql` from dialect `read` to dialect `write` using the built-in
/// registry. Returns one string per rendered statement.
///
/// Constructs the target cannot express are dropped; use
/// [`engine::Translator`] to see the diagnostics or make them fatal.
pub fn translate(sql: &str, read: &str, write: &str) -> error::BridgeResult<Vec<String>> {
    let registry = dialect::DialectRegistry::global()?;
    let translation = engine::Translator::new(registry).translate(sql, read, write)?;
    Ok(translation.statements)
}
