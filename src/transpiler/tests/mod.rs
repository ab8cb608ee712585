//! End-to-end rendering tests: parse with one built-in dialect, render with another.

mod basics;
mod dialects;

use crate::dialect::DialectRegistry;
use crate::engine::{TranslateOptions, Translation, Translator};
use crate::error::BridgeResult;
use crate::transpiler::UnsupportedLevel;

fn registry() -> &'static DialectRegistry {
    DialectRegistry::global().unwrap()
}

/// Translate and return the diagnostics too.
fn translation(sql: &str, read: &str, write: &str) -> Translation {
    Translator::new(registry()).translate(sql, read, write).unwrap()
}

/// Translate, expecting no diagnostics.
fn transpile(sql: &str, read: &str, write: &str) -> Vec<String> {
    let translation = translation(sql, read, write);
    assert!(
        translation.diagnostics.is_empty(),
        "unexpected diagnostics for {sql:?}: {:?}",
        translation.diagnostics
    );
    translation.statements
}

/// Translate a single statement that renders to exactly one statement.
fn transpile_one(sql: &str, read: &str, write: &str) -> String {
    let mut statements = transpile(sql, read, write);
    assert_eq!(statements.len(), 1, "expected one statement, got {statements:?}");
    statements.remove(0)
}

fn transpile_with(sql: &str, read: &str, write: &str, unsupported: UnsupportedLevel) -> BridgeResult<Translation> {
    let options = TranslateOptions {
        unsupported,
        strict: false,
    };
    Translator::new(registry())
        .with_options(options)
        .translate(sql, read, write)
}
