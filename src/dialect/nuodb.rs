//! NuoDB.
//!
//! Reads MySQL-flavoured DDL (backticks, `ENGINE=` options, `AUTO_INCREMENT`) and
//! writes what NuoDB accepts. Foreign keys declared in `CREATE TABLE` get a
//! companion index, and `ALTER TABLE` targets are qualified with the schema the
//! session created or selected last.

use super::Dialect;
use crate::ast::{DataType, NodeId, NodeKind};
use crate::error::BridgeResult;
use crate::parser::grammar::dml;
use crate::tokenizer::{CommentDelimiter, StringDelimiter, TokenType};
use crate::transpiler::{transform, Generator, Preprocessed, PropertyPlacement};

const INTRODUCERS: &[&str] = &["_UTF8", "_UTF16", "_UTF16LE", "_UTF32", "_UTF8MB3", "_UTF8MB4"];

pub fn dialect() -> BridgeResult<Dialect> {
    let mut builder = Dialect::builder("nuodb")
        .quotes(vec![StringDelimiter::new("'", "'"), StringDelimiter::national("N'", "'")])
        .identifiers(vec![('`', '`'), ('"', '"')])
        .comments(vec![
            CommentDelimiter::line("--"),
            CommentDelimiter::line("//"),
            CommentDelimiter::block("/*", "*/"),
            CommentDelimiter::block("/* !", "*/;"),
        ])
        .string_escapes(vec!['\\'])
        .type_keyword("INT64", DataType::BigInt)
        .type_keyword("FLOAT64", DataType::Double)
        .type_keyword("NCLOB", DataType::Text)
        .type_keyword("BITS", DataType::Bit)
        .keyword("EXCLUSIVE", TokenType::Exclusive)
        .statement_parser(TokenType::Lock, dml::parse_lock)
        .generator(|config| {
            config.identifier_quote = ('`', '`');
            config.escape_backslash = true;
            config.mysql_key_syntax = true;
        });

    for word in INTRODUCERS {
        builder = builder.keyword(word, TokenType::Introducer);
    }

    for (data_type, name) in [
        (DataType::Int, "INTEGER"),
        (DataType::MediumInt, "INTEGER"),
        (DataType::TinyText, "VARCHAR(255)"),
        (DataType::Json, "TEXT"),
        (DataType::VarBinary, "BLOB"),
        (DataType::TinyBlob, "BLOB"),
    ] {
        builder = builder.type_mapping(data_type, name);
    }

    for kind in [
        NodeKind::EngineProperty,
        NodeKind::CharacterSetProperty,
        NodeKind::CollateProperty,
        NodeKind::VolatileProperty,
        NodeKind::AutoIncrementProperty,
        NodeKind::CommentProperty,
        NodeKind::PartitionedByProperty,
    ] {
        builder = builder.property_placement(kind, PropertyPlacement::Unsupported);
    }

    builder
        .preprocess(NodeKind::Create, database_to_schema)
        .preprocess(NodeKind::AlterTable, transform::qualify_with_current_schema)
        .preprocess(NodeKind::ColumnDef, transform::auto_increment_to_identity)
        .preprocess(NodeKind::CollateColumnConstraint, transform::suppress)
        .preprocess(NodeKind::CharacterSetColumnConstraint, transform::suppress)
        .unsupported(NodeKind::CommentColumnConstraint, "column comments are not supported")
        .preprocess(NodeKind::DataType, narrow_bit_and_tinyint)
        .preprocess(NodeKind::ForeignKey, transform::foreign_key_index)
        .preprocess(NodeKind::Reference, transform::reference_index)
        .render(NodeKind::ExclusiveLock, lock_table_sql)
        .build()
}

/// NuoDB has schemas, not databases.
fn database_to_schema(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<Preprocessed> {
    if g.tree.text(id, "kind") != Some("DATABASE") {
        return Ok(Preprocessed::Node(id));
    }
    let copy = g.tree.deep_copy(id);
    g.tree.set(copy, "kind", "SCHEMA");
    Ok(Preprocessed::Node(copy))
}

/// `BIT(n)` is a `BOOLEAN` and `TINYINT(n)` an `INTEGER`; display widths are dropped.
fn narrow_bit_and_tinyint(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<Preprocessed> {
    let replacement = match g.tree.text(id, "tag").and_then(DataType::from_tag) {
        Some(DataType::Bit) => DataType::Boolean,
        Some(DataType::TinyInt) => DataType::Int,
        _ => return Ok(Preprocessed::Node(id)),
    };
    let copy = g.tree.deep_copy(id);
    g.tree.set(copy, "tag", replacement.as_str());
    g.tree.remove(copy, "expressions");
    Ok(Preprocessed::Node(copy))
}

/// `LOCK TABLE t EXCLUSIVE`, whatever mode the source asked for.
fn lock_table_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let table = g.child_sql(id, "this")?;
    Ok(format!("LOCK TABLE {} EXCLUSIVE", table))
}
