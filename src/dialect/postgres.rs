//! PostgreSQL.
//!
//! MySQL table options have no Postgres spelling and are reported. Inline `KEY`
//! definitions and column comments become separate statements after the
//! `CREATE TABLE`.

use super::Dialect;
use crate::ast::{DataType, NodeKind};
use crate::error::BridgeResult;
use crate::parser::grammar::dml;
use crate::tokenizer::TokenType;
use crate::transpiler::{self, transform, PropertyPlacement};

pub fn dialect() -> BridgeResult<Dialect> {
    let mut builder = Dialect::builder("postgres")
        .nested_comments(true)
        .type_keyword("BYTEA", DataType::Blob)
        .statement_parser(TokenType::Comment, dml::parse_comment_on)
        .statement_parser(TokenType::Lock, dml::parse_lock);

    for (data_type, name) in [
        (DataType::TinyInt, "SMALLINT"),
        (DataType::MediumInt, "INT"),
        (DataType::Double, "DOUBLE PRECISION"),
        (DataType::DateTime, "TIMESTAMP"),
        (DataType::Blob, "BYTEA"),
        (DataType::TinyBlob, "BYTEA"),
        (DataType::MediumBlob, "BYTEA"),
        (DataType::LongBlob, "BYTEA"),
        (DataType::Binary, "BYTEA"),
        (DataType::VarBinary, "BYTEA"),
        (DataType::TinyText, "TEXT"),
        (DataType::MediumText, "TEXT"),
        (DataType::LongText, "TEXT"),
    ] {
        builder = builder.type_mapping(data_type, name);
    }

    for kind in [
        NodeKind::EngineProperty,
        NodeKind::CharacterSetProperty,
        NodeKind::CollateProperty,
        NodeKind::AutoIncrementProperty,
        NodeKind::CommentProperty,
        NodeKind::VolatileProperty,
    ] {
        builder = builder.property_placement(kind, PropertyPlacement::Unsupported);
    }

    builder
        .preprocess(NodeKind::ColumnDef, transform::auto_increment_to_identity)
        .preprocess(NodeKind::CommentColumnConstraint, transform::column_comment_to_statement)
        .preprocess(NodeKind::IndexConstraint, transform::index_constraint_to_statement)
        .unsupported(NodeKind::CharacterSetColumnConstraint, "column character sets are not supported")
        .render(NodeKind::ExclusiveLock, transpiler::dml::lock_in_mode_sql)
        .build()
}
