//! Oracle.

use super::Dialect;
use crate::ast::{Arg, DataType, NodeId, NodeKind, Tree};
use crate::error::BridgeResult;
use crate::parser::grammar::{dml, expressions as grammar};
use crate::parser::Parser;
use crate::tokenizer::{CommentDelimiter, TokenType};
use crate::transpiler::{self, expressions, transform, Generator, LimitStyle, PropertyPlacement};

pub fn dialect() -> BridgeResult<Dialect> {
    let mut builder = Dialect::builder("oracle")
        .type_keyword("VARCHAR2", DataType::VarChar)
        .type_keyword("NVARCHAR2", DataType::NVarChar)
        .type_keyword("NUMBER", DataType::Decimal)
        .type_keyword("BINARY_DOUBLE", DataType::Double)
        .type_keyword("BINARY_FLOAT", DataType::Float)
        .comments(vec![
            CommentDelimiter::line("--"),
            CommentDelimiter::line("//"),
            CommentDelimiter::block("/*", "*/"),
        ])
        .function("SQUARE", build_square)
        .type_literal_parser(DataType::Date, parse_date_literal)
        .statement_parser(TokenType::Comment, dml::parse_comment_on)
        .statement_parser(TokenType::Lock, dml::parse_lock)
        .generator(|config| {
            config.limit_style = LimitStyle::Fetch;
            config.bool_as_int = true;
            config.table_alias_as = false;
        });

    for (data_type, name) in [
        (DataType::TinyInt, "NUMBER"),
        (DataType::SmallInt, "NUMBER"),
        (DataType::Int, "NUMBER"),
        (DataType::BigInt, "NUMBER"),
        (DataType::Decimal, "NUMBER"),
        (DataType::Double, "DOUBLE PRECISION"),
        (DataType::VarChar, "VARCHAR2"),
        (DataType::NVarChar, "NVARCHAR2"),
        (DataType::Text, "CLOB"),
        (DataType::Binary, "BLOB"),
        (DataType::VarBinary, "BLOB"),
    ] {
        builder = builder.type_mapping(data_type, name);
    }

    for kind in [
        NodeKind::VolatileProperty,
        NodeKind::EngineProperty,
        NodeKind::CharacterSetProperty,
        NodeKind::CollateProperty,
        NodeKind::AutoIncrementProperty,
        NodeKind::CommentProperty,
    ] {
        builder = builder.property_placement(kind, PropertyPlacement::Unsupported);
    }

    builder
        .render(NodeKind::Coalesce, nvl_sql)
        .render(NodeKind::Substring, substr_sql)
        .render(NodeKind::DateStrToDate, to_date_sql)
        .preprocess(NodeKind::ILike, transform::lower_ilike)
        .preprocess(NodeKind::ColumnDef, transform::auto_increment_to_identity)
        .preprocess(NodeKind::CommentColumnConstraint, transform::column_comment_to_statement)
        .preprocess(NodeKind::IndexConstraint, transform::index_constraint_to_statement)
        .render(NodeKind::ExclusiveLock, transpiler::dml::lock_in_mode_sql)
        .build()
}

/// `SQUARE(x)` is `POWER(x, 2)`.
fn build_square(tree: &mut Tree, name: &str, args: Vec<NodeId>) -> NodeId {
    match args.as_slice() {
        [this] => {
            let two = tree.number_literal("2");
            tree.add(
                NodeKind::Pow,
                [("this", Arg::from(*this)), ("expression", Arg::from(two))],
            )
        }
        _ => grammar::anonymous(tree, name, args),
    }
}

/// `DATE '2024-01-31'` reads as a date-string conversion.
fn parse_date_literal(p: &mut Parser<'_>, literal: NodeId) -> BridgeResult<NodeId> {
    Ok(p.tree.add(NodeKind::DateStrToDate, [("this", Arg::from(literal))]))
}

fn nvl_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    expressions::function_sql(g, id, "NVL")
}

fn substr_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    expressions::function_sql(g, id, "SUBSTR")
}

fn to_date_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let value = g.child_sql(id, "this")?;
    Ok(format!("TO_DATE({}, 'YYYY-MM-DD')", value))
}
