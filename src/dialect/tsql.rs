//! T-SQL (SQL Server).

use super::Dialect;
use crate::ast::{DataType, NodeId, NodeKind};
use crate::error::BridgeResult;
use crate::transpiler::{transform, ConcatStyle, Generator, LimitStyle, PropertyPlacement};

pub fn dialect() -> BridgeResult<Dialect> {
    let mut builder = Dialect::builder("tsql")
        .identifiers(vec![('[', ']'), ('"', '"')])
        .type_keyword("UNIQUEIDENTIFIER", DataType::Uuid)
        .type_keyword("DATETIME2", DataType::Timestamp)
        .generator(|config| {
            config.identifier_quote = ('[', ']');
            config.limit_style = LimitStyle::Fetch;
            config.concat_style = ConcatStyle::Plus;
            config.bool_as_int = true;
            config.alter_add_column_keyword = false;
        });

    for (data_type, name) in [
        (DataType::Int, "INTEGER"),
        (DataType::Decimal, "NUMERIC"),
        (DataType::Boolean, "BIT"),
        (DataType::Double, "FLOAT"),
        (DataType::Text, "VARCHAR(MAX)"),
        (DataType::Timestamp, "DATETIME2"),
        (DataType::Uuid, "UNIQUEIDENTIFIER"),
        (DataType::Blob, "VARBINARY(MAX)"),
        (DataType::Json, "NVARCHAR(MAX)"),
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
        .preprocess(NodeKind::ILike, transform::lower_ilike)
        .preprocess(NodeKind::ColumnDef, transform::auto_increment_to_identity)
        .preprocess(NodeKind::IndexConstraint, transform::index_constraint_to_statement)
        .render(NodeKind::GeneratedAsIdentityColumnConstraint, identity_sql)
        .unsupported(NodeKind::CommentColumnConstraint, "column comments are not supported")
        .unsupported(NodeKind::ExclusiveLock, "LOCK TABLE is not supported; use a table hint")
        .build()
}

/// `IDENTITY(start,increment)`, defaulting to `(1,1)`.
fn identity_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let start = g.tree.text(id, "start").unwrap_or("1");
    let increment = g.tree.text(id, "increment").unwrap_or("1");
    Ok(format!("IDENTITY({},{})", start, increment))
}
