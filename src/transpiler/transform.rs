//! Transform registry types and the rewrites shared by several dialects.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::Generator;
use crate::ast::{Arg, DataType, NodeId, NodeKind, Tree};
use crate::error::BridgeResult;

/// Renders a node directly.
pub type RenderFn = fn(&mut Generator<'_>, NodeId) -> BridgeResult<String>;

/// One pre-processing stage: returns the node to hand to the next stage.
pub type PreprocessFn = fn(&mut Generator<'_>, NodeId) -> BridgeResult<Preprocessed>;

/// Outcome of a pre-processing stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Preprocessed {
    /// Continue with this node (the original, or a modified copy).
    Node(NodeId),
    /// Render nothing, silently.
    Suppress,
    /// Render nothing and report the construct.
    Unsupported(String),
}

/// A dialect override for one node kind.
#[derive(Clone)]
pub enum Transform {
    Render(RenderFn),
    /// Stages run in order; the default renderer runs on the final node.
    Preprocess(Vec<PreprocessFn>),
    Unsupported(String),
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Render(_) => f.write_str("Render"),
            Transform::Preprocess(steps) => write!(f, "Preprocess({} steps)", steps.len()),
            Transform::Unsupported(message) => write!(f, "Unsupported({:?})", message),
        }
    }
}

/// Where a table property is rendered relative to the column list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyPlacement {
    /// Between `CREATE` and `TABLE`.
    PreSchema,
    /// After the closing parenthesis of the column list.
    PostSchema,
    Unsupported,
}

/// Row-limiting syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitStyle {
    /// `LIMIT n OFFSET m`
    Limit,
    /// `OFFSET m ROWS FETCH NEXT n ROWS ONLY`
    Fetch,
}

/// String concatenation syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcatStyle {
    /// `a || b`
    Pipes,
    /// `CONCAT(a, b)`
    Function,
    /// `a + b`
    Plus,
}

/// Rendering switches that do not need a transform.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub identifier_quote: (char, char),
    /// Target spelling per type tag; unmapped tags use their canonical name.
    pub type_mapping: HashMap<DataType, String>,
    pub property_placement: HashMap<NodeKind, PropertyPlacement>,
    pub limit_style: LimitStyle,
    pub concat_style: ConcatStyle,
    /// Render booleans as `1`/`0`.
    pub bool_as_int: bool,
    /// Backslashes in string literals are escapes and must be doubled.
    pub escape_backslash: bool,
    pub unsigned_types: bool,
    /// `ALTER TABLE t ADD COLUMN c` rather than `ADD c`.
    pub alter_add_column_keyword: bool,
    /// `FROM t AS x` rather than `FROM t x`.
    pub table_alias_as: bool,
    /// `UNIQUE KEY name (cols)` and named `FOREIGN KEY name (cols)`.
    pub mysql_key_syntax: bool,
    /// Keep the `N` of `N'...'` literals; without it they render as plain strings.
    pub national_strings: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let property_placement = [
            (NodeKind::TemporaryProperty, PropertyPlacement::PreSchema),
            (NodeKind::VolatileProperty, PropertyPlacement::PreSchema),
            (NodeKind::EngineProperty, PropertyPlacement::PostSchema),
            (NodeKind::CharacterSetProperty, PropertyPlacement::PostSchema),
            (NodeKind::CollateProperty, PropertyPlacement::PostSchema),
            (NodeKind::AutoIncrementProperty, PropertyPlacement::PostSchema),
            (NodeKind::CommentProperty, PropertyPlacement::PostSchema),
            (NodeKind::PartitionedByProperty, PropertyPlacement::PostSchema),
        ]
        .into_iter()
        .collect();

        Self {
            identifier_quote: ('"', '"'),
            type_mapping: HashMap::new(),
            property_placement,
            limit_style: LimitStyle::Limit,
            concat_style: ConcatStyle::Pipes,
            bool_as_int: false,
            escape_backslash: false,
            unsigned_types: false,
            alter_add_column_keyword: true,
            table_alias_as: true,
            mysql_key_syntax: false,
            national_strings: true,
        }
    }
}

impl GeneratorConfig {
    pub fn placement(&self, kind: NodeKind) -> PropertyPlacement {
        self.property_placement
            .get(&kind)
            .copied()
            .unwrap_or(PropertyPlacement::PostSchema)
    }

    pub fn type_name(&self, data_type: DataType) -> &str {
        self.type_mapping
            .get(&data_type)
            .map(String::as_str)
            .unwrap_or(data_type.as_str())
    }
}

// ========== Shared rewrites ==========

/// Drop the node without a diagnostic.
pub fn suppress(_g: &mut Generator<'_>, _id: NodeId) -> BridgeResult<Preprocessed> {
    Ok(Preprocessed::Suppress)
}

/// `a ILIKE b` to `LOWER(a) LIKE LOWER(b)` for targets without ILIKE.
pub fn lower_ilike(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<Preprocessed> {
    let (Some(this), Some(pattern)) = (g.tree.child(id, "this"), g.tree.child(id, "expression")) else {
        return Ok(Preprocessed::Node(id));
    };
    let negated = g.tree.flag(id, "negated");

    let this = g.tree.deep_copy(this);
    let pattern = g.tree.deep_copy(pattern);
    let left = g.tree.add(NodeKind::Lower, [("this", Arg::from(this))]);
    let right = g.tree.add(NodeKind::Lower, [("this", Arg::from(pattern))]);
    let like = g.tree.add(
        NodeKind::Like,
        [
            ("this", Arg::from(left)),
            ("expression", Arg::from(right)),
            ("negated", Arg::from(negated)),
        ],
    );
    Ok(Preprocessed::Node(like))
}

/// Replace an `AUTO_INCREMENT` column constraint with `GENERATED BY DEFAULT AS
/// IDENTITY`, keeping its position among the other constraints.
pub fn auto_increment_to_identity(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<Preprocessed> {
    if !g.tree.children(id, "constraints").iter().any(|c| is_auto_increment(&g.tree, *c)) {
        return Ok(Preprocessed::Node(id));
    }

    let copy = g.tree.deep_copy(id);
    for wrapper in g.tree.children(copy, "constraints").to_vec() {
        if is_auto_increment(&g.tree, wrapper) {
            let identity = g.tree.add(
                NodeKind::GeneratedAsIdentityColumnConstraint,
                [("this", Arg::from(false))],
            );
            g.tree.set(wrapper, "kind", identity);
        }
    }
    Ok(Preprocessed::Node(copy))
}

fn is_auto_increment(tree: &Tree, wrapper: NodeId) -> bool {
    tree.child(wrapper, "kind")
        .is_some_and(|k| tree.kind(k) == NodeKind::AutoIncrementColumnConstraint)
}

/// Table-level `FOREIGN KEY` inside `CREATE TABLE`: queue a companion index on the
/// first referencing column.
pub fn foreign_key_index(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<Preprocessed> {
    if let Some(column) = g.tree.children(id, "expressions").first().copied() {
        queue_column_index(g, id, column);
    }
    Ok(Preprocessed::Node(id))
}

/// Inline `REFERENCES` on a column inside `CREATE TABLE`: queue a companion index on
/// that column.
pub fn reference_index(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<Preprocessed> {
    let inline = g
        .tree
        .parent(id)
        .is_some_and(|p| g.tree.kind(p) == NodeKind::ColumnConstraint);
    if inline {
        if let Some(column) = g
            .tree
            .find_ancestor(id, &[NodeKind::ColumnDef])
            .and_then(|def| g.tree.child(def, "this"))
        {
            queue_column_index(g, id, column);
        }
    }
    Ok(Preprocessed::Node(id))
}

fn queue_column_index(g: &mut Generator<'_>, origin: NodeId, column: NodeId) {
    let Some(statement) = g.tree.find_ancestor(origin, &[NodeKind::Create, NodeKind::AlterTable]) else {
        return;
    };
    if g.tree.kind(statement) != NodeKind::Create {
        return;
    }
    let Some(table) = statement_table(g, statement) else {
        return;
    };
    let (Some(table_name), Some(column_name)) = (g.tree.name(table), g.tree.name(column)) else {
        return;
    };
    let table_name = table_name.to_string();
    let column_name = column_name.to_string();

    let schema = g.tree.find_ancestor(origin, &[NodeKind::Schema]);
    if is_indexed(g, schema, &table_name, &column_name) {
        tracing::debug!(table = %table_name, column = %column_name, "foreign key column already indexed");
        return;
    }

    let name = format!("{}_{}", table_name, column_name);
    let create = index_statement(g, table, name, &[column]);
    g.push_auxiliary(create);
}

/// Whether `column` already leads a key of the table being created, or a queued
/// companion index.
fn is_indexed(g: &Generator<'_>, schema: Option<NodeId>, table: &str, column: &str) -> bool {
    let leads = |key: NodeId, key_list: &str| {
        g.tree
            .children(key, key_list)
            .first()
            .and_then(|c| g.tree.name(*c))
            .is_some_and(|name| name.eq_ignore_ascii_case(column))
    };

    let queued = g.auxiliary().iter().any(|aux| {
        let Some(index) = g.tree.child(*aux, "this").filter(|i| g.tree.kind(*i) == NodeKind::Index) else {
            return false;
        };
        let same_table = g
            .tree
            .child(index, "table")
            .and_then(|t| g.tree.name(t))
            .is_some_and(|t| t.eq_ignore_ascii_case(table));
        same_table && leads(index, "columns")
    });
    if queued {
        return true;
    }

    let Some(schema) = schema else {
        return false;
    };
    g.tree.children(schema, "expressions").iter().any(|item| {
        let key = match g.tree.kind(*item) {
            NodeKind::Constraint => match g.tree.children(*item, "expressions").first() {
                Some(key) => *key,
                None => return false,
            },
            _ => *item,
        };
        match g.tree.kind(key) {
            NodeKind::PrimaryKey | NodeKind::IndexConstraint | NodeKind::UniqueColumnConstraint => {
                leads(key, "expressions")
            }
            NodeKind::ColumnDef => {
                g.tree.name(key).is_some_and(|n| n.eq_ignore_ascii_case(column))
                    && g.tree.children(key, "constraints").iter().any(|wrapper| {
                        g.tree.child(*wrapper, "kind").is_some_and(|k| {
                            matches!(
                                g.tree.kind(k),
                                NodeKind::PrimaryKeyColumnConstraint | NodeKind::UniqueColumnConstraint
                            )
                        })
                    })
            }
            _ => false,
        }
    })
}

/// Inline `KEY name (cols)` inside a table definition, for targets that only have
/// `CREATE INDEX`.
pub fn index_constraint_to_statement(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<Preprocessed> {
    let Some(statement) = g.tree.find_ancestor(id, &[NodeKind::Create, NodeKind::AlterTable]) else {
        return Ok(Preprocessed::Node(id));
    };
    let Some(table) = statement_table(g, statement) else {
        return Ok(Preprocessed::Node(id));
    };
    let columns = g.tree.children(id, "expressions").to_vec();
    let name = match g.tree.child(id, "this").and_then(|n| g.tree.name(n)) {
        Some(name) => name.to_string(),
        None => {
            let table_name = g.tree.name(table).unwrap_or_default();
            let column_name = columns.first().and_then(|c| g.tree.name(*c)).unwrap_or_default();
            format!("{}_{}", table_name, column_name)
        }
    };

    let create = index_statement(g, table, name, &columns);
    g.push_auxiliary(create);
    Ok(Preprocessed::Suppress)
}

/// Column `COMMENT 'x'` to a following `COMMENT ON COLUMN t.c IS 'x'`.
pub fn column_comment_to_statement(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<Preprocessed> {
    let Some(statement) = g.tree.find_ancestor(id, &[NodeKind::Create, NodeKind::AlterTable]) else {
        return Ok(Preprocessed::Node(id));
    };
    let (Some(table), Some(column), Some(text)) = (
        statement_table(g, statement),
        g.tree
            .find_ancestor(id, &[NodeKind::ColumnDef])
            .and_then(|def| g.tree.child(def, "this")),
        g.tree.child(id, "this"),
    ) else {
        return Ok(Preprocessed::Node(id));
    };

    let column = g.tree.deep_copy(column);
    let target = g.tree.add(NodeKind::Column, [("this", Arg::from(column))]);
    if let Some(name) = g.tree.child(table, "this") {
        let name = g.tree.deep_copy(name);
        g.tree.set(target, "table", name);
    }
    if let Some(db) = g.tree.child(table, "db") {
        let db = g.tree.deep_copy(db);
        g.tree.set(target, "db", db);
    }
    let text = g.tree.deep_copy(text);
    let comment = g.tree.add(
        NodeKind::CommentOn,
        [
            ("kind", Arg::from("COLUMN")),
            ("this", Arg::from(target)),
            ("expression", Arg::from(text)),
        ],
    );
    g.push_auxiliary(comment);
    Ok(Preprocessed::Suppress)
}

/// Qualify an `ALTER TABLE` target with the schema chosen earlier in the session.
pub fn qualify_with_current_schema(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<Preprocessed> {
    let Some(schema) = g.current_schema().map(str::to_string) else {
        return Ok(Preprocessed::Node(id));
    };
    let qualified = g
        .tree
        .child(id, "this")
        .is_some_and(|t| g.tree.child(t, "db").is_some());
    if qualified {
        return Ok(Preprocessed::Node(id));
    }

    let copy = g.tree.deep_copy(id);
    if let Some(table) = g.tree.child(copy, "this") {
        let db = g.tree.identifier(schema, false);
        g.tree.set(table, "db", db);
    }
    Ok(Preprocessed::Node(copy))
}

/// The `Table` a DDL statement operates on.
pub fn statement_table(g: &Generator<'_>, statement: NodeId) -> Option<NodeId> {
    let this = g.tree.child(statement, "this")?;
    match g.tree.kind(this) {
        NodeKind::Schema => g.tree.child(this, "this"),
        NodeKind::Table => Some(this),
        _ => None,
    }
}

/// `CREATE INDEX name ON table (columns)` built from copies of the given nodes.
fn index_statement(g: &mut Generator<'_>, table: NodeId, name: String, columns: &[NodeId]) -> NodeId {
    let table = g.tree.deep_copy(table);
    let columns: Vec<NodeId> = columns.iter().map(|c| g.tree.deep_copy(*c)).collect();
    let name = g.tree.identifier(name, false);
    let index = g.tree.add(
        NodeKind::Index,
        [
            ("this", Arg::from(name)),
            ("table", Arg::from(table)),
            ("columns", Arg::from(columns)),
        ],
    );
    g.tree.add(
        NodeKind::Create,
        [("kind", Arg::from("INDEX")), ("this", Arg::from(index))],
    )
}
