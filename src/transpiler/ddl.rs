//! Default renderers for schema definition statements.

use super::{Generator, PropertyPlacement};
use crate::ast::{NodeId, NodeKind};
use crate::error::BridgeResult;

/// `CREATE [OR REPLACE] <pre-schema properties> [UNIQUE] <kind> [IF NOT EXISTS]
/// <target> <post-schema properties> [AS <query>]`
pub fn create_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    // The schema renders before the properties so diagnostics follow source order.
    let target = g.child_sql(id, "this")?;
    let config = g.config();
    let mut pre = Vec::new();
    let mut post = Vec::new();

    if let Some(properties) = g.tree.child(id, "properties") {
        for property in g.tree.children(properties, "expressions").to_vec() {
            let kind = g.tree.kind(property);
            let bucket = match config.placement(kind) {
                PropertyPlacement::PreSchema => &mut pre,
                PropertyPlacement::PostSchema => &mut post,
                PropertyPlacement::Unsupported => {
                    g.unsupported(kind, format!("{} table property is not supported", property_label(kind)))?;
                    continue;
                }
            };
            let text = g.sql(property)?;
            if !text.is_empty() {
                bucket.push(text);
            }
        }
    }

    let mut sql = String::from("CREATE");
    if g.tree.flag(id, "replace") {
        sql.push_str(" OR REPLACE");
    }
    for property in pre {
        sql.push(' ');
        sql.push_str(&property);
    }
    if g.tree.flag(id, "unique") {
        sql.push_str(" UNIQUE");
    }
    sql.push(' ');
    sql.push_str(g.tree.text(id, "kind").unwrap_or("TABLE"));
    if g.tree.flag(id, "exists") {
        sql.push_str(" IF NOT EXISTS");
    }

    sql.push(' ');
    sql.push_str(&target);
    for property in post {
        sql.push(' ');
        sql.push_str(&property);
    }

    if g.tree.child(id, "expression").is_some() {
        let query = g.child_sql(id, "expression")?;
        sql.push_str(" AS ");
        sql.push_str(&query);
    }
    Ok(sql)
}

/// Keyword used for a table property in messages and renderings.
pub fn property_label(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::TemporaryProperty => "TEMPORARY",
        NodeKind::VolatileProperty => "VOLATILE",
        NodeKind::EngineProperty => "ENGINE",
        NodeKind::CharacterSetProperty => "CHARACTER SET",
        NodeKind::CollateProperty => "COLLATE",
        NodeKind::AutoIncrementProperty => "AUTO_INCREMENT",
        NodeKind::CommentProperty => "COMMENT",
        NodeKind::PartitionedByProperty => "PARTITION BY",
        _ => "unknown",
    }
}

/// `[DEFAULT] LABEL=value`
pub fn property_sql(g: &mut Generator<'_>, id: NodeId, label: &str) -> BridgeResult<String> {
    let value = match g.tree.child(id, "this") {
        Some(_) => g.child_sql(id, "this")?,
        None => g.tree.text(id, "this").unwrap_or_default().to_string(),
    };
    let default = if g.tree.flag(id, "default") { "DEFAULT " } else { "" };
    Ok(format!("{}{}={}", default, label, value))
}

pub fn partitioned_by_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let method = g.tree.text(id, "kind").unwrap_or("RANGE").to_string();
    let columns = g.csv(id, "expressions")?;
    Ok(format!("PARTITION BY {} ({})", method, columns))
}

/// `table (column, ..., key, ...)`
pub fn schema_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let table = g.child_sql(id, "this")?;
    let items = g.csv(id, "expressions")?;
    Ok(format!("{} ({})", table, items))
}

/// `[name] ON table (columns)`
pub fn index_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let name = g.child_sql(id, "this")?;
    let table = g.child_sql(id, "table")?;
    let columns = g.csv(id, "columns")?;
    if name.is_empty() {
        Ok(format!("ON {} ({})", table, columns))
    } else {
        Ok(format!("{} ON {} ({})", name, table, columns))
    }
}

pub fn column_def_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let mut parts = vec![g.child_sql(id, "this")?];
    let data_type = g.child_sql(id, "kind")?;
    if !data_type.is_empty() {
        parts.push(data_type);
    }
    parts.extend(g.list_sql(id, "constraints")?);
    Ok(parts.join(" "))
}

/// `[CONSTRAINT name] <constraint>`; empty when the inner constraint renders empty.
pub fn column_constraint_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let body = g.child_sql(id, "kind")?;
    if body.is_empty() {
        return Ok(body);
    }
    let name = g.child_sql(id, "this")?;
    if name.is_empty() {
        Ok(body)
    } else {
        Ok(format!("CONSTRAINT {} {}", name, body))
    }
}

pub fn not_null_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let text = if g.tree.flag(id, "allow_null") { "NULL" } else { "NOT NULL" };
    Ok(text.to_string())
}

pub fn primary_key_column_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    Ok(match g.tree.bool_arg(id, "desc") {
        Some(true) => "PRIMARY KEY DESC".to_string(),
        Some(false) => "PRIMARY KEY ASC".to_string(),
        None => "PRIMARY KEY".to_string(),
    })
}

/// Inline `UNIQUE`, or a table-level unique key over columns.
pub fn unique_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    if g.tree.children(id, "expressions").is_empty() {
        return Ok("UNIQUE".to_string());
    }
    let name = g.child_sql(id, "this")?;
    let columns = g.csv(id, "expressions")?;
    Ok(match (g.config().mysql_key_syntax, name.is_empty()) {
        (true, false) => format!("UNIQUE KEY {} ({})", name, columns),
        (true, true) => format!("UNIQUE KEY ({})", columns),
        (false, false) => format!("CONSTRAINT {} UNIQUE ({})", name, columns),
        (false, true) => format!("UNIQUE ({})", columns),
    })
}

pub fn default_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    Ok(format!("DEFAULT {}", g.child_sql(id, "this")?))
}

/// `GENERATED {ALWAYS | BY DEFAULT} [ON NULL] AS IDENTITY [(options)]`
pub fn generated_identity_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let mut sql = if g.tree.flag(id, "this") {
        String::from("GENERATED ALWAYS")
    } else {
        String::from("GENERATED BY DEFAULT")
    };
    if g.tree.flag(id, "on_null") {
        sql.push_str(" ON NULL");
    }
    sql.push_str(" AS IDENTITY");

    let mut options = Vec::new();
    for (key, keyword) in [
        ("start", "START WITH"),
        ("increment", "INCREMENT BY"),
        ("minvalue", "MINVALUE"),
        ("maxvalue", "MAXVALUE"),
    ] {
        if let Some(value) = g.tree.text(id, key) {
            options.push(format!("{} {}", keyword, value));
        }
    }
    match g.tree.bool_arg(id, "cycle") {
        Some(true) => options.push("CYCLE".to_string()),
        Some(false) => options.push("NO CYCLE".to_string()),
        None => {}
    }
    if !options.is_empty() {
        sql.push_str(&format!(" ({})", options.join(" ")));
    }
    Ok(sql)
}

pub fn comment_column_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    Ok(format!("COMMENT {}", g.child_sql(id, "this")?))
}

/// `KEYWORD <this>`
pub fn prefixed_sql(g: &mut Generator<'_>, id: NodeId, keyword: &str) -> BridgeResult<String> {
    Ok(format!("{} {}", keyword, g.child_sql(id, "this")?))
}

pub fn check_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    Ok(format!("CHECK ({})", g.child_sql(id, "this")?))
}

/// `REFERENCES table [(columns)] [ON DELETE action] [ON UPDATE action]`
pub fn reference_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let table = g.child_sql(id, "this")?;
    let mut sql = format!("REFERENCES {}", table);
    if !g.tree.children(id, "expressions").is_empty() {
        let columns = g.csv(id, "expressions")?;
        sql.push_str(&format!(" ({})", columns));
    }
    if let Some(action) = g.tree.text(id, "on_delete") {
        sql.push_str(&format!(" ON DELETE {}", action));
    }
    if let Some(action) = g.tree.text(id, "on_update") {
        sql.push_str(&format!(" ON UPDATE {}", action));
    }
    Ok(sql)
}

pub fn primary_key_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    Ok(format!("PRIMARY KEY ({})", g.csv(id, "expressions")?))
}

pub fn foreign_key_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let columns = g.csv(id, "expressions")?;
    let reference = g.child_sql(id, "reference")?;
    let name = if g.config().mysql_key_syntax {
        g.child_sql(id, "this")?
    } else {
        String::new()
    };
    if name.is_empty() {
        Ok(format!("FOREIGN KEY ({}) {}", columns, reference))
    } else {
        Ok(format!("FOREIGN KEY {} ({}) {}", name, columns, reference))
    }
}

/// Inline index definition: `[FULLTEXT | SPATIAL] {KEY | INDEX} [name] (columns)`.
pub fn index_constraint_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let mut sql = String::new();
    if let Some(flavor) = g.tree.text(id, "kind") {
        sql.push_str(flavor);
        sql.push(' ');
    }
    sql.push_str(if g.config().mysql_key_syntax { "KEY" } else { "INDEX" });
    let name = g.child_sql(id, "this")?;
    if !name.is_empty() {
        sql.push(' ');
        sql.push_str(&name);
    }
    let columns = g.csv(id, "expressions")?;
    sql.push_str(&format!(" ({})", columns));
    Ok(sql)
}

/// `CONSTRAINT name <key>`
pub fn constraint_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let body = g.list_sql(id, "expressions")?.join(" ");
    if body.is_empty() {
        return Ok(body);
    }
    let name = g.child_sql(id, "this")?;
    Ok(format!("CONSTRAINT {} {}", name, body))
}

/// `ALTER TABLE [IF EXISTS] table action, ...`; empty when every action was
/// suppressed or moved to an auxiliary statement.
pub fn alter_table_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let mut actions = Vec::new();
    for action in g.tree.children(id, "actions").to_vec() {
        let text = g.sql(action)?;
        if text.is_empty() {
            continue;
        }
        if g.tree.kind(action) == NodeKind::ColumnDef {
            let mut add = String::from("ADD ");
            if g.config().alter_add_column_keyword {
                add.push_str("COLUMN ");
            }
            if g.tree.flag(action, "exists") {
                add.push_str("IF NOT EXISTS ");
            }
            actions.push(add + &text);
        } else {
            actions.push(text);
        }
    }
    if actions.is_empty() {
        return Ok(String::new());
    }

    let table = g.child_sql(id, "this")?;
    let exists = if g.tree.flag(id, "exists") { "IF EXISTS " } else { "" };
    Ok(format!("ALTER TABLE {}{} {}", exists, table, actions.join(", ")))
}

pub fn add_constraint_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let body = g.child_sql(id, "this")?;
    if body.is_empty() {
        Ok(body)
    } else {
        Ok(format!("ADD {}", body))
    }
}

pub fn drop_column_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let name = g.child_sql(id, "this")?;
    let exists = if g.tree.flag(id, "exists") { "IF EXISTS " } else { "" };
    Ok(format!("DROP COLUMN {}{}", exists, name))
}

/// `DROP {CONSTRAINT | INDEX | FOREIGN KEY | PRIMARY KEY} [IF EXISTS] [name]`
pub fn drop_constraint_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let kind = g.tree.text(id, "kind").unwrap_or("CONSTRAINT").to_string();
    let mut sql = format!("DROP {}", kind);
    if g.tree.flag(id, "exists") {
        sql.push_str(" IF EXISTS");
    }
    let name = g.child_sql(id, "this")?;
    if !name.is_empty() {
        sql.push(' ');
        sql.push_str(&name);
    }
    Ok(sql)
}

pub fn rename_column_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let from = g.child_sql(id, "this")?;
    let to = g.child_sql(id, "to")?;
    Ok(format!("RENAME COLUMN {} TO {}", from, to))
}

pub fn rename_table_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    Ok(format!("RENAME TO {}", g.child_sql(id, "this")?))
}

pub fn alter_column_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let name = g.child_sql(id, "this")?;
    let change = if g.tree.child(id, "dtype").is_some() {
        format!("TYPE {}", g.child_sql(id, "dtype")?)
    } else if g.tree.child(id, "default").is_some() {
        format!("SET DEFAULT {}", g.child_sql(id, "default")?)
    } else if g.tree.flag(id, "drop_default") {
        "DROP DEFAULT".to_string()
    } else {
        match g.tree.bool_arg(id, "not_null") {
            Some(true) => "SET NOT NULL".to_string(),
            _ => "DROP NOT NULL".to_string(),
        }
    };
    Ok(format!("ALTER COLUMN {} {}", name, change))
}

/// `DROP kind [IF EXISTS] name, ... [ON table] [CASCADE | RESTRICT]`
pub fn drop_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let kind = g.tree.text(id, "kind").unwrap_or("TABLE").to_string();
    let mut sql = format!("DROP {}", kind);
    if g.tree.flag(id, "exists") {
        sql.push_str(" IF EXISTS");
    }
    sql.push(' ');
    sql.push_str(&g.csv(id, "expressions")?);
    if g.tree.child(id, "table").is_some() {
        let table = g.child_sql(id, "table")?;
        sql.push_str(&format!(" ON {}", table));
    }
    if let Some(behavior) = g.tree.text(id, "cascade") {
        sql.push(' ');
        sql.push_str(behavior);
    }
    Ok(sql)
}

/// `COMMENT ON {COLUMN | TABLE} target IS 'text'`
pub fn comment_on_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let kind = g.tree.text(id, "kind").unwrap_or("TABLE").to_string();
    let target = g.child_sql(id, "this")?;
    let text = g.child_sql(id, "expression")?;
    Ok(format!("COMMENT ON {} {} IS {}", kind, target, text))
}
