//! Default renderers for queries and data-modification statements.

use super::{Generator, LimitStyle};
use crate::ast::{NodeId, NodeKind};
use crate::error::BridgeResult;

pub fn select_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let mut sql = String::from("SELECT");
    if g.tree.flag(id, "distinct") {
        sql.push_str(" DISTINCT");
    }
    let items = g.csv(id, "expressions")?;
    if !items.is_empty() {
        sql.push(' ');
        sql.push_str(&items);
    }

    let mut clauses = vec![g.child_sql(id, "from")?];
    clauses.extend(g.list_sql(id, "joins")?);
    for key in ["where", "group", "having", "order"] {
        clauses.push(g.child_sql(id, key)?);
    }
    clauses.push(paging_sql(g, id)?);
    for clause in clauses.into_iter().filter(|c| !c.is_empty()) {
        sql.push(' ');
        sql.push_str(&clause);
    }

    if g.tree.flag(id, "wrapped") {
        Ok(format!("({})", sql))
    } else {
        Ok(sql)
    }
}

/// Row limiting in the target's style.
fn paging_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let limit = match g.tree.child(id, "limit") {
        Some(limit) => Some(g.child_sql(limit, "this")?),
        None => None,
    };
    let offset = match g.tree.child(id, "offset") {
        Some(offset) => Some(g.child_sql(offset, "this")?),
        None => None,
    };

    let mut parts = Vec::new();
    match g.config().limit_style {
        LimitStyle::Limit => {
            if let Some(limit) = limit {
                parts.push(format!("LIMIT {}", limit));
            }
            if let Some(offset) = offset {
                parts.push(format!("OFFSET {}", offset));
            }
        }
        LimitStyle::Fetch => {
            if limit.is_some() || offset.is_some() {
                let offset = offset.unwrap_or_else(|| "0".to_string());
                parts.push(format!("OFFSET {} ROWS", offset));
            }
            if let Some(limit) = limit {
                parts.push(format!("FETCH NEXT {} ROWS ONLY", limit));
            }
        }
    }
    Ok(parts.join(" "))
}

/// `[db.]name`, plus the column list of a view definition.
pub fn table_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let db = g.child_sql(id, "db")?;
    let name = g.child_sql(id, "this")?;
    let mut sql = if db.is_empty() { name } else { format!("{}.{}", db, name) };
    if !g.tree.children(id, "columns").is_empty() {
        let columns = g.csv(id, "columns")?;
        sql.push_str(&format!(" ({})", columns));
    }
    Ok(sql)
}

pub fn alias_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let this = g.child_sql(id, "this")?;
    let alias = g.child_sql(id, "alias")?;
    let is_source = g
        .tree
        .child(id, "this")
        .is_some_and(|t| matches!(g.tree.kind(t), NodeKind::Table | NodeKind::Subquery));
    if is_source && !g.config().table_alias_as {
        Ok(format!("{} {}", this, alias))
    } else {
        Ok(format!("{} AS {}", this, alias))
    }
}

pub fn join_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let table = g.child_sql(id, "this")?;
    let mut sql = match g.tree.text(id, "side") {
        Some(side) => format!("{} JOIN {}", side, table),
        None => format!("JOIN {}", table),
    };
    if g.tree.child(id, "on").is_some() {
        let condition = g.child_sql(id, "on")?;
        sql.push_str(&format!(" ON {}", condition));
    } else if !g.tree.children(id, "using").is_empty() {
        let columns = g.csv(id, "using")?;
        sql.push_str(&format!(" USING ({})", columns));
    }
    Ok(sql)
}

/// `expr[(length)] [ASC | DESC] [NULLS FIRST | LAST]`
pub fn ordered_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let mut sql = g.child_sql(id, "this")?;
    if let Some(length) = g.tree.text(id, "length") {
        sql.push_str(&format!("({})", length));
    }
    match g.tree.bool_arg(id, "desc") {
        Some(true) => sql.push_str(" DESC"),
        Some(false) => sql.push_str(" ASC"),
        None => {}
    }
    if let Some(nulls) = g.tree.text(id, "nulls") {
        sql.push_str(&format!(" NULLS {}", nulls));
    }
    Ok(sql)
}

pub fn insert_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let table = g.child_sql(id, "this")?;
    let mut sql = format!("INSERT INTO {}", table);
    if !g.tree.children(id, "columns").is_empty() {
        let columns = g.csv(id, "columns")?;
        sql.push_str(&format!(" ({})", columns));
    }
    let source = g.child_sql(id, "expression")?;
    if !source.is_empty() {
        sql.push(' ');
        sql.push_str(&source);
    }
    Ok(sql)
}

pub fn update_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let table = g.child_sql(id, "this")?;
    let assignments = g.csv(id, "expressions")?;
    let mut sql = format!("UPDATE {} SET {}", table, assignments);
    let filter = g.child_sql(id, "where")?;
    if !filter.is_empty() {
        sql.push(' ');
        sql.push_str(&filter);
    }
    Ok(sql)
}

pub fn delete_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let table = g.child_sql(id, "this")?;
    let mut sql = format!("DELETE FROM {}", table);
    let filter = g.child_sql(id, "where")?;
    if !filter.is_empty() {
        sql.push(' ');
        sql.push_str(&filter);
    }
    Ok(sql)
}

pub fn use_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    Ok(format!("USE {}", g.child_sql(id, "this")?))
}

/// Table lock as it was written: `LOCK TABLE[S] t [mode | IN mode MODE]`.
pub fn lock_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let table = g.child_sql(id, "this")?;
    let keyword = g.tree.text(id, "kind").unwrap_or("TABLE");
    let mut sql = format!("LOCK {} {}", keyword, table);
    match (g.tree.text(id, "mode"), g.tree.flag(id, "in_mode")) {
        (Some(mode), true) => sql.push_str(&format!(" IN {} MODE", mode)),
        (Some(mode), false) => sql.push_str(&format!(" {}", mode)),
        (None, _) => {}
    }
    Ok(sql)
}

/// Mode word of a lock statement, upper-cased; `None` when the source named none.
pub fn lock_mode(g: &Generator<'_>, id: NodeId) -> Option<String> {
    g.tree.text(id, "mode").map(str::to_ascii_uppercase)
}

/// `LOCK TABLE t IN <mode> MODE`. MySQL's `READ`/`WRITE` become `SHARE`/`EXCLUSIVE`.
pub fn lock_in_mode_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let table = g.child_sql(id, "this")?;
    let mode = match lock_mode(g, id).as_deref() {
        None | Some("WRITE") | Some("EXCLUSIVE") => "EXCLUSIVE".to_string(),
        Some("READ") | Some("SHARE") => "SHARE".to_string(),
        Some(other) => other.to_string(),
    };
    Ok(format!("LOCK TABLE {} IN {} MODE", table, mode))
}
