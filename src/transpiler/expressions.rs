//! Default renderers for scalar expressions and data types.

use super::{ConcatStyle, Generator};
use crate::ast::{DataType, NodeId, NodeKind};
use crate::error::BridgeResult;

pub fn identifier_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let name = g.tree.text(id, "this").unwrap_or_default();
    Ok(g.quote_identifier(name, g.tree.flag(id, "quoted")))
}

/// `[db.][table.]name`
pub fn column_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let mut parts = Vec::with_capacity(3);
    for key in ["db", "table", "this"] {
        let part = g.child_sql(id, key)?;
        if !part.is_empty() {
            parts.push(part);
        }
    }
    Ok(parts.join("."))
}

pub fn literal_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let value = g.tree.text(id, "this").unwrap_or_default();
    if !g.tree.flag(id, "is_string") {
        // Numbers keep the text they were written with.
        return Ok(value.to_string());
    }
    let literal = g.string_literal(value);
    if g.tree.flag(id, "national") && g.config().national_strings {
        Ok(format!("N{}", literal))
    } else {
        Ok(literal)
    }
}

pub fn boolean_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let value = g.tree.flag(id, "this");
    let text = match (g.config().bool_as_int, value) {
        (true, true) => "1",
        (true, false) => "0",
        (false, true) => "TRUE",
        (false, false) => "FALSE",
    };
    Ok(text.to_string())
}

/// `_utf8 'text'`
pub fn introducer_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let charset = g.tree.text(id, "this").unwrap_or_default().to_string();
    let value = g.child_sql(id, "expression")?;
    Ok(format!("{} {}", charset, value))
}

/// A function the AST has no dedicated node for, rendered as written.
pub fn anonymous_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let name = g.tree.text(id, "this").unwrap_or_default().to_string();
    let args = g.csv(id, "expressions")?;
    if g.tree.flag(id, "distinct") {
        Ok(format!("{}(DISTINCT {})", name, args))
    } else {
        Ok(format!("{}({})", name, args))
    }
}

/// `NAME(args)` for the typed function nodes. Arguments are taken in positional
/// order: `this`, `start`, `length`, `expression`, then the `expressions` list.
pub fn function_sql(g: &mut Generator<'_>, id: NodeId, name: &str) -> BridgeResult<String> {
    let mut args = Vec::new();
    for key in ["this", "start", "length", "expression"] {
        let arg = g.child_sql(id, key)?;
        if !arg.is_empty() {
            args.push(arg);
        }
    }
    args.extend(g.list_sql(id, "expressions")?);
    Ok(format!("{}({})", name, args.join(", ")))
}

pub fn extract_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let unit = g.tree.text(id, "this").unwrap_or_default().to_string();
    let value = g.child_sql(id, "expression")?;
    Ok(format!("EXTRACT({} FROM {})", unit, value))
}

pub fn cast_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let value = g.child_sql(id, "this")?;
    let to = g.child_sql(id, "to")?;
    Ok(format!("CAST({} AS {})", value, to))
}

pub fn date_str_to_date_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let value = g.child_sql(id, "this")?;
    let date = g.config().type_name(DataType::Date).to_string();
    Ok(format!("CAST({} AS {})", value, date))
}

pub fn binary_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let left = g.child_sql(id, "this")?;
    let right = g.child_sql(id, "expression")?;
    let op = g.tree.text(id, "op").unwrap_or("=");
    Ok(format!("{} {} {}", left, op, right))
}

/// `-x`; an operand that itself starts with `-` gets a space so no `--` comment appears.
pub fn neg_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let operand = g.child_sql(id, "this")?;
    if operand.starts_with('-') {
        Ok(format!("- {}", operand))
    } else {
        Ok(format!("-{}", operand))
    }
}

pub fn concat_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let style = g.config().concat_style;
    let mut parts = Vec::new();
    for part in g.tree.children(id, "expressions").to_vec() {
        let sql = g.sql(part)?;
        if sql.is_empty() {
            continue;
        }
        // `+` is also arithmetic, so compound operands keep their grouping.
        if style == ConcatStyle::Plus && binds_looser_than_plus(g.tree.kind(part)) {
            parts.push(format!("({})", sql));
        } else {
            parts.push(sql);
        }
    }
    Ok(match style {
        ConcatStyle::Pipes => parts.join(" || "),
        ConcatStyle::Plus => parts.join(" + "),
        ConcatStyle::Function => format!("CONCAT({})", parts.join(", ")),
    })
}

fn binds_looser_than_plus(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::BinaryOp
            | NodeKind::Concat
            | NodeKind::Like
            | NodeKind::ILike
            | NodeKind::In
            | NodeKind::Between
            | NodeKind::Is
            | NodeKind::Not
    )
}

/// `a [NOT] LIKE b` and friends.
pub fn predicate_sql(g: &mut Generator<'_>, id: NodeId, keyword: &str) -> BridgeResult<String> {
    let left = g.child_sql(id, "this")?;
    let right = g.child_sql(id, "expression")?;
    Ok(format!("{} {}{} {}", left, not(g, id), keyword, right))
}

pub fn in_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let left = g.child_sql(id, "this")?;
    let negation = not(g, id);
    if g.tree.child(id, "query").is_some() {
        let query = g.child_sql(id, "query")?;
        return Ok(format!("{} {}IN {}", left, negation, query));
    }
    let items = g.csv(id, "expressions")?;
    Ok(format!("{} {}IN ({})", left, negation, items))
}

pub fn between_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let value = g.child_sql(id, "this")?;
    let low = g.child_sql(id, "low")?;
    let high = g.child_sql(id, "high")?;
    Ok(format!("{} {}BETWEEN {} AND {}", value, not(g, id), low, high))
}

pub fn is_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let left = g.child_sql(id, "this")?;
    let right = g.child_sql(id, "expression")?;
    Ok(format!("{} IS {}{}", left, not(g, id), right))
}

fn not(g: &Generator<'_>, id: NodeId) -> &'static str {
    if g.tree.flag(id, "negated") { "NOT " } else { "" }
}

pub fn case_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let mut sql = String::from("CASE");
    let subject = g.child_sql(id, "this")?;
    if !subject.is_empty() {
        sql.push(' ');
        sql.push_str(&subject);
    }
    for branch in g.list_sql(id, "ifs")? {
        sql.push(' ');
        sql.push_str(&branch);
    }
    let default = g.child_sql(id, "default")?;
    if !default.is_empty() {
        sql.push_str(" ELSE ");
        sql.push_str(&default);
    }
    sql.push_str(" END");
    Ok(sql)
}

pub fn when_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let condition = g.child_sql(id, "this")?;
    let result = g.child_sql(id, "then")?;
    Ok(format!("WHEN {} THEN {}", condition, result))
}

/// Type name from the target's mapping, then parameters and modifiers.
///
/// A mapped spelling that already carries parameters (`VARCHAR(255)`) replaces the
/// source parameters.
pub fn data_type_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let config = g.config();
    let mut sql = match g.tree.text(id, "tag").and_then(DataType::from_tag) {
        Some(data_type) => config.type_name(data_type).to_string(),
        None => g.tree.text(id, "name").unwrap_or_default().to_string(),
    };

    if !sql.contains('(') {
        let params = g.list_sql(id, "expressions")?;
        if !params.is_empty() {
            sql.push_str(&format!("({})", params.join(",")));
        }
    }
    if config.unsigned_types {
        if g.tree.flag(id, "unsigned") {
            sql.push_str(" UNSIGNED");
        }
        if g.tree.flag(id, "zerofill") {
            sql.push_str(" ZEROFILL");
        }
    }
    if let Some(zone) = g.tree.text(id, "time_zone") {
        sql.push(' ');
        sql.push_str(zone);
    }
    Ok(sql)
}
