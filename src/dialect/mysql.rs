//! MySQL.

use super::Dialect;
use crate::ast::{DataType, NodeId, NodeKind};
use crate::error::BridgeResult;
use crate::parser::grammar::dml;
use crate::tokenizer::{CommentDelimiter, StringDelimiter, TokenType};
use crate::transpiler::{transform, ConcatStyle, Generator, PropertyPlacement};

pub fn dialect() -> BridgeResult<Dialect> {
    Dialect::builder("mysql")
        .quotes(vec![
            StringDelimiter::new("'", "'"),
            StringDelimiter::national("N'", "'"),
            StringDelimiter::new("\"", "\""),
        ])
        .identifiers(vec![('`', '`')])
        .comments(vec![
            CommentDelimiter::line("--"),
            CommentDelimiter::line("#"),
            CommentDelimiter::block("/*", "*/"),
        ])
        .string_escapes(vec!['\\'])
        .statement_parser(TokenType::Lock, dml::parse_lock)
        .generator(|config| {
            config.identifier_quote = ('`', '`');
            config.escape_backslash = true;
            config.concat_style = ConcatStyle::Function;
            config.unsigned_types = true;
            config.mysql_key_syntax = true;
        })
        .type_mapping(DataType::Uuid, "CHAR(36)")
        .property_placement(NodeKind::VolatileProperty, PropertyPlacement::Unsupported)
        .preprocess(NodeKind::ILike, transform::lower_ilike)
        .render(NodeKind::GeneratedAsIdentityColumnConstraint, auto_increment_sql)
        .render(NodeKind::ExclusiveLock, lock_tables_sql)
        .build()
}

fn auto_increment_sql(_g: &mut Generator<'_>, _id: NodeId) -> BridgeResult<String> {
    Ok("AUTO_INCREMENT".to_string())
}

/// `LOCK TABLES t {READ | WRITE}`
fn lock_tables_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    let table = g.child_sql(id, "this")?;
    let mode = match crate::transpiler::dml::lock_mode(g, id).as_deref() {
        Some("READ") | Some("SHARE") => "READ",
        _ => "WRITE",
    };
    Ok(format!("LOCK TABLES {} {}", table, mode))
}
