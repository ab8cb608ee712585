//! CREATE, ALTER and DROP.

use super::dml::{parse_ordered, parse_select};
use super::expressions::{parse_binary, parse_data_type, parse_expression, ADDITIVE_POWER};
use crate::ast::{Arg, NodeId, NodeKind};
use crate::error::BridgeResult;
use crate::parser::Parser;
use crate::tokenizer::TokenType;

/// Words that start a column constraint rather than a type name.
const CONSTRAINT_WORDS: &[&str] = &["GENERATED", "IDENTITY"];

/// `CREATE [OR REPLACE] [TEMPORARY | VOLATILE] {TABLE | VIEW | [UNIQUE] INDEX | DATABASE | SCHEMA} ...`
pub fn parse_create(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    let create = p.tree.new_node(NodeKind::Create);
    if p.match_token(TokenType::Or) {
        p.expect(TokenType::Replace, "REPLACE after OR")?;
        p.tree.set(create, "replace", true);
    }

    let mut properties = Vec::new();
    loop {
        if p.match_text("GLOBAL") || p.match_text("LOCAL") {
            continue;
        }
        if p.match_text("TEMPORARY") || p.match_text("TEMP") {
            properties.push(p.tree.new_node(NodeKind::TemporaryProperty));
        } else if p.match_text("VOLATILE") {
            properties.push(p.tree.new_node(NodeKind::VolatileProperty));
        } else {
            break;
        }
    }

    let unique = p.match_token(TokenType::Unique);
    let kind = if p.match_token(TokenType::Table) {
        "TABLE"
    } else if p.match_token(TokenType::Index) {
        "INDEX"
    } else if p.match_text("VIEW") {
        "VIEW"
    } else if p.match_text("DATABASE") {
        "DATABASE"
    } else if p.match_text("SCHEMA") {
        "SCHEMA"
    } else {
        return Err(p.expected("TABLE, VIEW, INDEX, DATABASE or SCHEMA after CREATE"));
    };
    if unique && kind != "INDEX" {
        return Err(p.expected("INDEX after CREATE UNIQUE"));
    }
    p.tree.set(create, "kind", kind);
    if unique {
        p.tree.set(create, "unique", true);
    }
    if p.match_text_seq(&["IF", "NOT", "EXISTS"]) {
        p.tree.set(create, "exists", true);
    }

    match kind {
        "TABLE" => parse_create_table(p, create, &mut properties)?,
        "VIEW" => {
            let table = p.parse_table()?;
            if p.check(TokenType::LParen) {
                let columns = p.parse_wrapped_csv(|p| p.parse_identifier())?;
                p.tree.set(table, "columns", columns);
            }
            p.tree.set(create, "this", table);
            p.expect(TokenType::As, "AS")?;
            p.expect(TokenType::Select, "SELECT")?;
            let select = parse_select(p)?;
            p.tree.set(create, "expression", select);
        }
        "INDEX" => {
            let index = parse_index_target(p)?;
            p.tree.set(create, "this", index);
        }
        _ => {
            let name = p.parse_identifier()?;
            p.tree.set(create, "this", name);
            parse_properties(p, &mut properties)?;
        }
    }

    if !properties.is_empty() {
        let node = p.tree.add(NodeKind::Properties, [("expressions", Arg::from(properties))]);
        p.tree.set(create, "properties", node);
    }
    Ok(create)
}

fn parse_create_table(p: &mut Parser<'_>, create: NodeId, properties: &mut Vec<NodeId>) -> BridgeResult<()> {
    let table = p.parse_table()?;
    if p.match_token(TokenType::LParen) {
        let items = p.parse_csv(parse_schema_item)?;
        p.expect(TokenType::RParen, "')' to close column list")?;
        let schema = p.tree.add(
            NodeKind::Schema,
            [("this", Arg::from(table)), ("expressions", Arg::from(items))],
        );
        p.tree.set(create, "this", schema);
    } else {
        p.tree.set(create, "this", table);
    }

    parse_properties(p, properties)?;

    if p.match_token(TokenType::As) {
        p.expect(TokenType::Select, "SELECT after AS")?;
        let select = parse_select(p)?;
        p.tree.set(create, "expression", select);
    }
    Ok(())
}

/// `[name] ON table (columns)`
fn parse_index_target(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    let index = p.tree.new_node(NodeKind::Index);
    if !p.check(TokenType::On) {
        let name = p.parse_identifier()?;
        p.tree.set(index, "this", name);
    }
    p.expect(TokenType::On, "ON")?;
    let table = p.parse_table()?;
    p.tree.set(index, "table", table);
    let columns = p.parse_wrapped_csv(parse_ordered)?;
    p.tree.set(index, "columns", columns);
    Ok(index)
}

fn parse_schema_item(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    if p.match_token(TokenType::Constraint) {
        let name = p.parse_identifier()?;
        let Some(key) = parse_table_key(p)? else {
            return Err(p.expected("PRIMARY KEY, FOREIGN KEY, UNIQUE or CHECK after CONSTRAINT name"));
        };
        return Ok(p.tree.add(
            NodeKind::Constraint,
            [("this", Arg::from(name)), ("expressions", Arg::from(vec![key]))],
        ));
    }
    if let Some(key) = parse_table_key(p)? {
        return Ok(key);
    }
    parse_column_def(p)
}

/// Whether the cursor is on `KEY`/`INDEX` introducing an index rather than a
/// column that happens to be named `key`.
fn at_index_definition(p: &Parser<'_>) -> bool {
    let offset = if p.check_text("FULLTEXT") || p.check_text("SPATIAL") {
        1
    } else {
        0
    };
    if !matches!(p.peek_kind(offset), Some(TokenType::Key | TokenType::Index)) {
        return false;
    }
    match p.peek_kind(offset + 1) {
        Some(TokenType::LParen) => true,
        Some(TokenType::Type(_)) | None => false,
        Some(_) => p.peek_kind(offset + 2) == Some(TokenType::LParen),
    }
}

/// Table-level key or check; `None` when the item is a column definition.
fn parse_table_key(p: &mut Parser<'_>) -> BridgeResult<Option<NodeId>> {
    if p.check(TokenType::Primary) && p.check_next(TokenType::Key) {
        p.advance();
        p.advance();
        let columns = p.parse_wrapped_csv(parse_key_part)?;
        return Ok(Some(p.tree.add(NodeKind::PrimaryKey, [("expressions", Arg::from(columns))])));
    }

    if p.match_token(TokenType::Foreign) {
        p.expect(TokenType::Key, "KEY after FOREIGN")?;
        let name = if p.check(TokenType::LParen) {
            None
        } else {
            Some(p.parse_identifier()?)
        };
        let columns = p.parse_wrapped_csv(|p| p.parse_identifier())?;
        let reference = parse_reference(p)?;
        let key = p.tree.add(
            NodeKind::ForeignKey,
            [("expressions", Arg::from(columns)), ("reference", Arg::from(reference))],
        );
        if let Some(name) = name {
            p.tree.set(key, "this", name);
        }
        return Ok(Some(key));
    }

    if p.match_token(TokenType::Unique) {
        p.match_any(&[TokenType::Key, TokenType::Index]);
        let key = p.tree.new_node(NodeKind::UniqueColumnConstraint);
        if !p.check(TokenType::LParen) {
            let name = p.parse_identifier()?;
            p.tree.set(key, "this", name);
        }
        let columns = p.parse_wrapped_csv(parse_key_part)?;
        p.tree.set(key, "expressions", columns);
        return Ok(Some(key));
    }

    if p.check(TokenType::Check) {
        p.advance();
        let condition = parse_check_body(p)?;
        return Ok(Some(p.tree.add(
            NodeKind::CheckColumnConstraint,
            [("this", Arg::from(condition))],
        )));
    }

    if at_index_definition(p) {
        let key = p.tree.new_node(NodeKind::IndexConstraint);
        if p.check_text("FULLTEXT") || p.check_text("SPATIAL") {
            let flavor = p.advance().map(|t| t.text.to_ascii_uppercase()).unwrap_or_default();
            p.tree.set(key, "kind", flavor);
        }
        p.advance();
        if !p.check(TokenType::LParen) {
            let name = p.parse_identifier()?;
            p.tree.set(key, "this", name);
        }
        let columns = p.parse_wrapped_csv(parse_key_part)?;
        p.tree.set(key, "expressions", columns);
        return Ok(Some(key));
    }

    Ok(None)
}

/// Key column: `name [(prefix length)] [ASC | DESC]`.
fn parse_key_part(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    let name = p.parse_identifier()?;
    let length = if p.check(TokenType::LParen) && p.peek_kind(1) == Some(TokenType::Number) {
        p.advance();
        let length = p.advance().map(|t| t.text.clone()).unwrap_or_default();
        p.expect(TokenType::RParen, "')'")?;
        Some(length)
    } else {
        None
    };
    let direction = p.match_any(&[TokenType::Asc, TokenType::Desc]);

    if length.is_none() && direction.is_none() {
        return Ok(name);
    }
    let ordered = p.tree.add(NodeKind::Ordered, [("this", Arg::from(name))]);
    if let Some(length) = length {
        p.tree.set(ordered, "length", length);
    }
    if let Some(direction) = direction {
        p.tree.set(ordered, "desc", direction == TokenType::Desc);
    }
    Ok(ordered)
}

fn parse_check_body(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    p.expect(TokenType::LParen, "'(' after CHECK")?;
    let condition = parse_expression(p)?;
    p.expect(TokenType::RParen, "')'")?;
    Ok(condition)
}

/// `REFERENCES table [(columns)] [ON DELETE action] [ON UPDATE action]`
fn parse_reference(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    p.expect(TokenType::References, "REFERENCES")?;
    let table = p.parse_table()?;
    let reference = p.tree.add(NodeKind::Reference, [("this", Arg::from(table))]);
    if p.check(TokenType::LParen) {
        let columns = p.parse_wrapped_csv(|p| p.parse_identifier())?;
        p.tree.set(reference, "expressions", columns);
    }
    loop {
        if p.match_text_seq(&["ON", "DELETE"]) {
            let action = parse_referential_action(p)?;
            p.tree.set(reference, "on_delete", action);
        } else if p.match_text_seq(&["ON", "UPDATE"]) {
            let action = parse_referential_action(p)?;
            p.tree.set(reference, "on_update", action);
        } else {
            return Ok(reference);
        }
    }
}

fn parse_referential_action(p: &mut Parser<'_>) -> BridgeResult<String> {
    const ACTIONS: [&[&str]; 5] = [
        &["CASCADE"],
        &["RESTRICT"],
        &["SET", "NULL"],
        &["SET", "DEFAULT"],
        &["NO", "ACTION"],
    ];
    for words in ACTIONS {
        if p.match_text_seq(words) {
            return Ok(words.join(" "));
        }
    }
    Err(p.expected("CASCADE, RESTRICT, SET NULL, SET DEFAULT or NO ACTION"))
}

/// `name [type] [constraint ...]`
pub fn parse_column_def(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    let name = p.parse_identifier()?;
    let column = p.tree.add(NodeKind::ColumnDef, [("this", Arg::from(name))]);

    let has_type = match p.current() {
        Some(token) => match token.kind {
            TokenType::Type(_) => true,
            TokenType::Var => !CONSTRAINT_WORDS.iter().any(|w| token.text.eq_ignore_ascii_case(w)),
            _ => false,
        },
        None => false,
    };
    if has_type {
        let data_type = parse_data_type(p)?;
        p.tree.set(column, "kind", data_type);
    }

    while let Some(constraint) = parse_column_constraint(p)? {
        p.tree.push(column, "constraints", constraint);
    }
    Ok(column)
}

/// One inline constraint wrapped in a `ColumnConstraint`; `None` when the next
/// token does not start one.
fn parse_column_constraint(p: &mut Parser<'_>) -> BridgeResult<Option<NodeId>> {
    let name = if p.match_token(TokenType::Constraint) {
        Some(p.parse_identifier()?)
    } else {
        None
    };

    let kind = match p.peek_kind(0) {
        Some(TokenType::Not) if p.check_next(TokenType::Null) => {
            p.advance();
            p.advance();
            p.tree.new_node(NodeKind::NotNullColumnConstraint)
        }
        Some(TokenType::Null) => {
            p.advance();
            p.tree.add(NodeKind::NotNullColumnConstraint, [("allow_null", Arg::from(true))])
        }
        Some(TokenType::Primary) if p.check_next(TokenType::Key) => {
            p.advance();
            p.advance();
            let node = p.tree.new_node(NodeKind::PrimaryKeyColumnConstraint);
            if let Some(direction) = p.match_any(&[TokenType::Asc, TokenType::Desc]) {
                p.tree.set(node, "desc", direction == TokenType::Desc);
            }
            node
        }
        Some(TokenType::Unique) => {
            p.advance();
            p.match_token(TokenType::Key);
            p.tree.new_node(NodeKind::UniqueColumnConstraint)
        }
        Some(TokenType::Default) => {
            p.advance();
            let value = parse_binary(p, ADDITIVE_POWER)?;
            p.tree.add(NodeKind::DefaultColumnConstraint, [("this", Arg::from(value))])
        }
        Some(TokenType::AutoIncrement) => {
            p.advance();
            p.tree.new_node(NodeKind::AutoIncrementColumnConstraint)
        }
        Some(TokenType::Comment) => {
            p.advance();
            let text = p.expect(TokenType::String, "comment string")?;
            let literal = p.tree.string_literal(text.text.clone());
            p.tree.add(NodeKind::CommentColumnConstraint, [("this", Arg::from(literal))])
        }
        Some(TokenType::Collate) => {
            p.advance();
            let value = parse_name_or_string(p)?;
            p.tree.add(NodeKind::CollateColumnConstraint, [("this", Arg::from(value))])
        }
        Some(TokenType::CharacterSet) => {
            p.advance();
            let value = parse_name_or_string(p)?;
            p.tree.add(NodeKind::CharacterSetColumnConstraint, [("this", Arg::from(value))])
        }
        Some(TokenType::Check) => {
            p.advance();
            let condition = parse_check_body(p)?;
            p.tree.add(NodeKind::CheckColumnConstraint, [("this", Arg::from(condition))])
        }
        Some(TokenType::References) => parse_reference(p)?,
        Some(TokenType::On) if p.check_next(TokenType::Update) => {
            p.advance();
            p.advance();
            let value = parse_binary(p, ADDITIVE_POWER)?;
            p.tree.add(NodeKind::OnUpdateColumnConstraint, [("this", Arg::from(value))])
        }
        _ if p.check_text("GENERATED") => {
            p.advance();
            parse_generated_identity(p)?
        }
        _ if p.check_text("IDENTITY") => {
            p.advance();
            parse_identity_shorthand(p)?
        }
        _ => {
            if name.is_some() {
                return Err(p.expected("column constraint after CONSTRAINT name"));
            }
            return Ok(None);
        }
    };

    let constraint = p.tree.add(NodeKind::ColumnConstraint, [("kind", Arg::from(kind))]);
    if let Some(name) = name {
        p.tree.set(constraint, "this", name);
    }
    Ok(Some(constraint))
}

fn parse_name_or_string(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    match p.current() {
        Some(token) if token.kind == TokenType::String => {
            p.advance();
            Ok(p.tree.string_literal(token.text.clone()))
        }
        _ => p.parse_identifier(),
    }
}

/// `GENERATED {ALWAYS | BY DEFAULT [ON NULL]} AS IDENTITY [(options)]`, after `GENERATED`.
fn parse_generated_identity(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    let node = p.tree.new_node(NodeKind::GeneratedAsIdentityColumnConstraint);
    if p.match_text_seq(&["BY", "DEFAULT"]) {
        p.tree.set(node, "this", false);
        if p.match_text_seq(&["ON", "NULL"]) {
            p.tree.set(node, "on_null", true);
        }
    } else {
        p.expect_text("ALWAYS")?;
        p.tree.set(node, "this", true);
    }
    p.expect(TokenType::As, "AS")?;
    p.expect_text("IDENTITY")?;

    let wrapped = p.match_token(TokenType::LParen);
    parse_identity_options(p, node)?;
    if wrapped {
        p.expect(TokenType::RParen, "')' after identity options")?;
    }
    Ok(node)
}

fn parse_identity_options(p: &mut Parser<'_>, node: NodeId) -> BridgeResult<()> {
    loop {
        if p.match_text_seq(&["START", "WITH"]) {
            let value = p.parse_signed_number()?;
            p.tree.set(node, "start", value);
        } else if p.match_text_seq(&["INCREMENT", "BY"]) {
            let value = p.parse_signed_number()?;
            p.tree.set(node, "increment", value);
        } else if p.match_text("MINVALUE") {
            let value = p.parse_signed_number()?;
            p.tree.set(node, "minvalue", value);
        } else if p.match_text("MAXVALUE") {
            let value = p.parse_signed_number()?;
            p.tree.set(node, "maxvalue", value);
        } else if p.match_text("CYCLE") {
            p.tree.set(node, "cycle", true);
        } else if p.match_text_seq(&["NO", "CYCLE"]) {
            p.tree.set(node, "cycle", false);
        } else {
            return Ok(());
        }
    }
}

/// `IDENTITY [(start, increment)]`, after `IDENTITY`.
fn parse_identity_shorthand(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    let node = p.tree.add(
        NodeKind::GeneratedAsIdentityColumnConstraint,
        [("this", Arg::from(false))],
    );
    if p.match_token(TokenType::LParen) {
        let start = p.parse_signed_number()?;
        p.expect(TokenType::Comma, "','")?;
        let increment = p.parse_signed_number()?;
        p.expect(TokenType::RParen, "')'")?;
        p.tree.set(node, "start", start);
        p.tree.set(node, "increment", increment);
    }
    Ok(node)
}

/// Table options after the schema, optionally comma separated.
fn parse_properties(p: &mut Parser<'_>, properties: &mut Vec<NodeId>) -> BridgeResult<()> {
    while let Some(property) = parse_property(p)? {
        properties.push(property);
        p.match_token(TokenType::Comma);
    }
    Ok(())
}

fn parse_property(p: &mut Parser<'_>) -> BridgeResult<Option<NodeId>> {
    if p.match_text("ENGINE") {
        p.match_token(TokenType::Eq);
        let value = parse_property_value(p)?;
        return Ok(Some(p.tree.add(NodeKind::EngineProperty, [("this", Arg::from(value))])));
    }

    let default = p.check(TokenType::Default)
        && matches!(p.peek_kind(1), Some(TokenType::CharacterSet | TokenType::Collate));
    if default {
        p.advance();
    }

    let kind = match p.peek_kind(0) {
        Some(TokenType::CharacterSet) => NodeKind::CharacterSetProperty,
        Some(TokenType::Collate) => NodeKind::CollateProperty,
        Some(TokenType::AutoIncrement) => NodeKind::AutoIncrementProperty,
        Some(TokenType::Comment) => NodeKind::CommentProperty,
        _ if p.check_text("PARTITION") && p.check_text_at(1, "BY") => {
            p.advance();
            p.advance();
            return parse_partition_by(p).map(Some);
        }
        _ => return Ok(None),
    };
    p.advance();
    p.match_token(TokenType::Eq);

    let node = if kind == NodeKind::CommentProperty {
        let text = p.expect(TokenType::String, "comment string")?;
        let literal = p.tree.string_literal(text.text.clone());
        p.tree.add(kind, [("this", Arg::from(literal))])
    } else {
        let value = parse_property_value(p)?;
        p.tree.add(kind, [("this", Arg::from(value))])
    };
    if default {
        p.tree.set(node, "default", true);
    }
    Ok(Some(node))
}

fn parse_property_value(p: &mut Parser<'_>) -> BridgeResult<String> {
    match p.current() {
        Some(token)
            if token.is_word()
                || matches!(
                    token.kind,
                    TokenType::String | TokenType::Identifier | TokenType::Number
                ) =>
        {
            p.advance();
            Ok(token.text.clone())
        }
        _ => Err(p.expected("property value")),
    }
}

/// `PARTITION BY {RANGE | LIST | HASH | KEY} (columns)`, after `PARTITION BY`.
fn parse_partition_by(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    let method = match p.advance() {
        Some(token) if token.is_word() => token.text.to_ascii_uppercase(),
        _ => return Err(p.expected("partitioning method")),
    };
    let columns = p.parse_wrapped_csv(parse_expression)?;
    Ok(p.tree.add(
        NodeKind::PartitionedByProperty,
        [("kind", Arg::from(method)), ("expressions", Arg::from(columns))],
    ))
}

/// `ALTER TABLE [IF EXISTS] table action, ...`
pub fn parse_alter(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    p.expect(TokenType::Table, "TABLE after ALTER")?;
    let alter = p.tree.new_node(NodeKind::AlterTable);
    if p.match_text_seq(&["IF", "EXISTS"]) {
        p.tree.set(alter, "exists", true);
    }
    p.match_text("ONLY");
    let table = p.parse_table()?;
    p.tree.set(alter, "this", table);

    let actions = p.parse_csv(parse_alter_action)?;
    p.tree.set(alter, "actions", actions);
    Ok(alter)
}

fn parse_alter_action(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    if p.match_token(TokenType::Add) {
        return parse_add_action(p);
    }
    if p.match_token(TokenType::Drop) {
        return parse_drop_action(p);
    }
    if p.match_text("RENAME") {
        if p.match_token(TokenType::Column) {
            let from = p.parse_identifier()?;
            p.expect_text("TO")?;
            let to = p.parse_identifier()?;
            return Ok(p.tree.add(
                NodeKind::RenameColumn,
                [("this", Arg::from(from)), ("to", Arg::from(to))],
            ));
        }
        if !p.match_text("TO") {
            p.match_token(TokenType::As);
        }
        let table = p.parse_table()?;
        return Ok(p.tree.add(NodeKind::RenameTable, [("this", Arg::from(table))]));
    }
    if p.match_token(TokenType::Alter) {
        p.match_token(TokenType::Column);
        return parse_alter_column(p);
    }
    Err(p.expected("ADD, DROP, RENAME or ALTER"))
}

fn parse_add_action(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    if p.match_token(TokenType::Constraint) {
        let name = p.parse_identifier()?;
        let Some(key) = parse_table_key(p)? else {
            return Err(p.expected("constraint definition"));
        };
        let constraint = p.tree.add(
            NodeKind::Constraint,
            [("this", Arg::from(name)), ("expressions", Arg::from(vec![key]))],
        );
        return Ok(p.tree.add(NodeKind::AddConstraint, [("this", Arg::from(constraint))]));
    }

    let is_key = matches!(
        p.peek_kind(0),
        Some(TokenType::Primary | TokenType::Foreign | TokenType::Unique | TokenType::Check)
    ) || at_index_definition(p);
    if is_key {
        if let Some(key) = parse_table_key(p)? {
            return Ok(p.tree.add(NodeKind::AddConstraint, [("this", Arg::from(key))]));
        }
    }

    p.match_token(TokenType::Column);
    let exists = p.match_text_seq(&["IF", "NOT", "EXISTS"]);
    let column = parse_column_def(p)?;
    if exists {
        p.tree.set(column, "exists", true);
    }
    Ok(column)
}

fn parse_drop_action(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    let kind = if p.match_token(TokenType::Constraint) {
        Some("CONSTRAINT")
    } else if p.match_any(&[TokenType::Index, TokenType::Key]).is_some() {
        Some("INDEX")
    } else if p.match_text_seq(&["FOREIGN", "KEY"]) {
        Some("FOREIGN KEY")
    } else if p.match_text_seq(&["PRIMARY", "KEY"]) {
        return Ok(p.tree.add(NodeKind::DropConstraint, [("kind", Arg::from("PRIMARY KEY"))]));
    } else {
        None
    };

    let node_kind = if kind.is_some() {
        NodeKind::DropConstraint
    } else {
        p.match_token(TokenType::Column);
        NodeKind::DropColumn
    };
    let exists = p.match_text_seq(&["IF", "EXISTS"]);
    let name = p.parse_identifier()?;
    let node = p.tree.add(
        node_kind,
        [("this", Arg::from(name)), ("exists", Arg::from(exists))],
    );
    if let Some(kind) = kind {
        p.tree.set(node, "kind", kind);
    }
    Ok(node)
}

/// `name {TYPE t | SET DATA TYPE t | SET DEFAULT e | DROP DEFAULT | {SET | DROP} NOT NULL}`
fn parse_alter_column(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    let name = p.parse_identifier()?;
    let node = p.tree.add(NodeKind::AlterColumn, [("this", Arg::from(name))]);

    if p.match_text("TYPE") || p.match_text_seq(&["SET", "DATA", "TYPE"]) {
        let data_type = parse_data_type(p)?;
        p.tree.set(node, "dtype", data_type);
    } else if p.match_text_seq(&["SET", "DEFAULT"]) {
        let value = parse_binary(p, ADDITIVE_POWER)?;
        p.tree.set(node, "default", value);
    } else if p.match_text_seq(&["DROP", "DEFAULT"]) {
        p.tree.set(node, "drop_default", true);
    } else if p.match_text_seq(&["SET", "NOT", "NULL"]) {
        p.tree.set(node, "not_null", true);
    } else if p.match_text_seq(&["DROP", "NOT", "NULL"]) {
        p.tree.set(node, "not_null", false);
    } else {
        return Err(p.expected("TYPE, SET DEFAULT, DROP DEFAULT or NOT NULL change"));
    }
    Ok(node)
}

/// `DROP {TABLE | VIEW | INDEX | DATABASE | SCHEMA} [IF EXISTS] name, ... [ON table] [CASCADE | RESTRICT]`
pub fn parse_drop(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    let kind = if p.match_token(TokenType::Table) {
        "TABLE"
    } else if p.match_token(TokenType::Index) {
        "INDEX"
    } else if p.match_text("VIEW") {
        "VIEW"
    } else if p.match_text("DATABASE") {
        "DATABASE"
    } else if p.match_text("SCHEMA") {
        "SCHEMA"
    } else {
        return Err(p.expected("TABLE, VIEW, INDEX, DATABASE or SCHEMA after DROP"));
    };
    let exists = p.match_text_seq(&["IF", "EXISTS"]);
    let names = p.parse_csv(|p| p.parse_table())?;
    let drop = p.tree.add(
        NodeKind::Drop,
        [
            ("kind", Arg::from(kind)),
            ("exists", Arg::from(exists)),
            ("expressions", Arg::from(names)),
        ],
    );

    if kind == "INDEX" && p.match_token(TokenType::On) {
        let table = p.parse_table()?;
        p.tree.set(drop, "table", table);
    }
    for behavior in ["CASCADE", "RESTRICT"] {
        if p.match_text(behavior) {
            p.tree.set(drop, "cascade", behavior);
        }
    }
    Ok(drop)
}
