//! Queries and data-modification statements.

use super::expressions::{parse_column, parse_expression, parse_primary};
use crate::ast::{Arg, NodeId, NodeKind};
use crate::error::BridgeResult;
use crate::parser::Parser;
use crate::tokenizer::TokenType;

/// Statement entry point for `SELECT`.
pub fn parse_select_statement(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    parse_select(p)
}

/// `( SELECT ... )` as a statement.
pub fn parse_wrapped_select(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    p.expect(TokenType::Select, "SELECT")?;
    let select = parse_select(p)?;
    p.expect(TokenType::RParen, "')'")?;
    p.tree.set(select, "wrapped", true);
    Ok(select)
}

/// Body of a `SELECT`, after the keyword.
pub fn parse_select(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    p.descend()?;
    let result = parse_select_body(p);
    p.ascend();
    result
}

fn parse_select_body(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    let select = p.tree.new_node(NodeKind::Select);
    if p.match_token(TokenType::Distinct) {
        p.tree.set(select, "distinct", true);
    } else {
        p.match_token(TokenType::All);
    }

    let items = p.parse_csv(parse_select_item)?;
    p.tree.set(select, "expressions", items);

    if p.match_token(TokenType::From) {
        let tables = p.parse_csv(parse_table_expression)?;
        let from = p.tree.add(NodeKind::From, [("expressions", Arg::from(tables))]);
        p.tree.set(select, "from", from);

        while let Some(join) = parse_join(p)? {
            p.tree.push(select, "joins", join);
        }
    }

    if let Some(filter) = parse_where(p)? {
        p.tree.set(select, "where", filter);
    }

    if p.match_text_seq(&["GROUP", "BY"]) {
        let keys = p.parse_csv(parse_expression)?;
        let group = p.tree.add(NodeKind::Group, [("expressions", Arg::from(keys))]);
        p.tree.set(select, "group", group);
    }

    if p.match_token(TokenType::Having) {
        let condition = parse_expression(p)?;
        let having = p.tree.add(NodeKind::Having, [("this", Arg::from(condition))]);
        p.tree.set(select, "having", having);
    }

    if p.match_text_seq(&["ORDER", "BY"]) {
        let keys = p.parse_csv(parse_ordered)?;
        let order = p.tree.add(NodeKind::Order, [("expressions", Arg::from(keys))]);
        p.tree.set(select, "order", order);
    }

    parse_paging(p, select)?;
    Ok(select)
}

fn parse_select_item(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    let expr = parse_expression(p)?;
    parse_alias(p, expr)
}

/// Wrap `this` in an `Alias` if `[AS] name` follows.
fn parse_alias(p: &mut Parser<'_>, this: NodeId) -> BridgeResult<NodeId> {
    let alias = if p.match_token(TokenType::As) {
        Some(p.parse_identifier()?)
    } else if matches!(p.peek_kind(0), Some(TokenType::Var | TokenType::Identifier)) {
        Some(p.parse_identifier()?)
    } else {
        None
    };

    Ok(match alias {
        Some(alias) => p.tree.add(
            NodeKind::Alias,
            [("this", Arg::from(this)), ("alias", Arg::from(alias))],
        ),
        None => this,
    })
}

/// Table reference or parenthesized subquery, with optional alias.
pub fn parse_table_expression(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    let source = if p.check(TokenType::LParen) && p.check_next(TokenType::Select) {
        p.advance();
        p.advance();
        let select = parse_select(p)?;
        p.expect(TokenType::RParen, "')' after subquery")?;
        p.tree.add(NodeKind::Subquery, [("this", Arg::from(select))])
    } else {
        p.parse_table()?
    };
    parse_alias(p, source)
}

fn parse_join(p: &mut Parser<'_>) -> BridgeResult<Option<NodeId>> {
    let side = match p.peek_kind(0) {
        Some(TokenType::Join) => None,
        Some(TokenType::Inner) => Some("INNER"),
        Some(TokenType::Cross) => Some("CROSS"),
        Some(TokenType::Left) => Some("LEFT"),
        Some(TokenType::Right) => Some("RIGHT"),
        Some(TokenType::Full) => Some("FULL"),
        _ => return Ok(None),
    };
    if side.is_some() {
        p.advance();
        p.match_token(TokenType::Outer);
    }
    p.expect(TokenType::Join, "JOIN")?;

    let table = parse_table_expression(p)?;
    let join = p.tree.add(NodeKind::Join, [("this", Arg::from(table))]);
    if let Some(side) = side {
        p.tree.set(join, "side", side);
    }

    if p.match_token(TokenType::On) {
        let condition = parse_expression(p)?;
        p.tree.set(join, "on", condition);
    } else if p.match_token(TokenType::Using) {
        let columns = p.parse_wrapped_csv(|p| p.parse_identifier())?;
        p.tree.set(join, "using", columns);
    }
    Ok(Some(join))
}

fn parse_where(p: &mut Parser<'_>) -> BridgeResult<Option<NodeId>> {
    if !p.match_token(TokenType::Where) {
        return Ok(None);
    }
    let condition = parse_expression(p)?;
    Ok(Some(p.tree.add(NodeKind::Where, [("this", Arg::from(condition))])))
}

/// Ordering term: `expr [ASC | DESC] [NULLS FIRST | NULLS LAST]`.
pub fn parse_ordered(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    let expr = parse_expression(p)?;
    let ordered = p.tree.add(NodeKind::Ordered, [("this", Arg::from(expr))]);
    match p.match_any(&[TokenType::Asc, TokenType::Desc]) {
        Some(TokenType::Desc) => p.tree.set(ordered, "desc", true),
        Some(_) => p.tree.set(ordered, "desc", false),
        None => {}
    }
    if p.match_text_seq(&["NULLS", "FIRST"]) {
        p.tree.set(ordered, "nulls", "FIRST");
    } else if p.match_text_seq(&["NULLS", "LAST"]) {
        p.tree.set(ordered, "nulls", "LAST");
    }
    Ok(ordered)
}

/// `LIMIT n [OFFSET m]`, `LIMIT m, n`, `OFFSET m ROWS [FETCH ...]`, `FETCH FIRST n ROWS ONLY`.
fn parse_paging(p: &mut Parser<'_>, select: NodeId) -> BridgeResult<()> {
    loop {
        if p.match_token(TokenType::Limit) {
            let first = parse_expression(p)?;
            if p.match_token(TokenType::Comma) {
                let count = parse_expression(p)?;
                set_offset(p, select, first);
                set_limit(p, select, count);
            } else {
                set_limit(p, select, first);
            }
        } else if p.match_token(TokenType::Offset) {
            let skip = parse_expression(p)?;
            if !p.match_text("ROWS") {
                p.match_text("ROW");
            }
            set_offset(p, select, skip);
        } else if p.match_text("FETCH") {
            if !p.match_text("FIRST") {
                p.expect_text("NEXT")?;
            }
            let count = parse_expression(p)?;
            if !p.match_text("ROWS") {
                p.expect_text("ROW")?;
            }
            p.expect_text("ONLY")?;
            set_limit(p, select, count);
        } else {
            return Ok(());
        }
    }
}

fn set_limit(p: &mut Parser<'_>, select: NodeId, count: NodeId) {
    let limit = p.tree.add(NodeKind::Limit, [("this", Arg::from(count))]);
    p.tree.set(select, "limit", limit);
}

fn set_offset(p: &mut Parser<'_>, select: NodeId, skip: NodeId) {
    let offset = p.tree.add(NodeKind::Offset, [("this", Arg::from(skip))]);
    p.tree.set(select, "offset", offset);
}

/// `INSERT [INTO] table [(columns)] VALUES (...), ... | SELECT ...`
pub fn parse_insert(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    p.match_token(TokenType::Into);
    let table = p.parse_table()?;
    let insert = p.tree.add(NodeKind::Insert, [("this", Arg::from(table))]);

    if p.check(TokenType::LParen) && !p.check_next(TokenType::Select) {
        let columns = p.parse_wrapped_csv(|p| p.parse_identifier())?;
        p.tree.set(insert, "columns", columns);
    }

    let source = if p.match_token(TokenType::Values) {
        let rows = p.parse_csv(parse_row)?;
        p.tree.add(NodeKind::Values, [("expressions", Arg::from(rows))])
    } else if p.match_token(TokenType::Select) {
        parse_select(p)?
    } else if p.match_token(TokenType::LParen) {
        p.expect(TokenType::Select, "SELECT")?;
        let select = parse_select(p)?;
        p.expect(TokenType::RParen, "')'")?;
        p.tree.add(NodeKind::Subquery, [("this", Arg::from(select))])
    } else {
        return Err(p.expected("VALUES or SELECT"));
    };
    p.tree.set(insert, "expression", source);
    Ok(insert)
}

fn parse_row(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    let values = p.parse_wrapped_csv(parse_expression)?;
    Ok(p.tree.add(NodeKind::Tuple, [("expressions", Arg::from(values))]))
}

/// `UPDATE table SET col = expr, ... [WHERE ...]`
pub fn parse_update(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    let table = parse_table_expression(p)?;
    p.expect(TokenType::Set, "SET")?;
    let assignments = p.parse_csv(parse_assignment)?;
    let update = p.tree.add(
        NodeKind::Update,
        [("this", Arg::from(table)), ("expressions", Arg::from(assignments))],
    );
    if let Some(filter) = parse_where(p)? {
        p.tree.set(update, "where", filter);
    }
    Ok(update)
}

fn parse_assignment(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    let column = parse_column(p)?;
    p.expect(TokenType::Eq, "'=' in SET")?;
    let value = parse_expression(p)?;
    Ok(p.tree.add(
        NodeKind::BinaryOp,
        [
            ("this", Arg::from(column)),
            ("expression", Arg::from(value)),
            ("op", Arg::from("=")),
        ],
    ))
}

/// `DELETE FROM table [WHERE ...]`
pub fn parse_delete(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    p.match_token(TokenType::From);
    let table = parse_table_expression(p)?;
    let delete = p.tree.add(NodeKind::Delete, [("this", Arg::from(table))]);
    if let Some(filter) = parse_where(p)? {
        p.tree.set(delete, "where", filter);
    }
    Ok(delete)
}

/// `USE name`
pub fn parse_use(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    let name = p.parse_identifier()?;
    Ok(p.tree.add(NodeKind::Use, [("this", Arg::from(name))]))
}

/// `LOCK TABLE[S] name [READ | WRITE | EXCLUSIVE | IN <mode> MODE]`
pub fn parse_lock(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    let keyword = if p.match_text("TABLES") {
        "TABLES"
    } else {
        p.expect(TokenType::Table, "TABLE or TABLES after LOCK")?;
        "TABLE"
    };
    let table = p.parse_table()?;
    let lock = p.tree.add(
        NodeKind::ExclusiveLock,
        [("this", Arg::from(table)), ("kind", Arg::from(keyword))],
    );

    if p.match_token(TokenType::In) {
        let mut words = Vec::new();
        while !p.match_text("MODE") {
            match p.advance() {
                Some(token) if token.is_word() => words.push(token.text.to_ascii_uppercase()),
                _ => return Err(p.expected("lock mode followed by MODE")),
            }
        }
        p.tree.set(lock, "mode", words.join(" "));
        p.tree.set(lock, "in_mode", true);
    } else {
        for mode in ["READ", "WRITE", "EXCLUSIVE", "SHARE"] {
            if p.match_text(mode) {
                p.tree.set(lock, "mode", mode);
                break;
            }
        }
    }
    Ok(lock)
}

/// `COMMENT ON {COLUMN | TABLE} target IS 'text'`
pub fn parse_comment_on(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    p.expect(TokenType::On, "ON after COMMENT")?;
    let (kind, target) = if p.match_token(TokenType::Column) {
        ("COLUMN", parse_column(p)?)
    } else if p.match_token(TokenType::Table) {
        ("TABLE", p.parse_table()?)
    } else {
        return Err(p.expected("COLUMN or TABLE"));
    };
    p.expect(TokenType::Is, "IS")?;
    if !p.check(TokenType::String) && !p.check(TokenType::Null) {
        return Err(p.expected("comment string"));
    }
    let text = parse_primary(p)?;
    Ok(p.tree.add(
        NodeKind::CommentOn,
        [
            ("kind", Arg::from(kind)),
            ("this", Arg::from(target)),
            ("expression", Arg::from(text)),
        ],
    ))
}
