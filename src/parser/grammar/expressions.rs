//! Expression grammar.
//!
//! Binary operators use precedence climbing; each operator has a binding power and
//! the right operand is parsed with `power + 1`, so every level is left-associative.
//!
//! | power | operators                                  |
//! |-------|--------------------------------------------|
//! | 1     | `OR`                                       |
//! | 2     | `AND`                                      |
//! | 3     | prefix `NOT`                               |
//! | 4     | comparisons, `IS`, `IN`, `LIKE`, `BETWEEN` |
//! | 5     | `\|\|`                                     |
//! | 6     | `+ -`                                      |
//! | 7     | `* / %`                                    |
//! | 8     | unary `-` `+`                              |
//! | 9     | postfix `::`                               |

use crate::ast::{Arg, BinaryOperator, NodeId, NodeKind, Tree};
use crate::error::BridgeResult;
use crate::parser::Parser;
use crate::tokenizer::TokenType;

pub const NOT_POWER: u8 = 3;
pub const COMPARISON_POWER: u8 = 4;
pub const CONCAT_POWER: u8 = 5;
pub const ADDITIVE_POWER: u8 = 6;
const MULTIPLICATIVE_POWER: u8 = 7;
const UNARY_POWER: u8 = 8;
const CAST_POWER: u8 = 9;

pub fn parse_expression(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    parse_binary(p, 0)
}

/// Parse an expression whose operators all bind at least as tightly as `min_power`.
pub fn parse_binary(p: &mut Parser<'_>, min_power: u8) -> BridgeResult<NodeId> {
    p.descend()?;
    let result = parse_operators(p, min_power);
    p.ascend();
    result
}

fn parse_operators(p: &mut Parser<'_>, min_power: u8) -> BridgeResult<NodeId> {
    let mut lhs = parse_prefix(p)?;
    while let Some(kind) = p.peek_kind(0) {
        let Some(power) = infix_power(p, kind) else {
            break;
        };
        if power < min_power {
            break;
        }
        lhs = parse_infix(p, lhs, kind, power)?;
    }
    Ok(lhs)
}

fn infix_power(p: &Parser<'_>, kind: TokenType) -> Option<u8> {
    let power = match kind {
        TokenType::Or => 1,
        TokenType::And => 2,
        TokenType::Eq
        | TokenType::Neq
        | TokenType::Lt
        | TokenType::Lte
        | TokenType::Gt
        | TokenType::Gte
        | TokenType::Is
        | TokenType::In
        | TokenType::Like
        | TokenType::ILike
        | TokenType::Between => COMPARISON_POWER,
        TokenType::Not
            if matches!(
                p.peek_kind(1),
                Some(TokenType::In | TokenType::Like | TokenType::ILike | TokenType::Between)
            ) =>
        {
            COMPARISON_POWER
        }
        TokenType::DPipe => CONCAT_POWER,
        TokenType::Plus | TokenType::Dash => ADDITIVE_POWER,
        TokenType::Star | TokenType::Slash | TokenType::Percent => MULTIPLICATIVE_POWER,
        TokenType::DColon => CAST_POWER,
        _ => return None,
    };
    Some(power)
}

fn binary_operator(kind: TokenType) -> Option<BinaryOperator> {
    let op = match kind {
        TokenType::Or => BinaryOperator::Or,
        TokenType::And => BinaryOperator::And,
        TokenType::Eq => BinaryOperator::Eq,
        TokenType::Neq => BinaryOperator::Neq,
        TokenType::Lt => BinaryOperator::Lt,
        TokenType::Lte => BinaryOperator::Lte,
        TokenType::Gt => BinaryOperator::Gt,
        TokenType::Gte => BinaryOperator::Gte,
        TokenType::Plus => BinaryOperator::Add,
        TokenType::Dash => BinaryOperator::Sub,
        TokenType::Star => BinaryOperator::Mul,
        TokenType::Slash => BinaryOperator::Div,
        TokenType::Percent => BinaryOperator::Mod,
        _ => return None,
    };
    Some(op)
}

fn parse_infix(p: &mut Parser<'_>, lhs: NodeId, kind: TokenType, power: u8) -> BridgeResult<NodeId> {
    if let Some(op) = binary_operator(kind) {
        p.advance();
        let rhs = parse_binary(p, power + 1)?;
        return Ok(p.tree.add(
            NodeKind::BinaryOp,
            [
                ("this", Arg::from(lhs)),
                ("expression", Arg::from(rhs)),
                ("op", Arg::from(op.as_str())),
            ],
        ));
    }

    match kind {
        TokenType::DPipe => {
            p.advance();
            let rhs = parse_binary(p, power + 1)?;
            if p.tree.kind(lhs) == NodeKind::Concat {
                p.tree.push(lhs, "expressions", rhs);
                return Ok(lhs);
            }
            Ok(p.tree.add(NodeKind::Concat, [("expressions", Arg::from(vec![lhs, rhs]))]))
        }
        TokenType::DColon => {
            p.advance();
            let to = parse_data_type(p)?;
            Ok(p.tree.add(NodeKind::Cast, [("this", Arg::from(lhs)), ("to", Arg::from(to))]))
        }
        TokenType::Is => {
            p.advance();
            let negated = p.match_token(TokenType::Not);
            let rhs = match p.advance().map(|t| t.kind) {
                Some(TokenType::Null) => p.tree.new_node(NodeKind::Null),
                Some(TokenType::True) => p.tree.add(NodeKind::Boolean, [("this", Arg::from(true))]),
                Some(TokenType::False) => p.tree.add(NodeKind::Boolean, [("this", Arg::from(false))]),
                _ => return Err(p.expected("NULL, TRUE or FALSE after IS")),
            };
            Ok(p.tree.add(
                NodeKind::Is,
                [
                    ("this", Arg::from(lhs)),
                    ("expression", Arg::from(rhs)),
                    ("negated", Arg::from(negated)),
                ],
            ))
        }
        _ => {
            let negated = p.match_token(TokenType::Not);
            parse_predicate(p, lhs, negated, power)
        }
    }
}

/// `[NOT] IN`, `[NOT] LIKE`, `[NOT] ILIKE`, `[NOT] BETWEEN`.
fn parse_predicate(p: &mut Parser<'_>, lhs: NodeId, negated: bool, power: u8) -> BridgeResult<NodeId> {
    let node = match p.advance().map(|t| t.kind) {
        Some(TokenType::In) => {
            p.expect(TokenType::LParen, "'(' after IN")?;
            let node = p.tree.add(NodeKind::In, [("this", Arg::from(lhs))]);
            if p.match_token(TokenType::Select) {
                let select = super::dml::parse_select(p)?;
                let query = p.tree.add(NodeKind::Subquery, [("this", Arg::from(select))]);
                p.tree.set(node, "query", query);
            } else {
                let values = p.parse_csv(parse_expression)?;
                p.tree.set(node, "expressions", values);
            }
            p.expect(TokenType::RParen, "')'")?;
            node
        }
        Some(kind @ (TokenType::Like | TokenType::ILike)) => {
            let rhs = parse_binary(p, power + 1)?;
            let node_kind = if kind == TokenType::Like {
                NodeKind::Like
            } else {
                NodeKind::ILike
            };
            p.tree.add(
                node_kind,
                [("this", Arg::from(lhs)), ("expression", Arg::from(rhs))],
            )
        }
        Some(TokenType::Between) => {
            let low = parse_binary(p, CONCAT_POWER)?;
            p.expect(TokenType::And, "AND in BETWEEN")?;
            let high = parse_binary(p, CONCAT_POWER)?;
            p.tree.add(
                NodeKind::Between,
                [
                    ("this", Arg::from(lhs)),
                    ("low", Arg::from(low)),
                    ("high", Arg::from(high)),
                ],
            )
        }
        _ => return Err(p.expected("IN, LIKE or BETWEEN")),
    };
    p.tree.set(node, "negated", negated);
    Ok(node)
}

fn parse_prefix(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    match p.peek_kind(0) {
        Some(TokenType::Not) => {
            p.advance();
            let operand = parse_binary(p, NOT_POWER)?;
            Ok(p.tree.add(NodeKind::Not, [("this", Arg::from(operand))]))
        }
        Some(TokenType::Dash) => {
            p.advance();
            let operand = parse_binary(p, UNARY_POWER)?;
            Ok(p.tree.add(NodeKind::Neg, [("this", Arg::from(operand))]))
        }
        Some(TokenType::Plus) => {
            p.advance();
            parse_binary(p, UNARY_POWER)
        }
        _ => parse_primary(p),
    }
}

pub fn parse_primary(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    let Some(token) = p.current() else {
        return Err(p.expected("expression"));
    };

    match token.kind {
        TokenType::Number => {
            p.advance();
            Ok(p.tree.number_literal(token.text.clone()))
        }
        TokenType::String => {
            p.advance();
            Ok(p.tree.string_literal(token.text.clone()))
        }
        TokenType::NationalString => {
            p.advance();
            let literal = p.tree.string_literal(token.text.clone());
            p.tree.set(literal, "national", true);
            Ok(literal)
        }
        TokenType::Null => {
            p.advance();
            Ok(p.tree.new_node(NodeKind::Null))
        }
        TokenType::True | TokenType::False => {
            p.advance();
            let value = token.kind == TokenType::True;
            Ok(p.tree.add(NodeKind::Boolean, [("this", Arg::from(value))]))
        }
        TokenType::Star => {
            p.advance();
            Ok(p.tree.new_node(NodeKind::Star))
        }
        TokenType::Parameter => {
            p.advance();
            Ok(p.tree.add(NodeKind::Placeholder, [("this", Arg::from(token.text.as_str()))]))
        }
        TokenType::Introducer => {
            p.advance();
            let literal = p.expect(TokenType::String, "string literal after character set introducer")?;
            let value = p.tree.string_literal(literal.text.clone());
            Ok(p.tree.add(
                NodeKind::Introducer,
                [("this", Arg::from(token.text.as_str())), ("expression", Arg::from(value))],
            ))
        }
        TokenType::LParen => parse_paren(p),
        TokenType::Case => {
            p.advance();
            parse_case(p)
        }
        TokenType::Cast => {
            p.advance();
            parse_cast(p)
        }
        TokenType::Type(data_type) if p.check_next(TokenType::String) => {
            p.advance();
            let literal_token = p.advance().map(|t| t.text.clone()).unwrap_or_default();
            let literal = p.tree.string_literal(literal_token);
            match p.config().type_literal_parsers.get(&data_type).copied() {
                Some(parser) => parser(p, literal),
                None => {
                    let to = p.tree.add(NodeKind::DataType, [("tag", Arg::from(data_type.as_str()))]);
                    Ok(p.tree.add(NodeKind::Cast, [("this", Arg::from(literal)), ("to", Arg::from(to))]))
                }
            }
        }
        _ if p.check_next(TokenType::LParen) && is_function_name(token.kind) && token.is_word() => {
            parse_function(p)
        }
        _ => parse_column(p),
    }
}

fn is_function_name(kind: TokenType) -> bool {
    match kind {
        TokenType::Var | TokenType::Type(_) | TokenType::Left | TokenType::Right => true,
        TokenType::Identifier | TokenType::Introducer => false,
        other => !other.is_reserved(),
    }
}

/// `name`, `table.name`, `db.table.name` or `table.*`.
pub fn parse_column(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    let Some(first) = p.try_identifier() else {
        return Err(p.expected("expression"));
    };
    if !p.match_token(TokenType::Dot) {
        return Ok(p.tree.add(NodeKind::Column, [("this", Arg::from(first))]));
    }

    if p.match_token(TokenType::Star) {
        let star = p.tree.new_node(NodeKind::Star);
        return Ok(p.tree.add(
            NodeKind::Column,
            [("this", Arg::from(star)), ("table", Arg::from(first))],
        ));
    }

    let second = p.parse_identifier()?;
    if p.match_token(TokenType::Dot) {
        let third = p.parse_identifier()?;
        return Ok(p.tree.add(
            NodeKind::Column,
            [
                ("this", Arg::from(third)),
                ("table", Arg::from(second)),
                ("db", Arg::from(first)),
            ],
        ));
    }
    Ok(p.tree.add(
        NodeKind::Column,
        [("this", Arg::from(second)), ("table", Arg::from(first))],
    ))
}

fn parse_paren(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    p.expect(TokenType::LParen, "'('")?;
    if p.match_token(TokenType::Select) {
        let select = super::dml::parse_select(p)?;
        p.expect(TokenType::RParen, "')' after subquery")?;
        return Ok(p.tree.add(NodeKind::Subquery, [("this", Arg::from(select))]));
    }

    let first = parse_expression(p)?;
    if p.match_token(TokenType::Comma) {
        let mut items = vec![first];
        items.extend(p.parse_csv(parse_expression)?);
        p.expect(TokenType::RParen, "')'")?;
        return Ok(p.tree.add(NodeKind::Tuple, [("expressions", Arg::from(items))]));
    }
    p.expect(TokenType::RParen, "')'")?;
    Ok(p.tree.add(NodeKind::Paren, [("this", Arg::from(first))]))
}

/// `CASE [operand] WHEN .. THEN .. [ELSE ..] END`, after `CASE`.
fn parse_case(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    let case = p.tree.new_node(NodeKind::Case);
    if !p.check(TokenType::When) {
        let operand = parse_expression(p)?;
        p.tree.set(case, "this", operand);
    }

    while p.match_token(TokenType::When) {
        let condition = parse_expression(p)?;
        p.expect(TokenType::Then, "THEN")?;
        let result = parse_expression(p)?;
        let when = p.tree.add(
            NodeKind::When,
            [("this", Arg::from(condition)), ("then", Arg::from(result))],
        );
        p.tree.push(case, "ifs", when);
    }
    if p.tree.children(case, "ifs").is_empty() {
        return Err(p.expected("WHEN"));
    }

    if p.match_token(TokenType::Else) {
        let default = parse_expression(p)?;
        p.tree.set(case, "default", default);
    }
    p.expect(TokenType::End, "END")?;
    Ok(case)
}

/// `CAST(expr AS type)`, after `CAST`.
fn parse_cast(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    p.expect(TokenType::LParen, "'(' after CAST")?;
    let this = parse_expression(p)?;
    p.expect(TokenType::As, "AS")?;
    let to = parse_data_type(p)?;
    p.expect(TokenType::RParen, "')'")?;
    Ok(p.tree.add(NodeKind::Cast, [("this", Arg::from(this)), ("to", Arg::from(to))]))
}

fn parse_function(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    let name = p.advance().map(|t| t.text.clone()).unwrap_or_default();
    let upper = name.to_ascii_uppercase();
    p.expect(TokenType::LParen, "'('")?;

    if let Some(parser) = p.config().function_parsers.get(&upper).copied() {
        return parser(p);
    }

    let distinct = p.match_token(TokenType::Distinct);
    let args = if p.check(TokenType::RParen) {
        Vec::new()
    } else {
        p.parse_csv(parse_expression)?
    };
    p.expect(TokenType::RParen, "')' to close function call")?;

    if !distinct {
        if let Some(builder) = p.config().functions.get(&upper).copied() {
            return Ok(builder(&mut p.tree, &name, args));
        }
    }
    let node = anonymous(&mut p.tree, &name, args);
    if distinct {
        p.tree.set(node, "distinct", true);
    }
    Ok(node)
}

/// Data type reference: a known type keyword or any other name, with optional
/// parameters and modifiers.
pub fn parse_data_type(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    let Some(token) = p.current() else {
        return Err(p.expected("data type"));
    };
    let node = match token.kind {
        TokenType::Type(data_type) => {
            p.advance();
            let data_type = if data_type == crate::ast::DataType::Char && p.match_text("VARYING") {
                crate::ast::DataType::VarChar
            } else {
                data_type
            };
            p.tree.add(NodeKind::DataType, [("tag", Arg::from(data_type.as_str()))])
        }
        TokenType::Var | TokenType::Identifier => {
            p.advance();
            p.tree.add(NodeKind::DataType, [("name", Arg::from(token.text.as_str()))])
        }
        _ => return Err(p.expected("data type")),
    };

    if p.check(TokenType::LParen) {
        let params = p.parse_wrapped_csv(parse_type_param)?;
        p.tree.set(node, "expressions", params);
    }
    if p.match_text("UNSIGNED") {
        p.tree.set(node, "unsigned", true);
    }
    if p.match_text("ZEROFILL") {
        p.tree.set(node, "zerofill", true);
    }
    if p.match_text_seq(&["WITH", "TIME", "ZONE"]) {
        p.tree.set(node, "time_zone", "WITH TIME ZONE");
    } else if p.match_text_seq(&["WITHOUT", "TIME", "ZONE"]) {
        p.tree.set(node, "time_zone", "WITHOUT TIME ZONE");
    }
    Ok(node)
}

/// `10`, `'a'` (enum members) or a bare word such as `MAX`.
fn parse_type_param(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    match p.peek_kind(0) {
        Some(TokenType::Number) | Some(TokenType::String) => parse_primary(p),
        _ => p.parse_identifier(),
    }
}

// ========== Function builders ==========

pub fn anonymous(tree: &mut Tree, name: &str, args: Vec<NodeId>) -> NodeId {
    tree.add(
        NodeKind::Anonymous,
        [("this", Arg::from(name)), ("expressions", Arg::from(args))],
    )
}

pub fn build_coalesce(tree: &mut Tree, _name: &str, args: Vec<NodeId>) -> NodeId {
    tree.add(NodeKind::Coalesce, [("expressions", Arg::from(args))])
}

/// `SUBSTRING(str, start[, length])`
pub fn build_substring(tree: &mut Tree, name: &str, args: Vec<NodeId>) -> NodeId {
    match args.as_slice() {
        [this, start] => tree.add(
            NodeKind::Substring,
            [("this", Arg::from(*this)), ("start", Arg::from(*start))],
        ),
        [this, start, length] => tree.add(
            NodeKind::Substring,
            [
                ("this", Arg::from(*this)),
                ("start", Arg::from(*start)),
                ("length", Arg::from(*length)),
            ],
        ),
        _ => anonymous(tree, name, args),
    }
}

pub fn build_pow(tree: &mut Tree, name: &str, args: Vec<NodeId>) -> NodeId {
    match args.as_slice() {
        [this, exponent] => tree.add(
            NodeKind::Pow,
            [("this", Arg::from(*this)), ("expression", Arg::from(*exponent))],
        ),
        _ => anonymous(tree, name, args),
    }
}

pub fn build_lower(tree: &mut Tree, name: &str, args: Vec<NodeId>) -> NodeId {
    match args.as_slice() {
        [this] => tree.add(NodeKind::Lower, [("this", Arg::from(*this))]),
        _ => anonymous(tree, name, args),
    }
}

/// `EXTRACT(unit FROM expr)`, after the opening parenthesis.
pub fn parse_extract(p: &mut Parser<'_>) -> BridgeResult<NodeId> {
    let unit = match p.advance() {
        Some(token) if token.is_word() || token.kind == TokenType::String => token.text.to_ascii_uppercase(),
        _ => return Err(p.expected("date part in EXTRACT")),
    };
    p.expect(TokenType::From, "FROM in EXTRACT")?;
    let expression = parse_expression(p)?;
    p.expect(TokenType::RParen, "')'")?;
    Ok(p.tree.add(
        NodeKind::Extract,
        [("this", Arg::from(unit)), ("expression", Arg::from(expression))],
    ))
}
