use super::*;
use crate::ast::{Ast, DataType, NodeKind};
use crate::tokenizer::{Tokenizer, TokenizerConfig};

fn parse_sql(sql: &str) -> BridgeResult<Vec<Ast>> {
    let tokenizer_config = TokenizerConfig::default();
    let tokens = Tokenizer::new("generic", &tokenizer_config).tokenize(sql)?;
    parse(&tokens, "generic", &ParserConfig::default())
}

fn parse_one(sql: &str) -> Ast {
    let mut statements = parse_sql(sql).unwrap();
    assert_eq!(statements.len(), 1, "expected exactly one statement");
    statements.remove(0)
}

fn column_names(ast: &Ast, schema: NodeId) -> Vec<String> {
    ast.tree
        .children(schema, "expressions")
        .iter()
        .filter(|id| ast.tree.kind(**id) == NodeKind::ColumnDef)
        .map(|id| ast.tree.name(*id).unwrap_or_default().to_string())
        .collect()
}

// ========================================================================
// DDL
// ========================================================================

#[test]
fn test_create_table_columns_in_order() {
    let ast = parse_one("CREATE TABLE employees (id INT, first_name VARCHAR(50), salary DECIMAL(10,2))");
    assert_eq!(ast.kind(), NodeKind::Create);
    assert_eq!(ast.tree.text(ast.root, "kind"), Some("TABLE"));

    let schema = ast.tree.child(ast.root, "this").unwrap();
    assert_eq!(ast.tree.kind(schema), NodeKind::Schema);
    assert_eq!(column_names(&ast, schema), vec!["id", "first_name", "salary"]);

    let salary = ast.tree.children(schema, "expressions")[2];
    let data_type = ast.tree.child(salary, "kind").unwrap();
    assert_eq!(ast.tree.text(data_type, "tag"), Some(DataType::Decimal.as_str()));
    let params: Vec<_> = ast
        .tree
        .children(data_type, "expressions")
        .iter()
        .map(|p| ast.tree.text(*p, "this").unwrap().to_string())
        .collect();
    assert_eq!(params, vec!["10", "2"]);
}

#[test]
fn test_column_constraints_are_structured() {
    let ast = parse_one(
        "CREATE TABLE t (id INT NOT NULL AUTO_INCREMENT PRIMARY KEY, \
         code VARCHAR(10) DEFAULT 'x' COLLATE utf8_bin COMMENT 'the code', \
         parent_id INT REFERENCES parent (id) ON DELETE CASCADE)",
    );
    let schema = ast.tree.child(ast.root, "this").unwrap();
    let columns = ast.tree.children(schema, "expressions");

    let kinds = |column: NodeId| -> Vec<NodeKind> {
        ast.tree
            .children(column, "constraints")
            .iter()
            .map(|c| ast.tree.kind(ast.tree.child(*c, "kind").unwrap()))
            .collect()
    };
    assert_eq!(
        kinds(columns[0]),
        vec![
            NodeKind::NotNullColumnConstraint,
            NodeKind::AutoIncrementColumnConstraint,
            NodeKind::PrimaryKeyColumnConstraint,
        ]
    );
    assert_eq!(
        kinds(columns[1]),
        vec![
            NodeKind::DefaultColumnConstraint,
            NodeKind::CollateColumnConstraint,
            NodeKind::CommentColumnConstraint,
        ]
    );
    assert_eq!(kinds(columns[2]), vec![NodeKind::Reference]);

    let reference = ast.tree.find(columns[2], NodeKind::Reference).unwrap();
    assert_eq!(ast.tree.text(reference, "on_delete"), Some("CASCADE"));
}

#[test]
fn test_table_level_keys() {
    let ast = parse_one(
        "CREATE TABLE t (a INT, b INT, \
         PRIMARY KEY (a), \
         CONSTRAINT fk_b FOREIGN KEY (b) REFERENCES other (id), \
         UNIQUE KEY uq_b (b), \
         KEY idx_ab (a, b), \
         CHECK (a > 0))",
    );
    let schema = ast.tree.child(ast.root, "this").unwrap();
    let kinds: Vec<_> = ast
        .tree
        .children(schema, "expressions")
        .iter()
        .map(|id| ast.tree.kind(*id))
        .collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::ColumnDef,
            NodeKind::ColumnDef,
            NodeKind::PrimaryKey,
            NodeKind::Constraint,
            NodeKind::UniqueColumnConstraint,
            NodeKind::IndexConstraint,
            NodeKind::CheckColumnConstraint,
        ]
    );
}

#[test]
fn test_column_named_key_is_not_an_index() {
    let ast = parse_one("CREATE TABLE t (key VARCHAR(10), index INT)");
    let schema = ast.tree.child(ast.root, "this").unwrap();
    assert_eq!(column_names(&ast, schema), vec!["key", "index"]);
}

#[test]
fn test_table_properties_keep_declaration_order() {
    let ast = parse_one(
        "CREATE TEMPORARY TABLE t (a INT) ENGINE=InnoDB AUTO_INCREMENT=5 DEFAULT CHARSET=utf8 COMMENT='hello'",
    );
    let properties = ast.tree.child(ast.root, "properties").unwrap();
    let kinds: Vec<_> = ast
        .tree
        .children(properties, "expressions")
        .iter()
        .map(|id| ast.tree.kind(*id))
        .collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::TemporaryProperty,
            NodeKind::EngineProperty,
            NodeKind::AutoIncrementProperty,
            NodeKind::CharacterSetProperty,
            NodeKind::CommentProperty,
        ]
    );
}

#[test]
fn test_generated_identity_options() {
    let ast = parse_one(
        "CREATE TABLE t (id INT GENERATED BY DEFAULT ON NULL AS IDENTITY (START WITH 10 INCREMENT BY 2))",
    );
    let identity = ast
        .tree
        .find(ast.root, NodeKind::GeneratedAsIdentityColumnConstraint)
        .unwrap();
    assert_eq!(ast.tree.bool_arg(identity, "this"), Some(false));
    assert!(ast.tree.flag(identity, "on_null"));
    assert_eq!(ast.tree.text(identity, "start"), Some("10"));
    assert_eq!(ast.tree.text(identity, "increment"), Some("2"));
}

#[test]
fn test_alter_table_actions() {
    let ast = parse_one(
        "ALTER TABLE employees ADD COLUMN hire_date DATE, DROP COLUMN IF EXISTS old, \
         RENAME COLUMN a TO b, ALTER COLUMN c SET NOT NULL, \
         ADD CONSTRAINT fk FOREIGN KEY (d) REFERENCES x (id)",
    );
    assert_eq!(ast.kind(), NodeKind::AlterTable);
    let kinds: Vec<_> = ast
        .tree
        .children(ast.root, "actions")
        .iter()
        .map(|id| ast.tree.kind(*id))
        .collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::ColumnDef,
            NodeKind::DropColumn,
            NodeKind::RenameColumn,
            NodeKind::AlterColumn,
            NodeKind::AddConstraint,
        ]
    );
}

#[test]
fn test_drop_and_create_index() {
    let drop = parse_one("DROP TABLE IF EXISTS a, b CASCADE");
    assert_eq!(drop.tree.text(drop.root, "kind"), Some("TABLE"));
    assert!(drop.tree.flag(drop.root, "exists"));
    assert_eq!(drop.tree.children(drop.root, "expressions").len(), 2);
    assert_eq!(drop.tree.text(drop.root, "cascade"), Some("CASCADE"));

    let index = parse_one("CREATE UNIQUE INDEX idx ON t (a, b DESC)");
    assert!(index.tree.flag(index.root, "unique"));
    let target = index.tree.child(index.root, "this").unwrap();
    assert_eq!(index.tree.kind(target), NodeKind::Index);
    assert_eq!(index.tree.children(target, "columns").len(), 2);
}

// ========================================================================
// DML
// ========================================================================

#[test]
fn test_select_clauses() {
    let ast = parse_one(
        "SELECT DISTINCT a, b AS total FROM t1 LEFT JOIN t2 ON t1.id = t2.id \
         WHERE a > 1 AND b IS NOT NULL GROUP BY a HAVING COUNT(*) > 2 ORDER BY a DESC LIMIT 10 OFFSET 5",
    );
    let tree = &ast.tree;
    let root = ast.root;
    assert!(tree.flag(root, "distinct"));
    assert_eq!(tree.children(root, "expressions").len(), 2);
    assert_eq!(tree.children(root, "joins").len(), 1);
    for key in ["from", "where", "group", "having", "order", "limit", "offset"] {
        assert!(tree.child(root, key).is_some(), "missing {key}");
    }
}

#[test]
fn test_mysql_style_limit_offset() {
    let ast = parse_one("SELECT a FROM t LIMIT 5, 10");
    let limit = ast.tree.child(ast.root, "limit").unwrap();
    let offset = ast.tree.child(ast.root, "offset").unwrap();
    let value = |node| {
        let inner = ast.tree.child(node, "this").unwrap();
        ast.tree.text(inner, "this").unwrap().to_string()
    };
    assert_eq!(value(limit), "10");
    assert_eq!(value(offset), "5");
}

#[test]
fn test_insert_update_delete() {
    let insert = parse_one(
        "INSERT INTO hockey.hockey (number, name, position, team) VALUES (99, 'TOM JONES', 'Goalie', 'Bruins')",
    );
    assert_eq!(insert.kind(), NodeKind::Insert);
    assert_eq!(insert.tree.children(insert.root, "columns").len(), 4);
    let table = insert.tree.child(insert.root, "this").unwrap();
    assert!(insert.tree.child(table, "db").is_some());

    let update = parse_one("UPDATE teams SET wins = wins + 1 WHERE teamid IN ('COB', 'BOS', 'AND')");
    assert_eq!(update.kind(), NodeKind::Update);
    let in_node = update.tree.find(update.root, NodeKind::In).unwrap();
    assert_eq!(update.tree.children(in_node, "expressions").len(), 3);

    let delete = parse_one("DELETE FROM teams WHERE teamid = 'COB'");
    assert_eq!(delete.kind(), NodeKind::Delete);
}

// ========================================================================
// Expressions
// ========================================================================

#[test]
fn test_precedence_and_binds_tighter_than_or() {
    let ast = parse_one("SELECT a OR b AND c");
    let item = ast.tree.children(ast.root, "expressions")[0];
    assert_eq!(ast.tree.text(item, "op"), Some("OR"));
    let rhs = ast.tree.child(item, "expression").unwrap();
    assert_eq!(ast.tree.text(rhs, "op"), Some("AND"));
}

#[test]
fn test_precedence_multiplicative_over_additive() {
    let ast = parse_one("SELECT 1 + 2 * 3 - 4");
    let item = ast.tree.children(ast.root, "expressions")[0];
    // ((1 + (2 * 3)) - 4)
    assert_eq!(ast.tree.text(item, "op"), Some("-"));
    let lhs = ast.tree.child(item, "this").unwrap();
    assert_eq!(ast.tree.text(lhs, "op"), Some("+"));
    let product = ast.tree.child(lhs, "expression").unwrap();
    assert_eq!(ast.tree.text(product, "op"), Some("*"));
}

#[test]
fn test_between_does_not_swallow_and() {
    let ast = parse_one("SELECT * FROM t WHERE a BETWEEN 1 AND 5 AND b NOT LIKE 'x%'");
    let filter = ast.tree.child(ast.root, "where").unwrap();
    let condition = ast.tree.child(filter, "this").unwrap();
    assert_eq!(ast.tree.text(condition, "op"), Some("AND"));
    let like = ast.tree.find(condition, NodeKind::Like).unwrap();
    assert!(ast.tree.flag(like, "negated"));
}

#[test]
fn test_function_builders() {
    let ast = parse_one("SELECT COALESCE(a, b), NVL(c, d), SUBSTR(e, 1, 2), POWER(f, 2), EXTRACT(YEAR FROM g), MY_FUNC(h)");
    let kinds: Vec<_> = ast
        .tree
        .children(ast.root, "expressions")
        .iter()
        .map(|id| ast.tree.kind(*id))
        .collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Coalesce,
            NodeKind::Coalesce,
            NodeKind::Substring,
            NodeKind::Pow,
            NodeKind::Extract,
            NodeKind::Anonymous,
        ]
    );
}

#[test]
fn test_type_literal_defaults_to_cast() {
    let ast = parse_one("SELECT DATE '2020-01-01'");
    let item = ast.tree.children(ast.root, "expressions")[0];
    assert_eq!(ast.tree.kind(item), NodeKind::Cast);
}

#[test]
fn test_deep_nesting_is_an_error() {
    let depth = 500;
    let sql = format!("SELECT {}1{}", "(".repeat(depth), ")".repeat(depth));
    let err = parse_sql(&sql).unwrap_err();
    assert_eq!(err.category(), "ParseError");
    assert!(err.to_string().contains("nested too deeply"), "{err}");

    let negations = format!("SELECT {}1", "- ".repeat(depth));
    let err = parse_sql(&negations).unwrap_err();
    assert!(err.to_string().contains("nested too deeply"), "{err}");

    let derived = format!(
        "SELECT a FROM {}t{}",
        "(SELECT a FROM ".repeat(depth),
        ")".repeat(depth)
    );
    let err = parse_sql(&derived).unwrap_err();
    assert!(err.to_string().contains("nested too deeply"), "{err}");
}

#[test]
fn test_moderate_nesting_parses_and_batch_recovers() {
    let sql = format!("SELECT {}1{}", "(".repeat(50), ")".repeat(50));
    assert_eq!(parse_sql(&sql).unwrap().len(), 1);

    let deep = format!("SELECT {}1{}", "(".repeat(500), ")".repeat(500));
    let script = format!("{}; SELECT 2", deep);
    let tokenizer_config = TokenizerConfig::default();
    let tokens = Tokenizer::new("generic", &tokenizer_config).tokenize(&script).unwrap();
    let results = parse_batch(&tokens, "generic", &ParserConfig::default());
    assert_eq!(results.len(), 2);
    assert!(results[0].is_err());
    assert!(results[1].is_ok());
}

#[test]
fn test_quoted_identifier_is_marked() {
    let ast = parse_one("SELECT \"Mixed Case\" FROM t");
    let column = ast.tree.children(ast.root, "expressions")[0];
    let ident = ast.tree.child(column, "this").unwrap();
    assert!(ast.tree.flag(ident, "quoted"));
    assert_eq!(ast.tree.text(ident, "this"), Some("Mixed Case"));
}

// ========================================================================
// Errors and batches
// ========================================================================

#[test]
fn test_unconsumed_input_is_an_error() {
    let err = parse_sql("SELECT a FROM t garbage more").unwrap_err();
    match err {
        BridgeError::Parse { near, .. } => assert_eq!(near, "more"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_parse_error_carries_position() {
    let err = parse_sql("CREATE TABLE t (a INT,\n  )").unwrap_err();
    match err {
        BridgeError::Parse { line, col, near, .. } => {
            assert_eq!((line, col), (2, 3));
            assert_eq!(near, ")");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unknown_statement() {
    assert!(matches!(
        parse_sql("VACUUM t"),
        Err(BridgeError::Parse { .. })
    ));
}

#[test]
fn test_batch_recovers_after_failure() {
    let tokenizer_config = TokenizerConfig::default();
    let tokens = Tokenizer::new("generic", &tokenizer_config)
        .tokenize("SELECT 1; SELECT FROM; SELECT 2;")
        .unwrap();
    let results = parse_batch(&tokens, "generic", &ParserConfig::default());
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    assert!(results[2].is_ok());
}

#[test]
fn test_statement_span() {
    let statements = parse_sql("SELECT 1;  SELECT 22").unwrap();
    assert_eq!(statements[0].span, Span::new(0, 8));
    assert_eq!(statements[1].span, Span::new(11, 20));
}
