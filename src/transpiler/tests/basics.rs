use super::*;
use crate::error::BridgeError;
use pretty_assertions::assert_eq;

// ========================================================================
// Identity under one dialect
// ========================================================================

#[test]
fn test_generic_identity() {
    let statements = [
        "SELECT a, b AS c FROM t WHERE a = 1 AND b <> 'x' ORDER BY a DESC LIMIT 10",
        "SELECT DISTINCT t.a, COUNT(*) FROM t GROUP BY t.a HAVING COUNT(*) > 1",
        "SELECT a FROM t LEFT JOIN u ON t.id = u.id WHERE u.id IS NULL",
        "SELECT a FROM t WHERE a BETWEEN 1 AND 5 OR a NOT IN (7, 8)",
        "SELECT CASE WHEN a > 1 THEN 'big' ELSE 'small' END AS size FROM t",
        "SELECT CAST(a AS VARCHAR(10)), -b, (a + b) * 2 FROM t",
        "INSERT INTO t (a, b) VALUES (1, 'x'), (2, NULL)",
        "UPDATE t SET a = 1 WHERE b LIKE 'x%'",
        "DELETE FROM t WHERE a = 1",
        "CREATE TEMPORARY TABLE t (a INT NOT NULL, b TEXT DEFAULT 'n/a')",
        "CREATE UNIQUE INDEX idx ON t (a, b DESC)",
        "CREATE VIEW v AS SELECT a FROM t",
        "DROP TABLE IF EXISTS a, b CASCADE",
    ];
    for sql in statements {
        assert_eq!(transpile_one(sql, "generic", "generic"), sql);
    }
}

#[test]
fn test_identity_normalizes_whitespace_and_keyword_case() {
    assert_eq!(
        transpile_one("select  a\n  from   t\nwhere a=1", "generic", "generic"),
        "SELECT a FROM t WHERE a = 1"
    );
}

#[test]
fn test_numeric_literals_keep_their_text() {
    assert_eq!(
        transpile_one("SELECT 1.50, 007, 1e3 FROM t", "generic", "postgres"),
        "SELECT 1.50, 007, 1e3 FROM t"
    );
}

#[test]
fn test_double_negation_never_forms_a_comment() {
    for (sql, expected) in [
        ("SELECT - -1", "SELECT - -1"),
        ("SELECT - -x FROM t", "SELECT - -x FROM t"),
        ("SELECT - - -x FROM t", "SELECT - - -x FROM t"),
        ("SELECT -(-x), a - -1 FROM t", "SELECT -(-x), a - -1 FROM t"),
    ] {
        let once = transpile_one(sql, "generic", "postgres");
        assert_eq!(once, expected);
        assert_eq!(transpile_one(&once, "postgres", "generic"), expected);
    }
}

#[test]
fn test_reserved_identifiers_are_quoted() {
    assert_eq!(
        transpile_one("SELECT \"order\", \"my col\" FROM t", "generic", "generic"),
        "SELECT \"order\", \"my col\" FROM t"
    );
    assert_eq!(
        transpile_one("SELECT \"order\" FROM t", "generic", "tsql"),
        "SELECT [order] FROM t"
    );
    assert_eq!(
        transpile_one("SELECT \"my col\" FROM t", "generic", "mysql"),
        "SELECT `my col` FROM t"
    );
}

// ========================================================================
// Type mapping
// ========================================================================

#[test]
fn test_type_mapping_to_tsql() {
    assert_eq!(
        transpile_one(
            "CREATE TABLE employees (id INT, first_name VARCHAR(50), salary DECIMAL(10,2))",
            "generic",
            "tsql"
        ),
        "CREATE TABLE employees (id INTEGER, first_name VARCHAR(50), salary NUMERIC(10,2))"
    );
}

#[test]
fn test_type_mapping_to_oracle() {
    assert_eq!(
        transpile_one(
            "CREATE TABLE employees (id INT, first_name VARCHAR(50), salary DECIMAL(10,2))",
            "generic",
            "oracle"
        ),
        "CREATE TABLE employees (id NUMBER, first_name VARCHAR2(50), salary NUMBER(10,2))"
    );
}

#[test]
fn test_alter_add_column_round_trips() {
    let sql = "ALTER TABLE t ADD COLUMN c DATE";
    let postgres = transpile_one(sql, "generic", "postgres");
    assert_eq!(postgres, sql);
    assert_eq!(transpile_one(&postgres, "postgres", "oracle"), sql);
    assert_eq!(transpile_one(sql, "oracle", "generic"), sql);
}

#[test]
fn test_tsql_alter_add_has_no_column_keyword() {
    assert_eq!(
        transpile_one("ALTER TABLE t ADD COLUMN c DATE", "generic", "tsql"),
        "ALTER TABLE t ADD c DATE"
    );
}

#[test]
fn test_mapped_spelling_with_parameters_replaces_source_parameters() {
    assert_eq!(
        transpile_one("CREATE TABLE t (body TEXT, doc JSON)", "generic", "tsql"),
        "CREATE TABLE t (body VARCHAR(MAX), doc NVARCHAR(MAX))"
    );
}

// ========================================================================
// Ordering
// ========================================================================

#[test]
fn test_declaration_order_is_preserved() {
    let sql = "CREATE TABLE t (b INT, a INT, PRIMARY KEY (b), UNIQUE (a), CHECK (a > 0))";
    for target in ["generic", "postgres", "oracle"] {
        let rendered = transpile_one(sql, "generic", target);
        let b = rendered.find("b ").unwrap();
        let a = rendered.find(", a ").unwrap();
        let primary = rendered.find("PRIMARY KEY").unwrap();
        let unique = rendered.find("UNIQUE").unwrap();
        let check = rendered.find("CHECK").unwrap();
        assert!(b < a && a < primary && primary < unique && unique < check, "{rendered}");
    }
}

#[test]
fn test_statements_keep_input_order() {
    assert_eq!(
        transpile("SELECT 1; SELECT 2;; SELECT 3", "generic", "generic"),
        vec!["SELECT 1", "SELECT 2", "SELECT 3"]
    );
}

// ========================================================================
// Round trips
// ========================================================================

#[test]
fn test_cross_dialect_round_trip_is_a_fixed_point() {
    let statements = [
        "CREATE TABLE t (id INT NOT NULL, name VARCHAR(20), price DECIMAL(8,2))",
        "SELECT a, b FROM t WHERE a > 1 ORDER BY b LIMIT 5",
        "UPDATE t SET a = a + 1 WHERE b IS NOT NULL",
    ];
    for sql in statements {
        for target in ["postgres", "oracle", "tsql", "mysql", "nuodb"] {
            let once = transpile_one(sql, "generic", target);
            let twice = transpile_one(&once, target, target);
            assert_eq!(twice, once, "{target} is not stable for {sql}");
        }
    }
}

// ========================================================================
// Errors
// ========================================================================

#[test]
fn test_parse_error_names_token_and_dialect() {
    let err = Translator::new(registry())
        .translate("SELECT a FROM", "generic", "postgres")
        .unwrap_err();
    match err {
        BridgeError::Parse {
            dialect, message, near, ..
        } => {
            assert_eq!(dialect, "generic");
            assert_eq!(message, "Expected identifier");
            assert_eq!(near, "end of input");
        }
        other => panic!("expected a parse error, got {other}"),
    }
}

#[test]
fn test_trailing_input_is_an_error() {
    let err = Translator::new(registry())
        .translate("SELECT a FROM t x y", "generic", "generic")
        .unwrap_err();
    match err {
        BridgeError::Parse { near, line, col, .. } => {
            assert_eq!(near, "y");
            assert_eq!((line, col), (1, 19));
        }
        other => panic!("expected a parse error, got {other}"),
    }
}

#[test]
fn test_unterminated_string_is_a_syntax_error() {
    let err = Translator::new(registry())
        .translate("SELECT 'abc", "generic", "generic")
        .unwrap_err();
    assert_eq!(err.category(), "SyntaxError");
}

#[test]
fn test_unknown_statement() {
    let err = Translator::new(registry())
        .translate("GRANT ALL ON t TO bob", "generic", "generic")
        .unwrap_err();
    assert_eq!(err.category(), "ParseError");
    assert!(err.to_string().contains("GRANT"), "{err}");
}
