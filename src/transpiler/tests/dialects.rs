use super::*;
use crate::ast::NodeKind;
use pretty_assertions::assert_eq;

// ========================================================================
// Oracle
// ========================================================================

#[test]
fn test_oracle_function_renames() {
    assert_eq!(
        transpile_one("SELECT COALESCE(a, b), SUBSTRING(name, 1, 3) FROM t", "generic", "oracle"),
        "SELECT NVL(a, b), SUBSTR(name, 1, 3) FROM t"
    );
    // And back.
    assert_eq!(
        transpile_one("SELECT NVL(a, b), SUBSTR(name, 2) FROM t", "oracle", "postgres"),
        "SELECT COALESCE(a, b), SUBSTRING(name, 2) FROM t"
    );
}

#[test]
fn test_oracle_square_is_power() {
    assert_eq!(
        transpile_one("SELECT SQUARE(x) FROM t", "oracle", "generic"),
        "SELECT POWER(x, 2) FROM t"
    );
    // Other dialects have no SQUARE builder.
    assert_eq!(
        transpile_one("SELECT SQUARE(x) FROM t", "generic", "generic"),
        "SELECT SQUARE(x) FROM t"
    );
}

#[test]
fn test_oracle_date_literal() {
    assert_eq!(
        transpile_one("SELECT DATE '2024-01-31' FROM dual", "oracle", "oracle"),
        "SELECT TO_DATE('2024-01-31', 'YYYY-MM-DD') FROM dual"
    );
    assert_eq!(
        transpile_one("SELECT DATE '2024-01-31' FROM dual", "oracle", "postgres"),
        "SELECT CAST('2024-01-31' AS DATE) FROM dual"
    );
}

#[test]
fn test_oracle_fetch_paging() {
    assert_eq!(
        transpile_one("SELECT a FROM t ORDER BY a LIMIT 10 OFFSET 20", "generic", "oracle"),
        "SELECT a FROM t ORDER BY a OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY"
    );
    assert_eq!(
        transpile_one("SELECT a FROM t LIMIT 10", "mysql", "oracle"),
        "SELECT a FROM t OFFSET 0 ROWS FETCH NEXT 10 ROWS ONLY"
    );
    assert_eq!(
        transpile_one("SELECT a FROM t OFFSET 5 ROWS FETCH NEXT 10 ROWS ONLY", "oracle", "postgres"),
        "SELECT a FROM t LIMIT 10 OFFSET 5"
    );
}

#[test]
fn test_mysql_limit_comma_form() {
    assert_eq!(
        transpile_one("SELECT a FROM t LIMIT 20, 10", "mysql", "postgres"),
        "SELECT a FROM t LIMIT 10 OFFSET 20"
    );
}

#[test]
fn test_oracle_booleans_and_table_aliases() {
    assert_eq!(
        transpile_one("SELECT x.a, TRUE FROM t AS x WHERE x.b = FALSE", "generic", "oracle"),
        "SELECT x.a, 1 FROM t x WHERE x.b = 0"
    );
}

#[test]
fn test_oracle_identity_options_round_trip() {
    let sql = "CREATE TABLE t (id NUMBER GENERATED BY DEFAULT ON NULL AS IDENTITY (START WITH 10 INCREMENT BY 5))";
    assert_eq!(transpile_one(sql, "oracle", "oracle"), sql);
}

#[test]
fn test_oracle_ilike_is_lowered() {
    assert_eq!(
        transpile_one("SELECT a FROM t WHERE a ILIKE 'x%'", "postgres", "oracle"),
        "SELECT a FROM t WHERE LOWER(a) LIKE LOWER('x%')"
    );
}

#[test]
fn test_oracle_comment_on_statement() {
    let sql = "COMMENT ON COLUMN t.c IS 'the c'";
    assert_eq!(transpile_one(sql, "oracle", "postgres"), sql);
}

// ========================================================================
// T-SQL
// ========================================================================

#[test]
fn test_tsql_identity() {
    assert_eq!(
        transpile_one("CREATE TABLE t (id INT AUTO_INCREMENT PRIMARY KEY)", "mysql", "tsql"),
        "CREATE TABLE t (id INTEGER IDENTITY(1,1) PRIMARY KEY)"
    );
    assert_eq!(
        transpile_one(
            "CREATE TABLE t (id NUMBER GENERATED BY DEFAULT AS IDENTITY (START WITH 10 INCREMENT BY 5))",
            "oracle",
            "tsql"
        ),
        "CREATE TABLE t (id NUMERIC IDENTITY(10,5))"
    );
}

#[test]
fn test_tsql_identity_shorthand_is_read_back() {
    assert_eq!(
        transpile_one("CREATE TABLE t (id INT IDENTITY(100, 2))", "tsql", "postgres"),
        "CREATE TABLE t (id INT GENERATED BY DEFAULT AS IDENTITY (START WITH 100 INCREMENT BY 2))"
    );
}

#[test]
fn test_tsql_paging_concat_and_brackets() {
    assert_eq!(
        transpile_one("SELECT a || b FROM t LIMIT 5", "generic", "tsql"),
        "SELECT a + b FROM t OFFSET 0 ROWS FETCH NEXT 5 ROWS ONLY"
    );
    assert_eq!(
        transpile_one("SELECT [first name] FROM [order]", "tsql", "postgres"),
        "SELECT \"first name\" FROM \"order\""
    );
}

#[test]
fn test_tsql_plus_concat_keeps_arithmetic_grouping() {
    assert_eq!(
        transpile_one("SELECT a || b - c FROM t", "postgres", "tsql"),
        "SELECT a + (b - c) FROM t"
    );
    assert_eq!(
        transpile_one("SELECT a || b + c, (a + b) || c FROM t", "postgres", "tsql"),
        "SELECT a + (b + c), (a + b) + c FROM t"
    );
    // Pipes already bind looser than arithmetic.
    assert_eq!(
        transpile_one("SELECT a || b - c FROM t", "postgres", "postgres"),
        "SELECT a || b - c FROM t"
    );
}

#[test]
fn test_tsql_drops_column_comments() {
    let translation = translation("CREATE TABLE t (id INT COMMENT 'pk')", "mysql", "tsql");
    assert_eq!(translation.statements, vec!["CREATE TABLE t (id INTEGER)"]);
    assert_eq!(translation.diagnostics.len(), 1);
    assert_eq!(translation.diagnostics[0].kind, NodeKind::CommentColumnConstraint);
}

// ========================================================================
// PostgreSQL
// ========================================================================

#[test]
fn test_postgres_type_mapping() {
    assert_eq!(
        transpile_one(
            "CREATE TABLE t (a TINYINT, b DATETIME, c LONGTEXT, d BLOB, e DOUBLE, f MEDIUMINT)",
            "mysql",
            "postgres"
        ),
        "CREATE TABLE t (a SMALLINT, b TIMESTAMP, c TEXT, d BYTEA, e DOUBLE PRECISION, f INT)"
    );
}

#[test]
fn test_postgres_auto_increment_becomes_identity() {
    assert_eq!(
        transpile_one(
            "CREATE TABLE `t` (`id` INT NOT NULL AUTO_INCREMENT, PRIMARY KEY (`id`))",
            "mysql",
            "postgres"
        ),
        "CREATE TABLE \"t\" (\"id\" INT NOT NULL GENERATED BY DEFAULT AS IDENTITY, PRIMARY KEY (\"id\"))"
    );
}

#[test]
fn test_postgres_column_comment_becomes_statement() {
    assert_eq!(
        transpile("CREATE TABLE t (id INT COMMENT 'key', name TEXT)", "mysql", "postgres"),
        vec!["CREATE TABLE t (id INT, name TEXT)", "COMMENT ON COLUMN t.id IS 'key'"]
    );
}

#[test]
fn test_postgres_inline_keys_become_indexes() {
    assert_eq!(
        transpile(
            "CREATE TABLE t (id INT, name VARCHAR(20), code INT, KEY idx_name (name), KEY (code))",
            "mysql",
            "postgres"
        ),
        vec![
            "CREATE TABLE t (id INT, name VARCHAR(20), code INT)",
            "CREATE INDEX idx_name ON t (name)",
            "CREATE INDEX t_code ON t (code)",
        ]
    );
}

#[test]
fn test_postgres_reports_table_options() {
    let translation = translation(
        "CREATE TABLE t (id INT) ENGINE=InnoDB DEFAULT CHARSET=utf8 COMMENT='users'",
        "mysql",
        "postgres",
    );
    assert_eq!(translation.statements, vec!["CREATE TABLE t (id INT)"]);
    let kinds: Vec<NodeKind> = translation.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::EngineProperty,
            NodeKind::CharacterSetProperty,
            NodeKind::CommentProperty
        ]
    );
}

#[test]
fn test_postgres_nested_comments() {
    assert_eq!(
        transpile_one("SELECT /* outer /* inner */ still comment */ a FROM t", "postgres", "generic"),
        "SELECT a FROM t"
    );
}

#[test]
fn test_postgres_cast_shorthand() {
    assert_eq!(
        transpile_one("SELECT a::TEXT FROM t", "postgres", "mysql"),
        "SELECT CAST(a AS TEXT) FROM t"
    );
}

// ========================================================================
// MySQL
// ========================================================================

#[test]
fn test_mysql_identity_from_other_dialects() {
    assert_eq!(
        transpile_one("CREATE TABLE t (id INT GENERATED BY DEFAULT AS IDENTITY)", "postgres", "mysql"),
        "CREATE TABLE t (id INT AUTO_INCREMENT)"
    );
}

#[test]
fn test_mysql_table_options_round_trip() {
    let sql = "CREATE TABLE `t` (`id` INT(10) UNSIGNED ZEROFILL NOT NULL, UNIQUE KEY `u_id` (`id`)) ENGINE=InnoDB COMMENT='x'";
    assert_eq!(transpile_one(sql, "mysql", "mysql"), sql);
}

#[test]
fn test_unsigned_is_mysql_only() {
    assert_eq!(
        transpile_one("CREATE TABLE t (a INT(10) UNSIGNED)", "mysql", "postgres"),
        "CREATE TABLE t (a INT(10))"
    );
}

#[test]
fn test_mysql_concat_and_ilike() {
    assert_eq!(
        transpile_one("SELECT a || b FROM t WHERE a NOT ILIKE 'x'", "generic", "mysql"),
        "SELECT CONCAT(a, b) FROM t WHERE LOWER(a) NOT LIKE LOWER('x')"
    );
}

#[test]
fn test_mysql_escapes_backslashes() {
    assert_eq!(
        transpile_one(r"SELECT 'a\\b', 'it\'s'", "mysql", "mysql"),
        r"SELECT 'a\\b', 'it''s'"
    );
    assert_eq!(
        transpile_one(r"SELECT 'a\\b'", "mysql", "postgres"),
        r"SELECT 'a\b'"
    );
}

#[test]
fn test_mysql_hash_comments() {
    assert_eq!(
        transpile_one("SELECT a # trailing\nFROM t", "mysql", "generic"),
        "SELECT a FROM t"
    );
}

#[test]
fn test_mysql_volatile_is_unsupported() {
    let translation = translation("CREATE VOLATILE TABLE t (a INT)", "generic", "mysql");
    assert_eq!(translation.statements, vec!["CREATE TABLE t (a INT)"]);
    assert_eq!(translation.diagnostics.len(), 1);
    assert_eq!(translation.diagnostics[0].kind, NodeKind::VolatileProperty);
}

#[test]
fn test_mysql_partitioning() {
    let sql = "CREATE TABLE t (a INT, b DATE) ENGINE=InnoDB PARTITION BY RANGE (a)";
    assert_eq!(transpile_one(sql, "mysql", "mysql"), sql);

    let translation = translation("CREATE TABLE t (a INT) PARTITION BY HASH (a)", "mysql", "nuodb");
    assert_eq!(translation.statements, vec!["CREATE TABLE t (a INTEGER)"]);
    assert_eq!(translation.diagnostics.len(), 1);
    assert_eq!(translation.diagnostics[0].kind, NodeKind::PartitionedByProperty);
}

// ========================================================================
// National strings
// ========================================================================

#[test]
fn test_national_strings_round_trip_through_every_dialect() {
    let sql = "SELECT a FROM t WHERE b = N'x'";
    for dialect in ["generic", "mysql", "postgres", "oracle", "tsql", "nuodb"] {
        assert_eq!(transpile_one(sql, dialect, dialect), sql, "{dialect}");
        let rendered = transpile_one(sql, "tsql", dialect);
        assert_eq!(rendered, sql, "{dialect}");
        assert_eq!(transpile_one(&rendered, dialect, "generic"), sql, "{dialect}");
    }
}

#[test]
fn test_national_prefix_dropped_when_target_lacks_it() {
    let registry = DialectRegistry::builder().with_builtins().unwrap();
    let plain = crate::dialect::Dialect::derive("plain", registry.get("generic").unwrap())
        .generator(|config| config.national_strings = false)
        .build()
        .unwrap();
    let registry = registry.register(plain).build();
    let translation = Translator::new(&registry)
        .translate("SELECT N'x'", "mysql", "plain")
        .unwrap();
    assert_eq!(translation.statements, vec!["SELECT 'x'"]);
}
