//! SQL generation.
//!
//! A [`Generator`] walks one statement tree and renders it for a target dialect.
//! Every node goes through [`Generator::sql`], which consults the dialect's
//! transform registry before falling back to the default renderer for the node
//! kind. Transforms may copy-and-modify nodes, suppress them, mark them as
//! unsupported, or queue auxiliary statements that are emitted after the primary
//! one.

pub mod ddl;
pub mod dml;
pub mod expressions;
pub mod identifiers;
pub mod transform;

#[cfg(test)]
mod tests;

pub use transform::{
    ConcatStyle, GeneratorConfig, LimitStyle, PreprocessFn, Preprocessed, PropertyPlacement,
    RenderFn, Transform,
};

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ast::{Ast, NodeId, NodeKind, Tree};
use crate::dialect::Dialect;
use crate::error::{BridgeError, BridgeResult, UnsupportedDiagnostic};

/// What happens when a construct has no rendering in the target dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedLevel {
    /// Drop the construct silently.
    Ignore,
    /// Drop the construct and record a diagnostic.
    #[default]
    Warn,
    /// Record diagnostics, then fail the statement once it is fully rendered.
    Raise,
    /// Fail on the first unsupported construct.
    Immediate,
}

impl FromStr for UnsupportedLevel {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "warn" => Ok(Self::Warn),
            "raise" => Ok(Self::Raise),
            "immediate" => Ok(Self::Immediate),
            other => Err(BridgeError::config(format!(
                "unknown unsupported level '{}' (expected ignore, warn, raise or immediate)",
                other
            ))),
        }
    }
}

/// State carried across the statements of one translation session.
#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    /// Schema created or selected by an earlier statement.
    pub current_schema: Option<String>,
    pub diagnostics: Vec<UnsupportedDiagnostic>,
}

impl GenerationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_diagnostics(&mut self) -> Vec<UnsupportedDiagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

/// Renders the nodes of one statement tree.
pub struct Generator<'a> {
    pub tree: &'a mut Tree,
    dialect: &'a Dialect,
    context: &'a mut GenerationContext,
    level: UnsupportedLevel,
    auxiliary: Vec<NodeId>,
}

/// Render a parsed statement (plus its auxiliary statements) with a fresh context.
pub fn generate(ast: &Ast, dialect: &Dialect) -> BridgeResult<Vec<String>> {
    let mut tree = ast.tree.clone();
    let mut context = GenerationContext::new();
    let mut generator = Generator::new(&mut tree, dialect, &mut context, UnsupportedLevel::Warn);
    generator.generate_statement(ast.root)
}

impl<'a> Generator<'a> {
    pub fn new(
        tree: &'a mut Tree,
        dialect: &'a Dialect,
        context: &'a mut GenerationContext,
        level: UnsupportedLevel,
    ) -> Self {
        Self {
            tree,
            dialect,
            context,
            level,
            auxiliary: Vec::new(),
        }
    }

    pub fn dialect(&self) -> &'a Dialect {
        self.dialect
    }

    pub fn config(&self) -> &'a GeneratorConfig {
        self.dialect.generator_config()
    }

    pub fn context(&self) -> &GenerationContext {
        self.context
    }

    pub fn current_schema(&self) -> Option<&str> {
        self.context.current_schema.as_deref()
    }

    /// Render a statement root, followed by the statements its transforms queued.
    pub fn generate_statement(&mut self, root: NodeId) -> BridgeResult<Vec<String>> {
        self.auxiliary.clear();
        let mut out = Vec::new();

        let primary = self.sql(root)?;
        if !primary.is_empty() {
            out.push(primary);
        }

        let mut next = 0;
        while let Some(statement) = self.auxiliary.get(next).copied() {
            next += 1;
            let text = self.sql(statement)?;
            if !text.is_empty() {
                out.push(text);
            }
        }

        self.track_schema(root);
        Ok(out)
    }

    /// Render any node through the dialect's transform registry.
    pub fn sql(&mut self, id: NodeId) -> BridgeResult<String> {
        let kind = self.tree.kind(id);
        let dialect = self.dialect;

        match dialect.transform(kind) {
            None => default_sql(self, id),
            Some(Transform::Render(render)) => render(self, id),
            Some(Transform::Unsupported(message)) => {
                self.unsupported(kind, message.clone())?;
                Ok(String::new())
            }
            Some(Transform::Preprocess(steps)) => {
                let mut current = id;
                for step in steps {
                    match step(self, current)? {
                        Preprocessed::Node(next) => current = next,
                        Preprocessed::Suppress => {
                            debug!(dialect = dialect.name(), %kind, "suppressed");
                            return Ok(String::new());
                        }
                        Preprocessed::Unsupported(message) => {
                            self.unsupported(kind, message)?;
                            return Ok(String::new());
                        }
                    }
                }
                if self.tree.kind(current) == kind {
                    default_sql(self, current)
                } else {
                    // The chain produced a different construct; give it its own dispatch.
                    self.sql(current)
                }
            }
        }
    }

    /// Render a single-node argument, or an empty string when absent.
    pub fn child_sql(&mut self, id: NodeId, key: &str) -> BridgeResult<String> {
        match self.tree.child(id, key) {
            Some(child) => self.sql(child),
            None => Ok(String::new()),
        }
    }

    /// Render every node of a list argument, skipping empty renderings.
    pub fn list_sql(&mut self, id: NodeId, key: &str) -> BridgeResult<Vec<String>> {
        let children = self.tree.children(id, key).to_vec();
        let mut out = Vec::with_capacity(children.len());
        for child in children {
            let text = self.sql(child)?;
            if !text.is_empty() {
                out.push(text);
            }
        }
        Ok(out)
    }

    pub fn csv(&mut self, id: NodeId, key: &str) -> BridgeResult<String> {
        Ok(self.list_sql(id, key)?.join(", "))
    }

    /// Quote an identifier with the target's delimiters when it needs it.
    pub fn quote_identifier(&self, name: &str, quoted: bool) -> String {
        let (open, close) = self.config().identifier_quote;
        if quoted || identifiers::needs_quoting(name) {
            identifiers::quote(name, open, close)
        } else {
            name.to_string()
        }
    }

    /// Render a string literal with the target's escaping rules.
    pub fn string_literal(&self, value: &str) -> String {
        let mut escaped = if self.config().escape_backslash {
            value.replace('\\', "\\\\")
        } else {
            value.to_string()
        };
        escaped = escaped.replace('\'', "''");
        format!("'{}'", escaped)
    }

    /// Report a construct the target cannot express.
    pub fn unsupported(&mut self, kind: NodeKind, message: impl Into<String>) -> BridgeResult<()> {
        let diagnostic = UnsupportedDiagnostic {
            dialect: self.dialect.name().to_string(),
            kind,
            message: message.into(),
        };
        match self.level {
            UnsupportedLevel::Ignore => {
                debug!(%diagnostic, "ignoring unsupported construct");
                Ok(())
            }
            UnsupportedLevel::Warn | UnsupportedLevel::Raise => {
                warn!(%diagnostic, "unsupported construct dropped");
                self.context.diagnostics.push(diagnostic);
                Ok(())
            }
            UnsupportedLevel::Immediate => Err(BridgeError::unsupported(
                self.dialect.name(),
                vec![diagnostic],
            )),
        }
    }

    /// Queue a statement to be rendered after the current primary statement.
    pub fn push_auxiliary(&mut self, statement: NodeId) {
        debug!(dialect = self.dialect.name(), kind = %self.tree.kind(statement), "queued auxiliary statement");
        self.auxiliary.push(statement);
    }

    pub fn auxiliary(&self) -> &[NodeId] {
        &self.auxiliary
    }

    fn track_schema(&mut self, root: NodeId) {
        let schema = match self.tree.kind(root) {
            NodeKind::Create => {
                let kind = self.tree.text(root, "kind").unwrap_or_default();
                if kind == "DATABASE" || kind == "SCHEMA" {
                    self.tree.child(root, "this").and_then(|n| self.tree.name(n))
                } else {
                    None
                }
            }
            NodeKind::Use => self.tree.child(root, "this").and_then(|n| self.tree.name(n)),
            _ => None,
        };
        if let Some(schema) = schema {
            self.context.current_schema = Some(schema.to_string());
        }
    }
}

/// The dialect-neutral rendering of a node.
pub fn default_sql(g: &mut Generator<'_>, id: NodeId) -> BridgeResult<String> {
    use NodeKind as K;

    match g.tree.kind(id) {
        // Statements
        K::Create => ddl::create_sql(g, id),
        K::AlterTable => ddl::alter_table_sql(g, id),
        K::Drop => ddl::drop_sql(g, id),
        K::Select => dml::select_sql(g, id),
        K::Insert => dml::insert_sql(g, id),
        K::Update => dml::update_sql(g, id),
        K::Delete => dml::delete_sql(g, id),
        K::Use => dml::use_sql(g, id),
        K::ExclusiveLock => dml::lock_sql(g, id),
        K::CommentOn => ddl::comment_on_sql(g, id),

        // DDL structure
        K::Schema => ddl::schema_sql(g, id),
        K::Table => dml::table_sql(g, id),
        K::Index => ddl::index_sql(g, id),
        K::ColumnDef => ddl::column_def_sql(g, id),
        K::DataType => expressions::data_type_sql(g, id),
        K::ColumnConstraint => ddl::column_constraint_sql(g, id),
        K::NotNullColumnConstraint => ddl::not_null_sql(g, id),
        K::PrimaryKeyColumnConstraint => ddl::primary_key_column_sql(g, id),
        K::UniqueColumnConstraint => ddl::unique_sql(g, id),
        K::DefaultColumnConstraint => ddl::default_sql(g, id),
        K::AutoIncrementColumnConstraint => Ok("AUTO_INCREMENT".to_string()),
        K::GeneratedAsIdentityColumnConstraint => ddl::generated_identity_sql(g, id),
        K::CommentColumnConstraint => ddl::comment_column_sql(g, id),
        K::CollateColumnConstraint => ddl::prefixed_sql(g, id, "COLLATE"),
        K::CharacterSetColumnConstraint => ddl::prefixed_sql(g, id, "CHARACTER SET"),
        K::CheckColumnConstraint => ddl::check_sql(g, id),
        K::OnUpdateColumnConstraint => ddl::prefixed_sql(g, id, "ON UPDATE"),
        K::Reference => ddl::reference_sql(g, id),
        K::PrimaryKey => ddl::primary_key_sql(g, id),
        K::ForeignKey => ddl::foreign_key_sql(g, id),
        K::IndexConstraint => ddl::index_constraint_sql(g, id),
        K::Constraint => ddl::constraint_sql(g, id),

        // ALTER TABLE actions
        K::DropColumn => ddl::drop_column_sql(g, id),
        K::DropConstraint => ddl::drop_constraint_sql(g, id),
        K::AddConstraint => ddl::add_constraint_sql(g, id),
        K::RenameColumn => ddl::rename_column_sql(g, id),
        K::RenameTable => ddl::rename_table_sql(g, id),
        K::AlterColumn => ddl::alter_column_sql(g, id),

        // Table properties
        K::Properties => Ok(g.list_sql(id, "expressions")?.join(" ")),
        K::TemporaryProperty => Ok("TEMPORARY".to_string()),
        K::VolatileProperty => Ok("VOLATILE".to_string()),
        K::EngineProperty => ddl::property_sql(g, id, "ENGINE"),
        K::CharacterSetProperty => ddl::property_sql(g, id, "CHARACTER SET"),
        K::CollateProperty => ddl::property_sql(g, id, "COLLATE"),
        K::AutoIncrementProperty => ddl::property_sql(g, id, "AUTO_INCREMENT"),
        K::CommentProperty => ddl::property_sql(g, id, "COMMENT"),
        K::PartitionedByProperty => ddl::partitioned_by_sql(g, id),

        // Query clauses
        K::From => Ok(format!("FROM {}", g.csv(id, "expressions")?)),
        K::Join => dml::join_sql(g, id),
        K::Where => Ok(format!("WHERE {}", g.child_sql(id, "this")?)),
        K::Group => Ok(format!("GROUP BY {}", g.csv(id, "expressions")?)),
        K::Having => Ok(format!("HAVING {}", g.child_sql(id, "this")?)),
        K::Order => Ok(format!("ORDER BY {}", g.csv(id, "expressions")?)),
        K::Ordered => dml::ordered_sql(g, id),
        K::Limit => Ok(format!("LIMIT {}", g.child_sql(id, "this")?)),
        K::Offset => Ok(format!("OFFSET {}", g.child_sql(id, "this")?)),
        K::Values => Ok(format!("VALUES {}", g.csv(id, "expressions")?)),
        K::Tuple => Ok(format!("({})", g.csv(id, "expressions")?)),
        K::Subquery => Ok(format!("({})", g.child_sql(id, "this")?)),
        K::Alias => dml::alias_sql(g, id),

        // Expressions
        K::Column => expressions::column_sql(g, id),
        K::Identifier => expressions::identifier_sql(g, id),
        K::Literal => expressions::literal_sql(g, id),
        K::Null => Ok("NULL".to_string()),
        K::Boolean => expressions::boolean_sql(g, id),
        K::Star => Ok("*".to_string()),
        K::Placeholder => Ok(g.tree.text(id, "this").unwrap_or("?").to_string()),
        K::Introducer => expressions::introducer_sql(g, id),
        K::Anonymous => expressions::anonymous_sql(g, id),
        K::Coalesce => expressions::function_sql(g, id, "COALESCE"),
        K::Substring => expressions::function_sql(g, id, "SUBSTRING"),
        K::Pow => expressions::function_sql(g, id, "POWER"),
        K::Lower => expressions::function_sql(g, id, "LOWER"),
        K::Extract => expressions::extract_sql(g, id),
        K::Cast => expressions::cast_sql(g, id),
        K::DateStrToDate => expressions::date_str_to_date_sql(g, id),
        K::BinaryOp => expressions::binary_sql(g, id),
        K::Concat => expressions::concat_sql(g, id),
        K::Like => expressions::predicate_sql(g, id, "LIKE"),
        K::ILike => expressions::predicate_sql(g, id, "ILIKE"),
        K::In => expressions::in_sql(g, id),
        K::Between => expressions::between_sql(g, id),
        K::Is => expressions::is_sql(g, id),
        K::Not => Ok(format!("NOT {}", g.child_sql(id, "this")?)),
        K::Neg => expressions::neg_sql(g, id),
        K::Paren => Ok(format!("({})", g.child_sql(id, "this")?)),
        K::Case => expressions::case_sql(g, id),
        K::When => expressions::when_sql(g, id),
    }
}
