//! Name-to-dialect lookup.
//!
//! The registry is assembled once, optionally installed as the process-wide
//! instance, and only read afterwards.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use tracing::info;

use super::{generic, mysql, nuodb, oracle, postgres, tsql, Dialect};
use crate::error::{BridgeError, BridgeResult};

static GLOBAL: OnceLock<DialectRegistry> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct DialectRegistry {
    dialects: BTreeMap<String, Dialect>,
    aliases: HashMap<String, String>,
}

impl DialectRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registry holding only the built-in dialects.
    pub fn builtin() -> BridgeResult<Self> {
        Ok(Self::builder().with_builtins()?.build())
    }

    /// Look a dialect up by name or alias, case-insensitively.
    pub fn get(&self, name: &str) -> BridgeResult<&Dialect> {
        let key = name.trim().to_ascii_lowercase();
        let key = self.aliases.get(&key).map(String::as_str).unwrap_or(key.as_str());
        self.dialects
            .get(key)
            .ok_or_else(|| BridgeError::UnknownDialect(name.to_string()))
    }

    /// Registered dialect names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.dialects.keys().map(String::as_str).collect()
    }

    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(a, d)| (a.as_str(), d.as_str()))
    }

    /// Make this registry the process-wide one. Fails if one is already installed.
    pub fn install(self) -> BridgeResult<&'static DialectRegistry> {
        let names = self.names().join(", ");
        GLOBAL
            .set(self)
            .map_err(|_| BridgeError::config("a dialect registry is already installed"))?;
        info!(dialects = %names, "dialect registry installed");
        Self::global()
    }

    /// The process-wide registry, installing the built-ins on first use.
    pub fn global() -> BridgeResult<&'static DialectRegistry> {
        if let Some(registry) = GLOBAL.get() {
            return Ok(registry);
        }
        let builtin = Self::builtin()?;
        Ok(GLOBAL.get_or_init(|| builtin))
    }
}

#[derive(Default)]
pub struct RegistryBuilder {
    dialects: BTreeMap<String, Dialect>,
    aliases: HashMap<String, String>,
}

impl RegistryBuilder {
    /// Add a dialect; a later registration under the same name replaces it.
    pub fn register(mut self, dialect: Dialect) -> Self {
        self.dialects.insert(dialect.name().to_string(), dialect);
        self
    }

    pub fn alias(mut self, alias: &str, target: &str) -> Self {
        self.aliases
            .insert(alias.to_ascii_lowercase(), target.to_ascii_lowercase());
        self
    }

    pub fn with_builtins(self) -> BridgeResult<Self> {
        Ok(self
            .register(generic::dialect()?)
            .register(mysql::dialect()?)
            .register(postgres::dialect()?)
            .register(oracle::dialect()?)
            .register(tsql::dialect()?)
            .register(nuodb::dialect()?)
            .alias("postgresql", "postgres")
            .alias("sqlserver", "tsql")
            .alias("mssql", "tsql"))
    }

    /// A dialect registered so far, for use as a derivation base.
    pub fn get(&self, name: &str) -> Option<&Dialect> {
        let key = name.to_ascii_lowercase();
        let key = self.aliases.get(&key).cloned().unwrap_or(key);
        self.dialects.get(&key)
    }

    pub fn build(self) -> DialectRegistry {
        DialectRegistry {
            dialects: self.dialects,
            aliases: self.aliases,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_names() {
        let registry = DialectRegistry::builtin().unwrap();
        assert_eq!(
            registry.names(),
            vec!["generic", "mysql", "nuodb", "oracle", "postgres", "tsql"]
        );
    }

    #[test]
    fn test_lookup_is_case_insensitive_and_follows_aliases() {
        let registry = DialectRegistry::builtin().unwrap();
        assert_eq!(registry.get("MySQL").unwrap().name(), "mysql");
        assert_eq!(registry.get("postgresql").unwrap().name(), "postgres");
        assert_eq!(registry.get("SQLServer").unwrap().name(), "tsql");
    }

    #[test]
    fn test_unknown_dialect() {
        let registry = DialectRegistry::builtin().unwrap();
        let err = registry.get("db2").unwrap_err();
        assert!(matches!(err, BridgeError::UnknownDialect(ref name) if name == "db2"));
    }

    #[test]
    fn test_register_replaces_same_name() {
        let custom = Dialect::builder("mysql")
            .type_mapping(crate::ast::DataType::Text, "LONGTEXT")
            .build()
            .unwrap();
        let registry = DialectRegistry::builder()
            .with_builtins()
            .unwrap()
            .register(custom)
            .build();
        let mysql = registry.get("mysql").unwrap();
        assert_eq!(mysql.generator_config().type_name(crate::ast::DataType::Text), "LONGTEXT");
    }

    #[test]
    fn test_global_is_shared() {
        let first = DialectRegistry::global().unwrap();
        let second = DialectRegistry::global().unwrap();
        assert!(std::ptr::eq(first, second));
    }
}
