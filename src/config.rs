//! `sqlbridge.toml` configuration.
//!
//! ```toml
//! read = "mysql"
//! write = "nuodb"
//! unsupported = "warn"
//! strict = false
//!
//! [[dialect]]
//! name = "warehouse"
//! base = "postgres"
//! identifier_quote = "`"
//! type_mapping = { TEXT = "STRING", INT = "INT64" }
//! keywords = { STRING = "TEXT" }
//! property_placement = { engine = "unsupported" }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ast::{DataType, NodeKind};
use crate::dialect::{Dialect, DialectRegistry, RegistryBuilder};
use crate::error::{BridgeError, BridgeResult};
use crate::tokenizer::TokenType;
use crate::transpiler::{PropertyPlacement, UnsupportedLevel};

pub const CONFIG_FILE: &str = "sqlbridge.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// Dialect to read when none is given on the command line.
    pub read: Option<String>,
    pub write: Option<String>,
    pub unsupported: Option<UnsupportedLevel>,
    pub strict: bool,
    #[serde(rename = "dialect")]
    pub dialects: Vec<DialectOverlay>,
}

/// A declarative dialect: a copy of `base` (or of the dialect already registered
/// under `name`) with a few tables changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DialectOverlay {
    pub name: String,
    pub base: Option<String>,
    /// One character, or an open/close pair such as `"[]"`.
    pub identifier_quote: Option<String>,
    /// Type tag to target spelling.
    pub type_mapping: BTreeMap<String, String>,
    /// Extra type names: word to the type tag it stands for.
    pub keywords: BTreeMap<String, String>,
    /// Property name (`engine`, `comment`, ...) to placement.
    pub property_placement: BTreeMap<String, PropertyPlacement>,
}

impl BridgeConfig {
    /// Load `./sqlbridge.toml`, then the user config directory; defaults if neither exists.
    pub fn load() -> BridgeResult<Self> {
        match Self::locate() {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// The first config file that exists, in lookup order.
    pub fn locate() -> Option<PathBuf> {
        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }
        dirs::config_dir()
            .map(|dir| dir.join("sqlbridge").join("config.toml"))
            .filter(|path| path.exists())
    }

    pub fn from_file(path: &Path) -> BridgeResult<Self> {
        let content = fs::read_to_string(path)?;
        debug!(path = %path.display(), "loading config");
        Self::parse(&content)
            .map_err(|err| BridgeError::config(format!("{}: {}", path.display(), err)))
    }

    pub fn parse(content: &str) -> BridgeResult<Self> {
        toml::from_str(content).map_err(|err| BridgeError::config(err.to_string()))
    }

    /// Built-in dialects plus every `[[dialect]]` table, in file order.
    pub fn registry(&self) -> BridgeResult<DialectRegistry> {
        let builder = DialectRegistry::builder().with_builtins()?;
        Ok(self.apply(builder)?.build())
    }

    pub fn apply(&self, mut builder: RegistryBuilder) -> BridgeResult<RegistryBuilder> {
        for overlay in &self.dialects {
            let dialect = overlay.build(&builder)?;
            builder = builder.register(dialect);
        }
        Ok(builder)
    }
}

impl DialectOverlay {
    fn build(&self, registered: &RegistryBuilder) -> BridgeResult<Dialect> {
        if self.name.trim().is_empty() {
            return Err(BridgeError::config("[[dialect]] entry without a name"));
        }
        let base_name = self.base.as_deref().unwrap_or(&self.name);
        let mut builder = match registered.get(base_name) {
            Some(base) => Dialect::derive(&self.name, base),
            None if self.base.is_some() => return Err(BridgeError::UnknownDialect(base_name.to_string())),
            None => Dialect::builder(&self.name),
        };

        if let Some(quote) = &self.identifier_quote {
            let pair = quote_pair(quote)?;
            builder = builder.generator(|config| config.identifier_quote = pair);
        }
        for (tag, name) in &self.type_mapping {
            builder = builder.type_mapping(data_type(tag)?, name);
        }
        for (word, tag) in &self.keywords {
            if word.trim().is_empty() {
                return Err(BridgeError::config(format!("dialect '{}': blank keyword", self.name)));
            }
            builder = builder.keyword(word, TokenType::Type(data_type(tag)?));
        }
        for (property, placement) in &self.property_placement {
            let kind = NodeKind::from_property_name(property)
                .ok_or_else(|| BridgeError::config(format!("unknown table property '{}'", property)))?;
            builder = builder.property_placement(kind, *placement);
        }
        debug!(dialect = %self.name, base = %base_name, "config dialect registered");
        builder.build()
    }
}

fn data_type(tag: &str) -> BridgeResult<DataType> {
    DataType::from_tag(tag).ok_or_else(|| BridgeError::config(format!("unknown data type '{}'", tag)))
}

fn quote_pair(quote: &str) -> BridgeResult<(char, char)> {
    let chars: Vec<char> = quote.chars().collect();
    match chars.as_slice() {
        [same] => Ok((*same, *same)),
        [open, close] => Ok((*open, *close)),
        _ => Err(BridgeError::config(format!(
            "identifier_quote must be one or two characters, got '{}'",
            quote
        ))),
    }
}
