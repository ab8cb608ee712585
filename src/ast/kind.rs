use serde::{Deserialize, Serialize};

/// The closed set of node kinds the parser can produce.
///
/// Dialect transforms are keyed by this enum, so adding a construct means adding a
/// variant here, a parser production and a default renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKind {
    // Statements
    Create,
    Insert,
    Update,
    Delete,
    AlterTable,
    Drop,
    Select,
    ExclusiveLock,
    Use,
    CommentOn,

    // DDL structure
    Schema,
    Table,
    Index,
    ColumnDef,
    DataType,
    ColumnConstraint,
    NotNullColumnConstraint,
    PrimaryKeyColumnConstraint,
    UniqueColumnConstraint,
    DefaultColumnConstraint,
    AutoIncrementColumnConstraint,
    GeneratedAsIdentityColumnConstraint,
    CommentColumnConstraint,
    CollateColumnConstraint,
    CharacterSetColumnConstraint,
    CheckColumnConstraint,
    OnUpdateColumnConstraint,
    Reference,
    PrimaryKey,
    ForeignKey,
    IndexConstraint,
    Constraint,

    // ALTER TABLE actions
    DropColumn,
    DropConstraint,
    AddConstraint,
    RenameColumn,
    RenameTable,
    AlterColumn,

    // Table properties
    Properties,
    TemporaryProperty,
    VolatileProperty,
    EngineProperty,
    CharacterSetProperty,
    CollateProperty,
    AutoIncrementProperty,
    CommentProperty,
    PartitionedByProperty,

    // Query clauses
    From,
    Join,
    Where,
    Group,
    Having,
    Order,
    Ordered,
    Limit,
    Offset,
    Values,
    Tuple,
    Subquery,
    Alias,

    // Expressions
    Column,
    Identifier,
    Literal,
    Null,
    Boolean,
    Star,
    Placeholder,
    Introducer,
    Anonymous,
    Coalesce,
    Substring,
    Pow,
    Lower,
    Extract,
    Cast,
    DateStrToDate,
    BinaryOp,
    Concat,
    Like,
    ILike,
    In,
    Between,
    Is,
    Not,
    Neg,
    Paren,
    Case,
    When,
}

impl NodeKind {
    /// Kinds that form a top-level statement (and own an auxiliary channel).
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            NodeKind::Create
                | NodeKind::Insert
                | NodeKind::Update
                | NodeKind::Delete
                | NodeKind::AlterTable
                | NodeKind::Drop
                | NodeKind::Select
                | NodeKind::ExclusiveLock
                | NodeKind::Use
                | NodeKind::CommentOn
        )
    }

    /// Kinds that live under a `Properties` node and are routed by placement.
    pub fn is_property(self) -> bool {
        matches!(
            self,
            NodeKind::TemporaryProperty
                | NodeKind::VolatileProperty
                | NodeKind::EngineProperty
                | NodeKind::CharacterSetProperty
                | NodeKind::CollateProperty
                | NodeKind::AutoIncrementProperty
                | NodeKind::CommentProperty
                | NodeKind::PartitionedByProperty
        )
    }

    /// Resolve the snake_case property names used in configuration files.
    pub fn from_property_name(name: &str) -> Option<NodeKind> {
        let kind = match name.to_ascii_lowercase().replace('-', "_").as_str() {
            "temporary" => NodeKind::TemporaryProperty,
            "volatile" => NodeKind::VolatileProperty,
            "engine" => NodeKind::EngineProperty,
            "character_set" | "charset" => NodeKind::CharacterSetProperty,
            "collate" => NodeKind::CollateProperty,
            "auto_increment" => NodeKind::AutoIncrementProperty,
            "comment" => NodeKind::CommentProperty,
            "partitioned_by" | "partition_by" => NodeKind::PartitionedByProperty,
            _ => return None,
        };
        Some(kind)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Internal type tags. Target spellings come from each dialect's type mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DataType {
    TinyInt,
    SmallInt,
    MediumInt,
    Int,
    BigInt,
    Decimal,
    Numeric,
    Float,
    Double,
    Real,
    Boolean,
    Bit,
    Char,
    NChar,
    VarChar,
    NVarChar,
    Text,
    TinyText,
    MediumText,
    LongText,
    Blob,
    TinyBlob,
    MediumBlob,
    LongBlob,
    Binary,
    VarBinary,
    Date,
    Time,
    Timestamp,
    DateTime,
    Json,
    Uuid,
}

impl DataType {
    pub const ALL: &'static [DataType] = &[
        DataType::TinyInt,
        DataType::SmallInt,
        DataType::MediumInt,
        DataType::Int,
        DataType::BigInt,
        DataType::Decimal,
        DataType::Numeric,
        DataType::Float,
        DataType::Double,
        DataType::Real,
        DataType::Boolean,
        DataType::Bit,
        DataType::Char,
        DataType::NChar,
        DataType::VarChar,
        DataType::NVarChar,
        DataType::Text,
        DataType::TinyText,
        DataType::MediumText,
        DataType::LongText,
        DataType::Blob,
        DataType::TinyBlob,
        DataType::MediumBlob,
        DataType::LongBlob,
        DataType::Binary,
        DataType::VarBinary,
        DataType::Date,
        DataType::Time,
        DataType::Timestamp,
        DataType::DateTime,
        DataType::Json,
        DataType::Uuid,
    ];

    /// Canonical spelling, used as the AST tag and as the fallback rendering.
    pub fn as_str(self) -> &'static str {
        match self {
            DataType::TinyInt => "TINYINT",
            DataType::SmallInt => "SMALLINT",
            DataType::MediumInt => "MEDIUMINT",
            DataType::Int => "INT",
            DataType::BigInt => "BIGINT",
            DataType::Decimal => "DECIMAL",
            DataType::Numeric => "NUMERIC",
            DataType::Float => "FLOAT",
            DataType::Double => "DOUBLE",
            DataType::Real => "REAL",
            DataType::Boolean => "BOOLEAN",
            DataType::Bit => "BIT",
            DataType::Char => "CHAR",
            DataType::NChar => "NCHAR",
            DataType::VarChar => "VARCHAR",
            DataType::NVarChar => "NVARCHAR",
            DataType::Text => "TEXT",
            DataType::TinyText => "TINYTEXT",
            DataType::MediumText => "MEDIUMTEXT",
            DataType::LongText => "LONGTEXT",
            DataType::Blob => "BLOB",
            DataType::TinyBlob => "TINYBLOB",
            DataType::MediumBlob => "MEDIUMBLOB",
            DataType::LongBlob => "LONGBLOB",
            DataType::Binary => "BINARY",
            DataType::VarBinary => "VARBINARY",
            DataType::Date => "DATE",
            DataType::Time => "TIME",
            DataType::Timestamp => "TIMESTAMP",
            DataType::DateTime => "DATETIME",
            DataType::Json => "JSON",
            DataType::Uuid => "UUID",
        }
    }

    /// Look a tag up by its canonical spelling (case-insensitive).
    pub fn from_tag(tag: &str) -> Option<DataType> {
        DataType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(tag))
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operators carried by `BinaryOp` nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    Or,
    And,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOperator::Or => "OR",
            BinaryOperator::And => "AND",
            BinaryOperator::Eq => "=",
            BinaryOperator::Neq => "<>",
            BinaryOperator::Lt => "<",
            BinaryOperator::Lte => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::Gte => ">=",
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Mod => "%",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<BinaryOperator> {
        let op = match symbol.to_ascii_uppercase().as_str() {
            "OR" => BinaryOperator::Or,
            "AND" => BinaryOperator::And,
            "=" => BinaryOperator::Eq,
            "<>" | "!=" => BinaryOperator::Neq,
            "<" => BinaryOperator::Lt,
            "<=" => BinaryOperator::Lte,
            ">" => BinaryOperator::Gt,
            ">=" => BinaryOperator::Gte,
            "+" => BinaryOperator::Add,
            "-" => BinaryOperator::Sub,
            "*" => BinaryOperator::Mul,
            "/" => BinaryOperator::Div,
            "%" => BinaryOperator::Mod,
            _ => return None,
        };
        Some(op)
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_tags_round_trip() {
        for dt in DataType::ALL {
            assert_eq!(DataType::from_tag(dt.as_str()), Some(*dt));
        }
        assert_eq!(DataType::from_tag("varchar"), Some(DataType::VarChar));
        assert_eq!(DataType::from_tag("geometry"), None);
    }

    #[test]
    fn test_property_names() {
        assert_eq!(
            NodeKind::from_property_name("Character-Set"),
            Some(NodeKind::CharacterSetProperty)
        );
        assert!(NodeKind::EngineProperty.is_property());
        assert!(!NodeKind::ColumnDef.is_property());
        assert!(NodeKind::AlterTable.is_statement());
    }
}
