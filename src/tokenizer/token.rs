use serde::{Deserialize, Serialize};

use crate::ast::DataType;

/// Byte range into the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// A lexical token. For string literals `text` holds the unescaped value; for
/// everything else it is the source text as written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenType,
    pub text: String,
    pub span: Span,
    pub line: usize,
    pub col: usize,
}

impl Token {
    pub fn new(kind: TokenType, text: impl Into<String>, span: Span, line: usize, col: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            line,
            col,
        }
    }

    /// Upper-cased text, for keyword-sequence matching.
    pub fn upper(&self) -> String {
        self.text.to_ascii_uppercase()
    }

    /// Tokens whose text may be compared against bare words (`ENGINE`, `ALWAYS`, ...).
    pub fn is_word(&self) -> bool {
        !matches!(
            self.kind,
            TokenType::String
                | TokenType::NationalString
                | TokenType::Identifier
                | TokenType::Number
                | TokenType::Parameter
        ) && self.text.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_')
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}({})", self.kind, self.text)
    }
}

/// Token types. Keywords that only matter in one production are matched by text
/// instead of getting a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
    // Punctuation and operators
    LParen,
    RParen,
    Comma,
    Dot,
    Semicolon,
    Star,
    Plus,
    Dash,
    Slash,
    Percent,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    DPipe,
    DColon,

    // Literals and names
    Number,
    String,
    NationalString,
    /// Quoted identifier
    Identifier,
    /// Unquoted name that matched no keyword
    Var,
    Parameter,
    Introducer,
    Type(DataType),

    // Keywords
    Add,
    All,
    Alter,
    And,
    As,
    Asc,
    AutoIncrement,
    Between,
    By,
    Case,
    Cast,
    CharacterSet,
    Check,
    Collate,
    Column,
    Comment,
    Constraint,
    Create,
    Cross,
    Default,
    Delete,
    Desc,
    Distinct,
    Drop,
    Else,
    End,
    Exclusive,
    Exists,
    False,
    Foreign,
    From,
    Full,
    Group,
    Having,
    If,
    ILike,
    In,
    Index,
    Inner,
    Insert,
    Into,
    Is,
    Join,
    Key,
    Left,
    Like,
    Limit,
    Lock,
    Not,
    Null,
    Offset,
    On,
    Or,
    Order,
    Outer,
    Primary,
    References,
    Replace,
    Right,
    Select,
    Set,
    Table,
    Then,
    True,
    Unique,
    Update,
    Use,
    Using,
    Values,
    When,
    Where,
}

impl TokenType {
    /// Keywords that can never stand in for an identifier.
    pub fn is_reserved(self) -> bool {
        matches!(
            self,
            TokenType::All
                | TokenType::Alter
                | TokenType::And
                | TokenType::As
                | TokenType::Between
                | TokenType::Case
                | TokenType::Cast
                | TokenType::Check
                | TokenType::Constraint
                | TokenType::Create
                | TokenType::Cross
                | TokenType::Default
                | TokenType::Delete
                | TokenType::Distinct
                | TokenType::Drop
                | TokenType::Else
                | TokenType::End
                | TokenType::Exists
                | TokenType::False
                | TokenType::Foreign
                | TokenType::From
                | TokenType::Full
                | TokenType::Group
                | TokenType::Having
                | TokenType::In
                | TokenType::Inner
                | TokenType::Insert
                | TokenType::Into
                | TokenType::Is
                | TokenType::Join
                | TokenType::Left
                | TokenType::Like
                | TokenType::ILike
                | TokenType::Limit
                | TokenType::Not
                | TokenType::Null
                | TokenType::On
                | TokenType::Or
                | TokenType::Order
                | TokenType::Outer
                | TokenType::Primary
                | TokenType::References
                | TokenType::Right
                | TokenType::Select
                | TokenType::Set
                | TokenType::Table
                | TokenType::Then
                | TokenType::True
                | TokenType::Unique
                | TokenType::Update
                | TokenType::Using
                | TokenType::Values
                | TokenType::When
                | TokenType::Where
        )
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenType::Type(dt) => write!(f, "Type({})", dt),
            other => write!(f, "{:?}", other),
        }
    }
}
