//! Lexing and parsing errors

use crate::ast::Span;
use ottr_types::SourceLocation;
use std::fmt;
use thiserror::Error;

// ============================================================================
// LEX ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unterminated literal")]
    UnterminatedLiteral,

    #[error("unterminated IRI")]
    UnterminatedIri,

    #[error("invalid escape sequence in literal")]
    InvalidEscape,

    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
}

/// The lexer stops at the first of these: the whole text is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at line {line}, column {column}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub line: u32,
    pub column: u32,
    pub offset: usize,
}

impl LexError {
    /// The character at the error position
    pub fn character(&self) -> char {
        match self.kind {
            LexErrorKind::UnterminatedLiteral | LexErrorKind::InvalidEscape => '"',
            LexErrorKind::UnterminatedIri => '<',
            LexErrorKind::UnexpectedChar(c) => c,
        }
    }
}

// ============================================================================
// PARSE ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("malformed parameter: {0}")]
    MalformedParameter(String),

    #[error("duplicate parameter ?{0}")]
    DuplicateParameter(String),

    #[error("undeclared variable ?{0}")]
    UndeclaredVariable(String),

    #[error("unresolved prefix '{0}:'")]
    UnresolvedPrefix(String),

    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    #[error("invalid term: {0}")]
    InvalidTerm(String),

    #[error("{0} is not allowed in a top-level instance")]
    NotGround(&'static str),

    #[error("expansion mode '{0}' needs at least one '++' argument")]
    MissingListExpansion(String),

    #[error("'++' argument without an expansion mode")]
    ExpansionWithoutMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at line {line}, column {column}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: u32,
    pub column: u32,
}

impl ParseError {
    pub fn at(kind: ParseErrorKind, span: Span) -> Self {
        Self {
            kind,
            line: span.line,
            column: span.column,
        }
    }
}

// ============================================================================
// SYNTAX ERRORS (batch)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl SyntaxError {
    pub fn location(&self) -> SourceLocation {
        match self {
            SyntaxError::Lex(e) => SourceLocation::new(e.line as usize, e.column as usize, e.offset),
            SyntaxError::Parse(e) => SourceLocation::new(e.line as usize, e.column as usize, 0),
        }
    }
}

/// Every error found in one text, in source order
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct SyntaxErrors(pub Vec<SyntaxError>);

impl SyntaxErrors {
    pub fn iter(&self) -> impl Iterator<Item = &SyntaxError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&SyntaxError> {
        self.0.first()
    }
}

impl fmt::Display for SyntaxErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [single] => write!(f, "{}", single),
            errors => {
                write!(f, "{} syntax errors", errors.len())?;
                for e in errors {
                    write!(f, "\n  {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl From<LexError> for SyntaxErrors {
    fn from(e: LexError) -> Self {
        SyntaxErrors(vec![SyntaxError::Lex(e)])
    }
}

impl IntoIterator for SyntaxErrors {
    type Item = SyntaxError;
    type IntoIter = std::vec::IntoIter<SyntaxError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
