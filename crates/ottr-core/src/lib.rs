//! ottr-core: stOTTR lexer, parser and template AST
//!
//! This crate contains the pure syntax layer with NO expansion logic:
//! - Template AST (Template, Parameter, Argument, Instance, GroundInstance)
//! - nom-based lexer producing position-tagged tokens
//! - Recursive-descent parser with variable unification and error recovery
//! - Prefix map with the default OTTR prefixes
//! - Diagnostic types for error reporting
//!
//! The registry and the expansion engine live in `ottr-templates`.

pub mod ast;
pub mod diagnostics;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod prefixes;

// Re-export commonly used types
pub use ast::{
    Argument, GroundInstance, Instance, ListExpander, ParamType, Parameter, Span,
    StatementPattern, Template, TemplateBody,
};
pub use diagnostics::{syntax_diagnostics, Diagnostic, DiagnosticCode, Severity};
pub use error::{LexError, LexErrorKind, ParseError, ParseErrorKind, SyntaxError, SyntaxErrors};
pub use lexer::{tokenize, Token, TokenKind};
pub use parser::{parse_instances, parse_templates};
pub use prefixes::PrefixMap;
