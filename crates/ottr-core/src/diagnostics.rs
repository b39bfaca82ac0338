//! Unified Diagnostics Module
//!
//! Single diagnostic type used across lexing, parsing, registry loading and
//! expansion, so the driver and the CLI report every problem the same way.

use ottr_types::SourceLocation;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ParseErrorKind, SyntaxError, SyntaxErrors};

/// Diagnostic severity level
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Diagnostic codes for categorizing issues
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCode {
    // =========================================================================
    // Lex and parse errors
    // =========================================================================
    LexError,
    UnexpectedToken,
    MalformedParameter,
    DuplicateParameter,
    UndeclaredVariable,
    UnresolvedPrefix,
    InvalidTerm,
    NonGroundInstance,
    InvalidExpansion,

    // =========================================================================
    // Registry
    // =========================================================================
    TemplateRedefinition,
    DanglingReference,

    // =========================================================================
    // Expansion errors
    // =========================================================================
    UnknownTemplate,
    ArityMismatch,
    TypeMismatch,
    CyclicTemplate,
    DepthLimit,
}

/// A diagnostic message with location and severity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
    pub location: Option<SourceLocation>,
}

impl Diagnostic {
    /// Create an error diagnostic
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            location: None,
        }
    }

    /// Create a warning diagnostic
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            location: None,
        }
    }

    pub fn info(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            code,
            message: message.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Name the file the diagnostic came from
    pub fn with_source(mut self, source_name: &str) -> Self {
        if let Some(location) = self.location.take() {
            self.location = Some(location.with_source(source_name));
        } else {
            self.location = Some(SourceLocation::new(0, 0, 0).with_source(source_name));
        }
        self
    }

    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self.severity, Severity::Warning)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) if loc.line > 0 => write!(f, "{}: {}: {}", loc, self.severity, self.message),
            Some(loc) => match &loc.source_name {
                Some(name) => write!(f, "{}: {}: {}", name, self.severity, self.message),
                None => write!(f, "{}: {}", self.severity, self.message),
            },
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<&SyntaxError> for Diagnostic {
    fn from(err: &SyntaxError) -> Self {
        let code = match err {
            SyntaxError::Lex(_) => DiagnosticCode::LexError,
            SyntaxError::Parse(e) => match e.kind {
                ParseErrorKind::MalformedParameter(_) => DiagnosticCode::MalformedParameter,
                ParseErrorKind::DuplicateParameter(_) => DiagnosticCode::DuplicateParameter,
                ParseErrorKind::UndeclaredVariable(_) => DiagnosticCode::UndeclaredVariable,
                ParseErrorKind::UnresolvedPrefix(_) => DiagnosticCode::UnresolvedPrefix,
                ParseErrorKind::UnexpectedToken { .. } => DiagnosticCode::UnexpectedToken,
                ParseErrorKind::InvalidTerm(_) => DiagnosticCode::InvalidTerm,
                ParseErrorKind::NotGround(_) => DiagnosticCode::NonGroundInstance,
                ParseErrorKind::MissingListExpansion(_) | ParseErrorKind::ExpansionWithoutMode => {
                    DiagnosticCode::InvalidExpansion
                }
            },
        };
        let message = match err {
            SyntaxError::Lex(e) => e.kind.to_string(),
            SyntaxError::Parse(e) => e.kind.to_string(),
        };
        Diagnostic::error(code, message).with_location(err.location())
    }
}

/// One error diagnostic per syntax error
pub fn syntax_diagnostics(errors: &SyntaxErrors, source_name: &str) -> Vec<Diagnostic> {
    errors
        .iter()
        .map(|e| Diagnostic::from(e).with_source(source_name))
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LexError, LexErrorKind, ParseError};

    #[test]
    fn test_error_creation() {
        let diag = Diagnostic::error(DiagnosticCode::UnknownTemplate, "unknown template");
        assert!(diag.is_error());
        assert!(!diag.is_warning());
        assert_eq!(diag.to_string(), "error: unknown template");
    }

    #[test]
    fn test_warning_with_source() {
        let diag = Diagnostic::warning(DiagnosticCode::DanglingReference, "no such template")
            .with_source("lib.stottr");
        assert!(diag.is_warning());
        assert_eq!(diag.to_string(), "lib.stottr: warning: no such template");
    }

    #[test]
    fn test_from_syntax_errors() {
        let errors = SyntaxErrors(vec![
            SyntaxError::Lex(LexError {
                kind: LexErrorKind::UnterminatedLiteral,
                line: 2,
                column: 5,
                offset: 14,
            }),
            SyntaxError::Parse(ParseError {
                kind: ParseErrorKind::UndeclaredVariable("x".to_string()),
                line: 4,
                column: 1,
            }),
        ]);
        let diags = syntax_diagnostics(&errors, "people.stottr");
        assert_eq!(diags.len(), 2);
        assert_eq!(diags[0].code, DiagnosticCode::LexError);
        assert_eq!(
            diags[0].to_string(),
            "people.stottr:2:5: error: unterminated literal"
        );
        assert_eq!(diags[1].code, DiagnosticCode::UndeclaredVariable);
        assert_eq!(diags[1].location.as_ref().map(|l| l.line), Some(4));
    }
}
