//! Registry and expansion errors

use std::fmt;

use ottr_core::{Diagnostic, DiagnosticCode, Span, SyntaxErrors};
use ottr_types::{Iri, Term};
use thiserror::Error;

// ============================================================================
// Registry errors (load time)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("template {template} is already defined")]
    Redefinition { template: Iri, span: Span },

    #[error(transparent)]
    Syntax(#[from] SyntaxErrors),
}

impl RegistryError {
    pub fn diagnostics(&self, source_name: &str) -> Vec<Diagnostic> {
        match self {
            RegistryError::Redefinition { span, .. } => vec![Diagnostic::error(
                DiagnosticCode::TemplateRedefinition,
                self.to_string(),
            )
            .with_location(span.location())
            .with_source(source_name)],
            RegistryError::Syntax(errors) => ottr_core::syntax_diagnostics(errors, source_name),
        }
    }
}

/// Every error from loading one text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct LoadErrors(pub Vec<RegistryError>);

impl LoadErrors {
    pub fn iter(&self) -> impl Iterator<Item = &RegistryError> {
        self.0.iter()
    }

    pub fn diagnostics(&self, source_name: &str) -> Vec<Diagnostic> {
        self.0.iter().flat_map(|e| e.diagnostics(source_name)).collect()
    }
}

impl fmt::Display for LoadErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join("\n"))
    }
}

// ============================================================================
// Type errors
// ============================================================================

/// Why a value does not fit a parameter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MismatchReason {
    #[error("expected an IRI but got a {0}")]
    ExpectedIri(&'static str),

    #[error("expected a literal but got a {0}")]
    ExpectedLiteral(&'static str),

    #[error("expected a literal with datatype {expected} but got {found}")]
    WrongDatatype { expected: Iri, found: Iri },

    #[error("expected a list but got a {0}")]
    ExpectedList(&'static str),

    #[error("expected a single term but got a list")]
    UnexpectedList,

    #[error("this parameter is a non-empty list, so it cannot be bound to an empty list")]
    EmptyList,

    #[error("this parameter is not optional, so it cannot be bound to ottr:none")]
    NoneNotAllowed,

    #[error("this parameter is non blank, so it cannot be bound to a blank node")]
    BlankNotAllowed,

    #[error("the cross-product primitive can only be used through an expansion mode")]
    DirectCrossCall,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMismatch {
    pub template: Iri,
    /// `None` when the call as a whole is rejected
    pub parameter: Option<String>,
    pub value: Option<Term>,
    pub reason: MismatchReason,
    pub span: Span,
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.value, &self.parameter) {
            (Some(value), Some(param)) => write!(
                f,
                "invalid argument {} for parameter ?{} of {}: {}",
                value, param, self.template, self.reason
            ),
            _ => write!(f, "invalid call of {}: {}", self.template, self.reason),
        }
    }
}

impl std::error::Error for TypeMismatch {}

// ============================================================================
// Expansion errors (scoped to one top-level instance)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpansionError {
    #[error("unknown template {template}")]
    UnknownTemplate { template: Iri, span: Span },

    #[error("template {template} takes {max} argument(s), {min} required, but got {given}")]
    Arity {
        template: Iri,
        min: usize,
        max: usize,
        given: usize,
        span: Span,
    },

    #[error(transparent)]
    Type(#[from] TypeMismatch),

    #[error("cyclic template call: {}", format_path(.path))]
    Cycle { path: Vec<Iri>, span: Span },

    #[error("expansion depth limit of {limit} exceeded at {template}")]
    DepthLimit { limit: usize, template: Iri, span: Span },
}

fn format_path(path: &[Iri]) -> String {
    path.iter()
        .map(|iri| iri.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl ExpansionError {
    /// Span of the call that failed
    pub fn span(&self) -> Span {
        match self {
            ExpansionError::UnknownTemplate { span, .. }
            | ExpansionError::Arity { span, .. }
            | ExpansionError::Cycle { span, .. }
            | ExpansionError::DepthLimit { span, .. } => *span,
            ExpansionError::Type(mismatch) => mismatch.span,
        }
    }

    pub fn code(&self) -> DiagnosticCode {
        match self {
            ExpansionError::UnknownTemplate { .. } => DiagnosticCode::UnknownTemplate,
            ExpansionError::Arity { .. } => DiagnosticCode::ArityMismatch,
            ExpansionError::Type(_) => DiagnosticCode::TypeMismatch,
            ExpansionError::Cycle { .. } => DiagnosticCode::CyclicTemplate,
            ExpansionError::DepthLimit { .. } => DiagnosticCode::DepthLimit,
        }
    }

    pub fn diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.to_string());
        let span = self.span();
        if span.line > 0 {
            diag.with_location(span.location())
        } else {
            diag
        }
    }
}
