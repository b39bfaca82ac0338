//! OTTR Types - Level 1 Foundation Types
//!
//! Immutable value types shared by the parser, the template registry, the
//! expansion engine and the generator.
//!
//! ## Architecture Level: LEVEL 1 (Foundation)
//!
//! This crate depends on no other workspace crate. Everything above it
//! (lexer, parser, registry, engine) builds on these types.
//!
//! ## Contents
//!
//! - Source location tracking for diagnostics
//! - Terms: IRIs, blank nodes, literals, lists and the `none` marker
//! - Statements: the `(subject, predicate, object)` output of expansion
//! - Scope tokens used to keep blank nodes of independent expansions apart
//!
//! Variables never appear here: they are resolved to parameter positions by
//! the parser before any term reaches the engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod vocab;

// ============================================================================
// SOURCE LOCATION AND POSITIONING
// ============================================================================

/// Source location in template or instance text for error reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Byte offset from start of input
    pub offset: usize,
    /// Optional filename or identifier for the source
    pub source_name: Option<String>,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
            source_name: None,
        }
    }

    /// Attach a source name (usually a file path)
    pub fn with_source(mut self, source_name: impl Into<String>) -> Self {
        self.source_name = Some(source_name.into());
        self
    }

    /// Get a human-readable description of the location
    pub fn description(&self) -> String {
        match &self.source_name {
            Some(name) => format!("{}:{}:{}", name, self.line, self.column),
            None => format!("{}:{}", self.line, self.column),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

// ============================================================================
// TERM ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TermError {
    #[error("invalid IRI <{iri}>: {reason}")]
    InvalidIri { iri: String, reason: &'static str },

    #[error("invalid language tag '{0}'")]
    InvalidLanguageTag(String),
}

// ============================================================================
// IRIS
// ============================================================================

/// An absolute IRI (an "identifier" in template terminology)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iri(String);

impl Iri {
    /// Parse and validate an absolute IRI (without the angle brackets)
    pub fn parse(iri: impl Into<String>) -> Result<Self, TermError> {
        let iri = iri.into();
        if iri.is_empty() {
            return Err(TermError::InvalidIri {
                iri,
                reason: "empty IRI",
            });
        }
        if let Some(c) = iri
            .chars()
            .find(|c| c.is_whitespace() || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\'))
        {
            let reason = if c.is_whitespace() {
                "whitespace is not allowed"
            } else {
                "forbidden character"
            };
            return Err(TermError::InvalidIri { iri, reason });
        }
        match iri.find(':') {
            Some(idx) if idx > 0 => Ok(Self(iri)),
            _ => Err(TermError::InvalidIri {
                iri,
                reason: "missing scheme",
            }),
        }
    }

    /// Build an IRI from a trusted constant (namespace + local name)
    pub fn from_namespace(namespace: &str, local: &str) -> Self {
        Self(format!("{}{}", namespace, local))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into (namespace, local name) at the last `#` or `/`
    pub fn split(&self) -> (&str, &str) {
        match self.0.rfind(['#', '/']) {
            Some(idx) => self.0.split_at(idx + 1),
            None => (self.0.as_str(), ""),
        }
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

// ============================================================================
// BLANK NODES
// ============================================================================

/// Value unique to one top-level instantiation
///
/// Handed out by the generator's atomic scope generator; every blank node
/// minted during one top-level expansion carries it in its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScopeToken(pub u64);

impl fmt::Display for ScopeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An opaque node (RDF blank node)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlankNode(String);

impl BlankNode {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Fresh node for a label written inside a template body
    ///
    /// `call` is the index of the template call within the scope, so the same
    /// label in two calls yields two distinct nodes.
    pub fn scoped(label: &str, scope: ScopeToken, call: usize) -> Self {
        Self(format!("{}_{}_{}", label, scope.0, call))
    }

    /// Fresh node for a label written in a top-level instance
    ///
    /// The `_i` suffix keeps these apart from `scoped` names, which always
    /// end in two numeric segments.
    pub fn scoped_top_level(label: &str, scope: ScopeToken) -> Self {
        Self(format!("{}_{}_i", label, scope.0))
    }

    pub fn label(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

// ============================================================================
// LITERALS
// ============================================================================

/// A literal with its datatype and optional language tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    pub lexical: String,
    pub datatype: Iri,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Literal {
    /// Plain string literal (`xsd:string`)
    pub fn string(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: vocab::xsd::string(),
            language: None,
        }
    }

    pub fn typed(lexical: impl Into<String>, datatype: Iri) -> Self {
        Self {
            lexical: lexical.into(),
            datatype,
            language: None,
        }
    }

    /// Language-tagged string (`rdf:langString`)
    pub fn lang(lexical: impl Into<String>, language: impl Into<String>) -> Result<Self, TermError> {
        let language = language.into();
        let valid = !language.is_empty()
            && language.split('-').enumerate().all(|(i, part)| {
                !part.is_empty()
                    && part.len() <= 8
                    && if i == 0 {
                        part.chars().all(|c| c.is_ascii_alphabetic())
                    } else {
                        part.chars().all(|c| c.is_ascii_alphanumeric())
                    }
            });
        if !valid {
            return Err(TermError::InvalidLanguageTag(language));
        }
        Ok(Self {
            lexical: lexical.into(),
            datatype: vocab::rdf::lang_string(),
            language: Some(language.to_ascii_lowercase()),
        })
    }

    pub fn integer(value: i64) -> Self {
        Self::typed(value.to_string(), vocab::xsd::integer())
    }

    pub fn boolean(value: bool) -> Self {
        Self::typed(value.to_string(), vocab::xsd::boolean())
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", escape_lexical(&self.lexical))?;
        if let Some(lang) = &self.language {
            write!(f, "@{}", lang)
        } else if self.datatype != vocab::xsd::string() {
            write!(f, "^^{}", self.datatype)
        } else {
            Ok(())
        }
    }
}

fn escape_lexical(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

// ============================================================================
// TERMS
// ============================================================================

/// A ground term: the value of an argument once bound
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Term {
    Iri(Iri),
    BlankNode(BlankNode),
    Literal(Literal),
    /// Finite ordered collection, only valid for list-typed parameters
    List(Vec<Term>),
    /// The `ottr:none` marker for an absent optional value
    None,
}

impl Term {
    pub fn iri(iri: Iri) -> Self {
        Term::Iri(iri)
    }

    pub fn blank(label: impl Into<String>) -> Self {
        Term::BlankNode(BlankNode::new(label))
    }

    pub fn string(lexical: impl Into<String>) -> Self {
        Term::Literal(Literal::string(lexical))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Term::None)
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    pub fn as_list(&self) -> Option<&[Term]> {
        match self {
            Term::List(items) => Some(items),
            _ => None,
        }
    }

    /// Short kind name used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Term::Iri(_) => "IRI",
            Term::BlankNode(_) => "blank node",
            Term::Literal(_) => "literal",
            Term::List(_) => "list",
            Term::None => "none",
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "{}", iri),
            Term::BlankNode(b) => write!(f, "{}", b),
            Term::Literal(l) => write!(f, "{}", l),
            Term::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            Term::None => write!(f, "{}", vocab::ottr::none()),
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Iri(iri)
    }
}

impl From<Literal> for Term {
    fn from(literal: Literal) -> Self {
        Term::Literal(literal)
    }
}

impl From<BlankNode> for Term {
    fn from(node: BlankNode) -> Self {
        Term::BlankNode(node)
    }
}

// ============================================================================
// STATEMENTS
// ============================================================================

/// One output statement produced by a base template
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Statement {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Statement {
    pub fn new(subject: impl Into<Term>, predicate: impl Into<Term>, object: impl Into<Term>) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

/// Renders one N-Triples line (without the newline)
impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}
