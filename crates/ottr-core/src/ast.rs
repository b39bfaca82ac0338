//! Template AST - the in-memory model built by the parser
//!
//! - **Template**: identifier, ordered parameters and a body
//! - **Parameter**: name, position, type and modifiers
//! - **Argument**: what a body instance passes for one parameter
//! - **Instance**: a call inside a template body
//! - **GroundInstance**: a top-level call with concrete terms only
//!
//! ## Pipeline Flow
//!
//! ```text
//! Template text → Lexer → Parser ──→ Vec<Template>       (registered once)
//! Instance text → Lexer → Parser ──→ Vec<GroundInstance> (expanded one by one)
//! ```
//!
//! Variables never survive parsing: a body usage `?name` is unified with the
//! declared parameter of that name and stored as `Argument::Variable(index)`.

use ottr_types::{vocab, Iri, SourceLocation, Term};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// SPANS
// =============================================================================

/// Source span: byte offsets plus the 1-based position of the first byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Span covering `self` through `other`, positioned at `self`
    pub fn to(self, other: Span) -> Span {
        Span {
            end: other.end.max(self.end),
            ..self
        }
    }

    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line as usize, self.column as usize, self.start)
    }
}

// =============================================================================
// PARAMETERS
// =============================================================================

/// Declared parameter type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamType {
    /// `rdfs:Resource`, the top type and the default
    Resource,
    /// `ottr:IRI` and named IRI subtypes (`owl:Class`, `rdf:Property`, ...)
    Iri,
    /// `rdfs:Literal`
    Literal,
    /// A literal of one datatype (`xsd:string`, `rdf:langString`, ...)
    Datatype(Iri),
    List(Box<ParamType>),
    NeList(Box<ParamType>),
}

/// IRIs accepted as `ParamType::Iri`
const IRI_SUBTYPES: &[(&str, &str)] = &[
    (vocab::OTTR, "IRI"),
    (vocab::RDFS, "Class"),
    (vocab::RDFS, "Datatype"),
    (vocab::RDF, "Property"),
    (vocab::OWL, "Class"),
    (vocab::OWL, "ObjectProperty"),
    (vocab::OWL, "DatatypeProperty"),
    (vocab::OWL, "AnnotationProperty"),
    (vocab::OWL, "NamedIndividual"),
];

impl ParamType {
    /// Map a type IRI to a parameter type; `None` for unknown types
    pub fn from_iri(iri: &Iri) -> Option<ParamType> {
        let (ns, local) = iri.split();
        if iri == &vocab::rdfs::resource() {
            Some(ParamType::Resource)
        } else if iri == &vocab::rdfs::literal() {
            Some(ParamType::Literal)
        } else if IRI_SUBTYPES.iter().any(|(n, l)| *n == ns && *l == local) {
            Some(ParamType::Iri)
        } else if (ns == vocab::XSD && !local.is_empty())
            || (ns == vocab::RDF && matches!(local, "langString" | "HTML" | "XMLLiteral"))
        {
            Some(ParamType::Datatype(iri.clone()))
        } else {
            None
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, ParamType::List(_) | ParamType::NeList(_))
    }

    /// Member type of a list type
    pub fn element(&self) -> Option<&ParamType> {
        match self {
            ParamType::List(inner) | ParamType::NeList(inner) => Some(inner),
            _ => None,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Resource => write!(f, "rdfs:Resource"),
            ParamType::Iri => write!(f, "ottr:IRI"),
            ParamType::Literal => write!(f, "rdfs:Literal"),
            ParamType::Datatype(iri) => {
                let (ns, local) = iri.split();
                match ns {
                    vocab::XSD => write!(f, "xsd:{}", local),
                    vocab::RDF => write!(f, "rdf:{}", local),
                    _ => write!(f, "{}", iri),
                }
            }
            ParamType::List(inner) => write!(f, "List<{}>", inner),
            ParamType::NeList(inner) => write!(f, "NEList<{}>", inner),
        }
    }
}

/// One declared template parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    /// Position in the parameter list; the binding key at expansion time
    pub index: usize,
    pub ty: ParamType,
    /// `!` modifier: cannot be bound to a blank node
    pub non_blank: bool,
    /// `?` modifier: may be bound to `none`
    pub optional: bool,
    pub default: Option<Term>,
    pub span: Span,
}

impl Parameter {
    /// Can this parameter be left out of a call?
    pub fn is_omittable(&self) -> bool {
        self.optional || self.default.is_some()
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.non_blank {
            write!(f, "! ")?;
        }
        if self.optional {
            write!(f, "? ")?;
        }
        if self.ty != ParamType::Resource {
            write!(f, "{} ", self.ty)?;
        }
        write!(f, "?{}", self.name)?;
        if let Some(default) = &self.default {
            write!(f, " = {}", default)?;
        }
        Ok(())
    }
}

// =============================================================================
// ARGUMENTS AND INSTANCES
// =============================================================================

/// Argument of a body instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Argument {
    Concrete(Term),
    /// Reference to the enclosing template's parameter at this index
    Variable(usize),
    /// List term with at least one non-constant member
    List(Vec<Argument>),
    /// `++arg`: the list is expanded by the instance's expansion mode
    Expand(Box<Argument>),
}

impl Argument {
    pub fn is_expand(&self) -> bool {
        matches!(self, Argument::Expand(_))
    }

    /// Parameter indices referenced by this argument
    pub fn variables(&self) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables(&self, out: &mut Vec<usize>) {
        match self {
            Argument::Concrete(_) => {}
            Argument::Variable(i) => out.push(*i),
            Argument::List(items) => items.iter().for_each(|a| a.collect_variables(out)),
            Argument::Expand(inner) => inner.collect_variables(out),
        }
    }
}

/// How the `++` arguments of an instance are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListExpander {
    Cross,
    ZipMin,
    ZipMax,
}

impl ListExpander {
    pub fn from_keyword(word: &str) -> Option<ListExpander> {
        match word {
            "cross" => Some(ListExpander::Cross),
            "zipMin" => Some(ListExpander::ZipMin),
            "zipMax" => Some(ListExpander::ZipMax),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            ListExpander::Cross => "cross",
            ListExpander::ZipMin => "zipMin",
            ListExpander::ZipMax => "zipMax",
        }
    }
}

impl fmt::Display for ListExpander {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A template call inside a template body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub template: Iri,
    pub arguments: Vec<Argument>,
    pub expander: Option<ListExpander>,
    pub span: Span,
}

impl Instance {
    pub fn has_expansion(&self) -> bool {
        self.arguments.iter().any(Argument::is_expand)
    }
}

/// A top-level call: concrete terms only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundInstance {
    pub template: Iri,
    pub arguments: Vec<Term>,
    pub span: Span,
}

impl GroundInstance {
    pub fn new(template: Iri, arguments: Vec<Term>) -> Self {
        Self {
            template,
            arguments,
            span: Span::default(),
        }
    }
}

impl fmt::Display for GroundInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.template)?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}

// =============================================================================
// TEMPLATES
// =============================================================================

/// Pattern of the statement primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementPattern {
    pub subject: Argument,
    pub predicate: Argument,
    pub object: Argument,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TemplateBody {
    /// Base: yields exactly one statement
    Statement(StatementPattern),
    /// Base: the cross-product primitive, driven by an instance's expansion mode
    CrossProduct,
    /// Composite: ordered body instances
    Instances(Vec<Instance>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub iri: Iri,
    pub parameters: Vec<Parameter>,
    pub body: TemplateBody,
    pub span: Span,
}

impl Template {
    pub fn is_base(&self) -> bool {
        !matches!(self.body, TemplateBody::Instances(_))
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// Smallest number of arguments a call may pass
    pub fn min_arity(&self) -> usize {
        self.parameters
            .iter()
            .rposition(|p| !p.is_omittable())
            .map_or(0, |i| i + 1)
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Body instances of a composite template (empty for base templates)
    pub fn instances(&self) -> &[Instance] {
        match &self.body {
            TemplateBody::Instances(instances) => instances,
            _ => &[],
        }
    }

    /// Templates called from the body, in order of first use
    pub fn dependencies(&self) -> Vec<&Iri> {
        let mut deps: Vec<&Iri> = Vec::new();
        for inst in self.instances() {
            if !deps.contains(&&inst.template) {
                deps.push(&inst.template);
            }
        }
        deps
    }

    /// Signature line, e.g. `<http://ex.org/Person>[ ottr:IRI ?name, ?email ]`
    pub fn signature(&self) -> String {
        let params = self
            .parameters
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        if params.is_empty() {
            format!("{}[ ]", self.iri)
        } else {
            format!("{}[ {} ]", self.iri, params)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
