//! Base library and the standard `o-rdf` / `o-rdfs` templates

use ottr_core::{Argument, ParamType, Parameter, Span, StatementPattern, Template, TemplateBody};
use ottr_types::vocab;

/// Standard templates, loaded on top of the base library unless disabled
pub const STANDARD_LIBRARY: &str = r#"
@prefix o-rdf: <http://tpl.ottr.xyz/rdf/0.1/> .
@prefix o-rdfs: <http://tpl.ottr.xyz/rdfs/0.1/> .

o-rdf:Type[ ottr:IRI ?entity, ottr:IRI ?type ] :: {
    ottr:Triple(?entity, rdf:type, ?type)
} .

o-rdfs:Label[ ottr:IRI ?iri, ?label ] :: {
    ottr:Triple(?iri, rdfs:label, ?label)
} .

o-rdfs:ResourceDescription[ ottr:IRI ?iri, ? ?label, ? ?comment, ? ?seeAlso, ? ?isDefinedBy ] :: {
    o-rdfs:Label(?iri, ?label),
    ottr:Triple(?iri, rdfs:comment, ?comment),
    ottr:Triple(?iri, rdfs:seeAlso, ?seeAlso),
    ottr:Triple(?iri, rdfs:isDefinedBy, ?isDefinedBy)
} .

o-rdfs:TypedResourceDescription[ ottr:IRI ?iri, ottr:IRI ?type, ? ?label, ? ?comment, ? ?seeAlso, ? ?isDefinedBy ] :: {
    ottr:Triple(?iri, rdf:type, ?type),
    o-rdfs:ResourceDescription(?iri, ?label, ?comment, ?seeAlso, ?isDefinedBy)
} .
"#;

fn parameter(name: &str, index: usize, ty: ParamType, non_blank: bool) -> Parameter {
    Parameter {
        name: name.to_string(),
        index,
        ty,
        non_blank,
        optional: false,
        default: None,
        span: Span::default(),
    }
}

/// `ottr:Triple[ ottr:IRI ?subject, ! ottr:IRI ?predicate, ?object ]`
pub fn triple() -> Template {
    Template {
        iri: vocab::ottr::triple(),
        parameters: vec![
            parameter("subject", 0, ParamType::Iri, false),
            parameter("predicate", 1, ParamType::Iri, true),
            parameter("object", 2, ParamType::Resource, false),
        ],
        body: TemplateBody::Statement(StatementPattern {
            subject: Argument::Variable(0),
            predicate: Argument::Variable(1),
            object: Argument::Variable(2),
        }),
        span: Span::default(),
    }
}

/// The cross-product primitive
pub fn cross() -> Template {
    Template {
        iri: vocab::ottr::cross(),
        parameters: Vec::new(),
        body: TemplateBody::CrossProduct,
        span: Span::default(),
    }
}

/// Templates every registry starts with
pub fn base_templates() -> Vec<Template> {
    vec![triple(), cross()]
}
