//! Template Expander
//!
//! Expands one top-level instance into the statements it denotes.
//!
//! ## Pipeline
//!
//! ```text
//! GroundInstance: ex:Person(ex:alice, ("a@ex.org", "b@ex.org"))
//!     ↓
//! 1. Lookup template in TemplateRegistry
//! 2. Check arity, fill omitted trailing parameters (default or none)
//! 3. Validate every value against its parameter
//! 4. Statement body → one statement
//!    Instance body  → expand each body instance against the bindings
//!                     (expansion mode: one call per list combination)
//!     ↓
//! Statements: (ex:alice, ex:hasEmail, "a@ex.org"), (ex:alice, ex:hasEmail, "b@ex.org")
//! ```
//!
//! Expansion is eager and pure: the registry is only read, and the only
//! input besides the instance is the scope token that keeps blank nodes of
//! independent expansions apart.

use ottr_core::{
    Argument, GroundInstance, Instance, ListExpander, Span, StatementPattern, Template, TemplateBody,
};
use ottr_types::{BlankNode, Iri, ScopeToken, Statement, Term};
use tracing::{debug, trace};

use crate::error::{ExpansionError, MismatchReason, TypeMismatch};
use crate::registry::TemplateRegistry;
use crate::typecheck::check_value;

/// Expand one top-level instance with default options
pub fn expand(
    registry: &TemplateRegistry,
    instance: &GroundInstance,
    scope: ScopeToken,
) -> Result<Vec<Statement>, ExpansionError> {
    Expander::new(registry).expand(instance, scope)
}

/// Expansion engine bound to a registry
#[derive(Debug, Clone, Copy)]
pub struct Expander<'r> {
    registry: &'r TemplateRegistry,
    max_depth: Option<usize>,
}

impl<'r> Expander<'r> {
    pub fn new(registry: &'r TemplateRegistry) -> Self {
        Self {
            registry,
            max_depth: None,
        }
    }

    /// Limit the nesting of composite template calls
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn expand(&self, instance: &GroundInstance, scope: ScopeToken) -> Result<Vec<Statement>, ExpansionError> {
        let template = self
            .registry
            .get(&instance.template)
            .ok_or_else(|| ExpansionError::UnknownTemplate {
                template: instance.template.clone(),
                span: instance.span,
            })?;

        let args = instance
            .arguments
            .iter()
            .map(|term| rescope(term, &|label: &str| BlankNode::scoped_top_level(label, scope)))
            .collect();

        let mut run = Expansion {
            registry: self.registry,
            max_depth: self.max_depth,
            scope,
            next_call: 0,
            path: Vec::new(),
            out: Vec::new(),
        };
        run.call(template, args, true, instance.span)?;

        debug!(
            template = %instance.template,
            scope = %scope,
            statements = run.out.len(),
            "expanded instance"
        );
        Ok(run.out)
    }
}

// ============================================================================
// One top-level expansion
// ============================================================================

struct Expansion<'r> {
    registry: &'r TemplateRegistry,
    max_depth: Option<usize>,
    scope: ScopeToken,
    /// Next composite call index within this scope
    next_call: usize,
    /// Composite templates currently being expanded
    path: Vec<&'r Iri>,
    out: Vec<Statement>,
}

impl<'r> Expansion<'r> {
    /// Bind `args` to `template`'s parameters and expand its body
    ///
    /// A `none` for a required parameter is an error at top level and skips
    /// the call anywhere else.
    fn call(&mut self, template: &'r Template, args: Vec<Term>, top_level: bool, span: Span) -> Result<(), ExpansionError> {
        // Blank nodes in defaults belong to the call they are bound in
        let (scope, call) = (self.scope, self.next_call);
        let env = bind_arguments(template, args, span, &|label: &str| BlankNode::scoped(label, scope, call))?;

        for (param, value) in template.parameters.iter().zip(&env) {
            match check_value(param, value) {
                Ok(()) => {}
                Err(MismatchReason::NoneNotAllowed) if !top_level => {
                    trace!(template = %template.iri, parameter = %param.name, "skipping call bound to none");
                    return Ok(());
                }
                Err(reason) => {
                    return Err(TypeMismatch {
                        template: template.iri.clone(),
                        parameter: Some(param.name.clone()),
                        value: Some(value.clone()),
                        reason,
                        span,
                    }
                    .into())
                }
            }
        }

        match &template.body {
            TemplateBody::Statement(pattern) => {
                self.out.push(instantiate_pattern(pattern, &env));
                Ok(())
            }
            TemplateBody::CrossProduct => Err(TypeMismatch {
                template: template.iri.clone(),
                parameter: None,
                value: None,
                reason: MismatchReason::DirectCrossCall,
                span,
            }
            .into()),
            TemplateBody::Instances(body) => {
                if let Some(limit) = self.max_depth {
                    if self.path.len() >= limit {
                        return Err(ExpansionError::DepthLimit {
                            limit,
                            template: template.iri.clone(),
                            span,
                        });
                    }
                }
                if self.path.contains(&&template.iri) {
                    let mut path: Vec<Iri> = self.path.iter().map(|iri| (*iri).clone()).collect();
                    path.push(template.iri.clone());
                    return Err(ExpansionError::Cycle { path, span });
                }

                let call = self.next_call;
                self.next_call += 1;
                trace!(template = %template.iri, call, depth = self.path.len(), "expanding composite call");

                self.path.push(&template.iri);
                for instance in body {
                    self.body_instance(instance, &env, call)?;
                }
                self.path.pop();
                Ok(())
            }
        }
    }

    fn body_instance(&mut self, instance: &'r Instance, env: &[Term], call: usize) -> Result<(), ExpansionError> {
        let target = self
            .registry
            .get(&instance.template)
            .ok_or_else(|| ExpansionError::UnknownTemplate {
                template: instance.template.clone(),
                span: instance.span,
            })?;

        let scope = self.scope;
        let fresh = |label: &str| BlankNode::scoped(label, scope, call);

        let Some(mode) = instance.expander else {
            let args = instance
                .arguments
                .iter()
                .map(|arg| evaluate(arg, env, &fresh))
                .collect();
            return self.call(target, args, false, instance.span);
        };

        // Positions marked `++` and the lists bound there
        let mut args = Vec::with_capacity(instance.arguments.len());
        let mut expanded: Vec<(usize, Vec<Term>)> = Vec::new();
        for (position, arg) in instance.arguments.iter().enumerate() {
            match arg {
                Argument::Expand(inner) => match evaluate(inner, env, &fresh) {
                    Term::List(items) => {
                        expanded.push((position, items));
                        args.push(Term::None);
                    }
                    Term::None => {
                        trace!(template = %target.iri, position, "skipping expansion over none");
                        return Ok(());
                    }
                    other => {
                        return Err(TypeMismatch {
                            template: target.iri.clone(),
                            parameter: target.parameters.get(position).map(|p| p.name.clone()),
                            reason: MismatchReason::ExpectedList(other.kind_name()),
                            value: Some(other),
                            span: instance.span,
                        }
                        .into())
                    }
                },
                other => args.push(evaluate(other, env, &fresh)),
            }
        }

        let lists: Vec<&[Term]> = expanded.iter().map(|(_, items)| items.as_slice()).collect();
        let combinations = combine(mode, &lists);
        trace!(
            template = %target.iri,
            mode = %mode,
            combinations = combinations.len(),
            "expanding list arguments"
        );

        for combination in combinations {
            let mut call_args = args.clone();
            for ((position, _), value) in expanded.iter().zip(combination) {
                call_args[*position] = value;
            }
            self.call(target, call_args, false, instance.span)?;
        }
        Ok(())
    }
}

// ============================================================================
// Binding
// ============================================================================

/// Position-indexed environment for one call
fn bind_arguments(
    template: &Template,
    args: Vec<Term>,
    span: Span,
    fresh: &dyn Fn(&str) -> BlankNode,
) -> Result<Vec<Term>, ExpansionError> {
    let given = args.len();
    if given > template.arity() || given < template.min_arity() {
        return Err(ExpansionError::Arity {
            template: template.iri.clone(),
            min: template.min_arity(),
            max: template.arity(),
            given,
            span,
        });
    }

    let mut args = args.into_iter();
    Ok(template
        .parameters
        .iter()
        .map(|param| match (args.next(), &param.default) {
            (Some(Term::None) | None, Some(default)) => rescope(default, fresh),
            (Some(value), _) => value,
            (None, None) => Term::None,
        })
        .collect())
}

fn evaluate(arg: &Argument, env: &[Term], fresh: &dyn Fn(&str) -> BlankNode) -> Term {
    match arg {
        Argument::Concrete(term) => rescope(term, fresh),
        Argument::Variable(index) => env.get(*index).cloned().unwrap_or(Term::None),
        Argument::List(items) => Term::List(items.iter().map(|a| evaluate(a, env, fresh)).collect()),
        Argument::Expand(inner) => evaluate(inner, env, fresh),
    }
}

/// Replace written blank node labels with scoped ones
fn rescope(term: &Term, fresh: &dyn Fn(&str) -> BlankNode) -> Term {
    match term {
        Term::BlankNode(node) => Term::BlankNode(fresh(node.label())),
        Term::List(items) => Term::List(items.iter().map(|t| rescope(t, fresh)).collect()),
        other => other.clone(),
    }
}

fn instantiate_pattern(pattern: &StatementPattern, env: &[Term]) -> Statement {
    let keep = |label: &str| BlankNode::new(label);
    Statement {
        subject: evaluate(&pattern.subject, env, &keep),
        predicate: evaluate(&pattern.predicate, env, &keep),
        object: evaluate(&pattern.object, env, &keep),
    }
}

// ============================================================================
// List expansion
// ============================================================================

/// Argument combinations for the `++` lists, in output order
fn combine(mode: ListExpander, lists: &[&[Term]]) -> Vec<Vec<Term>> {
    match mode {
        ListExpander::Cross => lists.iter().fold(vec![Vec::new()], |acc, list| {
            acc.iter()
                .flat_map(|prefix| {
                    list.iter().map(move |item| {
                        let mut combination = prefix.clone();
                        combination.push(item.clone());
                        combination
                    })
                })
                .collect()
        }),
        ListExpander::ZipMin => {
            let len = lists.iter().map(|l| l.len()).min().unwrap_or(0);
            zip(lists, len)
        }
        ListExpander::ZipMax => {
            let len = lists.iter().map(|l| l.len()).max().unwrap_or(0);
            zip(lists, len)
        }
    }
}

fn zip(lists: &[&[Term]], len: usize) -> Vec<Vec<Term>> {
    (0..len)
        .map(|k| {
            lists
                .iter()
                .map(|list| list.get(k).cloned().unwrap_or(Term::None))
                .collect()
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ottr_core::PrefixMap;
    use ottr_types::{vocab, Literal};
    use pretty_assertions::assert_eq;

    const EX: &str = "http://example.org#";

    fn ex(local: &str) -> Term {
        Term::Iri(Iri::from_namespace(EX, local))
    }

    fn registry(templates: &str) -> TemplateRegistry {
        let mut registry = TemplateRegistry::with_standard_library().unwrap();
        let mut prefixes = PrefixMap::with_defaults();
        prefixes.bind("ex", EX);
        registry.load_str(templates, &mut prefixes).unwrap();
        registry
    }

    fn call(template: &str, args: Vec<Term>) -> GroundInstance {
        GroundInstance::new(Iri::from_namespace(EX, template), args)
    }

    fn triple(s: Term, p: Term, o: Term) -> Statement {
        Statement::new(s, p, o)
    }

    #[test]
    fn test_base_instance_yields_one_statement() {
        let registry = TemplateRegistry::new();
        let instance = GroundInstance::new(vocab::ottr::triple(), vec![ex("s"), ex("p"), ex("o")]);
        assert_eq!(
            expand(&registry, &instance, ScopeToken(0)).unwrap(),
            vec![triple(ex("s"), ex("p"), ex("o"))]
        );
    }

    #[test]
    fn test_person_composite() {
        let registry = registry(
            "ex:Person0[ ?name, ?email ] :: { ottr:Triple(?name, ex:hasEmail, ?email) } .",
        );
        let out = expand(
            &registry,
            &call("Person0", vec![ex("alice"), Term::string("a@example.org")]),
            ScopeToken(0),
        )
        .unwrap();
        assert_eq!(
            out,
            vec![triple(ex("alice"), ex("hasEmail"), Term::string("a@example.org"))]
        );
    }

    #[test]
    fn test_composite_output_is_body_order() {
        let registry = registry(
            "ex:Inner[ ?x ] :: { ottr:Triple(?x, ex:p, ex:one), ottr:Triple(?x, ex:p, ex:two) } .\n\
             ex:Outer[ ?x ] :: { ottr:Triple(?x, ex:p, ex:zero), ex:Inner(?x), ottr:Triple(?x, ex:p, ex:three) } .",
        );
        let out = expand(&registry, &call("Outer", vec![ex("a")]), ScopeToken(0)).unwrap();
        let objects: Vec<Term> = out.into_iter().map(|s| s.object).collect();
        assert_eq!(objects, vec![ex("zero"), ex("one"), ex("two"), ex("three")]);
    }

    #[test]
    fn test_cross_blank_node_naming() {
        let registry = registry(
            "ex:Person[ List<ottr:IRI> ?emails ] :: {\n\
               cross | ottr:Triple(_:person, foaf:mbox, ++?emails)\n\
             } .",
        );
        let gmail = Term::Iri(Iri::parse("mailto:ann.strong@gmail.com").unwrap());
        let hotmail = Term::Iri(Iri::parse("mailto:ann.strong@hotmail.fr").unwrap());
        let out = expand(
            &registry,
            &call("Person", vec![Term::List(vec![gmail.clone(), hotmail.clone()])]),
            ScopeToken(0),
        )
        .unwrap();
        let mbox = Term::Iri(Iri::from_namespace(vocab::FOAF, "mbox"));
        assert_eq!(
            out,
            vec![
                triple(Term::blank("person_0_0"), mbox.clone(), gmail),
                triple(Term::blank("person_0_0"), mbox, hotmail),
            ]
        );
    }

    #[test]
    fn test_cross_product_order() {
        let registry = registry(
            "ex:Grid[ List<ottr:IRI> ?rows, List<ottr:IRI> ?cols ] :: {\n\
               cross | ottr:Triple(++?rows, ex:meets, ++?cols)\n\
             } .",
        );
        let out = expand(
            &registry,
            &call(
                "Grid",
                vec![
                    Term::List(vec![ex("r1"), ex("r2")]),
                    Term::List(vec![ex("c1"), ex("c2"), ex("c3")]),
                ],
            ),
            ScopeToken(0),
        )
        .unwrap();
        assert_eq!(out.len(), 6);
        let pairs: Vec<(Term, Term)> = out.into_iter().map(|s| (s.subject, s.object)).collect();
        assert_eq!(pairs[0], (ex("r1"), ex("c1")));
        assert_eq!(pairs[2], (ex("r1"), ex("c3")));
        assert_eq!(pairs[3], (ex("r2"), ex("c1")));
    }

    #[test]
    fn test_zip_modes() {
        let registry = registry(
            "ex:ZipMin[ List<ottr:IRI> ?a, List<ottr:IRI> ?b ] :: { zipMin | ottr:Triple(++?a, ex:p, ++?b) } .\n\
             ex:ZipMax[ List<ottr:IRI> ?a, List<ottr:IRI> ?b ] :: { zipMax | ottr:Triple(++?a, ex:p, ++?b) } .",
        );
        let args = vec![
            Term::List(vec![ex("a1"), ex("a2"), ex("a3")]),
            Term::List(vec![ex("b1"), ex("b2")]),
        ];
        let min = expand(&registry, &call("ZipMin", args.clone()), ScopeToken(0)).unwrap();
        assert_eq!(
            min,
            vec![
                triple(ex("a1"), ex("p"), ex("b1")),
                triple(ex("a2"), ex("p"), ex("b2")),
            ]
        );
        // the padded third combination binds none to ?object and is skipped
        let max = expand(&registry, &call("ZipMax", args), ScopeToken(0)).unwrap();
        assert_eq!(max, min);
    }

    #[test]
    fn test_empty_list_yields_nothing() {
        let registry = registry(
            "ex:Emails[ ?who, List<ottr:IRI> ?emails ] :: { cross | ottr:Triple(?who, foaf:mbox, ++?emails) } .",
        );
        let out = expand(
            &registry,
            &call("Emails", vec![ex("alice"), Term::List(vec![])]),
            ScopeToken(0),
        )
        .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_two_instantiations_have_disjoint_blank_nodes() {
        let registry = registry("ex:Anon[ ?x ] :: { ottr:Triple(_:b, ex:p, ?x) } .");
        let first = expand(&registry, &call("Anon", vec![ex("a")]), ScopeToken(0)).unwrap();
        let second = expand(&registry, &call("Anon", vec![ex("a")]), ScopeToken(1)).unwrap();
        assert_ne!(first[0].subject, second[0].subject);
        assert!(first[0].subject.is_blank() && second[0].subject.is_blank());
    }

    #[test]
    fn test_same_label_in_two_calls_is_two_nodes() {
        let registry = registry(
            "ex:Anon[ ?x ] :: { ottr:Triple(_:b, ex:p, ?x) } .\n\
             ex:Twice[ ?x ] :: { ex:Anon(?x), ex:Anon(?x) } .",
        );
        let out = expand(&registry, &call("Twice", vec![ex("a")]), ScopeToken(3)).unwrap();
        assert_eq!(out[0].subject, Term::blank("b_3_1"));
        assert_eq!(out[1].subject, Term::blank("b_3_2"));
    }

    #[test]
    fn test_argument_blank_nodes_keep_identity() {
        let registry = registry(
            "ex:Inner[ ?x ] :: { ottr:Triple(?x, ex:p, ex:o) } .\n\
             ex:Outer[ ] :: { ex:Inner(_:shared), ottr:Triple(_:shared, ex:q, ex:o) } .",
        );
        let out = expand(&registry, &call("Outer", vec![]), ScopeToken(0)).unwrap();
        assert_eq!(out[0].subject, out[1].subject);
        assert_eq!(out[0].subject, Term::blank("shared_0_0"));

        let top = expand(&registry, &call("Inner", vec![Term::blank("x")]), ScopeToken(7)).unwrap();
        assert_eq!(top[0].subject, Term::blank("x_7_i"));
    }

    #[test]
    fn test_blank_node_defaults_are_fresh_per_call() {
        let registry = registry(
            "ex:D[ ?x, ?y = _:d ] :: { ottr:Triple(?x, ex:p, ?y) } .\n\
             ex:Twice[ ?x ] :: { ex:D(?x), ex:D(?x) } .",
        );
        let first = expand(&registry, &call("D", vec![ex("a")]), ScopeToken(0)).unwrap();
        let second = expand(&registry, &call("D", vec![ex("a")]), ScopeToken(1)).unwrap();
        assert_eq!(first[0].object, Term::blank("d_0_0"));
        assert_eq!(second[0].object, Term::blank("d_1_0"));

        let nested = expand(&registry, &call("Twice", vec![ex("a")]), ScopeToken(2)).unwrap();
        assert_eq!(nested[0].object, Term::blank("d_2_1"));
        assert_eq!(nested[1].object, Term::blank("d_2_2"));

        // an explicit argument still wins over the default
        let given = expand(&registry, &call("D", vec![ex("a"), ex("b")]), ScopeToken(3)).unwrap();
        assert_eq!(given[0].object, ex("b"));
    }

    #[test]
    fn test_top_level_label_with_numeric_suffix_stays_distinct() {
        let registry = registry("ex:T[ ?x ] :: { ottr:Triple(_:b, ex:p, ?x) } .");
        let out = expand(&registry, &call("T", vec![Term::blank("b_0")]), ScopeToken(0)).unwrap();
        assert_eq!(out[0].subject, Term::blank("b_0_0"));
        assert_eq!(out[0].object, Term::blank("b_0_0_i"));
        assert_ne!(out[0].subject, out[0].object);
    }

    #[test]
    fn test_unknown_template() {
        let registry = TemplateRegistry::new();
        let err = expand(&registry, &call("Nope", vec![]), ScopeToken(0)).unwrap_err();
        assert!(matches!(err, ExpansionError::UnknownTemplate { .. }));
    }

    #[test]
    fn test_unknown_template_in_body_fails_whole_instance() {
        let registry = registry(
            "ex:Partial[ ?x ] :: { ottr:Triple(?x, ex:p, ex:o), ex:Missing(?x) } .",
        );
        let err = expand(&registry, &call("Partial", vec![ex("a")]), ScopeToken(0)).unwrap_err();
        assert!(matches!(
            err,
            ExpansionError::UnknownTemplate { template, .. } if template == Iri::from_namespace(EX, "Missing")
        ));
    }

    #[test]
    fn test_arity_errors() {
        let registry = registry(
            "ex:Person0[ ?name, ?email ] :: { ottr:Triple(?name, ex:hasEmail, ?email) } .",
        );
        let too_few = expand(&registry, &call("Person0", vec![ex("alice")]), ScopeToken(0)).unwrap_err();
        assert!(matches!(too_few, ExpansionError::Arity { min: 2, max: 2, given: 1, .. }));
        let too_many = expand(
            &registry,
            &call("Person0", vec![ex("a"), ex("b"), ex("c")]),
            ScopeToken(0),
        )
        .unwrap_err();
        assert!(matches!(too_many, ExpansionError::Arity { given: 3, .. }));
    }

    #[test]
    fn test_default_fills_omitted_and_none() {
        let registry = registry(
            "ex:Typed[ ?x, ?type = ex:Unknown ] :: { ottr:Triple(?x, rdf:type, ?type) } .",
        );
        let rdf_type = Term::Iri(vocab::rdf::type_());
        let omitted = expand(&registry, &call("Typed", vec![ex("a")]), ScopeToken(0)).unwrap();
        assert_eq!(omitted, vec![triple(ex("a"), rdf_type.clone(), ex("Unknown"))]);
        let none = expand(&registry, &call("Typed", vec![ex("a"), Term::None]), ScopeToken(0)).unwrap();
        assert_eq!(none, omitted);
        let given = expand(&registry, &call("Typed", vec![ex("a"), ex("Known")]), ScopeToken(0)).unwrap();
        assert_eq!(given, vec![triple(ex("a"), rdf_type, ex("Known"))]);
    }

    #[test]
    fn test_none_propagation() {
        let registry = TemplateRegistry::with_standard_library().unwrap();
        let described = GroundInstance::new(
            Iri::from_namespace(vocab::O_RDFS, "ResourceDescription"),
            vec![ex("thing"), Term::string("Thing")],
        );
        let out = expand(&registry, &described, ScopeToken(0)).unwrap();
        assert_eq!(
            out,
            vec![triple(ex("thing"), Term::Iri(vocab::rdfs::label()), Term::string("Thing"))]
        );
    }

    #[test]
    fn test_top_level_none_is_type_error() {
        let registry = TemplateRegistry::new();
        let instance = GroundInstance::new(vocab::ottr::triple(), vec![ex("s"), ex("p"), Term::None]);
        let err = expand(&registry, &instance, ScopeToken(0)).unwrap_err();
        assert!(matches!(
            err,
            ExpansionError::Type(TypeMismatch { reason: MismatchReason::NoneNotAllowed, .. })
        ));
    }

    #[test]
    fn test_type_errors() {
        let registry = registry(
            "ex:Aged[ ottr:IRI ?who, xsd:integer ?age ] :: { ottr:Triple(?who, ex:age, ?age) } .",
        );
        let not_iri = expand(
            &registry,
            &call("Aged", vec![Term::string("ex:Ann"), Literal::integer(3).into()]),
            ScopeToken(0),
        )
        .unwrap_err();
        assert_eq!(
            not_iri.to_string(),
            "invalid argument \"ex:Ann\" for parameter ?who of <http://example.org#Aged>: \
             expected an IRI but got a literal"
        );

        let wrong_datatype = expand(
            &registry,
            &call("Aged", vec![ex("ann"), Term::string("12")]),
            ScopeToken(0),
        )
        .unwrap_err();
        assert!(matches!(
            wrong_datatype,
            ExpansionError::Type(TypeMismatch { reason: MismatchReason::WrongDatatype { .. }, .. })
        ));

        // blank predicate is rejected by ottr:Triple's non-blank parameter
        let blank_predicate = GroundInstance::new(
            vocab::ottr::triple(),
            vec![ex("s"), Term::blank("p"), ex("o")],
        );
        let err = expand(&registry, &blank_predicate, ScopeToken(0)).unwrap_err();
        assert!(matches!(
            err,
            ExpansionError::Type(TypeMismatch { reason: MismatchReason::BlankNotAllowed, .. })
        ));
    }

    #[test]
    fn test_expansion_over_non_list() {
        let registry = registry(
            "ex:Bad[ ?x ] :: { cross | ottr:Triple(ex:s, ex:p, ++?x) } .",
        );
        let err = expand(&registry, &call("Bad", vec![ex("a")]), ScopeToken(0)).unwrap_err();
        assert!(matches!(
            err,
            ExpansionError::Type(TypeMismatch { reason: MismatchReason::ExpectedList("IRI"), .. })
        ));
    }

    #[test]
    fn test_cross_primitive_cannot_be_called() {
        let registry = TemplateRegistry::new();
        let instance = GroundInstance::new(vocab::ottr::cross(), vec![]);
        let err = expand(&registry, &instance, ScopeToken(0)).unwrap_err();
        assert!(matches!(
            err,
            ExpansionError::Type(TypeMismatch { reason: MismatchReason::DirectCrossCall, .. })
        ));
    }

    #[test]
    fn test_cycle_detection() {
        let registry = registry(
            "ex:Loop[ ?x ] :: { ottr:Triple(?x, ex:p, ex:o), ex:Loop(?x) } .\n\
             ex:Ping[ ?x ] :: { ex:Pong(?x) } .\n\
             ex:Pong[ ?x ] :: { ex:Ping(?x) } .",
        );
        let err = expand(&registry, &call("Loop", vec![ex("a")]), ScopeToken(0)).unwrap_err();
        assert!(matches!(err, ExpansionError::Cycle { ref path, .. } if path.len() == 2));

        let err = expand(&registry, &call("Ping", vec![ex("a")]), ScopeToken(0)).unwrap_err();
        match err {
            ExpansionError::Cycle { path, .. } => assert_eq!(
                path,
                vec![
                    Iri::from_namespace(EX, "Ping"),
                    Iri::from_namespace(EX, "Pong"),
                    Iri::from_namespace(EX, "Ping"),
                ]
            ),
            other => panic!("expected a cycle, got {}", other),
        }
    }

    #[test]
    fn test_depth_limit() {
        let registry = registry(
            "ex:A[ ?x ] :: { ex:B(?x) } .\n\
             ex:B[ ?x ] :: { ex:C(?x) } .\n\
             ex:C[ ?x ] :: { ottr:Triple(?x, ex:p, ex:o) } .",
        );
        let instance = call("A", vec![ex("a")]);
        assert!(Expander::new(&registry)
            .with_max_depth(Some(3))
            .expand(&instance, ScopeToken(0))
            .is_ok());
        let err = Expander::new(&registry)
            .with_max_depth(Some(2))
            .expand(&instance, ScopeToken(0))
            .unwrap_err();
        assert!(matches!(
            err,
            ExpansionError::DepthLimit { limit: 2, template, .. } if template == Iri::from_namespace(EX, "C")
        ));
    }

    #[test]
    fn test_combine_cross_zero_length() {
        let a = vec![ex("a")];
        let empty: Vec<Term> = vec![];
        assert!(combine(ListExpander::Cross, &[a.as_slice(), empty.as_slice()]).is_empty());
        assert!(combine(ListExpander::ZipMin, &[a.as_slice(), empty.as_slice()]).is_empty());
        assert_eq!(
            combine(ListExpander::ZipMax, &[a.as_slice(), empty.as_slice()]),
            vec![vec![ex("a"), Term::None]]
        );
    }
}
