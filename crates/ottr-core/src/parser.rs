//! Parser - tokens to templates and ground instances
//!
//! A recursive-descent parser over the token stream produced by the lexer.
//! Prefixed names are resolved against a caller-owned `PrefixMap`, which
//! `@prefix` declarations update as they are read, so a map can be shared by
//! every text loaded in one run.
//!
//! ## Pipeline
//!
//! ```text
//! Template text ─ tokenize ─→ parse_templates ─→ Vec<Template>
//!                                  │
//!                       unification: ?name → Argument::Variable(index)
//!
//! Instance text ─ tokenize ─→ parse_instances ─→ Vec<GroundInstance>
//! ```
//!
//! ## Error recovery
//!
//! A parse error is recorded and the parser skips to the `.` that ends the
//! current declaration (at bracket depth zero), then carries on. All errors
//! of a text come back together. Arity is never checked here: a call may
//! reference a template that is loaded later.

use ottr_types::{vocab, Iri, Literal, Term};
use tracing::debug;

use crate::ast::*;
use crate::error::{ParseError, ParseErrorKind, SyntaxError, SyntaxErrors};
use crate::lexer::{tokenize, IriRef, LiteralTag, Token, TokenKind};
use crate::prefixes::PrefixMap;

// ============================================================================
// Public API
// ============================================================================

/// Parse template declarations (and `@prefix` lines)
pub fn parse_templates(source: &str, prefixes: &mut PrefixMap) -> Result<Vec<Template>, SyntaxErrors> {
    let tokens = tokenize(source)?;
    let mut parser = Parser::new(&tokens, prefixes);
    let templates = parser.declarations(Parser::template);
    debug!(
        templates = templates.len(),
        errors = parser.errors.len(),
        "parsed template text"
    );
    parser.finish(templates)
}

/// Parse top-level instances (and `@prefix` lines)
pub fn parse_instances(source: &str, prefixes: &mut PrefixMap) -> Result<Vec<GroundInstance>, SyntaxErrors> {
    let tokens = tokenize(source)?;
    let mut parser = Parser::new(&tokens, prefixes);
    let instances = parser.declarations(Parser::ground_instance);
    debug!(
        instances = instances.len(),
        errors = parser.errors.len(),
        "parsed instance text"
    );
    parser.finish(instances)
}

// ============================================================================
// Token cursor
// ============================================================================

struct Parser<'t, 'p> {
    tokens: &'t [Token],
    pos: usize,
    prefixes: &'p mut PrefixMap,
    errors: Vec<ParseError>,
}

impl<'t, 'p> Parser<'t, 'p> {
    fn new(tokens: &'t [Token], prefixes: &'p mut PrefixMap) -> Self {
        Self {
            tokens,
            pos: 0,
            prefixes,
            errors: Vec::new(),
        }
    }

    fn finish<T>(self, items: Vec<T>) -> Result<Vec<T>, SyntaxErrors> {
        if self.errors.is_empty() {
            Ok(items)
        } else {
            Err(SyntaxErrors(
                self.errors.into_iter().map(SyntaxError::Parse).collect(),
            ))
        }
    }

    /// Token at `pos + n`; the trailing `Eof` repeats forever
    fn token_at(&self, n: usize) -> &'t Token {
        let tokens: &'t [Token] = self.tokens;
        &tokens[(self.pos + n).min(tokens.len().saturating_sub(1))]
    }

    fn cur(&self) -> &'t Token {
        self.token_at(0)
    }

    fn peek(&self) -> &'t TokenKind {
        &self.cur().kind
    }

    fn peek_at(&self, n: usize) -> &'t TokenKind {
        &self.token_at(n).kind
    }

    fn advance(&mut self) -> &'t Token {
        let token = self.cur();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn prev_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].span
    }

    fn at(&self, kind: &TokenKind) -> bool {
        self.peek() == kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Span, ParseError> {
        if self.at(&kind) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.cur();
        ParseError::at(
            ParseErrorKind::UnexpectedToken {
                expected: expected.to_string(),
                found: token.kind.describe(),
            },
            token.span,
        )
    }

    // ========================================================================
    // Declarations and recovery
    // ========================================================================

    fn declarations<T>(&mut self, item: fn(&mut Self) -> Result<T, ParseError>) -> Vec<T> {
        let mut items = Vec::new();
        while !self.at(&TokenKind::Eof) {
            let start = self.pos;
            let result = if self.at(&TokenKind::PrefixKeyword) {
                self.prefix_declaration().map(|_| None)
            } else {
                item(self).map(Some)
            };
            match result {
                Ok(Some(parsed)) => items.push(parsed),
                Ok(None) => {}
                Err(e) => {
                    debug!(error = %e, "skipping malformed declaration");
                    self.errors.push(e);
                    self.recover(start);
                }
            }
        }
        items
    }

    /// Skip from the start of a failed declaration past its closing `.`
    fn recover(&mut self, start: usize) {
        self.pos = start;
        let mut depth: i32 = 0;
        loop {
            match self.advance().kind {
                TokenKind::Eof => return,
                TokenKind::LBracket | TokenKind::LParen | TokenKind::LBrace => depth += 1,
                TokenKind::RBracket | TokenKind::RParen | TokenKind::RBrace => depth -= 1,
                TokenKind::Dot if depth <= 0 => return,
                _ => {}
            }
            if self.at(&TokenKind::PrefixKeyword) {
                return;
            }
        }
    }

    fn prefix_declaration(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::PrefixKeyword, "'@prefix'")?;

        let token = self.advance();
        let prefix = match &token.kind {
            TokenKind::Iri(IriRef::Prefixed { prefix, local }) if local.is_empty() => prefix.clone(),
            other => {
                return Err(ParseError::at(
                    ParseErrorKind::UnexpectedToken {
                        expected: "a prefix name such as 'ex:'".to_string(),
                        found: other.describe(),
                    },
                    token.span,
                ))
            }
        };

        let token = self.advance();
        let namespace = match &token.kind {
            TokenKind::Iri(IriRef::Full(ns)) => ns.clone(),
            other => {
                return Err(ParseError::at(
                    ParseErrorKind::UnexpectedToken {
                        expected: "a namespace IRI".to_string(),
                        found: other.describe(),
                    },
                    token.span,
                ))
            }
        };

        self.expect(TokenKind::Dot, "'.'")?;
        debug!(prefix = %prefix, namespace = %namespace, "bound prefix");
        self.prefixes.bind(prefix, namespace);
        Ok(())
    }

    // ========================================================================
    // Templates
    // ========================================================================

    fn template(&mut self) -> Result<Template, ParseError> {
        let (iri, start) = self.iri("a template IRI")?;
        self.expect(TokenKind::LBracket, "'['")?;
        let parameters = self.parameters()?;
        self.expect(TokenKind::DoubleColon, "'::'")?;
        self.expect(TokenKind::LBrace, "'{'")?;

        let mut body = Vec::new();
        while !self.at(&TokenKind::RBrace) {
            body.push(self.body_instance(&parameters)?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "'}' or ','")?;
        let end = self.expect(TokenKind::Dot, "'.'")?;

        Ok(Template {
            iri,
            parameters,
            body: TemplateBody::Instances(body),
            span: start.to(end),
        })
    }

    fn parameters(&mut self) -> Result<Vec<Parameter>, ParseError> {
        let mut params: Vec<Parameter> = Vec::new();
        while !self.at(&TokenKind::RBracket) {
            let param = self.parameter(params.len())?;
            if params.iter().any(|p| p.name == param.name) {
                return Err(ParseError::at(
                    ParseErrorKind::DuplicateParameter(param.name),
                    param.span,
                ));
            }
            params.push(param);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBracket, "']' or ','")?;
        Ok(params)
    }

    fn parameter(&mut self, index: usize) -> Result<Parameter, ParseError> {
        let start = self.cur().span;
        let mut non_blank = false;
        let mut optional = false;
        loop {
            match self.peek() {
                TokenKind::Bang if !non_blank => non_blank = true,
                TokenKind::Question if !optional => optional = true,
                TokenKind::Bang | TokenKind::Question => {
                    return Err(ParseError::at(
                        ParseErrorKind::MalformedParameter("repeated modifier".to_string()),
                        self.cur().span,
                    ))
                }
                _ => break,
            }
            self.advance();
        }

        let ty = match self.peek() {
            TokenKind::Iri(_) | TokenKind::ListType | TokenKind::NeListType => self.param_type()?,
            _ => ParamType::Resource,
        };

        let token = self.advance();
        let name = match &token.kind {
            TokenKind::Variable(name) => name.clone(),
            other => {
                return Err(ParseError::at(
                    ParseErrorKind::MalformedParameter(format!(
                        "expected a parameter variable, found {}",
                        other.describe()
                    )),
                    token.span,
                ))
            }
        };
        let mut end = token.span;

        let default = if self.eat(&TokenKind::Equals) {
            let value_span = self.cur().span;
            let value = self.constant().map_err(|e| match e.kind {
                ParseErrorKind::NotGround(_) => ParseError::at(
                    ParseErrorKind::MalformedParameter(
                        "default value must be a constant term".to_string(),
                    ),
                    value_span,
                ),
                _ => e,
            })?;
            end = self.prev_span();
            Some(value)
        } else {
            None
        };

        Ok(Parameter {
            name,
            index,
            ty,
            non_blank,
            optional,
            default,
            span: start.to(end),
        })
    }

    fn param_type(&mut self) -> Result<ParamType, ParseError> {
        let token = self.advance();
        match &token.kind {
            TokenKind::ListType | TokenKind::NeListType => {
                let inner = Box::new(self.param_type()?);
                self.expect(TokenKind::RAngle, "'>'")?;
                if token.kind == TokenKind::ListType {
                    Ok(ParamType::List(inner))
                } else {
                    Ok(ParamType::NeList(inner))
                }
            }
            TokenKind::Iri(iri_ref) => {
                let iri = self.resolve_iri(iri_ref, token.span)?;
                ParamType::from_iri(&iri).ok_or_else(|| {
                    ParseError::at(
                        ParseErrorKind::MalformedParameter(format!("unknown parameter type {}", iri)),
                        token.span,
                    )
                })
            }
            other => Err(ParseError::at(
                ParseErrorKind::MalformedParameter(format!(
                    "expected a type, found {}",
                    other.describe()
                )),
                token.span,
            )),
        }
    }

    fn body_instance(&mut self, scope: &[Parameter]) -> Result<Instance, ParseError> {
        let start = self.cur().span;

        let expander = match (self.peek(), self.peek_at(1)) {
            (TokenKind::Word(word), TokenKind::Pipe) => {
                let mode = ListExpander::from_keyword(word).ok_or_else(|| {
                    ParseError::at(
                        ParseErrorKind::UnexpectedToken {
                            expected: "'cross', 'zipMin' or 'zipMax'".to_string(),
                            found: format!("'{}'", word),
                        },
                        start,
                    )
                })?;
                self.advance();
                self.advance();
                Some(mode)
            }
            _ => None,
        };

        let (template, _) = self.iri("a template IRI")?;
        self.expect(TokenKind::LParen, "'('")?;
        let mut arguments = Vec::new();
        while !self.at(&TokenKind::RParen) {
            arguments.push(self.argument(scope)?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        let end = self.expect(TokenKind::RParen, "')' or ','")?;

        let has_expansion = arguments.iter().any(Argument::is_expand);
        match expander {
            Some(mode) if !has_expansion => {
                return Err(ParseError::at(
                    ParseErrorKind::MissingListExpansion(mode.keyword().to_string()),
                    start,
                ))
            }
            None if has_expansion => {
                return Err(ParseError::at(ParseErrorKind::ExpansionWithoutMode, start))
            }
            _ => {}
        }

        Ok(Instance {
            template,
            arguments,
            expander,
            span: start.to(end),
        })
    }

    fn argument(&mut self, scope: &[Parameter]) -> Result<Argument, ParseError> {
        if self.eat(&TokenKind::PlusPlus) {
            Ok(Argument::Expand(Box::new(self.term(Some(scope))?)))
        } else {
            self.term(Some(scope))
        }
    }

    // ========================================================================
    // Ground instances
    // ========================================================================

    fn ground_instance(&mut self) -> Result<GroundInstance, ParseError> {
        let (template, start) = self.iri("a template IRI")?;
        self.expect(TokenKind::LParen, "'('")?;
        let mut arguments = Vec::new();
        while !self.at(&TokenKind::RParen) {
            arguments.push(self.constant()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen, "')' or ','")?;
        let end = self.expect(TokenKind::Dot, "'.'")?;

        Ok(GroundInstance {
            template,
            arguments,
            span: start.to(end),
        })
    }

    // ========================================================================
    // Terms
    // ========================================================================

    /// A term with no variables and no `++`
    fn constant(&mut self) -> Result<Term, ParseError> {
        let span = self.cur().span;
        if self.at(&TokenKind::PlusPlus) {
            return Err(ParseError::at(ParseErrorKind::NotGround("'++'"), span));
        }
        let arg = self.term(None)?;
        into_constant(arg).ok_or_else(|| ParseError::at(ParseErrorKind::NotGround("a variable"), span))
    }

    /// `scope` is the enclosing template's parameters; `None` outside templates
    fn term(&mut self, scope: Option<&[Parameter]>) -> Result<Argument, ParseError> {
        let token = self.advance();
        let span = token.span;
        match &token.kind {
            TokenKind::Iri(iri_ref) => {
                let iri = self.resolve_iri(iri_ref, span)?;
                if iri == vocab::ottr::none() {
                    Ok(Argument::Concrete(Term::None))
                } else {
                    Ok(Argument::Concrete(Term::Iri(iri)))
                }
            }
            TokenKind::BlankNode(label) => Ok(Argument::Concrete(Term::blank(label.clone()))),
            TokenKind::Literal { lexical, tag } => {
                let literal = self.literal(lexical, tag.as_ref(), span)?;
                Ok(Argument::Concrete(Term::Literal(literal)))
            }
            TokenKind::Integer(n) => Ok(Argument::Concrete(
                Literal::typed(n.clone(), vocab::xsd::integer()).into(),
            )),
            TokenKind::Decimal(n) => Ok(Argument::Concrete(
                Literal::typed(n.clone(), vocab::xsd::decimal()).into(),
            )),
            TokenKind::Word(word) => match word.as_str() {
                "none" => Ok(Argument::Concrete(Term::None)),
                "true" => Ok(Argument::Concrete(Literal::boolean(true).into())),
                "false" => Ok(Argument::Concrete(Literal::boolean(false).into())),
                _ => Err(ParseError::at(
                    ParseErrorKind::UnexpectedToken {
                        expected: "a term".to_string(),
                        found: token.kind.describe(),
                    },
                    span,
                )),
            },
            TokenKind::Variable(name) => match scope {
                Some(params) => params
                    .iter()
                    .find(|p| &p.name == name)
                    .map(|p| Argument::Variable(p.index))
                    .ok_or_else(|| ParseError::at(ParseErrorKind::UndeclaredVariable(name.clone()), span)),
                None => Err(ParseError::at(ParseErrorKind::NotGround("a variable"), span)),
            },
            TokenKind::LParen => {
                let mut items = Vec::new();
                while !self.at(&TokenKind::RParen) {
                    items.push(self.term(scope)?);
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(TokenKind::RParen, "')' or ','")?;
                Ok(list_argument(items))
            }
            other => Err(ParseError::at(
                ParseErrorKind::UnexpectedToken {
                    expected: "a term".to_string(),
                    found: other.describe(),
                },
                span,
            )),
        }
    }

    fn literal(&self, lexical: &str, tag: Option<&LiteralTag>, span: Span) -> Result<Literal, ParseError> {
        match tag {
            None => Ok(Literal::string(lexical)),
            Some(LiteralTag::Language(lang)) => Literal::lang(lexical, lang.as_str())
                .map_err(|e| ParseError::at(ParseErrorKind::InvalidTerm(e.to_string()), span)),
            Some(LiteralTag::Datatype(datatype)) => {
                let datatype = self.resolve_iri(datatype, span)?;
                Ok(Literal::typed(lexical, datatype))
            }
        }
    }

    fn iri(&mut self, expected: &str) -> Result<(Iri, Span), ParseError> {
        let token = self.cur();
        match &token.kind {
            TokenKind::Iri(iri_ref) => {
                let iri = self.resolve_iri(iri_ref, token.span)?;
                self.advance();
                Ok((iri, token.span))
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn resolve_iri(&self, iri: &IriRef, span: Span) -> Result<Iri, ParseError> {
        match iri {
            IriRef::Full(iri) => Iri::parse(iri.as_str())
                .map_err(|e| ParseError::at(ParseErrorKind::InvalidTerm(e.to_string()), span)),
            IriRef::Prefixed { prefix, local } => self
                .prefixes
                .resolve(prefix, local)
                .ok_or_else(|| ParseError::at(ParseErrorKind::UnresolvedPrefix(prefix.clone()), span)),
        }
    }
}

/// Fold a list whose members are all constant into a single list term
fn list_argument(items: Vec<Argument>) -> Argument {
    if items.iter().all(|a| matches!(a, Argument::Concrete(_))) {
        Argument::Concrete(Term::List(items.into_iter().filter_map(into_constant).collect()))
    } else {
        Argument::List(items)
    }
}

fn into_constant(arg: Argument) -> Option<Term> {
    match arg {
        Argument::Concrete(term) => Some(term),
        Argument::List(items) => items
            .into_iter()
            .map(into_constant)
            .collect::<Option<Vec<_>>>()
            .map(Term::List),
        Argument::Variable(_) | Argument::Expand(_) => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LexErrorKind;
    use pretty_assertions::assert_eq;

    const EX: &str = "http://example.org#";

    fn ex(local: &str) -> Iri {
        Iri::from_namespace(EX, local)
    }

    fn templates(source: &str) -> Vec<Template> {
        let mut prefixes = PrefixMap::with_defaults();
        prefixes.bind("ex", EX);
        parse_templates(source, &mut prefixes).unwrap()
    }

    fn template_errors(source: &str) -> Vec<SyntaxError> {
        let mut prefixes = PrefixMap::with_defaults();
        prefixes.bind("ex", EX);
        parse_templates(source, &mut prefixes).unwrap_err().0
    }

    fn parse_kind(err: &SyntaxError) -> &ParseErrorKind {
        match err {
            SyntaxError::Parse(e) => &e.kind,
            SyntaxError::Lex(e) => panic!("unexpected lex error {}", e),
        }
    }

    #[test]
    fn test_parse_simple_template() {
        let parsed = templates(
            "@prefix ex: <http://example.org#> .\n\
             ex:Person0[ ?name, ?email ] :: {\n\
               ottr:Triple(?name, ex:hasEmail, ?email)\n\
             } .",
        );
        assert_eq!(parsed.len(), 1);
        let t = &parsed[0];
        assert_eq!(t.iri, ex("Person0"));
        assert_eq!(t.parameters.len(), 2);
        assert_eq!(t.parameters[1].name, "email");
        assert_eq!(t.parameters[1].index, 1);
        assert_eq!(
            t.instances(),
            &[Instance {
                template: vocab::ottr::triple(),
                arguments: vec![
                    Argument::Variable(0),
                    Argument::Concrete(Term::Iri(ex("hasEmail"))),
                    Argument::Variable(1),
                ],
                expander: None,
                span: t.instances()[0].span,
            }]
        );
        assert_eq!(t.span.line, 2);
    }

    #[test]
    fn test_parameter_modifiers_types_and_defaults() {
        let parsed = templates(
            "ex:T[ ! ? ottr:IRI ?a, ?! xsd:string ?b = \"x\", List<ottr:IRI> ?c, ?d = ex:Unknown ] :: { } .",
        );
        let p = &parsed[0].parameters;
        assert!(p[0].non_blank && p[0].optional);
        assert_eq!(p[0].ty, ParamType::Iri);
        assert!(p[1].non_blank && p[1].optional);
        assert_eq!(p[1].ty, ParamType::Datatype(vocab::xsd::string()));
        assert_eq!(p[1].default, Some(Term::string("x")));
        assert_eq!(p[2].ty, ParamType::List(Box::new(ParamType::Iri)));
        assert_eq!(p[3].ty, ParamType::Resource);
        assert_eq!(p[3].default, Some(Term::Iri(ex("Unknown"))));
    }

    #[test]
    fn test_expansion_modes() {
        let parsed = templates(
            "ex:T[ ?s, List<ottr:IRI> ?items ] :: {\n\
               cross | ottr:Triple(?s, ex:has, ++?items),\n\
               zipMax | ottr:Triple(?s, ++(ex:a, ?s), ++?items),\n\
             } .",
        );
        let body = parsed[0].instances();
        assert_eq!(body.len(), 2);
        assert_eq!(body[0].expander, Some(ListExpander::Cross));
        assert_eq!(body[0].arguments[2], Argument::Expand(Box::new(Argument::Variable(1))));
        assert_eq!(body[1].expander, Some(ListExpander::ZipMax));
        assert_eq!(
            body[1].arguments[1],
            Argument::Expand(Box::new(Argument::List(vec![
                Argument::Concrete(Term::Iri(ex("a"))),
                Argument::Variable(0),
            ])))
        );
    }

    #[test]
    fn test_constant_list_is_folded() {
        let parsed = templates("ex:T[ ?s ] :: { ex:U(?s, (1, \"two\", none)) } .");
        assert_eq!(
            parsed[0].instances()[0].arguments[1],
            Argument::Concrete(Term::List(vec![
                Literal::integer(1).into(),
                Term::string("two"),
                Term::None,
            ]))
        );
    }

    #[test]
    fn test_undeclared_variable() {
        let errors = template_errors("ex:T[ ?a ] :: { ottr:Triple(?a, ex:p, ?b) } .");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            parse_kind(&errors[0]),
            &ParseErrorKind::UndeclaredVariable("b".to_string())
        );
    }

    #[test]
    fn test_duplicate_parameter() {
        let errors = template_errors("ex:T[ ?a, ?a ] :: { } .");
        assert_eq!(
            parse_kind(&errors[0]),
            &ParseErrorKind::DuplicateParameter("a".to_string())
        );
    }

    #[test]
    fn test_unresolved_prefix() {
        let errors = template_errors("nope:T[ ?a ] :: { } .");
        assert_eq!(
            parse_kind(&errors[0]),
            &ParseErrorKind::UnresolvedPrefix("nope".to_string())
        );
    }

    #[test]
    fn test_malformed_parameters() {
        let errors = template_errors(
            "ex:A[ ex:NotAType ?a ] :: { } .\n\
             ex:B[ ?a = ?b ] :: { } .\n\
             ex:C[ ! ! ?a ] :: { } .\n\
             ex:D[ ottr:IRI ] :: { } .",
        );
        assert_eq!(errors.len(), 4);
        for e in &errors {
            assert!(matches!(
                parse_kind(e),
                ParseErrorKind::MalformedParameter(_)
            ));
        }
        assert_eq!(errors[1].location().line, 2);
    }

    #[test]
    fn test_expansion_mode_checks() {
        let errors = template_errors(
            "ex:A[ ?a ] :: { cross | ottr:Triple(?a, ex:p, ?a) } .\n\
             ex:B[ ?a ] :: { ottr:Triple(?a, ex:p, ++?a) } .\n\
             ex:C[ ?a ] :: { sideways | ottr:Triple(?a, ex:p, ++?a) } .",
        );
        assert_eq!(
            parse_kind(&errors[0]),
            &ParseErrorKind::MissingListExpansion("cross".to_string())
        );
        assert_eq!(parse_kind(&errors[1]), &ParseErrorKind::ExpansionWithoutMode);
        assert!(matches!(
            parse_kind(&errors[2]),
            ParseErrorKind::UnexpectedToken { .. }
        ));
    }

    #[test]
    fn test_recovery_collects_all_errors() {
        let mut prefixes = PrefixMap::with_defaults();
        prefixes.bind("ex", EX);
        let source = "ex:Bad1[ ?a ] :: { ottr:Triple(?a, ex:p, ?zz) } .\n\
                      ex:Good[ ?a ] :: { ottr:Triple(?a, ex:p, ex:o) } .\n\
                      ex:Bad2[ ?a ?b ] :: { } .\n";
        let errors = parse_templates(source, &mut prefixes).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.0[0].location().line, 1);
        assert_eq!(errors.0[1].location().line, 3);
    }

    #[test]
    fn test_lex_error_rejects_text() {
        let errors = template_errors("ex:T[ ?a ] :: { ex:U(\"open) } .");
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            SyntaxError::Lex(e) if e.kind == LexErrorKind::UnterminatedLiteral
        ));
    }

    #[test]
    fn test_parse_instances() {
        let mut prefixes = PrefixMap::with_defaults();
        let instances = parse_instances(
            "@prefix ex: <http://example.org#> .\n\
             ex:Person(ex:alice, \"Alice\"@en, (\"a@ex.org\", \"b@ex.org\"), none, 3, true) .\n\
             ex:Person(_:x, ottr:none) .",
            &mut prefixes,
        )
        .unwrap();
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].template, ex("Person"));
        assert_eq!(
            instances[0].arguments,
            vec![
                Term::Iri(ex("alice")),
                Literal::lang("Alice", "en").unwrap().into(),
                Term::List(vec![Term::string("a@ex.org"), Term::string("b@ex.org")]),
                Term::None,
                Literal::integer(3).into(),
                Literal::boolean(true).into(),
            ]
        );
        assert_eq!(instances[1].arguments, vec![Term::blank("x"), Term::None]);
        assert_eq!(instances[1].span.line, 3);
        assert_eq!(prefixes.namespace("ex"), Some(EX));
    }

    #[test]
    fn test_instances_must_be_ground() {
        let mut prefixes = PrefixMap::with_defaults();
        prefixes.bind("ex", EX);
        let errors = parse_instances("ex:T(?x) .\nex:T(++(ex:a)) .\nex:T(ex:a) .", &mut prefixes)
            .unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(parse_kind(&errors.0[0]), &ParseErrorKind::NotGround("a variable"));
        assert_eq!(parse_kind(&errors.0[1]), &ParseErrorKind::NotGround("'++'"));
    }

    #[test]
    fn test_missing_dot_is_reported() {
        let mut prefixes = PrefixMap::with_defaults();
        prefixes.bind("ex", EX);
        let errors = parse_instances("ex:T(ex:a)", &mut prefixes).unwrap_err();
        assert!(matches!(
            parse_kind(&errors.0[0]),
            ParseErrorKind::UnexpectedToken { expected, found } if expected == "'.'" && found == "end of input"
        ));
    }
}
