//! Lexer - stOTTR text to position-tagged tokens
//!
//! Built from nom combinators over a `nom_locate` span so every token knows
//! its byte range, line and column. The lexer never resolves prefixes; a
//! prefixed name stays `IriRef::Prefixed` until the parser looks it up.
//!
//! ## Pipeline
//!
//! ```text
//! Source → tokenize() → Vec<Token> (ends with Eof) → parser
//! ```
//!
//! The first error stops lexing and rejects the whole text.

use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, tag, take, take_while},
    character::complete::{alpha1, alphanumeric1, char, digit1, multispace1, none_of, not_line_ending, one_of},
    combinator::{map, opt, recognize, value},
    multi::many0_count,
    sequence::{delimited, pair, preceded, tuple},
    IResult, Slice,
};
use nom_locate::LocatedSpan;
use std::fmt;

use crate::ast::Span;
use crate::error::{LexError, LexErrorKind};

pub type Input<'a> = LocatedSpan<&'a str>;

// ============================================================================
// Tokens
// ============================================================================

/// An IRI as written: `<full>` or `prefix:local`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IriRef {
    Full(String),
    Prefixed { prefix: String, local: String },
}

impl fmt::Display for IriRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IriRef::Full(iri) => write!(f, "<{}>", iri),
            IriRef::Prefixed { prefix, local } => write!(f, "{}:{}", prefix, local),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralTag {
    Language(String),
    Datatype(IriRef),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    PrefixKeyword,
    Iri(IriRef),
    BlankNode(String),
    Literal {
        lexical: String,
        tag: Option<LiteralTag>,
    },
    Integer(String),
    Decimal(String),
    Variable(String),
    /// Bare word: `none`, `true`, `false`, `cross`, `zipMin`, `zipMax`, ...
    Word(String),
    /// `List<`
    ListType,
    /// `NEList<`
    NeListType,
    LBracket,
    RBracket,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Dot,
    DoubleColon,
    Pipe,
    Equals,
    Bang,
    Question,
    RAngle,
    PlusPlus,
    Eof,
}

impl TokenKind {
    /// Short description for "expected X, found Y" messages
    pub fn describe(&self) -> String {
        match self {
            TokenKind::PrefixKeyword => "'@prefix'".to_string(),
            TokenKind::Iri(iri) => format!("IRI {}", iri),
            TokenKind::BlankNode(label) => format!("blank node _:{}", label),
            TokenKind::Literal { lexical, .. } => format!("literal \"{}\"", lexical),
            TokenKind::Integer(n) | TokenKind::Decimal(n) => format!("number {}", n),
            TokenKind::Variable(name) => format!("variable ?{}", name),
            TokenKind::Word(w) => format!("'{}'", w),
            TokenKind::ListType => "'List<'".to_string(),
            TokenKind::NeListType => "'NEList<'".to_string(),
            TokenKind::LBracket => "'['".to_string(),
            TokenKind::RBracket => "']'".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::LBrace => "'{'".to_string(),
            TokenKind::RBrace => "'}'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Dot => "'.'".to_string(),
            TokenKind::DoubleColon => "'::'".to_string(),
            TokenKind::Pipe => "'|'".to_string(),
            TokenKind::Equals => "'='".to_string(),
            TokenKind::Bang => "'!'".to_string(),
            TokenKind::Question => "'?'".to_string(),
            TokenKind::RAngle => "'>'".to_string(),
            TokenKind::PlusPlus => "'++'".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

// ============================================================================
// Public API
// ============================================================================

/// Tokenize template or instance text; the last token is always `Eof`
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut input = Input::new(source);
    let mut tokens = Vec::new();

    loop {
        input = skip_trivia(input);
        if input.fragment().is_empty() {
            tokens.push(Token {
                kind: TokenKind::Eof,
                span: span_between(&input, &input),
            });
            break;
        }
        let (rest, kind) = next_token(input)?;
        tokens.push(Token {
            kind,
            span: span_between(&input, &rest),
        });
        input = rest;
    }

    Ok(tokens)
}

// ============================================================================
// Dispatch
// ============================================================================

fn next_token(input: Input) -> Result<(Input, TokenKind), LexError> {
    let mut chars = input.fragment().chars();
    let first = chars.next().unwrap_or(' ');
    let second = chars.next();

    let result = match first {
        '"' => return literal(input),
        '<' => {
            return map(iri_ref, |iri| TokenKind::Iri(IriRef::Full(iri)))(input)
                .map_err(|_| lex_error(LexErrorKind::UnterminatedIri, &input))
        }
        '@' => prefix_keyword(input),
        '?' => variable_or_question(input),
        '_' if second == Some(':') => blank_node(input),
        '+' | '-' if second.is_some_and(|c| c.is_ascii_digit()) => number(input),
        c if c.is_ascii_digit() => number(input),
        ':' if second != Some(':') => word_or_prefixed_name(input),
        c if c.is_alphabetic() || c == '_' => word_or_prefixed_name(input),
        _ => punctuation(input),
    };

    result.map_err(|_| lex_error(LexErrorKind::UnexpectedChar(first), &input))
}

fn skip_trivia(input: Input) -> Input {
    let trivia: IResult<Input, usize> = many0_count(alt((
        value((), multispace1),
        value((), pair(char('#'), not_line_ending)),
    )))(input);
    match trivia {
        Ok((rest, _)) => rest,
        Err(_) => input,
    }
}

fn lex_error(kind: LexErrorKind, at: &Input) -> LexError {
    LexError {
        kind,
        line: at.location_line(),
        column: at.get_utf8_column() as u32,
        offset: at.location_offset(),
    }
}

fn span_between(start: &Input, end: &Input) -> Span {
    Span::new(
        start.location_offset(),
        end.location_offset(),
        start.location_line(),
        start.get_utf8_column() as u32,
    )
}

// ============================================================================
// Names
// ============================================================================

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Byte length of the name at the start of `s`; a trailing `.` ends a statement
fn name_len(s: &str) -> usize {
    let len: usize = s
        .chars()
        .take_while(|c| is_name_char(*c))
        .map(char::len_utf8)
        .sum();
    s[..len].trim_end_matches('.').len()
}

fn name(input: Input) -> IResult<Input, Input> {
    let len = name_len(input.fragment());
    take(len)(input)
}

fn prefixed_name(input: Input) -> IResult<Input, IriRef> {
    let (input, prefix) = name(input)?;
    let (input, _) = char(':')(input)?;
    let (input, local) = name(input)?;
    Ok((
        input,
        IriRef::Prefixed {
            prefix: prefix.fragment().to_string(),
            local: local.fragment().to_string(),
        },
    ))
}

fn word_or_prefixed_name(input: Input) -> IResult<Input, TokenKind> {
    let (rest, head) = name(input)?;
    let after = rest.fragment();

    if after.starts_with(':') && !after.starts_with("::") {
        return map(prefixed_name, TokenKind::Iri)(input);
    }
    if head.fragment().is_empty() {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Alpha,
        )));
    }
    if after.starts_with('<') {
        match *head.fragment() {
            "List" => return Ok((rest.slice(1..), TokenKind::ListType)),
            "NEList" => return Ok((rest.slice(1..), TokenKind::NeListType)),
            _ => {}
        }
    }
    Ok((rest, TokenKind::Word(head.fragment().to_string())))
}

fn variable_or_question(input: Input) -> IResult<Input, TokenKind> {
    let (rest, _) = char('?')(input)?;
    let (after, var) = name(rest)?;
    if var.fragment().is_empty() {
        Ok((rest, TokenKind::Question))
    } else {
        Ok((after, TokenKind::Variable(var.fragment().to_string())))
    }
}

fn blank_node(input: Input) -> IResult<Input, TokenKind> {
    let (rest, _) = tag("_:")(input)?;
    let (rest, label) = name(rest)?;
    if label.fragment().is_empty() {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Alpha,
        )));
    }
    Ok((rest, TokenKind::BlankNode(label.fragment().to_string())))
}

fn prefix_keyword(input: Input) -> IResult<Input, TokenKind> {
    let (rest, _) = tag("@prefix")(input)?;
    if rest.fragment().starts_with(is_name_char) {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Tag,
        )));
    }
    Ok((rest, TokenKind::PrefixKeyword))
}

// ============================================================================
// IRIs
// ============================================================================

fn iri_ref(input: Input) -> IResult<Input, String> {
    let (input, body) = delimited(
        char('<'),
        take_while(|c: char| {
            !c.is_whitespace() && !matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
        }),
        char('>'),
    )(input)?;
    Ok((input, body.fragment().to_string()))
}

// ============================================================================
// Literals
// ============================================================================

fn string_body(input: Input) -> IResult<Input, String> {
    delimited(
        char('"'),
        map(
            opt(escaped_transform(
                none_of("\"\\\n\r"),
                '\\',
                alt((
                    value('\n', char('n')),
                    value('\r', char('r')),
                    value('\t', char('t')),
                    value('\\', char('\\')),
                    value('"', char('"')),
                )),
            )),
            Option::unwrap_or_default,
        ),
        char('"'),
    )(input)
}

fn language_tag(input: Input) -> IResult<Input, String> {
    let (input, lang) = preceded(
        char('@'),
        recognize(pair(alpha1, many0_count(pair(char('-'), alphanumeric1)))),
    )(input)?;
    Ok((input, lang.fragment().to_string()))
}

fn datatype_tag(input: Input) -> IResult<Input, IriRef> {
    preceded(
        tag("^^"),
        alt((map(iri_ref, IriRef::Full), prefixed_name)),
    )(input)
}

/// Does the text after an opening quote close it on the same line?
fn closes_on_line(s: &str) -> bool {
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '"' => return true,
            '\n' | '\r' => return false,
            _ => {}
        }
    }
    false
}

fn literal(input: Input) -> Result<(Input, TokenKind), LexError> {
    let (rest, lexical) = match string_body(input) {
        Ok(ok) => ok,
        Err(_) => {
            let kind = if closes_on_line(&input.fragment()[1..]) {
                LexErrorKind::InvalidEscape
            } else {
                LexErrorKind::UnterminatedLiteral
            };
            return Err(lex_error(kind, &input));
        }
    };

    if rest.fragment().starts_with('@') {
        let (rest, lang) = language_tag(rest)
            .map_err(|_| lex_error(LexErrorKind::UnexpectedChar('@'), &rest))?;
        return Ok((
            rest,
            TokenKind::Literal {
                lexical,
                tag: Some(LiteralTag::Language(lang)),
            },
        ));
    }

    if rest.fragment().starts_with("^^") {
        let (rest, datatype) = datatype_tag(rest)
            .map_err(|_| lex_error(LexErrorKind::UnexpectedChar('^'), &rest))?;
        return Ok((
            rest,
            TokenKind::Literal {
                lexical,
                tag: Some(LiteralTag::Datatype(datatype)),
            },
        ));
    }

    Ok((rest, TokenKind::Literal { lexical, tag: None }))
}

fn number(input: Input) -> IResult<Input, TokenKind> {
    let (rest, text) = recognize(tuple((
        opt(one_of("+-")),
        digit1,
        opt(pair(char('.'), digit1)),
    )))(input)?;
    let text = text.fragment().to_string();
    if text.contains('.') {
        Ok((rest, TokenKind::Decimal(text)))
    } else {
        Ok((rest, TokenKind::Integer(text)))
    }
}

// ============================================================================
// Punctuation
// ============================================================================

fn punctuation(input: Input) -> IResult<Input, TokenKind> {
    alt((
        value(TokenKind::DoubleColon, tag("::")),
        value(TokenKind::PlusPlus, tag("++")),
        value(TokenKind::LBracket, char('[')),
        value(TokenKind::RBracket, char(']')),
        value(TokenKind::LParen, char('(')),
        value(TokenKind::RParen, char(')')),
        value(TokenKind::LBrace, char('{')),
        value(TokenKind::RBrace, char('}')),
        value(TokenKind::Comma, char(',')),
        value(TokenKind::Dot, char('.')),
        value(TokenKind::Pipe, char('|')),
        value(TokenKind::Equals, char('=')),
        value(TokenKind::Bang, char('!')),
        value(TokenKind::RAngle, char('>')),
    ))(input)
}

// ============================================================================
// Tests
// ============================================================================
