//! Argument validation against declared parameters
//!
//! Blank nodes count as `ottr:IRI` values; only the `!` modifier keeps them
//! out. `none` is handled before any type is looked at.

use ottr_core::{ParamType, Parameter};
use ottr_types::Term;

use crate::error::MismatchReason;

/// Check a bound value (defaults already applied) against its parameter
pub fn check_value(param: &Parameter, value: &Term) -> Result<(), MismatchReason> {
    if value.is_none() {
        return if param.optional {
            Ok(())
        } else {
            Err(MismatchReason::NoneNotAllowed)
        };
    }
    if param.non_blank && contains_blank(value) {
        return Err(MismatchReason::BlankNotAllowed);
    }
    check_type(&param.ty, value)
}

/// Type membership only
pub fn check_type(ty: &ParamType, value: &Term) -> Result<(), MismatchReason> {
    match (ty, value) {
        (ParamType::List(inner), Term::List(items)) => check_members(inner, items),
        (ParamType::NeList(inner), Term::List(items)) => {
            if items.is_empty() {
                Err(MismatchReason::EmptyList)
            } else {
                check_members(inner, items)
            }
        }
        (ParamType::List(_) | ParamType::NeList(_), other) => {
            Err(MismatchReason::ExpectedList(other.kind_name()))
        }
        (_, Term::List(_)) => Err(MismatchReason::UnexpectedList),
        (ParamType::Resource, _) => Ok(()),
        (ParamType::Iri, Term::Iri(_) | Term::BlankNode(_)) => Ok(()),
        (ParamType::Iri, other) => Err(MismatchReason::ExpectedIri(other.kind_name())),
        (ParamType::Literal, Term::Literal(_)) => Ok(()),
        (ParamType::Literal, other) => Err(MismatchReason::ExpectedLiteral(other.kind_name())),
        (ParamType::Datatype(expected), Term::Literal(lit)) => {
            if &lit.datatype == expected {
                Ok(())
            } else {
                Err(MismatchReason::WrongDatatype {
                    expected: expected.clone(),
                    found: lit.datatype.clone(),
                })
            }
        }
        (ParamType::Datatype(_), other) => Err(MismatchReason::ExpectedLiteral(other.kind_name())),
    }
}

fn check_members(inner: &ParamType, items: &[Term]) -> Result<(), MismatchReason> {
    items
        .iter()
        .filter(|item| !item.is_none())
        .try_for_each(|item| check_type(inner, item))
}

fn contains_blank(value: &Term) -> bool {
    match value {
        Term::BlankNode(_) => true,
        Term::List(items) => items.iter().any(contains_blank),
        _ => false,
    }
}
