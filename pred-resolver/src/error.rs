use crate::ground::ValueType;
use thiserror::Error;

/// Errors reported by predicate construction and resolution.
///
/// A failed unification is not an error: it silently ends the branch
/// being evaluated.  Everything here either rejects a malformed call
/// or predicate up front, or reports a bug in a predicate body and
/// aborts the whole enumeration.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum Error {
    #[error("invalid call: {0}")]
    InvalidCall(&'static str),

    #[error("invalid predicate `{name}`: {reason}")]
    InvalidPredicate { name: String, reason: &'static str },

    #[error("invalid expression: {0}")]
    InvalidExpression(String),

    #[error("parameter `{0}` could not be found in scope")]
    UnknownParameter(String),

    #[error("parameter `{0}` matches more than one parameter in scope")]
    AmbiguousParameter(String),

    #[error("parameter `{0}` is not bound to a value")]
    Unbound(String),

    #[error("parameter is already bound to a value")]
    AlreadyBound,

    #[error("cannot assign a value of type `{found}` to a parameter of type `{expected}`")]
    TypeMismatch { expected: ValueType, found: ValueType },

    #[error("resolution was cancelled")]
    Cancelled,
}

#[test]
fn test_messages() {
    assert_eq!(
        Error::TypeMismatch {
            expected: ValueType::Int,
            found: ValueType::Str
        }
        .to_string(),
        "cannot assign a value of type `str` to a parameter of type `int`"
    );
    assert_eq!(
        Error::Unbound("x".into()).to_string(),
        "parameter `x` is not bound to a value"
    );
}
