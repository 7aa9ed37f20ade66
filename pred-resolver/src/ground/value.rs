use std::fmt;

/// The type of a parameter or of a value expression.
///
/// `Any` is the top type: every value is assignable to an `Any`
/// parameter, but an `Any` value is never assignable to a more
/// specific parameter.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ValueType {
    Any,
    Bool,
    Int,
    Str,
}

impl ValueType {
    /// Returns true iff a value of type `other` may be stored in a
    /// slot of type `self`.
    #[inline]
    #[must_use]
    pub fn is_assignable_from(self, other: ValueType) -> bool {
        self == ValueType::Any || self == other
    }

    /// Returns the more specific of two mutually compatible types, or
    /// `None` when no value could inhabit both.
    #[must_use]
    pub fn meet(self, other: ValueType) -> Option<ValueType> {
        match (self, other) {
            (ValueType::Any, ty) | (ty, ValueType::Any) => Some(ty),
            (lhs, rhs) if lhs == rhs => Some(lhs),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Any => "any",
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Str => "str",
        };
        f.write_str(name)
    }
}

/// A ground value.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl Value {
    /// Returns the runtime type of this value; never `ValueType::Any`.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Str(_) => ValueType::Str,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(value) => write!(f, "{}", value),
            Value::Int(value) => write!(f, "{}", value),
            Value::Str(value) => write!(f, "\"{}\"", value.replace('"', "\\\"")),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.into())
    }
}

/// Typed extraction out of a `Value`.  `TYPE` is the parameter type
/// a Rust type corresponds to, so callers can ask for `i64` and get
/// a type mismatch instead of a silent conversion.
pub trait FromValue: Sized {
    const TYPE: ValueType;

    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    const TYPE: ValueType = ValueType::Any;

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for bool {
    const TYPE: ValueType = ValueType::Bool;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    const TYPE: ValueType = ValueType::Int;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }
}

impl FromValue for String {
    const TYPE: ValueType = ValueType::Str;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Str(value) => Some(value.clone()),
            _ => None,
        }
    }
}

#[test]
fn test_assignability() {
    assert!(ValueType::Any.is_assignable_from(ValueType::Int));
    assert!(ValueType::Any.is_assignable_from(ValueType::Any));
    assert!(ValueType::Int.is_assignable_from(ValueType::Int));
    assert!(!ValueType::Int.is_assignable_from(ValueType::Any));
    assert!(!ValueType::Int.is_assignable_from(ValueType::Str));
}

#[test]
fn test_meet() {
    assert_eq!(ValueType::Any.meet(ValueType::Str), Some(ValueType::Str));
    assert_eq!(ValueType::Bool.meet(ValueType::Any), Some(ValueType::Bool));
    assert_eq!(ValueType::Int.meet(ValueType::Int), Some(ValueType::Int));
    assert_eq!(ValueType::Int.meet(ValueType::Str), None);
}

#[test]
fn test_display_quotes_strings() {
    assert_eq!(Value::from("a\"b").to_string(), "\"a\\\"b\"");
    assert_eq!(Value::from(10).to_string(), "10");
    assert_eq!(Value::from(true).to_string(), "true");
}

#[test]
fn test_from_value() {
    assert_eq!(i64::from_value(&Value::Int(3)), Some(3));
    assert_eq!(i64::from_value(&Value::from("3")), None);
    assert_eq!(String::from_value(&Value::from("x")), Some("x".into()));
    assert_eq!(Value::from_value(&Value::Bool(false)), Some(Value::Bool(false)));
}
