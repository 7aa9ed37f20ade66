//! Declared (formal) parameters and call-site parameters.
use crate::error::Error;
use crate::ground::{Value, ValueType};
use std::fmt;

/// Parameters are uniquely identified by their sequence id; the name
/// is only useful for lookups and pretty-printing.
///
/// Ids are allocated in increasing order, so the implicit order sorts
/// parameters by creation time.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ParameterId(usize);

impl ParameterId {
    /// Returns a fresh unique id.
    #[must_use]
    pub fn fresh() -> Self {
        #[cfg(not(tarpaulin_include))]
        fn id() -> usize {
            use std::sync::atomic::{AtomicUsize, Ordering};
            static PARAMETER_COUNTER: AtomicUsize = AtomicUsize::new(0);

            PARAMETER_COUNTER.fetch_add(1, Ordering::Relaxed)
        }

        Self(id())
    }
}

/// A formal parameter of a predicate.  Always named.
#[derive(Clone, Debug)]
pub struct PredicateParameter {
    id: ParameterId,
    name: String,
    ty: ValueType,
}

impl PredicateParameter {
    #[must_use]
    pub fn new(name: &str, ty: ValueType) -> Self {
        Self {
            id: ParameterId::fresh(),
            name: name.into(),
            ty,
        }
    }

    #[must_use]
    pub fn id(&self) -> ParameterId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn parameter_type(&self) -> ValueType {
        self.ty
    }
}

impl PartialEq for PredicateParameter {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PredicateParameter {}

impl std::hash::Hash for PredicateParameter {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Whether a call parameter supplies a value or waits for one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParameterKind {
    Input(Value),
    Output,
}

/// An argument at a call site: either an input carrying a value, or an
/// output placeholder to be bound by resolution.  Named call
/// parameters identify results and double as local variables inside
/// predicate bodies.
#[derive(Clone, Debug)]
pub struct CallParameter {
    id: ParameterId,
    name: Option<String>,
    ty: ValueType,
    kind: ParameterKind,
}

impl CallParameter {
    /// Returns an anonymous input parameter of type `ty`.
    ///
    /// # Errors
    ///
    /// Returns `Err` when `value` is not assignable to `ty`.
    pub fn input(ty: ValueType, value: impl Into<Value>) -> Result<Self, Error> {
        Self::make_input(None, ty, value.into())
    }

    /// Returns a named input parameter of type `ty`.
    ///
    /// # Errors
    ///
    /// Returns `Err` when `value` is not assignable to `ty`.
    pub fn named_input(name: &str, ty: ValueType, value: impl Into<Value>) -> Result<Self, Error> {
        Self::make_input(Some(name.into()), ty, value.into())
    }

    /// Returns an anonymous input whose type is the value's own.
    #[must_use]
    pub fn literal(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self {
            id: ParameterId::fresh(),
            name: None,
            ty: value.value_type(),
            kind: ParameterKind::Input(value),
        }
    }

    #[must_use]
    pub fn output(ty: ValueType) -> Self {
        Self::make_output(None, ty)
    }

    #[must_use]
    pub fn named_output(name: &str, ty: ValueType) -> Self {
        Self::make_output(Some(name.into()), ty)
    }

    fn make_input(name: Option<String>, ty: ValueType, value: Value) -> Result<Self, Error> {
        if !ty.is_assignable_from(value.value_type()) {
            return Err(Error::TypeMismatch {
                expected: ty,
                found: value.value_type(),
            });
        }

        Ok(Self {
            id: ParameterId::fresh(),
            name,
            ty,
            kind: ParameterKind::Input(value),
        })
    }

    fn make_output(name: Option<String>, ty: ValueType) -> Self {
        Self {
            id: ParameterId::fresh(),
            name,
            ty,
            kind: ParameterKind::Output,
        }
    }

    #[must_use]
    pub fn id(&self) -> ParameterId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn parameter_type(&self) -> ValueType {
        self.ty
    }

    #[must_use]
    pub fn kind(&self) -> &ParameterKind {
        &self.kind
    }

    #[must_use]
    pub fn is_input(&self) -> bool {
        matches!(self.kind, ParameterKind::Input(_))
    }

    #[must_use]
    pub fn is_output(&self) -> bool {
        !self.is_input()
    }

    /// Returns the value carried by an input parameter.
    #[must_use]
    pub fn input_value(&self) -> Option<&Value> {
        match &self.kind {
            ParameterKind::Input(value) => Some(value),
            ParameterKind::Output => None,
        }
    }

    /// Returns true iff this parameter may be passed where
    /// `declared` is expected.  Inputs flow into the declared slot,
    /// outputs receive whatever the declared slot ends up holding.
    #[must_use]
    pub fn matches(&self, declared: &PredicateParameter) -> bool {
        match self.kind {
            ParameterKind::Input(_) => declared.parameter_type().is_assignable_from(self.ty),
            ParameterKind::Output => self.ty.is_assignable_from(declared.parameter_type()),
        }
    }
}

impl PartialEq for CallParameter {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CallParameter {}

impl std::hash::Hash for CallParameter {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for CallParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, &self.kind) {
            (Some(name), _) => f.write_str(name),
            (None, ParameterKind::Input(value)) => write!(f, "{}", value),
            (None, ParameterKind::Output) => write!(f, "_{}", self.id.0),
        }
    }
}

/// What an expression may refer to: one of the enclosing predicate's
/// declared parameters, or a call parameter acting as a local
/// variable (or literal input).
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Parameter {
    Declared(PredicateParameter),
    Call(CallParameter),
}

impl Parameter {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Parameter::Declared(parameter) => Some(parameter.name()),
            Parameter::Call(parameter) => parameter.name(),
        }
    }

    #[must_use]
    pub fn parameter_type(&self) -> ValueType {
        match self {
            Parameter::Declared(parameter) => parameter.parameter_type(),
            Parameter::Call(parameter) => parameter.parameter_type(),
        }
    }
}

impl From<PredicateParameter> for Parameter {
    fn from(parameter: PredicateParameter) -> Self {
        Parameter::Declared(parameter)
    }
}

impl From<&PredicateParameter> for Parameter {
    fn from(parameter: &PredicateParameter) -> Self {
        Parameter::Declared(parameter.clone())
    }
}

impl From<CallParameter> for Parameter {
    fn from(parameter: CallParameter) -> Self {
        Parameter::Call(parameter)
    }
}

impl From<&CallParameter> for Parameter {
    fn from(parameter: &CallParameter) -> Self {
        Parameter::Call(parameter.clone())
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::Declared(parameter) => f.write_str(parameter.name()),
            Parameter::Call(parameter) => write!(f, "{}", parameter),
        }
    }
}

#[test]
fn test_identity_not_name() {
    let x0 = CallParameter::named_output("x", ValueType::Int);
    let x1 = CallParameter::named_output("x", ValueType::Int);

    assert_eq!(x0, x0.clone());
    assert_ne!(x0, x1);
    assert!(x0.id() < x1.id());
}

#[test]
fn test_input_type_checked() {
    assert!(CallParameter::input(ValueType::Int, 3).is_ok());
    assert!(CallParameter::input(ValueType::Any, "x").is_ok());
    assert_eq!(
        CallParameter::input(ValueType::Int, "x"),
        Err(Error::TypeMismatch {
            expected: ValueType::Int,
            found: ValueType::Str
        })
    );
}

#[test]
fn test_matches_declared() {
    let declared_int = PredicateParameter::new("p", ValueType::Int);
    let declared_any = PredicateParameter::new("q", ValueType::Any);

    // Inputs must fit the declared type.
    assert!(CallParameter::literal(1).matches(&declared_int));
    assert!(CallParameter::literal(1).matches(&declared_any));
    assert!(!CallParameter::literal("1").matches(&declared_int));

    // Outputs must be able to hold whatever the declared slot holds.
    assert!(CallParameter::output(ValueType::Any).matches(&declared_int));
    assert!(CallParameter::output(ValueType::Int).matches(&declared_int));
    assert!(!CallParameter::output(ValueType::Int).matches(&declared_any));
}
