//! Predicate bodies are lists of expressions.  Value expressions
//! produce a value (or name a parameter); control expressions bind,
//! call, check, or act, and are evaluated in order.
use crate::error::Error;
use crate::execution::{ExpressionContext, ScopeEntry, ScopeExit};
use crate::ground::{FromValue, Value, ValueType};
use crate::unification::Parameter;
use std::fmt;
use std::rc::Rc;

pub type ContextSelector = Rc<dyn Fn(&ExpressionContext<'_>) -> Result<Value, Error>>;
pub type SourceSelector = Rc<dyn Fn(&Value) -> Result<Value, Error>>;
pub type CheckFn = Rc<dyn Fn(&ExpressionContext<'_>) -> Result<bool, Error>>;
pub type ActionFn = Rc<dyn Fn(&ExpressionContext<'_>) -> Result<(), Error>>;

/// A map transform reads either the whole expression context, or the
/// value of one specific (already bound) source parameter.
#[derive(Clone)]
pub enum Selector {
    Context(ContextSelector),
    Source(Parameter, SourceSelector),
}

#[derive(Clone)]
pub enum ValueExpression {
    Constant { ty: ValueType, value: Value },
    Parameter(Parameter),
    Map { ty: ValueType, selector: Selector },
}

impl ValueExpression {
    /// Returns a constant typed after `value` itself.
    #[must_use]
    pub fn constant(value: impl Into<Value>) -> Self {
        let value = value.into();
        ValueExpression::Constant {
            ty: value.value_type(),
            value,
        }
    }

    /// Returns a constant of (possibly wider) type `ty`.
    ///
    /// # Errors
    ///
    /// Returns `Err` when `value` is not assignable to `ty`.
    pub fn typed_constant(ty: ValueType, value: impl Into<Value>) -> Result<Self, Error> {
        let value = value.into();
        if !ty.is_assignable_from(value.value_type()) {
            return Err(Error::TypeMismatch {
                expected: ty,
                found: value.value_type(),
            });
        }

        Ok(ValueExpression::Constant { ty, value })
    }

    #[must_use]
    pub fn parameter(parameter: impl Into<Parameter>) -> Self {
        ValueExpression::Parameter(parameter.into())
    }

    /// Returns a map over the whole context, yielding values of type
    /// `ty`.
    pub fn map<F>(ty: ValueType, selector: F) -> Self
    where
        F: Fn(&ExpressionContext<'_>) -> Result<Value, Error> + 'static,
    {
        ValueExpression::Map {
            ty,
            selector: Selector::Context(Rc::new(selector)),
        }
    }

    /// Returns a map over the value of `source`, which must be bound
    /// by the time the map is evaluated.
    pub fn map_parameter<F>(ty: ValueType, source: impl Into<Parameter>, selector: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, Error> + 'static,
    {
        ValueExpression::Map {
            ty,
            selector: Selector::Source(source.into(), Rc::new(selector)),
        }
    }

    /// Typed flavour of `map_parameter`: the source value is converted
    /// to `T` before calling `selector`, and the result type is `R`'s.
    pub fn map_from<T, R, F>(source: impl Into<Parameter>, selector: F) -> Self
    where
        T: FromValue,
        R: FromValue + Into<Value>,
        F: Fn(T) -> R + 'static,
    {
        Self::map_parameter(R::TYPE, source, move |value: &Value| {
            let typed = T::from_value(value).ok_or(Error::TypeMismatch {
                expected: T::TYPE,
                found: value.value_type(),
            })?;
            Ok(selector(typed).into())
        })
    }

    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            ValueExpression::Constant { ty, .. } => *ty,
            ValueExpression::Parameter(parameter) => parameter.parameter_type(),
            ValueExpression::Map { ty, .. } => *ty,
        }
    }
}

impl fmt::Debug for ValueExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueExpression::Constant { value, .. } => write!(f, "{}", value),
            ValueExpression::Parameter(parameter) => write!(f, "{}", parameter),
            ValueExpression::Map {
                selector: Selector::Context(_),
                ..
            } => f.write_str("map(..)"),
            ValueExpression::Map {
                selector: Selector::Source(source, _),
                ..
            } => write!(f, "map({})", source),
        }
    }
}

#[derive(Clone)]
pub enum Expression {
    /// Unifies `parameter` with `value`: binds it if unbound, and
    /// otherwise checks the existing binding.
    BindOrCheck {
        parameter: Parameter,
        value: ValueExpression,
    },
    /// Resolves `name` with `arguments`, continuing the current body
    /// once for every solution.
    Call {
        name: String,
        arguments: Vec<ValueExpression>,
    },
    /// Ends the branch when the callback returns false.
    Check(CheckFn),
    /// Runs the callback for its side effects.
    Action(ActionFn),
    /// Opens a callee's scope.  Only synthesized by the engine.
    BeginScope(ScopeEntry),
    /// Closes the innermost scope.  Only synthesized by the engine.
    EndScope(ScopeExit),
}

impl Expression {
    /// Returns a bind-or-check expression.
    ///
    /// # Errors
    ///
    /// Returns `Err` when a `value` of its static type could never be
    /// stored in `parameter`.
    pub fn bind_or_check(parameter: impl Into<Parameter>, value: ValueExpression) -> Result<Self, Error> {
        let parameter = parameter.into();
        if !parameter
            .parameter_type()
            .is_assignable_from(value.value_type())
        {
            return Err(Error::InvalidExpression(format!(
                "cannot assign a value of type `{}` to parameter `{}` of type `{}`",
                value.value_type(),
                parameter,
                parameter.parameter_type()
            )));
        }

        Ok(Expression::BindOrCheck { parameter, value })
    }

    /// Returns a call to the predicates named `name`.
    ///
    /// # Errors
    ///
    /// Returns `Err` when `name` is empty.
    pub fn call<I>(name: &str, arguments: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = ValueExpression>,
    {
        if name.is_empty() {
            return Err(Error::InvalidExpression("call to an empty predicate name".into()));
        }

        Ok(Expression::Call {
            name: name.into(),
            arguments: arguments.into_iter().collect(),
        })
    }

    pub fn check<F>(check: F) -> Self
    where
        F: Fn(&ExpressionContext<'_>) -> Result<bool, Error> + 'static,
    {
        Expression::Check(Rc::new(check))
    }

    pub fn action<F>(action: F) -> Self
    where
        F: Fn(&ExpressionContext<'_>) -> Result<(), Error> + 'static,
    {
        Expression::Action(Rc::new(action))
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::BindOrCheck { parameter, value } => write!(f, "{} = {:?}", parameter, value),
            Expression::Call { name, arguments } => write!(f, "{}{:?}", name, arguments),
            Expression::Check(_) => f.write_str("check(..)"),
            Expression::Action(_) => f.write_str("action(..)"),
            Expression::BeginScope(entry) => write!(f, "begin_scope({})", entry.len()),
            Expression::EndScope(_) => f.write_str("end_scope"),
        }
    }
}

#[test]
fn test_bind_or_check_types() {
    use crate::unification::PredicateParameter;

    let int = PredicateParameter::new("int", ValueType::Int);
    let any = PredicateParameter::new("any", ValueType::Any);

    assert!(Expression::bind_or_check(&int, ValueExpression::constant(10)).is_ok());
    assert!(Expression::bind_or_check(&any, ValueExpression::constant("x")).is_ok());
    assert!(Expression::bind_or_check(&any, ValueExpression::parameter(&int)).is_ok());
    assert!(Expression::bind_or_check(&int, ValueExpression::constant("x")).is_err());
    assert!(Expression::bind_or_check(&int, ValueExpression::parameter(&any)).is_err());
}

#[test]
fn test_typed_constant() {
    let constant = ValueExpression::typed_constant(ValueType::Any, 3).expect("ok");
    assert_eq!(constant.value_type(), ValueType::Any);
    assert!(ValueExpression::typed_constant(ValueType::Bool, 3).is_err());
}

#[test]
fn test_empty_call_name() {
    assert!(Expression::call("", vec![]).is_err());
    assert!(Expression::call("p", vec![ValueExpression::constant(1)]).is_ok());
}

#[test]
fn test_map_from_type() {
    use crate::unification::CallParameter;

    let n = CallParameter::named_output("n", ValueType::Int);
    let map = ValueExpression::map_from(&n, |n: i64| n > 3);
    assert_eq!(map.value_type(), ValueType::Bool);

    match map {
        ValueExpression::Map {
            selector: Selector::Source(_, selector),
            ..
        } => {
            assert_eq!(selector(&Value::Int(4)), Ok(Value::Bool(true)));
            assert!(selector(&Value::from("4")).is_err());
        }
        _ => panic!("expected a source map"),
    }
}
