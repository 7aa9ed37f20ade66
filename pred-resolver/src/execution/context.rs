//! Read-only view of the innermost scope, handed to check, action and
//! map callbacks.
use super::scope::{Frame, Resolved};
use crate::error::Error;
use crate::ground::{FromValue, Value, ValueType};
use crate::unification::{CallParameter, Parameter};

pub struct ExpressionContext<'a> {
    frame: &'a Frame,
}

/// The binding of one parameter, as seen from a callback.
pub struct Binding<'a> {
    name: String,
    resolved: Resolved,
    frame: &'a Frame,
}

impl<'a> ExpressionContext<'a> {
    pub(crate) fn new(frame: &'a Frame) -> Self {
        Self { frame }
    }

    /// Returns the binding of the declared parameter or named local
    /// variable called `name`.
    ///
    /// # Errors
    ///
    /// Returns `Err` when no parameter, or more than one, has that
    /// name in the current scope.
    pub fn binding(&self, name: &str) -> Result<Binding<'a>, Error> {
        Ok(Binding {
            name: name.into(),
            resolved: self.frame.lookup_name(name)?,
            frame: self.frame,
        })
    }

    /// Returns the binding of `parameter` in the current scope.
    ///
    /// # Errors
    ///
    /// Returns `Err` when `parameter` is not in scope.
    pub fn binding_of(&self, parameter: impl Into<Parameter>) -> Result<Binding<'a>, Error> {
        let parameter = parameter.into();
        let resolved = self
            .frame
            .lookup(&parameter)?
            .ok_or_else(|| Error::UnknownParameter(parameter.to_string()))?;

        Ok(Binding {
            name: parameter.to_string(),
            resolved,
            frame: self.frame,
        })
    }

    /// Shorthand for `binding(name)?.get()`.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the parameter is missing, unbound, or holds
    /// a value of another type.
    pub fn get<T: FromValue>(&self, name: &str) -> Result<T, Error> {
        self.binding(name)?.get()
    }

    /// Shorthand for `binding(name)?.is_bound()`.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the parameter is missing.
    pub fn is_bound(&self, name: &str) -> Result<bool, Error> {
        Ok(self.binding(name)?.is_bound())
    }
}

impl<'a> Binding<'a> {
    /// The type the parameter was declared with.
    #[must_use]
    pub fn parameter_type(&self) -> ValueType {
        self.resolved.ty
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.frame.bindings().is_bound(self.resolved.slot.cell)
    }

    /// # Errors
    ///
    /// Returns `Err` when the parameter is unbound.
    pub fn value(&self) -> Result<&'a Value, Error> {
        self.frame
            .bindings()
            .value(self.resolved.slot.cell)
            .ok_or_else(|| Error::Unbound(self.name.clone()))
    }

    /// # Errors
    ///
    /// Returns `Err` when the parameter is unbound or holds a value of
    /// another type than `T`.
    pub fn get<T: FromValue>(&self) -> Result<T, Error> {
        let value = self.value()?;
        T::from_value(value).ok_or(Error::TypeMismatch {
            expected: T::TYPE,
            found: value.value_type(),
        })
    }

    /// Call parameters currently denoting this binding.
    pub fn aliases(&self) -> impl Iterator<Item = &'a CallParameter> {
        self.frame.bindings().aliases(self.resolved.slot.cell)
    }
}

#[test]
fn test_context_reads() {
    use crate::unification::PredicateParameter;

    let n = PredicateParameter::new("n", ValueType::Any);
    let out = PredicateParameter::new("out", ValueType::Int);
    let frame = Frame::root(
        &[n.clone(), out.clone()],
        &[CallParameter::literal(4), CallParameter::output(ValueType::Int)],
    )
    .expect("ok");
    let context = ExpressionContext::new(&frame);

    assert_eq!(context.get::<i64>("n"), Ok(4));
    assert_eq!(context.binding_of(&n).and_then(|b| b.get::<i64>()), Ok(4));
    assert_eq!(context.binding("n").map(|b| b.parameter_type()), Ok(ValueType::Any));
    assert_eq!(
        context.get::<String>("n"),
        Err(Error::TypeMismatch {
            expected: ValueType::Str,
            found: ValueType::Int
        })
    );
    assert_eq!(context.is_bound("out"), Ok(false));
    assert_eq!(context.get::<i64>("out"), Err(Error::Unbound("out".into())));
    assert_eq!(
        context.get::<i64>("missing"),
        Err(Error::UnknownParameter("missing".into()))
    );
}
