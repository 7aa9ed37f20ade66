//! A predicate is one clause of a named relation: declared parameters
//! and a body.  Several predicates may share a name (alternative
//! clauses, or overloads on parameter types); resolution tries all of
//! those whose signature matches the call.
use super::Expression;
use crate::error::Error;
use crate::unification::{CallParameter, PredicateParameter};
use std::collections::HashMap;
use std::fmt;
use std::ops::Index;
use std::rc::Rc;

type BodyFactory = Rc<dyn Fn(&ParameterMap) -> Result<Vec<Expression>, Error>>;

#[derive(Clone)]
enum Body {
    Fixed(Rc<[Expression]>),
    Factory(BodyFactory),
}

/// Declared parameters by name, handed to body factories.
#[derive(Clone, Debug)]
pub struct ParameterMap {
    by_name: HashMap<String, PredicateParameter>,
}

impl ParameterMap {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PredicateParameter> {
        self.by_name.get(name)
    }
}

impl Index<&str> for ParameterMap {
    type Output = PredicateParameter;

    fn index(&self, name: &str) -> &PredicateParameter {
        match self.by_name.get(name) {
            Some(parameter) => parameter,
            None => panic!("no declared parameter named `{}`", name),
        }
    }
}

#[derive(Clone)]
pub struct Predicate {
    name: Rc<str>,
    parameters: Rc<[PredicateParameter]>,
    by_name: ParameterMap,
    body: Body,
}

impl Predicate {
    /// Returns a predicate with a fixed `body`.
    ///
    /// # Errors
    ///
    /// Returns `Err` when `name` is empty or two parameters share a
    /// name.
    pub fn new<I, J>(name: &str, parameters: I, body: J) -> Result<Self, Error>
    where
        I: IntoIterator<Item = PredicateParameter>,
        J: IntoIterator<Item = Expression>,
    {
        let (parameters, by_name) = Self::signature(name, parameters)?;

        Ok(Self {
            name: name.into(),
            parameters,
            by_name,
            body: Body::Fixed(body.into_iter().collect()),
        })
    }

    /// Returns a predicate whose body is produced by `factory` every
    /// time the clause is instantiated, so that local variables the
    /// factory creates are fresh for each instantiation.
    ///
    /// The factory is also run once here, to surface construction
    /// errors immediately.
    ///
    /// # Errors
    ///
    /// Returns `Err` when `name` is empty, two parameters share a
    /// name, or `factory` fails.
    pub fn with_factory<I, F>(name: &str, parameters: I, factory: F) -> Result<Self, Error>
    where
        I: IntoIterator<Item = PredicateParameter>,
        F: Fn(&ParameterMap) -> Result<Vec<Expression>, Error> + 'static,
    {
        let (parameters, by_name) = Self::signature(name, parameters)?;
        factory(&by_name)?;

        Ok(Self {
            name: name.into(),
            parameters,
            by_name,
            body: Body::Factory(Rc::new(factory)),
        })
    }

    fn signature<I>(name: &str, parameters: I) -> Result<(Rc<[PredicateParameter]>, ParameterMap), Error>
    where
        I: IntoIterator<Item = PredicateParameter>,
    {
        if name.is_empty() {
            return Err(Error::InvalidPredicate {
                name: name.into(),
                reason: "predicate names must not be empty",
            });
        }

        let parameters: Rc<[PredicateParameter]> = parameters.into_iter().collect();
        let mut by_name = HashMap::new();
        for parameter in parameters.iter() {
            if by_name
                .insert(parameter.name().to_string(), parameter.clone())
                .is_some()
            {
                return Err(Error::InvalidPredicate {
                    name: name.into(),
                    reason: "duplicate parameter name",
                });
            }
        }

        Ok((parameters, ParameterMap { by_name }))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn parameters(&self) -> &[PredicateParameter] {
        &self.parameters
    }

    /// Returns the declared parameter called `name`, if any.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&PredicateParameter> {
        self.by_name.get(name)
    }

    /// Returns the body for one instantiation of this clause.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the body factory fails.
    pub fn instantiate(&self) -> Result<Rc<[Expression]>, Error> {
        match &self.body {
            Body::Fixed(body) => Ok(body.clone()),
            Body::Factory(factory) => Ok(factory(&self.by_name)?.into()),
        }
    }

    /// Returns true iff this clause may be invoked with `arguments`:
    /// same arity, and every argument fits its declared parameter.
    #[must_use]
    pub fn matches(&self, arguments: &[CallParameter]) -> bool {
        self.parameters.len() == arguments.len()
            && arguments
                .iter()
                .zip(self.parameters.iter())
                .all(|(argument, declared)| argument.matches(declared))
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.parameters.iter().map(|p| p.name()).collect();
        write!(f, "{}({})", self.name, names.join(", "))
    }
}

#[test]
fn test_signature_validation() {
    use crate::ground::ValueType;

    assert!(Predicate::new("", vec![], vec![]).is_err());
    assert!(Predicate::new(
        "p",
        vec![
            PredicateParameter::new("x", ValueType::Int),
            PredicateParameter::new("x", ValueType::Str),
        ],
        vec![],
    )
    .is_err());

    let predicate = Predicate::new("p", vec![PredicateParameter::new("x", ValueType::Int)], vec![])
        .expect("ok");
    assert_eq!(predicate.name(), "p");
    assert_eq!(predicate.parameters().len(), 1);
    assert!(predicate.parameter("x").is_some());
    assert!(predicate.parameter("y").is_none());
}

#[test]
fn test_matches() {
    use crate::ground::ValueType;

    let predicate = Predicate::new(
        "p",
        vec![
            PredicateParameter::new("x", ValueType::Int),
            PredicateParameter::new("y", ValueType::Any),
        ],
        vec![],
    )
    .expect("ok");

    let any_out = CallParameter::output(ValueType::Any);
    assert!(predicate.matches(&[CallParameter::literal(1), CallParameter::literal("y")]));
    assert!(predicate.matches(&[any_out.clone(), any_out.clone()]));
    assert!(!predicate.matches(&[CallParameter::literal(1)]));
    assert!(!predicate.matches(&[CallParameter::literal("1"), any_out.clone()]));
    assert!(!predicate.matches(&[any_out, CallParameter::output(ValueType::Int)]));
}

#[test]
fn test_factory_runs_per_instantiation() {
    use super::ValueExpression;
    use crate::ground::ValueType;
    use std::cell::Cell;

    let runs = Rc::new(Cell::new(0));
    let counter = runs.clone();
    let predicate = Predicate::with_factory(
        "p",
        vec![PredicateParameter::new("x", ValueType::Int)],
        move |parameters| {
            counter.set(counter.get() + 1);
            let local = CallParameter::named_output("local", ValueType::Int);
            Ok(vec![
                Expression::bind_or_check(&local, ValueExpression::constant(1))?,
                Expression::bind_or_check(&parameters["x"], ValueExpression::parameter(&local))?,
            ])
        },
    )
    .expect("ok");

    assert_eq!(runs.get(), 1);
    assert_eq!(predicate.instantiate().expect("ok").len(), 2);
    assert_eq!(predicate.instantiate().expect("ok").len(), 2);
    assert_eq!(runs.get(), 3);
}
