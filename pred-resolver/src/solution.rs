//! Solutions: read-only snapshots of the query's call parameters once a
//! branch completes.
use crate::error::Error;
use crate::execution::Frame;
use crate::ground::{FromValue, Value, ValueType};
use crate::unification::CallParameter;
use std::ops::Index;
use std::slice;

/// The final state of one top-level call parameter.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SolutionParameter {
    parameter: CallParameter,
    ty: ValueType,
    value: Option<Value>,
    aliases: Vec<CallParameter>,
}

impl SolutionParameter {
    /// The call parameter this entry reports on.
    #[must_use]
    pub fn parameter(&self) -> &CallParameter {
        &self.parameter
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.parameter.name()
    }

    /// The type of the binding, which may be narrower than the call
    /// parameter's own when it was unified with a typed variable.
    #[must_use]
    pub fn parameter_type(&self) -> ValueType {
        self.ty
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.value.is_some()
    }

    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// # Errors
    ///
    /// Returns `Err` when the parameter is unbound or holds a value of
    /// another type than `T`.
    pub fn get<T: FromValue>(&self) -> Result<T, Error> {
        let value = self
            .value
            .as_ref()
            .ok_or_else(|| Error::Unbound(self.parameter.to_string()))?;
        T::from_value(value).ok_or(Error::TypeMismatch {
            expected: T::TYPE,
            found: value.value_type(),
        })
    }

    /// Other top-level call parameters unified with this one, in call
    /// order.
    pub fn aliases(&self) -> impl Iterator<Item = &CallParameter> {
        self.aliases.iter()
    }
}

/// One solution of a query, with one entry per call parameter in call
/// order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Solution {
    parameters: Vec<SolutionParameter>,
}

impl Solution {
    pub(crate) fn from_frame(frame: &Frame) -> Self {
        let bindings = frame.bindings();
        let roots: Vec<_> = frame
            .root_arguments()
            .map(|slot| (slot.parameter.clone(), bindings.find(slot.cell)))
            .collect();

        let parameters = roots
            .iter()
            .map(|(parameter, cell)| SolutionParameter {
                parameter: parameter.clone(),
                ty: bindings.parameter_type(*cell),
                value: bindings.value(*cell).cloned(),
                aliases: roots
                    .iter()
                    .filter(|(other, other_cell)| other != parameter && other_cell == cell)
                    .map(|(other, _)| other.clone())
                    .fold(Vec::new(), |mut acc, other| {
                        if !acc.contains(&other) {
                            acc.push(other);
                        }
                        acc
                    }),
            })
            .collect();

        Self { parameters }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SolutionParameter> {
        self.parameters.get(index)
    }

    /// Returns the entry for the call parameter named `name`.
    ///
    /// # Errors
    ///
    /// Returns `Err` when no call parameter has that name, or when
    /// distinct call parameters share it.
    pub fn by_name(&self, name: &str) -> Result<&SolutionParameter, Error> {
        let mut matches = self.parameters.iter().filter(|entry| entry.name() == Some(name));
        let first = matches
            .next()
            .ok_or_else(|| Error::UnknownParameter(name.into()))?;
        if matches.any(|entry| entry.parameter != first.parameter) {
            return Err(Error::AmbiguousParameter(name.into()));
        }

        Ok(first)
    }

    #[must_use]
    pub fn by_parameter(&self, parameter: &CallParameter) -> Option<&SolutionParameter> {
        self.parameters.iter().find(|entry| &entry.parameter == parameter)
    }

    pub fn iter(&self) -> slice::Iter<'_, SolutionParameter> {
        self.parameters.iter()
    }
}

impl Index<usize> for Solution {
    type Output = SolutionParameter;

    fn index(&self, index: usize) -> &SolutionParameter {
        &self.parameters[index]
    }
}

impl Index<&str> for Solution {
    type Output = SolutionParameter;

    fn index(&self, name: &str) -> &SolutionParameter {
        match self.by_name(name) {
            Ok(entry) => entry,
            Err(error) => panic!("{}", error),
        }
    }
}

impl<'a> IntoIterator for &'a Solution {
    type Item = &'a SolutionParameter;
    type IntoIter = slice::Iter<'a, SolutionParameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.parameters.iter()
    }
}

#[test]
fn test_solution_lookups() {
    use crate::unification::PredicateParameter;

    let x = CallParameter::named_output("x", ValueType::Any);
    let y = CallParameter::named_output("y", ValueType::Int);
    let declared = [
        PredicateParameter::new("a", ValueType::Int),
        PredicateParameter::new("b", ValueType::Int),
        PredicateParameter::new("c", ValueType::Int),
    ];
    let mut frame = Frame::root(&declared, &[x.clone(), y.clone(), CallParameter::literal(3)]).expect("ok");
    let cells: Vec<_> = frame.root_arguments().map(|slot| slot.cell).collect();
    frame.bindings_mut().unify(cells[0], cells[1]).expect("ok");

    let solution = Solution::from_frame(&frame);
    assert_eq!(solution.len(), 3);
    assert!(!solution["x"].is_bound());
    assert_eq!(solution["x"].parameter_type(), ValueType::Int);
    assert_eq!(solution["x"].aliases().collect::<Vec<_>>(), [&y]);
    assert_eq!(solution.by_parameter(&y).map(|entry| entry.name()), Some(Some("y")));
    assert_eq!(solution[2].get::<i64>(), Ok(3));
    assert_eq!(solution.get(2).and_then(|entry| entry.name()), None);
    assert_eq!(solution["y"].get::<i64>(), Err(Error::Unbound("y".into())));
    assert_eq!(
        solution.by_name("z").map(|_| ()),
        Err(Error::UnknownParameter("z".into()))
    );
}

#[test]
fn test_duplicate_names_are_ambiguous() {
    use crate::unification::PredicateParameter;

    let first = CallParameter::named_output("x", ValueType::Int);
    let second = CallParameter::named_output("x", ValueType::Int);
    let declared = [
        PredicateParameter::new("a", ValueType::Int),
        PredicateParameter::new("b", ValueType::Int),
    ];

    let frame = Frame::root(&declared, &[first.clone(), first.clone()]).expect("ok");
    assert!(Solution::from_frame(&frame).by_name("x").is_ok());

    let frame = Frame::root(&declared, &[first, second]).expect("ok");
    assert_eq!(
        Solution::from_frame(&frame).by_name("x").map(|_| ()),
        Err(Error::AmbiguousParameter("x".into()))
    );
}
