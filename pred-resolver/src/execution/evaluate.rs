//! Evaluation of one branch: run the program's expressions in order
//! against the branch's frame until the program completes, an
//! expression fails, or a call suspends the branch.
use super::context::ExpressionContext;
use super::continuation::{Branch, Program, SuspendedCall};
use super::scope::{Frame, Resolved, Slot};
use crate::error::Error;
use crate::ground::Value;
use crate::matching::{Expression, Predicate, Selector, ValueExpression};
use crate::unification::{CallParameter, Parameter};
use tracing::trace;

/// How a branch stopped.
#[derive(Debug)]
pub enum Outcome {
    /// The whole program ran; the frame holds a solution.
    Complete(Frame),
    /// Some unification or check failed.  No solution.
    Failed,
    /// The branch reached a call and must be resumed once per
    /// matching callee clause.
    Suspended(SuspendedCall),
}

impl Branch {
    /// Returns the branch evaluating `predicate` for a top-level query.
    ///
    /// # Errors
    ///
    /// Returns `Err` on arity mismatch, or when the body factory fails.
    pub fn root(predicate: &Predicate, call_parameters: &[CallParameter]) -> Result<Self, Error> {
        Ok(Self {
            frame: Frame::root(predicate.parameters(), call_parameters)?,
            program: Program::new(predicate.instantiate()?),
        })
    }

    /// Runs the branch until it completes, fails or suspends.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the body misuses a parameter: reads one that
    /// is unbound or out of scope, or binds a value of the wrong type.
    pub fn run(mut self) -> Result<Outcome, Error> {
        while let Some(expression) = self.program.next() {
            trace!(depth = self.frame.depth(), expression = ?expression, "evaluating");
            match expression {
                Expression::BindOrCheck { parameter, value } => {
                    if !self.bind_or_check(&parameter, &value)? {
                        trace!("unification failed");
                        return Ok(Outcome::Failed);
                    }
                }
                Expression::Call { name, arguments } => {
                    let arguments = self.arguments(&arguments)?;
                    return Ok(Outcome::Suspended(SuspendedCall {
                        name,
                        parameters: arguments.iter().map(|slot| slot.parameter.clone()).collect(),
                        arguments,
                        frame: self.frame,
                        remaining: self.program,
                    }));
                }
                Expression::Check(check) => {
                    if !check(&ExpressionContext::new(&self.frame))? {
                        trace!("check failed");
                        return Ok(Outcome::Failed);
                    }
                }
                Expression::Action(action) => action(&ExpressionContext::new(&self.frame))?,
                Expression::BeginScope(entry) => self.frame.open_scope(&entry),
                Expression::EndScope(_) => self.frame.close_scope()?,
            }
        }

        Ok(Outcome::Complete(self.frame))
    }

    fn bind_or_check(&mut self, parameter: &Parameter, value: &ValueExpression) -> Result<bool, Error> {
        let target = self.frame.resolve(parameter)?;
        let unified = match value {
            ValueExpression::Parameter(other) => {
                let source = self.frame.resolve(other)?;
                let unified = self
                    .frame
                    .bindings_mut()
                    .unify(target.slot.cell, source.slot.cell)?;
                if unified {
                    self.frame.redirect();
                    self.check_declared_type(&source)?;
                }
                unified
            }
            ValueExpression::Constant { .. } | ValueExpression::Map { .. } => {
                let value = self.evaluate(value)?;
                self.frame
                    .bindings_mut()
                    .bind_or_check(target.slot.cell, value)?
            }
        };

        if unified {
            self.check_declared_type(&target)?;
        }

        Ok(unified)
    }

    /// A declared parameter may be narrower than the caller's cell
    /// (an `any` output passed for an `int` parameter): make sure
    /// whatever the cell now holds fits the declaration.
    fn check_declared_type(&self, resolved: &Resolved) -> Result<(), Error> {
        match self.frame.bindings().value(resolved.slot.cell) {
            Some(value) if !resolved.ty.is_assignable_from(value.value_type()) => Err(Error::TypeMismatch {
                expected: resolved.ty,
                found: value.value_type(),
            }),
            _ => Ok(()),
        }
    }

    /// Resolves call arguments to slots: parameters are passed
    /// through, everything else is evaluated into a fresh anonymous
    /// input.
    fn arguments(&mut self, arguments: &[ValueExpression]) -> Result<Vec<Slot>, Error> {
        let mut slots = Vec::with_capacity(arguments.len());
        for argument in arguments {
            let slot = match argument {
                ValueExpression::Parameter(parameter) => self.frame.resolve(parameter)?.slot,
                _ => {
                    let parameter = CallParameter::input(argument.value_type(), self.evaluate(argument)?)?;
                    let depth = self.frame.depth();
                    let cell = self.frame.bindings_mut().allocate_for(&parameter, depth)?;
                    Slot { parameter, cell }
                }
            };
            slots.push(slot);
        }

        Ok(slots)
    }

    /// Evaluates a value expression in the innermost scope.
    ///
    /// # Errors
    ///
    /// Returns `Err` when a referenced parameter is unbound, or a map
    /// yields a value outside its declared type.
    fn evaluate(&mut self, expression: &ValueExpression) -> Result<Value, Error> {
        match expression {
            ValueExpression::Constant { value, .. } => Ok(value.clone()),
            ValueExpression::Parameter(parameter) => self.value_of(parameter),
            ValueExpression::Map { ty, selector } => {
                let value = match selector {
                    Selector::Context(selector) => selector(&ExpressionContext::new(&self.frame))?,
                    Selector::Source(source, selector) => selector(&self.value_of(source)?)?,
                };

                if !ty.is_assignable_from(value.value_type()) {
                    return Err(Error::TypeMismatch {
                        expected: *ty,
                        found: value.value_type(),
                    });
                }

                Ok(value)
            }
        }
    }

    fn value_of(&mut self, parameter: &Parameter) -> Result<Value, Error> {
        let resolved = self.frame.resolve(parameter)?;
        self.frame
            .bindings()
            .value(resolved.slot.cell)
            .cloned()
            .ok_or_else(|| Error::Unbound(parameter.to_string()))
    }
}

#[test]
fn test_run_binds_output() {
    use crate::ground::ValueType;
    use crate::unification::PredicateParameter;

    let p = PredicateParameter::new("p", ValueType::Int);
    let predicate = Predicate::new(
        "p",
        vec![p.clone()],
        vec![Expression::bind_or_check(&p, ValueExpression::constant(10)).expect("ok")],
    )
    .expect("ok");

    let out = CallParameter::named_output("out", ValueType::Int);
    let branch = Branch::root(&predicate, &[out]).expect("ok");
    match branch.run().expect("ok") {
        Outcome::Complete(frame) => {
            let slot = frame.root_arguments().next().expect("one argument");
            assert_eq!(frame.bindings().value(slot.cell), Some(&Value::Int(10)));
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn test_run_unbound_reference_is_an_error() {
    use crate::ground::ValueType;
    use crate::unification::PredicateParameter;

    let p = PredicateParameter::new("p", ValueType::Int);
    let local = CallParameter::named_output("local", ValueType::Int);
    let predicate = Predicate::new(
        "p",
        vec![p.clone()],
        vec![Expression::bind_or_check(
            &p,
            ValueExpression::map_from(&local, |value: i64| value + 1),
        )
        .expect("ok")],
    )
    .expect("ok");

    let branch = Branch::root(&predicate, &[CallParameter::output(ValueType::Int)]).expect("ok");
    assert_eq!(branch.run().map(|_| ()), Err(Error::Unbound("local".into())));
}

#[test]
fn test_run_suspends_on_call() {
    use crate::ground::ValueType;
    use crate::unification::PredicateParameter;

    let p = PredicateParameter::new("p", ValueType::Int);
    let predicate = Predicate::new(
        "p",
        vec![p.clone()],
        vec![
            Expression::call(
                "q",
                vec![ValueExpression::parameter(&p), ValueExpression::constant(20)],
            )
            .expect("ok"),
            Expression::check(|_| Ok(false)),
        ],
    )
    .expect("ok");

    let branch = Branch::root(&predicate, &[CallParameter::output(ValueType::Int)]).expect("ok");
    match branch.run().expect("ok") {
        Outcome::Suspended(call) => {
            assert_eq!(call.name, "q");
            assert_eq!(call.arguments.len(), 2);
            assert!(call.parameters[0].is_output());
            assert_eq!(call.parameters[1].input_value(), Some(&Value::Int(20)));
            assert!(!call.remaining.is_empty());
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}
