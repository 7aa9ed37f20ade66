//! Continuations make nested calls run through the same scheduling
//! loop as top-level candidates, without recursing on the host stack.
//!
//! When a body reaches `Call(name, args)`, the branch stops and is
//! turned into a `SuspendedCall`: the callee's name and arguments, the
//! caller's frame, and whatever remains of the caller's program.  For
//! every clause matching the callee, the suspended call synthesizes a
//! new branch whose program is
//!
//! ```text
//! begin_scope(declared <-> arguments)
//! <callee body>
//! end_scope
//! <rest of the caller's program>
//! ```
//!
//! and which runs against its own copy of the caller's frame.  The
//! caller's arguments are cells in that copied frame, so whatever the
//! callee binds is visible to the rest of the caller's program once
//! the scope closes.
use super::scope::{Frame, ScopeEntry, ScopeExit, Slot};
use crate::error::Error;
use crate::matching::{Expression, Predicate};
use crate::unification::CallParameter;
use std::rc::Rc;

/// A program is a stack of expression segments, each with a cursor.
/// Pushing a segment runs it before everything already there, so
/// building a continuation shares the caller's remaining segments
/// instead of copying them.
#[derive(Clone, Debug, Default)]
pub struct Program {
    segments: Vec<(Rc<[Expression]>, usize)>,
}

impl Program {
    #[must_use]
    pub fn new(body: Rc<[Expression]>) -> Self {
        let mut program = Self::default();
        program.push(body);
        program
    }

    /// Schedules `body` to run before the rest of the program.
    pub fn push(&mut self, body: Rc<[Expression]>) {
        if !body.is_empty() {
            self.segments.push((body, 0));
        }
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl Iterator for Program {
    type Item = Expression;

    fn next(&mut self) -> Option<Expression> {
        loop {
            let (segment, cursor) = self.segments.last_mut()?;
            if let Some(expression) = segment.get(*cursor) {
                *cursor += 1;
                return Some(expression.clone());
            }

            self.segments.pop();
        }
    }
}

/// A branch is one candidate being evaluated: a private frame and the
/// program left to run against it.
#[derive(Clone, Debug)]
pub struct Branch {
    pub(crate) frame: Frame,
    pub(crate) program: Program,
}

/// A branch stopped at a `Call`, waiting for the callee's clauses.
#[derive(Debug)]
pub struct SuspendedCall {
    pub(crate) name: String,
    pub(crate) parameters: Vec<CallParameter>,
    pub(crate) arguments: Vec<Slot>,
    pub(crate) frame: Frame,
    pub(crate) remaining: Program,
}

impl SuspendedCall {
    /// Returns the branch evaluating `callee` (which must match the
    /// call's parameters) and then the rest of the caller.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the callee's body factory fails.
    pub fn continuation(&self, callee: &Predicate) -> Result<Branch, Error> {
        let entry = ScopeEntry::new(
            callee
                .parameters()
                .iter()
                .cloned()
                .zip(self.arguments.iter().cloned())
                .collect(),
        );

        let mut program = self.remaining.clone();
        program.push(Rc::new([Expression::EndScope(ScopeExit::new())]));
        program.push(callee.instantiate()?);
        program.push(Rc::new([Expression::BeginScope(entry)]));

        Ok(Branch {
            frame: self.frame.clone(),
            program,
        })
    }
}

#[test]
fn test_program_order() {
    use crate::ground::Value;
    use crate::matching::ValueExpression;

    let x = CallParameter::named_output("x", crate::ground::ValueType::Int);
    let bind = |value: i64| {
        Expression::bind_or_check(&x, ValueExpression::constant(Value::Int(value))).expect("ok")
    };

    let mut program = Program::new(vec![bind(3), bind(4)].into());
    program.push(Vec::new().into());
    program.push(vec![bind(1), bind(2)].into());

    let order: Vec<String> = program.map(|expression| format!("{:?}", expression)).collect();
    assert_eq!(order, ["x = 1", "x = 2", "x = 3", "x = 4"]);
}
