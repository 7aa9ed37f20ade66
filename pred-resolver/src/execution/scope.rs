//! Variable scopes.  Every predicate invocation opens a scope mapping
//! its declared parameters to the caller's arguments, and collects the
//! local variables its body introduces.  A `Frame` is the full stack
//! of open scopes for one branch, along with that branch's private
//! binding arena.
use crate::error::Error;
use crate::ground::ValueType;
use crate::unification::{Bindings, CallParameter, CellId, Parameter, ParameterId, PredicateParameter, Watermark};
use std::collections::HashMap;
use tracing::trace;

/// A call parameter and the cell it denotes in some frame.
#[derive(Clone, Debug)]
pub struct Slot {
    pub(crate) parameter: CallParameter,
    pub(crate) cell: CellId,
}

/// Payload of the engine-only `Expression::BeginScope`: declared
/// parameters of the callee paired with the caller's arguments.
#[derive(Clone, Debug)]
pub struct ScopeEntry {
    arguments: Vec<(PredicateParameter, Slot)>,
}

impl ScopeEntry {
    pub(crate) fn new(arguments: Vec<(PredicateParameter, Slot)>) -> Self {
        Self { arguments }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }
}

/// Payload of the engine-only `Expression::EndScope`.
#[derive(Clone, Debug)]
pub struct ScopeExit(());

impl ScopeExit {
    pub(crate) fn new() -> Self {
        ScopeExit(())
    }
}

#[derive(Clone, Debug)]
struct Scope {
    arguments: Vec<(PredicateParameter, Slot)>,
    locals: HashMap<ParameterId, Slot>,
    // Arena position when the scope opened; everything past it belongs
    // to this scope (or deeper ones).
    watermark: Watermark,
}

impl Scope {
    fn slots_mut(&mut self) -> impl Iterator<Item = &mut Slot> {
        self.arguments
            .iter_mut()
            .map(|(_, slot)| slot)
            .chain(self.locals.values_mut())
    }
}

/// A parameter reference resolved in the current scope: the slot it
/// denotes, and the type it was declared with.  The latter is
/// narrower than the cell's when an `any` output flows into a typed
/// declared parameter.
#[derive(Clone, Debug)]
pub struct Resolved {
    pub(crate) slot: Slot,
    pub(crate) ty: ValueType,
}

#[derive(Clone, Debug)]
pub struct Frame {
    bindings: Bindings,
    scopes: Vec<Scope>,
}

impl Frame {
    /// Returns the frame for a top-level query: a single scope mapping
    /// `declared` parameters to the caller's `call_parameters`.  The
    /// same call parameter passed twice denotes a single cell.
    ///
    /// # Errors
    ///
    /// Returns `Err` on arity mismatch.
    pub fn root(declared: &[PredicateParameter], call_parameters: &[CallParameter]) -> Result<Self, Error> {
        if declared.len() != call_parameters.len() {
            return Err(Error::InvalidCall("arity mismatch"));
        }

        let mut bindings = Bindings::new();
        let mut cells: HashMap<ParameterId, CellId> = HashMap::new();
        let mut arguments = Vec::with_capacity(declared.len());
        for (declared, parameter) in declared.iter().zip(call_parameters) {
            let cell = match cells.get(&parameter.id()) {
                Some(cell) => *cell,
                None => {
                    let cell = bindings.allocate_for(parameter, 0)?;
                    cells.insert(parameter.id(), cell);
                    cell
                }
            };

            arguments.push((
                declared.clone(),
                Slot {
                    parameter: parameter.clone(),
                    cell,
                },
            ));
        }

        Ok(Self {
            bindings,
            scopes: vec![Scope {
                arguments,
                locals: HashMap::new(),
                watermark: Watermark::default(),
            }],
        })
    }

    #[must_use]
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut Bindings {
        &mut self.bindings
    }

    /// Depth of the innermost scope; the query's own scope is 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    fn current(&self) -> &Scope {
        &self.scopes[self.scopes.len() - 1]
    }

    fn current_mut(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    /// Slots of the outermost scope's arguments, in call order.
    pub fn root_arguments(&self) -> impl Iterator<Item = &Slot> {
        self.scopes[0].arguments.iter().map(|(_, slot)| slot)
    }

    pub fn open_scope(&mut self, entry: &ScopeEntry) {
        let watermark = self.bindings.watermark();
        trace!(depth = self.scopes.len(), arguments = entry.len(), "open scope");
        self.scopes.push(Scope {
            arguments: entry.arguments.clone(),
            locals: HashMap::new(),
            watermark,
        });
    }

    /// Pops the innermost scope, discarding its local cells and
    /// aliases, and points the enclosing scope's slots straight at
    /// their surviving cells.
    ///
    /// # Errors
    ///
    /// Returns `Err` when only the query's own scope is open.
    pub fn close_scope(&mut self) -> Result<(), Error> {
        if self.scopes.len() < 2 {
            return Err(Error::InvalidExpression("unbalanced end of scope".into()));
        }

        let depth = self.depth();
        trace!(depth, "close scope");
        if let Some(scope) = self.scopes.pop() {
            self.bindings.close_scope(depth, scope.watermark);
        }

        self.redirect();
        Ok(())
    }

    /// Rewrites every slot of the innermost scope to reference its
    /// cell's representative.
    pub fn redirect(&mut self) {
        let last = self.scopes.len() - 1;
        let (scopes, bindings) = (&mut self.scopes, &mut self.bindings);
        for slot in scopes[last].slots_mut() {
            slot.cell = bindings.compress(slot.cell);
        }
    }

    /// Resolves `parameter` in the innermost scope.  Call parameters
    /// not seen before become local variables of that scope.
    ///
    /// # Errors
    ///
    /// Returns `Err` when `parameter` is a declared parameter of some
    /// other predicate.
    pub fn resolve(&mut self, parameter: &Parameter) -> Result<Resolved, Error> {
        if let Some(resolved) = self.lookup(parameter)? {
            return Ok(resolved);
        }

        // Only call parameters may be missing at this point.
        let call_parameter = match parameter {
            Parameter::Call(call_parameter) => call_parameter,
            Parameter::Declared(declared) => return Err(Error::UnknownParameter(declared.name().into())),
        };

        let depth = self.depth();
        let cell = self.bindings.allocate_for(call_parameter, depth)?;
        let slot = Slot {
            parameter: call_parameter.clone(),
            cell,
        };
        self.current_mut()
            .locals
            .insert(call_parameter.id(), slot.clone());

        Ok(Resolved {
            slot,
            ty: call_parameter.parameter_type(),
        })
    }

    /// Looks `parameter` up in the innermost scope without introducing
    /// local variables.  A call parameter is either one of the
    /// arguments the scope was opened with, or a local variable.
    ///
    /// # Errors
    ///
    /// Returns `Err` when `parameter` is a declared parameter that is
    /// not in scope.
    pub fn lookup(&self, parameter: &Parameter) -> Result<Option<Resolved>, Error> {
        let scope = self.current();
        match parameter {
            Parameter::Declared(declared) => scope
                .arguments
                .iter()
                .find(|(candidate, _)| candidate == declared)
                .map(|(_, slot)| {
                    Some(Resolved {
                        slot: slot.clone(),
                        ty: declared.parameter_type(),
                    })
                })
                .ok_or_else(|| Error::UnknownParameter(declared.name().into())),
            Parameter::Call(call_parameter) => {
                let slot = scope
                    .arguments
                    .iter()
                    .map(|(_, slot)| slot)
                    .find(|slot| slot.parameter == *call_parameter)
                    .or_else(|| scope.locals.get(&call_parameter.id()));

                Ok(slot.map(|slot| Resolved {
                    slot: slot.clone(),
                    ty: call_parameter.parameter_type(),
                }))
            }
        }
    }

    /// Looks a parameter up by name in the innermost scope.
    ///
    /// The body's own names (declared parameters and local variables)
    /// come first.  Only when none matches are the names of the
    /// caller's arguments considered, so that a callee may read the
    /// caller's variable by the name the caller gave it.  Matches
    /// denoting the same cell count once.
    ///
    /// # Errors
    ///
    /// Returns `Err` when no parameter has that name, or when several
    /// distinct variables do.
    pub fn lookup_name(&self, name: &str) -> Result<Resolved, Error> {
        let scope = self.current();
        let declared = scope
            .arguments
            .iter()
            .filter(|(declared, _)| declared.name() == name)
            .map(|(declared, slot)| Resolved {
                slot: slot.clone(),
                ty: declared.parameter_type(),
            });
        let locals = scope
            .locals
            .values()
            .filter(|slot| slot.parameter.name() == Some(name))
            .map(Resolved::of_call_parameter);

        if let Some(resolved) = self.unique(name, declared.chain(locals))? {
            return Ok(resolved);
        }

        let arguments = scope
            .arguments
            .iter()
            .map(|(_, slot)| slot)
            .filter(|slot| slot.parameter.name() == Some(name))
            .map(Resolved::of_call_parameter);

        self.unique(name, arguments)?
            .ok_or_else(|| Error::UnknownParameter(name.into()))
    }

    fn unique(&self, name: &str, matches: impl Iterator<Item = Resolved>) -> Result<Option<Resolved>, Error> {
        let mut found: Option<Resolved> = None;
        for resolved in matches {
            if let Some(first) = &found {
                if self.bindings.find(first.slot.cell) != self.bindings.find(resolved.slot.cell) {
                    return Err(Error::AmbiguousParameter(name.into()));
                }
                continue;
            }

            found = Some(resolved);
        }

        Ok(found)
    }
}

impl Resolved {
    fn of_call_parameter(slot: &Slot) -> Self {
        Self {
            slot: slot.clone(),
            ty: slot.parameter.parameter_type(),
        }
    }
}

#[test]
fn test_root_shares_repeated_parameter() {
    let x = CallParameter::named_output("x", ValueType::Int);
    let declared = [
        PredicateParameter::new("a", ValueType::Int),
        PredicateParameter::new("b", ValueType::Int),
    ];
    let frame = Frame::root(&declared, &[x.clone(), x.clone()]).expect("ok");

    let cells: Vec<CellId> = frame.root_arguments().map(|slot| slot.cell).collect();
    assert_eq!(cells[0], cells[1]);
    assert_eq!(frame.bindings().len(), 1);
}

#[test]
fn test_locals_are_per_scope() {
    let n = PredicateParameter::new("n", ValueType::Int);
    let local = CallParameter::named_output("local", ValueType::Int);
    let mut frame = Frame::root(&[n.clone()], &[CallParameter::literal(3)]).expect("ok");

    let outer = frame.resolve(&Parameter::from(&local)).expect("ok");
    let argument = frame.root_arguments().next().cloned().expect("one argument");
    let entry = ScopeEntry::new(vec![(n.clone(), argument.clone())]);
    frame.open_scope(&entry);
    assert_eq!(frame.depth(), 1);

    // The same local inside the nested scope is a different variable.
    let inner = frame.resolve(&Parameter::from(&local)).expect("ok");
    assert_ne!(inner.slot.cell, outer.slot.cell);

    // ... while the declared parameter reaches the caller's cell.
    let declared = frame.resolve(&Parameter::from(&n)).expect("ok");
    assert_eq!(declared.slot.cell, argument.cell);

    frame.close_scope().expect("ok");
    assert_eq!(frame.depth(), 0);
    assert!(frame.close_scope().is_err());
}

#[test]
fn test_arguments_resolve_by_identity() {
    let n = PredicateParameter::new("n", ValueType::Int);
    let caller = CallParameter::named_output("caller", ValueType::Int);
    let mut frame = Frame::root(&[n.clone()], &[caller.clone()]).expect("ok");
    let argument = frame.root_arguments().next().cloned().expect("one argument");

    // The query's own call parameter is the argument, not a new local.
    let resolved = frame.resolve(&Parameter::from(&caller)).expect("ok");
    assert_eq!(resolved.slot.cell, argument.cell);
    assert_eq!(frame.bindings().len(), 1);

    // Same in a nested scope the caller's variable is passed into.
    let m = PredicateParameter::new("m", ValueType::Int);
    frame.open_scope(&ScopeEntry::new(vec![(m, argument.clone())]));
    let resolved = frame.resolve(&Parameter::from(&caller)).expect("ok");
    assert_eq!(resolved.slot.cell, argument.cell);
}

#[test]
fn test_argument_names() {
    let n = PredicateParameter::new("n", ValueType::Int);
    let output = CallParameter::named_output("output", ValueType::Int);
    let mut frame = Frame::root(&[n.clone()], &[output.clone()]).expect("ok");
    let argument = frame.root_arguments().next().cloned().expect("one argument");

    // Declared name and argument name denote one variable.
    assert_eq!(frame.lookup_name("n").map(|r| r.slot.cell), Ok(argument.cell));
    assert_eq!(frame.lookup_name("output").map(|r| r.slot.cell), Ok(argument.cell));

    // A callee sees the caller's argument under the caller's name...
    let p = PredicateParameter::new("p", ValueType::Int);
    frame.open_scope(&ScopeEntry::new(vec![(p, argument.clone())]));
    assert_eq!(frame.lookup_name("output").map(|r| r.slot.cell), Ok(argument.cell));
    assert_eq!(frame.lookup_name("output").map(|r| r.ty), Ok(ValueType::Int));

    // ... unless its own body has a variable by that name.
    let shadow = CallParameter::named_output("output", ValueType::Int);
    let local = frame.resolve(&Parameter::from(&shadow)).expect("ok");
    assert_eq!(frame.lookup_name("output").map(|r| r.slot.cell), Ok(local.slot.cell));
}

#[test]
fn test_lookup_name() {
    let n = PredicateParameter::new("n", ValueType::Int);
    let mut frame = Frame::root(&[n], &[CallParameter::literal(3)]).expect("ok");

    assert!(frame.lookup_name("n").is_ok());
    assert_eq!(
        frame.lookup_name("m").map(|_| ()),
        Err(Error::UnknownParameter("m".into()))
    );

    let shadow = CallParameter::named_output("n", ValueType::Int);
    frame.resolve(&Parameter::from(&shadow)).expect("ok");
    assert_eq!(
        frame.lookup_name("n").map(|_| ()),
        Err(Error::AmbiguousParameter("n".into()))
    );
}

#[test]
fn test_unknown_declared_parameter() {
    let n = PredicateParameter::new("n", ValueType::Int);
    let stranger = PredicateParameter::new("stranger", ValueType::Int);
    let mut frame = Frame::root(&[n], &[CallParameter::literal(3)]).expect("ok");

    assert!(frame.resolve(&Parameter::from(&stranger)).is_err());
}
