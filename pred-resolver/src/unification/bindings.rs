//! Binding cells: one per logical variable, holding at most one value
//! and the set of call parameters currently denoting it.
//!
//! Cells are addressed by `CellId` into a per-branch arena.  Unifying
//! two cells is a union-find merge that always keeps the *older* cell
//! as representative.  Since scopes are strictly nested, every cell a
//! parent scope can see is older than every cell created inside a
//! child scope, so closing the child scope can simply truncate the
//! arena back to where it was when the scope opened.
use super::CallParameter;
use crate::error::Error;
use crate::ground::{Value, ValueType};

/// Handle to a binding cell in a `Bindings` arena.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct CellId(usize);

#[derive(Clone, Debug)]
struct Alias {
    parameter: CallParameter,
    // Scope depth at which the alias was introduced; it disappears
    // when that scope closes.
    depth: usize,
}

#[derive(Clone, Debug)]
struct Cell {
    // Equal to the cell's own index for representatives.
    parent: usize,
    ty: ValueType,
    value: Option<Value>,
    aliases: Vec<Alias>,
}

/// Arena position captured when a scope opens.  Closing the scope
/// rolls the arena back to it.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Watermark {
    cells: usize,
    narrowings: usize,
}

#[derive(Clone, Debug, Default)]
pub struct Bindings {
    cells: Vec<Cell>,
    // Cells whose type `unify` narrowed, with the type they had before.
    narrowings: Vec<(usize, ValueType)>,
}

impl Bindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cells in the arena, representative or not.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns the current position of the arena, to pass to
    /// `close_scope` for a scope opened now.
    #[must_use]
    pub fn watermark(&self) -> Watermark {
        Watermark {
            cells: self.cells.len(),
            narrowings: self.narrowings.len(),
        }
    }

    /// Returns a fresh unbound cell of type `ty`, with no alias.
    pub fn allocate(&mut self, ty: ValueType) -> CellId {
        let index = self.cells.len();
        self.cells.push(Cell {
            parent: index,
            ty,
            value: None,
            aliases: Vec::new(),
        });
        CellId(index)
    }

    /// Returns a fresh cell for `parameter`, aliased to it at scope
    /// `depth`.  Input parameters start out bound to their value.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the input's value does not fit its type, which
    /// `CallParameter` construction normally rules out.
    pub fn allocate_for(&mut self, parameter: &CallParameter, depth: usize) -> Result<CellId, Error> {
        let cell = self.allocate(parameter.parameter_type());
        self.add_alias(cell, parameter, depth);
        if let Some(value) = parameter.input_value() {
            self.bind_value(cell, value.clone())?;
        }

        Ok(cell)
    }

    /// Returns the representative of `cell`'s equivalence class.
    #[must_use]
    pub fn find(&self, cell: CellId) -> CellId {
        let mut index = cell.0;
        while self.cells[index].parent != index {
            index = self.cells[index].parent;
        }

        CellId(index)
    }

    /// Points `cell` directly at its representative.
    pub fn compress(&mut self, cell: CellId) -> CellId {
        let root = self.find(cell);
        self.cells[cell.0].parent = root.0;
        root
    }

    fn root(&self, cell: CellId) -> &Cell {
        &self.cells[self.find(cell).0]
    }

    #[must_use]
    pub fn is_bound(&self, cell: CellId) -> bool {
        self.root(cell).value.is_some()
    }

    #[must_use]
    pub fn value(&self, cell: CellId) -> Option<&Value> {
        self.root(cell).value.as_ref()
    }

    #[must_use]
    pub fn parameter_type(&self, cell: CellId) -> ValueType {
        self.root(cell).ty
    }

    /// Returns the call parameters currently denoting `cell`, oldest
    /// first.
    pub fn aliases(&self, cell: CellId) -> impl Iterator<Item = &CallParameter> {
        self.root(cell).aliases.iter().map(|alias| &alias.parameter)
    }

    /// Records that `parameter` denotes `cell`, at scope `depth`.
    pub fn add_alias(&mut self, cell: CellId, parameter: &CallParameter, depth: usize) {
        let root = self.find(cell);
        let aliases = &mut self.cells[root.0].aliases;
        if aliases.iter().all(|alias| alias.parameter != *parameter) {
            aliases.push(Alias {
                parameter: parameter.clone(),
                depth,
            });
        }
    }

    /// Stores `value` in the (unbound) `cell`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the cell already holds a value, or if `value`
    /// is not assignable to the cell's type.
    pub fn bind_value(&mut self, cell: CellId, value: Value) -> Result<(), Error> {
        let index = self.find(cell).0;
        let root = &mut self.cells[index];
        if root.value.is_some() {
            return Err(Error::AlreadyBound);
        }

        if !root.ty.is_assignable_from(value.value_type()) {
            return Err(Error::TypeMismatch {
                expected: root.ty,
                found: value.value_type(),
            });
        }

        root.value = Some(value);
        Ok(())
    }

    /// Binds `cell` to `value` if it is unbound, and otherwise checks
    /// that it already holds `value`.  Returns whether unification
    /// succeeded.
    ///
    /// # Errors
    ///
    /// Returns `Err` when binding an unbound cell to a value of an
    /// incompatible type.
    pub fn bind_or_check(&mut self, cell: CellId, value: Value) -> Result<bool, Error> {
        match self.value(cell) {
            Some(existing) => Ok(*existing == value),
            None => self.bind_value(cell, value).map(|()| true),
        }
    }

    /// Makes `lhs` and `rhs` denote the same cell.  Unifying a cell
    /// with itself is a no-op; unifying two bound cells succeeds iff
    /// their values are equal.  When only one side is bound, its value
    /// becomes the merged cell's.
    ///
    /// Returns whether unification succeeded.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the two cells' types have no common
    /// inhabitant, or when the bound side's value does not fit the
    /// merged type.
    pub fn unify(&mut self, lhs: CellId, rhs: CellId) -> Result<bool, Error> {
        let (lhs, rhs) = (self.find(lhs), self.find(rhs));
        if lhs == rhs {
            return Ok(true);
        }

        if let (Some(lhs_value), Some(rhs_value)) = (self.value(lhs), self.value(rhs)) {
            return Ok(lhs_value == rhs_value);
        }

        let (root, child) = if lhs < rhs { (lhs, rhs) } else { (rhs, lhs) };
        let (root_ty, child_ty) = (self.cells[root.0].ty, self.cells[child.0].ty);
        let ty = root_ty.meet(child_ty).ok_or(Error::TypeMismatch {
            expected: root_ty,
            found: child_ty,
        })?;

        let child_cell = &mut self.cells[child.0];
        child_cell.parent = root.0;
        let value = child_cell.value.take();
        let aliases = std::mem::take(&mut child_cell.aliases);

        if ty != root_ty {
            self.narrowings.push((root.0, root_ty));
        }

        let root_cell = &mut self.cells[root.0];
        root_cell.ty = ty;
        if root_cell.value.is_none() {
            root_cell.value = value;
        }

        if let Some(value) = &root_cell.value {
            if !ty.is_assignable_from(value.value_type()) {
                return Err(Error::TypeMismatch {
                    expected: ty,
                    found: value.value_type(),
                });
            }
        }

        for alias in aliases {
            if root_cell
                .aliases
                .iter()
                .all(|existing| existing.parameter != alias.parameter)
            {
                root_cell.aliases.push(alias);
            }
        }

        Ok(true)
    }

    /// Discards every cell created since `watermark`, along with the
    /// aliases introduced at scope `depth` or deeper.  Surviving cells
    /// get back the type they had at `watermark`: a callee's narrower
    /// declared type does not outlive its scope.
    pub fn close_scope(&mut self, depth: usize, watermark: Watermark) {
        self.cells.truncate(watermark.cells);
        for cell in &mut self.cells {
            debug_assert!(cell.parent < watermark.cells);
            cell.aliases.retain(|alias| alias.depth < depth);
        }

        while self.narrowings.len() > watermark.narrowings {
            if let Some((index, ty)) = self.narrowings.pop() {
                if let Some(cell) = self.cells.get_mut(index) {
                    cell.ty = ty;
                }
            }
        }
    }
}

#[test]
fn test_self_unify_is_noop() {
    let x = CallParameter::named_output("x", ValueType::Int);
    let mut bindings = Bindings::new();
    let cell = bindings.allocate_for(&x, 0).expect("ok");

    assert_eq!(bindings.unify(cell, cell), Ok(true));
    assert!(!bindings.is_bound(cell));
    assert_eq!(bindings.aliases(cell).collect::<Vec<_>>(), [&x]);

    bindings.bind_value(cell, Value::Int(3)).expect("ok");
    assert_eq!(bindings.unify(cell, cell), Ok(true));
    assert_eq!(bindings.value(cell), Some(&Value::Int(3)));
}

#[test]
fn test_bind_value_errors() {
    let mut bindings = Bindings::new();
    let cell = bindings.allocate(ValueType::Int);

    assert_eq!(
        bindings.bind_value(cell, Value::from("x")),
        Err(Error::TypeMismatch {
            expected: ValueType::Int,
            found: ValueType::Str
        })
    );
    bindings.bind_value(cell, Value::Int(1)).expect("ok");
    assert_eq!(bindings.bind_value(cell, Value::Int(1)), Err(Error::AlreadyBound));
    assert_eq!(bindings.bind_or_check(cell, Value::Int(1)), Ok(true));
    assert_eq!(bindings.bind_or_check(cell, Value::Int(2)), Ok(false));
}

#[test]
fn test_unify_propagates_value() {
    let x = CallParameter::named_output("x", ValueType::Any);
    let y = CallParameter::named_input("y", ValueType::Int, 10).expect("ok");
    let mut bindings = Bindings::new();
    let cx = bindings.allocate_for(&x, 0).expect("ok");
    let cy = bindings.allocate_for(&y, 0).expect("ok");

    assert_eq!(bindings.unify(cx, cy), Ok(true));
    assert_eq!(bindings.find(cx), bindings.find(cy));
    assert_eq!(bindings.value(cx), Some(&Value::Int(10)));
    assert_eq!(bindings.parameter_type(cx), ValueType::Int);
    assert_eq!(bindings.aliases(cy).collect::<Vec<_>>(), [&x, &y]);
}

#[test]
fn test_unify_bound_cells() {
    let mut bindings = Bindings::new();
    let a = bindings.allocate(ValueType::Int);
    let b = bindings.allocate(ValueType::Int);
    let c = bindings.allocate(ValueType::Int);
    bindings.bind_value(a, Value::Int(1)).expect("ok");
    bindings.bind_value(b, Value::Int(1)).expect("ok");
    bindings.bind_value(c, Value::Int(2)).expect("ok");

    assert_eq!(bindings.unify(a, b), Ok(true));
    assert_eq!(bindings.unify(a, c), Ok(false));
}

#[test]
fn test_unify_incompatible_types() {
    let mut bindings = Bindings::new();
    let a = bindings.allocate(ValueType::Int);
    let b = bindings.allocate(ValueType::Str);

    assert!(bindings.unify(a, b).is_err());

    // An `any` cell holding a string can't merge into an int cell.
    let c = bindings.allocate(ValueType::Int);
    let d = bindings.allocate(ValueType::Any);
    bindings.bind_value(d, Value::from("x")).expect("ok");
    assert!(bindings.unify(c, d).is_err());
}

#[test]
fn test_close_scope_keeps_older_cells() {
    let outer = CallParameter::named_output("outer", ValueType::Int);
    let inner = CallParameter::named_output("inner", ValueType::Int);
    let mut bindings = Bindings::new();
    let outer_cell = bindings.allocate_for(&outer, 0).expect("ok");

    let watermark = bindings.watermark();
    let inner_cell = bindings.allocate_for(&inner, 1).expect("ok");
    bindings.bind_value(inner_cell, Value::Int(5)).expect("ok");
    assert_eq!(bindings.unify(inner_cell, outer_cell), Ok(true));
    assert_eq!(bindings.aliases(outer_cell).count(), 2);

    bindings.close_scope(1, watermark);
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings.value(outer_cell), Some(&Value::Int(5)));
    assert_eq!(bindings.aliases(outer_cell).collect::<Vec<_>>(), [&outer]);
}

#[test]
fn test_close_scope_restores_types() {
    let outer = CallParameter::named_output("outer", ValueType::Any);
    let inner = CallParameter::named_output("inner", ValueType::Int);
    let mut bindings = Bindings::new();
    let outer_cell = bindings.allocate_for(&outer, 0).expect("ok");

    let watermark = bindings.watermark();
    let inner_cell = bindings.allocate_for(&inner, 1).expect("ok");
    assert_eq!(bindings.unify(outer_cell, inner_cell), Ok(true));
    assert_eq!(bindings.parameter_type(outer_cell), ValueType::Int);

    bindings.close_scope(1, watermark);
    assert_eq!(bindings.parameter_type(outer_cell), ValueType::Any);
    assert_eq!(bindings.bind_value(outer_cell, Value::from("s")), Ok(()));
}
