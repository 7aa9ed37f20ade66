//! Unification in this engine is deliberately flat: parameters carry
//! scalar values, never terms, so unifying two variables only ever
//! means making them denote the same binding cell, and unifying a
//! variable with a value means storing the value in that cell (or
//! checking it against what is already there).
//!
//! Parameters are identified by a sequence id, not by name: two
//! output parameters named "x" are distinct variables.  Binding cells
//! live in a per-branch arena and are merged union-find style, which
//! keeps sibling branches from ever sharing mutable state: each
//! branch owns (a clone of) its arena.
mod bindings;
mod parameter;

pub use bindings::Bindings;
pub use bindings::CellId;
pub use bindings::Watermark;
pub use parameter::CallParameter;
pub use parameter::Parameter;
pub use parameter::ParameterId;
pub use parameter::ParameterKind;
pub use parameter::PredicateParameter;
