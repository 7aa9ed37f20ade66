//! Everything that runs: frames of nested scopes over a binding arena,
//! the view callbacks get of them, and the evaluation of one branch up
//! to completion, failure or its next call.
mod context;
mod continuation;
mod evaluate;
mod scope;

pub use context::Binding;
pub use context::ExpressionContext;
pub use scope::ScopeEntry;
pub use scope::ScopeExit;

pub(crate) use continuation::Branch;
pub(crate) use continuation::SuspendedCall;
pub(crate) use evaluate::Outcome;
pub(crate) use scope::Frame;
