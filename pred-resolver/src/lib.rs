//! An embeddable resolution engine for typed logic predicates.
//!
//! Predicates are named clauses with typed, named parameters and a
//! body of expressions: unify a parameter with a value or another
//! parameter, call another predicate, check a condition, or run an
//! action.  `PredicateProcessor::process` resolves a query against the
//! clauses of a `PredicateProvider` and lazily enumerates every
//! `Solution`, breadth-first across alternative clauses.
mod error;
mod execution;
mod ground;
mod matching;
mod processor;
mod provider;
mod solution;
mod unification;

pub use error::Error;
pub use execution::Binding;
pub use execution::ExpressionContext;
pub use execution::ScopeEntry;
pub use execution::ScopeExit;
pub use ground::FromValue;
pub use ground::Value;
pub use ground::ValueType;
pub use matching::ActionFn;
pub use matching::CheckFn;
pub use matching::ContextSelector;
pub use matching::Expression;
pub use matching::ParameterMap;
pub use matching::Predicate;
pub use matching::Selector;
pub use matching::SourceSelector;
pub use matching::ValueExpression;
pub use processor::PredicateProcessor;
pub use processor::Solutions;
pub use provider::CancellationToken;
pub use provider::Candidates;
pub use provider::InMemoryPredicateProvider;
pub use provider::PredicateProvider;
pub use solution::Solution;
pub use solution::SolutionParameter;
pub use unification::CallParameter;
pub use unification::Parameter;
pub use unification::ParameterKind;
pub use unification::PredicateParameter;
