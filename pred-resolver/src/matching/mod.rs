//! Predicates and the expression language of their bodies.  Nothing
//! here evaluates anything: this module only describes what a clause
//! says, and whether a call site's parameters fit its signature.
mod expression;
mod predicate;

pub use expression::ActionFn;
pub use expression::CheckFn;
pub use expression::ContextSelector;
pub use expression::Expression;
pub use expression::Selector;
pub use expression::SourceSelector;
pub use expression::ValueExpression;
pub use predicate::ParameterMap;
pub use predicate::Predicate;
