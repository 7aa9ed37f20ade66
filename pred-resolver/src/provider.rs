//! Where predicates come from.  The processor asks its provider for
//! the clauses of a name every time a query or nested call needs them,
//! so providers may be backed by anything: a fixed table, or a store
//! that loads clauses lazily.
use crate::error::Error;
use crate::matching::Predicate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Cooperative cancellation flag, shared between whoever drives a
/// `Solutions` sequence and whoever may want to stop it (possibly
/// from another thread).  Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.  Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// # Errors
    ///
    /// Returns `Err(Error::Cancelled)` once `cancel` has been called.
    pub fn check(&self) -> Result<(), Error> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Candidate clauses for one lookup, in the order they must be tried.
pub type Candidates<'a> = Box<dyn Iterator<Item = Predicate> + 'a>;

pub trait PredicateProvider {
    /// Returns every clause registered under `name`.  Clauses whose
    /// signature does not match the call are filtered out by the
    /// caller; an unknown name yields an empty sequence.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the lookup itself fails, including when
    /// `cancellation` has been triggered.
    fn lookup<'a>(&'a self, name: &str, cancellation: &CancellationToken) -> Result<Candidates<'a>, Error>;
}

/// A provider backed by a map from names to clauses, kept in
/// registration order.
#[derive(Clone, Debug, Default)]
pub struct InMemoryPredicateProvider {
    predicates: HashMap<String, Vec<Predicate>>,
}

impl InMemoryPredicateProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one more clause under the predicate's name.
    pub fn add(&mut self, predicate: Predicate) {
        self.predicates
            .entry(predicate.name().to_string())
            .or_default()
            .push(predicate);
    }

    /// Number of clauses registered under `name`.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.predicates.get(name).map_or(0, Vec::len)
    }
}

impl Extend<Predicate> for InMemoryPredicateProvider {
    fn extend<T: IntoIterator<Item = Predicate>>(&mut self, iter: T) {
        for predicate in iter {
            self.add(predicate);
        }
    }
}

impl FromIterator<Predicate> for InMemoryPredicateProvider {
    fn from_iter<T: IntoIterator<Item = Predicate>>(iter: T) -> Self {
        let mut provider = Self::new();
        provider.extend(iter);
        provider
    }
}

impl PredicateProvider for InMemoryPredicateProvider {
    fn lookup<'a>(&'a self, name: &str, cancellation: &CancellationToken) -> Result<Candidates<'a>, Error> {
        cancellation.check()?;

        let clauses = self.predicates.get(name).map_or(&[][..], Vec::as_slice);
        debug!(name, clauses = clauses.len(), "predicate lookup");
        Ok(Box::new(clauses.iter().cloned()))
    }
}

#[test]
fn test_lookup_in_registration_order() {
    use crate::ground::ValueType;
    use crate::unification::PredicateParameter;

    let first = Predicate::new("p", vec![PredicateParameter::new("x", ValueType::Int)], vec![]).expect("ok");
    let second = Predicate::new("p", vec![PredicateParameter::new("y", ValueType::Int)], vec![]).expect("ok");
    let other = Predicate::new("q", vec![], vec![]).expect("ok");
    let provider: InMemoryPredicateProvider = vec![first, other, second].into_iter().collect();

    assert_eq!(provider.count("p"), 2);
    let token = CancellationToken::new();
    let names: Vec<String> = provider
        .lookup("p", &token)
        .expect("ok")
        .map(|predicate| predicate.parameters()[0].name().to_string())
        .collect();
    assert_eq!(names, ["x", "y"]);
    assert_eq!(provider.lookup("missing", &token).expect("ok").count(), 0);
}

#[test]
fn test_cancelled_lookup() {
    let provider = InMemoryPredicateProvider::new();
    let token = CancellationToken::new();
    let clone = token.clone();

    assert!(provider.lookup("p", &token).is_ok());
    clone.cancel();
    assert!(token.is_cancelled());
    assert_eq!(provider.lookup("p", &token).map(|_| ()), Err(Error::Cancelled));
}
