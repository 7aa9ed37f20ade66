//! Resolution is the core of the engine: `PredicateProcessor::process`
//! turns a predicate name and a list of call parameters into a lazy
//! `Solutions` sequence.
//!
//! Work is scheduled through a FIFO queue of pending lookups.  The
//! query itself is the first one.  Every branch that reaches a `Call`
//! is suspended and pushed to the back of the queue; when it reaches
//! the front, each clause of the callee that matches the call's
//! parameters becomes a fresh branch (see `execution::continuation`).
//! Search is thus breadth-first across clauses and call sites, and the
//! host stack never grows with recursion depth.
//!
//! Each call to `Solutions::next` runs branches until one completes,
//! the queue drains, or an error aborts the enumeration.  The
//! cancellation token is checked before every branch and every lookup.
use crate::error::Error;
use crate::execution::{Branch, Outcome, SuspendedCall};
use crate::provider::{CancellationToken, Candidates, PredicateProvider};
use crate::solution::Solution;
use crate::unification::CallParameter;
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Answers queries against the predicates of a provider.
#[derive(Clone, Debug, Default)]
pub struct PredicateProcessor<P> {
    provider: P,
}

impl<P: PredicateProvider> PredicateProcessor<P> {
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    /// Returns the lazy sequence of solutions to `name(call_parameters)`.
    ///
    /// Nothing is looked up or evaluated until the sequence is first
    /// advanced.  Passing the same call parameter at several positions
    /// makes these positions denote a single variable.
    ///
    /// # Errors
    ///
    /// Returns `Err` when `name` is empty.
    pub fn process(
        &self,
        name: &str,
        call_parameters: &[CallParameter],
        cancellation: &CancellationToken,
    ) -> Result<Solutions<'_>, Error> {
        if name.is_empty() {
            return Err(Error::InvalidCall("predicate name must not be empty"));
        }

        let mut queue = VecDeque::new();
        queue.push_back(Pending::Query {
            name: name.to_string(),
            parameters: call_parameters.to_vec(),
        });

        Ok(Solutions {
            provider: &self.provider,
            query: name.to_string(),
            queue,
            current: None,
            cancellation: cancellation.clone(),
            done: false,
        })
    }
}

/// A lookup waiting in the queue.
enum Pending {
    Query {
        name: String,
        parameters: Vec<CallParameter>,
    },
    Call(SuspendedCall),
}

impl Pending {
    fn name(&self) -> &str {
        match self {
            Pending::Query { name, .. } => name,
            Pending::Call(call) => &call.name,
        }
    }
}

/// The clauses for one pending lookup, being turned into branches one
/// at a time.
struct Producer<'p> {
    candidates: Candidates<'p>,
    origin: Pending,
}

impl<'p> Producer<'p> {
    /// Returns the branch for the next matching clause, if any.
    fn next_branch(&mut self, cancellation: &CancellationToken) -> Result<Option<Branch>, Error> {
        let parameters = match &self.origin {
            Pending::Query { parameters, .. } => parameters.as_slice(),
            Pending::Call(call) => call.parameters.as_slice(),
        };

        for candidate in &mut self.candidates {
            cancellation.check()?;
            if !candidate.matches(parameters) {
                trace!(candidate = ?candidate, "signature mismatch");
                continue;
            }

            let branch = match &self.origin {
                Pending::Query { parameters, .. } => Branch::root(&candidate, parameters),
                Pending::Call(call) => call.continuation(&candidate),
            };
            return branch.map(Some);
        }

        Ok(None)
    }
}

/// Lazy sequence of solutions for one query, returned by
/// `PredicateProcessor::process`.
///
/// Once an error has been yielded, the sequence is exhausted.
pub struct Solutions<'p> {
    provider: &'p dyn PredicateProvider,
    query: String,
    queue: VecDeque<Pending>,
    current: Option<Producer<'p>>,
    cancellation: CancellationToken,
    done: bool,
}

impl<'p> Solutions<'p> {
    fn open(&self, pending: Pending) -> Result<Producer<'p>, Error> {
        let provider = self.provider;
        let candidates = provider.lookup(pending.name(), &self.cancellation)?;
        Ok(Producer {
            candidates,
            origin: pending,
        })
    }

    fn step(&mut self) -> Result<Option<Solution>, Error> {
        loop {
            self.cancellation.check()?;

            if self.current.is_none() {
                match self.queue.pop_front() {
                    Some(pending) => self.current = Some(self.open(pending)?),
                    None => return Ok(None),
                }
            }

            let next = match self.current.as_mut() {
                Some(producer) => producer.next_branch(&self.cancellation)?,
                None => continue,
            };

            let branch = match next {
                Some(branch) => branch,
                None => {
                    self.current = None;
                    continue;
                }
            };

            match branch.run()? {
                Outcome::Complete(frame) => {
                    let solution = Solution::from_frame(&frame);
                    debug!(query = %self.query, solution = ?solution, "solution");
                    return Ok(Some(solution));
                }
                Outcome::Failed => {}
                Outcome::Suspended(call) => {
                    trace!(callee = %call.name, pending = self.queue.len(), "suspended on call");
                    self.queue.push_back(Pending::Call(call));
                }
            }
        }
    }
}

impl<'p> Iterator for Solutions<'p> {
    type Item = Result<Solution, Error>;

    fn next(&mut self) -> Option<Result<Solution, Error>> {
        if self.done {
            return None;
        }

        match self.step() {
            Ok(Some(solution)) => Some(Ok(solution)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(error) => {
                debug!(query = %self.query, error = %error, "resolution aborted");
                self.done = true;
                self.queue.clear();
                self.current = None;
                Some(Err(error))
            }
        }
    }
}

impl<'p> std::iter::FusedIterator for Solutions<'p> {}

#[test]
fn test_empty_name_is_rejected() {
    use crate::provider::InMemoryPredicateProvider;

    let processor = PredicateProcessor::new(InMemoryPredicateProvider::new());
    let token = CancellationToken::new();
    assert_eq!(
        processor.process("", &[], &token).map(|_| ()),
        Err(Error::InvalidCall("predicate name must not be empty"))
    );
    assert_eq!(processor.process("p", &[], &token).expect("ok").count(), 0);
}

#[test]
fn test_zero_arity_query() {
    use crate::matching::Predicate;
    use crate::provider::InMemoryPredicateProvider;

    let mut provider = InMemoryPredicateProvider::new();
    provider.add(Predicate::new("unit", vec![], vec![]).expect("ok"));
    let processor = PredicateProcessor::new(provider);

    let solutions: Vec<Solution> = processor
        .process("unit", &[], &CancellationToken::new())
        .expect("ok")
        .collect::<Result<_, _>>()
        .expect("ok");
    assert_eq!(solutions.len(), 1);
    assert!(solutions[0].is_empty());
}
