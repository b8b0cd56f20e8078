//! Observation adaptation: from raw environment observations to trace
//! steps.

use crate::trace::TraceStep;

pub trait Domain: 'static {}

/// A predicate maps values from [`Domain`] to a boolean value.
pub trait Predicate<D: Domain>: 'static {
    fn eval(&self, value: &D) -> bool;
}

impl<D: Domain, F: Fn(&D) -> bool + 'static> Predicate<D> for F {
    fn eval(&self, value: &D) -> bool {
        self(value)
    }
}

/// A predicate computed by the provided closure, named after the
/// proposition it decides.
pub struct ClosurePredicate<D: Domain> {
    pub name: &'static str,
    pub closure: Box<dyn Fn(&D) -> bool + 'static>,
}

impl<D: Domain> Predicate<D> for ClosurePredicate<D> {
    fn eval(&self, value: &D) -> bool {
        (self.closure)(value)
    }
}

impl<D: Domain> std::fmt::Display for ClosurePredicate<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

pub struct AdapterBuilder<D: Domain>(Vec<ClosurePredicate<D>>);

/// Maps raw observations to trace steps: one named predicate per
/// proposition, evaluated in registration order, producing a total
/// assignment over the registered alphabet.
///
/// Pure with respect to the observation; the adapter holds no mutable
/// state.
pub struct ObservationAdapter<D: Domain> {
    predicates: Vec<ClosurePredicate<D>>,
}

impl<D: Domain> Default for AdapterBuilder<D> {
    fn default() -> Self {
        Self(Vec::default())
    }
}

impl<D: Domain> AdapterBuilder<D> {
    pub fn new_predicate(&mut self, predicate: ClosurePredicate<D>) {
        self.0.push(predicate);
    }

    /// Registers a proposition decided by `closure`.
    pub fn proposition(
        &mut self,
        name: &'static str,
        closure: impl Fn(&D) -> bool + 'static,
    ) -> &mut Self {
        self.new_predicate(ClosurePredicate {
            name,
            closure: Box::new(closure),
        });
        self
    }

    #[must_use]
    pub fn build(self) -> ObservationAdapter<D> {
        ObservationAdapter { predicates: self.0 }
    }
}

impl<D: Domain> ObservationAdapter<D> {
    #[must_use]
    pub fn builder() -> AdapterBuilder<D> {
        AdapterBuilder::default()
    }

    /// Evaluates every registered predicate against the observation.
    #[must_use]
    pub fn evaluate(&self, observation: &D) -> TraceStep {
        self.predicates
            .iter()
            .map(|predicate| (predicate.name, predicate.eval(observation)))
            .collect()
    }
}
