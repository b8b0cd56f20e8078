//! Traces and trace steps.

use std::collections::HashMap;

/// One instant's observation: a propositional assignment mapping
/// proposition names to truth values.
///
/// A step may be partial. Guard evaluation is three-valued, so a step only
/// has to decide the propositions the current state's guards actually need
/// (see [`crate::automaton::CompiledAutomaton::successor`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceStep(HashMap<String, bool>);

impl TraceStep {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, proposition: impl Into<String>, value: bool) {
        self.0.insert(proposition.into(), value);
    }

    /// The value assigned to `proposition`, or `None` when unassigned.
    #[must_use]
    pub fn value(&self, proposition: &str) -> Option<bool> {
        self.0.get(proposition).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn propositions(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(name, &value)| (name.as_str(), value))
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for TraceStep {
    fn from_iter<T: IntoIterator<Item = (S, bool)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }
}

impl From<HashMap<String, bool>> for TraceStep {
    fn from(assignment: HashMap<String, bool>) -> Self {
        Self(assignment)
    }
}

/// An ordered, growing sequence of [`TraceStep`]s.
///
/// Append-only between resets; `pop` exists for the output-function
/// traversal, which backtracks over a working prefix.
#[derive(Debug, Clone, Default)]
pub struct Trace {
    steps: Vec<TraceStep>,
}

impl Trace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: TraceStep) {
        self.steps.push(step);
    }

    pub fn pop(&mut self) -> Option<TraceStep> {
        self.steps.pop()
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> impl Iterator<Item = &TraceStep> {
        self.steps.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_assignment() {
        let mut step = TraceStep::new();
        assert!(step.is_empty());
        step.assign("goal", true);
        assert_eq!(step.value("goal"), Some(true));
        assert_eq!(step.value("other"), None);
    }

    #[test]
    fn trace_is_append_only_between_resets() {
        let mut trace = Trace::new();
        trace.push([("goal", false)].into_iter().collect());
        trace.push([("goal", true)].into_iter().collect());
        assert_eq!(trace.len(), 2);
        trace.clear();
        assert!(trace.is_empty());
    }
}
