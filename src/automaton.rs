//! Compiled automata over guarded transitions.
//!
//! A [`CompiledAutomaton`] is the artifact a
//! [`FormulaCompiler`](crate::compiler::FormulaCompiler) produces: a
//! deterministic, complete automaton whose transitions are guarded by
//! boolean predicates over named propositions. The automaton is immutable
//! after construction and shared read-only between transducer instances.

pub mod dot;

use crate::{
    error::{Error, Result},
    guard::Guard,
    trace::{Trace, TraceStep},
};
use biodivine_lib_bdd::{BddVariableSet, BddVariableSetBuilder};
use bitvec::vec::BitVec;
use itertools::Itertools;
use log::debug;

/// Opaque identifier of an automaton state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(usize);

#[derive(Debug, Clone)]
struct State {
    id: StateId,
    name: Option<String>,
}

/// A deterministic, complete automaton with guarded transitions.
pub struct CompiledAutomaton {
    initial_state: StateId,
    states: Vec<State>,
    transitions: Vec<Vec<(Guard, StateId)>>,
    accepting: BitVec,
    propositions: Vec<String>,
    manager: BddVariableSet,
}

/// Incremental construction of a [`CompiledAutomaton`].
///
/// [`AutomatonBuilder::build`] validates determinism and completeness of
/// every state and fails fast with a descriptive error on violation.
#[derive(Default)]
pub struct AutomatonBuilder {
    states: Vec<State>,
    transitions: Vec<Vec<(Guard, StateId)>>,
    accepting: Vec<StateId>,
    initial: Option<StateId>,
}

impl AutomatonBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_state(&mut self, name: Option<&str>) -> StateId {
        let id = StateId(self.states.len());
        self.states.push(State {
            id,
            name: name.map(str::to_string),
        });
        self.transitions.push(Vec::default());
        assert_eq!(self.states.len(), self.transitions.len());

        id
    }

    pub fn add_edge(&mut self, from: StateId, guard: Guard, to: StateId) -> Result<()> {
        self.check_state(from)?;
        self.check_state(to)?;
        self.transitions[from.0].push((guard, to));
        Ok(())
    }

    pub fn set_initial(&mut self, state: StateId) -> Result<()> {
        self.check_state(state)?;
        self.initial = Some(state);
        Ok(())
    }

    pub fn add_accepting(&mut self, state: StateId) -> Result<()> {
        self.check_state(state)?;
        self.accepting.push(state);
        Ok(())
    }

    fn check_state(&self, state: StateId) -> Result<()> {
        if state.0 < self.states.len() {
            Ok(())
        } else {
            Err(Error::UnknownState { state })
        }
    }

    pub fn build(self) -> Result<CompiledAutomaton> {
        let initial_state = self.initial.ok_or(Error::NoInitialState)?;

        let mut propositions = Vec::new();
        for outgoing in &self.transitions {
            for (guard, _) in outgoing {
                guard.collect_propositions(&mut propositions);
            }
        }

        let mut builder = BddVariableSetBuilder::new();
        for proposition in &propositions {
            builder.make_variable(proposition);
        }
        let manager = builder.build();

        let mut accepting = BitVec::repeat(false, self.states.len());
        for state in self.accepting {
            accepting.set(state.0, true);
        }

        let automaton = CompiledAutomaton {
            initial_state,
            states: self.states,
            transitions: self.transitions,
            accepting,
            propositions,
            manager,
        };
        automaton.validate()?;
        Ok(automaton)
    }
}

impl CompiledAutomaton {
    /// Checks that every state is deterministic (no two guards overlap) and
    /// complete (the guards cover every propositional assignment).
    fn validate(&self) -> Result<()> {
        for state in &self.states {
            let outgoing = &self.transitions[state.id.0];
            for ((left, _), (right, _)) in outgoing.iter().tuple_combinations() {
                let overlap = left.to_bdd(&self.manager).and(&right.to_bdd(&self.manager));
                if !overlap.is_false() {
                    return Err(Error::NonDeterministic {
                        state: state.id,
                        left: left.to_string(),
                        right: right.to_string(),
                    });
                }
            }

            let covered = outgoing
                .iter()
                .map(|(guard, _)| guard.to_bdd(&self.manager))
                .fold(self.manager.mk_false(), |acc, bdd| acc.or(&bdd));
            if !covered.is_true() {
                return Err(Error::IncompleteAutomaton {
                    state: state.id,
                    covered: outgoing.iter().map(|(guard, _)| guard).join(" | "),
                });
            }
        }
        debug!(
            "validated automaton: {} states, {} transitions, {} propositions",
            self.states.len(),
            self.transitions.iter().map(Vec::len).sum::<usize>(),
            self.propositions.len()
        );
        Ok(())
    }

    #[must_use]
    pub fn initial_state(&self) -> StateId {
        self.initial_state
    }

    #[must_use]
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_accepting(&self, state: StateId) -> bool {
        self.accepting[state.0]
    }

    /// Proposition names referenced by the automaton's guards, in first-use
    /// order.
    #[must_use]
    pub fn propositions(&self) -> &[String] {
        &self.propositions
    }

    pub(crate) fn state_name(&self, state: StateId) -> Option<&str> {
        self.states[state.0].name.as_deref()
    }

    pub fn transitions_from(&self, state: StateId) -> impl Iterator<Item = (&Guard, StateId)> {
        self.transitions[state.0]
            .iter()
            .map(|(guard, target)| (guard, *target))
    }

    /// True iff `state` is inescapable: its single outgoing transition is
    /// guarded by the boolean constant, so no future observation matters.
    #[must_use]
    pub fn is_permanent(&self, state: StateId) -> bool {
        match self.transitions[state.0].as_slice() {
            [(guard, _)] => guard.is_constant(),
            _ => false,
        }
    }

    /// The unique successor of `state` under `step`.
    ///
    /// Relies on the validated determinism: the first guard that evaluates
    /// true identifies the transition. If no guard is true and some guard is
    /// left undecided by the step, the step is an adapter error; if every
    /// guard is decidedly false, the automaton is incomplete after all.
    pub fn successor(&self, state: StateId, step: &TraceStep) -> Result<StateId> {
        let outgoing = &self.transitions[state.0];
        let mut undecided = None;
        for (guard, target) in outgoing {
            match guard.eval(step) {
                Some(true) => return Ok(*target),
                Some(false) => {}
                None => {
                    if undecided.is_none() {
                        let mut referenced = Vec::new();
                        guard.collect_propositions(&mut referenced);
                        undecided = referenced
                            .into_iter()
                            .find(|proposition| step.value(proposition).is_none());
                    }
                }
            }
        }
        match undecided {
            Some(proposition) => Err(Error::MissingProposition { state, proposition }),
            None => Err(Error::IncompleteAutomaton {
                state,
                covered: outgoing.iter().map(|(guard, _)| guard).join(" | "),
            }),
        }
    }

    /// Replays the trace from the initial state.
    pub fn replay(&self, trace: &Trace) -> Result<StateId> {
        let mut state = self.initial_state;
        for step in trace.steps() {
            state = self.successor(state, step)?;
        }
        Ok(state)
    }

    /// Whole-trace acceptance: replay and check the final state.
    pub fn accepts(&self, trace: &Trace) -> Result<bool> {
        Ok(self.is_accepting(self.replay(trace)?))
    }

    /// The three-valued prefix-truth oracle, collapsed to a boolean for
    /// reward purposes.
    ///
    /// For finite-trace dialects compiled to a deterministic automaton,
    /// prefix truth coincides with prefix acceptance, so this delegates to
    /// [`Self::accepts`]. A dialect with a genuinely different oracle
    /// encodes it into the automaton its compiler returns.
    pub fn prefix_truth(&self, trace: &Trace) -> Result<bool> {
        self.accepts(trace)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use maplit::hashmap;

    /// The deterministic automaton for "eventually goal": waits in a
    /// non-accepting state until `goal` holds, then moves to an accepting
    /// sink.
    pub(crate) fn eventually_goal() -> CompiledAutomaton {
        let mut builder = AutomatonBuilder::new();
        let waiting = builder.new_state(Some("waiting"));
        let done = builder.new_state(Some("done"));
        builder.set_initial(waiting).unwrap();
        builder.add_accepting(done).unwrap();
        builder
            .add_edge(waiting, !Guard::prop("goal"), waiting)
            .unwrap();
        builder
            .add_edge(waiting, Guard::prop("goal"), done)
            .unwrap();
        builder.add_edge(done, Guard::True, done).unwrap();
        builder.build().unwrap()
    }

    pub(crate) fn step(goal: bool) -> TraceStep {
        TraceStep::from(hashmap! {"goal".to_string() => goal})
    }

    #[test]
    fn builder_rejects_overlapping_guards() {
        let mut builder = AutomatonBuilder::new();
        let state = builder.new_state(None);
        builder.set_initial(state).unwrap();
        builder.add_edge(state, Guard::prop("a"), state).unwrap();
        builder
            .add_edge(state, Guard::prop("a") | Guard::prop("b"), state)
            .unwrap();
        assert!(matches!(
            builder.build(),
            Err(Error::NonDeterministic { .. })
        ));
    }

    #[test]
    fn builder_rejects_uncovered_assignments() {
        let mut builder = AutomatonBuilder::new();
        let state = builder.new_state(None);
        builder.set_initial(state).unwrap();
        builder.add_edge(state, Guard::prop("a"), state).unwrap();
        assert!(matches!(
            builder.build(),
            Err(Error::IncompleteAutomaton { .. })
        ));
    }

    #[test]
    fn builder_rejects_missing_initial_state() {
        let mut builder = AutomatonBuilder::new();
        builder.new_state(None);
        assert!(matches!(builder.build(), Err(Error::NoInitialState)));
    }

    #[test]
    fn builder_rejects_unknown_states() {
        let mut builder = AutomatonBuilder::new();
        let state = builder.new_state(None);
        let mut other = AutomatonBuilder::new();
        other.new_state(None);
        let stranger = other.new_state(None);
        assert!(matches!(
            builder.add_edge(state, Guard::True, stranger),
            Err(Error::UnknownState { .. })
        ));
    }

    #[test]
    fn successor_follows_the_unique_enabled_edge() {
        let automaton = eventually_goal();
        let waiting = automaton.initial_state();
        let next = automaton.successor(waiting, &step(false)).unwrap();
        assert_eq!(next, waiting);
        let done = automaton.successor(waiting, &step(true)).unwrap();
        assert_ne!(done, waiting);
        assert!(automaton.is_accepting(done));
    }

    #[test]
    fn successor_reports_missing_propositions() {
        let automaton = eventually_goal();
        let result = automaton.successor(automaton.initial_state(), &TraceStep::new());
        assert!(matches!(
            result,
            Err(Error::MissingProposition { proposition, .. }) if proposition == "goal"
        ));
    }

    #[test]
    fn permanence_identifies_the_sink() {
        let automaton = eventually_goal();
        let waiting = automaton.initial_state();
        let done = automaton.successor(waiting, &step(true)).unwrap();
        assert!(!automaton.is_permanent(waiting));
        assert!(automaton.is_permanent(done));
    }

    #[test]
    fn acceptance_replays_the_whole_trace() {
        let automaton = eventually_goal();
        let mut trace = Trace::new();
        trace.push(step(false));
        assert!(!automaton.accepts(&trace).unwrap());
        trace.push(step(true));
        assert!(automaton.accepts(&trace).unwrap());
        // once in the sink, later steps cannot revoke acceptance
        trace.push(step(false));
        assert!(automaton.accepts(&trace).unwrap());
    }
}
