//! Mealy output-function precomputation.
//!
//! Ahead of any trace, every transition edge reachable from the initial
//! state is assigned the reward it would yield if taken at that point. The
//! table feeds O(1) edge lookups and the reward-annotated graphviz export.

use crate::{
    automaton::{CompiledAutomaton, StateId},
    error::{Error, Result},
    specification::{MonitoringSpecification, Reward},
    trace::Trace,
};
use log::debug;
use std::collections::HashMap;

/// A total mapping from reachable transition edges to rewards.
///
/// Edges are keyed by `(source state, edge index)`; within a state the
/// outgoing edge list is ordered, so the index identifies the guard.
pub struct OutputFunction<R: Reward> {
    rewards: HashMap<(StateId, usize), R>,
}

impl<R: Reward> OutputFunction<R> {
    /// Builds the table by depth-first traversal from the initial state.
    ///
    /// The traversal carries a working prefix trace, appending each edge's
    /// representative step before scoring the edge and popping it when
    /// backtracking, so sibling edges are evaluated against the shared
    /// prefix. An edge is scored before its target is explored and never
    /// re-explored once scored, which bounds the recursion by the size of
    /// the transition relation and terminates cycles; self-loops are scored
    /// without recursing.
    pub fn build(
        automaton: &CompiledAutomaton,
        specification: &MonitoringSpecification<R>,
    ) -> Result<Self> {
        let mut output = Self {
            rewards: HashMap::new(),
        };
        let mut prefix = Trace::new();
        output.visit(automaton, specification, automaton.initial_state(), &mut prefix)?;
        debug!("output function covers {} edges", output.rewards.len());
        Ok(output)
    }

    fn visit(
        &mut self,
        automaton: &CompiledAutomaton,
        specification: &MonitoringSpecification<R>,
        from: StateId,
        prefix: &mut Trace,
    ) -> Result<()> {
        for (index, (guard, to)) in automaton.transitions_from(from).enumerate() {
            if self.rewards.contains_key(&(from, index)) {
                continue;
            }

            // One representative step per satisfying literal; a conjunction
            // or constant has exactly one. All candidates must agree on the
            // edge's reward.
            let candidates = guard.decompose()?;
            let mut agreed = None;
            for candidate in &candidates {
                prefix.push(candidate.clone());
                let reward = if automaton.is_permanent(to) {
                    if automaton.accepts(prefix)? {
                        specification.s
                    } else {
                        specification.f
                    }
                } else if automaton.prefix_truth(prefix)? {
                    specification.r
                } else {
                    specification.c
                };
                prefix.pop();

                match agreed {
                    None => agreed = Some(reward),
                    Some(previous) if previous == reward => {}
                    Some(_) => {
                        return Err(Error::AmbiguousGuard {
                            state: from,
                            guard: guard.to_string(),
                        })
                    }
                }
            }
            let Some(reward) = agreed else {
                // decompose never returns zero candidates
                continue;
            };
            self.rewards.insert((from, index), reward);

            if to != from {
                if let Some(representative) = candidates.into_iter().next() {
                    prefix.push(representative);
                    self.visit(automaton, specification, to, prefix)?;
                    prefix.pop();
                }
            }
        }
        Ok(())
    }

    /// The reward of the `index`-th outgoing edge of `state`, when that
    /// edge is reachable from the initial state.
    #[must_use]
    pub fn reward(&self, state: StateId, index: usize) -> Option<R> {
        self.rewards.get(&(state, index)).copied()
    }

    /// Number of edges the table covers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::tests::eventually_goal;
    use crate::automaton::AutomatonBuilder;
    use crate::guard::Guard;
    use crate::specification::MonitoringSpecification;

    fn specification() -> MonitoringSpecification<i32> {
        MonitoringSpecification::new("F goal", 0, -1, 5, -5)
    }

    #[test]
    fn covers_every_reachable_edge_once() {
        let automaton = eventually_goal();
        let outputs = OutputFunction::build(&automaton, &specification()).unwrap();

        // both states are reachable here, so totality means every edge of
        // every state carries exactly one reward
        assert!(!outputs.is_empty());
        let waiting = automaton.initial_state();
        let (_, done) = automaton.transitions_from(waiting).nth(1).unwrap();
        for state in [waiting, done] {
            for (index, _) in automaton.transitions_from(state).enumerate() {
                assert!(outputs.reward(state, index).is_some());
            }
        }
        // waiting has two edges, the sink one self-loop
        assert_eq!(outputs.len(), 3);
    }

    #[test]
    fn rewards_follow_the_classification_policy() {
        let automaton = eventually_goal();
        let outputs = OutputFunction::build(&automaton, &specification()).unwrap();
        let waiting = automaton.initial_state();

        let mut edges = automaton.transitions_from(waiting);
        let (stay_guard, _) = edges.next().unwrap();
        assert!(!stay_guard.is_constant());
        // staying: formula still temporarily false
        assert_eq!(outputs.reward(waiting, 0), Some(-1));
        // reaching the accepting sink: permanent success
        assert_eq!(outputs.reward(waiting, 1), Some(5));
        // the sink's self-loop keeps paying the success reward
        let (_, done) = automaton.transitions_from(waiting).nth(1).unwrap();
        assert_eq!(outputs.reward(done, 0), Some(5));
    }

    #[test]
    fn unsupported_guard_structure_is_rejected() {
        // (a & b) | c cannot be decomposed into per-literal steps
        let mut builder = AutomatonBuilder::new();
        let state = builder.new_state(None);
        builder.set_initial(state).unwrap();
        let nested = (Guard::prop("a") & Guard::prop("b")) | Guard::prop("c");
        builder.add_edge(state, nested.clone(), state).unwrap();
        builder.add_edge(state, !nested, state).unwrap();
        let automaton = builder.build().unwrap();

        assert!(matches!(
            OutputFunction::build(&automaton, &specification()),
            Err(Error::UnsupportedGuard { .. })
        ));
    }

    #[test]
    fn disjunctive_candidates_agree() {
        // a | b leads to the sink either way, so its per-literal candidates
        // agree on the reward
        let mut builder = AutomatonBuilder::new();
        let start = builder.new_state(None);
        let sink = builder.new_state(None);
        builder.set_initial(start).unwrap();
        builder.add_accepting(sink).unwrap();
        builder
            .add_edge(start, Guard::prop("a") | Guard::prop("b"), sink)
            .unwrap();
        builder
            .add_edge(start, !Guard::prop("a") & !Guard::prop("b"), start)
            .unwrap();
        builder.add_edge(sink, Guard::True, sink).unwrap();
        let automaton = builder.build().unwrap();

        let outputs = OutputFunction::build(&automaton, &specification()).unwrap();
        assert_eq!(outputs.reward(start, 0), Some(5));
        assert_eq!(outputs.len(), 3);
    }
}
