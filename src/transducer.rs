//! The reward transducer: the Mealy-style core mapping trace prefixes to
//! rewards.

use crate::{
    automaton::CompiledAutomaton,
    error::Result,
    output::OutputFunction,
    specification::{MonitoringSpecification, Reward},
    trace::{Trace, TraceStep},
};
use std::rc::Rc;

/// Drives a shared [`CompiledAutomaton`] over a growing trace and emits, for
/// every prefix, a reward plus a flag telling whether the outcome is now
/// permanently determined.
///
/// One transducer serves one episode at a time; construction is cheap (no
/// formula recompilation), so parallel episodes use one instance each, all
/// sharing the same automaton.
pub struct RewardTransducer<R: Reward> {
    automaton: Rc<CompiledAutomaton>,
    r: R,
    c: R,
    s: R,
    f: R,
    trace: Trace,
    outputs: Option<OutputFunction<R>>,
}

impl<R: Reward> RewardTransducer<R> {
    pub fn new(
        automaton: Rc<CompiledAutomaton>,
        specification: &MonitoringSpecification<R>,
    ) -> Self {
        Self {
            automaton,
            r: specification.r,
            c: specification.c,
            s: specification.s,
            f: specification.f,
            trace: Trace::new(),
            outputs: None,
        }
    }

    /// Like [`Self::new`], but also precomputes the Mealy output table over
    /// the automaton's transitions.
    pub fn with_output_function(
        automaton: Rc<CompiledAutomaton>,
        specification: &MonitoringSpecification<R>,
    ) -> Result<Self> {
        let mut transducer = Self::new(automaton, specification);
        transducer.outputs = Some(OutputFunction::build(
            &transducer.automaton,
            specification,
        )?);
        Ok(transducer)
    }

    #[must_use]
    pub fn automaton(&self) -> &Rc<CompiledAutomaton> {
        &self.automaton
    }

    /// The precomputed output table, when built at construction.
    #[must_use]
    pub fn output_function(&self) -> Option<&OutputFunction<R>> {
        self.outputs.as_ref()
    }

    /// Appends `step` to the trace, then classifies the whole trace.
    ///
    /// Returns the reward for the current prefix and whether the outcome is
    /// permanently determined. The step stays appended even when
    /// classification fails, mirroring the trace the caller actually fed in.
    pub fn advance(&mut self, step: TraceStep) -> Result<(R, bool)> {
        self.trace.push(step);
        self.classify(&self.trace)
    }

    /// Classifies a trace replayed from the initial state.
    ///
    /// This recomputes from scratch on every call, by contract: the result
    /// is a pure function of the trace contents, independent of call
    /// history. Reaching a permanent state decides the outcome via
    /// whole-trace acceptance; otherwise the collapsed prefix-truth oracle
    /// picks between the transient rewards.
    pub fn classify(&self, trace: &Trace) -> Result<(R, bool)> {
        let mut state = self.automaton.initial_state();
        for step in trace.steps() {
            state = self.automaton.successor(state, step)?;
            if self.automaton.is_permanent(state) {
                let reward = if self.automaton.accepts(trace)? {
                    self.s
                } else {
                    self.f
                };
                return Ok((reward, true));
            }
        }
        let reward = if self.automaton.prefix_truth(trace)? {
            self.r
        } else {
            self.c
        };
        Ok((reward, false))
    }

    /// Number of steps observed since construction or the last reset.
    #[must_use]
    pub fn trace_len(&self) -> usize {
        self.trace.len()
    }

    /// Clears the trace. Nothing else changes: afterwards the transducer
    /// behaves exactly like a fresh one sharing the same automaton and
    /// constants.
    pub fn reset(&mut self) {
        self.trace.clear();
    }
}
