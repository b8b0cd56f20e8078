//! Error types for monitoring rewards.
//!
//! Every fallible operation in the crate returns [`Result`]. Errors are
//! surfaced to the immediate caller; computations are deterministic and
//! pure, so there is no retry or recovery machinery.

use crate::automaton::StateId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Two outgoing guards of the same state overlap: some propositional
    /// assignment enables both transitions.
    #[error("state {state:?} is non-deterministic: guards `{left}` and `{right}` overlap")]
    NonDeterministic {
        state: StateId,
        left: String,
        right: String,
    },

    /// Some propositional assignment enables no outgoing transition.
    #[error("state {state:?} is incomplete: guards `{covered}` do not cover every assignment")]
    IncompleteAutomaton { state: StateId, covered: String },

    /// A guard's boolean structure is none of: constant true, literal,
    /// negated literal, conjunction of literals, disjunction of literals.
    #[error("guard `{guard}` has an unsupported boolean structure")]
    UnsupportedGuard { guard: String },

    /// The per-literal representative steps of a disjunctive guard do not
    /// agree on the reward the edge would yield.
    #[error("disjunctive guard `{guard}` at state {state:?} yields conflicting rewards")]
    AmbiguousGuard { state: StateId, guard: String },

    /// A trace step left a guard needed to pick the next transition
    /// undecided.
    #[error("trace step is missing proposition `{proposition}` referenced at state {state:?}")]
    MissingProposition { state: StateId, proposition: String },

    /// The builder was finished without an initial state.
    #[error("automaton has no initial state")]
    NoInitialState,

    /// A transition or marker referenced a state the builder never created.
    #[error("unknown state {state:?}")]
    UnknownState { state: StateId },

    /// The formula compiler rejected the input formula.
    #[error("formula compilation failed: {reason}")]
    Compile { reason: String },
}
