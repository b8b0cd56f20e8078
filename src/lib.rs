//! # Temporal-Logic Monitoring Rewards
//!
//! Turns a temporal-logic goal specification into an online reward signal
//! for a sequential decision-making agent. Each observation is adapted to a
//! propositional trace step, fed to a reward transducer driving a compiled
//! deterministic automaton, and answered with a scalar reward plus a flag
//! telling whether success or failure is now permanently determined.
//!
//! Pipeline:
//! * [`MonitoringSpecification`]: formula + reward constants {r, c, s, f}
//! * [`FormulaCompiler`] (pluggable): formula → [`CompiledAutomaton`]
//! * [`ObservationAdapter`]: observation → [`TraceStep`]
//! * [`RewardTransducer::advance`]: trace step → (reward, is permanent)
//! * [`MultiRewardMonitor`]: fan-out over several specifications
//!
//! The automaton is shared read-only (`Rc`) between transducer instances;
//! one transducer serves one episode and is `reset` between episodes
//! without recompiling the formula.

#![deny(clippy::all)]
#![warn(clippy::pedantic, clippy::nursery, clippy::cargo)]

pub mod adapter;
pub mod automaton;
pub mod compiler;
pub mod error;
pub mod guard;
pub mod monitor;
pub mod output;
pub mod specification;
pub mod trace;
pub mod transducer;

pub use adapter::{AdapterBuilder, ClosurePredicate, Domain, ObservationAdapter, Predicate};
pub use automaton::{dot::RewardAnnotated, AutomatonBuilder, CompiledAutomaton, StateId};
pub use compiler::FormulaCompiler;
pub use error::{Error, Result};
pub use guard::Guard;
pub use monitor::{MultiRewardMonitor, RewardMonitor};
pub use output::OutputFunction;
pub use specification::{MonitoringSpecification, Reward};
pub use trace::{Trace, TraceStep};
pub use transducer::RewardTransducer;
