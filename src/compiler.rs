//! The formula-compiler seam.

use crate::{automaton::CompiledAutomaton, error::Result};

/// Translates a temporal formula into a [`CompiledAutomaton`].
///
/// One implementation per supported temporal-logic dialect, resolved at
/// configuration time; the core never depends on a concrete logic-parsing
/// library. Implementations must return deterministic, complete automata —
/// [`crate::AutomatonBuilder::build`] enforces both.
///
/// The returned automaton embodies the dialect's truth and acceptance
/// oracles: [`CompiledAutomaton::accepts`] for whole-trace acceptance and
/// [`CompiledAutomaton::prefix_truth`] for the collapsed three-valued
/// prefix truth.
pub trait FormulaCompiler {
    fn compile(&self, formula: &str) -> Result<CompiledAutomaton>;
}
