//! Transition guards: boolean predicates over named propositions.

use crate::{
    error::{Error, Result},
    trace::TraceStep,
};
use biodivine_lib_bdd::{Bdd, BddVariableSet};
use itertools::Itertools;

/// A boolean expression over named propositions, guarding one automaton
/// transition.
///
/// Guards are evaluated three-valued against a (possibly partial)
/// [`TraceStep`]: an unassigned proposition yields "unknown" unless a
/// short-circuit decides the connective anyway.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Guard {
    /// The constant true, taken regardless of any proposition's value.
    True,
    Prop(String),
    Not(Box<Guard>),
    And(Vec<Guard>),
    Or(Vec<Guard>),
}

impl Guard {
    #[must_use]
    pub fn prop(name: impl Into<String>) -> Self {
        Self::Prop(name.into())
    }

    /// True iff the guard is the boolean constant, i.e. input-independent.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        matches!(self, Self::True)
    }

    /// Three-valued evaluation: `None` when the step leaves the guard
    /// undecided.
    #[must_use]
    pub fn eval(&self, step: &TraceStep) -> Option<bool> {
        match self {
            Self::True => Some(true),
            Self::Prop(name) => step.value(name),
            Self::Not(inner) => inner.eval(step).map(|value| !value),
            Self::And(operands) => {
                let mut unknown = false;
                for operand in operands {
                    match operand.eval(step) {
                        Some(false) => return Some(false),
                        Some(true) => {}
                        None => unknown = true,
                    }
                }
                if unknown {
                    None
                } else {
                    Some(true)
                }
            }
            Self::Or(operands) => {
                let mut unknown = false;
                for operand in operands {
                    match operand.eval(step) {
                        Some(true) => return Some(true),
                        Some(false) => {}
                        None => unknown = true,
                    }
                }
                if unknown {
                    None
                } else {
                    Some(false)
                }
            }
        }
    }

    /// The guard as a literal: `Some((proposition, polarity))` for a plain
    /// or negated proposition, `None` otherwise.
    #[must_use]
    pub fn as_literal(&self) -> Option<(&str, bool)> {
        match self {
            Self::Prop(name) => Some((name, true)),
            Self::Not(inner) => match inner.as_ref() {
                Self::Prop(name) => Some((name, false)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Decomposes the guard into representative trace steps.
    ///
    /// * constant true → the empty assignment,
    /// * literal → the single satisfying assignment,
    /// * conjunction of literals → one step combining every literal's
    ///   polarity,
    /// * disjunction of literals → one candidate step per literal (every
    ///   candidate satisfies the guard on its own).
    ///
    /// Any other boolean structure is rejected with
    /// [`Error::UnsupportedGuard`].
    pub fn decompose(&self) -> Result<Vec<TraceStep>> {
        match self {
            Self::True => Ok(vec![TraceStep::new()]),
            Self::Prop(_) | Self::Not(_) => {
                let (name, polarity) = self.as_literal().ok_or_else(|| self.unsupported())?;
                Ok(vec![[(name, polarity)].into_iter().collect()])
            }
            Self::And(operands) => {
                let mut step = TraceStep::new();
                for operand in operands {
                    let (name, polarity) = operand.as_literal().ok_or_else(|| self.unsupported())?;
                    step.assign(name, polarity);
                }
                Ok(vec![step])
            }
            Self::Or(operands) => operands
                .iter()
                .map(|operand| -> Result<TraceStep> {
                    let (name, polarity) =
                        operand.as_literal().ok_or_else(|| self.unsupported())?;
                    Ok([(name, polarity)].into_iter().collect())
                })
                .collect(),
        }
    }

    fn unsupported(&self) -> Error {
        Error::UnsupportedGuard {
            guard: self.to_string(),
        }
    }

    /// Collects every proposition name the guard references.
    pub(crate) fn collect_propositions(&self, out: &mut Vec<String>) {
        match self {
            Self::True => {}
            Self::Prop(name) => {
                if !out.contains(name) {
                    out.push(name.clone());
                }
            }
            Self::Not(inner) => inner.collect_propositions(out),
            Self::And(operands) | Self::Or(operands) => {
                for operand in operands {
                    operand.collect_propositions(out);
                }
            }
        }
    }

    /// Lowers the guard to a BDD over `set`.
    ///
    /// The variable set is built from the names collected by
    /// [`Self::collect_propositions`], so every referenced proposition has a
    /// variable; a name missing from the set lowers to false.
    pub(crate) fn to_bdd(&self, set: &BddVariableSet) -> Bdd {
        match self {
            Self::True => set.mk_true(),
            Self::Prop(name) => set
                .var_by_name(name)
                .map_or_else(|| set.mk_false(), |var| set.mk_literal(var, true)),
            Self::Not(inner) => inner.to_bdd(set).not(),
            Self::And(operands) => operands
                .iter()
                .map(|operand| operand.to_bdd(set))
                .fold(set.mk_true(), |acc, bdd| acc.and(&bdd)),
            Self::Or(operands) => operands
                .iter()
                .map(|operand| operand.to_bdd(set))
                .fold(set.mk_false(), |acc, bdd| acc.or(&bdd)),
        }
    }
}

impl std::ops::Not for Guard {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::Not(Box::new(self))
    }
}

impl std::ops::BitAnd for Guard {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        match self {
            Self::And(mut operands) => {
                operands.push(rhs);
                Self::And(operands)
            }
            lhs => Self::And(vec![lhs, rhs]),
        }
    }
}

impl std::ops::BitOr for Guard {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        match self {
            Self::Or(mut operands) => {
                operands.push(rhs);
                Self::Or(operands)
            }
            lhs => Self::Or(vec![lhs, rhs]),
        }
    }
}

impl std::fmt::Display for Guard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::True => write!(f, "true"),
            Self::Prop(name) => write!(f, "{name}"),
            Self::Not(inner) => match inner.as_ref() {
                Self::Prop(name) => write!(f, "!{name}"),
                composite => write!(f, "!({composite})"),
            },
            Self::And(operands) => {
                write!(f, "({})", operands.iter().format(" & "))
            }
            Self::Or(operands) => {
                write!(f, "({})", operands.iter().format(" | "))
            }
        }
    }
}
