//! Monitoring specifications.

use std::fmt::{Debug, Display};
use std::ops::Add;

/// A scalar reward value.
///
/// `Default` must be the additive zero; it seeds aggregation over multiple
/// monitors.
pub trait Reward:
    Copy + PartialEq + PartialOrd + Add<Output = Self> + Default + Debug + Display + 'static
{
}

impl Reward for i32 {}
impl Reward for i64 {}
impl Reward for f32 {}
impl Reward for f64 {}

/// A 5-tuple monitoring-rewards specification: a temporal formula plus the
/// four reward constants attached to the truth/acceptance status of the
/// current partial trace.
///
/// Created once at configuration time and never mutated. This is the
/// crate's only serializable configuration surface.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonitoringSpecification<R: Reward> {
    /// The temporal formula, in the syntax of whichever
    /// [`FormulaCompiler`](crate::compiler::FormulaCompiler) is plugged in.
    pub formula: String,
    /// Reward while the formula is temporarily true in the partial trace.
    pub r: R,
    /// Reward (cost) while the formula is temporarily false.
    pub c: R,
    /// Reward once the formula is permanently true.
    pub s: R,
    /// Reward once the formula is permanently false.
    pub f: R,
}

impl<R: Reward> MonitoringSpecification<R> {
    pub fn new(formula: impl Into<String>, r: R, c: R, s: R, f: R) -> Self {
        Self {
            formula: formula.into(),
            r,
            c,
            s,
            f,
        }
    }
}
