//! Reward monitors: the transducer's direct caller in a reinforcement
//! learning loop.

use crate::{
    adapter::{Domain, ObservationAdapter},
    automaton::CompiledAutomaton,
    error::Result,
    specification::{MonitoringSpecification, Reward},
    transducer::RewardTransducer,
};
use std::rc::Rc;

/// Takes raw environment observations, maps them to trace steps and feeds
/// the reward transducer, producing the reward signal given to the agent.
pub struct RewardMonitor<D: Domain, R: Reward> {
    adapter: ObservationAdapter<D>,
    transducer: RewardTransducer<R>,
}

impl<D: Domain, R: Reward> RewardMonitor<D, R> {
    pub fn new(
        automaton: Rc<CompiledAutomaton>,
        specification: &MonitoringSpecification<R>,
        adapter: ObservationAdapter<D>,
    ) -> Self {
        Self {
            adapter,
            transducer: RewardTransducer::new(automaton, specification),
        }
    }

    /// Adapts the observation and forwards the step to the transducer,
    /// returning its result unchanged.
    pub fn step(&mut self, observation: &D) -> Result<(R, bool)> {
        let step = self.adapter.evaluate(observation);
        self.transducer.advance(step)
    }

    /// Resets the monitor to its initial state.
    pub fn reset(&mut self) {
        self.transducer.reset();
    }

    #[must_use]
    pub fn transducer(&self) -> &RewardTransducer<R> {
        &self.transducer
    }
}

/// Fan-out over several monitors observing the same environment: rewards
/// are summed, permanence flags are OR-ed.
pub struct MultiRewardMonitor<D: Domain, R: Reward> {
    monitors: Vec<RewardMonitor<D, R>>,
}

impl<D: Domain, R: Reward> MultiRewardMonitor<D, R> {
    #[must_use]
    pub fn new(monitors: Vec<RewardMonitor<D, R>>) -> Self {
        Self { monitors }
    }

    /// Applies `step` to every contained monitor with the same observation.
    pub fn step(&mut self, observation: &D) -> Result<(R, bool)> {
        let mut total = R::default();
        let mut any_permanent = false;
        for monitor in &mut self.monitors {
            let (reward, is_permanent) = monitor.step(observation)?;
            total = total + reward;
            any_permanent = any_permanent || is_permanent;
        }
        Ok((total, any_permanent))
    }

    /// Resets every contained monitor.
    pub fn reset(&mut self) {
        for monitor in &mut self.monitors {
            monitor.reset();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::tests::eventually_goal;

    struct Position(f64);

    impl Domain for Position {}

    fn goal_adapter() -> ObservationAdapter<Position> {
        let mut builder = ObservationAdapter::builder();
        builder.proposition("goal", |p: &Position| p.0 >= 0.5);
        builder.build()
    }

    fn monitor(automaton: &Rc<CompiledAutomaton>) -> RewardMonitor<Position, i32> {
        RewardMonitor::new(
            automaton.clone(),
            &MonitoringSpecification::new("F goal", 0, -1, 0, 0),
            goal_adapter(),
        )
    }

    #[test]
    fn successful_episode_accumulates_minus_five() {
        let automaton = Rc::new(eventually_goal());
        let mut monitor = monitor(&automaton);

        let mut total = 0;
        for value in [0.0, -1.0, 0.2, 0.0, 0.3, 0.6, 0.4] {
            let (reward, _) = monitor.step(&Position(value)).unwrap();
            total += reward;
        }
        assert_eq!(total, -5);
    }

    #[test]
    fn aggregation_doubles_reward_and_ors_permanence() {
        let automaton = Rc::new(eventually_goal());
        let mut single = monitor(&automaton);
        let mut multi = MultiRewardMonitor::new(vec![monitor(&automaton), monitor(&automaton)]);
        assert_eq!(multi.len(), 2);

        for value in [0.0, 0.3, 0.6, 0.4] {
            let (reward, is_permanent) = single.step(&Position(value)).unwrap();
            let (sum, any_permanent) = multi.step(&Position(value)).unwrap();
            assert_eq!(sum, reward + reward);
            assert_eq!(any_permanent, is_permanent);
        }
    }

    #[test]
    fn reset_fans_out() {
        let automaton = Rc::new(eventually_goal());
        let mut multi = MultiRewardMonitor::new(vec![monitor(&automaton), monitor(&automaton)]);
        multi.step(&Position(0.7)).unwrap();
        multi.reset();
        // after reset the goal has not been seen yet
        assert_eq!(multi.step(&Position(0.0)).unwrap(), (-2, false));
    }
}
