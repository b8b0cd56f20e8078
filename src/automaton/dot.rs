//! Graphviz encoding of compiled automata.
//!
//! Two views: the plain automaton with guard-labelled edges, and a
//! reward-annotated view whose edges carry `guard / reward` labels sourced
//! from a precomputed [`OutputFunction`].

use super::{CompiledAutomaton, StateId};
use crate::{output::OutputFunction, specification::Reward};
use std::borrow::Cow;

#[derive(Debug, Clone, Copy)]
pub enum DrawNode {
    Initial,
    State(StateId),
}

#[derive(Debug, Clone, Copy)]
pub enum DrawEdge {
    ToInitial,
    Edge(StateId, usize, StateId),
}

type Nd = DrawNode;
type Ed = DrawEdge;

/// A compiled automaton paired with its output function, rendering each
/// edge as `guard / reward`.
pub struct RewardAnnotated<'a, R: Reward> {
    automaton: &'a CompiledAutomaton,
    outputs: &'a OutputFunction<R>,
}

impl<'a, R: Reward> RewardAnnotated<'a, R> {
    #[must_use]
    pub fn new(automaton: &'a CompiledAutomaton, outputs: &'a OutputFunction<R>) -> Self {
        Self { automaton, outputs }
    }
}

impl CompiledAutomaton {
    fn draw_nodes(&self) -> dot::Nodes<'_, Nd> {
        self.states
            .iter()
            .map(|s| DrawNode::State(s.id))
            .chain(std::iter::once(DrawNode::Initial))
            .collect()
    }

    fn draw_edges(&self) -> dot::Edges<'_, Ed> {
        Cow::Owned(
            self.states
                .iter()
                .zip(&self.transitions)
                .flat_map(|(s, t)| {
                    t.iter()
                        .enumerate()
                        .map(move |(idx, (_, target))| DrawEdge::Edge(s.id, idx, *target))
                })
                .chain(std::iter::once(DrawEdge::ToInitial))
                .collect::<Vec<_>>(),
        )
    }

    fn draw_node_id<'x>(n: &Nd) -> dot::Id<'x> {
        match n {
            DrawNode::Initial => dot::Id::new("_init".to_string()).unwrap(),
            DrawNode::State(s) => dot::Id::new(format!("N{}", s.0)).unwrap(),
        }
    }

    fn draw_node_label(&self, n: &Nd) -> dot::LabelText<'_> {
        match n {
            DrawNode::Initial => dot::LabelText::LabelStr("".into()),
            DrawNode::State(s) => match self.state_name(*s) {
                Some(name) => dot::LabelText::LabelStr(Cow::Borrowed(name)),
                None => dot::LabelText::LabelStr(format!("q{}", s.0).into()),
            },
        }
    }

    fn draw_node_style(&self, n: &Nd) -> dot::Style {
        match n {
            DrawNode::Initial => dot::Style::Invisible,
            DrawNode::State(s) => {
                if self.is_accepting(*s) {
                    dot::Style::Filled
                } else {
                    dot::Style::None
                }
            }
        }
    }
}

impl<'a> dot::Labeller<'a, Nd, Ed> for CompiledAutomaton {
    fn graph_id(&'a self) -> dot::Id<'a> {
        dot::Id::new("automaton").unwrap()
    }

    fn node_id(&'a self, n: &Nd) -> dot::Id<'a> {
        Self::draw_node_id(n)
    }

    fn node_label<'b>(&'b self, n: &Nd) -> dot::LabelText<'b> {
        self.draw_node_label(n)
    }

    fn node_style(&self, n: &Nd) -> dot::Style {
        self.draw_node_style(n)
    }

    fn edge_label<'b>(&'b self, e: &Ed) -> dot::LabelText<'b> {
        match e {
            DrawEdge::ToInitial => dot::LabelText::LabelStr(String::new().into()),
            DrawEdge::Edge(source, idx, _) => {
                let (guard, _) = &self.transitions[source.0][*idx];
                dot::LabelText::LabelStr(format!("{guard}").into())
            }
        }
    }
}

impl<'a> dot::GraphWalk<'a, Nd, Ed> for CompiledAutomaton {
    fn nodes(&'a self) -> dot::Nodes<'a, Nd> {
        self.draw_nodes()
    }

    fn edges(&'a self) -> dot::Edges<'a, Ed> {
        self.draw_edges()
    }

    fn source(&self, e: &Ed) -> Nd {
        e.source()
    }

    fn target(&self, e: &Ed) -> Nd {
        e.target(self.initial_state)
    }
}

impl<'a, R: Reward> dot::Labeller<'a, Nd, Ed> for RewardAnnotated<'a, R> {
    fn graph_id(&'a self) -> dot::Id<'a> {
        dot::Id::new("reward_transducer").unwrap()
    }

    fn node_id(&'a self, n: &Nd) -> dot::Id<'a> {
        CompiledAutomaton::draw_node_id(n)
    }

    fn node_label<'b>(&'b self, n: &Nd) -> dot::LabelText<'b> {
        self.automaton.draw_node_label(n)
    }

    fn node_style(&self, n: &Nd) -> dot::Style {
        self.automaton.draw_node_style(n)
    }

    fn edge_label<'b>(&'b self, e: &Ed) -> dot::LabelText<'b> {
        match e {
            DrawEdge::ToInitial => dot::LabelText::LabelStr(String::new().into()),
            DrawEdge::Edge(source, idx, _) => {
                let (guard, _) = &self.automaton.transitions[source.0][*idx];
                // edges unreachable from the initial state carry no reward
                let label = match self.outputs.reward(*source, *idx) {
                    Some(reward) => format!("{guard} / {reward}"),
                    None => format!("{guard}"),
                };
                dot::LabelText::LabelStr(label.into())
            }
        }
    }
}

impl<'a, R: Reward> dot::GraphWalk<'a, Nd, Ed> for RewardAnnotated<'a, R> {
    fn nodes(&'a self) -> dot::Nodes<'a, Nd> {
        self.automaton.draw_nodes()
    }

    fn edges(&'a self) -> dot::Edges<'a, Ed> {
        self.automaton.draw_edges()
    }

    fn source(&self, e: &Ed) -> Nd {
        e.source()
    }

    fn target(&self, e: &Ed) -> Nd {
        e.target(self.automaton.initial_state)
    }
}

impl DrawEdge {
    fn source(&self) -> DrawNode {
        match self {
            Self::ToInitial => DrawNode::Initial,
            Self::Edge(source, _, _) => DrawNode::State(*source),
        }
    }

    fn target(&self, initial: StateId) -> DrawNode {
        match self {
            Self::ToInitial => DrawNode::State(initial),
            Self::Edge(_, _, target) => DrawNode::State(*target),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::automaton::tests::eventually_goal;
    use crate::output::OutputFunction;
    use crate::specification::MonitoringSpecification;

    #[test]
    fn renders_guard_labels() {
        let automaton = eventually_goal();
        let mut out = Vec::new();
        dot::render(&automaton, &mut out).unwrap();
        let rendered = String::from_utf8(out).unwrap();
        assert!(rendered.contains("digraph automaton"));
        assert!(rendered.contains("!goal"));
        assert!(rendered.contains("waiting"));
    }

    #[test]
    fn renders_reward_annotations() {
        let automaton = eventually_goal();
        let specification = MonitoringSpecification::new("F goal", 0, -1, 5, -5);
        let outputs = OutputFunction::build(&automaton, &specification).unwrap();
        let annotated = super::RewardAnnotated::new(&automaton, &outputs);

        let mut out = Vec::new();
        dot::render(&annotated, &mut out).unwrap();
        let rendered = String::from_utf8(out).unwrap();
        assert!(rendered.contains("goal / 5"));
        assert!(rendered.contains("!goal / -1"));
        assert!(rendered.contains("true / 5"));
    }
}
