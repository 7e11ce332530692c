use std::collections::BTreeSet;

use crate::color::{ColorPair, brighten};
use crate::graph::{Graph, Node, NodeIndex};

/// Result of a successful focus request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChange {
    pub previous: Option<u32>,
    pub current: u32,
}

impl FocusChange {
    pub fn is_noop(&self) -> bool {
        self.previous == Some(self.current)
    }
}

/// Tracks the single focused node and mirrors it into the node flags.
#[derive(Debug, Default, Clone)]
pub struct FocusController {
    current: Option<NodeIndex>,
}

impl FocusController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move focus to the node owning `window_id`. Unknown windows leave focus
    /// unchanged and return `None`.
    pub fn focus(&mut self, graph: &mut Graph, window_id: u32) -> Option<FocusChange> {
        let index = graph.find_by_window_id(window_id)?;
        let previous = self.current_window(graph);
        if let Some(old) = self.current.replace(index) {
            graph.set_focused_flag(old, false);
        }
        graph.set_focused_flag(index, true);
        Some(FocusChange {
            previous,
            current: window_id,
        })
    }

    /// Drop focus entirely; returns the window that held it.
    pub fn release(&mut self, graph: &mut Graph) -> Option<u32> {
        let index = self.current.take()?;
        graph.set_focused_flag(index, false);
        graph.node(index).map(|node| node.window_id)
    }

    pub fn current(&self) -> Option<NodeIndex> {
        self.current
    }

    pub fn current_window(&self, graph: &Graph) -> Option<u32> {
        self.current
            .and_then(|index| graph.node(index))
            .map(|node| node.window_id)
    }

    /// Snapshot of the halo for the current focus and adjacency.
    pub fn halo(&self, graph: &Graph, boost: f64) -> Halo {
        let members = self
            .current
            .map(|index| graph.neighbors(index).collect())
            .unwrap_or_default();
        Halo { members, boost }
    }
}

/// One-hop brightness lift around the focused node, applied at output time.
#[derive(Debug, Clone, PartialEq)]
pub struct Halo {
    members: BTreeSet<NodeIndex>,
    boost: f64,
}

impl Halo {
    pub fn contains(&self, index: NodeIndex) -> bool {
        self.members.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Output colors for `node`: halo members get a brighter `fg`, everything
    /// else (the focused node included) keeps its stored pair.
    pub fn apply(&self, node: &Node) -> ColorPair {
        let stored = node.colors();
        if self.contains(node.index) {
            ColorPair {
                fg: brighten(stored.fg, self.boost),
                bg: stored.bg,
            }
        } else {
            stored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Hcl, PaletteSettings, spiral_pair};
    use crate::geometry::Rect;
    use crate::graph::NodeSpec;

    fn row_of_three() -> Graph {
        let mut graph = Graph::new();
        for (i, id) in [10u32, 20, 30].into_iter().enumerate() {
            graph
                .add_node(NodeSpec::new(id, Rect::new(i as i32 * 10, 0, 10, 10)))
                .unwrap();
        }
        graph.detect_adjacency(1);
        let settings = PaletteSettings::default();
        graph.recolor(|node| spiral_pair(node.index, &settings));
        graph
    }

    #[test]
    fn focus_moves_single_flag() {
        let mut graph = row_of_three();
        let mut focus = FocusController::new();

        let first = focus.focus(&mut graph, 10).unwrap();
        assert_eq!(first.previous, None);
        let second = focus.focus(&mut graph, 30).unwrap();
        assert_eq!(second.previous, Some(10));

        let flagged: Vec<_> = graph.nodes().iter().filter(|n| n.focused).collect();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].window_id, 30);
    }

    #[test]
    fn unknown_window_keeps_focus() {
        let mut graph = row_of_three();
        let mut focus = FocusController::new();
        focus.focus(&mut graph, 20);
        assert!(focus.focus(&mut graph, 99).is_none());
        assert_eq!(focus.current_window(&graph), Some(20));
    }

    #[test]
    fn refocusing_same_window_is_noop() {
        let mut graph = row_of_three();
        let mut focus = FocusController::new();
        focus.focus(&mut graph, 20);
        assert!(focus.focus(&mut graph, 20).unwrap().is_noop());
        assert!(graph.node(1).unwrap().focused);
    }

    #[test]
    fn halo_brightens_direct_neighbors_only() {
        let mut graph = row_of_three();
        let mut focus = FocusController::new();
        focus.focus(&mut graph, 10);

        let halo = focus.halo(&graph, 0.15);
        assert_eq!(halo.len(), 1);

        let focused = &graph.nodes()[0];
        let neighbor = &graph.nodes()[1];
        let far = &graph.nodes()[2];
        assert_eq!(halo.apply(focused), focused.colors());
        assert_eq!(halo.apply(far), far.colors());

        let lifted = halo.apply(neighbor);
        assert_eq!(lifted.bg, neighbor.bg);
        assert!(Hcl::from_argb(lifted.fg).lightness > Hcl::from_argb(neighbor.fg).lightness);
    }

    #[test]
    fn release_clears_halo() {
        let mut graph = row_of_three();
        let mut focus = FocusController::new();
        focus.focus(&mut graph, 20);
        assert_eq!(focus.release(&mut graph), Some(20));
        assert!(focus.halo(&graph, 0.15).is_empty());
        assert!(graph.nodes().iter().all(|n| !n.focused));
    }
}
