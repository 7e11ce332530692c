use std::fmt::Write;

use super::core::Graph;

impl Graph {
    /// Render the graph in the bracketed topology notation accepted by
    /// [`crate::topology::parse`]. Edges are emitted once, lower index first.
    pub fn to_notation(&self) -> String {
        let mut out = String::from("<split-tree [");
        for node in self.nodes() {
            let _ = write!(
                out,
                "<node {} {} {} {} {} {} {}>",
                node.window_id,
                node.space_id,
                node.depth,
                node.rect.x,
                node.rect.y,
                node.rect.width,
                node.rect.height
            );
        }
        out.push_str("] [");
        for (a, b) in self.edges() {
            let _ = write!(out, "[{} {}]", a, b);
        }
        out.push_str("]>");
        out
    }

    /// Content hash of the canonical notation; colors and focus are excluded.
    pub fn digest(&self) -> blake3::Hash {
        blake3::hash(self.to_notation().as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use crate::geometry::Rect;
    use crate::graph::{Graph, NodeSpec};

    #[test]
    fn renders_nodes_and_edges() {
        let mut graph = Graph::new();
        graph
            .add_node(NodeSpec::new(1, Rect::new(-5, 0, 10, 10)).with_depth(2))
            .unwrap();
        graph
            .add_node(NodeSpec::new(2, Rect::new(5, 0, 10, 10)).with_space(3))
            .unwrap();
        graph.connect(1, 0);
        assert_eq!(
            graph.to_notation(),
            "<split-tree [<node 1 0 2 -5 0 10 10><node 2 3 0 5 0 10 10>] [[0 1]]>"
        );
    }

    #[test]
    fn empty_graph_renders_empty_lists() {
        assert_eq!(Graph::new().to_notation(), "<split-tree [] []>");
    }

    #[test]
    fn digest_tracks_topology_not_colors() {
        let mut graph = Graph::new();
        graph
            .add_node(NodeSpec::new(1, Rect::new(0, 0, 10, 10)))
            .unwrap();
        let before = graph.digest();
        graph.recolor(|_| crate::color::ColorPair { fg: 1, bg: 2 });
        assert_eq!(graph.digest(), before);
        graph
            .add_node(NodeSpec::new(2, Rect::new(10, 0, 10, 10)))
            .unwrap();
        assert_ne!(graph.digest(), before);
    }
}
