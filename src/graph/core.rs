use std::collections::{BTreeSet, HashMap};

use crate::color::ColorPair;
use crate::error::{PropagatorError, Result};
use crate::geometry::Rect;

/// Dense handle assigned at creation; never reused.
pub type NodeIndex = usize;

/// Caller-supplied description of a node before it joins the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeSpec {
    pub window_id: u32,
    pub space_id: u32,
    pub depth: u32,
    pub rect: Rect,
}

impl NodeSpec {
    pub fn new(window_id: u32, rect: Rect) -> Self {
        Self {
            window_id,
            space_id: 0,
            depth: 0,
            rect,
        }
    }

    pub fn with_space(mut self, space_id: u32) -> Self {
        self.space_id = space_id;
        self
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }
}

/// A spatial region and its assigned colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub index: NodeIndex,
    pub window_id: u32,
    pub space_id: u32,
    pub depth: u32,
    pub rect: Rect,
    pub fg: u32,
    pub bg: u32,
    pub focused: bool,
}

impl Node {
    fn new(index: NodeIndex, spec: NodeSpec) -> Self {
        let colors = ColorPair::default();
        Self {
            index,
            window_id: spec.window_id,
            space_id: spec.space_id,
            depth: spec.depth,
            rect: spec.rect,
            fg: colors.fg,
            bg: colors.bg,
            focused: false,
        }
    }

    pub fn colors(&self) -> ColorPair {
        ColorPair {
            fg: self.fg,
            bg: self.bg,
        }
    }

    pub fn spec(&self) -> NodeSpec {
        NodeSpec {
            window_id: self.window_id,
            space_id: self.space_id,
            depth: self.depth,
            rect: self.rect,
        }
    }
}

/// Append-only node arena plus a symmetric adjacency relation keyed by index.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    adjacency: Vec<BTreeSet<NodeIndex>>,
    by_window: HashMap<u32, NodeIndex>,
    edge_count: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Reserve room for `additional` nodes, reporting allocation failure
    /// instead of aborting.
    pub fn try_reserve(&mut self, additional: usize) -> Result<()> {
        self.nodes.try_reserve(additional)?;
        self.adjacency.try_reserve(additional)?;
        self.by_window.try_reserve(additional)?;
        Ok(())
    }

    pub fn add_node(&mut self, spec: NodeSpec) -> Result<NodeIndex> {
        if self.by_window.contains_key(&spec.window_id) {
            return Err(PropagatorError::DuplicateWindow(spec.window_id));
        }
        self.try_reserve(1)?;

        let index = self.nodes.len();
        self.nodes.push(Node::new(index, spec));
        self.adjacency.push(BTreeSet::new());
        self.by_window.insert(spec.window_id, index);
        Ok(index)
    }

    /// Add an undirected edge. Out-of-range indices, self-loops and existing
    /// edges are ignored; returns whether a new edge was stored.
    pub fn connect(&mut self, a: NodeIndex, b: NodeIndex) -> bool {
        if a == b || a >= self.nodes.len() || b >= self.nodes.len() {
            return false;
        }
        if !self.adjacency[a].insert(b) {
            return false;
        }
        self.adjacency[b].insert(a);
        self.edge_count += 1;
        true
    }

    /// Connect every pair of nodes whose rects share an edge. Existing edges
    /// are kept; returns the number of edges added.
    pub fn detect_adjacency(&mut self, tolerance: i64) -> usize {
        let mut found = Vec::new();
        for (i, a) in self.nodes.iter().enumerate() {
            for b in &self.nodes[i + 1..] {
                if a.rect.is_adjacent(&b.rect, tolerance) {
                    found.push((a.index, b.index));
                }
            }
        }

        found
            .into_iter()
            .filter(|&(a, b)| self.connect(a, b))
            .count()
    }

    pub fn find_by_window_id(&self, window_id: u32) -> Option<NodeIndex> {
        self.by_window.get(&window_id).copied()
    }

    pub fn contains_window(&self, window_id: u32) -> bool {
        self.by_window.contains_key(&window_id)
    }

    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Nodes belonging to one desktop space, in index order.
    pub fn nodes_in_space(&self, space_id: u32) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |node| node.space_id == space_id)
    }

    /// Direct neighbors in ascending index order; empty for unknown indices.
    pub fn neighbors(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.adjacency
            .get(index)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn are_adjacent(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.adjacency
            .get(a)
            .map(|set| set.contains(&b))
            .unwrap_or(false)
    }

    /// Each edge once, lower index first, in ascending order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(a, set)| {
            set.range(a + 1..).map(move |&b| (a, b))
        })
    }

    pub fn set_colors(&mut self, index: NodeIndex, colors: ColorPair) -> bool {
        match self.nodes.get_mut(index) {
            Some(node) => {
                node.fg = colors.fg;
                node.bg = colors.bg;
                true
            }
            None => false,
        }
    }

    /// Overwrite every node's colors with `palette(node)`.
    pub fn recolor(&mut self, mut palette: impl FnMut(&Node) -> ColorPair) {
        for node in &mut self.nodes {
            let colors = palette(node);
            node.fg = colors.fg;
            node.bg = colors.bg;
        }
    }

    pub(crate) fn set_focused_flag(&mut self, index: NodeIndex, focused: bool) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.focused = focused;
        }
    }
}
