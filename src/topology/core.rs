use crate::error::{Result, TopologyError};
use crate::geometry::Rect;
use crate::graph::{Graph, NodeIndex, NodeSpec};

use super::scanner::{Bracket, Scanner, Token, TokenKind};

const TREE_TAG: &str = "split-tree";
const NODE_TAG: &str = "node";
const NODE_FIELDS: usize = 7;
const TREE_LISTS: usize = 2;

/// Decoded topology: node specs in declaration order and edges as 0-based
/// indices into that list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    pub nodes: Vec<NodeSpec>,
    pub edges: Vec<(usize, usize)>,
}

/// Outcome of committing a topology to a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    /// Graph index of the first ingested node.
    pub base: NodeIndex,
    pub nodes: usize,
    /// Edges actually stored; duplicates and self-loops are dropped.
    pub edges: usize,
}

impl Topology {
    /// Append the topology to `graph`. Validation and allocation happen before
    /// the first node is added, so a failure leaves the graph untouched.
    pub fn commit(self, graph: &mut Graph) -> Result<IngestSummary> {
        if let Some(spec) = self
            .nodes
            .iter()
            .find(|spec| graph.contains_window(spec.window_id))
        {
            return Err(TopologyError::DuplicateWindow(spec.window_id).into());
        }
        graph.try_reserve(self.nodes.len())?;

        let base = graph.len();
        for spec in &self.nodes {
            graph.add_node(*spec)?;
        }
        let edges = self
            .edges
            .iter()
            .filter(|&&(src, dst)| graph.connect(base + src, base + dst))
            .count();

        Ok(IngestSummary {
            base,
            nodes: self.nodes.len(),
            edges,
        })
    }
}

/// Decode `input` in a single left-to-right pass.
pub fn parse(input: &[u8]) -> std::result::Result<Topology, TopologyError> {
    let mut parser = Parser::default();
    for token in Scanner::new(input) {
        parser.feed(token?)?;
    }
    parser.finish()
}

#[derive(Debug)]
enum Frame {
    Tree { tagged: bool, lists: usize },
    NodeList,
    Node { tagged: bool, offset: usize, fields: Vec<(i64, usize)> },
    EdgeList,
    Edge { offset: usize, ends: Vec<(i64, usize)> },
}

/// Explicit bracket stack; nesting depth is bounded by memory, not recursion.
#[derive(Debug, Default)]
struct Parser {
    stack: Vec<Frame>,
    topology: Topology,
    closed: bool,
}

impl Parser {
    fn feed(&mut self, token: Token<'_>) -> std::result::Result<(), TopologyError> {
        if self.closed {
            return Err(unexpected(&token));
        }
        match token.kind {
            TokenKind::Open(bracket) => self.open(bracket, &token),
            TokenKind::Close(bracket) => self.close(bracket, &token),
            TokenKind::Word(word) => self.word(word, token.offset),
        }
    }

    fn open(&mut self, bracket: Bracket, token: &Token<'_>) -> std::result::Result<(), TopologyError> {
        let frame = match (bracket, self.stack.last()) {
            (Bracket::Angle, None) => Frame::Tree {
                tagged: false,
                lists: 0,
            },
            (Bracket::Angle, Some(Frame::NodeList)) => Frame::Node {
                tagged: false,
                offset: token.offset,
                fields: Vec::new(),
            },
            (Bracket::Square, Some(Frame::Tree { tagged: true, lists })) => match lists {
                0 => Frame::NodeList,
                1 => Frame::EdgeList,
                _ => {
                    return Err(TopologyError::Arity {
                        offset: token.offset,
                        context: TREE_TAG,
                        expected: TREE_LISTS,
                        found: lists + 1,
                    });
                }
            },
            (Bracket::Square, Some(Frame::EdgeList)) => Frame::Edge {
                offset: token.offset,
                ends: Vec::new(),
            },
            _ => return Err(unexpected(token)),
        };
        self.stack.push(frame);
        Ok(())
    }

    fn close(&mut self, bracket: Bracket, token: &Token<'_>) -> std::result::Result<(), TopologyError> {
        let unbalanced = || TopologyError::Unbalanced {
            offset: token.offset,
            found: match bracket {
                Bracket::Angle => '>',
                Bracket::Square => ']',
            },
        };

        match (bracket, self.stack.pop()) {
            (Bracket::Angle, Some(Frame::Tree { tagged, lists })) => {
                if !tagged {
                    return Err(unexpected(token));
                }
                if lists != TREE_LISTS {
                    return Err(TopologyError::Arity {
                        offset: token.offset,
                        context: TREE_TAG,
                        expected: TREE_LISTS,
                        found: lists,
                    });
                }
                self.closed = true;
            }
            (Bracket::Angle, Some(Frame::Node { tagged, offset, fields })) => {
                if !tagged {
                    return Err(unexpected(token));
                }
                let spec = node_spec(offset, &fields)?;
                if self
                    .topology
                    .nodes
                    .iter()
                    .any(|existing| existing.window_id == spec.window_id)
                {
                    return Err(TopologyError::DuplicateWindow(spec.window_id));
                }
                self.topology.nodes.push(spec);
            }
            (Bracket::Square, Some(Frame::NodeList | Frame::EdgeList)) => {
                if let Some(Frame::Tree { lists, .. }) = self.stack.last_mut() {
                    *lists += 1;
                }
            }
            (Bracket::Square, Some(Frame::Edge { offset, ends })) => {
                if ends.len() != 2 {
                    return Err(TopologyError::Arity {
                        offset,
                        context: "edge",
                        expected: 2,
                        found: ends.len(),
                    });
                }
                let src = unsigned(ends[0])?;
                let dst = unsigned(ends[1])?;
                self.topology.edges.push((src, dst));
            }
            _ => return Err(unbalanced()),
        }
        Ok(())
    }

    fn word(&mut self, word: &str, offset: usize) -> std::result::Result<(), TopologyError> {
        match self.stack.last_mut() {
            Some(Frame::Tree { tagged, .. }) if !*tagged => {
                expect_tag(word, TREE_TAG, offset)?;
                *tagged = true;
            }
            Some(Frame::Node { tagged, .. }) if !*tagged => {
                expect_tag(word, NODE_TAG, offset)?;
                *tagged = true;
            }
            Some(Frame::Node { fields, .. }) => fields.push((integer(word, offset)?, offset)),
            Some(Frame::Edge { ends, .. }) => ends.push((integer(word, offset)?, offset)),
            _ => {
                return Err(TopologyError::Unexpected {
                    offset,
                    found: word.to_string(),
                });
            }
        }
        Ok(())
    }

    fn finish(self) -> std::result::Result<Topology, TopologyError> {
        if !self.stack.is_empty() {
            return Err(TopologyError::Truncated {
                depth: self.stack.len(),
            });
        }
        if !self.closed {
            return Err(TopologyError::Empty);
        }

        let declared = self.topology.nodes.len();
        if let Some(&(src, dst)) = self
            .topology
            .edges
            .iter()
            .find(|(src, dst)| *src >= declared || *dst >= declared)
        {
            return Err(TopologyError::DanglingEdge { src, dst, declared });
        }
        Ok(self.topology)
    }
}

fn unexpected(token: &Token<'_>) -> TopologyError {
    TopologyError::Unexpected {
        offset: token.offset,
        found: token.text(),
    }
}

fn expect_tag(word: &str, tag: &str, offset: usize) -> std::result::Result<(), TopologyError> {
    if word == tag {
        Ok(())
    } else {
        Err(TopologyError::UnknownTag {
            offset,
            tag: word.to_string(),
        })
    }
}

fn integer(word: &str, offset: usize) -> std::result::Result<i64, TopologyError> {
    word.parse::<i64>()
        .map_err(|_| TopologyError::InvalidInteger {
            offset,
            token: word.to_string(),
        })
}

fn narrow<T: TryFrom<i64>>((value, offset): (i64, usize)) -> std::result::Result<T, TopologyError> {
    T::try_from(value).map_err(|_| TopologyError::InvalidInteger {
        offset,
        token: value.to_string(),
    })
}

fn unsigned(field: (i64, usize)) -> std::result::Result<usize, TopologyError> {
    narrow::<usize>(field)
}

fn node_spec(offset: usize, fields: &[(i64, usize)]) -> std::result::Result<NodeSpec, TopologyError> {
    if fields.len() != NODE_FIELDS {
        return Err(TopologyError::Arity {
            offset,
            context: NODE_TAG,
            expected: NODE_FIELDS,
            found: fields.len(),
        });
    }
    Ok(NodeSpec {
        window_id: narrow(fields[0])?,
        space_id: narrow(fields[1])?,
        depth: narrow(fields[2])?,
        rect: Rect::new(
            narrow(fields[3])?,
            narrow(fields[4])?,
            narrow(fields[5])?,
            narrow(fields[6])?,
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PropagatorError;

    const THREE_IN_A_ROW: &str = "<split-tree [<node 1 0 0 0 0 10 10><node 2 0 0 10 0 10 10><node 3 0 0 20 0 10 10>] [[0 1][1 2]]>";

    fn parse_str(input: &str) -> std::result::Result<Topology, TopologyError> {
        parse(input.as_bytes())
    }

    #[test]
    fn parses_declared_nodes_and_edges() {
        let topology = parse_str(THREE_IN_A_ROW).unwrap();
        let ids: Vec<_> = topology.nodes.iter().map(|n| n.window_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(topology.nodes[2].rect, Rect::new(20, 0, 10, 10));
        assert_eq!(topology.edges, vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn whitespace_and_signed_coordinates() {
        let topology =
            parse_str("  <split-tree\n [ <node 7 2 1 -40 +5 8 9> ]\t[ ] >  ").unwrap();
        assert_eq!(
            topology.nodes,
            vec![NodeSpec {
                window_id: 7,
                space_id: 2,
                depth: 1,
                rect: Rect::new(-40, 5, 8, 9),
            }]
        );
        assert!(topology.edges.is_empty());
    }

    #[test]
    fn empty_lists_are_accepted() {
        assert_eq!(parse_str("<split-tree [] []>").unwrap(), Topology::default());
    }

    #[test]
    fn rejects_empty_and_truncated_input() {
        assert_eq!(parse_str(""), Err(TopologyError::Empty));
        assert_eq!(parse_str("   "), Err(TopologyError::Empty));
        assert!(matches!(
            parse_str("<split-tree [<node 1 0 0 0 0 1"),
            Err(TopologyError::Truncated { depth: 3 })
        ));
        assert!(matches!(
            parse_str("<split-tree [] []"),
            Err(TopologyError::Truncated { depth: 1 })
        ));
    }

    #[test]
    fn rejects_unbalanced_brackets() {
        assert!(matches!(
            parse_str("<split-tree [] []]>"),
            Err(TopologyError::Unbalanced { found: ']', .. })
        ));
        assert!(matches!(
            parse_str("<split-tree [<node 1 0 0 0 0 1 1]] []>"),
            Err(TopologyError::Unbalanced { found: ']', .. })
        ));
        assert!(matches!(
            parse_str(">"),
            Err(TopologyError::Unbalanced { offset: 0, found: '>' })
        ));
    }

    #[test]
    fn rejects_wrong_tags() {
        assert!(matches!(
            parse_str("<tree [] []>"),
            Err(TopologyError::UnknownTag { offset: 1, .. })
        ));
        assert!(matches!(
            parse_str("<split-tree [<leaf 1 0 0 0 0 1 1>] []>"),
            Err(TopologyError::UnknownTag { .. })
        ));
    }

    #[test]
    fn rejects_wrong_arity() {
        assert!(matches!(
            parse_str("<split-tree [<node 1 0 0 0 0 1>] []>"),
            Err(TopologyError::Arity { context: "node", found: 6, .. })
        ));
        assert!(matches!(
            parse_str("<split-tree [] [[0 1 2]]>"),
            Err(TopologyError::Arity { context: "edge", found: 3, .. })
        ));
        assert!(matches!(
            parse_str("<split-tree []>"),
            Err(TopologyError::Arity { context: "split-tree", found: 1, .. })
        ));
        assert!(matches!(
            parse_str("<split-tree [] [] []>"),
            Err(TopologyError::Arity { context: "split-tree", found: 3, .. })
        ));
    }

    #[test]
    fn rejects_non_integer_and_out_of_range_fields() {
        assert!(matches!(
            parse_str("<split-tree [<node 1 0 0 x 0 1 1>] []>"),
            Err(TopologyError::InvalidInteger { .. })
        ));
        assert!(matches!(
            parse_str("<split-tree [<node -1 0 0 0 0 1 1>] []>"),
            Err(TopologyError::InvalidInteger { .. })
        ));
        assert!(matches!(
            parse_str("<split-tree [<node 1 0 0 0 0 4294967296 1>] []>"),
            Err(TopologyError::InvalidInteger { .. })
        ));
        assert!(matches!(
            parse_str("<split-tree [] [[0 -1]]>"),
            Err(TopologyError::InvalidInteger { .. })
        ));
    }

    #[test]
    fn rejects_dangling_edges() {
        let err = parse_str("<split-tree [<node 1 0 0 0 0 1 1>] [[0 1]]>").unwrap_err();
        assert_eq!(
            err,
            TopologyError::DanglingEdge {
                src: 0,
                dst: 1,
                declared: 1
            }
        );
        assert!(!err.is_malformed());
    }

    #[test]
    fn rejects_trailing_content_and_duplicates() {
        assert!(matches!(
            parse_str("<split-tree [] []> extra"),
            Err(TopologyError::Unexpected { .. })
        ));
        assert!(matches!(
            parse_str("<split-tree [<node 1 0 0 0 0 1 1><node 1 0 0 1 0 1 1>] []>"),
            Err(TopologyError::DuplicateWindow(1))
        ));
    }

    #[test]
    fn commit_offsets_edges_by_existing_nodes() {
        let mut graph = Graph::new();
        graph
            .add_node(NodeSpec::new(99, Rect::new(500, 500, 5, 5)))
            .unwrap();
        let summary = parse_str(THREE_IN_A_ROW)
            .unwrap()
            .commit(&mut graph)
            .unwrap();
        assert_eq!(
            summary,
            IngestSummary {
                base: 1,
                nodes: 3,
                edges: 2
            }
        );
        assert!(graph.are_adjacent(1, 2));
        assert!(graph.are_adjacent(2, 3));
        assert!(!graph.are_adjacent(0, 1));
    }

    #[test]
    fn commit_with_known_window_leaves_graph_untouched() {
        let mut graph = Graph::new();
        graph
            .add_node(NodeSpec::new(2, Rect::new(0, 0, 5, 5)))
            .unwrap();
        let err = parse_str(THREE_IN_A_ROW)
            .unwrap()
            .commit(&mut graph)
            .unwrap_err();
        assert!(matches!(
            err,
            PropagatorError::Topology(TopologyError::DuplicateWindow(2))
        ));
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn notation_round_trips_through_parser() {
        let mut graph = Graph::new();
        parse_str(THREE_IN_A_ROW)
            .unwrap()
            .commit(&mut graph)
            .unwrap();
        let mut copy = Graph::new();
        parse(graph.to_notation().as_bytes())
            .unwrap()
            .commit(&mut copy)
            .unwrap();
        assert_eq!(copy.to_notation(), graph.to_notation());
        assert_eq!(copy.digest(), graph.digest());
    }

    #[test]
    fn nested_unknown_structure_does_not_recurse() {
        let deep = "[".repeat(10_000);
        let input = format!("<split-tree [] {}", deep);
        assert!(matches!(
            parse_str(&input),
            Err(TopologyError::Unexpected { .. })
        ));
    }
}
