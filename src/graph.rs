use std::collections::{HashMap, HashSet};

use petgraph::{
    stable_graph::{EdgeIndex, NodeIndex, StableGraph},
    visit::EdgeRef,
    Direction,
};

use crate::{CanvasError, EdgeId, Node, NodeId, Relation, View};

/// Node and relation collections of the active view.
///
/// Wrapper around [`petgraph::stable_graph::StableGraph`] addressed by string ids.
/// Keeps two invariants: every relation connects nodes of this graph, and at
/// most one node carries the connection source flag.
#[derive(Debug, Clone, Default)]
pub struct ViewGraph {
    g: StableGraph<Node, Relation>,

    nodes: HashMap<NodeId, NodeIndex>,
    edges: HashMap<EdgeId, EdgeIndex>,
}

impl ViewGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph from a snapshot. Relations with a missing endpoint and
    /// repeated ids are dropped.
    pub fn from_view(view: &View) -> Self {
        let mut graph = Self::new();
        for node in &view.nodes {
            if let Err(err) = graph.add_node(node.detached()) {
                log::warn!("skipping snapshot node: {err}");
            }
        }
        for relation in &view.edges {
            if let Err(err) = graph.add_relation(relation.clone()) {
                log::warn!("skipping snapshot relation: {err}");
            }
        }
        graph
    }

    /// Snapshot of the graph without transient interaction flags.
    pub fn to_view(&self) -> View {
        View {
            nodes: self.g.node_weights().map(Node::detached).collect(),
            edges: self.g.edge_weights().cloned().collect(),
        }
    }

    pub fn g(&self) -> &StableGraph<Node, Relation> {
        &self.g
    }

    pub fn add_node(&mut self, node: Node) -> Result<NodeIndex, CanvasError> {
        if self.nodes.contains_key(node.id()) {
            return Err(CanvasError::DuplicateNode(node.id().clone()));
        }

        let id = node.id().clone();
        let idx = self.g.add_node(node);
        self.nodes.insert(id, idx);
        Ok(idx)
    }

    /// Removes the node together with every relation where it is source or
    /// target. Returns the node and the removed relations.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<(Node, Vec<Relation>)> {
        let idx = *self.nodes.get(id)?;

        let mut seen = HashSet::new();
        let incident = self
            .g
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.g.edges_directed(idx, Direction::Incoming))
            .map(|e| e.id())
            .filter(|e| seen.insert(*e))
            .collect::<Vec<_>>();

        let mut removed = Vec::with_capacity(incident.len());
        for e in incident {
            if let Some(relation) = self.g.remove_edge(e) {
                self.edges.remove(relation.id());
                removed.push(relation);
            }
        }

        self.nodes.remove(id);
        let node = self.g.remove_node(idx)?;
        Some((node, removed))
    }

    pub fn add_relation(&mut self, relation: Relation) -> Result<EdgeIndex, CanvasError> {
        if self.edges.contains_key(relation.id()) {
            return Err(CanvasError::DuplicateRelation(relation.id().clone()));
        }

        let endpoint = |id: &NodeId| {
            self.nodes
                .get(id)
                .copied()
                .ok_or_else(|| CanvasError::DanglingRelation {
                    relation: relation.id().clone(),
                    endpoint: id.clone(),
                })
        };
        let start = endpoint(relation.source())?;
        let end = endpoint(relation.target())?;

        let id = relation.id().clone();
        let idx = self.g.add_edge(start, end, relation);
        self.edges.insert(id, idx);
        Ok(idx)
    }

    pub fn remove_relation(&mut self, id: &EdgeId) -> Option<Relation> {
        let idx = self.edges.remove(id)?;
        self.g.remove_edge(idx)
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id).and_then(|idx| self.g.node_weight(*idx))
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        let idx = *self.nodes.get(id)?;
        self.g.node_weight_mut(idx)
    }

    pub fn relation(&self, id: &EdgeId) -> Option<&Relation> {
        self.edges.get(id).and_then(|idx| self.g.edge_weight(*idx))
    }

    pub fn relation_mut(&mut self, id: &EdgeId) -> Option<&mut Relation> {
        let idx = *self.edges.get(id)?;
        self.g.edge_weight_mut(idx)
    }

    /// Source and target nodes of the relation.
    pub fn relation_endpoints(&self, id: &EdgeId) -> Option<(&Node, &Node)> {
        let (start, end) = self.g.edge_endpoints(*self.edges.get(id)?)?;
        Some((self.g.node_weight(start)?, self.g.node_weight(end)?))
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn contains_relation(&self, id: &EdgeId) -> bool {
        self.edges.contains_key(id)
    }

    pub fn nodes_iter(&self) -> impl Iterator<Item = &Node> {
        self.g.node_weights()
    }

    pub fn relations_iter(&self) -> impl Iterator<Item = &Relation> {
        self.g.edge_weights()
    }

    pub fn node_count(&self) -> usize {
        self.g.node_count()
    }

    pub fn relation_count(&self) -> usize {
        self.g.edge_count()
    }

    /// Flags `id` as connection source and clears the flag everywhere else.
    /// `None` clears every flag.
    pub fn set_source(&mut self, id: Option<&NodeId>) {
        for node in self.g.node_weights_mut() {
            let is_source = id == Some(node.id());
            node.set_source(is_source);
        }
    }

    /// Selects `id` alone, `None` clears the selection.
    pub fn select_node(&mut self, id: Option<&NodeId>) {
        for node in self.g.node_weights_mut() {
            let selected = id == Some(node.id());
            node.set_selected(selected);
        }
    }

    pub fn selected_node(&self) -> Option<&NodeId> {
        self.g
            .node_weights()
            .find(|n| n.selected())
            .map(Node::id)
    }

    /// Node currently flagged as connection source.
    pub fn source(&self) -> Option<&NodeId> {
        self.g
            .node_weights()
            .find(|n| n.is_source())
            .map(Node::id)
    }
}

#[cfg(test)]
mod tests {
    use egui::Pos2;

    use super::*;
    use crate::{BlockData, RelationProps};

    fn block(id: &str) -> Node {
        Node::block(NodeId::new(id), id, Pos2::ZERO, BlockData::default())
    }

    fn relation(id: &str, source: &str, target: &str) -> Relation {
        Relation::new(
            EdgeId::new(id),
            NodeId::new(source),
            NodeId::new(target),
            RelationProps::default(),
        )
    }

    fn abc() -> ViewGraph {
        let mut g = ViewGraph::new();
        for id in ["a", "b", "c"] {
            g.add_node(block(id)).unwrap();
        }
        g.add_relation(relation("ab", "a", "b")).unwrap();
        g.add_relation(relation("ba", "b", "a")).unwrap();
        g.add_relation(relation("bc", "b", "c")).unwrap();
        g.add_relation(relation("aa", "a", "a")).unwrap();
        g
    }

    #[test]
    fn remove_node_cascades_only_touching_relations() {
        let mut g = abc();

        let (node, removed) = g.remove_node(&NodeId::new("a")).unwrap();
        assert_eq!(node.id().as_str(), "a");

        let mut removed = removed
            .iter()
            .map(|r| r.id().as_str().to_string())
            .collect::<Vec<_>>();
        removed.sort();
        assert_eq!(removed, ["aa", "ab", "ba"]);

        assert_eq!(g.relation_count(), 1);
        assert!(g.contains_relation(&EdgeId::new("bc")));
        assert!(!g.contains_relation(&EdgeId::new("ab")));
    }

    #[test]
    fn dangling_relation_is_rejected() {
        let mut g = abc();
        let err = g.add_relation(relation("ax", "a", "x")).unwrap_err();
        assert_eq!(
            err,
            CanvasError::DanglingRelation {
                relation: EdgeId::new("ax"),
                endpoint: NodeId::new("x"),
            }
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut g = abc();
        assert!(matches!(
            g.add_node(block("a")),
            Err(CanvasError::DuplicateNode(_))
        ));
        assert!(matches!(
            g.add_relation(relation("ab", "b", "c")),
            Err(CanvasError::DuplicateRelation(_))
        ));
    }

    #[test]
    fn single_source_flag() {
        let mut g = abc();
        g.set_source(Some(&NodeId::new("a")));
        g.set_source(Some(&NodeId::new("b")));

        assert_eq!(g.nodes_iter().filter(|n| n.is_source()).count(), 1);
        assert_eq!(g.source(), Some(&NodeId::new("b")));

        g.set_source(None);
        assert_eq!(g.source(), None);
    }

    #[test]
    fn selection_is_exclusive() {
        let mut g = abc();
        g.select_node(Some(&NodeId::new("a")));
        g.select_node(Some(&NodeId::new("c")));

        assert_eq!(g.selected_node(), Some(&NodeId::new("c")));
        assert!(!g.node(&NodeId::new("a")).unwrap().selected());

        g.select_node(None);
        assert_eq!(g.selected_node(), None);
    }

    #[test]
    fn view_round_trip_drops_flags_and_dangling() {
        let mut g = abc();
        g.set_source(Some(&NodeId::new("c")));

        let mut view = g.to_view();
        assert!(view.nodes.iter().all(|n| !n.is_source()));

        view.edges.push(relation("cx", "c", "x"));
        let restored = ViewGraph::from_view(&view);
        assert_eq!(restored.node_count(), 3);
        assert_eq!(restored.relation_count(), 4);
        assert_eq!(restored.to_view(), g.to_view());
    }

    #[test]
    fn relation_endpoints_resolve_nodes() {
        let g = abc();
        let (s, t) = g.relation_endpoints(&EdgeId::new("bc")).unwrap();
        assert_eq!(s.id().as_str(), "b");
        assert_eq!(t.id().as_str(), "c");
    }
}
