use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Node, Relation, ViewId};

/// Snapshot of one level of the drill-down hierarchy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub nodes: Vec<Node>,
    pub edges: Vec<Relation>,
}

impl View {
    pub fn new(nodes: Vec<Node>, edges: Vec<Relation>) -> Self {
        Self { nodes, edges }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// Store of view snapshots the canvas reads from and writes back to.
///
/// Snapshots are independent: storing one view never touches another.
pub trait ViewRepository {
    fn load(&self, id: &ViewId) -> Option<View>;

    fn store(&mut self, id: ViewId, view: View);

    fn contains(&self, id: &ViewId) -> bool;

    /// Creates an empty snapshot for `id` unless one exists.
    fn ensure(&mut self, id: &ViewId) {
        if !self.contains(id) {
            self.store(id.clone(), View::default());
        }
    }

    /// Appends a node to an existing snapshot. Returns `false` when there is no
    /// snapshot for `id`.
    fn push_node(&mut self, id: &ViewId, node: Node) -> bool {
        let Some(mut view) = self.load(id) else {
            return false;
        };
        view.nodes.push(node);
        self.store(id.clone(), view);
        true
    }
}

/// In-memory repository. Snapshots live for the lifetime of the repository.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MemoryRepository {
    views: HashMap<ViewId, View>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn get(&self, id: &ViewId) -> Option<&View> {
        self.views.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ViewId, &View)> {
        self.views.iter()
    }
}

impl FromIterator<(ViewId, View)> for MemoryRepository {
    fn from_iter<T: IntoIterator<Item = (ViewId, View)>>(iter: T) -> Self {
        Self {
            views: iter.into_iter().collect(),
        }
    }
}

impl ViewRepository for MemoryRepository {
    fn load(&self, id: &ViewId) -> Option<View> {
        self.views.get(id).cloned()
    }

    fn store(&mut self, id: ViewId, view: View) {
        self.views.insert(id, view);
    }

    fn contains(&self, id: &ViewId) -> bool {
        self.views.contains_key(id)
    }

    fn push_node(&mut self, id: &ViewId, node: Node) -> bool {
        match self.views.get_mut(id) {
            Some(view) => {
                view.nodes.push(node);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use egui::Pos2;

    use super::*;
    use crate::NodeId;

    #[test]
    fn ensure_keeps_existing_snapshot() {
        let mut repo = MemoryRepository::new();
        let id = ViewId::new("a");
        repo.store(
            id.clone(),
            View::new(vec![Node::router(NodeId::new("r"), Pos2::ZERO)], vec![]),
        );

        repo.ensure(&id);
        assert_eq!(repo.get(&id).map(|v| v.nodes.len()), Some(1));

        repo.ensure(&ViewId::new("b"));
        assert_eq!(repo.get(&ViewId::new("b")), Some(&View::default()));
    }

    #[test]
    fn push_node_requires_snapshot() {
        let mut repo = MemoryRepository::new();
        let router = Node::router(NodeId::new("r"), Pos2::ZERO);

        assert!(!repo.push_node(&ViewId::root(), router.clone()));
        assert!(repo.is_empty());

        repo.ensure(&ViewId::root());
        assert!(repo.push_node(&ViewId::root(), router));
        assert_eq!(repo.get(&ViewId::root()).map(|v| v.nodes.len()), Some(1));
    }

    #[test]
    fn snapshots_are_independent() {
        let mut repo = MemoryRepository::new();
        repo.ensure(&ViewId::new("a"));
        repo.ensure(&ViewId::new("b"));
        repo.push_node(&ViewId::new("a"), Node::router(NodeId::new("r"), Pos2::ZERO));

        assert!(repo.get(&ViewId::new("b")).is_some_and(View::is_empty));
    }
}
