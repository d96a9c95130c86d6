use egui::Pos2;
use serde::{Deserialize, Serialize};

use super::NodeId;

/// Label a router carries until the user names it.
pub const ROUTER_DEFAULT_LABEL: &str = "Router";

/// Body style of a block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeVariant {
    #[default]
    Default,
    Rugged,
    Sleek,
}

/// Run state shown in the footer of a block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    #[default]
    Running,
    Stopped,
    Error,
    Warning,
    Offline,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockVisual {
    pub variant: ShapeVariant,
    /// Palette color name, e.g. `amber` or `blue`.
    pub color: String,
    /// Icon key, e.g. `server` or `database`.
    pub icon: String,
}

impl Default for BlockVisual {
    fn default() -> Self {
        Self {
            variant: ShapeVariant::Default,
            color: "zinc".to_string(),
            icon: "box".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockStatus {
    pub state: RunState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Unix timestamp in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active: Option<u64>,
}

impl BlockStatus {
    pub fn is_error(&self) -> bool {
        self.state == RunState::Error
    }
}

/// Payload of a block node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockData {
    pub visual: BlockVisual,
    pub status: BlockStatus,
    /// Code snippet or logic description displayed in the block body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeKind {
    Block(BlockData),
    Router,
}

/// Node of a view: either a block (a drillable system component) or a router
/// (a bodiless connector).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    label: String,
    location: Pos2,
    kind: NodeKind,

    #[serde(skip)]
    is_source: bool,
    #[serde(skip)]
    selected: bool,
}

impl Node {
    pub fn block(id: NodeId, label: impl Into<String>, location: Pos2, data: BlockData) -> Self {
        Self::new(id, label.into(), location, NodeKind::Block(data))
    }

    pub fn router(id: NodeId, location: Pos2) -> Self {
        Self::new(
            id,
            ROUTER_DEFAULT_LABEL.to_string(),
            location,
            NodeKind::Router,
        )
    }

    fn new(id: NodeId, label: String, location: Pos2, kind: NodeKind) -> Self {
        Self {
            id,
            label,
            location,
            kind,
            is_source: false,
            selected: false,
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn location(&self) -> Pos2 {
        self.location
    }

    pub fn set_location(&mut self, location: Pos2) {
        self.location = location;
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_block(&self) -> bool {
        matches!(self.kind, NodeKind::Block(_))
    }

    pub fn is_router(&self) -> bool {
        matches!(self.kind, NodeKind::Router)
    }

    pub fn block_data(&self) -> Option<&BlockData> {
        match &self.kind {
            NodeKind::Block(data) => Some(data),
            NodeKind::Router => None,
        }
    }

    pub fn block_data_mut(&mut self) -> Option<&mut BlockData> {
        match &mut self.kind {
            NodeKind::Block(data) => Some(data),
            NodeKind::Router => None,
        }
    }

    /// Whether the node is the picked source of a pending connection.
    pub fn is_source(&self) -> bool {
        self.is_source
    }

    pub(crate) fn set_source(&mut self, is_source: bool) {
        self.is_source = is_source;
    }

    pub fn selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Copy of the node without transient interaction flags.
    pub(crate) fn detached(&self) -> Self {
        Self {
            is_source: false,
            selected: false,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn router_starts_with_default_label() {
        let router = Node::router(NodeId::new("r"), Pos2::ZERO);
        assert_eq!(router.label(), ROUTER_DEFAULT_LABEL);
        assert!(router.is_router());
        assert!(router.block_data().is_none());
    }

    #[test]
    fn detached_drops_transient_flags() {
        let mut node = Node::block(
            NodeId::new("a"),
            "A",
            Pos2::new(1.0, 2.0),
            BlockData::default(),
        );
        node.set_source(true);
        node.set_selected(true);

        let detached = node.detached();
        assert!(!detached.is_source());
        assert!(!detached.selected());
        assert_eq!(detached.location(), node.location());
    }

    #[test]
    fn block_serializes_kind_tag() {
        let node = Node::block(NodeId::new("a"), "A", Pos2::ZERO, BlockData::default());
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["kind"]["kind"], "block");
        assert_eq!(json["kind"]["visual"]["icon"], "box");
        assert!(json.get("is_source").is_none());
    }
}
