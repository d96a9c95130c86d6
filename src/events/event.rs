use serde::{Deserialize, Serialize};

use crate::{EdgeId, NodeId, RelationProps, ViewId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeAdded {
    pub view: ViewId,
    pub node: NodeId,
    pub location: [f32; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeRemoved {
    pub view: ViewId,
    pub node: NodeId,
    /// Relations removed together with the node.
    pub relations: Vec<EdgeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeMove {
    pub node: NodeId,
    pub location: [f32; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeRelabel {
    pub node: NodeId,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadRelationAdded {
    pub view: ViewId,
    pub relation: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadRelationRemoved {
    pub view: ViewId,
    pub relation: EdgeId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadRelationPatch {
    pub relation: EdgeId,
    pub props: RelationProps,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadRelationSelect {
    pub relation: Option<EdgeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadConnectMode {
    pub armed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadConnectSource {
    pub node: NodeId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadViewEnter {
    pub view: ViewId,
    pub depth: usize,
}

/// Notification about a change of canvas state. Emitted synchronously, in
/// mutation order, to the installed [`super::EventSink`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    NodeAdded(PayloadNodeAdded),
    NodeRemoved(PayloadNodeRemoved),
    NodeMove(PayloadNodeMove),
    NodeRelabel(PayloadNodeRelabel),
    RelationAdded(PayloadRelationAdded),
    RelationRemoved(PayloadRelationRemoved),
    RelationPatch(PayloadRelationPatch),
    RelationSelect(PayloadRelationSelect),
    ConnectMode(PayloadConnectMode),
    ConnectSource(PayloadConnectSource),
    ConnectCancel(PayloadConnectSource),
    ViewEnter(PayloadViewEnter),
    MenuOpen,
    MenuClose,
}
