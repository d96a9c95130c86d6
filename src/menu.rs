use egui::Pos2;
use serde::{Deserialize, Serialize};

use crate::{EdgeId, NodeId, ROUTER_DEFAULT_LABEL};

/// Context menu currently open on the canvas. Positions are in screen space.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ContextMenu {
    #[default]
    Closed,
    /// Edit surface of a relation. `draft` holds the label being typed.
    Relation {
        edge: EdgeId,
        position: Pos2,
        #[serde(default)]
        draft: String,
    },
    /// Label editor of a router. `draft` holds the text being typed.
    Router {
        node: NodeId,
        position: Pos2,
        draft: String,
    },
}

impl ContextMenu {
    pub fn router(node: NodeId, position: Pos2, label: &str) -> Self {
        Self::Router {
            node,
            position,
            draft: router_draft(label),
        }
    }

    pub fn relation_editor(edge: EdgeId, position: Pos2, label: Option<&str>) -> Self {
        Self::Relation {
            edge,
            position,
            draft: label.unwrap_or_default().to_string(),
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn relation(&self) -> Option<&EdgeId> {
        match self {
            Self::Relation { edge, .. } => Some(edge),
            _ => None,
        }
    }

    pub fn router_node(&self) -> Option<&NodeId> {
        match self {
            Self::Router { node, .. } => Some(node),
            _ => None,
        }
    }

    pub fn position(&self) -> Option<Pos2> {
        match self {
            Self::Closed => None,
            Self::Relation { position, .. } | Self::Router { position, .. } => Some(*position),
        }
    }

    pub fn draft(&self) -> Option<&str> {
        match self {
            Self::Closed => None,
            Self::Relation { draft, .. } | Self::Router { draft, .. } => Some(draft),
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut String> {
        match self {
            Self::Closed => None,
            Self::Relation { draft, .. } | Self::Router { draft, .. } => Some(draft),
        }
    }

    pub(crate) fn targets_node(&self, node: &NodeId) -> bool {
        self.router_node() == Some(node)
    }

    pub(crate) fn targets_relation(&self, edge: &EdgeId) -> bool {
        self.relation() == Some(edge)
    }
}

/// Label committed from the router editor: trimmed text, or the default label
/// when nothing is left.
pub fn router_label(text: &str) -> String {
    match text.trim() {
        "" => ROUTER_DEFAULT_LABEL.to_string(),
        label => label.to_string(),
    }
}

/// Initial editor text for a router label. The default label shows as empty.
pub fn router_draft(label: &str) -> String {
    if label == ROUTER_DEFAULT_LABEL {
        String::new()
    } else {
        label.to_string()
    }
}
