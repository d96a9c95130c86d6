mod edge;
mod node;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use edge::{Relation, RelationPatch, RelationProps, RelationShape, RelationState};
pub use node::{
    BlockData, BlockStatus, BlockVisual, Node, NodeKind, RunState, ShapeVariant,
    ROUTER_DEFAULT_LABEL,
};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Identity of a node inside a view.
    NodeId
);

string_id!(
    /// Identity of a relation inside a view.
    EdgeId
);

string_id!(
    /// Key of a view snapshot. A view is keyed by the id of the block that
    /// owns it, the top level view uses [`ViewId::root`].
    ViewId
);

const ROOT_VIEW: &str = "root";

impl ViewId {
    pub fn root() -> Self {
        Self::new(ROOT_VIEW)
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT_VIEW
    }
}

impl From<&NodeId> for ViewId {
    fn from(node: &NodeId) -> Self {
        Self(node.0.clone())
    }
}
