use serde::{Deserialize, Serialize};

use crate::NodeId;

/// State of the click-to-connect tool.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectState {
    #[default]
    Idle,
    /// Tool is on, no source picked.
    Armed,
    /// Tool is on and the source of the next relation is picked.
    AwaitingTarget(NodeId),
}

/// Result of feeding a node click into the connect tool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectStep {
    /// Tool is idle, the click is not for it.
    Ignored,
    SourcePicked(NodeId),
    /// A relation from `source` to `target` should be created.
    Completed { source: NodeId, target: NodeId },
}

impl ConnectState {
    /// Switches the tool on or off. Any picked source is dropped.
    pub fn toggle(&mut self) {
        *self = match self {
            Self::Idle => Self::Armed,
            Self::Armed | Self::AwaitingTarget(_) => Self::Idle,
        };
    }

    pub fn is_armed(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    pub fn source(&self) -> Option<&NodeId> {
        match self {
            Self::AwaitingTarget(source) => Some(source),
            Self::Idle | Self::Armed => None,
        }
    }

    pub fn node_clicked(&mut self, node: &NodeId) -> ConnectStep {
        match std::mem::take(self) {
            Self::Idle => ConnectStep::Ignored,
            Self::Armed => {
                *self = Self::AwaitingTarget(node.clone());
                ConnectStep::SourcePicked(node.clone())
            }
            // stays armed so connections can be chained
            Self::AwaitingTarget(source) => {
                *self = Self::Armed;
                ConnectStep::Completed {
                    source,
                    target: node.clone(),
                }
            }
        }
    }

    /// Drops the picked source, keeping the tool armed. Returns the dropped source.
    pub fn cancel(&mut self) -> Option<NodeId> {
        match std::mem::take(self) {
            Self::AwaitingTarget(source) => {
                *self = Self::Armed;
                Some(source)
            }
            other => {
                *self = other;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_idle_and_armed() {
        let mut state = ConnectState::default();
        state.toggle();
        assert_eq!(state, ConnectState::Armed);
        state.toggle();
        assert_eq!(state, ConnectState::Idle);
    }

    #[test]
    fn toggle_while_awaiting_turns_off() {
        let mut state = ConnectState::AwaitingTarget(NodeId::new("a"));
        state.toggle();
        assert_eq!(state, ConnectState::Idle);
        assert_eq!(state.source(), None);
    }

    #[test]
    fn click_sequence_completes_and_rearms() {
        let a = NodeId::new("a");
        let b = NodeId::new("b");
        let mut state = ConnectState::Armed;

        assert_eq!(state.node_clicked(&a), ConnectStep::SourcePicked(a.clone()));
        assert_eq!(state.source(), Some(&a));
        assert_eq!(
            state.node_clicked(&b),
            ConnectStep::Completed {
                source: a,
                target: b
            }
        );
        assert_eq!(state, ConnectState::Armed);
    }

    #[test]
    fn self_loop_is_allowed() {
        let a = NodeId::new("a");
        let mut state = ConnectState::Armed;
        state.node_clicked(&a);
        assert_eq!(
            state.node_clicked(&a),
            ConnectStep::Completed {
                source: a.clone(),
                target: a
            }
        );
    }

    #[test]
    fn idle_ignores_clicks() {
        let mut state = ConnectState::Idle;
        assert_eq!(state.node_clicked(&NodeId::new("a")), ConnectStep::Ignored);
        assert_eq!(state, ConnectState::Idle);
    }

    #[test]
    fn cancel_keeps_tool_armed() {
        let mut state = ConnectState::AwaitingTarget(NodeId::new("a"));
        assert_eq!(state.cancel(), Some(NodeId::new("a")));
        assert_eq!(state, ConnectState::Armed);

        assert_eq!(state.cancel(), None);
        assert_eq!(state, ConnectState::Armed);

        let mut idle = ConnectState::Idle;
        assert_eq!(idle.cancel(), None);
        assert_eq!(idle, ConnectState::Idle);
    }
}
