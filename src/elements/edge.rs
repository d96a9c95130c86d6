use serde::{Deserialize, Serialize};

use super::{EdgeId, NodeId};

/// Validity state of a relation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationState {
    #[default]
    Neutral,
    Valid,
    Invalid,
    Placeholder,
}

impl RelationState {
    /// States offered by the relation edit surface.
    pub const EDITABLE: [RelationState; 3] = [Self::Valid, Self::Invalid, Self::Placeholder];

    pub fn name(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Placeholder => "placeholder",
        }
    }
}

/// Path shape of a relation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationShape {
    #[default]
    Curve,
    Straight,
    Step,
}

impl RelationShape {
    pub const ALL: [RelationShape; 3] = [Self::Curve, Self::Straight, Self::Step];

    pub fn name(self) -> &'static str {
        match self {
            Self::Curve => "curve",
            Self::Straight => "straight",
            Self::Step => "step",
        }
    }
}

/// Stores properties of a [`Relation`] that the user can change.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationProps {
    pub state: RelationState,
    pub shape: RelationShape,
    pub animating: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl RelationProps {
    /// Properties of a relation fresh out of the connect tool.
    pub fn placeholder() -> Self {
        Self {
            state: RelationState::Placeholder,
            shape: RelationShape::Step,
            animating: false,
            label: Some("Relation".to_string()),
        }
    }

    /// Merges the patch into the props. Absent patch fields keep their value.
    pub fn apply(&mut self, patch: &RelationPatch) {
        if let Some(state) = patch.state {
            self.state = state;
        }
        if let Some(shape) = patch.shape {
            self.shape = shape;
        }
        if let Some(animating) = patch.animating {
            self.animating = animating;
        }
        if let Some(label) = &patch.label {
            let label = label.trim();
            self.label = (!label.is_empty()).then(|| label.to_string());
        }
    }
}

/// Partial update of [`RelationProps`]. An empty `label` clears the label.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<RelationState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<RelationShape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animating: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl RelationPatch {
    pub fn with_state(mut self, state: RelationState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_shape(mut self, shape: RelationShape) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn with_animating(mut self, animating: bool) -> Self {
        self.animating = Some(animating);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_none()
            && self.shape.is_none()
            && self.animating.is_none()
            && self.label.is_none()
    }
}

/// Directed relation between two nodes of the same view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    id: EdgeId,
    source: NodeId,
    target: NodeId,
    props: RelationProps,
}

impl Relation {
    pub fn new(id: EdgeId, source: NodeId, target: NodeId, props: RelationProps) -> Self {
        Self {
            id,
            source,
            target,
            props,
        }
    }

    pub fn id(&self) -> &EdgeId {
        &self.id
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }

    pub fn props(&self) -> &RelationProps {
        &self.props
    }

    pub fn props_mut(&mut self) -> &mut RelationProps {
        &mut self.props
    }

    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_keeps_unrelated_fields() {
        let mut props = RelationProps::placeholder();
        props.apply(&RelationPatch::default().with_state(RelationState::Valid));

        assert_eq!(props.state, RelationState::Valid);
        assert_eq!(props.shape, RelationShape::Step);
        assert!(!props.animating);
        assert_eq!(props.label.as_deref(), Some("Relation"));
    }

    #[test]
    fn patch_with_blank_label_clears_it() {
        let mut props = RelationProps::placeholder();
        props.apply(&RelationPatch::default().with_label("   "));
        assert_eq!(props.label, None);

        props.apply(&RelationPatch::default().with_label(" feeds "));
        assert_eq!(props.label.as_deref(), Some("feeds"));
    }

    #[test]
    fn empty_patch_is_noop() {
        let patch = RelationPatch::default();
        assert!(patch.is_empty());

        let mut props = RelationProps::placeholder();
        props.apply(&patch);
        assert_eq!(props, RelationProps::placeholder());
    }

    #[test]
    fn patch_contract() {
        let patch = RelationPatch::default()
            .with_shape(RelationShape::Curve)
            .with_animating(true);
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"shape":"curve","animating":true}"#);
    }
}
