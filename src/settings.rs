use egui::Vec2;
use serde::{Deserialize, Serialize};

use crate::RelationProps;

/// How edits of the active view reach the repository.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapshotPolicy {
    /// The whole active view is written back before every view switch.
    #[default]
    WriteBack,
    /// Only inserted nodes are mirrored into the repository, right when they
    /// are created. Moves, relations and deletions stay in the active view.
    InsertsOnly,
}

/// Behavior of the [`crate::Canvas`] model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsCanvas {
    pub snapshot_policy: SnapshotPolicy,

    /// Properties of relations created by the connect tool.
    pub new_relation: RelationProps,

    /// Label of blocks dropped from the palette.
    pub new_block_label: String,

    /// Breadcrumb label used when a drilled block has an empty label.
    pub unnamed_view_label: String,
}

impl Default for SettingsCanvas {
    fn default() -> Self {
        Self {
            snapshot_policy: SnapshotPolicy::default(),
            new_relation: RelationProps::placeholder(),
            new_block_label: "New Block".to_string(),
            unnamed_view_label: "Unknown".to_string(),
        }
    }
}

impl SettingsCanvas {
    pub fn with_snapshot_policy(mut self, policy: SnapshotPolicy) -> Self {
        self.snapshot_policy = policy;
        self
    }

    pub fn with_new_relation(mut self, props: RelationProps) -> Self {
        self.new_relation = props;
        self
    }

    pub fn with_new_block_label(mut self, label: impl Into<String>) -> Self {
        self.new_block_label = label.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsStyle {
    /// Size of a block in canvas units.
    pub block_size: Vec2,

    pub router_radius: f32,

    /// Max distance from a relation path that still counts as a hit.
    pub relation_hit_width: f32,

    /// Spacing of the background dot grid, `0` disables the grid.
    pub grid_spacing: f32,

    /// Show router labels even when the router is not selected.
    pub labels_always: bool,
}

impl Default for SettingsStyle {
    fn default() -> Self {
        Self {
            block_size: Vec2::new(240., 110.),
            router_radius: 8.,
            relation_hit_width: 6.,
            grid_spacing: 20.,
            labels_always: false,
        }
    }
}

impl SettingsStyle {
    pub fn with_block_size(mut self, size: Vec2) -> Self {
        self.block_size = size;
        self
    }

    pub fn with_labels_always(mut self, labels_always: bool) -> Self {
        self.labels_always = labels_always;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsNavigation {
    /// Zoom with ctrl + wheel and pan by dragging the empty canvas
    pub zoom_and_pan: bool,

    /// Zoom step
    pub zoom_step: f32,

    pub zoom_min: f32,
    pub zoom_max: f32,
}

impl Default for SettingsNavigation {
    fn default() -> Self {
        Self {
            zoom_and_pan: true,
            zoom_step: 0.1,
            zoom_min: 0.2,
            zoom_max: 4.,
        }
    }
}

impl SettingsNavigation {
    pub fn with_zoom_and_pan(mut self, enabled: bool) -> Self {
        self.zoom_and_pan = enabled;
        self
    }
}
