//! Interactive node canvas for egui with drill-down navigation.
//!
//! Every block on the canvas owns a nested view. Double clicking a block opens
//! its view, the breadcrumb path leads back up. Views are stored as independent
//! snapshots in a [`ViewRepository`].
//!
//! [`Canvas`] holds the state and implements all operations, [`CanvasView`] is
//! the [`egui::Widget`] drawing it and turning pointer input into
//! [`Interaction`]s.

mod boundary;
mod canvas;
mod canvas_view;
mod connect;
mod elements;
mod error;
mod graph;
mod menu;
mod metadata;
mod mock;
mod navigation;
mod palette;
mod repository;
mod settings;

pub mod draw;
pub mod events;

pub use self::boundary::{crash_screen, CrashReport, Supervisor};
pub use self::canvas::{Canvas, Interaction};
pub use self::canvas_view::{visible_center, CanvasView};
pub use self::connect::{ConnectState, ConnectStep};
pub use self::elements::{
    BlockData, BlockStatus, BlockVisual, EdgeId, Node, NodeId, NodeKind, Relation, RelationPatch,
    RelationProps, RelationShape, RelationState, RunState, ShapeVariant, ViewId,
    ROUTER_DEFAULT_LABEL,
};
pub use self::error::CanvasError;
pub use self::graph::ViewGraph;
pub use self::menu::{router_draft, router_label, ContextMenu};
pub use self::metadata::Metadata;
pub use self::mock::MockHierarchy;
pub use self::navigation::{Crumb, NavigationPath, ROOT_LABEL};
pub use self::palette::{PaletteError, PaletteItem};
pub use self::repository::{MemoryRepository, View, ViewRepository};
pub use self::settings::{SettingsCanvas, SettingsNavigation, SettingsStyle, SnapshotPolicy};
