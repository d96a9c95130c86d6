mod drawer;
mod edge;
mod node;

pub use drawer::{node_at, relation_at, relation_points, DrawContext, Drawer};
pub use edge::{distance_to_polyline, point_along, relation_color, relation_path, self_loop_path};
pub use node::{
    accent_color, node_contains, node_rect, source_anchor, status_color, target_anchor,
};
