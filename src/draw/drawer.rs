use egui::{Color32, Context, Painter, Pos2, Rect, Shape};

use crate::{settings::SettingsStyle, EdgeId, Metadata, Node, NodeId, Relation, ViewGraph};

use super::{
    edge::{distance_to_polyline, relation_path, relation_shapes, self_loop_path},
    node::{node_contains, node_rect, node_shapes, source_anchor, target_anchor},
};

const GRID_DOT: Color32 = Color32::from_rgb(0x27, 0x27, 0x2a);

/// Contains all the data about current widget state which is needed for drawing.
pub struct DrawContext<'a> {
    pub ctx: &'a Context,
    pub painter: &'a Painter,
    pub style: &'a SettingsStyle,
    /// Metadata mapping canvas positions to absolute screen positions.
    pub meta: &'a Metadata,
}

/// Polyline of a relation in canvas coordinates, `None` if an endpoint is
/// missing from the graph.
pub fn relation_points(
    g: &ViewGraph,
    relation: &Relation,
    style: &SettingsStyle,
) -> Option<Vec<Pos2>> {
    let (source, target) = g.relation_endpoints(relation.id())?;
    if relation.is_self_loop() {
        return Some(self_loop_path(node_rect(source, style)));
    }
    Some(relation_path(
        relation.props().shape,
        source_anchor(source, style),
        target_anchor(target, style),
    ))
}

/// Topmost node under the canvas position.
pub fn node_at<'g>(g: &'g ViewGraph, style: &SettingsStyle, pos: Pos2) -> Option<&'g NodeId> {
    let mut hit = None;
    for node in g.nodes_iter() {
        if node_contains(node, style, pos) {
            hit = Some(node);
            // selected and source nodes are painted last
            if node.selected() || node.is_source() {
                break;
            }
        }
    }
    hit.map(Node::id)
}

/// Closest relation within `hit_width` screen units of the canvas position.
pub fn relation_at<'g>(
    g: &'g ViewGraph,
    style: &SettingsStyle,
    pos: Pos2,
    zoom: f32,
) -> Option<&'g EdgeId> {
    let max_dist = style.relation_hit_width / zoom;
    g.relations_iter()
        .filter_map(|r| {
            let points = relation_points(g, r, style)?;
            let dist = distance_to_polyline(pos, &points);
            (dist <= max_dist).then_some((r.id(), dist))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

pub struct Drawer<'a> {
    ctx: &'a DrawContext<'a>,
    g: &'a ViewGraph,
    selected_relation: Option<&'a EdgeId>,
    delayed: Vec<Shape>,
}

impl<'a> Drawer<'a> {
    pub fn new(
        g: &'a ViewGraph,
        selected_relation: Option<&'a EdgeId>,
        ctx: &'a DrawContext<'a>,
    ) -> Self {
        Drawer {
            ctx,
            g,
            selected_relation,
            delayed: Vec::new(),
        }
    }

    pub fn draw(mut self, clip: Rect) {
        self.draw_grid(clip);
        self.draw_edges();
        self.draw_nodes();
        self.draw_postponed();
    }

    fn draw_postponed(&mut self) {
        for s in self.delayed.drain(..) {
            self.ctx.painter.add(s);
        }
    }

    fn draw_grid(&self, clip: Rect) {
        let spacing = self.ctx.meta.canvas_to_screen_size(self.ctx.style.grid_spacing);
        // too dense to be useful
        if spacing < 4. {
            return;
        }

        let origin = self.ctx.meta.canvas_to_screen_pos(Pos2::ZERO);
        let start_x = clip.left() + (origin.x - clip.left()).rem_euclid(spacing);
        let start_y = clip.top() + (origin.y - clip.top()).rem_euclid(spacing);
        let radius = (self.ctx.meta.zoom).clamp(0.5, 1.5);

        let mut y = start_y;
        while y < clip.bottom() {
            let mut x = start_x;
            while x < clip.right() {
                self.ctx
                    .painter
                    .circle_filled(Pos2::new(x, y), radius, GRID_DOT);
                x += spacing;
            }
            y += spacing;
        }
    }

    fn draw_nodes(&mut self) {
        for n in self.g.nodes_iter() {
            let shapes = node_shapes(n, self.ctx);
            if n.selected() || n.is_source() {
                self.delayed.extend(shapes);
            } else {
                for s in shapes {
                    self.ctx.painter.add(s);
                }
            }
        }
    }

    fn draw_edges(&mut self) {
        for r in self.g.relations_iter() {
            let Some(points) = relation_points(self.g, r, self.ctx.style) else {
                continue;
            };
            let points: Vec<Pos2> = points
                .into_iter()
                .map(|p| self.ctx.meta.canvas_to_screen_pos(p))
                .collect();

            let selected = self.selected_relation == Some(r.id());
            let shapes = relation_shapes(r, &points, selected, self.ctx);
            if selected {
                self.delayed.extend(shapes);
            } else {
                for s in shapes {
                    self.ctx.painter.add(s);
                }
            }
        }
    }
}
