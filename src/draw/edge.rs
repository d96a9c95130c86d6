use egui::{
    epaint::{CornerRadius, PathShape, PathStroke},
    Align2, Color32, FontFamily, FontId, Pos2, Rect, Shape, Stroke, Vec2,
};

use crate::{draw::DrawContext, Relation, RelationShape, RelationState};

use super::node::{SELECTED, SURFACE, TEXT};

const CURVE_SAMPLES: usize = 24;
const MIN_CURVE_OFFSET: f32 = 40.;
const LOOP_OFFSET: f32 = 30.;
const ARROW_SIZE: f32 = 8.;
const DASH_LENGTH: f32 = 6.;
const GAP_LENGTH: f32 = 4.;

/// Stroke color of a relation.
pub fn relation_color(state: RelationState, selected: bool) -> Color32 {
    if selected {
        return SELECTED;
    }
    match state {
        RelationState::Neutral => Color32::from_rgb(0x52, 0x52, 0x5b),
        RelationState::Valid => Color32::from_rgb(0xf5, 0x9e, 0x0b),
        RelationState::Invalid => Color32::from_rgb(0xef, 0x44, 0x44),
        RelationState::Placeholder => Color32::from_rgb(0xea, 0xb3, 0x08),
    }
}

/// Polyline of a relation between two anchors, in canvas coordinates.
pub fn relation_path(shape: RelationShape, start: Pos2, end: Pos2) -> Vec<Pos2> {
    match shape {
        RelationShape::Straight => vec![start, end],
        RelationShape::Step => {
            let mid_x = (start.x + end.x) / 2.;
            vec![
                start,
                Pos2::new(mid_x, start.y),
                Pos2::new(mid_x, end.y),
                end,
            ]
        }
        RelationShape::Curve => {
            let offset = ((end.x - start.x).abs() / 2.).max(MIN_CURVE_OFFSET);
            let c1 = start + Vec2::new(offset, 0.);
            let c2 = end - Vec2::new(offset, 0.);
            (0..=CURVE_SAMPLES)
                .map(|i| cubic_bezier(start, c1, c2, end, i as f32 / CURVE_SAMPLES as f32))
                .collect()
        }
    }
}

/// Path of a relation whose source and target are the same node. Leaves
/// from the right side, passes above the node and enters from the left.
pub fn self_loop_path(rect: Rect) -> Vec<Pos2> {
    let start = rect.right_center();
    let end = rect.left_center();
    let top = rect.top() - LOOP_OFFSET;
    vec![
        start,
        Pos2::new(start.x + LOOP_OFFSET, start.y),
        Pos2::new(start.x + LOOP_OFFSET, top),
        Pos2::new(end.x - LOOP_OFFSET, top),
        Pos2::new(end.x - LOOP_OFFSET, end.y),
        end,
    ]
}

fn cubic_bezier(p0: Pos2, p1: Pos2, p2: Pos2, p3: Pos2, t: f32) -> Pos2 {
    let u = 1. - t;
    let v = p0.to_vec2() * (u * u * u)
        + p1.to_vec2() * (3. * u * u * t)
        + p2.to_vec2() * (3. * u * t * t)
        + p3.to_vec2() * (t * t * t);
    v.to_pos2()
}

/// Shortest distance from `pos` to the polyline.
pub fn distance_to_polyline(pos: Pos2, points: &[Pos2]) -> f32 {
    match points {
        [] => f32::INFINITY,
        [single] => single.distance(pos),
        _ => points
            .windows(2)
            .map(|w| distance_to_segment(pos, w[0], w[1]))
            .fold(f32::INFINITY, f32::min),
    }
}

fn distance_to_segment(pos: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq == 0. {
        return pos.distance(a);
    }
    let t = ((pos - a).dot(ab) / len_sq).clamp(0., 1.);
    pos.distance(a + ab * t)
}

/// Point at fraction `t` of the polyline length.
pub fn point_along(points: &[Pos2], t: f32) -> Option<Pos2> {
    let total: f32 = points.windows(2).map(|w| w[0].distance(w[1])).sum();
    let first = *points.first()?;
    if total == 0. {
        return Some(first);
    }

    let mut left = total * t.clamp(0., 1.);
    for w in points.windows(2) {
        let len = w[0].distance(w[1]);
        if left <= len {
            return Some(if len == 0. { w[0] } else { w[0] + (w[1] - w[0]) * (left / len) });
        }
        left -= len;
    }
    points.last().copied()
}

/// Shapes of a relation along the screen space polyline `points`.
pub fn relation_shapes(
    relation: &Relation,
    points: &[Pos2],
    selected: bool,
    ctx: &DrawContext,
) -> Vec<Shape> {
    let zoom = ctx.meta.zoom;
    let props = relation.props();
    let color = relation_color(props.state, selected);
    let width = if selected { 3. } else { 2. } * zoom;
    let stroke = Stroke::new(width, color);

    let mut res = Vec::new();
    if props.state == RelationState::Placeholder {
        res.extend(Shape::dashed_line(
            points,
            stroke,
            DASH_LENGTH * zoom,
            GAP_LENGTH * zoom,
        ));
    } else {
        res.push(Shape::Path(PathShape::line(
            points.to_vec(),
            PathStroke::new(width, color),
        )));
    }

    if let [.., before, tip] = points {
        res.push(arrow_head(*before, *tip, ARROW_SIZE * zoom, color));
    }

    if props.animating {
        let time = ctx.ctx.input(|i| i.time);
        let t = (time.fract()) as f32;
        if let Some(p) = point_along(points, t) {
            res.push(Shape::circle_filled(p, 3. * zoom, color));
        }
        ctx.ctx.request_repaint();
    }

    if let Some(label) = &props.label {
        if let Some(mid) = point_along(points, 0.5) {
            ctx.ctx.fonts(|f| {
                let text = Shape::text(
                    f,
                    mid,
                    Align2::CENTER_CENTER,
                    label,
                    FontId::new(10. * zoom, FontFamily::Monospace),
                    TEXT,
                );
                let bg = text.visual_bounding_rect().expand(3. * zoom);
                res.push(Shape::rect_filled(bg, CornerRadius::same(3), SURFACE));
                res.push(text);
            });
        }
    }
    res
}

fn arrow_head(from: Pos2, tip: Pos2, size: f32, color: Color32) -> Shape {
    let dir = (tip - from).normalized();
    let normal = dir.rot90();
    let base = tip - dir * size;
    Shape::convex_polygon(
        vec![tip, base + normal * size / 2., base - normal * size / 2.],
        color,
        Stroke::NONE,
    )
}
