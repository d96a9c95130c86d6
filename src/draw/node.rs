use egui::{
    epaint::CornerRadius, Align2, Color32, FontFamily, FontId, Pos2, Rect, Shape, Stroke,
    StrokeKind, Vec2,
};

use crate::{
    draw::DrawContext, settings::SettingsStyle, BlockData, BlockStatus, Node, NodeKind,
    RunState, ShapeVariant, ROUTER_DEFAULT_LABEL,
};

const HEADER_HEIGHT: f32 = 30.;
const FOOTER_HEIGHT: f32 = 24.;
const PADDING: f32 = 10.;
const STATUS_DOT_RADIUS: f32 = 4.;

pub const SURFACE: Color32 = Color32::from_rgb(0x18, 0x18, 0x1b);
pub const SURFACE_RAISED: Color32 = Color32::from_rgb(0x27, 0x27, 0x2a);
pub const BORDER: Color32 = Color32::from_rgb(0x3f, 0x3f, 0x46);
pub const TEXT: Color32 = Color32::from_rgb(0xe4, 0xe4, 0xe7);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(0x71, 0x71, 0x7a);
pub const SELECTED: Color32 = Color32::from_rgb(0x3b, 0x82, 0xf6);
pub const SOURCE: Color32 = Color32::from_rgb(0xf5, 0x9e, 0x0b);
pub const ERROR: Color32 = Color32::from_rgb(0xf8, 0x71, 0x71);
const MESSAGE: Color32 = Color32::from_rgb(0xa1, 0xa1, 0xaa);

/// Bounding rect of the node in canvas coordinates. The node location is the
/// top left corner.
pub fn node_rect(node: &Node, style: &SettingsStyle) -> Rect {
    let size = match node.kind() {
        NodeKind::Block(_) => style.block_size,
        NodeKind::Router => Vec2::splat(style.router_radius * 2.),
    };
    Rect::from_min_size(node.location(), size)
}

pub fn node_contains(node: &Node, style: &SettingsStyle, pos: Pos2) -> bool {
    let rect = node_rect(node, style);
    match node.kind() {
        NodeKind::Block(_) => rect.contains(pos),
        NodeKind::Router => is_inside_circle(rect.center(), style.router_radius, pos),
    }
}

/// Point where outgoing relations leave the node.
pub fn source_anchor(node: &Node, style: &SettingsStyle) -> Pos2 {
    node_rect(node, style).right_center()
}

/// Point where incoming relations enter the node.
pub fn target_anchor(node: &Node, style: &SettingsStyle) -> Pos2 {
    node_rect(node, style).left_center()
}

fn is_inside_circle(center: Pos2, radius: f32, pos: Pos2) -> bool {
    let dir = pos - center;
    dir.length() <= radius
}

/// Maps a palette color name, or a `#rrggbb` literal, to a color. Unknown
/// names fall back to zinc.
pub fn accent_color(name: &str) -> Color32 {
    match name {
        "zinc" => Color32::from_rgb(0x71, 0x71, 0x7a),
        "slate" => Color32::from_rgb(0x64, 0x74, 0x8b),
        "red" => Color32::from_rgb(0xef, 0x44, 0x44),
        "orange" => Color32::from_rgb(0xf9, 0x73, 0x16),
        "amber" => Color32::from_rgb(0xf5, 0x9e, 0x0b),
        "yellow" => Color32::from_rgb(0xea, 0xb3, 0x08),
        "green" => Color32::from_rgb(0x22, 0xc5, 0x5e),
        "emerald" => Color32::from_rgb(0x10, 0xb9, 0x81),
        "cyan" => Color32::from_rgb(0x06, 0xb6, 0xd4),
        "blue" => Color32::from_rgb(0x3b, 0x82, 0xf6),
        "indigo" => Color32::from_rgb(0x63, 0x66, 0xf1),
        "purple" => Color32::from_rgb(0xa8, 0x55, 0xf7),
        "pink" => Color32::from_rgb(0xec, 0x48, 0x99),
        other => Color32::from_hex(other).unwrap_or(Color32::from_rgb(0x71, 0x71, 0x7a)),
    }
}

/// Color of the status dot in the block footer.
pub fn status_color(state: RunState) -> Color32 {
    match state {
        RunState::Running => Color32::from_rgb(0x10, 0xb9, 0x81),
        RunState::Error => Color32::from_rgb(0xef, 0x44, 0x44),
        _ => Color32::from_rgb(0x71, 0x71, 0x7a),
    }
}

pub fn footer_fill(status: &BlockStatus) -> Color32 {
    if status.is_error() {
        ERROR.gamma_multiply(0.15)
    } else {
        SURFACE_RAISED.gamma_multiply(0.5)
    }
}

/// Status message shown in the block footer with its color. Errors get a
/// warning glyph.
pub fn footer_message(status: &BlockStatus) -> Option<(String, Color32)> {
    let message = status.message.as_deref().map(str::trim).filter(|m| !m.is_empty())?;
    if status.is_error() {
        Some((format!("⚠ {message}"), ERROR))
    } else {
        Some((message.to_string(), MESSAGE))
    }
}

pub fn icon_glyph(icon: &str) -> &'static str {
    match icon {
        "server" => "🖧",
        "activity" => "📈",
        "cpu" => "⚙",
        "database" => "🗄",
        _ => "☐",
    }
}

pub fn node_shapes(node: &Node, ctx: &DrawContext) -> Vec<Shape> {
    let rect = node_rect(node, ctx.style);
    let screen = Rect::from_min_size(
        ctx.meta.canvas_to_screen_pos(rect.min),
        rect.size() * ctx.meta.zoom,
    );

    match node.kind() {
        NodeKind::Block(data) => block_shapes(node, data, screen, ctx),
        NodeKind::Router => router_shapes(node, screen, ctx),
    }
}

fn outline(node: &Node, accent: Color32, variant: Option<ShapeVariant>, zoom: f32) -> Stroke {
    if node.is_source() {
        return Stroke::new(2. * zoom, SOURCE);
    }
    if node.selected() {
        return Stroke::new(2. * zoom, SELECTED);
    }
    match variant {
        Some(ShapeVariant::Rugged) => Stroke::new(2. * zoom, BORDER),
        Some(ShapeVariant::Sleek) => Stroke::new(zoom, accent.gamma_multiply(0.6)),
        _ => Stroke::new(zoom, BORDER),
    }
}

fn block_shapes(node: &Node, data: &BlockData, rect: Rect, ctx: &DrawContext) -> Vec<Shape> {
    let zoom = ctx.meta.zoom;
    let accent = accent_color(&data.visual.color);
    let radius = match data.visual.variant {
        ShapeVariant::Rugged => 2.,
        ShapeVariant::Sleek => 14.,
        ShapeVariant::Default => 8.,
    } * zoom;
    let corner = CornerRadius::same(radius.round().clamp(0., 255.) as u8);

    let mut res = Vec::with_capacity(13);
    res.push(Shape::rect_filled(rect, corner, SURFACE));

    let header = Rect::from_min_size(rect.min, Vec2::new(rect.width(), HEADER_HEIGHT * zoom));
    res.push(Shape::rect_filled(
        header,
        CornerRadius {
            nw: corner.nw,
            ne: corner.ne,
            sw: 0,
            se: 0,
        },
        accent.gamma_multiply(0.25),
    ));

    let footer = Rect::from_min_max(
        Pos2::new(rect.left(), rect.bottom() - FOOTER_HEIGHT * zoom),
        rect.max,
    );
    res.push(Shape::rect_filled(
        footer,
        CornerRadius {
            nw: 0,
            ne: 0,
            sw: corner.sw,
            se: corner.se,
        },
        footer_fill(&data.status),
    ));
    res.push(Shape::hline(
        footer.x_range(),
        footer.top(),
        Stroke::new(zoom, BORDER),
    ));

    let pad = PADDING * zoom;
    ctx.ctx.fonts(|f| {
        let title = format!("{}  {}", icon_glyph(&data.visual.icon), node.label());
        res.push(Shape::text(
            f,
            Pos2::new(header.left() + pad, header.center().y),
            Align2::LEFT_CENTER,
            title,
            FontId::new(13. * zoom, FontFamily::Proportional),
            TEXT,
        ));

        if let Some(logic) = &data.logic {
            res.push(Shape::text(
                f,
                Pos2::new(rect.left() + pad, header.bottom() + pad),
                Align2::LEFT_TOP,
                logic,
                FontId::new(11. * zoom, FontFamily::Monospace),
                TEXT_MUTED,
            ));
        }

        res.push(Shape::text(
            f,
            Pos2::new(rect.left() + pad, footer.center().y),
            Align2::LEFT_CENTER,
            node.id().as_str(),
            FontId::new(10. * zoom, FontFamily::Monospace),
            TEXT_MUTED,
        ));

        if let Some((message, color)) = footer_message(&data.status) {
            let right = rect.right() - pad - (2. * STATUS_DOT_RADIUS + 6.) * zoom;
            res.push(Shape::text(
                f,
                Pos2::new(right, footer.center().y),
                Align2::RIGHT_CENTER,
                message,
                FontId::new(10. * zoom, FontFamily::Monospace),
                color,
            ));
        }

        if node.is_source() {
            res.push(Shape::text(
                f,
                Pos2::new(rect.left(), rect.top() - 4. * zoom),
                Align2::LEFT_BOTTOM,
                "SOURCE",
                FontId::new(10. * zoom, FontFamily::Monospace),
                SOURCE,
            ));
        }
    });

    res.push(Shape::circle_filled(
        Pos2::new(rect.right() - pad, footer.center().y),
        STATUS_DOT_RADIUS * zoom,
        status_color(data.status.state),
    ));

    res.push(Shape::rect_stroke(
        rect,
        corner,
        outline(node, accent, Some(data.visual.variant), zoom),
        StrokeKind::Inside,
    ));
    res
}

fn router_shapes(node: &Node, rect: Rect, ctx: &DrawContext) -> Vec<Shape> {
    let zoom = ctx.meta.zoom;
    let center = rect.center();
    let radius = ctx.meta.canvas_to_screen_size(ctx.style.router_radius);

    let mut res = Vec::with_capacity(3);
    res.push(Shape::circle_filled(center, radius, SURFACE_RAISED));
    res.push(Shape::circle_stroke(
        center,
        radius,
        outline(node, SOURCE, None, zoom),
    ));

    let show_label = ctx.style.labels_always
        || node.selected()
        || node.is_source()
        || node.label() != ROUTER_DEFAULT_LABEL;
    if show_label {
        ctx.ctx.fonts(|f| {
            res.push(Shape::text(
                f,
                Pos2::new(center.x, center.y - radius - 4. * zoom),
                Align2::CENTER_BOTTOM,
                node.label(),
                FontId::new(11. * zoom, FontFamily::Monospace),
                TEXT_MUTED,
            ));
        });
    }
    res
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::NodeId;

    fn block_at(x: f32, y: f32) -> Node {
        Node::block(NodeId::new("b"), "b", Pos2::new(x, y), BlockData::default())
    }

    #[test]
    fn test_block_rect_and_anchors() {
        let style = SettingsStyle::default();
        let node = block_at(100., 150.);

        let rect = node_rect(&node, &style);
        assert_eq!(rect.min, Pos2::new(100., 150.));
        assert_eq!(rect.size(), style.block_size);
        assert_eq!(source_anchor(&node, &style), Pos2::new(340., 205.));
        assert_eq!(target_anchor(&node, &style), Pos2::new(100., 205.));
    }

    #[test]
    fn test_router_hit_is_circular() {
        let style = SettingsStyle::default();
        let router = Node::router(NodeId::new("r"), Pos2::ZERO);

        assert!(node_contains(&router, &style, Pos2::new(8., 8.)));
        assert!(node_contains(&router, &style, Pos2::new(8., 1.)));
        // corner of the bounding rect lies outside the circle
        assert!(!node_contains(&router, &style, Pos2::new(0.5, 0.5)));
    }

    #[test]
    fn test_block_hit() {
        let style = SettingsStyle::default();
        let node = block_at(0., 0.);
        assert!(node_contains(&node, &style, Pos2::new(239., 109.)));
        assert!(!node_contains(&node, &style, Pos2::new(241., 50.)));
    }

    #[test]
    fn test_color_names() {
        assert_eq!(accent_color("blue"), SELECTED);
        assert_eq!(accent_color("#10b981"), status_color(RunState::Running));
        assert_eq!(accent_color("nope"), accent_color("zinc"));
        assert_eq!(status_color(RunState::Offline), accent_color("zinc"));
    }

    #[test]
    fn test_footer_message_styling() {
        let mut status = BlockStatus {
            state: RunState::Running,
            message: Some("  42 req/s ".to_string()),
            ..Default::default()
        };
        assert_eq!(footer_message(&status), Some(("42 req/s".to_string(), MESSAGE)));
        assert_eq!(footer_fill(&status), SURFACE_RAISED.gamma_multiply(0.5));

        status.state = RunState::Error;
        status.message = Some("timeout".to_string());
        assert_eq!(footer_message(&status), Some(("⚠ timeout".to_string(), ERROR)));
        assert_eq!(footer_fill(&status), ERROR.gamma_multiply(0.15));

        status.message = Some("   ".to_string());
        assert_eq!(footer_message(&status), None);
    }
}
