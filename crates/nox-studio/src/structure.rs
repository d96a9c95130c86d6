//! Structural view: declared type families drawn as trees over the canvas.

use egui::{
    Align2, Color32, Context, FontId, Frame, Id, Label, Margin, Order, Rect, RichText, Sense,
    Stroke, Ui, UiBuilder, Vec2,
};

const LEVEL_GAP: f32 = 16.;
const SIBLING_GAP: f32 = 16.;
const FAMILY_GAP: f32 = 64.;

const BACKDROP: Color32 = Color32::from_black_alpha(204);
const CONNECTOR: Color32 = Color32::from_rgb(0x52, 0x52, 0x5b);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeKind {
    Abstract,
    Interface,
    Class,
}

impl TypeKind {
    pub fn badge(self) -> &'static str {
        match self {
            Self::Abstract => "A",
            Self::Interface => "I",
            Self::Class => "C",
        }
    }

    /// Fill, border and text color of the chip.
    fn colors(self) -> (Color32, Color32, Color32) {
        match self {
            Self::Abstract => (
                Color32::from_rgb(0x27, 0x27, 0x2a),
                Color32::from_rgb(0x71, 0x71, 0x7a),
                Color32::from_rgb(0xd4, 0xd4, 0xd8),
            ),
            Self::Interface => (
                Color32::from_rgb(0x18, 0x18, 0x1b),
                Color32::from_rgb(0x71, 0x71, 0x7a),
                Color32::from_rgb(0x81, 0x8c, 0xf8),
            ),
            Self::Class => (
                Color32::from_rgb(0x18, 0x18, 0x1b),
                Color32::from_rgb(0x3f, 0x3f, 0x46),
                Color32::from_rgb(0x93, 0xc5, 0xfd),
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypeNode {
    pub id: String,
    pub label: String,
    pub kind: TypeKind,
    pub children: Vec<TypeNode>,
}

impl TypeNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<TypeNode>) -> Self {
        self.children = children;
        self
    }

    /// Number of nodes in the subtree, this one included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TypeNode::count).sum::<usize>()
    }
}

/// Named hierarchy rooted at one declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct Family {
    pub id: String,
    pub name: String,
    pub root: TypeNode,
}

impl Family {
    pub fn new(id: impl Into<String>, name: impl Into<String>, root: TypeNode) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            root,
        }
    }
}

pub fn sample_families() -> Vec<Family> {
    use TypeKind::{Abstract, Class, Interface};

    let class = |id: &str, label: &str| TypeNode::new(id, label, Class);
    vec![
        Family::new(
            "fam_vehicle",
            "Vehicle Hierarchy",
            TypeNode::new("n_vehicle", "Vehicle", Abstract).with_children(vec![
                class("n_car", "Car")
                    .with_children(vec![class("n_sedan", "Sedan"), class("n_suv", "SUV")]),
                class("n_bike", "Bike").with_children(vec![class("n_sport", "SportBike")]),
            ]),
        ),
        Family::new(
            "fam_animal",
            "Kingdom Animalia",
            TypeNode::new("n_animal", "Animal", Abstract).with_children(vec![
                class("n_mammal", "Mammal")
                    .with_children(vec![class("n_dog", "Dog"), class("n_cat", "Cat")]),
                class("n_reptile", "Reptile").with_children(vec![class("n_lizard", "Lizard")]),
            ]),
        ),
        Family::new(
            "fam_shape",
            "Geometry Shapes",
            TypeNode::new("n_shape", "Shape", Interface).with_children(vec![
                class("n_circle", "Circle"),
                class("n_rect", "Rectangle"),
                class("n_poly", "Polygon"),
            ]),
        ),
    ]
}

/// Full screen overlay listing type families. Any click closes it.
#[derive(Debug)]
pub struct StructuralView {
    open: bool,
    families: Vec<Family>,
}

impl Default for StructuralView {
    fn default() -> Self {
        Self::new(sample_families())
    }
}

impl StructuralView {
    pub fn new(families: Vec<Family>) -> Self {
        Self {
            open: false,
            families,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn show(&mut self, ctx: &Context) {
        if !self.open {
            return;
        }

        let screen = ctx.screen_rect();
        let clicked = egui::Area::new(Id::new("structural_view"))
            .order(Order::Foreground)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                let backdrop = ui.allocate_rect(screen, Sense::click());
                ui.painter().rect_filled(screen, 0., BACKDROP);
                ui.painter().text(
                    screen.center_bottom() - Vec2::new(0., 32.),
                    Align2::CENTER_CENTER,
                    "Click anywhere to return to the canvas",
                    FontId::monospace(11.),
                    CONNECTOR,
                );

                let content = screen.shrink(48.);
                ui.scope_builder(UiBuilder::new().max_rect(content), |ui| {
                    ui.vertical_centered(|ui| {
                        static_label(ui, RichText::new("STRUCTURAL VIEW").heading().strong());
                        static_label(ui, RichText::new("Family tree declarations").small().weak());
                    });
                    ui.add_space(32.);
                    ui.horizontal_top(|ui| {
                        ui.spacing_mut().item_spacing.x = FAMILY_GAP;
                        for family in &self.families {
                            family_tree(ui, family);
                        }
                    });
                });

                backdrop.clicked()
            })
            .inner;

        if clicked {
            self.open = false;
        }
    }
}

fn family_tree(ui: &mut Ui, family: &Family) {
    ui.push_id(&family.id, |ui| {
        ui.vertical(|ui| {
            let title = format!("{} ({})", family.name.to_uppercase(), family.root.count());
            static_label(ui, RichText::new(title).small().weak());
            ui.add_space(LEVEL_GAP);
            tree_node(ui, &family.root);
        });
    });
}

/// Draws the node and its subtree, returns the rect of the node chip.
fn tree_node(ui: &mut Ui, node: &TypeNode) -> Rect {
    ui.push_id(&node.id, |ui| ui.vertical(|ui| subtree(ui, node)).inner)
        .inner
}

fn subtree(ui: &mut Ui, node: &TypeNode) -> Rect {
    let chip = type_chip(ui, node);
    if node.children.is_empty() {
        return chip;
    }

    ui.add_space(LEVEL_GAP);
    let children = ui
        .horizontal_top(|ui| {
            ui.spacing_mut().item_spacing.x = SIBLING_GAP;
            node.children
                .iter()
                .map(|child| tree_node(ui, child))
                .collect::<Vec<_>>()
        })
        .inner;

    let stroke = Stroke::new(1., CONNECTOR);
    for child in children {
        ui.painter()
            .line_segment([chip.center_bottom(), child.center_top()], stroke);
    }
    chip
}

/// Labels must not take clicks away from the backdrop.
fn static_label(ui: &mut Ui, text: RichText) {
    ui.add(Label::new(text).selectable(false));
}

fn type_chip(ui: &mut Ui, node: &TypeNode) -> Rect {
    let (fill, border, text) = node.kind.colors();
    let mut label = RichText::new(&node.label).monospace().color(text);
    if node.kind == TypeKind::Abstract {
        label = label.italics();
    }

    Frame::new()
        .fill(fill)
        .stroke(Stroke::new(1., border))
        .corner_radius(4)
        .inner_margin(Margin::symmetric(8, 4))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                static_label(ui, RichText::new(node.kind.badge()).small().weak());
                static_label(ui, label);
            });
        })
        .response
        .rect
}

#[cfg(test)]
mod tests {
    use egui::{Event, Modifiers, PointerButton, Pos2, RawInput};

    use super::*;

    fn run(ctx: &Context, view: &mut StructuralView, events: Vec<Event>) {
        let input = RawInput {
            screen_rect: Some(Rect::from_min_size(Pos2::ZERO, Vec2::new(1280., 800.))),
            events,
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| view.show(ctx));
    }

    fn button(pos: Pos2, pressed: bool) -> Event {
        Event::PointerButton {
            pos,
            button: PointerButton::Primary,
            pressed,
            modifiers: Modifiers::NONE,
        }
    }

    #[test]
    fn sample_families_shape() {
        let families = sample_families();
        assert_eq!(families.len(), 3);

        let vehicle = &families[0].root;
        assert_eq!(vehicle.kind, TypeKind::Abstract);
        assert_eq!(vehicle.count(), 6);

        let shape = &families[2].root;
        assert_eq!(shape.kind, TypeKind::Interface);
        assert_eq!(shape.count(), 4);
        assert!(shape.children.iter().all(|c| c.kind == TypeKind::Class));
    }

    #[test]
    fn toggle_opens_and_closes() {
        let mut view = StructuralView::default();
        assert!(!view.is_open());
        view.toggle();
        assert!(view.is_open());
        view.toggle();
        assert!(!view.is_open());
    }

    #[test]
    fn click_anywhere_closes() {
        let ctx = Context::default();
        let mut view = StructuralView::default();
        view.toggle();

        run(&ctx, &mut view, vec![]);
        run(&ctx, &mut view, vec![]);
        assert!(view.is_open());

        let pos = Pos2::new(640., 700.);
        run(&ctx, &mut view, vec![Event::PointerMoved(pos), button(pos, true)]);
        run(&ctx, &mut view, vec![button(pos, false)]);

        assert!(!view.is_open());
    }

    #[test]
    fn closed_view_draws_nothing() {
        let ctx = Context::default();
        let mut view = StructuralView::default();
        run(&ctx, &mut view, vec![]);
        assert!(!view.is_open());
        assert!(ctx.memory(|m| m.area_rect(Id::new("structural_view")).is_none()));
    }
}
