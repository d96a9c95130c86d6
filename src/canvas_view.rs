use egui::{
    Area, CursorIcon, Frame, Id, Key, Order, Pos2, Rect, Response, RichText, Sense, TextEdit, Ui,
    Vec2, Widget,
};

use crate::{
    draw::{node_at, relation_at, DrawContext, Drawer},
    settings::{SettingsNavigation, SettingsStyle},
    Canvas, ContextMenu, EdgeId, Interaction, MemoryRepository, Metadata, NodeId, RelationPatch,
    RelationProps, RelationShape, RelationState, ViewRepository,
};

const KEY_DRAG: &str = "nox_canvas_drag";
const KEY_FRAME: &str = "nox_canvas_frame";
const KEY_MENU: &str = "nox_canvas_menu";
const KEY_EDITOR: &str = "nox_canvas_menu_editor";

/// Widget rendering the active view of a [`Canvas`] and feeding pointer input
/// back into it.
///
/// Clicks, drags and drops are translated into [`Interaction`]s and dispatched
/// after hit testing, so the canvas model stays the only place where state
/// changes. Pan and zoom are widget state and never reach the model.
pub struct CanvasView<'a, R: ViewRepository = MemoryRepository> {
    canvas: &'a mut Canvas<R>,

    settings_style: SettingsStyle,
    settings_navigation: SettingsNavigation,

    custom_id: Option<String>,
}

#[derive(Clone, Debug, Default)]
struct DragState {
    node: Option<NodeId>,
    /// Offset from the pointer to the node location, canvas units.
    grab: Vec2,
}

enum Hit {
    Node(NodeId),
    Relation(EdgeId),
    Pane,
}

impl<R: ViewRepository> Widget for &mut CanvasView<'_, R> {
    fn ui(self, ui: &mut Ui) -> Response {
        let (resp, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let custom_id = self.custom_id.clone();
        let custom_id = custom_id.as_deref();

        let mut meta = Metadata::load(ui, custom_id);
        let mut drag = ui
            .data(|d| d.get_temp::<DragState>(key(KEY_DRAG, custom_id)))
            .unwrap_or_default();

        let mut actions = Vec::new();
        CanvasView::<R>::handle_drop(ui, &resp, &meta, &mut actions);
        self.handle_node_drag(&resp, &meta, &mut drag, &mut actions);
        self.handle_navigation(ui, &resp, &mut meta, &drag);
        self.handle_click(&resp, &meta, &mut actions);
        self.handle_keys(ui, &resp, &mut actions);
        self.dispatch(actions);

        self.update_cursor(ui, &resp, &meta, &drag);

        let meta_draw = meta.on_screen(resp.rect.left_top());
        Drawer::new(
            self.canvas.graph(),
            self.canvas.selected_relation(),
            &DrawContext {
                ctx: ui.ctx(),
                painter: &painter,
                style: &self.settings_style,
                meta: &meta_draw,
            },
        )
        .draw(resp.rect);

        let menu_actions = self.show_menu(ui);
        self.dispatch(menu_actions);

        meta.save(ui, custom_id);
        ui.data_mut(|d| {
            d.insert_temp(key(KEY_DRAG, custom_id), drag);
            d.insert_temp(key(KEY_FRAME, custom_id), resp.rect);
        });

        resp
    }
}

impl<'a, R: ViewRepository> CanvasView<'a, R> {
    pub fn new(canvas: &'a mut Canvas<R>) -> Self {
        Self {
            canvas,
            settings_style: SettingsStyle::default(),
            settings_navigation: SettingsNavigation::default(),
            custom_id: None,
        }
    }

    /// Separates pan, zoom and drag state of several views in one context.
    pub fn with_id(mut self, custom_id: Option<String>) -> Self {
        self.custom_id = custom_id;
        self
    }

    pub fn with_styles(mut self, settings_style: &SettingsStyle) -> Self {
        self.settings_style = settings_style.clone();
        self
    }

    pub fn with_navigations(mut self, settings_navigation: &SettingsNavigation) -> Self {
        self.settings_navigation = settings_navigation.clone();
        self
    }

    fn dispatch(&mut self, actions: Vec<Interaction>) {
        for action in actions {
            self.canvas.dispatch(action);
        }
    }

    /// Convert a screen-space position to canvas position
    fn canvas_pos(resp: &Response, meta: &Metadata, p: Pos2) -> Pos2 {
        meta.screen_to_canvas_pos((p - resp.rect.left_top()).to_pos2())
    }

    fn hit(&self, pos: Pos2, meta: &Metadata) -> Hit {
        let g = self.canvas.graph();
        if let Some(node) = node_at(g, &self.settings_style, pos) {
            return Hit::Node(node.clone());
        }
        if let Some(relation) = relation_at(g, &self.settings_style, pos, meta.zoom) {
            return Hit::Relation(relation.clone());
        }
        Hit::Pane
    }

    fn handle_drop(ui: &Ui, resp: &Response, meta: &Metadata, actions: &mut Vec<Interaction>) {
        let Some(payload) = resp.dnd_release_payload::<String>() else {
            return;
        };
        let Some(pointer) = ui.ctx().pointer_interact_pos() else {
            return;
        };

        actions.push(Interaction::Drop {
            payload: payload.as_ref().clone(),
            location: Self::canvas_pos(resp, meta, pointer),
        });
    }

    fn handle_node_drag(
        &self,
        resp: &Response,
        meta: &Metadata,
        drag: &mut DragState,
        actions: &mut Vec<Interaction>,
    ) {
        if resp.drag_started() {
            let grabbed = resp.interact_pointer_pos().and_then(|p| {
                let pos = Self::canvas_pos(resp, meta, p);
                let id = node_at(self.canvas.graph(), &self.settings_style, pos)?;
                let node = self.canvas.graph().node(id)?;
                Some((id.clone(), node.location() - pos))
            });
            if let Some((node, grab)) = grabbed {
                *drag = DragState {
                    node: Some(node),
                    grab,
                };
            }
        }

        if let Some(node) = &drag.node {
            if resp.dragged() {
                if let Some(p) = resp.interact_pointer_pos() {
                    actions.push(Interaction::NodeMoved {
                        node: node.clone(),
                        location: Self::canvas_pos(resp, meta, p) + drag.grab,
                    });
                }
            }
        }

        if resp.drag_stopped() {
            *drag = DragState::default();
        }
    }

    fn handle_navigation(&self, ui: &Ui, resp: &Response, meta: &mut Metadata, drag: &DragState) {
        if !self.settings_navigation.zoom_and_pan {
            return;
        }

        if resp.dragged() && drag.node.is_none() {
            meta.pan += resp.drag_delta();
        }

        if !resp.hovered() {
            return;
        }

        let (zoom_delta, scroll) = ui.input(|i| (i.zoom_delta(), i.smooth_scroll_delta));
        if zoom_delta != 1. {
            let step = self.settings_navigation.zoom_step * (zoom_delta - 1.).signum();
            let center = resp
                .hover_pos()
                .map_or(resp.rect.size() / 2., |p| p - resp.rect.left_top())
                .to_pos2();
            meta.zoom_at(
                center,
                step,
                self.settings_navigation.zoom_min,
                self.settings_navigation.zoom_max,
            );
        } else if scroll != Vec2::ZERO {
            meta.pan += scroll;
        }
    }

    fn handle_click(&self, resp: &Response, meta: &Metadata, actions: &mut Vec<Interaction>) {
        if !resp.clicked() && !resp.double_clicked() && !resp.secondary_clicked() {
            return;
        }
        let Some(pointer) = resp.interact_pointer_pos() else {
            return;
        };
        let pos = Self::canvas_pos(resp, meta, pointer);

        // first click of a double click is handled as a single click before
        let hit = self.hit(pos, meta);
        let action = match (hit, resp.double_clicked(), resp.secondary_clicked()) {
            (Hit::Node(node), true, _) => Interaction::NodeDoubleClicked(node),
            (_, true, _) => return,
            (Hit::Node(node), _, true) => Interaction::NodeContextMenu {
                node,
                position: pointer,
            },
            (Hit::Relation(relation), _, true) => Interaction::RelationContextMenu {
                relation,
                position: pointer,
            },
            (Hit::Pane, _, true) => Interaction::CloseMenu,
            (Hit::Node(node), _, _) => Interaction::NodeClicked(node),
            (Hit::Relation(relation), _, _) => Interaction::RelationClicked(relation),
            (Hit::Pane, _, _) => Interaction::PaneClicked,
        };
        actions.push(action);
    }

    fn handle_keys(&self, ui: &Ui, resp: &Response, actions: &mut Vec<Interaction>) {
        if !resp.hovered() && !self.canvas.menu().is_open() {
            return;
        }
        if ui.input(|i| i.key_pressed(Key::Escape)) {
            actions.push(Interaction::CloseMenu);
        }
    }

    fn update_cursor(&self, ui: &Ui, resp: &Response, meta: &Metadata, drag: &DragState) {
        if drag.node.is_some() {
            ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
            return;
        }
        let Some(hover) = resp.hover_pos() else {
            return;
        };
        let pos = Self::canvas_pos(resp, meta, hover);

        let over_node = node_at(self.canvas.graph(), &self.settings_style, pos).is_some();
        let icon = match (self.canvas.is_connect_armed(), over_node) {
            (true, _) => CursorIcon::Crosshair,
            (false, true) => CursorIcon::PointingHand,
            (false, false) => return,
        };
        ui.ctx().set_cursor_icon(icon);
    }

    fn show_menu(&self, ui: &Ui) -> Vec<Interaction> {
        let mut actions = Vec::new();
        let custom_id = self.custom_id.as_deref();
        let menu = self.canvas.menu();
        let (Some(position), Some(draft)) = (menu.position(), menu.draft()) else {
            return actions;
        };

        Area::new(key(KEY_MENU, custom_id))
            .order(Order::Foreground)
            .fixed_pos(position)
            .show(ui.ctx(), |ui| {
                Frame::popup(ui.style()).show(ui, |ui| match menu {
                    ContextMenu::Closed => {}
                    ContextMenu::Relation { edge, .. } => {
                        if let Some(relation) = self.canvas.graph().relation(edge) {
                            let props = relation.props();
                            relation_menu(ui, edge, props, draft, custom_id, &mut actions);
                        }
                    }
                    ContextMenu::Router { node, .. } => {
                        router_menu(ui, node, draft, custom_id, &mut actions);
                    }
                });
            });
        actions
    }
}

fn relation_menu(
    ui: &mut Ui,
    edge: &EdgeId,
    props: &RelationProps,
    draft: &str,
    custom_id: Option<&str>,
    actions: &mut Vec<Interaction>,
) {
    ui.label(RichText::new("STATE").small().weak());
    ui.horizontal(|ui| {
        for state in RelationState::EDITABLE {
            if ui.selectable_label(props.state == state, state.name()).clicked() {
                actions.push(patch(edge, RelationPatch::default().with_state(state)));
            }
        }
    });

    ui.label(RichText::new("SHAPE").small().weak());
    ui.horizontal(|ui| {
        for shape in RelationShape::ALL {
            if ui.selectable_label(props.shape == shape, shape.name()).clicked() {
                actions.push(patch(edge, RelationPatch::default().with_shape(shape)));
            }
        }
    });

    ui.label(RichText::new("LABEL").small().weak());
    let mut label = draft.to_string();
    let field = ui.add(TextEdit::singleline(&mut label).id(editor_id(custom_id)));
    if field.changed() {
        actions.push(Interaction::EditRelationDraft(label.clone()));
    }
    if field.lost_focus() {
        actions.push(patch(edge, RelationPatch::default().with_label(label)));
    }

    let mut animating = props.animating;
    if ui.checkbox(&mut animating, "Animated").changed() {
        actions.push(patch(edge, RelationPatch::default().with_animating(animating)));
    }
    ui.separator();
    if ui.button("Delete relation").clicked() {
        actions.push(Interaction::DeleteRelation(edge.clone()));
    }
}

fn router_menu(
    ui: &mut Ui,
    node: &NodeId,
    draft: &str,
    custom_id: Option<&str>,
    actions: &mut Vec<Interaction>,
) {
    ui.label(RichText::new("ROUTER LABEL").small().weak());
    let mut text = draft.to_string();
    let edit = ui.add(
        TextEdit::singleline(&mut text)
            .id(editor_id(custom_id))
            .hint_text("Router"),
    );
    if edit.changed() {
        actions.push(Interaction::EditRouterDraft(text.clone()));
    }
    // Enter also ends focus of a single line editor
    let blurred = edit.lost_focus();
    ui.horizontal(|ui| {
        if ui.button("Save").clicked() || blurred {
            actions.push(Interaction::CommitRouterLabel {
                node: node.clone(),
                text: text.clone(),
            });
        }
        if ui.button("Delete router").clicked() {
            actions.push(Interaction::DeleteNode(node.clone()));
        }
    });
}

fn patch(relation: &EdgeId, patch: RelationPatch) -> Interaction {
    Interaction::PatchRelation {
        relation: relation.clone(),
        patch,
    }
}

/// Id of the text field in the open context menu.
fn editor_id(custom_id: Option<&str>) -> Id {
    key(KEY_EDITOR, custom_id)
}

fn key(name: &str, custom_id: Option<&str>) -> Id {
    Id::new((name, custom_id))
}

/// Canvas position at the center of the area the view occupied in the last
/// frame. Useful for placing nodes created from outside the widget.
pub fn visible_center(ui: &Ui, custom_id: Option<&str>) -> Pos2 {
    let Some(rect) = ui.data(|d| d.get_temp::<Rect>(key(KEY_FRAME, custom_id))) else {
        return Pos2::ZERO;
    };
    Metadata::load(ui, custom_id).screen_to_canvas_pos((rect.size() / 2.).to_pos2())
}
