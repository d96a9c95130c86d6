use std::fmt;

use egui::Pos2;
use serde::{Deserialize, Serialize};

use crate::{
    events::{
        Event, EventSink, PayloadConnectMode, PayloadConnectSource, PayloadNodeAdded,
        PayloadNodeMove, PayloadNodeRelabel, PayloadNodeRemoved, PayloadRelationAdded,
        PayloadRelationPatch, PayloadRelationRemoved, PayloadRelationSelect, PayloadViewEnter,
    },
    menu::{router_draft, router_label},
    BlockData, CanvasError, ConnectState, ConnectStep, ContextMenu, EdgeId, MemoryRepository,
    NavigationPath, Node, NodeId, PaletteItem, Relation, RelationPatch, SettingsCanvas,
    SnapshotPolicy, ViewGraph, ViewId, ViewRepository,
};

/// Discrete input the canvas reacts to. Positions of context menus are in
/// screen space, node locations in canvas space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Interaction {
    ToggleConnect,
    NodeClicked(NodeId),
    NodeDoubleClicked(NodeId),
    NodeContextMenu { node: NodeId, position: Pos2 },
    NodeMoved { node: NodeId, location: Pos2 },
    RelationClicked(EdgeId),
    RelationContextMenu { relation: EdgeId, position: Pos2 },
    PaneClicked,
    BreadcrumbClicked(usize),
    Drop { payload: String, location: Pos2 },
    AddRouter(Pos2),
    PatchRelation { relation: EdgeId, patch: RelationPatch },
    DeleteRelation(EdgeId),
    EditRouterDraft(String),
    EditRelationDraft(String),
    CommitRouterLabel { node: NodeId, text: String },
    DeleteNode(NodeId),
    CloseMenu,
}

/// Interaction model of the canvas and the single owner of its state.
///
/// Holds the node and relation collections of the active view, the
/// breadcrumb path, the connect tool and the open context menu. View snapshots
/// are read from and written back to the injected [`ViewRepository`].
pub struct Canvas<R: ViewRepository = MemoryRepository> {
    repo: R,
    settings: SettingsCanvas,

    graph: ViewGraph,
    path: NavigationPath,

    connect: ConnectState,
    selected_relation: Option<EdgeId>,
    menu: ContextMenu,

    next_node: u64,
    next_relation: u64,

    sink: Option<Box<dyn EventSink>>,
}

impl<R: ViewRepository> fmt::Debug for Canvas<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("view", self.current_view())
            .field("nodes", &self.graph.node_count())
            .field("relations", &self.graph.relation_count())
            .field("connect", &self.connect)
            .field("menu", &self.menu)
            .finish_non_exhaustive()
    }
}

impl<R: ViewRepository> Canvas<R> {
    /// Opens the root view of the repository. A missing root snapshot shows as
    /// an empty view.
    pub fn new(repo: R) -> Self {
        let graph = ViewGraph::from_view(&repo.load(&ViewId::root()).unwrap_or_default());
        Self {
            repo,
            settings: SettingsCanvas::default(),
            graph,
            path: NavigationPath::new(),
            connect: ConnectState::default(),
            selected_relation: None,
            menu: ContextMenu::default(),
            next_node: 0,
            next_relation: 0,
            sink: None,
        }
    }

    pub fn with_settings(mut self, settings: SettingsCanvas) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_event_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.set_event_sink(sink);
        self
    }

    pub fn set_event_sink(&mut self, sink: impl EventSink + 'static) {
        self.sink = Some(Box::new(sink));
    }

    pub fn settings(&self) -> &SettingsCanvas {
        &self.settings
    }

    pub fn graph(&self) -> &ViewGraph {
        &self.graph
    }

    pub fn path(&self) -> &NavigationPath {
        &self.path
    }

    pub fn current_view(&self) -> &ViewId {
        &self.path.current().view
    }

    pub fn connect_state(&self) -> &ConnectState {
        &self.connect
    }

    pub fn is_connect_armed(&self) -> bool {
        self.connect.is_armed()
    }

    pub fn selected_relation(&self) -> Option<&EdgeId> {
        self.selected_relation.as_ref()
    }

    pub fn menu(&self) -> &ContextMenu {
        &self.menu
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn repository_mut(&mut self) -> &mut R {
        &mut self.repo
    }

    /// Hands the repository back, writing the active view according to the
    /// snapshot policy first.
    pub fn into_repository(mut self) -> R {
        self.persist_active();
        self.repo
    }

    /// Writes the active view into the repository regardless of the policy.
    pub fn persist(&mut self) {
        let view = self.current_view().clone();
        self.repo.store(view, self.graph.to_view());
    }

    /// Routes an input to its operation. Rejected inputs are logged and
    /// otherwise ignored.
    pub fn dispatch(&mut self, interaction: Interaction) {
        let result = match interaction {
            Interaction::ToggleConnect => {
                self.toggle_connect();
                Ok(())
            }
            Interaction::NodeClicked(node) => self.node_clicked(&node),
            Interaction::NodeDoubleClicked(node) => self.node_double_clicked(&node).map(|_| ()),
            Interaction::NodeContextMenu { node, position } => {
                self.node_context_menu(&node, position)
            }
            Interaction::NodeMoved { node, location } => self.move_node(&node, location),
            Interaction::RelationClicked(relation) => self.relation_clicked(&relation),
            Interaction::RelationContextMenu { relation, position } => {
                self.relation_context_menu(&relation, position)
            }
            Interaction::PaneClicked => {
                self.pane_clicked();
                Ok(())
            }
            Interaction::BreadcrumbClicked(index) => {
                if !self.breadcrumb_clicked(index) {
                    log::debug!("ignored breadcrumb {index}, path has {}", self.path.len());
                }
                Ok(())
            }
            Interaction::Drop { payload, location } => {
                self.drop_payload(&payload, location).map(|_| ())
            }
            Interaction::AddRouter(location) => self.add_router(location).map(|_| ()),
            Interaction::PatchRelation { relation, patch } => {
                self.patch_relation(&relation, &patch)
            }
            Interaction::DeleteRelation(relation) => self.delete_relation(&relation).map(|_| ()),
            Interaction::EditRouterDraft(text) => {
                self.set_router_draft(text);
                Ok(())
            }
            Interaction::EditRelationDraft(text) => {
                self.set_relation_draft(text);
                Ok(())
            }
            Interaction::CommitRouterLabel { node, text } => {
                self.commit_router_label(&node, &text).map(|_| ())
            }
            Interaction::DeleteNode(node) => self.delete_node(&node).map(|_| ()),
            Interaction::CloseMenu => {
                self.close_menu();
                Ok(())
            }
        };

        if let Err(err) = result {
            log::debug!("ignored interaction: {err}");
        }
    }

    /// Switches the connect tool on or off and drops any picked source.
    pub fn toggle_connect(&mut self) {
        self.connect.toggle();
        self.graph.set_source(None);
        self.emit(Event::ConnectMode(PayloadConnectMode {
            armed: self.connect.is_armed(),
        }));
    }

    /// Feeds a node click into the connect tool. The first click picks the
    /// source, the second creates the relation and re-arms the tool.
    pub fn node_clicked(&mut self, node: &NodeId) -> Result<(), CanvasError> {
        if !self.graph.contains_node(node) {
            return Err(CanvasError::UnknownNode(node.clone()));
        }

        match self.connect.node_clicked(node) {
            ConnectStep::Ignored => {
                self.graph.select_node(Some(node));
                self.select_relation(None);
            }
            ConnectStep::SourcePicked(source) => {
                self.graph.set_source(Some(&source));
                self.emit(Event::ConnectSource(PayloadConnectSource { node: source }));
            }
            ConnectStep::Completed { source, target } => {
                self.graph.set_source(None);
                self.add_relation(&source, &target)?;
            }
        }
        Ok(())
    }

    /// Clears selection and menus, then drops a picked source.
    pub fn pane_clicked(&mut self) {
        self.graph.select_node(None);
        self.select_relation(None);
        self.close_menu();
        self.cancel_connection();
    }

    /// Creates a relation with the configured default properties.
    pub fn add_relation(
        &mut self,
        source: &NodeId,
        target: &NodeId,
    ) -> Result<EdgeId, CanvasError> {
        let id = self.fresh_relation_id(source, target);
        let relation = Relation::new(
            id.clone(),
            source.clone(),
            target.clone(),
            self.settings.new_relation.clone(),
        );
        self.graph.add_relation(relation)?;

        log::debug!("relation {id}: {source} -> {target}");
        self.emit(Event::RelationAdded(PayloadRelationAdded {
            view: self.current_view().clone(),
            relation: id.clone(),
            source: source.clone(),
            target: target.clone(),
        }));
        Ok(id)
    }

    pub fn relation_clicked(&mut self, relation: &EdgeId) -> Result<(), CanvasError> {
        self.ensure_relation(relation)?;
        self.graph.select_node(None);
        self.select_relation(Some(relation.clone()));
        self.close_menu();
        Ok(())
    }

    pub fn relation_context_menu(
        &mut self,
        relation: &EdgeId,
        position: Pos2,
    ) -> Result<(), CanvasError> {
        self.ensure_relation(relation)?;
        self.commit_menu_draft();
        let label = self
            .graph
            .relation(relation)
            .and_then(|r| r.props().label.clone());
        self.select_relation(Some(relation.clone()));
        self.open_menu(ContextMenu::relation_editor(
            relation.clone(),
            position,
            label.as_deref(),
        ));
        Ok(())
    }

    /// Opens the label editor for routers. Blocks have no context menu, the
    /// click only closes an open one.
    pub fn node_context_menu(&mut self, node: &NodeId, position: Pos2) -> Result<(), CanvasError> {
        if !self.graph.contains_node(node) {
            return Err(CanvasError::UnknownNode(node.clone()));
        }
        self.commit_menu_draft();
        let n = self
            .graph
            .node(node)
            .ok_or_else(|| CanvasError::UnknownNode(node.clone()))?;

        if n.is_router() {
            let menu = ContextMenu::router(node.clone(), position, n.label());
            self.open_menu(menu);
        } else {
            self.close_menu();
        }
        Ok(())
    }

    /// Merges `patch` into the relation properties.
    pub fn patch_relation(
        &mut self,
        relation: &EdgeId,
        patch: &RelationPatch,
    ) -> Result<(), CanvasError> {
        let r = self
            .graph
            .relation_mut(relation)
            .ok_or_else(|| CanvasError::UnknownRelation(relation.clone()))?;
        r.props_mut().apply(patch);
        let props = r.props().clone();

        if patch.label.is_some() && self.menu.targets_relation(relation) {
            self.set_relation_draft(props.label.clone().unwrap_or_default());
        }

        self.emit(Event::RelationPatch(PayloadRelationPatch {
            relation: relation.clone(),
            props,
        }));
        Ok(())
    }

    pub fn delete_relation(&mut self, relation: &EdgeId) -> Result<Relation, CanvasError> {
        let removed = self
            .graph
            .remove_relation(relation)
            .ok_or_else(|| CanvasError::UnknownRelation(relation.clone()))?;

        self.emit(Event::RelationRemoved(PayloadRelationRemoved {
            view: self.current_view().clone(),
            relation: relation.clone(),
        }));
        self.select_relation(None);
        self.close_menu();
        Ok(removed)
    }

    /// Replaces the text of the open router editor.
    pub fn set_router_draft(&mut self, text: String) {
        if let ContextMenu::Router { draft, .. } = &mut self.menu {
            *draft = text;
        }
    }

    /// Replaces the label text of the open relation editor. The text is stored
    /// when the editor loses focus or the menu closes.
    pub fn set_relation_draft(&mut self, text: String) {
        if let ContextMenu::Relation { draft, .. } = &mut self.menu {
            *draft = text;
        }
    }

    /// Stores the trimmed text as router label, the default label when empty.
    /// Returns the stored label.
    pub fn commit_router_label(
        &mut self,
        node: &NodeId,
        text: &str,
    ) -> Result<String, CanvasError> {
        let n = self
            .graph
            .node_mut(node)
            .ok_or_else(|| CanvasError::UnknownNode(node.clone()))?;
        if !n.is_router() {
            return Err(CanvasError::NotARouter(node.clone()));
        }

        let label = router_label(text);
        n.set_label(label.clone());

        if self.menu.targets_node(node) {
            self.set_router_draft(router_draft(&label));
        }

        self.emit(Event::NodeRelabel(PayloadNodeRelabel {
            node: node.clone(),
            label: label.clone(),
        }));
        Ok(label)
    }

    /// Removes the node and every relation touching it.
    pub fn delete_node(&mut self, node: &NodeId) -> Result<Node, CanvasError> {
        let (removed, relations) = self
            .graph
            .remove_node(node)
            .ok_or_else(|| CanvasError::UnknownNode(node.clone()))?;

        if self.connect.source() == Some(node) {
            self.connect.cancel();
        }
        if self
            .selected_relation
            .as_ref()
            .is_some_and(|s| relations.iter().any(|r| r.id() == s))
        {
            self.select_relation(None);
        }
        self.close_menu();

        log::debug!("node {node} removed with {} relation(s)", relations.len());
        self.emit(Event::NodeRemoved(PayloadNodeRemoved {
            view: self.current_view().clone(),
            node: node.clone(),
            relations: relations.iter().map(|r| r.id().clone()).collect(),
        }));
        Ok(removed)
    }

    /// Drills into a block: its snapshot becomes the active view and the block
    /// is pushed onto the path. Returns `false` for routers, which own no view.
    pub fn node_double_clicked(&mut self, node: &NodeId) -> Result<bool, CanvasError> {
        let n = self
            .graph
            .node(node)
            .ok_or_else(|| CanvasError::UnknownNode(node.clone()))?;
        if !n.is_block() {
            return Ok(false);
        }

        let label = match n.label().trim() {
            "" => self.settings.unnamed_view_label.clone(),
            label => label.to_string(),
        };

        let view = ViewId::from(node);
        self.close_menu();
        self.persist_active();
        self.repo.ensure(&view);
        self.path.push(view.clone(), label);
        self.load(view);
        Ok(true)
    }

    /// Navigates to the breadcrumb at `index`, truncating the path after it.
    /// Returns `false` when the index is out of range.
    pub fn breadcrumb_clicked(&mut self, index: usize) -> bool {
        if index >= self.path.len() {
            return false;
        }

        self.close_menu();
        self.persist_active();
        let Some(crumb) = self.path.truncate(index) else {
            return false;
        };
        let view = crumb.view.clone();
        self.load(view);
        true
    }

    /// Creates the palette item named by `payload` at `location`.
    pub fn drop_payload(&mut self, payload: &str, location: Pos2) -> Result<NodeId, CanvasError> {
        match payload.parse::<PaletteItem>()? {
            PaletteItem::Block => self.add_block(location),
            PaletteItem::Router => self.add_router(location),
        }
    }

    pub fn add_block(&mut self, location: Pos2) -> Result<NodeId, CanvasError> {
        let id = self.fresh_node_id();
        let node = Node::block(
            id,
            self.settings.new_block_label.clone(),
            location,
            BlockData::default(),
        );
        self.insert_node(node)
    }

    pub fn add_router(&mut self, location: Pos2) -> Result<NodeId, CanvasError> {
        let id = self.fresh_node_id();
        self.insert_node(Node::router(id, location))
    }

    /// Inserts a node built by the caller, e.g. a block with custom data.
    pub fn insert_node(&mut self, node: Node) -> Result<NodeId, CanvasError> {
        let id = node.id().clone();
        let location = node.location();
        let detached = node.detached();
        self.graph.add_node(node)?;

        if self.settings.snapshot_policy == SnapshotPolicy::InsertsOnly {
            let view = self.current_view().clone();
            if !self.repo.push_node(&view, detached) {
                log::debug!("view {view} has no snapshot, node {id} is not mirrored");
            }
        }

        self.emit(Event::NodeAdded(PayloadNodeAdded {
            view: self.current_view().clone(),
            node: id.clone(),
            location: [location.x, location.y],
        }));
        Ok(id)
    }

    pub fn move_node(&mut self, node: &NodeId, location: Pos2) -> Result<(), CanvasError> {
        self.graph
            .node_mut(node)
            .ok_or_else(|| CanvasError::UnknownNode(node.clone()))?
            .set_location(location);

        self.emit(Event::NodeMove(PayloadNodeMove {
            node: node.clone(),
            location: [location.x, location.y],
        }));
        Ok(())
    }

    /// Closes the open menu. An edited label draft is stored first, so leaving
    /// the editor by any route keeps what was typed.
    pub fn close_menu(&mut self) {
        if self.menu.is_open() {
            self.commit_menu_draft();
            self.menu = ContextMenu::Closed;
            self.emit(Event::MenuClose);
        }
    }

    fn commit_menu_draft(&mut self) {
        let result = match self.menu.clone() {
            ContextMenu::Closed => Ok(()),
            ContextMenu::Router { node, draft, .. } => {
                let edited = self
                    .graph
                    .node(&node)
                    .is_some_and(|n| router_draft(n.label()) != draft);
                if edited {
                    self.commit_router_label(&node, &draft).map(|_| ())
                } else {
                    Ok(())
                }
            }
            ContextMenu::Relation { edge, draft, .. } => {
                let edited = self.graph.relation(&edge).is_some_and(|r| {
                    r.props().label.as_deref().unwrap_or_default() != draft.trim()
                });
                if edited {
                    self.patch_relation(&edge, &RelationPatch::default().with_label(draft))
                } else {
                    Ok(())
                }
            }
        };
        if let Err(err) = result {
            log::debug!("dropped menu draft: {err}");
        }
    }

    fn open_menu(&mut self, menu: ContextMenu) {
        self.menu = menu;
        self.emit(Event::MenuOpen);
    }

    fn select_relation(&mut self, relation: Option<EdgeId>) {
        if self.selected_relation == relation {
            return;
        }
        self.selected_relation = relation.clone();
        self.emit(Event::RelationSelect(PayloadRelationSelect { relation }));
    }

    fn cancel_connection(&mut self) {
        if !self.connect.is_armed() {
            return;
        }
        if let Some(source) = self.connect.cancel() {
            self.emit(Event::ConnectCancel(PayloadConnectSource { node: source }));
        }
        self.graph.set_source(None);
    }

    fn ensure_relation(&self, relation: &EdgeId) -> Result<(), CanvasError> {
        if self.graph.contains_relation(relation) {
            Ok(())
        } else {
            Err(CanvasError::UnknownRelation(relation.clone()))
        }
    }

    fn persist_active(&mut self) {
        if self.settings.snapshot_policy == SnapshotPolicy::WriteBack {
            self.persist();
        }
    }

    /// Replaces the active collections with the snapshot of `view`. The path
    /// must already end with `view`.
    fn load(&mut self, view: ViewId) {
        let snapshot = self.repo.load(&view).unwrap_or_default();
        self.graph = ViewGraph::from_view(&snapshot);

        self.cancel_connection();
        self.selected_relation = None;
        self.close_menu();

        log::debug!(
            "entered view {view} with {} node(s), depth {}",
            self.graph.node_count(),
            self.path.depth()
        );
        self.emit(Event::ViewEnter(PayloadViewEnter {
            view,
            depth: self.path.depth(),
        }));
    }

    fn fresh_node_id(&mut self) -> NodeId {
        loop {
            let id = NodeId::new(format!("node_{}", self.next_node));
            self.next_node += 1;
            // node ids double as view keys, so they must not collide with stored views
            if !self.graph.contains_node(&id) && !self.repo.contains(&ViewId::from(&id)) {
                return id;
            }
        }
    }

    fn fresh_relation_id(&mut self, source: &NodeId, target: &NodeId) -> EdgeId {
        loop {
            let id = EdgeId::new(format!("e-{source}-{target}-{}", self.next_relation));
            self.next_relation += 1;
            if !self.graph.contains_relation(&id) {
                return id;
            }
        }
    }

    fn emit(&self, event: Event) {
        if let Some(sink) = &self.sink {
            sink.send(event);
        }
    }
}
