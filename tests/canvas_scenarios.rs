use std::rc::Rc;

use egui::Pos2;
use nox_canvas::{
    events::{Event, EventLog},
    BlockData, Canvas, CanvasError, ConnectState, ContextMenu, EdgeId, Interaction,
    MemoryRepository, MockHierarchy, Node, NodeId, PaletteError, RelationPatch, RelationShape,
    RelationState, SettingsCanvas, SnapshotPolicy, View, ViewId, ViewRepository, ROOT_LABEL,
};

fn id(s: &str) -> NodeId {
    NodeId::new(s)
}

fn mock_canvas() -> Canvas {
    Canvas::new(MockHierarchy::default().with_max_depth(3).build())
}

/// Repository holding only a root view with two blocks.
fn bare_canvas(policy: SnapshotPolicy) -> Canvas {
    let block = |name: &str, x: f32| {
        Node::block(id(name), name, Pos2::new(x, 0.), BlockData::default())
    };
    let repo: MemoryRepository = [(
        ViewId::root(),
        View::new(
            vec![block("root-child-0", 0.), block("root-child-1", 300.)],
            Vec::new(),
        ),
    )]
    .into_iter()
    .collect();
    Canvas::new(repo).with_settings(SettingsCanvas::default().with_snapshot_policy(policy))
}

#[test]
fn connect_two_root_children() {
    let mut canvas = mock_canvas();
    assert_eq!(canvas.graph().relation_count(), 0);

    canvas.toggle_connect();
    canvas.node_clicked(&id("root-child-0")).unwrap();
    assert_eq!(canvas.graph().source(), Some(&id("root-child-0")));
    canvas.node_clicked(&id("root-child-1")).unwrap();

    let relations = canvas.graph().relations_iter().collect::<Vec<_>>();
    assert_eq!(relations.len(), 1);
    let r = relations[0];
    assert_eq!(r.source(), &id("root-child-0"));
    assert_eq!(r.target(), &id("root-child-1"));
    assert_eq!(r.props().shape, RelationShape::Step);
    assert_eq!(r.props().state, RelationState::Placeholder);
    assert_eq!(r.props().label.as_deref(), Some("Relation"));

    assert_eq!(canvas.connect_state(), &ConnectState::Armed);
    assert_eq!(canvas.graph().source(), None);
}

#[test]
fn clicks_without_connect_mode_only_select() {
    let mut canvas = mock_canvas();
    canvas.node_clicked(&id("root-child-0")).unwrap();
    canvas.node_clicked(&id("root-child-1")).unwrap();

    assert_eq!(canvas.graph().relation_count(), 0);
    assert_eq!(canvas.graph().selected_node(), Some(&id("root-child-1")));

    canvas.pane_clicked();
    assert_eq!(canvas.graph().selected_node(), None);
}

#[test]
fn pane_click_cancels_source_but_stays_armed() {
    let mut canvas = mock_canvas();
    canvas.toggle_connect();
    canvas.node_clicked(&id("root-child-0")).unwrap();
    canvas.pane_clicked();

    assert_eq!(canvas.connect_state(), &ConnectState::Armed);
    assert_eq!(canvas.graph().source(), None);

    // next click picks a new source instead of completing the old one
    canvas.node_clicked(&id("root-child-2")).unwrap();
    assert_eq!(canvas.graph().relation_count(), 0);
    assert_eq!(canvas.graph().source(), Some(&id("root-child-2")));
}

#[test]
fn toggle_clears_source_flags() {
    let mut canvas = mock_canvas();
    canvas.toggle_connect();
    canvas.node_clicked(&id("root-child-1")).unwrap();
    canvas.toggle_connect();

    assert!(!canvas.is_connect_armed());
    assert!(canvas.graph().nodes_iter().all(|n| !n.is_source()));
}

#[test]
fn same_node_twice_creates_self_loop() {
    let mut canvas = mock_canvas();
    canvas.toggle_connect();
    canvas.node_clicked(&id("root-child-0")).unwrap();
    canvas.node_clicked(&id("root-child-0")).unwrap();

    let r = canvas.graph().relations_iter().next().unwrap();
    assert!(r.is_self_loop());
}

#[test]
fn drill_into_stored_view() {
    let mut canvas = mock_canvas();
    let label = canvas.graph().node(&id("root-child-0")).unwrap().label().to_string();

    assert!(canvas.node_double_clicked(&id("root-child-0")).unwrap());

    let crumbs = canvas
        .path()
        .iter()
        .map(|c| (c.view.as_str().to_string(), c.label.clone()))
        .collect::<Vec<_>>();
    assert_eq!(
        crumbs,
        [
            ("root".to_string(), ROOT_LABEL.to_string()),
            ("root-child-0".to_string(), label),
        ]
    );
    assert_eq!(canvas.current_view(), &ViewId::new("root-child-0"));

    let stored = canvas
        .repository()
        .get(&ViewId::new("root-child-0"))
        .unwrap()
        .clone();
    assert_eq!(canvas.graph().to_view(), stored);
}

#[test]
fn drill_into_unvisited_view_is_empty() {
    let mut canvas = bare_canvas(SnapshotPolicy::WriteBack);
    assert!(canvas.node_double_clicked(&id("root-child-0")).unwrap());

    assert_eq!(canvas.path().len(), 2);
    assert_eq!(canvas.graph().node_count(), 0);
    assert!(canvas.repository().contains(&ViewId::new("root-child-0")));
}

#[test]
fn added_node_survives_navigation() {
    for policy in [SnapshotPolicy::WriteBack, SnapshotPolicy::InsertsOnly] {
        let mut canvas = bare_canvas(policy);
        canvas.node_double_clicked(&id("root-child-0")).unwrap();
        let added = canvas.drop_payload("noxBlock", Pos2::new(40., 40.)).unwrap();

        assert!(canvas.breadcrumb_clicked(0));
        assert_eq!(canvas.current_view(), &ViewId::root());
        assert!(!canvas.graph().contains_node(&added));

        canvas.node_double_clicked(&id("root-child-0")).unwrap();
        let node = canvas.graph().node(&added).unwrap();
        assert_eq!(node.label(), "New Block", "{policy:?}");
        assert_eq!(node.location(), Pos2::new(40., 40.));
    }
}

#[test]
fn write_back_keeps_relations_and_moves() {
    let mut canvas = bare_canvas(SnapshotPolicy::WriteBack);
    canvas.toggle_connect();
    canvas.node_clicked(&id("root-child-0")).unwrap();
    canvas.node_clicked(&id("root-child-1")).unwrap();
    canvas.move_node(&id("root-child-1"), Pos2::new(500., 20.)).unwrap();

    canvas.node_double_clicked(&id("root-child-0")).unwrap();
    canvas.breadcrumb_clicked(0);

    assert_eq!(canvas.graph().relation_count(), 1);
    assert_eq!(
        canvas.graph().node(&id("root-child-1")).unwrap().location(),
        Pos2::new(500., 20.)
    );
}

#[test]
fn inserts_only_drops_relations_on_navigation() {
    let mut canvas = bare_canvas(SnapshotPolicy::InsertsOnly);
    canvas.toggle_connect();
    canvas.node_clicked(&id("root-child-0")).unwrap();
    canvas.node_clicked(&id("root-child-1")).unwrap();

    canvas.node_double_clicked(&id("root-child-0")).unwrap();
    canvas.breadcrumb_clicked(0);

    assert_eq!(canvas.graph().relation_count(), 0);
    assert_eq!(canvas.graph().node_count(), 2);
}

#[test]
fn view_switch_resets_interaction_state() {
    let mut canvas = mock_canvas();
    canvas.toggle_connect();
    canvas.node_clicked(&id("root-child-0")).unwrap();
    canvas.node_double_clicked(&id("root-child-1")).unwrap();

    assert!(canvas.is_connect_armed());
    assert_eq!(canvas.connect_state().source(), None);
    assert_eq!(canvas.selected_relation(), None);
    assert!(!canvas.menu().is_open());
}

#[test]
fn breadcrumb_out_of_range_is_ignored() {
    let mut canvas = mock_canvas();
    canvas.node_double_clicked(&id("root-child-0")).unwrap();

    assert!(!canvas.breadcrumb_clicked(2));
    assert_eq!(canvas.path().len(), 2);
    assert_eq!(canvas.current_view(), &ViewId::new("root-child-0"));
}

#[test]
fn nested_drill_and_truncate() {
    let mut canvas = mock_canvas();
    canvas.node_double_clicked(&id("root-child-2")).unwrap();
    canvas
        .node_double_clicked(&id("root-child-2-child-1"))
        .unwrap();
    assert_eq!(canvas.path().depth(), 2);

    assert!(canvas.breadcrumb_clicked(1));
    assert_eq!(canvas.path().len(), 2);
    assert_eq!(canvas.current_view(), &ViewId::new("root-child-2"));
    assert!(canvas.graph().contains_node(&id("root-child-2-child-1")));
}

#[test]
fn routers_do_not_drill() {
    let mut canvas = mock_canvas();
    let router = canvas.add_router(Pos2::ZERO).unwrap();

    assert!(!canvas.node_double_clicked(&router).unwrap());
    assert_eq!(canvas.path().len(), 1);
}

#[test]
fn delete_node_cascades() {
    let mut canvas = mock_canvas();
    canvas.toggle_connect();
    for (a, b) in [(0, 1), (1, 2), (2, 0), (0, 2)] {
        canvas.node_clicked(&id(&format!("root-child-{a}"))).unwrap();
        canvas.node_clicked(&id(&format!("root-child-{b}"))).unwrap();
    }
    assert_eq!(canvas.graph().relation_count(), 4);

    canvas.delete_node(&id("root-child-1")).unwrap();

    assert_eq!(canvas.graph().relation_count(), 2);
    assert!(canvas
        .graph()
        .relations_iter()
        .all(|r| !r.touches(&id("root-child-1"))));
}

#[test]
fn deleting_source_node_cancels_pending_connection() {
    let mut canvas = mock_canvas();
    canvas.toggle_connect();
    canvas.node_clicked(&id("root-child-0")).unwrap();
    canvas.delete_node(&id("root-child-0")).unwrap();

    assert_eq!(canvas.connect_state(), &ConnectState::Armed);
}

#[test]
fn relation_menu_patch_and_delete() {
    let mut canvas = mock_canvas();
    canvas.toggle_connect();
    canvas.node_clicked(&id("root-child-0")).unwrap();
    canvas.node_clicked(&id("root-child-1")).unwrap();
    let edge = canvas.graph().relations_iter().next().unwrap().id().clone();

    canvas
        .relation_context_menu(&edge, Pos2::new(50., 60.))
        .unwrap();
    assert_eq!(canvas.menu().relation(), Some(&edge));
    assert_eq!(canvas.selected_relation(), Some(&edge));

    canvas
        .patch_relation(
            &edge,
            &RelationPatch::default()
                .with_state(RelationState::Valid)
                .with_animating(true),
        )
        .unwrap();
    let props = canvas.graph().relation(&edge).unwrap().props();
    assert_eq!(props.state, RelationState::Valid);
    assert_eq!(props.shape, RelationShape::Step);
    assert!(props.animating);

    canvas.delete_relation(&edge).unwrap();
    assert_eq!(canvas.graph().relation_count(), 0);
    assert!(!canvas.menu().is_open());
    assert_eq!(canvas.selected_relation(), None);
}

#[test]
fn relation_click_selects_and_closes_menu() {
    let mut canvas = mock_canvas();
    let a = canvas.add_relation(&id("root-child-0"), &id("root-child-1")).unwrap();
    let b = canvas.add_relation(&id("root-child-1"), &id("root-child-2")).unwrap();

    canvas.relation_context_menu(&a, Pos2::ZERO).unwrap();
    canvas.relation_clicked(&b).unwrap();

    assert_eq!(canvas.selected_relation(), Some(&b));
    assert_eq!(canvas.menu(), &ContextMenu::Closed);
}

#[test]
fn router_label_editing() {
    let mut canvas = mock_canvas();
    let router = canvas.drop_payload("noxRouter", Pos2::new(10., 10.)).unwrap();

    canvas.node_context_menu(&router, Pos2::new(5., 5.)).unwrap();
    assert!(matches!(canvas.menu(), ContextMenu::Router { draft, .. } if draft.is_empty()));

    assert_eq!(canvas.commit_router_label(&router, "  ingress ").unwrap(), "ingress");
    assert_eq!(canvas.graph().node(&router).unwrap().label(), "ingress");

    assert_eq!(canvas.commit_router_label(&router, "   ").unwrap(), "Router");
    assert_eq!(canvas.graph().node(&router).unwrap().label(), "Router");
}

#[test]
fn block_context_menu_opens_nothing() {
    let mut canvas = mock_canvas();
    let router = canvas.add_router(Pos2::ZERO).unwrap();
    canvas.node_context_menu(&router, Pos2::ZERO).unwrap();

    canvas
        .node_context_menu(&id("root-child-0"), Pos2::ZERO)
        .unwrap();
    assert!(!canvas.menu().is_open());
}

#[test]
fn unknown_payloads_are_rejected() {
    let mut canvas = mock_canvas();
    assert_eq!(
        canvas.drop_payload("", Pos2::ZERO),
        Err(CanvasError::Palette(PaletteError::Empty))
    );
    assert!(matches!(
        canvas.drop_payload("noxWidget", Pos2::ZERO),
        Err(CanvasError::Palette(PaletteError::Unknown(_)))
    ));
    assert_eq!(canvas.graph().node_count(), 3);
}

#[test]
fn dropped_block_defaults() {
    let mut canvas = mock_canvas();
    let node = canvas.drop_payload("noxBlock", Pos2::new(1., 2.)).unwrap();
    let node = canvas.graph().node(&node).unwrap();
    let data = node.block_data().unwrap();

    assert!(node.id().as_str().starts_with("node_"));
    assert_eq!(data.visual.icon, "box");
    assert_eq!(data.visual.color, "zinc");
    assert!(!data.status.is_error());
}

#[test]
fn operations_on_missing_elements_fail() {
    let mut canvas = mock_canvas();
    let ghost = id("ghost");
    assert_eq!(
        canvas.node_clicked(&ghost),
        Err(CanvasError::UnknownNode(ghost.clone()))
    );
    assert!(canvas.delete_node(&ghost).is_err());
    assert!(canvas
        .patch_relation(&EdgeId::new("ghost"), &RelationPatch::default())
        .is_err());
    assert!(canvas.delete_relation(&EdgeId::new("ghost")).is_err());
}

#[test]
fn dispatch_emits_events_in_order() {
    let log = Rc::new(EventLog::new());
    let mut canvas = mock_canvas().with_event_sink(Rc::clone(&log));

    canvas.dispatch(Interaction::ToggleConnect);
    canvas.dispatch(Interaction::NodeClicked(id("root-child-0")));
    canvas.dispatch(Interaction::NodeClicked(id("root-child-1")));
    canvas.dispatch(Interaction::NodeDoubleClicked(id("root-child-1")));

    let events = log.take();
    assert!(matches!(events[0], Event::ConnectMode(_)));
    assert!(matches!(events[1], Event::ConnectSource(_)));
    assert!(matches!(events[2], Event::RelationAdded(_)));
    assert!(matches!(events.last(), Some(Event::ViewEnter(p)) if p.depth == 1));
}

#[test]
fn into_repository_writes_back_active_view() {
    let mut canvas = bare_canvas(SnapshotPolicy::WriteBack);
    canvas.add_router(Pos2::ZERO).unwrap();

    let repo = canvas.into_repository();
    assert_eq!(repo.load(&ViewId::root()).unwrap().nodes.len(), 3);
}
