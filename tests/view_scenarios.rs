//! Headless scenarios for the graph view controller.
//!
//! Each test drives a [`GraphView`] through a [`ManualScheduler`] and a
//! recording host, so simulation ticks run only when the test asks for them.

// Test target reuses lib deps, silence noisy lint.
#![allow(unused_crate_dependencies)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use graph_view::components::graph_view::coord::{CoordSys, Point, Rect};
use graph_view::components::graph_view::drag::DragEffect;
use graph_view::components::graph_view::graph::{EdgeId, Graph, NodeId};
use graph_view::components::graph_view::highlight::Hovered;
use graph_view::components::graph_view::layout::{ForceStepper, LabelSide, LayoutMode};
use graph_view::components::graph_view::roam::{RoamAction, RoamGesture};
use graph_view::components::graph_view::scheduler::SimState;
use graph_view::components::graph_view::series::{GraphSeries, SeriesHandle};
use graph_view::components::graph_view::{
	Focus, GraphData, GraphLink, GraphNode, GraphView, ManualScheduler, RoamMode, ViewHost,
};

#[derive(Default)]
struct RecordingHost {
	actions: RefCell<Vec<RoamAction>>,
	label_refreshes: Cell<usize>,
}

impl ViewHost for RecordingHost {
	fn dispatch_action(&self, action: RoamAction) {
		self.actions.borrow_mut().push(action);
	}

	fn update_label_layout(&self) {
		self.label_refreshes.set(self.label_refreshes.get() + 1);
	}
}

/// Force stepper that logs every call and converges after a few steps.
struct Recorder {
	log: Rc<RefCell<Vec<String>>>,
	steps_left: usize,
}

const RECORDER_STEPS: usize = 5;

impl ForceStepper for Recorder {
	fn step(&mut self, graph: &mut Graph) -> bool {
		self.log.borrow_mut().push("step".into());
		graph.route_edges();
		self.steps_left = self.steps_left.saturating_sub(1);
		self.steps_left == 0
	}

	fn warm_up(&mut self) {
		self.log.borrow_mut().push("warm_up".into());
		self.steps_left = RECORDER_STEPS;
	}

	fn set_fixed(&mut self, node: NodeId) {
		self.log.borrow_mut().push(format!("fix {}", node.0));
	}

	fn set_unfixed(&mut self, node: NodeId) {
		self.log.borrow_mut().push(format!("unfix {}", node.0));
	}
}

struct Harness {
	view: GraphView,
	host: Rc<RecordingHost>,
	frames: Rc<ManualScheduler>,
}

fn harness() -> Harness {
	let host = Rc::new(RecordingHost::default());
	let frames = Rc::new(ManualScheduler::new());
	let view = GraphView::init(host.clone(), frames.clone());
	Harness { view, host, frames }
}

fn node(id: &str, x: f64, y: f64) -> GraphNode {
	GraphNode {
		id: id.into(),
		x: Some(x),
		y: Some(y),
		..Default::default()
	}
}

fn link(source: &str, target: &str) -> GraphLink {
	GraphLink {
		source: source.into(),
		target: target.into(),
		focus: None,
	}
}

/// a(0,0), b(100,0), c(0,100) with edges a-b, b-c, c-a.
fn triangle(layout: LayoutMode) -> GraphData {
	let mut data = GraphData {
		nodes: vec![node("a", 0.0, 0.0), node("b", 100.0, 0.0), node("c", 0.0, 100.0)],
		links: vec![link("a", "b"), link("b", "c"), link("c", "a")],
		..Default::default()
	};
	data.options.layout = layout;
	data
}

/// 200x200 viewport: the triangle's 100x100 extent is drawn at scale 2.
fn viewport() -> Rect {
	Rect::new(0.0, 0.0, 200.0, 200.0)
}

fn series(data: &GraphData) -> SeriesHandle {
	GraphSeries::from_data(data, viewport()).unwrap().into_handle()
}

fn recorded_force_series(log: &Rc<RefCell<Vec<String>>>) -> SeriesHandle {
	GraphSeries::from_data(&triangle(LayoutMode::Force), viewport())
		.unwrap()
		.with_force_stepper(Box::new(Recorder {
			log: log.clone(),
			steps_left: RECORDER_STEPS,
		}))
		.into_handle()
}

fn approx(a: f64, b: f64) -> bool {
	(a - b).abs() < 1e-9
}

#[test]
fn rendering_twice_reuses_every_sprite() {
	let h = harness();
	let s = series(&triangle(LayoutMode::None));
	h.view.render(&s);
	let nodes: Vec<_> = (0..3).map(|i| h.view.node_sprite(NodeId(i))).collect();
	let edges: Vec<_> = (0..3).map(|i| h.view.edge_sprite(EdgeId(i))).collect();

	h.view.render(&s);
	for i in 0..3 {
		assert_eq!(h.view.node_sprite(NodeId(i)), nodes[i]);
		assert_eq!(h.view.edge_sprite(EdgeId(i)), edges[i]);
	}
	assert_eq!(h.view.sync_stats().rebinds, 2);
	assert!(!h.view.is_group_animating());
}

#[test]
fn first_render_snaps_and_later_renders_animate() {
	let h = harness();
	let s = series(&triangle(LayoutMode::None));
	h.view.render(&s);
	let initial = h.view.group_transform();
	assert!(approx(initial.scale_x, 2.0));
	assert!(!h.view.is_group_animating());

	assert!(s.borrow_mut().apply_roam(&RoamAction::pan("graph", 30.0, 0.0)));
	h.view.render(&s);
	assert!(h.view.is_group_animating());
	assert_eq!(h.view.group_transform(), initial);
	assert!(approx(h.view.group_target().x, initial.x + 30.0));

	h.view.advance(150.0);
	let midway = h.view.group_transform().x;
	assert!(midway > initial.x && midway < initial.x + 30.0);
	h.view.advance(200.0);
	assert!(!h.view.is_group_animating());
	assert_eq!(h.view.group_transform(), h.view.group_target());
}

#[test]
fn edges_attach_to_symbol_boundaries() {
	let h = harness();
	let s = series(&triangle(LayoutMode::None));
	h.view.render(&s);

	let check = |view: &GraphView| {
		let a = view.node_sprite(NodeId(0)).unwrap();
		let edge = view.edge_sprite(EdgeId(0)).unwrap();
		let r = a.symbol_size / 2.0 * view.node_scale().local;
		assert!(approx(edge.from.distance(a.position), r));
		assert!(approx(a.radius(), r));
	};
	check(&h.view);
	h.view.apply_gesture(RoamGesture::Zoom {
		scale: 3.0,
		origin_x: 100.0,
		origin_y: 100.0,
	});
	check(&h.view);
}

#[test]
fn node_scale_grows_with_zoom() {
	let h = harness();
	let s = series(&triangle(LayoutMode::None));
	h.view.render(&s);

	let mut last = h.view.node_scale().visual;
	for _ in 0..5 {
		h.view.apply_gesture(RoamGesture::Zoom {
			scale: 1.5,
			origin_x: 100.0,
			origin_y: 100.0,
		});
		let visual = h.view.node_scale().visual;
		assert!(visual > last);
		last = visual;
	}
	h.view.apply_gesture(RoamGesture::Zoom {
		scale: 0.5,
		origin_x: 100.0,
		origin_y: 100.0,
	});
	assert!(h.view.node_scale().visual < last);
}

#[test]
fn zoom_rescales_in_place_and_refreshes_labels_once() {
	let h = harness();
	let mut data = GraphData {
		nodes: vec![node("a", 0.0, 0.0), node("b", 100.0, 0.0)],
		links: vec![link("a", "b")],
		..Default::default()
	};
	data.options.layout = LayoutMode::None;
	data.options.node_scale_ratio = 1.0;
	let s = series(&data);
	h.view.render(&s);
	let before = h.view.node_scale();
	let stats = h.view.sync_stats();
	assert!(approx(before.visual, 1.0));

	h.view.apply_gesture(RoamGesture::Zoom {
		scale: 2.0,
		origin_x: 0.0,
		origin_y: 0.0,
	});

	let after = h.view.node_scale();
	assert!(approx(after.visual, 2.0 * before.visual));
	// the group zoom already doubles symbols on screen
	assert!(approx(after.local, before.local));
	assert_eq!(h.host.label_refreshes.get(), 1);
	assert_eq!(h.view.sync_stats().rebinds, stats.rebinds);
	assert_eq!(h.view.roam_state().zoom, 2.0);

	let actions = h.host.actions.borrow();
	assert_eq!(actions.len(), 1);
	assert_eq!(actions[0].zoom, Some(2.0));
	assert!(!actions[0].is_pan());
}

#[test]
fn zoom_respects_the_scale_limit() {
	let h = harness();
	let mut data = triangle(LayoutMode::None);
	data.options.scale_limit.max = Some(1.5);
	let s = series(&data);
	h.view.render(&s);

	h.view.apply_gesture(RoamGesture::Zoom {
		scale: 4.0,
		origin_x: 0.0,
		origin_y: 0.0,
	});
	assert_eq!(h.view.roam_state().zoom, 1.5);
	assert!(approx(h.view.group_transform().scale_x, 3.0));
}

#[test]
fn pan_dispatches_an_intent_and_rerender_settles() {
	let h = harness();
	let s = series(&triangle(LayoutMode::None));
	h.view.render(&s);
	let start = h.view.group_transform();

	assert!(h.view.roam_pointer_down(Point::new(50.0, 50.0)));
	h.view.roam_pointer_move(Point::new(60.0, 55.0));
	h.view.roam_pointer_up();
	assert!(!h.view.is_panning());
	assert!(approx(h.view.group_transform().x, start.x + 10.0));
	assert_eq!(h.view.roam_state().offset, Point::new(10.0, 5.0));
	assert_eq!(h.host.label_refreshes.get(), 0);

	let action = h.host.actions.borrow()[0].clone();
	assert_eq!(action, RoamAction::pan("graph", 10.0, 5.0));
	assert_eq!(action.kind, "graphRoam");

	// The host applies the intent to the coordinate system and re-renders.
	assert!(s.borrow_mut().apply_roam(&action));
	h.view.render(&s);
	assert!(!h.view.is_group_animating());
	assert!(approx(h.view.group_transform().y, start.y + 5.0));
	// the coordinate system agrees with what the view applied ahead of it
	assert_eq!(h.view.roam_state().offset, Point::new(10.0, 5.0));
}

#[test]
fn wheel_outside_the_graph_is_ignored() {
	let h = harness();
	let s = series(&triangle(LayoutMode::None));
	h.view.render(&s);

	h.view.roam_wheel(120.0, Point::new(500.0, 500.0));
	assert!(h.host.actions.borrow().is_empty());

	h.view.roam_wheel(-120.0, Point::new(100.0, 100.0));
	assert_eq!(h.host.actions.borrow().len(), 1);
	assert!(h.view.roam_state().zoom > 1.0);
	assert_eq!(h.host.label_refreshes.get(), 1);
}

#[test]
fn roam_follows_the_coordinate_system_and_mode() {
	let h = harness();
	let s = series(&triangle(LayoutMode::None));
	h.view.render(&s);
	assert_eq!(h.view.roam_mode(), Some(RoamMode::Both));

	s.borrow_mut().options.roam = RoamMode::Off;
	h.view.render(&s);
	assert_eq!(h.view.roam_mode(), None);
	assert!(!h.view.roam_pointer_down(Point::new(50.0, 50.0)));

	let other = GraphSeries::from_data(&triangle(LayoutMode::None), viewport())
		.unwrap()
		.with_coord_sys(CoordSys::Other)
		.into_handle();
	let h = harness();
	h.view.render(&other);
	assert_eq!(h.view.roam_mode(), None);
	assert!(approx(h.view.node_scale().visual, 1.0));
	assert!(approx(h.view.node_scale().local, 1.0));
}

#[test]
fn manual_drag_moves_only_the_node_and_its_edges() {
	let h = harness();
	let s = series(&triangle(LayoutMode::None));
	h.view.render(&s);
	let untouched = h.view.edge_sprite(EdgeId(1));
	let ab = h.view.edge_sprite(EdgeId(0)).unwrap();
	let ca = h.view.edge_sprite(EdgeId(2)).unwrap();

	// node a sits at the screen origin at scale 2
	assert_eq!(h.view.node_at(Point::new(0.0, 0.0)), Some(NodeId(0)));
	assert!(h.view.drag_start(NodeId(0), Point::new(0.0, 0.0)));
	assert_eq!(h.view.drag_move(Point::new(100.0, 100.0)), Some(DragEffect::RelayoutOnly));

	assert_eq!(h.view.node_sprite(NodeId(0)).unwrap().position, Point::new(50.0, 50.0));
	assert_ne!(h.view.edge_sprite(EdgeId(0)).unwrap().from, ab.from);
	assert_ne!(h.view.edge_sprite(EdgeId(2)).unwrap().to, ca.to);
	assert_eq!(h.view.edge_sprite(EdgeId(1)), untouched);

	h.view.drag_end();
	assert!(!h.view.is_dragging());
	assert_eq!(h.frames.pending(), 0);
	assert_eq!(h.view.simulation_state(), SimState::Idle);
	assert_eq!(h.view.simulation_ticks(), 0);
	assert!(!s.borrow().graph.node(NodeId(0)).fixed);
}

#[test]
fn undraggable_nodes_refuse_drags() {
	let h = harness();
	let mut data = triangle(LayoutMode::None);
	data.nodes[1].draggable = Some(false);
	let s = series(&data);
	h.view.render(&s);
	assert!(h.view.node_sprite(NodeId(1)).unwrap().drag.is_none());
	assert!(!h.view.drag_start(NodeId(1), Point::new(200.0, 0.0)));
	assert_eq!(h.view.drag_move(Point::new(210.0, 0.0)), None);
}

#[test]
fn force_drag_pins_before_the_next_step_and_releases_once() {
	let h = harness();
	let log = Rc::new(RefCell::new(Vec::new()));
	let s = recorded_force_series(&log);
	h.view.render(&s);
	// first tick runs immediately, the next one waits a frame
	assert_eq!(*log.borrow(), vec!["step"]);
	assert_eq!(h.frames.pending(), 1);
	assert_eq!(h.view.simulation_state(), SimState::Stepping);

	let start = h.view.node_sprite(NodeId(0)).unwrap().position;
	let screen = h.view.group_transform().apply(start);
	assert!(h.view.drag_start(NodeId(0), screen));
	assert_eq!(
		h.view.drag_move(Point::new(screen.x + 10.0, screen.y)),
		Some(DragEffect::EnsureSimulation)
	);
	assert_eq!(*log.borrow(), vec!["step", "warm_up", "fix 0"]);
	assert!(s.borrow().graph.node(NodeId(0)).fixed);
	// the running loop was kept, not restarted
	assert_eq!(h.frames.pending(), 1);

	assert!(h.frames.run_next());
	assert_eq!(log.borrow().last().map(String::as_str), Some("step"));

	h.view.drag_end();
	assert!(!s.borrow().graph.node(NodeId(0)).fixed);
	h.view.drag_end();

	h.frames.run_until_idle(100);
	assert_eq!(h.view.simulation_state(), SimState::Idle);
	let unfixes = log.borrow().iter().filter(|e| e.starts_with("unfix")).count();
	assert_eq!(unfixes, 1);
}

#[test]
fn force_drag_restarts_a_converged_simulation() {
	let h = harness();
	let log = Rc::new(RefCell::new(Vec::new()));
	let s = recorded_force_series(&log);
	h.view.render(&s);
	h.frames.run_until_idle(100);
	assert_eq!(h.view.simulation_state(), SimState::Idle);
	log.borrow_mut().clear();

	let screen = h
		.view
		.group_transform()
		.apply(h.view.node_sprite(NodeId(1)).unwrap().position);
	assert!(h.view.drag_start(NodeId(1), screen));
	h.view.drag_move(Point::new(screen.x, screen.y + 5.0));
	assert_eq!(*log.borrow(), vec!["warm_up", "fix 1", "step"]);
	assert_eq!(h.view.simulation_state(), SimState::Stepping);

	h.view.drag_end();
	h.frames.run_until_idle(100);
	assert_eq!(h.view.simulation_state(), SimState::Idle);
	assert_eq!(log.borrow().iter().filter(|e| *e == "step").count(), RECORDER_STEPS);
}

#[test]
fn renders_keep_a_single_simulation_loop() {
	let h = harness();
	let log = Rc::new(RefCell::new(Vec::new()));
	let s = recorded_force_series(&log);
	h.view.render(&s);
	h.view.render(&s);
	h.view.render(&s);
	assert_eq!(h.frames.pending(), 1);
	assert_eq!(h.view.simulation_ticks(), 3);

	h.frames.run_next();
	assert_eq!(h.frames.pending(), 1);
}

#[test]
fn dispose_stops_every_tick() {
	let h = harness();
	let log = Rc::new(RefCell::new(Vec::new()));
	let s = recorded_force_series(&log);
	h.view.render(&s);
	let ticks = h.view.simulation_ticks();

	h.view.dispose();
	assert_eq!(h.frames.pending(), 0);
	assert_eq!(h.frames.run_until_idle(100), 0);
	assert_eq!(h.view.simulation_ticks(), ticks);
	assert_eq!(h.view.simulation_state(), SimState::Idle);
	assert_eq!(h.view.node_sprite(NodeId(0)), None);

	// later renders are ignored
	h.view.render(&s);
	assert_eq!(h.frames.pending(), 0);
	assert_eq!(h.view.node_sprite(NodeId(0)), None);
}

#[test]
fn fixed_flags_only_survive_in_layouts_that_support_them() {
	let h = harness();
	let mut data = triangle(LayoutMode::Circular);
	for n in &mut data.nodes {
		n.fixed = true;
	}
	let s = series(&data);
	h.view.render(&s);
	assert!(s.borrow().graph.nodes().iter().all(|n| n.fixed));

	s.borrow_mut().options.layout = LayoutMode::None;
	h.view.render(&s);
	assert!(s.borrow().graph.nodes().iter().all(|n| !n.fixed));
	assert_eq!(h.view.simulation_state(), SimState::Idle);
}

#[test]
fn adjacency_focus_covers_neighbours_and_incident_edges() {
	let h = harness();
	let mut data = GraphData {
		nodes: vec![
			node("hub", 0.0, 0.0),
			node("a", 100.0, 0.0),
			node("b", 0.0, 100.0),
			node("lone", 100.0, 100.0),
		],
		links: vec![link("hub", "a"), link("hub", "b")],
		..Default::default()
	};
	data.options.layout = LayoutMode::None;
	data.nodes[0].focus = Some(Focus::Adjacency);
	let s = series(&data);
	h.view.render(&s);

	let focus = h.view.node_sprite(NodeId(0)).unwrap().focus.unwrap();
	assert_eq!(focus.nodes, vec![NodeId(0), NodeId(1), NodeId(2)]);
	assert_eq!(focus.edges, vec![EdgeId(0), EdgeId(1)]);
	assert!(h.view.node_sprite(NodeId(1)).unwrap().focus.is_none());

	assert_eq!(h.view.hover(Point::new(0.0, 0.0)), Some(Hovered::Node(NodeId(0))));
	let (nodes, edges) = h.view.with_scene(|scene| {
		(scene.highlight.target_nodes().count(), scene.highlight.target_edges().count())
	});
	assert_eq!((nodes, edges), (3, 2));

	h.view.advance(1000.0);
	h.view.with_scene(|scene| {
		assert!(scene.highlight.node_intensity(NodeId(2)) > 0.9);
		assert_eq!(scene.highlight.node_intensity(NodeId(3)), 0.0);
	});
}

#[test]
fn invalid_documents_are_rejected() {
	let mut data = triangle(LayoutMode::None);
	data.links.push(link("a", "ghost"));
	assert!(GraphSeries::from_data(&data, viewport()).is_err());
}

#[test]
fn switching_to_force_in_place_starts_the_simulation() {
	let h = harness();
	let s = series(&triangle(LayoutMode::None));
	h.view.render(&s);
	assert!(s.borrow().force.is_none());
	assert_eq!(h.view.simulation_state(), SimState::Idle);

	s.borrow_mut().options.layout = LayoutMode::Force;
	h.view.render(&s);
	assert!(s.borrow().force.is_some());
	assert_eq!(h.view.simulation_state(), SimState::Stepping);
	assert_eq!(h.frames.pending(), 1);

	let screen = h
		.view
		.group_transform()
		.apply(h.view.node_sprite(NodeId(0)).unwrap().position);
	assert!(h.view.drag_start(NodeId(0), screen));
	assert_eq!(
		h.view.drag_move(Point::new(screen.x + 5.0, screen.y)),
		Some(DragEffect::EnsureSimulation)
	);
	assert!(s.borrow().graph.node(NodeId(0)).fixed);
	h.view.drag_end();
	assert!(!s.borrow().graph.node(NodeId(0)).fixed);
}

#[test]
fn switching_back_to_none_drops_the_solver() {
	let h = harness();
	let s = series(&triangle(LayoutMode::Force));
	h.view.render(&s);
	assert_eq!(h.view.simulation_state(), SimState::Stepping);

	s.borrow_mut().options.layout = LayoutMode::None;
	h.view.render(&s);
	assert!(s.borrow().force.is_none());
	assert_eq!(h.view.simulation_state(), SimState::Idle);
	assert_eq!(h.frames.pending(), 0);
	assert_eq!(h.frames.run_until_idle(10), 0);
}

/// Unit vector a label reads along.
fn label_direction(rotation: f64) -> Point {
	Point::new((-rotation).cos(), (-rotation).sin())
}

#[test]
fn circular_labels_face_away_from_the_center() {
	let h = harness();
	let mut data = triangle(LayoutMode::Circular);
	data.options.circular.rotate_label = true;
	let s = series(&data);
	h.view.render(&s);
	let circle = s.borrow().circle;
	let center = circle.center();

	for i in 0..3 {
		let sprite = h.view.node_sprite(NodeId(i)).unwrap();
		assert!(approx(sprite.position.distance(center), circle.r));
		let out = Point::new(
			(sprite.position.x - center.x) / circle.r,
			(sprite.position.y - center.y) / circle.r,
		);
		let dir = label_direction(sprite.label_placement.rotation);
		if sprite.position.x < center.x {
			assert_eq!(sprite.label_placement.side, LabelSide::Left);
			assert!(approx(dir.x, -out.x) && approx(dir.y, -out.y));
		} else {
			assert_eq!(sprite.label_placement.side, LabelSide::Right);
			assert!(approx(dir.x, out.x) && approx(dir.y, out.y));
		}
	}
}

#[test]
fn circular_drag_projects_pins_and_turns_the_label() {
	let h = harness();
	let mut data = triangle(LayoutMode::Circular);
	data.options.circular.rotate_label = true;
	let s = series(&data);
	h.view.render(&s);
	let circle = s.borrow().circle;
	let center = circle.center();
	let rebinds = h.view.sync_stats().rebinds;
	let before = h.view.node_sprite(NodeId(0)).unwrap();
	assert!(!approx(before.label_placement.rotation, 0.0));

	let screen = h.view.group_transform().apply(before.position);
	assert!(h.view.drag_start(NodeId(0), screen));
	// straight to the right of the center, well inside the circle
	let target = h
		.view
		.group_transform()
		.apply(Point::new(center.x + 30.0, center.y));
	assert_eq!(h.view.drag_move(target), Some(DragEffect::RelayoutOnly));

	let dragged = h.view.node_sprite(NodeId(0)).unwrap();
	assert!(approx(dragged.position.x, center.x + circle.r));
	assert!(approx(dragged.position.y, center.y));
	assert!(s.borrow().graph.node(NodeId(0)).fixed);
	assert_eq!(dragged.label_placement.side, LabelSide::Right);
	assert!(approx(dragged.label_placement.rotation, 0.0));
	for i in 1..3 {
		let other = h.view.node_sprite(NodeId(i)).unwrap();
		assert!(approx(other.position.distance(center), circle.r));
	}
	assert_eq!(h.view.sync_stats().rebinds, rebinds);

	h.view.drag_end();
	assert!(s.borrow().graph.node(NodeId(0)).fixed);
	assert_eq!(h.frames.pending(), 0);
	assert_eq!(h.view.simulation_state(), SimState::Idle);
}

#[test]
fn circular_pin_is_dropped_when_the_drag_ends_in_none_mode() {
	let h = harness();
	let s = series(&triangle(LayoutMode::Circular));
	h.view.render(&s);
	let circle = s.borrow().circle;
	let screen = h
		.view
		.group_transform()
		.apply(h.view.node_sprite(NodeId(1)).unwrap().position);
	assert!(h.view.drag_start(NodeId(1), screen));
	let target = h
		.view
		.group_transform()
		.apply(Point::new(circle.cx, circle.cy - 20.0));
	h.view.drag_move(target);
	assert!(s.borrow().graph.node(NodeId(1)).fixed);

	s.borrow_mut().options.layout = LayoutMode::None;
	h.view.drag_end();
	assert!(!s.borrow().graph.node(NodeId(1)).fixed);
}
