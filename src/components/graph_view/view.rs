//! Graph view controller: composes the render synchronizer, simulation
//! scheduler, drag coordinator and roam controller into render passes and
//! event handlers.
//!
//! # Render pass
//!
//! Every [`GraphView::render`] runs the same fixed sequence: cancel any
//! pending simulation tick, rebuild the layout strategies if the mode changed
//! in place, set the root group transform (snapped on the first
//! render, animated afterwards), compute the node scale, clip edges to node
//! boundaries at that scale, rebind sprites, apply the scale, configure roam,
//! bind drag handlers and focus sets, place labels, and finally restart the
//! force simulation when the layout is force.
//!
//! # Borrowing
//!
//! View state lives behind one `RefCell`. The simulation is always started
//! after that borrow is released, because its first tick runs synchronously
//! and re-enters the state. Hosts and schedulers never call back
//! synchronously.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, info, warn};

use super::coord::{Point, Transform};
use super::drag::{DragEffect, DragSession};
use super::graph::{EdgeId, NodeId};
use super::highlight::{HighlightState, Hovered};
use super::layout::{LayoutMode, LayoutState, node_label_placement};
use super::roam::{RoamAction, RoamController, RoamGesture, RoamState, ViewHost};
use super::scale::{NodeScale, ScaledValues, StyleScale};
use super::scheduler::{FrameScheduler, SimState, SimulationScheduler};
use super::series::{GraphSeries, SeriesHandle};
use super::sync::{DragBinding, EdgeSprite, NodeSprite, RenderSync, RootGroup, SyncStats};
use super::types::{Focus, RoamMode};

/// Edge pick tolerance in screen pixels.
const EDGE_PICK_SCREEN: f64 = 4.0;

/// Borrowed view of what is on screen, for drawing.
pub struct Scene<'a> {
	/// Node and edge sprites.
	pub sync: &'a RenderSync,
	/// Root group transform as currently displayed.
	pub transform: Transform,
	/// Hover emphasis.
	pub highlight: &'a HighlightState,
	/// Current symbol scale.
	pub node_scale: NodeScale,
	/// Stroke and label sizing.
	pub style: &'a StyleScale,
}

struct ViewState {
	series: Option<SeriesHandle>,
	sync: RenderSync,
	group: RootGroup,
	roam: RoamController,
	roam_state: RoamState,
	layout: LayoutState,
	node_scale: NodeScale,
	drag: Option<DragSession>,
	highlight: HighlightState,
	style: StyleScale,
	first_render: bool,
	disposed: bool,
}

impl ViewState {
	fn new(style: StyleScale) -> Self {
		Self {
			series: None,
			sync: RenderSync::default(),
			group: RootGroup::default(),
			roam: RoamController::default(),
			roam_state: RoamState::default(),
			layout: LayoutState::default(),
			node_scale: NodeScale::UNIT,
			drag: None,
			highlight: HighlightState::default(),
			style,
			first_render: true,
			disposed: false,
		}
	}

	/// Node scale for the current zoom and group target scale.
	fn compute_node_scale(&self, series: &GraphSeries) -> NodeScale {
		if series.coord_sys.as_view().is_none() {
			return NodeScale::UNIT;
		}
		NodeScale::compute(
			self.roam_state.zoom,
			self.group.target().scale_x,
			series.options.node_scale_ratio,
		)
	}

	fn set_node_scale(&mut self, scale: NodeScale) {
		self.node_scale = scale;
		self.layout.node_scale = scale.local;
	}

	/// One full render pass. Returns `Some(animated)` when the force
	/// simulation must be (re)started once the borrow is released.
	fn render_pass(&mut self, series: &mut GraphSeries) -> Option<bool> {
		series.reconcile_layout();
		let view = series.coord_sys.as_view().cloned();

		// (a) group transform
		if let Some(view) = &view {
			let t = view.transform();
			if self.first_render {
				self.group.snap(t);
			} else {
				self.group.animate_to(t);
			}
			self.roam_state.zoom = view.zoom();
			self.roam_state.zoom_limit = view.scale_limit;
			self.roam_state.offset = view.offset;
		}

		let scale = self.compute_node_scale(series);
		self.set_node_scale(scale);
		self.layout.cx = series.circle.cx;
		self.layout.cy = series.circle.cy;

		// (b) attachment, (c) data, (d) scale
		series.graph.attach_edges(scale.local);
		self.sync.update_data(&series.graph);
		self.sync.apply_scale(scale.local);

		match (&view, series.options.roam) {
			(Some(_), RoamMode::Off) | (None, _) => self.roam.disable(),
			(Some(_), mode) => self.roam.enable(mode),
		}

		let mode = series.layout_mode();
		if !mode.supports_fixed() {
			series.graph.clear_fixed();
		}

		// (f) drag handlers, (g) focus sets, (h) labels
		let rotate = mode == LayoutMode::Circular && series.options.circular.rotate_label;
		let center = self.layout.center();
		for node in series.graph.nodes() {
			let Some(sprite) = self.sync.node_mut(node.id) else {
				continue;
			};
			sprite.drag = node.draggable.then(|| DragBinding {
				node: node.id,
				cursor: node.cursor.clone(),
			});
			sprite.focus = (node.focus == Focus::Adjacency)
				.then(|| series.graph.adjacent_focus(node.id).clone());
			sprite.label_placement =
				node_label_placement(sprite.position, center, rotate, node.label_rotate);
		}
		for edge in series.graph.edges() {
			if let Some(sprite) = self.sync.edge_mut(edge.id) {
				sprite.focus = (edge.focus == Focus::Adjacency).then(|| series.graph.edge_focus(edge.id));
			}
		}

		self.first_render = false;
		let force = mode == LayoutMode::Force && series.force.is_some();
		self.layout.force_running = force;
		force.then_some(series.options.force.layout_animation)
	}

	/// Layout-only update: attachment, positions, scale and circular labels.
	fn relayout(&mut self, series: &mut GraphSeries) {
		series.graph.attach_edges(self.layout.node_scale);
		self.sync.update_layout(&series.graph);
		self.sync.apply_scale(self.layout.node_scale);
		if series.layout_mode() == LayoutMode::Circular && series.options.circular.rotate_label {
			self.place_labels(series, true);
		}
	}

	fn place_labels(&mut self, series: &GraphSeries, rotate: bool) {
		let center = self.layout.center();
		for node in series.graph.nodes() {
			if let Some(sprite) = self.sync.node_mut(node.id) {
				sprite.label_placement =
					node_label_placement(sprite.position, center, rotate, node.label_rotate);
			}
		}
	}

	/// One simulation tick followed by a re-sync. Returns whether stopped.
	fn step_force(&mut self) -> bool {
		let Some(handle) = self.series.clone() else {
			return true;
		};
		let Ok(mut series) = handle.try_borrow_mut() else {
			warn!("graph-view: series busy, stopping simulation");
			return true;
		};
		let GraphSeries { graph, force, .. } = &mut *series;
		let Some(force) = force.as_mut() else {
			return true;
		};
		let stopped = force.step(graph);
		graph.attach_edges(self.layout.node_scale);
		self.sync.update_layout(graph);
		self.sync.apply_scale(self.layout.node_scale);
		self.layout.force_running = !stopped;
		stopped
	}

	fn series_id(&self) -> Option<String> {
		self.series.as_ref().map(|s| s.borrow().id().to_string())
	}
}

/// Whether a screen point may start a roam gesture: inside the graph's
/// screen bounding box and not on an element the host marks irrelevant.
fn in_scope(sync: &RenderSync, group: &RootGroup, host: &dyn ViewHost, x: f64, y: f64) -> bool {
	let Some(rect) = sync.bounding_rect() else {
		return false;
	};
	rect.transformed(&group.current()).contains(Point::new(x, y)) && !host.is_irrelevant(x, y)
}

/// The graph view controller.
///
/// Created once per mounted view with [`GraphView::init`], re-rendered with
/// [`GraphView::render`] on every data or option change and torn down with
/// [`GraphView::dispose`].
pub struct GraphView {
	state: Rc<RefCell<ViewState>>,
	sim: SimulationScheduler,
	host: Rc<dyn ViewHost>,
}

impl GraphView {
	/// New view with the default style, reporting to `host`.
	pub fn init(host: Rc<dyn ViewHost>, frames: Rc<dyn FrameScheduler>) -> Self {
		Self::with_style(host, frames, StyleScale::default())
	}

	/// New view with a custom style.
	pub fn with_style(host: Rc<dyn ViewHost>, frames: Rc<dyn FrameScheduler>, style: StyleScale) -> Self {
		info!("graph-view: view initialised");
		Self {
			state: Rc::new(RefCell::new(ViewState::new(style))),
			sim: SimulationScheduler::new(frames),
			host,
		}
	}

	/// Full render pass over `series`.
	pub fn render(&self, series: &SeriesHandle) {
		self.sim.cancel();
		let restart = {
			let mut state = self.state.borrow_mut();
			if state.disposed {
				warn!("graph-view: render after dispose ignored");
				return;
			}
			state.series = Some(series.clone());
			let mut s = series.borrow_mut();
			debug!(
				"graph-view: render `{}` ({} nodes, {:?})",
				s.id(),
				s.graph.node_count(),
				s.layout_mode()
			);
			state.render_pass(&mut s)
		};
		if let Some(animated) = restart {
			self.start_simulation(animated);
		}
	}

	/// Layout-only update of the current series.
	pub fn update_layout(&self) {
		let mut state = self.state.borrow_mut();
		let Some(handle) = state.series.clone() else {
			return;
		};
		let mut series = handle.borrow_mut();
		state.relayout(&mut series);
	}

	/// Cancel pending ticks and release every drawable and handler.
	pub fn dispose(&self) {
		self.sim.cancel();
		let mut state = self.state.borrow_mut();
		state.sync.remove();
		state.roam.disable();
		state.drag = None;
		state.series = None;
		state.layout.force_running = false;
		state.disposed = true;
		info!("graph-view: view disposed");
	}

	fn start_simulation(&self, animated: bool) {
		let weak: Weak<RefCell<ViewState>> = Rc::downgrade(&self.state);
		let step: Rc<dyn Fn() -> bool> = Rc::new(move || {
			let Some(state) = weak.upgrade() else {
				return true;
			};
			let Ok(mut state) = state.try_borrow_mut() else {
				warn!("graph-view: view busy, stopping simulation");
				return true;
			};
			state.step_force()
		});
		self.sim.start(animated, step);
	}

	/// Topmost node under a screen point.
	pub fn node_at(&self, screen: Point) -> Option<NodeId> {
		let state = self.state.borrow();
		let local = state.group.screen_to_local(screen);
		let scaled = ScaledValues::new(&state.style, state.group.current().scale_x);
		state
			.sync
			.node_at(local, |s| scaled.hit_radius(&state.style, s.radius()))
	}

	/// Topmost edge under a screen point.
	pub fn edge_at(&self, screen: Point) -> Option<EdgeId> {
		let state = self.state.borrow();
		let t = state.group.current();
		let k = if t.scale_x > 0.0 { t.scale_x } else { 1.0 };
		state.sync.edge_at(t.invert(screen), EDGE_PICK_SCREEN / k)
	}

	/// Begin dragging `node` if it carries a drag binding.
	pub fn drag_start(&self, node: NodeId, screen: Point) -> bool {
		let mut state = self.state.borrow_mut();
		let Some(binding) = state.sync.node(node).and_then(|s| s.drag.clone()) else {
			return false;
		};
		let Some(handle) = state.series.clone() else {
			return false;
		};
		let series = handle.borrow();
		let Some(start) = series.graph.layout(binding.node) else {
			return false;
		};
		state.drag = Some(DragSession::begin(binding.node, series.layout_mode(), screen, start));
		true
	}

	/// Move the dragged node to follow the pointer.
	pub fn drag_move(&self, screen: Point) -> Option<DragEffect> {
		let (effect, animated) = {
			let mut state = self.state.borrow_mut();
			let session = state.drag.clone()?;
			let handle = state.series.clone()?;
			let mut series = handle.borrow_mut();
			let t = state.group.current();
			let pointer = session.pointer(screen, t.scale_x, t.scale_y);
			let effect = session.drag_move(&mut series, pointer);
			state.relayout(&mut series);
			(effect, series.options.force.layout_animation)
		};
		if effect == DragEffect::EnsureSimulation && !self.sim.is_running() {
			self.start_simulation(animated);
		}
		Some(effect)
	}

	/// Finish the current drag, releasing anchors the layout mode does not keep.
	pub fn drag_end(&self) {
		let mut state = self.state.borrow_mut();
		let Some(session) = state.drag.take() else {
			return;
		};
		if let Some(handle) = state.series.clone() {
			session.end(&mut handle.borrow_mut());
		}
	}

	/// Whether a drag is in progress.
	pub fn is_dragging(&self) -> bool {
		self.state.borrow().drag.is_some()
	}

	/// Start a pan at `screen` if roam allows it there.
	pub fn roam_pointer_down(&self, screen: Point) -> bool {
		let mut state = self.state.borrow_mut();
		let ViewState { roam, sync, group, .. } = &mut *state;
		let host = self.host.as_ref();
		roam.pointer_down(screen.x, screen.y, |x, y| in_scope(sync, group, host, x, y))
	}

	/// Continue a pan.
	pub fn roam_pointer_move(&self, screen: Point) {
		let gesture = self.state.borrow_mut().roam.pointer_move(screen.x, screen.y);
		if let Some(gesture) = gesture {
			self.apply_gesture(gesture);
		}
	}

	/// End a pan.
	pub fn roam_pointer_up(&self) {
		self.state.borrow_mut().roam.pointer_up();
	}

	/// Whether a pan is in progress.
	pub fn is_panning(&self) -> bool {
		self.state.borrow().roam.is_panning()
	}

	/// One wheel notch at `screen`.
	pub fn roam_wheel(&self, delta_y: f64, screen: Point) {
		let gesture = {
			let state = self.state.borrow();
			let host = self.host.as_ref();
			state.roam.wheel(delta_y, screen.x, screen.y, |x, y| {
				in_scope(&state.sync, &state.group, host, x, y)
			})
		};
		if let Some(gesture) = gesture {
			self.apply_gesture(gesture);
		}
	}

	/// React to a recognised roam gesture.
	///
	/// Pan moves the group and asks the host to re-render. Zoom rescales nodes
	/// and edges in place and only asks for a label refresh.
	pub fn apply_gesture(&self, gesture: RoamGesture) {
		let mut state = self.state.borrow_mut();
		let Some(series_id) = state.series_id() else {
			return;
		};
		match gesture {
			RoamGesture::Pan { dx, dy, .. } => {
				let mut roam_state = state.roam_state;
				state.group.modify(|t| roam_state.apply_pan(t, dx, dy));
				state.roam_state = roam_state;
				debug!("graph-view: pan ({:.1}, {:.1})", dx, dy);
				self.host.dispatch_action(RoamAction::pan(&series_id, dx, dy));
			}
			RoamGesture::Zoom {
				scale,
				origin_x,
				origin_y,
			} => {
				let mut roam_state = state.roam_state;
				state
					.group
					.modify(|t| roam_state.apply_zoom(t, scale, Point::new(origin_x, origin_y)));
				state.roam_state = roam_state;
				debug!("graph-view: zoom x{:.3} to {:.3}", scale, roam_state.zoom);
				self.host
					.dispatch_action(RoamAction::zoom(&series_id, scale, origin_x, origin_y));

				if let Some(handle) = state.series.clone() {
					let mut series = handle.borrow_mut();
					let node_scale = state.compute_node_scale(&series);
					state.set_node_scale(node_scale);
					state.relayout(&mut series);
				}
				self.host.update_label_layout();
			}
		}
	}

	/// Update hover emphasis for the pointer at `screen`.
	pub fn hover(&self, screen: Point) -> Option<Hovered> {
		let hovered = self
			.node_at(screen)
			.map(Hovered::Node)
			.or_else(|| self.edge_at(screen).map(Hovered::Edge));
		let mut state = self.state.borrow_mut();
		let state = &mut *state;
		let focus = match hovered {
			Some(Hovered::Node(id)) => state.sync.node(id).and_then(|s| s.focus.as_ref()),
			Some(Hovered::Edge(id)) => state.sync.edge(id).and_then(|s| s.focus.as_ref()),
			None => None,
		};
		state.highlight.set_hover(hovered, focus);
		hovered
	}

	/// Drop hover emphasis.
	pub fn clear_hover(&self) {
		self.state.borrow_mut().highlight.set_hover(None, None);
	}

	/// Advance the group tween by `dt_ms` and highlight smoothing. Returns
	/// whether anything is still animating.
	pub fn advance(&self, dt_ms: f64) -> bool {
		let mut state = self.state.borrow_mut();
		state.highlight.tick(dt_ms / 1000.0);
		let group = state.group.advance(dt_ms);
		group || state.highlight.is_animating()
	}

	/// Run `f` with everything the renderer needs.
	pub fn with_scene<R>(&self, f: impl FnOnce(&Scene<'_>) -> R) -> R {
		let state = self.state.borrow();
		f(&Scene {
			sync: &state.sync,
			transform: state.group.current(),
			highlight: &state.highlight,
			node_scale: state.node_scale,
			style: &state.style,
		})
	}

	/// Copy of a node sprite.
	pub fn node_sprite(&self, id: NodeId) -> Option<NodeSprite> {
		self.state.borrow().sync.node(id).cloned()
	}

	/// Copy of an edge sprite.
	pub fn edge_sprite(&self, id: EdgeId) -> Option<EdgeSprite> {
		self.state.borrow().sync.edge(id).cloned()
	}

	/// Sprite update counters.
	pub fn sync_stats(&self) -> SyncStats {
		self.state.borrow().sync.stats()
	}

	/// Current symbol scale.
	pub fn node_scale(&self) -> NodeScale {
		self.state.borrow().node_scale
	}

	/// Roam applied by the view.
	pub fn roam_state(&self) -> RoamState {
		self.state.borrow().roam_state
	}

	/// Enabled roam mode, `None` when roam is off.
	pub fn roam_mode(&self) -> Option<RoamMode> {
		self.state.borrow().roam.mode()
	}

	/// State of the simulation loop.
	pub fn simulation_state(&self) -> SimState {
		self.sim.state()
	}

	/// Simulation ticks run so far.
	pub fn simulation_ticks(&self) -> u64 {
		self.sim.ticks()
	}

	/// Displayed root group transform.
	pub fn group_transform(&self) -> Transform {
		self.state.borrow().group.current()
	}

	/// Transform the group is tweening towards.
	pub fn group_target(&self) -> Transform {
		self.state.borrow().group.target()
	}

	/// Whether the group transform is still tweening.
	pub fn is_group_animating(&self) -> bool {
		self.state.borrow().group.is_animating()
	}
}
