//! The graph series model: data store, options, coordinate system and the
//! layout strategies for the active mode.
//!
//! A series is shared between the host, which builds it and applies roam
//! intents to its coordinate system, and the view, which renders it.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use super::circular::CircularLayout;
use super::coord::{CoordSys, Point, Rect, View};
use super::force::ForceLayout;
use super::graph::{Graph, GraphError};
use super::layout::{CircleFrame, CircularPositioner, ForceStepper, LayoutMode};
use super::roam::RoamAction;
use super::types::{GraphData, SeriesOptions};

/// Shared handle to a series.
pub type SeriesHandle = Rc<RefCell<GraphSeries>>;

/// Graph plus everything needed to lay it out and render it.
pub struct GraphSeries {
	/// Nodes, edges and layout positions.
	pub graph: Graph,
	/// Options from the input document.
	pub options: SeriesOptions,
	/// Coordinate system the series is drawn in.
	pub coord_sys: CoordSys,
	/// Screen area the series is laid out in.
	pub viewport: Rect,
	/// Circular arrangement frame; its center doubles as `(cx, cy)`.
	pub circle: CircleFrame,
	/// Present exactly when the active layout is force.
	pub force: Option<Box<dyn ForceStepper>>,
	/// Positioner used by the circular layout and circular drags.
	pub circular: Box<dyn CircularPositioner>,
	/// Mode the strategies above were last set up for.
	active: LayoutMode,
}

impl GraphSeries {
	/// Build the store and run the initial layout for the configured mode
	/// inside `viewport` (screen space).
	pub fn from_data(data: &GraphData, viewport: Rect) -> Result<Self, GraphError> {
		let mut graph = Graph::from_data(data)?;
		let options = data.options.clone();
		let circle = CircleFrame::inscribed(viewport);
		let circular: Box<dyn CircularPositioner> = Box::new(CircularLayout);
		let mut force: Option<Box<dyn ForceStepper>> = None;

		let data_rect = match options.layout {
			LayoutMode::None => {
				graph.clear_fixed();
				graph.route_edges();
				Rect::from_points(graph.nodes().iter().filter_map(|n| n.layout)).unwrap_or(viewport)
			}
			LayoutMode::Circular => {
				circular.layout(&mut graph, &circle, options.circular.basis, None);
				viewport
			}
			LayoutMode::Force => {
				force = Some(Box::new(ForceLayout::new(&mut graph, &options.force, viewport)));
				viewport
			}
		};

		let mut view = View::new(viewport, data_rect);
		view.scale_limit = options.scale_limit;
		view.zoom = options.scale_limit.clamp(options.zoom);
		debug!(
			"graph-view: series `{}` built with {} nodes, {:?} layout",
			options.id,
			graph.node_count(),
			options.layout
		);

		Ok(Self {
			graph,
			active: options.layout,
			options,
			coord_sys: CoordSys::View(view),
			viewport,
			circle,
			force,
			circular,
		})
	}

	/// A series with no nodes, shown when the input cannot be used.
	pub fn empty(viewport: Rect) -> Self {
		let options = SeriesOptions::default();
		Self {
			graph: Graph::default(),
			active: options.layout,
			options,
			coord_sys: CoordSys::View(View::new(viewport, viewport)),
			viewport,
			circle: CircleFrame::inscribed(viewport),
			force: None,
			circular: Box::new(CircularLayout),
		}
	}

	/// Bring the layout strategies in line with `options.layout` after an
	/// in-place mode change. Returns whether anything was rebuilt.
	///
	/// Entering force builds a stepper from the current positions, entering
	/// circular re-runs the arrangement and entering none drops every pin.
	pub fn reconcile_layout(&mut self) -> bool {
		let mode = self.options.layout;
		if mode == self.active {
			return false;
		}
		debug!(
			"graph-view: series `{}` switches layout {:?} -> {:?}",
			self.options.id, self.active, mode
		);
		match mode {
			LayoutMode::Force => {
				self.force = Some(Box::new(ForceLayout::new(
					&mut self.graph,
					&self.options.force,
					self.viewport,
				)));
			}
			LayoutMode::Circular => {
				self.force = None;
				self.circle = CircleFrame::inscribed(self.viewport);
				self.circular
					.layout(&mut self.graph, &self.circle, self.options.circular.basis, None);
			}
			LayoutMode::None => {
				self.force = None;
				self.graph.clear_fixed();
				self.graph.route_edges();
			}
		}
		self.active = mode;
		true
	}

	/// Resize the screen area, keeping the coordinate system in step.
	pub fn set_viewport(&mut self, viewport: Rect) {
		self.viewport = viewport;
		if let Some(view) = self.coord_sys.as_view_mut() {
			view.viewport = viewport;
		}
	}

	/// Swap the force stepper, e.g. for a different solver.
	pub fn with_force_stepper(mut self, stepper: Box<dyn ForceStepper>) -> Self {
		if self.options.layout == LayoutMode::Force {
			self.force = Some(stepper);
		}
		self
	}

	/// Replace the coordinate system.
	pub fn with_coord_sys(mut self, coord_sys: CoordSys) -> Self {
		self.coord_sys = coord_sys;
		self
	}

	/// Wrap in a shared handle for the view.
	pub fn into_handle(self) -> SeriesHandle {
		Rc::new(RefCell::new(self))
	}

	/// Series id, as used in roam intents.
	pub fn id(&self) -> &str {
		&self.options.id
	}

	/// Layout mode currently requested by the options.
	pub fn layout_mode(&self) -> LayoutMode {
		self.options.layout
	}

	/// Handle a roam intent addressed to this series. Returns whether it
	/// applied.
	pub fn apply_roam(&mut self, action: &RoamAction) -> bool {
		if action.series_id != self.options.id {
			return false;
		}
		let Some(view) = self.coord_sys.as_view_mut() else {
			return false;
		};
		if let (Some(dx), Some(dy)) = (action.dx, action.dy) {
			view.pan(dx, dy);
		}
		if let Some(zoom) = action.zoom {
			let origin = Point::new(
				action.origin_x.unwrap_or_default(),
				action.origin_y.unwrap_or_default(),
			);
			view.zoom_by(zoom, origin);
		}
		true
	}
}
