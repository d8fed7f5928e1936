//! Drag coordinator: per-pointer drag sessions and the layout-specific
//! policies that feed a dragged position back into the active layout.
//!
//! The policy is looked up from the series' layout mode on every move, so a
//! mode switch mid-drag takes effect on the next move.

use log::{debug, trace};

use super::coord::Point;
use super::graph::NodeId;
use super::layout::LayoutMode;
use super::series::GraphSeries;

/// Pointer state of one drag move, in data space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragPointer {
	/// Pointer position, which is also the dragged node's new position.
	pub position: Point,
}

/// Follow-up the view must perform after a policy handled a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragEffect {
	/// Layout-only re-render.
	RelayoutOnly,
	/// Layout-only re-render, then make sure the simulation is stepping.
	EnsureSimulation,
}

/// Reaction of one layout mode to a dragged node.
pub trait DragPolicy {
	/// Write the pointer position into the layout and report the follow-up.
	fn on_drag_move(&self, series: &mut GraphSeries, node: NodeId, pointer: DragPointer) -> DragEffect;

	/// Release the node's anchor when a force stepper exists, whatever mode
	/// handled the moves. A pin left by an earlier move is also dropped when
	/// the drag ends in a mode without fixed nodes.
	fn on_drag_end(&self, series: &mut GraphSeries, node: NodeId) {
		if let Some(force) = series.force.as_mut() {
			force.set_unfixed(node);
			series.graph.node_mut(node).fixed = false;
			debug!("graph-view: released node {}", node.0);
		} else if !series.layout_mode().supports_fixed() {
			series.graph.node_mut(node).fixed = false;
		}
	}
}

/// Pins the node as a simulation anchor and re-heats the simulation.
#[derive(Clone, Copy, Debug, Default)]
pub struct ForceDrag;

/// Pins the node and re-runs the circular arrangement around it.
#[derive(Clone, Copy, Debug, Default)]
pub struct CircularDrag;

/// Moves the node and re-routes its edges; nothing else is recomputed.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManualDrag;

impl DragPolicy for ForceDrag {
	fn on_drag_move(&self, series: &mut GraphSeries, node: NodeId, pointer: DragPointer) -> DragEffect {
		let Some(force) = series.force.as_mut() else {
			// No solver to feed: behave like a manual drag.
			return ManualDrag.on_drag_move(series, node, pointer);
		};
		force.warm_up();
		force.set_fixed(node);
		series.graph.node_mut(node).fixed = true;
		series.graph.set_layout(node, pointer.position);
		series.graph.route_edges();
		DragEffect::EnsureSimulation
	}
}

impl DragPolicy for CircularDrag {
	fn on_drag_move(&self, series: &mut GraphSeries, node: NodeId, pointer: DragPointer) -> DragEffect {
		series.graph.set_layout(node, pointer.position);
		series.graph.node_mut(node).fixed = true;
		let GraphSeries {
			graph,
			circle,
			circular,
			options,
			..
		} = series;
		circular.layout(graph, circle, options.circular.basis, Some((node, pointer.position)));
		DragEffect::RelayoutOnly
	}
}

impl DragPolicy for ManualDrag {
	fn on_drag_move(&self, series: &mut GraphSeries, node: NodeId, pointer: DragPointer) -> DragEffect {
		if !series.layout_mode().supports_fixed() {
			series.graph.node_mut(node).fixed = false;
		}
		series.graph.set_layout(node, pointer.position);
		series.graph.route_edges();
		DragEffect::RelayoutOnly
	}
}

/// Policy for a layout mode.
pub fn policy_for(mode: LayoutMode) -> &'static dyn DragPolicy {
	match mode {
		LayoutMode::Force => &ForceDrag,
		LayoutMode::Circular => &CircularDrag,
		LayoutMode::None => &ManualDrag,
	}
}

/// One active pointer drag.
#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
	/// Node being dragged.
	pub node: NodeId,
	/// Layout mode when the drag began; informational only.
	pub mode_at_start: LayoutMode,
	start_screen: Point,
	node_start: Point,
}

impl DragSession {
	/// Start a drag of `node`, grabbed at `screen` while laid out at `node_start`.
	pub fn begin(node: NodeId, mode: LayoutMode, screen: Point, node_start: Point) -> Self {
		debug!("graph-view: drag start on node {} ({:?})", node.0, mode);
		Self {
			node,
			mode_at_start: mode,
			start_screen: screen,
			node_start,
		}
	}

	/// Pointer state for a move to `screen`, given the group scale.
	pub fn pointer(&self, screen: Point, scale_x: f64, scale_y: f64) -> DragPointer {
		let sx = if scale_x != 0.0 { scale_x } else { 1.0 };
		let sy = if scale_y != 0.0 { scale_y } else { 1.0 };
		let offset = Point::new(
			(screen.x - self.start_screen.x) / sx,
			(screen.y - self.start_screen.y) / sy,
		);
		let position = Point::new(self.node_start.x + offset.x, self.node_start.y + offset.y);
		trace!("graph-view: drag node {} to ({:.1}, {:.1})", self.node.0, position.x, position.y);
		DragPointer { position }
	}

	/// Apply a move with the policy of the series' current layout mode.
	pub fn drag_move(&self, series: &mut GraphSeries, pointer: DragPointer) -> DragEffect {
		policy_for(series.layout_mode()).on_drag_move(series, self.node, pointer)
	}

	/// Finish the drag with the policy of the current layout mode.
	pub fn end(self, series: &mut GraphSeries) {
		policy_for(series.layout_mode()).on_drag_end(series, self.node);
	}
}
