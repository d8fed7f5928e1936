//! Layout modes and the seams layout strategies plug into.
//!
//! Exactly one [`LayoutMode`] is active per render. The force strategy is a
//! [`ForceStepper`] advanced by the simulation scheduler; the circular strategy
//! is a [`CircularPositioner`] re-run on demand; the `none` mode keeps stored
//! positions and only re-routes edges.

use std::f64::consts::PI;

use serde::Deserialize;

use super::coord::{Point, Rect};
use super::graph::{Graph, NodeId};

/// Active layout policy of a series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
	/// Iterative force-directed simulation.
	#[default]
	Force,
	/// Nodes spread around a circle.
	Circular,
	/// Positions come straight from the data; edges follow their endpoints.
	None,
}

impl LayoutMode {
	/// Whether nodes may be pinned with the `fixed` flag in this mode.
	pub fn supports_fixed(self) -> bool {
		matches!(self, LayoutMode::Force | LayoutMode::Circular)
	}
}

/// What the circular layout divides the circle by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircularBasis {
	/// Share by symbol size, the rest split evenly.
	#[default]
	SymbolSize,
	/// Share in proportion to node values.
	Value,
}

/// Center and radius of the circular arrangement, in data space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CircleFrame {
	/// Center x.
	pub cx: f64,
	/// Center y.
	pub cy: f64,
	/// Radius.
	pub r: f64,
}

impl CircleFrame {
	/// Largest circle centered in `rect`.
	pub fn inscribed(rect: Rect) -> Self {
		let center = rect.center();
		Self {
			cx: center.x,
			cy: center.y,
			r: rect.width.min(rect.height) / 2.0,
		}
	}

	/// Center as a point.
	pub fn center(&self) -> Point {
		Point::new(self.cx, self.cy)
	}
}

/// Transient per-render layout facts.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutState {
	/// Circle center x at the last render.
	pub cx: f64,
	/// Circle center y at the last render.
	pub cy: f64,
	/// Symbol scale applied to every node (data space).
	pub node_scale: f64,
	/// Whether the force simulation is stepping.
	pub force_running: bool,
}

impl LayoutState {
	/// Circle center as a point.
	pub fn center(&self) -> Point {
		Point::new(self.cx, self.cy)
	}
}

/// An iterative force solver.
///
/// `step` advances one tick, writes node positions and edge lines back into
/// the graph and returns `true` once the simulation has converged.
pub trait ForceStepper {
	/// Advance one tick. Returns `true` once converged.
	fn step(&mut self, graph: &mut Graph) -> bool;
	/// Re-heat the simulation after a perturbation such as a drag.
	fn warm_up(&mut self);
	/// Anchor a node; its stored layout is authoritative until released.
	fn set_fixed(&mut self, node: NodeId);
	/// Release an anchor set by [`ForceStepper::set_fixed`].
	fn set_unfixed(&mut self, node: NodeId);
}

/// Assigns angular positions around a [`CircleFrame`].
pub trait CircularPositioner {
	/// Lay out every non-fixed node. When `dragging` is given, that node is
	/// first projected onto the circle in the direction of the pointer.
	fn layout(
		&self,
		graph: &mut Graph,
		frame: &CircleFrame,
		basis: CircularBasis,
		dragging: Option<(NodeId, Point)>,
	);
}

/// Which side of its symbol a label sits on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LabelSide {
	/// Left of the symbol, text reading towards it.
	Left,
	/// Right of the symbol.
	#[default]
	Right,
}

/// Rotation (radians, screen convention) and side of a node label.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LabelPlacement {
	/// Rotation in radians.
	pub rotation: f64,
	/// Side of the symbol the label sits on.
	pub side: LabelSide,
}

/// Label placement for a node at `pos`.
///
/// With `rotate_outward` the label faces away from `center`, flipped on the
/// left half so text never reads upside down. Otherwise `fallback` radians.
pub fn node_label_placement(
	pos: Point,
	center: Point,
	rotate_outward: bool,
	fallback: f64,
) -> LabelPlacement {
	if !rotate_outward {
		return LabelPlacement {
			rotation: fallback,
			side: LabelSide::Right,
		};
	}
	let mut rad = (pos.y - center.y).atan2(pos.x - center.x);
	if rad < 0.0 {
		rad += 2.0 * PI;
	}
	let is_left = pos.x < center.x;
	if is_left {
		rad -= PI;
	}
	LabelPlacement {
		rotation: -rad,
		side: if is_left { LabelSide::Left } else { LabelSide::Right },
	}
}
