//! Graph data structures and series options accepted by the graph view.
//!
//! Everything here is deserialised from the JSON document embedded in the page.
//! Options default field by field, so `{ "nodes": [], "links": [] }` is a
//! complete document.

use serde::Deserialize;

use super::coord::ScaleLimit;
use super::layout::{CircularBasis, LayoutMode};

/// Emphasis focus policy of a node or edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Focus {
	/// Emphasis stays on the item itself.
	#[default]
	None,
	/// Emphasis spreads to adjacent nodes and incident edges.
	Adjacency,
}

/// Which roam gestures are enabled on a `view` coordinate system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoamMode {
	/// Roam disabled.
	Off,
	/// Pan only.
	Move,
	/// Zoom only.
	Scale,
	/// Pan and zoom.
	#[default]
	Both,
}

impl RoamMode {
	/// Whether pointer drags pan.
	pub fn allows_pan(self) -> bool {
		matches!(self, RoamMode::Move | RoamMode::Both)
	}

	/// Whether the wheel zooms.
	pub fn allows_zoom(self) -> bool {
		matches!(self, RoamMode::Scale | RoamMode::Both)
	}
}

/// A node in the graph.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphNode {
	/// Unique identifier for this node. Used to reference nodes in links.
	pub id: String,
	/// Optional display label.
	pub label: Option<String>,
	/// Optional CSS color override (e.g., "#ff0000" or "rgb(255, 0, 0)").
	/// If not set, color is derived from the theme palette based on `group`.
	pub color: Option<String>,
	/// Optional group name for palette-based coloring.
	pub group: Option<String>,
	/// Initial position; required for the `none` layout.
	pub x: Option<f64>,
	/// Initial position, vertical.
	pub y: Option<f64>,
	/// Numeric value, used by the circular `value` basis.
	pub value: Option<f64>,
	/// Symbol diameter override in data units.
	pub symbol_size: Option<f64>,
	/// Pin the node against layout recomputation from the start.
	#[serde(default)]
	pub fixed: bool,
	/// Per-node override of the series `draggable` flag.
	pub draggable: Option<bool>,
	/// CSS cursor shown while hovering a draggable node.
	pub cursor: Option<String>,
	/// Per-node emphasis scope.
	pub focus: Option<Focus>,
	/// Label rotation in degrees (ignored when circular labels rotate).
	pub label_rotate: Option<f64>,
}

/// An edge between two nodes.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphLink {
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
	/// Per-link emphasis scope.
	pub focus: Option<Focus>,
}

/// Force layout options.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ForceOptions {
	/// Animate the simulation frame by frame instead of converging in one go.
	pub layout_animation: bool,
	/// Initial friction; the simulation stops once it cools below 0.01.
	pub friction: f32,
	/// Repulsion between nodes.
	pub charge: f32,
	/// Spring strength along links.
	pub spring: f32,
	/// Cap on the force applied per step.
	pub max_force: f32,
	/// Node speed factor.
	pub node_speed: f32,
	/// Velocity damping per step.
	pub damping: f32,
}

impl Default for ForceOptions {
	fn default() -> Self {
		Self {
			layout_animation: true,
			friction: 0.6,
			charge: 150.0,
			spring: 0.05,
			max_force: 100.0,
			node_speed: 3000.0,
			damping: 0.9,
		}
	}
}

/// Circular layout options.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CircularOptions {
	/// Rotate labels to face away from the circle center.
	pub rotate_label: bool,
	/// How the circle is shared between nodes.
	pub basis: CircularBasis,
}

/// Series-level options shared by every node and edge.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SeriesOptions {
	/// Series id, used to address roam intents.
	pub id: String,
	/// Layout mode.
	pub layout: LayoutMode,
	/// Enabled roam gestures.
	pub roam: RoamMode,
	/// Zoom bounds.
	pub scale_limit: ScaleLimit,
	/// Initial zoom of the view.
	pub zoom: f64,
	/// How strongly node symbols follow the zoom (0 = fixed screen size).
	pub node_scale_ratio: f64,
	/// Default for nodes without their own `draggable`.
	pub draggable: bool,
	/// Default symbol diameter.
	pub symbol_size: f64,
	/// Default emphasis scope.
	pub focus: Focus,
	/// Default label rotation in degrees.
	pub label_rotate: f64,
	/// Force layout options.
	pub force: ForceOptions,
	/// Circular layout options.
	pub circular: CircularOptions,
}

impl Default for SeriesOptions {
	fn default() -> Self {
		Self {
			id: "graph".to_string(),
			layout: LayoutMode::default(),
			roam: RoamMode::default(),
			scale_limit: ScaleLimit::default(),
			zoom: 1.0,
			node_scale_ratio: 0.6,
			draggable: true,
			symbol_size: 10.0,
			focus: Focus::None,
			label_rotate: 0.0,
			force: ForceOptions::default(),
			circular: CircularOptions::default(),
		}
	}
}

/// Complete graph document: nodes, links and series options.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	/// Nodes in data order.
	pub nodes: Vec<GraphNode>,
	/// Links in data order.
	pub links: Vec<GraphLink>,
	/// Series options.
	#[serde(default)]
	pub options: SeriesOptions,
}
