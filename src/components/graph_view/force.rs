//! Force-directed layout backed by the `force_graph` simulation.
//!
//! The solver itself never stops, so convergence is driven by friction: it
//! starts at the configured value, decays every step and the layout reports
//! "stopped" once it cools below [`STOP_FRICTION`]. Dragging warms it back up.

use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::trace;

use super::coord::{Point, Rect};
use super::graph::{Graph, NodeId};
use super::layout::ForceStepper;
use super::types::ForceOptions;

/// Simulated seconds per tick at full friction.
const STEP_DT: f32 = 0.016;
const FRICTION_DECAY: f32 = 0.992;
const WARM_FRICTION: f32 = 0.8;
const STOP_FRICTION: f32 = 0.01;

/// [`ForceStepper`] over a `force_graph` simulation.
pub struct ForceLayout {
	sim: ForceGraph<usize, ()>,
	handles: Vec<DefaultNodeIdx>,
	fixed: Vec<bool>,
	friction: f32,
	steps: u64,
}

impl ForceLayout {
	/// Build the simulation from the graph, seeding unpositioned nodes on a
	/// ring around the viewport center and storing those seeds back.
	pub fn new(graph: &mut Graph, options: &ForceOptions, viewport: Rect) -> Self {
		let mut sim = ForceGraph::new(SimulationParameters {
			force_charge: options.charge,
			force_spring: options.spring,
			force_max: options.max_force,
			node_speed: options.node_speed,
			damping_factor: options.damping,
		});
		let count = graph.node_count();
		let center = viewport.center();
		let ring = viewport.width.min(viewport.height) / 4.0;
		let mut handles = Vec::with_capacity(count);
		let mut fixed = Vec::with_capacity(count);

		for i in 0..count {
			let id = NodeId(i);
			let pos = graph.layout(id).unwrap_or_else(|| {
				let angle = (i as f64) * 2.0 * PI / count as f64;
				Point::new(center.x + ring * angle.cos(), center.y + ring * angle.sin())
			});
			graph.set_layout(id, pos);
			let pinned = graph.node(id).fixed;
			handles.push(sim.add_node(NodeData {
				x: pos.x as f32,
				y: pos.y as f32,
				mass: 10.0,
				is_anchor: pinned,
				user_data: i,
			}));
			fixed.push(pinned);
		}

		for edge in graph.edges() {
			if edge.source != edge.target {
				sim.add_edge(
					handles[edge.source.0],
					handles[edge.target.0],
					EdgeData::default(),
				);
			}
		}
		graph.route_edges();

		Self {
			sim,
			handles,
			fixed,
			friction: options.friction,
			steps: 0,
		}
	}

	/// Current friction; decays towards the stop threshold.
	pub fn friction(&self) -> f32 {
		self.friction
	}

	/// Whether `node` is anchored in the simulation.
	pub fn is_fixed(&self, node: NodeId) -> bool {
		self.fixed.get(node.0).copied().unwrap_or(false)
	}

	/// Number of nodes tracked by the simulation.
	pub fn len(&self) -> usize {
		self.handles.len()
	}

	/// Whether the simulation has no nodes.
	pub fn is_empty(&self) -> bool {
		self.handles.is_empty()
	}
}

impl ForceStepper for ForceLayout {
	fn step(&mut self, graph: &mut Graph) -> bool {
		// Anchored nodes follow whatever was written into the store (drags).
		let fixed = &self.fixed;
		self.sim.visit_nodes_mut(|node| {
			let i = node.data.user_data;
			node.data.is_anchor = fixed[i];
			if fixed[i] {
				if let Some(p) = graph.layout(NodeId(i)) {
					node.data.x = p.x as f32;
					node.data.y = p.y as f32;
				}
			}
		});

		self.sim.update(STEP_DT * self.friction);
		self.friction *= FRICTION_DECAY;
		self.steps += 1;

		self.sim.visit_nodes(|node| {
			let i = node.data.user_data;
			if !fixed[i] {
				graph.set_layout(NodeId(i), Point::new(node.x() as f64, node.y() as f64));
			}
		});
		graph.route_edges();

		let stopped = self.friction < STOP_FRICTION;
		if stopped {
			trace!("graph-view: force layout cooled after {} steps", self.steps);
		}
		stopped
	}

	fn warm_up(&mut self) {
		self.friction = WARM_FRICTION;
	}

	fn set_fixed(&mut self, node: NodeId) {
		if let Some(flag) = self.fixed.get_mut(node.0) {
			*flag = true;
		}
	}

	fn set_unfixed(&mut self, node: NodeId) {
		if let Some(flag) = self.fixed.get_mut(node.0) {
			*flag = false;
		}
	}
}
