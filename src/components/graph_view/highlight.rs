//! Hover emphasis with smooth intensity transitions.
//!
//! The emphasised set comes from the hovered item's [`FocusSet`]: the item
//! alone when its focus mode is `none`, or its adjacency set when it is
//! `adjacency`. Each node and edge then animates its own intensity
//! (0.0 to 1.0) towards membership of that set.

use std::collections::{HashMap, HashSet};

use super::graph::{EdgeId, FocusSet, NodeId};

/// Minimum time (seconds) a highlight is held before it can fade out.
/// Prevents flashing when the pointer briefly skirts a hover zone.
const MIN_HOLD_TIME: f64 = 0.12;
const FADE_IN_SPEED: f64 = 6.0;
const FADE_OUT_SPEED: f64 = 4.0;
/// Intensities below this are dropped.
const VISIBLE: f64 = 0.005;

/// What the pointer is currently over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hovered {
	/// A node symbol.
	Node(NodeId),
	/// An edge line.
	Edge(EdgeId),
}

/// Smoothed per-item emphasis intensities.
#[derive(Clone, Debug, Default)]
pub struct HighlightState {
	hovered: Option<Hovered>,
	target_nodes: HashSet<NodeId>,
	target_edges: HashSet<EdgeId>,
	node_intensity: HashMap<NodeId, f64>,
	edge_intensity: HashMap<EdgeId, f64>,
	/// Ring around the hovered node only.
	ring_intensity: HashMap<NodeId, f64>,
	node_hold: HashMap<NodeId, f64>,
	cached_max: f64,
}

impl HighlightState {
	/// Item under the pointer, if any.
	pub fn hovered(&self) -> Option<Hovered> {
		self.hovered
	}

	/// Set the hovered item and the set it emphasises.
	///
	/// `focus` is the sprite's focus set; without one only the item itself
	/// is emphasised.
	pub fn set_hover(&mut self, hovered: Option<Hovered>, focus: Option<&FocusSet>) {
		if self.hovered == hovered {
			return;
		}
		self.hovered = hovered;
		self.target_nodes.clear();
		self.target_edges.clear();

		match (hovered, focus) {
			(None, _) => {}
			(Some(_), Some(focus)) => {
				self.target_nodes.extend(focus.nodes.iter().copied());
				self.target_edges.extend(focus.edges.iter().copied());
			}
			(Some(Hovered::Node(node)), None) => {
				self.target_nodes.insert(node);
			}
			(Some(Hovered::Edge(edge)), None) => {
				self.target_edges.insert(edge);
			}
		}

		for &node in &self.target_nodes {
			self.node_hold.insert(node, MIN_HOLD_TIME);
		}
	}

	/// Nodes currently targeted for emphasis.
	pub fn target_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
		self.target_nodes.iter().copied()
	}

	/// Edges currently targeted for emphasis.
	pub fn target_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
		self.target_edges.iter().copied()
	}

	/// Animate intensities towards their targets by `dt` seconds.
	///
	/// Exponential smoothing: `value += (target - value) * (1 - e^(-speed * dt))`.
	pub fn tick(&mut self, dt: f64) {
		let fade_in = 1.0 - (-FADE_IN_SPEED * dt).exp();
		let fade_out = (-FADE_OUT_SPEED * dt).exp();

		for &node in &self.target_nodes {
			let v = self.node_intensity.entry(node).or_insert(0.0);
			*v += (1.0 - *v) * fade_in;
		}
		for &edge in &self.target_edges {
			let v = self.edge_intensity.entry(edge).or_insert(0.0);
			*v += (1.0 - *v) * fade_in;
		}
		if let Some(Hovered::Node(node)) = self.hovered {
			let v = self.ring_intensity.entry(node).or_insert(0.0);
			*v += (1.0 - *v) * fade_in;
		}

		let targets = &self.target_nodes;
		self.node_hold.retain(|node, timer| {
			if targets.contains(node) {
				true
			} else {
				*timer -= dt;
				*timer > 0.0
			}
		});

		let hold = &self.node_hold;
		let mut max: f64 = 0.0;
		self.node_intensity.retain(|node, v| {
			if !targets.contains(node) && !hold.contains_key(node) {
				*v *= fade_out;
			}
			max = max.max(*v);
			*v > VISIBLE
		});

		let edge_targets = &self.target_edges;
		self.edge_intensity.retain(|edge, v| {
			if !edge_targets.contains(edge) {
				*v *= fade_out;
			}
			max = max.max(*v);
			*v > VISIBLE
		});

		let hovered = self.hovered;
		self.ring_intensity.retain(|node, v| {
			if hovered != Some(Hovered::Node(*node)) && !hold.contains_key(node) {
				*v *= fade_out;
			}
			*v > VISIBLE
		});

		self.cached_max = max;
	}

	/// Smoothed emphasis of a node, 0 to 1.
	pub fn node_intensity(&self, node: NodeId) -> f64 {
		self.node_intensity.get(&node).copied().unwrap_or(0.0)
	}

	/// Smoothed emphasis of an edge, 0 to 1.
	pub fn edge_intensity(&self, edge: EdgeId) -> f64 {
		self.edge_intensity.get(&edge).copied().unwrap_or(0.0)
	}

	/// Smoothed hover ring strength of a node.
	pub fn ring_intensity(&self, node: NodeId) -> f64 {
		self.ring_intensity.get(&node).copied().unwrap_or(0.0)
	}

	/// Highest intensity of any item, used to dim everything else.
	pub fn max_intensity(&self) -> f64 {
		self.cached_max
	}

	/// Whether any intensity is still moving.
	pub fn is_animating(&self) -> bool {
		!self.node_intensity.is_empty() || !self.edge_intensity.is_empty() || !self.ring_intensity.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn focus() -> FocusSet {
		FocusSet {
			nodes: vec![NodeId(0), NodeId(1)],
			edges: vec![EdgeId(0)],
		}
	}

	#[test]
	fn hover_targets_the_focus_set() {
		let mut state = HighlightState::default();
		state.set_hover(Some(Hovered::Node(NodeId(0))), Some(&focus()));
		let mut nodes: Vec<_> = state.target_nodes().collect();
		nodes.sort();
		assert_eq!(nodes, vec![NodeId(0), NodeId(1)]);
		assert_eq!(state.target_edges().collect::<Vec<_>>(), vec![EdgeId(0)]);
	}

	#[test]
	fn hover_without_focus_targets_only_the_item() {
		let mut state = HighlightState::default();
		state.set_hover(Some(Hovered::Edge(EdgeId(3))), None);
		assert_eq!(state.target_nodes().count(), 0);
		assert_eq!(state.target_edges().collect::<Vec<_>>(), vec![EdgeId(3)]);
	}

	#[test]
	fn intensities_fade_in_then_out() {
		let mut state = HighlightState::default();
		state.set_hover(Some(Hovered::Node(NodeId(0))), Some(&focus()));
		for _ in 0..60 {
			state.tick(1.0 / 60.0);
		}
		assert!(state.node_intensity(NodeId(1)) > 0.95);
		assert!(state.edge_intensity(EdgeId(0)) > 0.95);
		assert!(state.ring_intensity(NodeId(0)) > 0.95);
		assert_eq!(state.ring_intensity(NodeId(1)), 0.0);

		state.set_hover(None, None);
		for _ in 0..240 {
			state.tick(1.0 / 60.0);
		}
		assert_eq!(state.node_intensity(NodeId(1)), 0.0);
		assert_eq!(state.edge_intensity(EdgeId(0)), 0.0);
		assert!(!state.is_animating());
	}
}
