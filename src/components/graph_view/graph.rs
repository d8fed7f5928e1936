//! Graph data store: nodes, edges, per-item layout state and adjacency.
//!
//! Node and edge identities are their indices in the input document and stay
//! stable for as long as the document does. Adjacency is derived once per
//! topology so focus queries are constant time.

use std::collections::HashMap;

use thiserror::Error;

use super::coord::Point;
use super::types::{Focus, GraphData};

/// Stable node identity (data index).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Stable edge identity (data index).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

/// Data-integrity failures detected while building a [`Graph`].
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
	/// Two nodes share an id.
	#[error("duplicate node id `{0}`")]
	DuplicateNode(String),
	/// A link names a node that does not exist.
	#[error("link #{link} references unknown node `{id}`")]
	UnknownEndpoint {
		/// Index of the link in the input.
		link: usize,
		/// The missing node id.
		id: String,
	},
	/// A node position is NaN or infinite.
	#[error("node `{0}` has a non-finite position")]
	InvalidPosition(String),
}

/// Nodes and edges emphasised together when an item gains focus.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FocusSet {
	/// Member nodes, sorted.
	pub nodes: Vec<NodeId>,
	/// Member edges, sorted.
	pub edges: Vec<EdgeId>,
}

impl FocusSet {
	/// Whether `id` is a member node.
	pub fn contains_node(&self, id: NodeId) -> bool {
		self.nodes.binary_search(&id).is_ok()
	}

	/// Whether `id` is a member edge.
	pub fn contains_edge(&self, id: EdgeId) -> bool {
		self.edges.binary_search(&id).is_ok()
	}
}

/// A node and its per-item state.
#[derive(Clone, Debug)]
pub struct Node {
	/// Position in the node list.
	pub id: NodeId,
	/// Identifier from the input document.
	pub key: String,
	/// Display label.
	pub label: Option<String>,
	/// CSS color override.
	pub color: Option<String>,
	/// Palette group.
	pub group: Option<String>,
	/// Numeric value for the circular `value` basis.
	pub value: f64,
	/// Symbol diameter in data units.
	pub symbol_size: f64,
	/// Layout position in data space; `None` means the node is not drawn.
	pub layout: Option<Point>,
	/// Excluded from automatic layout recomputation.
	pub fixed: bool,
	/// Whether a drag handler is bound.
	pub draggable: bool,
	/// Hover cursor for draggable nodes.
	pub cursor: Option<String>,
	/// Emphasis scope on hover.
	pub focus: Focus,
	/// Label rotation in radians when labels are not rotated by the circular layout.
	pub label_rotate: f64,
}

/// An edge between two nodes.
#[derive(Clone, Debug)]
pub struct Edge {
	/// Position in the edge list.
	pub id: EdgeId,
	/// Start node.
	pub source: NodeId,
	/// End node.
	pub target: NodeId,
	/// Emphasis scope on hover.
	pub focus: Focus,
	/// Straight line between the endpoint centers.
	pub line: Option<[Point; 2]>,
	/// Line clipped to the endpoint symbol boundaries at the current scale.
	pub attached: Option<[Point; 2]>,
}

/// Owns nodes and edges plus the derived adjacency.
#[derive(Clone, Debug, Default)]
pub struct Graph {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	incident: Vec<Vec<EdgeId>>,
	node_focus: Vec<FocusSet>,
}

impl Graph {
	/// Build the store from input data, resolving series-level defaults.
	///
	/// Fails fast on duplicate ids, dangling link endpoints and non-finite
	/// positions rather than rendering a partially broken graph.
	pub fn from_data(data: &GraphData) -> Result<Self, GraphError> {
		let options = &data.options;
		let mut index = HashMap::with_capacity(data.nodes.len());
		let mut nodes = Vec::with_capacity(data.nodes.len());

		for (i, n) in data.nodes.iter().enumerate() {
			let id = NodeId(i);
			if index.insert(n.id.clone(), id).is_some() {
				return Err(GraphError::DuplicateNode(n.id.clone()));
			}
			let layout = match (n.x, n.y) {
				(Some(x), Some(y)) => {
					let p = Point::new(x, y);
					if !p.is_finite() {
						return Err(GraphError::InvalidPosition(n.id.clone()));
					}
					Some(p)
				}
				_ => None,
			};
			nodes.push(Node {
				id,
				key: n.id.clone(),
				label: n.label.clone(),
				color: n.color.clone(),
				group: n.group.clone(),
				value: n.value.unwrap_or(0.0),
				symbol_size: n.symbol_size.unwrap_or(options.symbol_size),
				layout,
				fixed: n.fixed,
				draggable: n.draggable.unwrap_or(options.draggable),
				cursor: n.cursor.clone(),
				focus: n.focus.unwrap_or(options.focus),
				label_rotate: n.label_rotate.unwrap_or(options.label_rotate).to_radians(),
			});
		}

		let mut edges = Vec::with_capacity(data.links.len());
		for (i, link) in data.links.iter().enumerate() {
			let resolve = |key: &String| {
				index.get(key).copied().ok_or_else(|| GraphError::UnknownEndpoint {
					link: i,
					id: key.clone(),
				})
			};
			edges.push(Edge {
				id: EdgeId(i),
				source: resolve(&link.source)?,
				target: resolve(&link.target)?,
				focus: link.focus.unwrap_or(options.focus),
				line: None,
				attached: None,
			});
		}

		let mut graph = Self {
			nodes,
			edges,
			incident: Vec::new(),
			node_focus: Vec::new(),
		};
		graph.rebuild_adjacency();
		Ok(graph)
	}

	/// Recompute incident edges and per-node focus sets.
	fn rebuild_adjacency(&mut self) {
		self.incident = vec![Vec::new(); self.nodes.len()];
		for edge in &self.edges {
			self.incident[edge.source.0].push(edge.id);
			if edge.target != edge.source {
				self.incident[edge.target.0].push(edge.id);
			}
		}

		self.node_focus = self
			.nodes
			.iter()
			.map(|node| {
				let edges = self.incident[node.id.0].clone();
				let mut nodes: Vec<NodeId> = edges
					.iter()
					.map(|&e| self.other_end(e, node.id))
					.chain(std::iter::once(node.id))
					.collect();
				nodes.sort();
				nodes.dedup();
				FocusSet { nodes, edges }
			})
			.collect();
	}

	fn other_end(&self, edge: EdgeId, from: NodeId) -> NodeId {
		let e = &self.edges[edge.0];
		if e.source == from { e.target } else { e.source }
	}

	/// All nodes in data order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// All edges in data order.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Node by id. Panics on a foreign id.
	pub fn node(&self, id: NodeId) -> &Node {
		&self.nodes[id.0]
	}

	/// Mutable node by id.
	pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
		&mut self.nodes[id.0]
	}

	/// Edge by id.
	pub fn edge(&self, id: EdgeId) -> &Edge {
		&self.edges[id.0]
	}

	/// Number of nodes.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Edges touching `id`.
	pub fn incident_edges(&self, id: NodeId) -> &[EdgeId] {
		&self.incident[id.0]
	}

	/// The node itself, its neighbours and its incident edges.
	pub fn adjacent_focus(&self, id: NodeId) -> &FocusSet {
		&self.node_focus[id.0]
	}

	/// Both endpoints and the edge itself.
	pub fn edge_focus(&self, id: EdgeId) -> FocusSet {
		let edge = &self.edges[id.0];
		let mut nodes = vec![edge.source, edge.target];
		nodes.sort();
		nodes.dedup();
		FocusSet {
			nodes,
			edges: vec![id],
		}
	}

	/// Place a node at `p` in data space.
	pub fn set_layout(&mut self, id: NodeId, p: Point) {
		self.nodes[id.0].layout = Some(p);
	}

	/// Stored position of a node.
	pub fn layout(&self, id: NodeId) -> Option<Point> {
		self.nodes[id.0].layout
	}

	/// Unpin every node.
	pub fn clear_fixed(&mut self) {
		for node in &mut self.nodes {
			node.fixed = false;
		}
	}

	/// Route every edge as a straight line between its endpoint centers.
	///
	/// Edges with an undrawn endpoint get no line.
	pub fn route_edges(&mut self) {
		for edge in &mut self.edges {
			edge.line = match (
				self.nodes[edge.source.0].layout,
				self.nodes[edge.target.0].layout,
			) {
				(Some(a), Some(b)) => Some([a, b]),
				_ => None,
			};
		}
	}

	/// Clip every routed edge to its endpoint boundaries at `node_scale`.
	///
	/// `node_scale` is the symbol scale in data space, so the attachment
	/// points sit `symbol_size / 2 * node_scale` away from each center.
	pub fn attach_edges(&mut self, node_scale: f64) {
		for edge in &mut self.edges {
			let Some([a, b]) = edge.line else {
				edge.attached = None;
				continue;
			};
			let d = a.distance(b);
			if edge.source == edge.target || d <= f64::EPSILON {
				edge.attached = Some([a, b]);
				continue;
			}
			let (ux, uy) = ((b.x - a.x) / d, (b.y - a.y) / d);
			let r1 = self.nodes[edge.source.0].symbol_size / 2.0 * node_scale;
			let r2 = self.nodes[edge.target.0].symbol_size / 2.0 * node_scale;
			edge.attached = Some([
				Point::new(a.x + ux * r1, a.y + uy * r1),
				Point::new(b.x - ux * r2, b.y - uy * r2),
			]);
		}
	}
}
