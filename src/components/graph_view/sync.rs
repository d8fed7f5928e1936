//! Render synchronizer: maps graph items to their drawables.
//!
//! Every positioned node owns a [`NodeSprite`] and every routed edge an
//! [`EdgeSprite`], keyed by data index so a sprite survives re-renders as long
//! as the item it draws does. Two update paths exist: [`RenderSync::update_data`]
//! rebinds everything from the graph, [`RenderSync::update_layout`] only pushes
//! positions, attachment points and scale.

use super::coord::{Point, Rect, Transform};
use super::graph::{EdgeId, FocusSet, Graph, NodeId};
use super::layout::LabelPlacement;

/// Drag handler registration, with the node id captured at bind time.
#[derive(Clone, Debug, PartialEq)]
pub struct DragBinding {
	/// Node the handler moves.
	pub node: NodeId,
	/// Cursor shown on hover.
	pub cursor: Option<String>,
}

/// Drawable for a node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSprite {
	/// Node drawn by this sprite.
	pub node: NodeId,
	/// Creation serial; unchanged while the sprite is reused.
	pub serial: u64,
	key: String,
	/// Center in data space.
	pub position: Point,
	/// Unscaled symbol diameter.
	pub symbol_size: f64,
	/// Symbol scale in data-space.
	pub scale: f64,
	/// Label text.
	pub label: Option<String>,
	/// Label rotation and side.
	pub label_placement: LabelPlacement,
	/// CSS color override.
	pub color: Option<String>,
	/// Palette group.
	pub group: Option<String>,
	/// Drag handler, when the node is draggable.
	pub drag: Option<DragBinding>,
	/// Items emphasised with this node.
	pub focus: Option<FocusSet>,
}

impl NodeSprite {
	/// Drawn radius in data-space.
	pub fn radius(&self) -> f64 {
		self.symbol_size / 2.0 * self.scale
	}
}

/// Drawable for an edge.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeSprite {
	/// Edge drawn by this sprite.
	pub edge: EdgeId,
	/// Creation serial; unchanged while the sprite is reused.
	pub serial: u64,
	/// Start node.
	pub source: NodeId,
	/// End node.
	pub target: NodeId,
	/// Attached start point in data space.
	pub from: Point,
	/// Attached end point in data space.
	pub to: Point,
	/// Items emphasised with this edge.
	pub focus: Option<FocusSet>,
}

/// Update counters, for diagnostics and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncStats {
	/// Full data rebinds.
	pub rebinds: u64,
	/// Layout-only updates.
	pub layout_updates: u64,
}

/// Tween state of the root group transform.
#[derive(Clone, Copy, Debug)]
struct Tween {
	from: Transform,
	elapsed: f64,
	duration: f64,
}

/// Root group holding every sprite; carries the data → screen transform.
#[derive(Clone, Debug, Default)]
pub struct RootGroup {
	current: Transform,
	target: Transform,
	tween: Option<Tween>,
}

/// Duration of animated group transform updates, in milliseconds.
pub const UPDATE_DURATION_MS: f64 = 300.0;

impl RootGroup {
	/// Transform as currently displayed.
	pub fn current(&self) -> Transform {
		self.current
	}

	/// Transform the group is heading to.
	pub fn target(&self) -> Transform {
		self.target
	}

	/// Whether a tween is in progress.
	pub fn is_animating(&self) -> bool {
		self.tween.is_some()
	}

	/// Jump straight to `t`.
	pub fn snap(&mut self, t: Transform) {
		self.current = t;
		self.target = t;
		self.tween = None;
	}

	/// Animate from the displayed transform to `t`.
	pub fn animate_to(&mut self, t: Transform) {
		if t == self.current {
			self.snap(t);
			return;
		}
		self.target = t;
		self.tween = Some(Tween {
			from: self.current,
			elapsed: 0.0,
			duration: UPDATE_DURATION_MS,
		});
	}

	/// Mutate the transform directly (roam gestures), cancelling any tween.
	pub fn modify(&mut self, f: impl FnOnce(&mut Transform)) {
		let mut t = self.target;
		f(&mut t);
		self.snap(t);
	}

	/// Advance the tween by `dt_ms`. Returns whether it is still running.
	pub fn advance(&mut self, dt_ms: f64) -> bool {
		let Some(tween) = self.tween.as_mut() else {
			return false;
		};
		tween.elapsed += dt_ms;
		let t = (tween.elapsed / tween.duration).min(1.0);
		// cubic ease-out
		let eased = 1.0 - (1.0 - t).powi(3);
		self.current = tween.from.lerp(&self.target, eased);
		if t >= 1.0 {
			self.current = self.target;
			self.tween = None;
		}
		self.tween.is_some()
	}

	/// Screen point to group-local space, using the displayed transform.
	pub fn screen_to_local(&self, p: Point) -> Point {
		self.current.invert(p)
	}
}

/// Node and edge drawables of one view.
#[derive(Debug, Default)]
pub struct RenderSync {
	nodes: Vec<Option<NodeSprite>>,
	edges: Vec<Option<EdgeSprite>>,
	next_serial: u64,
	stats: SyncStats,
}

impl RenderSync {
	fn serial(&mut self) -> u64 {
		self.next_serial += 1;
		self.next_serial
	}

	/// Rebind every sprite from the graph.
	///
	/// Nodes without a layout and edges without attachment lose their sprite.
	/// Existing sprites are updated in place when they still draw the same item.
	pub fn update_data(&mut self, graph: &Graph) {
		self.stats.rebinds += 1;
		self.nodes.resize(graph.node_count(), None);
		for node in graph.nodes() {
			let Some(position) = node.layout else {
				self.nodes[node.id.0] = None;
				continue;
			};
			let reuse = matches!(&self.nodes[node.id.0], Some(s) if s.key == node.key);
			if reuse {
				if let Some(sprite) = self.nodes[node.id.0].as_mut() {
					sprite.position = position;
					sprite.symbol_size = node.symbol_size;
					sprite.label = node.label.clone();
					sprite.color = node.color.clone();
					sprite.group = node.group.clone();
				}
			} else {
				let serial = self.serial();
				self.nodes[node.id.0] = Some(NodeSprite {
					node: node.id,
					serial,
					key: node.key.clone(),
					position,
					symbol_size: node.symbol_size,
					scale: 1.0,
					label: node.label.clone(),
					label_placement: LabelPlacement::default(),
					color: node.color.clone(),
					group: node.group.clone(),
					drag: None,
					focus: None,
				});
			}
		}

		let edge_count = graph.edges().len();
		self.edges.resize(edge_count, None);
		for edge in graph.edges() {
			let Some([from, to]) = edge.attached else {
				self.edges[edge.id.0] = None;
				continue;
			};
			let reuse = matches!(&self.edges[edge.id.0],
				Some(s) if s.source == edge.source && s.target == edge.target);
			if reuse {
				if let Some(sprite) = self.edges[edge.id.0].as_mut() {
					sprite.from = from;
					sprite.to = to;
				}
			} else {
				let serial = self.serial();
				self.edges[edge.id.0] = Some(EdgeSprite {
					edge: edge.id,
					serial,
					source: edge.source,
					target: edge.target,
					from,
					to,
					focus: None,
				});
			}
		}
	}

	/// Push positions and attachment points only. Items whose sprite is gone
	/// are skipped.
	pub fn update_layout(&mut self, graph: &Graph) {
		self.stats.layout_updates += 1;
		for sprite in self.nodes.iter_mut().flatten() {
			if let Some(p) = graph.layout(sprite.node) {
				sprite.position = p;
			}
		}
		for sprite in self.edges.iter_mut().flatten() {
			if let Some([from, to]) = graph.edge(sprite.edge).attached {
				sprite.from = from;
				sprite.to = to;
			}
		}
	}

	/// Set the data-space symbol scale of every node sprite.
	pub fn apply_scale(&mut self, scale: f64) {
		for sprite in self.nodes.iter_mut().flatten() {
			sprite.scale = scale;
		}
	}

	/// Drop every sprite.
	pub fn remove(&mut self) {
		self.nodes.clear();
		self.edges.clear();
	}

	/// Sprite of a node.
	pub fn node(&self, id: NodeId) -> Option<&NodeSprite> {
		self.nodes.get(id.0).and_then(Option::as_ref)
	}

	/// Mutable sprite of a node.
	pub fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeSprite> {
		self.nodes.get_mut(id.0).and_then(Option::as_mut)
	}

	/// Sprite of an edge.
	pub fn edge(&self, id: EdgeId) -> Option<&EdgeSprite> {
		self.edges.get(id.0).and_then(Option::as_ref)
	}

	/// Mutable sprite of an edge.
	pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut EdgeSprite> {
		self.edges.get_mut(id.0).and_then(Option::as_mut)
	}

	/// Node sprites in data order.
	pub fn node_sprites(&self) -> impl Iterator<Item = &NodeSprite> {
		self.nodes.iter().flatten()
	}

	/// Edge sprites in data order.
	pub fn edge_sprites(&self) -> impl Iterator<Item = &EdgeSprite> {
		self.edges.iter().flatten()
	}

	/// Update counters so far.
	pub fn stats(&self) -> SyncStats {
		self.stats
	}

	/// Bounding box of all node symbols in data-space.
	pub fn bounding_rect(&self) -> Option<Rect> {
		let mut margin: f64 = 0.0;
		let rect = Rect::from_points(self.node_sprites().map(|s| {
			margin = margin.max(s.radius());
			s.position
		}))?;
		Some(rect.inflate(margin))
	}

	/// Topmost node whose pick radius contains the data-space point.
	pub fn node_at(&self, p: Point, pick_radius: impl Fn(&NodeSprite) -> f64) -> Option<NodeId> {
		self.nodes
			.iter()
			.rev()
			.flatten()
			.find(|s| s.position.distance(p) <= pick_radius(s))
			.map(|s| s.node)
	}

	/// Topmost edge passing within `tolerance` of the data-space point.
	pub fn edge_at(&self, p: Point, tolerance: f64) -> Option<EdgeId> {
		self.edges
			.iter()
			.rev()
			.flatten()
			.find(|s| segment_distance(p, s.from, s.to) <= tolerance)
			.map(|s| s.edge)
	}
}

fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
	let (dx, dy) = (b.x - a.x, b.y - a.y);
	let len2 = dx * dx + dy * dy;
	if len2 <= f64::EPSILON {
		return p.distance(a);
	}
	let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0);
	p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_view::types::{GraphData, GraphLink, GraphNode};

	fn graph(with_b: bool) -> Graph {
		let data = GraphData {
			nodes: vec![
				GraphNode {
					id: "a".into(),
					x: Some(0.0),
					y: Some(0.0),
					..Default::default()
				},
				GraphNode {
					id: "b".into(),
					x: with_b.then_some(30.0),
					y: with_b.then_some(40.0),
					..Default::default()
				},
			],
			links: vec![GraphLink {
				source: "a".into(),
				target: "b".into(),
				focus: None,
			}],
			..Default::default()
		};
		let mut g = Graph::from_data(&data).unwrap();
		g.route_edges();
		g.attach_edges(1.0);
		g
	}

	#[test]
	fn unpositioned_items_have_no_sprite() {
		let mut sync = RenderSync::default();
		sync.update_data(&graph(false));
		assert!(sync.node(NodeId(0)).is_some());
		assert!(sync.node(NodeId(1)).is_none());
		assert!(sync.edge(EdgeId(0)).is_none());
	}

	#[test]
	fn sprites_keep_identity_across_rebinds() {
		let g = graph(true);
		let mut sync = RenderSync::default();
		sync.update_data(&g);
		let serial = sync.node(NodeId(1)).unwrap().serial;
		let edge_serial = sync.edge(EdgeId(0)).unwrap().serial;
		sync.update_data(&g);
		assert_eq!(sync.node(NodeId(1)).unwrap().serial, serial);
		assert_eq!(sync.edge(EdgeId(0)).unwrap().serial, edge_serial);
		assert_eq!(sync.stats().rebinds, 2);
	}

	#[test]
	fn layout_update_moves_sprites_without_rebinding() {
		let mut g = graph(true);
		let mut sync = RenderSync::default();
		sync.update_data(&g);
		g.set_layout(NodeId(1), Point::new(60.0, 80.0));
		g.route_edges();
		g.attach_edges(1.0);
		sync.update_layout(&g);
		assert_eq!(sync.node(NodeId(1)).unwrap().position, Point::new(60.0, 80.0));
		assert!(sync.edge(EdgeId(0)).unwrap().to.distance(Point::new(57.0, 76.0)) < 1e-9);
		assert_eq!(sync.stats(), SyncStats {
			rebinds: 1,
			layout_updates: 1
		});
	}

	#[test]
	fn hit_test_and_bounds_follow_scale() {
		let mut sync = RenderSync::default();
		sync.update_data(&graph(true));
		sync.apply_scale(2.0);
		let rect = sync.bounding_rect().unwrap();
		assert_eq!(rect, Rect::new(-10.0, -10.0, 50.0, 60.0));
		assert_eq!(
			sync.node_at(Point::new(38.0, 40.0), NodeSprite::radius),
			Some(NodeId(1))
		);
		assert_eq!(sync.node_at(Point::new(15.0, 20.0), NodeSprite::radius), None);
		assert_eq!(sync.edge_at(Point::new(16.0, 20.0), 1.0), Some(EdgeId(0)));
		assert_eq!(sync.edge_at(Point::new(30.0, 0.0), 1.0), None);
	}

	#[test]
	fn group_tween_settles_on_target() {
		let mut group = RootGroup::default();
		let target = Transform {
			x: 100.0,
			y: 50.0,
			scale_x: 2.0,
			scale_y: 2.0,
		};
		group.animate_to(target);
		assert!(group.is_animating());
		assert_eq!(group.current(), Transform::IDENTITY);
		assert!(group.advance(UPDATE_DURATION_MS / 2.0));
		assert!(!group.advance(UPDATE_DURATION_MS));
		assert_eq!(group.current(), target);
	}
}
