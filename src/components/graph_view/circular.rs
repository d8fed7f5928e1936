//! Circular layout: nodes share the circle in proportion to a sizing key.

use std::f64::consts::PI;

use super::coord::Point;
use super::graph::{Graph, NodeId};
use super::layout::{CircleFrame, CircularBasis, CircularPositioner};

/// Default [`CircularPositioner`].
///
/// Fixed nodes keep their position but still consume their angular share,
/// so pinning one node never shuffles the others.
#[derive(Clone, Copy, Debug, Default)]
pub struct CircularLayout;

impl CircularLayout {
	/// Half of each node's angular share, in node order.
	fn half_shares(graph: &Graph, frame: &CircleFrame, basis: CircularBasis) -> Vec<f64> {
		let count = graph.node_count();
		if count == 0 {
			return Vec::new();
		}
		match basis {
			CircularBasis::SymbolSize => {
				let symbol_half: Vec<f64> = graph
					.nodes()
					.iter()
					.map(|node| {
						let size = if node.symbol_size.is_nan() { 2.0 } else { node.symbol_size.max(0.0) };
						let half = (size / 2.0 / frame.r).asin();
						if half.is_nan() { PI / 2.0 } else { half }
					})
					.collect();
				let used: f64 = symbol_half.iter().map(|h| h * 2.0).sum();
				let remain_half = (2.0 * PI - used) / count as f64 / 2.0;
				symbol_half.into_iter().map(|h| h + remain_half).collect()
			}
			CircularBasis::Value => {
				let sum: f64 = graph.nodes().iter().map(|n| n.value).sum();
				let by_value = sum != 0.0;
				let unit = 2.0 * PI / if by_value { sum } else { count as f64 };
				graph
					.nodes()
					.iter()
					.map(|n| {
						let weight = if by_value { n.value } else { 1.0 };
						unit * weight / 2.0
					})
					.collect()
			}
		}
	}
}

impl CircularPositioner for CircularLayout {
	fn layout(
		&self,
		graph: &mut Graph,
		frame: &CircleFrame,
		basis: CircularBasis,
		dragging: Option<(NodeId, Point)>,
	) {
		if let Some((node, pointer)) = dragging {
			let (vx, vy) = (pointer.x - frame.cx, pointer.y - frame.cy);
			let len = (vx * vx + vy * vy).sqrt();
			if len > f64::EPSILON {
				graph.set_layout(
					node,
					Point::new(frame.cx + vx / len * frame.r, frame.cy + vy / len * frame.r),
				);
			}
		}

		let shares = Self::half_shares(graph, frame, basis);
		let mut angle = 0.0;
		for (i, half) in shares.into_iter().enumerate() {
			angle += half;
			let id = NodeId(i);
			let keep = graph.node(id).fixed && graph.layout(id).is_some();
			if !keep {
				graph.set_layout(
					id,
					Point::new(
						frame.r * angle.cos() + frame.cx,
						frame.r * angle.sin() + frame.cy,
					),
				);
			}
			angle += half;
		}
		graph.route_edges();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_view::types::{GraphData, GraphNode};

	fn ring(values: &[f64]) -> Graph {
		let data = GraphData {
			nodes: values
				.iter()
				.enumerate()
				.map(|(i, v)| GraphNode {
					id: format!("n{i}"),
					value: Some(*v),
					..Default::default()
				})
				.collect(),
			..Default::default()
		};
		Graph::from_data(&data).unwrap()
	}

	fn frame() -> CircleFrame {
		CircleFrame {
			cx: 100.0,
			cy: 100.0,
			r: 50.0,
		}
	}

	#[test]
	fn places_every_node_on_the_circle() {
		let mut g = ring(&[1.0, 1.0, 1.0, 1.0]);
		CircularLayout.layout(&mut g, &frame(), CircularBasis::SymbolSize, None);
		for node in g.nodes() {
			let p = node.layout.unwrap();
			assert!((p.distance(frame().center()) - 50.0).abs() < 1e-9);
		}
	}

	#[test]
	fn value_basis_splits_by_value() {
		let mut g = ring(&[1.0, 3.0]);
		CircularLayout.layout(&mut g, &frame(), CircularBasis::Value, None);
		// first share is a quarter turn, so its center is at 45 degrees
		let p = g.layout(NodeId(0)).unwrap();
		let angle = (p.y - 100.0).atan2(p.x - 100.0);
		assert!((angle - PI / 4.0).abs() < 1e-9);
	}

	#[test]
	fn dragged_node_is_projected_and_kept_when_fixed() {
		let mut g = ring(&[1.0, 1.0, 1.0]);
		g.node_mut(NodeId(1)).fixed = true;
		CircularLayout.layout(
			&mut g,
			&frame(),
			CircularBasis::SymbolSize,
			Some((NodeId(1), Point::new(100.0, 0.0))),
		);
		assert_eq!(g.layout(NodeId(1)), Some(Point::new(100.0, 50.0)));
	}
}
