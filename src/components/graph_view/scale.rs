//! Zoom-dependent scaling of node symbols and stroke styles.
//!
//! # Coordinate Spaces
//!
//! - **Data-space**: the space nodes are laid out in. The root group transform
//!   maps it to the screen, so anything drawn in data units grows with zoom.
//! - **Screen-space**: pixel coordinates on the canvas.
//!
//! Node symbols follow the zoom only partially: `node_scale_ratio` blends
//! between a constant screen size (0) and full world scaling (1). Strokes and
//! labels use a [`ScaleBehavior`] each.

/// Defines how a visual property scales with the group zoom `k`.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant data-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// Data-space value to draw with, for a base value and zoom level.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Global node symbol scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeScale {
	/// Symbol size multiplier as seen on screen, relative to zoom 1.
	pub visual: f64,
	/// Multiplier applied inside the root group (data-space).
	pub local: f64,
}

impl NodeScale {
	/// Non-`view` coordinate systems draw symbols at their nominal size.
	pub const UNIT: NodeScale = NodeScale {
		visual: 1.0,
		local: 1.0,
	};

	/// `visual = (zoom - 1) * ratio + 1`, divided by the group scale so that the
	/// group transform does not scale symbols a second time.
	pub fn compute(zoom: f64, group_scale: f64, ratio: f64) -> Self {
		let visual = (zoom - 1.0) * ratio + 1.0;
		let local = if group_scale > 0.0 {
			visual / group_scale
		} else {
			visual
		};
		Self { visual, local }
	}
}

/// Stroke and label scaling configuration.
#[derive(Clone, Debug)]
pub struct StyleScale {
	/// Edge line width in screen pixels.
	pub edge_width: f64,
	/// How edge width follows the zoom.
	pub edge_behavior: ScaleBehavior,
	/// Label font size in screen pixels.
	pub label_size: f64,
	/// Labels stop shrinking below this group zoom.
	pub label_min_k: f64,
	/// Minimum pick radius for nodes, in screen pixels.
	pub hit_min_screen: f64,
	/// Hover ring width in screen pixels.
	pub ring_width: f64,
	/// Gap between symbol and hover ring, in screen pixels.
	pub ring_offset: f64,
}

impl Default for StyleScale {
	fn default() -> Self {
		Self {
			edge_width: 1.5,
			edge_behavior: ScaleBehavior::Screen,
			label_size: 11.0,
			label_min_k: 0.5,
			hit_min_screen: 6.0,
			ring_width: 1.5,
			ring_offset: 2.0,
		}
	}
}

/// Style values for one group zoom level, in data-space.
///
/// Create this once per frame and pass it to the drawing functions.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Group zoom these values were computed for.
	pub k: f64,
	/// Edge line width.
	pub edge_width: f64,
	/// Label font size.
	pub label_px: f64,
	/// CSS font for labels.
	pub label_font: String,
	/// Hover ring width.
	pub ring_width: f64,
	/// Hover ring gap.
	pub ring_offset: f64,
}

impl ScaledValues {
	/// Values for group zoom `k`.
	pub fn new(config: &StyleScale, k: f64) -> Self {
		let label_px = config.label_size / k.max(config.label_min_k);
		Self {
			k,
			edge_width: config.edge_behavior.apply(config.edge_width, k),
			label_px,
			label_font: format!("{}px sans-serif", label_px),
			ring_width: config.ring_width / k,
			ring_offset: config.ring_offset / k,
		}
	}

	/// Pick radius for a symbol of data-space `radius`.
	pub fn hit_radius(&self, config: &StyleScale, radius: f64) -> f64 {
		ScaleBehavior::Clamped {
			min_screen: config.hit_min_screen,
			max_screen: f64::INFINITY,
		}
		.apply(radius, self.k)
	}
}
