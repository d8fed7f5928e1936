//! Geometry primitives and the `view` coordinate system.
//!
//! The graph lives in data space. A [`View`] maps that space onto the canvas
//! by fitting the data extent into the viewport and then applying the roam
//! (pan offset and zoom). Any other coordinate system is represented by
//! [`CoordSys::Other`] and renders statically with roam disabled.

use serde::{Deserialize, Serialize};

/// A 2D point in either data or screen space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate, growing downwards.
	pub y: f64,
}

impl Point {
	/// Point at `(x, y)`.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean distance to `other`.
	pub fn distance(self, other: Point) -> f64 {
		((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
	}

	/// Whether both coordinates are finite.
	pub fn is_finite(self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}
}

/// Axis-aligned rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
	/// Left edge.
	pub x: f64,
	/// Top edge.
	pub y: f64,
	/// Horizontal extent.
	pub width: f64,
	/// Vertical extent.
	pub height: f64,
}

impl Rect {
	/// Rectangle from its top-left corner and size.
	pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
		Self {
			x,
			y,
			width,
			height,
		}
	}

	/// Smallest rectangle containing every point, `None` for an empty iterator.
	pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
		let mut iter = points.into_iter();
		let first = iter.next()?;
		let (mut min, mut max) = (first, first);
		for p in iter {
			min.x = min.x.min(p.x);
			min.y = min.y.min(p.y);
			max.x = max.x.max(p.x);
			max.y = max.y.max(p.y);
		}
		Some(Self::new(min.x, min.y, max.x - min.x, max.y - min.y))
	}

	/// Midpoint of the rectangle.
	pub fn center(&self) -> Point {
		Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
	}

	/// Whether `p` lies inside or on the border.
	pub fn contains(&self, p: Point) -> bool {
		p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
	}

	/// Grow the rectangle by `margin` on every side.
	pub fn inflate(&self, margin: f64) -> Self {
		Self::new(
			self.x - margin,
			self.y - margin,
			self.width + 2.0 * margin,
			self.height + 2.0 * margin,
		)
	}

	/// Map the rectangle through a scale-and-translate transform.
	pub fn transformed(&self, t: &Transform) -> Self {
		let a = t.apply(Point::new(self.x, self.y));
		let b = t.apply(Point::new(self.x + self.width, self.y + self.height));
		Self::new(a.x.min(b.x), a.y.min(b.y), (b.x - a.x).abs(), (b.y - a.y).abs())
	}
}

/// Scale-then-translate transform: `screen = local * scale + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
	/// Horizontal translation.
	pub x: f64,
	/// Vertical translation.
	pub y: f64,
	/// Horizontal scale factor.
	pub scale_x: f64,
	/// Vertical scale factor.
	pub scale_y: f64,
}

impl Default for Transform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

impl Transform {
	/// No translation, unit scale.
	pub const IDENTITY: Transform = Transform {
		x: 0.0,
		y: 0.0,
		scale_x: 1.0,
		scale_y: 1.0,
	};

	/// Map a local point to screen space.
	pub fn apply(&self, p: Point) -> Point {
		Point::new(p.x * self.scale_x + self.x, p.y * self.scale_y + self.y)
	}

	/// Map a screen point back to local space.
	pub fn invert(&self, p: Point) -> Point {
		Point::new((p.x - self.x) / self.scale_x, (p.y - self.y) / self.scale_y)
	}

	/// Zoom by `factor` keeping the screen point `origin` fixed.
	pub fn zoom_about(&mut self, factor: f64, origin: Point) {
		self.x = origin.x - (origin.x - self.x) * factor;
		self.y = origin.y - (origin.y - self.y) * factor;
		self.scale_x *= factor;
		self.scale_y *= factor;
	}

	/// Component-wise interpolation towards `other`; `t = 1` reaches it.
	pub fn lerp(&self, other: &Transform, t: f64) -> Transform {
		let mix = |a: f64, b: f64| a + (b - a) * t;
		Transform {
			x: mix(self.x, other.x),
			y: mix(self.y, other.y),
			scale_x: mix(self.scale_x, other.scale_x),
			scale_y: mix(self.scale_y, other.scale_y),
		}
	}
}

/// Optional zoom bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScaleLimit {
	/// Smallest allowed zoom.
	pub min: Option<f64>,
	/// Largest allowed zoom.
	pub max: Option<f64>,
}

impl ScaleLimit {
	/// Clamp `zoom` into the bounds that are set.
	pub fn clamp(&self, zoom: f64) -> f64 {
		let zoom = self.min.map_or(zoom, |min| zoom.max(min));
		self.max.map_or(zoom, |max| zoom.min(max))
	}
}

/// The `view` coordinate system: fits `data_rect` into `viewport`, then
/// applies zoom and pan.
#[derive(Clone, Debug, PartialEq)]
pub struct View {
	/// Screen area the series is drawn into.
	pub viewport: Rect,
	/// Data extent fitted into the viewport.
	pub data_rect: Rect,
	/// Roam zoom on top of the fit.
	pub zoom: f64,
	/// Screen-space offset added after zooming.
	pub offset: Point,
	/// Bounds for `zoom`.
	pub scale_limit: ScaleLimit,
}

impl View {
	/// Unzoomed, unpanned view of `data_rect`.
	pub fn new(viewport: Rect, data_rect: Rect) -> Self {
		Self {
			viewport,
			data_rect,
			zoom: 1.0,
			offset: Point::default(),
			scale_limit: ScaleLimit::default(),
		}
	}

	/// Aspect-preserving fit of the data extent into the viewport, before roam.
	fn base_transform(&self) -> Transform {
		let (dw, dh) = (self.data_rect.width, self.data_rect.height);
		let sx = if dw > 0.0 { self.viewport.width / dw } else { f64::INFINITY };
		let sy = if dh > 0.0 { self.viewport.height / dh } else { f64::INFINITY };
		let mut s = sx.min(sy);
		if !s.is_finite() || s <= 0.0 {
			s = 1.0;
		}
		let data_center = self.data_rect.center();
		let view_center = self.viewport.center();
		Transform {
			x: view_center.x - data_center.x * s,
			y: view_center.y - data_center.y * s,
			scale_x: s,
			scale_y: s,
		}
	}

	/// Data → screen transform including roam.
	pub fn transform(&self) -> Transform {
		let base = self.base_transform();
		Transform {
			x: base.x * self.zoom + self.offset.x,
			y: base.y * self.zoom + self.offset.y,
			scale_x: base.scale_x * self.zoom,
			scale_y: base.scale_y * self.zoom,
		}
	}

	/// Current roam zoom.
	pub fn zoom(&self) -> f64 {
		self.zoom
	}

	/// Screen point to data space.
	pub fn point_to_data(&self, p: Point) -> Point {
		self.transform().invert(p)
	}

	/// Shift the offset by a screen-space delta.
	pub fn pan(&mut self, dx: f64, dy: f64) {
		self.offset.x += dx;
		self.offset.y += dy;
	}

	/// Multiply zoom by `factor` (clamped) around the screen point `origin`.
	pub fn zoom_by(&mut self, factor: f64, origin: Point) {
		let new_zoom = self.scale_limit.clamp(self.zoom * factor);
		let applied = new_zoom / self.zoom;
		self.offset.x = origin.x - (origin.x - self.offset.x) * applied;
		self.offset.y = origin.y - (origin.y - self.offset.y) * applied;
		self.zoom = new_zoom;
	}
}

/// Coordinate system the series is laid out in.
#[derive(Clone, Debug, PartialEq)]
pub enum CoordSys {
	/// The `view` system, which supports roam.
	View(View),
	/// Any non-`view` system; roam is disabled and the group is left alone.
	Other,
}

impl CoordSys {
	/// The view, if this is the `view` system.
	pub fn as_view(&self) -> Option<&View> {
		match self {
			CoordSys::View(view) => Some(view),
			CoordSys::Other => None,
		}
	}

	/// Mutable access to the view, if any.
	pub fn as_view_mut(&mut self) -> Option<&mut View> {
		match self {
			CoordSys::View(view) => Some(view),
			CoordSys::Other => None,
		}
	}
}
