//! Pan/zoom interaction: gesture recognition, roam state and roam intents.
//!
//! The controller turns raw pointer and wheel input into [`RoamGesture`]s,
//! but only for input the view's pointer check accepts (inside the graph's
//! screen bounding box and not on an irrelevant element). The view reacts to
//! a gesture by updating its [`RoamState`] and dispatching a [`RoamAction`]
//! to the [`ViewHost`], which applies it to the coordinate system later.

use serde::Serialize;

use super::coord::{Point, ScaleLimit, Transform};
use super::types::RoamMode;

/// Zoom factor of one wheel notch.
const WHEEL_ZOOM_STEP: f64 = 1.1;

/// A recognised roam gesture, in screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RoamGesture {
	/// Pointer drag by a screen-space delta.
	Pan {
		/// Horizontal delta.
		dx: f64,
		/// Vertical delta.
		dy: f64,
		/// Pointer x after the move.
		origin_x: f64,
		/// Pointer y after the move.
		origin_y: f64,
	},
	/// Wheel zoom about a screen point.
	Zoom {
		/// Zoom factor to apply.
		scale: f64,
		/// Screen x kept fixed.
		origin_x: f64,
		/// Screen y kept fixed.
		origin_y: f64,
	},
}

/// Roam intent dispatched to the surrounding system.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoamAction {
	/// Always [`RoamAction::TYPE`].
	#[serde(rename = "type")]
	pub kind: &'static str,
	/// Series the intent is addressed to.
	pub series_id: String,
	/// Pan delta x.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub dx: Option<f64>,
	/// Pan delta y.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub dy: Option<f64>,
	/// Zoom factor.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub zoom: Option<f64>,
	/// Zoom origin x.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub origin_x: Option<f64>,
	/// Zoom origin y.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub origin_y: Option<f64>,
}

impl RoamAction {
	/// Action type tag.
	pub const TYPE: &'static str = "graphRoam";

	/// Pan intent.
	pub fn pan(series_id: &str, dx: f64, dy: f64) -> Self {
		Self {
			kind: Self::TYPE,
			series_id: series_id.to_string(),
			dx: Some(dx),
			dy: Some(dy),
			zoom: None,
			origin_x: None,
			origin_y: None,
		}
	}

	/// Zoom intent about a screen point.
	pub fn zoom(series_id: &str, zoom: f64, origin_x: f64, origin_y: f64) -> Self {
		Self {
			kind: Self::TYPE,
			series_id: series_id.to_string(),
			dx: None,
			dy: None,
			zoom: Some(zoom),
			origin_x: Some(origin_x),
			origin_y: Some(origin_y),
		}
	}

	/// Whether this is a pan rather than a zoom.
	pub fn is_pan(&self) -> bool {
		self.dx.is_some() || self.dy.is_some()
	}
}

/// The surrounding system the view reports to.
///
/// Calls are made while the view is mid-update; implementations must queue
/// work rather than call back into the view synchronously.
pub trait ViewHost {
	/// Queue a roam intent for asynchronous handling.
	fn dispatch_action(&self, action: RoamAction);
	/// Ask for labels to be laid out again without re-rendering.
	fn update_label_layout(&self);
	/// Whether the screen point lands on an element that should not roam.
	fn is_irrelevant(&self, _x: f64, _y: f64) -> bool {
		false
	}
}

/// Roam the view has applied ahead of the host, mirroring the coordinate
/// system's zoom and pan offset until the next render resyncs it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoamState {
	/// Accumulated zoom factor.
	pub zoom: f64,
	/// Bounds for [`RoamState::zoom`].
	pub zoom_limit: ScaleLimit,
	/// Screen-space pan offset.
	pub offset: Point,
}

impl Default for RoamState {
	fn default() -> Self {
		Self {
			zoom: 1.0,
			zoom_limit: ScaleLimit::default(),
			offset: Point::default(),
		}
	}
}

impl RoamState {
	/// Shift the offset and the group by the pan delta.
	pub fn apply_pan(&mut self, target: &mut Transform, dx: f64, dy: f64) {
		self.offset.x += dx;
		self.offset.y += dy;
		target.x += dx;
		target.y += dy;
	}

	/// Multiply the zoom by `delta` within the limits, zooming the group and
	/// the offset about the screen origin by the factor actually applied.
	pub fn apply_zoom(&mut self, target: &mut Transform, delta: f64, origin: Point) {
		let new_zoom = self.zoom_limit.clamp(self.zoom * delta);
		let applied = new_zoom / self.zoom;
		self.zoom = new_zoom;
		self.offset.x = origin.x - (origin.x - self.offset.x) * applied;
		self.offset.y = origin.y - (origin.y - self.offset.y) * applied;
		target.zoom_about(applied, origin);
	}
}

/// Turns pointer input into roam gestures.
#[derive(Clone, Debug, Default)]
pub struct RoamController {
	mode: Option<RoamMode>,
	last_pointer: Option<Point>,
}

impl RoamController {
	/// Accept gestures allowed by `mode`.
	pub fn enable(&mut self, mode: RoamMode) {
		self.mode = Some(mode);
	}

	/// Ignore all input and drop any pan in progress.
	pub fn disable(&mut self) {
		self.mode = None;
		self.last_pointer = None;
	}

	/// Enabled mode, `None` when disabled.
	pub fn mode(&self) -> Option<RoamMode> {
		self.mode
	}

	/// Whether a pan is in progress.
	pub fn is_panning(&self) -> bool {
		self.last_pointer.is_some()
	}

	/// Start a pan if enabled and `in_scope` accepts the point.
	pub fn pointer_down(&mut self, x: f64, y: f64, in_scope: impl Fn(f64, f64) -> bool) -> bool {
		let allowed = self.mode.is_some_and(RoamMode::allows_pan);
		if allowed && in_scope(x, y) {
			self.last_pointer = Some(Point::new(x, y));
			true
		} else {
			false
		}
	}

	/// Pan gesture for a move to `(x, y)`, if panning.
	pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<RoamGesture> {
		let last = self.last_pointer?;
		self.last_pointer = Some(Point::new(x, y));
		let (dx, dy) = (x - last.x, y - last.y);
		if dx == 0.0 && dy == 0.0 {
			return None;
		}
		Some(RoamGesture::Pan {
			dx,
			dy,
			origin_x: x,
			origin_y: y,
		})
	}

	/// End any pan.
	pub fn pointer_up(&mut self) {
		self.last_pointer = None;
	}

	/// One wheel notch: zoom in for negative `delta_y`, out otherwise.
	pub fn wheel(
		&self,
		delta_y: f64,
		x: f64,
		y: f64,
		in_scope: impl Fn(f64, f64) -> bool,
	) -> Option<RoamGesture> {
		let allowed = self.mode.is_some_and(RoamMode::allows_zoom);
		if !allowed || delta_y == 0.0 || !in_scope(x, y) {
			return None;
		}
		let scale = if delta_y > 0.0 {
			1.0 / WHEEL_ZOOM_STEP
		} else {
			WHEEL_ZOOM_STEP
		};
		Some(RoamGesture::Zoom {
			scale,
			origin_x: x,
			origin_y: y,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn pan_gesture_reports_deltas() {
		let mut roam = RoamController::default();
		roam.enable(RoamMode::Both);
		assert!(roam.pointer_down(10.0, 10.0, |_, _| true));
		assert_eq!(
			roam.pointer_move(15.0, 7.0),
			Some(RoamGesture::Pan {
				dx: 5.0,
				dy: -3.0,
				origin_x: 15.0,
				origin_y: 7.0
			})
		);
		roam.pointer_up();
		assert_eq!(roam.pointer_move(20.0, 20.0), None);
	}

	#[test]
	fn out_of_scope_and_disabled_input_is_ignored() {
		let mut roam = RoamController::default();
		assert!(!roam.pointer_down(0.0, 0.0, |_, _| true));
		roam.enable(RoamMode::Scale);
		assert!(!roam.pointer_down(0.0, 0.0, |_, _| true));
		assert!(roam.wheel(-1.0, 0.0, 0.0, |_, _| false).is_none());
		assert!(roam.wheel(-1.0, 0.0, 0.0, |_, _| true).is_some());
		roam.disable();
		assert!(roam.wheel(-1.0, 0.0, 0.0, |_, _| true).is_none());
	}

	#[test]
	fn zoom_is_clamped_and_keeps_origin() {
		let mut state = RoamState {
			zoom: 1.0,
			zoom_limit: ScaleLimit {
				min: None,
				max: Some(1.5),
			},
			offset: Point::default(),
		};
		let mut t = Transform::IDENTITY;
		state.apply_zoom(&mut t, 2.0, Point::new(100.0, 0.0));
		assert_eq!(state.zoom, 1.5);
		assert_eq!(t.scale_x, 1.5);
		assert_eq!(t.apply(Point::new(100.0, 0.0)).x, 100.0);
	}

	#[test]
	fn pan_accumulates_an_offset_that_zoom_rescales() {
		let mut state = RoamState::default();
		let mut t = Transform::IDENTITY;
		state.apply_pan(&mut t, 10.0, -4.0);
		state.apply_pan(&mut t, 5.0, 0.0);
		assert_eq!(state.offset, Point::new(15.0, -4.0));
		assert_eq!((t.x, t.y), (15.0, -4.0));

		state.apply_zoom(&mut t, 2.0, Point::new(0.0, 0.0));
		assert_eq!(state.offset, Point::new(30.0, -8.0));
		assert_eq!((t.x, t.y), (state.offset.x, state.offset.y));
	}

	#[test]
	fn roam_action_serializes_like_an_intent() {
		let json = serde_json::to_value(RoamAction::pan("g", 1.0, 2.0)).unwrap();
		assert_eq!(
			json,
			serde_json::json!({ "type": "graphRoam", "seriesId": "g", "dx": 1.0, "dy": 2.0 })
		);
		let zoom = RoamAction::zoom("g", 2.0, 5.0, 6.0);
		assert!(!zoom.is_pan());
		let json = serde_json::to_value(zoom).unwrap();
		assert_eq!(json["originX"], 5.0);
	}
}
