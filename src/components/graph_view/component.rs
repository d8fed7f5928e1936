//! Leptos component hosting a [`GraphView`] on a canvas.
//!
//! The component is the view's surrounding system: it builds the series from
//! the graph data, queues the roam intents the view dispatches and applies them
//! to the series on the next animation frame, re-rendering after a pan. An
//! animation loop runs via `requestAnimationFrame`, advancing tweens and
//! drawing each frame; the force simulation runs on its own `setTimeout` chain.

use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::coord::{Point, Rect};
use super::graph::NodeId;
use super::highlight::Hovered;
use super::render;
use super::roam::{RoamAction, ViewHost};
use super::scheduler::{SimState, WindowScheduler};
use super::series::{GraphSeries, SeriesHandle};
use super::theme::Theme;
use super::types::GraphData;
use super::view::GraphView;

/// Longest frame delta fed to the tweens, in milliseconds.
const MAX_FRAME_MS: f64 = 100.0;

/// Queues what the view reports until the next animation frame.
#[derive(Default)]
struct CanvasHost {
	actions: RefCell<VecDeque<RoamAction>>,
	labels_dirty: Cell<bool>,
}

impl CanvasHost {
	fn take_actions(&self) -> Vec<RoamAction> {
		self.actions.borrow_mut().drain(..).collect()
	}
}

impl ViewHost for CanvasHost {
	fn dispatch_action(&self, action: RoamAction) {
		self.actions.borrow_mut().push_back(action);
	}

	fn update_label_layout(&self) {
		self.labels_dirty.set(true);
	}
}

/// Everything the event handlers and the frame loop share.
struct GraphContext {
	view: GraphView,
	series: SeriesHandle,
	host: Rc<CanvasHost>,
	theme: Theme,
	labels: HashSet<NodeId>,
	width: f64,
	height: f64,
	last_frame: f64,
}

impl GraphContext {
	/// Apply queued roam intents, advance animations and draw.
	fn frame(&mut self, ctx: &CanvasRenderingContext2d) {
		let now = js_sys::Date::now();
		let dt = (now - self.last_frame).clamp(0.0, MAX_FRAME_MS);
		self.last_frame = now;

		let mut rerender = false;
		for action in self.host.take_actions() {
			let applied = self.series.borrow_mut().apply_roam(&action);
			rerender |= applied && action.is_pan();
		}
		if rerender {
			self.view.render(&self.series);
		}

		let animating = self.view.advance(dt);
		let moving = self.view.simulation_state() == SimState::Stepping || self.view.is_group_animating();
		if self.host.labels_dirty.replace(false) || rerender || moving || animating {
			self.labels = self.view.with_scene(render::layout_labels);
		}

		let (width, height, theme, labels) = (self.width, self.height, &self.theme, &self.labels);
		self.view
			.with_scene(|scene| render::render(scene, ctx, width, height, theme, labels));
	}

	fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.series
			.borrow_mut()
			.set_viewport(Rect::new(0.0, 0.0, width, height));
		self.view.render(&self.series);
		self.host.labels_dirty.set(true);
	}
}

fn build_series(data: &GraphData, width: f64, height: f64) -> SeriesHandle {
	let viewport = Rect::new(0.0, 0.0, width, height);
	match GraphSeries::from_data(data, viewport) {
		Ok(series) => series.into_handle(),
		Err(e) => {
			warn!("graph-view: invalid graph data: {}", e);
			GraphSeries::empty(viewport).into_handle()
		}
	}
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn canvas_point(canvas: Option<HtmlCanvasElement>, ev: &MouseEvent) -> Option<Point> {
	let canvas = canvas?;
	let rect = canvas.get_bounding_client_rect();
	Some(Point::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn set_cursor(canvas: Option<HtmlCanvasElement>, cursor: &str) {
	if let Some(canvas) = canvas {
		// leptos' `ElementExt::style` shadows the DOM getter.
		let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor);
	}
}

/// Dispose the view, cancelling its simulation, and drop the resize
/// listener once the canvas has left the document.
fn unmount(
	context: &Rc<RefCell<Option<GraphContext>>>,
	resize_cb: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
) {
	if let Some(c) = context.borrow_mut().take() {
		c.view.dispose();
	}
	let listener = resize_cb.borrow_mut().take();
	if let (Some(cb), Some(window)) = (listener, web_sys::window()) {
		let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
	}
	info!("graph-view: canvas detached, view disposed");
}

/// Renders an interactive graph view on a canvas element.
///
/// Pass graph data via the reactive `data` signal; a new value rebuilds the
/// series and re-renders the same view. The component sizes itself to its
/// parent container by default; set `fullscreen = true` to fill the viewport
/// and resize automatically with the window. Explicit `width`/`height`
/// override automatic sizing.
#[component]
pub fn GraphViewCanvas(
	/// Graph document to show.
	#[prop(into)] data: Signal<GraphData>,
	/// Fill the window and follow its size.
	#[prop(default = false)] fullscreen: bool,
	/// Fixed width in pixels.
	#[prop(default = None)] width: Option<f64>,
	/// Fixed height in pixels.
	#[prop(default = None)] height: Option<f64>,
	/// Visual theme; the default theme when unset.
	#[prop(optional)] theme: Option<Theme>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let graph_data = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		// Later data changes re-render the existing view.
		if let Some(c) = context_init.borrow_mut().as_mut() {
			c.series = build_series(&graph_data, c.width, c.height);
			c.view.render(&c.series);
			c.host.labels_dirty.set(true);
			return;
		}

		let Some(window) = web_sys::window() else {
			warn!("graph-view: no window, not mounting");
			return;
		};
		let parent_size = |f: fn(&web_sys::Element) -> i32, fallback: f64| {
			canvas.parent_element().map(|p| f(&p) as f64).unwrap_or(fallback)
		};
		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| parent_size(web_sys::Element::client_width, 800.0)),
				height.unwrap_or_else(|| parent_size(web_sys::Element::client_height, 600.0)),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					warn!("graph-view: 2d context has an unexpected type");
					return;
				}
			},
			_ => {
				warn!("graph-view: canvas has no 2d context");
				return;
			}
		};

		let host = Rc::new(CanvasHost::default());
		let view = GraphView::init(host.clone(), Rc::new(WindowScheduler::new()));
		let series = build_series(&graph_data, w, h);
		view.render(&series);
		let labels = view.with_scene(render::layout_labels);
		info!("graph-view: mounted {}x{} canvas", w, h);

		*context_init.borrow_mut() = Some(GraphContext {
			view,
			series,
			host,
			theme: theme.clone().unwrap_or_default(),
			labels,
			width: w,
			height: h,
			last_frame: js_sys::Date::now(),
		});

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(c) = context_resize.borrow_mut().as_mut() {
					c.resize(nw, nh);
				}
			}));
			if let Some(cb) = resize_cb_init.borrow().as_ref() {
				let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		let (canvas_anim, resize_anim) = (canvas.clone(), resize_cb_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			// Unmounted: tear down and stop re-arming.
			if !canvas_anim.is_connected() {
				unmount(&context_anim, &resize_anim);
				return;
			}
			if let Some(c) = context_anim.borrow_mut().as_mut() {
				c.frame(&ctx);
			}
			if let (Some(cb), Some(window)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(cb) = animate_init.borrow().as_ref() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(p) = canvas_point(canvas_ref.get().map(Into::into), &ev) else {
			return;
		};
		if let Some(c) = context_md.borrow().as_ref() {
			let dragging = c.view.node_at(p).is_some_and(|node| c.view.drag_start(node, p));
			if dragging {
				set_cursor(canvas_ref.get().map(Into::into), "grabbing");
			} else if c.view.roam_pointer_down(p) {
				set_cursor(canvas_ref.get().map(Into::into), "grabbing");
			}
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(p) = canvas_point(canvas_ref.get().map(Into::into), &ev) else {
			return;
		};
		if let Some(c) = context_mm.borrow().as_ref() {
			if c.view.is_dragging() {
				c.view.drag_move(p);
			} else if c.view.is_panning() {
				c.view.roam_pointer_move(p);
			} else {
				let cursor = match c.view.hover(p) {
					Some(Hovered::Node(node)) => c
						.view
						.node_sprite(node)
						.and_then(|s| s.drag)
						.map(|binding| binding.cursor.unwrap_or_else(|| "pointer".to_string()))
						.unwrap_or_else(|| "default".to_string()),
					Some(Hovered::Edge(_)) => "pointer".to_string(),
					None => "grab".to_string(),
				};
				set_cursor(canvas_ref.get().map(Into::into), &cursor);
			}
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(c) = context_mu.borrow().as_ref() {
			c.view.drag_end();
			c.view.roam_pointer_up();
		}
		set_cursor(canvas_ref.get().map(Into::into), "grab");
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(c) = context_ml.borrow().as_ref() {
			c.view.drag_end();
			c.view.roam_pointer_up();
			c.view.clear_hover();
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(p) = canvas_point(canvas_ref.get().map(Into::into), &ev) else {
			return;
		};
		if let Some(c) = context_wh.borrow().as_ref() {
			c.view.roam_wheel(ev.delta_y(), p);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="graph-view-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
