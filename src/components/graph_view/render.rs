//! Canvas rendering of the graph view's sprites.
//!
//! Rendering uses multiple passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Edge lines (data space, under the root group transform)
//! 3. Non-highlighted nodes, then highlighted nodes and their labels on top
//!
//! Which labels are drawn is decided separately by [`layout_labels`], which the
//! host re-runs only when asked for a label-layout refresh.

use std::collections::HashSet;
use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::coord::{Point, Rect, Transform};
use super::graph::NodeId;
use super::layout::LabelSide;
use super::scale::ScaledValues;
use super::sync::NodeSprite;
use super::theme::{Color, Theme};
use super::view::Scene;

/// Gap between a symbol and its label, in screen pixels.
const LABEL_GAP: f64 = 4.0;
/// Average glyph width relative to the font size.
const GLYPH_WIDTH: f64 = 0.6;

fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// Screen-space box a node's label occupies, ignoring rotation.
fn label_box(sprite: &NodeSprite, t: &Transform, font_px: f64) -> Option<Rect> {
	let label = sprite.label.as_deref()?;
	let center = t.apply(sprite.position);
	let radius = sprite.radius() * t.scale_x;
	let width = label.chars().count() as f64 * font_px * GLYPH_WIDTH;
	let x = match sprite.label_placement.side {
		LabelSide::Right => center.x + radius + LABEL_GAP,
		LabelSide::Left => center.x - radius - LABEL_GAP - width,
	};
	Some(Rect::new(x, center.y - font_px / 2.0, width, font_px))
}

fn overlaps(a: &Rect, b: &Rect) -> bool {
	a.x < b.x + b.width && b.x < a.x + a.width && a.y < b.y + b.height && b.y < a.y + a.height
}

/// Pick the labels to draw: larger symbols first, skipping any label that
/// would overlap one already placed.
pub fn layout_labels(scene: &Scene<'_>) -> HashSet<NodeId> {
	let font_px = scene.style.label_size;
	let mut sprites: Vec<&NodeSprite> = scene.sync.node_sprites().filter(|s| s.label.is_some()).collect();
	sprites.sort_by(|a, b| b.radius().total_cmp(&a.radius()).then(a.node.cmp(&b.node)));

	let mut placed: Vec<Rect> = Vec::new();
	let mut visible = HashSet::new();
	for sprite in sprites {
		let Some(rect) = label_box(sprite, &scene.transform, font_px) else {
			continue;
		};
		if placed.iter().any(|p| overlaps(p, &rect)) {
			continue;
		}
		placed.push(rect);
		visible.insert(sprite.node);
	}
	visible
}

/// Renders the complete scene to the canvas.
pub fn render(
	scene: &Scene<'_>,
	ctx: &CanvasRenderingContext2d,
	width: f64,
	height: f64,
	theme: &Theme,
	labels: &HashSet<NodeId>,
) {
	let t = scene.transform;
	let scaled = ScaledValues::new(scene.style, t.scale_x);

	draw_background(ctx, width, height, theme);

	ctx.save();
	let _ = ctx.translate(t.x, t.y);
	let _ = ctx.scale(t.scale_x, t.scale_y);

	draw_edges(scene, ctx, &scaled, theme);
	draw_nodes(scene, ctx, &scaled, theme, labels);

	ctx.restore();
}

fn draw_background(ctx: &CanvasRenderingContext2d, width: f64, height: f64, theme: &Theme) {
	let bg = &theme.background;
	let gradient = bg
		.use_gradient
		.then(|| {
			ctx.create_radial_gradient(
				width / 2.0,
				height / 2.0,
				0.0,
				width / 2.0,
				height / 2.0,
				width.max(height) * 0.8,
			)
			.ok()
		})
		.flatten();

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &bg.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &bg.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&bg.color.to_css()),
	}
	ctx.fill_rect(0.0, 0.0, width, height);
}

fn draw_edges(scene: &Scene<'_>, ctx: &CanvasRenderingContext2d, scaled: &ScaledValues, theme: &Theme) {
	let max_t = smooth_step(scene.highlight.max_intensity());

	for sprite in scene.sync.edge_sprites() {
		let edge_t = smooth_step(scene.highlight.edge_intensity(sprite.edge));
		let (color, width) = if edge_t > 0.01 {
			(
				theme.edge.color.lerp(theme.edge.highlight_color, edge_t),
				scaled.edge_width * (1.0 + 0.5 * edge_t),
			)
		} else if max_t > 0.01 {
			let dimmed = theme.edge.color.a * (1.0 - 0.6 * max_t);
			(theme.edge.color.with_alpha(dimmed), scaled.edge_width)
		} else {
			(theme.edge.color, scaled.edge_width)
		};

		ctx.set_stroke_style_str(&color.to_css());
		ctx.set_line_width(width);
		ctx.begin_path();
		if sprite.source == sprite.target {
			// self-loop: small circle touching the node
			let r = width * 6.0;
			let _ = ctx.arc(sprite.from.x, sprite.from.y - r, r, 0.0, 2.0 * PI);
		} else {
			ctx.move_to(sprite.from.x, sprite.from.y);
			ctx.line_to(sprite.to.x, sprite.to.y);
		}
		ctx.stroke();
	}
}

fn draw_nodes(
	scene: &Scene<'_>,
	ctx: &CanvasRenderingContext2d,
	scaled: &ScaledValues,
	theme: &Theme,
	labels: &HashSet<NodeId>,
) {
	let max_t = smooth_step(scene.highlight.max_intensity());
	let has_highlight = max_t > 0.01;
	let (dim_alpha, dim_radius) = if has_highlight {
		(1.0 - 0.7 * max_t, 1.0 - 0.15 * max_t)
	} else {
		(1.0, 1.0)
	};

	// Pass 1: non-highlighted nodes
	for sprite in scene.sync.node_sprites() {
		if scene.highlight.node_intensity(sprite.node) > 0.001 {
			continue;
		}
		draw_node(ctx, sprite, scaled, theme, dim_alpha, dim_radius);
		if labels.contains(&sprite.node) && dim_alpha > 0.5 {
			draw_label(ctx, sprite, scaled, theme, dim_alpha * 0.8, dim_radius);
		}
	}

	// Pass 2: highlighted and transitioning nodes on top
	for sprite in scene.sync.node_sprites() {
		let node_t = scene.highlight.node_intensity(sprite.node);
		if node_t <= 0.001 {
			continue;
		}
		let eased = smooth_step(node_t);
		let ring_t = smooth_step(scene.highlight.ring_intensity(sprite.node));
		let target_radius = 1.0 + 0.25 * eased + 0.15 * eased * ring_t;
		let alpha = dim_alpha + (1.0 - dim_alpha) * eased;
		let radius_mult = dim_radius + (target_radius - dim_radius) * eased;

		draw_node(ctx, sprite, scaled, theme, alpha, radius_mult);

		if ring_t > 0.01 {
			let Point { x, y } = sprite.position;
			let radius = sprite.radius() * radius_mult;
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + scaled.ring_offset, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&theme.node.ring_color.with_alpha(0.8 * ring_t).to_css());
			ctx.set_line_width(scaled.ring_width);
			ctx.stroke();
		}

		// emphasised nodes always show their label
		draw_label(ctx, sprite, scaled, theme, 0.95 * alpha, radius_mult);
	}
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	sprite: &NodeSprite,
	scaled: &ScaledValues,
	theme: &Theme,
	alpha: f64,
	radius_mult: f64,
) {
	let Point { x, y } = sprite.position;
	let radius = sprite.radius() * radius_mult;
	if radius <= 0.0 {
		return;
	}
	let base = theme.node_color(sprite.color.as_deref(), sprite.group.as_deref(), sprite.node.0);

	ctx.set_global_alpha(alpha);

	let gradient = theme
		.node
		.use_gradient
		.then(|| {
			ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
				.ok()
		})
		.flatten();

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &base.lighten(0.4).to_css());
			let _ = gradient.add_color_stop(0.7, &base.to_css());
			let _ = gradient.add_color_stop(1.0, &base.darken(0.2).to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&base.to_css()),
	}
	ctx.fill();

	if theme.node.border_width > 0.0 {
		ctx.set_stroke_style_str(&theme.node.border_color.to_css());
		ctx.set_line_width(theme.node.border_width / scaled.k);
		ctx.stroke();
	}

	ctx.set_global_alpha(1.0);
}

fn draw_label(
	ctx: &CanvasRenderingContext2d,
	sprite: &NodeSprite,
	scaled: &ScaledValues,
	theme: &Theme,
	alpha: f64,
	radius_mult: f64,
) {
	let Some(label) = &sprite.label else {
		return;
	};
	let placement = sprite.label_placement;
	let offset = sprite.radius() * radius_mult + LABEL_GAP / scaled.k;
	let color: Color = theme.label.color;

	ctx.save();
	let _ = ctx.translate(sprite.position.x, sprite.position.y);
	let _ = ctx.rotate(placement.rotation);
	ctx.set_global_alpha(alpha);
	ctx.set_fill_style_str(&color.to_css());
	ctx.set_font(&scaled.label_font);
	ctx.set_text_baseline("middle");
	let x = match placement.side {
		LabelSide::Right => {
			ctx.set_text_align("left");
			offset
		}
		LabelSide::Left => {
			ctx.set_text_align("right");
			-offset
		}
	};
	let _ = ctx.fill_text(label, x, 0.0);
	ctx.restore();
}
