//! Visual theming for the graph view.
//!
//! Provides colors, the node palette and the per-element style configuration
//! the canvas renderer reads.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red.
	pub r: u8,
	/// Green.
	pub g: u8,
	/// Blue.
	pub b: u8,
	/// Alpha, 0 to 1.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with alpha.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color, different alpha.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		let up = |c: u8| (c as f64 + (255.0 - c as f64) * f) as u8;
		Self {
			r: up(self.r),
			g: up(self.g),
			b: up(self.b),
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		let down = |c: u8| (c as f64 * f) as u8;
		Self {
			r: down(self.r),
			g: down(self.g),
			b: down(self.b),
			a: self.a,
		}
	}

	/// Mix towards `other`; `t = 1` reaches it.
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		let mix = |a: u8, b: u8| (a as f64 * (1.0 - t) + b as f64 * t) as u8;
		Self {
			r: mix(self.r, other.r),
			g: mix(self.g, other.g),
			b: mix(self.b, other.b),
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	/// CSS color string.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Parse `#rrggbb`, `rgb(r, g, b)` or `rgba(r, g, b, a)`. Anything else,
	/// or a malformed component, comes back as mid gray.
	pub fn parse(css: &str) -> Self {
		const GRAY: u8 = 128;
		let css = css.trim();
		if let Some(hex) = css.strip_prefix('#').filter(|h| h.len() == 6) {
			let channel = |i: usize| {
				hex.get(i..i + 2)
					.and_then(|s| u8::from_str_radix(s, 16).ok())
					.unwrap_or(GRAY)
			};
			return Color::rgb(channel(0), channel(2), channel(4));
		}
		if css.starts_with("rgb") {
			let nums: Vec<&str> = css
				.trim_start_matches("rgba(")
				.trim_start_matches("rgb(")
				.trim_end_matches(')')
				.split(',')
				.map(str::trim)
				.collect();
			let channel = |i: usize| nums.get(i).and_then(|s| s.parse().ok()).unwrap_or(GRAY);
			let alpha = nums.get(3).and_then(|s| s.parse().ok()).unwrap_or(1.0);
			return Color::rgba(channel(0), channel(1), channel(2), alpha);
		}
		Color::rgb(GRAY, GRAY, GRAY)
	}
}

/// A curated color palette for nodes.
#[derive(Clone, Debug)]
pub struct NodePalette {
	/// Colors, cycled by index.
	pub colors: Vec<Color>,
}

impl NodePalette {
	/// Muted slate blues and teals (default)
	pub fn slate() -> Self {
		Self {
			colors: vec![
				Color::rgb(94, 129, 172),
				Color::rgb(129, 161, 193),
				Color::rgb(100, 148, 160),
				Color::rgb(136, 160, 175),
				Color::rgb(108, 142, 173),
				Color::rgb(119, 158, 165),
				Color::rgb(143, 163, 180),
				Color::rgb(122, 153, 168),
			],
		}
	}

	/// Soft pastels for light backgrounds.
	pub fn pastel() -> Self {
		Self {
			colors: vec![
				Color::rgb(200, 180, 190),
				Color::rgb(180, 195, 205),
				Color::rgb(190, 200, 180),
				Color::rgb(205, 195, 180),
				Color::rgb(185, 190, 200),
				Color::rgb(195, 185, 175),
				Color::rgb(180, 200, 195),
				Color::rgb(200, 190, 185),
			],
		}
	}

	/// Color at `index`, wrapping around.
	pub fn get(&self, index: usize) -> Color {
		if self.colors.is_empty() {
			return Color::rgb(128, 128, 128);
		}
		self.colors[index % self.colors.len()]
	}

	/// Stable color for a group name.
	pub fn for_key(&self, key: &str) -> Color {
		let hash = key
			.bytes()
			.fold(0x811c_9dc5_u32, |h, b| (h ^ b as u32).wrapping_mul(0x0100_0193));
		self.get(hash as usize)
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Base fill.
	pub color: Color,
	/// Secondary color for the radial gradient
	pub color_secondary: Color,
	/// Draw a radial gradient instead of a flat fill.
	pub use_gradient: bool,
}

/// Edge visual style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Line color.
	pub color: Color,
	/// Color of emphasised edges.
	pub highlight_color: Color,
}

/// Node visual style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Whether nodes have inner gradients
	pub use_gradient: bool,
	/// Border width in screen pixels (0 = no border)
	pub border_width: f64,
	/// Border color.
	pub border_color: Color,
	/// Hover ring color
	pub ring_color: Color,
}

/// Label text style.
#[derive(Clone, Debug)]
pub struct LabelStyle {
	/// Text color.
	pub color: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Theme name.
	pub name: &'static str,
	/// Canvas background.
	pub background: BackgroundStyle,
	/// Edge lines.
	pub edge: EdgeStyle,
	/// Node symbols.
	pub node: NodeStyle,
	/// Labels.
	pub label: LabelStyle,
	/// Node fill colors.
	pub palette: NodePalette,
}

impl Theme {
	/// Dark theme with gradient nodes (default)
	pub fn default_theme() -> Self {
		Self {
			name: "default",
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
				color_secondary: Color::rgb(30, 35, 42),
				use_gradient: true,
			},
			edge: EdgeStyle {
				color: Color::rgba(140, 160, 180, 0.5),
				highlight_color: Color::rgba(200, 215, 230, 0.9),
			},
			node: NodeStyle {
				use_gradient: true,
				border_width: 0.0,
				border_color: Color::rgba(255, 255, 255, 0.0),
				ring_color: Color::rgb(255, 255, 255),
			},
			label: LabelStyle {
				color: Color::rgba(255, 255, 255, 0.85),
			},
			palette: NodePalette::slate(),
		}
	}

	/// Flat light theme
	pub fn minimal() -> Self {
		Self {
			name: "minimal",
			background: BackgroundStyle {
				color: Color::rgb(245, 245, 242),
				color_secondary: Color::rgb(245, 245, 242),
				use_gradient: false,
			},
			edge: EdgeStyle {
				color: Color::rgba(90, 100, 115, 0.45),
				highlight_color: Color::rgba(40, 50, 65, 0.9),
			},
			node: NodeStyle {
				use_gradient: false,
				border_width: 1.0,
				border_color: Color::rgba(60, 60, 60, 0.6),
				ring_color: Color::rgb(40, 40, 40),
			},
			label: LabelStyle {
				color: Color::rgba(30, 30, 30, 0.9),
			},
			palette: NodePalette::pastel(),
		}
	}

	/// Fill color of a node: explicit CSS color, then its group's palette
	/// color, then the palette by node index.
	pub fn node_color(&self, color: Option<&str>, group: Option<&str>, index: usize) -> Color {
		match (color, group) {
			(Some(css), _) => Color::parse(css),
			(None, Some(group)) => self.palette.for_key(group),
			(None, None) => self.palette.get(index),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}
