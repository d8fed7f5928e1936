//! graph-view: interactive graph diagrams with force, circular and manual
//! layouts, pan/zoom and node dragging.
//!
//! This crate provides a WASM-based canvas component that renders a graph
//! document embedded in the page, plus the headless view controller it is
//! built on.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

/// Leptos components.
pub mod components;

pub use components::graph_view::{
	GraphData, GraphLink, GraphNode, GraphView, GraphViewCanvas, SeriesOptions, Theme,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("graph-view: logging initialized");
}

/// Parse a graph document: `{ nodes: [...], links: [...], options: {...} }`.
pub fn parse_graph_data(json: &str) -> Result<GraphData, serde_json::Error> {
	serde_json::from_str(json)
}

/// Load graph data from a script element with id="graph-data".
fn load_graph_data() -> Option<GraphData> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("graph-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match parse_graph_data(&json_text) {
		Ok(data) => {
			info!(
				"graph-view: loaded {} nodes, {} links ({:?} layout)",
				data.nodes.len(),
				data.links.len(),
				data.options.layout
			);
			Some(data)
		}
		Err(e) => {
			warn!("graph-view: failed to parse graph data: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads graph data from DOM and renders the graph view.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data().unwrap_or_default();
	let graph_signal = Signal::derive(move || graph_data.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Graph View" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<GraphViewCanvas data=graph_signal fullscreen=true />
			<div class="graph-overlay">
				<h1>"Graph View"</h1>
				<p class="subtitle">"Drag nodes to reposition. Scroll to zoom. Drag background to pan."</p>
			</div>
		</div>
	}
}
