//! Interactive graph view: renders a graph series on a canvas with one of
//! three layouts and keeps it in sync with pan, zoom and dragging.
//!
//! - **force**: an iterative simulation stepped frame by frame until it cools
//! - **circular**: nodes share a circle in proportion to size or value
//! - **none**: positions come straight from the data
//!
//! [`GraphView`] is the controller. It owns the drawables ([`RenderSync`]),
//! the simulation loop ([`SimulationScheduler`]), drag sessions and the roam
//! controller, and talks to its surroundings through two seams: a
//! [`ViewHost`] receiving roam intents and label refresh requests, and a
//! [`FrameScheduler`] providing deferred calls. Both are plain traits, so the
//! whole controller runs headless with [`ManualScheduler`].
//!
//! # Example
//!
//! ```ignore
//! use graph_view::{GraphData, GraphViewCanvas};
//!
//! let data: GraphData = serde_json::from_str(r#"{
//!     "nodes": [{ "id": "a" }, { "id": "b" }],
//!     "links": [{ "source": "a", "target": "b" }],
//!     "options": { "layout": "circular" }
//! }"#)?;
//!
//! view! { <GraphViewCanvas data=data fullscreen=true /> }
//! ```

mod circular;
mod component;
/// Geometry and the `view` coordinate system.
pub mod coord;
/// Drag sessions and per-layout drag policies.
pub mod drag;
mod force;
/// Node and edge store.
pub mod graph;
/// Hover emphasis.
pub mod highlight;
/// Layout modes and strategy seams.
pub mod layout;
/// Canvas drawing.
pub mod render;
/// Pan and zoom handling.
pub mod roam;
/// Zoom-dependent sizing.
pub mod scale;
/// Deferred calls and the simulation loop.
pub mod scheduler;
/// The series model.
pub mod series;
/// Drawables kept in step with the graph.
pub mod sync;
/// Colors and styles.
pub mod theme;
mod types;
/// The view controller.
pub mod view;

pub use circular::CircularLayout;
pub use component::GraphViewCanvas;
pub use force::ForceLayout;
pub use roam::ViewHost;
pub use scheduler::{FrameScheduler, ManualScheduler, SimulationScheduler};
pub use sync::RenderSync;
pub use theme::Theme;
pub use types::{
	CircularOptions, Focus, ForceOptions, GraphData, GraphLink, GraphNode, RoamMode, SeriesOptions,
};
pub use view::GraphView;
