//! UI components.

/// Interactive graph view.
pub mod graph_view;
