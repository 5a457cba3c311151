//! Dashboard aggregation for the Hearth client.
//!
//! `widget_render` maps heterogeneous widget payloads to typed renderers by
//! service kind with per-widget failure isolation; `orchestrator` coordinates
//! the joined initial load and the serialized refresh-then-refetch cycle.

pub mod orchestrator;
pub mod widget_render;

pub use orchestrator::{DashboardOrchestrator, DashboardView};
pub use widget_render::{render_widget, WidgetRenderer, WIDGET_DISPLAY_LIMIT};
