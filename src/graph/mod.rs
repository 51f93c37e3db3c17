//! Renderer-independent graph data: types, adaptation, filtering and selection.

/// Raw payload to `GraphData`.
pub mod adapter;
/// Visible subgraph.
pub mod filter;
/// Graph value types.
pub mod model;
/// Entity types and their styling.
pub mod registry;
/// Hover, selection and connections.
pub mod selection;

pub use adapter::{RawElement, adapt, parse_payload};
pub use filter::{FilterState, filter, matches_search};
pub use model::{Edge, GraphData, Node, NodeRecord};
pub use registry::{EntityType, TypeRegistry, ViewMode};
pub use selection::{ConnectedPreview, MAX_CONNECTED, SelectionState, connected_nodes};
