//! The explorer shell: fetch lifecycle, toolbar, filters, legend, detail
//! panel and the viewport that hosts the active renderer.

mod detail_panel;
mod filter_chips;
mod icons;
mod legend;
mod shell;
mod states;
mod toolbar;
mod tooltip;
mod viewport;

pub use shell::{GraphExplorer, highlight_query, visible_graph};
pub use viewport::{GraphViewport, create_renderer};
