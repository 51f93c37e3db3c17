//! Force-directed 2D renderer built on `force_graph`.

mod backend;
mod render;
mod state;

pub use backend::ForceLayout2D;
