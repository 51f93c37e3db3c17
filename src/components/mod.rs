/// Explorer shell and its panels.
pub mod explorer;
/// 2D backend.
pub mod force_graph;
/// 3D backend.
pub mod physics_graph;
/// Backend contract and shared pieces.
pub mod renderer;
