//! 3D renderer: a cooling particle simulation projected onto a 2D canvas.

mod backend;
mod camera;
mod render;
mod simulation;
mod state;

pub use backend::PhysicsSim3D;
