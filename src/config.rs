//! Tunables passed down as component props.

use crate::graph::{TypeRegistry, ViewMode};

/// 2D force layout and viewport settings.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	/// Rest length the springs settle towards, in world units.
	pub edge_length: f32,
	/// Minimum distance kept between node centres after settling.
	pub node_spacing: f32,
	/// Simulation steps run on mount.
	pub settle_steps: usize,
	/// Time step of one settle step.
	pub settle_dt: f32,
	/// Screen pixels kept free around the fitted graph.
	pub fit_padding: f64,
	/// Zoom clamp.
	pub min_zoom: f64,
	/// Zoom clamp.
	pub max_zoom: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			edge_length: 120.0,
			node_spacing: 36.0,
			settle_steps: 300,
			settle_dt: 0.016,
			fit_padding: 40.0,
			min_zoom: 0.1,
			max_zoom: 10.0,
		}
	}
}

/// 3D simulation and camera settings.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
	/// Camera distance from the origin after a reset.
	pub default_distance: f64,
	/// Closest the camera may get to the origin.
	pub min_distance: f64,
	/// Farthest the camera may get from the origin.
	pub max_distance: f64,
	/// Distance is divided (zoom in) or multiplied (zoom out) by this.
	pub zoom_factor: f64,
	/// World units moved by one directional pan.
	pub pan_step: f64,
	/// Duration of eased camera moves.
	pub transition_ms: f64,
	/// Vertical field of view.
	pub fov_degrees: f64,
	/// Fraction of velocity removed every tick.
	pub velocity_decay: f64,
	/// Rest length of link springs.
	pub link_distance: f64,
	/// Many-body strength; negative repels.
	pub charge: f64,
}

impl Default for CameraConfig {
	fn default() -> Self {
		Self {
			default_distance: 400.0,
			min_distance: 40.0,
			max_distance: 4000.0,
			zoom_factor: 1.3,
			pan_step: 40.0,
			transition_ms: 300.0,
			fov_degrees: 50.0,
			velocity_decay: 0.4,
			link_distance: 30.0,
			charge: -30.0,
		}
	}
}

/// Everything a renderer needs besides the graph itself.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleConfig {
	/// Per-type colours, sizes and links.
	pub registry: TypeRegistry,
	/// 2D layout settings.
	pub layout: LayoutConfig,
	/// 3D simulation and camera settings.
	pub camera: CameraConfig,
	/// Alpha applied to edge tints.
	pub edge_opacity: f64,
	/// Canvas fill colour.
	pub background: String,
	/// Node label colour.
	pub label_color: String,
}

impl Default for StyleConfig {
	fn default() -> Self {
		Self {
			registry: TypeRegistry::standard(),
			layout: LayoutConfig::default(),
			camera: CameraConfig::default(),
			edge_opacity: 0.35,
			background: "#0f172a".into(),
			label_color: "rgba(226, 232, 240, 0.85)".into(),
		}
	}
}

/// How the 3D backend treats search text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchTreatment {
	/// Non-matching nodes are removed, as in 2D.
	Filter,
	/// Non-matching nodes stay but are dimmed.
	#[default]
	Dim,
}

/// Top-level explorer settings.
#[derive(Clone, Debug, PartialEq)]
pub struct ExplorerConfig {
	/// URL the graph is fetched from.
	pub endpoint: String,
	/// Backend shown first.
	pub default_mode: ViewMode,
	/// Whether 3D search dims or filters.
	pub search_treatment_3d: SearchTreatment,
	/// Renderer styling.
	pub style: StyleConfig,
}

impl Default for ExplorerConfig {
	fn default() -> Self {
		Self {
			endpoint: "/api/graph".into(),
			default_mode: ViewMode::TwoD,
			search_treatment_3d: SearchTreatment::default(),
			style: StyleConfig::default(),
		}
	}
}
