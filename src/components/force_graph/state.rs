use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::config::{LayoutConfig, StyleConfig};
use crate::graph::{GraphData, NodeRecord, ViewMode};

const NODE_MASS: f32 = 10.0;
const SPRING: f32 = 0.05;
const SEPARATION_PASSES: usize = 8;
/// Extra world units around a node that still count as a hit.
const HIT_SLACK: f64 = 3.0;
/// Fitting never magnifies beyond this, so tiny graphs are not blown up.
const FIT_ZOOM_CAP: f64 = 2.0;
/// Pointer travel (px) below which a press/release counts as a tap.
pub const TAP_SLOP: f64 = 4.0;
/// Curvature of a lone edge, as a fraction of its length.
pub const CURVE_BASE: f64 = 0.08;
/// Extra curvature per parallel edge.
pub const CURVE_STEP: f64 = 0.14;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub record: NodeRecord,
	pub radius: f64,
}

#[derive(Clone, Debug)]
pub struct EdgeInfo {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub label: Option<String>,
	pub bend: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
}

/// Layout and viewport of one 2D mount.
pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub edges: Vec<EdgeInfo>,
	layout: LayoutConfig,
	press: Option<(f64, f64)>,
}

fn simulation_parameters(layout: &LayoutConfig) -> SimulationParameters {
	let length = layout.edge_length.max(1.0);
	SimulationParameters {
		// spring pull and charge push balance near `edge_length`
		force_charge: SPRING * length.powi(3) / (NODE_MASS * NODE_MASS),
		force_spring: SPRING,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	}
}

impl ForceGraphState {
	/// Builds, settles and fits the layout for `data`.
	pub fn new(data: &GraphData, style: &StyleConfig, width: f64, height: f64) -> Self {
		let layout = style.layout.clone();
		let mut graph = ForceGraph::new(simulation_parameters(&layout));
		let mut id_to_idx = HashMap::new();

		let ring = (data.nodes.len() as f64 * layout.node_spacing as f64 / (2.0 * PI)).max(50.0);
		for (i, node) in data.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / data.nodes.len() as f64;
			let idx = graph.add_node(NodeData {
				x: (ring * angle.cos()) as f32,
				y: (ring * angle.sin()) as f32,
				mass: NODE_MASS,
				is_anchor: false,
				user_data: NodeInfo {
					record: NodeRecord::from_node(node, &style.registry),
					radius: style.registry.size_of(node.entity_type, ViewMode::TwoD),
				},
			});
			id_to_idx.insert(node.id.as_str(), idx);
		}

		let mut springs = HashSet::new();
		let mut edges = Vec::with_capacity(data.edges.len());
		for edge in &data.edges {
			let (Some(&src), Some(&tgt)) = (
				id_to_idx.get(edge.source.as_str()),
				id_to_idx.get(edge.target.as_str()),
			) else {
				continue;
			};
			if src != tgt && springs.insert((src.min(tgt), src.max(tgt))) {
				graph.add_edge(src, tgt, EdgeData::default());
			}
			edges.push(EdgeInfo {
				source: src,
				target: tgt,
				label: edge.label.clone(),
				bend: CURVE_BASE + CURVE_STEP * edge.ordinal as f64,
			});
		}

		let mut state = Self {
			graph,
			edges,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			layout,
			press: None,
		};
		state.settle();
		state.separate();
		state.fit_and_center();
		state
	}

	/// Runs the simulation to rest. Called once per mount, never animated.
	fn settle(&mut self) {
		for _ in 0..self.layout.settle_steps {
			self.graph.update(self.layout.settle_dt);
		}
	}

	/// Pushes apart nodes closer than the configured spacing.
	fn separate(&mut self) {
		let spacing = self.layout.node_spacing as f64;
		let mut points: Vec<(DefaultNodeIdx, f64, f64)> = Vec::new();
		self.graph
			.visit_nodes(|node| points.push((node.index(), node.x() as f64, node.y() as f64)));

		for _ in 0..SEPARATION_PASSES {
			let mut moved = false;
			for i in 0..points.len() {
				for j in (i + 1)..points.len() {
					let (dx, dy) = (points[j].1 - points[i].1, points[j].2 - points[i].2);
					let dist = (dx * dx + dy * dy).sqrt();
					if dist >= spacing {
						continue;
					}
					let (ux, uy) = if dist < 1e-6 {
						let angle = (i + j) as f64;
						(angle.cos(), angle.sin())
					} else {
						(dx / dist, dy / dist)
					};
					let push = (spacing - dist) / 2.0;
					points[i].1 -= ux * push;
					points[i].2 -= uy * push;
					points[j].1 += ux * push;
					points[j].2 += uy * push;
					moved = true;
				}
			}
			if !moved {
				break;
			}
		}

		let placed: HashMap<DefaultNodeIdx, (f64, f64)> =
			points.into_iter().map(|(idx, x, y)| (idx, (x, y))).collect();
		self.graph.visit_nodes_mut(|node| {
			if let Some(&(x, y)) = placed.get(&node.index()) {
				node.data.x = x as f32;
				node.data.y = y as f32;
			}
		});
	}

	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut out = HashMap::new();
		self.graph.visit_nodes(|node| {
			out.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		out
	}

	/// World-space bounding box including node radii.
	pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		self.graph.visit_nodes(|node| {
			let (x, y, r) = (node.x() as f64, node.y() as f64, node.data.user_data.radius);
			bounds = Some(match bounds {
				None => (x - r, y - r, x + r, y + r),
				Some((x0, y0, x1, y1)) => (x0.min(x - r), y0.min(y - r), x1.max(x + r), y1.max(y + r)),
			});
		});
		bounds
	}

	pub fn fit_and_center(&mut self) {
		let Some((x0, y0, x1, y1)) = self.bounds() else {
			self.transform = ViewTransform {
				x: self.width / 2.0,
				y: self.height / 2.0,
				k: 1.0,
			};
			return;
		};
		let pad = self.layout.fit_padding;
		let (avail_w, avail_h) = (
			(self.width - 2.0 * pad).max(1.0),
			(self.height - 2.0 * pad).max(1.0),
		);
		let (bw, bh) = ((x1 - x0).max(1.0), (y1 - y0).max(1.0));
		let k = (avail_w / bw)
			.min(avail_h / bh)
			.clamp(self.layout.min_zoom, self.layout.max_zoom.min(FIT_ZOOM_CAP));
		let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
		self.transform = ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		};
	}

	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		self.transform.x += dx;
		self.transform.y += dy;
	}

	/// Zooms keeping the screen point `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(self.layout.min_zoom, self.layout.max_zoom);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn zoom_by(&mut self, factor: f64) {
		self.zoom_at(self.width / 2.0, self.height / 2.0, factor);
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found: Option<(DefaultNodeIdx, f64)> = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let dist = (dx * dx + dy * dy).sqrt();
			if dist < node.data.user_data.radius + HIT_SLACK
				&& found.is_none_or(|(_, best)| dist < best)
			{
				found = Some((node.index(), dist));
			}
		});
		found.map(|(idx, _)| idx)
	}

	pub fn record(&self, idx: DefaultNodeIdx) -> Option<NodeRecord> {
		let mut record = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				record = Some(node.data.user_data.record.clone());
			}
		});
		record
	}

	/// Returns whether the hovered node changed.
	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) -> bool {
		if self.hover.node == node {
			return false;
		}
		self.hover.node = node;
		self.hover.neighbors.clear();
		if let Some(idx) = node {
			for edge in &self.edges {
				if edge.source == idx {
					self.hover.neighbors.insert(edge.target);
				} else if edge.target == idx {
					self.hover.neighbors.insert(edge.source);
				}
			}
		}
		true
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some()
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		self.press = Some((x, y));
		if let Some(idx) = self.node_at_position(x, y) {
			self.drag.active = true;
			self.drag.node_idx = Some(idx);
			self.drag.start_x = x;
			self.drag.start_y = y;
			self.graph.visit_nodes(|node| {
				if node.index() == idx {
					self.drag.node_start_x = node.x();
					self.drag.node_start_y = node.y();
				}
			});
		} else {
			self.pan.active = true;
			self.pan.start_x = x;
			self.pan.start_y = y;
			self.pan.transform_start_x = self.transform.x;
			self.pan.transform_start_y = self.transform.y;
		}
	}

	/// Drags, pans or updates hover. Returns `Some` when the hovered node changed.
	pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<Option<DefaultNodeIdx>> {
		if self.drag.active {
			if let Some(idx) = self.drag.node_idx {
				let (dx, dy) = (
					(x - self.drag.start_x) / self.transform.k,
					(y - self.drag.start_y) / self.transform.k,
				);
				let (nx, ny) = (
					self.drag.node_start_x + dx as f32,
					self.drag.node_start_y + dy as f32,
				);
				self.graph.visit_nodes_mut(|node| {
					if node.index() == idx {
						node.data.x = nx;
						node.data.y = ny;
						node.data.is_anchor = true;
					}
				});
			}
			return None;
		}
		if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
		}
		let hovered = self.node_at_position(x, y);
		self.set_hover(hovered).then_some(hovered)
	}

	/// Ends a press. Returns the node when the press was a tap on it.
	pub fn pointer_up(&mut self, x: f64, y: f64) -> Option<DefaultNodeIdx> {
		let tapped = match (self.press.take(), self.drag.node_idx) {
			(Some((px, py)), Some(idx)) if ((x - px).powi(2) + (y - py).powi(2)).sqrt() < TAP_SLOP => {
				Some(idx)
			}
			_ => None,
		};
		self.drag = DragState::default();
		self.pan.active = false;
		tapped
	}

	/// Pointer left the canvas. Returns whether hover was cleared.
	pub fn pointer_leave(&mut self) -> bool {
		self.press = None;
		self.drag = DragState::default();
		self.pan.active = false;
		self.set_hover(None)
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
