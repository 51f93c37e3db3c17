use std::collections::HashSet;

use super::camera::{Camera, Projected};
use super::simulation::Simulation;
use crate::config::StyleConfig;
use crate::graph::{GraphData, NodeRecord};

/// Extra pixels around a projected node that still count as a hit.
const HIT_SLACK: f64 = 3.0;
/// Pointer travel (px) below which a press/release counts as a tap.
pub const TAP_SLOP: f64 = 4.0;

#[derive(Clone, Copy, Debug)]
struct Press {
	start_x: f64,
	start_y: f64,
	last_x: f64,
	last_y: f64,
	orbiting: bool,
}

/// Simulation, camera and pointer state of one 3D mount.
pub struct PhysicsGraphState {
	pub sim: Simulation,
	pub camera: Camera,
	pub width: f64,
	pub height: f64,
	pub hovered: Option<usize>,
	pub neighbors: HashSet<usize>,
	press: Option<Press>,
}

impl PhysicsGraphState {
	pub fn new(data: &GraphData, style: &StyleConfig, width: f64, height: f64) -> Self {
		Self {
			sim: Simulation::new(data, style),
			camera: Camera::new(&style.camera),
			width,
			height,
			hovered: None,
			neighbors: HashSet::new(),
			press: None,
		}
	}

	/// One animation frame. Returns whether anything moved.
	pub fn tick(&mut self, now_ms: f64) -> bool {
		let simulated = self.sim.tick();
		let moved = self.camera.tick(now_ms);
		simulated || moved
	}

	/// Screen projection of every particle, in particle order.
	pub fn projected(&self) -> Vec<Option<Projected>> {
		self.camera.project_all(
			self.sim.particles.iter().map(|p| &p.position),
			self.width,
			self.height,
		)
	}

	/// Front-most particle under the pointer.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		self.projected()
			.into_iter()
			.enumerate()
			.filter_map(|(i, p)| {
				let p = p?;
				let reach = self.sim.particles[i].radius * p.scale + HIT_SLACK;
				let dist = ((p.x - sx).powi(2) + (p.y - sy).powi(2)).sqrt();
				(dist <= reach).then_some((i, p.depth))
			})
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(i, _)| i)
	}

	pub fn record(&self, idx: usize) -> Option<NodeRecord> {
		self.sim.particles.get(idx).map(|p| p.record.clone())
	}

	/// Returns whether the hovered node changed.
	pub fn set_hover(&mut self, node: Option<usize>) -> bool {
		if self.hovered == node {
			return false;
		}
		self.hovered = node;
		self.neighbors.clear();
		if let Some(idx) = node {
			for link in &self.sim.links {
				if link.source == idx {
					self.neighbors.insert(link.target);
				} else if link.target == idx {
					self.neighbors.insert(link.source);
				}
			}
		}
		true
	}

	pub fn is_highlighted(&self, idx: usize) -> bool {
		self.hovered == Some(idx) || self.neighbors.contains(&idx)
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		self.press = Some(Press {
			start_x: x,
			start_y: y,
			last_x: x,
			last_y: y,
			orbiting: false,
		});
	}

	/// Orbits while pressed, otherwise updates hover. Returns `Some` when the
	/// hovered node changed.
	pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<Option<usize>> {
		if let Some(press) = self.press.as_mut() {
			let travel = ((x - press.start_x).powi(2) + (y - press.start_y).powi(2)).sqrt();
			if press.orbiting || travel >= TAP_SLOP {
				let (dx, dy) = (x - press.last_x, y - press.last_y);
				press.orbiting = true;
				press.last_x = x;
				press.last_y = y;
				self.camera.orbit(dx, dy);
				return None;
			}
		}
		let hovered = self.node_at_position(x, y);
		self.set_hover(hovered).then_some(hovered)
	}

	/// Ends a press. Returns the node when the press was a tap on it.
	pub fn pointer_up(&mut self, x: f64, y: f64) -> Option<usize> {
		match self.press.take() {
			Some(press) if !press.orbiting => self.node_at_position(x, y),
			_ => None,
		}
	}

	/// Pointer left the canvas. Returns whether hover was cleared.
	pub fn pointer_leave(&mut self) -> bool {
		self.press = None;
		self.set_hover(None)
	}

	pub fn set_search(&mut self, query: Option<&str>) {
		self.sim.set_search(query);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{Edge, EntityType, Node};

	fn state() -> PhysicsGraphState {
		let data = GraphData {
			nodes: vec![
				Node::new("p1", "Onboarding", EntityType::Process),
				Node::new("a1", "Helper", EntityType::Agent),
				Node::new("d1", "Sales", EntityType::Department),
			],
			edges: vec![Edge::new("p1", "a1"), Edge::new("a1", "d1")],
		};
		PhysicsGraphState::new(&data, &StyleConfig::default(), 800.0, 600.0)
	}

	fn settled() -> PhysicsGraphState {
		let mut s = state();
		while s.sim.tick() {}
		s
	}

	fn screen_of(state: &PhysicsGraphState, idx: usize) -> (f64, f64) {
		let p = state.projected()[idx].expect("in front of the camera");
		(p.x, p.y)
	}

	#[test]
	fn hit_test_finds_projected_nodes() {
		let s = settled();
		for idx in 0..3 {
			let (x, y) = screen_of(&s, idx);
			assert_eq!(s.node_at_position(x, y), Some(idx));
		}
		assert_eq!(s.node_at_position(-100.0, -100.0), None);
	}

	#[test]
	fn hover_highlights_neighbours() {
		let mut s = settled();
		let (x, y) = screen_of(&s, 1);
		assert_eq!(s.pointer_move(x, y), Some(Some(1)));
		assert!(s.is_highlighted(0) && s.is_highlighted(2));
		assert_eq!(s.pointer_move(x, y), None);
		assert!(s.pointer_leave());
		assert!(!s.is_highlighted(0));
	}

	#[test]
	fn tap_versus_orbit() {
		let mut s = settled();
		let (x, y) = screen_of(&s, 0);
		s.pointer_down(x, y);
		assert_eq!(s.pointer_up(x + 1.0, y), Some(0));

		let before = s.camera.position();
		s.pointer_down(x, y);
		assert_eq!(s.pointer_move(x + 40.0, y + 10.0), None);
		assert_ne!(s.camera.position(), before);
		assert_eq!(s.pointer_up(x, y), None);
	}

	#[test]
	fn ticking_advances_until_settled() {
		let mut s = state();
		assert!(s.tick(0.0));
		while s.tick(0.0) {}
		assert!(s.sim.is_settled());
		s.camera.zoom_in(0.0);
		assert!(s.tick(100.0));
	}
}
