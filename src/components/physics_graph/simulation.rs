use std::collections::HashMap;

use glam::DVec3;

use crate::config::{CameraConfig, StyleConfig};
use crate::graph::{GraphData, NodeRecord, ViewMode, matches_search};

const ALPHA_MIN: f64 = 0.001;
const COOLING_TICKS: f64 = 300.0;
/// Radius of the seeding sphere for a single node; grows with the cube root
/// of the node count.
const SEED_RADIUS: f64 = 10.0;
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;
/// Squared distances below this are clamped to keep the charge finite.
const MIN_DISTANCE_SQ: f64 = 1.0;

pub struct Particle {
	pub record: NodeRecord,
	pub radius: f64,
	pub position: DVec3,
	pub velocity: DVec3,
	/// Set while a search is active and the label does not match.
	pub dimmed: bool,
}

pub struct Link {
	pub source: usize,
	pub target: usize,
	strength: f64,
	bias: f64,
}

/// Many-body charge, link springs and centring, cooled by `alpha`.
pub struct Simulation {
	pub particles: Vec<Particle>,
	pub links: Vec<Link>,
	alpha: f64,
	alpha_decay: f64,
	velocity_decay: f64,
	link_distance: f64,
	charge: f64,
}

impl Simulation {
	pub fn new(data: &GraphData, style: &StyleConfig) -> Self {
		let n = data.nodes.len();
		let mut index = HashMap::with_capacity(n);
		let particles: Vec<Particle> = data
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| {
				index.insert(node.id.as_str(), i);
				Particle {
					record: NodeRecord::from_node(node, &style.registry),
					radius: style.registry.size_of(node.entity_type, ViewMode::ThreeD),
					position: seed_position(i, n),
					velocity: DVec3::ZERO,
					dimmed: false,
				}
			})
			.collect();

		let mut pairs = Vec::with_capacity(data.edges.len());
		let mut degree = vec![0usize; n];
		for edge in &data.edges {
			let (Some(&s), Some(&t)) = (
				index.get(edge.source.as_str()),
				index.get(edge.target.as_str()),
			) else {
				continue;
			};
			if s == t {
				continue;
			}
			degree[s] += 1;
			degree[t] += 1;
			pairs.push((s, t));
		}
		let links = pairs
			.into_iter()
			.map(|(source, target)| {
				let (ds, dt) = (degree[source] as f64, degree[target] as f64);
				Link {
					source,
					target,
					strength: 1.0 / ds.min(dt),
					bias: ds / (ds + dt),
				}
			})
			.collect();

		let CameraConfig {
			velocity_decay,
			link_distance,
			charge,
			..
		} = style.camera;
		Self {
			particles,
			links,
			alpha: 1.0,
			alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / COOLING_TICKS),
			velocity_decay,
			link_distance,
			charge,
		}
	}

	#[cfg(test)]
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn is_settled(&self) -> bool {
		self.alpha < ALPHA_MIN
	}

	/// Advances one step. Returns `false` once the simulation has cooled.
	pub fn tick(&mut self) -> bool {
		if self.is_settled() {
			return false;
		}
		self.alpha -= self.alpha * self.alpha_decay;
		self.apply_links();
		self.apply_charge();
		let keep = 1.0 - self.velocity_decay;
		for p in &mut self.particles {
			p.velocity *= keep;
			p.position += p.velocity;
		}
		self.center();
		true
	}

	fn apply_links(&mut self) {
		for link in &self.links {
			let (s, t) = (&self.particles[link.source], &self.particles[link.target]);
			let mut d = (t.position + t.velocity) - (s.position + s.velocity);
			let len = d.length();
			if len < f64::EPSILON {
				continue;
			}
			d *= (len - self.link_distance) / len * self.alpha * link.strength;
			self.particles[link.target].velocity -= d * link.bias;
			self.particles[link.source].velocity += d * (1.0 - link.bias);
		}
	}

	fn apply_charge(&mut self) {
		let n = self.particles.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let mut d = self.particles[j].position - self.particles[i].position;
				if d.length_squared() < f64::EPSILON {
					// coincident nodes: nudge apart along a stable axis
					d = DVec3::new(1e-3 * (j - i) as f64, 0.0, 0.0);
				}
				let l2 = d.length_squared().max(MIN_DISTANCE_SQ);
				let push = d * (self.charge * self.alpha / l2);
				self.particles[i].velocity += push;
				self.particles[j].velocity -= push;
			}
		}
	}

	fn center(&mut self) {
		if self.particles.is_empty() {
			return;
		}
		let mean = self
			.particles
			.iter()
			.fold(DVec3::ZERO, |acc, p| acc + p.position)
			/ self.particles.len() as f64;
		for p in &mut self.particles {
			p.position -= mean;
		}
	}

	/// Dims every particle whose label does not contain `query`.
	/// Returns how many still match.
	pub fn set_search(&mut self, query: Option<&str>) -> usize {
		let mut matching = 0;
		for p in &mut self.particles {
			p.dimmed = query.is_some_and(|q| !matches_search(&p.record.label, q));
			if !p.dimmed {
				matching += 1;
			}
		}
		matching
	}
}

/// Point `i` of `n` on a Fibonacci sphere.
fn seed_position(i: usize, n: usize) -> DVec3 {
	let n = n.max(1) as f64;
	let radius = SEED_RADIUS * n.cbrt();
	let y = 1.0 - 2.0 * (i as f64 + 0.5) / n;
	let ring = (1.0 - y * y).max(0.0).sqrt();
	let theta = GOLDEN_ANGLE * i as f64;
	DVec3::new(ring * theta.cos(), y, ring * theta.sin()) * radius
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{Edge, EntityType, Node};

	fn graph() -> GraphData {
		GraphData {
			nodes: vec![
				Node::new("p1", "Onboarding", EntityType::Process),
				Node::new("a1", "Intake agent", EntityType::Agent),
				Node::new("d1", "Support", EntityType::Department),
			],
			edges: vec![
				Edge::new("p1", "a1"),
				Edge::new("a1", "d1"),
				Edge::new("a1", "a1"),
				Edge::new("a1", "ghost"),
			],
		}
	}

	#[test]
	fn seeds_are_distinct() {
		let points: Vec<DVec3> = (0..50).map(|i| seed_position(i, 50)).collect();
		for (i, a) in points.iter().enumerate() {
			for b in &points[i + 1..] {
				assert!(a.distance(*b) > 0.1);
			}
		}
	}

	#[test]
	fn skips_self_loops_and_dangling_links() {
		let sim = Simulation::new(&graph(), &StyleConfig::default());
		assert_eq!(sim.links.len(), 2);
		assert_eq!(sim.particles[2].radius, 9.0);
	}

	#[test]
	fn cools_down_and_stays_centred() {
		let mut sim = Simulation::new(&graph(), &StyleConfig::default());
		let mut ticks = 0;
		let mut last_alpha = sim.alpha();
		while sim.tick() {
			assert!(sim.alpha() < last_alpha);
			last_alpha = sim.alpha();
			ticks += 1;
			assert!(ticks < 1000, "simulation never settled");
		}
		assert!(sim.is_settled());
		assert!(!sim.tick());

		let mean = sim
			.particles
			.iter()
			.fold(DVec3::ZERO, |acc, p| acc + p.position)
			/ 3.0;
		assert!(mean.length() < 1e-6);
		assert!(sim.particles.iter().all(|p| p.position.is_finite()));
	}

	#[test]
	fn repulsion_separates_unlinked_nodes() {
		let data = GraphData {
			nodes: vec![
				Node::new("a", "A", EntityType::Tag),
				Node::new("b", "B", EntityType::Tag),
			],
			edges: vec![],
		};
		let mut sim = Simulation::new(&data, &StyleConfig::default());
		let before = sim.particles[0].position.distance(sim.particles[1].position);
		for _ in 0..50 {
			sim.tick();
		}
		let after = sim.particles[0].position.distance(sim.particles[1].position);
		assert!(after > before);
	}

	#[test]
	fn search_dims_non_matches() {
		let mut sim = Simulation::new(&graph(), &StyleConfig::default());
		assert_eq!(sim.set_search(Some("agent")), 1);
		assert!(sim.particles[0].dimmed);
		assert!(!sim.particles[1].dimmed);
		assert_eq!(sim.set_search(None), 3);
		assert!(sim.particles.iter().all(|p| !p.dimmed));
	}
}
