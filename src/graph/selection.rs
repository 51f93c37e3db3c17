//! Hover and selection state plus the connected-node list of the detail panel.

use std::collections::HashSet;

use super::model::{GraphData, Node, NodeRecord};

/// Most connected nodes listed before collapsing into `+N more`.
pub const MAX_CONNECTED: usize = 15;

/// Hover is transient, selection persists until cleared or replaced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionState {
	hovered: Option<NodeRecord>,
	selected: Option<NodeRecord>,
}

impl SelectionState {
	/// Node under the pointer.
	pub fn hovered(&self) -> Option<&NodeRecord> {
		self.hovered.as_ref()
	}

	/// Node shown in the detail panel.
	pub fn selected(&self) -> Option<&NodeRecord> {
		self.selected.as_ref()
	}

	/// Replaces the hovered node; `None` on pointer-out.
	pub fn hover(&mut self, node: Option<NodeRecord>) {
		self.hovered = node;
	}

	/// Opens the detail panel on `node`.
	pub fn select(&mut self, node: NodeRecord) {
		self.selected = Some(node);
	}

	/// Closes the detail panel.
	pub fn clear(&mut self) {
		self.selected = None;
	}

	/// Tooltip target: the hovered node, unless the detail panel is open.
	pub fn tooltip(&self) -> Option<&NodeRecord> {
		if self.selected.is_some() {
			None
		} else {
			self.hovered.as_ref()
		}
	}
}

/// Nodes sharing an edge with `id`, resolved against the full graph.
///
/// Pass the unfiltered graph so relationships to hidden nodes stay visible.
pub fn connected_nodes<'a>(id: &str, graph: &'a GraphData) -> Vec<&'a Node> {
	let mut seen = HashSet::new();
	graph
		.edges
		.iter()
		.filter_map(|edge| edge.other_end(id))
		.filter(|other| *other != id && seen.insert(*other))
		.filter_map(|other| graph.node(other))
		.collect()
}

/// Truncated connected-node list for display.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConnectedPreview {
	/// First `MAX_CONNECTED` connections.
	pub shown: Vec<Node>,
	/// Connections left out.
	pub overflow: usize,
}

impl ConnectedPreview {
	/// Preview of the connections of `id`.
	pub fn build(id: &str, graph: &GraphData) -> Self {
		let all = connected_nodes(id, graph);
		let overflow = all.len().saturating_sub(MAX_CONNECTED);
		Self {
			shown: all.into_iter().take(MAX_CONNECTED).cloned().collect(),
			overflow,
		}
	}

	/// All connections, shown or not.
	pub fn total(&self) -> usize {
		self.shown.len() + self.overflow
	}

	/// `+N more`, when the list was cut.
	pub fn overflow_label(&self) -> Option<String> {
		(self.overflow > 0).then(|| format!("+{} more", self.overflow))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::model::Edge;
	use crate::graph::registry::{EntityType, TypeRegistry};

	fn record(id: &str) -> NodeRecord {
		NodeRecord::from_node(
			&Node::new(id, id.to_uppercase(), EntityType::Agent),
			&TypeRegistry::standard(),
		)
	}

	fn star(spokes: usize) -> GraphData {
		let mut graph = GraphData {
			nodes: vec![Node::new("hub", "Hub", EntityType::Department)],
			edges: Vec::new(),
		};
		for i in 0..spokes {
			let id = format!("n{i}");
			graph.nodes.push(Node::new(&id, &id, EntityType::Person));
			if i % 2 == 0 {
				graph.edges.push(Edge::new("hub", &id));
			} else {
				graph.edges.push(Edge::new(&id, "hub"));
			}
		}
		graph
	}

	#[test]
	fn hover_and_selection_are_independent() {
		let mut state = SelectionState::default();
		state.hover(Some(record("a")));
		assert_eq!(state.tooltip().map(|r| r.id.as_str()), Some("a"));

		state.select(record("b"));
		assert_eq!(state.hovered().map(|r| r.id.as_str()), Some("a"));
		assert!(state.tooltip().is_none());

		state.hover(None);
		assert_eq!(state.selected().map(|r| r.id.as_str()), Some("b"));

		state.select(record("c"));
		assert_eq!(state.selected().map(|r| r.id.as_str()), Some("c"));
		state.clear();
		assert!(state.selected().is_none());
	}

	#[test]
	fn connected_is_symmetric() {
		let mut graph = star(6);
		graph.edges.push(Edge::new("n1", "n2"));
		graph.edges.push(Edge::new("n1", "n2"));
		for node in &graph.nodes {
			for other in connected_nodes(&node.id, &graph) {
				assert!(
					connected_nodes(&other.id, &graph)
						.iter()
						.any(|n| n.id == node.id),
					"{} -> {} not mirrored",
					node.id,
					other.id
				);
			}
		}
	}

	#[test]
	fn parallel_edges_and_self_loops_collapse() {
		let mut graph = star(2);
		graph.edges.push(Edge::new("hub", "n0"));
		graph.edges.push(Edge::new("hub", "hub"));
		let ids: Vec<&str> = connected_nodes("hub", &graph)
			.iter()
			.map(|n| n.id.as_str())
			.collect();
		assert_eq!(ids, vec!["n0", "n1"]);
	}

	#[test]
	fn preview_caps_at_fifteen() {
		let preview = ConnectedPreview::build("hub", &star(15));
		assert_eq!(preview.shown.len(), 15);
		assert_eq!(preview.overflow_label(), None);

		let preview = ConnectedPreview::build("hub", &star(22));
		assert_eq!(preview.shown.len(), MAX_CONNECTED);
		assert_eq!(preview.overflow, 7);
		assert_eq!(preview.total(), 22);
		assert_eq!(preview.overflow_label().as_deref(), Some("+7 more"));
	}
}
