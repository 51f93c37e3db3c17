//! Derives the visible subgraph from type toggles and search text.

use std::collections::{BTreeSet, HashSet};

use super::model::{GraphData, Node};
use super::registry::EntityType;

/// Type toggles and search text. Everything is shown by default.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterState {
	/// Types currently shown.
	pub active_types: BTreeSet<EntityType>,
	/// Raw search box contents.
	pub search_text: String,
}

impl Default for FilterState {
	fn default() -> Self {
		Self {
			active_types: EntityType::ALL.into_iter().collect(),
			search_text: String::new(),
		}
	}
}

impl FilterState {
	/// Whether nodes of this type are shown.
	pub fn is_active(&self, entity_type: EntityType) -> bool {
		self.active_types.contains(&entity_type)
	}

	/// Shows a hidden type or hides a shown one.
	pub fn toggle(&mut self, entity_type: EntityType) {
		if !self.active_types.remove(&entity_type) {
			self.active_types.insert(entity_type);
		}
	}

	/// Replaces the search text.
	pub fn set_search(&mut self, text: impl Into<String>) {
		self.search_text = text.into();
	}

	/// Lowercased query, or `None` when the search box is blank.
	pub fn query(&self) -> Option<String> {
		let trimmed = self.search_text.trim();
		(!trimmed.is_empty()).then(|| trimmed.to_lowercase())
	}

	/// Same type toggles, no search.
	pub fn without_search(&self) -> Self {
		Self {
			active_types: self.active_types.clone(),
			search_text: String::new(),
		}
	}

	/// Whether anything is hidden compared to the default state.
	pub fn is_narrowed(&self) -> bool {
		self.query().is_some() || self.active_types.len() < EntityType::ALL.len()
	}

	fn keeps(&self, node: &Node, query: Option<&str>) -> bool {
		self.is_active(node.entity_type) && query.is_none_or(|q| matches_search(&node.label, q))
	}
}

/// Case-insensitive substring match. `query` must already be lowercased.
pub fn matches_search(label: &str, query: &str) -> bool {
	label.to_lowercase().contains(query)
}

/// Keeps active, matching nodes and exactly the edges between them.
pub fn filter(graph: &GraphData, state: &FilterState) -> GraphData {
	let query = state.query();
	let nodes: Vec<Node> = graph
		.nodes
		.iter()
		.filter(|node| state.keeps(node, query.as_deref()))
		.cloned()
		.collect();
	let kept: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
	let edges = graph
		.edges
		.iter()
		.filter(|e| kept.contains(e.source.as_str()) && kept.contains(e.target.as_str()))
		.cloned()
		.collect();
	GraphData { nodes, edges }
}
