use super::registry::{EntityType, TypeRegistry};

/// An entity in the graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
	/// Stable identifier.
	pub id: String,
	/// Display text.
	pub label: String,
	/// Kind of entity.
	pub entity_type: EntityType,
}

impl Node {
	/// A node with the given fields.
	pub fn new(id: impl Into<String>, label: impl Into<String>, entity_type: EntityType) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
			entity_type,
		}
	}
}

/// A directed relationship. `ordinal` counts earlier edges with the same endpoints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
	/// Id of the start node.
	pub source: String,
	/// Id of the end node.
	pub target: String,
	/// Relationship name.
	pub label: Option<String>,
	/// Index among edges with the same endpoints.
	pub ordinal: usize,
}

impl Edge {
	/// An unlabelled edge with ordinal 0.
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			label: None,
			ordinal: 0,
		}
	}

	/// Synthetic identity; unique even among parallel edges.
	pub fn key(&self) -> String {
		format!("{}->{}#{}", self.source, self.target, self.ordinal)
	}

	/// Whether either endpoint is `id`.
	pub fn touches(&self, id: &str) -> bool {
		self.source == id || self.target == id
	}

	/// The endpoint opposite to `id`, if the edge touches it.
	pub fn other_end(&self, id: &str) -> Option<&str> {
		if self.source == id {
			Some(&self.target)
		} else if self.target == id {
			Some(&self.source)
		} else {
			None
		}
	}
}

/// Nodes and edges of one fetch result.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphData {
	/// Nodes in payload order.
	pub nodes: Vec<Node>,
	/// Edges whose endpoints are both in `nodes`.
	pub edges: Vec<Edge>,
}

impl GraphData {
	/// No nodes at all.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Looks up a node by id.
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}
}

/// Plain node shape handed to hover and click callbacks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeRecord {
	/// Node id.
	pub id: String,
	/// Node label.
	pub label: String,
	/// Node type.
	pub entity_type: EntityType,
	/// Registry colour of the type.
	pub color: String,
	/// Detail page, if the type has one.
	pub url: Option<String>,
}

impl NodeRecord {
	/// Resolves colour and url through the registry.
	pub fn from_node(node: &Node, registry: &TypeRegistry) -> Self {
		Self {
			id: node.id.clone(),
			label: node.label.clone(),
			entity_type: node.entity_type,
			color: registry.color_of(node.entity_type).to_string(),
			url: registry.url_of(&node.id, node.entity_type),
		}
	}
}
