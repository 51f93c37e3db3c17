//! Turns the raw element list served by the graph endpoint into nodes and edges.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use serde_json::Value;

use super::model::{Edge, GraphData, Node};
use super::registry::EntityType;
use crate::error::GraphError;

/// One element as served. Nodes and edges share the shape; edges carry `source`/`target`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RawElement {
	/// String or numeric id.
	#[serde(default)]
	pub id: Option<Value>,
	/// Display text; `name` is accepted too.
	#[serde(default, alias = "name")]
	pub label: Option<String>,
	/// Wire name of the entity type.
	#[serde(default, rename = "type")]
	pub kind: Option<String>,
	/// Edge start.
	#[serde(default)]
	pub source: Option<Value>,
	/// Edge end.
	#[serde(default)]
	pub target: Option<Value>,
}

impl RawElement {
	/// A flat node element.
	pub fn node(id: &str, label: &str, kind: &str) -> Self {
		Self {
			id: Some(Value::from(id)),
			label: Some(label.into()),
			kind: Some(kind.into()),
			..Self::default()
		}
	}

	/// A flat edge element.
	pub fn edge(source: &str, target: &str, label: Option<&str>) -> Self {
		Self {
			source: Some(Value::from(source)),
			target: Some(Value::from(target)),
			label: label.map(Into::into),
			..Self::default()
		}
	}

	fn is_edge(&self) -> bool {
		self.source.is_some() || self.target.is_some()
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
	Elements(Vec<Value>),
	Wrapped { elements: Vec<Value> },
}

/// Ids may be served as strings or numbers.
fn id_string(value: &Value) -> Option<String> {
	match value {
		Value::String(s) if !s.is_empty() => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		_ => None,
	}
}

/// Reads one element, flat or wrapped as `{ "data": {..} }`. The wrapper is
/// only unpacked when the outer object carries no id or endpoints of its own.
fn read_element(value: Value) -> Option<RawElement> {
	let Value::Object(mut fields) = value else {
		return None;
	};
	let data = fields.remove("data");
	let flat: RawElement = serde_json::from_value(Value::Object(fields)).ok()?;
	if flat.id.is_some() || flat.is_edge() {
		return Some(flat);
	}
	match data {
		Some(inner @ Value::Object(_)) => serde_json::from_value(inner).ok(),
		_ => Some(flat),
	}
}

/// Decodes a response body. Elements that are not objects are skipped.
pub fn parse_payload(body: &str) -> Result<Vec<RawElement>, GraphError> {
	let values = match serde_json::from_str::<Payload>(body)? {
		Payload::Elements(values) | Payload::Wrapped { elements: values } => values,
	};
	let total = values.len();
	let elements: Vec<RawElement> = values
		.into_iter()
		.filter_map(read_element)
		.collect();
	if elements.len() < total {
		debug!("skipped {} unreadable graph elements", total - elements.len());
	}
	Ok(elements)
}

/// Partitions raw elements into nodes and edges.
///
/// Duplicate node ids keep the first position and the last value. Edges whose
/// endpoints are not both known nodes are dropped.
pub fn adapt(elements: Vec<RawElement>) -> GraphData {
	let mut nodes: IndexMap<String, Node> = IndexMap::new();
	let mut pending = Vec::new();
	let mut skipped = 0usize;

	for element in elements {
		if element.is_edge() {
			pending.push(element);
			continue;
		}
		let Some(id) = element.id.as_ref().and_then(id_string) else {
			skipped += 1;
			continue;
		};
		let entity_type = element
			.kind
			.as_deref()
			.map(EntityType::from_wire)
			.unwrap_or(EntityType::Unknown);
		let label = element
			.label
			.filter(|l| !l.trim().is_empty())
			.unwrap_or_else(|| id.clone());
		nodes.insert(id.clone(), Node::new(id, label, entity_type));
	}

	let mut ordinals: HashMap<(String, String), usize> = HashMap::new();
	let mut edges = Vec::with_capacity(pending.len());
	for element in pending {
		let (Some(source), Some(target)) = (
			element.source.as_ref().and_then(id_string),
			element.target.as_ref().and_then(id_string),
		) else {
			skipped += 1;
			continue;
		};
		if !nodes.contains_key(&source) || !nodes.contains_key(&target) {
			skipped += 1;
			continue;
		}
		let ordinal = ordinals.entry((source.clone(), target.clone())).or_insert(0);
		edges.push(Edge {
			source,
			target,
			label: element.label,
			ordinal: *ordinal,
		});
		*ordinal += 1;
	}

	if skipped > 0 {
		debug!("dropped {skipped} malformed or dangling graph elements");
	}

	GraphData {
		nodes: nodes.into_values().collect(),
		edges,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partitions_by_endpoint_fields() {
		let graph = adapt(vec![
			RawElement::node("p1", "Onboarding", "sop"),
			RawElement::edge("p1", "a1", Some("runs")),
			RawElement::node("a1", "Helper", "agent"),
		]);
		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.edges.len(), 1);
		assert_eq!(graph.edges[0].label.as_deref(), Some("runs"));
	}

	#[test]
	fn empty_payload_is_empty_graph() {
		let graph = adapt(parse_payload("[]").unwrap());
		assert!(graph.is_empty());
		assert!(graph.edges.is_empty());
	}

	#[test]
	fn unknown_type_passes_through() {
		let graph = adapt(vec![RawElement::node("x", "X", "spaceship")]);
		assert_eq!(graph.nodes[0].entity_type, EntityType::Unknown);
	}

	#[test]
	fn duplicate_ids_last_wins() {
		let graph = adapt(vec![
			RawElement::node("a", "First", "tag"),
			RawElement::node("b", "Other", "tag"),
			RawElement::node("a", "Second", "agent"),
		]);
		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.nodes[0].id, "a");
		assert_eq!(graph.nodes[0].label, "Second");
		assert_eq!(graph.nodes[0].entity_type, EntityType::Agent);
	}

	#[test]
	fn dangling_and_half_edges_are_dropped() {
		let mut half = RawElement::edge("a", "b", None);
		half.target = None;
		let graph = adapt(vec![
			RawElement::node("a", "A", "tag"),
			RawElement::edge("a", "ghost", None),
			half,
		]);
		assert_eq!(graph.nodes.len(), 1);
		assert!(graph.edges.is_empty());
	}

	#[test]
	fn parallel_edges_get_distinct_keys() {
		let graph = adapt(vec![
			RawElement::node("a", "A", "tag"),
			RawElement::node("b", "B", "tag"),
			RawElement::edge("a", "b", None),
			RawElement::edge("a", "b", None),
			RawElement::edge("b", "a", None),
		]);
		let keys: Vec<String> = graph.edges.iter().map(Edge::key).collect();
		assert_eq!(keys, vec!["a->b#0", "a->b#1", "b->a#0"]);
	}

	#[test]
	fn payload_shapes() {
		let body = r#"{"elements": [
			{"data": {"id": 7, "label": "Seven", "type": "person"}},
			{"id": "t", "name": "Tagged", "type": "tag"},
			{"data": {"source": 7, "target": "t"}},
			42,
			{"type": "tag"}
		]}"#;
		let graph = adapt(parse_payload(body).unwrap());
		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.nodes[0].id, "7");
		assert_eq!(graph.nodes[1].label, "Tagged");
		assert_eq!(graph.edges.len(), 1);
	}

	#[test]
	fn flat_node_keeps_its_fields_beside_a_data_object() {
		let body = r#"[
			{"id": "n1", "label": "Runbook", "type": "sop", "data": {"owner": "ops"}},
			{"source": "n1", "target": "n1", "data": {"weight": 2}},
			{"group": "nodes", "data": {"id": "n2", "label": "Wrapped", "type": "tag"}}
		]"#;
		let elements = parse_payload(body).unwrap();
		assert_eq!(elements.len(), 3);
		assert!(elements[1].source.is_some());

		let graph = adapt(elements);
		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.nodes[0].id, "n1");
		assert_eq!(graph.nodes[0].label, "Runbook");
		assert_eq!(graph.nodes[0].entity_type, EntityType::ProcessDocument);
		assert_eq!(graph.nodes[1].label, "Wrapped");
	}

	#[test]
	fn autonomous_agent_kind_is_an_agent() {
		let body = r#"[{"id": "a1", "label": "Bot", "type": "autonomous-agent"}]"#;
		let graph = adapt(parse_payload(body).unwrap());
		assert_eq!(graph.nodes[0].entity_type, EntityType::Agent);
		assert!(graph.nodes[0].entity_type.is_listed());
	}

	#[test]
	fn missing_label_uses_id() {
		let graph = adapt(parse_payload(r#"[{"id": "lonely", "type": "tag"}]"#).unwrap());
		assert_eq!(graph.nodes[0].label, "lonely");
	}

	#[test]
	fn garbage_body_is_decode_error() {
		assert!(matches!(parse_payload("<html>"), Err(GraphError::Decode(_))));
	}
}
