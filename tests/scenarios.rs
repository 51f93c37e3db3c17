//! End-to-end flows through the public graph API, from payload to what the
//! explorer would show.

use knowledge_graph_canvas::api::{LoadState, LoadTracker};
use knowledge_graph_canvas::components::explorer::{highlight_query, visible_graph};
use knowledge_graph_canvas::config::SearchTreatment;
use knowledge_graph_canvas::error::GraphError;
use knowledge_graph_canvas::graph::{
	ConnectedPreview, EntityType, FilterState, GraphData, NodeRecord, SelectionState,
	TypeRegistry, ViewMode, adapt, connected_nodes, filter, parse_payload,
};

const PAYLOAD: &str = r#"[
	{"data": {"id": "p1", "label": "Customer onboarding", "type": "process"}},
	{"data": {"id": "a1", "label": "Intake agent", "type": "agent"}},
	{"data": {"id": "d1", "label": "Customer Service", "type": "department"}},
	{"data": {"source": "p1", "target": "a1", "label": "uses"}},
	{"data": {"source": "a1", "target": "d1", "label": "belongs to"}}
]"#;

fn load(body: &str) -> LoadState {
	LoadState::from_result(parse_payload(body).map(adapt))
}

fn scenario_graph() -> GraphData {
	load(PAYLOAD)
		.graph()
		.map(|g| (*g).clone())
		.expect("scenario payload loads")
}

#[test]
fn hiding_a_type_removes_its_nodes_and_edges() {
	let graph = scenario_graph();
	assert_eq!((graph.nodes.len(), graph.edges.len()), (3, 2));

	let mut state = FilterState::default();
	state.toggle(EntityType::Department);
	let visible = filter(&graph, &state);
	let ids: Vec<&str> = visible.nodes.iter().map(|n| n.id.as_str()).collect();
	assert_eq!(ids, ["p1", "a1"]);
	assert_eq!(visible.edges.len(), 1);
	assert_eq!((visible.edges[0].source.as_str(), visible.edges[0].target.as_str()), ("p1", "a1"));

	state.toggle(EntityType::Department);
	assert_eq!(filter(&graph, &state), graph);
}

#[test]
fn empty_payload_is_not_an_error() {
	assert_eq!(load("[]"), LoadState::Empty);
	assert_eq!(load(r#"{"elements": []}"#), LoadState::Empty);
	// edges alone do not make a graph
	assert_eq!(
		load(r#"[{"source": "x", "target": "y"}]"#),
		LoadState::Empty
	);
}

#[test]
fn failed_fetch_can_be_retried() {
	let mut tracker = LoadTracker::default();

	let first = tracker.begin();
	let state = LoadState::from_result(Err(GraphError::Network("connection refused".into())));
	assert!(tracker.is_current(first));
	match &state {
		LoadState::Failed(message) => assert!(message.contains("connection refused")),
		other => panic!("expected an error state, got {other:?}"),
	}

	let retry = tracker.begin();
	assert_eq!(tracker.attempts(), 2);
	assert!(!tracker.is_current(first));
	assert!(tracker.is_current(retry));
	assert!(matches!(load(PAYLOAD), LoadState::Ready(_)));

	assert!(matches!(
		LoadState::from_result(Err(GraphError::Http(500))),
		LoadState::Failed(_)
	));
	assert!(matches!(load("{not json"), LoadState::Failed(_)));
}

#[test]
fn connections_include_filtered_out_nodes() {
	let graph = scenario_graph();
	let mut state = FilterState::default();
	state.toggle(EntityType::Department);
	assert!(filter(&graph, &state).node("d1").is_none());

	let mut ids: Vec<&str> = connected_nodes("a1", &graph)
		.into_iter()
		.map(|n| n.id.as_str())
		.collect();
	ids.sort_unstable();
	assert_eq!(ids, ["d1", "p1"]);

	let preview = ConnectedPreview::build("a1", &graph);
	assert_eq!(preview.total(), 2);
	assert_eq!(preview.overflow_label(), None);
}

#[test]
fn drilling_into_a_connection_replaces_the_selection() {
	let graph = scenario_graph();
	let registry = TypeRegistry::standard();
	let mut selection = SelectionState::default();

	let agent = graph.node("a1").expect("agent present");
	selection.hover(Some(NodeRecord::from_node(agent, &registry)));
	assert_eq!(selection.tooltip().map(|n| n.id.as_str()), Some("a1"));

	selection.select(NodeRecord::from_node(agent, &registry));
	assert!(selection.tooltip().is_none());

	let next = connected_nodes("a1", &graph)[0];
	selection.select(NodeRecord::from_node(next, &registry));
	assert_eq!(selection.selected().map(|n| n.id.as_str()), Some(next.id.as_str()));

	selection.clear();
	assert!(selection.selected().is_none());
}

#[test]
fn search_in_three_d_dims_instead_of_hiding() {
	let graph = scenario_graph();
	let mut state = FilterState::default();
	state.set_search("  CUSTOMER ");

	let flat = visible_graph(&graph, &state, ViewMode::TwoD, SearchTreatment::Dim);
	assert_eq!(flat.nodes.len(), 2);
	assert_eq!(flat.edges.len(), 0);

	let spatial = visible_graph(&graph, &state, ViewMode::ThreeD, SearchTreatment::Dim);
	assert_eq!(spatial, graph);
	assert_eq!(
		highlight_query(&state, ViewMode::ThreeD, SearchTreatment::Dim).as_deref(),
		Some("customer")
	);
}
