//! Fetching graph elements and tracking the load lifecycle.

use std::sync::Arc;

use log::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortSignal, Request, RequestInit, Response};

use crate::error::GraphError;
use crate::graph::{GraphData, adapt, parse_payload};

/// What the explorer shows instead of (or as) the graph.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadState {
	/// Fetch in flight.
	Loading,
	/// Fetch failed; the message is shown next to a retry button.
	Failed(String),
	/// Fetch succeeded with no nodes at all.
	Empty,
	/// At least one node arrived.
	Ready(Arc<GraphData>),
}

impl LoadState {
	/// Classifies a finished fetch.
	pub fn from_result(result: Result<GraphData, GraphError>) -> Self {
		match result {
			Ok(graph) if graph.is_empty() => LoadState::Empty,
			Ok(graph) => LoadState::Ready(Arc::new(graph)),
			Err(err) => LoadState::Failed(err.to_string()),
		}
	}

	/// The loaded graph, if any.
	pub fn graph(&self) -> Option<Arc<GraphData>> {
		match self {
			LoadState::Ready(graph) => Some(graph.clone()),
			_ => None,
		}
	}
}

/// Identifies one fetch attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Hands out tickets so that only the latest fetch may publish its result.
#[derive(Clone, Debug, Default)]
pub struct LoadTracker {
	generation: u64,
	attempts: u64,
}

impl LoadTracker {
	/// Starts a new attempt, invalidating earlier tickets.
	pub fn begin(&mut self) -> FetchTicket {
		self.generation += 1;
		self.attempts += 1;
		FetchTicket(self.generation)
	}

	/// Invalidates every outstanding ticket.
	pub fn cancel(&mut self) {
		self.generation += 1;
	}

	/// Whether `ticket` belongs to the latest attempt.
	pub fn is_current(&self, ticket: FetchTicket) -> bool {
		ticket.0 == self.generation
	}

	/// Attempts started so far.
	pub fn attempts(&self) -> u64 {
		self.attempts
	}
}

/// `GET`s the endpoint and adapts the payload.
pub async fn fetch_graph(endpoint: &str, signal: Option<&AbortSignal>) -> Result<GraphData, GraphError> {
	info!("fetching graph from {endpoint}");
	let result = request_graph(endpoint, signal).await;
	match &result {
		Ok(graph) => info!(
			"graph loaded: {} nodes, {} edges",
			graph.nodes.len(),
			graph.edges.len()
		),
		Err(err) => warn!("graph fetch failed: {err}"),
	}
	result
}

async fn request_graph(endpoint: &str, signal: Option<&AbortSignal>) -> Result<GraphData, GraphError> {
	let window = web_sys::window().ok_or(GraphError::NoWindow)?;
	let init = RequestInit::new();
	init.set_method("GET");
	init.set_signal(signal);
	let request = Request::new_with_str_and_init(endpoint, &init).map_err(GraphError::from_js)?;
	if let Err(err) = request.headers().set("Accept", "application/json") {
		debug!("could not set Accept header: {err:?}");
	}

	let aborted = || signal.is_some_and(AbortSignal::aborted);
	let response = JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(|err| {
			if aborted() {
				GraphError::Aborted
			} else {
				GraphError::from_js(err)
			}
		})?;
	let response: Response = response.dyn_into().map_err(GraphError::from_js)?;
	if !response.ok() {
		return Err(GraphError::Http(response.status()));
	}

	let body = JsFuture::from(response.text().map_err(GraphError::from_js)?)
		.await
		.map_err(GraphError::from_js)?;
	let body = body
		.as_string()
		.ok_or_else(|| GraphError::Decode("response body is not text".into()))?;
	Ok(adapt(parse_payload(&body)?))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{EntityType, Node};

	#[test]
	fn load_state_from_result() {
		assert_eq!(LoadState::from_result(Ok(GraphData::default())), LoadState::Empty);
		assert_eq!(
			LoadState::from_result(Err(GraphError::Http(503))),
			LoadState::Failed("server responded with status 503".into())
		);
		let graph = GraphData {
			nodes: vec![Node::new("a", "A", EntityType::Tag)],
			edges: Vec::new(),
		};
		let state = LoadState::from_result(Ok(graph.clone()));
		assert_eq!(state.graph().as_deref(), Some(&graph));
	}

	#[test]
	fn only_latest_ticket_is_current() {
		let mut tracker = LoadTracker::default();
		let first = tracker.begin();
		assert!(tracker.is_current(first));
		let second = tracker.begin();
		assert!(!tracker.is_current(first));
		assert!(tracker.is_current(second));
		tracker.cancel();
		assert!(!tracker.is_current(second));
		assert_eq!(tracker.attempts(), 2);
	}
}
