use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::debug;
use web_sys::AbortController;

use super::detail_panel::DetailPanel;
use super::filter_chips::FilterChips;
use super::legend::Legend;
use super::states::{EmptyState, ErrorState, LoadingState, NoMatchesHint};
use super::toolbar::Toolbar;
use super::tooltip::NodeTooltip;
use super::viewport::GraphViewport;
use crate::api::{LoadState, LoadTracker, fetch_graph};
use crate::components::renderer::RendererHandle;
use crate::config::{ExplorerConfig, SearchTreatment};
use crate::error::GraphError;
use crate::graph::{FilterState, GraphData, NodeRecord, SelectionState, ViewMode, filter};

/// Filter applied to the graph handed to the renderer. In dimming mode the
/// 3D backend keeps non-matching nodes and only drops hidden types.
fn renderer_filter(
	state: &FilterState,
	mode: ViewMode,
	treatment: SearchTreatment,
) -> FilterState {
	match (mode, treatment) {
		(ViewMode::ThreeD, SearchTreatment::Dim) => state.without_search(),
		_ => state.clone(),
	}
}

/// Query the renderer should highlight rather than filter, if any.
pub fn highlight_query(
	state: &FilterState,
	mode: ViewMode,
	treatment: SearchTreatment,
) -> Option<String> {
	match (mode, treatment) {
		(ViewMode::ThreeD, SearchTreatment::Dim) => state.query(),
		_ => None,
	}
}

/// Fetches the graph and lets people explore it.
///
/// Owns the filter, the selection and the view mode, so switching backends
/// keeps all three.
#[component]
pub fn GraphExplorer(
	/// Endpoint, initial mode and styling.
	#[prop(default = ExplorerConfig::default())]
	config: ExplorerConfig,
) -> impl IntoView {
	let ExplorerConfig {
		endpoint,
		default_mode,
		search_treatment_3d,
		style,
	} = config;

	let endpoint = StoredValue::new(endpoint);
	let load = RwSignal::new(LoadState::Loading);
	let tracker = StoredValue::new(LoadTracker::default());
	let controller = StoredValue::new_local(None::<AbortController>);
	let filter_state = RwSignal::new(FilterState::default());
	let mode = RwSignal::new(default_mode);
	let selection = RwSignal::new(SelectionState::default());
	let handle = RendererHandle::new();

	let abort_pending = move || {
		let _ = controller.try_update_value(|c| {
			if let Some(c) = c.take() {
				c.abort();
			}
		});
	};

	let load_graph = move || {
		abort_pending();
		let Some(ticket) = tracker.try_update_value(LoadTracker::begin) else {
			return;
		};
		let next = AbortController::new().ok();
		let signal = next.as_ref().map(AbortController::signal);
		let _ = controller.try_set_value(next);
		let _ = load.try_set(LoadState::Loading);
		let endpoint = endpoint.get_value();

		spawn_local(async move {
			let result = fetch_graph(&endpoint, signal.as_ref()).await;
			if matches!(result, Err(GraphError::Aborted)) {
				debug!("graph fetch aborted");
				return;
			}
			if !tracker.try_with_value(|t| t.is_current(ticket)).unwrap_or(false) {
				debug!("discarding stale graph response");
				return;
			}
			let _ = load.try_set(LoadState::from_result(result));
		});
	};

	load_graph();
	let retry = Callback::new(move |_| load_graph());

	on_cleanup(move || {
		abort_pending();
		let _ = tracker.try_update_value(LoadTracker::cancel);
	});

	let full_graph = Memo::new(move |_| load.with(LoadState::graph));
	let visible = Memo::new(move |_| {
		let graph = full_graph.get()?;
		let mode = mode.get();
		let visible =
			filter_state.with(|f| visible_graph(&graph, f, mode, search_treatment_3d));
		Some(Arc::new(visible))
	});
	let highlight = Memo::new(move |_| {
		let mode = mode.get();
		filter_state.with(|f| highlight_query(f, mode, search_treatment_3d))
	});
	let counts = Signal::derive(move || {
		visible.with(|g| g.as_ref().map_or((0, 0), |g| (g.nodes.len(), g.edges.len())))
	});
	let nothing_matches = Signal::derive(move || {
		visible.with(|g| g.as_ref().is_some_and(|g| g.nodes.is_empty()))
	});

	let on_hover = Callback::new(move |node: Option<NodeRecord>| {
		let _ = selection.try_update(|s| s.hover(node));
	});
	let on_click = Callback::new(move |node: NodeRecord| {
		let _ = selection.try_update(|s| s.select(node));
	});

	let registry = style.registry.clone();
	let camera = style.camera.clone();
	let style = StoredValue::new(style);

	view! {
		<div class="graph-explorer">
			<Toolbar mode=mode filter=filter_state handle=handle camera=camera counts=counts />
			<div class="graph-explorer__filters">
				<FilterChips filter=filter_state registry=registry.clone() />
			</div>
			<div class="graph-explorer__stage">
				{move || match load.get() {
					LoadState::Loading => view! { <LoadingState /> }.into_any(),
					LoadState::Failed(message) => {
						view! { <ErrorState message=message on_retry=retry /> }.into_any()
					}
					LoadState::Empty => view! { <EmptyState /> }.into_any(),
					LoadState::Ready(_) => {
						view! {
							<GraphViewport
								graph=visible
								mode=mode
								highlight=highlight
								style=style.get_value()
								handle=handle
								on_hover=on_hover
								on_click=on_click
							/>
							<NoMatchesHint visible=nothing_matches />
						}
							.into_any()
					}
				}}
				<Legend registry=registry.clone() />
				<NodeTooltip selection=selection />
			</div>
			<DetailPanel selection=selection full_graph=full_graph registry=registry />
		</div>
	}
}

/// Visible graph for a full graph and filter, as the shell computes it.
pub fn visible_graph(
	full: &GraphData,
	state: &FilterState,
	mode: ViewMode,
	treatment: SearchTreatment,
) -> GraphData {
	filter(full, &renderer_filter(state, mode, treatment))
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
			],
			edges: vec![Edge::new("p1", "a1")],
		}
	}

	fn searching(text: &str) -> FilterState {
		let mut state = FilterState::default();
		state.set_search(text);
		state
	}

	#[test]
	fn two_d_always_filters_search() {
		let state = searching("AGENT");
		for treatment in [SearchTreatment::Dim, SearchTreatment::Filter] {
			let visible = visible_graph(&graph(), &state, ViewMode::TwoD, treatment);
			assert_eq!(visible.nodes.len(), 1);
			assert_eq!(highlight_query(&state, ViewMode::TwoD, treatment), None);
		}
	}

	#[test]
	fn three_d_dims_by_default() {
		let state = searching("AGENT");
		let visible = visible_graph(&graph(), &state, ViewMode::ThreeD, SearchTreatment::Dim);
		assert_eq!(visible, graph());
		assert_eq!(
			highlight_query(&state, ViewMode::ThreeD, SearchTreatment::Dim).as_deref(),
			Some("agent")
		);

		let visible = visible_graph(&graph(), &state, ViewMode::ThreeD, SearchTreatment::Filter);
		assert_eq!(visible.nodes.len(), 1);
	}

	#[test]
	fn type_toggles_apply_to_both_backends() {
		let mut state = FilterState::default();
		state.toggle(EntityType::Agent);
		for mode in [ViewMode::TwoD, ViewMode::ThreeD] {
			let visible = visible_graph(&graph(), &state, mode, SearchTreatment::Dim);
			assert_eq!(visible.nodes.len(), 1);
			assert!(visible.edges.is_empty());
		}
	}
}
