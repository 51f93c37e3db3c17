//! What the stage shows when there is no graph to draw.

use leptos::prelude::*;

/// Where the empty state sends people to create their first entities.
const FIRST_STEPS: [(&str, &str); 3] = [
	("Create an SOP", "/sops/new"),
	("Add an agent", "/agents/new"),
	("Define a process", "/processes/new"),
];

#[component]
pub fn LoadingState() -> impl IntoView {
	view! {
		<div class="graph-state graph-state--loading" role="status">
			<div class="graph-state__spinner" aria-hidden="true"></div>
			<p>"Loading graph..."</p>
		</div>
	}
}

#[component]
pub fn ErrorState(message: String, on_retry: Callback<()>) -> impl IntoView {
	view! {
		<div class="graph-state graph-state--error" role="alert">
			<h3>"Could not load the graph"</h3>
			<p class="graph-state__message">{message}</p>
			<button class="graph-state__retry" on:click=move |_| on_retry.run(())>
				"Retry"
			</button>
		</div>
	}
}

/// The fetch succeeded but there is nothing in the graph yet.
#[component]
pub fn EmptyState() -> impl IntoView {
	view! {
		<div class="graph-state graph-state--empty">
			<h3>"The graph is empty"</h3>
			<p>"Nothing has been added yet. Start with one of these:"</p>
			<div class="graph-state__actions">
				{FIRST_STEPS
					.into_iter()
					.map(|(label, href)| view! { <a class="graph-state__action" href=href>{label}</a> })
					.collect_view()}
			</div>
		</div>
	}
}

/// Overlay for a filter that hides every node.
#[component]
pub fn NoMatchesHint(#[prop(into)] visible: Signal<bool>) -> impl IntoView {
	view! {
		<Show when=move || visible.get()>
			<div class="graph-state graph-state--no-match" role="status">
				"No nodes match the current filters"
			</div>
		</Show>
	}
}
