use leptos::prelude::*;

use crate::components::explorer::GraphExplorer;

/// Full-screen knowledge graph explorer
#[component]
pub fn GraphPage() -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<GraphExplorer />
				<div class="graph-overlay">
					<h1>"Knowledge Graph"</h1>
					<p class="subtitle">
						"Hover a node for details, click to inspect. Scroll to zoom. Drag to pan in 2D or orbit in 3D."
					</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
