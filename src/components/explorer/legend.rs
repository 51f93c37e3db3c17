use leptos::prelude::*;

use crate::graph::{EntityType, TypeRegistry};

#[component]
pub fn Legend(registry: TypeRegistry) -> impl IntoView {
	view! {
		<div class="graph-legend">
			<h3 class="graph-legend__title">"Legend"</h3>
			<ul class="graph-legend__items">
				{EntityType::ALL
					.into_iter()
					.filter(|t| t.is_listed())
					.map(|t| {
						view! {
							<li class="graph-legend__item">
								<span
									class="graph-legend__swatch"
									style:background-color=registry.color_of(t).to_string()
								></span>
								{t.label()}
							</li>
						}
					})
					.collect_view()}
			</ul>
		</div>
	}
}
