use leptos::prelude::*;

use crate::graph::SelectionState;

/// Names the hovered node while no node is selected.
#[component]
pub fn NodeTooltip(selection: RwSignal<SelectionState>) -> impl IntoView {
	move || {
		selection.with(|s| s.tooltip().cloned()).map(|node| {
			view! {
				<div class="node-tooltip" role="status">
					<span class="node-tooltip__swatch" style:background-color=node.color></span>
					<strong>{node.label}</strong>
					<span class="node-tooltip__type">{node.entity_type.label()}</span>
					{node.url.is_some().then_some(view! { <span class="node-tooltip__hint">"Click to open"</span> })}
				</div>
			}
		})
	}
}
