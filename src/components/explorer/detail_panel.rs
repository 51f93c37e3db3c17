use std::sync::Arc;

use leptos::prelude::*;

use super::icons::CloseIcon;
use crate::graph::{ConnectedPreview, GraphData, NodeRecord, SelectionState, TypeRegistry};

/// Details of the selected node and the nodes it connects to.
///
/// Connections are looked up in the unfiltered graph, so related nodes hidden
/// by the current filter are still listed.
#[component]
pub fn DetailPanel(
	selection: RwSignal<SelectionState>,
	#[prop(into)] full_graph: Signal<Option<Arc<GraphData>>>,
	registry: TypeRegistry,
) -> impl IntoView {
	let registry = StoredValue::new(registry);

	move || {
		let selected = selection.with(|s| s.selected().cloned())?;
		let preview = full_graph
			.with(|g| g.as_ref().map(|g| ConnectedPreview::build(&selected.id, g)))
			.unwrap_or_default();
		Some(view! { <DetailCard node=selected preview=preview selection=selection registry=registry /> })
	}
}

#[component]
fn DetailCard(
	node: NodeRecord,
	preview: ConnectedPreview,
	selection: RwSignal<SelectionState>,
	registry: StoredValue<TypeRegistry>,
) -> impl IntoView {
	let total = preview.total();
	let overflow = preview.overflow_label();
	let connected = preview
		.shown
		.into_iter()
		.map(|other| {
			let record = registry.with_value(|r| NodeRecord::from_node(&other, r));
			let color = record.color.clone();
			view! {
				<li>
					<button
						class="detail-panel__connection"
						title=format!("Show {}", other.label)
						on:click=move |_| selection.update(|s| s.select(record.clone()))
					>
						<span class="detail-panel__swatch" style:background-color=color></span>
						<span>{other.label.clone()}</span>
						<span class="detail-panel__type">{other.entity_type.label()}</span>
					</button>
				</li>
			}
		})
		.collect_view();

	view! {
		<aside class="detail-panel" aria-label="Node details">
			<header class="detail-panel__header">
				<span class="detail-panel__swatch" style:background-color=node.color.clone()></span>
				<span class="detail-panel__type">{node.entity_type.label()}</span>
				<button
					class="detail-panel__close"
					aria-label="Close details"
					on:click=move |_| selection.update(SelectionState::clear)
				>
					<CloseIcon />
				</button>
			</header>
			<h4 class="detail-panel__title">{node.label.clone()}</h4>
			<p class="detail-panel__id">{node.id.clone()}</p>
			{node.url.clone().map(|url| view! {
				<a class="detail-panel__open" href=url>"Open"</a>
			})}
			<h5 class="detail-panel__subtitle">{format!("Connected nodes ({total})")}</h5>
			{(total == 0).then(|| view! { <p class="detail-panel__none">"No connections"</p> })}
			<ul class="detail-panel__connections">{connected}</ul>
			{overflow.map(|label| view! { <p class="detail-panel__more">{label}</p> })}
		</aside>
	}
}
