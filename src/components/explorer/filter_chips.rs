use leptos::prelude::*;

use super::icons::{EyeIcon, EyeOffIcon};
use crate::graph::{EntityType, FilterState, TypeRegistry};

#[component]
fn FilterChip(
	entity_type: EntityType,
	color: String,
	is_active: Signal<bool>,
	on_toggle: Callback<()>,
) -> impl IntoView {
	view! {
		<button
			class=move || {
				if is_active.get() { "filter-chip filter-chip--on" } else { "filter-chip filter-chip--off" }
			}
			style:border-color=color
			aria-pressed=move || is_active.get().to_string()
			title=move || {
				format!("{} {}", if is_active.get() { "Hide" } else { "Show" }, entity_type.label())
			}
			on:click=move |_| on_toggle.run(())
		>
			{move || if is_active.get() { view! { <EyeIcon /> }.into_any() } else { view! { <EyeOffIcon /> }.into_any() }}
			<span>{entity_type.label()}</span>
		</button>
	}
}

/// One eye/eye-off toggle per listed entity type.
#[component]
pub fn FilterChips(filter: RwSignal<FilterState>, registry: TypeRegistry) -> impl IntoView {
	EntityType::ALL
		.into_iter()
		.filter(|t| t.is_listed())
		.map(|entity_type| {
			view! {
				<FilterChip
					entity_type=entity_type
					color=registry.color_of(entity_type).to_string()
					is_active=Signal::derive(move || filter.with(|f| f.is_active(entity_type)))
					on_toggle=Callback::new(move |_| filter.update(|f| f.toggle(entity_type)))
				/>
			}
		})
		.collect_view()
}
