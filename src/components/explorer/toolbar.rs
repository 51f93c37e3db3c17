use leptos::prelude::*;

use super::icons::SearchIcon;
use crate::components::renderer::RendererHandle;
use crate::config::CameraConfig;
use crate::graph::{FilterState, ViewMode};

/// A camera command button; only the 3D backend has a camera to drive.
#[component]
fn CameraButton(
	label: &'static str,
	title: &'static str,
	mode: RwSignal<ViewMode>,
	on_press: Callback<()>,
) -> impl IntoView {
	view! {
		<button
			class="toolbar__button"
			title=title
			aria-label=title
			disabled=move || mode.get() == ViewMode::TwoD
			on:click=move |_| on_press.run(())
		>
			{label}
		</button>
	}
}

#[component]
pub fn Toolbar(
	mode: RwSignal<ViewMode>,
	filter: RwSignal<FilterState>,
	handle: RendererHandle,
	camera: CameraConfig,
	/// Visible node and edge counts.
	#[prop(into)]
	counts: Signal<(usize, usize)>,
) -> impl IntoView {
	let CameraConfig {
		zoom_factor,
		pan_step,
		..
	} = camera;

	view! {
		<div class="toolbar" role="toolbar" aria-label="Graph controls">
			<button
				class="toolbar__button toolbar__mode"
				title="Switch view mode"
				on:click=move |_| mode.update(|m| *m = m.toggled())
			>
				{move || format!("Switch to {}", mode.get().toggled().label())}
			</button>

			<div class="toolbar__search">
				<SearchIcon />
				<input
					type="search"
					placeholder="Search nodes..."
					prop:value=move || filter.with(|f| f.search_text.clone())
					on:input=move |ev| filter.update(|f| f.set_search(event_target_value(&ev)))
				/>
			</div>

			<div class="toolbar__camera">
				<CameraButton
					label="+"
					title="Zoom in"
					mode=mode
					on_press=Callback::new(move |_| handle.zoom_by(zoom_factor))
				/>
				<CameraButton
					label="-"
					title="Zoom out"
					mode=mode
					on_press=Callback::new(move |_| handle.zoom_by(1.0 / zoom_factor))
				/>
				<CameraButton
					label="Reset"
					title="Reset camera"
					mode=mode
					on_press=Callback::new(move |_| handle.fit_and_center())
				/>
				<CameraButton
					label="←"
					title="Pan left"
					mode=mode
					on_press=Callback::new(move |_| handle.pan(pan_step, 0.0))
				/>
				<CameraButton
					label="→"
					title="Pan right"
					mode=mode
					on_press=Callback::new(move |_| handle.pan(-pan_step, 0.0))
				/>
				<CameraButton
					label="↑"
					title="Pan up"
					mode=mode
					on_press=Callback::new(move |_| handle.pan(0.0, pan_step))
				/>
				<CameraButton
					label="↓"
					title="Pan down"
					mode=mode
					on_press=Callback::new(move |_| handle.pan(0.0, -pan_step))
				/>
			</div>

			<span class="toolbar__counts">
				{move || {
					let (nodes, edges) = counts.get();
					format!("{nodes} nodes, {edges} edges")
				}}
			</span>
		</div>
	}
}
