use std::rc::Rc;
use std::sync::Arc;

use leptos::prelude::*;
use log::error;
use web_sys::HtmlElement;

use crate::components::force_graph::ForceLayout2D;
use crate::components::physics_graph::PhysicsSim3D;
use crate::components::renderer::{Renderer, RendererHandle};
use crate::config::StyleConfig;
use crate::graph::{GraphData, NodeRecord, ViewMode};

/// A fresh, unmounted backend for `mode`.
pub fn create_renderer(mode: ViewMode) -> Box<dyn Renderer> {
	match mode {
		ViewMode::TwoD => Box::new(ForceLayout2D::new()),
		ViewMode::ThreeD => Box::new(PhysicsSim3D::new()),
	}
}

/// Container the active renderer draws into.
///
/// Every change of `mode` or of the visible graph's value tears the mounted
/// renderer down and mounts a new one.
#[component]
pub fn GraphViewport(
	/// Graph to draw; `None` leaves the container empty.
	#[prop(into)]
	graph: Signal<Option<Arc<GraphData>>>,
	/// Backend to mount.
	#[prop(into)]
	mode: Signal<ViewMode>,
	/// Search text the backend should highlight instead of filter.
	#[prop(into)]
	highlight: Signal<Option<String>>,
	/// Styling handed to every mount.
	style: StyleConfig,
	/// Slot the mounted renderer is installed into.
	handle: RendererHandle,
	/// Hover changes, `None` on exit.
	on_hover: Callback<Option<NodeRecord>>,
	/// Taps on nodes.
	on_click: Callback<NodeRecord>,
) -> impl IntoView {
	let container = NodeRef::<leptos::html::Div>::new();
	let style = StoredValue::new(style);

	Effect::new(move |_| {
		let mode = mode.get();
		let graph = graph.get();
		let Some(el) = container.get() else {
			return;
		};
		handle.teardown();
		let Some(graph) = graph else {
			return;
		};
		let el: HtmlElement = el.into();

		// the old renderer will never report leaving its node
		on_hover.run(None);
		let mut renderer = create_renderer(mode);
		renderer.set_hover_callback(Rc::new(move |node: Option<NodeRecord>| on_hover.run(node)));
		renderer.set_click_callback(Rc::new(move |node: NodeRecord| on_click.run(node)));
		renderer.set_search_highlight(highlight.get_untracked().as_deref());
		match style.with_value(|style| renderer.mount(&el, &graph, style)) {
			Ok(()) => handle.install(renderer),
			Err(err) => error!("{} renderer failed to mount: {err}", mode.label()),
		}
	});

	Effect::new(move |_| {
		let query = highlight.get();
		handle.set_search_highlight(query.as_deref());
	});

	on_cleanup(move || handle.teardown());

	view! { <div class="graph-viewport" node_ref=container></div> }
}
