//! Renderer mount and teardown, and the explorer's load/retry cycle, against
//! a real DOM.
#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use js_sys::{Promise, Reflect};
use knowledge_graph_canvas::components::explorer::{GraphExplorer, create_renderer};
use knowledge_graph_canvas::components::renderer::RendererHandle;
use knowledge_graph_canvas::config::{ExplorerConfig, StyleConfig};
use knowledge_graph_canvas::error::GraphError;
use knowledge_graph_canvas::graph::{Edge, EntityType, GraphData, Node, ViewMode};
use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{HtmlElement, Response};

wasm_bindgen_test_configure!(run_in_browser);

fn graph() -> GraphData {
	GraphData {
		nodes: vec![
			Node::new("p1", "Onboarding", EntityType::Process),
			Node::new("a1", "Intake agent", EntityType::Agent),
			Node::new("d1", "Support", EntityType::Department),
		],
		edges: vec![Edge::new("p1", "a1"), Edge::new("a1", "d1")],
	}
}

fn container(attached: bool) -> HtmlElement {
	let document = web_sys::window().unwrap().document().unwrap();
	let el: HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
	el.style().set_property("width", "640px").unwrap();
	el.style().set_property("height", "480px").unwrap();
	if attached {
		document.body().unwrap().append_child(&el).unwrap();
	}
	el
}

fn canvases(el: &HtmlElement) -> u32 {
	el.query_selector_all("canvas").unwrap().length()
}

#[wasm_bindgen_test]
fn both_backends_mount_and_destroy_cleanly() {
	for mode in [ViewMode::TwoD, ViewMode::ThreeD] {
		let el = container(true);
		let mut renderer = create_renderer(mode);
		assert_eq!(renderer.mode(), mode);

		renderer.mount(&el, &graph(), &StyleConfig::default()).unwrap();
		assert_eq!(canvases(&el), 1);

		renderer.destroy_and_remount(&graph()).unwrap();
		assert_eq!(canvases(&el), 1);

		renderer.zoom_by(1.2);
		renderer.pan(10.0, 0.0);
		renderer.fit_and_center();

		renderer.destroy();
		assert_eq!(canvases(&el), 0);
		renderer.destroy();
		el.remove();
	}
}

#[wasm_bindgen_test]
fn detached_container_fails_the_mount() {
	let el = container(false);
	let mut renderer = create_renderer(ViewMode::TwoD);
	assert_eq!(
		renderer.mount(&el, &graph(), &StyleConfig::default()),
		Err(GraphError::Detached)
	);
	assert_eq!(canvases(&el), 0);
}

#[wasm_bindgen_test]
fn remount_without_mount_is_detached() {
	let mut renderer = create_renderer(ViewMode::ThreeD);
	assert_eq!(renderer.destroy_and_remount(&graph()), Err(GraphError::Detached));
}

#[wasm_bindgen_test]
fn empty_graph_mounts() {
	let el = container(true);
	let mut renderer = create_renderer(ViewMode::TwoD);
	renderer
		.mount(&el, &GraphData::default(), &StyleConfig::default())
		.unwrap();
	assert_eq!(canvases(&el), 1);
	renderer.destroy();
	el.remove();
}

#[wasm_bindgen_test]
fn handle_replaces_and_tears_down() {
	let el = container(true);
	let handle = RendererHandle::new();
	assert!(!handle.is_mounted());
	handle.zoom_by(1.5);

	let mut flat = create_renderer(ViewMode::TwoD);
	flat.mount(&el, &graph(), &StyleConfig::default()).unwrap();
	handle.install(flat);
	assert_eq!(handle.mode(), Some(ViewMode::TwoD));

	let mut spatial = create_renderer(ViewMode::ThreeD);
	handle.teardown();
	spatial.mount(&el, &graph(), &StyleConfig::default()).unwrap();
	handle.install(spatial);
	assert_eq!(handle.mode(), Some(ViewMode::ThreeD));
	assert_eq!(canvases(&el), 1);

	handle.set_search_highlight(Some("agent"));
	handle.fit_and_center();
	handle.teardown();
	assert!(!handle.is_mounted());
	assert_eq!(canvases(&el), 0);
	el.remove();
}

async fn next_frames() {
	let wait = Promise::new(&mut |resolve, _| {
		web_sys::window()
			.unwrap()
			.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, 50)
			.unwrap();
	});
	JsFuture::from(wait).await.unwrap();
}

fn has(el: &HtmlElement, selector: &str) -> bool {
	el.query_selector(selector).unwrap().is_some()
}

/// Replaces `window.fetch`: the first call rejects, later ones answer `[]`.
/// Returns the call counter and the original function.
fn flaky_fetch() -> (Rc<Cell<u32>>, JsValue, Closure<dyn FnMut(JsValue) -> Promise>) {
	let window = web_sys::window().unwrap();
	let calls = Rc::new(Cell::new(0));
	let counter = calls.clone();
	let fake = Closure::<dyn FnMut(JsValue) -> Promise>::new(move |_request: JsValue| {
		counter.set(counter.get() + 1);
		if counter.get() == 1 {
			Promise::reject(&JsValue::from_str("offline"))
		} else {
			Promise::resolve(&Response::new_with_opt_str(Some("[]")).unwrap().into())
		}
	});
	let original = Reflect::get(&window, &"fetch".into()).unwrap();
	Reflect::set(&window, &"fetch".into(), fake.as_ref().unchecked_ref()).unwrap();
	(calls, original, fake)
}

#[wasm_bindgen_test]
async fn retry_fetches_again_after_a_failure() {
	let (calls, original, _fake) = flaky_fetch();
	let el = container(true);
	let config = ExplorerConfig {
		endpoint: "/graph-under-test".into(),
		..ExplorerConfig::default()
	};
	let mounted = leptos::mount::mount_to(el.clone(), move || {
		view! { <GraphExplorer config=config /> }
	});

	next_frames().await;
	assert_eq!(calls.get(), 1);
	assert!(has(&el, ".graph-state--error"));

	let retry: HtmlElement = el
		.query_selector(".graph-state__retry")
		.unwrap()
		.unwrap()
		.dyn_into()
		.unwrap();
	retry.click();
	next_frames().await;

	assert_eq!(calls.get(), 2);
	assert!(!has(&el, ".graph-state--error"));
	assert!(has(&el, ".graph-state--empty"));

	drop(mounted);
	Reflect::set(&web_sys::window().unwrap(), &"fetch".into(), &original).unwrap();
	el.remove();
}
