use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, HtmlElement, MouseEvent,
};

use crate::error::GraphError;

const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);

struct Listener {
	target: EventTarget,
	event: &'static str,
	closure: Closure<dyn FnMut(Event)>,
}

impl Drop for Listener {
	fn drop(&mut self) {
		let _ = self
			.target
			.remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
	}
}

/// A canvas appended to a container, with the listeners attached to it.
///
/// Dropping the surface detaches every listener and removes the canvas.
pub(crate) struct Surface {
	container: HtmlElement,
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	listeners: Vec<Listener>,
}

impl Surface {
	pub fn attach(container: &HtmlElement) -> Result<Self, GraphError> {
		if !container.is_connected() {
			return Err(GraphError::Detached);
		}
		let document = web_sys::window()
			.and_then(|w| w.document())
			.ok_or(GraphError::NoWindow)?;
		let canvas: HtmlCanvasElement = document
			.create_element("canvas")
			.map_err(GraphError::canvas)?
			.dyn_into()
			.map_err(|_| GraphError::Canvas("created element is not a canvas".into()))?;
		canvas.set_class_name("graph-canvas");
		canvas.set_tab_index(0);
		let _ = canvas.style().set_property("display", "block");
		let _ = canvas.style().set_property("outline", "none");

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.map_err(GraphError::canvas)?
			.ok_or_else(|| GraphError::Canvas("2d context unavailable".into()))?
			.dyn_into()
			.map_err(|_| GraphError::Canvas("unexpected context type".into()))?;

		container.append_child(&canvas).map_err(GraphError::canvas)?;
		let surface = Self {
			container: container.clone(),
			canvas,
			ctx,
			listeners: Vec::new(),
		};
		surface.fit_to_container();
		Ok(surface)
	}

	pub fn canvas(&self) -> &HtmlCanvasElement {
		&self.canvas
	}

	pub fn ctx(&self) -> &CanvasRenderingContext2d {
		&self.ctx
	}

	/// Resizes the canvas to its container and returns the new size.
	pub fn fit_to_container(&self) -> (f64, f64) {
		fit_canvas(&self.canvas, &self.container)
	}

	pub fn container(&self) -> &HtmlElement {
		&self.container
	}

	/// Listens on the canvas.
	pub fn listen(
		&mut self,
		event: &'static str,
		handler: impl FnMut(Event) + 'static,
	) -> Result<(), GraphError> {
		let target: EventTarget = self.canvas.clone().into();
		self.listen_on(target, event, handler)
	}

	/// Listens on the window, e.g. for `resize`.
	pub fn listen_window(
		&mut self,
		event: &'static str,
		handler: impl FnMut(Event) + 'static,
	) -> Result<(), GraphError> {
		let window = web_sys::window().ok_or(GraphError::NoWindow)?;
		self.listen_on(window.into(), event, handler)
	}

	fn listen_on(
		&mut self,
		target: EventTarget,
		event: &'static str,
		handler: impl FnMut(Event) + 'static,
	) -> Result<(), GraphError> {
		let closure = Closure::<dyn FnMut(Event)>::new(handler);
		target
			.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
			.map_err(GraphError::canvas)?;
		self.listeners.push(Listener {
			target,
			event,
			closure,
		});
		Ok(())
	}
}

impl Drop for Surface {
	fn drop(&mut self) {
		self.listeners.clear();
		if self.container.remove_child(&self.canvas).is_err() {
			warn!("graph canvas was already detached");
		}
	}
}

/// Sizes `canvas` to fill `container`, falling back to 800x600 while the
/// container has no layout yet.
pub(crate) fn fit_canvas(canvas: &HtmlCanvasElement, container: &HtmlElement) -> (f64, f64) {
	let (w, h) = (container.client_width(), container.client_height());
	let (w, h) = if w > 0 && h > 0 {
		(w as f64, h as f64)
	} else {
		FALLBACK_SIZE
	};
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);
	(w, h)
}

/// Pointer position relative to the canvas' top-left corner.
pub(crate) fn event_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Full page navigation to a node destination.
pub(crate) fn navigate_to(url: &str) {
	let Some(window) = web_sys::window() else {
		return;
	};
	if let Err(err) = window.location().set_href(url) {
		warn!("navigation to {url} failed: {err:?}");
	}
}
