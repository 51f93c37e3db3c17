use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{Event, HtmlElement, MouseEvent, WheelEvent};

use super::render;
use super::state::PhysicsGraphState;
use crate::components::renderer::{
	ClickCallback, HoverCallback, InteractionCallbacks, Renderer, Surface, event_position,
	fit_canvas, navigate_to,
};
use crate::config::StyleConfig;
use crate::error::GraphError;
use crate::graph::{GraphData, ViewMode};

type FrameLoop = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// 3D particle simulation seen through a perspective camera. Animates for as
/// long as it is mounted.
#[derive(Default)]
pub struct PhysicsSim3D {
	callbacks: Rc<RefCell<InteractionCallbacks>>,
	container: Option<HtmlElement>,
	style: StyleConfig,
	query: Option<String>,
	scene: Option<Scene>,
}

struct Scene {
	_surface: Surface,
	state: Rc<RefCell<PhysicsGraphState>>,
	frame: FrameLoop,
	frame_id: Rc<Cell<Option<i32>>>,
}

impl Drop for Scene {
	fn drop(&mut self) {
		if let (Some(id), Some(window)) = (self.frame_id.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(id);
		}
		// breaks the closure's reference to its own cell
		self.frame.borrow_mut().take();
	}
}

fn now_ms() -> f64 {
	js_sys::Date::now()
}

fn request_frame(frame: &FrameLoop, frame_id: &Cell<Option<i32>>) {
	let Some(window) = web_sys::window() else {
		return;
	};
	if let Some(cb) = frame.borrow().as_ref() {
		match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
			Ok(id) => frame_id.set(Some(id)),
			Err(err) => warn!("animation frame request failed: {err:?}"),
		}
	}
}

impl Scene {
	fn build(
		container: &HtmlElement,
		graph: &GraphData,
		style: &StyleConfig,
		query: Option<&str>,
		callbacks: Rc<RefCell<InteractionCallbacks>>,
	) -> Result<Self, GraphError> {
		let mut surface = Surface::attach(container)?;
		let (w, h) = surface.fit_to_container();
		let mut initial = PhysicsGraphState::new(graph, style, w, h);
		initial.set_search(query);
		let state = Rc::new(RefCell::new(initial));
		let style = Rc::new(style.clone());
		let canvas = surface.canvas().clone();

		let (state_md, canvas_md) = (state.clone(), canvas.clone());
		surface.listen("mousedown", move |ev: Event| {
			let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
				return;
			};
			let (x, y) = event_position(&canvas_md, ev);
			state_md.borrow_mut().pointer_down(x, y);
			let _ = canvas_md.focus();
		})?;

		let (state_mm, canvas_mm, callbacks_mm) =
			(state.clone(), canvas.clone(), callbacks.clone());
		surface.listen("mousemove", move |ev: Event| {
			let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
				return;
			};
			let (x, y) = event_position(&canvas_mm, ev);
			let change = state_mm.borrow_mut().pointer_move(x, y);
			if let Some(hovered) = change {
				let record = hovered.and_then(|idx| state_mm.borrow().record(idx));
				let _ = canvas_mm.style().set_property(
					"cursor",
					if record.is_some() { "pointer" } else { "grab" },
				);
				let callbacks = callbacks_mm.borrow().clone();
				callbacks.hover(record);
			}
		})?;

		let (state_mu, canvas_mu, callbacks_mu) =
			(state.clone(), canvas.clone(), callbacks.clone());
		surface.listen("mouseup", move |ev: Event| {
			let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
				return;
			};
			let (x, y) = event_position(&canvas_mu, ev);
			let tapped = state_mu.borrow_mut().pointer_up(x, y);
			if let Some(record) = tapped.and_then(|idx| state_mu.borrow().record(idx)) {
				let callbacks = callbacks_mu.borrow().clone();
				callbacks.tap(record, navigate_to);
			}
		})?;

		let (state_ml, callbacks_ml) = (state.clone(), callbacks);
		surface.listen("mouseleave", move |_: Event| {
			let cleared = state_ml.borrow_mut().pointer_leave();
			if cleared {
				let callbacks = callbacks_ml.borrow().clone();
				callbacks.hover(None);
			}
		})?;

		let state_wh = state.clone();
		surface.listen("wheel", move |ev: Event| {
			let Some(ev) = ev.dyn_ref::<WheelEvent>() else {
				return;
			};
			ev.prevent_default();
			let mut state = state_wh.borrow_mut();
			if ev.delta_y() > 0.0 {
				state.camera.zoom_out(now_ms());
			} else {
				state.camera.zoom_in(now_ms());
			}
		})?;

		let (state_rs, canvas_rs, container_rs) =
			(state.clone(), canvas, surface.container().clone());
		surface.listen_window("resize", move |_: Event| {
			let (w, h) = fit_canvas(&canvas_rs, &container_rs);
			state_rs.borrow_mut().resize(w, h);
		})?;

		let frame: FrameLoop = Rc::new(RefCell::new(None));
		let frame_id = Rc::new(Cell::new(None));
		let (state_fr, ctx, frame_fr, frame_id_fr) = (
			state.clone(),
			surface.ctx().clone(),
			frame.clone(),
			frame_id.clone(),
		);
		*frame.borrow_mut() = Some(Closure::new(move || {
			{
				let mut state = state_fr.borrow_mut();
				state.tick(now_ms());
				render::render(&state, &ctx, &style);
			}
			request_frame(&frame_fr, &frame_id_fr);
		}));
		request_frame(&frame, &frame_id);

		Ok(Self {
			_surface: surface,
			state,
			frame,
			frame_id,
		})
	}
}

impl PhysicsSim3D {
	/// An unmounted backend.
	pub fn new() -> Self {
		Self::default()
	}

	fn with_state(&mut self, f: impl FnOnce(&mut PhysicsGraphState)) {
		if let Some(scene) = &self.scene {
			f(&mut scene.state.borrow_mut());
		}
	}
}

impl Renderer for PhysicsSim3D {
	fn mode(&self) -> ViewMode {
		ViewMode::ThreeD
	}

	fn mount(
		&mut self,
		container: &HtmlElement,
		graph: &GraphData,
		style: &StyleConfig,
	) -> Result<(), GraphError> {
		self.destroy();
		self.container = Some(container.clone());
		self.style = style.clone();
		self.scene = Some(Scene::build(
			container,
			graph,
			style,
			self.query.as_deref(),
			self.callbacks.clone(),
		)?);
		info!(
			"3d renderer mounted: {} nodes, {} edges",
			graph.nodes.len(),
			graph.edges.len()
		);
		Ok(())
	}

	fn destroy_and_remount(&mut self, graph: &GraphData) -> Result<(), GraphError> {
		let container = self.container.clone().ok_or(GraphError::Detached)?;
		let style = self.style.clone();
		self.mount(&container, graph, &style)
	}

	fn set_hover_callback(&mut self, callback: HoverCallback) {
		self.callbacks.borrow_mut().set_hover(callback);
	}

	fn set_click_callback(&mut self, callback: ClickCallback) {
		self.callbacks.borrow_mut().set_click(callback);
	}

	fn pan(&mut self, dx: f64, dy: f64) {
		self.with_state(|s| s.camera.pan(dx, dy));
	}

	fn zoom_by(&mut self, factor: f64) {
		self.with_state(|s| s.camera.zoom_by(factor, now_ms()));
	}

	fn fit_and_center(&mut self) {
		self.with_state(|s| s.camera.reset(now_ms()));
	}

	fn set_search_highlight(&mut self, query: Option<&str>) {
		self.query = query.map(str::to_owned);
		self.with_state(|s| s.set_search(query));
	}

	fn destroy(&mut self) {
		if self.scene.take().is_some() {
			info!("3d renderer destroyed");
		}
	}
}
