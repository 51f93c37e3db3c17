use std::cell::RefCell;
use std::rc::Rc;

use log::info;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlElement, KeyboardEvent, MouseEvent, WheelEvent};

use super::render;
use super::state::ForceGraphState;
use crate::components::renderer::{
	ClickCallback, HoverCallback, InteractionCallbacks, KeyAction, Renderer, Surface,
	event_position, fit_canvas, key_action, navigate_to,
};
use crate::config::StyleConfig;
use crate::error::GraphError;
use crate::graph::{GraphData, ViewMode};

const WHEEL_ZOOM_IN: f64 = 1.1;
const WHEEL_ZOOM_OUT: f64 = 0.9;

/// Force-directed 2D backend. Lays the graph out once per mount.
#[derive(Default)]
pub struct ForceLayout2D {
	callbacks: Rc<RefCell<InteractionCallbacks>>,
	container: Option<HtmlElement>,
	style: StyleConfig,
	scene: Option<Scene>,
}

struct Scene {
	surface: Surface,
	state: Rc<RefCell<ForceGraphState>>,
	style: Rc<StyleConfig>,
}

impl Scene {
	fn redraw(&self) {
		render::render(&self.state.borrow(), self.surface.ctx(), &self.style);
	}

	fn build(
		container: &HtmlElement,
		graph: &GraphData,
		style: &StyleConfig,
		callbacks: Rc<RefCell<InteractionCallbacks>>,
	) -> Result<Self, GraphError> {
		let mut surface = Surface::attach(container)?;
		let (w, h) = surface.fit_to_container();
		let state = Rc::new(RefCell::new(ForceGraphState::new(graph, style, w, h)));
		let style = Rc::new(style.clone());
		let canvas = surface.canvas().clone();

		let draw: Rc<dyn Fn()> = {
			let (state, ctx, style) = (state.clone(), surface.ctx().clone(), style.clone());
			Rc::new(move || render::render(&state.borrow(), &ctx, &style))
		};

		let (state_md, canvas_md) = (state.clone(), canvas.clone());
		surface.listen("mousedown", move |ev: Event| {
			let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
				return;
			};
			let (x, y) = event_position(&canvas_md, ev);
			state_md.borrow_mut().pointer_down(x, y);
			let _ = canvas_md.focus();
		})?;

		let (state_mm, canvas_mm, draw_mm, callbacks_mm) =
			(state.clone(), canvas.clone(), draw.clone(), callbacks.clone());
		surface.listen("mousemove", move |ev: Event| {
			let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
				return;
			};
			let (x, y) = event_position(&canvas_mm, ev);
			let change = state_mm.borrow_mut().pointer_move(x, y);
			draw_mm();
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

		let (state_mu, canvas_mu, draw_mu, callbacks_mu) =
			(state.clone(), canvas.clone(), draw.clone(), callbacks.clone());
		surface.listen("mouseup", move |ev: Event| {
			let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
				return;
			};
			let (x, y) = event_position(&canvas_mu, ev);
			let tapped = state_mu.borrow_mut().pointer_up(x, y);
			draw_mu();
			if let Some(record) = tapped.and_then(|idx| state_mu.borrow().record(idx)) {
				let callbacks = callbacks_mu.borrow().clone();
				callbacks.tap(record, navigate_to);
			}
		})?;

		let (state_ml, draw_ml, callbacks_ml) = (state.clone(), draw.clone(), callbacks);
		surface.listen("mouseleave", move |_: Event| {
			let cleared = state_ml.borrow_mut().pointer_leave();
			draw_ml();
			if cleared {
				let callbacks = callbacks_ml.borrow().clone();
				callbacks.hover(None);
			}
		})?;

		let (state_wh, canvas_wh, draw_wh) = (state.clone(), canvas.clone(), draw.clone());
		surface.listen("wheel", move |ev: Event| {
			let Some(ev) = ev.dyn_ref::<WheelEvent>() else {
				return;
			};
			ev.prevent_default();
			let (x, y) = event_position(&canvas_wh, ev);
			let factor = if ev.delta_y() > 0.0 {
				WHEEL_ZOOM_OUT
			} else {
				WHEEL_ZOOM_IN
			};
			state_wh.borrow_mut().zoom_at(x, y, factor);
			draw_wh();
		})?;

		let (state_kd, draw_kd) = (state.clone(), draw.clone());
		surface.listen("keydown", move |ev: Event| {
			let Some(ev) = ev.dyn_ref::<KeyboardEvent>() else {
				return;
			};
			let Some(action) = key_action(&ev.key()) else {
				return;
			};
			ev.prevent_default();
			{
				let mut state = state_kd.borrow_mut();
				match action {
					KeyAction::Pan(dx, dy) => state.pan_by(dx, dy),
					KeyAction::Zoom(factor) => state.zoom_by(factor),
					KeyAction::Fit => state.fit_and_center(),
				}
			}
			draw_kd();
		})?;

		let (state_rs, canvas_rs, container_rs, draw_rs) = (
			state.clone(),
			canvas,
			surface.container().clone(),
			draw.clone(),
		);
		surface.listen_window("resize", move |_: Event| {
			let (w, h) = fit_canvas(&canvas_rs, &container_rs);
			state_rs.borrow_mut().resize(w, h);
			draw_rs();
		})?;

		let scene = Self {
			surface,
			state,
			style,
		};
		scene.redraw();
		Ok(scene)
	}
}

impl ForceLayout2D {
	/// An unmounted backend.
	pub fn new() -> Self {
		Self::default()
	}

	fn with_state(&mut self, f: impl FnOnce(&mut ForceGraphState)) {
		if let Some(scene) = &self.scene {
			f(&mut scene.state.borrow_mut());
			scene.redraw();
		}
	}
}

impl Renderer for ForceLayout2D {
	fn mode(&self) -> ViewMode {
		ViewMode::TwoD
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
		self.scene = Some(Scene::build(container, graph, style, self.callbacks.clone())?);
		info!(
			"2d renderer mounted: {} nodes, {} edges",
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
		self.with_state(|s| s.pan_by(dx, dy));
	}

	fn zoom_by(&mut self, factor: f64) {
		self.with_state(|s| s.zoom_by(factor));
	}

	fn fit_and_center(&mut self) {
		self.with_state(ForceGraphState::fit_and_center);
	}

	fn destroy(&mut self) {
		if self.scene.take().is_some() {
			info!("2d renderer destroyed");
		}
	}
}
