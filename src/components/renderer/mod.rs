//! The contract both canvas backends implement, plus the pieces they share.

mod handle;
mod surface;

use std::rc::Rc;

use web_sys::HtmlElement;

pub use handle::RendererHandle;
pub(crate) use surface::{Surface, event_position, fit_canvas, navigate_to};

use crate::config::StyleConfig;
use crate::error::GraphError;
use crate::graph::{GraphData, NodeRecord, ViewMode};

/// Receives the hovered node, `None` on exit.
pub type HoverCallback = Rc<dyn Fn(Option<NodeRecord>)>;
/// Receives the tapped node.
pub type ClickCallback = Rc<dyn Fn(NodeRecord)>;

/// Pixels moved by one arrow key press.
pub const KEY_PAN_STEP: f64 = 50.0;
/// Multiplier applied by `+` (and divided by `-`).
pub const KEY_ZOOM_FACTOR: f64 = 1.2;

/// A graph backend bound to one container element.
pub trait Renderer {
	/// Which backend this is.
	fn mode(&self) -> ViewMode;

	/// Builds the scene from scratch inside `container`.
	fn mount(
		&mut self,
		container: &HtmlElement,
		graph: &GraphData,
		style: &StyleConfig,
	) -> Result<(), GraphError>;

	/// Tears the scene down and builds it again in the same container.
	fn destroy_and_remount(&mut self, graph: &GraphData) -> Result<(), GraphError>;

	/// Replaces the hover callback.
	fn set_hover_callback(&mut self, callback: HoverCallback);

	/// Replaces the click callback.
	fn set_click_callback(&mut self, callback: ClickCallback);

	/// Moves the content by `dx`/`dy` screen pixels.
	fn pan(&mut self, dx: f64, dy: f64);

	/// Values above 1 zoom in.
	fn zoom_by(&mut self, factor: f64);

	/// Brings the whole graph back into view.
	fn fit_and_center(&mut self);

	/// Highlights search matches without removing anything. Backends that
	/// only ever receive hard-filtered graphs ignore it.
	fn set_search_highlight(&mut self, _query: Option<&str>) {}

	/// Releases the canvas and every listener. Safe to call repeatedly.
	fn destroy(&mut self);
}

/// What a tap on a node ended up doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapOutcome {
	/// The click callback ran.
	Callback,
	/// The node url was opened.
	Navigated,
	/// No callback and no url.
	Ignored,
}

/// Hover and click callbacks registered on a backend.
#[derive(Clone, Default)]
pub struct InteractionCallbacks {
	hover: Option<HoverCallback>,
	click: Option<ClickCallback>,
}

impl InteractionCallbacks {
	/// Registers the hover callback.
	pub fn set_hover(&mut self, callback: HoverCallback) {
		self.hover = Some(callback);
	}

	/// Registers the click callback.
	pub fn set_click(&mut self, callback: ClickCallback) {
		self.click = Some(callback);
	}

	/// Reports a hover change.
	pub fn hover(&self, record: Option<NodeRecord>) {
		if let Some(cb) = &self.hover {
			cb(record);
		}
	}

	/// A registered click callback takes precedence; otherwise the node's
	/// destination, if any, is opened.
	pub fn tap(&self, record: NodeRecord, navigate: impl FnOnce(&str)) -> TapOutcome {
		if let Some(cb) = &self.click {
			cb(record);
			TapOutcome::Callback
		} else if let Some(url) = record.url.as_deref() {
			navigate(url);
			TapOutcome::Navigated
		} else {
			TapOutcome::Ignored
		}
	}
}

/// Viewport command bound to a key.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeyAction {
	/// Pan by screen pixels.
	Pan(f64, f64),
	/// Zoom by a factor.
	Zoom(f64),
	/// Fit and centre.
	Fit,
}

/// Keyboard bindings of the 2D viewport. Arrows look in their direction.
pub fn key_action(key: &str) -> Option<KeyAction> {
	match key {
		"ArrowUp" => Some(KeyAction::Pan(0.0, KEY_PAN_STEP)),
		"ArrowDown" => Some(KeyAction::Pan(0.0, -KEY_PAN_STEP)),
		"ArrowLeft" => Some(KeyAction::Pan(KEY_PAN_STEP, 0.0)),
		"ArrowRight" => Some(KeyAction::Pan(-KEY_PAN_STEP, 0.0)),
		"+" | "=" => Some(KeyAction::Zoom(KEY_ZOOM_FACTOR)),
		"-" => Some(KeyAction::Zoom(1.0 / KEY_ZOOM_FACTOR)),
		"0" => Some(KeyAction::Fit),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use std::cell::{Cell, RefCell};

	use super::*;
	use crate::graph::EntityType;

	fn record(url: Option<&str>) -> NodeRecord {
		NodeRecord {
			id: "a1".into(),
			label: "Agent".into(),
			entity_type: EntityType::Agent,
			color: "#10b981".into(),
			url: url.map(Into::into),
		}
	}

	#[test]
	fn registered_click_wins_over_navigation() {
		let clicks = Rc::new(Cell::new(0));
		let mut callbacks = InteractionCallbacks::default();
		let counter = clicks.clone();
		callbacks.set_click(Rc::new(move |_: NodeRecord| counter.set(counter.get() + 1)));

		let navigations = Cell::new(0);
		let outcome = callbacks.tap(record(Some("/agents/a1")), |_| {
			navigations.set(navigations.get() + 1)
		});
		assert_eq!(outcome, TapOutcome::Callback);
		assert_eq!(clicks.get(), 1);
		assert_eq!(navigations.get(), 0);
	}

	#[test]
	fn falls_back_to_navigation_once() {
		let callbacks = InteractionCallbacks::default();
		let visited = RefCell::new(Vec::new());
		let outcome = callbacks.tap(record(Some("/agents/a1")), |url| {
			visited.borrow_mut().push(url.to_string())
		});
		assert_eq!(outcome, TapOutcome::Navigated);
		assert_eq!(visited.into_inner(), vec!["/agents/a1".to_string()]);

		let outcome = callbacks.tap(record(None), |_| panic!("no destination"));
		assert_eq!(outcome, TapOutcome::Ignored);
	}

	#[test]
	fn hover_forwards_none() {
		let last = Rc::new(RefCell::new(Some(record(None))));
		let mut callbacks = InteractionCallbacks::default();
		let sink = last.clone();
		callbacks.set_hover(Rc::new(move |r: Option<NodeRecord>| *sink.borrow_mut() = r));
		callbacks.hover(None);
		assert!(last.borrow().is_none());
	}

	#[test]
	fn key_bindings() {
		assert_eq!(key_action("ArrowLeft"), Some(KeyAction::Pan(KEY_PAN_STEP, 0.0)));
		assert_eq!(key_action("ArrowDown"), Some(KeyAction::Pan(0.0, -KEY_PAN_STEP)));
		assert_eq!(key_action("="), key_action("+"));
		assert_eq!(key_action("-"), Some(KeyAction::Zoom(1.0 / KEY_ZOOM_FACTOR)));
		assert_eq!(key_action("0"), Some(KeyAction::Fit));
		assert_eq!(key_action("a"), None);
		assert_eq!(key_action("Enter"), None);
	}
}
