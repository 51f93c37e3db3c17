use leptos::prelude::*;
use log::info;

use super::Renderer;
use crate::graph::ViewMode;

/// Reference to the mounted renderer, shared by the viewport that owns it and
/// the toolbar that drives its camera.
///
/// Created by the explorer shell; tearing down is explicit and happens before
/// any replacement is mounted.
#[derive(Clone, Copy)]
pub struct RendererHandle {
	slot: StoredValue<Option<Box<dyn Renderer>>, LocalStorage>,
}

impl Default for RendererHandle {
	fn default() -> Self {
		Self::new()
	}
}

impl RendererHandle {
	/// An empty slot.
	pub fn new() -> Self {
		Self {
			slot: StoredValue::new_local(None),
		}
	}

	/// Stores a mounted renderer, destroying whatever was there before.
	pub fn install(&self, renderer: Box<dyn Renderer>) {
		self.teardown();
		let _ = self.slot.try_set_value(Some(renderer));
	}

	/// Destroys and forgets the current renderer, if any.
	pub fn teardown(&self) {
		let previous = self.slot.try_update_value(|slot| slot.take()).flatten();
		if let Some(mut renderer) = previous {
			info!("tearing down {} renderer", renderer.mode().label());
			renderer.destroy();
		}
	}

	/// Whether a renderer is installed.
	pub fn is_mounted(&self) -> bool {
		self.slot.try_with_value(Option::is_some).unwrap_or(false)
	}

	/// Mode of the installed renderer.
	pub fn mode(&self) -> Option<ViewMode> {
		self.slot
			.try_with_value(|slot| slot.as_ref().map(|r| r.mode()))
			.flatten()
	}

	/// Runs `f` against the mounted renderer; does nothing when none is mounted.
	pub fn with(&self, f: impl FnOnce(&mut dyn Renderer)) {
		let _ = self.slot.try_update_value(|slot| {
			if let Some(renderer) = slot.as_mut() {
				f(renderer.as_mut());
			}
		});
	}

	/// See [`Renderer::pan`].
	pub fn pan(&self, dx: f64, dy: f64) {
		self.with(|r| r.pan(dx, dy));
	}

	/// See [`Renderer::zoom_by`].
	pub fn zoom_by(&self, factor: f64) {
		self.with(|r| r.zoom_by(factor));
	}

	/// See [`Renderer::fit_and_center`].
	pub fn fit_and_center(&self) {
		self.with(|r| r.fit_and_center());
	}

	/// See [`Renderer::set_search_highlight`].
	pub fn set_search_highlight(&self, query: Option<&str>) {
		self.with(|r| r.set_search_highlight(query));
	}
}
