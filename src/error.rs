//! Error type shared by the fetch path and the renderers.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Everything that can go wrong between the graph endpoint and a mounted canvas.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GraphError {
	/// The request never produced a response.
	#[error("network error: {0}")]
	Network(String),
	/// The server answered with a non-success status.
	#[error("server responded with status {0}")]
	Http(u16),
	/// The response body was not a graph payload.
	#[error("could not read graph data: {0}")]
	Decode(String),
	/// The request was cancelled before it completed.
	#[error("request aborted")]
	Aborted,
	/// No `window` object (not running in a browser).
	#[error("browser window is unavailable")]
	NoWindow,
	/// The renderer container is not attached to the document.
	#[error("graph container is not attached to the document")]
	Detached,
	/// The canvas or its 2d context could not be created.
	#[error("canvas unavailable: {0}")]
	Canvas(String),
}

impl GraphError {
	/// Converts a thrown JS value into a network error message.
	pub fn from_js(err: JsValue) -> Self {
		Self::Network(describe_js(&err))
	}

	/// Converts a thrown JS value raised while building the canvas.
	pub fn canvas(err: JsValue) -> Self {
		Self::Canvas(describe_js(&err))
	}
}

fn describe_js(err: &JsValue) -> String {
	err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

impl From<serde_json::Error> for GraphError {
	fn from(err: serde_json::Error) -> Self {
		Self::Decode(err.to_string())
	}
}
