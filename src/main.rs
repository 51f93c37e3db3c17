// the binary only mounts the app; every other dependency is used by the library
#![allow(unused_crate_dependencies)]

use knowledge_graph_canvas::{App, init_logging};
use leptos::mount::mount_to_body;

fn main() {
	init_logging();
	mount_to_body(App);
}
