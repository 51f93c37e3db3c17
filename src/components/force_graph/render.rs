use std::collections::HashMap;
use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::ForceGraphState;
use crate::config::StyleConfig;
use crate::graph::registry::with_alpha;

const DIMMED_ALPHA: f64 = 0.25;

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, style: &StyleConfig) {
	ctx.set_fill_style_str(&style.background);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx, style);
	draw_nodes(state, ctx, style);
	ctx.restore();
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, style: &StyleConfig) {
	let k = state.transform.k;
	let (line_width, arrow_size) = (1.2 / k, 6.0 / k);
	let has_highlight = state.has_active_highlight();
	let positions = state.positions();
	let mut colors = HashMap::new();
	let mut radii = HashMap::new();
	state.graph.visit_nodes(|node| {
		colors.insert(node.index(), node.data.user_data.record.color.clone());
		radii.insert(node.index(), node.data.user_data.radius);
	});

	for edge in &state.edges {
		let (Some(&(x1, y1)), Some(&(x2, y2))) =
			(positions.get(&edge.source), positions.get(&edge.target))
		else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		let lit = state.is_highlighted(edge.source) && state.is_highlighted(edge.target);
		let alpha = match (has_highlight, lit) {
			(false, _) => style.edge_opacity,
			(true, true) => (style.edge_opacity * 2.2).min(0.9),
			(true, false) => style.edge_opacity * DIMMED_ALPHA,
		};
		let color = colors.get(&edge.source).map(String::as_str).unwrap_or("#94a3b8");
		let tint = with_alpha(color, alpha);

		// control point sits on the perpendicular through the midpoint
		let (nx, ny) = (-dy / dist, dx / dist);
		let offset = edge.bend * dist;
		let (cx, cy) = ((x1 + x2) / 2.0 + nx * offset, (y1 + y2) / 2.0 + ny * offset);

		let target_r = radii.get(&edge.target).copied().unwrap_or(5.0);
		let (tx, ty) = (x2 - cx, y2 - cy);
		let tlen = (tx * tx + ty * ty).sqrt().max(0.001);
		let (ux, uy) = (tx / tlen, ty / tlen);
		let (tip_x, tip_y) = (x2 - ux * target_r, y2 - uy * target_r);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);

		ctx.set_stroke_style_str(&tint);
		ctx.set_line_width(if lit && has_highlight { line_width * 1.5 } else { line_width });
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.quadratic_curve_to(cx, cy, back_x, back_y);
		ctx.stroke();

		ctx.set_fill_style_str(&tint);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();

		if lit && has_highlight {
			if let Some(label) = &edge.label {
				ctx.set_fill_style_str(&style.label_color);
				ctx.set_font(&format!("{}px sans-serif", 9.0 / k.max(0.5)));
				let _ = ctx.fill_text(label, cx, cy);
			}
		}
	}
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, style: &StyleConfig) {
	let (has_highlight, k) = (state.has_active_highlight(), state.transform.k);
	let font = format!("{}px sans-serif", 11.0 / k.max(0.5));

	// dimmed nodes first so highlighted ones paint on top
	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if has_highlight && state.is_highlighted(idx) {
			return;
		}
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let alpha = if has_highlight { DIMMED_ALPHA } else { 1.0 };

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(x, y, info.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&info.record.color);
		ctx.fill();
		ctx.set_fill_style_str(&style.label_color);
		ctx.set_font(&font);
		let _ = ctx.fill_text(&info.record.label, x + info.radius + 3.0, y + 3.0);
		ctx.set_global_alpha(1.0);
	});

	if !has_highlight {
		return;
	}

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if !state.is_highlighted(idx) {
			return;
		}
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let is_hovered = state.is_hovered(idx);
		let radius = if is_hovered { info.radius * 1.3 } else { info.radius * 1.1 };

		if is_hovered {
			let glow_radius = info.radius * 3.0;
			if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow_radius) {
				let _ = gradient.add_color_stop(0.0, &with_alpha(&info.record.color, 0.45));
				let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
				ctx.begin_path();
				let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&info.record.color);
		ctx.fill();

		if is_hovered {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("rgba(255, 255, 255, 0.7)");
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		ctx.set_fill_style_str("white");
		ctx.set_font(&font);
		let _ = ctx.fill_text(&info.record.label, x + radius + 3.0, y + 3.0);
	});
}
