use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::PhysicsGraphState;
use crate::config::StyleConfig;
use crate::graph::registry::with_alpha;

const DIMMED_ALPHA: f64 = 0.15;
/// Labels are only drawn for nodes at least this large on screen.
const LABEL_MIN_RADIUS: f64 = 6.0;

pub fn render(state: &PhysicsGraphState, ctx: &CanvasRenderingContext2d, style: &StyleConfig) {
	ctx.set_fill_style_str(&style.background);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	let projected = state.projected();
	let particles = &state.sim.particles;
	let has_highlight = state.hovered.is_some();

	ctx.set_line_width(1.0);
	for link in &state.sim.links {
		let (Some(a), Some(b)) = (projected[link.source], projected[link.target]) else {
			continue;
		};
		let lit = has_highlight
			&& state.is_highlighted(link.source)
			&& state.is_highlighted(link.target);
		let dimmed = particles[link.source].dimmed || particles[link.target].dimmed;
		let alpha = if lit {
			(style.edge_opacity * 2.2).min(0.9)
		} else if dimmed || has_highlight {
			style.edge_opacity * DIMMED_ALPHA
		} else {
			style.edge_opacity
		};
		ctx.set_stroke_style_str(&with_alpha(&particles[link.source].record.color, alpha));
		ctx.begin_path();
		ctx.move_to(a.x, a.y);
		ctx.line_to(b.x, b.y);
		ctx.stroke();
	}

	// painter's algorithm: farthest first
	let mut order: Vec<usize> = (0..particles.len())
		.filter(|&i| projected[i].is_some())
		.collect();
	order.sort_by(|&a, &b| {
		let depth = |i: usize| projected[i].map_or(0.0, |p| p.depth);
		depth(b).total_cmp(&depth(a))
	});

	ctx.set_font("11px sans-serif");
	for i in order {
		let (Some(p), particle) = (projected[i], &particles[i]) else {
			continue;
		};
		let radius = (particle.radius * p.scale).max(1.0);
		let faded = particle.dimmed || (has_highlight && !state.is_highlighted(i));
		let fill = if faded {
			with_alpha(&particle.record.color, DIMMED_ALPHA)
		} else {
			particle.record.color.clone()
		};

		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&fill);
		ctx.fill();

		if state.hovered == Some(i) {
			ctx.begin_path();
			let _ = ctx.arc(p.x, p.y, radius + 2.0, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("rgba(255, 255, 255, 0.7)");
			ctx.set_line_width(1.5);
			ctx.stroke();
			ctx.set_line_width(1.0);
		}

		if !faded && (radius >= LABEL_MIN_RADIUS || state.is_highlighted(i)) {
			ctx.set_fill_style_str(&style.label_color);
			let _ = ctx.fill_text(&particle.record.label, p.x + radius + 3.0, p.y + 3.0);
		}
	}
}
