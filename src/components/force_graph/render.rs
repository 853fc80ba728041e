//! Canvas rendering for the family graph.
//!
//! Handles all drawing operations: background, relation links, nodes, labels,
//! and the hover ring. Rendering uses multiple passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Relation links, styled per kind (world space)
//! 3. Non-highlighted nodes, then highlighted nodes on top
//!
//! Hovering a node raises it and its direct relatives to full opacity while
//! everything else dims; the multipliers below smoothly blend between the
//! idle and dimmed values as the highlight intensity animates.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::scale::{ScaleConfig, ScaledValues};
use super::state::{GraphState, NodeVisual};
use super::theme::Theme;

/// Attempt to smooth values that would otherwise cause abrupt visual changes.
fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// Opacity multiplier for a link: 1.0 when idle or highlighted, dimmed in
/// proportion to the strongest active highlight otherwise.
fn link_alpha_multiplier(link_t: f64, peak: f64) -> f64 {
	let dimmed = 1.0 - 0.65 * peak;
	dimmed + (1.0 - dimmed) * link_t
}

/// Opacity multiplier for a node, blending from dimmed to full as its own
/// highlight intensity rises.
fn node_alpha_multiplier(node_t: f64, peak: f64) -> f64 {
	let dimmed = 1.0 - 0.7 * peak;
	dimmed + (1.0 - dimmed) * node_t
}

/// Radius multiplier for a node: dimmed nodes shrink slightly, highlighted
/// ones grow, the hovered node most of all.
fn node_radius_multiplier(node_t: f64, ring_t: f64, peak: f64) -> f64 {
	let dimmed = 1.0 - 0.15 * peak;
	let highlighted = 1.0 + 0.25 * node_t + 0.15 * node_t * ring_t;
	dimmed + (highlighted - dimmed) * node_t
}

/// Renders the complete graph to the canvas.
pub fn render(state: &GraphState, ctx: &CanvasRenderingContext2d, config: &ScaleConfig, theme: &Theme) {
	let scale = ScaledValues::new(config, state.transform.k);

	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_links(state, ctx, &scale, theme);
	draw_nodes(state, ctx, &scale, theme);

	ctx.restore();

	if theme.background.vignette > 0.0 {
		draw_vignette(state, ctx, theme);
	}
}

fn draw_background(state: &GraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	if theme.background.use_gradient {
		let gradient = ctx
			.create_radial_gradient(
				state.width / 2.0,
				state.height / 2.0,
				0.0,
				state.width / 2.0,
				state.height / 2.0,
				(state.width.max(state.height)) * 0.8,
			)
			.unwrap();

		gradient
			.add_color_stop(0.0, &theme.background.color_secondary.to_css())
			.unwrap();
		gradient
			.add_color_stop(1.0, &theme.background.color.to_css())
			.unwrap();

		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
	} else {
		ctx.set_fill_style_str(&theme.background.color.to_css());
	}

	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_vignette(state: &GraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let gradient = ctx
		.create_radial_gradient(
			state.width / 2.0,
			state.height / 2.0,
			state.width.min(state.height) * 0.3,
			state.width / 2.0,
			state.height / 2.0,
			state.width.max(state.height) * 0.7,
		)
		.unwrap();

	gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)").unwrap();
	gradient
		.add_color_stop(
			1.0,
			&format!("rgba(0, 0, 0, {})", theme.background.vignette),
		)
		.unwrap();

	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_links(state: &GraphState, ctx: &CanvasRenderingContext2d, scale: &ScaledValues, theme: &Theme) {
	let positions = state.positions();
	let peak = smooth_step(state.highlight.peak());

	for link in &state.links {
		let (Some(&(x1, y1, s1)), Some(&(x2, y2, s2))) = (positions.get(&link.a), positions.get(&link.b)) else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		let link_t = smooth_step(state.highlight.link_level(link.a, link.b));
		let alpha_mult = link_alpha_multiplier(link_t, peak);
		let style = theme.link_style(link.kind);

		let mut width = scale.edge_line_width * (1.0 + 0.4 * link_t);
		match style.dash {
			Some((dash, gap)) => {
				// Compensate for the dash pattern fading to solid.
				width *= 1.0 + 0.3 * (1.0 - scale.dash_alpha);
				let effective_gap = gap * scale.dash_alpha;
				if effective_gap > 0.1 {
					let _ = ctx.set_line_dash(&js_sys::Array::of2(
						&JsValue::from_f64(dash),
						&JsValue::from_f64(effective_gap),
					));
				} else {
					let _ = ctx.set_line_dash(&js_sys::Array::new());
				}
			}
			None => {
				let _ = ctx.set_line_dash(&js_sys::Array::new());
			}
		}

		ctx.set_stroke_style_str(&style.color.with_alpha(style.color.a * alpha_mult).to_css());
		ctx.set_line_width(width);

		// Trim to each node's edge so strokes do not pierce the circles.
		let (ux, uy) = (dx / dist, dy / dist);
		let (r1, r2) = (scale.node_radius * s1, scale.node_radius * s2);
		ctx.begin_path();
		ctx.move_to(x1 + ux * r1, y1 + uy * r1);
		ctx.line_to(x2 - ux * r2, y2 - uy * r2);
		ctx.stroke();
	}

	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_nodes(state: &GraphState, ctx: &CanvasRenderingContext2d, scale: &ScaledValues, theme: &Theme) {
	let peak = smooth_step(state.highlight.peak());

	// Pass 1: non-highlighted nodes
	state.graph.visit_nodes(|node| {
		let node_t = state.highlight.node_level(node.index());
		if node_t > 0.001 {
			return;
		}
		let alpha = node_alpha_multiplier(0.0, peak);
		let radius_mult = node_radius_multiplier(0.0, 0.0, peak);
		draw_node(
			ctx,
			node.x() as f64,
			node.y() as f64,
			&node.data.user_data,
			scale,
			theme,
			alpha,
			radius_mult,
		);
	});

	// Pass 2: highlighted/transitioning nodes on top
	state.graph.visit_nodes(|node| {
		let idx = node.index();
		let node_t = state.highlight.node_level(idx);
		if node_t <= 0.001 {
			return;
		}

		let eased_t = smooth_step(node_t);
		let ring_t = smooth_step(state.highlight.ring_level(idx));
		let (x, y) = (node.x() as f64, node.y() as f64);

		let alpha = node_alpha_multiplier(eased_t, peak);
		let radius_mult = node_radius_multiplier(eased_t, ring_t, peak);
		draw_node(ctx, x, y, &node.data.user_data, scale, theme, alpha, radius_mult);

		if ring_t > 0.01 {
			let radius = scale.node_radius * radius_mult * node.data.user_data.size;
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + scale.ring_offset, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.8 * ring_t));
			ctx.set_line_width(scale.ring_width);
			ctx.stroke();

			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + scale.ring_offset * 2.5, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.3 * ring_t));
			ctx.set_line_width(scale.ring_width * 0.5);
			ctx.stroke();
		}
	});
}

#[allow(clippy::too_many_arguments)]
fn draw_node(
	ctx: &CanvasRenderingContext2d,
	x: f64,
	y: f64,
	visual: &NodeVisual,
	scale: &ScaledValues,
	theme: &Theme,
	alpha: f64,
	radius_mult: f64,
) {
	let radius = scale.node_radius * radius_mult * visual.size;
	let color = visual.color;

	ctx.set_global_alpha(alpha);

	if theme.node.use_gradient {
		let gradient = ctx
			.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
			.unwrap();

		gradient.add_color_stop(0.0, &color.lighten(0.4).to_css()).unwrap();
		gradient.add_color_stop(0.7, &color.to_css()).unwrap();
		gradient.add_color_stop(1.0, &color.darken(0.2).to_css()).unwrap();

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
		ctx.fill();
	} else {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&color.to_css());
		ctx.fill();
	}

	if theme.node.border_width > 0.0 {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&theme.node.border_color.to_css());
		ctx.set_line_width(theme.node.border_width / scale.k);
		ctx.stroke();
	}

	ctx.set_global_alpha(1.0);

	if alpha > 0.5 {
		ctx.set_global_alpha(alpha * 0.9);
		ctx.set_fill_style_str("rgba(255, 255, 255, 0.85)");
		ctx.set_font(&scale.label_font);
		let _ = ctx.fill_text(&visual.name, x + radius + 4.0, y + 3.0);
		ctx.set_global_alpha(1.0);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn links_dim_when_another_node_is_hovered() {
		// Idle graph: full opacity.
		assert_eq!(link_alpha_multiplier(0.0, 0.0), 1.0);
		// Unrelated link while something is hovered: dimmed below 1.
		let dimmed = link_alpha_multiplier(0.0, 1.0);
		assert!(dimmed < 1.0 && dimmed > 0.0);
		// The hovered link itself stays at full opacity.
		assert_eq!(link_alpha_multiplier(1.0, 1.0), 1.0);
	}

	#[test]
	fn hovered_nodes_grow_and_dimmed_nodes_shrink() {
		let idle = node_radius_multiplier(0.0, 0.0, 0.0);
		let dimmed = node_radius_multiplier(0.0, 0.0, 1.0);
		let neighbor = node_radius_multiplier(1.0, 0.0, 1.0);
		let hovered = node_radius_multiplier(1.0, 1.0, 1.0);
		assert_eq!(idle, 1.0);
		assert!(dimmed < idle);
		assert!(neighbor > idle);
		assert!(hovered > neighbor);
	}

	#[test]
	fn node_alpha_recovers_as_highlight_fades() {
		let mid_fade = node_alpha_multiplier(0.0, 0.5);
		let nearly_gone = node_alpha_multiplier(0.0, 0.05);
		assert!(mid_fade < nearly_gone);
		assert!(nearly_gone < 1.0);
		assert_eq!(node_alpha_multiplier(0.0, 0.0), 1.0);
	}

	#[test]
	fn smooth_step_is_monotonic_on_unit_interval() {
		assert_eq!(smooth_step(0.0), 0.0);
		assert_eq!(smooth_step(1.0), 1.0);
		let mut previous = 0.0;
		for i in 1..=10 {
			let value = smooth_step(f64::from(i) / 10.0);
			assert!(value >= previous);
			previous = value;
		}
	}
}
