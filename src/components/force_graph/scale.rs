//! Zoom-dependent scaling configuration for graph visuals.
//!
//! Centralizes how sizes and opacities respond to the zoom level so the
//! renderer never hand-computes `k` corrections inline.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: The coordinate system of the graph. Values in
//!   world-space scale proportionally with zoom.
//! - **Screen-space**: Pixel coordinates on the canvas. Values in
//!   screen-space remain constant regardless of zoom level.

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
#[allow(
	dead_code,
	reason = "World/Screen variants complete the API for users customizing ScaleConfig"
)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	/// `(min_screen_px, max_screen_px)` - use `f64::NEG_INFINITY` or `f64::INFINITY` for unbounded.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// Compute the world-space value for a given base value and zoom level.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => {
				// screen_size = world_size * k, so bounds divide by k.
				let min_world = min_screen / k;
				let max_world = max_screen / k;
				base.clamp(min_world, max_world)
			}
		}
	}
}

/// Defines how alpha/opacity scales with zoom level.
#[derive(Clone, Debug)]
#[allow(
	dead_code,
	reason = "Constant/ScaleWithZoom variants available for custom alpha behaviors"
)]
pub enum AlphaBehavior {
	/// Constant alpha regardless of zoom.
	Constant,
	/// Alpha scales linearly with zoom, clamped to [0, 1].
	ScaleWithZoom,
	/// Alpha fades based on zoom thresholds.
	/// Fully visible at `full_alpha_k`, fades to zero at `zero_alpha_k`.
	Fade {
		zero_alpha_k: f64,
		full_alpha_k: f64,
	},
}

impl AlphaBehavior {
	/// Compute alpha multiplier for a given zoom level.
	pub fn apply(&self, k: f64) -> f64 {
		match self {
			AlphaBehavior::Constant => 1.0,
			AlphaBehavior::ScaleWithZoom => k.clamp(0.0, 1.0),
			AlphaBehavior::Fade {
				zero_alpha_k,
				full_alpha_k,
			} => {
				if zero_alpha_k == full_alpha_k {
					return 1.0;
				}
				let t = (k - zero_alpha_k) / (full_alpha_k - zero_alpha_k);
				t.clamp(0.0, 1.0)
			}
		}
	}
}

/// Configuration for node visual scaling.
#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	/// Base node radius in world units, before the per-node size factor.
	pub radius: f64,
	/// How the node radius scales with zoom.
	pub radius_behavior: ScaleBehavior,
	/// Hit detection radius in world units.
	pub hit_radius: f64,
	/// How hit radius scales with zoom.
	pub hit_behavior: ScaleBehavior,
	/// Label font size in screen pixels.
	pub label_size: f64,
	/// Minimum zoom level for label font scaling.
	pub label_min_k: f64,
}

/// Configuration for edge visual scaling.
#[derive(Clone, Debug)]
pub struct EdgeScaleConfig {
	/// Base line width in screen pixels.
	pub line_width: f64,
	/// How dash pattern visibility scales with zoom.
	/// When faded out, dashed relations render as solid lines.
	pub dash_alpha_behavior: AlphaBehavior,
}

/// Configuration for the hover ring.
#[derive(Clone, Debug)]
pub struct HoverScaleConfig {
	/// Stroke width for the hover ring in screen pixels.
	pub ring_width: f64,
	/// Ring offset from node edge in screen pixels.
	pub ring_offset: f64,
}

/// Complete scale configuration for all graph elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	pub node: NodeScaleConfig,
	pub edge: EdgeScaleConfig,
	pub hover: HoverScaleConfig,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				radius: 14.0,
				radius_behavior: ScaleBehavior::Clamped {
					min_screen: 6.0,
					max_screen: f64::INFINITY,
				},
				hit_radius: 18.0,
				hit_behavior: ScaleBehavior::Clamped {
					min_screen: 10.0,
					max_screen: f64::INFINITY,
				},
				label_size: 11.0,
				label_min_k: 0.5,
			},
			edge: EdgeScaleConfig {
				line_width: 1.5,
				dash_alpha_behavior: AlphaBehavior::Fade {
					zero_alpha_k: 0.4,
					full_alpha_k: 0.9,
				},
			},
			hover: HoverScaleConfig {
				ring_width: 1.5,
				ring_offset: 3.0,
			},
		}
	}
}

/// Pre-computed scale values for a specific zoom level.
///
/// Create this once per frame and pass it to rendering functions.
/// All sizes are in world-space (ready to use after canvas transform).
#[derive(Clone, Debug)]
#[allow(
	dead_code,
	reason = "k field useful for debugging and future zoom-dependent logic"
)]
pub struct ScaledValues {
	/// Current zoom level.
	pub k: f64,
	/// Node radius in world-space.
	pub node_radius: f64,
	/// Hit detection radius in world-space.
	pub hit_radius: f64,
	/// Label font size string (e.g., "11px sans-serif").
	pub label_font: String,
	/// Edge line width in world-space.
	pub edge_line_width: f64,
	/// Dash pattern visibility [0, 1]. At 0, edges are solid lines.
	pub dash_alpha: f64,
	/// Hover ring width in world-space.
	pub ring_width: f64,
	/// Hover ring offset in world-space.
	pub ring_offset: f64,
}

impl ScaledValues {
	/// Compute scaled values from configuration and current zoom level.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let node_radius = config.node.radius_behavior.apply(config.node.radius, k);
		let hit_radius = config.node.hit_behavior.apply(config.node.hit_radius, k);
		let label_font_size = config.node.label_size / k.max(config.node.label_min_k);
		let dash_alpha = config.edge.dash_alpha_behavior.apply(k);

		Self {
			k,
			node_radius,
			hit_radius,
			label_font: format!("{}px sans-serif", label_font_size),
			edge_line_width: config.edge.line_width / k,
			dash_alpha,
			ring_width: config.hover.ring_width / k,
			ring_offset: config.hover.ring_offset / k,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clamped_behavior_enforces_screen_minimum() {
		let behavior = ScaleBehavior::Clamped {
			min_screen: 6.0,
			max_screen: f64::INFINITY,
		};
		// Zoomed far out, 14 world units would be 1.4px; clamp lifts it.
		assert_eq!(behavior.apply(14.0, 0.1), 60.0);
		// At normal zoom the base value passes through.
		assert_eq!(behavior.apply(14.0, 1.0), 14.0);
	}

	#[test]
	fn screen_behavior_counteracts_zoom() {
		assert_eq!(ScaleBehavior::Screen.apply(10.0, 2.0), 5.0);
		assert_eq!(ScaleBehavior::World.apply(10.0, 2.0), 10.0);
	}

	#[test]
	fn fade_alpha_clamps_to_unit_range() {
		let fade = AlphaBehavior::Fade {
			zero_alpha_k: 0.4,
			full_alpha_k: 0.9,
		};
		assert_eq!(fade.apply(0.2), 0.0);
		assert_eq!(fade.apply(1.5), 1.0);
		let mid = fade.apply(0.65);
		assert!(mid > 0.4 && mid < 0.6);
	}

	#[test]
	fn scaled_values_derive_from_config() {
		let values = ScaledValues::new(&ScaleConfig::default(), 2.0);
		assert_eq!(values.k, 2.0);
		assert_eq!(values.edge_line_width, 0.75);
		assert_eq!(values.dash_alpha, 1.0);
		assert!(values.label_font.ends_with("px sans-serif"));
	}
}
