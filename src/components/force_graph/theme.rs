//! Visual theming for the family graph.
//!
//! Encodes the fixed visual language of the view: the central person is
//! always accent blue, direct relatives are colored by reported gender, and
//! everyone else falls onto a gray ramp that darkens with relational depth.
//! Link styles carry the per-relation stroke and rest distance.

use crate::family::{FamilyNode, Gender, RelationKind};

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Primary background color
	pub color: Color,
	/// Secondary color for gradients
	pub color_secondary: Color,
	/// Whether to use radial gradient
	pub use_gradient: bool,
	/// Vignette intensity (0.0 = none, 1.0 = strong)
	pub vignette: f64,
}

/// Node visual style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Whether nodes have inner gradients
	pub use_gradient: bool,
	/// Border/stroke width (0 = no border)
	pub border_width: f64,
	/// Border color
	pub border_color: Color,
	/// Fill for the central person, regardless of gender.
	pub central: Color,
	pub male: Color,
	pub female: Color,
	/// Grays for unknown-gender nodes, darkening with depth. Index 0 is
	/// depth 1; deeper nodes clamp to the last entry.
	pub depth_ramp: Vec<Color>,
}

/// Stroke and layout parameters for one relation kind.
#[derive(Clone, Debug)]
pub struct LinkStyle {
	pub color: Color,
	/// Dash pattern in world units; `None` draws a solid line.
	pub dash: Option<(f64, f64)>,
	/// Rest distance the layout relaxes the link towards.
	pub distance: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: BackgroundStyle,
	pub node: NodeStyle,
	pub parent_link: LinkStyle,
	pub spouse_link: LinkStyle,
	pub sibling_link: LinkStyle,
}

impl Theme {
	/// Dark default theme used everywhere in the app.
	pub fn default_theme() -> Self {
		Self {
			name: "default",
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
				color_secondary: Color::rgb(30, 35, 42),
				use_gradient: true,
				vignette: 0.15,
			},
			node: NodeStyle {
				use_gradient: true,
				border_width: 0.0,
				border_color: Color::rgba(255, 255, 255, 0.0),
				central: Color::rgb(25, 118, 210),
				male: Color::rgb(144, 202, 249),
				female: Color::rgb(244, 143, 177),
				depth_ramp: vec![
					Color::rgb(176, 190, 197),
					Color::rgb(144, 164, 174),
					Color::rgb(120, 144, 156),
					Color::rgb(96, 125, 139),
				],
			},
			parent_link: LinkStyle {
				color: Color::rgba(140, 160, 180, 0.5),
				dash: None,
				distance: 110.0,
			},
			spouse_link: LinkStyle {
				color: Color::rgba(214, 140, 160, 0.55),
				dash: Some((10.0, 6.0)),
				distance: 80.0,
			},
			sibling_link: LinkStyle {
				color: Color::rgba(140, 160, 180, 0.4),
				dash: Some((3.0, 4.0)),
				distance: 70.0,
			},
		}
	}

	pub fn link_style(&self, kind: RelationKind) -> &LinkStyle {
		match kind {
			RelationKind::Parent => &self.parent_link,
			RelationKind::Spouse => &self.spouse_link,
			RelationKind::Sibling => &self.sibling_link,
		}
	}

	/// Fill color for a node. The central person (depth 0) always gets the
	/// accent color; everyone else is colored by gender when known, by the
	/// depth ramp otherwise.
	pub fn node_fill(&self, node: &FamilyNode) -> Color {
		if node.depth == 0 {
			return self.node.central;
		}
		match node.person.gender() {
			Gender::Male => self.node.male,
			Gender::Female => self.node.female,
			Gender::Other | Gender::Unknown => {
				let ramp = &self.node.depth_ramp;
				let index = (node.depth.saturating_sub(1) as usize).min(ramp.len().saturating_sub(1));
				ramp.get(index).copied().unwrap_or(Color::rgb(120, 144, 156))
			}
		}
	}

	/// Radius multiplier for a node: the central person reads larger, and
	/// distant relatives slightly smaller, than direct relatives.
	pub fn node_scale(&self, node: &FamilyNode) -> f64 {
		if node.depth == 0 {
			1.6
		} else if node.depth == 1 {
			1.0
		} else {
			0.85
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::family::{NodeKind, PersonRef};

	fn node(depth: u32, gender: Option<&str>) -> FamilyNode {
		FamilyNode {
			person: PersonRef {
				id: "Q1".to_string(),
				gender: gender.map(str::to_string),
				..PersonRef::default()
			},
			depth,
			kind: NodeKind::Relative,
		}
	}

	#[test]
	fn central_fill_ignores_gender() {
		let theme = Theme::default_theme();
		assert_eq!(theme.node_fill(&node(0, Some("female"))), theme.node.central);
	}

	#[test]
	fn direct_relatives_are_colored_by_gender() {
		let theme = Theme::default_theme();
		assert_eq!(theme.node_fill(&node(1, Some("male"))), theme.node.male);
		assert_eq!(theme.node_fill(&node(1, Some("female"))), theme.node.female);
		assert_eq!(theme.node_fill(&node(1, None)), theme.node.depth_ramp[0]);
	}

	#[test]
	fn depth_ramp_clamps_at_its_end() {
		let theme = Theme::default_theme();
		let last = *theme.node.depth_ramp.last().unwrap();
		assert_eq!(theme.node_fill(&node(99, None)), last);
		assert_eq!(theme.node_fill(&node(2, None)), theme.node.depth_ramp[1]);
	}

	#[test]
	fn node_scale_shrinks_with_depth() {
		let theme = Theme::default_theme();
		assert!(theme.node_scale(&node(0, None)) > theme.node_scale(&node(1, None)));
		assert!(theme.node_scale(&node(1, None)) > theme.node_scale(&node(3, None)));
	}

	#[test]
	fn css_output_formats() {
		assert_eq!(Color::rgb(25, 118, 210).to_css(), "#1976d2");
		assert_eq!(Color::rgba(0, 0, 0, 0.5).to_css(), "rgba(0, 0, 0, 0.5)");
	}
}
