//! Graph simulation state and interaction tracking.
//!
//! Wraps the `force_graph` physics simulation with per-node display data,
//! view transforms for pan/zoom, and highlight state for hover effects with
//! smooth intensity transitions. The simulation owns all transient positions;
//! the [`crate::family::FamilyGraph`] it was built from stays immutable.

use std::collections::{HashMap, HashSet};

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::family::{FamilyGraph, NodeKind, RelationKind, dates};

use super::scale::{ScaleConfig, ScaledValues};
use super::theme::{Color, Theme};

/// Per-node display payload attached to each node in the simulation.
#[derive(Clone, Debug)]
pub struct NodeVisual {
	/// Person id, used for click-through navigation.
	pub id: String,
	pub name: String,
	pub kind: NodeKind,
	pub color: Color,
	/// Size multiplier (1.0 = direct relative, central person larger).
	pub size: f64,
	/// Pre-formatted year range for the tooltip.
	pub lifespan: String,
	pub bio: Option<String>,
}

/// A rendered link between two simulation nodes.
#[derive(Clone, Copy, Debug)]
pub struct GraphLink {
	pub a: DefaultNodeIdx,
	pub b: DefaultNodeIdx,
	pub kind: RelationKind,
	/// Rest distance the layout relaxes this link towards.
	pub distance: f64,
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to 0.1..10.0).
	pub k: f64,
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Manages smooth highlight transitions with per-node intensity tracking.
///
/// Each node has its own intensity value (0.0 to 1.0) that animates towards
/// membership in the active highlight set using exponential smoothing, which
/// slows down as it approaches its target.
///
/// A minimum hold time prevents flashing when the pointer briefly skirts the
/// edge of a node's hover zone.
#[derive(Clone, Debug, Default)]
pub struct HighlightState {
	/// Currently hovered node (if any)
	pub hovered: Option<DefaultNodeIdx>,
	/// Nodes that should be highlighted (hovered + direct neighbors)
	target: HashSet<DefaultNodeIdx>,
	/// Per-node highlight intensity; nodes not in the map are at 0.
	level: HashMap<DefaultNodeIdx, f64>,
	/// Smoothed intensity for the hover ring (hovered node only).
	ring: HashMap<DefaultNodeIdx, f64>,
	/// Per-node time remaining before fade-out may begin.
	hold: HashMap<DefaultNodeIdx, f64>,
	/// Cached max intensity, updated each tick.
	peak: f64,
}

/// Minimum time (seconds) a highlight is held before it can fade out.
const MIN_HOLD_TIME: f64 = 0.12;

impl HighlightState {
	/// Update the hovered node and recompute the target highlight set.
	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>, links: &[GraphLink]) {
		if self.hovered == node {
			return;
		}

		self.hovered = node;
		self.target.clear();

		if let Some(idx) = node {
			self.target.insert(idx);
			for link in links {
				if link.a == idx {
					self.target.insert(link.b);
				} else if link.b == idx {
					self.target.insert(link.a);
				}
			}
			for &idx in &self.target {
				self.hold.insert(idx, MIN_HOLD_TIME);
			}
		}
	}

	/// Animate all intensities towards their targets.
	///
	/// Exponential smoothing: value += (target - value) * (1 - e^(-speed * dt)),
	/// a natural ease-out that slows as it approaches the target.
	pub fn tick(&mut self, dt: f64) {
		const FADE_IN_SPEED: f64 = 6.0; // ~150ms to 95%
		const FADE_OUT_SPEED: f64 = 4.0; // ~250ms to 95%

		let fade_in_factor = 1.0 - (-FADE_IN_SPEED * dt).exp();
		let fade_out_decay = (-FADE_OUT_SPEED * dt).exp();

		for &idx in &self.target {
			let level = self.level.entry(idx).or_insert(0.0);
			*level += (1.0 - *level) * fade_in_factor;
		}
		if let Some(idx) = self.hovered {
			let level = self.ring.entry(idx).or_insert(0.0);
			*level += (1.0 - *level) * fade_in_factor;
		}

		self.hold.retain(|idx, timer| {
			if self.target.contains(idx) {
				true
			} else {
				*timer -= dt;
				*timer > 0.0
			}
		});

		let mut new_peak: f64 = 0.0;
		self.level.retain(|idx, level| {
			if self.target.contains(idx) {
				new_peak = new_peak.max(*level);
				true
			} else {
				if self.hold.get(idx).copied().unwrap_or(0.0) <= 0.0 {
					*level *= fade_out_decay;
				}
				new_peak = new_peak.max(*level);
				*level > 0.005
			}
		});
		self.ring.retain(|idx, level| {
			if self.hovered == Some(*idx) {
				true
			} else {
				if self.hold.get(idx).copied().unwrap_or(0.0) <= 0.0 {
					*level *= fade_out_decay;
				}
				*level > 0.005
			}
		});

		self.peak = new_peak;
	}

	/// Smoothed highlight intensity for a node.
	pub fn node_level(&self, idx: DefaultNodeIdx) -> f64 {
		self.level.get(&idx).copied().unwrap_or(0.0)
	}

	/// Smoothed ring intensity for a node.
	pub fn ring_level(&self, idx: DefaultNodeIdx) -> f64 {
		self.ring.get(&idx).copied().unwrap_or(0.0)
	}

	/// Highlight intensity for a link: it follows the hovered endpoint's
	/// ring intensity, so only links touching the hovered node light up.
	/// A link between two neighbors of the hovered node stays dimmed even
	/// though both its endpoints are raised.
	pub fn link_level(&self, a: DefaultNodeIdx, b: DefaultNodeIdx) -> f64 {
		self.ring_level(a).max(self.ring_level(b))
	}

	/// Max intensity of any node, used to dim non-highlighted elements.
	pub fn peak(&self) -> f64 {
		self.peak
	}
}

/// Fraction of link-length error corrected per second.
const LINK_RELAX: f32 = 2.4;
/// Pull towards the world origin (the viewport center), per second.
const CENTER_PULL: f32 = 0.6;
/// Base separation radius for the collision pass, scaled by node sizes.
const COLLISION_RADIUS: f64 = 30.0;
/// Free margin kept between nodes and the viewport edge, world units.
const BOUNDS_MARGIN: f64 = 28.0;

/// Core graph state combining the physics simulation with interaction and
/// highlight tracking.
///
/// Created once per mounted graph, then mutated each frame by the animation
/// loop. Interaction handlers call the `begin_*`/`*_to`/`release` methods
/// instead of touching the simulation directly.
pub struct GraphState {
	pub graph: ForceGraph<NodeVisual, ()>,
	pub links: Vec<GraphLink>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub highlight: HighlightState,
	pub width: f64,
	pub height: f64,
}

impl GraphState {
	pub fn new(data: &FamilyGraph, width: f64, height: f64, theme: &Theme) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut id_to_idx = HashMap::new();
		let mut links = Vec::new();

		// Nodes are seeded near the world origin (which the view transform
		// maps to the viewport center), each kind in its own sector so the
		// first frames already resemble the settled layout.
		let mut kind_totals: HashMap<NodeKind, usize> = HashMap::new();
		for node in &data.nodes {
			*kind_totals.entry(node.kind).or_insert(0) += 1;
		}
		let mut kind_slots: HashMap<NodeKind, usize> = HashMap::new();

		for (i, node) in data.nodes.iter().enumerate() {
			let slot = kind_slots.entry(node.kind).or_insert(0);
			let (x, y) = if node.kind == NodeKind::Central {
				(0.0, 0.0)
			} else {
				let total = kind_totals.get(&node.kind).copied().unwrap_or(1).max(1);
				let angle = seed_angle(node.kind, *slot, total);
				let radius = 90.0 * f64::from(node.depth.max(1)) + 24.0 * pseudo_random(i as f64 + 1.0);
				((radius * angle.cos()) as f32, (radius * angle.sin()) as f32)
			};
			*slot += 1;

			let living = node.depth == 0 && node.person.death_date.is_none();
			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: if node.kind == NodeKind::Central { 16.0 } else { 10.0 },
				is_anchor: false,
				user_data: NodeVisual {
					id: node.person.id.clone(),
					name: node.person.display_name().to_string(),
					kind: node.kind,
					color: theme.node_fill(node),
					size: theme.node_scale(node),
					lifespan: dates::lifespan(
						node.person.birth_date.as_deref(),
						node.person.death_date.as_deref(),
						living,
					),
					bio: node.person.bio.clone(),
				},
			});
			id_to_idx.insert(node.person.id.clone(), idx);
		}

		for link in &data.links {
			if let (Some(&a), Some(&b)) = (id_to_idx.get(&link.source), id_to_idx.get(&link.target)) {
				graph.add_edge(a, b, EdgeData::default());
				links.push(GraphLink {
					a,
					b,
					kind: link.kind,
					distance: theme.link_style(link.kind).distance,
				});
			}
		}

		Self {
			graph,
			links,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			highlight: HighlightState::default(),
			width,
			height,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64, config: &ScaleConfig) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let scale = ScaledValues::new(config, self.transform.k);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let node_hit_radius = scale.hit_radius * node.data.user_data.size;
			if (dx * dx + dy * dy).sqrt() < node_hit_radius {
				found = Some(node.index());
			}
		});
		found
	}

	/// Display payload of a node, cloned for tooltips and click handling.
	pub fn node_visual(&self, idx: DefaultNodeIdx) -> Option<NodeVisual> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(node.data.user_data.clone());
			}
		});
		found
	}

	/// Snapshot of node positions and sizes, keyed by simulation index.
	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64, f64)> {
		let mut at = HashMap::with_capacity(self.links.len() * 2);
		self.graph.visit_nodes(|node| {
			at.insert(
				node.index(),
				(node.x() as f64, node.y() as f64, node.data.user_data.size),
			);
		});
		at
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		self.highlight.set_hover(node, &self.links);
	}

	/// Starts dragging a node, remembering where it and the pointer were.
	pub fn begin_drag(&mut self, idx: DefaultNodeIdx, sx: f64, sy: f64) {
		let mut node_start = (0.0f32, 0.0f32);
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				node_start = (node.x(), node.y());
			}
		});
		self.drag = DragState {
			active: true,
			node_idx: Some(idx),
			start_x: sx,
			start_y: sy,
			node_start_x: node_start.0,
			node_start_y: node_start.1,
		};
	}

	/// Moves the dragged node to follow the pointer. The node is anchored
	/// while held so the simulation cannot fight the user.
	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		let Some(idx) = self.drag.node_idx else {
			return;
		};
		let dx = ((sx - self.drag.start_x) / self.transform.k) as f32;
		let dy = ((sy - self.drag.start_y) / self.transform.k) as f32;
		let x = self.drag.node_start_x + dx;
		let y = self.drag.node_start_y + dy;
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.x = x;
				node.data.y = y;
				node.data.is_anchor = true;
			}
		});
	}

	/// Releases the dragged node back to the simulation.
	pub fn release(&mut self, idx: DefaultNodeIdx) {
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.is_anchor = false;
			}
		});
	}

	pub fn begin_pan(&mut self, sx: f64, sy: f64) {
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	pub fn pan_to(&mut self, sx: f64, sy: f64) {
		if !self.pan.active {
			return;
		}
		self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
		self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
	}

	/// Zooms around a pointer position so the world point under the cursor
	/// stays put.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y < 0.0 { 1.1 } else { 1.0 / 1.1 };
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Advances the simulation and the highlight animation by `dt` seconds.
	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.apply_layout_hints(dt);
		self.highlight.tick(f64::from(dt));
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Layout passes the base simulation does not provide: per-relation
	/// link distances, pairwise collision separation, a gentle pull towards
	/// the center, and a hard clamp to the visible bounds. Anchored nodes
	/// only receive the clamp.
	fn apply_layout_hints(&mut self, dt: f32) {
		let positions = self.positions();
		let mut order: Vec<DefaultNodeIdx> = Vec::with_capacity(positions.len());
		self.graph.visit_nodes(|node| order.push(node.index()));

		let mut shift: HashMap<DefaultNodeIdx, (f32, f32)> = HashMap::new();
		let add_shift = |map: &mut HashMap<DefaultNodeIdx, (f32, f32)>, idx: DefaultNodeIdx, dx: f32, dy: f32| {
			let entry = map.entry(idx).or_insert((0.0, 0.0));
			entry.0 += dx;
			entry.1 += dy;
		};

		// Relax links towards their per-relation rest distance.
		let relax = (f64::from(LINK_RELAX) * f64::from(dt)).min(0.5) as f32;
		for link in &self.links {
			let (Some(&(ax, ay, _)), Some(&(bx, by, _))) = (positions.get(&link.a), positions.get(&link.b)) else {
				continue;
			};
			let (dx, dy) = ((bx - ax) as f32, (by - ay) as f32);
			let dist = (dx * dx + dy * dy).sqrt().max(0.001);
			let error = dist - link.distance as f32;
			let step = error / dist * relax * 0.5;
			add_shift(&mut shift, link.a, dx * step, dy * step);
			add_shift(&mut shift, link.b, -dx * step, -dy * step);
		}

		// Separate overlapping pairs; family graphs are small enough that
		// the quadratic pass stays cheap.
		for i in 0..order.len() {
			for j in (i + 1)..order.len() {
				let (Some(&(ax, ay, sa)), Some(&(bx, by, sb))) = (positions.get(&order[i]), positions.get(&order[j]))
				else {
					continue;
				};
				let min_sep = (COLLISION_RADIUS * (sa + sb) * 0.5) as f32;
				let (mut dx, mut dy) = ((bx - ax) as f32, (by - ay) as f32);
				let mut dist = (dx * dx + dy * dy).sqrt();
				if dist < 0.001 {
					// Coincident nodes get a deterministic nudge apart.
					dx = 0.7;
					dy = 0.7;
					dist = 1.0;
				}
				if dist < min_sep {
					let push = (min_sep - dist) * 0.5 / dist;
					add_shift(&mut shift, order[i], -dx * push, -dy * push);
					add_shift(&mut shift, order[j], dx * push, dy * push);
				}
			}
		}

		let pull = CENTER_PULL * dt;
		let max_x = ((self.width / 2.0) - BOUNDS_MARGIN).max(BOUNDS_MARGIN) as f32;
		let max_y = ((self.height / 2.0) - BOUNDS_MARGIN).max(BOUNDS_MARGIN) as f32;
		self.graph.visit_nodes_mut(|node| {
			if !node.data.is_anchor {
				if let Some(&(dx, dy)) = shift.get(&node.index()) {
					node.data.x += dx;
					node.data.y += dy;
				}
				node.data.x -= node.data.x * pull;
				node.data.y -= node.data.y * pull;
			}
			node.data.x = node.data.x.clamp(-max_x, max_x);
			node.data.y = node.data.y.clamp(-max_y, max_y);
		});
	}
}

/// Sector for seeding a node of the given kind: parents start above the
/// center, children below, spouses to the right, siblings to the left.
fn seed_angle(kind: NodeKind, slot: usize, total: usize) -> f64 {
	use std::f64::consts::PI;
	let base = match kind {
		NodeKind::Parent => -PI / 2.0,
		NodeKind::Child => PI / 2.0,
		NodeKind::Spouse => 0.0,
		NodeKind::Sibling => PI,
		NodeKind::Central => 0.0,
		NodeKind::Relative => PI / 4.0,
	};
	let spread = (slot as f64) - (total.saturating_sub(1) as f64) / 2.0;
	base + spread * 0.45
}

/// Cheap deterministic jitter in [0, 1).
fn pseudo_random(seed: f64) -> f64 {
	let x = seed.sin() * 43758.5453123;
	x - x.floor()
}
