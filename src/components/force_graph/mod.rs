//! Force-directed family graph component.
//!
//! Renders an interactive family network on an HTML canvas with:
//! - Physics-based node positioning via force simulation, with per-relation
//!   link distances and viewport-bounded layout
//! - Pan, zoom, and node dragging interactions
//! - Hover tooltips, smooth highlight transitions, and click-through
//!   navigation to a relative's detail page
//! - Gender/depth color encoding and per-relation stroke styles
//!
//! # Example
//!
//! ```ignore
//! use lineage::family::{build_graph, FamilyPayload, PersonRef};
//! use lineage::components::force_graph::FamilyGraphCanvas;
//!
//! let graph = build_graph(&person, &payload);
//!
//! view! { <FamilyGraphCanvas data=graph height=Some(520.0) /> }
//! ```

mod component;
mod render;
pub mod scale;
mod state;
pub mod theme;

pub use component::{FamilyGraphCanvas, TooltipInfo};
pub use theme::Theme;
