//! Leptos components for the genealogy front-end.

pub mod batch_panel;
pub mod force_graph;
pub mod pagination;
pub mod person_panel;
pub mod search_form;
