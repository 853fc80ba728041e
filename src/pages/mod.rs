//! Top-level routed pages.

pub mod details;
pub mod home;
pub mod not_found;
pub mod search;
