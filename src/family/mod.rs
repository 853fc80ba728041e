//! Family-network domain model and graph construction.

mod builder;
mod types;

pub mod dates;

pub use builder::build_graph;
pub use types::{
	FamilyBuckets, FamilyGraph, FamilyLink, FamilyNode, FamilyPayload, Gender, NetworkLink,
	NetworkNode, NetworkPayload, NodeKind, PersonRef, RelationKind,
};
