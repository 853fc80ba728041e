//! Domain model for family networks.
//!
//! The backend serves family relations in two shapes: grouped buckets
//! (parents/children/spouses/siblings) and a flattened node/link network.
//! Both deserialize here; [`crate::family::build_graph`] normalizes either
//! into the canonical [`FamilyGraph`] consumed by the graph view.

use serde::Deserialize;

/// Identity plus display data for a person, as it appears in relation
/// payloads and in graph nodes.
///
/// Every field except `id` is optional on the wire. Dates are kept as raw
/// strings because upstream values may be partial or malformed; formatting
/// is handled best-effort by [`super::dates`].
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct PersonRef {
	pub id: String,
	pub name: Option<String>,
	pub birth_date: Option<String>,
	pub death_date: Option<String>,
	pub gender: Option<String>,
	#[serde(alias = "description")]
	pub bio: Option<String>,
	pub image_url: Option<String>,
}

impl PersonRef {
	/// Display name, falling back to `"Unknown"` when absent or blank.
	pub fn display_name(&self) -> &str {
		match self.name.as_deref().map(str::trim) {
			Some(name) if !name.is_empty() => name,
			_ => "Unknown",
		}
	}

	/// Parsed gender, tolerant of casing and unexpected values.
	pub fn gender(&self) -> Gender {
		Gender::parse(self.gender.as_deref())
	}
}

/// Gender as reported by the knowledge graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Gender {
	Male,
	Female,
	/// Reported, but neither male nor female.
	Other,
	#[default]
	Unknown,
}

impl Gender {
	/// Total parser: anything unrecognized maps to [`Gender::Other`],
	/// absent or blank values to [`Gender::Unknown`].
	pub fn parse(raw: Option<&str>) -> Self {
		match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
			Some("male") => Self::Male,
			Some("female") => Self::Female,
			None | Some("") | Some("unknown") => Self::Unknown,
			Some(_) => Self::Other,
		}
	}

	/// Human-readable label for the detail panel.
	pub fn label(&self) -> &'static str {
		match self {
			Self::Male => "Male",
			Self::Female => "Female",
			Self::Other => "Other",
			Self::Unknown => "-",
		}
	}
}

/// Typed connection between two people.
///
/// `Parent` edges are directed: the source is the parent and the target the
/// child. A "child" relation is a parent edge read in reverse and never a
/// kind of its own. `Spouse` and `Sibling` are direction-agnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RelationKind {
	Parent,
	Spouse,
	Sibling,
}

impl RelationKind {
	/// Parses the wire `type` field; unknown strings yield `None` so the
	/// caller can drop the link instead of failing the payload.
	pub fn parse(raw: &str) -> Option<Self> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"parent" => Some(Self::Parent),
			"spouse" => Some(Self::Spouse),
			"sibling" => Some(Self::Sibling),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Parent => "parent",
			Self::Spouse => "spouse",
			Self::Sibling => "sibling",
		}
	}
}

/// A node's role relative to the central person of the current view.
///
/// Distinct from [`RelationKind`]: kind describes a node, not an edge. Nodes
/// that are not directly related to the central person (depth two and
/// beyond) are carried as [`NodeKind::Relative`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeKind {
	Central,
	Parent,
	Child,
	Spouse,
	Sibling,
	#[default]
	Relative,
}

impl NodeKind {
	/// Parses the wire `type` field of flattened payloads. The original
	/// backend only distinguishes `"self"` from `"other"`.
	pub fn parse(raw: &str) -> Self {
		match raw.trim().to_ascii_lowercase().as_str() {
			"self" => Self::Central,
			"parent" => Self::Parent,
			"child" => Self::Child,
			"spouse" => Self::Spouse,
			"sibling" => Self::Sibling,
			_ => Self::Relative,
		}
	}
}

/// A person placed in a family graph: identity plus role and relational
/// distance from the central person.
#[derive(Clone, Debug, PartialEq)]
pub struct FamilyNode {
	pub person: PersonRef,
	/// Relational distance from the central person; 0 is the central person
	/// themselves. Current payloads only supply 0 and 1, but deeper nodes
	/// are representable.
	pub depth: u32,
	pub kind: NodeKind,
}

/// A typed edge between two nodes of a [`FamilyGraph`], by person id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FamilyLink {
	pub source: String,
	pub target: String,
	pub kind: RelationKind,
}

/// Canonical, deduplicated family network ready for layout.
///
/// Invariants upheld by the builder: node ids are unique (first insertion
/// wins), and every link endpoint resolves to a node in `nodes`. The graph
/// is built fresh per page view and not mutated afterwards; the simulation
/// keeps its own transient positions.
#[derive(Clone, Debug, Default)]
pub struct FamilyGraph {
	pub nodes: Vec<FamilyNode>,
	pub links: Vec<FamilyLink>,
}

impl FamilyGraph {
	/// The central person's node, when one was identified.
	pub fn central(&self) -> Option<&FamilyNode> {
		self.nodes.iter().find(|n| n.kind == NodeKind::Central)
	}

	/// Nodes playing the given role, in insertion order.
	pub fn with_kind(&self, kind: NodeKind) -> impl Iterator<Item = &FamilyNode> {
		self.nodes.iter().filter(move |n| n.kind == kind)
	}

	/// Looks a node up by person id.
	pub fn node(&self, id: &str) -> Option<&FamilyNode> {
		self.nodes.iter().find(|n| n.person.id == id)
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// Grouped relation payload: one bucket per relation, all optional.
/// Empty buckets are valid data ("none found"), not errors.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FamilyBuckets {
	#[serde(default)]
	pub parents: Vec<PersonRef>,
	#[serde(default)]
	pub children: Vec<PersonRef>,
	#[serde(default)]
	pub spouses: Vec<PersonRef>,
	#[serde(default)]
	pub siblings: Vec<PersonRef>,
}

/// Flattened network payload: pre-built nodes and typed links.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NetworkPayload {
	pub nodes: Vec<NetworkNode>,
	#[serde(default)]
	pub links: Vec<NetworkLink>,
}

/// A node of the flattened payload. `depth` and `type` are both optional:
/// newer backends send `depth`, the original one only a `self`/`other` tag.
#[derive(Clone, Debug, Deserialize)]
pub struct NetworkNode {
	pub id: String,
	pub name: Option<String>,
	pub depth: Option<u32>,
	#[serde(rename = "type")]
	pub kind: Option<String>,
	pub birth_date: Option<String>,
	pub death_date: Option<String>,
	pub gender: Option<String>,
	#[serde(alias = "description")]
	pub bio: Option<String>,
	pub image_url: Option<String>,
}

impl NetworkNode {
	/// The person data carried by this node.
	pub fn person(&self) -> PersonRef {
		PersonRef {
			id: self.id.clone(),
			name: self.name.clone(),
			birth_date: self.birth_date.clone(),
			death_date: self.death_date.clone(),
			gender: self.gender.clone(),
			bio: self.bio.clone(),
			image_url: self.image_url.clone(),
		}
	}
}

/// A link of the flattened payload. The kind stays a raw string here;
/// unknown kinds are dropped (with a log line) during graph construction.
#[derive(Clone, Debug, Deserialize)]
pub struct NetworkLink {
	pub source: String,
	pub target: String,
	#[serde(rename = "type")]
	pub kind: String,
}

/// Either shape the family endpoint may answer with.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum FamilyPayload {
	Network(NetworkPayload),
	Buckets(FamilyBuckets),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_name_falls_back_to_unknown() {
		let anon = PersonRef {
			id: "Q1".into(),
			..PersonRef::default()
		};
		assert_eq!(anon.display_name(), "Unknown");

		let blank = PersonRef {
			id: "Q2".into(),
			name: Some("   ".into()),
			..PersonRef::default()
		};
		assert_eq!(blank.display_name(), "Unknown");
	}

	#[test]
	fn gender_parse_is_total() {
		assert_eq!(Gender::parse(Some("Male")), Gender::Male);
		assert_eq!(Gender::parse(Some("FEMALE")), Gender::Female);
		assert_eq!(Gender::parse(Some("nonbinary")), Gender::Other);
		assert_eq!(Gender::parse(Some("unknown")), Gender::Unknown);
		assert_eq!(Gender::parse(Some("")), Gender::Unknown);
		assert_eq!(Gender::parse(None), Gender::Unknown);
	}

	#[test]
	fn relation_kind_rejects_unknown_types() {
		assert_eq!(RelationKind::parse("parent"), Some(RelationKind::Parent));
		assert_eq!(RelationKind::parse(" Spouse "), Some(RelationKind::Spouse));
		assert_eq!(RelationKind::parse("cousin"), None);
	}

	#[test]
	fn family_payload_accepts_grouped_form() {
		let json = r#"{
			"parents": [{"id": "Q1", "name": "George VI"}],
			"children": [],
			"spouses": [{"id": "Q2", "name": "Philip", "description": "consort"}],
			"siblings": [{"id": "Q3", "name": "Margaret"}]
		}"#;
		match serde_json::from_str::<FamilyPayload>(json).unwrap() {
			FamilyPayload::Buckets(b) => {
				assert_eq!(b.parents.len(), 1);
				assert!(b.children.is_empty());
				assert_eq!(b.spouses[0].bio.as_deref(), Some("consort"));
				assert_eq!(b.siblings[0].display_name(), "Margaret");
			}
			FamilyPayload::Network(_) => panic!("grouped payload parsed as network"),
		}
	}

	#[test]
	fn family_payload_accepts_network_form() {
		let json = r#"{
			"nodes": [
				{"id": "Q9682", "name": "Elizabeth II", "type": "self"},
				{"id": "Q1", "name": "George VI", "type": "other"}
			],
			"links": [{"source": "Q1", "target": "Q9682", "type": "parent"}]
		}"#;
		match serde_json::from_str::<FamilyPayload>(json).unwrap() {
			FamilyPayload::Network(n) => {
				assert_eq!(n.nodes.len(), 2);
				assert_eq!(n.nodes[0].kind.as_deref(), Some("self"));
				assert_eq!(n.links[0].kind, "parent");
			}
			FamilyPayload::Buckets(_) => panic!("network payload parsed as buckets"),
		}
	}

	#[test]
	fn empty_object_degrades_to_empty_buckets() {
		match serde_json::from_str::<FamilyPayload>("{}").unwrap() {
			FamilyPayload::Buckets(b) => {
				assert!(b.parents.is_empty() && b.siblings.is_empty());
			}
			FamilyPayload::Network(_) => panic!("empty object should not be a network"),
		}
	}
}
