//! Construction of canonical family graphs from wire payloads.
//!
//! Both payload shapes funnel through [`build_graph`], which upholds the
//! graph invariants in order: deduplicate nodes first (first write wins),
//! then keep only links whose endpoints resolve against the final node set.
//! Malformed pieces are dropped with a log line; this function never fails.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use super::types::{
	FamilyBuckets, FamilyGraph, FamilyLink, FamilyNode, FamilyPayload, NetworkPayload, NodeKind,
	PersonRef, RelationKind,
};

/// Builds the canonical graph for `central` out of whichever payload shape
/// the backend answered with.
pub fn build_graph(central: &PersonRef, payload: &FamilyPayload) -> FamilyGraph {
	match payload {
		FamilyPayload::Buckets(buckets) => from_buckets(central, buckets),
		FamilyPayload::Network(network) => from_network(central, network),
	}
}

/// Node and link accumulator enforcing the graph invariants.
#[derive(Default)]
struct GraphBuilder {
	nodes: Vec<FamilyNode>,
	seen: HashSet<String>,
	links: Vec<FamilyLink>,
	link_keys: HashSet<(String, String, RelationKind)>,
}

impl GraphBuilder {
	/// Inserts a node unless its id is already present; the first write for
	/// an id wins, later duplicates keep their links but not their node.
	fn push_node(&mut self, person: &PersonRef, depth: u32, kind: NodeKind) {
		if person.id.is_empty() {
			warn!("family node without id dropped");
			return;
		}
		if !self.seen.insert(person.id.clone()) {
			debug!("duplicate family node {} kept from first occurrence", person.id);
			return;
		}
		self.nodes.push(FamilyNode {
			person: person.clone(),
			depth,
			kind,
		});
	}

	/// Records a link candidate. Exact duplicates and self-loops are
	/// dropped here; endpoint resolution happens in [`Self::finish`] once
	/// the node set is complete.
	fn push_link(&mut self, source: &str, target: &str, kind: RelationKind) {
		if source == target {
			debug!("self-loop on {source} dropped");
			return;
		}
		let key = (source.to_string(), target.to_string(), kind);
		if !self.link_keys.insert(key) {
			return;
		}
		self.links.push(FamilyLink {
			source: source.to_string(),
			target: target.to_string(),
			kind,
		});
	}

	fn finish(self) -> FamilyGraph {
		let GraphBuilder { nodes, seen, links, .. } = self;
		let links = links
			.into_iter()
			.filter(|link| {
				let resolved = seen.contains(&link.source) && seen.contains(&link.target);
				if !resolved {
					warn!(
						"family link {} -> {} ({}) dropped: endpoint missing",
						link.source,
						link.target,
						link.kind.as_str()
					);
				}
				resolved
			})
			.collect();
		FamilyGraph { nodes, links }
	}
}

fn from_buckets(central: &PersonRef, buckets: &FamilyBuckets) -> FamilyGraph {
	let mut builder = GraphBuilder::default();
	builder.push_node(central, 0, NodeKind::Central);

	for parent in &buckets.parents {
		builder.push_node(parent, 1, NodeKind::Parent);
		builder.push_link(&parent.id, &central.id, RelationKind::Parent);
	}
	for child in &buckets.children {
		builder.push_node(child, 1, NodeKind::Child);
		builder.push_link(&central.id, &child.id, RelationKind::Parent);
	}
	for spouse in &buckets.spouses {
		builder.push_node(spouse, 1, NodeKind::Spouse);
		builder.push_link(&central.id, &spouse.id, RelationKind::Spouse);
	}
	for sibling in &buckets.siblings {
		builder.push_node(sibling, 1, NodeKind::Sibling);
		if buckets.parents.is_empty() {
			// No shared parent to route through; link the pair directly.
			builder.push_link(&central.id, &sibling.id, RelationKind::Sibling);
		} else {
			for parent in &buckets.parents {
				builder.push_link(&parent.id, &sibling.id, RelationKind::Parent);
			}
		}
	}
	builder.finish()
}

fn from_network(central: &PersonRef, network: &NetworkPayload) -> FamilyGraph {
	let central_id = network
		.nodes
		.iter()
		.find(|n| n.depth == Some(0))
		.or_else(|| {
			network
				.nodes
				.iter()
				.find(|n| n.kind.as_deref().map(str::trim).is_some_and(|k| k.eq_ignore_ascii_case("self")))
		})
		.map(|n| n.id.clone());
	if central_id.is_none() {
		warn!("family network has no central node; rendering a partial graph");
	}

	// Adjacency classification from typed links touching the central node.
	// First classification per node wins, matching the dedup rule.
	let mut roles: HashMap<String, NodeKind> = HashMap::new();
	if let Some(central_id) = &central_id {
		for link in &network.links {
			let Some(kind) = RelationKind::parse(&link.kind) else {
				continue;
			};
			let (other, role) = match kind {
				RelationKind::Parent if link.target == *central_id => (&link.source, NodeKind::Parent),
				RelationKind::Parent if link.source == *central_id => (&link.target, NodeKind::Child),
				RelationKind::Spouse if link.source == *central_id => (&link.target, NodeKind::Spouse),
				RelationKind::Spouse if link.target == *central_id => (&link.source, NodeKind::Spouse),
				RelationKind::Sibling if link.source == *central_id => (&link.target, NodeKind::Sibling),
				RelationKind::Sibling if link.target == *central_id => (&link.source, NodeKind::Sibling),
				_ => continue,
			};
			roles.entry(other.clone()).or_insert(role);
		}
	}

	let mut builder = GraphBuilder::default();
	for node in &network.nodes {
		let is_central = central_id.as_deref() == Some(node.id.as_str());
		let kind = if is_central {
			NodeKind::Central
		} else if let Some(role) = roles.get(&node.id) {
			*role
		} else {
			node.kind.as_deref().map(NodeKind::parse).unwrap_or_default()
		};
		let kind = if !is_central && kind == NodeKind::Central {
			// Only one node may be central; later claimants demote.
			NodeKind::Relative
		} else {
			kind
		};
		let depth = node.depth.unwrap_or(match kind {
			NodeKind::Central => 0,
			NodeKind::Relative => 2,
			_ => 1,
		});
		let mut person = node.person();
		if is_central {
			fill_missing(&mut person, central);
		}
		builder.push_node(&person, depth, kind);
	}

	for link in &network.links {
		let Some(kind) = RelationKind::parse(&link.kind) else {
			warn!(
				"family link {} -> {} dropped: unknown type {:?}",
				link.source, link.target, link.kind
			);
			continue;
		};
		builder.push_link(&link.source, &link.target, kind);
	}
	builder.finish()
}

/// Copies fields known from the detail record onto the sparser node the
/// network payload carries for the same person.
fn fill_missing(person: &mut PersonRef, detail: &PersonRef) {
	if person.id != detail.id {
		return;
	}
	if person.name.is_none() {
		person.name = detail.name.clone();
	}
	if person.birth_date.is_none() {
		person.birth_date = detail.birth_date.clone();
	}
	if person.death_date.is_none() {
		person.death_date = detail.death_date.clone();
	}
	if person.gender.is_none() {
		person.gender = detail.gender.clone();
	}
	if person.bio.is_none() {
		person.bio = detail.bio.clone();
	}
	if person.image_url.is_none() {
		person.image_url = detail.image_url.clone();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn person(id: &str, name: &str) -> PersonRef {
		PersonRef {
			id: id.to_string(),
			name: Some(name.to_string()),
			..PersonRef::default()
		}
	}

	fn link_set(graph: &FamilyGraph) -> HashSet<(String, String, RelationKind)> {
		graph
			.links
			.iter()
			.map(|l| (l.source.clone(), l.target.clone(), l.kind))
			.collect()
	}

	#[test]
	fn buckets_produce_expected_counts_and_roles() {
		let central = person("Q0", "Center");
		let buckets = FamilyBuckets {
			parents: vec![person("P1", "Father"), person("P2", "Mother")],
			children: vec![person("C1", "Child")],
			spouses: vec![person("S1", "Spouse")],
			siblings: vec![person("B1", "Brother")],
		};
		let graph = build_graph(&central, &FamilyPayload::Buckets(buckets));

		assert_eq!(graph.nodes.len(), 6);
		assert_eq!(graph.central().unwrap().person.id, "Q0");
		assert_eq!(graph.with_kind(NodeKind::Parent).count(), 2);
		assert_eq!(graph.with_kind(NodeKind::Child).count(), 1);
		assert_eq!(graph.with_kind(NodeKind::Spouse).count(), 1);
		assert_eq!(graph.with_kind(NodeKind::Sibling).count(), 1);
		assert!(graph.nodes.iter().all(|n| n.kind == NodeKind::Central || n.depth == 1));

		let links = link_set(&graph);
		assert!(links.contains(&("P1".into(), "Q0".into(), RelationKind::Parent)));
		assert!(links.contains(&("P2".into(), "Q0".into(), RelationKind::Parent)));
		assert!(links.contains(&("Q0".into(), "C1".into(), RelationKind::Parent)));
		assert!(links.contains(&("Q0".into(), "S1".into(), RelationKind::Spouse)));
		// Sibling fans out through both parents instead of a direct edge.
		assert!(links.contains(&("P1".into(), "B1".into(), RelationKind::Parent)));
		assert!(links.contains(&("P2".into(), "B1".into(), RelationKind::Parent)));
		assert!(!graph.links.iter().any(|l| l.kind == RelationKind::Sibling));
		assert_eq!(graph.links.len(), 6);
	}

	#[test]
	fn sibling_without_parents_gets_direct_edge() {
		let central = person("Q0", "Center");
		let buckets = FamilyBuckets {
			siblings: vec![person("B1", "Sister")],
			..FamilyBuckets::default()
		};
		let graph = build_graph(&central, &FamilyPayload::Buckets(buckets));

		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.links.len(), 1);
		assert_eq!(graph.links[0].kind, RelationKind::Sibling);
		assert_eq!(graph.links[0].source, "Q0");
		assert_eq!(graph.links[0].target, "B1");
	}

	#[test]
	fn duplicate_ids_keep_first_node_and_all_links() {
		let central = person("Q0", "Center");
		// Same person listed as child and again as sibling.
		let buckets = FamilyBuckets {
			parents: vec![person("P1", "Parent")],
			children: vec![person("X1", "Twice")],
			siblings: vec![person("X1", "Twice")],
			..FamilyBuckets::default()
		};
		let graph = build_graph(&central, &FamilyPayload::Buckets(buckets));

		let x_nodes: Vec<_> = graph.nodes.iter().filter(|n| n.person.id == "X1").collect();
		assert_eq!(x_nodes.len(), 1);
		assert_eq!(x_nodes[0].kind, NodeKind::Child, "first write wins");

		let links = link_set(&graph);
		assert!(links.contains(&("Q0".into(), "X1".into(), RelationKind::Parent)));
		assert!(links.contains(&("P1".into(), "X1".into(), RelationKind::Parent)));
	}

	#[test]
	fn central_listed_among_relatives_stays_central() {
		let central = person("Q0", "Center");
		let buckets = FamilyBuckets {
			siblings: vec![person("Q0", "Center"), person("B1", "Sibling")],
			..FamilyBuckets::default()
		};
		let graph = build_graph(&central, &FamilyPayload::Buckets(buckets));

		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.node("Q0").unwrap().kind, NodeKind::Central);
		// The self-loop sibling edge is discarded, the real sibling stays.
		assert_eq!(graph.links.len(), 1);
		assert_eq!(graph.links[0].target, "B1");
	}

	#[test]
	fn royal_family_scenario() {
		// One parent, one spouse, one sibling sharing the known parent.
		let central = person("Q9682", "Elizabeth II");
		let buckets = FamilyBuckets {
			parents: vec![person("Q1", "George VI")],
			spouses: vec![person("Q2", "Philip")],
			siblings: vec![person("Q3", "Margaret")],
			..FamilyBuckets::default()
		};
		let graph = build_graph(&central, &FamilyPayload::Buckets(buckets));

		assert_eq!(graph.nodes.len(), 4);
		let links = link_set(&graph);
		assert_eq!(links.len(), 3);
		assert!(links.contains(&("Q1".into(), "Q9682".into(), RelationKind::Parent)));
		assert!(links.contains(&("Q9682".into(), "Q2".into(), RelationKind::Spouse)));
		assert!(links.contains(&("Q1".into(), "Q3".into(), RelationKind::Parent)));
	}

	#[test]
	fn empty_buckets_yield_central_only() {
		let central = person("Q0", "Alone");
		let graph = build_graph(&central, &FamilyPayload::Buckets(FamilyBuckets::default()));
		assert_eq!(graph.nodes.len(), 1);
		assert!(graph.links.is_empty());
		assert_eq!(graph.central().unwrap().person.display_name(), "Alone");
	}

	fn network_node(id: &str, depth: Option<u32>, kind: Option<&str>) -> super::super::types::NetworkNode {
		super::super::types::NetworkNode {
			id: id.to_string(),
			name: Some(id.to_string()),
			depth,
			kind: kind.map(str::to_string),
			birth_date: None,
			death_date: None,
			gender: None,
			bio: None,
			image_url: None,
		}
	}

	fn network_link(source: &str, target: &str, kind: &str) -> super::super::types::NetworkLink {
		super::super::types::NetworkLink {
			source: source.to_string(),
			target: target.to_string(),
			kind: kind.to_string(),
		}
	}

	#[test]
	fn network_classifies_nodes_around_central() {
		let central = person("Q0", "Center");
		let payload = NetworkPayload {
			nodes: vec![
				network_node("Q0", Some(0), None),
				network_node("P1", Some(1), None),
				network_node("C1", Some(1), None),
				network_node("S1", Some(1), None),
				network_node("B1", Some(1), None),
				network_node("G1", Some(2), None),
			],
			links: vec![
				network_link("P1", "Q0", "parent"),
				network_link("Q0", "C1", "parent"),
				network_link("Q0", "S1", "spouse"),
				network_link("B1", "Q0", "sibling"),
				network_link("G1", "P1", "parent"),
			],
		};
		let graph = build_graph(&central, &FamilyPayload::Network(payload));

		assert_eq!(graph.node("Q0").unwrap().kind, NodeKind::Central);
		assert_eq!(graph.node("P1").unwrap().kind, NodeKind::Parent);
		assert_eq!(graph.node("C1").unwrap().kind, NodeKind::Child);
		assert_eq!(graph.node("S1").unwrap().kind, NodeKind::Spouse);
		assert_eq!(graph.node("B1").unwrap().kind, NodeKind::Sibling);
		assert_eq!(graph.node("G1").unwrap().kind, NodeKind::Relative);
		assert_eq!(graph.links.len(), 5);
	}

	#[test]
	fn network_drops_dangling_and_unknown_links() {
		let central = person("Q0", "Center");
		let payload = NetworkPayload {
			nodes: vec![network_node("Q0", Some(0), None), network_node("P1", Some(1), None)],
			links: vec![
				network_link("P1", "Q0", "parent"),
				network_link("MISSING", "Q0", "parent"),
				network_link("P1", "Q0", "godparent"),
			],
		};
		let graph = build_graph(&central, &FamilyPayload::Network(payload));

		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.links.len(), 1);
		assert_eq!(graph.links[0].kind, RelationKind::Parent);
	}

	#[test]
	fn network_self_tag_marks_central_and_enriches_it() {
		let mut central = person("Q9682", "Elizabeth II");
		central.gender = Some("female".to_string());
		central.birth_date = Some("1926-04-21T00:00:00Z".to_string());
		let payload = NetworkPayload {
			nodes: vec![
				network_node("Q9682", None, Some("self")),
				network_node("Q2", None, Some("other")),
			],
			links: vec![network_link("Q9682", "Q2", "spouse")],
		};
		let graph = build_graph(&central, &FamilyPayload::Network(payload));

		let center = graph.central().unwrap();
		assert_eq!(center.person.id, "Q9682");
		assert_eq!(center.depth, 0);
		assert_eq!(center.person.gender.as_deref(), Some("female"));
		assert_eq!(graph.node("Q2").unwrap().kind, NodeKind::Spouse);
		assert_eq!(graph.node("Q2").unwrap().depth, 1);
	}

	#[test]
	fn network_without_central_degrades_to_partial_graph() {
		let central = person("Q0", "Center");
		let payload = NetworkPayload {
			nodes: vec![
				network_node("A", None, Some("other")),
				network_node("B", None, Some("other")),
			],
			links: vec![network_link("A", "B", "spouse")],
		};
		let graph = build_graph(&central, &FamilyPayload::Network(payload));

		assert!(graph.central().is_none());
		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.links.len(), 1);
		assert!(graph.nodes.iter().all(|n| n.kind == NodeKind::Relative));
	}

	#[test]
	fn network_duplicate_node_ids_collapse() {
		let central = person("Q0", "Center");
		let payload = NetworkPayload {
			nodes: vec![
				network_node("Q0", Some(0), None),
				network_node("P1", Some(1), None),
				network_node("P1", Some(1), None),
			],
			links: vec![network_link("P1", "Q0", "parent")],
		};
		let graph = build_graph(&central, &FamilyPayload::Network(payload));
		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.links.len(), 1);
	}
}
