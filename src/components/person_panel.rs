//! Biographical panel and grouped relation lists for the detail page.

use leptos::prelude::*;
use leptos_router::components::A;

use crate::api::PersonDetails;
use crate::family::{FamilyGraph, FamilyNode, Gender, NodeKind, dates};

/// Biographical details for one person: portrait, name, description, and
/// the known facts. Absent dates read "Unknown"; other absent facts are
/// simply omitted.
#[component]
pub fn PersonPanel(person: PersonDetails) -> impl IntoView {
	let name = person.display_name().to_string();
	let born = dates::format_date(person.birth_date.as_deref());
	let died = person.death_date.as_deref().map(|d| dates::format_date(Some(d)));
	let gender = Gender::parse(person.gender.as_deref());
	let occupations = (!person.occupations.is_empty()).then(|| person.occupations.join(", "));
	let updated = person.last_updated.as_deref().map(|d| dates::format_date(Some(d)));
	let wikidata_url = format!("https://www.wikidata.org/wiki/{}", person.id);

	view! {
		<section class="person-panel">
			{person.image_url.clone().map(|url| {
				view! { <img class="person-portrait" src=url alt=name.clone() /> }
			})}
			<div class="person-heading">
				<h1>{name}</h1>
				{person.source.clone().map(|source| {
					view! { <span class=format!("source-badge {source}")>{source.clone()}</span> }
				})}
			</div>
			{person.bio.clone().map(|bio| view! { <p class="person-bio">{bio}</p> })}
			<dl class="person-facts">
				<div class="fact-row">
					<dt>"Born"</dt>
					<dd>{born}</dd>
				</div>
				{person.birth_place.clone().map(|place| {
					view! {
						<div class="fact-row">
							<dt>"Birthplace"</dt>
							<dd>{place}</dd>
						</div>
					}
				})}
				{died.map(|died| {
					view! {
						<div class="fact-row">
							<dt>"Died"</dt>
							<dd>{died}</dd>
						</div>
					}
				})}
				{(gender != Gender::Unknown)
					.then(|| {
						view! {
							<div class="fact-row">
								<dt>"Gender"</dt>
								<dd>{gender.label()}</dd>
							</div>
						}
					})}
				{occupations.map(|occupations| {
					view! {
						<div class="fact-row">
							<dt>"Occupations"</dt>
							<dd>{occupations}</dd>
						</div>
					}
				})}
				<div class="fact-row">
					<dt>"Identifier"</dt>
					<dd>
						<a href=wikidata_url target="_blank" rel="noopener">{person.id.clone()}</a>
					</dd>
				</div>
				{updated.map(|updated| {
					view! {
						<div class="fact-row">
							<dt>"Last updated"</dt>
							<dd>{updated}</dd>
						</div>
					}
				})}
			</dl>
		</section>
	}
}

/// The four relation buckets as link lists. Every person links to their own
/// detail page; empty buckets read "None found" rather than disappearing.
#[component]
pub fn RelationLists(graph: FamilyGraph) -> impl IntoView {
	view! {
		<section class="relations">
			<h2>"Family"</h2>
			<div class="relation-columns">
				<RelationGroup title="Parents" nodes=collect(&graph, NodeKind::Parent) />
				<RelationGroup title="Children" nodes=collect(&graph, NodeKind::Child) />
				<RelationGroup title="Spouses" nodes=collect(&graph, NodeKind::Spouse) />
				<RelationGroup title="Siblings" nodes=collect(&graph, NodeKind::Sibling) />
			</div>
		</section>
	}
}

fn collect(graph: &FamilyGraph, kind: NodeKind) -> Vec<FamilyNode> {
	graph.with_kind(kind).cloned().collect()
}

#[component]
fn RelationGroup(title: &'static str, nodes: Vec<FamilyNode>) -> impl IntoView {
	view! {
		<div class="relation-group">
			<h3>{title}</h3>
			{if nodes.is_empty() {
				view! { <p class="relation-empty">"None found"</p> }.into_any()
			} else {
				view! {
					<ul class="relation-list">
						{nodes
							.into_iter()
							.map(|node| {
								let name = node.person.display_name().to_string();
								let href = format!("/details/{}", node.person.id);
								let years = dates::lifespan(
									node.person.birth_date.as_deref(),
									node.person.death_date.as_deref(),
									false,
								);
								view! {
									<li>
										<A href=href>{name}</A>
										{(years != "Unknown")
											.then(|| view! { <span class="relation-years">{years}</span> })}
									</li>
								}
							})
							.collect_view()}
					</ul>
				}
					.into_any()
			}}
		</div>
	}
}
