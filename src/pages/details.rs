//! Person detail page: biography, family graph, relation lists, and the
//! batch-scrape trigger.
//!
//! Loading is a strict two-step pipeline: the person record is fetched
//! first, because the family graph needs the central person's identity to
//! anchor itself at depth 0, and only then the family payload. Either
//! failure surfaces as one error panel for the whole chain.

use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::components::A;
use leptos_router::hooks::use_params_map;

use crate::api::{ApiClient, ApiError, PersonDetails};
use crate::components::batch_panel::BatchPanel;
use crate::components::force_graph::FamilyGraphCanvas;
use crate::components::person_panel::{PersonPanel, RelationLists};
use crate::family::{FamilyGraph, PersonRef, build_graph};

#[derive(Clone)]
enum DetailState {
	Loading,
	Ready {
		details: PersonDetails,
		graph: FamilyGraph,
	},
	Failed(String),
}

/// Fetches the person record, then their family, and builds the graph.
async fn load(id: String) -> Result<(PersonDetails, FamilyGraph), ApiError> {
	let client = ApiClient::new();
	let details = client.person_details(&id).await?;
	let central = PersonRef::from(&details);
	let payload = client.family(&id).await?;
	Ok((details, build_graph(&central, &payload)))
}

/// Detail view for the person named by the `:id` route parameter.
#[component]
pub fn Details() -> impl IntoView {
	let params = use_params_map();
	let id = Memo::new(move |_| params.read().get("id").unwrap_or_default());

	let (state, set_state) = signal(DetailState::Loading);
	Effect::new(move |_| {
		let person_id = id.get();
		set_state.set(DetailState::Loading);
		leptos::task::spawn_local(async move {
			let outcome = load(person_id.clone()).await;
			if id.get_untracked() != person_id {
				// The user already navigated to another person.
				return;
			}
			// Single exit point: both arms replace the loading state, so the
			// indicator can never get stuck.
			set_state.set(match outcome {
				Ok((details, graph)) => DetailState::Ready { details, graph },
				Err(err) if err.is_not_found() => {
					DetailState::Failed(format!("No person found for \"{person_id}\""))
				}
				Err(err) => DetailState::Failed(err.to_string()),
			});
		});
	});

	view! {
		<main class="page detail-page">
			{move || match state.get() {
				DetailState::Loading => {
					view! { <p class="loading">"Loading person…"</p> }.into_any()
				}
				DetailState::Failed(message) => {
					view! {
						<div class="error-panel">
							<h2>"Could not load this person"</h2>
							<p>{message}</p>
							<A href="/">"Back to search"</A>
						</div>
					}
						.into_any()
				}
				DetailState::Ready { details, graph } => {
					let entity_id = details.id.clone();
					let title = format!("{} - Lineage", details.display_name());
					let graph_data = Signal::derive({
						let graph = graph.clone();
						move || graph.clone()
					});
					view! {
						<Title text=title />
						<div class="detail-columns">
							<div class="detail-side">
								<PersonPanel person=details />
								<BatchPanel entity_id=entity_id />
							</div>
							<div class="detail-main">
								<section class="graph-section">
									<h2>"Family network"</h2>
									{if graph.is_empty() {
										view! {
											<p class="graph-empty">"No family network available."</p>
										}
											.into_any()
									} else {
										view! { <FamilyGraphCanvas data=graph_data height=Some(520.0) /> }
											.into_any()
									}}
								</section>
								<RelationLists graph=graph />
							</div>
						</div>
					}
						.into_any()
				}
			}}
		</main>
	}
}
