//! Search results page, driven by the `query` and `page` URL parameters.
//!
//! Every search is a navigation: the form and the pagination strip push a
//! new `/search?query=…&page=…` history entry, and this page re-fetches
//! whenever those parameters change. All request state lives in the URL, so
//! result pages are bookmarkable and shareable.

use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::components::A;
use leptos_router::hooks::use_query_map;

use crate::api::{ApiClient, SearchResponse};
use crate::components::pagination::Pagination;
use crate::components::search_form::{SearchForm, normalized_query};

#[derive(Clone)]
enum SearchState {
	/// No searchable query in the URL; nothing was requested.
	Idle,
	Loading,
	Ready {
		query: String,
		response: SearchResponse,
	},
	Failed(String),
}

/// Search results with windowed pagination.
#[component]
pub fn Search() -> impl IntoView {
	let params = use_query_map();
	// Blank and whitespace-only queries normalize to `None` here, which is
	// what keeps them from ever reaching the backend.
	let request = Memo::new(move |_| {
		let map = params.read();
		let query = map.get("query").as_deref().and_then(normalized_query);
		let page = map
			.get("page")
			.and_then(|page| page.parse::<u32>().ok())
			.unwrap_or(1)
			.max(1);
		(query, page)
	});

	let (state, set_state) = signal(SearchState::Idle);
	Effect::new(move |_| {
		let (query, page) = request.get();
		let Some(query) = query else {
			set_state.set(SearchState::Idle);
			return;
		};
		set_state.set(SearchState::Loading);
		leptos::task::spawn_local(async move {
			let outcome = ApiClient::new().search(&query, page).await;
			// A newer search may have started while this one was in flight;
			// only the response for the current URL may land.
			if request.get_untracked() != (Some(query.clone()), page) {
				return;
			}
			set_state.set(match outcome {
				Ok(response) => SearchState::Ready { query, response },
				Err(err) => SearchState::Failed(err.to_string()),
			});
		});
	});

	let current_query = Signal::derive(move || request.get().0.unwrap_or_default());
	view! {
		<Title text="Search - Lineage" />
		<main class="page search-page">
			<SearchForm initial=current_query />
			{move || match state.get() {
				SearchState::Idle => {
					view! { <p class="search-hint">"Type a name above to search."</p> }.into_any()
				}
				SearchState::Loading => view! { <p class="loading">"Searching…"</p> }.into_any(),
				SearchState::Failed(message) => {
					view! {
						<div class="error-panel">
							<h2>"Search failed"</h2>
							<p>{message}</p>
						</div>
					}
						.into_any()
				}
				SearchState::Ready { query, response } => {
					view! { <SearchResults query=query response=response /> }.into_any()
				}
			}}
		</main>
	}
}

#[component]
fn SearchResults(query: String, response: SearchResponse) -> impl IntoView {
	if response.results.is_empty() {
		return view! {
			<p class="search-empty">"No results for \"" {query} "\". Try a different spelling."</p>
		}
		.into_any();
	}

	let total = response.total;
	let pages = response.page_count();
	let page = response.page;
	view! {
		<p class="search-summary">{format!("{total} result(s) for \"{query}\"")}</p>
		<ul class="search-results">
			{response
				.results
				.into_iter()
				.map(|hit| {
					let name = hit.display_label().to_string();
					let href = format!("/details/{}", hit.id);
					view! {
						<li class="search-hit">
							<A href=href>{name}</A>
							{hit.description.map(|text| view! { <p class="hit-description">{text}</p> })}
							<span class="hit-id">{hit.id}</span>
						</li>
					}
				})
				.collect_view()}
		</ul>
		{(pages > 1).then(|| view! { <Pagination query=query current=page total=pages /> })}
	}
	.into_any()
}
