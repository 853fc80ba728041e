//! Fallback page for unmatched routes.

use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::components::A;

/// 404 page with a way back to the search.
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<Title text="Not found - Lineage" />
		<main class="page not-found-page">
			<h1>"Page not found"</h1>
			<p>"The page you asked for does not exist."</p>
			<A href="/">"Back to the search"</A>
		</main>
	}
}
