//! Landing page: a hero search box plus a few people to start exploring from.

use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::components::A;

use crate::components::search_form::SearchForm;

/// Well-known people with rich family data, linked as starting points.
const STARTING_POINTS: &[(&str, &str)] = &[
	("Q9682", "Elizabeth II"),
	("Q7259", "Ada Lovelace"),
	("Q1339", "Johann Sebastian Bach"),
	("Q937", "Albert Einstein"),
];

/// Landing page with the search form front and center.
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<Title text="Lineage" />
		<main class="page home-page">
			<div class="hero">
				<h1>"Lineage"</h1>
				<p class="tagline">
					"Search for a person and explore their family tree, sourced from Wikidata."
				</p>
				<SearchForm />
			</div>
			<section class="starting-points">
				<h2>"Or start from someone famous"</h2>
				<ul>
					{STARTING_POINTS
						.iter()
						.map(|(id, name)| {
							view! {
								<li>
									<A href=format!("/details/{id}")>{*name}</A>
								</li>
							}
						})
						.collect_view()}
				</ul>
			</section>
		</main>
	}
}
