//! Lineage: a genealogy explorer for Wikidata family networks.
//!
//! Client-side rendered Leptos app: search for a person, read their
//! biographical record, and explore their parents, children, spouses, and
//! siblings as an interactive force-directed graph. Data comes from a thin
//! same-origin JSON API; see [`api`] for the contract.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

pub mod api;
pub mod components;
pub mod family;
mod pages;

use pages::details::Details;
use pages::home::Home;
use pages::not_found::NotFound;
use pages::search::Search;

pub use components::force_graph::FamilyGraphCanvas;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("lineage: logging initialized");
}

/// Application root: meta tags, site chrome, and the route table.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Lineage" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<header class="site-header">
				<A href="/" attr:class="site-title">"Lineage"</A>
				<A href="/search" attr:class="site-link">"Search"</A>
			</header>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
				<Route path=path!("/search") view=Search />
				<Route path=path!("/details/:id") view=Details />
			</Routes>
		</Router>
	}
}
