//! Search input form shared by the home and search pages.

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use super::pagination::search_href;

/// Trims a raw query, yielding `None` when nothing searchable remains.
/// Both form submission and the results page guard on this, so a blank
/// query never reaches the backend.
pub fn normalized_query(raw: &str) -> Option<String> {
	let trimmed = raw.trim();
	(!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Text input plus submit button that navigates to the search results page.
/// Submitting a blank query does nothing.
#[component]
pub fn SearchForm(#[prop(optional, into)] initial: Signal<String>) -> impl IntoView {
	let (text, set_text) = signal(initial.get_untracked());
	// Keep the input in step when the route changes underneath us, e.g.
	// history navigation between two searches.
	Effect::new(move |_| set_text.set(initial.get()));

	let navigate = use_navigate();
	let on_submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		let Some(query) = normalized_query(&text.get()) else {
			return;
		};
		navigate(&search_href(&query, 1), NavigateOptions::default());
	};

	view! {
		<form class="search-form" on:submit=on_submit>
			<input
				type="search"
				placeholder="Search for a person, e.g. Ada Lovelace"
				prop:value=move || text.get()
				on:input=move |ev| set_text.set(event_target_value(&ev))
			/>
			<button type="submit">"Search"</button>
		</form>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn blank_queries_are_rejected() {
		assert_eq!(normalized_query(""), None);
		assert_eq!(normalized_query("   "), None);
		assert_eq!(normalized_query("\t\n"), None);
	}

	#[test]
	fn queries_are_trimmed() {
		assert_eq!(normalized_query("  ada "), Some("ada".to_string()));
		assert_eq!(normalized_query("ada lovelace"), Some("ada lovelace".to_string()));
	}
}
