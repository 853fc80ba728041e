//! Windowed pagination controls for search results.

use leptos::prelude::*;
use leptos_router::components::A;

/// Pages shown on each side of the current page.
const PAGE_WINDOW: u32 = 2;

/// One slot in the pagination strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageItem {
	Page(u32),
	/// A run of skipped pages, rendered as an ellipsis.
	Gap,
}

/// Computes the visible page strip: first page, last page, and a window
/// around the current page, with gaps where pages are skipped.
pub fn page_items(current: u32, total: u32) -> Vec<PageItem> {
	if total == 0 {
		return Vec::new();
	}
	let current = current.clamp(1, total);
	let mut items = Vec::new();
	let mut previous = 0u32;
	for page in 1..=total {
		let in_window = page + PAGE_WINDOW >= current && page <= current + PAGE_WINDOW;
		if page != 1 && page != total && !in_window {
			continue;
		}
		if previous != 0 && page > previous + 1 {
			items.push(PageItem::Gap);
		}
		items.push(PageItem::Page(page));
		previous = page;
	}
	items
}

/// Target URL for a search results page.
pub fn search_href(query: &str, page: u32) -> String {
	let query = String::from(js_sys::encode_uri_component(query));
	format!("/search?query={query}&page={page}")
}

/// Pagination strip linking to the other pages of the current search.
#[component]
pub fn Pagination(query: String, current: u32, total: u32) -> impl IntoView {
	let items = page_items(current, total);
	view! {
		<nav class="pagination" aria-label="Search result pages">
			{items
				.into_iter()
				.map(|item| match item {
					PageItem::Gap => view! { <span class="page-gap">"…"</span> }.into_any(),
					PageItem::Page(page) if page == current => {
						view! { <span class="page-current">{page}</span> }.into_any()
					}
					PageItem::Page(page) => {
						view! {
							<A href=search_href(&query, page) attr:class="page-link">{page}</A>
						}
							.into_any()
					}
				})
				.collect_view()}
		</nav>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn pages(items: &[PageItem]) -> Vec<Option<u32>> {
		items
			.iter()
			.map(|item| match item {
				PageItem::Page(p) => Some(*p),
				PageItem::Gap => None,
			})
			.collect()
	}

	#[test]
	fn small_totals_list_every_page() {
		assert_eq!(pages(&page_items(1, 1)), vec![Some(1)]);
		assert_eq!(
			pages(&page_items(2, 4)),
			vec![Some(1), Some(2), Some(3), Some(4)]
		);
	}

	#[test]
	fn middle_pages_window_with_gaps_on_both_sides() {
		assert_eq!(
			pages(&page_items(10, 20)),
			vec![
				Some(1),
				None,
				Some(8),
				Some(9),
				Some(10),
				Some(11),
				Some(12),
				None,
				Some(20)
			]
		);
	}

	#[test]
	fn edges_have_a_single_gap() {
		assert_eq!(
			pages(&page_items(1, 10)),
			vec![Some(1), Some(2), Some(3), None, Some(10)]
		);
		assert_eq!(
			pages(&page_items(10, 10)),
			vec![Some(1), None, Some(8), Some(9), Some(10)]
		);
	}

	#[test]
	fn adjacent_window_omits_needless_gap() {
		// Window reaches page 2, so no gap after page 1.
		assert_eq!(
			pages(&page_items(4, 10)),
			vec![Some(1), Some(2), Some(3), Some(4), Some(5), Some(6), None, Some(10)]
		);
	}

	#[test]
	fn out_of_range_current_is_clamped() {
		assert_eq!(pages(&page_items(99, 3)), vec![Some(1), Some(2), Some(3)]);
		assert_eq!(pages(&page_items(0, 3)), vec![Some(1), Some(2), Some(3)]);
		assert!(page_items(1, 0).is_empty());
	}
}
