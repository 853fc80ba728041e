//! Trigger panel for the backend's background batch scrape.
//!
//! Fire-and-forget: the panel reports whether the job was accepted, not its
//! progress. Newly scraped relatives show up on the next page load.

use leptos::ev::SubmitEvent;
use leptos::prelude::*;

use crate::api::{ApiClient, BatchTarget};

/// Form that asks the backend to scrape this person's family tree to a
/// selectable depth. The submit button disables while a request is in
/// flight; success and failure both land in a status line under the form.
#[component]
pub fn BatchPanel(entity_id: String) -> impl IntoView {
	let entity_id = StoredValue::new(entity_id);
	let (depth, set_depth) = signal("2".to_string());
	let (busy, set_busy) = signal(false);
	let (status, set_status) = signal(None::<Result<String, String>>);

	let on_submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		if busy.get() {
			return;
		}
		set_busy.set(true);
		set_status.set(None);
		let depth = depth.get().parse::<u8>().unwrap_or(2);
		let id = entity_id.get_value();
		leptos::task::spawn_local(async move {
			let outcome = match ApiClient::new().start_batch(&BatchTarget::Entity(id), depth).await {
				Ok(ack) if ack.started() => {
					let job = ack.job_label().map(|job| format!(" (job {job})")).unwrap_or_default();
					Ok(format!("Scrape started{job}. New relatives appear once it finishes."))
				}
				Ok(ack) => Err(ack
					.error
					.unwrap_or_else(|| format!("backend answered: {}", ack.status))),
				Err(err) => Err(err.to_string()),
			};
			set_status.set(Some(outcome));
			set_busy.set(false);
		});
	};

	view! {
		<section class="batch-panel">
			<h2>"Expand this tree"</h2>
			<p class="batch-blurb">
				"Queue a background scrape to pull more of this family into the local database."
			</p>
			<form class="batch-form" on:submit=on_submit>
				<label>
					"Traversal depth"
					<select
						prop:value=move || depth.get()
						on:change=move |ev| set_depth.set(event_target_value(&ev))
					>
						<option value="0">"0 (this person only)"</option>
						<option value="1">"1 (immediate family)"</option>
						<option value="2">"2 (grandparents and grandchildren)"</option>
						<option value="3">"3"</option>
						<option value="4">"4 (slow)"</option>
					</select>
				</label>
				<button type="submit" disabled=move || busy.get()>
					{move || if busy.get() { "Starting…" } else { "Start scrape" }}
				</button>
			</form>
			{move || {
				status
					.get()
					.map(|outcome| match outcome {
						Ok(message) => view! { <p class="batch-status ok">{message}</p> }.into_any(),
						Err(message) => {
							view! { <p class="batch-status error">{message}</p> }.into_any()
						}
					})
			}}
		</section>
	}
}
