//! Thin client for the genealogy backend.
//!
//! All endpoints are same-origin under `/api/`. Requests go through the
//! browser fetch API; responses are read as text and decoded with serde so
//! a useful error can be reported when the body is not what we expect.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response, UrlSearchParams};

use crate::family::{FamilyPayload, PersonRef};

/// Results per search page, mirroring the backend default.
pub const SEARCH_PAGE_SIZE: u32 = 10;

/// Deepest traversal the batch scraper accepts.
pub const MAX_BATCH_DEPTH: u8 = 4;

/// Failure modes of a backend call, in the order they can occur.
#[derive(Debug, Error)]
pub enum ApiError {
	/// The request never produced an HTTP response.
	#[error("network error: {0}")]
	Network(String),
	/// The backend answered with a non-success status.
	#[error("server returned {status}: {message}")]
	Status { status: u16, message: String },
	/// The response body did not match the expected shape.
	#[error("malformed response: {0}")]
	Decode(String),
}

impl ApiError {
	pub fn is_not_found(&self) -> bool {
		matches!(self, ApiError::Status { status: 404, .. })
	}
}

/// One row of a search result page.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SearchHit {
	pub id: String,
	#[serde(alias = "name")]
	pub label: Option<String>,
	pub description: Option<String>,
}

impl SearchHit {
	pub fn display_label(&self) -> &str {
		match self.label.as_deref().map(str::trim) {
			Some(label) if !label.is_empty() => label,
			_ => "Unknown",
		}
	}
}

/// A page of search results plus pagination counters.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct SearchResponse {
	#[serde(default)]
	pub results: Vec<SearchHit>,
	#[serde(default)]
	pub total: u64,
	#[serde(default = "default_page")]
	pub page: u32,
	pub limit: Option<u32>,
	pub pages: Option<u32>,
}

fn default_page() -> u32 {
	1
}

impl SearchResponse {
	/// Total page count, derived from `total` and the page size when the
	/// backend does not send it.
	pub fn page_count(&self) -> u32 {
		self.pages.unwrap_or_else(|| {
			let limit = u64::from(self.limit.unwrap_or(SEARCH_PAGE_SIZE).max(1));
			self.total.div_ceil(limit) as u32
		})
	}
}

/// Biographical record for the detail page.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct PersonDetails {
	pub id: String,
	pub name: Option<String>,
	#[serde(alias = "description")]
	pub bio: Option<String>,
	pub birth_date: Option<String>,
	pub death_date: Option<String>,
	pub birth_place: Option<String>,
	pub gender: Option<String>,
	#[serde(default)]
	pub occupations: Vec<String>,
	pub image_url: Option<String>,
	/// Where the record came from, e.g. `"wikidata"` or `"database"`.
	pub source: Option<String>,
	pub last_updated: Option<String>,
}

impl PersonDetails {
	pub fn display_name(&self) -> &str {
		match self.name.as_deref().map(str::trim) {
			Some(name) if !name.is_empty() => name,
			_ => "Unknown",
		}
	}
}

impl From<&PersonDetails> for PersonRef {
	fn from(details: &PersonDetails) -> Self {
		PersonRef {
			id: details.id.clone(),
			name: details.name.clone(),
			birth_date: details.birth_date.clone(),
			death_date: details.death_date.clone(),
			gender: details.gender.clone(),
			bio: details.bio.clone(),
			image_url: details.image_url.clone(),
		}
	}
}

/// What a batch scrape should start from.
#[derive(Clone, Debug, PartialEq)]
pub enum BatchTarget {
	/// A known entity id, e.g. `Q9682`.
	Entity(String),
	/// A free-text name the backend resolves itself.
	Query(String),
}

/// Acknowledgement for a batch scrape request.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct BatchResponse {
	pub status: String,
	#[serde(default)]
	pub job_id: Option<serde_json::Value>,
	#[serde(default)]
	pub error: Option<String>,
}

impl BatchResponse {
	pub fn started(&self) -> bool {
		self.status == "started"
	}

	/// Job id as display text; backends disagree on number vs string.
	pub fn job_label(&self) -> Option<String> {
		let id = self.job_id.as_ref()?;
		Some(match id.as_str() {
			Some(s) => s.to_string(),
			None => id.to_string(),
		})
	}
}

#[derive(Deserialize)]
struct ErrorBody {
	error: String,
}

/// Same-origin API client. Cheap to construct; carries only the base path.
#[derive(Clone, Debug, Default)]
pub struct ApiClient {
	base: String,
}

impl ApiClient {
	pub fn new() -> Self {
		Self::default()
	}

	/// Client against a non-default origin, mainly for local development.
	pub fn with_base(base: impl Into<String>) -> Self {
		Self { base: base.into() }
	}

	/// `GET /api/search` with a 1-based page number.
	pub async fn search(&self, query: &str, page: u32) -> Result<SearchResponse, ApiError> {
		let query = String::from(js_sys::encode_uri_component(query));
		let page = page.max(1);
		self.get_json(&format!("/api/search?query={query}&page={page}")).await
	}

	/// `GET /api/details/{id}`.
	pub async fn person_details(&self, id: &str) -> Result<PersonDetails, ApiError> {
		let id = String::from(js_sys::encode_uri_component(id));
		self.get_json(&format!("/api/details/{id}")).await
	}

	/// `GET /api/family/{id}`; tolerant of both payload shapes.
	pub async fn family(&self, id: &str) -> Result<FamilyPayload, ApiError> {
		let id = String::from(js_sys::encode_uri_component(id));
		self.get_json(&format!("/api/family/{id}")).await
	}

	/// `POST /api/batch/start` as a form submission. The depth is clamped
	/// to what the scraper accepts.
	pub async fn start_batch(&self, target: &BatchTarget, max_depth: u8) -> Result<BatchResponse, ApiError> {
		let params = UrlSearchParams::new().map_err(js_error)?;
		match target {
			BatchTarget::Entity(id) => params.append("entity_id", id),
			BatchTarget::Query(query) => params.append("query", query),
		}
		params.append("max_depth", &max_depth.min(MAX_BATCH_DEPTH).to_string());
		self.request("/api/batch/start", Some(params)).await
	}

	async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
		self.request(path, None).await
	}

	async fn request<T: DeserializeOwned>(&self, path: &str, form: Option<UrlSearchParams>) -> Result<T, ApiError> {
		let url = format!("{}{}", self.base, path);
		let opts = RequestInit::new();
		match form {
			Some(params) => {
				opts.set_method("POST");
				opts.set_body(params.as_ref());
			}
			None => opts.set_method("GET"),
		}
		let request = Request::new_with_str_and_init(&url, &opts).map_err(js_error)?;
		let window = web_sys::window().ok_or_else(|| ApiError::Network("no window".to_string()))?;
		let response = JsFuture::from(window.fetch_with_request(&request))
			.await
			.map_err(js_error)?;
		let response: Response = response
			.dyn_into()
			.map_err(|_| ApiError::Network("fetch returned a non-Response value".to_string()))?;
		let text_promise = response.text().map_err(js_error)?;
		let text = JsFuture::from(text_promise)
			.await
			.map_err(js_error)?
			.as_string()
			.unwrap_or_default();

		if !response.ok() {
			let message = serde_json::from_str::<ErrorBody>(&text)
				.map(|body| body.error)
				.unwrap_or_else(|_| response.status_text());
			log::warn!("{url} failed with status {}", response.status());
			return Err(ApiError::Status {
				status: response.status(),
				message,
			});
		}
		serde_json::from_str(&text).map_err(|err| ApiError::Decode(err.to_string()))
	}
}

fn js_error(value: JsValue) -> ApiError {
	let text = value
		.as_string()
		.or_else(|| value.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())))
		.unwrap_or_else(|| format!("{value:?}"));
	ApiError::Network(text)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_search_response() {
		let json = r#"{
			"results": [
				{"id": "Q9682", "label": "Elizabeth II", "description": "Queen of the United Kingdom"},
				{"id": "Q154920", "label": "Elizabeth I"}
			],
			"total": 42,
			"page": 2,
			"limit": 10,
			"pages": 5
		}"#;
		let parsed: SearchResponse = serde_json::from_str(json).unwrap();
		assert_eq!(parsed.results.len(), 2);
		assert_eq!(parsed.results[0].display_label(), "Elizabeth II");
		assert_eq!(parsed.results[1].description, None);
		assert_eq!(parsed.page, 2);
		assert_eq!(parsed.page_count(), 5);
	}

	#[test]
	fn page_count_is_derived_when_absent() {
		let parsed: SearchResponse = serde_json::from_str(r#"{"results": [], "total": 42}"#).unwrap();
		assert_eq!(parsed.page_count(), 5);

		let empty: SearchResponse = serde_json::from_str(r#"{"results": [], "total": 0}"#).unwrap();
		assert_eq!(empty.page_count(), 0);
		assert_eq!(empty.page, 1);
	}

	#[test]
	fn parses_person_details() {
		let json = r#"{
			"id": "Q9682",
			"name": "Elizabeth II",
			"description": "Queen of the United Kingdom from 1952 to 2022",
			"birth_date": "1926-04-21T00:00:00Z",
			"death_date": "2022-09-08T00:00:00Z",
			"birth_place": "Mayfair",
			"gender": "female",
			"occupations": ["monarch"],
			"image_url": "https://commons.wikimedia.org/example.jpg",
			"source": "wikidata",
			"last_updated": "2024-11-02T10:00:00Z"
		}"#;
		let details: PersonDetails = serde_json::from_str(json).unwrap();
		assert_eq!(details.display_name(), "Elizabeth II");
		assert_eq!(details.occupations, vec!["monarch".to_string()]);
		assert_eq!(details.source.as_deref(), Some("wikidata"));

		let person = PersonRef::from(&details);
		assert_eq!(person.id, "Q9682");
		assert_eq!(person.bio.as_deref(), Some("Queen of the United Kingdom from 1952 to 2022"));
	}

	#[test]
	fn sparse_details_use_defaults() {
		let details: PersonDetails = serde_json::from_str(r#"{"id": "Q1"}"#).unwrap();
		assert_eq!(details.display_name(), "Unknown");
		assert!(details.occupations.is_empty());
	}

	#[test]
	fn batch_response_variants() {
		let started: BatchResponse =
			serde_json::from_str(r#"{"status": "started", "job_id": 17}"#).unwrap();
		assert!(started.started());
		assert_eq!(started.job_label().as_deref(), Some("17"));

		let named: BatchResponse =
			serde_json::from_str(r#"{"status": "started", "job_id": "job-17"}"#).unwrap();
		assert_eq!(named.job_label().as_deref(), Some("job-17"));

		let refused: BatchResponse =
			serde_json::from_str(r#"{"status": "error", "error": "scraper busy"}"#).unwrap();
		assert!(!refused.started());
		assert_eq!(refused.error.as_deref(), Some("scraper busy"));
	}

	#[test]
	fn not_found_is_recognizable() {
		let err = ApiError::Status {
			status: 404,
			message: "Person not found".to_string(),
		};
		assert!(err.is_not_found());
		assert!(!ApiError::Network("offline".to_string()).is_not_found());
	}
}
