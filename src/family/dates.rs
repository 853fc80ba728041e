//! Best-effort presentation of knowledge-graph dates.
//!
//! Upstream timestamps arrive in several shapes: RFC 3339 with an offset,
//! naive `YYYY-MM-DDTHH:MM:SS`, plain `YYYY-MM-DD`, sometimes with
//! out-of-range parts for partially known dates (`1936-00-00T...`). Every
//! function here is total: unparseable input falls back to a year prefix or
//! to the raw string, never to an error.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Formats a raw date for display, e.g. `"15 October 1936"`.
///
/// Falls back to the leading year when only that much is parseable, then to
/// the raw string, and to `"Unknown"` when absent or blank. Idempotent: the
/// output of a previous call passes through unchanged.
pub fn format_date(raw: Option<&str>) -> String {
	let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
		return "Unknown".to_string();
	};
	if let Some(date) = parse_date(raw) {
		return date.format("%-d %B %Y").to_string();
	}
	leading_year(raw).unwrap_or_else(|| raw.to_string())
}

/// Birth and death as a compact year range for tooltips and relation lists,
/// e.g. `"1926 - 2022"`. A missing death date reads `"Present"` for a
/// living person and `"Unknown"` otherwise; with both dates missing the
/// whole range collapses to `"Unknown"`.
pub fn lifespan(birth: Option<&str>, death: Option<&str>, living: bool) -> String {
	let birth = birth.and_then(year_label);
	let death = death.and_then(year_label);
	if birth.is_none() && death.is_none() && !living {
		return "Unknown".to_string();
	}
	let birth = birth.unwrap_or_else(|| "Unknown".to_string());
	let death = death.unwrap_or_else(|| if living { "Present".to_string() } else { "Unknown".to_string() });
	format!("{birth} - {death}")
}

/// Year of a raw date string, parsed fully when possible.
pub fn year_label(raw: &str) -> Option<String> {
	let raw = raw.trim();
	if raw.is_empty() {
		return None;
	}
	if let Some(date) = parse_date(raw) {
		return Some(date.year().to_string());
	}
	leading_year(raw)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
	let cleaned = raw.strip_prefix('+').unwrap_or(raw);
	if let Ok(dt) = DateTime::parse_from_rfc3339(cleaned) {
		return Some(dt.date_naive());
	}
	if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, "%Y-%m-%dT%H:%M:%S") {
		return Some(dt.date());
	}
	// Zulu suffix without full RFC 3339 compliance shows up occasionally.
	if let Some(stripped) = cleaned.strip_suffix('Z') {
		if let Ok(dt) = NaiveDateTime::parse_from_str(stripped, "%Y-%m-%dT%H:%M:%S") {
			return Some(dt.date());
		}
	}
	NaiveDate::parse_from_str(cleaned, "%Y-%m-%d").ok()
}

/// Extracts a leading 4-digit year. Only matches at the start of the string
/// so already-formatted output like `"15 October 1936"` is left alone.
fn leading_year(raw: &str) -> Option<String> {
	let raw = raw.strip_prefix('+').unwrap_or(raw);
	let digits: String = raw.chars().take_while(char::is_ascii_digit).collect();
	if digits.len() >= 4 {
		Some(digits[..4].to_string())
	} else {
		None
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn formats_full_dates() {
		assert_eq!(format_date(Some("1936-10-15T00:00:00")), "15 October 1936");
		assert_eq!(format_date(Some("1926-04-21T00:00:00+00:00")), "21 April 1926");
		assert_eq!(format_date(Some("+1952-02-06T00:00:00Z")), "6 February 1952");
		assert_eq!(format_date(Some("1900-01-03")), "3 January 1900");
	}

	#[test]
	fn falls_back_to_year_for_partial_dates() {
		// Month/day zeroed out is how partially known dates arrive.
		assert_eq!(format_date(Some("1936-00-00T00:00:00")), "1936");
		assert_eq!(format_date(Some("1799")), "1799");
	}

	#[test]
	fn missing_or_malformed_input_never_panics() {
		assert_eq!(format_date(None), "Unknown");
		assert_eq!(format_date(Some("")), "Unknown");
		assert_eq!(format_date(Some("   ")), "Unknown");
		assert_eq!(format_date(Some("circa 1500")), "circa 1500");
	}

	#[test]
	fn formatting_is_idempotent() {
		for raw in ["1936-10-15T00:00:00", "1936-00-00T00:00:00", "garbled", "1799"] {
			let once = format_date(Some(raw));
			let twice = format_date(Some(&once));
			assert_eq!(once, twice, "re-formatting {raw:?} changed the output");
		}
	}

	#[test]
	fn lifespan_covers_missing_and_living_cases() {
		assert_eq!(lifespan(Some("1926-04-21T00:00:00Z"), Some("2022-09-08T00:00:00Z"), false), "1926 - 2022");
		assert_eq!(lifespan(Some("1926-04-21"), None, true), "1926 - Present");
		assert_eq!(lifespan(Some("1926-04-21"), None, false), "1926 - Unknown");
		assert_eq!(lifespan(None, Some("1952-02-06"), false), "Unknown - 1952");
		assert_eq!(lifespan(None, None, false), "Unknown");
		assert_eq!(lifespan(None, None, true), "Unknown - Present");
	}

	#[test]
	fn year_label_only_matches_leading_digits() {
		assert_eq!(year_label("1936-10-15"), Some("1936".to_string()));
		assert_eq!(year_label("15 October 1936"), None);
		assert_eq!(year_label("abc"), None);
	}
}
